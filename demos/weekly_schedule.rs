// Builds a week of shifts for a small team and prints the first few distinct schedules
//
// Run with: cargo run --example weekly_schedule
// Optional: pass a TOML config path as the first argument

use chrono::{Duration, NaiveDate, NaiveDateTime};
use shift_scheduler::{
    init_tracing, Employee, Position, PreferenceRule, Priority, SchedulerConfig, SchedulingModel,
    Shift, ShiftCategory, ShiftPreferences, SolverFactory, SwapRequest,
};

fn at(date: NaiveDate, hour: u32, minute: u32) -> NaiveDateTime {
    date.and_hms_opt(hour, minute, 0).unwrap_or_default()
}

fn week(first_day: NaiveDate) -> Result<Vec<Shift>, Box<dyn std::error::Error>> {
    let mut shifts = Vec::new();
    for offset in 0..7 {
        let date = first_day + Duration::days(offset);
        let next = date + Duration::days(1);
        let weekend = offset >= 5;
        let prefix = date.format("%a").to_string().to_lowercase();

        if weekend {
            shifts.push(Shift::new(
                format!("{}_weekend_morning", prefix),
                ShiftCategory::WeekendMorning,
                at(date, 7, 30),
                at(date, 14, 30),
            )?);
            shifts.push(Shift::new(
                format!("{}_weekend_morning_backup", prefix),
                ShiftCategory::WeekendMorningBackup,
                at(date, 8, 0),
                at(date, 17, 0),
            )?);
        } else {
            shifts.push(Shift::new(
                format!("{}_morning", prefix),
                ShiftCategory::Morning,
                at(date, 9, 30),
                at(date, 16, 0),
            )?);
        }
        shifts.push(Shift::new(
            format!("{}_evening", prefix),
            ShiftCategory::Evening,
            at(date, 16, 0),
            at(next, 0, 0),
        )?);
        if offset == 4 {
            shifts.push(Shift::new(
                format!("{}_backup", prefix),
                ShiftCategory::ThursdayBackup,
                at(date, 19, 30),
                at(next, 2, 0),
            )?);
        }
        shifts.push(Shift::new(
            format!("{}_closing", prefix),
            ShiftCategory::Closing,
            at(date, 21, 30),
            at(next, 2, 0),
        )?);
    }
    Ok(shifts)
}

fn team(first_day: NaiveDate) -> Vec<Employee> {
    vec![
        Employee::new("maya", "Maya")
            .with_priority(Priority::Highest)
            .with_trained([
                ShiftCategory::Morning,
                ShiftCategory::MorningBackup,
                ShiftCategory::Evening,
                ShiftCategory::StandBy,
            ])
            .with_preferences(
                ShiftPreferences::new()
                    .with_wants_to_work(PreferenceRule::shift_ids(["sun_morning", "thu_evening"])),
            ),
        Employee::new("noam", "Noam")
            .with_position(Position::PartTimer)
            .with_trained([
                ShiftCategory::Evening,
                ShiftCategory::Closing,
                ShiftCategory::ThursdayBackup,
                ShiftCategory::WeekendEveningBackup,
            ])
            .with_preferences(ShiftPreferences::new().with_cannot_work(PreferenceRule::day(
                first_day + Duration::days(1),
            ))),
        Employee::new("lior", "Lior").trained_for_all().with_preferences(
            ShiftPreferences::new()
                .with_wants_to_work(PreferenceRule::shift_ids(["thu_morning", "fri_closing"])),
        ),
        Employee::new("dana", "Dana")
            .with_priority(Priority::High)
            .trained_for_all(),
        Employee::new("omer", "Omer")
            .with_priority(Priority::High)
            .trained_for_all()
            .with_preferences(ShiftPreferences::new().with_prefer_not_to_work(
                PreferenceRule::date_time_range(
                    at(first_day + Duration::days(5), 0, 0),
                    at(first_day + Duration::days(6), 23, 59),
                ),
            )),
        Employee::new("tal", "Tal")
            .with_position(Position::PartTimer)
            .trained_for_all(),
    ]
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing("shift_scheduler=info");

    let config = match std::env::args().nth(1) {
        Some(path) => SchedulerConfig::load(path)?,
        None => SchedulerConfig::default().with_time_limit_seconds(60),
    };

    let first_day = NaiveDate::from_ymd_opt(2024, 4, 21).ok_or("invalid start date")?;
    let model = SchedulingModel::build(team(first_day), week(first_day)?, &config)?;
    let solver = SolverFactory::create_solver(&config)?;

    let mut schedules = Vec::new();
    for schedule in model
        .enumerate(solver.clone())
        .take(config.solutions_to_generate)
    {
        let schedule = schedule?;
        println!(
            "schedule #{} (objective {:?})",
            schedule.ordinal(),
            schedule.objective_value()
        );
        for shift in model.shifts() {
            if let Some(employee) = schedule.assignee(shift.id()) {
                println!("  {:<28} {}", shift.id().as_str(), employee);
            }
        }
        for employee in model.employees() {
            println!(
                "  {:<8} shifts={} closings={} mornings={}",
                employee.name,
                schedule.shift_count(&employee.id),
                schedule.closing_count(&employee.id),
                schedule.morning_count(&employee.id)
            );
        }
        schedules.push(schedule);
    }

    if let Some(first) = schedules.first() {
        let evening = first.assignee(&"mon_evening".into()).cloned();
        let closing = first.assignee(&"mon_closing".into()).cloned();
        if let (Some(evening), Some(closing)) = (evening, closing) {
            let request = SwapRequest::new(evening, "mon_evening", closing, "mon_closing");
            match model.swap(first, &request, solver) {
                Ok(_) => println!("swap of monday evening and closing accepted"),
                Err(e) => println!("swap of monday evening and closing rejected: {}", e),
            }
        }
    }

    Ok(())
}
