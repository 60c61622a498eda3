// Domain value objects representing core scheduling concepts

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of an employee
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmployeeId(String);

impl EmployeeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for EmployeeId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for EmployeeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of a shift
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShiftId(String);

impl ShiftId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ShiftId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ShiftId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for ShiftId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Key of one decision variable: "this employee works this shift"
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AssignmentKey {
    pub employee: EmployeeId,
    pub shift: ShiftId,
}

impl AssignmentKey {
    pub fn new(employee: EmployeeId, shift: ShiftId) -> Self {
        Self { employee, shift }
    }
}

impl fmt::Display for AssignmentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.employee, self.shift)
    }
}

/// Priority of an employee, higher ranks win preference tie-breaks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Lowest,
    Low,
    #[default]
    Medium,
    High,
    Highest,
}

impl Priority {
    /// Rank in 1..=5 used to scale preference weights
    pub fn rank(self) -> i64 {
        match self {
            Priority::Lowest => 1,
            Priority::Low => 2,
            Priority::Medium => 3,
            Priority::High => 4,
            Priority::Highest => 5,
        }
    }
}

/// Seniority of an employee
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmployeeStatus {
    /// Needs an experienced colleague covering the same time window
    New,
    Junior,
    MidLevel,
    #[default]
    Senior,
}

impl EmployeeStatus {
    pub fn is_new(self) -> bool {
        matches!(self, EmployeeStatus::New)
    }
}

impl fmt::Display for EmployeeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmployeeStatus::New => write!(f, "new employee"),
            EmployeeStatus::Junior => write!(f, "junior employee"),
            EmployeeStatus::MidLevel => write!(f, "mid level employee"),
            EmployeeStatus::Senior => write!(f, "senior employee"),
        }
    }
}

/// Contractual position; the weekly target is configured per position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Position {
    #[default]
    FullTimer,
    PartTimer,
}

/// Category of a shift
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShiftCategory {
    Morning,
    MorningBackup,
    Evening,
    Closing,
    ThursdayBackup,
    WeekendMorning,
    WeekendMorningBackup,
    WeekendEveningBackup,
    StandBy,
}

impl ShiftCategory {
    pub const ALL: [ShiftCategory; 9] = [
        ShiftCategory::Morning,
        ShiftCategory::MorningBackup,
        ShiftCategory::Evening,
        ShiftCategory::Closing,
        ShiftCategory::ThursdayBackup,
        ShiftCategory::WeekendMorning,
        ShiftCategory::WeekendMorningBackup,
        ShiftCategory::WeekendEveningBackup,
        ShiftCategory::StandBy,
    ];

    pub fn is_closing(self) -> bool {
        matches!(self, ShiftCategory::Closing)
    }

    pub fn is_morning(self) -> bool {
        matches!(
            self,
            ShiftCategory::Morning
                | ShiftCategory::MorningBackup
                | ShiftCategory::WeekendMorning
                | ShiftCategory::WeekendMorningBackup
        )
    }

    pub fn is_stand_by(self) -> bool {
        matches!(self, ShiftCategory::StandBy)
    }
}

impl fmt::Display for ShiftCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ShiftCategory::Morning => "morning",
            ShiftCategory::MorningBackup => "morning backup",
            ShiftCategory::Evening => "evening",
            ShiftCategory::Closing => "closing",
            ShiftCategory::ThursdayBackup => "thursday backup",
            ShiftCategory::WeekendMorning => "weekend morning",
            ShiftCategory::WeekendMorningBackup => "weekend morning backup",
            ShiftCategory::WeekendEveningBackup => "weekend evening backup",
            ShiftCategory::StandBy => "stand by",
        };
        f.write_str(name)
    }
}

/// Status of one solver call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveStatus {
    /// Found optimal solution
    Optimal,
    /// Found feasible solution (may not be optimal)
    Feasible,
    /// No assignment satisfies the hard constraints
    Infeasible,
    /// Time limit reached without a definitive answer
    Timeout,
}

impl SolveStatus {
    pub fn has_solution(self) -> bool {
        matches!(self, SolveStatus::Optimal | SolveStatus::Feasible)
    }
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolveStatus::Optimal => write!(f, "Optimal"),
            SolveStatus::Feasible => write!(f, "Feasible"),
            SolveStatus::Infeasible => write!(f, "Infeasible"),
            SolveStatus::Timeout => write!(f, "Time Limit Reached"),
        }
    }
}

/// Solver backend to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolverBackend {
    /// Automatically select best available solver
    #[default]
    Auto,
    /// Pure Rust microlp through good_lp
    MicroLp,
    /// HiGHS (requires the `highs` feature)
    Highs,
}

impl fmt::Display for SolverBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolverBackend::Auto => write!(f, "Auto"),
            SolverBackend::MicroLp => write!(f, "microlp"),
            SolverBackend::Highs => write!(f, "HiGHS"),
        }
    }
}
