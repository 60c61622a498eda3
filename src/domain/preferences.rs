//! Employee shift preferences.
//!
//! Preferences are written as [`PreferenceRule`]s (explicit shift ids, whole
//! days, date-time ranges or combinations of those) and resolved once,
//! against the week's shifts, into plain shift-id sets before any constraint
//! is encoded.

use std::collections::BTreeSet;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::models::Shift;
use super::value_objects::ShiftId;

/// A rule selecting a subset of the week's shifts
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PreferenceRule {
    #[default]
    None,
    /// Explicit shift identifiers
    ShiftIds { ids: BTreeSet<ShiftId> },
    /// Every shift starting on the given date
    Day { date: NaiveDate },
    /// Every shift intersecting `[start, end]`
    DateTimeRange {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },
    /// Union of several rules
    Combined { rules: Vec<PreferenceRule> },
}

impl PreferenceRule {
    pub fn shift_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<ShiftId>,
    {
        PreferenceRule::ShiftIds {
            ids: ids.into_iter().map(Into::into).collect(),
        }
    }

    pub fn day(date: NaiveDate) -> Self {
        PreferenceRule::Day { date }
    }

    pub fn date_time_range(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        PreferenceRule::DateTimeRange { start, end }
    }

    pub fn combined(rules: Vec<PreferenceRule>) -> Self {
        PreferenceRule::Combined { rules }
    }

    /// Ids of the shifts this rule selects
    pub fn resolve(&self, shifts: &[Shift]) -> BTreeSet<ShiftId> {
        match self {
            PreferenceRule::None => BTreeSet::new(),
            PreferenceRule::ShiftIds { ids } => shifts
                .iter()
                .filter(|s| ids.contains(s.id()))
                .map(|s| s.id().clone())
                .collect(),
            PreferenceRule::Day { date } => shifts
                .iter()
                .filter(|s| s.start_date() == *date)
                .map(|s| s.id().clone())
                .collect(),
            PreferenceRule::DateTimeRange { start, end } => shifts
                .iter()
                .filter(|s| s.start() <= *end && s.end() >= *start)
                .map(|s| s.id().clone())
                .collect(),
            PreferenceRule::Combined { rules } => {
                rules.iter().flat_map(|rule| rule.resolve(shifts)).collect()
            }
        }
    }
}

/// Preference rules of one employee
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ShiftPreferences {
    /// Binding: the employee is never assigned these shifts
    #[serde(default)]
    pub cannot_work: PreferenceRule,
    #[serde(default)]
    pub prefer_not_to_work: PreferenceRule,
    #[serde(default)]
    pub wants_to_work: PreferenceRule,
}

impl ShiftPreferences {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cannot_work(mut self, rule: PreferenceRule) -> Self {
        self.cannot_work = rule;
        self
    }

    pub fn with_prefer_not_to_work(mut self, rule: PreferenceRule) -> Self {
        self.prefer_not_to_work = rule;
        self
    }

    pub fn with_wants_to_work(mut self, rule: PreferenceRule) -> Self {
        self.wants_to_work = rule;
        self
    }

    pub fn resolve(&self, shifts: &[Shift]) -> ResolvedPreferences {
        ResolvedPreferences {
            cannot_work: self.cannot_work.resolve(shifts),
            prefer_not_to_work: self.prefer_not_to_work.resolve(shifts),
            wants_to_work: self.wants_to_work.resolve(shifts),
        }
    }
}

/// Concrete shift-id sets, ready for encoding
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResolvedPreferences {
    pub cannot_work: BTreeSet<ShiftId>,
    pub prefer_not_to_work: BTreeSet<ShiftId>,
    pub wants_to_work: BTreeSet<ShiftId>,
}
