use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::WorkoutPlan;
use crate::dates;
use crate::error::{GymError, Result};

/// A gym patron record.
///
/// The attendance and payment logs are **append-only**: entries are never
/// removed or reordered, and the same day may be logged more than once.
///
/// The serialized field names (`workout_plan_id`, `payment_history`, ...) are
/// the persisted file format and must not change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub member_id: String,
    pub name: String,
    pub age: u32,
    pub join_date: NaiveDate,
    /// Id of the assigned plan. A weak reference; the plan is owned by the manager.
    pub workout_plan_id: Option<String>,
    #[serde(default)]
    pub payment_history: Vec<Payment>,
    #[serde(default)]
    pub attendance_log: Vec<NaiveDate>,
}

/// One entry of a member's payment log.
///
/// Persisted as a two-element array `["YYYY-MM-DD", amount]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(NaiveDate, f64)", into = "(NaiveDate, f64)")]
pub struct Payment {
    pub date: NaiveDate,
    /// Raw amount; no currency semantics.
    pub amount: f64,
}

impl From<(NaiveDate, f64)> for Payment {
    fn from((date, amount): (NaiveDate, f64)) -> Self {
        Self { date, amount }
    }
}

impl From<Payment> for (NaiveDate, f64) {
    fn from(payment: Payment) -> Self {
        (payment.date, payment.amount)
    }
}

impl Member {
    /// Create a member with empty logs and no plan.
    pub fn new(
        member_id: impl Into<String>,
        name: impl Into<String>,
        age: u32,
        join_date: NaiveDate,
    ) -> Result<Self> {
        let member = Self {
            member_id: member_id.into(),
            name: name.into(),
            age,
            join_date,
            workout_plan_id: None,
            payment_history: Vec::new(),
            attendance_log: Vec::new(),
        };
        member.validate()?;
        Ok(member)
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.member_id.trim().is_empty() {
            return Err(GymError::MalformedInput(
                "member id must not be empty".to_string(),
            ));
        }
        if let Some(payment) = self.payment_history.iter().find(|p| !p.amount.is_finite()) {
            return Err(GymError::MalformedInput(format!(
                "member '{}' has a non-finite payment amount: {}",
                self.member_id, payment.amount
            )));
        }
        Ok(())
    }

    /// Point this member at `plan`. Existence is the manager's concern.
    pub fn assign_plan(&mut self, plan: &WorkoutPlan) {
        self.workout_plan_id = Some(plan.plan_id.clone());
    }

    pub(crate) fn clear_plan(&mut self) -> Option<String> {
        self.workout_plan_id.take()
    }

    pub fn has_plan(&self) -> bool {
        self.workout_plan_id.is_some()
    }

    pub fn is_assigned_to(&self, plan_id: &str) -> bool {
        self.workout_plan_id.as_deref() == Some(plan_id)
    }

    pub fn record_attendance(&mut self, date: NaiveDate) {
        self.attendance_log.push(date);
    }

    pub fn add_payment(&mut self, date: NaiveDate, amount: f64) {
        self.payment_history.push(Payment { date, amount });
    }

    /// The most recently logged payment, or `None` if the member never paid.
    pub fn latest_payment(&self) -> Option<&Payment> {
        self.payment_history.last()
    }

    /// True when the latest payment falls within the given calendar month.
    pub fn paid_in_month(&self, year: i32, month: u32) -> bool {
        self.latest_payment()
            .is_some_and(|p| dates::same_month(p.date, year, month))
    }

    pub fn attended_on(&self, date: NaiveDate) -> bool {
        self.attendance_log.contains(&date)
    }

    /// Number of distinct days between `start` and `end` (both inclusive)
    /// on which this member attended at least once.
    pub fn days_attended(&self, start: NaiveDate, end: NaiveDate) -> usize {
        self.attendance_log
            .iter()
            .filter(|d| start <= **d && **d <= end)
            .collect::<BTreeSet<_>>()
            .len()
    }
}
