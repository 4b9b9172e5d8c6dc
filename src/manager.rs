//! The aggregate root owning every member and workout plan.

use chrono::NaiveDate;
use serde::Serialize;

use crate::dates;
use crate::error::{EntityKind, GymError, Result};
use crate::models::{Member, WorkoutPlan};

/// Owns all members and workout plans and keeps the references between
/// them consistent.
///
/// Both collections keep insertion order so iteration and persisted output
/// are deterministic. Lookups are by exact id.
///
/// # Invariant
/// Every `Member::workout_plan_id` that is `Some` names a plan held by this
/// manager. [`remove_workout_plan`](Self::remove_workout_plan) cascades to
/// clear references, and [`codec::decode`](crate::codec::decode) drops
/// references to plans missing from a snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GymManager {
    members: Vec<Member>,
    workout_plans: Vec<WorkoutPlan>,
}

/// Headline counts for the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GymSummary {
    pub total_members: usize,
    /// Members with at least one attendance entry on the given day.
    pub active_today: usize,
    /// Members that are unpaid as of the given day.
    pub unpaid_members: usize,
}

impl GymManager {
    pub fn new() -> Self {
        Self::default()
    }

    // ============================================================
    // Lookups
    // ============================================================

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn workout_plans(&self) -> &[WorkoutPlan] {
        &self.workout_plans
    }

    pub fn member(&self, member_id: &str) -> Option<&Member> {
        self.members.iter().find(|m| m.member_id == member_id)
    }

    pub fn workout_plan(&self, plan_id: &str) -> Option<&WorkoutPlan> {
        self.workout_plans.iter().find(|p| p.plan_id == plan_id)
    }

    /// Like [`member`](Self::member), but a missing id is an error.
    pub fn require_member(&self, member_id: &str) -> Result<&Member> {
        self.member(member_id)
            .ok_or_else(|| GymError::not_found(EntityKind::Member, member_id))
    }

    /// Resolve the plan a member is assigned to.
    pub fn plan_for(&self, member_id: &str) -> Result<Option<&WorkoutPlan>> {
        Ok(self
            .require_member(member_id)?
            .workout_plan_id
            .as_deref()
            .and_then(|plan_id| self.workout_plan(plan_id)))
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    pub fn plan_count(&self) -> usize {
        self.workout_plans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty() && self.workout_plans.is_empty()
    }

    fn member_mut(&mut self, member_id: &str) -> Result<&mut Member> {
        self.members
            .iter_mut()
            .find(|m| m.member_id == member_id)
            .ok_or_else(|| GymError::not_found(EntityKind::Member, member_id))
    }

    // ============================================================
    // Members
    // ============================================================

    pub fn register_member(&mut self, member: Member) -> Result<()> {
        member.validate()?;
        if self.member(&member.member_id).is_some() {
            return Err(GymError::duplicate(EntityKind::Member, member.member_id));
        }
        tracing::debug!("Registered member {}", member.member_id);
        self.members.push(member);
        Ok(())
    }

    /// Remove a member. Plans never point at members, so nothing cascades.
    pub fn remove_member(&mut self, member_id: &str) -> Result<Member> {
        let index = self
            .members
            .iter()
            .position(|m| m.member_id == member_id)
            .ok_or_else(|| GymError::not_found(EntityKind::Member, member_id))?;
        tracing::debug!("Removed member {}", member_id);
        Ok(self.members.remove(index))
    }

    pub fn log_attendance(&mut self, date: NaiveDate, member_id: &str) -> Result<()> {
        self.member_mut(member_id)?.record_attendance(date);
        tracing::debug!("Logged attendance for {} on {}", member_id, date);
        Ok(())
    }

    pub fn log_payment(&mut self, member_id: &str, date: NaiveDate, amount: f64) -> Result<()> {
        if !amount.is_finite() {
            return Err(GymError::MalformedInput(format!(
                "payment amount must be a finite number, got {}",
                amount
            )));
        }
        self.member_mut(member_id)?.add_payment(date, amount);
        tracing::debug!("Logged payment of {} for {} on {}", amount, member_id, date);
        Ok(())
    }

    // ============================================================
    // Workout plans
    // ============================================================

    pub fn add_workout_plan(&mut self, plan: WorkoutPlan) -> Result<()> {
        plan.validate()?;
        if self.workout_plan(&plan.plan_id).is_some() {
            return Err(GymError::duplicate(EntityKind::WorkoutPlan, plan.plan_id));
        }
        tracing::debug!("Added workout plan {}", plan.plan_id);
        self.workout_plans.push(plan);
        Ok(())
    }

    /// Remove a plan and unassign it from every member that follows it.
    pub fn remove_workout_plan(&mut self, plan_id: &str) -> Result<WorkoutPlan> {
        let index = self
            .workout_plans
            .iter()
            .position(|p| p.plan_id == plan_id)
            .ok_or_else(|| GymError::not_found(EntityKind::WorkoutPlan, plan_id))?;
        let plan = self.workout_plans.remove(index);

        let mut cleared = 0;
        for member in self.members.iter_mut().filter(|m| m.is_assigned_to(plan_id)) {
            member.clear_plan();
            cleared += 1;
        }
        tracing::debug!(
            "Removed workout plan {} and unassigned it from {} member(s)",
            plan_id,
            cleared
        );
        Ok(plan)
    }

    pub fn assign_workout_plan(&mut self, plan_id: &str, member_id: &str) -> Result<&Member> {
        let plan_index = self
            .workout_plans
            .iter()
            .position(|p| p.plan_id == plan_id)
            .ok_or_else(|| GymError::not_found(EntityKind::WorkoutPlan, plan_id))?;
        let member_index = self
            .members
            .iter()
            .position(|m| m.member_id == member_id)
            .ok_or_else(|| GymError::not_found(EntityKind::Member, member_id))?;

        let member = &mut self.members[member_index];
        member.assign_plan(&self.workout_plans[plan_index]);
        tracing::debug!("Assigned workout plan {} to {}", plan_id, member_id);
        Ok(member)
    }

    /// Clear a member's plan, returning the id it pointed at.
    pub fn unassign_workout_plan(&mut self, member_id: &str) -> Result<String> {
        let member = self.member_mut(member_id)?;
        let plan_id = member.clear_plan().ok_or_else(|| GymError::NotAssigned {
            member_id: member_id.to_string(),
        })?;
        tracing::debug!("Unassigned workout plan {} from {}", plan_id, member_id);
        Ok(plan_id)
    }

    // ============================================================
    // Reports
    // ============================================================

    /// Members whose latest payment is strictly before `cutoff`, together
    /// with members who never paid.
    pub fn unpaid_as_of(&self, cutoff: NaiveDate) -> Vec<&Member> {
        self.members
            .iter()
            .filter(|m| match m.latest_payment() {
                Some(payment) => payment.date < cutoff,
                None => true,
            })
            .collect()
    }

    pub fn summary(&self, today: NaiveDate) -> GymSummary {
        GymSummary {
            total_members: self.members.len(),
            active_today: self.members.iter().filter(|m| m.attended_on(today)).count(),
            unpaid_members: self.unpaid_as_of(today).len(),
        }
    }

    /// Every plan with the number of members currently assigned to it.
    pub fn plan_assignments(&self) -> Vec<(&WorkoutPlan, usize)> {
        self.workout_plans
            .iter()
            .map(|plan| {
                let count = self
                    .members
                    .iter()
                    .filter(|m| m.is_assigned_to(&plan.plan_id))
                    .count();
                (plan, count)
            })
            .collect()
    }

    /// The plan with the most members.
    ///
    /// Plans are tallied in the order members reach them, so a tie goes to
    /// the plan of the earliest registered member among the tied plans.
    pub fn most_popular_plan(&self) -> Option<&WorkoutPlan> {
        let mut tally: Vec<(&WorkoutPlan, usize)> = Vec::new();
        for plan_id in self.members.iter().filter_map(|m| m.workout_plan_id.as_deref()) {
            match tally.iter_mut().find(|(plan, _)| plan.plan_id == plan_id) {
                Some((_, count)) => *count += 1,
                None => {
                    if let Some(plan) = self.workout_plan(plan_id) {
                        tally.push((plan, 1));
                    }
                }
            }
        }

        let mut best: Option<(&WorkoutPlan, usize)> = None;
        for (plan, count) in tally {
            if count > best.map_or(0, |(_, c)| c) {
                best = Some((plan, count));
            }
        }
        best.map(|(plan, _)| plan)
    }

    /// Members whose latest payment falls within the given calendar month.
    pub fn paid_in_month(&self, year: i32, month: u32) -> usize {
        self.members
            .iter()
            .filter(|m| m.paid_in_month(year, month))
            .count()
    }

    /// Rank members by the number of days they attended in the `days`-day
    /// window ending at `window_end`, most active first.
    ///
    /// Members with equal counts keep registration order.
    pub fn top_attendees(
        &self,
        window_end: NaiveDate,
        days: u32,
        limit: usize,
    ) -> Vec<(&Member, usize)> {
        let start = dates::window_start(window_end, days);
        let mut ranked: Vec<(&Member, usize)> = self
            .members
            .iter()
            .map(|m| {
                let count = start.map_or(0, |start| m.days_attended(start, window_end));
                (m, count)
            })
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.truncate(limit);
        ranked
    }

    // ============================================================
    // Snapshot support
    // ============================================================

    /// Insert or replace a plan without the duplicate check.
    pub(crate) fn upsert_plan(&mut self, plan: WorkoutPlan) -> bool {
        match self
            .workout_plans
            .iter_mut()
            .find(|p| p.plan_id == plan.plan_id)
        {
            Some(existing) => {
                *existing = plan;
                true
            }
            None => {
                self.workout_plans.push(plan);
                false
            }
        }
    }

    /// Insert or replace a member without the duplicate check.
    pub(crate) fn upsert_member(&mut self, member: Member) -> bool {
        match self
            .members
            .iter_mut()
            .find(|m| m.member_id == member.member_id)
        {
            Some(existing) => {
                *existing = member;
                true
            }
            None => {
                self.members.push(member);
                false
            }
        }
    }
}
