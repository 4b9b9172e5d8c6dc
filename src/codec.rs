//! Conversion between [`GymManager`] and its persisted snapshot.
//!
//! A snapshot always covers the whole aggregate. Plans are listed (and
//! decoded) before members, because decoding a member resolves its
//! `workout_plan_id` against the plans already loaded.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::manager::GymManager;
use crate::models::{Member, WorkoutPlan};

/// The persisted shape of a [`GymManager`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GymSnapshot {
    #[serde(default)]
    pub workout_plans: Vec<WorkoutPlan>,
    #[serde(default)]
    pub members: Vec<Member>,
}

pub fn encode(manager: &GymManager) -> GymSnapshot {
    GymSnapshot {
        workout_plans: manager.workout_plans().to_vec(),
        members: manager.members().to_vec(),
    }
}

/// Rebuild a manager from a snapshot.
///
/// A member naming a plan that is not in the snapshot is loaded without a
/// plan. When an id appears twice, the later entry replaces the earlier one.
pub fn decode(snapshot: GymSnapshot) -> Result<GymManager> {
    let mut manager = GymManager::new();

    for plan in snapshot.workout_plans {
        plan.validate()?;
        let plan_id = plan.plan_id.clone();
        if manager.upsert_plan(plan) {
            tracing::warn!("Snapshot lists workout plan {} more than once", plan_id);
        }
    }

    for mut member in snapshot.members {
        member.validate()?;
        if let Some(plan_id) = member.workout_plan_id.as_deref() {
            if manager.workout_plan(plan_id).is_none() {
                tracing::warn!(
                    "Member {} refers to unknown workout plan {}; leaving unassigned",
                    member.member_id,
                    plan_id
                );
                member.workout_plan_id = None;
            }
        }
        let member_id = member.member_id.clone();
        if manager.upsert_member(member) {
            tracing::warn!("Snapshot lists member {} more than once", member_id);
        }
    }

    Ok(manager)
}

/// Render the manager as pretty-printed JSON, indented by four spaces.
pub fn to_json(manager: &GymManager) -> Result<String> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    encode(manager).serialize(&mut serializer)?;
    // serde_json only ever emits valid UTF-8
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

pub fn from_json(json: &str) -> Result<GymManager> {
    let snapshot: GymSnapshot = serde_json::from_str(json)?;
    decode(snapshot)
}
