use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{GymError, Result};

/// A named, reusable training program.
///
/// Plans carry no cross-entity state: which members follow a plan is
/// recorded on the members, never here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutPlan {
    pub plan_id: String,
    pub name: String,
    /// Free-form category, e.g. "Legs" or "Upper body".
    pub focus_area: String,
    /// Ordered exercises. Non-empty by convention; the CLI enforces it.
    pub exercises: Vec<String>,
}

impl WorkoutPlan {
    pub fn new(
        plan_id: impl Into<String>,
        name: impl Into<String>,
        focus_area: impl Into<String>,
        exercises: Vec<String>,
    ) -> Result<Self> {
        let plan = Self {
            plan_id: plan_id.into(),
            name: name.into(),
            focus_area: focus_area.into(),
            exercises,
        };
        plan.validate()?;
        Ok(plan)
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.plan_id.trim().is_empty() {
            return Err(GymError::MalformedInput(
                "plan id must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl fmt::Display for WorkoutPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}): {}",
            self.name,
            self.focus_area,
            self.exercises.join(", ")
        )
    }
}
