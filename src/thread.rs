use crate::maze::Pos;

const DANGER_PERCENT: u32 = 60;
const CRITICAL_PERCENT: u32 = 30;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// Stepped onto a fresh cell, one unit of thread spent.
    Advanced,
    /// Stepped back onto the trail; `returned` segments were wound back up.
    Retraced { returned: usize },
    /// Not enough thread for a fresh cell. Nothing was changed.
    Depleted,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tension {
    Steady,
    Danger,
    Critical,
}

/// The trail the player has unwound and how much thread is left on the
/// spool.
///
/// The trail never holds the same position twice: stepping onto any cell
/// already on it cuts everything after that cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Thread {
    path: Vec<Pos>,
    left: u32,
    max: u32,
}

impl Thread {
    pub fn new(start: Pos, max: u32) -> Self {
        Self {
            path: vec![start],
            left: max,
            max,
        }
    }

    pub fn path(&self) -> &[Pos] {
        &self.path
    }

    pub fn left(&self) -> u32 {
        self.left
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    pub fn attempt_step(&mut self, target: Pos) -> StepOutcome {
        if let Some(idx) = self.path.iter().position(|p| *p == target) {
            let returned = self.path.len() - (idx + 1);
            self.path.truncate(idx + 1);
            let refund = u32::try_from(returned).unwrap_or(u32::MAX);
            self.left = self.left.saturating_add(refund).min(self.max);
            return StepOutcome::Retraced { returned };
        }

        match self.left.checked_sub(1) {
            Some(left) => {
                self.left = left;
                self.path.push(target);
                StepOutcome::Advanced
            }
            None => StepOutcome::Depleted,
        }
    }

    pub fn percent_left(&self) -> u32 {
        if self.max == 0 {
            return 0;
        }
        (u64::from(self.left) * 100 / u64::from(self.max)) as u32
    }

    pub fn tension(&self) -> Tension {
        match self.percent_left() {
            p if p < CRITICAL_PERCENT => Tension::Critical,
            p if p < DANGER_PERCENT => Tension::Danger,
            _ => Tension::Steady,
        }
    }
}
