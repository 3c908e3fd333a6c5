use std::fmt::{self, Display, Formatter};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MipStatus {
    Optimal,
    Infeasible,
    Unbounded,
    /// Node limit reached; the incumbent (if any) is returned.
    NodeLimit,
    /// Time limit reached; the incumbent (if any) is returned.
    TimeLimit,
}

impl Display for MipStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Optimal => "optimal",
            Self::Infeasible => "infeasible",
            Self::Unbounded => "unbounded",
            Self::NodeLimit => "node-limit",
            Self::TimeLimit => "time-limit",
        })
    }
}

#[derive(Clone, Debug)]
pub struct MipSolution {
    pub status: MipStatus,
    /// Incumbent values, empty when no integer solution was accepted.
    pub values: Vec<f64>,
    pub objective: f64,
    pub nodes_explored: u64,
    pub lazy_constraints_added: u64,
    pub callback_calls: u64,
    pub solve_time_ms: u64,
}

impl MipSolution {
    pub(crate) fn without_incumbent(status: MipStatus) -> Self {
        Self {
            status,
            values: Vec::new(),
            objective: f64::INFINITY,
            nodes_explored: 0,
            lazy_constraints_added: 0,
            callback_calls: 0,
            solve_time_ms: 0,
        }
    }

    pub fn has_solution(&self) -> bool {
        !self.values.is_empty()
            && matches!(
                self.status,
                MipStatus::Optimal | MipStatus::NodeLimit | MipStatus::TimeLimit
            )
    }
}
