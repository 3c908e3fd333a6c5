//! Search limits and numeric tolerances.

use crate::{MipError, MipResult};

#[derive(Clone, Debug, PartialEq)]
pub struct MipSettings {
    /// Maximum number of search nodes to process.
    pub max_nodes: u64,
    /// Wall-clock limit in milliseconds (`None` = unlimited).
    pub time_limit_ms: Option<u64>,
    /// A binary variable is integral if `|x - round(x)| <= int_feas_tol`.
    pub int_feas_tol: f64,
    /// Nodes whose relaxation is within this much of the incumbent are pruned.
    pub abs_gap_tol: f64,
    /// Lazy constraints violated by less than this are ignored.
    pub violation_tol: f64,
    /// Emit a progress line every `log_freq` nodes (0 disables).
    pub log_freq: u64,
}

impl Default for MipSettings {
    fn default() -> Self {
        Self {
            max_nodes: 1_000_000,
            time_limit_ms: None,
            int_feas_tol: 1e-6,
            abs_gap_tol: 1e-6,
            violation_tol: 1e-6,
            log_freq: 100,
        }
    }
}

impl MipSettings {
    pub fn with_time_limit(mut self, seconds: f64) -> Self {
        self.time_limit_ms = if seconds > 0.0 && seconds.is_finite() {
            Some((seconds * 1000.0) as u64)
        } else {
            None
        };
        self
    }

    pub fn with_max_nodes(mut self, nodes: u64) -> Self {
        self.max_nodes = nodes;
        self
    }

    pub fn with_int_feas_tol(mut self, tol: f64) -> Self {
        self.int_feas_tol = tol;
        self
    }

    /// `int_feas_tol` must lie in `(0, 0.5)`; at `0.5` a half-integral value
    /// would count as integral and be rounded into the candidate.
    pub(crate) fn validate(&self) -> MipResult<()> {
        if !(self.int_feas_tol > 0.0 && self.int_feas_tol < 0.5) {
            return Err(MipError::invalid_model(format!(
                "int_feas_tol must be in (0, 0.5), got {}",
                self.int_feas_tol
            )));
        }
        for (name, tol) in [
            ("abs_gap_tol", self.abs_gap_tol),
            ("violation_tol", self.violation_tol),
        ] {
            if !(tol >= 0.0 && tol.is_finite()) {
                return Err(MipError::invalid_model(format!(
                    "{name} must be finite and non-negative, got {tol}"
                )));
            }
        }
        Ok(())
    }
}
