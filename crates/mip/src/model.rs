//! Typed MIP model: variables, linear constraints and a minimisation objective.

use std::fmt::{self, Display, Formatter};

use crate::{MipError, MipResult};

/// Handle to a model variable. Only valid for the model that issued it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VarId(usize);

impl VarId {
    pub(crate) fn from_index(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

impl Display for VarId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "x{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum VarKind {
    /// Takes values in `{0, 1}`; branched on during search.
    Binary,
    Continuous { lower: f64, upper: f64 },
}

impl VarKind {
    pub fn bounds(self) -> (f64, f64) {
        match self {
            Self::Binary => (0.0, 1.0),
            Self::Continuous { lower, upper } => (lower, upper),
        }
    }

    pub fn is_integral(self) -> bool {
        matches!(self, Self::Binary)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Variable {
    pub name: String,
    pub kind: VarKind,
    /// Objective coefficient (the model always minimises).
    pub obj: f64,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Sense {
    Le,
    Ge,
    Eq,
}

impl Display for Sense {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Le => "<=",
            Self::Ge => ">=",
            Self::Eq => "=",
        })
    }
}

/// `Σ coeff·var (sense) rhs`.
#[derive(Clone, Debug, PartialEq)]
pub struct LinearConstraint {
    pub name: Option<String>,
    pub terms: Vec<(VarId, f64)>,
    pub sense: Sense,
    pub rhs: f64,
}

impl LinearConstraint {
    pub fn new(sense: Sense, rhs: f64) -> Self {
        Self {
            name: None,
            terms: Vec::new(),
            sense,
            rhs,
        }
    }

    pub fn le(rhs: f64) -> Self {
        Self::new(Sense::Le, rhs)
    }

    pub fn ge(rhs: f64) -> Self {
        Self::new(Sense::Ge, rhs)
    }

    pub fn equal(rhs: f64) -> Self {
        Self::new(Sense::Eq, rhs)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_term(mut self, var: VarId, coeff: f64) -> Self {
        self.terms.push((var, coeff));
        self
    }

    pub fn with_terms(mut self, terms: impl IntoIterator<Item = (VarId, f64)>) -> Self {
        self.terms.extend(terms);
        self
    }

    pub fn activity(&self, values: &[f64]) -> f64 {
        self.terms
            .iter()
            .map(|&(var, coeff)| coeff * values.get(var.index()).copied().unwrap_or(0.0))
            .sum()
    }

    /// Amount by which `values` violate the constraint; `0.0` when satisfied.
    pub fn violation(&self, values: &[f64]) -> f64 {
        let activity = self.activity(values);
        match self.sense {
            Sense::Le => (activity - self.rhs).max(0.0),
            Sense::Ge => (self.rhs - activity).max(0.0),
            Sense::Eq => (activity - self.rhs).abs(),
        }
    }

    pub(crate) fn validate(&self, num_vars: usize) -> MipResult<()> {
        if !self.rhs.is_finite() {
            return Err(MipError::invalid_model(format!(
                "constraint {} has non-finite rhs {}",
                self.label(),
                self.rhs
            )));
        }
        for &(var, coeff) in &self.terms {
            if var.index() >= num_vars {
                return Err(MipError::UnknownVariable {
                    index: var.index(),
                    num_vars,
                });
            }
            if !coeff.is_finite() {
                return Err(MipError::invalid_model(format!(
                    "constraint {} has non-finite coefficient {coeff} on {var}",
                    self.label()
                )));
            }
        }
        Ok(())
    }

    fn label(&self) -> &str {
        self.name.as_deref().unwrap_or("<unnamed>")
    }
}

impl Display for LinearConstraint {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if let Some(name) = &self.name {
            write!(f, "{name}: ")?;
        }
        if self.terms.is_empty() {
            f.write_str("0")?;
        }
        for (idx, (var, coeff)) in self.terms.iter().enumerate() {
            if idx > 0 {
                f.write_str(" + ")?;
            }
            write!(f, "{coeff} {var}")?;
        }
        write!(f, " {} {}", self.sense, self.rhs)
    }
}

/// Minimisation MIP. Build it up with [`MipModel::add_binary`],
/// [`MipModel::add_continuous`] and [`MipModel::add_constraint`].
#[derive(Clone, Debug, Default)]
pub struct MipModel {
    vars: Vec<Variable>,
    constraints: Vec<LinearConstraint>,
}

impl MipModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_binary(&mut self, name: impl Into<String>, obj: f64) -> VarId {
        self.push_var(name.into(), VarKind::Binary, obj)
    }

    pub fn add_continuous(
        &mut self,
        name: impl Into<String>,
        obj: f64,
        lower: f64,
        upper: f64,
    ) -> VarId {
        self.push_var(name.into(), VarKind::Continuous { lower, upper }, obj)
    }

    pub fn add_constraint(&mut self, constraint: LinearConstraint) -> MipResult<()> {
        constraint.validate(self.vars.len())?;
        self.constraints.push(constraint);
        Ok(())
    }

    pub fn num_vars(&self) -> usize {
        self.vars.len()
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    pub fn vars(&self) -> &[Variable] {
        &self.vars
    }

    pub fn var(&self, var: VarId) -> Option<&Variable> {
        self.vars.get(var.index())
    }

    pub fn constraints(&self) -> &[LinearConstraint] {
        &self.constraints
    }

    pub fn objective_value(&self, values: &[f64]) -> f64 {
        self.vars
            .iter()
            .zip(values)
            .map(|(var, value)| var.obj * value)
            .sum()
    }

    /// Checks everything that `add_constraint` cannot: objective and bounds.
    pub fn validate(&self) -> MipResult<()> {
        if self.vars.is_empty() {
            return Err(MipError::invalid_model("model has no variables"));
        }
        for (idx, var) in self.vars.iter().enumerate() {
            if !var.obj.is_finite() {
                return Err(MipError::invalid_model(format!(
                    "variable {} (x{idx}) has non-finite objective {}",
                    var.name, var.obj
                )));
            }
            let (lower, upper) = var.kind.bounds();
            if lower.is_nan() || upper.is_nan() || lower > upper {
                return Err(MipError::invalid_model(format!(
                    "variable {} (x{idx}) has empty bounds [{lower}, {upper}]",
                    var.name
                )));
            }
        }
        Ok(())
    }

    fn push_var(&mut self, name: String, kind: VarKind, obj: f64) -> VarId {
        let id = VarId::from_index(self.vars.len());
        self.vars.push(Variable { name, kind, obj });
        id
    }
}
