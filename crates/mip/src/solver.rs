use std::time::Instant;

use minilp::{ComparisonOp, LinearExpr, OptimizationDirection, Problem};

use crate::{
    MipError, MipResult,
    callback::{Candidate, LazyConstraintCallback, LazyContext, NoLazyConstraints},
    model::{LinearConstraint, MipModel, Sense, VarId},
    settings::MipSettings,
    solution::{MipSolution, MipStatus},
};

const ROOT_NODE_ID: u64 = 0;

/// Depth-first branch-and-cut over `minilp` LP relaxations.
///
/// Lazy constraints returned by the callback go into a global pool. Every
/// node catches up on pool entries it has not seen before its relaxation is
/// trusted, so a cut found deep in one subtree also applies to its siblings.
#[derive(Clone, Debug)]
pub struct MipSolver {
    model: MipModel,
    settings: MipSettings,
}

impl MipSolver {
    pub fn new(model: MipModel, settings: MipSettings) -> MipResult<Self> {
        model.validate()?;
        settings.validate()?;
        Ok(Self { model, settings })
    }

    pub fn solve(&self) -> MipResult<MipSolution> {
        self.solve_with(&mut NoLazyConstraints)
    }

    pub fn solve_with<C>(&self, callback: &mut C) -> MipResult<MipSolution>
    where
        C: LazyConstraintCallback + ?Sized,
    {
        Search::new(&self.model, &self.settings).run(callback)
    }
}

struct OpenNode {
    id: u64,
    depth: u32,
    lp: minilp::Solution,
    cuts_applied: usize,
}

#[derive(Default)]
struct SearchStats {
    nodes_explored: u64,
    nodes_pruned: u64,
    lazy_constraints_added: u64,
    callback_calls: u64,
    incumbent_updates: u64,
}

struct Incumbent {
    values: Vec<f64>,
    objective: f64,
}

struct Search<'a> {
    model: &'a MipModel,
    settings: &'a MipSettings,
    lp_vars: Vec<minilp::Variable>,
    pool: Vec<LinearConstraint>,
    stack: Vec<OpenNode>,
    incumbent: Option<Incumbent>,
    next_node_id: u64,
    stats: SearchStats,
    started: Instant,
}

impl<'a> Search<'a> {
    fn new(model: &'a MipModel, settings: &'a MipSettings) -> Self {
        Self {
            model,
            settings,
            lp_vars: Vec::with_capacity(model.num_vars()),
            pool: Vec::new(),
            stack: Vec::new(),
            incumbent: None,
            next_node_id: ROOT_NODE_ID + 1,
            stats: SearchStats::default(),
            started: Instant::now(),
        }
    }

    fn run<C>(mut self, callback: &mut C) -> MipResult<MipSolution>
    where
        C: LazyConstraintCallback + ?Sized,
    {
        log::debug!(
            "mip: start vars={} constraints={}",
            self.model.num_vars(),
            self.model.num_constraints()
        );

        let root = match self.relaxation().solve() {
            Ok(root) => root,
            Err(minilp::Error::Infeasible) => return Ok(self.finish(MipStatus::Infeasible)),
            Err(minilp::Error::Unbounded) => return Ok(self.finish(MipStatus::Unbounded)),
        };
        log::debug!("mip: root relaxation objective={:.6}", root.objective());

        self.stack.push(OpenNode {
            id: ROOT_NODE_ID,
            depth: 0,
            lp: root,
            cuts_applied: 0,
        });

        let mut limit = None;
        while let Some(node) = self.stack.pop() {
            if self.stats.nodes_explored >= self.settings.max_nodes {
                limit = Some(MipStatus::NodeLimit);
                break;
            }
            if self.time_exceeded() {
                limit = Some(MipStatus::TimeLimit);
                break;
            }

            self.stats.nodes_explored += 1;
            self.process(node, callback)?;

            if self.settings.log_freq > 0
                && self.stats.nodes_explored % self.settings.log_freq == 0
            {
                log::info!(
                    "mip: nodes={} open={} incumbent={} lazy={}",
                    self.stats.nodes_explored,
                    self.stack.len(),
                    self.incumbent_label(),
                    self.stats.lazy_constraints_added
                );
            }
        }

        let status = match limit {
            Some(status) => status,
            None if self.incumbent.is_some() => MipStatus::Optimal,
            None => MipStatus::Infeasible,
        };
        Ok(self.finish(status))
    }

    fn relaxation(&mut self) -> Problem {
        let mut problem = Problem::new(OptimizationDirection::Minimize);
        self.lp_vars = self
            .model
            .vars()
            .iter()
            .map(|var| problem.add_var(var.obj, var.kind.bounds()))
            .collect();
        for constraint in self.model.constraints() {
            let (expr, op, rhs) = self.lp_row(constraint);
            problem.add_constraint(expr, op, rhs);
        }
        problem
    }

    fn lp_row(&self, constraint: &LinearConstraint) -> (LinearExpr, ComparisonOp, f64) {
        let mut expr = LinearExpr::empty();
        for &(var, coeff) in &constraint.terms {
            expr.add(self.lp_vars[var.index()], coeff);
        }
        let op = match constraint.sense {
            Sense::Le => ComparisonOp::Le,
            Sense::Ge => ComparisonOp::Ge,
            Sense::Eq => ComparisonOp::Eq,
        };
        (expr, op, constraint.rhs)
    }

    fn process<C>(&mut self, node: OpenNode, callback: &mut C) -> MipResult<()>
    where
        C: LazyConstraintCallback + ?Sized,
    {
        let OpenNode {
            id,
            depth,
            mut lp,
            mut cuts_applied,
        } = node;

        loop {
            while cuts_applied < self.pool.len() {
                let (expr, op, rhs) = self.lp_row(&self.pool[cuts_applied]);
                lp = match lp.add_constraint(expr, op, rhs) {
                    Ok(lp) => lp,
                    Err(minilp::Error::Infeasible) => {
                        log::trace!("mip: node={id} infeasible after lazy constraints");
                        self.stats.nodes_pruned += 1;
                        return Ok(());
                    }
                    Err(source) => return Err(MipError::Relaxation { node: id, source }),
                };
                cuts_applied += 1;
            }

            let bound = lp.objective();
            if self.is_dominated(bound) {
                log::trace!("mip: node={id} pruned bound={bound:.6}");
                self.stats.nodes_pruned += 1;
                return Ok(());
            }

            let values: Vec<f64> = self.lp_vars.iter().map(|&var| lp[var]).collect();
            if let Some((var, value)) = self.most_fractional(&values) {
                return self.branch(id, depth, lp, cuts_applied, var, value);
            }

            let values = self.snap_binaries(values);
            let objective = self.model.objective_value(&values);
            let cuts = self.run_callback(callback, &values, objective, id)?;
            if cuts.is_empty() {
                self.accept(values, objective, id);
                return Ok(());
            }

            log::debug!(
                "mip: node={id} depth={depth} lazy constraints added={}",
                cuts.len()
            );
            self.stats.lazy_constraints_added += cuts.len() as u64;
            self.pool.extend(cuts);
        }
    }

    fn run_callback<C>(
        &mut self,
        callback: &mut C,
        values: &[f64],
        objective: f64,
        node: u64,
    ) -> MipResult<Vec<LinearConstraint>>
    where
        C: LazyConstraintCallback + ?Sized,
    {
        self.stats.callback_calls += 1;
        let mut ctx = LazyContext::new();
        callback.on_candidate(&Candidate::new(values, objective, node), &mut ctx);

        let mut violated = Vec::with_capacity(ctx.len());
        for constraint in ctx.take() {
            constraint.validate(self.model.num_vars())?;
            if constraint.violation(values) > self.settings.violation_tol {
                violated.push(constraint);
            } else {
                log::warn!("mip: node={node} ignoring lazy constraint not violated by candidate");
            }
        }
        Ok(violated)
    }

    fn branch(
        &mut self,
        parent: u64,
        depth: u32,
        lp: minilp::Solution,
        cuts_applied: usize,
        var: VarId,
        value: f64,
    ) -> MipResult<()> {
        let lp_var = self.lp_vars[var.index()];
        // Pushed last is explored first: follow the rounding direction.
        let order = if value >= 0.5 { [0.0, 1.0] } else { [1.0, 0.0] };
        log::trace!("mip: node={parent} branch on {var}={value:.4}");

        let [first, second] = order;
        for (fixed, base) in [(first, lp.clone()), (second, lp)] {
            match base.fix_var(lp_var, fixed) {
                Ok(child) => {
                    let id = self.next_node_id;
                    self.next_node_id += 1;
                    self.stack.push(OpenNode {
                        id,
                        depth: depth + 1,
                        lp: child,
                        cuts_applied,
                    });
                }
                Err(minilp::Error::Infeasible) => {
                    self.stats.nodes_pruned += 1;
                }
                Err(source) => return Err(MipError::Relaxation { node: parent, source }),
            }
        }
        Ok(())
    }

    /// Binary variable whose value is furthest from integral, ties to the lowest index.
    fn most_fractional(&self, values: &[f64]) -> Option<(VarId, f64)> {
        let mut best: Option<(VarId, f64, f64)> = None;
        for (var, (def, &value)) in self.model.vars().iter().zip(values).enumerate() {
            if !def.kind.is_integral() {
                continue;
            }
            let frac = value - value.floor();
            let distance = frac.min(1.0 - frac);
            if distance <= self.settings.int_feas_tol {
                continue;
            }
            if best.is_none_or(|(_, _, d)| distance > d) {
                best = Some((VarId::from_index(var), value, distance));
            }
        }
        best.map(|(var, value, _)| (var, value))
    }

    fn snap_binaries(&self, mut values: Vec<f64>) -> Vec<f64> {
        for (value, def) in values.iter_mut().zip(self.model.vars()) {
            if def.kind.is_integral() {
                *value = value.round().clamp(0.0, 1.0);
            }
        }
        values
    }

    fn accept(&mut self, values: Vec<f64>, objective: f64, node: u64) {
        if self.is_dominated(objective) {
            return;
        }
        log::debug!("mip: node={node} new incumbent objective={objective:.6}");
        self.stats.incumbent_updates += 1;
        self.incumbent = Some(Incumbent { values, objective });
    }

    fn is_dominated(&self, bound: f64) -> bool {
        self.incumbent
            .as_ref()
            .is_some_and(|inc| bound >= inc.objective - self.settings.abs_gap_tol)
    }

    fn time_exceeded(&self) -> bool {
        self.settings
            .time_limit_ms
            .is_some_and(|limit| self.started.elapsed().as_millis() >= u128::from(limit))
    }

    fn incumbent_label(&self) -> String {
        match &self.incumbent {
            Some(inc) => format!("{:.6}", inc.objective),
            None => "none".to_string(),
        }
    }

    fn finish(self, status: MipStatus) -> MipSolution {
        let mut solution = MipSolution::without_incumbent(status);
        if let Some(inc) = self.incumbent {
            solution.values = inc.values;
            solution.objective = inc.objective;
        }
        solution.nodes_explored = self.stats.nodes_explored;
        solution.lazy_constraints_added = self.stats.lazy_constraints_added;
        solution.callback_calls = self.stats.callback_calls;
        solution.solve_time_ms = self.started.elapsed().as_millis() as u64;

        log::info!(
            "mip: status={status} objective={} nodes={} pruned={} lazy={} callbacks={} incumbents={} time_ms={}",
            if solution.values.is_empty() {
                "none".to_string()
            } else {
                format!("{:.6}", solution.objective)
            },
            solution.nodes_explored,
            self.stats.nodes_pruned,
            solution.lazy_constraints_added,
            solution.callback_calls,
            self.stats.incumbent_updates,
            solution.solve_time_ms
        );
        solution
    }
}
