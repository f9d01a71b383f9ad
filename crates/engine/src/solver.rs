//! Schedule solver (C4): builds a boolean ILP model from a `Scenario`,
//! hands it to the `good_lp`/`microlp` backend, and reads the schedule back.
//!
//! This is the hard core. Everything else in this crate is CRUD glue around
//! it.

use std::collections::HashMap;

use good_lp::{variable, Constraint, Expression, ProblemVariables, Solution, SolutionStatus, SolverModel, Variable, WithTimeLimit};

use crate::error::SolveError;
use crate::model::{FixedAssignment, Production, ResultStatus, ScenarioParams, ScheduleItem, Timeslot};

const WEIGHT_WEEKEND_PRIORITY: f64 = 100.0;
const WEIGHT_WEEKEND_EMPTY_PENALTY: f64 = 1.0;
const WEIGHT_ADJACENCY_PENALTY: f64 = 50.0;

/// Everything the solver needs besides a scenario id.
pub struct SolveInput<'a> {
    pub productions: &'a [Production],
    pub timeslots: &'a [Timeslot],
    pub fixed_assignments: &'a [FixedAssignment],
    pub params: &'a ScenarioParams,
}

#[derive(Debug)]
pub struct SolveOutput {
    pub schedule: Vec<ScheduleItem>,
    pub objective_value: f64,
    pub status: ResultStatus,
}

/// Builds and solves the boolean ILP model choosing which production plays
/// each stage/timeslot, subject to the scenario's constraints.
pub fn solve(scenario_id: &str, input: SolveInput) -> Result<SolveOutput, SolveError> {
    let SolveInput {
        productions,
        timeslots,
        fixed_assignments,
        params,
    } = input;
    let constraints = &params.constraints;

    let mut vars = ProblemVariables::new();
    let mut model_constraints: Vec<Constraint> = Vec::new();
    let mut objective = Expression::from(0.0);

    // ------------------------------------------------------------------
    // Decision variables: x[p, t] for every (production, timeslot) pair on
    // a matching stage. Cross-stage pairs never get a variable.
    // ------------------------------------------------------------------
    let mut x: HashMap<(String, String), Variable> = HashMap::new();
    for p in productions {
        for t in timeslots {
            if p.stage_id == t.stage_id {
                x.insert((p.id.clone(), t.id.clone()), vars.add(variable().binary()));
            }
        }
    }

    // ------------------------------------------------------------------
    // Hard constraint: fixed pins.
    // ------------------------------------------------------------------
    for fa in fixed_assignments {
        match x.get(&(fa.production_id.clone(), fa.timeslot_id.clone())) {
            Some(&var) => model_constraints.push(Expression::from(var).eq(1.0)),
            None => {
                return Err(SolveError::InconsistentInput {
                    production_id: fa.production_id.clone(),
                    timeslot_id: fa.timeslot_id.clone(),
                })
            }
        }
    }

    // ------------------------------------------------------------------
    // Hard constraint: slot uniqueness. Always enforced, regardless of the
    // `one_production_per_timeslot` flag.
    // ------------------------------------------------------------------
    for t in timeslots {
        let slot_vars: Vec<Variable> = productions
            .iter()
            .filter(|p| p.stage_id == t.stage_id)
            .filter_map(|p| x.get(&(p.id.clone(), t.id.clone())).copied())
            .collect();
        if !slot_vars.is_empty() {
            let sum: Expression = slot_vars.into_iter().sum();
            model_constraints.push(sum.leq(1.0));
        }
    }

    // ------------------------------------------------------------------
    // Hard constraint: exact show count. Always enforced, regardless of the
    // `exact_shows_count` flag.
    // ------------------------------------------------------------------
    for p in productions {
        let prod_vars: Vec<Variable> = timeslots
            .iter()
            .filter(|t| t.stage_id == p.stage_id)
            .filter_map(|t| x.get(&(p.id.clone(), t.id.clone())).copied())
            .collect();
        if prod_vars.is_empty() {
            if p.max_shows >= 1 {
                return Err(SolveError::NoCandidateSlots(p.id.clone(), p.max_shows));
            }
            continue;
        }
        let sum: Expression = prod_vars.into_iter().sum();
        model_constraints.push(sum.eq(f64::from(p.max_shows)));
    }

    // ------------------------------------------------------------------
    // Hard constraint: Monday off.
    // ------------------------------------------------------------------
    if constraints.monday_off {
        for t in timeslots.iter().filter(|t| t.is_monday()) {
            for p in productions.iter().filter(|p| p.stage_id == t.stage_id) {
                if let Some(&var) = x.get(&(p.id.clone(), t.id.clone())) {
                    model_constraints.push(Expression::from(var).eq(0.0));
                }
            }
        }
    }

    // ------------------------------------------------------------------
    // Hard constraint: consecutive shows.
    // ------------------------------------------------------------------
    if constraints.consecutive_shows {
        for p in productions.iter().filter(|p| p.max_shows >= 2) {
            let mut slots: Vec<&Timeslot> = timeslots.iter().filter(|t| t.stage_id == p.stage_id).collect();
            slots.sort_by(|a, b| (&a.date, &a.start_time).cmp(&(&b.date, &b.start_time)));

            let run = p.max_shows as usize;
            if slots.len() < run {
                continue;
            }
            let mut start_vars: Vec<Variable> = Vec::new();
            for i in 0..=(slots.len() - run) {
                let start_var = vars.add(variable().binary());
                start_vars.push(start_var);
                for slot in &slots[i..i + run] {
                    if let Some(&var) = x.get(&(p.id.clone(), slot.id.clone())) {
                        model_constraints.push((Expression::from(var) - start_var).geq(0.0));
                    }
                }
            }
            let sum: Expression = start_vars.into_iter().sum();
            model_constraints.push(sum.eq(1.0));
        }
    }

    // ------------------------------------------------------------------
    // Soft term: weekend priority bonus.
    // ------------------------------------------------------------------
    if constraints.weekend_priority_bonus {
        for p in productions.iter().filter(|p| p.weekend_priority) {
            let weekend_vars: Vec<Variable> = timeslots
                .iter()
                .filter(|t| t.stage_id == p.stage_id && t.is_weekend())
                .filter_map(|t| x.get(&(p.id.clone(), t.id.clone())).copied())
                .collect();
            if !weekend_vars.is_empty() {
                let sum: Expression = weekend_vars.into_iter().sum();
                objective += WEIGHT_WEEKEND_PRIORITY * sum;
            }
        }
    }

    // ------------------------------------------------------------------
    // Soft term: weekend empty-slot penalty.
    // `1 - sum(x)` is already integral because slot uniqueness bounds the
    // sum at <= 1, so no auxiliary indicator variable is needed.
    // ------------------------------------------------------------------
    if constraints.weekend_always_show {
        for t in timeslots.iter().filter(|t| t.is_weekend()) {
            let slot_vars: Vec<Variable> = productions
                .iter()
                .filter(|p| p.stage_id == t.stage_id)
                .filter_map(|p| x.get(&(p.id.clone(), t.id.clone())).copied())
                .collect();
            if !slot_vars.is_empty() {
                let sum: Expression = slot_vars.into_iter().sum();
                objective += -WEIGHT_WEEKEND_EMPTY_PENALTY * (Expression::from(1.0) - sum);
            }
        }
    }

    // ------------------------------------------------------------------
    // Soft term: adjacency penalty (no break between different shows).
    // ------------------------------------------------------------------
    if constraints.break_between_different_shows {
        let mut slots: Vec<&Timeslot> = timeslots.iter().collect();
        slots.sort_by(|a, b| (&a.stage_id, &a.date, &a.start_time).cmp(&(&b.stage_id, &b.date, &b.start_time)));

        for window in slots.windows(2) {
            let (t1, t2) = (window[0], window[1]);
            if t1.stage_id != t2.stage_id {
                continue;
            }
            let a_vars: Vec<Variable> = productions
                .iter()
                .filter(|p| p.stage_id == t1.stage_id)
                .filter_map(|p| x.get(&(p.id.clone(), t1.id.clone())).copied())
                .collect();
            let b_vars: Vec<Variable> = productions
                .iter()
                .filter(|p| p.stage_id == t2.stage_id)
                .filter_map(|p| x.get(&(p.id.clone(), t2.id.clone())).copied())
                .collect();
            if a_vars.is_empty() || b_vars.is_empty() {
                continue;
            }
            let a_sum: Expression = a_vars.iter().copied().sum();
            let b_sum: Expression = b_vars.iter().copied().sum();

            // both_assigned = AND(A==1, B==1). Continuous in [0,1] but forced
            // to an exact 0/1 value because A and B are themselves integral.
            let both_assigned = vars.add(variable().min(0.0).max(1.0));
            model_constraints.push((Expression::from(both_assigned) - a_sum.clone()).leq(0.0));
            model_constraints.push((Expression::from(both_assigned) - b_sum.clone()).leq(0.0));
            model_constraints
                .push((Expression::from(both_assigned) - a_sum.clone() - b_sum.clone() + 1.0).geq(0.0));

            // same_production = sum_p AND(x[p,t1]==1, x[p,t2]==1).
            let mut same_terms: Vec<Variable> = Vec::new();
            for p in productions.iter().filter(|p| p.stage_id == t1.stage_id) {
                let v1 = x.get(&(p.id.clone(), t1.id.clone())).copied();
                let v2 = x.get(&(p.id.clone(), t2.id.clone())).copied();
                if let (Some(v1), Some(v2)) = (v1, v2) {
                    let y = vars.add(variable().min(0.0).max(1.0));
                    model_constraints.push((Expression::from(y) - Expression::from(v1)).leq(0.0));
                    model_constraints.push((Expression::from(y) - Expression::from(v2)).leq(0.0));
                    model_constraints
                        .push((Expression::from(y) - Expression::from(v1) - Expression::from(v2) + 1.0).geq(0.0));
                    same_terms.push(y);
                }
            }
            let same_sum: Expression = same_terms.into_iter().sum();
            objective += -WEIGHT_ADJACENCY_PENALTY * (Expression::from(both_assigned) - same_sum);
        }
    }

    // ------------------------------------------------------------------
    // Solve.
    // ------------------------------------------------------------------
    let time_limit = params.time_limit_seconds.max(1.0);
    let mut model = vars.maximise(objective.clone()).using(good_lp::microlp).with_time_limit(time_limit);
    for c in model_constraints {
        model.add_constraint(c);
    }

    let solution = match model.solve() {
        Ok(solution) => solution,
        Err(good_lp::ResolutionError::Infeasible) | Err(good_lp::ResolutionError::Unbounded) => {
            return Ok(SolveOutput {
                schedule: Vec::new(),
                objective_value: 0.0,
                status: ResultStatus::Infeasible,
            });
        }
        Err(other) => return Err(SolveError::Internal(other.to_string())),
    };

    let status = match solution.status() {
        SolutionStatus::Optimal => ResultStatus::Optimal,
        SolutionStatus::TimeLimit | SolutionStatus::GapLimit => ResultStatus::Feasible,
    };

    let mut schedule = Vec::new();
    for p in productions {
        for t in timeslots {
            if p.stage_id != t.stage_id {
                continue;
            }
            if let Some(&var) = x.get(&(p.id.clone(), t.id.clone())) {
                if solution.value(var) > 0.5 {
                    schedule.push(ScheduleItem {
                        scenario_id: scenario_id.to_string(),
                        production_id: p.id.clone(),
                        stage_id: t.stage_id.clone(),
                        timeslot_id: t.id.clone(),
                        revenue: 0.0,
                    });
                }
            }
        }
    }
    schedule.sort_by(|a, b| {
        (&a.timeslot_id, &a.stage_id, &a.production_id).cmp(&(&b.timeslot_id, &b.stage_id, &b.production_id))
    });

    let objective_value = solution.eval(&objective);

    Ok(SolveOutput {
        schedule,
        objective_value,
        status,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Constraints, FixedAssignment, Production, ScenarioParams, Timeslot};

    fn params(constraints: Constraints) -> ScenarioParams {
        ScenarioParams {
            objective_weights: Default::default(),
            time_limit_seconds: 5.0,
            constraints,
        }
    }

    fn slot(id: &str, stage: &str, date: &str, dow: u8, time: &str) -> Timeslot {
        Timeslot {
            id: id.to_string(),
            stage_id: stage.to_string(),
            date: date.to_string(),
            day_of_week: dow,
            start_time: time.to_string(),
        }
    }

    fn production(id: &str, stage: &str, max_shows: u32, weekend_priority: bool) -> Production {
        Production {
            id: id.to_string(),
            title: id.to_string(),
            stage_id: stage.to_string(),
            max_shows,
            weekend_priority,
        }
    }

    // S1: minimal feasible schedule.
    #[test]
    fn minimal_feasible_schedule() {
        let productions = vec![production("p1", "a", 1, false)];
        let timeslots = vec![
            slot("t1", "a", "2025-11-04", 1, "19:00"),
            slot("t2", "a", "2025-11-05", 2, "19:00"),
        ];
        let out = solve(
            "s1",
            SolveInput {
                productions: &productions,
                timeslots: &timeslots,
                fixed_assignments: &[],
                params: &params(Constraints::default()),
            },
        )
        .unwrap();
        assert_eq!(out.schedule.len(), 1);
        assert_eq!(out.status, ResultStatus::Optimal);
    }

    // S2: Monday off leaves exactly the Tuesday slot.
    #[test]
    fn monday_off_picks_tuesday() {
        let productions = vec![production("p1", "a", 1, false)];
        let timeslots = vec![
            slot("mon", "a", "2025-11-03", 0, "19:00"),
            slot("tue", "a", "2025-11-04", 1, "19:00"),
        ];
        let out = solve(
            "s1",
            SolveInput {
                productions: &productions,
                timeslots: &timeslots,
                fixed_assignments: &[],
                params: &params(Constraints::default()),
            },
        )
        .unwrap();
        assert_eq!(out.schedule.len(), 1);
        assert_eq!(out.schedule[0].timeslot_id, "tue");
        assert_eq!(out.objective_value, 0.0);
    }

    // S3: three consecutive slots are picked out of five weekday slots.
    #[test]
    fn consecutive_shows_form_a_contiguous_run() {
        let constraints = Constraints {
            monday_off: false,
            break_between_different_shows: false,
            weekend_always_show: false,
            weekend_priority_bonus: false,
            ..Constraints::default()
        };

        let productions = vec![production("p1", "a", 3, false)];
        let timeslots = vec![
            slot("mon", "a", "2025-11-03", 0, "19:00"),
            slot("tue", "a", "2025-11-04", 1, "19:00"),
            slot("wed", "a", "2025-11-05", 2, "19:00"),
            slot("thu", "a", "2025-11-06", 3, "19:00"),
            slot("fri", "a", "2025-11-07", 4, "19:00"),
        ];
        let out = solve(
            "s1",
            SolveInput {
                productions: &productions,
                timeslots: &timeslots,
                fixed_assignments: &[],
                params: &params(constraints),
            },
        )
        .unwrap();
        assert_eq!(out.schedule.len(), 3);
        let mut idxs: Vec<usize> = out
            .schedule
            .iter()
            .map(|it| timeslots.iter().position(|t| t.id == it.timeslot_id).unwrap())
            .collect();
        idxs.sort();
        assert_eq!(idxs, vec![idxs[0], idxs[0] + 1, idxs[0] + 2]);
    }

    // S4: the weekend-priority production claims the weekend slots.
    #[test]
    fn weekend_priority_wins_weekend_slots() {
        let productions = vec![production("x", "a", 2, true), production("y", "a", 2, false)];
        let timeslots = vec![
            slot("sat1", "a", "2025-11-01", 5, "19:00"),
            slot("sun1", "a", "2025-11-02", 6, "19:00"),
            slot("sat2", "a", "2025-11-08", 5, "19:00"),
            slot("sun2", "a", "2025-11-09", 6, "19:00"),
        ];
        let constraints = Constraints {
            consecutive_shows: false,
            ..Constraints::default()
        };
        let out = solve(
            "s1",
            SolveInput {
                productions: &productions,
                timeslots: &timeslots,
                fixed_assignments: &[],
                params: &params(constraints),
            },
        )
        .unwrap();
        let x_count = out.schedule.iter().filter(|it| it.production_id == "x").count();
        assert_eq!(x_count, 2);
    }

    // S5: a fixed pin for Y wins its slot even though X wants it too.
    #[test]
    fn fixed_pin_overrides_weekend_priority() {
        let productions = vec![production("x", "a", 2, true), production("y", "a", 2, false)];
        let timeslots = vec![
            slot("sat1", "a", "2025-11-01", 5, "19:00"),
            slot("sun1", "a", "2025-11-02", 6, "19:00"),
            slot("sat2", "a", "2025-11-08", 5, "19:00"),
            slot("sun2", "a", "2025-11-09", 6, "19:00"),
        ];
        let fixed = vec![FixedAssignment {
            production_id: "y".to_string(),
            timeslot_id: "sat1".to_string(),
            stage_id: "a".to_string(),
            date: "2025-11-01".to_string(),
            start_time: "19:00".to_string(),
        }];
        let constraints = Constraints {
            consecutive_shows: false,
            ..Constraints::default()
        };
        let out = solve(
            "s1",
            SolveInput {
                productions: &productions,
                timeslots: &timeslots,
                fixed_assignments: &fixed,
                params: &params(constraints),
            },
        )
        .unwrap();
        let sat1 = out.schedule.iter().find(|it| it.timeslot_id == "sat1").unwrap();
        assert_eq!(sat1.production_id, "y");
    }

    #[test]
    fn pin_on_cross_stage_pair_is_inconsistent() {
        let productions = vec![production("p1", "a", 1, false)];
        let timeslots = vec![slot("t1", "b", "2025-11-04", 1, "19:00")];
        let fixed = vec![FixedAssignment {
            production_id: "p1".to_string(),
            timeslot_id: "t1".to_string(),
            stage_id: "b".to_string(),
            date: "2025-11-04".to_string(),
            start_time: "19:00".to_string(),
        }];
        let err = solve(
            "s1",
            SolveInput {
                productions: &productions,
                timeslots: &timeslots,
                fixed_assignments: &fixed,
                params: &params(Constraints::default()),
            },
        )
        .unwrap_err();
        assert!(matches!(err, SolveError::InconsistentInput { .. }));
    }

    #[test]
    fn zero_candidate_slots_is_inconsistent() {
        let productions = vec![production("p1", "a", 1, false)];
        let timeslots = vec![slot("t1", "b", "2025-11-04", 1, "19:00")];
        let err = solve(
            "s1",
            SolveInput {
                productions: &productions,
                timeslots: &timeslots,
                fixed_assignments: &[],
                params: &params(Constraints::default()),
            },
        )
        .unwrap_err();
        assert!(matches!(err, SolveError::NoCandidateSlots(_, _)));
    }

    #[test]
    fn schedule_is_sorted_by_timeslot_stage_production() {
        let productions = vec![production("p1", "a", 2, false)];
        let timeslots = vec![
            slot("t2", "a", "2025-11-05", 2, "19:00"),
            slot("t1", "a", "2025-11-04", 1, "19:00"),
        ];
        let constraints = Constraints {
            consecutive_shows: false,
            ..Constraints::default()
        };
        let out = solve(
            "s1",
            SolveInput {
                productions: &productions,
                timeslots: &timeslots,
                fixed_assignments: &[],
                params: &params(constraints),
            },
        )
        .unwrap();
        let ids: Vec<&str> = out.schedule.iter().map(|it| it.timeslot_id.as_str()).collect();
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted);
    }
}
