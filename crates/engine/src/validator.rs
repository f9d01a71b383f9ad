use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::model::Scenario;

// ---------------------------------------------------------------------------
// Validation result types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct ValidationResult {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Validate implementation
// ---------------------------------------------------------------------------

/// Validate a scenario's referential integrity, returning errors (block
/// solving) and warnings (advisory). Errors are listed before warnings.
pub fn validate(scenario: &Scenario) -> ValidationResult {
    let mut errors: Vec<String> = Vec::new();
    let mut warnings: Vec<String> = Vec::new();

    let stage_ids: HashSet<&str> = scenario.stages.iter().map(|s| s.id.as_str()).collect();
    let production_ids: HashSet<&str> = scenario.productions.iter().map(|p| p.id.as_str()).collect();
    let timeslot_ids: HashSet<&str> = scenario.timeslots.iter().map(|t| t.id.as_str()).collect();
    let role_ids: HashSet<&str> = scenario.roles.iter().map(|r| r.id.as_str()).collect();
    let person_ids: HashSet<&str> = scenario.people.iter().map(|p| p.id.as_str()).collect();

    // -----------------------------------------------------------------------
    // Error: duplicate IDs
    // -----------------------------------------------------------------------
    check_duplicates(scenario.stages.iter().map(|s| s.id.as_str()), "stage", &mut errors);
    check_duplicates(scenario.productions.iter().map(|p| p.id.as_str()), "production", &mut errors);
    check_duplicates(scenario.timeslots.iter().map(|t| t.id.as_str()), "timeslot", &mut errors);
    check_duplicates(scenario.roles.iter().map(|r| r.id.as_str()), "role", &mut errors);
    check_duplicates(scenario.people.iter().map(|p| p.id.as_str()), "person", &mut errors);

    // -----------------------------------------------------------------------
    // Error: dangling stage references
    // -----------------------------------------------------------------------
    for p in &scenario.productions {
        if !stage_ids.contains(p.stage_id.as_str()) {
            errors.push(format!("production '{}' references unknown stage '{}'", p.id, p.stage_id));
        }
    }
    for t in &scenario.timeslots {
        if !stage_ids.contains(t.stage_id.as_str()) {
            errors.push(format!("timeslot '{}' references unknown stage '{}'", t.id, t.stage_id));
        }
    }

    // -----------------------------------------------------------------------
    // Error: dangling production/timeslot references
    // -----------------------------------------------------------------------
    for fa in &scenario.fixed_assignments {
        if !production_ids.contains(fa.production_id.as_str()) {
            errors.push(format!("fixed assignment references unknown production '{}'", fa.production_id));
        }
        if !timeslot_ids.contains(fa.timeslot_id.as_str()) {
            errors.push(format!("fixed assignment references unknown timeslot '{}'", fa.timeslot_id));
        }
    }
    for r in &scenario.roles {
        if !production_ids.contains(r.production_id.as_str()) {
            errors.push(format!("role '{}' references unknown production '{}'", r.id, r.production_id));
        }
    }
    for ppr in &scenario.person_production_roles {
        if !person_ids.contains(ppr.person_id.as_str()) {
            errors.push(format!("person-production-role references unknown person '{}'", ppr.person_id));
        }
        if !production_ids.contains(ppr.production_id.as_str()) {
            errors.push(format!(
                "person-production-role references unknown production '{}'",
                ppr.production_id
            ));
        }
        if !role_ids.contains(ppr.role_id.as_str()) {
            errors.push(format!("person-production-role references unknown role '{}'", ppr.role_id));
        }
    }

    // -----------------------------------------------------------------------
    // Error: non-positive show counts
    // -----------------------------------------------------------------------
    for p in &scenario.productions {
        if p.max_shows == 0 {
            errors.push(format!("production '{}' has max_shows of 0 -- every production needs at least one show", p.id));
        }
    }

    // -----------------------------------------------------------------------
    // Warnings
    // -----------------------------------------------------------------------
    if scenario.timeslots.is_empty() {
        warnings.push("no timeslots defined -- solving will trivially fail every production".to_string());
    }

    for p in &scenario.productions {
        let candidate_slots = scenario.timeslots.iter().filter(|t| t.stage_id == p.stage_id).count();
        if candidate_slots < p.max_shows as usize {
            warnings.push(format!(
                "production '{}' requires {} show(s) but its stage only has {} candidate timeslot(s)",
                p.id, p.max_shows, candidate_slots
            ));
        }
    }

    let roles_by_production: HashMap<&str, Vec<&str>> =
        scenario.roles.iter().fold(HashMap::new(), |mut acc, r| {
            acc.entry(r.production_id.as_str()).or_default().push(r.id.as_str());
            acc
        });
    for p in &scenario.productions {
        if !roles_by_production.contains_key(p.id.as_str()) {
            warnings.push(format!("production '{}' has no roles defined -- it will go unstaffed", p.id));
        }
    }

    ValidationResult { errors, warnings }
}

fn check_duplicates<'a>(ids: impl Iterator<Item = &'a str>, kind: &str, errors: &mut Vec<String>) {
    let mut seen: HashSet<&str> = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            errors.push(format!("duplicate {} ID '{}' -- each {} must have a unique ID", kind, id, kind));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Production, ScenarioParams, ScenarioStatus, Stage, Timeslot};

    fn empty_scenario() -> Scenario {
        Scenario {
            id: "s1".to_string(),
            productions: vec![],
            stages: vec![],
            timeslots: vec![],
            revenue: Default::default(),
            params: ScenarioParams::default(),
            fixed_assignments: vec![],
            status: ScenarioStatus::Created,
            people: vec![],
            roles: vec![],
            person_production_roles: vec![],
        }
    }

    #[test]
    fn dangling_stage_reference_is_an_error() {
        let mut scenario = empty_scenario();
        scenario.productions.push(Production {
            id: "p1".to_string(),
            title: "p1".to_string(),
            stage_id: "missing".to_string(),
            max_shows: 1,
            weekend_priority: false,
        });

        let result = validate(&scenario);
        assert!(!result.is_ok());
        assert!(result.errors.iter().any(|e| e.contains("unknown stage")));
    }

    #[test]
    fn zero_max_shows_is_an_error() {
        let mut scenario = empty_scenario();
        scenario.stages.push(Stage { id: "a".to_string(), name: "a".to_string() });
        scenario.productions.push(Production {
            id: "p1".to_string(),
            title: "p1".to_string(),
            stage_id: "a".to_string(),
            max_shows: 0,
            weekend_priority: false,
        });

        let result = validate(&scenario);
        assert!(!result.is_ok());
    }

    #[test]
    fn valid_scenario_with_enough_slots_has_no_warnings_about_capacity() {
        let mut scenario = empty_scenario();
        scenario.stages.push(Stage { id: "a".to_string(), name: "a".to_string() });
        scenario.productions.push(Production {
            id: "p1".to_string(),
            title: "p1".to_string(),
            stage_id: "a".to_string(),
            max_shows: 1,
            weekend_priority: false,
        });
        scenario.timeslots.push(Timeslot {
            id: "t1".to_string(),
            stage_id: "a".to_string(),
            date: "2025-11-01".to_string(),
            day_of_week: 5,
            start_time: "19:00".to_string(),
        });

        let result = validate(&scenario);
        assert!(result.is_ok());
        assert!(!result.warnings.iter().any(|w| w.contains("candidate timeslot")));
    }
}
