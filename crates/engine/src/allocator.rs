use std::collections::{HashMap, HashSet};

use crate::model::{Assignment, Person, PersonProductionRole, Role, ScheduleItem};

// ---------------------------------------------------------------------------
// Public allocation entry point
// ---------------------------------------------------------------------------

/// Assigns people to the roles of every scheduled show, balancing load.
///
/// Per production: for each of its roles, collect the people eligible to
/// play it (via `PersonProductionRole::can_play`), sort them by how many
/// assignments they already carry, then distribute `role.required_count`
/// slots across every show of that production in round-robin order,
/// wrapping back to the start of the eligible list when it runs out. People
/// with no eligible role for a show are simply never assigned it; a role
/// with nobody eligible is skipped rather than erroring.
pub fn assign_people_to_roles(
    schedule: &[ScheduleItem],
    people: &[Person],
    roles: &[Role],
    person_production_roles: &[PersonProductionRole],
) -> Vec<Assignment> {
    let mut assignments = Vec::new();

    let mut roles_by_production: HashMap<&str, Vec<&Role>> = HashMap::new();
    for role in roles {
        roles_by_production.entry(role.production_id.as_str()).or_default().push(role);
    }

    let can_play: HashSet<(&str, &str, &str)> = person_production_roles
        .iter()
        .filter(|ppr| ppr.can_play)
        .map(|ppr| (ppr.person_id.as_str(), ppr.production_id.as_str(), ppr.role_id.as_str()))
        .collect();

    let mut assignment_count: HashMap<&str, u32> = HashMap::new();

    // Grouped in first-appearance order rather than a HashMap, so that
    // productions sharing eligible people always get visited in the same
    // order run to run: assignment_count is shared across productions, so
    // visit order affects who ends up with the load.
    let mut production_order: Vec<&str> = Vec::new();
    let mut production_index: HashMap<&str, usize> = HashMap::new();
    let mut items_by_production: Vec<Vec<&ScheduleItem>> = Vec::new();
    for item in schedule {
        let production_id = item.production_id.as_str();
        let idx = *production_index.entry(production_id).or_insert_with(|| {
            production_order.push(production_id);
            items_by_production.push(Vec::new());
            items_by_production.len() - 1
        });
        items_by_production[idx].push(item);
    }

    for (&production_id, items) in production_order.iter().zip(items_by_production.iter()) {
        let Some(prod_roles) = roles_by_production.get(production_id) else {
            continue;
        };

        for role in prod_roles {
            let mut available: Vec<&Person> = people
                .iter()
                .filter(|p| can_play.contains(&(p.id.as_str(), production_id, role.id.as_str())))
                .collect();
            if available.is_empty() {
                continue;
            }
            available.sort_by_key(|p| *assignment_count.get(p.id.as_str()).unwrap_or(&0));

            let mut idx = 0usize;
            for item in items {
                for _ in 0..role.required_count {
                    if idx >= available.len() {
                        idx = 0;
                    }
                    let person = available[idx];
                    assignments.push(Assignment {
                        scenario_id: item.scenario_id.clone(),
                        schedule_item_id: item.item_id(),
                        production_id: item.production_id.clone(),
                        timeslot_id: item.timeslot_id.clone(),
                        stage_id: item.stage_id.clone(),
                        person_id: person.id.clone(),
                        role_id: role.id.clone(),
                        is_conductor: role.is_conductor,
                    });
                    *assignment_count.entry(person.id.as_str()).or_insert(0) += 1;
                    idx += 1;
                }
            }

            available.sort_by_key(|p| *assignment_count.get(p.id.as_str()).unwrap_or(&0));
        }
    }

    assignments
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person(id: &str) -> Person {
        Person {
            id: id.to_string(),
            name: id.to_string(),
            email: None,
        }
    }

    fn role(id: &str, production_id: &str, required_count: u32, is_conductor: bool) -> Role {
        Role {
            id: id.to_string(),
            name: id.to_string(),
            production_id: production_id.to_string(),
            is_conductor,
            required_count,
        }
    }

    fn ppr(person_id: &str, production_id: &str, role_id: &str) -> PersonProductionRole {
        PersonProductionRole {
            person_id: person_id.to_string(),
            production_id: production_id.to_string(),
            role_id: role_id.to_string(),
            can_play: true,
        }
    }

    fn item(production_id: &str, timeslot_id: &str) -> ScheduleItem {
        ScheduleItem {
            scenario_id: "s1".to_string(),
            production_id: production_id.to_string(),
            stage_id: "a".to_string(),
            timeslot_id: timeslot_id.to_string(),
            revenue: 0.0,
        }
    }

    // S6: two equally eligible people split four shows of a single role
    // evenly.
    #[test]
    fn load_is_balanced_across_eligible_people() {
        let schedule = vec![
            item("p1", "t1"),
            item("p1", "t2"),
            item("p1", "t3"),
            item("p1", "t4"),
        ];
        let people = vec![person("alice"), person("bob")];
        let roles = vec![role("prince", "p1", 1, false)];
        let ppr = vec![ppr("alice", "p1", "prince"), ppr("bob", "p1", "prince")];

        let assignments = assign_people_to_roles(&schedule, &people, &roles, &ppr);
        assert_eq!(assignments.len(), 4);

        let mut counts: HashMap<&str, u32> = HashMap::new();
        for a in &assignments {
            *counts.entry(a.person_id.as_str()).or_insert(0) += 1;
        }
        assert_eq!(counts["alice"], 2);
        assert_eq!(counts["bob"], 2);
    }

    #[test]
    fn role_with_no_eligible_person_is_skipped() {
        let schedule = vec![item("p1", "t1")];
        let people = vec![person("alice")];
        let roles = vec![role("prince", "p1", 1, false)];

        let assignments = assign_people_to_roles(&schedule, &people, &roles, &[]);
        assert!(assignments.is_empty());
    }

    #[test]
    fn required_count_above_one_fills_multiple_slots_per_show() {
        let schedule = vec![item("p1", "t1")];
        let people = vec![person("alice"), person("bob"), person("carol")];
        let roles = vec![role("ensemble", "p1", 2, false)];
        let ppr = vec![
            ppr("alice", "p1", "ensemble"),
            ppr("bob", "p1", "ensemble"),
            ppr("carol", "p1", "ensemble"),
        ];

        let assignments = assign_people_to_roles(&schedule, &people, &roles, &ppr);
        assert_eq!(assignments.len(), 2);
        assert_eq!(assignments[0].person_id, "alice");
        assert_eq!(assignments[1].person_id, "bob");
    }

    // Two productions share an eligible person; visiting them in schedule
    // order (not hash order) must give the same assignment every run.
    #[test]
    fn production_visit_order_is_deterministic() {
        let schedule = vec![item("p1", "t1"), item("p2", "t1")];
        let people = vec![person("alice"), person("bob")];
        let roles = vec![role("lead", "p1", 1, false), role("lead", "p2", 1, false)];
        let ppr = vec![
            ppr("alice", "p1", "lead"),
            ppr("bob", "p1", "lead"),
            ppr("alice", "p2", "lead"),
            ppr("bob", "p2", "lead"),
        ];

        let first = assign_people_to_roles(&schedule, &people, &roles, &ppr);
        for _ in 0..20 {
            let again = assign_people_to_roles(&schedule, &people, &roles, &ppr);
            assert_eq!(first, again);
        }
    }

    #[test]
    fn conductor_flag_is_copied_from_role() {
        let schedule = vec![item("p1", "t1")];
        let people = vec![person("alice")];
        let roles = vec![role("conductor", "p1", 1, true)];
        let ppr = vec![ppr("alice", "p1", "conductor")];

        let assignments = assign_people_to_roles(&schedule, &people, &roles, &ppr);
        assert!(assignments[0].is_conductor);
    }
}
