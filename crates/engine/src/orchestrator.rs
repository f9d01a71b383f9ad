//! Scenario orchestrator (C6): scenario lifecycle, solve dispatch, and the
//! CRUD surface over people/roles/person-production-role eligibility.
//! Every mutating operation serializes on the scenario's per-id lock from
//! the store so concurrent requests for the same `scenario_id` cannot
//! interleave a read-modify-write.

use uuid::Uuid;

use crate::calendar;
use crate::dto::{
    ConstraintsIn, GanttTask, GanttView, PersonIn, PersonProductionRoleIn, RoleIn, ScenarioCreateIn,
    ScenarioCreated, ScheduleView, StatusView,
};
use crate::error::OrchestratorError;
use crate::model::{Assignment, Constraints, Person, PersonProductionRole, Role, ScenarioParams, ScenarioStatus};
use crate::store::ScenarioStore;
use crate::{allocator, roles as role_templates, solver};

pub struct Orchestrator<'a> {
    store: &'a dyn ScenarioStore,
}

impl<'a> Orchestrator<'a> {
    pub fn new(store: &'a dyn ScenarioStore) -> Self {
        Self { store }
    }

    pub fn create_scenario(&self, input: ScenarioCreateIn) -> ScenarioCreated {
        let id = Uuid::new_v4().to_string();
        let scenario = build_scenario(id.clone(), input);
        tracing::info!(scenario_id = %id, "scenario created");
        self.store.save_scenario(scenario);
        ScenarioCreated {
            scenario_id: id,
            status: ScenarioStatus::Created,
        }
    }

    /// Validates a scenario's referential integrity without persisting it,
    /// for callers that want to check a payload before committing to it.
    pub fn validate(&self, input: ScenarioCreateIn) -> crate::validator::ValidationResult {
        let scenario = build_scenario(Uuid::new_v4().to_string(), input);
        crate::validator::validate(&scenario)
    }

    /// Solves a scenario, optionally overriding its stored constraints for
    /// this run (and persisting the override), mirroring the original's
    /// solve-request behavior of applying `constraints` before solving.
    pub fn solve(
        &self,
        scenario_id: &str,
        constraints: Option<ConstraintsIn>,
    ) -> Result<StatusView, OrchestratorError> {
        let lock = self.store.lock_for(scenario_id);
        let _guard = lock.lock().expect("scenario lock poisoned");

        let mut scenario = self
            .store
            .get_scenario(scenario_id)
            .ok_or_else(|| OrchestratorError::ScenarioNotFound(scenario_id.to_string()))?;

        if let Some(constraints) = constraints {
            scenario.params.constraints = Constraints::from(constraints);
        }

        scenario.status = ScenarioStatus::Solving;
        self.store.save_scenario(scenario.clone());

        let solve_result = solver::solve(
            scenario_id,
            solver::SolveInput {
                productions: &scenario.productions,
                timeslots: &scenario.timeslots,
                fixed_assignments: &scenario.fixed_assignments,
                params: &scenario.params,
            },
        );

        let output = match solve_result {
            Ok(output) => output,
            Err(e) => {
                scenario.status = ScenarioStatus::Failed;
                self.store.save_scenario(scenario);
                tracing::warn!(scenario_id, error = %e, "solve failed");
                return Err(OrchestratorError::Solve(e));
            }
        };

        let assignments = allocator::assign_people_to_roles(
            &output.schedule,
            &scenario.people,
            &scenario.roles,
            &scenario.person_production_roles,
        );

        scenario.status = if output.status == crate::model::ResultStatus::Infeasible {
            ScenarioStatus::Failed
        } else {
            ScenarioStatus::Solved
        };
        self.store.save_scenario(scenario);

        let result = crate::model::ScenarioResult {
            scenario_id: scenario_id.to_string(),
            schedule: output.schedule,
            objective_value: output.objective_value,
            status: output.status,
            assignments,
        };
        tracing::info!(scenario_id, status = ?result.status, "solve complete");
        self.store.save_result(result.clone());

        Ok(StatusView {
            scenario_id: scenario_id.to_string(),
            status: if result.status == crate::model::ResultStatus::Infeasible {
                ScenarioStatus::Failed
            } else {
                ScenarioStatus::Solved
            },
            objective_value: Some(result.objective_value),
        })
    }

    pub fn get_status(&self, scenario_id: &str) -> Result<StatusView, OrchestratorError> {
        let scenario = self
            .store
            .get_scenario(scenario_id)
            .ok_or_else(|| OrchestratorError::ScenarioNotFound(scenario_id.to_string()))?;
        let objective_value = self.store.get_result(scenario_id).map(|r| r.objective_value);
        Ok(StatusView {
            scenario_id: scenario_id.to_string(),
            status: scenario.status,
            objective_value,
        })
    }

    pub fn get_schedule(&self, scenario_id: &str) -> Result<ScheduleView, OrchestratorError> {
        let result = self
            .store
            .get_result(scenario_id)
            .ok_or_else(|| OrchestratorError::ResultNotFound(scenario_id.to_string()))?;
        Ok(ScheduleView {
            scenario_id: result.scenario_id,
            status: result.status,
            objective_value: result.objective_value,
            schedule: result.schedule,
            assignments: result.assignments,
        })
    }

    pub fn get_gantt(&self, scenario_id: &str) -> Result<GanttView, OrchestratorError> {
        let result = self
            .store
            .get_result(scenario_id)
            .ok_or_else(|| OrchestratorError::ResultNotFound(scenario_id.to_string()))?;
        let scenario = self
            .store
            .get_scenario(scenario_id)
            .ok_or_else(|| OrchestratorError::ScenarioNotFound(scenario_id.to_string()))?;

        let mut tasks = Vec::new();
        for item in &result.schedule {
            let Some(slot) = scenario.timeslots.iter().find(|t| t.id == item.timeslot_id) else {
                continue;
            };
            let Some(start) = calendar::to_moscow_iso(&slot.date, &slot.start_time) else {
                continue;
            };
            let Some(end) = calendar::plus_hours(&start, 3) else {
                continue;
            };
            let resource = scenario
                .stages
                .iter()
                .find(|s| s.id == item.stage_id)
                .map(|s| s.name.clone())
                .unwrap_or_else(|| item.stage_id.clone());
            tasks.push(GanttTask {
                id: item.item_id(),
                resource,
                start,
                end,
                title: item.production_id.clone(),
            });
        }

        Ok(GanttView {
            scenario_id: scenario_id.to_string(),
            status: result.status,
            tasks,
        })
    }

    // -----------------------------------------------------------------
    // People
    // -----------------------------------------------------------------

    pub fn add_person(&self, scenario_id: &str, person: PersonIn) -> Result<(), OrchestratorError> {
        let lock = self.store.lock_for(scenario_id);
        let _guard = lock.lock().expect("scenario lock poisoned");
        let mut scenario = self
            .store
            .get_scenario(scenario_id)
            .ok_or_else(|| OrchestratorError::ScenarioNotFound(scenario_id.to_string()))?;

        if scenario.people.iter().any(|p| p.id == person.id) {
            return Err(OrchestratorError::Conflict("person".to_string(), person.id));
        }
        scenario.people.push(Person::from(person));
        self.store.save_scenario(scenario);
        Ok(())
    }

    pub fn get_people(&self, scenario_id: &str) -> Result<Vec<Person>, OrchestratorError> {
        let scenario = self
            .store
            .get_scenario(scenario_id)
            .ok_or_else(|| OrchestratorError::ScenarioNotFound(scenario_id.to_string()))?;
        Ok(scenario.people)
    }

    pub fn delete_person(&self, scenario_id: &str, person_id: &str) -> Result<(), OrchestratorError> {
        let lock = self.store.lock_for(scenario_id);
        let _guard = lock.lock().expect("scenario lock poisoned");
        let mut scenario = self
            .store
            .get_scenario(scenario_id)
            .ok_or_else(|| OrchestratorError::ScenarioNotFound(scenario_id.to_string()))?;

        scenario.people.retain(|p| p.id != person_id);
        scenario.person_production_roles.retain(|ppr| ppr.person_id != person_id);
        self.store.save_scenario(scenario);
        Ok(())
    }

    // -----------------------------------------------------------------
    // Roles
    // -----------------------------------------------------------------

    pub fn add_role(&self, scenario_id: &str, role: RoleIn) -> Result<(), OrchestratorError> {
        let lock = self.store.lock_for(scenario_id);
        let _guard = lock.lock().expect("scenario lock poisoned");
        let mut scenario = self
            .store
            .get_scenario(scenario_id)
            .ok_or_else(|| OrchestratorError::ScenarioNotFound(scenario_id.to_string()))?;

        if !scenario.productions.iter().any(|p| p.id == role.production_id) {
            return Err(OrchestratorError::BadRequest(format!(
                "production '{}' not found",
                role.production_id
            )));
        }
        if scenario.roles.iter().any(|r| r.id == role.id) {
            return Err(OrchestratorError::Conflict("role".to_string(), role.id));
        }
        scenario.roles.push(Role::from(role));
        self.store.save_scenario(scenario);
        Ok(())
    }

    pub fn get_roles(&self, scenario_id: &str, production_id: Option<&str>) -> Result<Vec<Role>, OrchestratorError> {
        let scenario = self
            .store
            .get_scenario(scenario_id)
            .ok_or_else(|| OrchestratorError::ScenarioNotFound(scenario_id.to_string()))?;
        Ok(scenario
            .roles
            .into_iter()
            .filter(|r| production_id.is_none_or(|pid| r.production_id == pid))
            .collect())
    }

    pub fn delete_role(&self, scenario_id: &str, role_id: &str) -> Result<(), OrchestratorError> {
        let lock = self.store.lock_for(scenario_id);
        let _guard = lock.lock().expect("scenario lock poisoned");
        let mut scenario = self
            .store
            .get_scenario(scenario_id)
            .ok_or_else(|| OrchestratorError::ScenarioNotFound(scenario_id.to_string()))?;

        scenario.roles.retain(|r| r.id != role_id);
        scenario.person_production_roles.retain(|ppr| ppr.role_id != role_id);
        self.store.save_scenario(scenario);
        Ok(())
    }

    pub fn auto_generate_roles(&self, scenario_id: &str) -> Result<Vec<Role>, OrchestratorError> {
        let lock = self.store.lock_for(scenario_id);
        let _guard = lock.lock().expect("scenario lock poisoned");
        let mut scenario = self
            .store
            .get_scenario(scenario_id)
            .ok_or_else(|| OrchestratorError::ScenarioNotFound(scenario_id.to_string()))?;

        let mut generated = Vec::new();
        for production in scenario.productions.clone() {
            for role in role_templates::generate_roles_for_production(&production) {
                if !scenario.roles.iter().any(|r| r.id == role.id) {
                    scenario.roles.push(role.clone());
                    generated.push(role);
                }
            }
        }
        self.store.save_scenario(scenario);
        Ok(generated)
    }

    // -----------------------------------------------------------------
    // Person-production-role eligibility
    // -----------------------------------------------------------------

    pub fn set_person_production_role(
        &self,
        scenario_id: &str,
        ppr: PersonProductionRoleIn,
    ) -> Result<(), OrchestratorError> {
        let lock = self.store.lock_for(scenario_id);
        let _guard = lock.lock().expect("scenario lock poisoned");
        let mut scenario = self
            .store
            .get_scenario(scenario_id)
            .ok_or_else(|| OrchestratorError::ScenarioNotFound(scenario_id.to_string()))?;

        if !scenario.people.iter().any(|p| p.id == ppr.person_id) {
            return Err(OrchestratorError::PersonNotFound(ppr.person_id));
        }
        if !scenario.productions.iter().any(|p| p.id == ppr.production_id) {
            return Err(OrchestratorError::BadRequest(format!("production '{}' not found", ppr.production_id)));
        }
        if !scenario.roles.iter().any(|r| r.id == ppr.role_id) {
            return Err(OrchestratorError::RoleNotFound(ppr.role_id));
        }

        scenario.person_production_roles.retain(|existing| {
            !(existing.person_id == ppr.person_id
                && existing.production_id == ppr.production_id
                && existing.role_id == ppr.role_id)
        });
        scenario.person_production_roles.push(PersonProductionRole::from(ppr));
        self.store.save_scenario(scenario);
        Ok(())
    }

    pub fn get_person_production_roles(
        &self,
        scenario_id: &str,
    ) -> Result<Vec<PersonProductionRole>, OrchestratorError> {
        let scenario = self
            .store
            .get_scenario(scenario_id)
            .ok_or_else(|| OrchestratorError::ScenarioNotFound(scenario_id.to_string()))?;
        Ok(scenario.person_production_roles)
    }

    // -----------------------------------------------------------------
    // Assignments
    // -----------------------------------------------------------------

    pub fn get_assignments(&self, scenario_id: &str) -> Result<Vec<Assignment>, OrchestratorError> {
        let result = self
            .store
            .get_result(scenario_id)
            .ok_or_else(|| OrchestratorError::ResultNotFound(scenario_id.to_string()))?;
        Ok(result.assignments)
    }

    /// Manually overrides (or creates) one assignment. Matches an existing
    /// assignment by `(schedule_item_id, role_id)`; if none exists, a new
    /// one is created, provided the schedule item and role both exist.
    pub fn update_assignment(
        &self,
        scenario_id: &str,
        schedule_item_id: &str,
        person_id: &str,
        role_id: &str,
    ) -> Result<(), OrchestratorError> {
        let lock = self.store.lock_for(scenario_id);
        let _guard = lock.lock().expect("scenario lock poisoned");

        let mut result = self
            .store
            .get_result(scenario_id)
            .ok_or_else(|| OrchestratorError::ResultNotFound(scenario_id.to_string()))?;
        let scenario = self
            .store
            .get_scenario(scenario_id)
            .ok_or_else(|| OrchestratorError::ScenarioNotFound(scenario_id.to_string()))?;

        if let Some(existing) = result
            .assignments
            .iter_mut()
            .find(|a| a.schedule_item_id == schedule_item_id && a.role_id == role_id)
        {
            existing.person_id = person_id.to_string();
            self.store.save_result(result);
            return Ok(());
        }

        let schedule_item = scenario
            .roles
            .iter()
            .find(|r| r.id == role_id)
            .and_then(|role| {
                result
                    .schedule
                    .iter()
                    .find(|it| it.item_id() == schedule_item_id)
                    .map(|it| (it.clone(), role.clone()))
            });
        let Some((item, role)) = schedule_item else {
            return Err(OrchestratorError::BadRequest(
                "schedule item or role not found".to_string(),
            ));
        };

        result.assignments.push(Assignment {
            scenario_id: scenario_id.to_string(),
            schedule_item_id: schedule_item_id.to_string(),
            production_id: item.production_id,
            timeslot_id: item.timeslot_id,
            stage_id: item.stage_id,
            person_id: person_id.to_string(),
            role_id: role_id.to_string(),
            is_conductor: role.is_conductor,
        });
        self.store.save_result(result);
        Ok(())
    }
}

fn build_scenario(id: String, input: ScenarioCreateIn) -> crate::model::Scenario {
    crate::model::Scenario {
        id,
        productions: input.productions.into_iter().map(Into::into).collect(),
        stages: input.stages.into_iter().map(Into::into).collect(),
        timeslots: input.timeslots.into_iter().map(Into::into).collect(),
        revenue: input.revenue,
        params: input.params.map(ScenarioParams::from).unwrap_or_default(),
        fixed_assignments: input
            .fixed_assignments
            .into_iter()
            .map(|fa| crate::model::FixedAssignment {
                production_id: fa.production_id,
                timeslot_id: fa.timeslot_id,
                stage_id: fa.stage_id,
                date: fa.date,
                start_time: fa.start_time,
            })
            .collect(),
        status: ScenarioStatus::Created,
        people: input.people.into_iter().map(Into::into).collect(),
        roles: input.roles.into_iter().map(Into::into).collect(),
        person_production_roles: input.person_production_roles.into_iter().map(Into::into).collect(),
    }
}
