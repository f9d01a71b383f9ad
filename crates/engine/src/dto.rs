//! Transport DTOs (C7, ambient): the loosely-typed shapes a caller sends
//! over the wire, plus the view shapes returned for read endpoints. Kept
//! separate from the domain model in `model` so that defaulting/validation
//! at the boundary never leaks into the solver's own types.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::model::{
    Assignment, Constraints, Person, PersonProductionRole, Production, Role, ScenarioParams,
    ScenarioStatus, ScheduleItem, Stage, Timeslot,
};

fn default_true() -> bool {
    true
}

fn default_max_shows() -> u32 {
    1
}

fn default_time_limit() -> f64 {
    7.0
}

fn default_start_time() -> String {
    "19:00".to_string()
}

fn default_required_count() -> u32 {
    1
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductionIn {
    pub id: String,
    pub title: Option<String>,
    pub stage_id: String,
    #[serde(default = "default_max_shows")]
    pub max_shows: u32,
    #[serde(default)]
    pub weekend_priority: bool,
}

impl From<ProductionIn> for Production {
    fn from(p: ProductionIn) -> Self {
        Production {
            title: p.title.unwrap_or_else(|| p.id.clone()),
            id: p.id,
            stage_id: p.stage_id,
            max_shows: p.max_shows,
            weekend_priority: p.weekend_priority,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StageIn {
    pub id: String,
    pub name: Option<String>,
}

impl From<StageIn> for Stage {
    fn from(s: StageIn) -> Self {
        Stage {
            name: s.name.unwrap_or_else(|| s.id.clone()),
            id: s.id,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeslotIn {
    pub id: String,
    pub stage_id: String,
    pub date: Option<String>,
    #[serde(default)]
    pub day_of_week: u8,
    #[serde(default = "default_start_time")]
    pub start_time: String,
}

impl From<TimeslotIn> for Timeslot {
    fn from(t: TimeslotIn) -> Self {
        Timeslot {
            date: t.date.unwrap_or_else(|| t.id.clone()),
            id: t.id,
            stage_id: t.stage_id,
            day_of_week: t.day_of_week,
            start_time: t.start_time,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixedAssignmentIn {
    pub production_id: String,
    pub timeslot_id: String,
    #[serde(default)]
    pub stage_id: String,
    #[serde(default)]
    pub date: String,
    #[serde(default = "default_start_time")]
    pub start_time: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstraintsIn {
    #[serde(default = "default_true")]
    pub one_production_per_timeslot: bool,
    #[serde(default = "default_true")]
    pub exact_shows_count: bool,
    #[serde(default = "default_true")]
    pub consecutive_shows: bool,
    #[serde(default = "default_true")]
    pub monday_off: bool,
    #[serde(default = "default_true")]
    pub weekend_always_show: bool,
    #[serde(default = "default_true")]
    pub same_show_weekend: bool,
    #[serde(default = "default_true")]
    pub break_between_different_shows: bool,
    #[serde(default = "default_true")]
    pub weekend_priority_bonus: bool,
}

impl From<ConstraintsIn> for Constraints {
    fn from(c: ConstraintsIn) -> Self {
        Constraints {
            one_production_per_timeslot: c.one_production_per_timeslot,
            exact_shows_count: c.exact_shows_count,
            consecutive_shows: c.consecutive_shows,
            monday_off: c.monday_off,
            weekend_always_show: c.weekend_always_show,
            same_show_weekend: c.same_show_weekend,
            break_between_different_shows: c.break_between_different_shows,
            weekend_priority_bonus: c.weekend_priority_bonus,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParamsIn {
    #[serde(default)]
    pub objective_weights: HashMap<String, f64>,
    #[serde(default = "default_time_limit")]
    pub time_limit_seconds: f64,
    pub constraints: Option<ConstraintsIn>,
}

impl From<ParamsIn> for ScenarioParams {
    fn from(p: ParamsIn) -> Self {
        ScenarioParams {
            objective_weights: p.objective_weights,
            time_limit_seconds: p.time_limit_seconds,
            constraints: p.constraints.map(Constraints::from).unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PersonIn {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
}

impl From<PersonIn> for Person {
    fn from(p: PersonIn) -> Self {
        Person {
            id: p.id,
            name: p.name,
            email: p.email,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleIn {
    pub id: String,
    pub name: String,
    pub production_id: String,
    #[serde(default)]
    pub is_conductor: bool,
    #[serde(default = "default_required_count")]
    pub required_count: u32,
}

impl From<RoleIn> for Role {
    fn from(r: RoleIn) -> Self {
        Role {
            id: r.id,
            name: r.name,
            production_id: r.production_id,
            is_conductor: r.is_conductor,
            required_count: r.required_count,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonProductionRoleIn {
    pub person_id: String,
    pub production_id: String,
    pub role_id: String,
    #[serde(default = "default_true")]
    pub can_play: bool,
}

impl From<PersonProductionRoleIn> for PersonProductionRole {
    fn from(p: PersonProductionRoleIn) -> Self {
        PersonProductionRole {
            person_id: p.person_id,
            production_id: p.production_id,
            role_id: p.role_id,
            can_play: p.can_play,
        }
    }
}

/// Request body for `scenarios.create`. `revenue` keys follow
/// `"production_id|stage_id|timeslot_id"`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioCreateIn {
    pub productions: Vec<ProductionIn>,
    pub stages: Vec<StageIn>,
    pub timeslots: Vec<TimeslotIn>,
    #[serde(default)]
    pub revenue: HashMap<String, f64>,
    pub params: Option<ParamsIn>,
    #[serde(default)]
    pub fixed_assignments: Vec<FixedAssignmentIn>,
    #[serde(default)]
    pub people: Vec<PersonIn>,
    #[serde(default)]
    pub roles: Vec<RoleIn>,
    #[serde(default)]
    pub person_production_roles: Vec<PersonProductionRoleIn>,
}

// ---------------------------------------------------------------------------
// Read-side views
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioCreated {
    pub scenario_id: String,
    pub status: ScenarioStatus,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusView {
    pub scenario_id: String,
    pub status: ScenarioStatus,
    pub objective_value: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleView {
    pub scenario_id: String,
    pub status: crate::model::ResultStatus,
    pub objective_value: f64,
    pub schedule: Vec<ScheduleItem>,
    pub assignments: Vec<Assignment>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GanttTask {
    pub id: String,
    pub resource: String,
    pub start: String,
    pub end: String,
    pub title: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GanttView {
    pub scenario_id: String,
    pub status: crate::model::ResultStatus,
    pub tasks: Vec<GanttTask>,
}
