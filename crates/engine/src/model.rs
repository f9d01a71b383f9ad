use std::collections::HashMap;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Status enums
// ---------------------------------------------------------------------------

/// Lifecycle of a `Scenario` as it moves through creation and solving.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ScenarioStatus {
    Created,
    Solving,
    Solved,
    Failed,
}

/// Outcome reported by the schedule solver for a given scenario.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ResultStatus {
    Optimal,
    Feasible,
    Infeasible,
}

// ---------------------------------------------------------------------------
// Venue / time structure
// ---------------------------------------------------------------------------

/// A physical venue within the theater. A production may only ever play on
/// its pinned stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stage {
    pub id: String,
    pub name: String,
}

/// A theatrical work tied to a single stage, requiring an exact number of
/// performances within the planning horizon.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Production {
    pub id: String,
    pub title: String,
    pub stage_id: String,
    /// Exact required number of performances. Must be > 0.
    pub max_shows: u32,
    /// Whether this production should be biased toward weekend slots.
    #[serde(default)]
    pub weekend_priority: bool,
}

/// A `(stage, date, start-time)` triple representing one performable
/// occasion. Slots are ordered within a stage by `(date, start_time)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Timeslot {
    pub id: String,
    pub stage_id: String,
    /// ISO date string, e.g. "2025-11-01".
    pub date: String,
    /// 0 = Monday .. 6 = Sunday.
    #[serde(default)]
    pub day_of_week: u8,
    /// "HH:MM" start time for this slot.
    #[serde(default = "default_start_time")]
    pub start_time: String,
}

fn default_start_time() -> String {
    "19:00".to_string()
}

impl Timeslot {
    pub fn is_weekend(&self) -> bool {
        self.day_of_week == 5 || self.day_of_week == 6
    }

    pub fn is_monday(&self) -> bool {
        self.day_of_week == 0
    }
}

/// An operator-pinned `(production, timeslot)` pair the solver must honor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixedAssignment {
    pub production_id: String,
    pub timeslot_id: String,
    pub stage_id: String,
    pub date: String,
    pub start_time: String,
}

// ---------------------------------------------------------------------------
// Constraint toggles
// ---------------------------------------------------------------------------

/// Toggle set for the solver's hard and soft rules. Every flag defaults to
/// `true`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Constraints {
    /// Always enforced regardless of this flag's value — see the solver.
    pub one_production_per_timeslot: bool,
    /// Always enforced regardless of this flag's value — see the solver.
    pub exact_shows_count: bool,
    pub consecutive_shows: bool,
    pub monday_off: bool,
    pub weekend_always_show: bool,
    /// Declared for schema compatibility; not currently translated into any
    /// constraint. See DESIGN.md.
    pub same_show_weekend: bool,
    pub break_between_different_shows: bool,
    pub weekend_priority_bonus: bool,
}

impl Default for Constraints {
    fn default() -> Self {
        Constraints {
            one_production_per_timeslot: true,
            exact_shows_count: true,
            consecutive_shows: true,
            monday_off: true,
            weekend_always_show: true,
            same_show_weekend: true,
            break_between_different_shows: true,
            weekend_priority_bonus: true,
        }
    }
}

/// Parameters governing one solve: objective weighting (currently unused by
/// the objective, see DESIGN.md), a wall-clock budget, and the constraint
/// toggle set.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioParams {
    #[serde(default)]
    pub objective_weights: HashMap<String, f64>,
    #[serde(default = "default_time_limit")]
    pub time_limit_seconds: f64,
    #[serde(default)]
    pub constraints: Constraints,
}

fn default_time_limit() -> f64 {
    7.0
}

impl Default for ScenarioParams {
    fn default() -> Self {
        ScenarioParams {
            objective_weights: HashMap::new(),
            time_limit_seconds: default_time_limit(),
            constraints: Constraints::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Personnel
// ---------------------------------------------------------------------------

/// A member of the theater's staff.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Person {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// A named part in a production (e.g. "Prince", "Conductor").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    pub id: String,
    pub name: String,
    pub production_id: String,
    #[serde(default)]
    pub is_conductor: bool,
    #[serde(default = "default_required_count")]
    pub required_count: u32,
}

fn default_required_count() -> u32 {
    1
}

/// Eligibility edge: whether a person may play a given role in a given
/// production. An absent edge is equivalent to `can_play: false`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonProductionRole {
    pub person_id: String,
    pub production_id: String,
    pub role_id: String,
    #[serde(default = "default_can_play")]
    pub can_play: bool,
}

fn default_can_play() -> bool {
    true
}

// ---------------------------------------------------------------------------
// Scenario
// ---------------------------------------------------------------------------

/// The complete input to one scheduling run, plus its lifecycle status.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    pub id: String,
    pub productions: Vec<Production>,
    pub stages: Vec<Stage>,
    pub timeslots: Vec<Timeslot>,
    /// Keyed by `"production_id|stage_id|timeslot_id"`. Reserved: not
    /// currently read by the objective. See DESIGN.md.
    #[serde(default)]
    pub revenue: HashMap<String, f64>,
    #[serde(default)]
    pub params: ScenarioParams,
    #[serde(default)]
    pub fixed_assignments: Vec<FixedAssignment>,
    pub status: ScenarioStatus,
    #[serde(default)]
    pub people: Vec<Person>,
    #[serde(default)]
    pub roles: Vec<Role>,
    #[serde(default)]
    pub person_production_roles: Vec<PersonProductionRole>,
}

// ---------------------------------------------------------------------------
// Solver / allocator output
// ---------------------------------------------------------------------------

/// One output decision: "production P plays in timeslot T on stage S".
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleItem {
    pub scenario_id: String,
    pub production_id: String,
    pub stage_id: String,
    pub timeslot_id: String,
    /// Reserved: currently always 0.0. See DESIGN.md.
    pub revenue: f64,
}

impl ScheduleItem {
    /// Canonical composite key used to join schedule items and assignments:
    /// `"production_id|stage_id|timeslot_id"`.
    pub fn item_id(&self) -> String {
        format!("{}|{}|{}", self.production_id, self.stage_id, self.timeslot_id)
    }
}

/// One personnel placement: "person X fills role R for schedule item I".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub scenario_id: String,
    pub schedule_item_id: String,
    pub production_id: String,
    pub timeslot_id: String,
    pub stage_id: String,
    pub person_id: String,
    pub role_id: String,
    #[serde(default)]
    pub is_conductor: bool,
}

/// The complete solver output: the selected schedule plus the role
/// assignments derived from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioResult {
    pub scenario_id: String,
    pub schedule: Vec<ScheduleItem>,
    pub objective_value: f64,
    pub status: ResultStatus,
    #[serde(default)]
    pub assignments: Vec<Assignment>,
}
