//! Error kinds for the scheduling engine.
//!
//! `SolveError` is raised synchronously by the solver when the input is
//! structurally inconsistent. `OrchestratorError` is raised by the
//! orchestrator for lookups and CRUD operations. An infeasible solve is
//! deliberately *not* an error: it comes back as a normal `ScenarioResult`
//! with `status: infeasible`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SolveError {
    #[error("fixed assignment pins production '{production_id}' to timeslot '{timeslot_id}', but no matching decision variable exists (stage mismatch or unknown id)")]
    InconsistentInput {
        production_id: String,
        timeslot_id: String,
    },
    #[error("production '{0}' has no candidate timeslots on its stage but requires {1} show(s)")]
    NoCandidateSlots(String, u32),
    #[error("solver backend error: {0}")]
    Internal(String),
}

#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error("scenario '{0}' not found")]
    ScenarioNotFound(String),
    #[error("result for scenario '{0}' not found")]
    ResultNotFound(String),
    #[error("person '{0}' not found")]
    PersonNotFound(String),
    #[error("role '{0}' not found")]
    RoleNotFound(String),
    #[error("'{0}' with id '{1}' already exists")]
    Conflict(String, String),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error(transparent)]
    Solve(#[from] SolveError),
}
