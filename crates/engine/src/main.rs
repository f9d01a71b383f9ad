use std::io::{self, BufRead, Write};

use serde::{Deserialize, Serialize};

use theater_sched_engine::dto::{
    ConstraintsIn, PersonIn, PersonProductionRoleIn, RoleIn, ScenarioCreateIn,
};
use theater_sched_engine::orchestrator::Orchestrator;
use theater_sched_engine::store::InMemoryStore;

// ---------------------------------------------------------------------------
// Request / Response types
// ---------------------------------------------------------------------------

/// One line of stdin is one request; one line of stdout is its response.
/// The process holds its scenario store for its entire lifetime, so a
/// `create` in an earlier line is visible to a `solve` in a later one.
#[derive(Debug, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase")]
enum Request {
    CreateScenario {
        #[serde(flatten)]
        input: ScenarioCreateIn,
    },
    Validate {
        #[serde(flatten)]
        input: ScenarioCreateIn,
    },
    #[serde(rename_all = "camelCase")]
    Solve {
        scenario_id: String,
        #[serde(default)]
        constraints: Option<ConstraintsIn>,
    },
    #[serde(rename_all = "camelCase")]
    Status {
        scenario_id: String,
    },
    #[serde(rename_all = "camelCase")]
    Schedule {
        scenario_id: String,
    },
    #[serde(rename_all = "camelCase")]
    Gantt {
        scenario_id: String,
    },
    #[serde(rename_all = "camelCase")]
    AutoGenerateRoles {
        scenario_id: String,
    },
    #[serde(rename_all = "camelCase")]
    AddPerson {
        scenario_id: String,
        #[serde(flatten)]
        person: PersonIn,
    },
    #[serde(rename_all = "camelCase")]
    GetPeople {
        scenario_id: String,
    },
    #[serde(rename_all = "camelCase")]
    DeletePerson {
        scenario_id: String,
        person_id: String,
    },
    #[serde(rename_all = "camelCase")]
    AddRole {
        scenario_id: String,
        #[serde(flatten)]
        role: RoleIn,
    },
    #[serde(rename_all = "camelCase")]
    GetRoles {
        scenario_id: String,
        production_id: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    DeleteRole {
        scenario_id: String,
        role_id: String,
    },
    #[serde(rename_all = "camelCase")]
    SetPersonProductionRole {
        scenario_id: String,
        #[serde(flatten)]
        ppr: PersonProductionRoleIn,
    },
    #[serde(rename_all = "camelCase")]
    GetPersonProductionRoles {
        scenario_id: String,
    },
    #[serde(rename_all = "camelCase")]
    GetAssignments {
        scenario_id: String,
    },
    #[serde(rename_all = "camelCase")]
    UpdateAssignment {
        scenario_id: String,
        schedule_item_id: String,
        person_id: String,
        role_id: String,
    },
}

#[derive(Debug, Serialize)]
struct OkResponse<T: Serialize> {
    ok: bool,
    data: T,
}

#[derive(Debug, Serialize)]
struct ErrResponse {
    ok: bool,
    error: String,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn write_ok<T: Serialize>(data: T) {
    let resp = OkResponse { ok: true, data };
    let json = serde_json::to_string(&resp)
        .unwrap_or_else(|e| format!("{{\"ok\":false,\"error\":\"serialization error: {}\"}}", e));
    println!("{}", json);
    let _ = io::stdout().flush();
}

fn write_err(msg: impl std::fmt::Display) {
    let resp = ErrResponse {
        ok: false,
        error: msg.to_string(),
    };
    let json = serde_json::to_string(&resp)
        .unwrap_or_else(|_| "{\"ok\":false,\"error\":\"double serialization error\"}".to_string());
    println!("{}", json);
    let _ = io::stdout().flush();
}

fn handle(orchestrator: &Orchestrator, line: &str) {
    let request: Request = match serde_json::from_str(line) {
        Ok(r) => r,
        Err(e) => return write_err(format!("invalid JSON input: {}", e)),
    };

    match request {
        Request::CreateScenario { input } => write_ok(orchestrator.create_scenario(input)),
        Request::Validate { input } => write_ok(orchestrator.validate(input)),
        Request::Solve { scenario_id, constraints } => match orchestrator.solve(&scenario_id, constraints) {
            Ok(status) => write_ok(status),
            Err(e) => write_err(e),
        },
        Request::Status { scenario_id } => match orchestrator.get_status(&scenario_id) {
            Ok(status) => write_ok(status),
            Err(e) => write_err(e),
        },
        Request::Schedule { scenario_id } => match orchestrator.get_schedule(&scenario_id) {
            Ok(schedule) => write_ok(schedule),
            Err(e) => write_err(e),
        },
        Request::Gantt { scenario_id } => match orchestrator.get_gantt(&scenario_id) {
            Ok(gantt) => write_ok(gantt),
            Err(e) => write_err(e),
        },
        Request::AutoGenerateRoles { scenario_id } => match orchestrator.auto_generate_roles(&scenario_id) {
            Ok(generated) => write_ok(generated),
            Err(e) => write_err(e),
        },
        Request::AddPerson { scenario_id, person } => match orchestrator.add_person(&scenario_id, person) {
            Ok(()) => write_ok(()),
            Err(e) => write_err(e),
        },
        Request::GetPeople { scenario_id } => match orchestrator.get_people(&scenario_id) {
            Ok(people) => write_ok(people),
            Err(e) => write_err(e),
        },
        Request::DeletePerson { scenario_id, person_id } => {
            match orchestrator.delete_person(&scenario_id, &person_id) {
                Ok(()) => write_ok(()),
                Err(e) => write_err(e),
            }
        }
        Request::AddRole { scenario_id, role } => match orchestrator.add_role(&scenario_id, role) {
            Ok(()) => write_ok(()),
            Err(e) => write_err(e),
        },
        Request::GetRoles { scenario_id, production_id } => {
            match orchestrator.get_roles(&scenario_id, production_id.as_deref()) {
                Ok(roles) => write_ok(roles),
                Err(e) => write_err(e),
            }
        }
        Request::DeleteRole { scenario_id, role_id } => match orchestrator.delete_role(&scenario_id, &role_id) {
            Ok(()) => write_ok(()),
            Err(e) => write_err(e),
        },
        Request::SetPersonProductionRole { scenario_id, ppr } => {
            match orchestrator.set_person_production_role(&scenario_id, ppr) {
                Ok(()) => write_ok(()),
                Err(e) => write_err(e),
            }
        }
        Request::GetPersonProductionRoles { scenario_id } => {
            match orchestrator.get_person_production_roles(&scenario_id) {
                Ok(pprs) => write_ok(pprs),
                Err(e) => write_err(e),
            }
        }
        Request::GetAssignments { scenario_id } => match orchestrator.get_assignments(&scenario_id) {
            Ok(assignments) => write_ok(assignments),
            Err(e) => write_err(e),
        },
        Request::UpdateAssignment {
            scenario_id,
            schedule_item_id,
            person_id,
            role_id,
        } => match orchestrator.update_assignment(&scenario_id, &schedule_item_id, &person_id, &role_id) {
            Ok(()) => write_ok(()),
            Err(e) => write_err(e),
        },
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let store = InMemoryStore::new();
    let orchestrator = Orchestrator::new(&store);

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                write_err(format!("failed to read stdin: {}", e));
                continue;
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        handle(&orchestrator, &line);
    }
}
