//! Scenario store (C2): an in-process mapping `scenario_id → Scenario` and
//! `scenario_id → ScenarioResult`, reachable only behind the [`ScenarioStore`]
//! trait so a persistent backend can be substituted without touching the
//! orchestrator. `save_*` is last-writer-wins; `get_*` returns `None` when
//! missing. No durability guarantees.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::model::{Scenario, ScenarioResult};

pub trait ScenarioStore: Send + Sync {
    fn save_scenario(&self, scenario: Scenario);
    fn get_scenario(&self, id: &str) -> Option<Scenario>;
    fn save_result(&self, result: ScenarioResult);
    fn get_result(&self, id: &str) -> Option<ScenarioResult>;
    /// Returns a per-scenario lock so that callers can serialize writes to
    /// the same `scenario_id` (the store itself only guarantees atomicity of
    /// individual `save_*`/`get_*` calls, not of read-modify-write sequences).
    fn lock_for(&self, id: &str) -> Arc<Mutex<()>>;
}

#[derive(Default)]
pub struct InMemoryStore {
    scenarios: Mutex<HashMap<String, Scenario>>,
    results: Mutex<HashMap<String, ScenarioResult>>,
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScenarioStore for InMemoryStore {
    fn save_scenario(&self, scenario: Scenario) {
        self.scenarios
            .lock()
            .expect("scenario store mutex poisoned")
            .insert(scenario.id.clone(), scenario);
    }

    fn get_scenario(&self, id: &str) -> Option<Scenario> {
        self.scenarios
            .lock()
            .expect("scenario store mutex poisoned")
            .get(id)
            .cloned()
    }

    fn save_result(&self, result: ScenarioResult) {
        self.results
            .lock()
            .expect("result store mutex poisoned")
            .insert(result.scenario_id.clone(), result);
    }

    fn get_result(&self, id: &str) -> Option<ScenarioResult> {
        self.results
            .lock()
            .expect("result store mutex poisoned")
            .get(id)
            .cloned()
    }

    fn lock_for(&self, id: &str) -> Arc<Mutex<()>> {
        self.locks
            .lock()
            .expect("lock table mutex poisoned")
            .entry(id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}
