//! Scriptable instances and factory for unit tests.
//!
//! The factory reads its behavior from the content params:
//! `{"maxScore": 2, "score": 1, "answered": true, "isTask": false}`.
//! Anything without `maxScore` or `isTask` is a static (non-task) instance.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use serde_json::{Value, json};

use crate::engine::{Event, EventChannel};
use crate::types::empty_state;
use crate::xapi::XapiData;

use super::host::{Capabilities, ConstructRequest, Instance, InstanceFactory};

pub(crate) struct MockInstance {
    pub events: EventChannel,
    pub capabilities: Capabilities,
    pub machine_name: String,
    pub sub_content_id: Option<String>,
    pub is_task: bool,
    pub score: f64,
    pub max_score: f64,
    pub answered: bool,
    pub state: Value,
    pub resets: Rc<Cell<usize>>,
    pub solutions: Rc<Cell<usize>>,
}

impl MockInstance {
    pub fn new(machine_name: &str, capabilities: Capabilities) -> Self {
        Self {
            events: EventChannel::new(),
            capabilities,
            machine_name: machine_name.to_string(),
            sub_content_id: None,
            is_task: false,
            score: 0.0,
            max_score: 0.0,
            answered: false,
            state: empty_state(),
            resets: Rc::new(Cell::new(0)),
            solutions: Rc::new(Cell::new(0)),
        }
    }
}

impl Instance for MockInstance {
    fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    fn events(&self) -> &EventChannel {
        &self.events
    }

    fn machine_name(&self) -> &str {
        &self.machine_name
    }

    fn sub_content_id(&self) -> Option<&str> {
        self.sub_content_id.as_deref()
    }

    fn is_task(&self) -> bool {
        self.is_task
    }

    fn score(&self) -> f64 {
        self.score
    }

    fn max_score(&self) -> f64 {
        self.max_score
    }

    fn answer_given(&self) -> bool {
        self.answered
    }

    fn reset_task(&mut self) {
        self.resets.set(self.resets.get() + 1);
        self.score = 0.0;
        self.answered = false;
    }

    fn show_solutions(&mut self) {
        self.solutions.set(self.solutions.get() + 1);
    }

    fn current_state(&self) -> Value {
        self.state.clone()
    }

    fn xapi_data(&self) -> Option<XapiData> {
        Some(XapiData {
            statement: json!({ "object": { "id": self.machine_name } }),
            children: Vec::new(),
        })
    }
}

/// What the factory built for one field.
#[derive(Clone)]
pub(crate) struct Built {
    pub index: usize,
    pub events: EventChannel,
    pub previous_state: Value,
    pub resets: Rc<Cell<usize>>,
    pub solutions: Rc<Cell<usize>>,
}

impl Built {
    /// Emit a scored xAPI event from this instance.
    pub fn score(&self, raw: f64) {
        self.events
            .trigger(&Event::xapi(json!({ "result": { "score": { "raw": raw } } })));
    }

    /// Emit an xAPI event without a score.
    pub fn interact(&self) {
        self.events.trigger(&Event::xapi(json!({ "verb": { "id": "interacted" } })));
    }
}

#[derive(Clone, Default)]
pub(crate) struct MockFactory {
    pub built: Rc<RefCell<Vec<Built>>>,
    pub refuse: bool,
}

impl MockFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn refusing() -> Self {
        Self { refuse: true, ..Self::default() }
    }

    pub fn built(&self, index: usize) -> Built {
        self.built
            .borrow()
            .iter()
            .find(|built| built.index == index)
            .cloned()
            .unwrap_or_else(|| panic!("no instance built for field {index}"))
    }

    pub fn count(&self) -> usize {
        self.built.borrow().len()
    }
}

impl InstanceFactory for MockFactory {
    fn construct(&self, request: ConstructRequest<'_>) -> Option<Box<dyn Instance>> {
        if self.refuse {
            return None;
        }

        let params = &request.content.params;
        let mut capabilities = Capabilities::ANSWER_GIVEN
            | Capabilities::RESET
            | Capabilities::SHOW_SOLUTIONS
            | Capabilities::CURRENT_STATE;
        if params.get("maxScore").is_some() {
            capabilities |= Capabilities::SCORE | Capabilities::MAX_SCORE | Capabilities::XAPI_DATA;
        }
        if params.get("isTask").is_some() {
            capabilities |= Capabilities::IS_TASK;
        }

        let mut instance = MockInstance::new(request.content.machine_name(), capabilities);
        instance.sub_content_id = request.content.sub_content_id.clone();
        instance.is_task = params["isTask"].as_bool().unwrap_or(false);
        instance.score = params["score"].as_f64().unwrap_or(0.0);
        instance.max_score = params["maxScore"].as_f64().unwrap_or(0.0);
        instance.answered = params["answered"].as_bool().unwrap_or(false);
        instance.state = request.previous_state.clone();

        self.built.borrow_mut().push(Built {
            index: request.target.index(),
            events: instance.events.clone(),
            previous_state: request.previous_state.clone(),
            resets: instance.resets.clone(),
            solutions: instance.solutions.clone(),
        });

        Some(Box::new(instance))
    }
}
