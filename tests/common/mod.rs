//! Shared host doubles for integration tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use serde_json::{Value, json};
use spark_placeholder::{
    Capabilities, ConstructRequest, ContentExtras, Event, EventChannel, FrameQueue, Host, Instance,
    InstanceFactory, Placeholder, PlaceholderParams,
};

/// A question whose score is whatever it last reported. Resizes itself on reset.
pub struct Question {
    events: EventChannel,
    max_score: f64,
    score: f64,
}

impl Instance for Question {
    fn capabilities(&self) -> Capabilities {
        Capabilities::SCORE | Capabilities::MAX_SCORE | Capabilities::RESET | Capabilities::CURRENT_STATE
    }

    fn events(&self) -> &EventChannel {
        &self.events
    }

    fn score(&self) -> f64 {
        self.score
    }

    fn max_score(&self) -> f64 {
        self.max_score
    }

    fn reset_task(&mut self) {
        self.score = 0.0;
        self.events.trigger(&Event::resize());
    }

    fn current_state(&self) -> Value {
        json!({ "score": self.score })
    }
}

/// Static content: no capabilities at all.
pub struct Static {
    events: EventChannel,
}

impl Instance for Static {
    fn capabilities(&self) -> Capabilities {
        Capabilities::NONE
    }

    fn events(&self) -> &EventChannel {
        &self.events
    }
}

/// Builds `Question` for any library containing "Question", `Static` otherwise,
/// and remembers every instance's channel by field index.
#[derive(Clone, Default)]
pub struct Factory {
    pub channels: Rc<RefCell<Vec<(usize, EventChannel)>>>,
}

impl Factory {
    pub fn channel(&self, index: usize) -> EventChannel {
        self.channels
            .borrow()
            .iter()
            .find(|(i, _)| *i == index)
            .map(|(_, channel)| channel.clone())
            .expect("instance constructed for field")
    }
}

impl InstanceFactory for Factory {
    fn construct(&self, request: ConstructRequest<'_>) -> Option<Box<dyn Instance>> {
        let events = EventChannel::new();
        self.channels
            .borrow_mut()
            .push((request.target.index(), events.clone()));

        if request.content.library.contains("Question") {
            Some(Box::new(Question {
                events,
                max_score: request.content.params["maxScore"].as_f64().unwrap_or(1.0),
                score: 0.0,
            }))
        } else {
            Some(Box::new(Static { events }))
        }
    }
}

pub fn question_field() -> Value {
    json!({ "content": { "library": "H5P.Question 1.0", "params": { "maxScore": 1 } } })
}

pub fn static_field() -> Value {
    json!({ "content": { "library": "H5P.AdvancedText 1.1" } })
}

pub fn scored(raw: f64) -> Event {
    Event::xapi(json!({ "result": { "score": { "raw": raw } } }))
}

pub struct Harness {
    pub frames: FrameQueue,
    pub factory: Factory,
    pub host: Host,
}

impl Harness {
    pub fn new() -> Self {
        let frames = FrameQueue::new();
        let factory = Factory::default();
        let host = Host::new(factory.clone(), frames.clone());
        Self { frames, factory, host }
    }

    pub fn build(&self, arrangement: &str, fields: Vec<Value>) -> Placeholder {
        let params = PlaceholderParams::from_value(json!({
            "arrangement": arrangement,
            "fields": fields,
        }))
        .expect("valid params");
        Placeholder::new(params, "1", ContentExtras::default(), &self.host).expect("valid arrangement")
    }
}
