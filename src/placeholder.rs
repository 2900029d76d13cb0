//! Placeholder - The root content: composition, completion and reporting.
//!
//! A [`Placeholder`] is what the host constructs and attaches. It owns the
//! [`Composition`] (layout tree plus one wrapper per field) and the
//! completion [`Aggregator`], and exposes the aggregate content contract:
//! score, max score, answer given, solutions, reset, state and xAPI data.
//!
//! # Example
//!
//! ```ignore
//! use spark_placeholder::{ContentExtras, FrameQueue, Host, Placeholder, PlaceholderParams};
//!
//! let frames = FrameQueue::new();
//! let host = Host::new(my_factory, frames.clone());
//! host.events.on("xAPI", |event| println!("{:?}", event.verb()));
//!
//! let placeholder = Placeholder::new(params, "42", ContentExtras::default(), &host)?;
//! let tree = placeholder.attach();
//! frames.run_frame();
//! frames.run_frame(); // root resize fires here
//! ```

use std::cell::Ref;
use std::rc::Rc;

use serde_json::{Value, json};

use crate::config::{ContentExtras, PlaceholderParams};
use crate::engine::{Event, EventChannel, FrameScheduler, after_two_frames};
use crate::error::Result;
use crate::instance::{Customizations, Instance, InstanceFactory, InstanceWrapper, WrapperContext};
use crate::layout::{Arrangement, LayoutTree, ResolvedLayout, resolve_layout};
use crate::pipeline::Composition;
use crate::state::{Aggregator, CompletionState};
use crate::types::{ContentReference, FieldDescriptor};
use crate::xapi::{self, XapiData};

/// Title and description used when the metadata has no title.
pub const DEFAULT_TITLE: &str = "Portfolio Placeholder";

// =============================================================================
// Host
// =============================================================================

/// What the embedding runtime provides to every placeholder.
///
/// A placeholder dispatches on `events` and wires its children to it, so
/// placeholders built from clones of one `Host` share resizes and completion
/// reports. Give each its own channel with [`Host::with_events`].
#[derive(Clone)]
pub struct Host {
    pub factory: Rc<dyn InstanceFactory>,
    pub scheduler: Rc<dyn FrameScheduler>,
    pub customizations: Customizations,
    /// Channel the root placeholder dispatches on (resize, xAPI). One per placeholder.
    pub events: EventChannel,
}

impl Host {
    pub fn new<F, S>(factory: F, scheduler: S) -> Self
    where
        F: InstanceFactory + 'static,
        S: FrameScheduler + 'static,
    {
        Self {
            factory: Rc::new(factory),
            scheduler: Rc::new(scheduler),
            customizations: Customizations::new(),
            events: EventChannel::new(),
        }
    }

    pub fn with_customizations(mut self, customizations: Customizations) -> Self {
        self.customizations = customizations;
        self
    }

    pub fn with_events(mut self, events: EventChannel) -> Self {
        self.events = events;
        self
    }
}

// =============================================================================
// Placeholder
// =============================================================================

pub struct Placeholder {
    content_id: String,
    params: PlaceholderParams,
    image_height_limit: Option<String>,
    extras: ContentExtras,
    definition: Value,
    events: EventChannel,
    scheduler: Rc<dyn FrameScheduler>,
    composition: Composition,
    aggregator: Rc<Aggregator>,
}

impl Placeholder {
    /// Build every field's instance and the layout tree.
    ///
    /// Fails only on a malformed arrangement.
    pub fn new(
        params: PlaceholderParams,
        content_id: impl Into<String>,
        extras: ContentExtras,
        host: &Host,
    ) -> Result<Self> {
        let content_id = content_id.into();
        let arrangement = Arrangement::parse(&params.arrangement)?;
        let image_height_limit = params.image_height_limit();
        let previous_states = extras.previous_children();

        let title = xapi::create_title(extras.metadata.title.as_deref(), DEFAULT_TITLE);
        let definition = xapi::activity_definition(&extras.language_tag(), &title, DEFAULT_TITLE);

        let events = host.events.clone();
        let aggregator = Aggregator::new(host.scheduler.clone());

        let context = WrapperContext {
            content_id: &content_id,
            parent: &events,
            factory: host.factory.as_ref(),
            customizations: &host.customizations,
            image_height_limit: image_height_limit.as_deref(),
            previous_states: &previous_states,
            on_scoring: aggregator.scoring_callback(),
        };
        let composition =
            Composition::build(arrangement, params.fields.clone(), params.background(), &context);

        aggregator.track(composition.wrappers.iter().map(InstanceWrapper::done_flag).collect());

        // Completion reports the aggregate score on the root channel
        let wrappers = composition.wrappers.clone();
        let channel = events.downgrade();
        let completed_definition = definition.clone();
        aggregator.on_complete(move || {
            let Some(channel) = channel.upgrade() else {
                return;
            };
            let (score, max_score) = totals(&wrappers);
            let mut statement = xapi::statement("completed", completed_definition.clone());
            xapi::set_scored_result(&mut statement, score, max_score, None, None);
            channel.trigger(&Event::xapi(statement));
        });

        let placeholder = Self {
            content_id,
            params,
            image_height_limit,
            extras,
            definition,
            events,
            scheduler: host.scheduler.clone(),
            composition,
            aggregator,
        };

        if placeholder.extras.is_root {
            placeholder.trigger_xapi("attempted");
        }

        tracing::debug!(
            content_id = %placeholder.content_id,
            fields = placeholder.composition.wrappers.len(),
            is_task = placeholder.composition.is_task,
            "placeholder constructed"
        );
        Ok(placeholder)
    }

    /// Hand out the layout tree. The root resizes two frames later, once the
    /// host has laid the content out.
    pub fn attach(&self) -> &LayoutTree {
        let channel = self.events.downgrade();
        after_two_frames(
            &self.scheduler,
            Box::new(move || {
                if let Some(channel) = channel.upgrade() {
                    channel.trigger(&Event::resize());
                }
            }),
        );
        &self.composition.tree
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn content_id(&self) -> &str {
        &self.content_id
    }

    pub fn params(&self) -> &PlaceholderParams {
        &self.params
    }

    pub fn extras(&self) -> &ContentExtras {
        &self.extras
    }

    /// Sanitized image height limit.
    pub fn image_height_limit(&self) -> Option<&str> {
        self.image_height_limit.as_deref()
    }

    pub fn events(&self) -> &EventChannel {
        &self.events
    }

    pub fn tree(&self) -> &LayoutTree {
        &self.composition.tree
    }

    pub fn arrangement(&self) -> &Arrangement {
        &self.composition.arrangement
    }

    /// Normalized fields.
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.composition.fields
    }

    /// Instance wrappers, wrapper `i` belonging to field `i`.
    pub fn wrappers(&self) -> &[InstanceWrapper] {
        &self.composition.wrappers
    }

    pub fn wrapper(&self, index: usize) -> Option<&InstanceWrapper> {
        self.composition.wrapper(index)
    }

    /// True when any field is a task.
    pub fn is_task(&self) -> bool {
        self.composition.is_task
    }

    pub fn completion_state(&self) -> CompletionState {
        self.aggregator.state()
    }

    pub fn aggregator(&self) -> &Aggregator {
        &self.aggregator
    }

    /// Concrete geometry for a container `width` wide.
    pub fn resolve_layout<F>(&self, width: f32, content_height: F) -> Result<ResolvedLayout>
    where
        F: FnMut(usize, f32) -> f32,
    {
        resolve_layout(&self.composition.tree, width, content_height)
    }

    pub fn resize(&self) {
        self.events.trigger(&Event::resize());
    }

    // =========================================================================
    // Content contract
    // =========================================================================

    /// True when any field has been answered.
    pub fn answer_given(&self) -> bool {
        self.wrappers().iter().any(InstanceWrapper::answer_given)
    }

    pub fn score(&self) -> f64 {
        totals(self.wrappers()).0
    }

    pub fn max_score(&self) -> f64 {
        totals(self.wrappers()).1
    }

    pub fn show_solutions(&self) {
        for wrapper in self.wrappers() {
            wrapper.show_solutions();
        }
        self.resize();
    }

    /// Reset every field and reopen completion.
    pub fn reset_task(&self) {
        for wrapper in self.wrappers() {
            wrapper.reset_task();
        }
        self.aggregator.reset();
        self.resize();
    }

    /// `{"children": [...]}`, one state per field in field order.
    pub fn current_state(&self) -> Value {
        let children: Vec<Value> = self.wrappers().iter().map(InstanceWrapper::current_state).collect();
        json!({ "children": children })
    }

    /// Compound `answered` report including every reporting child.
    pub fn xapi_data(&self) -> XapiData {
        let (score, max_score) = totals(self.wrappers());
        let mut statement = xapi::statement("answered", self.definition.clone());
        xapi::set_scored_result(&mut statement, score, max_score, Some(true), Some(score == max_score));

        XapiData {
            statement,
            children: self.wrappers().iter().filter_map(InstanceWrapper::xapi_data).collect(),
        }
    }

    fn trigger_xapi(&self, verb: &str) {
        let statement = xapi::statement(verb, self.definition.clone());
        self.events.trigger(&Event::xapi(statement));
    }

    // =========================================================================
    // Parent API
    // =========================================================================

    /// The field whose instance has `sub_content_id`.
    pub fn find_field(&self, sub_content_id: &str) -> Option<&InstanceWrapper> {
        self.wrappers()
            .iter()
            .find(|wrapper| wrapper.sub_content_id() == Some(sub_content_id))
    }

    /// Every field's instance, `None` where none was constructed.
    pub fn instances(&self) -> Vec<Option<Ref<'_, Box<dyn Instance>>>> {
        self.wrappers().iter().map(InstanceWrapper::get_instance).collect()
    }

    /// Every field's content reference as configured.
    pub fn instances_semantics(&self) -> Vec<Option<&ContentReference>> {
        self.fields().iter().map(|field| field.content.as_ref()).collect()
    }
}

fn totals(wrappers: &[InstanceWrapper]) -> (f64, f64) {
    wrappers.iter().fold((0.0, 0.0), |(score, max_score), wrapper| {
        (score + wrapper.score(), max_score + wrapper.max_score())
    })
}

impl std::fmt::Debug for Placeholder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Placeholder")
            .field("content_id", &self.content_id)
            .field("arrangement", &self.composition.arrangement)
            .field("wrappers", &self.composition.wrappers)
            .field("aggregator", &self.aggregator)
            .finish()
    }
}
