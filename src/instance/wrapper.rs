//! Instance Wrapper - One field's embedded instance and its completion flag.
//!
//! Construction runs the whole per-field lifecycle:
//!
//! 1. Derive the machine name from the content's library string
//! 2. Patch the content params (registered customizations)
//! 3. Construct the instance, unless the field is empty or hidden
//! 4. Patch the instance and its render target, remove fullscreen controls
//! 5. Wire resize bubbling between the parent channel and the instance
//! 6. Decide task-ness; tasks start not done and report xAPI events upward
//!
//! After that the wrapper is a capability-checked facade: every accessor
//! falls back to a neutral value when the instance lacks the capability.

use std::cell::{Ref, RefCell};
use std::fmt;
use std::rc::Rc;

use serde_json::Value;
use spark_signals::{Signal, signal};

use crate::engine::{
    Event, EventChannel, HandlerId, RESIZE, WeakEventChannel, XAPI, bubble_down, bubble_up,
};
use crate::layout::RenderTarget;
use crate::types::{FieldDescriptor, empty_state};
use crate::xapi::XapiData;

use super::customizations::{CustomizationContext, Customizations};
use super::host::{Capabilities, ConstructRequest, Instance, InstanceFactory};

/// Content types that are tasks but predate the max-score capability.
pub const LEGACY_TASK_TYPES: [&str; 2] = ["H5P.MemoryGame", "H5P.SpeakTheWordsSet"];

/// Per-field completion flag, shared by the wrapper and the aggregator.
pub type DoneFlag = Signal<bool>;

/// Called with every xAPI event a task instance emits, plus its absolute index.
pub type ScoringCallback = Rc<dyn Fn(&Event, usize)>;

// =============================================================================
// Context
// =============================================================================

/// Per-session context shared by every wrapper of one composition.
#[derive(Clone)]
pub struct WrapperContext<'a> {
    pub content_id: &'a str,
    /// The owning composition's channel, for resize bubbling.
    pub parent: &'a EventChannel,
    pub factory: &'a dyn InstanceFactory,
    pub customizations: &'a Customizations,
    pub image_height_limit: Option<&'a str>,
    /// Previous states by absolute field index.
    pub previous_states: &'a [Value],
    pub on_scoring: ScoringCallback,
}

impl WrapperContext<'_> {
    /// Previous state for the field at `index`, `{}` when none was saved.
    pub fn previous_state(&self, index: usize) -> Value {
        match self.previous_states.get(index) {
            Some(Value::Null) | None => empty_state(),
            Some(state) => state.clone(),
        }
    }
}

// =============================================================================
// Instance Wrapper
// =============================================================================

pub struct InstanceWrapper {
    index: usize,
    machine_name: String,
    sub_content_id: Option<String>,
    instance: Option<RefCell<Box<dyn Instance>>>,
    channel: Option<EventChannel>,
    capabilities: Capabilities,
    is_task: bool,
    done: DoneFlag,
    target: Rc<RenderTarget>,
    parent: WeakEventChannel,
    parent_handler: Option<HandlerId>,
}

impl InstanceWrapper {
    /// Build the wrapper for the field at absolute `index`.
    pub fn new(index: usize, field: &FieldDescriptor, context: &WrapperContext<'_>) -> Self {
        let machine_name = field.machine_name().to_string();
        let target = RenderTarget::new(index);
        let previous_state = context.previous_state(index);

        let mut instance = match &field.content {
            Some(content) if !content.library.is_empty() && !field.is_hidden => {
                let mut content = content.clone();
                context
                    .customizations
                    .patch_params(&machine_name, &mut content.params);

                let built = context.factory.construct(ConstructRequest {
                    content: &content,
                    content_id: context.content_id,
                    target: &target,
                    previous_state: &previous_state,
                });
                if built.is_none() {
                    tracing::warn!(index, library = %content.library, "host did not construct an instance");
                }
                built
            }
            _ => None,
        };

        if let Some(instance) = instance.as_deref_mut() {
            let customization = CustomizationContext {
                index,
                image_height_limit: context.image_height_limit,
            };
            let customizations = context.customizations;
            customizations.patch_instance(&machine_name, instance, &customization);
            customizations.patch_target(&machine_name, &target, instance);
            customizations.remove_fullscreen_controls(&machine_name, instance);
        }

        // Resize both ways between parent and instance
        let parent_handler = instance.as_ref().map(|instance| {
            let events = instance.events();
            let handler = bubble_down(context.parent, RESIZE, vec![events.clone()]);
            bubble_up(events, RESIZE, context.parent);
            handler
        });

        let capabilities = instance
            .as_ref()
            .map_or(Capabilities::NONE, |instance| instance.capabilities());
        let is_task = instance
            .as_deref()
            .is_some_and(|instance| is_instance_task(instance, capabilities, &machine_name));

        if is_task && let Some(instance) = &instance {
            let on_scoring = context.on_scoring.clone();
            instance.events().on(XAPI, move |event| on_scoring(event, index));
        }

        let sub_content_id = instance.as_ref().and_then(|instance| {
            instance
                .sub_content_id()
                .map(str::to_string)
                .or_else(|| field.content.as_ref()?.sub_content_id.clone())
        });

        tracing::debug!(
            index,
            machine_name = %machine_name,
            constructed = instance.is_some(),
            is_task,
            "instance wrapper built"
        );

        let channel = instance.as_ref().map(|instance| instance.events().clone());

        Self {
            index,
            machine_name,
            sub_content_id,
            instance: instance.map(RefCell::new),
            channel,
            capabilities,
            is_task,
            done: signal(!is_task),
            target,
            parent: context.parent.downgrade(),
            parent_handler,
        }
    }

    // =========================================================================
    // Identity
    // =========================================================================

    /// Absolute field index.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Machine name of the field's content, empty when there is none.
    pub fn machine_name(&self) -> &str {
        &self.machine_name
    }

    /// Sub-content id of the constructed instance.
    pub fn sub_content_id(&self) -> Option<&str> {
        self.sub_content_id.as_deref()
    }

    pub fn target(&self) -> &Rc<RenderTarget> {
        &self.target
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    // =========================================================================
    // Instance access
    // =========================================================================

    /// The embedded instance, if one was constructed.
    ///
    /// `None` as well while the instance is busy running one of its own
    /// operations (a listener re-entering from a reset or solutions resize).
    pub fn get_instance(&self) -> Option<Ref<'_, Box<dyn Instance>>> {
        self.instance.as_ref()?.try_borrow().ok()
    }

    pub fn has_instance(&self) -> bool {
        self.instance.is_some()
    }

    /// The instance's event channel.
    pub fn events(&self) -> Option<&EventChannel> {
        self.channel.as_ref()
    }

    /// Read through the instance when it has `capability`; `default` otherwise.
    ///
    /// An instance that is busy (e.g. mid-reset, re-entered from one of its
    /// own events) also reads as `default`.
    fn read<R>(&self, capability: Capabilities, default: R, f: impl FnOnce(&dyn Instance) -> R) -> R {
        if !self.capabilities.contains(capability) {
            return default;
        }
        match self.instance.as_ref().map(RefCell::try_borrow) {
            Some(Ok(instance)) => f(&**instance),
            Some(Err(_)) => {
                tracing::debug!(index = self.index, "instance busy, using default");
                default
            }
            None => default,
        }
    }

    fn write(&self, capability: Capabilities, f: impl FnOnce(&mut dyn Instance)) {
        if !self.capabilities.contains(capability) {
            return;
        }
        if let Some(Ok(mut instance)) = self.instance.as_ref().map(RefCell::try_borrow_mut) {
            f(&mut **instance);
        }
    }

    // =========================================================================
    // Completion
    // =========================================================================

    /// Whether the field takes part in completion tracking.
    pub fn is_task(&self) -> bool {
        self.is_task
    }

    pub fn set_done(&self, done: bool) {
        self.done.set(done);
    }

    pub fn is_done(&self) -> bool {
        self.done.get()
    }

    /// Shared handle to the completion flag.
    pub fn done_flag(&self) -> DoneFlag {
        self.done.clone()
    }

    // =========================================================================
    // Facade
    // =========================================================================

    pub fn answer_given(&self) -> bool {
        self.read(Capabilities::ANSWER_GIVEN, false, |instance| instance.answer_given())
    }

    pub fn score(&self) -> f64 {
        self.read(Capabilities::SCORE, 0.0, |instance| instance.score())
    }

    pub fn max_score(&self) -> f64 {
        self.read(Capabilities::MAX_SCORE, 0.0, |instance| instance.max_score())
    }

    /// Show solutions. The owning composition triggers the resize.
    pub fn show_solutions(&self) {
        self.write(Capabilities::SHOW_SOLUTIONS, |instance| instance.show_solutions());
    }

    /// Reset the instance; task fields go back to not done.
    pub fn reset_task(&self) {
        self.write(Capabilities::RESET, |instance| instance.reset_task());
        self.done.set(!self.has_instance() || !self.is_task);
    }

    /// Current state, `{}` when the instance has none to give.
    pub fn current_state(&self) -> Value {
        match self.read(Capabilities::CURRENT_STATE, Value::Null, |instance| instance.current_state()) {
            Value::Null => empty_state(),
            state => state,
        }
    }

    pub fn xapi_data(&self) -> Option<XapiData> {
        self.read(Capabilities::XAPI_DATA, None, |instance| instance.xapi_data())
    }
}

impl Drop for InstanceWrapper {
    fn drop(&mut self) {
        if let (Some(handler), Some(parent)) = (self.parent_handler, self.parent.upgrade()) {
            parent.off(handler);
        }
    }
}

impl fmt::Debug for InstanceWrapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstanceWrapper")
            .field("index", &self.index)
            .field("machine_name", &self.machine_name)
            .field("has_instance", &self.has_instance())
            .field("capabilities", &self.capabilities)
            .field("is_task", &self.is_task)
            .field("done", &self.done.get())
            .finish()
    }
}

/// Task decision, first match wins: explicit flag, max-score capability,
/// legacy type list.
fn is_instance_task(instance: &dyn Instance, capabilities: Capabilities, field_machine_name: &str) -> bool {
    if capabilities.contains(Capabilities::IS_TASK) {
        return instance.is_task();
    }
    if capabilities.contains(Capabilities::MAX_SCORE) {
        return true;
    }

    let machine_name = match instance.machine_name() {
        "" => field_machine_name,
        name => name,
    };
    LEGACY_TASK_TYPES.contains(&machine_name)
}
