//! Per-type customizations.
//!
//! Some content types need small environment patches to behave inside a
//! narrow layout slot: a parameter tweak before construction, an instance or
//! render-target tweak after it, or removal of a fullscreen control. These
//! are registered here by machine name (e.g. `"H5P.Image"`) so the wrapper
//! stays free of type-specific branches.
//!
//! Nothing is registered by default; every unregistered type is a no-op.
//!
//! ```ignore
//! let customizations = Customizations::new()
//!     .on_params("H5P.Audio", |params| params["fitToWrapper"] = true.into())
//!     .on_target("H5P.Image", |target, _| target.set_style("height", "10rem"));
//! ```

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use serde_json::Value;

use crate::layout::RenderTarget;

use super::host::Instance;

/// What an instance patch gets to know about its field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CustomizationContext<'a> {
    /// Absolute field index.
    pub index: usize,
    /// Sanitized CSS length, e.g. `"200px"`.
    pub image_height_limit: Option<&'a str>,
}

pub type ParamsPatch = Rc<dyn Fn(&mut Value)>;
pub type InstancePatch = Rc<dyn Fn(&mut dyn Instance, &CustomizationContext<'_>)>;
pub type TargetPatch = Rc<dyn Fn(&RenderTarget, &dyn Instance)>;
pub type FullscreenPatch = Rc<dyn Fn(&mut dyn Instance)>;

#[derive(Default, Clone)]
struct Entry {
    params: Vec<ParamsPatch>,
    instance: Vec<InstancePatch>,
    target: Vec<TargetPatch>,
    fullscreen: Vec<FullscreenPatch>,
}

/// Registry of per-type patches, keyed by machine name.
#[derive(Default, Clone)]
pub struct Customizations {
    entries: HashMap<String, Entry>,
}

impl Customizations {
    pub fn new() -> Self {
        Self::default()
    }

    fn entry(&mut self, machine_name: &str) -> &mut Entry {
        self.entries.entry(machine_name.to_string()).or_default()
    }

    /// Patch content parameters before the instance is constructed.
    pub fn on_params<F>(mut self, machine_name: &str, patch: F) -> Self
    where
        F: Fn(&mut Value) + 'static,
    {
        self.entry(machine_name).params.push(Rc::new(patch));
        self
    }

    /// Patch a freshly constructed instance.
    pub fn on_instance<F>(mut self, machine_name: &str, patch: F) -> Self
    where
        F: Fn(&mut dyn Instance, &CustomizationContext<'_>) + 'static,
    {
        self.entry(machine_name).instance.push(Rc::new(patch));
        self
    }

    /// Patch the render target an instance was constructed into.
    pub fn on_target<F>(mut self, machine_name: &str, patch: F) -> Self
    where
        F: Fn(&RenderTarget, &dyn Instance) + 'static,
    {
        self.entry(machine_name).target.push(Rc::new(patch));
        self
    }

    /// Remove the fullscreen affordance of an instance.
    pub fn on_fullscreen<F>(mut self, machine_name: &str, patch: F) -> Self
    where
        F: Fn(&mut dyn Instance) + 'static,
    {
        self.entry(machine_name).fullscreen.push(Rc::new(patch));
        self
    }

    pub fn is_registered(&self, machine_name: &str) -> bool {
        self.entries.contains_key(machine_name)
    }

    // =========================================================================
    // Application
    // =========================================================================

    pub fn patch_params(&self, machine_name: &str, params: &mut Value) {
        if let Some(entry) = self.entries.get(machine_name) {
            for patch in &entry.params {
                patch(params);
            }
        }
    }

    pub fn patch_instance(
        &self,
        machine_name: &str,
        instance: &mut dyn Instance,
        context: &CustomizationContext<'_>,
    ) {
        if let Some(entry) = self.entries.get(machine_name) {
            for patch in &entry.instance {
                patch(&mut *instance, context);
            }
        }
    }

    pub fn patch_target(&self, machine_name: &str, target: &RenderTarget, instance: &dyn Instance) {
        if let Some(entry) = self.entries.get(machine_name) {
            for patch in &entry.target {
                patch(target, instance);
            }
        }
    }

    pub fn remove_fullscreen_controls(&self, machine_name: &str, instance: &mut dyn Instance) {
        if let Some(entry) = self.entries.get(machine_name) {
            for patch in &entry.fullscreen {
                patch(&mut *instance);
            }
        }
    }
}

impl fmt::Debug for Customizations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("Customizations").field("types", &names).finish()
    }
}
