// Input configuration: tunables and remappable bindings

use super::action::{Binding, InputSource};
use std::collections::HashMap;

/// Tunable input settings for the local player
#[derive(Debug, Clone, PartialEq)]
pub struct InputSettings {
    /// Sensitivity multiplier for moving the camera around
    pub look_sensitivity: f32,
    /// Additional sensitivity multiplier applied on web builds
    pub webgl_look_sensitivity_multiplier: f32,
    /// Limit above which an analog trigger counts as pressed
    pub trigger_axis_threshold: f32,
    /// Flip the vertical look axis
    pub invert_y_axis: bool,
    /// Flip the horizontal look axis
    pub invert_x_axis: bool,
}

pub const DEFAULT_SETTINGS: InputSettings = InputSettings {
    look_sensitivity: 1.0,
    webgl_look_sensitivity_multiplier: 0.25,
    trigger_axis_threshold: 0.4,
    invert_y_axis: false,
    invert_x_axis: false,
};

impl Default for InputSettings {
    fn default() -> Self {
        DEFAULT_SETTINGS
    }
}

impl InputSettings {
    /// Look sensitivity with the platform multiplier applied
    pub fn effective_look_sensitivity(&self) -> f32 {
        if cfg!(target_arch = "wasm32") {
            self.look_sensitivity * self.webgl_look_sensitivity_multiplier
        } else {
            self.look_sensitivity
        }
    }
}

/// Maps input sources (keys/buttons) to bindings
#[derive(Debug, Clone)]
pub struct InputConfig {
    /// Mapping from input sources to bindings
    bindings: HashMap<InputSource, Binding>,

    /// Reverse mapping for quick lookups (binding -> all sources)
    binding_to_sources: HashMap<Binding, Vec<InputSource>>,
}

impl InputConfig {
    /// Create an empty configuration
    pub fn new() -> Self {
        Self {
            bindings: HashMap::new(),
            binding_to_sources: HashMap::new(),
        }
    }

    /// Create a configuration from a list of bindings
    pub fn from_bindings(bindings: Vec<(InputSource, Binding)>) -> Self {
        let mut config = Self::new();
        for (source, binding) in bindings {
            config.bind(source, binding);
        }
        config
    }

    /// Bind an input source, replacing whatever it drove before
    pub fn bind(&mut self, source: InputSource, binding: Binding) {
        self.unbind_source(source);

        self.bindings.insert(source, binding);
        self.binding_to_sources
            .entry(binding)
            .or_default()
            .push(source);
    }

    /// Unbind an input source
    pub fn unbind_source(&mut self, source: InputSource) {
        if let Some(binding) = self.bindings.remove(&source) {
            if let Some(sources) = self.binding_to_sources.get_mut(&binding) {
                sources.retain(|s| *s != source);
                if sources.is_empty() {
                    self.binding_to_sources.remove(&binding);
                }
            }
        }
    }

    /// Unbind all sources for a binding
    #[allow(dead_code)]
    pub fn unbind(&mut self, binding: Binding) {
        if let Some(sources) = self.binding_to_sources.remove(&binding) {
            for source in sources {
                self.bindings.remove(&source);
            }
        }
    }

    /// Get the binding driven by an input source
    pub fn get_binding(&self, source: InputSource) -> Option<Binding> {
        self.bindings.get(&source).copied()
    }

    /// Get all input sources driving a binding
    #[allow(dead_code)]
    pub fn get_sources(&self, binding: Binding) -> Vec<InputSource> {
        self.binding_to_sources
            .get(&binding)
            .cloned()
            .unwrap_or_default()
    }

    /// Check if a binding has any sources
    #[allow(dead_code)]
    pub fn has_binding(&self, binding: Binding) -> bool {
        self.binding_to_sources.contains_key(&binding)
    }

    /// Clear all bindings
    #[allow(dead_code)]
    pub fn clear(&mut self) {
        self.bindings.clear();
        self.binding_to_sources.clear();
    }

    /// Reset to the default keyboard/mouse layout
    #[allow(dead_code)]
    pub fn reset_to_defaults(&mut self) {
        self.clear();
        for (source, binding) in super::action::default_bindings() {
            self.bind(source, binding);
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self::from_bindings(super::action::default_bindings())
    }
}
