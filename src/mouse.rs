//! Mouse registration seam.
//!
//! Mouse capture and integration policy live in the frontend; the registry
//! only needs the mouse slot(s) filled in right after the keyboard and to know
//! whether integration is active (it decides the `"auto"` cursor mode).

use crate::config::InputOptions;
use crate::device::{Capabilities, DeviceType};
use crate::registry::Registry;
use log::warn;

pub trait MouseIntegration {
    /// Apply startup options before any device is registered.
    fn configure(&mut self, _options: &InputOptions) {}

    /// Register mouse device(s); returns how many were added.
    fn register_mouse_devices(&mut self, registry: &mut Registry) -> usize;

    fn is_integration_active(&self) -> bool;
}

/// One system mouse, registered as `MOUSE`.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemMouse {
    integration: bool,
}

impl SystemMouse {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MouseIntegration for SystemMouse {
    fn configure(&mut self, options: &InputOptions) {
        self.integration = options.mouse_integration;
    }

    fn register_mouse_devices(&mut self, registry: &mut Registry) -> usize {
        match registry.register(DeviceType::Mouse, "MOUSE", "MOUSE", Capabilities::default()) {
            Ok(_) => 1,
            Err(e) => {
                warn!("mouse not registered: {e}");
                0
            }
        }
    }

    fn is_integration_active(&self) -> bool {
        self.integration
    }
}

/// Registers no mouse at all.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoMouse;

impl MouseIntegration for NoMouse {
    fn register_mouse_devices(&mut self, _registry: &mut Registry) -> usize {
        0
    }

    fn is_integration_active(&self) -> bool {
        false
    }
}
