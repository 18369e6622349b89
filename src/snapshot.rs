//! Owned view of the registry.
//!
//! [`RegistrySnapshot`] is a read-only copy of the slot table at a point in
//! time (typically right after enumeration). It is cheap enough to clone for
//! UI fan-out and serializes to JSON for diagnostics.
//!
//! # Examples
//! ```
//! use stickreg::registry::Registry;
//! use stickreg::{Capabilities, DeviceType};
//!
//! let mut reg = Registry::new();
//! reg.register(DeviceType::Keyboard, "KEYBOARD", "KEYBOARD", Capabilities::default()).unwrap();
//! let snap = reg.snapshot();
//! assert_eq!(snap.by_alias("KEYBOARD").map(|d| d.index), Some(0));
//! println!("{}", snap.to_json().unwrap());
//! ```

use crate::device::InputDevice;
use crate::registry::InstanceId;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrySnapshot {
    /// Devices in slot order.
    pub devices: Vec<InputDevice>,
    pub first_mouse_index: usize,
    pub first_joystick_index: usize,
    /// `(instance_id, slot)` pairs sorted by instance id.
    pub instances: Vec<(InstanceId, usize)>,
}

impl RegistrySnapshot {
    #[inline]
    pub fn get(&self, index: usize) -> Option<&InputDevice> {
        self.devices.get(index)
    }

    /// Look a device up by alias (`"JOYSTICK #2"`), ignoring ASCII case.
    pub fn by_alias(&self, alias: &str) -> Option<&InputDevice> {
        self.devices.iter().find(|d| d.alias.eq_ignore_ascii_case(alias))
    }

    /// Look a device up by its deduplicated name, ignoring ASCII case.
    pub fn by_name(&self, name: &str) -> Option<&InputDevice> {
        self.devices.iter().find(|d| d.name.eq_ignore_ascii_case(name))
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
