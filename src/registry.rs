//! Device registry: the authoritative slot table.
//!
//! The registry hands out stable indices in registration order and keeps a
//! bounded map from backend instance ids to those indices. Layout is fixed:
//!
//! ```text
//! slot 0                      keyboard
//! slot first_mouse_index..    mouse device(s)
//! slot first_joystick_index.. joysticks, contiguous up to count()
//! ```
//!
//! Writes happen only during an enumeration pass; a new pass starts again
//! from slot 0 via [`Registry::reset`].

use crate::device::{Capabilities, DeviceType, InputDevice};
use crate::snapshot::RegistrySnapshot;
use std::collections::HashMap;
use thiserror::Error;

/// Default maximum number of registered devices.
pub const MAX_DEVICES: usize = 16;

/// Default size of the instance-id map; ids at or above this are refused.
pub const MAX_INSTANCE_IDS: u32 = 64;

/// Backend-assigned joystick instance id.
pub type InstanceId = u32;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("registry full ({capacity} devices)")]
    CapacityExceeded { capacity: usize },

    #[error("instance id {instance_id} outside map capacity {capacity}")]
    InstanceOutOfRange { instance_id: InstanceId, capacity: u32 },

    #[error("instance id {0} is not bound to any slot")]
    UnboundInstance(InstanceId),

    #[error("no device at index {0}")]
    UnknownIndex(usize),

    #[error("{kind:?} cannot be registered at slot {index}")]
    OutOfOrder { kind: DeviceType, index: usize },
}

/// Size limits for a [`Registry`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Limits {
    pub max_devices: usize,
    pub max_instance_ids: u32,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_devices: MAX_DEVICES,
            max_instance_ids: MAX_INSTANCE_IDS,
        }
    }
}

#[derive(Debug, Default)]
pub struct Registry {
    limits: Limits,
    devices: Vec<InputDevice>,
    instances: HashMap<InstanceId, usize>,
    first_mouse_index: usize,
    first_joystick_index: usize,
}

impl Registry {
    pub fn new() -> Self {
        Self::with_limits(Limits::default())
    }

    pub fn with_limits(limits: Limits) -> Self {
        Self {
            limits,
            devices: Vec::with_capacity(limits.max_devices),
            instances: HashMap::new(),
            first_mouse_index: 0,
            first_joystick_index: 0,
        }
    }

    pub fn limits(&self) -> Limits {
        self.limits
    }

    /// Drop every device and binding; the next registration gets slot 0.
    pub fn reset(&mut self) {
        self.devices.clear();
        self.instances.clear();
        self.first_mouse_index = 0;
        self.first_joystick_index = 0;
    }

    /// Append a device at the next free slot.
    ///
    /// Slot order is enforced: the keyboard must take slot 0, and no mouse may
    /// follow a joystick. On error the registry is unchanged.
    pub fn register(
        &mut self,
        kind: DeviceType,
        name: impl Into<String>,
        alias: impl Into<String>,
        caps: Capabilities,
    ) -> Result<usize, RegistryError> {
        let index = self.devices.len();
        if index >= self.limits.max_devices {
            return Err(RegistryError::CapacityExceeded {
                capacity: self.limits.max_devices,
            });
        }

        let in_order = match kind {
            DeviceType::Keyboard => index == 0,
            DeviceType::Mouse => index > 0 && !self.devices.iter().any(InputDevice::is_joystick),
            DeviceType::Joystick => index > 0,
        };
        if !in_order {
            return Err(RegistryError::OutOfOrder { kind, index });
        }

        let caps = match kind {
            DeviceType::Joystick => caps,
            _ => Capabilities::default(),
        };

        if kind == DeviceType::Keyboard {
            self.first_mouse_index = 1;
            self.first_joystick_index = 1;
        }
        self.devices.push(InputDevice {
            kind,
            index,
            name: name.into(),
            alias: alias.into(),
            caps,
        });
        if kind != DeviceType::Joystick && self.first_joystick_index <= index {
            // Joysticks start right after the last non-joystick slot.
            self.first_joystick_index = index + 1;
        }
        Ok(index)
    }

    /// Check that `instance_id` fits the map, without binding anything.
    ///
    /// Enumeration calls this before [`register`](Self::register) so an
    /// unusable joystick never takes a slot.
    pub fn check_instance(&self, instance_id: InstanceId) -> Result<(), RegistryError> {
        if instance_id >= self.limits.max_instance_ids {
            return Err(RegistryError::InstanceOutOfRange {
                instance_id,
                capacity: self.limits.max_instance_ids,
            });
        }
        Ok(())
    }

    /// Map a backend instance id to a registered slot.
    pub fn bind_instance(&mut self, instance_id: InstanceId, index: usize) -> Result<(), RegistryError> {
        self.check_instance(instance_id)?;
        if index >= self.devices.len() {
            return Err(RegistryError::UnknownIndex(index));
        }
        self.instances.insert(instance_id, index);
        Ok(())
    }

    /// Slot bound to `instance_id`, if any.
    pub fn resolve(&self, instance_id: InstanceId) -> Option<usize> {
        self.instances.get(&instance_id).copied()
    }

    pub fn count(&self) -> usize {
        self.devices.len()
    }

    pub fn is_full(&self) -> bool {
        self.devices.len() >= self.limits.max_devices
    }

    pub fn device(&self, index: usize) -> Option<&InputDevice> {
        self.devices.get(index)
    }

    pub fn devices(&self) -> &[InputDevice] {
        &self.devices
    }

    /// Registered joysticks, in slot order.
    pub fn joysticks(&self) -> &[InputDevice] {
        let start = self.first_joystick_index.min(self.devices.len());
        &self.devices[start..]
    }

    /// Names of every registered device, for deduplication.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.devices.iter().map(|d| d.name.as_str())
    }

    /// Slot of the keyboard. Always 0.
    pub fn first_keyboard_index(&self) -> usize {
        0
    }

    pub fn first_mouse_index(&self) -> usize {
        self.first_mouse_index
    }

    pub fn first_joystick_index(&self) -> usize {
        self.first_joystick_index
    }

    /// Owned copy of the current table, suitable for logging or persistence.
    pub fn snapshot(&self) -> RegistrySnapshot {
        let mut instances: Vec<(InstanceId, usize)> =
            self.instances.iter().map(|(&id, &slot)| (id, slot)).collect();
        instances.sort_unstable();
        RegistrySnapshot {
            devices: self.devices.clone(),
            first_mouse_index: self.first_mouse_index,
            first_joystick_index: self.first_joystick_index,
            instances,
        }
    }
}
