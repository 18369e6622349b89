//! Input backends for `stickreg`.
//!
//! A backend owns the native joystick subsystem: it enumerates candidates,
//! reports their GUIDs, and opens handles that the registry keeps alive for
//! the lifetime of an enumeration pass.
//!
//! # Feature flags
//! - **`hid`**: enables [`hid::HidBackend`] on top of `hidapi`.
//!
//! [`virtual_input::VirtualBackend`] is always available; it serves hosts that
//! inject joysticks themselves and the test suite.

use crate::device::Capabilities;
use crate::registry::InstanceId;
use thiserror::Error;

pub mod descriptor;
pub mod virtual_input;

#[cfg(feature = "hid")]
#[cfg_attr(docsrs, doc(cfg(feature = "hid")))]
pub mod hid;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BackendError {
    #[error("joystick subsystem unavailable: {0}")]
    Subsystem(String),

    #[error("failed to open joystick {index}: {reason}")]
    Open { index: usize, reason: String },

    #[error("no joystick at enumeration position {0}")]
    NoSuchJoystick(usize),
}

/// Native joystick subsystem.
///
/// Candidates are addressed by their enumeration position `0..n`, where `n`
/// is the value last returned by [`enumerate_joysticks`](Self::enumerate_joysticks).
pub trait JoystickBackend {
    /// Open device handle; kept alive while the device is registered.
    type Handle;

    fn init_joystick_subsystem(&mut self) -> Result<(), BackendError>;

    fn is_initialized(&self) -> bool;

    /// Refresh the candidate list and return its length.
    fn enumerate_joysticks(&mut self) -> usize;

    /// Hardware identity of a candidate, as 32 lowercase hex characters.
    fn guid_of(&self, index: usize) -> Result<String, BackendError>;

    fn open(&mut self, index: usize) -> Result<Self::Handle, BackendError>;

    /// Raw name as reported by the driver; may be empty.
    fn name_of(&self, handle: &Self::Handle) -> String;

    fn instance_id_of(&self, handle: &Self::Handle) -> InstanceId;

    fn capability_counts(&self, handle: &Self::Handle) -> Capabilities;

    fn close(&mut self, handle: Self::Handle);
}

/// Platform services the orchestrator calls into during startup.
pub trait Platform {
    /// Bring up the video/window layer.
    fn init_video(&mut self);

    /// (Re)build the keymap. Must be safe to call more than once.
    fn initialize_keymap(&mut self);
}

/// Platform that does nothing; for headless hosts and tests.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullPlatform;

impl Platform for NullPlatform {
    fn init_video(&mut self) {}

    fn initialize_keymap(&mut self) {}
}

/// Format a GUID the way SDL does: little-endian 16-bit words, lowercase hex.
///
/// Layout: bus, crc (0), vendor, 0, product, 0, version, 0.
pub fn sdl_guid(bus: u16, vendor: u16, product: u16, version: u16) -> String {
    let words = [bus, 0, vendor, 0, product, 0, version, 0];
    words
        .iter()
        .flat_map(|w| w.to_le_bytes())
        .map(|b| format!("{b:02x}"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sdl_guid_layout() {
        // Speed-Link Competition Pro on USB.
        assert_eq!(
            sdl_guid(0x0003, 0x040b, 0x6533, 0x0100),
            "030000000b0400003365000000010000"
        );
        assert_eq!(sdl_guid(0, 0, 0, 0).len(), 32);
    }
}
