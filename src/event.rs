//! Input events as they travel from the backend to the consumer.
//!
//! The router does not interpret payloads; it only needs to tell keyboard
//! events apart (they go through shortcut interception first).
//!
//! ## Value conventions
//! - **Keys:** `key` is the backend's key code, `modifiers` its modifier mask.
//! - **Axes:** raw signed backend values (`-32768..=32767` for SDL-style backends).
//! - **Hats:** backend bitmask, `0` = centered.
//! - **Mouse:** relative motion in raw counts.

use std::time::Instant;

/// Event payload.
#[derive(Clone, Debug, PartialEq)]
pub enum InputKind {
    KeyDown { key: u32, modifiers: u16 },
    KeyUp { key: u32, modifiers: u16 },

    MouseMotion { dx: i32, dy: i32 },
    MouseButtonDown { button: u8 },
    MouseButtonUp { button: u8 },
    MouseWheel { dx: i32, dy: i32 },

    AxisMoved { axis: u16, value: i16 },
    ButtonPressed { button: u16 },
    ButtonReleased { button: u16 },
    HatChanged { hat: u16, value: u8 },
    BallMoved { ball: u16, dx: i16, dy: i16 },

    /// Window close / application quit request.
    Quit,
}

impl InputKind {
    /// Key-down or key-up.
    pub fn is_key(&self) -> bool {
        matches!(self, InputKind::KeyDown { .. } | InputKind::KeyUp { .. })
    }
}

/// Timestamped event from one registered device.
#[derive(Clone, Debug)]
pub struct InputEvent {
    /// Capture time (monotonic).
    pub at: Instant,
    /// Stable registry index of the originating device.
    pub device: usize,
    pub kind: InputKind,
}

impl InputEvent {
    pub fn new(device: usize, kind: InputKind) -> Self {
        Self {
            at: Instant::now(),
            device,
            kind,
        }
    }

    pub fn is_key(&self) -> bool {
        self.kind.is_key()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_key_events_are_keys() {
        assert!(InputEvent::new(0, InputKind::KeyDown { key: 4, modifiers: 0 }).is_key());
        assert!(InputEvent::new(0, InputKind::KeyUp { key: 4, modifiers: 0 }).is_key());
        assert!(!InputEvent::new(2, InputKind::ButtonPressed { button: 0 }).is_key());
        assert!(!InputEvent::new(1, InputKind::MouseButtonDown { button: 1 }).is_key());
        assert!(!InputEvent::new(0, InputKind::Quit).is_key());
    }
}
