//! Registered input device records.
//!
//! An [`InputDevice`] is created once during enumeration and never mutated
//! afterwards. The [`Registry`](crate::registry::Registry) owns every record;
//! callers get `&InputDevice` views by stable index.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Device category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeviceType {
    Keyboard,
    Mouse,
    Joystick,
}

/// Channel counts reported by a joystick handle.
///
/// Always zero for keyboards and mice.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    pub hats: u32,
    pub buttons: u32,
    pub axes: u32,
    pub balls: u32,
}

/// One slot in the registry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputDevice {
    /// Device category.
    pub kind: DeviceType,
    /// Stable slot; equals the device's position in the registry.
    pub index: usize,
    /// Cleaned, deduplicated name (see [`naming`](crate::naming)).
    pub name: String,
    /// Canonical label: `KEYBOARD`, `MOUSE`, `JOYSTICK`, `JOYSTICK #n`.
    pub alias: String,
    /// Joystick channel counts; zero for other kinds.
    pub caps: Capabilities,
}

impl InputDevice {
    pub fn is_joystick(&self) -> bool {
        self.kind == DeviceType::Joystick
    }
}

impl fmt::Display for InputDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {} ({})", self.index, self.alias, self.name)
    }
}

/// Alias assigned to a joystick by its raw backend enumeration position.
///
/// Position 0 is plain `JOYSTICK`; later ones are numbered from 1, so skipped
/// candidates leave visible gaps (`JOYSTICK`, `JOYSTICK #3`, ...).
pub fn joystick_alias(position: usize) -> String {
    if position == 0 {
        "JOYSTICK".to_owned()
    } else {
        format!("JOYSTICK #{}", position + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_joystick_alias_follows_position() {
        assert_eq!(joystick_alias(0), "JOYSTICK");
        assert_eq!(joystick_alias(1), "JOYSTICK #2");
        assert_eq!(joystick_alias(6), "JOYSTICK #7");
    }

    #[test]
    fn test_display() {
        let d = InputDevice {
            kind: DeviceType::Joystick,
            index: 3,
            name: "GENERIC USB JOYSTICK".into(),
            alias: "JOYSTICK".into(),
            caps: Capabilities::default(),
        };
        assert_eq!(d.to_string(), "#3 JOYSTICK (GENERIC USB JOYSTICK)");
        assert!(d.is_joystick());
    }
}
