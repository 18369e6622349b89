//! HID report descriptor walker.
//!
//! Counts the joystick-relevant input channels (axes, buttons, hats) declared
//! by a raw HID report descriptor. It only looks at *Input* main items and
//! ignores constant (padding) fields.
//!
//! ## What counts as what
//! - **Buttons:** any usage on the Button page (`0x09`).
//! - **Hats:** Generic Desktop Hat Switch (`0x01:0x39`).
//! - **Axes:** Generic Desktop `X..=Wheel` (`0x30..=0x38`) and the common
//!   Simulation Controls (rudder, throttle, accelerator, brake, steering).
//!
//! HID has no trackball-style "balls", so `balls` is always 0.

use crate::device::Capabilities;

const PAGE_GENERIC_DESKTOP: u16 = 0x01;
const PAGE_SIMULATION: u16 = 0x02;
const PAGE_BUTTON: u16 = 0x09;

const USAGE_HAT_SWITCH: u16 = 0x39;
const SIMULATION_AXES: &[u16] = &[0xBA, 0xBB, 0xC4, 0xC5, 0xC8];

// Item types.
const TYPE_MAIN: u8 = 0;
const TYPE_GLOBAL: u8 = 1;
const TYPE_LOCAL: u8 = 2;

// Main tags.
const MAIN_INPUT: u8 = 0x8;

// Global tags.
const GLOBAL_USAGE_PAGE: u8 = 0x0;
const GLOBAL_REPORT_COUNT: u8 = 0x9;
const GLOBAL_PUSH: u8 = 0xA;
const GLOBAL_POP: u8 = 0xB;

// Local tags.
const LOCAL_USAGE: u8 = 0x0;
const LOCAL_USAGE_MIN: u8 = 0x1;
const LOCAL_USAGE_MAX: u8 = 0x2;

const INPUT_CONSTANT: u32 = 0x01;

/// Longest usage range we expand, and most fields counted per Input item.
const MAX_RANGE: u32 = 1024;

#[derive(Clone, Copy, Debug, Default)]
struct Globals {
    usage_page: u16,
    report_count: u32,
}

#[derive(Debug, Default)]
struct Locals {
    /// (page, usage) pairs; page is `None` for 1/2-byte usages.
    usages: Vec<(Option<u16>, u16)>,
    min: Option<u32>,
    max: Option<u32>,
}

impl Locals {
    /// Resolved usages for the current main item.
    fn resolve(&self, page: u16) -> Vec<(u16, u16)> {
        let mut out: Vec<(u16, u16)> = self
            .usages
            .iter()
            .map(|&(p, u)| (p.unwrap_or(page), u))
            .collect();
        if let (Some(min), Some(max)) = (self.min, self.max) {
            if max >= min && max - min < MAX_RANGE {
                let range_page = if min > 0xFFFF { (min >> 16) as u16 } else { page };
                out.extend((min..=max).map(|u| (range_page, (u & 0xFFFF) as u16)));
            }
        }
        out
    }
}

fn item_data(bytes: &[u8]) -> u32 {
    bytes
        .iter()
        .enumerate()
        .fold(0u32, |acc, (i, b)| acc | (u32::from(*b) << (8 * i)))
}

fn classify(caps: &mut Capabilities, page: u16, usage: u16) {
    match page {
        PAGE_BUTTON => caps.buttons = caps.buttons.saturating_add(1),
        PAGE_GENERIC_DESKTOP if usage == USAGE_HAT_SWITCH => caps.hats = caps.hats.saturating_add(1),
        PAGE_GENERIC_DESKTOP if (0x30..=0x38).contains(&usage) => caps.axes = caps.axes.saturating_add(1),
        PAGE_SIMULATION if SIMULATION_AXES.contains(&usage) => caps.axes = caps.axes.saturating_add(1),
        _ => {}
    }
}

/// Count the input channels declared by `desc`.
///
/// Truncated or malformed descriptors yield whatever was counted before the
/// damage.
pub fn count_capabilities(desc: &[u8]) -> Capabilities {
    let mut caps = Capabilities::default();
    let mut globals = Globals::default();
    let mut stack: Vec<Globals> = Vec::new();
    let mut locals = Locals::default();

    let mut pos = 0;
    while pos < desc.len() {
        let prefix = desc[pos];

        // Long item: 0xFE, size, tag, data...
        if prefix == 0xFE {
            let Some(&size) = desc.get(pos + 1) else { break };
            pos += 3 + usize::from(size);
            continue;
        }

        let size = match prefix & 0x03 {
            3 => 4,
            n => usize::from(n),
        };
        let Some(data) = desc.get(pos + 1..pos + 1 + size) else {
            break;
        };
        let value = item_data(data);
        let item_type = (prefix >> 2) & 0x03;
        let tag = prefix >> 4;
        pos += 1 + size;

        match item_type {
            TYPE_GLOBAL => match tag {
                GLOBAL_USAGE_PAGE => globals.usage_page = value as u16,
                GLOBAL_REPORT_COUNT => globals.report_count = value,
                GLOBAL_PUSH => stack.push(globals),
                GLOBAL_POP => globals = stack.pop().unwrap_or_default(),
                _ => {}
            },
            TYPE_LOCAL => match tag {
                LOCAL_USAGE if size == 4 => locals.usages.push((Some((value >> 16) as u16), value as u16)),
                LOCAL_USAGE => locals.usages.push((None, value as u16)),
                LOCAL_USAGE_MIN => locals.min = Some(value),
                LOCAL_USAGE_MAX => locals.max = Some(value),
                _ => {}
            },
            TYPE_MAIN => {
                if tag == MAIN_INPUT && value & INPUT_CONSTANT == 0 {
                    count_input(&mut caps, &globals, &locals);
                }
                locals = Locals::default();
            }
            _ => {}
        }
    }
    caps
}

fn count_input(caps: &mut Capabilities, globals: &Globals, locals: &Locals) {
    let usages = locals.resolve(globals.usage_page);
    let Some(&last) = usages.last() else {
        return;
    };

    // Button arrays declare a usage range wider than the report count.
    if usages.iter().all(|&(page, _)| page == PAGE_BUTTON) {
        let n = u32::try_from(usages.len()).unwrap_or(u32::MAX);
        caps.buttons = caps.buttons.saturating_add(n);
        return;
    }

    // One field per report count; the last usage repeats for extra fields.
    for i in 0..globals.report_count.min(MAX_RANGE) as usize {
        let (page, usage) = usages.get(i).copied().unwrap_or(last);
        classify(caps, page, usage);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 12 buttons, a 4-bit hat, and X/Y/Z/Rz as bytes, with padding.
    const GAMEPAD: &[u8] = &[
        0x05, 0x01, // Usage Page (Generic Desktop)
        0x09, 0x05, // Usage (Gamepad)
        0xA1, 0x01, // Collection (Application)
        0x05, 0x09, //   Usage Page (Button)
        0x19, 0x01, //   Usage Minimum (1)
        0x29, 0x0C, //   Usage Maximum (12)
        0x15, 0x00, //   Logical Minimum (0)
        0x25, 0x01, //   Logical Maximum (1)
        0x75, 0x01, //   Report Size (1)
        0x95, 0x0C, //   Report Count (12)
        0x81, 0x02, //   Input (Data, Var, Abs)
        0x75, 0x04, //   Report Size (4)
        0x95, 0x01, //   Report Count (1)
        0x81, 0x03, //   Input (Const)
        0x05, 0x01, //   Usage Page (Generic Desktop)
        0x09, 0x39, //   Usage (Hat switch)
        0x25, 0x07, //   Logical Maximum (7)
        0x81, 0x42, //   Input (Data, Var, Abs, Null)
        0x81, 0x03, //   Input (Const)
        0x09, 0x30, //   Usage (X)
        0x09, 0x31, //   Usage (Y)
        0x09, 0x32, //   Usage (Z)
        0x09, 0x35, //   Usage (Rz)
        0x26, 0xFF, 0x00, // Logical Maximum (255)
        0x75, 0x08, //   Report Size (8)
        0x95, 0x04, //   Report Count (4)
        0x81, 0x02, //   Input (Data, Var, Abs)
        0xC0, // End Collection
    ];

    #[test]
    fn test_gamepad_counts() {
        let caps = count_capabilities(GAMEPAD);
        assert_eq!(caps.buttons, 12);
        assert_eq!(caps.hats, 1);
        assert_eq!(caps.axes, 4);
        assert_eq!(caps.balls, 0);
    }

    #[test]
    fn test_last_usage_repeats() {
        // Usage (X), Report Count (3) -> three X fields.
        let desc = [0x05, 0x01, 0x09, 0x30, 0x95, 0x03, 0x81, 0x02];
        assert_eq!(count_capabilities(&desc).axes, 3);
    }

    #[test]
    fn test_simulation_axes_and_output_ignored() {
        let desc = [
            0x05, 0x02, // Usage Page (Simulation)
            0x09, 0xBA, // Usage (Rudder)
            0x09, 0xBB, // Usage (Throttle)
            0x95, 0x02, // Report Count (2)
            0x81, 0x02, // Input
            0x05, 0x09, 0x19, 0x01, 0x29, 0x04, 0x95, 0x04, //
            0x91, 0x02, // Output: not counted
        ];
        let caps = count_capabilities(&desc);
        assert_eq!(caps.axes, 2);
        assert_eq!(caps.buttons, 0);
    }

    #[test]
    fn test_push_pop_restores_page() {
        let desc = [
            0x05, 0x09, // Usage Page (Button)
            0xA4, // Push
            0x05, 0x01, // Usage Page (Generic Desktop)
            0xB4, // Pop
            0x19, 0x01, 0x29, 0x02, 0x95, 0x02, 0x81, 0x02,
        ];
        assert_eq!(count_capabilities(&desc).buttons, 2);
    }

    #[test]
    fn test_truncated_descriptor() {
        // Cut in the middle of the axis Input item.
        let caps = count_capabilities(&GAMEPAD[..GAMEPAD.len() - 4]);
        assert_eq!(caps.buttons, 12);
        assert_eq!(caps.axes, 0);
        assert_eq!(count_capabilities(&[]), Capabilities::default());
        assert_eq!(count_capabilities(&[0x26, 0xFF]), Capabilities::default());
    }

    #[test]
    fn test_huge_report_count_is_capped() {
        // Usage (X), Report Count (0x40000000), Input.
        let desc = [0x05, 0x01, 0x09, 0x30, 0x97, 0x00, 0x00, 0x00, 0x40, 0x81, 0x02];
        assert_eq!(count_capabilities(&desc).axes, MAX_RANGE);

        let many: Vec<u8> = desc.iter().copied().cycle().take(desc.len() * 8).collect();
        assert_eq!(count_capabilities(&many).axes, 8 * MAX_RANGE);
    }

    #[test]
    fn test_counts_saturate() {
        let mut caps = Capabilities {
            axes: u32::MAX,
            ..Capabilities::default()
        };
        classify(&mut caps, PAGE_GENERIC_DESKTOP, 0x30);
        assert_eq!(caps.axes, u32::MAX);
    }
}
