//! `hidapi` joystick backend.
//!
//! Enumerates HID interfaces that look like game controls, derives an
//! SDL-style GUID from their bus/vendor/product/release numbers, and counts
//! channels from the report descriptor (see [`descriptor`](super::descriptor)).
//!
//! Instance ids are assigned per device path when a device first shows up in
//! an enumeration, and kept until it disappears from one. Reopening a device
//! keeps its id; unplugging and replugging gives it a new one. The counter
//! never goes backwards, which is how SDL numbers joysticks too.

use crate::backends::descriptor::count_capabilities;
use crate::backends::{sdl_guid, BackendError, JoystickBackend};
use crate::device::Capabilities;
use crate::registry::InstanceId;
use hidapi::{BusType, DeviceInfo, HidApi, HidDevice};
use log::{debug, warn};
use std::collections::HashMap;
use std::ffi::{CStr, CString};

/// Large enough for any descriptor seen in practice (HID caps it at 4 KiB).
const MAX_DESCRIPTOR_LEN: usize = 4096;

/// Open HID joystick.
pub struct HidJoystick {
    // Kept open so the OS keeps delivering reports while registered.
    _raw: HidDevice,
    name: String,
    instance_id: InstanceId,
    caps: Capabilities,
}

/// Instance ids of the devices present in the last enumeration, by path.
#[derive(Debug, Default)]
struct AttachedIds {
    ids: HashMap<CString, InstanceId>,
    next: InstanceId,
}

impl AttachedIds {
    /// Forget paths that are gone and number the new ones.
    fn sync<'a>(&mut self, present: impl IntoIterator<Item = &'a CStr>) {
        let mut current = HashMap::new();
        for path in present {
            let id = match self.ids.get(path) {
                Some(&id) => id,
                None => {
                    let id = self.next;
                    self.next += 1;
                    id
                }
            };
            current.insert(path.to_owned(), id);
        }
        self.ids = current;
    }

    fn get(&self, path: &CStr) -> Option<InstanceId> {
        self.ids.get(path).copied()
    }
}

#[derive(Default)]
pub struct HidBackend {
    api: Option<HidApi>,
    candidates: Vec<DeviceInfo>,
    attached: AttachedIds,
}

/// Keep interfaces carrying game controls; drop plain mice/keyboards.
///
/// - `0x01` Generic Desktop: Joystick (`0x04`), Gamepad (`0x05`), Multi-axis (`0x08`)
/// - `0x02` Simulation Controls (pedals, throttles)
fn accept_usage(usage_page: u16, usage: u16) -> bool {
    match (usage_page, usage) {
        (0x01, 0x04 | 0x05 | 0x08) => true,
        (0x02, _) => true,
        _ => false,
    }
}

fn accept_device(info: &DeviceInfo) -> bool {
    accept_usage(info.usage_page(), info.usage())
}

fn bus_code(bus: BusType) -> u16 {
    match bus {
        BusType::Usb => 0x03,
        BusType::Bluetooth => 0x05,
        BusType::I2c => 0x18,
        BusType::Spi => 0x1C,
        _ => 0x00,
    }
}

impl HidBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn api(&self) -> Result<&HidApi, BackendError> {
        self.api
            .as_ref()
            .ok_or_else(|| BackendError::Subsystem("hidapi not initialized".into()))
    }

    fn candidate(&self, index: usize) -> Result<&DeviceInfo, BackendError> {
        self.candidates
            .get(index)
            .ok_or(BackendError::NoSuchJoystick(index))
    }
}

impl JoystickBackend for HidBackend {
    type Handle = HidJoystick;

    fn init_joystick_subsystem(&mut self) -> Result<(), BackendError> {
        if self.api.is_some() {
            return Ok(());
        }
        let api = HidApi::new().map_err(|e| BackendError::Subsystem(e.to_string()))?;
        self.api = Some(api);
        Ok(())
    }

    fn is_initialized(&self) -> bool {
        self.api.is_some()
    }

    fn enumerate_joysticks(&mut self) -> usize {
        let Some(api) = self.api.as_mut() else {
            return 0;
        };
        if let Err(e) = api.refresh_devices() {
            warn!("hid: device refresh failed: {e}");
        }
        self.candidates = api.device_list().filter(|i| accept_device(i)).cloned().collect();
        self.attached.sync(self.candidates.iter().map(DeviceInfo::path));
        self.candidates.len()
    }

    fn guid_of(&self, index: usize) -> Result<String, BackendError> {
        let info = self.candidate(index)?;
        Ok(sdl_guid(
            bus_code(info.bus_type()),
            info.vendor_id(),
            info.product_id(),
            info.release_number(),
        ))
    }

    fn open(&mut self, index: usize) -> Result<HidJoystick, BackendError> {
        let api = self.api()?;
        let info = self.candidate(index)?;
        let instance_id = self
            .attached
            .get(info.path())
            .ok_or(BackendError::NoSuchJoystick(index))?;
        let raw = info.open_device(api).map_err(|e| BackendError::Open {
            index,
            reason: e.to_string(),
        })?;

        let mut buf = vec![0u8; MAX_DESCRIPTOR_LEN];
        let caps = match raw.get_report_descriptor(&mut buf) {
            Ok(len) => count_capabilities(&buf[..len.min(buf.len())]),
            Err(e) => {
                debug!("hid: no report descriptor for {:?}: {e}", info.path());
                Capabilities::default()
            }
        };
        let name = info.product_string().unwrap_or_default().to_string();
        Ok(HidJoystick {
            _raw: raw,
            name,
            instance_id,
            caps,
        })
    }

    fn name_of(&self, handle: &HidJoystick) -> String {
        handle.name.clone()
    }

    fn instance_id_of(&self, handle: &HidJoystick) -> InstanceId {
        handle.instance_id
    }

    fn capability_counts(&self, handle: &HidJoystick) -> Capabilities {
        handle.caps
    }

    fn close(&mut self, handle: HidJoystick) {
        drop(handle);
    }
}
