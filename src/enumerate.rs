//! Device discovery: the registry's write path.
//!
//! One enumeration pass fills an empty [`Registry`]:
//!
//! 1. Keyboard at slot 0 (`KEYBOARD`).
//! 2. Mouse slot(s) from the [`MouseIntegration`] collaborator.
//! 3. Every backend joystick candidate, in backend order:
//!    blacklist check → open → name cleanup → instance-id check → register → bind.
//!
//! Nothing here is fatal. A candidate that fails any step is skipped and the
//! pass carries on; once the registry is full the remaining candidates are
//! dropped. Each candidate yields a [`CandidateReport`] saying how far it got,
//! so tooling can explain why a device is missing without re-running discovery.

use crate::backends::JoystickBackend;
use crate::blacklist::Blacklist;
use crate::device::{joystick_alias, Capabilities, DeviceType};
use crate::mouse::MouseIntegration;
use crate::naming::{deduplicate, normalize};
use crate::registry::{InstanceId, Registry};
use log::{info, warn};
use serde::{Deserialize, Serialize};

/// Where a candidate left the pipeline.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DropStage {
    /// GUID matched the blacklist; the device was never opened.
    Blacklisted,

    /// The backend could not report a GUID.
    GuidUnavailable(String),

    /// The backend failed to open the device.
    OpenFailed(String),

    /// Instance id does not fit the instance map; handle closed.
    InstanceOutOfRange { instance_id: InstanceId },

    /// Registry was already full.
    CapacityExceeded,
}

/// Outcome for one backend candidate.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateReport {
    /// Raw backend enumeration position.
    pub position: usize,
    pub guid: Option<String>,
    /// Cleaned, deduplicated name (set once the device was opened).
    pub name: Option<String>,
    pub alias: Option<String>,
    pub instance_id: Option<InstanceId>,
    pub caps: Option<Capabilities>,
    /// Registry slot; `None` if the candidate was dropped.
    pub slot: Option<usize>,
    /// `None` means the device was registered.
    pub drop_stage: Option<DropStage>,
}

impl CandidateReport {
    fn new(position: usize) -> Self {
        Self {
            position,
            guid: None,
            name: None,
            alias: None,
            instance_id: None,
            caps: None,
            slot: None,
            drop_stage: None,
        }
    }

    fn dropped(mut self, stage: DropStage) -> Self {
        self.drop_stage = Some(stage);
        self
    }

    pub fn is_registered(&self) -> bool {
        self.slot.is_some()
    }
}

/// Result of one enumeration pass.
pub struct Enumeration<H> {
    /// Open handles of registered joysticks, with their slots.
    pub handles: Vec<(usize, H)>,
    /// One entry per backend candidate, in enumeration order.
    pub reports: Vec<CandidateReport>,
}

impl<H> Default for Enumeration<H> {
    fn default() -> Self {
        Self {
            handles: Vec::new(),
            reports: Vec::new(),
        }
    }
}

/// Run a full pass into `registry`, which is reset first.
pub fn enumerate_devices<B: JoystickBackend>(
    backend: &mut B,
    mouse: &mut dyn MouseIntegration,
    blacklist: &Blacklist,
    registry: &mut Registry,
) -> Enumeration<B::Handle> {
    registry.reset();

    if let Err(e) = registry.register(DeviceType::Keyboard, "KEYBOARD", "KEYBOARD", Capabilities::default()) {
        warn!("keyboard not registered: {e}");
        return Enumeration::default();
    }

    let mice = mouse.register_mouse_devices(registry);
    info!("registered {mice} mouse device(s)");

    let result = enumerate_joysticks(backend, blacklist, registry);
    info!(
        "input devices: {} total, joysticks from slot {}",
        registry.count(),
        registry.first_joystick_index()
    );
    result
}

/// Append backend joysticks to `registry` from `first_joystick_index` onwards.
pub fn enumerate_joysticks<B: JoystickBackend>(
    backend: &mut B,
    blacklist: &Blacklist,
    registry: &mut Registry,
) -> Enumeration<B::Handle> {
    let mut out = Enumeration::default();

    let total = backend.enumerate_joysticks();
    info!("num joystick devices: {total}");
    if !backend.is_initialized() {
        warn!("joystick subsystem not initialized");
    }

    for position in 0..total {
        if registry.is_full() {
            warn!(
                "reached max number of devices ({}); dropping {} joystick(s)",
                registry.limits().max_devices,
                total - position
            );
            out.reports.extend(
                (position..total).map(|p| CandidateReport::new(p).dropped(DropStage::CapacityExceeded)),
            );
            break;
        }

        let report = register_candidate(backend, blacklist, registry, position, &mut out.handles);
        out.reports.push(report);
    }
    out
}

fn register_candidate<B: JoystickBackend>(
    backend: &mut B,
    blacklist: &Blacklist,
    registry: &mut Registry,
    position: usize,
    handles: &mut Vec<(usize, B::Handle)>,
) -> CandidateReport {
    let mut report = CandidateReport::new(position);

    let guid = match backend.guid_of(position) {
        Ok(guid) => guid,
        Err(e) => {
            warn!("joystick {position}: {e}");
            return report.dropped(DropStage::GuidUnavailable(e.to_string()));
        }
    };
    info!("joystick {position}: guid {guid}");
    report.guid = Some(guid.clone());
    if blacklist.is_blacklisted(&guid) {
        info!("- blacklisted, not opening");
        return report.dropped(DropStage::Blacklisted);
    }

    let handle = match backend.open(position) {
        Ok(handle) => handle,
        Err(e) => {
            warn!("- {e}");
            return report.dropped(DropStage::OpenFailed(e.to_string()));
        }
    };

    let name = deduplicate(&normalize(&backend.name_of(&handle), true), registry.names());
    let alias = joystick_alias(position);
    let caps = backend.capability_counts(&handle);
    let instance_id = backend.instance_id_of(&handle);
    info!("joystick device #{:02} found: {name}", position + 1);
    info!(
        "- {} buttons {} hats {} axes {} balls, instance id {instance_id}",
        caps.buttons, caps.hats, caps.axes, caps.balls
    );
    report.name = Some(name.clone());
    report.alias = Some(alias.clone());
    report.caps = Some(caps);
    report.instance_id = Some(instance_id);

    // Validate before registering so a rejected device never takes a slot.
    if let Err(e) = registry.check_instance(instance_id) {
        warn!("- {e}; closing joystick");
        backend.close(handle);
        return report.dropped(DropStage::InstanceOutOfRange { instance_id });
    }

    let slot = match registry.register(DeviceType::Joystick, name, alias, caps) {
        Ok(slot) => slot,
        Err(e) => {
            warn!("- {e}; closing joystick");
            backend.close(handle);
            return report.dropped(DropStage::CapacityExceeded);
        }
    };
    // The id passed check_instance and the slot was just created.
    let bound = registry.bind_instance(instance_id, slot);
    debug_assert!(bound.is_ok(), "binding a checked instance id failed: {bound:?}");

    report.slot = Some(slot);
    handles.push((slot, handle));
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::virtual_input::{VirtualBackend, VirtualHandle, VirtualJoystick};
    use crate::mouse::{NoMouse, SystemMouse};
    use crate::registry::Limits;

    const BAD_GUID: &str = "efbeedfe000000000000504944564944";

    fn backend(joysticks: Vec<VirtualJoystick>) -> VirtualBackend {
        let mut backend = joysticks
            .into_iter()
            .fold(VirtualBackend::new(), VirtualBackend::with_joystick);
        backend.init_joystick_subsystem().unwrap();
        backend
    }

    fn run(backend: &mut VirtualBackend, registry: &mut Registry) -> Enumeration<VirtualHandle> {
        enumerate_devices(backend, &mut SystemMouse::new(), &Blacklist::builtin(), registry)
    }

    #[test]
    fn test_no_joysticks() {
        let mut be = backend(vec![]);
        let mut reg = Registry::new();
        let result = run(&mut be, &mut reg);

        assert!(result.reports.is_empty());
        assert_eq!(reg.count(), 2);
        assert_eq!(reg.device(0).unwrap().kind, DeviceType::Keyboard);
        assert_eq!(reg.device(0).unwrap().alias, "KEYBOARD");
        assert_eq!(reg.device(1).unwrap().kind, DeviceType::Mouse);
        assert_eq!(reg.first_joystick_index(), reg.count());
    }

    #[test]
    fn test_alias_and_unnamed() {
        let mut be = backend(vec![
            VirtualJoystick::new("Generic USB Joystick"),
            VirtualJoystick::new(""),
        ]);
        let mut reg = Registry::new();
        run(&mut be, &mut reg);

        let joys = reg.joysticks();
        assert_eq!(joys.len(), 2);
        assert_eq!(joys[0].alias, "JOYSTICK");
        assert_eq!(joys[0].name, "GENERIC USB JOYSTICK");
        assert_eq!(joys[1].alias, "JOYSTICK #2");
        assert_eq!(joys[1].name, "UNNAMED");
    }

    #[test]
    fn test_blacklisted_consumes_no_slot_but_keeps_alias_gap() {
        let mut be = backend(vec![
            VirtualJoystick::new("Virtual HID").guid(BAD_GUID),
            VirtualJoystick::new("Pad"),
        ]);
        let mut reg = Registry::new();
        let result = run(&mut be, &mut reg);

        assert_eq!(reg.joysticks().len(), 1);
        assert_eq!(reg.joysticks()[0].index, 2);
        assert_eq!(reg.joysticks()[0].alias, "JOYSTICK #2");
        assert_eq!(result.reports[0].drop_stage, Some(DropStage::Blacklisted));
        // Never opened.
        assert_eq!(be.open_calls(), &[1]);
    }

    #[test]
    fn test_open_failure_skipped() {
        let mut be = backend(vec![
            VirtualJoystick::new("Broken").fail_open(),
            VirtualJoystick::new("Pad"),
        ]);
        let mut reg = Registry::new();
        let result = run(&mut be, &mut reg);

        assert!(matches!(result.reports[0].drop_stage, Some(DropStage::OpenFailed(_))));
        assert_eq!(result.reports[1].slot, Some(2));
        assert_eq!(reg.count(), 3);
    }

    #[test]
    fn test_out_of_range_instance_closed_without_slot() {
        let mut be = backend(vec![
            VirtualJoystick::new("Far").instance_id(5),
            VirtualJoystick::new("Near").instance_id(1),
        ]);
        let mut reg = Registry::with_limits(Limits {
            max_instance_ids: 4,
            ..Limits::default()
        });
        let result = run(&mut be, &mut reg);

        assert_eq!(
            result.reports[0].drop_stage,
            Some(DropStage::InstanceOutOfRange { instance_id: 5 })
        );
        assert_eq!(reg.count(), 3);
        assert_eq!(reg.resolve(1), Some(2));
        assert_eq!(reg.resolve(5), None);
        assert_eq!(be.open_handles(), 1);
        assert_eq!(result.handles.len(), 1);
    }

    #[test]
    fn test_every_registered_joystick_resolves() {
        let mut be = backend(vec![
            VirtualJoystick::new("A").instance_id(7),
            VirtualJoystick::new("B").instance_id(3),
        ]);
        let mut reg = Registry::new();
        let result = run(&mut be, &mut reg);

        for report in &result.reports {
            let id = report.instance_id.unwrap();
            assert_eq!(reg.resolve(id), report.slot);
        }
        assert_eq!(reg.resolve(7), Some(2));
        assert_eq!(reg.resolve(3), Some(3));
    }

    #[test]
    fn test_capacity_stops_pass() {
        let pads = (0..4).map(|i| VirtualJoystick::new(&format!("Pad {i}"))).collect();
        let mut be = backend(pads);
        let mut reg = Registry::with_limits(Limits {
            max_devices: 4,
            ..Limits::default()
        });
        let result = run(&mut be, &mut reg);

        assert_eq!(reg.count(), 4);
        assert_eq!(result.reports.len(), 4);
        assert!(result.reports[..2].iter().all(CandidateReport::is_registered));
        assert!(result.reports[2..]
            .iter()
            .all(|r| r.drop_stage == Some(DropStage::CapacityExceeded)));
        // Dropped candidates are never opened.
        assert_eq!(be.open_calls(), &[0, 1]);
    }

    #[test]
    fn test_duplicate_names_made_unique() {
        let mut be = backend(vec![
            VirtualJoystick::new("XInput Controller #1"),
            VirtualJoystick::new("XInput Controller #2"),
        ]);
        let mut reg = Registry::new();
        run(&mut be, &mut reg);

        let names: Vec<&str> = reg.joysticks().iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["XINPUT CONTROLLER", "XINPUT CONTROLLER #2"]);
    }

    #[test]
    fn test_joystick_named_like_keyboard_deduplicated() {
        let mut be = backend(vec![VirtualJoystick::new("keyboard")]);
        let mut reg = Registry::new();
        enumerate_devices(&mut be, &mut NoMouse, &Blacklist::empty(), &mut reg);

        assert_eq!(reg.first_joystick_index(), 1);
        assert_eq!(reg.device(1).unwrap().name, "KEYBOARD #2");
    }

    #[test]
    fn test_stable_indices_contiguous() {
        let mut be = backend(vec![
            VirtualJoystick::new("A"),
            VirtualJoystick::new("B").fail_open(),
            VirtualJoystick::new("C").guid(BAD_GUID),
            VirtualJoystick::new("D"),
            VirtualJoystick::new("E"),
        ]);
        let mut reg = Registry::new();
        run(&mut be, &mut reg);

        let first = reg.first_joystick_index();
        for (offset, dev) in reg.joysticks().iter().enumerate() {
            assert_eq!(dev.index, first + offset);
        }
        assert_eq!(reg.joysticks().len(), 3);
    }

    #[test]
    fn test_reports_serialize() {
        let mut be = backend(vec![VirtualJoystick::new("Pad")]);
        let mut reg = Registry::new();
        let result = run(&mut be, &mut reg);
        let json = serde_json::to_string(&result.reports).unwrap();
        assert!(json.contains("\"alias\":\"JOYSTICK\""));
    }
}
