//! In-memory joystick backend.
//!
//! [`VirtualBackend`] holds a scripted list of joysticks. Hosts that receive
//! joystick data from somewhere other than a local driver (network play,
//! replays) can register them through it; tests use it to model awkward
//! hardware: failing opens, blacklisted GUIDs, large instance ids.
//!
//! Instance ids are handed out like SDL does: a counter starting at 0,
//! advanced when a joystick is attached, unless it pins its own id. Closing
//! and reopening a joystick keeps its id.

use crate::backends::{BackendError, JoystickBackend};
use crate::device::Capabilities;
use crate::registry::InstanceId;

/// A scripted joystick.
#[derive(Clone, Debug, Default)]
pub struct VirtualJoystick {
    name: String,
    guid: String,
    instance_id: Option<InstanceId>,
    caps: Capabilities,
    fail_open: bool,
}

impl VirtualJoystick {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            guid: "03000000000000000000000000000000".to_string(),
            caps: Capabilities {
                hats: 1,
                buttons: 8,
                axes: 2,
                balls: 0,
            },
            ..Self::default()
        }
    }

    pub fn guid(mut self, guid: &str) -> Self {
        self.guid = guid.to_string();
        self
    }

    /// Pin the instance id instead of taking the next counter value.
    pub fn instance_id(mut self, id: InstanceId) -> Self {
        self.instance_id = Some(id);
        self
    }

    pub fn caps(mut self, caps: Capabilities) -> Self {
        self.caps = caps;
        self
    }

    /// Make [`JoystickBackend::open`] fail for this joystick.
    pub fn fail_open(mut self) -> Self {
        self.fail_open = true;
        self
    }
}

/// Handle to an opened virtual joystick.
#[derive(Debug, PartialEq, Eq)]
pub struct VirtualHandle {
    position: usize,
    instance_id: InstanceId,
}

impl VirtualHandle {
    pub fn position(&self) -> usize {
        self.position
    }
}

#[derive(Debug, Default)]
pub struct VirtualBackend {
    /// Attached joysticks with the instance id each got on attach.
    joysticks: Vec<(VirtualJoystick, InstanceId)>,
    initialized: bool,
    init_error: Option<String>,
    next_instance_id: InstanceId,
    open_handles: usize,
    opened: Vec<usize>,
}

impl VirtualBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_joystick(mut self, joystick: VirtualJoystick) -> Self {
        self.attach(joystick);
        self
    }

    /// Make subsystem initialization fail with `reason`.
    pub fn with_init_error(mut self, reason: &str) -> Self {
        self.init_error = Some(reason.to_string());
        self
    }

    /// Plug in another joystick; visible after the next enumeration.
    pub fn attach(&mut self, joystick: VirtualJoystick) {
        let instance_id = match joystick.instance_id {
            Some(id) => id,
            None => {
                let id = self.next_instance_id;
                self.next_instance_id += 1;
                id
            }
        };
        self.joysticks.push((joystick, instance_id));
    }

    /// Unplug the joystick at `position`. Its instance id is not reused.
    pub fn detach(&mut self, position: usize) -> Option<VirtualJoystick> {
        (position < self.joysticks.len()).then(|| self.joysticks.remove(position).0)
    }

    /// Handles opened and not yet closed.
    pub fn open_handles(&self) -> usize {
        self.open_handles
    }

    /// Enumeration positions passed to `open`, in call order.
    pub fn open_calls(&self) -> &[usize] {
        &self.opened
    }

    fn joystick(&self, index: usize) -> Result<&(VirtualJoystick, InstanceId), BackendError> {
        self.joysticks
            .get(index)
            .ok_or(BackendError::NoSuchJoystick(index))
    }
}

impl JoystickBackend for VirtualBackend {
    type Handle = VirtualHandle;

    fn init_joystick_subsystem(&mut self) -> Result<(), BackendError> {
        if let Some(reason) = &self.init_error {
            return Err(BackendError::Subsystem(reason.clone()));
        }
        self.initialized = true;
        Ok(())
    }

    fn is_initialized(&self) -> bool {
        self.initialized
    }

    fn enumerate_joysticks(&mut self) -> usize {
        if self.initialized {
            self.joysticks.len()
        } else {
            0
        }
    }

    fn guid_of(&self, index: usize) -> Result<String, BackendError> {
        Ok(self.joystick(index)?.0.guid.clone())
    }

    fn open(&mut self, index: usize) -> Result<VirtualHandle, BackendError> {
        self.opened.push(index);
        let (joystick, instance_id) = self.joystick(index)?;
        if joystick.fail_open {
            return Err(BackendError::Open {
                index,
                reason: "device refused to open".into(),
            });
        }
        let instance_id = *instance_id;
        self.open_handles += 1;
        Ok(VirtualHandle {
            position: index,
            instance_id,
        })
    }

    fn name_of(&self, handle: &VirtualHandle) -> String {
        self.joysticks
            .get(handle.position)
            .map(|(j, _)| j.name.clone())
            .unwrap_or_default()
    }

    fn instance_id_of(&self, handle: &VirtualHandle) -> InstanceId {
        handle.instance_id
    }

    fn capability_counts(&self, handle: &VirtualHandle) -> Capabilities {
        self.joysticks
            .get(handle.position)
            .map(|(j, _)| j.caps)
            .unwrap_or_default()
    }

    fn close(&mut self, _handle: VirtualHandle) {
        self.open_handles = self.open_handles.saturating_sub(1);
    }
}
