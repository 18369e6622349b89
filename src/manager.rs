//! Startup orchestration and the input context.
//!
//! [`InputManager`] owns everything the input layer keeps for the life of the
//! process: the registry, the open joystick handles, the event router and
//! the options read at startup. There are no globals; the frontend holds one
//! manager and passes it around.
//!
//! # Example
//! ```
//! use stickreg::backends::virtual_input::{VirtualBackend, VirtualJoystick};
//! use stickreg::config::NoConfig;
//! use stickreg::{InputEvent, InputKind, InputManager};
//!
//! let backend = VirtualBackend::new().with_joystick(VirtualJoystick::new("Generic USB Joystick"));
//! let mut mgr = InputManager::new(backend);
//! mgr.init_with_env(&NoConfig, None);
//!
//! let joy = mgr.registry().joysticks()[0].clone();
//! assert_eq!(joy.alias, "JOYSTICK");
//!
//! mgr.set_consumer(|ev: &InputEvent| println!("{:?}", ev.kind));
//! mgr.post_from_instance(0, InputKind::ButtonPressed { button: 0 }).unwrap();
//! ```

use crate::backends::{JoystickBackend, NullPlatform, Platform};
use crate::blacklist::Blacklist;
use crate::config::{ConfigStore, CursorMode, InputOptions, OPTION_JOYSTICK_BLACKLIST};
use crate::device::InputDevice;
use crate::enumerate::{enumerate_devices, CandidateReport};
use crate::event::{InputEvent, InputKind};
use crate::eventbus::{EventRouter, InputListener, RouterStats, ShortcutHandler};
use crate::mouse::{MouseIntegration, SystemMouse};
use crate::registry::{InstanceId, Limits, Registry, RegistryError};
use log::{debug, info, warn};

/// Initialization state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InitState {
    Uninitialized,
    Ready,
}

pub struct InputManager<B: JoystickBackend> {
    state: InitState,
    backend: B,
    mouse: Box<dyn MouseIntegration>,
    platform: Box<dyn Platform>,
    blacklist: Blacklist,
    registry: Registry,
    router: EventRouter,
    options: InputOptions,
    handles: Vec<(usize, B::Handle)>,
    reports: Vec<CandidateReport>,
}

impl<B: JoystickBackend> InputManager<B> {
    /// Manager with a [`SystemMouse`], no platform layer, the built-in
    /// blacklist and default registry limits.
    pub fn new(backend: B) -> Self {
        Self {
            state: InitState::Uninitialized,
            backend,
            mouse: Box::new(SystemMouse::new()),
            platform: Box::new(NullPlatform),
            blacklist: Blacklist::builtin(),
            registry: Registry::new(),
            router: EventRouter::new(),
            options: InputOptions::default(),
            handles: Vec::new(),
            reports: Vec::new(),
        }
    }

    pub fn with_mouse(mut self, mouse: impl MouseIntegration + 'static) -> Self {
        self.mouse = Box::new(mouse);
        self
    }

    pub fn with_platform(mut self, platform: impl Platform + 'static) -> Self {
        self.platform = Box::new(platform);
        self
    }

    pub fn with_blacklist(mut self, blacklist: Blacklist) -> Self {
        self.blacklist = blacklist;
        self
    }

    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.registry = Registry::with_limits(limits);
        self
    }

    pub fn state(&self) -> InitState {
        self.state
    }

    /// Run startup once, reading the debug toggle from the process environment.
    ///
    /// Returns `false` if the manager was already initialized.
    pub fn init(&mut self, config: &dyn ConfigStore) -> bool {
        let env = InputOptions::debug_env();
        self.init_with_env(config, env.as_deref())
    }

    /// [`init`](Self::init) with an explicit value for the debug toggle.
    pub fn init_with_env(&mut self, config: &dyn ConfigStore, debug_env: Option<&str>) -> bool {
        if self.state == InitState::Ready {
            debug!("input already initialized");
            return false;
        }
        info!("initializing input");

        if let Err(e) = self.backend.init_joystick_subsystem() {
            warn!("{e}");
        }

        let mut options = InputOptions::read(config, debug_env);
        if options.log_input {
            info!("logging: enable input event logging");
        }
        self.router.set_event_logging(options.log_input);
        self.mouse.configure(&options);
        options.cursor = CursorMode::resolve(config, self.mouse.is_integration_active());
        self.options = options;

        let extra = config.get_list(OPTION_JOYSTICK_BLACKLIST);
        if !extra.is_empty() {
            info!("{} extra joystick blacklist entr(ies) from config", extra.len());
            self.blacklist.extend(extra);
        }

        self.init_video();

        self.registry = Registry::with_limits(self.registry.limits());
        self.platform.initialize_keymap();
        self.enumerate();
        self.platform.initialize_keymap();

        self.state = InitState::Ready;
        true
    }

    #[cfg(not(feature = "emu-drivers"))]
    fn init_video(&mut self) {
        info!("initializing video");
        self.platform.init_video();
    }

    #[cfg(feature = "emu-drivers")]
    fn init_video(&mut self) {
        info!("driver layer present, not initializing video");
    }

    fn enumerate(&mut self) {
        let result = enumerate_devices(
            &mut self.backend,
            self.mouse.as_mut(),
            &self.blacklist,
            &mut self.registry,
        );
        self.handles = result.handles;
        self.reports = result.reports;
    }

    /// Close every open joystick and run a fresh enumeration pass from slot 0.
    ///
    /// Slots from the previous pass are not preserved. Returns the new device
    /// count, or `None` before [`init`](Self::init).
    pub fn rescan(&mut self) -> Option<usize> {
        if self.state != InitState::Ready {
            warn!("rescan before input init ignored");
            return None;
        }
        self.close_handles();
        self.enumerate();
        self.platform.initialize_keymap();
        Some(self.registry.count())
    }

    fn close_handles(&mut self) {
        for (_, handle) in self.handles.drain(..) {
            self.backend.close(handle);
        }
    }

    /// Close all joystick handles. The registry stays readable.
    pub fn shutdown(&mut self) {
        self.close_handles();
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn device(&self, index: usize) -> Option<&InputDevice> {
        self.registry.device(index)
    }

    pub fn device_count(&self) -> usize {
        self.registry.count()
    }

    /// Per-candidate results of the last enumeration pass.
    pub fn reports(&self) -> &[CandidateReport] {
        &self.reports
    }

    pub fn options(&self) -> &InputOptions {
        &self.options
    }

    pub fn mouse_integration(&self) -> bool {
        self.mouse.is_integration_active()
    }

    pub fn cursor_allowed(&self) -> bool {
        self.options.cursor.allows_cursor()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn set_consumer(&mut self, listener: impl InputListener + 'static) {
        self.router.set_consumer(listener);
    }

    pub fn set_shortcut_handler(&mut self, handler: impl ShortcutHandler + 'static) {
        self.router.set_shortcut_handler(handler);
    }

    pub fn router_stats(&self) -> RouterStats {
        self.router.stats()
    }

    /// Route an event that already carries its stable device index.
    pub fn post(&mut self, event: InputEvent) -> bool {
        self.router.post(event)
    }

    /// Route a joystick event tagged with the backend instance id.
    pub fn post_from_instance(&mut self, instance_id: InstanceId, kind: InputKind) -> Result<bool, RegistryError> {
        let slot = self
            .registry
            .resolve(instance_id)
            .ok_or(RegistryError::UnboundInstance(instance_id))?;
        Ok(self.router.post(InputEvent::new(slot, kind)))
    }
}

impl<B: JoystickBackend> Drop for InputManager<B> {
    fn drop(&mut self) {
        self.close_handles();
    }
}
