//! stickreg: input device registry and event router for emulator frontends.
//!
//! Sits between a native input backend and the frontend's logic:
//! - discovers keyboard, mouse and joysticks and gives each a stable slot
//!   (keyboard at 0, mice next, joysticks contiguous after that),
//! - cleans up and deduplicates joystick names and assigns `JOYSTICK #n` aliases,
//! - skips blacklisted hardware by GUID,
//! - maps volatile backend instance ids to stable slots,
//! - routes every event through one entry point that lets a shortcut handler
//!   swallow key events before the consumer sees them.
//!
//! Start with [`InputManager`].

pub mod backends;
pub mod blacklist;
pub mod config;
pub mod device;
pub mod enumerate;
pub mod event;
pub mod eventbus;
pub mod logger;
pub mod manager;
pub mod mouse;
pub mod naming;
pub mod registry;
pub mod snapshot;

pub use device::*;
pub use event::*;
pub use eventbus::*;
pub use manager::*;
pub use registry::{Registry, RegistryError};
