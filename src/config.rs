//! Configuration lookup and the input options resolved from it.
//!
//! The frontend's configuration store is reached through [`ConfigStore`].
//! [`TomlConfig`] is a ready-made store over a TOML document:
//!
//! ```toml
//! log_input = true
//! mouse_integration = "1"
//! cursor = "auto"
//! joystick_blacklist = ["030000000b0400003365000000010000"]
//! ```
//!
//! Booleans may be written as TOML booleans, `0`/`1`, or the strings
//! `"0"`, `"1"`, `"true"`, `"false"`, `"yes"`, `"no"`. `"auto"` is the third
//! state for options that support it.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use toml::{Table, Value};

/// Enables per-event input logging.
pub const OPTION_LOG_INPUT: &str = "log_input";
/// Frontend mouse integration (host cursor drives the emulated mouse).
pub const OPTION_MOUSE_INTEGRATION: &str = "mouse_integration";
/// Cursor visibility; tri-state (`true`/`false`/`"auto"`).
pub const OPTION_CURSOR: &str = "cursor";
/// Extra joystick GUIDs to reject during enumeration.
pub const OPTION_JOYSTICK_BLACKLIST: &str = "joystick_blacklist";

/// Environment toggle for input event logging; enabled when exactly `"1"`.
pub const DEBUG_INPUT_ENV: &str = "FS_DEBUG_INPUT";

const BOOLEAN_OPTIONS: &[&str] = &[OPTION_LOG_INPUT, OPTION_MOUSE_INTEGRATION, OPTION_CURSOR];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("option `{option}` has unusable value `{value}`")]
    InvalidValue { option: String, value: String },
}

/// Read-only option lookup.
pub trait ConfigStore {
    /// `Some(bool)` for an explicit boolean, `None` when unset, `"auto"`, or unparsable.
    fn get_boolean(&self, option: &str) -> Option<bool>;

    /// `true` when the option is explicitly set to `"auto"`.
    fn is_auto(&self, option: &str) -> bool;

    /// List-valued option; empty when unset.
    fn get_list(&self, _option: &str) -> Vec<String> {
        Vec::new()
    }
}

/// A store with nothing set.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoConfig;

impl ConfigStore for NoConfig {
    fn get_boolean(&self, _option: &str) -> Option<bool> {
        None
    }

    fn is_auto(&self, _option: &str) -> bool {
        false
    }
}

/// TOML-backed [`ConfigStore`].
#[derive(Clone, Debug, Default)]
pub struct TomlConfig {
    table: Table,
}

fn parse_bool_str(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" => Some(false),
        _ => None,
    }
}

fn value_as_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Boolean(b) => Some(*b),
        Value::Integer(i) => Some(*i != 0),
        Value::String(s) => parse_bool_str(s),
        _ => None,
    }
}

fn value_is_auto(value: &Value) -> bool {
    matches!(value, Value::String(s) if s.trim().eq_ignore_ascii_case("auto"))
}

impl TomlConfig {
    /// Parse a TOML document, rejecting unusable values for known boolean options.
    pub fn from_toml_str(src: &str) -> Result<Self, ConfigError> {
        let table: Table = toml::from_str(src)?;
        for option in BOOLEAN_OPTIONS {
            if let Some(value) = table.get(*option) {
                if value_as_bool(value).is_none() && !value_is_auto(value) {
                    return Err(ConfigError::InvalidValue {
                        option: (*option).to_owned(),
                        value: value.to_string(),
                    });
                }
            }
        }
        Ok(Self { table })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let src = std::fs::read_to_string(path)?;
        Self::from_toml_str(&src)
    }
}

impl ConfigStore for TomlConfig {
    fn get_boolean(&self, option: &str) -> Option<bool> {
        self.table.get(option).and_then(value_as_bool)
    }

    fn is_auto(&self, option: &str) -> bool {
        self.table.get(option).is_some_and(value_is_auto)
    }

    fn get_list(&self, option: &str) -> Vec<String> {
        match self.table.get(option) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_owned))
                .collect(),
            Some(Value::String(s)) => s
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_owned)
                .collect(),
            _ => Vec::new(),
        }
    }
}

/// How the host cursor should be shown.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CursorMode {
    Visible,
    Hidden,
    /// Leave it to the platform layer.
    #[default]
    PlatformDefault,
}

impl CursorMode {
    /// Resolve the `cursor` option.
    ///
    /// `"auto"` hides the cursor when mouse integration is active and leaves it
    /// to the platform otherwise.
    pub fn resolve(config: &dyn ConfigStore, integration_active: bool) -> Self {
        if config.is_auto(OPTION_CURSOR) {
            return if integration_active {
                CursorMode::Hidden
            } else {
                CursorMode::PlatformDefault
            };
        }
        match config.get_boolean(OPTION_CURSOR) {
            Some(true) => CursorMode::Visible,
            Some(false) => CursorMode::Hidden,
            None => CursorMode::PlatformDefault,
        }
    }

    pub fn allows_cursor(self) -> bool {
        self != CursorMode::Hidden
    }
}

/// Input options read once at startup.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputOptions {
    pub log_input: bool,
    pub mouse_integration: bool,
    pub cursor: CursorMode,
}

impl InputOptions {
    /// Read the logging and mouse options.
    ///
    /// `debug_env` is the value of [`DEBUG_INPUT_ENV`], if set. The cursor is
    /// left at its default; it depends on the mouse collaborator and is
    /// resolved with [`CursorMode::resolve`].
    pub fn read(config: &dyn ConfigStore, debug_env: Option<&str>) -> Self {
        let log_input = debug_env == Some("1") || config.get_boolean(OPTION_LOG_INPUT) == Some(true);
        let mouse_integration = config.get_boolean(OPTION_MOUSE_INTEGRATION) == Some(true);
        Self {
            log_input,
            mouse_integration,
            cursor: CursorMode::default(),
        }
    }

    /// Value of the debug environment toggle for this process.
    pub fn debug_env() -> Option<String> {
        std::env::var(DEBUG_INPUT_ENV).ok()
    }
}
