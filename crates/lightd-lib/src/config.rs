//! Service configuration — TOML-based, platform-aware paths.
//!
//! The engine itself takes no configuration; this is what the service and
//! CLI use to build its backend table and sysfs sink.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::handler::{BACKLIGHT_CHANNEL, Handler, NOTIFICATION_CHANNEL};
use crate::registry::BackendTable;
use crate::sink::SysfsSink;
use crate::types::LightType;

/// Header comment prepended to saved config files.
const CONFIG_HEADER: &str =
    "# lightd configuration — changes made outside the tool may be overwritten.\n\n";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Types rendered on the notification LED, most important first.
    #[serde(default = "default_priority")]
    pub priority: Vec<String>,

    /// Types rendered as steady backlight brightness. Empty = none.
    #[serde(default)]
    pub backlight: Vec<String>,

    /// Command to run when an LED read or write fails. Empty = disabled.
    #[serde(default)]
    pub on_fault_command: String,

    /// Candidate directories for the notification LED.
    #[serde(default = "default_notification_led")]
    pub notification_led: LedPaths,

    /// Candidate directories for the backlight.
    #[serde(default = "default_backlight_led")]
    pub backlight_led: LedPaths,
}

/// Ordered candidate directories: the first existing one is used, the last
/// one is the unconditional fallback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedPaths {
    #[serde(default)]
    pub paths: Vec<String>,
}

fn default_priority() -> Vec<String> {
    vec!["attention".into(), "notifications".into(), "battery".into()]
}

fn default_notification_led() -> LedPaths {
    LedPaths {
        paths: vec!["/sys/class/leds/left".into(), "/sys/class/leds/white".into()],
    }
}

fn default_backlight_led() -> LedPaths {
    LedPaths {
        paths: vec!["/sys/class/backlight/panel0-backlight".into()],
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            priority: default_priority(),
            backlight: Vec::new(),
            on_fault_command: String::new(),
            notification_led: default_notification_led(),
            backlight_led: default_backlight_led(),
        }
    }
}

/// Validation errors that [`Config::validate`] can return.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// A list entry is not a known light type.
    UnknownType { field: &'static str, name: String },
    /// A light type appears more than once across `priority` and `backlight`.
    DuplicateType(String),
    /// `priority` and `backlight` are both empty.
    NoTypes,
    /// An LED path list in use is empty.
    EmptyPaths(&'static str),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::UnknownType { field, name } => {
                write!(f, "Unknown light type in {field}: {name}")
            }
            ValidationError::DuplicateType(name) => {
                write!(f, "Light type listed more than once: {name}")
            }
            ValidationError::NoTypes => write!(f, "No light types configured"),
            ValidationError::EmptyPaths(field) => write!(f, "{field}.paths cannot be empty"),
        }
    }
}

impl Config {
    /// Platform-specific config directory.
    pub fn dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("lightd"))
    }

    /// Full path to config file.
    pub fn path() -> Option<PathBuf> {
        Self::dir().map(|d| d.join("config.toml"))
    }

    /// Load config from disk, or return defaults if not found.
    pub fn load() -> Self {
        let (config, warnings) = Self::load_with_warnings();
        for w in &warnings {
            log::warn!("{w}");
        }
        config
    }

    /// Save config to an arbitrary path atomically (write to temp file, then rename).
    pub fn save_to(&self, path: &Path) -> std::io::Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let serialized = toml::to_string_pretty(self).map_err(std::io::Error::other)?;
        let contents = format!("{CONFIG_HEADER}{serialized}");
        let tmp = path.with_extension("toml.tmp");
        std::fs::write(&tmp, &contents)?;
        match std::fs::rename(&tmp, path) {
            Ok(()) => Ok(()),
            Err(_) => {
                // Rename can fail across filesystems; fall back to direct write + cleanup
                let result = std::fs::write(path, &contents);
                let _ = std::fs::remove_file(&tmp);
                result
            }
        }
    }

    /// Load config from an arbitrary path, returning the config and any parse warnings.
    ///
    /// Returns `(defaults, [])` if the file doesn't exist.
    /// Returns `(defaults, [warning])` if the file exists but can't be parsed.
    pub fn load_from(path: &Path) -> (Self, Vec<String>) {
        match std::fs::read_to_string(path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => (config, vec![]),
                Err(e) => {
                    let warning = format!(
                        "config parse error ({}), using defaults: {e}",
                        path.display()
                    );
                    (Self::default(), vec![warning])
                }
            },
            Err(_) => (Self::default(), vec![]),
        }
    }

    /// Load config from the default path, returning the config and any parse warnings.
    pub fn load_with_warnings() -> (Self, Vec<String>) {
        let Some(path) = Self::path() else {
            return (Self::default(), vec![]);
        };
        Self::load_from(&path)
    }

    /// Validate the entire config, collecting all errors.
    pub fn validate(&self) -> std::result::Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();
        let mut seen: Vec<LightType> = Vec::new();

        for (field, names) in [("priority", &self.priority), ("backlight", &self.backlight)] {
            for name in names {
                match name.parse::<LightType>() {
                    Ok(ty) if seen.contains(&ty) => {
                        errors.push(ValidationError::DuplicateType(ty.to_string()));
                    }
                    Ok(ty) => seen.push(ty),
                    Err(_) => errors.push(ValidationError::UnknownType {
                        field,
                        name: name.clone(),
                    }),
                }
            }
        }

        if self.priority.is_empty() && self.backlight.is_empty() {
            errors.push(ValidationError::NoTypes);
        }
        if !self.priority.is_empty() && self.notification_led.paths.is_empty() {
            errors.push(ValidationError::EmptyPaths("notification_led"));
        }
        if !self.backlight.is_empty() && self.backlight_led.paths.is_empty() {
            errors.push(ValidationError::EmptyPaths("backlight_led"));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Build the backend table: `priority` types on the notification LED,
    /// followed by `backlight` types.
    pub fn backend_table(&self) -> crate::error::Result<BackendTable> {
        let notification = self
            .priority
            .iter()
            .map(|name| name.parse::<LightType>().map(|ty| (ty, Handler::Notification)));
        let backlight = self
            .backlight
            .iter()
            .map(|name| name.parse::<LightType>().map(|ty| (ty, Handler::Backlight)));
        let entries = notification
            .chain(backlight)
            .collect::<crate::error::Result<Vec<_>>>()?;
        BackendTable::new(entries)
    }

    /// Channel name → candidate LED directories.
    pub fn channel_paths(&self) -> HashMap<String, Vec<PathBuf>> {
        let to_paths = |led: &LedPaths| led.paths.iter().map(PathBuf::from).collect();
        HashMap::from([
            (NOTIFICATION_CHANNEL.to_string(), to_paths(&self.notification_led)),
            (BACKLIGHT_CHANNEL.to_string(), to_paths(&self.backlight_led)),
        ])
    }

    /// Sysfs sink for the configured channels.
    pub fn sysfs_sink(&self) -> SysfsSink {
        SysfsSink::new(self.channel_paths())
    }
}
