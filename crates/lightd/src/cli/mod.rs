//! CLI subcommands — light requests, supported types, translator, config.

mod brightness;
mod config_cmd;
mod serve;
mod set;
mod types;

use std::path::{Path, PathBuf};

use clap::Subcommand;
use serde::Serialize;

pub(super) use crate::RUNNING;
pub(super) use lightd_lib::config::Config;
pub(super) use lightd_lib::error::Result;
pub(super) use lightd_lib::hooks::CommandHook;
pub(super) use lightd_lib::sink::SysfsSink;
pub(super) use lightd_lib::{
    BrightnessMode, FlashMode, LightEngine, LightState, LightType, LightdError, Status,
};

const PADDING: usize = 2;

/// Options shared by every subcommand.
pub struct GlobalOpts {
    pub json: bool,
    pub config: Option<PathBuf>,
    pub root: Option<PathBuf>,
}

/// Compute alignment width for a command's key-value output.
/// Ensures at least PADDING spaces after the longest key in either level,
/// with top-level and indent values aligned to the same column.
pub(super) fn kv_width(top: &[&str], indent: &[&str]) -> usize {
    let top_max = top.iter().map(|k| k.len()).max().unwrap_or(0);
    let indent_max = indent.iter().map(|k| k.len()).max().unwrap_or(0);
    let top_need = if top.is_empty() { 0 } else { top_max + PADDING };
    // Indent keys lose 2 chars of inner width to the "  " prefix
    let indent_need = if indent.is_empty() {
        0
    } else {
        indent_max + PADDING + 2
    };
    top_need.max(indent_need)
}

pub(super) fn format_kv(key: &str, value: impl std::fmt::Display, w: usize) -> String {
    format!("{key:<width$}{value}", width = w)
}

pub(super) fn kv(key: &str, value: impl std::fmt::Display, w: usize) {
    println!("{}", format_kv(key, value, w));
}

pub(super) fn kv_indent(key: &str, value: impl std::fmt::Display, w: usize) {
    println!("  {key:<width$}{value}", width = w - 2);
}

/// Serialize `value` as pretty JSON and print it.
pub(super) fn print_json(value: &impl Serialize) -> Result<()> {
    let s = serde_json::to_string_pretty(value)
        .map_err(|e| LightdError::Config(format!("JSON serialization failed: {e}")))?;
    println!("{s}");
    Ok(())
}

/// Load config from `custom_path` or the platform default, logging parse warnings.
pub(super) fn load_config(custom_path: Option<&Path>) -> Config {
    match custom_path {
        Some(path) => {
            let (config, warnings) = Config::load_from(path);
            for w in &warnings {
                log::warn!("{w}");
            }
            config
        }
        None => Config::load(),
    }
}

/// Build an engine on the configured sysfs LEDs.
pub(super) fn build_engine(config: &Config, root: Option<&Path>) -> Result<LightEngine<SysfsSink>> {
    if let Err(errors) = config.validate() {
        let msg = errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        return Err(LightdError::Config(msg));
    }
    let table = config.backend_table()?;
    let mut sink = config.sysfs_sink();
    if let Some(root) = root {
        sink = sink.with_root(root.to_path_buf());
    }
    let engine = LightEngine::new(&table, sink);
    let command = config.on_fault_command.trim();
    if command.is_empty() {
        Ok(engine)
    } else {
        Ok(engine.with_observer(CommandHook::new(command)))
    }
}

// ── JSON output structs ──

#[derive(Serialize)]
pub(super) struct TypesOutput {
    pub types: Vec<LightType>,
}

#[derive(Serialize)]
pub(super) struct SetOutput {
    pub light_type: LightType,
    pub status: Status,
    pub state: LightState,
    /// State now driving the type's LED; absent for unsupported types.
    pub resolved: Option<LightState>,
}

#[derive(Serialize)]
pub(super) struct BrightnessOutput {
    pub color: String,
    pub luminance: u32,
    pub max_brightness: u32,
    pub brightness: u32,
}

#[derive(Serialize)]
pub(super) struct ConfigOutput {
    pub config_file: Option<String>,
    pub config_file_exists: bool,
    pub settings: Config,
}

#[derive(Subcommand)]
pub enum Command {
    /// List supported light types in priority order
    Types,

    /// Apply one light request to the LED
    Set {
        /// Light type (attention, notifications, battery, ...)
        light_type: LightType,
        /// Color as #AARRGGBB, #RRGGBB or a name (red, white, off, ...)
        #[arg(value_parser = lightd_lib::color::parse_color)]
        color: u32,
        /// Flash mode: none, timed or hardware
        #[arg(long, default_value = "none")]
        flash: FlashMode,
        /// Flash on time in milliseconds
        #[arg(long, default_value_t = 0)]
        on_ms: i32,
        /// Flash off time in milliseconds
        #[arg(long, default_value_t = 0)]
        off_ms: i32,
        /// Brightness mode: user, sensor or low_persistence
        #[arg(long, default_value = "user")]
        brightness_mode: BrightnessMode,
    },

    /// Read requests from stdin (one per line) until EOF or Ctrl+C
    Serve,

    /// Translate a color to LED brightness (no hardware access)
    Brightness {
        /// Color as #AARRGGBB, #RRGGBB or a name
        #[arg(value_parser = lightd_lib::color::parse_color)]
        color: u32,
        /// Maximum brightness of the target LED
        #[arg(long, default_value_t = 255)]
        max: u32,
    },

    /// Show current configuration
    Config {
        /// Write a default config file (refuses to overwrite an existing one)
        #[arg(long)]
        init: bool,
    },
}

pub fn run(cmd: Command, opts: &GlobalOpts) -> Result<()> {
    let config_path = opts.config.as_deref();
    match cmd {
        Command::Types => types::cmd_types(opts),
        Command::Set {
            light_type,
            color,
            flash,
            on_ms,
            off_ms,
            brightness_mode,
        } => {
            let state = LightState::new(color)
                .with_flash(flash, on_ms, off_ms)
                .with_brightness_mode(brightness_mode);
            set::cmd_set(light_type, state, opts)
        }
        Command::Serve => serve::cmd_serve(opts),
        Command::Brightness { color, max } => brightness::cmd_brightness(color, max, opts.json),
        Command::Config { init: true } => config_cmd::cmd_config_init(config_path),
        Command::Config { init: false } => config_cmd::cmd_config(opts.json, config_path),
    }
}


#[cfg(test)]
mod engine_tests {
    use super::*;

    #[test]
    fn build_engine_rejects_invalid_config() {
        let config = Config {
            priority: vec!["lamp".into()],
            ..Config::default()
        };
        let err = build_engine(&config, None).err().unwrap();
        assert!(err.to_string().contains("lamp"));
    }

    #[test]
    fn build_engine_uses_priority_order() {
        let config = Config {
            priority: vec!["battery".into(), "attention".into()],
            ..Config::default()
        };
        let engine = build_engine(&config, None).unwrap();
        assert_eq!(
            engine.supported_types(),
            vec![LightType::Battery, LightType::Attention]
        );
    }

    #[test]
    fn build_engine_applies_root() {
        let tmp = tempfile::tempdir().unwrap();
        let engine = build_engine(&Config::default(), Some(tmp.path())).unwrap();
        assert!(
            engine
                .sink()
                .led_dir("notification")
                .unwrap()
                .starts_with(tmp.path())
        );
    }
}
