//! `config` subcommand — show current configuration and file paths.

use std::path::Path;

use super::{Config, ConfigOutput, LightdError, Result, kv, kv_indent, kv_width, print_json};

pub(super) fn cmd_config(json: bool, custom_path: Option<&Path>) -> Result<()> {
    let config = super::load_config(custom_path);
    let config_path = custom_path.map(|p| p.to_path_buf()).or_else(Config::path);
    let config_exists = config_path.as_ref().map(|p| p.exists()).unwrap_or(false);

    if json {
        return print_json(&ConfigOutput {
            config_file: config_path.as_ref().map(|p| p.display().to_string()),
            config_file_exists: config_exists,
            settings: config,
        });
    }

    let w = kv_width(
        &["Config file:"],
        &[
            "priority:",
            "backlight:",
            "notification_led:",
            "backlight_led:",
            "on_fault_command:",
        ],
    );

    match &config_path {
        Some(p) => {
            if config_exists {
                kv("Config file:", format_args!("{} (loaded)", p.display()), w);
            } else {
                kv(
                    "Config file:",
                    format_args!("{} (not found, using defaults)", p.display()),
                    w,
                );
            }
        }
        None => kv("Config file:", "(no config directory)", w),
    }
    println!();

    println!("Settings:");
    kv_indent("priority:", list(&config.priority), w);
    kv_indent("backlight:", list(&config.backlight), w);
    kv_indent("notification_led:", list(&config.notification_led.paths), w);
    kv_indent("backlight_led:", list(&config.backlight_led.paths), w);
    let hook = if config.on_fault_command.trim().is_empty() {
        "(disabled)"
    } else {
        config.on_fault_command.as_str()
    };
    kv_indent("on_fault_command:", hook, w);

    if let Err(errors) = config.validate() {
        println!();
        println!("Problems:");
        for e in &errors {
            println!("  {e}");
        }
    }
    Ok(())
}

/// Write the default configuration to `custom_path` or the platform path.
pub(super) fn cmd_config_init(custom_path: Option<&Path>) -> Result<()> {
    let path = custom_path
        .map(|p| p.to_path_buf())
        .or_else(Config::path)
        .ok_or_else(|| LightdError::Config("no config directory".into()))?;
    if path.exists() {
        return Err(LightdError::Config(format!(
            "{} already exists",
            path.display()
        )));
    }
    Config::default().save_to(&path)?;
    println!("Wrote default config to {}", path.display());
    Ok(())
}

fn list(items: &[String]) -> String {
    if items.is_empty() {
        "(none)".to_string()
    } else {
        items.join(", ")
    }
}
