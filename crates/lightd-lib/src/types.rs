//! Light types and the requested-state value carried through the engine.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::LightdError;

/// Mask of the RGB channels of a packed `0xAARRGGBB` color.
pub const RGB_MASK: u32 = 0x00FF_FFFF;

// ── LightType ──

/// A logical consumer of a light, as named by the light HAL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LightType {
    Backlight,
    Keyboard,
    Buttons,
    Battery,
    Notifications,
    Attention,
    Bluetooth,
    Wifi,
}

impl LightType {
    pub const ALL: [LightType; 8] = [
        LightType::Backlight,
        LightType::Keyboard,
        LightType::Buttons,
        LightType::Battery,
        LightType::Notifications,
        LightType::Attention,
        LightType::Bluetooth,
        LightType::Wifi,
    ];

    pub fn name(self) -> &'static str {
        match self {
            LightType::Backlight => "backlight",
            LightType::Keyboard => "keyboard",
            LightType::Buttons => "buttons",
            LightType::Battery => "battery",
            LightType::Notifications => "notifications",
            LightType::Attention => "attention",
            LightType::Bluetooth => "bluetooth",
            LightType::Wifi => "wifi",
        }
    }
}

impl fmt::Display for LightType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for LightType {
    type Err = LightdError;

    /// Case-insensitive; accepts the singular `notification` as well.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        if s == "notification" {
            return Ok(LightType::Notifications);
        }
        LightType::ALL
            .into_iter()
            .find(|t| t.name() == s)
            .ok_or_else(|| LightdError::Parse(format!("unknown light type: {s}")))
    }
}

// ── FlashMode / BrightnessMode ──

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlashMode {
    /// Steady light.
    #[default]
    None,
    /// Software-timed blinking using `flash_on_ms` / `flash_off_ms`.
    Timed,
    /// Hardware-driven blinking.
    Hardware,
}

impl fmt::Display for FlashMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlashMode::None => f.write_str("none"),
            FlashMode::Timed => f.write_str("timed"),
            FlashMode::Hardware => f.write_str("hardware"),
        }
    }
}

impl FromStr for FlashMode {
    type Err = LightdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" | "steady" => Ok(FlashMode::None),
            "timed" => Ok(FlashMode::Timed),
            "hardware" | "hw" => Ok(FlashMode::Hardware),
            other => Err(LightdError::Parse(format!("unknown flash mode: {other}"))),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BrightnessMode {
    #[default]
    User,
    Sensor,
    LowPersistence,
}

impl fmt::Display for BrightnessMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BrightnessMode::User => f.write_str("user"),
            BrightnessMode::Sensor => f.write_str("sensor"),
            BrightnessMode::LowPersistence => f.write_str("low_persistence"),
        }
    }
}

impl FromStr for BrightnessMode {
    type Err = LightdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "user" => Ok(BrightnessMode::User),
            "sensor" => Ok(BrightnessMode::Sensor),
            "low_persistence" => Ok(BrightnessMode::LowPersistence),
            other => Err(LightdError::Parse(format!(
                "unknown brightness mode: {other}"
            ))),
        }
    }
}

// ── LightState ──

/// A requested light state.
///
/// Plain value: every request carries a fresh `LightState`, and equality is
/// field-wise over all five fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LightState {
    /// Packed `0xAARRGGBB` color.
    pub color: u32,
    pub flash_mode: FlashMode,
    pub flash_on_ms: i32,
    pub flash_off_ms: i32,
    pub brightness_mode: BrightnessMode,
}

impl LightState {
    /// Steady state with the given color.
    pub fn new(color: u32) -> Self {
        LightState {
            color,
            ..Default::default()
        }
    }

    pub fn with_flash(self, flash_mode: FlashMode, on_ms: i32, off_ms: i32) -> Self {
        LightState {
            flash_mode,
            flash_on_ms: on_ms,
            flash_off_ms: off_ms,
            ..self
        }
    }

    pub fn with_brightness_mode(self, brightness_mode: BrightnessMode) -> Self {
        LightState {
            brightness_mode,
            ..self
        }
    }

    /// Whether any RGB channel is non-zero. Alpha is ignored.
    pub fn is_lit(&self) -> bool {
        self.color & RGB_MASK != 0
    }
}
