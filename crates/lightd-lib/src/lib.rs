//! lightd — light state arbitration for a shared notification LED.

pub mod brightness;
pub mod color;
pub mod config;
pub mod engine;
pub mod error;
pub mod handler;
pub mod hooks;
pub mod priority;
pub mod registry;
pub mod request;
pub mod sink;
pub mod types;

pub use engine::{LightEngine, Status};
pub use error::LightdError;
pub use types::{BrightnessMode, FlashMode, LightState, LightType};
