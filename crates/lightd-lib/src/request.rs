//! Line-oriented light requests.
//!
//! One request per line, whitespace separated:
//!
//! ```text
//! TYPE COLOR [FLASH [ON_MS OFF_MS [BRIGHTNESS_MODE]]]
//! ```
//!
//! e.g. `notifications #FF00FF00 timed 500 2000`. Blank lines and lines
//! starting with `#` followed by a space (comments) carry no request.

use crate::LightdError;
use crate::color::parse_color;
use crate::error::Result;
use crate::types::{LightState, LightType};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Request {
    pub light_type: LightType,
    pub state: LightState,
}

/// Parse one request line. Returns `Ok(None)` for blank and comment lines.
pub fn parse_request(line: &str) -> Result<Option<Request>> {
    let line = line.trim();
    if line.is_empty() || line == "#" || line.starts_with("# ") || line.starts_with("//") {
        return Ok(None);
    }

    let fields: Vec<&str> = line.split_whitespace().collect();
    let [light_type, color, rest @ ..] = fields.as_slice() else {
        return Err(LightdError::Parse(format!(
            "expected TYPE COLOR [FLASH [ON_MS OFF_MS [MODE]]], got: {line}"
        )));
    };
    if rest.len() > 4 || rest.len() == 2 {
        return Err(LightdError::Parse(format!(
            "flash timing needs both ON_MS and OFF_MS: {line}"
        )));
    }

    let mut state = LightState::new(parse_color(color)?);
    if let Some(flash) = rest.first() {
        let (on_ms, off_ms) = match rest.get(1..3) {
            Some([on, off]) => (parse_ms(on)?, parse_ms(off)?),
            _ => (0, 0),
        };
        state = state.with_flash(flash.parse()?, on_ms, off_ms);
    }
    if let Some(mode) = rest.get(3) {
        state = state.with_brightness_mode(mode.parse()?);
    }

    Ok(Some(Request {
        light_type: light_type.parse()?,
        state,
    }))
}

fn parse_ms(s: &str) -> Result<i32> {
    s.parse::<i32>()
        .map_err(|_| LightdError::Parse(format!("invalid duration (ms): {s}")))
}
