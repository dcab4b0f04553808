//! Color parsing and formatting for light requests.
//!
//! Colors use the packed `0xAARRGGBB` format of the light HAL.

/// Parse a color string into `0xAARRGGBB`.
///
/// Accepts:
/// - Hex with alpha: `"#80FF0000"`, `"0x80FF0000"`, `"80ff0000"`
/// - Hex without alpha: `"#FF0000"` (alpha is set to `FF`)
/// - Named: `"red"`, `"green"`, `"blue"`, `"white"`, `"orange"`, `"yellow"`, `"purple"`, `"cyan"`
/// - `"off"` (fully transparent black, `0x00000000`) and `"black"` (`0xFF000000`)
pub fn parse_color(s: &str) -> crate::error::Result<u32> {
    let s = s.trim();

    match s.to_lowercase().as_str() {
        "red" => return Ok(0xFFFF_0000),
        "green" => return Ok(0xFF00_FF00),
        "blue" => return Ok(0xFF00_00FF),
        "white" => return Ok(0xFFFF_FFFF),
        "orange" => return Ok(0xFFFF_8000),
        "yellow" => return Ok(0xFFFF_FF00),
        "purple" => return Ok(0xFF80_00FF),
        "cyan" => return Ok(0xFF00_FFFF),
        "black" => return Ok(0xFF00_0000),
        "off" => return Ok(0x0000_0000),
        _ => {}
    }

    let hex = s
        .strip_prefix('#')
        .or_else(|| s.strip_prefix("0x"))
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    let alpha = match hex.len() {
        6 => 0xFF00_0000,
        8 => 0,
        _ => {
            return Err(crate::LightdError::Color(format!(
                "Invalid color: {s} (use #AARRGGBB, #RRGGBB or a color name)"
            )));
        }
    };
    // from_str_radix tolerates a leading sign.
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(crate::LightdError::Color(format!("Invalid hex color: {s}")));
    }
    let val = u32::from_str_radix(hex, 16)
        .map_err(|_| crate::LightdError::Color(format!("Invalid hex color: {s}")))?;
    Ok(alpha | val)
}

/// Format a packed color as `#AARRGGBB`.
pub fn format_color(val: u32) -> String {
    format!("#{val:08X}")
}
