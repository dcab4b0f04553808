//! `brightness` subcommand — run the color translator without touching hardware.

use lightd_lib::brightness::{luminance, scale_brightness};
use lightd_lib::color::format_color;

use super::{BrightnessOutput, Result, kv, kv_width, print_json};

pub(super) fn cmd_brightness(color: u32, max: u32, json: bool) -> Result<()> {
    let lum = luminance(color);
    let output = BrightnessOutput {
        color: format_color(color),
        luminance: lum,
        max_brightness: max,
        brightness: scale_brightness(lum, max),
    };

    if json {
        return print_json(&output);
    }

    let w = kv_width(&["Color:", "Luminance:", "Max brightness:", "Brightness:"], &[]);
    kv("Color:", &output.color, w);
    kv("Luminance:", output.luminance, w);
    kv("Max brightness:", output.max_brightness, w);
    kv("Brightness:", output.brightness, w);
    Ok(())
}
