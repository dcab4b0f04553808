//! `set` subcommand — apply a single light request.
//!
//! The engine starts from an all-off registry, so the request is arbitrated
//! only against itself; use `serve` to arbitrate a sequence of requests.

use lightd_lib::color::format_color;

use super::{
    GlobalOpts, LightEngine, LightState, LightType, Result, SetOutput, Status, SysfsSink, kv,
    kv_width, print_json,
};

pub(super) fn cmd_set(light_type: LightType, state: LightState, opts: &GlobalOpts) -> Result<()> {
    let config = super::load_config(opts.config.as_deref());
    let engine = super::build_engine(&config, opts.root.as_deref())?;
    let output = apply(&engine, light_type, state);
    engine.wait_for_hooks();

    if opts.json {
        print_json(&output)?;
    } else {
        print_set(&output);
    }

    match output.status {
        Status::Success => Ok(()),
        Status::LightNotSupported => Err(lightd_lib::LightdError::Config(format!(
            "light type {light_type} is not supported (see `lightd-cli types`)"
        ))),
    }
}

/// Apply one request and describe the outcome.
pub(super) fn apply(
    engine: &LightEngine<SysfsSink>,
    light_type: LightType,
    state: LightState,
) -> SetOutput {
    let status = engine.set_light(light_type, state);
    SetOutput {
        light_type,
        status,
        state,
        resolved: engine.resolved(light_type),
    }
}

fn print_set(output: &SetOutput) {
    let w = kv_width(&["Type:", "Status:", "Requested:", "Showing:"], &[]);
    kv("Type:", output.light_type, w);
    kv("Status:", output.status, w);
    kv("Requested:", describe(&output.state), w);
    if let Some(resolved) = &output.resolved {
        kv("Showing:", describe(resolved), w);
    }
}

pub(super) fn describe(state: &LightState) -> String {
    format!(
        "{} flash={} on={}ms off={}ms mode={}",
        format_color(state.color),
        state.flash_mode,
        state.flash_on_ms,
        state.flash_off_ms,
        state.brightness_mode
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use lightd_lib::FlashMode;

    #[test]
    fn describe_lists_every_field() {
        let state = LightState::new(0xFF00_FF00).with_flash(FlashMode::Timed, 500, 1500);
        assert_eq!(
            describe(&state),
            "#FF00FF00 flash=timed on=500ms off=1500ms mode=user"
        );
    }
}
