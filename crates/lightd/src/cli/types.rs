//! `types` subcommand — list supported light types in priority order.

use super::{GlobalOpts, Result, TypesOutput, print_json};

pub(super) fn cmd_types(opts: &GlobalOpts) -> Result<()> {
    let config = super::load_config(opts.config.as_deref());
    let engine = super::build_engine(&config, opts.root.as_deref())?;

    if opts.json {
        return print_json(&TypesOutput {
            types: engine.supported_types(),
        });
    }

    for (rank, entry) in engine.snapshot().iter().enumerate() {
        println!(
            "{:>2}. {:<14}{}",
            rank + 1,
            entry.light_type,
            entry.handler.channel()
        );
    }
    Ok(())
}
