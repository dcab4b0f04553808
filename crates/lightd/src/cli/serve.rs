//! `serve` subcommand — arbitrate a stream of requests read from stdin.
//!
//! Requests use the line format of `lightd_lib::request`. Each line gets one
//! line of output; malformed lines are reported on stderr and skipped.

use std::io::BufRead;
use std::sync::atomic::Ordering;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::Duration;

use lightd_lib::request::parse_request;

use super::{GlobalOpts, RUNNING, Result, set};

/// How often the request loop checks the shutdown flag.
const POLL_INTERVAL: Duration = Duration::from_millis(200);

pub(super) fn cmd_serve(opts: &GlobalOpts) -> Result<()> {
    let config = super::load_config(opts.config.as_deref());
    let engine = super::build_engine(&config, opts.root.as_deref())?;
    log::info!("serving {} light types", engine.supported_types().len());

    // Stdin reads block, so they run on their own thread and the loop
    // below stays responsive to Ctrl+C.
    let (tx, rx) = mpsc::channel::<std::io::Result<String>>();
    std::thread::spawn(move || {
        let mut stdin = std::io::stdin().lock();
        let mut buf = Vec::new();
        loop {
            buf.clear();
            let line = match stdin.read_until(b'\n', &mut buf) {
                Ok(0) => break,
                // Invalid UTF-8 becomes U+FFFD and fails to parse like any
                // other malformed line.
                Ok(_) => Ok(String::from_utf8_lossy(&buf)
                    .trim_end_matches(['\n', '\r'])
                    .to_string()),
                Err(e) => Err(e),
            };
            let failed = line.is_err();
            if tx.send(line).is_err() || failed {
                break;
            }
        }
    });

    let mut line_no = 0usize;
    while RUNNING.load(Ordering::SeqCst) {
        let line = match rx.recv_timeout(POLL_INTERVAL) {
            Ok(line) => line,
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => break,
        };
        line_no += 1;
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                eprintln!("line {line_no}: {e}");
                break;
            }
        };

        let request = match parse_request(&line) {
            Ok(Some(request)) => request,
            Ok(None) => continue,
            Err(e) => {
                eprintln!("line {line_no}: {e}");
                continue;
            }
        };

        let output = set::apply(&engine, request.light_type, request.state);
        if opts.json {
            let s = serde_json::to_string(&output).map_err(|e| {
                lightd_lib::LightdError::Config(format!("JSON serialization failed: {e}"))
            })?;
            println!("{s}");
        } else {
            match &output.resolved {
                Some(resolved) => println!(
                    "{}: {} (showing {})",
                    output.light_type,
                    output.status,
                    set::describe(resolved)
                ),
                None => println!("{}: {}", output.light_type, output.status),
            }
        }
    }
    engine.wait_for_hooks();
    Ok(())
}
