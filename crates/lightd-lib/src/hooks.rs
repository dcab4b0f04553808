//! Hardware fault hooks — observe sink failures the engine swallows.
//!
//! The engine always logs a fault; an optional [`FaultObserver`] gets a copy
//! for metrics or alerting without changing the request result.

use std::fmt;
use std::io;
use std::process::ExitStatus;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::sink::SinkError;

/// A sink failure raised while rendering a light state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HardwareFault {
    pub channel: &'static str,
    pub error: SinkError,
}

impl fmt::Display for HardwareFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} LED: {}", self.channel, self.error)
    }
}

pub trait FaultObserver: Send + Sync {
    /// Called with the engine lock held; keep it short.
    fn on_fault(&self, fault: &HardwareFault);

    /// Called once per render that raised at least one fault.
    fn on_render_faults(&self, faults: &[HardwareFault]) {
        for fault in faults {
            self.on_fault(fault);
        }
    }

    /// Block until any work started by the observer has finished.
    fn wait_idle(&self) {}
}

// ── FaultCounter ──

/// Counts faults and keeps the most recent one.
#[derive(Debug, Default)]
pub struct FaultCounter {
    count: AtomicUsize,
    last: Mutex<Option<HardwareFault>>,
}

impl FaultCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    pub fn last(&self) -> Option<HardwareFault> {
        self.last
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

impl FaultObserver for FaultCounter {
    fn on_fault(&self, fault: &HardwareFault) {
        self.count.fetch_add(1, Ordering::SeqCst);
        *self
            .last
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = Some(fault.clone());
    }
}

impl<T: FaultObserver + ?Sized> FaultObserver for Arc<T> {
    fn on_fault(&self, fault: &HardwareFault) {
        (**self).on_fault(fault)
    }

    fn on_render_faults(&self, faults: &[HardwareFault]) {
        (**self).on_render_faults(faults)
    }

    fn wait_idle(&self) {
        (**self).wait_idle()
    }
}

// ── CommandHook ──

/// Default timeout for hook commands (30 seconds).
const HOOK_TIMEOUT: Duration = Duration::from_secs(30);

/// Poll interval when waiting for a hook process to exit.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Environment variable carrying the fault description to the hook command.
pub const FAULT_ENV: &str = "LIGHTD_FAULT";

/// Runs a shell command once per render that hit hardware faults.
///
/// The command runs in a background thread so the engine lock is never held
/// on it. Only one hook runs at a time; faults arriving while it runs are
/// skipped with a warning.
pub struct CommandHook {
    command: String,
    running: Arc<AtomicBool>,
    timeout: Duration,
}

impl CommandHook {
    pub fn new(command: impl Into<String>) -> Self {
        CommandHook {
            command: command.into().trim().to_string(),
            running: Arc::new(AtomicBool::new(false)),
            timeout: HOOK_TIMEOUT,
        }
    }

    /// Whether a hook command is currently executing.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Spawn the command for `description`. Empty commands are ignored.
    fn run(&self, description: String) {
        if self.command.is_empty() {
            return;
        }
        if self
            .running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            log::warn!("fault hook skipped (previous hook still running): {}", self.command);
            return;
        }
        let command = self.command.clone();
        let running = Arc::clone(&self.running);
        let timeout = self.timeout;
        std::thread::spawn(move || {
            let result = run_hook_with_timeout(&command, &description, timeout);
            running.store(false, Ordering::SeqCst);
            match result {
                Ok(s) if !s.success() => {
                    log::warn!("fault hook exited with {s}: {command}");
                }
                Err(e) => {
                    log::warn!("fault hook failed: {e}: {command}");
                }
                _ => {}
            }
        });
    }
}

impl FaultObserver for CommandHook {
    fn on_fault(&self, fault: &HardwareFault) {
        self.run(fault.to_string());
    }

    fn on_render_faults(&self, faults: &[HardwareFault]) {
        let description = faults
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        self.run(description);
    }

    /// Waits for a running hook, at most its timeout plus one poll.
    fn wait_idle(&self) {
        let max_polls = (self.timeout.as_millis() / POLL_INTERVAL.as_millis()).max(1) as u64 + 1;
        for _ in 0..max_polls {
            if !self.is_running() {
                return;
            }
            std::thread::sleep(POLL_INTERVAL);
        }
    }
}

/// Run a shell command with a timeout. Kills the process if it exceeds the deadline.
fn run_hook_with_timeout(
    command: &str,
    description: &str,
    timeout: Duration,
) -> io::Result<ExitStatus> {
    let mut child = if cfg!(windows) {
        std::process::Command::new("cmd")
            .args(["/C", command])
            .env(FAULT_ENV, description)
            .spawn()?
    } else {
        std::process::Command::new("sh")
            .args(["-c", command])
            .env(FAULT_ENV, description)
            .spawn()?
    };

    let max_polls = (timeout.as_millis() / POLL_INTERVAL.as_millis()).max(1) as u64;
    for _ in 0..max_polls {
        match child.try_wait()? {
            Some(status) => return Ok(status),
            None => std::thread::sleep(POLL_INTERVAL),
        }
    }

    log::warn!("fault hook timed out after {timeout:?}, killing: {command}");
    let _ = child.kill();
    child.wait()
}
