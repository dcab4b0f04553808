//! LED sink — trait + sysfs backend.
//!
//! A sink is the hardware side of the engine: it takes brightness and
//! breathing writes for a named channel and reports the channel's maximum
//! brightness.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

// ── Error type ──

/// LED sink errors.
///
/// String payloads follow the convention **"node: details"** where *node*
/// is the LED attribute or path being accessed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkError {
    /// The channel has no candidate LED directory configured.
    NotFound(String),
    ReadFailed(String),
    WriteFailed(String),
}

impl fmt::Display for SinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SinkError::NotFound(ch) => write!(f, "No LED configured for channel {ch}"),
            SinkError::ReadFailed(e) => write!(f, "Failed to read LED node: {e}"),
            SinkError::WriteFailed(e) => write!(f, "Failed to write LED node: {e}"),
        }
    }
}

impl std::error::Error for SinkError {}

pub type Result<T> = std::result::Result<T, SinkError>;

// ── Trait ──

pub trait LedSink {
    /// Write a steady brightness value.
    fn write_brightness(&self, channel: &str, value: u32) -> Result<()>;
    /// Enable or disable the hardware breathing pattern.
    fn write_breath(&self, channel: &str, enabled: bool) -> Result<()>;
    fn read_max_brightness(&self, channel: &str) -> Result<u32>;
}

// ── Sysfs implementation ──

pub const NODE_BREATH: &str = "breath";
pub const NODE_BRIGHTNESS: &str = "brightness";
pub const NODE_MAX_BRIGHTNESS: &str = "max_brightness";

/// Sink backed by the kernel LED class (`/sys/class/leds/<name>/...`).
///
/// Each channel maps to an ordered list of candidate LED directories. Every
/// access probes them again: the first existing candidate wins, and the last
/// one is used unconditionally when none of the earlier ones exist.
#[derive(Debug, Clone)]
pub struct SysfsSink {
    root: PathBuf,
    channels: HashMap<String, Vec<PathBuf>>,
}

impl SysfsSink {
    pub fn new(channels: HashMap<String, Vec<PathBuf>>) -> Self {
        SysfsSink {
            root: PathBuf::from("/"),
            channels,
        }
    }

    /// Resolve all candidate paths below `root` instead of `/`.
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    /// The LED directory currently selected for `channel`.
    pub fn led_dir(&self, channel: &str) -> Result<PathBuf> {
        let (last, primary) = self
            .channels
            .get(channel)
            .and_then(|c| c.split_last())
            .ok_or_else(|| SinkError::NotFound(channel.to_string()))?;
        let dir = primary
            .iter()
            .map(|p| self.rooted(p))
            .find(|p| p.exists())
            .unwrap_or_else(|| self.rooted(last));
        Ok(dir)
    }

    fn rooted(&self, path: &Path) -> PathBuf {
        self.root.join(path.strip_prefix("/").unwrap_or(path))
    }

    fn write_node(&self, channel: &str, node: &str, value: u32) -> Result<()> {
        let path = self.led_dir(channel)?.join(node);
        log::trace!("write {} <- {value}", path.display());
        std::fs::write(&path, value.to_string())
            .map_err(|e| SinkError::WriteFailed(format!("{}: {e}", path.display())))
    }
}

impl LedSink for SysfsSink {
    fn write_brightness(&self, channel: &str, value: u32) -> Result<()> {
        self.write_node(channel, NODE_BRIGHTNESS, value)
    }

    fn write_breath(&self, channel: &str, enabled: bool) -> Result<()> {
        self.write_node(channel, NODE_BREATH, u32::from(enabled))
    }

    fn read_max_brightness(&self, channel: &str) -> Result<u32> {
        let path = self.led_dir(channel)?.join(NODE_MAX_BRIGHTNESS);
        let contents = std::fs::read_to_string(&path)
            .map_err(|e| SinkError::ReadFailed(format!("{}: {e}", path.display())))?;
        contents.trim().parse::<u32>().map_err(|e| {
            SinkError::ReadFailed(format!("{}: {e} ({:?})", path.display(), contents.trim()))
        })
    }
}

// ── Mock implementation (for testing) ──

pub mod mock {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    /// One recorded sink write.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum SinkWrite {
        Breath { channel: String, enabled: bool },
        Brightness { channel: String, value: u32 },
    }

    impl SinkWrite {
        pub fn breath(channel: &str, enabled: bool) -> Self {
            SinkWrite::Breath {
                channel: channel.into(),
                enabled,
            }
        }

        pub fn brightness(channel: &str, value: u32) -> Self {
            SinkWrite::Brightness {
                channel: channel.into(),
                value,
            }
        }
    }

    /// In-memory sink for unit tests. Records every write in order and
    /// serves `max_brightness` from a per-channel table (default 255).
    /// Thread-safe so engines built on it can be shared across threads.
    pub struct MockSink {
        /// Recorded writes, oldest first.
        pub writes: Mutex<Vec<SinkWrite>>,
        /// Per-channel max brightness overrides.
        pub max_brightness: Mutex<HashMap<String, u32>>,
        /// Number of `read_max_brightness` calls.
        pub reads: AtomicUsize,
        /// If true, writes return an error (and are not recorded).
        pub fail_writes: AtomicBool,
        /// If true, `read_max_brightness` returns an error.
        pub fail_reads: AtomicBool,
    }

    impl Default for MockSink {
        fn default() -> Self {
            Self::new()
        }
    }

    impl MockSink {
        pub const DEFAULT_MAX_BRIGHTNESS: u32 = 255;

        pub fn new() -> Self {
            MockSink {
                writes: Mutex::new(Vec::new()),
                max_brightness: Mutex::new(HashMap::new()),
                reads: AtomicUsize::new(0),
                fail_writes: AtomicBool::new(false),
                fail_reads: AtomicBool::new(false),
            }
        }

        pub fn with_max_brightness(self, channel: &str, max: u32) -> Self {
            self.max_brightness
                .lock()
                .unwrap()
                .insert(channel.to_string(), max);
            self
        }

        /// Snapshot of recorded writes.
        pub fn writes(&self) -> Vec<SinkWrite> {
            self.writes.lock().unwrap().clone()
        }

        /// Drain recorded writes.
        pub fn take_writes(&self) -> Vec<SinkWrite> {
            std::mem::take(&mut *self.writes.lock().unwrap())
        }

        pub fn read_count(&self) -> usize {
            self.reads.load(Ordering::SeqCst)
        }

        fn record(&self, write: SinkWrite) -> Result<()> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(SinkError::WriteFailed(
                    "mock: write failure injected".into(),
                ));
            }
            self.writes.lock().unwrap().push(write);
            Ok(())
        }
    }

    impl LedSink for MockSink {
        fn write_brightness(&self, channel: &str, value: u32) -> Result<()> {
            self.record(SinkWrite::brightness(channel, value))
        }

        fn write_breath(&self, channel: &str, enabled: bool) -> Result<()> {
            self.record(SinkWrite::breath(channel, enabled))
        }

        fn read_max_brightness(&self, channel: &str) -> Result<u32> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            if self.fail_reads.load(Ordering::SeqCst) {
                return Err(SinkError::ReadFailed("mock: read failure injected".into()));
            }
            Ok(self
                .max_brightness
                .lock()
                .unwrap()
                .get(channel)
                .copied()
                .unwrap_or(Self::DEFAULT_MAX_BRIGHTNESS))
        }
    }
}
