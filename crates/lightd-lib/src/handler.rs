//! Handler strategies — turn a resolved light state into sink writes.
//!
//! Every backend entry names one [`Handler`]. Entries sharing a handler form
//! a group that arbitrates for the handler's single physical channel.

use serde::{Deserialize, Serialize};

use crate::brightness::scaled_brightness;
use crate::hooks::HardwareFault;
use crate::sink::LedSink;
use crate::types::{FlashMode, LightState};

pub const NOTIFICATION_CHANNEL: &str = "notification";
pub const BACKLIGHT_CHANNEL: &str = "backlight";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Handler {
    /// Indicator LED with a hardware breathing mode.
    Notification,
    /// Steady brightness only, no breathing.
    Backlight,
}

impl Handler {
    /// Sink channel this handler drives.
    pub fn channel(self) -> &'static str {
        match self {
            Handler::Notification => NOTIFICATION_CHANNEL,
            Handler::Backlight => BACKLIGHT_CHANNEL,
        }
    }

    /// Write `state` to the sink.
    ///
    /// Writes are best effort: a failed write does not stop the sequence.
    /// Every failure is returned for the caller to log and report.
    pub fn render<S: LedSink + ?Sized>(self, state: &LightState, sink: &S) -> Vec<HardwareFault> {
        let mut faults = Vec::new();
        let channel = self.channel();
        let mut check = |result: crate::sink::Result<()>| {
            if let Err(error) = result {
                faults.push(HardwareFault { channel, error });
            }
        };

        let max_brightness = match sink.read_max_brightness(channel) {
            Ok(max) => max,
            Err(error) => {
                check(Err(error));
                0
            }
        };
        let brightness = scaled_brightness(state.color, max_brightness);

        match self {
            Handler::Notification => {
                // Reset before apply: never leave breathing running under a new state.
                check(sink.write_breath(channel, false));
                check(sink.write_brightness(channel, 0));

                // Zero brightness leaves the light off.
                if brightness != 0 {
                    match state.flash_mode {
                        FlashMode::Hardware | FlashMode::Timed => {
                            check(sink.write_breath(channel, true));
                        }
                        FlashMode::None => {
                            check(sink.write_brightness(channel, brightness));
                        }
                    }
                }
            }
            Handler::Backlight => {
                check(sink.write_brightness(channel, brightness));
            }
        }
        faults
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::SinkError;
    use crate::sink::mock::{MockSink, SinkWrite};
    use std::sync::atomic::Ordering;

    const CH: &str = NOTIFICATION_CHANNEL;

    #[test]
    fn steady_state_resets_then_writes_brightness() {
        let sink = MockSink::new();
        let faults = Handler::Notification.render(&LightState::new(0xFFFF_FFFF), &sink);
        assert!(faults.is_empty());
        assert_eq!(
            sink.writes(),
            vec![
                SinkWrite::breath(CH, false),
                SinkWrite::brightness(CH, 0),
                SinkWrite::brightness(CH, 255),
            ]
        );
    }

    #[test]
    fn timed_and_hardware_flash_enable_breathing() {
        for mode in [FlashMode::Timed, FlashMode::Hardware] {
            let sink = MockSink::new();
            let state = LightState::new(0xFF00_FF00).with_flash(mode, 1000, 3000);
            Handler::Notification.render(&state, &sink);
            assert_eq!(
                sink.writes(),
                vec![
                    SinkWrite::breath(CH, false),
                    SinkWrite::brightness(CH, 0),
                    SinkWrite::breath(CH, true),
                ],
                "{mode}"
            );
        }
    }

    #[test]
    fn dark_state_only_resets() {
        let sink = MockSink::new();
        let state = LightState::new(0xFF00_0000).with_flash(FlashMode::Timed, 500, 500);
        Handler::Notification.render(&state, &sink);
        assert_eq!(
            sink.writes(),
            vec![SinkWrite::breath(CH, false), SinkWrite::brightness(CH, 0)]
        );
    }

    #[test]
    fn brightness_scaled_to_sink_max() {
        let sink = MockSink::new().with_max_brightness(CH, 1023);
        Handler::Notification.render(&LightState::new(0xFFFF_FFFF), &sink);
        assert_eq!(sink.writes().last(), Some(&SinkWrite::brightness(CH, 1023)));
    }

    #[test]
    fn unreadable_max_turns_light_off() {
        let sink = MockSink::new();
        sink.fail_reads.store(true, Ordering::SeqCst);
        let faults = Handler::Notification.render(&LightState::new(0xFFFF_FFFF), &sink);
        assert_eq!(faults.len(), 1);
        assert!(matches!(faults[0].error, SinkError::ReadFailed(_)));
        assert_eq!(
            sink.writes(),
            vec![SinkWrite::breath(CH, false), SinkWrite::brightness(CH, 0)]
        );
    }

    #[test]
    fn write_failures_are_collected_not_fatal() {
        let sink = MockSink::new();
        sink.fail_writes.store(true, Ordering::SeqCst);
        let faults = Handler::Notification.render(&LightState::new(0xFFFF_FFFF), &sink);
        // breath reset, brightness reset, steady brightness
        assert_eq!(faults.len(), 3);
        assert!(faults.iter().all(|f| f.channel == CH));
    }

    #[test]
    fn backlight_writes_steady_brightness_only() {
        let sink = MockSink::new().with_max_brightness(BACKLIGHT_CHANNEL, 2047);
        let state = LightState::new(0xFFFF_FFFF).with_flash(FlashMode::Hardware, 1, 1);
        Handler::Backlight.render(&state, &sink);
        assert_eq!(
            sink.writes(),
            vec![SinkWrite::brightness(BACKLIGHT_CHANNEL, 2047)]
        );
    }
}
