//! Priority resolution within a handler group.

use crate::handler::Handler;
use crate::registry::BackendEntry;
use crate::types::LightState;

/// Pick the state that drives `handler`'s channel.
///
/// Entries are scanned in table order and only those rendered by `handler`
/// are considered. The first lit one wins; lower-priority lit states are
/// ignored. When nothing is lit the *last* entry of the group is returned
/// as-is, including whatever flash timing or brightness mode it carries.
/// An empty group resolves to the default state.
pub fn resolve(entries: &[BackendEntry], handler: Handler) -> LightState {
    let mut fallback = LightState::default();
    for entry in entries.iter().filter(|e| e.handler == handler) {
        if entry.state.is_lit() {
            return entry.state;
        }
        fallback = entry.state;
    }
    fallback
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FlashMode, LightType};

    fn entry(light_type: LightType, handler: Handler, color: u32) -> BackendEntry {
        BackendEntry {
            light_type,
            handler,
            state: LightState::new(color),
        }
    }

    #[test]
    fn first_lit_entry_wins() {
        let entries = [
            entry(LightType::Attention, Handler::Notification, 0xFFFF_0000),
            entry(LightType::Notifications, Handler::Notification, 0xFF00_FF00),
        ];
        assert_eq!(
            resolve(&entries, Handler::Notification).color,
            0xFFFF_0000
        );
    }

    #[test]
    fn unlit_high_priority_is_skipped() {
        let entries = [
            entry(LightType::Attention, Handler::Notification, 0xFF00_0000),
            entry(LightType::Notifications, Handler::Notification, 0x0000_0000),
            entry(LightType::Battery, Handler::Notification, 0x0000_00FF),
        ];
        assert_eq!(resolve(&entries, Handler::Notification).color, 0x0000_00FF);
    }

    #[test]
    fn nothing_lit_returns_last_entry_verbatim() {
        let mut entries = [
            entry(LightType::Attention, Handler::Notification, 0),
            entry(LightType::Battery, Handler::Notification, 0xFF00_0000),
        ];
        entries[1].state = entries[1].state.with_flash(FlashMode::Timed, 250, 750);
        let resolved = resolve(&entries, Handler::Notification);
        // Stale flash timing on the last entry leaks into the "off" state.
        assert_eq!(resolved, entries[1].state);
        assert!(!resolved.is_lit());
    }

    #[test]
    fn other_groups_are_ignored() {
        let entries = [
            entry(LightType::Backlight, Handler::Backlight, 0xFFFF_FFFF),
            entry(LightType::Battery, Handler::Notification, 0),
            entry(LightType::Keyboard, Handler::Backlight, 0),
        ];
        assert_eq!(resolve(&entries, Handler::Notification).color, 0);
        assert_eq!(resolve(&entries, Handler::Backlight).color, 0xFFFF_FFFF);
    }

    #[test]
    fn empty_group_resolves_to_default() {
        let entries = [entry(LightType::Battery, Handler::Notification, 0xFFFF_FFFF)];
        assert_eq!(resolve(&entries, Handler::Backlight), LightState::default());
    }
}
