//! Backend table and state registry.
//!
//! The [`BackendTable`] is the static configuration: which light types are
//! supported, which handler renders each one, and their priority (table
//! order, most important first). The [`StateRegistry`] built from it caches
//! the last requested [`LightState`] per type.

use crate::handler::Handler;
use crate::priority;
use crate::types::{LightState, LightType};

/// Ordered `(type, handler)` pairs, most important first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendTable {
    entries: Vec<(LightType, Handler)>,
}

impl BackendTable {
    /// Build a table from ordered entries. Each type may appear only once.
    pub fn new(entries: impl IntoIterator<Item = (LightType, Handler)>) -> crate::error::Result<Self> {
        let entries: Vec<_> = entries.into_iter().collect();
        for (i, (ty, _)) in entries.iter().enumerate() {
            if entries[..i].iter().any(|(other, _)| other == ty) {
                return Err(crate::LightdError::Config(format!(
                    "light type {ty} listed more than once"
                )));
            }
        }
        Ok(BackendTable { entries })
    }

    pub fn entries(&self) -> &[(LightType, Handler)] {
        &self.entries
    }

    pub fn handler_for(&self, light_type: LightType) -> Option<Handler> {
        self.entries
            .iter()
            .find(|(ty, _)| *ty == light_type)
            .map(|&(_, handler)| handler)
    }
}

impl Default for BackendTable {
    /// Attention, notifications, battery — all on the notification LED.
    fn default() -> Self {
        BackendTable {
            entries: vec![
                (LightType::Attention, Handler::Notification),
                (LightType::Notifications, Handler::Notification),
                (LightType::Battery, Handler::Notification),
            ],
        }
    }
}

/// One supported light type with its cached state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendEntry {
    pub light_type: LightType,
    pub handler: Handler,
    pub state: LightState,
}

/// Last requested state per supported type.
///
/// Entries are fixed at construction; only their `state` changes.
#[derive(Debug, Clone)]
pub struct StateRegistry {
    entries: Vec<BackendEntry>,
}

impl StateRegistry {
    /// All states start zeroed (unlit, no flash).
    pub fn new(table: &BackendTable) -> Self {
        StateRegistry {
            entries: table
                .entries()
                .iter()
                .map(|&(light_type, handler)| BackendEntry {
                    light_type,
                    handler,
                    state: LightState::default(),
                })
                .collect(),
        }
    }

    pub fn handler_for(&self, light_type: LightType) -> Option<Handler> {
        self.entry(light_type).map(|e| e.handler)
    }

    /// Overwrite the cached state. Returns `false` if the type is unsupported.
    pub fn update(&mut self, light_type: LightType, state: LightState) -> bool {
        match self.entries.iter_mut().find(|e| e.light_type == light_type) {
            Some(entry) => {
                entry.state = state;
                true
            }
            None => false,
        }
    }

    pub fn lookup(&self, light_type: LightType) -> Option<LightState> {
        self.entry(light_type).map(|e| e.state)
    }

    /// The state currently owning `handler`'s channel.
    pub fn resolve(&self, handler: Handler) -> LightState {
        priority::resolve(&self.entries, handler)
    }

    pub fn entries(&self) -> &[BackendEntry] {
        &self.entries
    }

    pub fn types(&self) -> impl Iterator<Item = LightType> + '_ {
        self.entries.iter().map(|e| e.light_type)
    }

    fn entry(&self, light_type: LightType) -> Option<&BackendEntry> {
        self.entries.iter().find(|e| e.light_type == light_type)
    }
}
