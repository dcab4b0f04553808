//! Arbitration engine — the entry point for light requests.
//!
//! [`LightEngine`] owns the state registry behind a single mutex and the LED
//! sink. Each [`LightEngine::set_light`] call is atomic with respect to every
//! other: the old winner, the registry update, the new winner and any
//! hardware writes all happen under the same lock. Hardware is only touched
//! when the winning state of the affected handler group actually changes.

use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::Serialize;

use crate::hooks::{FaultObserver, HardwareFault};
use crate::registry::{BackendEntry, BackendTable, StateRegistry};
use crate::sink::LedSink;
use crate::types::{LightState, LightType};

/// Result of a light request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Success,
    /// The type has no backend entry. Nothing was changed.
    LightNotSupported,
}

impl Status {
    pub fn is_success(self) -> bool {
        self == Status::Success
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Success => f.write_str("ok"),
            Status::LightNotSupported => f.write_str("not supported"),
        }
    }
}

pub struct LightEngine<S> {
    registry: Mutex<StateRegistry>,
    sink: S,
    observer: Option<Box<dyn FaultObserver>>,
}

impl<S: LedSink> LightEngine<S> {
    pub fn new(table: &BackendTable, sink: S) -> Self {
        LightEngine {
            registry: Mutex::new(StateRegistry::new(table)),
            sink,
            observer: None,
        }
    }

    /// Forward every hardware fault to `observer` in addition to the log.
    pub fn with_observer(mut self, observer: impl FaultObserver + 'static) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    /// Record `state` for `light_type` and update the hardware if the
    /// effective state of its handler group changed.
    ///
    /// Sink failures are logged and reported to the observer; they never
    /// change the returned status.
    pub fn set_light(&self, light_type: LightType, state: LightState) -> Status {
        let mut registry = self.lock();

        let Some(handler) = registry.handler_for(light_type) else {
            log::debug!("{light_type}: not supported");
            return Status::LightNotSupported;
        };

        let old_state = registry.resolve(handler);
        registry.update(light_type, state);
        let new_state = registry.resolve(handler);

        if old_state == new_state {
            log::debug!("{light_type}: {} state unchanged", handler.channel());
            return Status::Success;
        }

        log::debug!(
            "{light_type}: {} {:08X} -> {:08X} ({})",
            handler.channel(),
            old_state.color,
            new_state.color,
            new_state.flash_mode
        );
        let faults = handler.render(&new_state, &self.sink);
        self.report(&faults);
        Status::Success
    }

    /// Supported types in priority order.
    pub fn supported_types(&self) -> Vec<LightType> {
        self.lock().types().collect()
    }

    /// Last requested state for `light_type`, if supported.
    pub fn lookup(&self, light_type: LightType) -> Option<LightState> {
        self.lock().lookup(light_type)
    }

    /// The state currently driving the handler group of `light_type`.
    pub fn resolved(&self, light_type: LightType) -> Option<LightState> {
        let registry = self.lock();
        registry
            .handler_for(light_type)
            .map(|handler| registry.resolve(handler))
    }

    /// Copy of every backend entry, in priority order.
    pub fn snapshot(&self) -> Vec<BackendEntry> {
        self.lock().entries().to_vec()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Block until the fault observer has finished any work it started.
    pub fn wait_for_hooks(&self) {
        if let Some(observer) = &self.observer {
            observer.wait_idle();
        }
    }

    fn report(&self, faults: &[HardwareFault]) {
        if faults.is_empty() {
            return;
        }
        for fault in faults {
            log::warn!("{fault}");
        }
        if let Some(observer) = &self.observer {
            observer.on_render_faults(faults);
        }
    }

    // The registry holds plain values, so a panic elsewhere cannot leave it
    // half-updated; keep serving after poisoning.
    fn lock(&self) -> MutexGuard<'_, StateRegistry> {
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
