//! Output control
//!
//! The switch drives a single digital output. The pin itself sits behind
//! [`OutputPin`]; [`DeviceController`] owns it and is the only writer of the
//! output state.

pub mod pin;

pub use pin::{LogPin, OutputPin};

use tokio::sync::watch;

/// Owns the output pin and the current output level.
pub struct DeviceController<P> {
    pin: P,
    state: watch::Sender<bool>,
}

impl<P: OutputPin> DeviceController<P> {
    /// Takes ownership of the pin and drives it low.
    pub fn new(mut pin: P) -> Self {
        pin.set_level(false);
        let (state, _) = watch::channel(false);

        tracing::info!(pin = pin.number(), "output configured, level low");

        Self { pin, state }
    }

    /// Drives the output to `on`.
    ///
    /// Writing the level already set is harmless; the pin is written either way.
    pub fn set_output(&mut self, on: bool) {
        self.pin.set_level(on);

        let changed = self.state.send_if_modified(|level| {
            let changed = *level != on;
            *level = on;
            changed
        });

        if changed {
            tracing::info!(pin = self.pin.number(), on, "output switched");
        } else {
            tracing::debug!(pin = self.pin.number(), on, "output unchanged");
        }
    }

    /// Current output level.
    pub fn output(&self) -> bool {
        *self.state.borrow()
    }

    /// Snapshot receiver for the output level.
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.state.subscribe()
    }

    pub fn pin(&self) -> &P {
        &self.pin
    }
}
