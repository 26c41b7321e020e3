//! Live sensor device model: power state, active mode, cached controls.

mod controls;
mod handle;
mod power;

pub use controls::ControlRange;
pub use handle::SensorHandle;

use crate::{
    error::{Error, PowerFault},
    mode::{self, Mode},
    regs,
};

/// Power and streaming state of the device.
///
/// Transitions happen only through the sequencer operations; any operation
/// issued in the wrong state fails with [`Error::StateViolation`] rather than
/// silently no-oping. The machine is cyclic; the device may be power-cycled
/// indefinitely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerState {
    /// No clock enabled.
    Off,
    /// Powered, identity not yet confirmed. Only the identity read is legal.
    PoweredUnverified,
    /// Identity confirmed; register writes are legal.
    PoweredVerified,
    /// A mode has been programmed; the sensor idles between frames.
    Standby,
    /// Actively producing frames.
    Streaming,
}

/// Board-level input clock for the sensor (and the reset line, where the
/// board ties the two together).
///
/// Supplied by the platform; pin and clock acquisition are out of scope here.
pub trait PowerControl {
    /// Enables the sensor input clock.
    fn enable_clock(&mut self) -> Result<(), PowerFault>;

    /// Disables the sensor input clock.
    fn disable_clock(&mut self) -> Result<(), PowerFault>;
}

/// OV9282 control core over an abstract register bus.
///
/// Exactly one controlling context issues commands at a time: every
/// state-mutating operation takes `&mut self`, and bus operations block until
/// the transfer completes. Wrap the device in a [`SensorHandle`] when it must
/// be reached from more than one context.
pub struct Ov9282<B, P, D> {
    bus: B,
    power: P,
    delay: D,
    state: PowerState,
    cur_mode: &'static Mode,
    vblank: u32,
    exposure: u32,
    again: u32,
}

impl<B, P, D> Ov9282<B, P, D> {
    /// Creates a device model in the [`PowerState::Off`] state.
    ///
    /// Control ranges are advertised from the catalog default mode until a
    /// mode is loaded; control writes stay illegal until then.
    pub fn new(bus: B, power: P, delay: D) -> Self {
        let cur_mode = mode::default_mode();
        Self {
            bus,
            power,
            delay,
            state: PowerState::Off,
            cur_mode,
            vblank: cur_mode.vblank_default,
            exposure: regs::EXPOSURE_DEFAULT,
            again: regs::AGAIN_DEFAULT,
        }
    }

    /// Current sequencer state.
    pub fn state(&self) -> PowerState {
        self.state
    }

    /// The mode whose descriptor and ranges are currently advertised.
    ///
    /// Reflects the hardware register file only in [`PowerState::Standby`]
    /// and [`PowerState::Streaming`].
    pub fn current_mode(&self) -> &'static Mode {
        self.cur_mode
    }

    /// Releases the bus, power control and delay provider.
    pub fn release(self) -> (B, P, D) {
        (self.bus, self.power, self.delay)
    }

    pub(crate) fn require(&self, expected: PowerState) -> Result<(), Error> {
        if self.state == expected {
            Ok(())
        } else {
            Err(Error::StateViolation { actual: self.state })
        }
    }
}
