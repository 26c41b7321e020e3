//! Power-on/power-off and streaming sequencer.
//!
//! Ordered bring-up and tear-down of the physical device plus the
//! standby/streaming transition. Transition legality is carried by
//! [`PowerState`], not by a mirrored boolean, so an out-of-order command is
//! structurally rejected.

use embedded_hal::delay::DelayNs;
use log::{debug, warn};

use crate::{
    bus::{self, RegisterBus},
    error::{Error, PowerStep},
    mode::Mode,
    regs,
    sensor::{Ov9282, PowerControl, PowerState},
};

impl<B, P, D> Ov9282<B, P, D>
where
    B: RegisterBus,
    P: PowerControl,
    D: DelayNs,
{
    /// Powers the device up to [`PowerState::PoweredUnverified`].
    ///
    /// Runs, in strict order: settle delay, clock enable, settle delay. The
    /// delays are hardware stabilization waits and always elapse in full. A
    /// clock-enable failure leaves the state at `Off` with nothing enabled.
    pub fn power_on(&mut self) -> Result<(), Error> {
        self.require(PowerState::Off)?;

        self.delay.delay_us(regs::POWER_SETTLE_US);
        if self.power.enable_clock().is_err() {
            return Err(Error::PowerSequenceFailed {
                step: PowerStep::ClockEnable,
            });
        }
        self.delay.delay_us(regs::POWER_SETTLE_US);

        self.state = PowerState::PoweredUnverified;
        debug!("powered on, identity unverified");
        Ok(())
    }

    /// Reads the identity register and confirms the chip ID.
    ///
    /// On success the device moves to [`PowerState::PoweredVerified`] and
    /// general register writes become legal. A mismatch leaves the state
    /// unchanged; the caller must [`power_off`](Self::power_off) before
    /// probing again, since a second probe on a mismatched device is as
    /// likely to hang as to succeed.
    pub fn detect_and_verify(&mut self) -> Result<(), Error> {
        self.require(PowerState::PoweredUnverified)?;

        let actual = bus::read_reg(&mut self.bus, regs::REG_ID, 2)? as u16;
        if actual != regs::OV9282_ID {
            return Err(Error::IdentityMismatch {
                expected: regs::OV9282_ID,
                actual,
            });
        }

        self.state = PowerState::PoweredVerified;
        debug!("identity {actual:#06x} confirmed");
        Ok(())
    }

    /// Identity check with a fixed number of retries for transport faults.
    ///
    /// Only [`Error::Bus`] is retried; the device carries no configuration
    /// yet, so repeating the probe is safe. A mismatch is returned
    /// immediately.
    pub fn detect_and_verify_with_retries(&mut self, retries: u8) -> Result<(), Error> {
        let mut attempt = 0;
        loop {
            match self.detect_and_verify() {
                Err(Error::Bus(fault)) if attempt < retries => {
                    attempt += 1;
                    debug!("identity probe fault ({fault}), retry {attempt}/{retries}");
                }
                other => return other,
            }
        }
    }

    /// Programs a catalog mode into the sensor and enters standby.
    ///
    /// Legal from [`PowerState::PoweredVerified`] or [`PowerState::Standby`]
    /// (reconfiguration). A burst failure leaves both the sequencer state and
    /// the advertised mode unchanged and surfaces
    /// [`Error::PartialBurstFailure`].
    pub fn load_mode(&mut self, mode: &'static Mode) -> Result<(), Error> {
        match self.state {
            PowerState::PoweredVerified | PowerState::Standby => {}
            actual => return Err(Error::StateViolation { actual }),
        }

        bus::write_burst(&mut self.bus, mode.burst)?;

        self.cur_mode = mode;
        self.reset_controls_for_mode();
        self.state = PowerState::Standby;
        debug!("mode {}x{} loaded", mode.width, mode.height);
        Ok(())
    }

    /// Starts the frame stream.
    ///
    /// Only legal once a mode has been loaded; the state machine enforces
    /// this rather than a runtime flag check.
    pub fn start_streaming(&mut self) -> Result<(), Error> {
        self.require(PowerState::Standby)?;

        bus::write_reg(
            &mut self.bus,
            regs::REG_MODE_SELECT,
            1,
            regs::MODE_STREAMING,
        )?;

        self.state = PowerState::Streaming;
        debug!("streaming started");
        Ok(())
    }

    /// Returns the sensor to standby. A no-op when already in standby.
    pub fn stop_streaming(&mut self) -> Result<(), Error> {
        match self.state {
            PowerState::Standby => return Ok(()),
            PowerState::Streaming => {}
            actual => return Err(Error::StateViolation { actual }),
        }

        bus::write_reg(&mut self.bus, regs::REG_MODE_SELECT, 1, regs::MODE_STANDBY)?;

        self.state = PowerState::Standby;
        debug!("streaming stopped");
        Ok(())
    }

    /// Unconditional power-down; reaches [`PowerState::Off`] from any state.
    ///
    /// Hardware teardown is best-effort: a clock-disable fault is logged and
    /// the device is still considered off. This is the escape transition used
    /// during error unwinding anywhere in the sequence.
    pub fn power_off(&mut self) {
        if self.power.disable_clock().is_err() {
            warn!("clock disable failed during power-down");
        }
        self.state = PowerState::Off;
        debug!("powered off");
    }
}
