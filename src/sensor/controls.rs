//! Externally tunable parameters: exposure, analog gain, vertical blanking.
//!
//! Reads are served from a write-through cache and never touch the bus; a
//! cached value is only updated after the corresponding register write has
//! been confirmed. Exposure and gain reach the hardware through a group-hold
//! bracket so both take effect on the same frame boundary.

use embedded_hal::delay::DelayNs;
use heapless::Vec;

use crate::{
    bus::{self, RegisterBus},
    error::Error,
    regs,
    sensor::{Ov9282, PowerControl, PowerState},
};

/// Valid range of a control parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlRange {
    pub min: u32,
    pub max: u32,
    pub step: u32,
    pub default: u32,
}

impl ControlRange {
    pub const fn contains(&self, value: u32) -> bool {
        value >= self.min && value <= self.max
    }

    pub(crate) fn clamp(&self, value: u32) -> u32 {
        value.clamp(self.min, self.max)
    }
}

/// One register write queued for a group-hold bracket.
#[derive(Debug, Clone, Copy)]
struct PatchWrite {
    addr: u32,
    len: usize,
    value: u32,
}

/// Register writes applied as one unit at the next frame boundary.
type CommitPatch = Vec<PatchWrite, 4>;

impl<B, P, D> Ov9282<B, P, D>
where
    B: RegisterBus,
    P: PowerControl,
    D: DelayNs,
{
    /// Last committed exposure, in lines.
    pub fn exposure(&self) -> u32 {
        self.exposure
    }

    /// Exposure range derived from the current vertical blanking.
    ///
    /// Recomputed on every query; shrinking vblank shrinks the ceiling.
    pub fn exposure_range(&self) -> ControlRange {
        let max = self
            .vblank
            .saturating_sub(regs::EXPOSURE_OFFSET)
            .max(regs::EXPOSURE_MIN);
        ControlRange {
            min: regs::EXPOSURE_MIN,
            max,
            step: regs::EXPOSURE_STEP,
            default: regs::EXPOSURE_DEFAULT,
        }
    }

    /// Last committed analog gain.
    pub fn again(&self) -> u32 {
        self.again
    }

    /// Analog gain range; fixed, independent of mode.
    pub fn again_range(&self) -> ControlRange {
        ControlRange {
            min: regs::AGAIN_MIN,
            max: regs::AGAIN_MAX,
            step: regs::AGAIN_STEP,
            default: regs::AGAIN_DEFAULT,
        }
    }

    /// Current vertical blanking, in lines.
    pub fn vblank(&self) -> u32 {
        self.vblank
    }

    /// Vertical blanking bounds of the advertised mode.
    pub fn vblank_range(&self) -> ControlRange {
        ControlRange {
            min: self.cur_mode.vblank_min,
            max: self.cur_mode.vblank_max,
            step: 1,
            default: self.cur_mode.vblank_default,
        }
    }

    /// Sets the vertical blanking, updating the frame-length register.
    ///
    /// Shrinking the frame lowers the exposure ceiling; a cached exposure
    /// above the new maximum is clamped down (the sensor saturates, it does
    /// not fault) and reaches the hardware at the next exposure commit.
    pub fn set_vblank(&mut self, vblank: u32) -> Result<(), Error> {
        self.require_configured()?;
        if !self.vblank_range().contains(vblank) {
            return Err(Error::OutOfRange);
        }

        let lpfr = vblank + self.cur_mode.height;
        bus::write_reg(&mut self.bus, regs::REG_LPFR, 2, lpfr)?;

        self.vblank = vblank;
        self.exposure = self.exposure_range().clamp(self.exposure);
        Ok(())
    }

    /// Commits a new exposure together with the cached analog gain.
    ///
    /// Values outside the current range saturate instead of erroring.
    pub fn set_exposure(&mut self, exposure: u32) -> Result<(), Error> {
        let again = self.again;
        self.update_exposure_gain(exposure, again)
    }

    /// Commits a new analog gain together with the cached exposure.
    pub fn set_again(&mut self, again: u32) -> Result<(), Error> {
        let exposure = self.exposure;
        self.update_exposure_gain(exposure, again)
    }

    /// Applies exposure and gain as one atomic unit at the next frame
    /// boundary.
    ///
    /// Exposure saturates at its current range; gain outside its fixed range
    /// is rejected with [`Error::OutOfRange`] before any bus access. The
    /// caches update only after the whole bracket has been confirmed.
    pub fn update_exposure_gain(&mut self, exposure: u32, again: u32) -> Result<(), Error> {
        self.require_configured()?;
        if !self.again_range().contains(again) {
            return Err(Error::OutOfRange);
        }
        let exposure = self.exposure_range().clamp(exposure);

        // Assembled before the hold is asserted, so an encoding error can
        // never leave the hold register set.
        let lpfr = self.vblank + self.cur_mode.height;
        let mut patch = CommitPatch::new();
        stage(&mut patch, regs::REG_LPFR, 2, lpfr)?;
        stage(&mut patch, regs::REG_EXPOSURE, 3, exposure << 4)?;
        stage(&mut patch, regs::REG_AGAIN, 1, again)?;
        self.commit(&patch)?;

        self.exposure = exposure;
        self.again = again;
        Ok(())
    }

    /// Runs a group-hold bracket: assert hold, patch writes in order,
    /// release hold.
    ///
    /// After a successful assert the release is written exactly once, even
    /// when a patch write fails, so the sensor is never left frozen on a
    /// stale hold.
    fn commit(&mut self, patch: &CommitPatch) -> Result<(), Error> {
        bus::write_reg(&mut self.bus, regs::REG_HOLD, 1, 1)
            .map_err(|_| Error::ControlCommitFailed)?;

        let mut applied = Ok(());
        for write in patch {
            applied = bus::write_reg(&mut self.bus, write.addr, write.len, write.value);
            if applied.is_err() {
                break;
            }
        }
        let released = bus::write_reg(&mut self.bus, regs::REG_HOLD, 1, 0);

        if applied.is_err() || released.is_err() {
            return Err(Error::ControlCommitFailed);
        }
        Ok(())
    }

    /// Control writes need a programmed mode behind the advertised ranges.
    fn require_configured(&self) -> Result<(), Error> {
        match self.state() {
            PowerState::Standby | PowerState::Streaming => Ok(()),
            actual => Err(Error::StateViolation { actual }),
        }
    }

    /// Re-derives cached controls after a mode load.
    pub(crate) fn reset_controls_for_mode(&mut self) {
        self.vblank = self.cur_mode.vblank_default;
        self.exposure = self.exposure_range().clamp(self.exposure);
    }
}

fn stage(patch: &mut CommitPatch, addr: u32, len: usize, value: u32) -> Result<(), Error> {
    patch
        .push(PatchWrite { addr, len, value })
        .map_err(|_| Error::InvalidValue)
}
