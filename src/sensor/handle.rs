//! Serialized shared access to one sensor instance.

use core::cell::RefCell;

use critical_section::Mutex;
use embedded_hal::delay::DelayNs;

use crate::{
    bus::RegisterBus,
    sensor::{ControlRange, Ov9282, PowerControl, PowerState},
};

/// Shares one [`Ov9282`] between controlling contexts.
///
/// The device is a shared external resource with serialized access, not a
/// lock-free structure: state-mutating operations run through
/// [`with`](Self::with), which holds a critical section for the whole
/// operation. Cached parameter reads only observe the write-through cache and
/// hold the section just long enough to copy the values out.
pub struct SensorHandle<B, P, D> {
    inner: Mutex<RefCell<Ov9282<B, P, D>>>,
}

impl<B, P, D> SensorHandle<B, P, D>
where
    B: RegisterBus,
    P: PowerControl,
    D: DelayNs,
{
    pub const fn new(sensor: Ov9282<B, P, D>) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(sensor)),
        }
    }

    /// Runs a serialized operation against the device.
    ///
    /// Only one commit, mode load or power transition can be in flight at a
    /// time; everything inside the closure observes and mutates the device
    /// exclusively.
    pub fn with<R>(&self, f: impl FnOnce(&mut Ov9282<B, P, D>) -> R) -> R {
        critical_section::with(|cs| f(&mut self.inner.borrow_ref_mut(cs)))
    }

    /// Current sequencer state.
    pub fn state(&self) -> PowerState {
        self.read(|sensor| sensor.state())
    }

    /// Last committed exposure and its current range.
    pub fn exposure(&self) -> (u32, ControlRange) {
        self.read(|sensor| (sensor.exposure(), sensor.exposure_range()))
    }

    /// Last committed analog gain and its range.
    pub fn again(&self) -> (u32, ControlRange) {
        self.read(|sensor| (sensor.again(), sensor.again_range()))
    }

    /// Current vertical blanking and its bounds.
    pub fn vblank(&self) -> (u32, ControlRange) {
        self.read(|sensor| (sensor.vblank(), sensor.vblank_range()))
    }

    /// Consumes the handle, returning the device.
    pub fn into_inner(self) -> Ov9282<B, P, D> {
        self.inner.into_inner().into_inner()
    }

    fn read<R>(&self, f: impl FnOnce(&Ov9282<B, P, D>) -> R) -> R {
        critical_section::with(|cs| f(&self.inner.borrow_ref(cs)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{mode, regs, test_support};

    #[test]
    fn operations_run_through_the_handle() {
        let handle = SensorHandle::new(test_support::sensor());

        handle
            .with(|sensor| {
                sensor.power_on()?;
                sensor.detect_and_verify()?;
                sensor.load_mode(mode::default_mode())?;
                sensor.start_streaming()
            })
            .unwrap();

        assert_eq!(handle.state(), PowerState::Streaming);
    }

    #[test]
    fn cached_reads_reflect_last_commit() {
        let handle = SensorHandle::new(test_support::standby_sensor());

        handle.with(|sensor| sensor.update_exposure_gain(0x0300, 0x20)).unwrap();

        let (exposure, range) = handle.exposure();
        assert_eq!(exposure, 0x0300);
        assert_eq!(range.min, regs::EXPOSURE_MIN);

        let (again, _) = handle.again();
        assert_eq!(again, 0x20);

        let (vblank, vrange) = handle.vblank();
        assert_eq!(vblank, vrange.default);
    }

    #[test]
    fn into_inner_returns_the_device() {
        let handle = SensorHandle::new(test_support::sensor());
        let sensor = handle.into_inner();
        assert_eq!(sensor.state(), PowerState::Off);
    }
}
