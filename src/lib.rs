//! A `no_std` register-level control core for the OmniVision OV9282 image sensor.
//!
//! This crate models the sensor's control plane: mode programming, exposure /
//! analog-gain / blanking controls with atomic group-hold commits, and the
//! power-up, identity-check and streaming sequence. The raw bus transport and
//! the board clock line are abstract seams supplied by the platform.
//!
//! # Features
//!
//! - **Zero heap allocation** - Mode tables are immutable statics
//! - **Explicit state machine** - Illegal transitions (e.g. streaming before a
//!   mode load) are rejected, never silently ignored
//! - **Write-through control cache** - Parameter reads never touch the bus
//! - **Atomic control commits** - Exposure and gain land on the same frame
//!   boundary via the sensor's group-hold bracket
//! - **Caller-owned retry policy** - Transport faults are classified and
//!   surfaced, never retried internally
//!
//! # Operation sequence
//!
//! ```text
//!  Off ──power_on()──▶ PoweredUnverified ──detect_and_verify()──▶ PoweredVerified
//!                                                                      │
//!                                                                 load_mode()
//!                                                                      ▼
//!            Streaming ◀──start_streaming()── Standby ◀──load_mode()──┘
//!                │                               ▲
//!                └────────stop_streaming()───────┘
//!
//!  power_off() reaches Off from any state (best-effort teardown).
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use ov9282::prelude::*;
//!
//! # struct Bus;
//! # impl RegisterBus for Bus {
//! #     fn read(&mut self, _addr: u32, _buf: &mut [u8]) -> Result<(), BusFault> { Ok(()) }
//! #     fn write(&mut self, _addr: u32, _data: &[u8]) -> Result<(), BusFault> { Ok(()) }
//! # }
//! # struct Clock;
//! # impl PowerControl for Clock {
//! #     fn enable_clock(&mut self) -> Result<(), PowerFault> { Ok(()) }
//! #     fn disable_clock(&mut self) -> Result<(), PowerFault> { Ok(()) }
//! # }
//! # struct Delay;
//! # impl embedded_hal::delay::DelayNs for Delay {
//! #     fn delay_ns(&mut self, _ns: u32) {}
//! # }
//! # fn main() -> Result<(), Error> {
//! let mut sensor = Ov9282::new(Bus, Clock, Delay);
//!
//! sensor.power_on()?;
//! sensor.detect_and_verify()?;
//! sensor.load_mode(ov9282::mode::default_mode())?;
//! sensor.start_streaming()?;
//!
//! // Exposure and gain take effect together at the next frame boundary.
//! sensor.update_exposure_gain(0x0282, 0x10)?;
//!
//! sensor.stop_streaming()?;
//! sensor.power_off();
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![no_std]

pub mod bus;
pub mod error;
pub mod mode;
pub mod regs;
pub mod sensor;

#[cfg(test)]
mod test_support;

pub use bus::RegisterBus;
pub use error::{BusFault, Error, PowerFault, PowerStep};
pub use mode::{Mode, PixelFormat, RegisterBurst, RegisterEntry};
pub use sensor::{ControlRange, Ov9282, PowerControl, PowerState, SensorHandle};

pub mod prelude {
    pub use super::{
        BusFault, ControlRange, Error, Mode, Ov9282, PixelFormat, PowerControl, PowerFault,
        PowerState, PowerStep, RegisterBurst, RegisterBus, RegisterEntry, SensorHandle,
    };
}
