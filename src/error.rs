use thiserror::Error;

use crate::sensor::PowerState;

/// Transport-level failure classified by the [`RegisterBus`](crate::bus::RegisterBus)
/// implementation.
///
/// Potentially transient. Nothing in this crate retries a faulted transfer;
/// the right retry count depends on context (identity probe vs. runtime
/// control write) and is the caller's decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BusFault {
    /// The transaction did not complete in time.
    #[error("bus transaction timed out")]
    Timeout,
    /// The device did not acknowledge the transfer.
    #[error("device did not acknowledge the transfer")]
    Nack,
}

/// Board-level power step failure reported by
/// [`PowerControl`](crate::sensor::PowerControl).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("power rail or clock fault")]
pub struct PowerFault;

/// Step of the power-on sequence that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerStep {
    /// Enabling the sensor input clock.
    ClockEnable,
}

/// Errors surfaced by sensor control operations.
///
/// Every hardware-facing failure resolves to one of these; nothing is
/// suppressed. The two best-effort paths (group-hold release, power-down
/// teardown) still return the original error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    /// Transport failure; retry policy is the caller's.
    #[error("bus transport failure: {0}")]
    Bus(#[from] BusFault),
    /// Register address outside the legal window. Indicates a catalog or
    /// caller bug; never retried and never sent to the bus.
    #[error("register address {0:#x} is outside the legal window")]
    InvalidAddress(u32),
    /// Register value too wide for the transfer, or an unsupported transfer
    /// width. Rejected before the bus is touched.
    #[error("register value or transfer width is invalid")]
    InvalidValue,
    /// The identity register did not match the expected chip ID. Fatal to
    /// the current attach attempt; power-cycle before probing again.
    #[error("identity mismatch: expected {expected:#06x}, read {actual:#06x}")]
    IdentityMismatch { expected: u16, actual: u16 },
    /// A register burst stopped mid-sequence, leaving the hardware in an
    /// intermediate register state. `last_good_index` is the last entry that
    /// was applied, or `None` when the first entry already failed.
    #[error("register burst aborted, last applied entry {last_good_index:?}")]
    PartialBurstFailure {
        last_good_index: Option<usize>,
        fault: BusFault,
    },
    /// The group-hold bracket could not complete. The hold register has been
    /// released (best-effort) before this was returned.
    #[error("group-hold commit did not complete")]
    ControlCommitFailed,
    /// No catalog mode with the requested geometry.
    #[error("unsupported sensor mode")]
    UnsupportedMode,
    /// Parameter value outside its valid range. Rejected before any bus
    /// access.
    #[error("parameter value outside its valid range")]
    OutOfRange,
    /// A power-on step failed; the device is back in the off state.
    #[error("power sequence failed at step {step:?}")]
    PowerSequenceFailed { step: PowerStep },
    /// The operation is not legal in the current sequencer state.
    #[error("operation not legal in state {actual:?}")]
    StateViolation { actual: PowerState },
}
