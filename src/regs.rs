//! OV9282 register map and control constants.
//!
//! Bit-exact values; the addresses and ranges here must be preserved for
//! hardware compatibility.

/// Streaming mode select.
pub const REG_MODE_SELECT: u32 = 0x0100;
pub const MODE_STANDBY: u32 = 0x00;
pub const MODE_STREAMING: u32 = 0x01;

/// Lines per frame, high byte first.
pub const REG_LPFR: u32 = 0x380e;

/// Chip identity.
pub const REG_ID: u32 = 0x300a;
pub const OV9282_ID: u16 = 0x9281;

/// Exposure control, three bytes; the value is stored left-shifted by four.
pub const REG_EXPOSURE: u32 = 0x3500;
pub const EXPOSURE_MIN: u32 = 1;
/// Lines reserved for readout overhead; caps exposure below vblank.
pub const EXPOSURE_OFFSET: u32 = 12;
pub const EXPOSURE_STEP: u32 = 1;
pub const EXPOSURE_DEFAULT: u32 = 0x0282;

/// Analog gain control, single byte.
///
/// Range and step are kept literally as documented for this revision; see
/// DESIGN.md before reusing them for other sensor revisions.
pub const REG_AGAIN: u32 = 0x3509;
pub const AGAIN_MIN: u32 = 0x10;
pub const AGAIN_MAX: u32 = 0xff;
pub const AGAIN_STEP: u32 = 1;
pub const AGAIN_DEFAULT: u32 = 0x10;

/// Group hold; 1 asserts, 0 releases.
pub const REG_HOLD: u32 = 0x3308;

/// Input clock rate in Hz.
pub const INCLK_RATE: u32 = 24_000_000;

/// CSI-2 link configuration.
pub const LINK_FREQ: u64 = 400_000_000;
pub const NUM_DATA_LANES: u32 = 2;

/// Legal register address window.
pub const REG_MIN: u32 = 0x00;
pub const REG_MAX: u32 = 0xfffff;

/// Mandatory stabilization wait around the clock change, in microseconds.
/// Must elapse in full; not an operation timeout.
pub const POWER_SETTLE_US: u32 = 400;
