//! Register access protocol: typed read/write primitives over an abstract
//! addressable bus.
//!
//! The transport itself (I2C, SCCB, a simulator) lives behind [`RegisterBus`];
//! this module adds address-window validation, big-endian multi-byte encoding,
//! and ordered burst application on top of it.

use crate::{
    error::{BusFault, Error},
    mode::RegisterEntry,
    regs,
};

/// Raw byte transport to the sensor's register file.
///
/// Multi-byte transfers address consecutive registers: byte `i` of the buffer
/// maps to register `addr + i`, matching the sensor's auto-increment
/// addressing. Implementations classify failures as [`BusFault`] and never
/// retry; retry policy is context-dependent and belongs to the caller.
pub trait RegisterBus {
    /// Reads `buf.len()` consecutive registers starting at `addr`.
    fn read(&mut self, addr: u32, buf: &mut [u8]) -> Result<(), BusFault>;

    /// Writes `data.len()` consecutive registers starting at `addr`.
    fn write(&mut self, addr: u32, data: &[u8]) -> Result<(), BusFault>;
}

/// Widest register value handled by the typed primitives, in bytes.
pub const MAX_REG_WIDTH: usize = 4;

/// Reads a `len`-byte register value, high byte first.
pub fn read_reg<B: RegisterBus>(bus: &mut B, addr: u32, len: usize) -> Result<u32, Error> {
    check_window(addr, len)?;
    let mut bytes = [0u8; MAX_REG_WIDTH];
    bus.read(addr, &mut bytes[MAX_REG_WIDTH - len..])?;
    Ok(u32::from_be_bytes(bytes))
}

/// Writes a `len`-byte register value, high byte first.
///
/// The value must fit in `len` bytes; violations fail with
/// [`Error::InvalidValue`] before the bus is touched.
pub fn write_reg<B: RegisterBus>(
    bus: &mut B,
    addr: u32,
    len: usize,
    value: u32,
) -> Result<(), Error> {
    check_window(addr, len)?;
    if len < MAX_REG_WIDTH && value >> (len * 8) != 0 {
        return Err(Error::InvalidValue);
    }
    let bytes = value.to_be_bytes();
    bus.write(addr, &bytes[MAX_REG_WIDTH - len..])?;
    Ok(())
}

/// Applies a register burst strictly in declaration order.
///
/// Stops at the first transport fault and reports how far it got. There is no
/// rollback: sensor registers have no generic undo semantics, so partial
/// application is surfaced, never hidden.
pub fn write_burst<B: RegisterBus>(bus: &mut B, entries: &[RegisterEntry]) -> Result<(), Error> {
    for (index, entry) in entries.iter().enumerate() {
        if let Err(fault) = bus.write(u32::from(entry.address), &[entry.value]) {
            return Err(Error::PartialBurstFailure {
                last_good_index: index.checked_sub(1),
                fault,
            });
        }
    }
    Ok(())
}

/// The address window starts at zero, so only width and upper bound need
/// checking.
fn check_window(addr: u32, len: usize) -> Result<(), Error> {
    if len == 0 || len > MAX_REG_WIDTH {
        return Err(Error::InvalidValue);
    }
    let last = addr
        .checked_add(len as u32 - 1)
        .ok_or(Error::InvalidAddress(addr))?;
    if last > regs::REG_MAX {
        return Err(Error::InvalidAddress(addr));
    }
    Ok(())
}
