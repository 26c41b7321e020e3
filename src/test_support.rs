//! Test support utilities - only compiled in test builds.

use heapless::{index_map::FnvIndexMap, Vec};

use crate::{
    bus::RegisterBus,
    error::{BusFault, PowerFault},
    mode, regs,
    sensor::{Ov9282, PowerControl},
};

/// Byte-level record of one transport write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteOp {
    pub addr: u32,
    pub data: Vec<u8, 4>,
}

/// In-memory register bus with a write log and fault injection.
pub struct MockBus {
    regs: FnvIndexMap<u32, u8, 256>,
    pub writes: Vec<WriteOp, 256>,
    pub reads: usize,
    /// Writes touching this address fail with a NACK.
    pub fail_write_at: Option<u32>,
    /// The next N reads fail with a timeout.
    pub fail_reads: u8,
}

impl MockBus {
    pub fn new() -> Self {
        Self {
            regs: FnvIndexMap::new(),
            writes: Vec::new(),
            reads: 0,
            fail_write_at: None,
            fail_reads: 0,
        }
    }

    /// Bus with the given chip ID behind the identity register.
    pub fn with_identity(id: u16) -> Self {
        let mut bus = Self::new();
        bus.preload(regs::REG_ID, &id.to_be_bytes());
        bus
    }

    pub fn preload(&mut self, addr: u32, data: &[u8]) {
        for (i, byte) in data.iter().enumerate() {
            self.regs.insert(addr + i as u32, *byte).unwrap();
        }
    }

    /// Value currently latched at `addr`; zero when never written.
    pub fn reg(&self, addr: u32) -> u8 {
        self.regs.get(&addr).copied().unwrap_or(0)
    }
}

impl RegisterBus for MockBus {
    fn read(&mut self, addr: u32, buf: &mut [u8]) -> Result<(), BusFault> {
        self.reads += 1;
        if self.fail_reads > 0 {
            self.fail_reads -= 1;
            return Err(BusFault::Timeout);
        }
        for (i, slot) in buf.iter_mut().enumerate() {
            *slot = self.reg(addr + i as u32);
        }
        Ok(())
    }

    fn write(&mut self, addr: u32, data: &[u8]) -> Result<(), BusFault> {
        if let Some(fail) = self.fail_write_at {
            if (addr..addr + data.len() as u32).contains(&fail) {
                return Err(BusFault::Nack);
            }
        }
        let mut op = WriteOp {
            addr,
            data: Vec::new(),
        };
        for (i, byte) in data.iter().enumerate() {
            let _ = self.regs.insert(addr + i as u32, *byte);
            op.data.push(*byte).unwrap();
        }
        self.writes.push(op).unwrap();
        Ok(())
    }
}

/// Board clock double; can be told to fail the enable step.
#[derive(Default)]
pub struct MockPower {
    pub enabled: bool,
    pub fail_enable: bool,
}

impl PowerControl for MockPower {
    fn enable_clock(&mut self) -> Result<(), PowerFault> {
        if self.fail_enable {
            return Err(PowerFault);
        }
        self.enabled = true;
        Ok(())
    }

    fn disable_clock(&mut self) -> Result<(), PowerFault> {
        self.enabled = false;
        Ok(())
    }
}

/// Delay provider that only accumulates the requested time.
#[derive(Default)]
pub struct CountingDelay {
    pub total_us: u64,
}

impl embedded_hal::delay::DelayNs for CountingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_us += u64::from(ns) / 1000;
    }
}

pub type TestSensor = Ov9282<MockBus, MockPower, CountingDelay>;

/// Device in the off state with the correct identity behind the bus.
pub fn sensor() -> TestSensor {
    sensor_with_bus(MockBus::with_identity(regs::OV9282_ID))
}

pub fn sensor_with_bus(bus: MockBus) -> TestSensor {
    Ov9282::new(bus, MockPower::default(), CountingDelay::default())
}

/// Device brought to standby with the default mode loaded.
pub fn standby_sensor() -> TestSensor {
    let mut sensor = sensor();
    sensor.power_on().unwrap();
    sensor.detect_and_verify().unwrap();
    sensor.load_mode(mode::default_mode()).unwrap();
    sensor
}
