//! Immutable catalog of supported output configurations.
//!
//! Modes are defined statically at startup, never mutated, and shared
//! read-only across the process; multiple device instances may hold
//! references into this catalog without ownership ambiguity.

use crate::{error::Error, regs};

/// One register initialization entry, fixed at compile time per mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterEntry {
    pub address: u16,
    pub value: u8,
}

/// Ordered register sequence programming one mode.
///
/// Order is significant: later entries may depend on earlier ones (the PLL
/// multiplier must land before its divider).
pub type RegisterBurst = &'static [RegisterEntry];

/// Media-bus pixel format produced by the sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum PixelFormat {
    /// 10-bit greyscale (`MEDIA_BUS_FMT_Y10_1X10`).
    Y10 = 0x200a,
}

impl PixelFormat {
    /// Media-bus format code consumed by the host graph.
    pub const fn code(self) -> u32 {
        self as u32
    }
}

/// Immutable description of one sensor output configuration.
///
/// The vblank bounds are fixed at definition time and satisfy
/// `vblank_min <= vblank_default <= vblank_max` for every catalog entry.
/// Width, height, format code, pixel clock and link frequency make up the
/// descriptor the host media graph uses to negotiate the transport link;
/// this crate only supplies the data.
#[derive(Debug)]
pub struct Mode {
    pub width: u32,
    pub height: u32,
    pub code: PixelFormat,
    pub hblank: u32,
    pub vblank_default: u32,
    pub vblank_min: u32,
    pub vblank_max: u32,
    /// Sensor pixel clock in Hz.
    pub pclk: u64,
    /// Index into [`LINK_FREQS`].
    pub link_freq_idx: usize,
    pub burst: RegisterBurst,
}

impl Mode {
    /// Link frequency negotiated for this mode, in Hz.
    pub fn link_freq(&self) -> u64 {
        LINK_FREQS[self.link_freq_idx]
    }

    pub const fn pixel_count(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

/// Link frequencies referenced by [`Mode::link_freq_idx`].
pub static LINK_FREQS: [u64; 1] = [regs::LINK_FREQ];

/// Looks up a catalog mode by output geometry.
pub fn lookup(width: u32, height: u32) -> Result<&'static Mode, Error> {
    MODES
        .iter()
        .copied()
        .find(|mode| mode.width == width && mode.height == height)
        .ok_or(Error::UnsupportedMode)
}

/// Highest-resolution catalog entry: maximum pixel count, with declaration
/// order breaking ties.
pub fn default_mode() -> &'static Mode {
    pick_default(&MODES)
}

fn pick_default<'a>(modes: &[&'a Mode]) -> &'a Mode {
    let mut best = modes[0];
    for mode in &modes[1..] {
        if mode.pixel_count() > best.pixel_count() {
            best = mode;
        }
    }
    best
}

/// Every supported mode, in declaration order.
pub static MODES: [&Mode; 1] = [&MODE_1280X720];

static MODE_1280X720: Mode = Mode {
    width: 1280,
    height: 720,
    code: PixelFormat::Y10,
    hblank: 250,
    vblank_default: 1022,
    vblank_min: 151,
    vblank_max: 51540,
    pclk: 160_000_000,
    link_freq_idx: 0,
    burst: &MODE_1280X720_REGS,
};

static MODE_1280X720_REGS: [RegisterEntry; 99] = [
    RegisterEntry { address: 0x0302, value: 0x32 },
    RegisterEntry { address: 0x030d, value: 0x50 },
    RegisterEntry { address: 0x030e, value: 0x02 },
    RegisterEntry { address: 0x3001, value: 0x00 },
    RegisterEntry { address: 0x3004, value: 0x00 },
    RegisterEntry { address: 0x3005, value: 0x00 },
    RegisterEntry { address: 0x3006, value: 0x04 },
    RegisterEntry { address: 0x3011, value: 0x0a },
    RegisterEntry { address: 0x3013, value: 0x18 },
    RegisterEntry { address: 0x301c, value: 0xf0 },
    RegisterEntry { address: 0x3022, value: 0x01 },
    RegisterEntry { address: 0x3030, value: 0x10 },
    RegisterEntry { address: 0x3039, value: 0x32 },
    RegisterEntry { address: 0x303a, value: 0x00 },
    RegisterEntry { address: 0x3500, value: 0x00 },
    RegisterEntry { address: 0x3501, value: 0x5f },
    RegisterEntry { address: 0x3502, value: 0x1e },
    RegisterEntry { address: 0x3503, value: 0x08 },
    RegisterEntry { address: 0x3505, value: 0x8c },
    RegisterEntry { address: 0x3507, value: 0x03 },
    RegisterEntry { address: 0x3508, value: 0x00 },
    RegisterEntry { address: 0x3509, value: 0x10 },
    RegisterEntry { address: 0x3610, value: 0x80 },
    RegisterEntry { address: 0x3611, value: 0xa0 },
    RegisterEntry { address: 0x3620, value: 0x6e },
    RegisterEntry { address: 0x3632, value: 0x56 },
    RegisterEntry { address: 0x3633, value: 0x78 },
    RegisterEntry { address: 0x3666, value: 0x00 },
    RegisterEntry { address: 0x366f, value: 0x5a },
    RegisterEntry { address: 0x3680, value: 0x84 },
    RegisterEntry { address: 0x3712, value: 0x80 },
    RegisterEntry { address: 0x372d, value: 0x22 },
    RegisterEntry { address: 0x3731, value: 0x80 },
    RegisterEntry { address: 0x3732, value: 0x30 },
    RegisterEntry { address: 0x3778, value: 0x00 },
    RegisterEntry { address: 0x377d, value: 0x22 },
    RegisterEntry { address: 0x3788, value: 0x02 },
    RegisterEntry { address: 0x3789, value: 0xa4 },
    RegisterEntry { address: 0x378a, value: 0x00 },
    RegisterEntry { address: 0x378b, value: 0x4a },
    RegisterEntry { address: 0x3799, value: 0x20 },
    RegisterEntry { address: 0x3800, value: 0x00 },
    RegisterEntry { address: 0x3801, value: 0x00 },
    RegisterEntry { address: 0x3802, value: 0x00 },
    RegisterEntry { address: 0x3803, value: 0x00 },
    RegisterEntry { address: 0x3804, value: 0x05 },
    RegisterEntry { address: 0x3805, value: 0x0f },
    RegisterEntry { address: 0x3806, value: 0x02 },
    RegisterEntry { address: 0x3807, value: 0xdf },
    RegisterEntry { address: 0x3808, value: 0x05 },
    RegisterEntry { address: 0x3809, value: 0x00 },
    RegisterEntry { address: 0x380a, value: 0x02 },
    RegisterEntry { address: 0x380b, value: 0xd0 },
    RegisterEntry { address: 0x380c, value: 0x05 },
    RegisterEntry { address: 0x380d, value: 0xfa },
    RegisterEntry { address: 0x380e, value: 0x06 },
    RegisterEntry { address: 0x380f, value: 0xce },
    RegisterEntry { address: 0x3810, value: 0x00 },
    RegisterEntry { address: 0x3811, value: 0x08 },
    RegisterEntry { address: 0x3812, value: 0x00 },
    RegisterEntry { address: 0x3813, value: 0x08 },
    RegisterEntry { address: 0x3814, value: 0x11 },
    RegisterEntry { address: 0x3815, value: 0x11 },
    RegisterEntry { address: 0x3820, value: 0x3c },
    RegisterEntry { address: 0x3821, value: 0x84 },
    RegisterEntry { address: 0x3881, value: 0x42 },
    RegisterEntry { address: 0x38a8, value: 0x02 },
    RegisterEntry { address: 0x38a9, value: 0x80 },
    RegisterEntry { address: 0x38b1, value: 0x00 },
    RegisterEntry { address: 0x38c4, value: 0x00 },
    RegisterEntry { address: 0x38c5, value: 0xc0 },
    RegisterEntry { address: 0x38c6, value: 0x04 },
    RegisterEntry { address: 0x38c7, value: 0x80 },
    RegisterEntry { address: 0x3920, value: 0xff },
    RegisterEntry { address: 0x4003, value: 0x40 },
    RegisterEntry { address: 0x4008, value: 0x02 },
    RegisterEntry { address: 0x4009, value: 0x05 },
    RegisterEntry { address: 0x400c, value: 0x00 },
    RegisterEntry { address: 0x400d, value: 0x03 },
    RegisterEntry { address: 0x4010, value: 0x40 },
    RegisterEntry { address: 0x4043, value: 0x40 },
    RegisterEntry { address: 0x4307, value: 0x30 },
    RegisterEntry { address: 0x4317, value: 0x00 },
    RegisterEntry { address: 0x4501, value: 0x00 },
    RegisterEntry { address: 0x4507, value: 0x00 },
    RegisterEntry { address: 0x4509, value: 0x80 },
    RegisterEntry { address: 0x450a, value: 0x08 },
    RegisterEntry { address: 0x4601, value: 0x04 },
    RegisterEntry { address: 0x470f, value: 0x00 },
    RegisterEntry { address: 0x4f07, value: 0x00 },
    RegisterEntry { address: 0x4800, value: 0x20 },
    RegisterEntry { address: 0x5000, value: 0x9f },
    RegisterEntry { address: 0x5001, value: 0x00 },
    RegisterEntry { address: 0x5e00, value: 0x00 },
    RegisterEntry { address: 0x5d00, value: 0x07 },
    RegisterEntry { address: 0x5d01, value: 0x00 },
    RegisterEntry { address: 0x0101, value: 0x01 },
    RegisterEntry { address: 0x1000, value: 0x03 },
    RegisterEntry { address: 0x5a08, value: 0x84 },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_modes_have_ordered_vblank_bounds() {
        for mode in MODES {
            assert!(mode.vblank_min <= mode.vblank_default);
            assert!(mode.vblank_default <= mode.vblank_max);
        }
    }

    #[test]
    fn lookup_finds_catalog_geometry() {
        let mode = lookup(1280, 720).unwrap();
        assert_eq!(mode.height, 720);
        assert_eq!(mode.code, PixelFormat::Y10);
        assert_eq!(mode.link_freq(), 400_000_000);
    }

    #[test]
    fn lookup_rejects_unknown_geometry() {
        assert!(matches!(lookup(640, 480), Err(Error::UnsupportedMode)));
    }

    #[test]
    fn catalog_burst_matches_frame_layout() {
        let mode = lookup(1280, 720).unwrap();
        assert_eq!(mode.burst.len(), 99);
        assert_eq!(
            mode.burst[0],
            RegisterEntry {
                address: 0x0302,
                value: 0x32
            }
        );
        assert_eq!(
            mode.burst[98],
            RegisterEntry {
                address: 0x5a08,
                value: 0x84
            }
        );

        // The burst's lines-per-frame bytes agree with height + default vblank.
        let lpfr = mode.height + mode.vblank_default;
        let hi = mode.burst.iter().find(|e| e.address == 0x380e).unwrap();
        let lo = mode.burst.iter().find(|e| e.address == 0x380f).unwrap();
        assert_eq!(u32::from(hi.value) << 8 | u32::from(lo.value), lpfr);
    }

    #[test]
    fn default_mode_prefers_pixel_count_then_declaration_order() {
        static SMALL_REGS: [RegisterEntry; 0] = [];
        static SMALL: Mode = Mode {
            width: 640,
            height: 480,
            code: PixelFormat::Y10,
            hblank: 250,
            vblank_default: 200,
            vblank_min: 151,
            vblank_max: 1000,
            pclk: 80_000_000,
            link_freq_idx: 0,
            burst: &SMALL_REGS,
        };
        static BIG: Mode = Mode {
            width: 1280,
            height: 800,
            code: PixelFormat::Y10,
            hblank: 250,
            vblank_default: 1022,
            vblank_min: 151,
            vblank_max: 51540,
            pclk: 160_000_000,
            link_freq_idx: 0,
            burst: &SMALL_REGS,
        };

        // Same pixel count as the catalog 1280x720 entry.
        static TIE: Mode = Mode {
            width: 960,
            height: 960,
            code: PixelFormat::Y10,
            hblank: 250,
            vblank_default: 1022,
            vblank_min: 151,
            vblank_max: 51540,
            pclk: 160_000_000,
            link_freq_idx: 0,
            burst: &SMALL_REGS,
        };

        assert_eq!(
            pick_default(&[&SMALL, &BIG, &MODE_1280X720]).pixel_count(),
            BIG.pixel_count()
        );
        // Equal pixel counts: the earlier declaration wins.
        let tied = pick_default(&[&MODE_1280X720, &TIE]);
        assert!(core::ptr::eq(tied, &MODE_1280X720));
    }

    #[test]
    fn default_mode_is_in_the_catalog() {
        let def = default_mode();
        assert!(MODES.iter().any(|m| core::ptr::eq(*m, def)));
    }
}
