//! Features lost when writing MOD

/// Bitmask of everything the writer had to drop or approximate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ModWarnings(u16);

impl ModWarnings {
    /// Song uses linear frequency slides
    pub const LINEAR_SLIDES: Self = Self(1 << 0);
    /// A sample has a global volume other than 64
    pub const SAMPLE_VOL: Self = Self(1 << 1);
    /// A sample has a sustain loop or a ping-pong loop
    pub const LOOPS: Self = Self(1 << 2);
    /// A sample uses auto-vibrato
    pub const SAMPLE_VIB: Self = Self(1 << 3);
    /// Song is in instrument mode
    pub const INSTRUMENTS: Self = Self(1 << 4);
    /// A pattern is not 64 rows long
    pub const PATTERN_LEN: Self = Self(1 << 5);
    /// A note has no ProTracker period
    pub const NOTE_RANGE: Self = Self(1 << 6);
    /// An effect or volume column command has no MOD equivalent
    pub const VOL_EFFECTS: Self = Self(1 << 7);
    /// More than 31 samples
    pub const MAX_SAMPLES: Self = Self(1 << 8);
    /// A sample length is odd or longer than 131070 frames
    pub const LONG_SAMPLES: Self = Self(1 << 9);
    /// Patterns exist that no order plays
    pub const UNUSED_PATS: Self = Self(1 << 10);

    /// Every warning, in report order
    const ALL: [(Self, &'static str); 11] = [
        (Self::LINEAR_SLIDES, "Linear slides"),
        (Self::SAMPLE_VOL, "Sample volumes"),
        (Self::LOOPS, "Sustain and Ping Pong loops"),
        (Self::SAMPLE_VIB, "Sample vibrato"),
        (Self::INSTRUMENTS, "Instrument functions"),
        (Self::PATTERN_LEN, "Pattern lengths other than 64 rows"),
        (Self::NOTE_RANGE, "Notes outside the range C-4 to B-6"),
        (Self::VOL_EFFECTS, "Extended volume column effects"),
        (Self::MAX_SAMPLES, "Over 31 samples"),
        (Self::LONG_SAMPLES, "Odd sample length or greater than 131070"),
        (Self::UNUSED_PATS, "Patterns outside order list"),
    ];

    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn from_bits(bits: u16) -> Self {
        Self(bits)
    }

    pub const fn bits(&self) -> u16 {
        self.0
    }

    pub const fn contains(&self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    /// Human-readable line for each set warning, in report order
    pub fn messages(&self) -> Vec<String> {
        Self::ALL
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, what)| format!("{} unsupported in MOD format", what))
            .collect()
    }

    /// Log every set warning once
    pub fn report(&self) {
        for message in self.messages() {
            log::warn!("{}", message);
        }
    }
}

impl std::ops::BitOr for ModWarnings {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}
