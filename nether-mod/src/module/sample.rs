//! Sample structures and flags

use crate::DEFAULT_C5_SPEED;

/// Owned PCM body of a sample
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SampleData {
    /// 8-bit signed frames (interleaved if stereo)
    I8(Vec<i8>),
    /// 16-bit signed frames (interleaved if stereo)
    I16(Vec<i16>),
}

impl Default for SampleData {
    fn default() -> Self {
        Self::I8(Vec::new())
    }
}

impl SampleData {
    /// Number of stored values (not frames)
    pub fn len(&self) -> usize {
        match self {
            Self::I8(data) => data.len(),
            Self::I16(data) => data.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Value at `index` scaled to 8 bits
    pub fn get_i8(&self, index: usize) -> Option<i8> {
        match self {
            Self::I8(data) => data.get(index).copied(),
            Self::I16(data) => data.get(index).map(|&v| (v >> 8) as i8),
        }
    }
}

/// Sample metadata plus its PCM body
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    /// Sample name (max 22 chars in MOD)
    pub name: String,
    /// DOS filename (not stored by MOD)
    pub filename: String,
    /// Length in frames
    pub length: u32,
    /// Loop start in frames
    pub loop_start: u32,
    /// Loop end in frames (exclusive)
    pub loop_end: u32,
    /// Sustain loop start in frames
    pub sustain_start: u32,
    /// Sustain loop end in frames
    pub sustain_end: u32,
    /// Playback rate for C-5
    pub c5_speed: u32,
    /// Default volume (0-256, MOD volume scaled by 4)
    pub volume: u16,
    /// Global volume (0-64)
    pub global_volume: u8,
    /// Auto-vibrato waveform
    pub vib_type: u8,
    /// Auto-vibrato speed
    pub vib_speed: u8,
    /// Auto-vibrato depth
    pub vib_depth: u8,
    /// Auto-vibrato rate
    pub vib_rate: u8,
    /// Sample flags
    pub flags: SampleFlags,
    /// PCM body
    pub data: SampleData,
}

impl Default for Sample {
    fn default() -> Self {
        Self {
            name: String::new(),
            filename: String::new(),
            length: 0,
            loop_start: 0,
            loop_end: 0,
            sustain_start: 0,
            sustain_end: 0,
            c5_speed: DEFAULT_C5_SPEED,
            volume: 256,
            global_volume: 64,
            vib_type: 0,
            vib_speed: 0,
            vib_depth: 0,
            vib_rate: 0,
            flags: SampleFlags::empty(),
            data: SampleData::default(),
        }
    }
}

impl Sample {
    /// A slot with no name and no audio counts as unused
    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.length == 0 && self.data.is_empty()
    }

    /// Check if sample has loop enabled
    pub fn has_loop(&self) -> bool {
        self.flags.contains(SampleFlags::LOOP)
    }

    /// Check if sample has sustain loop enabled
    pub fn has_sustain_loop(&self) -> bool {
        self.flags.contains(SampleFlags::SUSTAIN_LOOP)
    }

    /// Check if loop is ping-pong (bidirectional)
    pub fn is_pingpong_loop(&self) -> bool {
        self.flags.contains(SampleFlags::PINGPONG_LOOP)
    }

    /// Check if sample is 16-bit
    pub fn is_16bit(&self) -> bool {
        self.flags.contains(SampleFlags::SAMPLE_16BIT)
    }

    /// Check if sample is stereo
    pub fn is_stereo(&self) -> bool {
        self.flags.contains(SampleFlags::STEREO)
    }

    /// Loop length in frames, zero if there is no usable loop
    pub fn loop_length(&self) -> u32 {
        self.loop_end.saturating_sub(self.loop_start)
    }

    /// Frame `index` mixed down to mono and scaled to 8 bits
    pub fn mono_frame_i8(&self, index: usize) -> i8 {
        if self.is_stereo() {
            let left = self.data.get_i8(index * 2).unwrap_or(0) as i16;
            let right = self.data.get_i8(index * 2 + 1).unwrap_or(0) as i16;
            ((left + right) / 2) as i8
        } else {
            self.data.get_i8(index).unwrap_or(0)
        }
    }
}

/// Sample flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SampleFlags(u8);

impl SampleFlags {
    /// 16-bit sample (vs 8-bit)
    pub const SAMPLE_16BIT: Self = Self(0x02);
    /// Stereo sample
    pub const STEREO: Self = Self(0x04);
    /// Sample was stored compressed (ADPCM)
    pub const COMPRESSED: Self = Self(0x08);
    /// Loop enabled
    pub const LOOP: Self = Self(0x10);
    /// Sustain loop enabled
    pub const SUSTAIN_LOOP: Self = Self(0x20);
    /// Ping-pong loop
    pub const PINGPONG_LOOP: Self = Self(0x40);
    /// Ping-pong sustain loop
    pub const PINGPONG_SUSTAIN: Self = Self(0x80);

    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    pub const fn bits(&self) -> u8 {
        self.0
    }

    pub const fn contains(&self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }
}

impl std::ops::BitOr for SampleFlags {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}
