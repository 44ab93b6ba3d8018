//! Song data structures
//!
//! This is the tracker-neutral container the decoder fills and the encoder
//! reads. It is wider than MOD: effects, loops and sample formats
//! that MOD cannot express are representable here so that the writer can
//! report what it had to drop.

mod pattern;
mod sample;

pub use pattern::{Effect, NOTE_CUT, NOTE_LAST, NOTE_NONE, NOTE_OFF, Note, Pattern, VolumeEffect};
pub use sample::{Sample, SampleData, SampleFlags};

use crate::{MAX_CHANNELS, MAX_SAMPLES, ORDER_SLOTS};

/// Entry in the order list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Order {
    /// Play this pattern
    Pattern(u8),
    /// Skip this slot (+++)
    Skip,
    /// End of song (---)
    #[default]
    End,
}

impl Order {
    /// Pattern index, if this slot plays one
    pub fn pattern(&self) -> Option<u8> {
        match self {
            Self::Pattern(p) => Some(*p),
            _ => None,
        }
    }
}

/// Song-wide flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SongFlags(u16);

impl SongFlags {
    /// Impulse Tracker "old effects" compatibility
    pub const IT_OLD_EFFECTS: Self = Self(0x0001);
    /// Gxx shares memory with E/F slides
    pub const COMPAT_GXX: Self = Self(0x0002);
    /// Instruments are in use (not only samples)
    pub const INSTRUMENT_MODE: Self = Self(0x0004);
    /// Linear frequency slides instead of Amiga periods
    pub const LINEAR_SLIDES: Self = Self(0x0008);

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
}

impl std::ops::BitOr for SongFlags {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Per-channel defaults
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Channel {
    /// Initial panning (0=left, 128=center, 256=right)
    pub panning: u16,
    /// Channel is muted
    pub muted: bool,
}

impl Default for Channel {
    fn default() -> Self {
        Self {
            panning: 128,
            muted: false,
        }
    }
}

/// A decoded song
#[derive(Debug, Clone, PartialEq)]
pub struct Song {
    /// Song title (max 20 chars in MOD)
    pub title: String,
    /// Order list
    pub orders: [Order; ORDER_SLOTS],
    /// Order the song jumps back to after the last pattern, if any
    pub restart_order: Option<u8>,
    /// Pattern data, indexed by pattern number
    pub patterns: Vec<Pattern>,
    /// Samples; index 0 is never used
    pub samples: Vec<Sample>,
    /// Channel defaults
    pub channels: [Channel; MAX_CHANNELS],
    /// Song flags
    pub flags: SongFlags,
    /// Stereo separation (0-128)
    pub pan_separation: u8,
    /// Human-readable name of the tracker that probably wrote the file
    pub tracker_id: String,
}

impl Default for Song {
    fn default() -> Self {
        Self {
            title: String::new(),
            orders: [Order::End; ORDER_SLOTS],
            restart_order: None,
            patterns: Vec::new(),
            samples: vec![Sample::default(); MAX_SAMPLES + 1],
            channels: [Channel::default(); MAX_CHANNELS],
            flags: SongFlags::empty(),
            pan_separation: 128,
            tracker_id: String::new(),
        }
    }
}

impl Song {
    /// Number of order slots in use (everything up to the last non-end entry)
    pub fn num_orders(&self) -> usize {
        self.orders
            .iter()
            .rposition(|order| *order != Order::End)
            .map_or(0, |i| i + 1)
    }

    /// Highest sample slot that holds a name or audio
    pub fn num_samples(&self) -> usize {
        self.samples
            .iter()
            .enumerate()
            .skip(1)
            .rev()
            .find(|(_, sample)| !sample.is_empty())
            .map_or(0, |(i, _)| i)
    }

    /// Number of patterns up to and including the last non-blank one
    pub fn num_patterns(&self) -> usize {
        self.patterns
            .iter()
            .rposition(|pattern| !pattern.is_blank())
            .map_or(0, |i| i + 1)
    }

    /// Highest channel index used by any pattern (0 for an empty song)
    pub fn highest_used_channel(&self) -> usize {
        self.patterns
            .iter()
            .filter_map(Pattern::highest_used_channel)
            .max()
            .unwrap_or(0)
    }

    /// Get the pattern at the given order position
    pub fn pattern_at_order(&self, order: usize) -> Option<&Pattern> {
        let index = self.orders.get(order)?.pattern()?;
        self.patterns.get(index as usize)
    }
}
