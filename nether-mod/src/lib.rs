//! Nether-MOD: MOD (ProTracker family) tracker format decoder and encoder for Nethercore
//!
//! This crate reads and writes the Amiga MOD format and the many dialects that
//! grew out of it (NoiseTracker, StarTrekker, TakeTracker, FastTracker's `nCHN`
//! files, Mod's Grave WOW, the untagged 15-sample SoundTracker layout, ...).
//! Files are decoded into a tracker-neutral [`Song`] model with the wider
//! internal effect space, and a [`Song`] can be written back to MOD with a
//! bitmask of everything that had to be dropped on the way.
//!
//! # Key Features
//!
//! - **Pure Rust**: No external C/C++ dependencies
//! - **Dialect detection**: 4-byte tag table plus the structural heuristics
//!   needed for untagged and tag-reusing variants
//! - **Lossy-aware writer**: [`ModWarnings`] records every feature that the
//!   MOD layout cannot represent
//!
//! # MOD Format Overview
//!
//! MOD files contain:
//! - 20-byte title
//! - 31 (or 15 for SoundTracker) 30-byte sample headers
//! - Order count, restart byte and a 128-entry order table
//! - 4-byte tag at offset 1080 (absent in 15-sample files)
//! - 64-row patterns, 4 bytes per cell
//! - Raw signed 8-bit sample data, optionally ModPlug ADPCM packed
//!
//! # Usage
//!
//! ```ignore
//! use nether_mod::{encode_mod, parse_mod};
//!
//! let data = std::fs::read("song.mod").unwrap();
//! let song = parse_mod(&data).unwrap();
//!
//! println!("Song: {}", song.title);
//! println!("Tracker: {}", song.tracker_id);
//!
//! let encoded = encode_mod(&song);
//! encoded.warnings.report();
//! std::fs::write("copy.mod", &encoded.data).unwrap();
//! ```
//!
//! # Format Reference
//!
//! - ProTracker 2.x module format notes
//! - <https://github.com/schismtracker/schismtracker/wiki>

mod detect;
mod effects;
mod error;
mod module;
mod parser;
mod tables;
mod tags;
mod writer;

pub use detect::{ModInfo, detect_mod};
pub use effects::{ImportedEffect, export_mod_effect, import_mod_effect};
pub use error::{ErrorKind, ModError};
pub use module::{
    Channel, Effect, NOTE_CUT, NOTE_LAST, NOTE_NONE, NOTE_OFF, Note, Order, Pattern, Sample,
    SampleData, SampleFlags, Song, SongFlags, VolumeEffect,
};
pub use parser::{DecodeOptions, decode_mod, parse_mod, parse_mod_legacy};
pub use tables::{
    AMIGA_PERIOD_TABLE, FINETUNE_TABLE, finetune_to_c5speed, nearest_finetune, period_to_note,
};
pub use tags::{TAG_TABLE, TagEntry, find_tag};
pub use writer::{EncodedMod, ModWarnings, encode_mod};

// =============================================================================
// Constants
// =============================================================================

/// Offset of the 4-byte format tag
pub const TAG_OFFSET: usize = 1080;

/// Pattern data offset for 31-sample files (header + tag)
pub const PATTERN_OFFSET: usize = 1084;

/// Pattern data offset for untagged 15-sample files
pub const LEGACY_PATTERN_OFFSET: usize = 600;

/// Smallest file the detector will look at
pub const MIN_FILE_SIZE: usize = 1085;

/// Title length in bytes
pub const TITLE_LEN: usize = 20;

/// Sample name length in bytes
pub const SAMPLE_NAME_LEN: usize = 22;

/// Size of one sample header on disk
pub const SAMPLE_HEADER_SIZE: usize = 30;

/// Sample slots in a tagged file
pub const MOD_SAMPLES: usize = 31;

/// Sample slots in an untagged SoundTracker file
pub const LEGACY_SAMPLES: usize = 15;

/// Rows in every MOD pattern
pub const MOD_ROWS: u16 = 64;

/// Physical order slots in the file and in [`Song::orders`]
pub const ORDER_SLOTS: usize = 128;

/// Maximum number of channels supported
pub const MAX_CHANNELS: usize = 64;

/// Maximum number of patterns supported
pub const MAX_PATTERNS: usize = 240;

/// Maximum number of samples in a [`Song`] (slot 0 is never used)
pub const MAX_SAMPLES: usize = 236;

/// Longest sample body (in frames) the MOD length word can describe
pub const MAX_SAMPLE_FRAMES: u32 = 0x1FFFE;

/// Marker in front of ModPlug ADPCM sample data
pub const ADPCM_MAGIC: &[u8; 5] = b"ADPCM";

/// Amiga C-5 playback rate
pub const DEFAULT_C5_SPEED: u32 = 8363;

// =============================================================================
// Tests
// =============================================================================
