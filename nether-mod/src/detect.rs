//! Identify-only pass for file browsers
//!
//! Looks at the tag and, failing that, at the header plausibility of an
//! untagged 15-sample file. Never builds a [`crate::Song`].

use crate::parser::read_string;
use crate::tags::find_tag;
use crate::{
    LEGACY_SAMPLES, MIN_FILE_SIZE, SAMPLE_HEADER_SIZE, SAMPLE_NAME_LEN, TAG_OFFSET, TITLE_LEN,
};

/// Result of a successful identification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModInfo {
    /// Tracker/format description ("Amiga-NewTracker", "8 Channel MOD", ...)
    pub description: String,
    /// Song title
    pub title: String,
}

/// Title bytes below 0x20 tolerated before an untagged file is rejected
const MAX_TITLE_CONTROL_BYTES: usize = 5;

/// Longest sample (in words) a SoundTracker header can plausibly declare
const MAX_LEGACY_SAMPLE_WORDS: u16 = 32768;

/// Identify a MOD file without decoding it
///
/// Returns `None` for anything that does not look like a MOD; the caller is
/// expected to try other formats.
pub fn detect_mod(data: &[u8]) -> Option<ModInfo> {
    if data.len() < MIN_FILE_SIZE {
        return None;
    }

    let title = read_string(&data[..TITLE_LEN]);

    if let Some(entry) = find_tag(&data[TAG_OFFSET..TAG_OFFSET + 4]) {
        return Some(ModInfo {
            description: entry.description(),
            title,
        });
    }

    if looks_like_soundtracker(data) {
        return Some(ModInfo {
            description: "SoundTracker".to_string(),
            title,
        });
    }

    None
}

/// Heuristic check for an untagged 15-sample file
///
/// This accepts some files that are not MODs at all; the oldest layout has
/// no signature to check against.
fn looks_like_soundtracker(data: &[u8]) -> bool {
    let control_bytes = data[..TITLE_LEN]
        .iter()
        .filter(|&&b| b > 0 && b < 32)
        .count();
    if control_bytes > MAX_TITLE_CONTROL_BYTES {
        return false;
    }

    let mut all_volumes = 0u8;
    let mut all_lengths = 0u8;
    for slot in 0..LEGACY_SAMPLES {
        let offset = TITLE_LEN + slot * SAMPLE_HEADER_SIZE + SAMPLE_NAME_LEN;
        let [length_high, length_low, finetune, volume] = match data.get(offset..offset + 4) {
            Some(&[a, b, c, d]) => [a, b, c, d],
            _ => return false,
        };

        if finetune != 0 || volume > 64 {
            return false;
        }
        if u16::from_be_bytes([length_high, length_low]) > MAX_LEGACY_SAMPLE_WORDS {
            return false;
        }

        all_volumes |= volume;
        all_lengths |= length_high | length_low;
    }

    all_volumes != 0 && all_lengths != 0
}
