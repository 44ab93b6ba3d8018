//! Tracker identification
//!
//! MOD has no "created with" field, so the tracker is guessed from the tag,
//! a few header quirks, the total file size and any junk trailing the last
//! sample. The rules below are heuristics; their order is what makes the
//! result reproducible, so keep it as is unless real files say otherwise.

use crate::tags::format_label;

use super::header::TrackerHints;

/// `"TakeTrackered with version 0.9e!!!!!"`, every byte XOR 0xDF
const TAKETRACKER_FOOTER: [u8; 36] = [
    0x8B, 0xBE, 0xB4, 0xBA, 0x8B, 0xAD, 0xBE, 0xBC, 0xB4, 0xBA, 0xAD, 0xBA, 0xBB, 0xFF, 0xA8, 0xB6,
    0xAB, 0xB7, 0xFF, 0xA9, 0xBA, 0xAD, 0xAC, 0xB6, 0xB0, 0xB1, 0xFF, 0xEF, 0xF1, 0xE6, 0xBA, 0xFE,
    0xFE, 0xFE, 0xFE, 0xFE,
];

/// Tetramed signature; three version bytes follow it
const TETRAMED_FOOTER: [u8; 6] = [0x00, 0x11, 0x55, 0x33, 0x22, 0x11];
const TETRAMED_VERSION_LEN: usize = 3;

/// Bytes read after the last sample for footer sniffing
pub(crate) const FOOTER_LEN: usize = TAKETRACKER_FOOTER.len();

/// Restart byte ProTracker and Scream Tracker 3 write
const RESTART_PROTRACKER: u8 = 0x7F;

/// Trailer some trackers append after the sample data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Footer {
    TakeTracker,
    Tetramed,
}

impl Footer {
    /// Match the bytes following the last sample
    pub fn sniff(tail: &[u8]) -> Option<Self> {
        if tail.starts_with(&TAKETRACKER_FOOTER) {
            Some(Self::TakeTracker)
        } else if tail.len() >= TETRAMED_FOOTER.len() + TETRAMED_VERSION_LEN
            && tail.starts_with(&TETRAMED_FOOTER)
        {
            Some(Self::Tetramed)
        } else {
            None
        }
    }
}

/// Everything the identification rules look at
#[derive(Debug, Clone, Copy)]
pub(crate) struct Evidence {
    /// Label template implied by the tag
    pub tag_label: &'static str,
    /// Tag was `M.K.`
    pub mk: bool,
    pub hints: TrackerHints,
    pub restart: u8,
    pub max_pattern: u8,
    /// File size matched the Mod's Grave layout
    pub wow: bool,
    pub footer: Option<Footer>,
    /// Final channel count
    pub channels: u8,
}

/// Pick the tracker label; later rules win over earlier ones
pub(crate) fn resolve_tracker_id(evidence: &Evidence) -> String {
    let mut label = evidence.tag_label;

    if evidence.restart == RESTART_PROTRACKER && evidence.hints.maybe_st3 {
        label = "Scream Tracker 3?";
    } else if evidence.restart == RESTART_PROTRACKER && evidence.mk {
        label = "{} Channel ProTracker";
    } else if evidence.restart <= evidence.max_pattern && evidence.hints.maybe_ft2 {
        label = "{} Channel FastTracker";
    } else if evidence.restart == evidence.max_pattern && evidence.mk {
        label = "{} Channel Soundtracker";
    }

    if evidence.wow {
        label = "Mod's Grave WOW";
    }

    match evidence.footer {
        Some(Footer::TakeTracker) if evidence.channels <= 16 => {
            label = "{} Channel TakeTracker";
        }
        Some(Footer::Tetramed) if evidence.mk => {
            label = "{} Channel Tetramed";
        }
        _ => {}
    }

    format_label(label, evidence.channels)
}
