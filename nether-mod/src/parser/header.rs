//! Header phases: tag resolution, sample headers, order list

use std::io::Cursor;

use crate::error::ModError;
use crate::module::{Order, Sample, SampleFlags};
use crate::tables::{alt_finetune_to_c5speed, finetune_to_c5speed};
use crate::{
    LEGACY_PATTERN_OFFSET, LEGACY_SAMPLES, MAX_CHANNELS, MAX_PATTERNS, MOD_SAMPLES, ORDER_SLOTS,
    PATTERN_OFFSET, SAMPLE_NAME_LEN, TAG_OFFSET,
};

use super::helpers::{read_array, read_string, read_u8, read_u16_be};

/// Tag family, as far as the 4 tag bytes alone can tell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TagKind {
    /// `M.K.`: ProTracker and friends, or a Mod's Grave WOW file
    ProTracker,
    /// `M!K!`, `M&K!`, `N.T.`, `FEST`
    Amiga {
        /// `M&K!`/`FEST` store finetune as a signed transpose
        alt_finetune: bool,
    },
    /// `FLTn`/`EXOn`
    Startrekker,
    /// `OCTA`/`OKTA`, `CD61`/`CD81`, `nCHN`, `nnCH`/`nnCN`, `TDZn`
    Multichannel,
    /// No tag; read as a 15-sample SoundTracker file
    Untagged,
}

/// Tracker fingerprints gathered from the tag and refined by the sample headers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct TrackerHints {
    /// Could have been written by FastTracker 2
    pub maybe_ft2: bool,
    /// Could have been written by Scream Tracker 3
    pub maybe_st3: bool,
}

/// Result of matching the tag at offset 1080
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TagVariant {
    pub kind: TagKind,
    pub channels: u8,
    /// Tracker label template, `{}` stands for the channel count
    pub label: &'static str,
    pub hints: TrackerHints,
}

impl TagVariant {
    fn new(kind: TagKind, channels: u8, label: &'static str) -> Self {
        Self {
            kind,
            channels,
            label,
            hints: TrackerHints::default(),
        }
    }

    fn with_hints(mut self, maybe_ft2: bool, maybe_st3: bool) -> Self {
        self.hints = TrackerHints {
            maybe_ft2,
            maybe_st3,
        };
        self
    }

    /// Number of sample headers in the file
    pub fn sample_count(&self) -> usize {
        match self.kind {
            TagKind::Untagged => LEGACY_SAMPLES,
            _ => MOD_SAMPLES,
        }
    }

    /// Start of pattern data
    pub fn pattern_offset(&self) -> usize {
        match self.kind {
            TagKind::Untagged => LEGACY_PATTERN_OFFSET,
            _ => PATTERN_OFFSET,
        }
    }
}

const TAKETRACKER: &str = "{} Channel TakeTracker";
const GENERIC: &str = "{} Channel MOD";

/// Match the tag bytes against every known family
///
/// Numeric families are parsed rather than looked up, so tags such as `90CH`
/// resolve here and are rejected by the channel limit instead.
pub(crate) fn resolve_tag(data: &[u8], force_legacy: bool) -> Result<TagVariant, ModError> {
    let tag: [u8; 4] = match data.get(TAG_OFFSET..TAG_OFFSET + 4) {
        Some(&[a, b, c, d]) => [a, b, c, d],
        _ => [0; 4],
    };
    let is_digit = |b: u8| b.is_ascii_digit();
    let is_nonzero_digit = |b: u8| (b'1'..=b'9').contains(&b);

    let variant = match &tag {
        b"M.K." => {
            TagVariant::new(TagKind::ProTracker, 4, "Amiga-NewTracker").with_hints(true, false)
        }
        b"M!K!" => TagVariant::new(TagKind::Amiga { alt_finetune: false }, 4, "Amiga-ProTracker"),
        b"N.T." => TagVariant::new(TagKind::Amiga { alt_finetune: false }, 4, "Amiga-NoiseTracker"),
        b"M&K!" | b"FEST" => {
            TagVariant::new(TagKind::Amiga { alt_finetune: true }, 4, "Amiga-NoiseTracker")
        }
        [b'F', b'L', b'T', n @ (b'4' | b'8')] | [b'E', b'X', b'O', n @ (b'4' | b'8')] => {
            TagVariant::new(TagKind::Startrekker, n - b'0', "{} Channel Startrekker")
        }
        b"OCTA" | b"OKTA" => TagVariant::new(TagKind::Multichannel, 8, "Amiga Oktalyzer"),
        b"CD61" | b"CD81" => TagVariant::new(TagKind::Multichannel, 8, "8 Channel Falcon"),
        [n, b'C', b'H', b'N'] if is_nonzero_digit(*n) => {
            let channels = n - b'0';
            let label = if matches!(channels, 5 | 7 | 9) {
                TAKETRACKER
            } else {
                GENERIC
            };
            TagVariant::new(TagKind::Multichannel, channels, label)
                .with_hints(channels % 2 == 0, true)
        }
        [a, b, b'C', suffix @ (b'H' | b'N')] if is_nonzero_digit(*a) && is_digit(*b) => {
            let channels = 10 * (a - b'0') + (b - b'0');
            let from_ft2 = *suffix == b'H';
            if matches!(channels, 11 | 13 | 15) {
                TagVariant::new(TagKind::Multichannel, channels, TAKETRACKER)
                    .with_hints(false, from_ft2)
            } else {
                TagVariant::new(TagKind::Multichannel, channels, GENERIC)
                    .with_hints(channels % 2 == 0 && channels <= 32 && from_ft2, from_ft2)
            }
        }
        [b'T', b'D', b'Z', n] if is_nonzero_digit(*n) => {
            let channels = n - b'0';
            let label = if channels < 4 { TAKETRACKER } else { GENERIC };
            TagVariant::new(TagKind::Multichannel, channels, label)
        }
        _ if force_legacy => TagVariant::new(TagKind::Untagged, 4, GENERIC),
        _ => return Err(ModError::UnknownTag(String::from_utf8_lossy(&tag).into_owned())),
    };

    if variant.channels as usize > MAX_CHANNELS {
        return Err(ModError::TooManyChannels(variant.channels));
    }
    Ok(variant)
}

/// Decoded sample headers plus what they reveal about the writer
#[derive(Debug, Clone)]
pub(crate) struct SampleHeaders {
    /// Slots `1..=count`, in file order
    pub samples: Vec<Sample>,
    /// Sum of all declared lengths in frames
    pub total_length: u64,
    /// Some header contradicts the FastTracker 2 fingerprint
    pub rules_out_ft2: bool,
    /// Some header contradicts the Scream Tracker 3 fingerprint
    pub rules_out_st3: bool,
}

/// Read the sample header block that follows the title
pub(crate) fn read_sample_headers(
    cursor: &mut Cursor<&[u8]>,
    variant: &TagVariant,
) -> Result<SampleHeaders, ModError> {
    let alt_finetune = matches!(variant.kind, TagKind::Amiga { alt_finetune: true });
    let mut headers = SampleHeaders {
        samples: Vec::with_capacity(variant.sample_count()),
        total_length: 0,
        rules_out_ft2: false,
        rules_out_st3: false,
    };

    for _ in 0..variant.sample_count() {
        let name = read_string(&read_array::<SAMPLE_NAME_LEN>(cursor)?);
        let length = read_u16_be(cursor)? as u32 * 2;
        let finetune = read_u8(cursor)?;
        let volume = read_u8(cursor)?.min(64);
        let loop_start = read_u16_be(cursor)? as u32 * 2;
        let loop_length = read_u16_be(cursor)? as u32 * 2;

        headers.total_length += length as u64;
        if length == 0 && volume != 0 {
            headers.rules_out_ft2 = true;
        }

        let mut flags = SampleFlags::empty();
        if loop_length > 2 {
            flags.insert(SampleFlags::LOOP);
        } else if loop_length == 0 {
            headers.rules_out_st3 = true;
        } else if length == 0 {
            headers.rules_out_ft2 = true;
        }

        let c5_speed = if alt_finetune {
            alt_finetune_to_c5speed(finetune)
        } else {
            finetune_to_c5speed(finetune)
        };

        headers.samples.push(Sample {
            name,
            length,
            loop_start,
            loop_end: loop_start + loop_length,
            c5_speed,
            volume: volume as u16 * 4,
            global_volume: 64,
            flags,
            ..Default::default()
        });
    }

    Ok(headers)
}

/// Order block: count, restart byte and the 128 slots
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct OrderTable {
    pub orders: [Order; ORDER_SLOTS],
    pub restart: u8,
    /// Highest pattern referenced by any of the 128 slots
    pub max_pattern: u8,
    /// `FLT8`/`EXO8` whose orders are all even, i.e. really two-half patterns
    pub split_patterns: bool,
}

/// Read the order block that follows the sample headers
pub(crate) fn read_orders(
    cursor: &mut Cursor<&[u8]>,
    variant: &TagVariant,
) -> Result<OrderTable, ModError> {
    let num_orders = read_u8(cursor)? as usize;
    let restart = read_u8(cursor)?;
    let mut raw = read_array::<ORDER_SLOTS>(cursor)?;

    // An odd order means the 8 in FLT8 was a lie
    let split_patterns = variant.kind == TagKind::Startrekker
        && variant.channels == 8
        && raw.iter().all(|&order| order & 1 == 0);
    if split_patterns {
        raw.iter_mut().for_each(|order| *order >>= 1);
    }

    let mut orders = [Order::End; ORDER_SLOTS];
    let mut max_pattern = 0u8;
    for (slot, &order) in orders.iter_mut().zip(raw.iter()) {
        if order as usize >= MAX_PATTERNS {
            *slot = Order::Skip;
        } else {
            *slot = Order::Pattern(order);
            max_pattern = max_pattern.max(order);
        }
    }
    for slot in orders.iter_mut().skip(num_orders) {
        *slot = Order::End;
    }

    Ok(OrderTable {
        orders,
        restart,
        max_pattern,
        split_patterns,
    })
}
