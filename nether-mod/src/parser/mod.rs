//! MOD file parser
//!
//! Decoding runs as a fixed sequence of phases. The header phases settle
//! everything about the file's shape into an immutable [`ResolvedHeader`];
//! the data phases only read from it.
//!
//! - `header` - tag resolution, sample headers, order list
//! - `pattern` - 4-byte cell decoding, standard and Startrekker layouts
//! - `sample` - PCM and ADPCM sample bodies
//! - `identity` - best-effort tracker identification
//! - `tests` - decoder test suite

use std::io::Cursor;

use crate::error::ModError;
use crate::module::{Effect, Note, Order, Pattern, Song, SongFlags, VolumeEffect};
use crate::{MAX_PATTERNS, TITLE_LEN};

mod header;
mod helpers;
mod identity;
mod pattern;
mod sample;

use header::{OrderTable, SampleHeaders, TagKind, TagVariant, TrackerHints};
use identity::{Evidence, FOOTER_LEN, Footer, resolve_tracker_id};

pub(crate) use helpers::read_string;

/// Constant term of the Mod's Grave size check:
/// `2048 * (max_pattern + 1) + sample bytes + 3132`
const WOW_SIZE_BIAS: u64 = 3132;

/// Bytes per pattern in a Mod's Grave file (64 rows of 8 channels)
const WOW_PATTERN_SIZE: u64 = 2048;

/// Stereo separation MOD songs are played with
const MOD_PAN_SEPARATION: u8 = 64;

/// Decoder options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Read files with an unknown tag as untagged 15-sample SoundTracker files
    pub force_legacy: bool,
    /// Load metadata only; sample bodies are skipped
    pub skip_sample_data: bool,
}

/// How patterns are laid out on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Layout {
    /// `channels` cells per row
    Standard,
    /// FLT8/EXO8: two 4-channel halves per pattern, orders doubled
    Startrekker,
    /// Mod's Grave: an `M.K.` tag on 8-channel patterns
    Wow,
}

/// Shape of the file, fixed before any pattern or sample data is read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ResolvedHeader {
    pub tag: TagVariant,
    pub layout: Layout,
    pub channels: u8,
    pub hints: TrackerHints,
    pub restart: u8,
    pub max_pattern: u8,
}

impl ResolvedHeader {
    fn new(data: &[u8], tag: TagVariant, headers: &SampleHeaders, orders: &OrderTable) -> Self {
        let hints = TrackerHints {
            maybe_ft2: tag.hints.maybe_ft2 && !headers.rules_out_ft2,
            maybe_st3: tag.hints.maybe_st3 && !headers.rules_out_st3,
        };

        let wow_size = WOW_PATTERN_SIZE * (orders.max_pattern as u64 + 1)
            + headers.total_length
            + WOW_SIZE_BIAS;
        let is_wow = tag.kind == TagKind::ProTracker && data.len() as u64 == wow_size;

        let (layout, channels) = if is_wow {
            (Layout::Wow, 8)
        } else if orders.split_patterns {
            (Layout::Startrekker, 8)
        } else if tag.kind == TagKind::Startrekker {
            (Layout::Standard, 4)
        } else {
            (Layout::Standard, tag.channels)
        };

        Self {
            tag,
            layout,
            channels,
            hints,
            restart: orders.restart,
            max_pattern: orders.max_pattern,
        }
    }

    /// Number of patterns stored in the file
    pub fn pattern_count(&self) -> usize {
        self.max_pattern as usize + 1
    }
}

/// Parse a tagged 31-sample MOD file
///
/// Untagged 15-sample files are rejected; use [`parse_mod_legacy`] as a last
/// resort for those.
pub fn parse_mod(data: &[u8]) -> Result<Song, ModError> {
    decode_mod(data, &DecodeOptions::default())
}

/// Parse any MOD file, reading unknown tags as a 15-sample SoundTracker file
pub fn parse_mod_legacy(data: &[u8]) -> Result<Song, ModError> {
    decode_mod(
        data,
        &DecodeOptions {
            force_legacy: true,
            ..Default::default()
        },
    )
}

/// Parse a MOD file with explicit options
///
/// # Arguments
/// * `data` - Raw MOD file bytes
/// * `options` - Decoder options
///
/// # Returns
/// * `Ok(Song)` - Fully decoded song
/// * `Err(ModError)` - Not a MOD, truncated, or too many channels
pub fn decode_mod(data: &[u8], options: &DecodeOptions) -> Result<Song, ModError> {
    let tag = header::resolve_tag(data, options.force_legacy)?;

    let mut cursor = Cursor::new(data);
    let title = read_string(&helpers::read_array::<TITLE_LEN>(&mut cursor)?);
    let headers = header::read_sample_headers(&mut cursor, &tag)?;
    let orders = header::read_orders(&mut cursor, &tag)?;

    let resolved = ResolvedHeader::new(data, tag, &headers, &orders);
    log::debug!(
        "MOD tag {:?}: {:?} layout, {} channels, {} patterns",
        resolved.tag.kind,
        resolved.layout,
        resolved.channels,
        resolved.pattern_count()
    );
    if resolved.layout == Layout::Wow {
        log::debug!("File size matches the Mod's Grave layout, reading 8 channels");
    }

    cursor.set_position(resolved.tag.pattern_offset() as u64);
    let mut patterns = Vec::with_capacity(resolved.pattern_count());
    for _ in 0..resolved.pattern_count() {
        let pattern = match resolved.layout {
            Layout::Startrekker => pattern::read_split_pattern(&mut cursor)?,
            Layout::Standard | Layout::Wow => {
                pattern::read_pattern(&mut cursor, resolved.channels as usize)?
            }
        };
        patterns.push(pattern);
    }

    let mut song = Song {
        title,
        orders: orders.orders,
        patterns,
        ..Default::default()
    };

    if resolved.restart > 0 && resolved.restart < resolved.max_pattern {
        song.restart_order = Some(resolved.restart);
        insert_restart_jump(&mut song, resolved.restart, resolved.channels as usize);
    }

    for (slot, mut sample) in headers.samples.into_iter().enumerate() {
        if sample.length > 0 {
            if options.skip_sample_data {
                sample::skip_sample_data(&mut cursor, &sample);
            } else {
                sample::read_sample_data(&mut cursor, &mut sample);
            }
        }
        song.samples[slot + 1] = sample;
    }

    let footer = Footer::sniff(helpers::read_up_to(&mut cursor, FOOTER_LEN));
    if let Some(footer) = footer {
        log::debug!("Found {:?} footer after sample data", footer);
    }

    song.tracker_id = resolve_tracker_id(&Evidence {
        tag_label: resolved.tag.label,
        mk: resolved.tag.kind == TagKind::ProTracker,
        hints: resolved.hints,
        restart: resolved.restart,
        max_pattern: resolved.max_pattern,
        wow: resolved.layout == Layout::Wow,
        footer,
        channels: resolved.channels,
    });

    song.flags = SongFlags::IT_OLD_EFFECTS | SongFlags::COMPAT_GXX;
    song.pan_separation = MOD_PAN_SEPARATION;
    for (index, channel) in song.channels.iter_mut().enumerate() {
        if index < resolved.channels as usize {
            channel.panning = protracker_panning(index);
        } else {
            channel.muted = true;
        }
    }

    Ok(song)
}

/// Amiga hard panning: left, right, right, left, repeating
fn protracker_panning(channel: usize) -> u16 {
    if (channel + 1) & 2 != 0 { 256 } else { 0 }
}

/// Make the song loop back to `restart` instead of stopping
///
/// Works on the last pattern in the order list; a pattern played from
/// several orders is copied first. Every row that leaves the pattern
/// early with a break, and the last row, gets a position jump unless it
/// already has one. A `D00` is rewritten in place, otherwise the jump
/// takes the first free cell among the first `channels`.
fn insert_restart_jump(song: &mut Song, restart: u8, channels: usize) {
    let played: Vec<(usize, u8)> = song
        .orders
        .iter()
        .enumerate()
        .map_while(|(slot, order)| order.pattern().map(|p| (slot, p)))
        .collect();
    let Some(&(last_slot, mut pattern_index)) = played.last() else {
        return;
    };
    if pattern_index as usize >= song.patterns.len() {
        return;
    }

    let uses = played.iter().filter(|&&(_, p)| p == pattern_index).count();
    if uses > 1 {
        let copy_index = song.patterns.len();
        if copy_index >= MAX_PATTERNS {
            return;
        }
        let copy = song.patterns[pattern_index as usize].clone();
        song.patterns.push(copy);
        pattern_index = copy_index as u8;
        song.orders[last_slot] = Order::Pattern(pattern_index);
    }

    let pattern: &mut Pattern = &mut song.patterns[pattern_index as usize];
    let last_row = pattern.rows.saturating_sub(1);
    for row in 0..pattern.rows {
        let cells = pattern.row(row);
        let cells = &cells[..channels.min(cells.len())];
        if cells.iter().any(|note| note.effect == Effect::PositionJump) {
            continue;
        }
        let breaks = cells.iter().any(|note| note.effect == Effect::PatternBreak);
        if !breaks && row != last_row {
            continue;
        }

        let target = cells
            .iter()
            .position(|note| note.effect == Effect::PatternBreak && note.param == 0)
            .or_else(|| cells.iter().position(is_free_effect_slot));
        match target.and_then(|channel| pattern.get_mut(row, channel)) {
            Some(note) => {
                note.effect = Effect::PositionJump;
                note.param = restart;
            }
            None => log::debug!("No free effect column for restart jump on row {}", row),
        }
    }
}

/// Cell with room for an effect that the writer will not drop
fn is_free_effect_slot(note: &Note) -> bool {
    note.effect == Effect::None && note.vol_effect == VolumeEffect::None
}
