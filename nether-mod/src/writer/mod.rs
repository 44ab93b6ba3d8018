//! MOD file writer
//!
//! Serializes a [`Song`] into the 31-sample tagged layout. Writing never
//! fails; anything the layout cannot carry is dropped and recorded in
//! [`ModWarnings`] for the caller to report.

use crate::module::{Order, Pattern, Song, SongFlags};
use crate::{MOD_ROWS, MOD_SAMPLES, ORDER_SLOTS, SAMPLE_HEADER_SIZE, TITLE_LEN};

mod encoding;
mod warnings;

#[cfg(test)]
mod tests;

pub use warnings::ModWarnings;

use encoding::{encode_cell, mod_tag, sample_body, write_sample_header, write_string};

/// Restart byte written to every file (ProTracker's "no restart")
const RESTART_BYTE: u8 = 0x7F;

/// Order byte for a skipped slot; readers treat anything past the
/// pattern range as "skip"
const SKIP_BYTE: u8 = 0xFE;

/// An encoded MOD file and what was lost on the way
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedMod {
    /// Complete file contents
    pub data: Vec<u8>,
    /// Features the MOD format could not represent
    pub warnings: ModWarnings,
}

/// Encode a song as a MOD file
///
/// The channel count is the highest channel any pattern uses, and only
/// patterns reachable from the order list are written.
pub fn encode_mod(song: &Song) -> EncodedMod {
    let mut warnings = ModWarnings::empty();
    if song.flags.contains(SongFlags::INSTRUMENT_MODE) {
        warnings.insert(ModWarnings::INSTRUMENTS);
    }
    if song.flags.contains(SongFlags::LINEAR_SLIDES) {
        warnings.insert(ModWarnings::LINEAR_SLIDES);
    }

    let mut num_samples = song.num_samples();
    if num_samples > MOD_SAMPLES {
        num_samples = MOD_SAMPLES;
        warnings.insert(ModWarnings::MAX_SAMPLES);
    }
    let channels = song.highest_used_channel() + 1;

    let mut output = Vec::new();
    write_string(&mut output, &song.title, TITLE_LEN);

    let samples = song.samples.iter().skip(1).take(num_samples);
    for sample in samples.clone() {
        write_sample_header(&mut output, sample, &mut warnings);
    }
    output.resize(output.len() + (MOD_SAMPLES - num_samples) * SAMPLE_HEADER_SIZE, 0);

    // The first end marker ends the list
    let orders: Vec<u8> = song
        .orders
        .iter()
        .take_while(|order| **order != Order::End)
        .map(|order| order.pattern().unwrap_or(SKIP_BYTE))
        .take(ORDER_SLOTS)
        .collect();
    let max_pattern = song
        .orders
        .iter()
        .take(orders.len())
        .filter_map(Order::pattern)
        .max()
        .unwrap_or(0);
    if max_pattern as usize + 1 < song.num_patterns() {
        warnings.insert(ModWarnings::UNUSED_PATS);
    }

    output.push(orders.len() as u8);
    output.push(RESTART_BYTE);
    let mut order_table = [0u8; ORDER_SLOTS];
    order_table[..orders.len()].copy_from_slice(&orders);
    output.extend_from_slice(&order_table);
    output.extend_from_slice(&mod_tag(channels, max_pattern));

    let blank = Pattern::empty(MOD_ROWS);
    for index in 0..=max_pattern as usize {
        let pattern = song.patterns.get(index).unwrap_or(&blank);
        write_pattern(&mut output, pattern, channels, &mut warnings);
    }

    for sample in samples {
        output.extend_from_slice(&sample_body(sample));
    }

    log::debug!(
        "Encoded MOD: {} channels, {} orders, {} patterns, {} samples",
        channels,
        orders.len(),
        max_pattern as usize + 1,
        num_samples
    );

    EncodedMod {
        data: output,
        warnings,
    }
}

/// Write 64 rows of `channels` cells; short patterns are padded with empty rows
fn write_pattern(
    output: &mut Vec<u8>,
    pattern: &Pattern,
    channels: usize,
    warnings: &mut ModWarnings,
) {
    if pattern.rows != MOD_ROWS {
        warnings.insert(ModWarnings::PATTERN_LEN);
    }

    let mut buffer = vec![0u8; MOD_ROWS as usize * channels * 4];
    let rows = pattern.rows.min(MOD_ROWS);
    for (row, cells) in (0..rows).zip(buffer.chunks_exact_mut(channels * 4)) {
        for (note, cell) in pattern.row(row).iter().zip(cells.chunks_exact_mut(4)) {
            cell.copy_from_slice(&encode_cell(note, warnings));
        }
    }
    output.extend_from_slice(&buffer);
}
