//! Low-level encoding functions for MOD file components

use crate::effects::export_mod_effect;
use crate::module::{Note, Sample, SampleFlags};
use crate::tables::{AMIGA_PERIOD_TABLE, PERIOD_MAX, PERIOD_MIN, nearest_finetune};
use crate::{MAX_SAMPLE_FRAMES, SAMPLE_NAME_LEN};

use super::ModWarnings;

/// Loop fields for a sample that does not loop: start 0, length 1 word
const NO_LOOP: [u8; 4] = [0x00, 0x00, 0x00, 0x01];

/// Write a fixed-length string, padded with zeros
pub(crate) fn write_string(output: &mut Vec<u8>, s: &str, len: usize) {
    let bytes = s.as_bytes();
    let copy_len = bytes.len().min(len);
    output.extend_from_slice(&bytes[..copy_len]);
    output.resize(output.len() + (len - copy_len), 0);
}

/// Length in 16-bit words, saturated to what the header can hold
fn to_words(frames: u32) -> u16 {
    (frames >> 1).min(0xFFFF) as u16
}

/// Frames of `sample` that actually go into the file
pub(crate) fn stored_frames(sample: &Sample) -> u32 {
    sample.length.min(MAX_SAMPLE_FRAMES) & !1
}

/// Loop that survives the trip to MOD unchanged
pub(crate) fn has_writable_loop(sample: &Sample) -> bool {
    sample.has_loop()
        && sample.loop_start < sample.loop_end
        && sample.loop_end <= sample.length.min(MAX_SAMPLE_FRAMES)
}

/// Write one 30-byte sample header, recording what it cannot express
pub(crate) fn write_sample_header(
    output: &mut Vec<u8>,
    sample: &Sample,
    warnings: &mut ModWarnings,
) {
    if sample.global_volume != 64 {
        warnings.insert(ModWarnings::SAMPLE_VOL);
    }
    let pingpong = SampleFlags::LOOP | SampleFlags::PINGPONG_LOOP;
    if sample.flags.contains(pingpong) || sample.has_sustain_loop() {
        warnings.insert(ModWarnings::LOOPS);
    }
    if sample.vib_depth != 0 {
        warnings.insert(ModWarnings::SAMPLE_VIB);
    }
    if sample.length & 1 != 0 || sample.length > MAX_SAMPLE_FRAMES {
        warnings.insert(ModWarnings::LONG_SAMPLES);
    }

    write_string(output, &sample.name, SAMPLE_NAME_LEN);
    output.extend_from_slice(&to_words(sample.length).to_be_bytes());
    output.push(nearest_finetune(sample.c5_speed));
    output.push(((sample.volume.min(256) + 1) / 4) as u8);

    if sample.has_loop() {
        output.extend_from_slice(&to_words(sample.loop_start).to_be_bytes());
        output.extend_from_slice(&to_words(sample.loop_length()).to_be_bytes());
    } else {
        output.extend_from_slice(&NO_LOOP);
    }
}

/// Pack one pattern cell
///
/// ```text
/// byte 0: iiii pppp   instrument bit 4, period bits 8-11
/// byte 1: pppp pppp   period bits 0-7
/// byte 2: iiii eeee   instrument low nibble, effect
/// byte 3: xxxx xxxx   effect parameter
/// ```
pub(crate) fn encode_cell(note: &Note, warnings: &mut ModWarnings) -> [u8; 4] {
    let period = AMIGA_PERIOD_TABLE[note.note as usize];
    if note.note != 0 && !(PERIOD_MIN..=PERIOD_MAX).contains(&period) {
        warnings.insert(ModWarnings::NOTE_RANGE);
    }

    let (effect, param) = export_mod_effect(note).unwrap_or_else(|| {
        warnings.insert(ModWarnings::VOL_EFFECTS);
        (0, 0)
    });

    [
        (note.instrument & 0x10) | (period >> 8) as u8,
        (period & 0xFF) as u8,
        ((note.instrument & 0x0F) << 4) | (effect & 0x0F),
        param,
    ]
}

/// Four-byte tag announcing `channels`
pub(crate) fn mod_tag(channels: usize, max_pattern: u8) -> [u8; 4] {
    let digit = |n: usize| b'0' + (n % 10) as u8;
    match channels {
        4 if max_pattern < 64 => *b"M.K.",
        4 => *b"M!K!",
        10.. => [digit(channels / 10), digit(channels), b'C', b'N'],
        _ => [digit(channels), b'C', b'H', b'N'],
    }
}

/// Body of `sample` as signed 8-bit mono, `stored_frames` long
pub(crate) fn sample_body(sample: &Sample) -> Vec<u8> {
    let frames = stored_frames(sample) as usize;
    let mut body: Vec<u8> = (0..frames)
        .map(|frame| sample.mono_frame_i8(frame) as u8)
        .collect();
    // Non-looping samples start with a silent word that the replayer idles on
    if !has_writable_loop(sample) {
        body.iter_mut().take(2).for_each(|b| *b = 0);
    }
    body
}
