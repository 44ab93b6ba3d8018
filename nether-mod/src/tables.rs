//! Period and finetune lookup tables

use crate::DEFAULT_C5_SPEED;
use crate::module::{NOTE_LAST, NOTE_NONE};

/// Amiga period for each note number; zero where MOD has no period
///
/// Populated for C-3 (37) through B-7 (96).
#[rustfmt::skip]
pub static AMIGA_PERIOD_TABLE: [u16; 256] = {
    const ROWS: [u16; 60] = [
        1712, 1616, 1524, 1440, 1356, 1280, 1208, 1140, 1076, 1016, 960, 906,
        856,  808,  762,  720,  678,  640,  604,  570,  538,  508,  480, 453,
        428,  404,  381,  360,  339,  320,  302,  285,  269,  254,  240, 226,
        214,  202,  190,  180,  170,  160,  151,  143,  135,  127,  120, 113,
        107,  101,  95,   90,   85,   80,   75,   71,   67,   63,   60,  56,
    ];
    let mut table = [0u16; 256];
    let mut i = 0;
    while i < ROWS.len() {
        table[37 + i] = ROWS[i];
        i += 1;
    }
    table
};

/// One octave of periods; other octaves are derived by halving
const OCTAVE_PERIODS: [u32; 12] = [
    1712, 1616, 1524, 1440, 1356, 1280, 1208, 1140, 1076, 1016, 960, 906,
];

/// C-5 rate for each finetune step, indexed by `nibble ^ 8`
pub static FINETUNE_TABLE: [u32; 16] = [
    7895, 7941, 7985, 8046, 8107, 8169, 8232, 8280, 8363, 8413, 8463, 8529, 8581, 8651, 8723, 8757,
];

/// Lowest period the ProTracker replay can play (B-6)
pub const PERIOD_MIN: u16 = 113;

/// Highest period the ProTracker replay can play (C-4)
pub const PERIOD_MAX: u16 = 856;

/// Convert an Amiga period to a note number (0 = no note)
pub fn period_to_note(period: u16) -> u8 {
    if period == 0 {
        return NOTE_NONE;
    }
    let period = period as u32;
    (0..NOTE_LAST as u32)
        .find(|&n| period >= (32 * OCTAVE_PERIODS[(n % 12) as usize]) >> (n / 12 + 2))
        .map_or(NOTE_NONE, |n| n as u8 + 1)
}

/// C-5 rate for a standard finetune nibble
pub fn finetune_to_c5speed(finetune: u8) -> u32 {
    FINETUNE_TABLE[((finetune & 0x0F) ^ 8) as usize]
}

/// C-5 rate for the signed finetune byte used by the `M&K!`/`FEST` dialect
pub fn alt_finetune_to_c5speed(finetune: u8) -> u32 {
    let ftune = -((finetune << 3) as i8 as i32);
    transpose_to_frequency(0, ftune)
}

/// Rate for a transpose in semitones plus a finetune in 1/128ths of a semitone
pub fn transpose_to_frequency(transpose: i32, finetune: i32) -> u32 {
    let exponent = (transpose as f64 * 128.0 + finetune as f64) / 1536.0;
    (DEFAULT_C5_SPEED as f64 * exponent.exp2()) as u32
}

/// Finetune nibble whose table rate is closest to `c5_speed`
///
/// Ties go to the lower table index. Anything above 10000 Hz is far outside
/// the table and is written as finetune 0.
pub fn nearest_finetune(c5_speed: u32) -> u8 {
    let index = if c5_speed > 10000 {
        8
    } else {
        FINETUNE_TABLE
            .iter()
            .enumerate()
            .min_by_key(|(_, rate)| rate.abs_diff(c5_speed))
            .map_or(8, |(i, _)| i)
    };
    (index as u8 ^ 8) & 0x0F
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_table_layout() {
        assert_eq!(AMIGA_PERIOD_TABLE[36], 0);
        assert_eq!(AMIGA_PERIOD_TABLE[37], 1712);
        assert_eq!(AMIGA_PERIOD_TABLE[49], PERIOD_MAX);
        assert_eq!(AMIGA_PERIOD_TABLE[61], 428);
        assert_eq!(AMIGA_PERIOD_TABLE[84], PERIOD_MIN);
        assert_eq!(AMIGA_PERIOD_TABLE[96], 56);
        assert_eq!(AMIGA_PERIOD_TABLE[97], 0);
    }

    #[test]
    fn test_period_to_note_inverts_table() {
        for note in 37..=96u8 {
            let period = AMIGA_PERIOD_TABLE[note as usize];
            assert_eq!(period_to_note(period), note, "period {}", period);
        }
        assert_eq!(period_to_note(0), NOTE_NONE);
    }

    #[test]
    fn test_period_to_note_between_entries() {
        // Slightly detuned periods snap to the next lower note's slot
        assert_eq!(period_to_note(430), 61);
        assert_eq!(period_to_note(427), 62);
    }

    #[test]
    fn test_finetune_lookup() {
        assert_eq!(finetune_to_c5speed(0), 8363);
        assert_eq!(finetune_to_c5speed(7), 8757);
        assert_eq!(finetune_to_c5speed(8), 7895);
        assert_eq!(finetune_to_c5speed(0xF), 8280);
        assert_eq!(finetune_to_c5speed(0xF1), 8413);
    }

    #[test]
    fn test_nearest_finetune() {
        for nibble in 0..16u8 {
            assert_eq!(nearest_finetune(finetune_to_c5speed(nibble)), nibble);
        }
        assert_eq!(nearest_finetune(8400), 1);
        assert_eq!(nearest_finetune(8388), 0); // exact midpoint 8363/8413
        assert_eq!(nearest_finetune(1000), 8);
        assert_eq!(nearest_finetune(44100), 0);
    }

    #[test]
    fn test_alt_finetune() {
        assert_eq!(alt_finetune_to_c5speed(0), 8363);
        // Positive byte lowers the pitch, negative raises it
        assert!(alt_finetune_to_c5speed(1) < 8363);
        assert!(alt_finetune_to_c5speed(0x1F) > 8363);
    }
}
