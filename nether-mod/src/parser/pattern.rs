//! Pattern data decoding

use std::io::Cursor;

use crate::MOD_ROWS;
use crate::effects::import_mod_effect;
use crate::error::ModError;
use crate::module::{Note, Pattern};
use crate::tables::period_to_note;

use super::helpers::read_array;

/// Channels in each half of a Startrekker 8-channel pattern
const STARTREKKER_HALF: usize = 4;

/// Decode one 4-byte cell
///
/// ```text
/// byte 0: iiii pppp   instrument high nibble, period bits 8-11
/// byte 1: pppp pppp   period bits 0-7
/// byte 2: iiii eeee   instrument low nibble, effect
/// byte 3: xxxx xxxx   effect parameter
/// ```
pub(crate) fn decode_cell(cell: [u8; 4]) -> Note {
    let period = (((cell[0] & 0x0F) as u16) << 8) | cell[1] as u16;
    let effect = import_mod_effect(cell[2] & 0x0F, cell[3]);
    Note {
        note: period_to_note(period),
        instrument: (cell[0] & 0xF0) | (cell[2] >> 4),
        vol_effect: effect.vol_effect,
        vol_param: effect.vol_param,
        effect: effect.effect,
        param: effect.param,
    }
}

/// Read `channels` cells per row for all 64 rows
pub(crate) fn read_pattern(
    cursor: &mut Cursor<&[u8]>,
    channels: usize,
) -> Result<Pattern, ModError> {
    let mut pattern = Pattern::empty(MOD_ROWS);
    read_channels(cursor, &mut pattern, 0..channels)?;
    Ok(pattern)
}

/// Read a Startrekker pattern: channels 0-3 for every row, then channels 4-7
pub(crate) fn read_split_pattern(cursor: &mut Cursor<&[u8]>) -> Result<Pattern, ModError> {
    let mut pattern = Pattern::empty(MOD_ROWS);
    read_channels(cursor, &mut pattern, 0..STARTREKKER_HALF)?;
    read_channels(cursor, &mut pattern, STARTREKKER_HALF..STARTREKKER_HALF * 2)?;
    Ok(pattern)
}

fn read_channels(
    cursor: &mut Cursor<&[u8]>,
    pattern: &mut Pattern,
    channels: std::ops::Range<usize>,
) -> Result<(), ModError> {
    for row in 0..pattern.rows {
        for channel in channels.clone() {
            let note = decode_cell(read_array::<4>(cursor)?);
            if let Some(slot) = pattern.get_mut(row, channel) {
                *slot = note;
            }
        }
    }
    Ok(())
}
