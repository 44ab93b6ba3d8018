//! Sample body decoding
//!
//! Bodies are signed 8-bit mono PCM. ModPlug can store them packed as 4-bit
//! deltas instead, announced by a literal `ADPCM` marker in front of the data.

use std::io::Cursor;

use crate::ADPCM_MAGIC;
use crate::module::{Sample, SampleData, SampleFlags};

use super::helpers::{peek, read_up_to, skip};

/// Size of the delta table that starts an ADPCM body
const ADPCM_TABLE_LEN: usize = 16;

/// Encoding of one sample body, sniffed from its first bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SampleEncoding {
    Pcm8,
    Adpcm4,
}

impl SampleEncoding {
    /// Bytes the body occupies in the file, marker excluded
    pub fn stored_len(&self, frames: u32) -> usize {
        match self {
            Self::Pcm8 => frames as usize,
            Self::Adpcm4 => ADPCM_TABLE_LEN + (frames as usize).div_ceil(2),
        }
    }
}

/// Look for the ADPCM marker and step over it if present
pub(crate) fn sniff_encoding(cursor: &mut Cursor<&[u8]>) -> SampleEncoding {
    if peek(cursor, ADPCM_MAGIC.len()) == ADPCM_MAGIC {
        skip(cursor, ADPCM_MAGIC.len());
        SampleEncoding::Adpcm4
    } else {
        SampleEncoding::Pcm8
    }
}

/// Read the body for `sample`, leaving the cursor after it
///
/// A body cut short by the end of the file is padded with silence.
pub(crate) fn read_sample_data(cursor: &mut Cursor<&[u8]>, sample: &mut Sample) {
    let encoding = sniff_encoding(cursor);
    let frames = sample.length as usize;
    let stored = read_up_to(cursor, encoding.stored_len(sample.length));

    let pcm = match encoding {
        SampleEncoding::Pcm8 => {
            let mut pcm: Vec<i8> = stored.iter().map(|&b| b as i8).collect();
            pcm.resize(frames, 0);
            pcm
        }
        SampleEncoding::Adpcm4 => {
            sample.flags.insert(SampleFlags::COMPRESSED);
            decode_adpcm(stored, frames)
        }
    };
    sample.data = SampleData::I8(pcm);
}

/// Step over the body for `sample` without decoding it
pub(crate) fn skip_sample_data(cursor: &mut Cursor<&[u8]>, sample: &Sample) {
    let encoding = sniff_encoding(cursor);
    skip(cursor, encoding.stored_len(sample.length));
}

/// Decode a ModPlug ADPCM body (delta table followed by packed nibbles)
///
/// Each nibble indexes the table; the looked-up delta is added to a running
/// 8-bit value. Low nibble first.
pub(crate) fn decode_adpcm(stored: &[u8], frames: usize) -> Vec<i8> {
    let mut pcm = vec![0i8; frames];
    if stored.len() < ADPCM_TABLE_LEN {
        return pcm;
    }
    let (table, packed) = stored.split_at(ADPCM_TABLE_LEN);

    let mut value = 0i8;
    let nibbles = packed.iter().flat_map(|&b| [b & 0x0F, b >> 4]);
    for (out, nibble) in pcm.iter_mut().zip(nibbles) {
        value = value.wrapping_add(table[nibble as usize] as i8);
        *out = value;
    }
    pcm
}
