//! Pattern and note structures

use crate::{MAX_CHANNELS, MOD_ROWS};

/// No note in this cell
pub const NOTE_NONE: u8 = 0;

/// Highest playable note (B-9)
pub const NOTE_LAST: u8 = 120;

/// Note cut (^^^)
pub const NOTE_CUT: u8 = 254;

/// Note off (===)
pub const NOTE_OFF: u8 = 255;

/// Column effect in the wide internal effect space
///
/// Only part of this space maps onto MOD's 4-bit effect nibble; the rest is
/// dropped by the writer with [`crate::ModWarnings::VOL_EFFECTS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Effect {
    #[default]
    None,
    Arpeggio,
    PortamentoUp,
    PortamentoDown,
    TonePortamento,
    Vibrato,
    TonePortaVol,
    VibratoVol,
    Tremolo,
    Tremor,
    Panning,
    Offset,
    VolumeSlide,
    PositionJump,
    Volume,
    PatternBreak,
    Retrig,
    Speed,
    Tempo,
    /// Sxy family (glissando, waveforms, pattern loop, delays, ...)
    Special,
    ChannelVolume,
    ChannelVolSlide,
    GlobalVolume,
    GlobalVolSlide,
    KeyOff,
    FineVibrato,
    Panbrello,
    PanningSlide,
    SetEnvPosition,
    Midi,
    NoteSlideUp,
    NoteSlideDown,
}

/// Volume column effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VolumeEffect {
    #[default]
    None,
    Volume,
    Panning,
    VolSlideUp,
    VolSlideDown,
    FineVolUp,
    FineVolDown,
    VibratoSpeed,
    VibratoDepth,
    PortaUp,
    PortaDown,
    TonePortamento,
}

/// Single cell in a pattern
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Note {
    /// 0=none, 1-120=C-0..B-9, 254=cut, 255=off
    pub note: u8,
    /// Instrument/sample number, 0=none
    pub instrument: u8,
    /// Volume column effect
    pub vol_effect: VolumeEffect,
    /// Volume column parameter
    pub vol_param: u8,
    /// Column effect
    pub effect: Effect,
    /// Column effect parameter
    pub param: u8,
}

impl Note {
    /// Check if the cell carries nothing at all
    #[inline]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Check if this note triggers a new note
    #[inline]
    pub fn has_note(&self) -> bool {
        self.note > NOTE_NONE && self.note <= NOTE_LAST
    }
}

/// Pattern stored as a flat `rows * MAX_CHANNELS` grid, row-major
#[derive(Debug, Clone, PartialEq)]
pub struct Pattern {
    /// Number of rows
    pub rows: u16,
    /// Cells, `MAX_CHANNELS` per row
    pub notes: Vec<Note>,
}

impl Pattern {
    /// Create an empty pattern with the given number of rows
    pub fn empty(rows: u16) -> Self {
        Self {
            rows,
            notes: vec![Note::default(); rows as usize * MAX_CHANNELS],
        }
    }

    /// Get note at specific row and channel
    pub fn get(&self, row: u16, channel: usize) -> Option<&Note> {
        if channel >= MAX_CHANNELS {
            return None;
        }
        self.notes.get(row as usize * MAX_CHANNELS + channel)
    }

    /// Get mutable note at specific row and channel
    pub fn get_mut(&mut self, row: u16, channel: usize) -> Option<&mut Note> {
        if channel >= MAX_CHANNELS {
            return None;
        }
        self.notes.get_mut(row as usize * MAX_CHANNELS + channel)
    }

    /// Cells of one row
    pub fn row(&self, row: u16) -> &[Note] {
        let start = (row as usize * MAX_CHANNELS).min(self.notes.len());
        let end = (start + MAX_CHANNELS).min(self.notes.len());
        &self.notes[start..end]
    }

    /// A default-sized pattern with no data in it
    pub fn is_blank(&self) -> bool {
        self.rows == MOD_ROWS && self.notes.iter().all(Note::is_empty)
    }

    /// Highest channel index carrying any data
    pub fn highest_used_channel(&self) -> Option<usize> {
        self.notes
            .iter()
            .enumerate()
            .filter(|(_, note)| !note.is_empty())
            .map(|(i, _)| i % MAX_CHANNELS)
            .max()
    }
}
