//! MOD effect translation
//!
//! MOD stores a 4-bit effect and an 8-bit parameter per cell. The song model
//! uses a wider effect space plus a separate volume column, so import
//! expands (`Cxx` moves to the volume column, `Exy` fans out into its own
//! effects) and export folds everything back, dropping what does not fit.
//!
//! The mapping is not a bijection: `Fxx` becomes speed or tempo depending on
//! its parameter, extra-fine slides lose precision, and `8xx`/`E8x` both
//! mean panning.

use crate::module::{Effect, Note, VolumeEffect};

/// Effects that map one-to-one onto a MOD effect nibble
static SIMPLE_EFFECTS: &[(Effect, u8)] = &[
    (Effect::Arpeggio, 0x0),
    (Effect::PortamentoUp, 0x1),
    (Effect::PortamentoDown, 0x2),
    (Effect::TonePortamento, 0x3),
    (Effect::Vibrato, 0x4),
    (Effect::TonePortaVol, 0x5),
    (Effect::VibratoVol, 0x6),
    (Effect::Tremolo, 0x7),
    (Effect::Panning, 0x8),
    (Effect::Offset, 0x9),
    (Effect::VolumeSlide, 0xA),
    (Effect::PositionJump, 0xB),
    (Effect::Volume, 0xC),
    (Effect::PatternBreak, 0xD),
    (Effect::Special, 0xE),
    (Effect::Speed, 0xF),
    (Effect::Tempo, 0xF),
];

/// `Sxy` high nibble to MOD `Exy` high nibble, for the sub-commands that moved
static SPECIAL_TO_EXTENDED: &[(u8, u8)] = &[
    (0x1, 0x3), // glissando
    (0x2, 0x5), // set finetune
    (0x3, 0x4), // vibrato waveform
    (0x4, 0x7), // tremolo waveform
    (0xB, 0x6), // pattern loop
];

/// Internal view of one imported MOD cell's effect columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ImportedEffect {
    pub vol_effect: VolumeEffect,
    pub vol_param: u8,
    pub effect: Effect,
    pub param: u8,
}

/// Translate a raw MOD effect nibble and parameter into the song model
pub fn import_mod_effect(command: u8, param: u8) -> ImportedEffect {
    let mut command = command & 0x0F;
    let mut param = param;
    let mut out = ImportedEffect::default();

    // Slides and retrigger without a parameter do nothing in MOD but would
    // recall effect memory in the song model, so drop them here.
    if param == 0 || (command == 0xE && param & 0x0F == 0) {
        match command {
            0x1 | 0x2 | 0xA => command = 0,
            0xE if matches!(param & 0xF0, 0x10 | 0x20 | 0x90 | 0xA0 | 0xB0) => {
                command = 0;
                param = 0;
            }
            _ => {}
        }
    }

    let effect = match command {
        0x0 if param == 0 => Effect::None,
        0x0 => Effect::Arpeggio,
        0x1 => Effect::PortamentoUp,
        0x2 => Effect::PortamentoDown,
        0x3 => Effect::TonePortamento,
        0x4 => Effect::Vibrato,
        0x5 | 0x6 | 0xA => {
            // One direction only; up wins when both nibbles are set
            if param & 0xF0 != 0 {
                param &= 0xF0;
            }
            match command {
                0x5 => Effect::TonePortaVol,
                0x6 => Effect::VibratoVol,
                _ => Effect::VolumeSlide,
            }
        }
        0x7 => Effect::Tremolo,
        0x8 => Effect::Panning,
        0x9 => Effect::Offset,
        0xB => Effect::PositionJump,
        0xC => {
            out.vol_effect = VolumeEffect::Volume;
            out.vol_param = param.min(64);
            param = 0;
            Effect::None
        }
        0xD => {
            param = (param >> 4) * 10 + (param & 0x0F);
            Effect::PatternBreak
        }
        0xE => {
            let (effect, new_param) = import_extended(param);
            param = new_param;
            effect
        }
        _ => {
            if param < 0x21 {
                Effect::Speed
            } else {
                Effect::Tempo
            }
        }
    };

    out.effect = effect;
    out.param = param;
    out
}

fn import_extended(param: u8) -> (Effect, u8) {
    let low = param & 0x0F;
    match param >> 4 {
        0x1 => (Effect::PortamentoUp, param | 0xF0),
        0x2 => (Effect::PortamentoDown, param | 0xF0),
        0x9 => (Effect::Retrig, low),
        0xA if low != 0 => (Effect::VolumeSlide, (low << 4) | 0x0F),
        0xB if low != 0 => (Effect::VolumeSlide, param | 0xF0),
        0xA | 0xB => (Effect::None, 0),
        high => {
            let special = SPECIAL_TO_EXTENDED
                .iter()
                .find(|&&(_, extended)| extended == high)
                .map_or(high, |&(special, _)| special);
            (Effect::Special, (special << 4) | low)
        }
    }
}

/// Fold a cell's volume column and effect into a MOD effect nibble and parameter
///
/// Returns `None` when the cell carries something MOD cannot express; the
/// caller writes an empty effect and records the loss.
pub fn export_mod_effect(note: &Note) -> Option<(u8, u8)> {
    match note.vol_effect {
        VolumeEffect::Volume => return Some((0xC, note.vol_param)),
        VolumeEffect::None => {}
        _ => return None,
    }

    let param = note.param;
    let exported = match note.effect {
        Effect::None => (0x0, 0),
        Effect::PortamentoUp => export_porta(0x1, param),
        Effect::PortamentoDown => export_porta(0x2, param),
        Effect::VolumeSlide => export_volume_slide(param),
        Effect::PatternBreak => (0xD, ((param / 10) << 4) | (param % 10)),
        Effect::Special => {
            let low = param & 0x0F;
            let high = SPECIAL_TO_EXTENDED
                .iter()
                .find(|&&(special, _)| special == param >> 4)
                .map_or(param >> 4, |&(_, extended)| extended);
            (0xE, (high << 4) | low)
        }
        Effect::Retrig => (0xE, 0x90 | (param & 0x0F)),
        effect => {
            let &(_, command) = SIMPLE_EFFECTS.iter().find(|(e, _)| *e == effect)?;
            (command, param)
        }
    };
    Some(exported)
}

fn export_porta(command: u8, param: u8) -> (u8, u8) {
    let sub = command << 4;
    match param & 0xF0 {
        // Extra-fine slides only survive at a quarter of their precision
        0xE0 => (0xE, sub | ((param & 0x0F) >> 2)),
        0xF0 => (0xE, sub | (param & 0x0F)),
        _ => (command, param),
    }
}

fn export_volume_slide(param: u8) -> (u8, u8) {
    if param & 0xF0 != 0 && param & 0x0F != 0 {
        if param & 0xF0 == 0xF0 {
            // Fxy: fine slide down, EBy
            return (0xE, param & 0xBF);
        }
        if param & 0x0F == 0x0F {
            // xF: fine slide up, EAx
            return (0xE, 0xA0 | (param >> 4));
        }
    }
    (0xA, param)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note_with(effect: Effect, param: u8) -> Note {
        Note {
            effect,
            param,
            ..Default::default()
        }
    }

    #[test]
    fn test_import_basic() {
        assert_eq!(import_mod_effect(0x0, 0x00).effect, Effect::None);
        assert_eq!(import_mod_effect(0x0, 0x37).effect, Effect::Arpeggio);
        assert_eq!(import_mod_effect(0x3, 0x10).effect, Effect::TonePortamento);
        assert_eq!(import_mod_effect(0x9, 0x80).effect, Effect::Offset);
        assert_eq!(import_mod_effect(0xF, 0x06).effect, Effect::Speed);
        assert_eq!(import_mod_effect(0xF, 0x20).effect, Effect::Speed);
        assert_eq!(import_mod_effect(0xF, 0x21).effect, Effect::Tempo);
    }

    #[test]
    fn test_import_drops_empty_slides() {
        assert_eq!(import_mod_effect(0x1, 0x00).effect, Effect::None);
        assert_eq!(import_mod_effect(0xA, 0x00).effect, Effect::None);
        let retrig = import_mod_effect(0xE, 0x90);
        assert_eq!((retrig.effect, retrig.param), (Effect::None, 0));
        // Other zero-parameter effects keep their meaning
        assert_eq!(import_mod_effect(0x4, 0x00).effect, Effect::Vibrato);
    }

    #[test]
    fn test_import_volume_moves_to_column() {
        let imported = import_mod_effect(0xC, 0x50);
        assert_eq!(imported.vol_effect, VolumeEffect::Volume);
        assert_eq!(imported.vol_param, 64);
        assert_eq!(imported.effect, Effect::None);
        assert_eq!(imported.param, 0);
    }

    #[test]
    fn test_import_pattern_break_bcd() {
        let imported = import_mod_effect(0xD, 0x23);
        assert_eq!(imported.effect, Effect::PatternBreak);
        assert_eq!(imported.param, 23);
    }

    #[test]
    fn test_import_volume_slide_one_direction() {
        assert_eq!(import_mod_effect(0xA, 0x4F).param, 0x40);
        assert_eq!(import_mod_effect(0xA, 0x0F).param, 0x0F);
    }

    #[test]
    fn test_import_extended() {
        let fine_up = import_mod_effect(0xE, 0x13);
        assert_eq!((fine_up.effect, fine_up.param), (Effect::PortamentoUp, 0xF3));
        let fine_vol_up = import_mod_effect(0xE, 0xA4);
        assert_eq!((fine_vol_up.effect, fine_vol_up.param), (Effect::VolumeSlide, 0x4F));
        let fine_vol_down = import_mod_effect(0xE, 0xB4);
        assert_eq!((fine_vol_down.effect, fine_vol_down.param), (Effect::VolumeSlide, 0xF4));
        let retrig = import_mod_effect(0xE, 0x93);
        assert_eq!((retrig.effect, retrig.param), (Effect::Retrig, 0x03));
        let loop_ = import_mod_effect(0xE, 0x62);
        assert_eq!((loop_.effect, loop_.param), (Effect::Special, 0xB2));
        let delay = import_mod_effect(0xE, 0xD3);
        assert_eq!((delay.effect, delay.param), (Effect::Special, 0xD3));
    }

    #[test]
    fn test_export_volume_column_wins() {
        let note = Note {
            vol_effect: VolumeEffect::Volume,
            vol_param: 32,
            effect: Effect::Vibrato,
            param: 0x44,
            ..Default::default()
        };
        assert_eq!(export_mod_effect(&note), Some((0xC, 32)));
    }

    #[test]
    fn test_export_unsupported() {
        let note = Note {
            vol_effect: VolumeEffect::Panning,
            vol_param: 32,
            ..Default::default()
        };
        assert_eq!(export_mod_effect(&note), None);
        assert_eq!(export_mod_effect(&note_with(Effect::GlobalVolume, 0x40)), None);
        assert_eq!(export_mod_effect(&note_with(Effect::Tremor, 0x11)), None);
    }

    #[test]
    fn test_export_pattern_break_bcd() {
        assert_eq!(
            export_mod_effect(&note_with(Effect::PatternBreak, 23)),
            Some((0xD, 0x23))
        );
    }

    #[test]
    fn test_export_fine_slides() {
        assert_eq!(export_mod_effect(&note_with(Effect::PortamentoUp, 0xF3)), Some((0xE, 0x13)));
        assert_eq!(export_mod_effect(&note_with(Effect::PortamentoDown, 0xE8)), Some((0xE, 0x22)));
        assert_eq!(export_mod_effect(&note_with(Effect::PortamentoUp, 0x08)), Some((0x1, 0x08)));
        assert_eq!(export_mod_effect(&note_with(Effect::VolumeSlide, 0xF4)), Some((0xE, 0xB4)));
        assert_eq!(export_mod_effect(&note_with(Effect::VolumeSlide, 0x4F)), Some((0xE, 0xA4)));
        assert_eq!(export_mod_effect(&note_with(Effect::VolumeSlide, 0x40)), Some((0xA, 0x40)));
    }

    #[test]
    fn test_export_special_and_retrig() {
        assert_eq!(export_mod_effect(&note_with(Effect::Special, 0xB2)), Some((0xE, 0x62)));
        assert_eq!(export_mod_effect(&note_with(Effect::Special, 0x21)), Some((0xE, 0x51)));
        assert_eq!(export_mod_effect(&note_with(Effect::Special, 0xC4)), Some((0xE, 0xC4)));
        assert_eq!(export_mod_effect(&note_with(Effect::Retrig, 0x35)), Some((0xE, 0x95)));
        assert_eq!(export_mod_effect(&note_with(Effect::Tempo, 0x7D)), Some((0xF, 0x7D)));
    }

    #[test]
    fn test_import_export_import_is_stable() {
        for command in 0..16u8 {
            for param in [0x00, 0x01, 0x0F, 0x10, 0x23, 0x4F, 0x93, 0xA4, 0xB4, 0xF1, 0xFF] {
                if command == 0xD && param > 0xF9 {
                    // Break rows past 159 have no BCD form
                    continue;
                }
                let first = import_mod_effect(command, param);
                let note = Note {
                    vol_effect: first.vol_effect,
                    vol_param: first.vol_param,
                    effect: first.effect,
                    param: first.param,
                    ..Default::default()
                };
                let (c, p) = export_mod_effect(&note).unwrap();
                let second = import_mod_effect(c, p);
                assert_eq!(first, second, "command {:X} param {:02X}", command, param);
            }
        }
    }
}
