//! Writer tests

use super::*;
use crate::module::{Effect, Note, Sample, SampleData, SampleFlags, VolumeEffect};
use crate::parser::parse_mod;
use crate::{PATTERN_OFFSET, TAG_OFFSET};

/// Song with one 64-row pattern played once and one sample
fn basic_song() -> Song {
    let mut song = Song {
        title: "round trip".to_string(),
        ..Default::default()
    };
    song.orders[0] = Order::Pattern(0);
    song.patterns.push(Pattern::empty(64));
    song.samples[1] = Sample {
        name: "kick".to_string(),
        length: 8,
        data: SampleData::I8(vec![10, 20, 30, 40, 50, 60, 70, 80]),
        ..Default::default()
    };
    song
}

fn set_note(song: &mut Song, pattern: usize, row: u16, channel: usize, note: Note) {
    if let Some(slot) = song.patterns[pattern].get_mut(row, channel) {
        *slot = note;
    }
}

fn cell_at(data: &[u8], channels: usize, pattern: usize, row: usize, channel: usize) -> [u8; 4] {
    let at = PATTERN_OFFSET + ((pattern * 64 + row) * channels + channel) * 4;
    [data[at], data[at + 1], data[at + 2], data[at + 3]]
}

#[test]
fn test_encode_layout() {
    let mut song = basic_song();
    set_note(
        &mut song,
        0,
        0,
        3,
        Note {
            note: 61,
            instrument: 1,
            ..Default::default()
        },
    );
    let encoded = encode_mod(&song);
    let data = &encoded.data;

    assert_eq!(&data[..10], b"round trip");
    assert_eq!(&data[20..24], b"kick");
    assert_eq!(data[950], 1);
    assert_eq!(data[951], 0x7F);
    assert_eq!(data[952], 0);
    assert_eq!(&data[TAG_OFFSET..PATTERN_OFFSET], b"M.K.");
    assert_eq!(cell_at(data, 4, 0, 0, 3), [0x01, 0xAC, 0x10, 0x00]);
    assert_eq!(data.len(), PATTERN_OFFSET + 1024 + 8);
    // Non-looping sample: first word zeroed
    assert_eq!(&data[PATTERN_OFFSET + 1024..], &[0, 0, 30, 40, 50, 60, 70, 80]);
    assert!(encoded.warnings.is_empty());
}

#[test]
fn test_empty_song() {
    let encoded = encode_mod(&Song::default());
    // One blank pattern, one channel
    assert_eq!(encoded.data.len(), PATTERN_OFFSET + 64 * 4);
    assert_eq!(&encoded.data[TAG_OFFSET..PATTERN_OFFSET], b"1CHN");
    assert_eq!(encoded.data[950], 0);
}

#[test]
fn test_numeric_tags() {
    let mut song = basic_song();
    set_note(
        &mut song,
        0,
        10,
        5,
        Note {
            instrument: 1,
            ..Default::default()
        },
    );
    let encoded = encode_mod(&song);
    assert_eq!(&encoded.data[TAG_OFFSET..PATTERN_OFFSET], b"6CHN");
    assert_eq!(cell_at(&encoded.data, 6, 0, 10, 5), [0x00, 0x00, 0x10, 0x00]);

    set_note(
        &mut song,
        0,
        0,
        11,
        Note {
            instrument: 2,
            ..Default::default()
        },
    );
    let encoded = encode_mod(&song);
    assert_eq!(&encoded.data[TAG_OFFSET..PATTERN_OFFSET], b"12CN");
}

#[test]
fn test_mk_bang_for_many_patterns() {
    let mut song = basic_song();
    set_note(
        &mut song,
        0,
        0,
        3,
        Note {
            instrument: 1,
            ..Default::default()
        },
    );
    for _ in 0..64 {
        song.patterns.push(Pattern::empty(64));
    }
    song.orders[1] = Order::Pattern(64);
    let encoded = encode_mod(&song);
    assert_eq!(&encoded.data[TAG_OFFSET..PATTERN_OFFSET], b"M!K!");
    assert_eq!(encoded.data.len(), PATTERN_OFFSET + 65 * 1024 + 8);
}

#[test]
fn test_max_samples_warning() {
    let mut song = basic_song();
    for slot in 1..=40 {
        song.samples[slot] = Sample {
            name: format!("s{}", slot),
            length: 2,
            data: SampleData::I8(vec![1, 1]),
            ..Default::default()
        };
    }
    let encoded = encode_mod(&song);
    assert!(encoded.warnings.contains(ModWarnings::MAX_SAMPLES));
    assert_eq!(&encoded.data[20 + 30 * 30..20 + 30 * 30 + 3], b"s31");
    // 31 bodies of 2 frames each
    assert_eq!(encoded.data.len(), PATTERN_OFFSET + 64 * 4 + 31 * 2);
}

#[test]
fn test_unused_patterns_warning() {
    let mut song = basic_song();
    let mut extra = Pattern::empty(64);
    extra.get_mut(0, 0).unwrap().note = 61;
    song.patterns.push(extra);
    let encoded = encode_mod(&song);
    assert!(encoded.warnings.contains(ModWarnings::UNUSED_PATS));
    // Only the referenced pattern is written, one channel wide
    assert_eq!(encoded.data.len(), PATTERN_OFFSET + 64 * 4 + 8);
}

#[test]
fn test_pattern_length_warning() {
    let mut song = basic_song();
    song.patterns[0] = Pattern::empty(32);
    set_note(
        &mut song,
        0,
        31,
        0,
        Note {
            note: 49,
            ..Default::default()
        },
    );
    let encoded = encode_mod(&song);
    assert!(encoded.warnings.contains(ModWarnings::PATTERN_LEN));
    assert_eq!(cell_at(&encoded.data, 1, 0, 31, 0), [0x03, 0x58, 0x00, 0x00]);
    assert_eq!(cell_at(&encoded.data, 1, 0, 63, 0), [0, 0, 0, 0]);
}

#[test]
fn test_song_flag_warnings() {
    let mut song = basic_song();
    song.flags = SongFlags::INSTRUMENT_MODE | SongFlags::LINEAR_SLIDES;
    let encoded = encode_mod(&song);
    assert_eq!(
        encoded.warnings,
        ModWarnings::INSTRUMENTS | ModWarnings::LINEAR_SLIDES
    );
}

#[test]
fn test_skip_orders_keep_their_slot() {
    let mut song = basic_song();
    song.patterns.push(Pattern::empty(64));
    song.orders[1] = Order::Skip;
    song.orders[2] = Order::Pattern(1);
    song.orders[3] = Order::End;
    song.orders[4] = Order::Pattern(1);
    let encoded = encode_mod(&song);
    assert_eq!(encoded.data[950], 3);
    assert_eq!(&encoded.data[952..956], &[0, 0xFE, 1, 0]);
    // Skip bytes do not count as pattern references
    assert_eq!(encoded.data.len(), PATTERN_OFFSET + 2 * 64 * 4 + 8);

    let decoded = parse_mod(&encoded.data).unwrap();
    assert_eq!(
        &decoded.orders[..4],
        &[Order::Pattern(0), Order::Skip, Order::Pattern(1), Order::End]
    );
}

#[test]
fn test_pattern_break_bcd() {
    let mut song = basic_song();
    set_note(
        &mut song,
        0,
        0,
        0,
        Note {
            effect: Effect::PatternBreak,
            param: 23,
            ..Default::default()
        },
    );
    let encoded = encode_mod(&song);
    assert_eq!(cell_at(&encoded.data, 1, 0, 0, 0), [0x00, 0x00, 0x0D, 0x23]);

    let decoded = parse_mod(&encoded.data).unwrap();
    let note = decoded.patterns[0].get(0, 0).unwrap();
    assert_eq!((note.effect, note.param), (Effect::PatternBreak, 23));
}

#[test]
fn test_vol_effects_warning() {
    let mut song = basic_song();
    set_note(
        &mut song,
        0,
        0,
        0,
        Note {
            effect: Effect::GlobalVolume,
            param: 0x20,
            ..Default::default()
        },
    );
    set_note(
        &mut song,
        0,
        1,
        0,
        Note {
            vol_effect: VolumeEffect::Volume,
            vol_param: 40,
            effect: Effect::Vibrato,
            param: 0x11,
            ..Default::default()
        },
    );
    let encoded = encode_mod(&song);
    assert_eq!(encoded.warnings, ModWarnings::VOL_EFFECTS);
    assert_eq!(cell_at(&encoded.data, 1, 0, 0, 0), [0, 0, 0, 0]);
    assert_eq!(cell_at(&encoded.data, 1, 0, 1, 0), [0x00, 0x00, 0x0C, 40]);
}

#[test]
fn test_note_range_warning() {
    let mut song = basic_song();
    set_note(
        &mut song,
        0,
        0,
        0,
        Note {
            note: 96,
            instrument: 0x11,
            effect: Effect::Speed,
            param: 3,
            ..Default::default()
        },
    );
    let encoded = encode_mod(&song);
    assert!(encoded.warnings.contains(ModWarnings::NOTE_RANGE));
    // Period 56 still lands in the cell with the other fields intact
    assert_eq!(cell_at(&encoded.data, 1, 0, 0, 0), [0x10, 56, 0x1F, 3]);
}

#[test]
fn test_looping_sample_written_as_is() {
    let mut song = basic_song();
    song.samples[1].flags = SampleFlags::LOOP;
    song.samples[1].loop_start = 2;
    song.samples[1].loop_end = 8;
    let encoded = encode_mod(&song);
    let header = &encoded.data[20 + 22..20 + 30];
    assert_eq!(header, &[0x00, 0x04, 0x00, 64, 0x00, 0x01, 0x00, 0x03]);
    assert_eq!(
        &encoded.data[PATTERN_OFFSET + 256..],
        &[10, 20, 30, 40, 50, 60, 70, 80]
    );
}

#[test]
fn test_decode_encode_decode_is_stable() {
    let mut song = basic_song();
    song.samples[1].c5_speed = 8463;
    song.samples[1].volume = 160;
    song.samples[2] = Sample {
        name: "pad".to_string(),
        length: 4,
        loop_start: 0,
        loop_end: 4,
        flags: SampleFlags::LOOP,
        data: SampleData::I8(vec![1, 2, 3, 4]),
        ..Default::default()
    };
    song.patterns.push(Pattern::empty(64));
    song.orders[1] = Order::Pattern(1);
    song.orders[2] = Order::Pattern(0);
    let cells = [
        (0, 0, 0, 61, 1, Effect::Speed, 6),
        (0, 4, 1, 49, 2, Effect::VolumeSlide, 0x0F),
        (0, 8, 2, 84, 1, Effect::Special, 0xB2),
        (1, 16, 3, 72, 2, Effect::PortamentoUp, 0xF3),
        (1, 63, 0, 0, 0, Effect::PatternBreak, 10),
    ];
    for (pattern, row, channel, note, instrument, effect, param) in cells {
        set_note(
            &mut song,
            pattern,
            row,
            channel,
            Note {
                note,
                instrument,
                effect,
                param,
                ..Default::default()
            },
        );
    }
    set_note(
        &mut song,
        1,
        2,
        2,
        Note {
            note: 60,
            instrument: 1,
            vol_effect: VolumeEffect::Volume,
            vol_param: 33,
            ..Default::default()
        },
    );

    let first = parse_mod(&encode_mod(&song).data).unwrap();
    let second = parse_mod(&encode_mod(&first).data).unwrap();

    assert_eq!(first.title, "round trip");
    assert_eq!(second.title, first.title);
    assert_eq!(second.orders, first.orders);
    assert_eq!(first.num_orders(), 3);
    assert_eq!(second.patterns, first.patterns);
    assert_eq!(first.patterns[1].get(2, 2).unwrap().vol_param, 33);
    for slot in 1..=2 {
        let (a, b) = (&first.samples[slot], &second.samples[slot]);
        assert_eq!(a.name, b.name);
        assert_eq!(a.length, b.length);
        assert_eq!(a.c5_speed, b.c5_speed);
        assert_eq!(a.volume, b.volume);
        assert_eq!((a.loop_start, a.loop_end), (b.loop_start, b.loop_end));
        assert_eq!(a.flags, b.flags);
        assert_eq!(a.data, b.data);
    }
    assert_eq!(first.samples[1].c5_speed, 8463);
    assert_eq!(first.samples[1].volume, 160);
    assert!(first.samples[2].has_loop());
}
