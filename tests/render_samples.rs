//! Rendering tests: build small tabs, finish them and lay out glyph trees.

use pretty_assertions::assert_eq;
use tablib::{
    build_beat_glyph, finish_and_layout, finish_track, glyph_tree_to_json, layout_track,
    layout_voice_row, score_from_json, score_to_json, AnyGlyph, Duration, Glyph, LayoutSettings,
    Note, Score, TabError, Track, STANDARD_GUITAR_TUNING,
};

/// A two-bar riff: a chord, a tied note and a double-digit fret.
fn riff() -> Track {
    let mut track = Track::new("Lead", STANDARD_GUITAR_TUNING.to_vec());

    let bar = track.add_bar();
    let voice = track.add_voice(bar).unwrap();
    let chord = track.add_beat(voice, Duration::Quarter).unwrap();
    track.add_note(chord, Note::new(1, 0)).unwrap();
    track.add_note(chord, Note::new(2, 1)).unwrap();
    track.add_note(chord, Note::new(3, 0)).unwrap();
    let high = track.add_beat(voice, Duration::Quarter).unwrap();
    track.add_note(high, Note::new(2, 15)).unwrap();

    let bar = track.add_bar();
    let voice = track.add_voice(bar).unwrap();
    let held = track.add_beat(voice, Duration::Half).unwrap();
    track.add_note(held, Note::tied(2)).unwrap();

    track
}

fn no_padding() -> LayoutSettings {
    LayoutSettings {
        beat_padding: 0.0,
        ..LayoutSettings::default()
    }
}

#[test]
fn chord_column_is_as_wide_as_its_widest_fret() {
    let mut track = riff();
    finish_track(&mut track).unwrap();
    let beat = track.voices()[0].beats[0];

    let glyph = build_beat_glyph(&track, beat).unwrap();
    assert_eq!(glyph.notes().len(), 3);

    let mut row = tablib::GlyphGroup::new(0.0, 0.0);
    row.add(glyph);
    row.do_layout(&tablib::LayoutContext::default());
    assert_eq!(row.width(), 14.0);
}

#[test]
fn tied_note_renders_the_origin_fret() {
    let mut track = riff();
    finish_track(&mut track).unwrap();

    let rows = layout_track(&track, &no_padding()).unwrap();
    assert_eq!(rows.len(), 2);

    let AnyGlyph::TabBeat(held) = &rows[1].glyphs()[1] else {
        panic!("expected a beat column");
    };
    let AnyGlyph::Number(number) = &held.notes()[0].glyph else {
        panic!("expected a fret number");
    };
    assert_eq!(number.digits(), vec![1, 5]);
}

#[test]
fn bars_are_placed_side_by_side() {
    let mut track = riff();
    finish_track(&mut track).unwrap();
    let settings = LayoutSettings::default();

    let rows = layout_track(&track, &settings).unwrap();
    // bar 1: pad 6 + chord 14 + pad 6 + "15" 24 = 50
    assert_eq!(rows[0].width(), 50.0);
    assert_eq!(rows[1].x(), 50.0);
    // bar 2: pad 6 + "15" 24
    assert_eq!(rows[1].width(), 30.0);
}

#[test]
fn scale_zooms_every_width() {
    let mut track = riff();
    finish_track(&mut track).unwrap();
    let settings = LayoutSettings {
        scale: 2.0,
        ..LayoutSettings::default()
    };
    let voice = track.bars()[0].voices[0];
    let row = layout_voice_row(&track, voice, 0.0, 0.0, &settings).unwrap();
    assert_eq!(row.width(), 100.0);
}

#[test]
fn grace_beats_use_small_digits() {
    let mut track = Track::new("Lead", STANDARD_GUITAR_TUNING.to_vec());
    let bar = track.add_bar();
    let voice = track.add_voice(bar).unwrap();
    let grace = track.add_beat(voice, Duration::Sixteenth).unwrap();
    track.set_grace(grace, true).unwrap();
    track.add_note(grace, Note::new(3, 2)).unwrap();
    finish_track(&mut track).unwrap();

    let row = layout_voice_row(&track, voice, 0.0, 0.0, &no_padding()).unwrap();
    assert!((row.width() - 14.0 * 0.7).abs() < 1e-9);
}

#[test]
fn rendering_requires_a_finished_track() {
    let track = riff();
    assert_eq!(
        layout_track(&track, &LayoutSettings::default()),
        Err(TabError::TrackNotFinished("Lead".into()))
    );
}

#[test]
fn edits_after_finishing_require_finishing_again() {
    let mut track = riff();
    finish_track(&mut track).unwrap();
    let held = *track.note_ids_in_order().last().unwrap();

    track
        .update_note(held, |n| {
            n.is_tie_destination = true;
            n.fret = tablib::FRET_UNSET;
        })
        .unwrap();
    assert_eq!(
        layout_track(&track, &LayoutSettings::default()),
        Err(TabError::TrackNotFinished("Lead".into()))
    );

    finish_track(&mut track).unwrap();
    assert_eq!(track.note(held).unwrap().fret, 15);
    assert!(layout_track(&track, &LayoutSettings::default()).is_ok());
}

#[test]
fn glyph_tree_json_carries_coordinates() {
    let mut track = riff();
    finish_track(&mut track).unwrap();
    let rows = layout_track(&track, &LayoutSettings::default()).unwrap();

    let json = glyph_tree_to_json(&rows[0]).unwrap();
    assert!(json.contains("\"kind\": \"tab_beat\""));
    assert!(json.contains("\"kind\": \"digit\""));
    assert!(json.contains("\"width\": 50.0"));
}

#[test]
fn score_survives_json_round_trip_unfinished() {
    let mut score = Score {
        title: Some("Riff".into()),
        artist: Some("Anonymous".into()),
        tracks: vec![riff()],
    };
    let json = score_to_json(&score).unwrap();
    let mut restored = score_from_json(&json).unwrap();
    assert!(!restored.tracks[0].is_finished());

    let expected = finish_and_layout(&mut score, &LayoutSettings::default()).unwrap();
    let actual = finish_and_layout(&mut restored, &LayoutSettings::default()).unwrap();
    assert_eq!(actual, expected);
}
