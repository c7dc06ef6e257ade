use pretty_assertions::assert_eq;
use tilefall_domain_score::{
    import_records, import_score_json, NoteRecord, Pitch, ScoreEntry, ScoreError,
};

#[test]
fn imports_notes_and_end_marker() {
    let score = import_score_json(r#"[[500, 0, 300, "C4"], [750, 2, 150, "D#4"], [999, 999, 0, ""]]"#)
        .expect("import should succeed");

    assert_eq!(score.len(), 3);
    let notes: Vec<_> = score.notes().collect();
    assert_eq!(notes.len(), 2);
    assert_eq!(notes[0].time_ms, 500.0);
    assert_eq!(notes[0].lane, 0);
    assert_eq!(notes[0].duration_ms, 300.0);
    assert_eq!(notes[0].pitch.midi(), 60);
    assert_eq!(notes[1].pitch.label(), "D#4");
    assert_eq!(score.get(2), Some(&ScoreEntry::End { time_ms: 999.0 }));
}

#[test]
fn chords_share_a_time() {
    let score = import_score_json(r#"[[100, 0, 100, "C4"], [100, 3, 100, "E4"]]"#)
        .expect("simultaneous notes are allowed");
    assert_eq!(score.notes().count(), 2);
}

#[test]
fn end_marker_ignores_pitch_and_duration() {
    let score = import_records(&[NoteRecord(0.0, 999, -5.0, "not a pitch".to_string())])
        .expect("sentinel fields are don't-care");
    assert!(score.entries()[0].is_end());
}

#[test]
fn rejects_unparseable_pitch() {
    let err = import_score_json(r#"[[100, 0, 100, "C4"], [200, 1, 100, "X9"]]"#).unwrap_err();
    assert!(matches!(err, ScoreError::InvalidPitch { index: 1, .. }));
}

#[test]
fn rejects_negative_duration() {
    let err = import_score_json(r#"[[100, 0, -1, "C4"]]"#).unwrap_err();
    assert!(matches!(err, ScoreError::InvalidDuration { index: 0, .. }));
}

#[test]
fn rejects_time_going_backwards() {
    let err = import_score_json(r#"[[500, 0, 100, "C4"], [400, 1, 100, "D4"]]"#).unwrap_err();
    assert!(matches!(
        err,
        ScoreError::NonMonotonicTime {
            index: 1,
            previous_ms,
            time_ms,
        } if previous_ms == 500.0 && time_ms == 400.0
    ));
}

#[test]
fn rejects_negative_lane() {
    let err = import_score_json(r#"[[500, -1, 100, "C4"]]"#).unwrap_err();
    assert!(matches!(err, ScoreError::InvalidLane { index: 0, lane: -1 }));
}

#[test]
fn rejects_malformed_rows() {
    let err = import_score_json(r#"[[500, 0, 100]]"#).unwrap_err();
    assert!(matches!(err, ScoreError::Parse(_)));
}

#[test]
fn check_lanes_uses_session_lane_count() {
    let score = import_score_json(r#"[[100, 0, 100, "C4"], [200, 4, 100, "D4"], [300, 999, 0, ""]]"#)
        .expect("lane range is checked separately");

    assert!(score.check_lanes(5).is_ok());
    let err = score.check_lanes(4).unwrap_err();
    assert!(matches!(
        err,
        ScoreError::LaneOutOfRange {
            index: 1,
            lane: 4,
            lanes: 4
        }
    ));
}

#[test]
fn records_round_trip_through_score() {
    let records = vec![
        NoteRecord(500.0, 0, 300.0, "C4".to_string()),
        NoteRecord(999.0, 999, 0.0, String::new()),
    ];
    let score = import_records(&records).expect("import should succeed");
    assert_eq!(score.to_records(), records);
    assert_eq!(score.notes().next().map(|n| n.pitch.clone()), Pitch::parse("C4").ok());
}

#[test]
fn bundled_demo_song_imports() {
    let score = import_score_json(include_str!("../../../demos/songs/ode_to_joy.json")).unwrap();
    assert_eq!(score.notes().count(), 15);
    assert!(score.entries().last().unwrap().is_end());
    score.check_lanes(4).unwrap();
}
