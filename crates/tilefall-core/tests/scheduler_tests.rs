use pretty_assertions::assert_eq;
use tilefall_core::TileScheduler;
use tilefall_domain_eval::FallGeometry;
use tilefall_domain_score::import_score_json;
use tilefall_ports::types::Playfield;

// fall duration is 500ms: (800 - 300) / 1.0
fn geometry() -> FallGeometry {
    FallGeometry {
        playfield: Playfield::new(400.0, 800.0),
        lanes: 4,
        tile_height: 100.0,
        hit_zone_height: 300.0,
        fall_speed: 1.0,
        loss_tolerance: 0.2,
    }
}

fn scheduler(json: &str) -> TileScheduler {
    let mut scheduler = TileScheduler::new();
    scheduler.set_score(import_score_json(json).expect("valid score"));
    scheduler
}

#[test]
fn note_is_admitted_once_fall_start_arrives() {
    let g = geometry();
    let mut scheduler = scheduler(r#"[[1000, 2, 200, "E4"]]"#);

    assert!(scheduler.schedule_due(499.9, &g).is_empty());
    assert_eq!(scheduler.cursor(), 0);

    let tiles = scheduler.schedule_due(500.0, &g);
    assert_eq!(tiles.len(), 1);
    assert_eq!(tiles[0].lane, 2);
    assert_eq!(tiles[0].y, -100.0);
    assert_eq!(tiles[0].target_ms, 1000.0);
    assert!(scheduler.is_exhausted());
}

#[test]
fn late_admission_spawns_partway_down() {
    let g = geometry();
    let mut scheduler = scheduler(r#"[[1000, 0, 200, "C4"]]"#);

    let tiles = scheduler.schedule_due(700.0, &g);
    assert_eq!(tiles[0].y, 100.0);
    assert_eq!(tiles[0].arrival_ms(&g), 1000.0);
}

#[test]
fn admits_every_due_note_in_one_call() {
    let g = geometry();
    let mut scheduler = scheduler(
        r#"[[500, 0, 100, "C4"], [500, 1, 100, "E4"], [600, 2, 100, "G4"], [2000, 3, 100, "C5"]]"#,
    );

    let tiles = scheduler.schedule_due(100.0, &g);
    let ids: Vec<_> = tiles.iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
    assert_eq!(scheduler.cursor(), 3);
}

// Pacing quirk kept on purpose: an end marker ends the call even when later notes are due.
#[test]
fn end_marker_defers_following_notes_to_next_call() {
    let g = geometry();
    let mut scheduler = scheduler(r#"[[100, 0, 100, "C4"], [100, 999, 0, ""], [100, 1, 100, "D4"]]"#);

    let first = scheduler.schedule_due(1000.0, &g);
    assert_eq!(first.len(), 1);
    assert_eq!(scheduler.cursor(), 2);

    let second = scheduler.schedule_due(1000.0, &g);
    assert_eq!(second.len(), 1);
    assert_eq!(second[0].lane, 1);
    assert!(scheduler.is_exhausted());
}

#[test]
fn end_marker_waits_for_its_own_fall_start() {
    let g = geometry();
    let mut scheduler = scheduler(r#"[[999, 999, 0, ""]]"#);

    assert!(scheduler.schedule_due(0.0, &g).is_empty());
    assert_eq!(scheduler.cursor(), 0);

    assert!(scheduler.schedule_due(499.0, &g).is_empty());
    assert!(scheduler.is_exhausted());
}

#[test]
fn reset_rewinds_cursor_and_ids() {
    let g = geometry();
    let mut scheduler = scheduler(r#"[[100, 0, 100, "C4"]]"#);
    scheduler.schedule_due(1000.0, &g);
    assert!(scheduler.is_exhausted());

    scheduler.reset();
    assert_eq!(scheduler.cursor(), 0);
    let tiles = scheduler.schedule_due(1000.0, &g);
    assert_eq!(tiles[0].id, 1);
}
