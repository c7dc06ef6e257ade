use pretty_assertions::assert_eq;
use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};
use tilefall_infra_storage_fs::{title_from_slug, FsStorage};
use tilefall_ports::storage::{GameSettings, StorageError, StoragePort};
use tilefall_ports::types::SongSlug;

fn temp_base(name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    std::env::temp_dir().join(format!("tilefall-{name}-{nanos}"))
}

#[test]
fn missing_settings_fall_back_to_defaults() {
    let storage = FsStorage::new(temp_base("settings-default"));
    assert_eq!(storage.load_settings().unwrap(), GameSettings::default());
}

#[test]
fn settings_round_trip() {
    let base = temp_base("settings-roundtrip");
    let storage = FsStorage::new(base.clone());
    let settings = GameSettings {
        lanes: 5,
        fall_speed: 0.9,
        ..GameSettings::default()
    };

    storage.save_settings(&settings).unwrap();
    assert_eq!(storage.load_settings().unwrap(), settings);

    fs::remove_dir_all(base).ok();
}

#[test]
fn partial_settings_file_keeps_other_defaults() {
    let base = temp_base("settings-partial");
    fs::create_dir_all(&base).unwrap();
    fs::write(base.join("settings.json"), r#"{ "lanes": 6 }"#).unwrap();

    let settings = FsStorage::new(base.clone()).load_settings().unwrap();
    assert_eq!(settings.lanes, 6);
    assert_eq!(settings.tile_height, 150.0);
    assert_eq!(settings.score_increment, 10);

    fs::remove_dir_all(base).ok();
}

#[test]
fn lists_and_loads_songs_by_slug() {
    let base = temp_base("songs");
    let storage = FsStorage::new(base.clone());
    fs::create_dir_all(storage.songs_dir()).unwrap();
    fs::write(storage.songs_dir().join("ode_to_joy.json"), "[]").unwrap();
    fs::write(storage.songs_dir().join("fur_elise.json"), r#"[[500, 0, 300, "E5"]]"#).unwrap();
    fs::write(storage.songs_dir().join("notes.txt"), "ignored").unwrap();

    let songs = storage.list_songs().unwrap();
    let titles: Vec<_> = songs.iter().map(|s| s.title.as_str()).collect();
    assert_eq!(titles, vec!["Fur Elise", "Ode To Joy"]);

    let text = storage.load_song(&SongSlug("fur_elise".to_string())).unwrap();
    assert!(text.contains("E5"));

    fs::remove_dir_all(base).ok();
}

#[test]
fn unknown_or_unsafe_slug_is_not_found() {
    let storage = FsStorage::new(temp_base("songs-missing"));
    assert!(matches!(
        storage.load_song(&SongSlug("nope".to_string())),
        Err(StorageError::NotFound(_))
    ));
    assert!(matches!(
        storage.load_song(&SongSlug("../settings".to_string())),
        Err(StorageError::NotFound(_))
    ));
}

#[test]
fn titles_from_slugs() {
    assert_eq!(title_from_slug("fur_elise"), "Fur Elise");
    assert_eq!(title_from_slug("canon-in-d"), "Canon In D");
}

#[test]
fn unaddressable_song_files_are_skipped() {
    let base = temp_base("songs-unaddressable");
    let storage = FsStorage::new(&base);
    fs::create_dir_all(storage.songs_dir()).unwrap();
    fs::write(storage.songs_dir().join("my song.json"), "[]").unwrap();
    fs::write(storage.songs_dir().join("canon.json"), "[]").unwrap();

    let slugs: Vec<_> = storage
        .list_songs()
        .unwrap()
        .into_iter()
        .map(|song| song.slug.0)
        .collect();
    assert_eq!(slugs, vec!["canon".to_string()]);

    fs::remove_dir_all(base).ok();
}

#[test]
fn save_leaves_no_temp_file_behind() {
    let base = temp_base("settings-atomic");
    let storage = FsStorage::new(&base);
    storage.save_settings(&GameSettings::default()).unwrap();

    let names: Vec<_> = fs::read_dir(&base)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().into_string().unwrap())
        .collect();
    assert_eq!(names, vec!["settings.json".to_string()]);

    fs::remove_dir_all(base).ok();
}
