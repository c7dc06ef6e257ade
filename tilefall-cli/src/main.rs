mod autoplay;
mod host;

use anyhow::{bail, Context};
use autoplay::Autoplay;
use clap::{Parser, Subcommand};
use host::{FixedStepTimer, LogRenderer, WallClockTimer};
use log::{debug, info, warn, LevelFilter};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tilefall_core::{
    Event, FrameControl, FrameDriver, GameConfig, RoundSession, RoundState, RoundSummary,
    SharedSession,
};
use tilefall_domain_score::{import_score_json, import_score_path, Score};
use tilefall_infra_storage_fs::FsStorage;
use tilefall_infra_synth_simple::SimpleSynth;
use tilefall_ports::cue::CuePort;
use tilefall_ports::storage::{GameSettings, StoragePort};
use tilefall_ports::timer::FrameTimer;
use tilefall_ports::types::{Playfield, SongSlug};

const SAMPLE_RATE_HZ: u32 = 44_100;
const MAX_VOICES: usize = 32;

#[derive(Parser)]
#[command(name = "tilefall", about = "Headless host for the falling-tile timing engine")]
struct Cli {
    /// Data directory holding settings.json and songs/ (defaults to the user config dir).
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Play one round of a song file or library slug.
    Play {
        song: String,
        #[arg(long, default_value_t = 60.0)]
        fps: f64,
        /// Tap every tile as it enters the hit zone.
        #[arg(long)]
        autoplay: bool,
        /// Pace frames by the wall clock instead of stepping as fast as possible.
        #[arg(long)]
        realtime: bool,
        #[arg(long, default_value_t = 400.0)]
        width: f64,
        #[arg(long, default_value_t = 800.0)]
        height: f64,
        /// Settings JSON overriding the stored settings.
        #[arg(long)]
        settings: Option<PathBuf>,
        /// Print the round summary as JSON.
        #[arg(long)]
        json: bool,
    },
    /// List songs in the library.
    Songs,
    /// Validate a song against the current lane count.
    Check {
        song: String,
        #[arg(long)]
        settings: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::new()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();

    let cli = Cli::parse();
    let storage = match cli.data_dir {
        Some(dir) => FsStorage::new(dir),
        None => FsStorage::default(),
    };

    match cli.command {
        Cmd::Play {
            song,
            fps,
            autoplay,
            realtime,
            width,
            height,
            settings,
            json,
        } => {
            if !(fps.is_finite() && fps > 0.0) {
                bail!("fps must be positive, got {fps}");
            }
            let settings = load_settings(&storage, settings.as_deref())?;
            let score = load_song(&storage, &song)?;
            let summary = play(
                score,
                &settings,
                Playfield::new(width, height),
                fps,
                autoplay,
                realtime,
            )?;
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!(
                    "{:?}: score {} ({} hits) at {:.0} ms",
                    summary.outcome, summary.score, summary.hits, summary.song_time_ms
                );
            }
        }
        Cmd::Songs => {
            let songs = storage.list_songs()?;
            if songs.is_empty() {
                info!("no songs in {}", storage.songs_dir().display());
            }
            for song in songs {
                println!("{}\t{}", song.slug, song.title);
            }
        }
        Cmd::Check { song, settings } => {
            let settings = load_settings(&storage, settings.as_deref())?;
            let score = load_song(&storage, &song)?;
            score.check_lanes(settings.lanes)?;
            let last_ms = score.entries().last().map_or(0.0, |e| e.time_ms());
            println!(
                "{}: {} notes, {} entries, ends at {:.0} ms",
                score.title.as_deref().unwrap_or(&song),
                score.notes().count(),
                score.len(),
                last_ms
            );
        }
    }
    Ok(())
}

fn load_settings(storage: &FsStorage, path: Option<&Path>) -> anyhow::Result<GameSettings> {
    match path {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading settings {}", path.display()))?;
            serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
        }
        None => Ok(storage.load_settings()?),
    }
}

/// A path that exists is read directly; anything else is looked up as a library slug.
fn load_song(storage: &FsStorage, song: &str) -> anyhow::Result<Score> {
    let path = Path::new(song);
    if path.is_file() {
        let score = import_score_path(path)?;
        let title = path.file_stem().map(|s| s.to_string_lossy().into_owned());
        return Ok(match title {
            Some(title) => score.with_title(title),
            None => score,
        });
    }

    let slug = SongSlug(song.to_string());
    let text = storage.load_song(&slug)?;
    let score = import_score_json(&text).with_context(|| format!("song {slug}"))?;
    Ok(score.with_title(tilefall_infra_storage_fs::title_from_slug(song)))
}

fn play(
    score: Score,
    settings: &GameSettings,
    playfield: Playfield,
    fps: f64,
    autoplay: bool,
    realtime: bool,
) -> anyhow::Result<RoundSummary> {
    let config = GameConfig::from_settings(settings, playfield)?;

    let synth = Arc::new(SimpleSynth::new(SAMPLE_RATE_HZ, MAX_VOICES));
    synth.set_volume(settings.cue_volume);
    let cue: Arc<dyn CuePort> = synth.clone();

    let title = score.title.clone().unwrap_or_else(|| "untitled".to_string());
    info!(
        "playing {title}: {} notes, {} lanes, fall {:.0} ms",
        score.notes().count(),
        config.geometry.lanes,
        config.geometry.fall_duration_ms()
    );

    let mut session = RoundSession::new(config, Some(cue));
    session.load_score(score)?;
    session.start()?;
    log_events(session.drain_events());

    let renderer = LogRenderer::new(synth, SAMPLE_RATE_HZ);
    let (summary, renderer) = if realtime {
        play_realtime(session, renderer, fps, autoplay)?
    } else {
        play_stepped(session, renderer, fps, autoplay)?
    };

    info!(
        "{} frames rendered, cue peak {:.3}",
        renderer.frames(),
        renderer.peak()
    );
    Ok(summary)
}

fn play_stepped(
    mut session: RoundSession,
    mut renderer: LogRenderer,
    fps: f64,
    autoplay: bool,
) -> anyhow::Result<(RoundSummary, LogRenderer)> {
    let mut timer = FixedStepTimer::new(fps);
    let mut driver = FrameDriver::new();

    if autoplay {
        let mut player = Autoplay::new();
        driver.latch(timer.now());
        loop {
            let timestamp = timer.next_frame()?;
            let control = driver.frame(timestamp, &mut session, &mut renderer);
            log_events(session.drain_events());
            if control == FrameControl::Stop {
                break;
            }
            let points = player.points(&session);
            if !points.is_empty() {
                session.handle_input(&points);
                log_events(session.drain_events());
            }
        }
        debug!("autoplay tapped {} times", player.taps());
    } else {
        driver.run(&mut timer, &mut session, &mut renderer)?;
        log_events(session.drain_events());
    }

    let summary = session
        .summary()
        .context("round ended without a summary")?;
    Ok((summary, renderer))
}

/// Frames run on their own thread while pointer input arrives from this one.
fn play_realtime(
    session: RoundSession,
    mut renderer: LogRenderer,
    fps: f64,
    autoplay: bool,
) -> anyhow::Result<(RoundSummary, LogRenderer)> {
    let shared = SharedSession::new(session);

    let frames = {
        let shared = shared.clone();
        thread::spawn(move || {
            let mut timer = WallClockTimer::new(fps);
            let mut driver = FrameDriver::new();
            driver.latch(timer.now());
            loop {
                let timestamp = timer.next_frame()?;
                if shared.frame(&mut driver, timestamp, &mut renderer) == FrameControl::Stop {
                    break;
                }
            }
            Ok::<_, tilefall_ports::timer::FrameError>(renderer)
        })
    };

    let mut player = Autoplay::new();
    let poll = Duration::from_millis(4);
    while shared.state() == RoundState::Running {
        if autoplay {
            shared.with(|session| {
                let points = player.points(session);
                if !points.is_empty() {
                    session.handle_input(&points);
                }
            });
        }
        log_events(shared.drain_events());
        thread::sleep(poll);
    }

    let renderer = match frames.join() {
        Ok(result) => result?,
        Err(_) => bail!("frame thread panicked"),
    };
    log_events(shared.drain_events());
    if autoplay {
        debug!("autoplay tapped {} times", player.taps());
    }

    let summary = shared
        .with(|session| session.summary())
        .context("round ended without a summary")?;
    Ok((summary, renderer))
}

fn log_events(events: Vec<Event>) {
    for event in events {
        match &event {
            Event::TileHit {
                lane,
                pitch,
                delta_ms,
                ..
            } => debug!("hit lane {lane} {pitch} ({delta_ms:+.1} ms)"),
            Event::RoundOver { outcome, .. } => info!("round over: {outcome:?}"),
            Event::StateChanged { state, .. } if *state == RoundState::GameOver => {
                warn!("tile missed")
            }
            _ => match serde_json::to_string(&event) {
                Ok(line) => debug!("{line}"),
                Err(err) => warn!("event not serializable: {err}"),
            },
        }
    }
}
