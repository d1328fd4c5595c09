//! Spline Racer headless entry point
//!
//! Drives the core without a window: build tracks from points, inspect them,
//! race computer drivers on them and render previews to PNG.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use glam::{UVec2, Vec2};

use spline_racer::editor::Editor;
use spline_racer::input::{InputSnapshot, PointerButton};
use spline_racer::mode::{Mode, UiEvent};
use spline_racer::render::{DrawStyle, ImageSurface, draw_editor, draw_race};
use spline_racer::sim::{Race, RacePhase, RandomPolicy, SampleDensity, Track, sample_count};
use spline_racer::{Settings, TrackStore};

#[derive(Parser, Debug)]
#[command(name = "spline-racer", version, about = "Track builder and race simulator")]
struct Opts {
    /// Settings file (defaults are used when missing)
    #[arg(long, default_value = "settings.json", global = true)]
    settings: PathBuf,
    /// Override the track directory from the settings
    #[arg(long, global = true)]
    tracks_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List stored tracks
    List,
    /// Place control points as editor clicks and save the track
    Create {
        name: String,
        /// Control points as x,y pairs in world units
        #[arg(long = "point", value_parser = parse_point, required = true)]
        points: Vec<Vec2>,
        #[arg(long)]
        width: Option<f32>,
    },
    /// Print curve, mask and gate statistics for a track
    Inspect { name: String },
    /// Race computer drivers on a track
    Simulate {
        name: String,
        #[arg(long)]
        agents: Option<u32>,
        #[arg(long)]
        laps: Option<u32>,
        #[arg(long, default_value_t = 20_000)]
        max_ticks: u64,
        #[arg(long)]
        seed: Option<u64>,
        /// Seconds per tick (defaults to the settings' frame rate cap)
        #[arg(long)]
        dt: Option<f32>,
    },
    /// Render the editor view of a track to a PNG
    Preview {
        name: String,
        #[arg(long)]
        out: PathBuf,
        /// Output pixels per world unit
        #[arg(long, default_value_t = 0.1)]
        scale: f32,
        /// Render the race view from the spawn point instead
        #[arg(long)]
        race: bool,
    },
}

fn parse_point(s: &str) -> Result<Vec2, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected x,y but got {s:?}"))?;
    let x = x.trim().parse::<f32>().map_err(|e| e.to_string())?;
    let y = y.trim().parse::<f32>().map_err(|e| e.to_string())?;
    Ok(Vec2::new(x, y))
}

fn main() -> ExitCode {
    env_logger::init();
    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn run() -> Result<()> {
    let opts = Opts::parse();
    let mut settings = Settings::load(&opts.settings);
    if let Some(dir) = opts.tracks_dir {
        settings.tracks_dir = dir;
    }
    let store = TrackStore::new(settings.tracks_dir.clone());

    match opts.command {
        Command::List => {
            let names = store
                .list()
                .with_context(|| format!("listing {}", store.root().display()))?;
            for name in names {
                println!("{name}");
            }
        }
        Command::Create {
            name,
            points,
            width,
        } => create(&store, &settings, &name, &points, width)?,
        Command::Inspect { name } => inspect(&store, &settings, &name)?,
        Command::Simulate {
            name,
            agents,
            laps,
            max_ticks,
            seed,
            dt,
        } => {
            let agents = agents.unwrap_or(settings.agent_count).max(1);
            let laps = laps.unwrap_or(settings.total_laps);
            let seed = seed.unwrap_or(settings.agent_seed);
            let dt = dt.unwrap_or_else(|| settings.frame_interval());
            simulate(&store, &settings, &name, agents, laps, max_ticks, seed, dt)?;
        }
        Command::Preview {
            name,
            out,
            scale,
            race,
        } => preview(&store, &settings, &name, &out, scale, race)?,
    }
    Ok(())
}

fn create(
    store: &TrackStore,
    settings: &Settings,
    name: &str,
    points: &[Vec2],
    width: Option<f32>,
) -> Result<()> {
    let mut mode = Mode::default().on(UiEvent::CreateTrack);
    let mut editor = Editor::new(Track::new(), 1.0);
    if let Some(width) = width {
        editor.track.track_width = width;
    }
    for &point in points {
        editor.handle(&InputSnapshot::click(PointerButton::Left, point));
    }
    if editor.track.points.len() != points.len() {
        log::warn!(
            "{} points merged with a neighbour (closer than the pick radius)",
            points.len() - editor.track.points.len()
        );
    }

    let preview = editor.preview(&settings.track);
    store
        .save(name, &editor.track)
        .with_context(|| format!("saving track {name:?}"))?;
    mode = mode.on(UiEvent::TrackSaved);
    println!(
        "saved {} ({} points, {} curves, {} gates)",
        store.path_for(name).display(),
        editor.track.points.len(),
        preview.curves.len(),
        preview.checkpoints.len()
    );
    log::debug!("Back in {:?}", mode);
    Ok(())
}

fn inspect(store: &TrackStore, settings: &Settings, name: &str) -> Result<()> {
    let track = store.load(name)?;
    let edit_curves = track.build_curves(&SampleDensity::edit(&settings.track));
    let finalized = track.finalize(&settings.track, settings.world_size());

    println!("track       {name}");
    println!("points      {}", track.points.len());
    println!("closed      {}", track.is_closed_loop());
    println!("width       {}", track.track_width);
    println!("curves      {}", finalized.curves.len());
    println!(
        "samples     {} edit / {} collision",
        sample_count(&edit_curves),
        sample_count(&finalized.curves)
    );
    println!("gates       {}", finalized.checkpoints.len());
    println!(
        "mask        {}x{} ({} blocking)",
        finalized.mask.width(),
        finalized.mask.height(),
        finalized.mask.count()
    );
    println!(
        "spawn       ({:.1}, {:.1}) heading {:.1}",
        finalized.spawn.position.x, finalized.spawn.position.y, finalized.spawn.heading
    );
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn simulate(
    store: &TrackStore,
    settings: &Settings,
    name: &str,
    agents: u32,
    laps: u32,
    max_ticks: u64,
    seed: u64,
    dt: f32,
) -> Result<()> {
    let mut mode = Mode::default().on(UiEvent::Play);
    let track = store.load(name)?;
    let finalized = track.finalize(&settings.track, settings.world_size());
    if !finalized.is_raceable() {
        bail!("track {name:?} needs at least 4 points to race");
    }
    if !finalized.has_checkpoints() {
        log::warn!("Track {name:?} has no gates; laps will never count");
    }
    mode = mode.on(UiEvent::TrackChosen);

    let mut race = Race::new(finalized, laps, settings.track.gate_reach, settings.viewport());
    race.camera.scroll_speed = settings.camera_scroll_speed;
    for i in 0..agents {
        let vehicle = race.spawn_vehicle(settings.car.clone());
        let policy = RandomPolicy::new(seed.wrapping_add(i as u64));
        race.add_racer(format!("agent-{i}"), vehicle, Box::new(policy));
    }

    let idle = InputSnapshot::default();
    let mut collisions = vec![0u64; agents as usize];
    while race.ticks < max_ticks {
        mode = mode.poll(&idle);
        if mode != Mode::Race {
            break;
        }
        for (count, result) in collisions.iter_mut().zip(race.tick(&idle, dt)) {
            if result.movement.collided() {
                *count += 1;
            }
        }
        if let RacePhase::Finished { .. } = race.phase() {
            mode = mode.on(UiEvent::RaceFinished);
            break;
        }
    }

    println!("ticks {} ({:.1}s simulated)", race.ticks, race.elapsed);
    for (racer, hits) in race.racers().iter().zip(&collisions) {
        println!(
            "{:<10} laps {}/{} next gate {} wall ticks {}",
            racer.name, racer.laps.laps_completed, laps, racer.laps.next_checkpoint, hits
        );
    }
    match race.phase() {
        RacePhase::Finished { winner } => println!("winner {}", race.racers()[winner].name),
        RacePhase::Running => println!("no winner within {max_ticks} ticks"),
    }
    log::debug!("Ended in {:?}", mode);
    Ok(())
}

fn preview(
    store: &TrackStore,
    settings: &Settings,
    name: &str,
    out: &Path,
    scale: f32,
    race_view: bool,
) -> Result<()> {
    if scale <= 0.0 {
        bail!("scale must be positive");
    }
    let track = store.load(name)?;
    let style = DrawStyle::default();

    let image = if race_view {
        let finalized = track.finalize(&settings.track, settings.world_size());
        let viewport = settings.viewport();
        let mut race = Race::new(
            finalized,
            settings.total_laps,
            settings.track.gate_reach,
            viewport,
        );
        let vehicle = race.spawn_vehicle(settings.car.clone());
        race.add_racer("player", vehicle, Box::new(RandomPolicy::new(settings.agent_seed)));
        let size = (viewport * scale).ceil().as_uvec2().max(UVec2::ONE);
        let mut surface = ImageSurface::new(size.x, size.y, scale);
        draw_race(&mut surface, &race, &style);
        surface.into_image()
    } else {
        let editor = Editor::new(track, 1.0);
        let size = (settings.world_size().as_vec2() * scale).ceil().as_uvec2().max(UVec2::ONE);
        let mut surface = ImageSurface::new(size.x, size.y, scale);
        draw_editor(&mut surface, &editor.track, &editor.preview(&settings.track), &style);
        surface.into_image()
    };

    image
        .save(out)
        .with_context(|| format!("writing {}", out.display()))?;
    println!("wrote {} ({}x{})", out.display(), image.width(), image.height());
    Ok(())
}
