//! Pinboard command line: edit a saved board and hear what it generates.
//!
//! There is no audio output here: `render` prints each track's sequence and
//! `play` runs the scheduler offline, printing every step as it would fire.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use pinboard::board::{
    default_board_path, load_board, reset_board, save_board, Board, TrackSpec,
};
use pinboard::config::PinboardConfig;
use pinboard::event::{is_playable_bpm, Beat, SequenceScheduler, StepTick, TrackId};
use pinboard::generate::GeneratedSequence;
use pinboard::grid::{Grid, NodeId};
use pinboard::notes::{install_pitch_table, note_for};
use pinboard::track::{Track, TrackType};
use pinboard::{PinboardError, Result};

/// Slots printed per line when rendering a sequence.
const SLOTS_PER_LINE: usize = 16;

#[derive(Parser)]
#[command(name = "pinboard", version, about = "Turn shapes on a pin grid into music")]
struct Cli {
    /// Board file (defaults to ~/.pinboard/board.yaml).
    #[arg(long, global = true)]
    board: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List every pin with its position and pitch.
    Grid,
    /// Append an empty track.
    AddTrack {
        #[arg(long)]
        kind: TrackType,
    },
    /// Draw a stroke on a track.
    Draw {
        #[arg(long)]
        track: usize,
        from: NodeId,
        to: NodeId,
    },
    /// Erase a stroke from a track.
    Erase {
        #[arg(long)]
        track: usize,
        from: NodeId,
        to: NodeId,
    },
    /// Toggle a track's mute flag.
    Mute {
        #[arg(long)]
        track: usize,
    },
    /// Print every track's generated sequence.
    Render,
    /// Delete the saved board.
    Reset,
    /// Run the scheduler offline and print each step as it fires.
    Play {
        #[arg(long, default_value_t = 4)]
        bars: u32,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let config = PinboardConfig::load();
    install_pitch_table(config.resolve_pitch_table());
    let path = cli.board.unwrap_or_else(default_board_path);

    match cli.command {
        Command::Grid => print_grid(Grid::standard()),
        Command::AddTrack { kind } => {
            let mut board = load_board(&path)?;
            board.tracks.push(TrackSpec::from(&Track::new(kind)));
            save_board(&path, &board)?;
            println!("added {kind} track {}", board.tracks.len() - 1);
        }
        Command::Draw { track, from, to } => {
            let added = edit_track(&path, track, |t| t.draw(from, to))?;
            println!("track {track}: drew {from} -> {to} ({added} new edges)");
        }
        Command::Erase { track, from, to } => {
            let removed = edit_track(&path, track, |t| t.erase(from, to))?;
            println!("track {track}: erased {from} -> {to} ({removed} edges removed)");
        }
        Command::Mute { track } => {
            let muted = edit_track(&path, track, |t| {
                t.toggle_mute();
                Ok(t.muted)
            })?;
            println!("track {track}: {}", if muted { "muted" } else { "unmuted" });
        }
        Command::Render => {
            let board = load_board(&path)?;
            for (i, track) in board.to_tracks()?.iter().enumerate() {
                print_track(i, track);
            }
        }
        Command::Reset => {
            reset_board(&path)?;
            println!("cleared {}", path.display());
        }
        Command::Play { bars } => {
            let board = load_board(&path)?;
            play(&board, &config, bars)?;
        }
    }
    Ok(())
}

/// Load the board, apply `edit` to one track, and save it back.
fn edit_track<T>(
    path: &Path,
    index: usize,
    edit: impl FnOnce(&mut Track) -> Result<T>,
) -> Result<T> {
    let board = load_board(path)?;
    let mut tracks = board.to_tracks()?;
    let track = tracks
        .get_mut(index)
        .ok_or(PinboardError::TrackIndex(index))?;
    let out = edit(track)?;
    save_board(path, &Board::from_tracks(board.bpm, &tracks))?;
    Ok(out)
}

fn print_grid(grid: &Grid) {
    println!(
        "{} pins, {} edges, spacing {}",
        grid.nodes().len(),
        grid.edges().len(),
        grid.spacing()
    );
    for node in grid.nodes() {
        let pitch = note_for(node.id).map_or_else(|| "-".to_string(), |p| p.to_string());
        println!(
            "{:>5}  ({:7.2}, {:7.2})  {pitch}",
            node.id.to_string(),
            node.x,
            node.y
        );
    }
}

fn print_track(index: usize, track: &Track) {
    let generated = track.generate();
    println!(
        "track {index}: {}{} ({} edges, {} events)",
        track.kind,
        if track.muted { " [muted]" } else { "" },
        track.edges.len(),
        generated.event_count()
    );
    print_sequence(&generated);
}

fn print_sequence(generated: &GeneratedSequence) {
    if generated.is_empty() {
        println!("  (empty)");
        return;
    }
    let slots: Vec<String> = generated
        .sequence
        .iter()
        .map(|s| s.as_ref().map_or_else(|| ".".to_string(), |e| e.to_string()))
        .collect();
    for line in slots.chunks(SLOTS_PER_LINE) {
        println!("  {}", line.join(" "));
    }
    println!("  order: {}", generated.node_order.join(" "));
}

fn play(board: &Board, config: &PinboardConfig, bars: u32) -> Result<()> {
    let bpm = board.bpm.unwrap_or(config.bpm);
    if !is_playable_bpm(bpm) {
        return Err(PinboardError::InvalidTempo(bpm));
    }
    if config.sample_rate == 0 || config.block_size == 0 {
        log::warn!(
            "nothing to play at {} Hz with {}-frame blocks",
            config.sample_rate,
            config.block_size
        );
        return Ok(());
    }
    let mut scheduler = SequenceScheduler::new(bpm, config.sample_rate, config.block_size);
    for (i, track) in board.to_tracks()?.iter().enumerate() {
        scheduler.attach_track(TrackId(i as u32), track);
    }
    log::info!(
        "playing {} tracks for {bars} bars at {bpm} BPM",
        scheduler.track_ids().len()
    );

    let end = Beat::from_bars(bars);
    scheduler.play();
    while scheduler.transport().position() < end {
        scheduler.render_block(|tick| {
            if tick.time < end {
                print_tick(tick);
            }
        });
    }
    scheduler.stop();
    Ok(())
}

fn print_tick(tick: &StepTick) {
    let (bar, beat) = tick.time.bar_and_beat();
    let event = tick
        .event
        .as_ref()
        .map_or_else(|| ".".to_string(), |e| e.to_string());
    println!(
        "{:>3}:{:<5.2} {} step {:>2} {:>5} {event}",
        bar + 1,
        beat + 1.0,
        tick.track_id,
        tick.step,
        tick.node.as_deref().unwrap_or("")
    );
}
