mod autopilot;
mod display;

use std::collections::HashMap;
use std::error::Error;
use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::PathBuf;
use std::sync::{mpsc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, KeyboardEnhancementFlags, MouseButton, MouseEvent, MouseEventKind,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use tracing_subscriber::EnvFilter;

use paintball_tactics::entities::{PlayerInput, RunState, TickOutcome};
use paintball_tactics::{SimConfig, Simulation};

use crate::autopilot::Autopilot;

const FRAME: Duration = Duration::from_millis(33); // ≈30 FPS

/// Longest real-time step fed to the simulation; a stalled frame is
/// slowed down rather than skipped over.
const MAX_DT: f64 = 0.1;

/// Fixed step for headless runs.
const HEADLESS_DT: f64 = 1.0 / 60.0;

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames.  Covers terminals that don't emit key-release events:
/// the OS key-repeat rate is ≥ 15 Hz, so a window of 4 frames (≈133 ms) is
/// always refreshed before expiry.
const HOLD_WINDOW: u64 = 4;

#[derive(Parser, Debug)]
#[command(name = "paintball_tactics", about = "Top-down tactical shooter")]
struct Args {
    /// TOML file overriding simulation constants.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Level to start on (1-based).
    #[arg(long, default_value_t = 1)]
    level: usize,

    /// Run without a terminal UI, driven by the autopilot.
    #[arg(long)]
    headless: bool,

    /// Tick limit for headless runs.
    #[arg(long, default_value_t = 36_000)]
    ticks: u64,

    /// Autopilot RNG seed.
    #[arg(long, default_value_t = 7)]
    seed: u64,

    /// Write logs here in terminal mode.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("paintball_tactics=info"))
}

fn init_logging(args: &Args) -> std::io::Result<()> {
    if args.headless {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter())
            .with_writer(std::io::stderr)
            .init();
    } else if let Some(path) = &args.log_file {
        // Terminal mode owns stdout/stderr; logs only go to a file.
        let file = File::create(path)?;
        tracing_subscriber::fmt()
            .with_env_filter(env_filter())
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .init();
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    init_logging(&args)?;

    let config = match &args.config {
        Some(path) => SimConfig::load(path)?,
        None => SimConfig::default(),
    };
    let mut sim = Simulation::initialize(config, args.level)?;

    if args.headless {
        run_headless(&mut sim, &args);
        return Ok(());
    }
    run_terminal(&mut sim)?;
    Ok(())
}

// ── Headless ──────────────────────────────────────────────────────────────────

fn run_headless(sim: &mut Simulation, args: &Args) {
    let mut pilot = Autopilot::new(args.seed);
    let mut outcome = TickOutcome::Continue;

    for _ in 0..args.ticks {
        let input = pilot.next_input(sim.state());
        outcome = sim.tick(&input, HEADLESS_DT);
        if matches!(outcome, TickOutcome::Victory | TickOutcome::Defeat) {
            break;
        }
    }

    let snap = sim.snapshot();
    tracing::info!(
        ?outcome,
        ticks = sim.state().tick_count,
        level = snap.current_level,
        health = snap.player.health,
        enemies_left = snap.enemies.iter().filter(|e| e.active).count(),
        "headless run finished"
    );
}

// ── Terminal ──────────────────────────────────────────────────────────────────

/// Returns true if `key` was seen within the last `HOLD_WINDOW` frames.
fn is_held(key_frame: &HashMap<KeyCode, u64>, key: &KeyCode, frame: u64) -> bool {
    key_frame
        .get(key)
        .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
        .unwrap_or(false)
}

fn any_held(key_frame: &HashMap<KeyCode, u64>, keys: &[KeyCode], frame: u64) -> bool {
    keys.iter().any(|k| is_held(key_frame, k, frame))
}

/// Held directional keys to a -1/0/1 axis; the negative key wins a tie.
fn axis(negative: bool, positive: bool) -> i8 {
    if negative {
        -1
    } else if positive {
        1
    } else {
        0
    }
}

fn run_terminal(sim: &mut Simulation) -> std::io::Result<()> {
    let mut out = BufWriter::new(stdout());

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;
    out.execute(EnableMouseCapture)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Kitty-protocol terminals support this; others fall back gracefully.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break; // receiver dropped → program exiting
            }
        }
    });

    let result = game_loop(&mut out, sim, &rx);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(DisableMouseCapture);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}

/// Input model: a `key_frame` map records the frame of the last press or
/// repeat for every key, and each frame all still-fresh keys apply at once,
/// so movement and firing combine freely.  Mouse position is the aim point;
/// a held left button fires.
fn game_loop<W: Write>(
    out: &mut W,
    sim: &mut Simulation,
    rx: &mpsc::Receiver<Event>,
) -> std::io::Result<()> {
    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut mouse_cell: (u16, u16) = (0, 0);
    let mut mouse_down = false;
    let mut frame: u64 = 0;
    let mut last_tick = Instant::now();

    loop {
        let frame_start = Instant::now();
        frame += 1;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(ev) = rx.try_recv() {
            match ev {
                Event::Key(KeyEvent { code, kind, modifiers, .. }) => match kind {
                    KeyEventKind::Press => {
                        key_frame.insert(code, frame);
                        match code {
                            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                                return Ok(());
                            }
                            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                                return Ok(());
                            }
                            KeyCode::Char('r') | KeyCode::Char('R')
                                if sim.state().run_state != RunState::Running =>
                            {
                                sim.restart();
                            }
                            _ => {}
                        }
                    }
                    KeyEventKind::Repeat => {
                        key_frame.insert(code, frame);
                    }
                    KeyEventKind::Release => {
                        key_frame.remove(&code);
                    }
                },
                Event::Mouse(MouseEvent { kind, column, row, .. }) => {
                    mouse_cell = (column, row);
                    match kind {
                        MouseEventKind::Down(MouseButton::Left) => mouse_down = true,
                        MouseEventKind::Up(MouseButton::Left) => mouse_down = false,
                        _ => {}
                    }
                }
                _ => {}
            }
        }

        let left = any_held(&key_frame, &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')], frame);
        let right = any_held(&key_frame, &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')], frame);
        let up = any_held(&key_frame, &[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')], frame);
        let down = any_held(&key_frame, &[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')], frame);
        let space = is_held(&key_frame, &KeyCode::Char(' '), frame);

        let tile = sim.state().config.tile_size;
        let input = PlayerInput {
            move_x: axis(left, right),
            move_y: axis(up, down),
            aim_point: display::screen_to_world(mouse_cell.0, mouse_cell.1, tile),
            firing: mouse_down || space,
        };

        let dt = last_tick.elapsed().as_secs_f64().min(MAX_DT);
        last_tick = Instant::now();
        sim.tick(&input, dt);

        let term = terminal::size()?;
        display::render(out, sim.state().grid(), &sim.snapshot(), term)?;

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            std::thread::sleep(FRAME - elapsed);
        }
    }
}
