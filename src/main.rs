mod display;

use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::PathBuf;
use std::sync::mpsc::{self, TryRecvError};
use std::thread;
use std::time::Instant;

use crossterm::{
    cursor,
    event::{
        self, DisableFocusChange, EnableFocusChange, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
        PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use log::{error, info, warn};

use duel_shooter::compute::init_state;
use duel_shooter::config::{DisplayConfig, GameConfig};
use duel_shooter::entities::{Controls, GameState};
use duel_shooter::error::GameError;
use duel_shooter::input::KeyTracker;
use duel_shooter::session::{FrameOutcome, Match};

// ── Logging ───────────────────────────────────────────────────────────────────

/// `RUST_LOG` controls the filter (default `warn`).  Records go to
/// `log_file` when configured since stderr shares the raw-mode terminal.
fn init_logging(config: &GameConfig) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if let Some(path) = &config.log_file {
        match File::create(path) {
            Ok(file) => {
                builder.target(env_logger::Target::Pipe(Box::new(file)));
            }
            Err(e) => eprintln!("could not open log file {}: {e}", path.display()),
        }
    }
    builder.init();
}

// ── Input helpers ─────────────────────────────────────────────────────────────

/// Esc and Ctrl-C always quit.  Q quits once the match is over, or at any
/// time if no player has it bound.
fn is_quit(key: &KeyEvent, state: &GameState) -> bool {
    if key.kind != KeyEventKind::Press {
        return false;
    }
    match key.code {
        KeyCode::Esc => true,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => true,
        KeyCode::Char('q') | KeyCode::Char('Q') => state.is_over() || !state.binds(&key.code),
        _ => false,
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Step the match once per frame until it ends or the user quits.
///
/// Each frame drains all pending terminal events, takes one input snapshot,
/// steps the simulation against the match clock, then renders.  Nothing
/// else touches the state, so the snapshot is consistent for the whole step.
fn game_loop<W: Write>(
    out: &mut W,
    game: &mut Match,
    rx: &mpsc::Receiver<Event>,
    view: &DisplayConfig,
) -> std::io::Result<()> {
    let frame_time = view.frame();
    let mut keys = KeyTracker::new(frame_time);
    let started = Instant::now();
    let mut frame: u64 = 0;

    loop {
        let frame_start = Instant::now();
        frame += 1;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        loop {
            let ev = match rx.try_recv() {
                Ok(ev) => ev,
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    warn!("input thread gone during frame {frame}, leaving");
                    return Ok(());
                }
            };
            match ev {
                Event::Key(key) => {
                    if is_quit(&key, game.state()) {
                        info!("quit during frame {frame}");
                        return Ok(());
                    }
                    keys.handle(&key, frame);
                }
                Event::Resize(cols, rows) => {
                    let (w, h) = view.playfield_size(cols, rows);
                    game.resize(w, h);
                }
                Event::FocusLost => keys.clear(),
                _ => {}
            }
        }

        let input = keys.snapshot(frame);
        let outcome = game.step(&input, started.elapsed());
        display::render(out, game.state(), view)?;

        if let FrameOutcome::Ended(_) = outcome {
            return wait_for_quit(out, game, rx, view);
        }

        let elapsed = frame_start.elapsed();
        if elapsed < frame_time {
            thread::sleep(frame_time - elapsed);
        }
    }
}

/// The match is over: no more steps, just keep the banner up until the
/// user leaves.
fn wait_for_quit<W: Write>(
    out: &mut W,
    game: &mut Match,
    rx: &mpsc::Receiver<Event>,
    view: &DisplayConfig,
) -> std::io::Result<()> {
    while let Ok(ev) = rx.recv() {
        match ev {
            Event::Key(key) if is_quit(&key, game.state()) => return Ok(()),
            Event::Resize(cols, rows) => {
                let (w, h) = view.playfield_size(cols, rows);
                game.resize(w, h);
                display::render(out, game.state(), view)?;
            }
            _ => {}
        }
    }
    Ok(())
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<(), GameError> {
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = GameConfig::load(config_path.as_deref())?;
    init_logging(&config);
    let controls = config.controls.resolve()?;

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;
    let focus_events = out.execute(EnableFocusChange).is_ok();

    // Request key-release (and key-repeat) events from the terminal.
    // Kitty-protocol terminals support this; others fall back to the hold window.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();
    if !keyboard_enhanced {
        warn!("terminal does not report key releases; using hold window");
    }

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break; // receiver dropped → program exiting
                }
            }
            Err(e) => {
                error!("terminal event read failed: {e}");
                break;
            }
        }
    });

    let result = run(&mut out, &rx, &config, controls);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    if focus_events {
        let _ = out.execute(DisableFocusChange);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result.map_err(GameError::from)
}

fn run<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    config: &GameConfig,
    controls: (Controls, Controls),
) -> std::io::Result<()> {
    let (cols, rows) = terminal::size()?;
    let (width, height) = config.display.playfield_size(cols, rows);
    info!("starting match on a {width}x{height} playfield ({cols}x{rows} cells)");

    let mut game = Match::new(init_state(config.rules, controls, width, height));
    game_loop(out, &mut game, rx, &config.display)?;

    if let Some(winner) = game.winner() {
        info!("final result: {} wins", winner.label());
    }
    Ok(())
}
