mod display;

use std::collections::HashMap;
use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, KeyboardEnhancementFlags, MouseEvent, MouseEventKind,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use rand::rngs::StdRng;
use rand::{thread_rng, Rng, SeedableRng};

use turret_arena::autopilot::TurretAutopilot;
use turret_arena::config::{load_config_from_path, ArenaConfig};
use turret_arena::entities::Entity;
use turret_arena::game::Game;
use turret_arena::input::InputState;

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames. Covers terminals that don't emit key-release events.
const HOLD_WINDOW: u64 = 8;

/// Pointer travel per frame while an arrow key is held, in surface pixels.
const ARROW_STEP: f32 = 6.0;

#[derive(Parser, Debug)]
#[command(name = "turret-arena")]
#[command(about = "Dodge the fire of four turret rows in the terminal")]
struct Args {
    /// JSON file overriding the built-in arena tables
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Let a random operator drive the turrets
    #[arg(short, long)]
    autopilot: bool,

    /// Seed for the autopilot
    #[arg(long)]
    seed: Option<u64>,

    /// Target ticks per second
    #[arg(long, default_value = "60")]
    fps: u32,

    /// Write log output here instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,
}

/// Returns true if `key` was seen within the last `HOLD_WINDOW` frames.
fn is_held(key_frame: &HashMap<KeyCode, u64>, key: &KeyCode, frame: u64) -> bool {
    key_frame
        .get(key)
        .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
        .unwrap_or(false)
}

fn any_held(key_frame: &HashMap<KeyCode, u64>, chars: &[char], frame: u64) -> bool {
    chars
        .iter()
        .any(|c| is_held(key_frame, &KeyCode::Char(*c), frame))
}

fn init_logging(log_file: Option<&PathBuf>) -> std::io::Result<()> {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if let Some(path) = log_file {
        let file = File::create(path)?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.init();
    Ok(())
}

// ── Input ─────────────────────────────────────────────────────────────────────

/// Keyboard and mouse state accumulated across frames.
struct Controls {
    key_frame: HashMap<KeyCode, u64>,
    pointer: (f32, f32),
}

impl Controls {
    fn snapshot(&mut self, frame: u64) -> InputState {
        let held = |c: &[char]| any_held(&self.key_frame, c, frame);
        let input_without_pointer = InputState {
            top_buttons: [held(&['a', 'A']), held(&['s', 'S']), held(&['d', 'D'])],
            bottom_buttons: [held(&['j', 'J']), held(&['k', 'K']), held(&['l', 'L'])],
            top_toggle: held(&['w', 'W']),
            bottom_toggle: held(&['i', 'I']),
            fire: held(&[' ']),
            pointer: None,
        };

        let (mut px, mut py) = self.pointer;
        if is_held(&self.key_frame, &KeyCode::Left, frame) {
            px -= ARROW_STEP;
        }
        if is_held(&self.key_frame, &KeyCode::Right, frame) {
            px += ARROW_STEP;
        }
        if is_held(&self.key_frame, &KeyCode::Up, frame) {
            py -= ARROW_STEP;
        }
        if is_held(&self.key_frame, &KeyCode::Down, frame) {
            py += ARROW_STEP;
        }
        self.pointer = (px, py);

        InputState {
            pointer: Some(self.pointer),
            ..input_without_pointer
        }
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

fn game_loop<W: Write>(
    out: &mut W,
    game: &mut Game,
    rx: &mpsc::Receiver<Event>,
    args: &Args,
) -> std::io::Result<()> {
    let frame_time = Duration::from_secs_f64(1.0 / f64::from(args.fps.max(1)));
    let (cols, rows) = terminal::size()?;
    let mut layers = display::terminal_layers(game, cols, rows);
    game.draw_static(&mut layers);

    let mut autopilot = args.autopilot.then(TurretAutopilot::new);
    let mut rng = StdRng::seed_from_u64(args.seed.unwrap_or_else(|| thread_rng().gen()));

    let body = game.player().body();
    let mut controls = Controls {
        key_frame: HashMap::new(),
        pointer: (body.x + body.width / 2.0, body.y + body.height / 2.0),
    };
    let mut frame: u64 = 0;

    loop {
        let frame_start = Instant::now();
        frame += 1;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(ev) = rx.try_recv() {
            match ev {
                Event::Key(KeyEvent { code, kind, modifiers, .. }) => match kind {
                    KeyEventKind::Press => {
                        match code {
                            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                                return Ok(());
                            }
                            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                                return Ok(());
                            }
                            _ => {}
                        }
                        controls.key_frame.insert(code, frame);
                    }
                    KeyEventKind::Repeat => {
                        controls.key_frame.insert(code, frame);
                    }
                    KeyEventKind::Release => {
                        controls.key_frame.remove(&code);
                    }
                },
                Event::Mouse(MouseEvent { kind, column, row, .. }) => {
                    if matches!(kind, MouseEventKind::Moved | MouseEventKind::Drag(_)) {
                        controls.pointer = display::screen_to_surface(&layers, column, row);
                    }
                }
                Event::Resize(cols, rows) => {
                    layers = display::terminal_layers(game, cols, rows);
                    game.draw_static(&mut layers);
                }
                _ => {}
            }
        }

        let mut input = controls.snapshot(frame);
        if let Some(pilot) = autopilot.as_mut() {
            input = input.merge_turrets(&pilot.next_input(&mut rng));
        }

        let report = game.tick(&input, &mut layers);
        display::render(out, game, &layers, &report)?;

        // Keep the arrow-driven pointer from drifting past where the player
        // can actually go.
        let (tx, ty) = game.player().target();
        let body = game.player().body();
        controls.pointer = (tx + body.width / 2.0, ty + body.height / 2.0);

        let elapsed = frame_start.elapsed();
        if elapsed < frame_time {
            thread::sleep(frame_time - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> std::io::Result<()> {
    let args = Args::parse();
    init_logging(args.log_file.as_ref())?;

    let config = match &args.config {
        Some(path) => load_config_from_path(path)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?,
        None => ArenaConfig::default(),
    };
    let mut game = Game::new(config);

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;
    out.execute(EnableMouseCapture)?;

    // Request key-release (and key-repeat) events from the terminal.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Blocking event reads live on their own thread so the game loop never
    // waits on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break;
            }
        }
    });

    let result = game_loop(&mut out, &mut game, &rx, &args);

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
