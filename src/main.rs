mod display;

use std::collections::HashMap;
use std::io::{stdout, BufWriter, Write};
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, KeyboardEnhancementFlags, MouseButton, MouseEvent, MouseEventKind,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    style::{self, Color, Print},
    terminal, ExecutableCommand, QueueableCommand,
};
use env_logger::{Builder, Env};
use rand::rngs::StdRng;

use sky_shooter::compute::{session_rng, Game};
use sky_shooter::config::GameConfig;
use sky_shooter::entities::Entity;
use sky_shooter::feedback::{Feedback, Vibration};

use display::Viewport;

const CONFIG_ENV: &str = "SKY_SHOOTER_CONFIG";

/// World units the plane moves per frame while an arrow key is held.
const KEY_MOVE_STEP: f32 = 6.0;

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames. Covers terminals that don't emit key-release events.
const HOLD_WINDOW: u64 = 8;

fn is_held(key_frame: &HashMap<KeyCode, u64>, key: &KeyCode, frame: u64) -> bool {
    key_frame
        .get(key)
        .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
        .unwrap_or(false)
}

// ── Feedback ──────────────────────────────────────────────────────────────────

/// Rings the terminal bell once per frame in which something exploded.
#[derive(Default)]
struct TerminalFeedback {
    bell: bool,
}

impl Feedback for TerminalFeedback {
    fn play_shoot(&mut self) {
        log::trace!("shot fired");
    }

    fn play_explosion(&mut self) {
        self.bell = true;
    }

    fn vibrate(&mut self, strength: Vibration) {
        log::trace!("vibrate {strength:?}");
    }
}

type TerminalGame = Game<StdRng, TerminalFeedback>;

// ── Config ────────────────────────────────────────────────────────────────────

fn config_path() -> Option<PathBuf> {
    std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from))
}

fn load_config() -> Result<GameConfig> {
    match config_path() {
        Some(path) => GameConfig::load(&path)
            .with_context(|| format!("loading config from {}", path.display())),
        None => Ok(GameConfig::default()),
    }
}

// ── Title screen ──────────────────────────────────────────────────────────────

#[derive(Debug, PartialEq, Eq)]
enum MenuResult {
    Start,
    Quit,
}

fn show_menu<W: Write>(out: &mut W, rx: &mpsc::Receiver<Event>) -> std::io::Result<MenuResult> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let (width, height) = terminal::size()?;
    let cx = width / 2;
    let cy = height / 2;

    let lines: &[(&str, Color)] = &[
        ("★  SKY  SHOOTER  ★", Color::Cyan),
        ("", Color::White),
        ("Your plane fires on its own; the spread", Color::DarkGrey),
        ("widens as your score climbs.", Color::DarkGrey),
        ("", Color::White),
        ("Drag with the mouse or use the arrow keys.", Color::DarkGrey),
        ("", Color::White),
        ("ENTER : Start   Q : Quit", Color::White),
    ];
    let top = cy.saturating_sub(lines.len() as u16 / 2);
    for (i, (text, color)) in lines.iter().enumerate() {
        out.queue(cursor::MoveTo(
            cx.saturating_sub(text.chars().count() as u16 / 2),
            top + i as u16,
        ))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(*text))?;
    }

    out.queue(style::ResetColor)?;
    out.flush()?;

    Ok(menu_choice(rx))
}

/// Block until the player picks an entry on the title screen.
fn menu_choice(rx: &mpsc::Receiver<Event>) -> MenuResult {
    while let Ok(ev) = rx.recv() {
        let Event::Key(KeyEvent { code, kind, .. }) = ev else {
            continue;
        };
        if kind == KeyEventKind::Release {
            continue;
        }
        match code {
            KeyCode::Enter | KeyCode::Char(' ') => return MenuResult::Start,
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return MenuResult::Quit,
            _ => {}
        }
    }
    // The input thread hung up; nothing will ever start a game.
    log::warn!("input channel closed, leaving the title screen");
    MenuResult::Quit
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Nudge the plane by simulating a short pointer drag from its centre.
fn drag_player(game: &mut TerminalGame, dx: f32, dy: f32) {
    let (cx, cy) = game.player.bounds().center();
    game.pointer_down(cx, cy);
    game.pointer_move(cx + dx, cy + dy);
    game.pointer_up();
}

/// Returns `true` to quit the program, `false` to go back to the title.
fn game_loop<W: Write>(
    out: &mut W,
    game: &mut TerminalGame,
    rx: &mpsc::Receiver<Event>,
    frame_time: Duration,
) -> std::io::Result<bool> {
    let (cols, rows) = terminal::size()?;
    let mut view = Viewport::new(cols, rows, game.bus.playfield());
    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut frame: u64 = 0;

    loop {
        let frame_start = Instant::now();
        frame += 1;

        while let Ok(ev) = rx.try_recv() {
            match ev {
                Event::Key(KeyEvent {
                    code,
                    kind,
                    modifiers,
                    ..
                }) => match kind {
                    KeyEventKind::Press => {
                        key_frame.insert(code, frame);
                        match code {
                            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                                return Ok(true);
                            }
                            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                                return Ok(true);
                            }
                            KeyCode::Char('r') | KeyCode::Char('R')
                                if game.bus.is_game_over() =>
                            {
                                game.restart();
                            }
                            KeyCode::Char('m') | KeyCode::Char('M')
                                if game.bus.is_game_over() =>
                            {
                                return Ok(false);
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
                Event::Mouse(MouseEvent {
                    kind, column, row, ..
                }) => {
                    let (x, y) = view.to_world(column, row);
                    match kind {
                        MouseEventKind::Down(MouseButton::Left) => game.pointer_down(x, y),
                        MouseEventKind::Drag(MouseButton::Left) => game.pointer_move(x, y),
                        MouseEventKind::Up(MouseButton::Left) => game.pointer_up(),
                        _ => {}
                    }
                }
                Event::Resize(cols, rows) => {
                    view = Viewport::new(cols, rows, game.bus.playfield());
                }
                _ => {}
            }
        }

        let mut dx = 0.0;
        let mut dy = 0.0;
        if is_held(&key_frame, &KeyCode::Left, frame) {
            dx -= KEY_MOVE_STEP;
        }
        if is_held(&key_frame, &KeyCode::Right, frame) {
            dx += KEY_MOVE_STEP;
        }
        if is_held(&key_frame, &KeyCode::Up, frame) {
            dy -= KEY_MOVE_STEP;
        }
        if is_held(&key_frame, &KeyCode::Down, frame) {
            dy += KEY_MOVE_STEP;
        }
        if dx != 0.0 || dy != 0.0 {
            drag_player(game, dx, dy);
        }

        game.tick();

        display::render(out, &view, game)?;
        if std::mem::take(&mut game.feedback_mut().bell) {
            out.execute(Print("\x07"))?;
        }

        let elapsed = frame_start.elapsed();
        if elapsed < frame_time {
            thread::sleep(frame_time - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    Builder::from_env(Env::default().default_filter_or("warn")).init();

    let config = load_config()?;
    log::info!("starting with playfield {:?}", config.playfield);

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode().context("enabling raw mode")?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;
    out.execute(EnableMouseCapture)?;

    // Ghostty / kitty-protocol terminals report releases; others fall back.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Blocking reads live on their own thread so the game loop never waits on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break;
                }
            }
            Err(_) => break,
        }
    });

    let result = run(&mut out, &rx, &config);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(DisableMouseCapture);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result.context("terminal I/O failed")
}

fn run<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    config: &GameConfig,
) -> std::io::Result<()> {
    let frame_time = Duration::from_millis(config.frame_millis.max(1));
    let mut game = Game::new(config, session_rng(config.seed), TerminalFeedback::default());

    loop {
        match show_menu(out, rx)? {
            MenuResult::Quit => break,
            MenuResult::Start => {
                game.restart();
                let quit = game_loop(out, &mut game, rx, frame_time)?;
                log::info!("session ended with score {}", game.bus.score());
                if quit {
                    break;
                }
            }
        }
    }
    Ok(())
}
