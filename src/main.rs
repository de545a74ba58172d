mod display;

use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::PathBuf;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    cursor,
    event::{self, Event as TermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal, ExecutableCommand,
};
use log::{info, LevelFilter};

use retro_shooter::scheduler::TickScheduler;
use retro_shooter::{Engine, Event, GameStatus};

use display::Palette;

/// How long the title screen waits for input before redrawing.
const IDLE_FRAME: Duration = Duration::from_millis(250);

#[derive(Parser)]
#[command(name = "retro_shooter")]
#[command(about = "A terminal arcade shooter")]
struct Args {
    /// Write logs to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log level for --log-file (RUST_LOG overrides it)
    #[arg(long, default_value = "info")]
    log_level: LevelFilter,
}

// ── Logging ───────────────────────────────────────────────────────────────────

/// The game owns the terminal, so logs only go somewhere useful when a file
/// is given or stderr is redirected with `RUST_LOG` set.
fn init_logging(args: &Args) -> Result<()> {
    let mut builder = env_logger::Builder::new();
    match &args.log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("creating log file {}", path.display()))?;
            builder
                .filter_level(args.log_level)
                .target(env_logger::Target::Pipe(Box::new(file)));
        }
        None => {
            builder.filter_level(LevelFilter::Off);
        }
    }
    builder.parse_default_env().init();
    Ok(())
}

// ── Shell state ───────────────────────────────────────────────────────────────

/// One running game: the engine plus the timers that drive it.
struct Session {
    engine: Engine,
    scheduler: TickScheduler,
    confirm_quit: bool,
}

impl Session {
    fn new(now: Instant) -> Self {
        Self {
            engine: Engine::new(),
            scheduler: TickScheduler::new(now),
            confirm_quit: false,
        }
    }

    /// Feed every tick that has come due into the engine.
    fn run_due_ticks(&mut self, now: Instant) {
        for (at, event) in self.scheduler.due(now, self.engine.status()) {
            let before = self.engine.status();
            let outcome = self.engine.advance(event);
            if outcome.status == GameStatus::LifeLost && before != GameStatus::LifeLost {
                self.scheduler.start_life_lost(at);
            }
        }
    }
}

enum Screen {
    Title,
    Game(Box<Session>),
}

/// What a key press means on the current screen.
#[derive(Debug, PartialEq)]
enum Action {
    Start,
    Engine(Event),
    AskQuit,
    CancelQuit,
    Quit,
}

fn title_action(code: KeyCode) -> Option<Action> {
    match code {
        KeyCode::Enter => Some(Action::Start),
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(Action::Quit),
        _ => None,
    }
}

fn game_action(code: KeyCode, status: GameStatus, confirm_quit: bool) -> Option<Action> {
    if confirm_quit {
        return match code {
            KeyCode::Enter => Some(Action::Quit),
            KeyCode::Esc => Some(Action::CancelQuit),
            _ => None,
        };
    }
    match status {
        GameStatus::Playing => match code {
            KeyCode::Left | KeyCode::Char('a') => Some(Action::Engine(Event::MoveLeft)),
            KeyCode::Right | KeyCode::Char('d') => Some(Action::Engine(Event::MoveRight)),
            KeyCode::Char(' ') => Some(Action::Engine(Event::Shoot)),
            KeyCode::Char('p') => Some(Action::Engine(Event::TogglePause)),
            _ => None,
        },
        GameStatus::Paused => match code {
            KeyCode::Char('p') => Some(Action::Engine(Event::TogglePause)),
            KeyCode::Char('q') => Some(Action::AskQuit),
            _ => None,
        },
        GameStatus::Won | GameStatus::Lost => match code {
            KeyCode::Enter => Some(Action::Engine(Event::Restart)),
            KeyCode::Char('q') => Some(Action::AskQuit),
            _ => None,
        },
        GameStatus::LifeLost => None,
    }
}

/// Returns `true` → quit program.
fn handle_key(screen: &mut Screen, key: KeyEvent) -> bool {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return true;
    }

    let action = match &*screen {
        Screen::Title => title_action(key.code),
        Screen::Game(session) => {
            game_action(key.code, session.engine.status(), session.confirm_quit)
        }
    };

    match (action, screen) {
        (None, _) => false,
        (Some(Action::Quit), _) => true,
        (Some(Action::Start), screen) => {
            info!("starting new game");
            *screen = Screen::Game(Box::new(Session::new(Instant::now())));
            false
        }
        (Some(Action::Engine(event)), Screen::Game(session)) => {
            session.engine.advance(event);
            if event == Event::Restart {
                session.scheduler.reset(Instant::now());
            }
            false
        }
        (Some(Action::AskQuit), Screen::Game(session)) => {
            session.confirm_quit = true;
            false
        }
        (Some(Action::CancelQuit), Screen::Game(session)) => {
            session.confirm_quit = false;
            false
        }
        (Some(_), Screen::Title) => false,
    }
}

// ── Main loop ─────────────────────────────────────────────────────────────────

fn render<W: Write>(out: &mut W, screen: &Screen, palette: &Palette) -> std::io::Result<()> {
    match screen {
        Screen::Title => display::render_title(out, palette),
        Screen::Game(session) => {
            display::render_game(out, session.engine.state(), palette, session.confirm_quit)
        }
    }
}

/// Block on input until the next tick is due, apply whatever arrived, then
/// redraw. Only this thread ever touches the engine.
fn run<W: Write>(out: &mut W, rx: &mpsc::Receiver<TermEvent>) -> std::io::Result<()> {
    let palette = Palette::default();
    let mut screen = Screen::Title;
    render(out, &screen, &palette)?;

    loop {
        let timeout = match &screen {
            Screen::Title => IDLE_FRAME,
            Screen::Game(session) => session
                .scheduler
                .next_deadline()
                .saturating_duration_since(Instant::now()),
        };

        match rx.recv_timeout(timeout) {
            Ok(TermEvent::Key(key)) if key.kind != KeyEventKind::Release => {
                if handle_key(&mut screen, key) {
                    return Ok(());
                }
            }
            Ok(_) | Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => return Ok(()),
        }

        if let Screen::Game(session) = &mut screen {
            session.run_due_ticks(Instant::now());
        }
        render(out, &screen, &palette)?;
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args)?;

    let mut out = BufWriter::new(stdout());

    terminal::enable_raw_mode().context("enabling raw mode")?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop can wait on input and timers at once.
    let (tx, rx) = mpsc::channel::<TermEvent>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break; // receiver dropped → program exiting
            }
        }
    });

    let result = run(&mut out, &rx);

    // Always restore the terminal
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result.context("running game loop")
}
