//! Reel CLI - looping card timeline TUI

mod app;
mod config;
mod ui;

use anyhow::{Context, Result};
use app::App;
use clap::Parser;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyboardEnhancementFlags, MouseButton, MouseEventKind, PopKeyboardEnhancementFlags,
        PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, supports_keyboard_enhancement, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};
use env_logger::{Builder, Target};
use log::LevelFilter;
use ratatui::prelude::*;
use reel_core::{Deck, Direction};
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

const SAMPLE_DECK: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/decks/sample.json"));

#[derive(Parser, Debug)]
#[command(name = "reel")]
#[command(author, version, about = "A looping card timeline")]
struct Args {
    /// Deck file (JSON). Uses the built-in sample deck when omitted
    deck: Option<PathBuf>,

    /// Rows advanced per tick while auto-scrolling
    #[arg(short, long)]
    speed: Option<f64>,

    /// Start paused
    #[arg(long)]
    paused: bool,

    /// Pause while the mouse hovers the timeline
    #[arg(long)]
    hover_pause: bool,

    /// Hide the slider column
    #[arg(long)]
    no_slider: bool,

    /// Start at a year or card id
    #[arg(short, long)]
    jump: Option<String>,

    /// Write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn init_logger(log_file: Option<&Path>) -> Result<()> {
    match log_file {
        Some(path) => {
            let file = std::fs::File::create(path)
                .context(format!("Failed to create log file: {}", path.display()))?;
            Builder::new()
                .target(Target::Pipe(Box::new(file)))
                .filter_level(LevelFilter::Info)
                .parse_default_env()
                .init();
        }
        // The alternate screen owns stderr; only log there when asked to
        None if std::env::var("RUST_LOG").is_ok() => env_logger::init(),
        None => {}
    }
    Ok(())
}

fn load_deck(path: Option<&Path>) -> Result<Deck> {
    match path {
        Some(path) => {
            Deck::load(path).context(format!("Failed to load deck: {}", path.display()))
        }
        None => Deck::from_json(SAMPLE_DECK).context("Built-in deck is invalid"),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logger(args.log_file.as_deref())?;
    let config = config::Config::load();
    let deck = load_deck(args.deck.as_deref())?;

    let mut settings = config.settings();
    if let Some(speed) = args.speed {
        settings.engine.base_speed = app::clamp_speed(speed, settings.engine.base_speed);
    }
    if args.paused {
        settings.engine.autoplay = false;
    }
    if args.hover_pause {
        settings.arbiter.hover_pause = true;
    }
    if args.no_slider {
        settings.slider_visible = false;
    }

    let mut app = App::new(deck, settings).context("Failed to initialize timeline")?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let key_release_events = supports_keyboard_enhancement().unwrap_or(false);
    if key_release_events {
        execute!(
            stdout,
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
        )?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    app.key_release_events = key_release_events;
    app.start();

    // The first draw lays the track out; jump once offsets exist
    if let Some(query) = args.jump.as_deref() {
        terminal.draw(|f| ui::draw(f, &mut app))?;
        match app.deck.lookup(query) {
            Some(idx) => app.jump_to_card(idx),
            None => app.set_hint(format!("No card for \"{}\"", query)),
        }
    }

    // Run event loop
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    if key_release_events {
        execute!(terminal.backend_mut(), PopKeyboardEnhancementFlags)?;
    }
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    app.engine.stop();

    if let Err(err) = result {
        eprintln!("Error: {}", err);
        return Err(err);
    }

    Ok(())
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    let tick_rate = Duration::from_millis(16);

    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(tick_rate)? {
            match event::read()? {
                Event::Mouse(me) => match me.kind {
                    MouseEventKind::Down(MouseButton::Left) => app.mouse_down(me.column, me.row),
                    MouseEventKind::Drag(MouseButton::Left) => app.mouse_drag(me.column, me.row),
                    MouseEventKind::Up(_) => app.mouse_up(),
                    MouseEventKind::Moved => app.mouse_moved(me.column, me.row),
                    MouseEventKind::ScrollUp => app.prev_card(),
                    MouseEventKind::ScrollDown => app.next_card(),
                    _ => {}
                },
                Event::Key(key) => handle_key(app, key),
                _ => {}
            }
        }

        // Timers, then the frame tick
        app.tick();

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if app.search_active {
        if key.kind != KeyEventKind::Press {
            return;
        }
        match key.code {
            KeyCode::Esc => app.clear_search(),
            KeyCode::Enter => app.submit_search(),
            KeyCode::Backspace => app.pop_search_char(),
            KeyCode::Char(c) => app.push_search_char(c),
            _ => {}
        }
        return;
    }

    // Hold arrows: press/repeat starts or extends the hold, release ends it
    let hold = match key.code {
        KeyCode::Up | KeyCode::Char('k') => Some(Direction::Back),
        KeyCode::Down | KeyCode::Char('j') => Some(Direction::Forward),
        _ => None,
    };
    if let Some(direction) = hold {
        match key.kind {
            KeyEventKind::Press | KeyEventKind::Repeat => app.hold_key(direction),
            KeyEventKind::Release => app.release_key(),
        }
        return;
    }

    if key.kind != KeyEventKind::Press {
        return;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => {
            if app.show_help {
                app.show_help = false;
            } else {
                app.should_quit = true;
            }
        }
        KeyCode::Char(' ') => app.toggle_pause(),
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('n') => app.next_card(),
        KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('p') => app.prev_card(),
        KeyCode::Home | KeyCode::Char('g') => app.first_card(),
        KeyCode::End | KeyCode::Char('G') => app.last_card(),
        KeyCode::Char('/') => app.start_search(),
        KeyCode::Char('+') | KeyCode::Char('=') => app.increase_speed(),
        KeyCode::Char('-') => app.decrease_speed(),
        KeyCode::Char('H') => app.toggle_hover_pause(),
        KeyCode::Char('s') => app.toggle_slider(),
        KeyCode::Char('Z') => app.toggle_zen(),
        KeyCode::Char('r') => app.recompute(),
        KeyCode::Char('?') => app.toggle_help(),
        _ => {}
    }
}
