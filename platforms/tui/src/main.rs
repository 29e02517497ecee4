mod app;

use action::Action;
use app::App;
use clap::Parser;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyEvent, KeyEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::Read;
use std::time::{Duration, Instant};
use std::{error::Error, fmt, fs, io};

const MAX_BATCH: usize = 100_000;
const MAX_INTERVAL: Duration = Duration::from_millis(400);
const MIN_INTERVAL: Duration = Duration::from_millis(25);
const IDLE_POLL: Duration = Duration::from_millis(250);

/// A Langton's Ant / turmite viewer with a Terminal User Interface.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
#[clap(after_help = "EXAMPLES:
  turmite-tui presets/symmetric.ant
  cat my.ant | turmite-tui")]
struct Cli {
    /// Path to a preset file (.ant).
    /// If not provided, the application will load the built-in presets.
    /// Can also pipe preset content via stdin.
    preset_file: Option<String>,
}

/// Represents the state of the application loop.
#[derive(Debug, PartialEq)]
enum AppState {
    Running,
    ShouldQuit,
}

/// A wrapper around the terminal to ensure it's restored on drop.
struct Tui {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl Tui {
    /// Creates a new TUI.
    fn new() -> io::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Ok(Self { terminal })
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        // Errors are ignored; there is nothing left to do with them during drop.
        let _ = disable_raw_mode();
        let _ = execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        );
        let _ = self.terminal.show_cursor();
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    // Load the preset before entering the alternate screen so errors reach stderr.
    let app = match load_preset(&cli) {
        Ok(app) => app,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let mut tui = Tui::new()?;

    run_app(&mut tui.terminal, app)?;

    Ok(())
}

/// Builds the app from a file path, then stdin, and finally the built-in presets.
fn load_preset(cli: &Cli) -> Result<App, String> {
    if let Some(file_path) = &cli.preset_file {
        fs::read_to_string(file_path)
            .map_err(|e| format!("Failed to read file '{}': {}", file_path, e))
            .and_then(App::new_from_preset_string)
    } else if atty::isnt(atty::Stream::Stdin) {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|e| format!("Failed to read from stdin: {}", e))
            .and_then(|_| App::new_from_preset_string(buffer))
    } else {
        App::new_default()
    }
}

/// Runs the main application loop.
///
/// While auto-playing, one batch of `pace.batch` steps runs every `pace.interval`;
/// key events are handled between ticks.
fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    mut app: App,
) -> io::Result<()> {
    let mut pace = Pace::default();
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|f| app.render(f, &pace))?;

        let timeout = if app.is_auto_playing() {
            pace.interval.saturating_sub(last_tick.elapsed())
        } else {
            IDLE_POLL
        };

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press
                    && handle_key_event(&mut app, &mut pace, key) == AppState::ShouldQuit
                {
                    return Ok(());
                }
            }
        }

        if last_tick.elapsed() >= pace.interval {
            if app.is_auto_playing() {
                app.step_simulation(pace.batch);
            }
            last_tick = Instant::now();
        }
    }
}

/// Handles key events and updates the application state.
fn handle_key_event(app: &mut App, pace: &mut Pace, key: KeyEvent) -> AppState {
    if let Some(action) = app.keymap.get(&key) {
        match action {
            Action::Quit => return AppState::ShouldQuit,
            Action::Reset => app.reset_simulation(),
            Action::Step => app.step_simulation(pace.batch),
            Action::ToggleAutoPlay => app.toggle_auto_play(),
            Action::ToggleHelp => app.toggle_help(),
            Action::TraceContour => app.trace_contour(),
            Action::PreviousPreset => app.previous_preset(),
            Action::NextPreset => app.next_preset(),
            Action::Faster => {
                pace.faster();
                app.set_message(format!("Speed: {pace}"));
            }
            Action::Slower => {
                pace.slower();
                app.set_message(format!("Speed: {pace}"));
            }
        }
    }
    AppState::Running
}

/// How fast auto-play advances the ant: `batch` steps every `interval`.
///
/// Speeding up first shortens the interval down to `MIN_INTERVAL`, then grows the
/// batch tenfold up to `MAX_BATCH`. Slowing down retraces the same ladder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pace {
    pub batch: usize,
    pub interval: Duration,
}

impl Default for Pace {
    fn default() -> Self {
        Self {
            batch: 1,
            interval: MAX_INTERVAL,
        }
    }
}

impl Pace {
    fn faster(&mut self) {
        if self.interval > MIN_INTERVAL {
            self.interval = (self.interval / 2).max(MIN_INTERVAL);
        } else {
            self.batch = (self.batch * 10).min(MAX_BATCH);
        }
    }

    fn slower(&mut self) {
        if self.batch > 1 {
            self.batch = (self.batch / 10).max(1);
        } else {
            self.interval = (self.interval * 2).min(MAX_INTERVAL);
        }
    }
}

impl fmt::Display for Pace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} step(s) every {} ms",
            self.batch,
            self.interval.as_millis()
        )
    }
}
