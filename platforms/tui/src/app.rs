use action::Action;
use keymap::{Config, KeyMapConfig};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Margin, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, BorderType, Borders, Padding, Paragraph, Wrap},
    Frame,
};
use turmite::{Cell, Contour, Heading, Preset, PresetLoader, PresetManager, Simulation};

use crate::Pace;

const BLOCK_PADDING: Padding = Padding::new(1, 1, 0, 0);
/// Colors for states 1.., cycling when the rule has more states.
const PALETTE: [Color; 8] = [
    Color::White,
    Color::Red,
    Color::Green,
    Color::Blue,
    Color::Magenta,
    Color::Cyan,
    Color::LightRed,
    Color::LightGreen,
];

pub struct App {
    simulation: Simulation,
    preset: Preset,
    current_preset_index: usize,
    auto_play: bool,
    last_touched: usize,
    contour: Option<Contour>,
    message: String,
    show_help: bool,
    pub(crate) keymap: Config<Action>,
    // Set when the preset came from a file/stdin, disabling preset switching
    preset_loaded_from_source: bool,
}

impl App {
    pub fn new_default() -> Result<Self, String> {
        let preset = PresetManager::get_preset_by_index(0).map_err(|e| e.to_string())?;
        Self::new(preset, false, "Press 'h' for help.")
    }

    pub fn new_from_preset_string(preset_content: String) -> Result<Self, String> {
        let preset = PresetLoader::load_preset_from_string(&preset_content)
            .map_err(|e| format!("Failed to load preset: {}", e))?;
        Self::new(
            preset,
            true,
            "Preset loaded from source. Press 'h' for help.",
        )
    }

    fn new(preset: Preset, from_source: bool, message: &str) -> Result<Self, String> {
        let simulation = Simulation::from_preset(&preset).map_err(|e| e.to_string())?;

        Ok(Self {
            simulation,
            preset,
            current_preset_index: 0,
            auto_play: false,
            last_touched: 0,
            contour: None,
            message: message.to_string(),
            show_help: false,
            keymap: Action::keymap_config(),
            preset_loaded_from_source: from_source,
        })
    }

    pub fn render(&mut self, f: &mut Frame, pace: &Pace) {
        let inner_area = f.area().inner(Margin::new(1, 0));

        // Preset info, middle (grid + side panel), status
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Min(0),
                Constraint::Length(3),
            ])
            .split(inner_area);

        self.render_preset_info(f, main_chunks[0]);

        let middle_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Min(0),
                Constraint::Length(1),
                Constraint::Length(44),
            ])
            .split(main_chunks[1]);

        self.render_grid(f, middle_chunks[0]);

        let side_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(7), Constraint::Min(0)])
            .split(middle_chunks[2]);

        self.render_simulation_state(f, side_chunks[0], pace);

        if self.show_help {
            self.render_help(f, side_chunks[1]);
        } else {
            self.render_contour(f, side_chunks[1]);
        }

        self.render_status(f, main_chunks[2]);
    }

    fn render_preset_info(&self, f: &mut Frame, area: Rect) {
        let name = if self.preset_loaded_from_source {
            format!("{} (Custom)", self.preset.name)
        } else {
            format!(
                "{} ({}/{})",
                self.preset.name,
                self.current_preset_index + 1,
                PresetManager::count()
            )
        };

        let text = vec![
            Line::from(vec![
                Span::styled("Preset: ", Style::default().fg(Color::Yellow)),
                Span::raw(name),
            ]),
            Line::from(vec![
                Span::styled("Rule: ", Style::default().fg(Color::Yellow)),
                Span::raw(self.simulation.rule().to_string()),
                Span::styled(" | Grid: ", Style::default().fg(Color::Yellow)),
                Span::raw(format!("{0}x{0}", self.simulation.size())),
                Span::styled(" | Start: ", Style::default().fg(Color::Yellow)),
                Span::raw(self.simulation.initial_pose().to_string()),
            ]),
        ];

        let paragraph = Paragraph::new(text)
            .block(block("Turmite - Langton's Ant (TUI)").title_alignment(Alignment::Center));

        f.render_widget(paragraph, area);
    }

    /// Draws the part of the grid around the ant that fits in `area`, two columns per cell.
    fn render_grid(&self, f: &mut Frame, area: Rect) {
        let outer = block("Grid");
        let inner = outer.inner(area);
        f.render_widget(outer, area);

        let size = self.simulation.size();
        let ant = self.simulation.ant();
        let grid = self.simulation.grid();

        let cols = (inner.width / 2) as usize;
        let rows = inner.height as usize;
        let left = viewport_origin(ant.x, cols, size);
        let top = viewport_origin(ant.y, rows, size);

        let mut lines = Vec::with_capacity(rows);
        for y in top..(top + rows).min(size) {
            let mut spans = Vec::with_capacity(cols);
            for x in left..(left + cols).min(size) {
                if ant.x == x as i64 && ant.y == y as i64 {
                    spans.push(Span::styled(
                        ant_glyph(ant.heading),
                        Style::default()
                            .bg(Color::Yellow)
                            .fg(Color::Black)
                            .add_modifier(Modifier::BOLD),
                    ));
                    continue;
                }

                match grid.get(Cell::new(x, y)) {
                    0 => spans.push(Span::raw("  ")),
                    state => spans.push(Span::styled(
                        "██",
                        Style::default().fg(PALETTE[(state - 1) % PALETTE.len()]),
                    )),
                }
            }
            lines.push(Line::from(spans));
        }

        f.render_widget(Paragraph::new(lines), inner);
    }

    fn render_simulation_state(&self, f: &mut Frame, area: Rect, pace: &Pace) {
        let step_count = self.simulation.step_count();

        let (status_text, status_color) = if self.simulation.is_halted() {
            ("HALTED", Color::Red)
        } else if step_count == 0 {
            ("READY", Color::Blue)
        } else {
            ("RUNNING", Color::Green)
        };

        let histogram = self
            .simulation
            .grid()
            .histogram(self.simulation.rule().len())
            .iter()
            .enumerate()
            .map(|(state, count)| format!("{state}:{count}"))
            .collect::<Vec<_>>()
            .join(" ");

        let text = vec![
            Line::from(vec![
                Span::styled("Status: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    status_text,
                    Style::default()
                        .fg(status_color)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" | Steps: ", Style::default().fg(Color::Yellow)),
                Span::raw(step_count.to_string()),
            ]),
            Line::from(vec![
                Span::styled("Ant: ", Style::default().fg(Color::Yellow)),
                Span::raw(self.simulation.ant().to_string()),
            ]),
            Line::from(vec![
                Span::styled("Speed: ", Style::default().fg(Color::Yellow)),
                Span::raw(pace.to_string()),
                Span::styled(" | Touched: ", Style::default().fg(Color::Yellow)),
                Span::raw(self.last_touched.to_string()),
            ]),
            Line::from(vec![
                Span::styled("States: ", Style::default().fg(Color::Cyan)),
                Span::raw(histogram),
            ]),
        ];

        f.render_widget(
            section("Simulation", text).wrap(Wrap { trim: true }),
            area,
        );
    }

    fn render_contour(&self, f: &mut Frame, area: Rect) {
        let text = match &self.contour {
            None => vec![
                Line::from("Press 'c' to trace the cycle from"),
                Line::from("the ant's pose back to its start."),
            ],
            Some(contour) => {
                let summary = match contour.failure() {
                    None => Line::from(Span::styled(
                        format!("Closed, period {}", contour.symbols().len()),
                        Style::default().fg(Color::Green),
                    )),
                    Some(failure) => Line::from(Span::styled(
                        format!("Not closed: {failure}"),
                        Style::default().fg(Color::Red),
                    )),
                };
                vec![summary, Line::from(""), Line::from(contour.to_string())]
            }
        };

        f.render_widget(section("Contour", text).wrap(Wrap { trim: false }), area);
    }

    fn render_help(&self, f: &mut Frame, area: Rect) {
        let help_text = vec![
            Line::from("Controls:"),
            Line::from("  Space - Advance one batch"),
            Line::from("  ↑ ↓ - Auto-play faster / slower"),
            Line::from("  p - Toggle auto-play"),
            Line::from("  c - Trace contour"),
            Line::from("  r - Restart preset"),
            Line::from(if self.preset_loaded_from_source {
                "  ← → - Preset switching disabled"
            } else {
                "  ← → - Switch presets"
            }),
            Line::from("  h - Toggle this help"),
            Line::from("  q - Quit"),
        ];

        f.render_widget(section("Help", help_text), area);
    }

    fn render_status(&self, f: &mut Frame, area: Rect) {
        let repo = "@rezigned/turmite";
        let outer = block("Status");
        let inner = outer.inner(area);
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Fill(1), Constraint::Length(repo.len() as u16)])
            .split(inner);

        let auto_play_status = if self.auto_play { "ON" } else { "OFF" };
        let status = Line::from(vec![
            Span::raw("Auto-play: "),
            Span::styled(auto_play_status, Style::default().fg(Color::Yellow)),
            Span::raw(format!(" | {}", self.message)),
        ]);

        let social = Text::from(
            Line::from(Span::styled(repo, Style::default().fg(Color::Yellow))).right_aligned(),
        );

        f.render_widget(outer, area);
        f.render_widget(status, chunks[0]);
        f.render_widget(social, chunks[1]);
    }

    /// Advances the ant by `batch` steps and drops any stale contour.
    pub fn step_simulation(&mut self, batch: usize) {
        self.last_touched = self.simulation.advance(batch).len();
        self.contour = None;

        if self.simulation.is_halted() {
            self.message = format!(
                "Ant left the grid after {} steps. Press 'r' to restart.",
                self.simulation.step_count()
            );
            self.auto_play = false;
        } else {
            self.message = format!("Step {}", self.simulation.step_count());
        }
    }

    /// Rebuilds the simulation from the current preset.
    pub fn reset_simulation(&mut self) {
        match Simulation::from_preset(&self.preset) {
            Ok(simulation) => {
                self.simulation = simulation;
                self.message = "Simulation restarted".to_string();
            }
            Err(e) => self.message = format!("Failed to restart: {e}"),
        }
        self.auto_play = false;
        self.last_touched = 0;
        self.contour = None;
    }

    pub fn trace_contour(&mut self) {
        let contour = self.simulation.principal_contour();
        self.message = match contour.failure() {
            None => format!("Contour closed with period {}", contour.symbols().len()),
            Some(failure) => format!("Contour not closed: {failure}"),
        };
        self.contour = Some(contour);
    }

    pub fn toggle_auto_play(&mut self) {
        self.auto_play = !self.auto_play;
        self.message = format!(
            "Auto-play {}",
            if self.auto_play {
                "enabled"
            } else {
                "disabled"
            }
        );
    }

    pub fn is_auto_playing(&self) -> bool {
        self.auto_play && !self.simulation.is_halted()
    }

    pub fn set_message(&mut self, message: String) {
        self.message = message;
    }

    pub fn next_preset(&mut self) {
        if self.preset_loaded_from_source {
            self.message = "Cannot switch presets when loaded from file/stdin.".to_string();
            return;
        }
        let count = PresetManager::count();
        self.current_preset_index = (self.current_preset_index + 1) % count;
        self.load_current_preset();
    }

    pub fn previous_preset(&mut self) {
        if self.preset_loaded_from_source {
            self.message = "Cannot switch presets when loaded from file/stdin.".to_string();
            return;
        }
        let count = PresetManager::count();
        self.current_preset_index = if self.current_preset_index == 0 {
            count - 1
        } else {
            self.current_preset_index - 1
        };
        self.load_current_preset();
    }

    fn load_current_preset(&mut self) {
        let preset = match PresetManager::get_preset_by_index(self.current_preset_index) {
            Ok(preset) => preset,
            Err(e) => {
                self.message = e.to_string();
                return;
            }
        };

        self.message = format!("Loaded preset: {}", preset.name);
        self.preset = preset;
        self.reset_simulation();
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }
}

/// Returns the first cell index of a `span`-wide window centred on `center`,
/// clamped so the window stays inside `0..size`.
fn viewport_origin(center: i64, span: usize, size: usize) -> usize {
    if span >= size {
        return 0;
    }

    let center = center.clamp(0, size as i64 - 1) as usize;
    center.saturating_sub(span / 2).min(size - span)
}

fn ant_glyph(heading: Heading) -> &'static str {
    match heading {
        Heading::Up => "▲ ",
        Heading::Right => "▶ ",
        Heading::Down => "▼ ",
        Heading::Left => "◀ ",
    }
}

fn section<'a>(title: &'a str, content: Vec<Line<'a>>) -> Paragraph<'a> {
    Paragraph::new(content).block(block(title))
}

fn block(title: &str) -> Block {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .title(format!(" {title} "))
        .padding(BLOCK_PADDING)
}
