use clap::Parser;
use serde::Serialize;
use std::io::{self, Read};
use std::path::Path;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use turmite::{Contour, Preset, PresetLoader, PresetManager, Simulation, Snapshot, TurmiteError};

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
#[clap(after_help = "EXAMPLES:
  turmite-cli --rule RL --size 101 --steps 11000 --contour
  turmite-cli --preset presets/symmetric.ant --steps 5000 --grid
  cat my.ant | turmite-cli --steps 100 --json
  turmite-cli --list --dir presets --search ant
  turmite-cli --show symmetric")]
struct Cli {
    /// A preset file (.ant) to run. Can also pipe preset content via stdin.
    #[clap(short, long, conflicts_with_all = ["rule", "builtin"])]
    preset: Option<String>,

    /// Name of a built-in preset, e.g. "Langton's Ant".
    #[clap(short, long, conflicts_with = "rule")]
    builtin: Option<String>,

    /// The rule string; 'R' turns right, anything else turns left.
    #[clap(short, long)]
    rule: Option<String>,

    /// Grid edge length, used with --rule.
    #[clap(short, long, default_value_t = turmite::types::DEFAULT_GRID_SIZE)]
    size: usize,

    /// Number of steps to advance.
    #[clap(short = 'n', long, default_value_t = 1000)]
    steps: usize,

    /// Trace the principal contour after stepping.
    #[clap(short, long)]
    contour: bool,

    /// Print the final grid.
    #[clap(short, long)]
    grid: bool,

    /// Print the report as JSON.
    #[clap(short, long)]
    json: bool,

    /// List the built-in presets (or those in --dir) and exit.
    #[clap(short, long)]
    list: bool,

    /// Only list presets whose name contains this text, ignoring case.
    #[clap(long, requires = "list")]
    search: Option<String>,

    /// List the .ant presets found in this directory instead of the built-ins.
    #[clap(long, requires = "list")]
    dir: Option<String>,

    /// Print the source text of a built-in preset and exit.
    #[clap(long, conflicts_with = "list")]
    show: Option<String>,
}

#[derive(Serialize)]
struct Report {
    name: String,
    visited: usize,
    #[serde(flatten)]
    snapshot: Snapshot,
    #[serde(skip_serializing_if = "Option::is_none")]
    contour: Option<Contour>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let result = if cli.list {
        list(&cli);
        Ok(())
    } else if let Some(name) = &cli.show {
        builtin_index(name)
            .and_then(PresetManager::get_preset_text_by_index)
            .map(|text| print!("{text}"))
    } else {
        run(&cli)
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), TurmiteError> {
    let preset = load_preset(cli)?;
    tracing::info!(name = %preset.name, size = preset.size, rule = %preset.rule, "loaded preset");

    let mut sim = Simulation::from_preset(&preset)?;
    let visited = sim.advance(cli.steps);
    if sim.is_halted() {
        tracing::info!(steps = sim.step_count(), "ant left the grid");
    }

    let contour = cli.contour.then(|| sim.principal_contour());
    let mut snapshot = sim.snapshot();

    if cli.json {
        if !cli.grid {
            snapshot.rows.clear();
        }
        let report = Report {
            name: preset.name,
            visited: visited.len(),
            snapshot,
            contour,
        };
        let json = serde_json::to_string_pretty(&report)
            .map_err(|e| TurmiteError::ValidationError(e.to_string()))?;
        println!("{json}");
        return Ok(());
    }

    println!(
        "Preset: {} ({}x{}, rule {})",
        preset.name, snapshot.size, snapshot.size, snapshot.rule
    );
    println!(
        "Steps: {}, Ant: {}, Status: {}",
        snapshot.step_count,
        snapshot.ant,
        if snapshot.halted { "HALTED" } else { "RUNNING" }
    );
    println!("Cells touched in this run: {}", visited.len());

    if let Some(contour) = contour {
        match contour.failure() {
            None => println!("Contour (period {}): {}", contour.symbols().len(), contour),
            Some(failure) => println!("Contour not closed ({}): {}", failure, contour),
        }
    }

    if cli.grid {
        println!();
        for row in &snapshot.rows {
            let line: String = row.iter().map(|&v| cell_char(v)).collect();
            println!("{line}");
        }
    }

    Ok(())
}

/// Resolves the preset from a file, stdin, a built-in name or the --rule flags.
fn load_preset(cli: &Cli) -> Result<Preset, TurmiteError> {
    if let Some(path) = &cli.preset {
        PresetLoader::load_preset(Path::new(path))
    } else if let Some(name) = &cli.builtin {
        PresetManager::get_preset_by_name(name)
    } else if let Some(rule) = &cli.rule {
        let preset = Preset {
            name: format!("Rule {rule}"),
            size: cli.size,
            rule: rule.clone(),
            start: None,
        };
        turmite::analyze(&preset)?;
        Ok(preset)
    } else if atty::isnt(atty::Stream::Stdin) {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|e| TurmiteError::FileError(format!("Failed to read from stdin: {}", e)))?;
        PresetLoader::load_preset_from_string(&buffer)
    } else {
        PresetManager::get_preset_by_index(0)
    }
}

/// Prints the built-in presets, or the presets in `--dir`, filtered by `--search`.
fn list(cli: &Cli) {
    let query = cli.search.as_deref().unwrap_or_default();

    if let Some(dir) = &cli.dir {
        let query = query.to_lowercase();
        for result in PresetLoader::load_presets(Path::new(dir)) {
            match result {
                Ok((path, preset)) if preset.name.to_lowercase().contains(&query) => {
                    println!("{} ({})", preset.name, path.display())
                }
                Ok(_) => {}
                Err(e) => tracing::warn!(error = %e, "skipping preset"),
            }
        }
        return;
    }

    let names = PresetManager::list_preset_names();
    for index in PresetManager::search_presets(query) {
        if let Some(name) = names.get(index) {
            println!("{:>2}. {}", index + 1, name);
        }
    }
}

/// Resolves a built-in preset by exact name, falling back to the first partial match.
fn builtin_index(name: &str) -> Result<usize, TurmiteError> {
    PresetManager::list_preset_names()
        .iter()
        .position(|candidate| candidate == name)
        .or_else(|| PresetManager::search_presets(name).first().copied())
        .ok_or_else(|| TurmiteError::ValidationError(format!("Preset '{}' not found", name)))
}

/// Renders a cell state as a single character: '.' for 0, then digits and letters.
fn cell_char(value: u8) -> char {
    match value {
        0 => '.',
        1..=9 => (b'0' + value) as char,
        10..=35 => (b'a' + value - 10) as char,
        _ => '#',
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_index() {
        assert_eq!(builtin_index("Langton's Ant").unwrap(), 0);
        assert_eq!(builtin_index("symmetric").unwrap(), 2);
        assert!(builtin_index("no such preset").is_err());
    }

    #[test]
    fn test_builtin_text_matches_preset() {
        let index = builtin_index("edge walker").unwrap();
        let text = PresetManager::get_preset_text_by_index(index).unwrap();
        let preset = PresetLoader::load_preset_from_string(text).unwrap();

        assert_eq!(preset, PresetManager::get_preset_by_index(index).unwrap());
    }

    #[test]
    fn test_cell_char() {
        assert_eq!(cell_char(0), '.');
        assert_eq!(cell_char(7), '7');
        assert_eq!(cell_char(10), 'a');
        assert_eq!(cell_char(200), '#');
    }
}
