//! Command line interface

use crate::conversation::format_response;
use crate::logging::{self, LogLevel};
use crate::persona::Persona;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pony_terminal::{display, parse_into, RenderFormat, Screen};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(author, version, about = "Pony - render terminal output, format responses and meet ponies")]
pub struct Args {
    /// Log level
    #[arg(long, global = true, value_enum, default_value = "info", env = "PONY_LOG_LEVEL")]
    pub log_level: LogLevel,

    /// Path to log file (stderr if not specified)
    #[arg(long, global = true, env = "PONY_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Parse terminal output and print the resulting screen
    Render {
        /// Input file, or `-` for stdin
        input: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "plain", env = "PONY_RENDER_FORMAT")]
        format: RenderFormat,

        /// Keep at most this many rows
        #[arg(long, env = "PONY_MAX_ROWS")]
        max_rows: Option<usize>,
    },

    /// Wrap text the way responses are shown in a session
    Format {
        /// Input file, or `-` for stdin
        input: Option<PathBuf>,

        /// Terminal width in columns
        #[arg(short, long, default_value = "80", env = "PONY_WIDTH")]
        width: u16,
    },

    /// Print the greeting of a pony, chosen at random unless named
    Persona {
        /// Pony code name
        #[arg(long, env = "PONY_NAME")]
        pony: Option<String>,

        /// Also print the system prompt
        #[arg(long)]
        prompt: bool,
    },
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    logging::init(args.log_level, args.log_file.as_deref())?;

    let output = execute(&args.command)?;

    let mut stdout = io::stdout().lock();
    stdout
        .write_all(output.as_bytes())
        .context("Failed to write output")?;
    if !output.ends_with('\n') {
        writeln!(stdout).context("Failed to write output")?;
    }
    Ok(())
}

/// Run a command and return what it prints
pub fn execute(command: &Command) -> Result<String> {
    match command {
        Command::Render {
            input,
            format,
            max_rows,
        } => {
            let bytes = read_input(input.as_deref())?;
            render_input(&bytes, *format, *max_rows)
        }
        Command::Format { input, width } => {
            let bytes = read_input(input.as_deref())?;
            let text = String::from_utf8_lossy(&bytes);
            Ok(format_response(text.trim_end(), *width))
        }
        Command::Persona { pony, prompt } => {
            let persona = match pony {
                Some(code_name) => Persona::new(code_name.as_str()),
                None => Persona::random(),
            };
            let mut output = persona.greeting();
            if *prompt {
                output.push('\n');
                output.push_str(&persona.system_prompt());
            }
            Ok(output)
        }
    }
}

/// Read from a file, or from stdin when `path` is `None` or `-`
pub fn read_input(path: Option<&Path>) -> Result<Vec<u8>> {
    let bytes = match path {
        Some(path) if path != Path::new("-") => std::fs::read(path)
            .with_context(|| format!("Failed to read input file: {}", path.display()))?,
        _ => {
            let mut bytes = Vec::new();
            io::stdin()
                .lock()
                .read_to_end(&mut bytes)
                .context("Failed to read stdin")?;
            bytes
        }
    };
    debug!(bytes = bytes.len(), "read input");
    Ok(bytes)
}

/// Parse `input` into a fresh screen and render it
pub fn render_input(input: &[u8], format: RenderFormat, max_rows: Option<usize>) -> Result<String> {
    let mut screen = match max_rows {
        Some(max_rows) => Screen::with_max_rows(max_rows).context("Invalid --max-rows")?,
        None => Screen::new(),
    };
    parse_into(&mut screen, input);

    info!(
        rows = screen.rows().len(),
        row = screen.cursor().row,
        col = screen.cursor().col,
        "parsed input"
    );
    Ok(display::render(&screen, format))
}
