/// stlobj command-line front end: input discovery, settings, and batch driving
use crossterm::{
    queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
};
use std::io::{self, Write};

pub mod cli;
pub mod compose;
pub mod config;
pub mod driver;
pub mod walk;

pub use cli::{Cli, OutputFormat};
pub use config::Settings;
pub use driver::Summary;

/// Print the per-batch totals, colored by outcome.
pub fn print_summary<W: Write>(out: &mut W, summary: &Summary) -> io::Result<()> {
    queue!(
        out,
        SetForegroundColor(Color::Green),
        Print(format!("converted {}", summary.converted.len())),
        ResetColor
    )?;

    if !summary.failed.is_empty() {
        queue!(
            out,
            Print(", "),
            SetForegroundColor(Color::Red),
            Print(format!("failed {}", summary.failed.len())),
            ResetColor
        )?;
    }
    if summary.aborted {
        queue!(
            out,
            SetForegroundColor(Color::Yellow),
            Print(" (stopped at first failure, see --keep-going)"),
            ResetColor
        )?;
    }
    queue!(out, Print('\n'))?;

    for (input, reason) in &summary.failed {
        queue!(
            out,
            SetForegroundColor(Color::DarkGrey),
            Print(format!("  {}: {:#}\n", input.display(), reason)),
            ResetColor
        )?;
    }

    out.flush()
}
