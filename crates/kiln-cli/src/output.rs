//! Colored terminal output shared by the commands

use kiln_engine::diagnostic;
use kiln_engine::Diagnostics;
use std::io::Write;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Resolve `ColorChoice` from the `--color` flag and the environment.
///
/// Priority: `NO_COLOR` env > `--color` flag > auto-detect TTY.
pub fn resolve_color_choice(flag: Option<&str>) -> ColorChoice {
    if std::env::var_os("NO_COLOR").is_some() {
        return ColorChoice::Never;
    }
    match flag {
        Some("always") => ColorChoice::Always,
        Some("never") => ColorChoice::Never,
        _ => ColorChoice::Auto,
    }
}

/// Render diagnostics to stderr, followed by a one-line summary
pub fn print_diagnostics(diagnostics: &Diagnostics, choice: ColorChoice) -> anyhow::Result<()> {
    if diagnostics.is_empty() {
        return Ok(());
    }
    let mut stderr = StandardStream::stderr(choice);
    diagnostic::emit(&mut stderr, diagnostics.reports())?;

    let errors = diagnostics
        .reports()
        .iter()
        .filter(|r| match r {
            kiln_engine::Report::Message(m) => m.severity() == kiln_engine::Severity::Error,
            kiln_engine::Report::InternalError(_) => true,
        })
        .count();
    let color = if errors > 0 { Color::Red } else { Color::Yellow };
    stderr.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true))?;
    write!(stderr, "{} report(s)", diagnostics.len())?;
    stderr.reset()?;
    writeln!(stderr, ", {} error(s)", errors)?;
    Ok(())
}

/// Write a heading line in bold
pub fn heading(out: &mut StandardStream, text: &str) -> std::io::Result<()> {
    out.set_color(ColorSpec::new().set_bold(true))?;
    write!(out, "{}", text)?;
    out.reset()?;
    writeln!(out)
}
