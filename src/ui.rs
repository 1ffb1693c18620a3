//! Line-oriented operator messages.

use std::io::Write;

use anyhow::Result;
use colored::Colorize;

pub fn success(out: &mut impl Write, message: &str) -> Result<()> {
    writeln!(out, "{} {}", "✓".green(), message)?;
    Ok(())
}

pub fn failure(out: &mut impl Write, message: &str) -> Result<()> {
    writeln!(out, "{} {}", "✗".red(), message)?;
    Ok(())
}

pub fn warning(out: &mut impl Write, message: &str) -> Result<()> {
    writeln!(out, "{} {}", "!".yellow(), message.yellow())?;
    Ok(())
}

pub fn notice(out: &mut impl Write, message: &str) -> Result<()> {
    writeln!(out, "{} {}", "i".cyan(), message)?;
    Ok(())
}

pub fn heading(out: &mut impl Write, title: &str) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", title.bold())?;
    Ok(())
}
