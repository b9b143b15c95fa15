//! First-run setup wizard
//!
//! Prompts on any reader/writer pair so it can be driven from stdin or from
//! a test buffer.

use crate::utils::config::AppConfig;
use anyhow::{bail, Context, Result};
use std::io::{BufRead, Write};
use std::path::PathBuf;

/// Walk through the essential settings, updating `config` in place.
///
/// Each prompt shows the current value; blank input keeps it. Invalid input
/// is reported and asked again.
pub fn run_wizard<R: BufRead, W: Write>(
    config: &mut AppConfig,
    input: &mut R,
    output: &mut W,
) -> Result<()> {
    writeln!(
        output,
        "Running the setup wizard. The current value is shown in brackets; leave blank to keep it."
    )?;

    config.minecraft_dir = prompt(
        input,
        output,
        "Your '.minecraft' folder path",
        &config.minecraft_dir.to_string_lossy(),
        |value| {
            let path = PathBuf::from(value);
            if path.is_dir() {
                Ok(path)
            } else {
                Err(format!("Directory {:?} does not exist", value))
            }
        },
    )?;

    config.java_path = prompt(
        input,
        output,
        "Your 'java' executable path",
        &config.java_path.to_string_lossy(),
        |value| {
            let path = PathBuf::from(value);
            if path.is_file() {
                Ok(path)
            } else {
                Err(format!("File {:?} does not exist", value))
            }
        },
    )?;

    config.max_memory_mb = prompt(
        input,
        output,
        "Maximum memory allocated to Minecraft in MB",
        &config.max_memory_mb.to_string(),
        |value| match value.parse::<u32>() {
            Ok(mb) if mb > 0 => Ok(mb),
            _ => Err(format!("{:?} is not a valid amount of memory", value)),
        },
    )?;

    config.username = prompt(
        input,
        output,
        "Your Minecraft username",
        &config.username,
        |value| Ok(value.to_string()),
    )?;

    config.first_run = false;
    writeln!(output, "Done! Other settings can be changed later with 'millilauncher config'.")?;
    Ok(())
}

/// Ask a yes/no question, defaulting to no
pub fn confirm<R: BufRead, W: Write>(input: &mut R, output: &mut W, question: &str) -> Result<bool> {
    write!(output, "{} [y/N]: ", question)?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line).context("Failed to read answer")?;
    Ok(matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

fn prompt<R, W, T, F>(
    input: &mut R,
    output: &mut W,
    label: &str,
    default: &str,
    parse: F,
) -> Result<T>
where
    R: BufRead,
    W: Write,
    F: Fn(&str) -> Result<T, String>,
{
    loop {
        write!(output, "{} [{}]: ", label, default)?;
        output.flush()?;

        let mut line = String::new();
        let read = input.read_line(&mut line).context("Failed to read input")?;
        if read == 0 {
            bail!("Input closed before setup finished");
        }

        let value = match line.trim() {
            "" => default,
            entered => entered,
        };

        match parse(value) {
            Ok(parsed) => return Ok(parsed),
            Err(message) => writeln!(output, "Error: {}", message)?,
        }
    }
}
