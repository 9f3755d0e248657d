//! `keycode mask` command implementation.
//!
//! Redacts its argument, or every line of stdin when no argument is given.

use anyhow::{Context, Result};
use keycode_log::mask;
use std::io::{self, BufRead, Write};

pub fn run(text: Option<&str>) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match text {
        Some(text) => writeln!(out, "{}", mask(text))?,
        None => mask_lines(io::stdin().lock(), &mut out)?,
    }

    Ok(())
}

/// Mask each line of `input` independently.
pub fn mask_lines<R: BufRead, W: Write>(input: R, out: &mut W) -> Result<()> {
    for line in input.lines() {
        let line = line.context("Failed to read input")?;
        writeln!(out, "{}", mask(&line))?;
    }
    Ok(())
}
