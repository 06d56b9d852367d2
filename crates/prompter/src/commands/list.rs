use std::path::Path;

use anyhow::Result;
use colored::Colorize;

use crate::script::{self, Script};

pub fn run(path: &Path) -> Result<()> {
    let scripts = script::load(path)?;
    if scripts.is_empty() {
        println!("{}", format!("No scripts found in {}", path.display()).yellow());
        return Ok(());
    }
    for line in scripts.iter().map(describe) {
        println!("{line}");
    }
    Ok(())
}

fn describe(script: &Script) -> String {
    let counts = format!(
        "{} paragraphs, {} words",
        script.paragraph_count(),
        script.word_count()
    );
    format!(
        "{:<24} {:<32} {}",
        script.id.cyan(),
        script.name.bold(),
        counts.dimmed()
    )
}
