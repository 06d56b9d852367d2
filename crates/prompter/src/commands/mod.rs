pub mod completion;
pub mod config;
pub mod list;

use colored::Colorize;

pub fn print_version() {
    println!(
        "{} {}",
        "prompter".bold(),
        env!("CARGO_PKG_VERSION").dimmed()
    );
}
