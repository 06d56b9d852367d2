use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::app::LaunchOptions;
use crate::config::Config;
use crate::playback::PlaybackSettings;

#[derive(Parser)]
#[command(name = "prompter")]
#[command(author, version, about)]
#[command(long_about = "A scrolling teleprompter for on-camera reading.\n\n\
    Point it at a script file or a directory of scripts (.yaml, .yml, .json,\n\
    .txt, .md) and press Space for a countdown followed by autoscroll.\n\n\
    Examples:\n  \
    prompter scripts/             Launch on a script directory (fullscreen)\n  \
    prompter intro.yaml --windowed   Launch in a window\n  \
    prompter list scripts/        List scripts in reading order")]
#[command(propagate_version = true)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    /// Script file or directory (defaults to `defaults.scripts_dir`)
    pub path: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Launch in a window instead of fullscreen
    #[arg(long, global = false)]
    pub windowed: bool,

    /// Id (file stem) of the script to open first
    #[arg(long, global = false)]
    pub script: Option<String>,

    /// Scroll speed in pixels per second (0-2000)
    #[arg(long, global = false)]
    pub speed: Option<f32>,

    /// Font size in pixels (16-96)
    #[arg(long, global = false)]
    pub font_size: Option<u32>,

    /// Start with mirrored text
    #[arg(long, global = false)]
    pub mirror: bool,

    /// Do not reload scripts when files change
    #[arg(long, global = false)]
    pub no_watch: bool,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List scripts in reading order
    List {
        /// Script file or directory (defaults to `defaults.scripts_dir`)
        path: Option<PathBuf>,
    },

    /// View and modify configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Show version information
    Version,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Display current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key (e.g. defaults.speed, defaults.font_size, defaults.theme)
        key: String,

        /// Value to set
        value: String,
    },
}

#[derive(Clone, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    Powershell,
}

impl Cli {
    /// Tracing filter directive implied by the verbosity flags.
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        }
    }

    pub fn run(self) -> anyhow::Result<()> {
        match self.command {
            Some(Commands::List { path }) => {
                let config = Config::load_or_default();
                let path = resolve_path(path, &config)?;
                crate::commands::list::run(&path)
            }
            Some(Commands::Config { command }) => crate::commands::config::run(command),
            Some(Commands::Completion { shell }) => {
                crate::commands::completion::run(shell);
                Ok(())
            }
            Some(Commands::Version) => {
                crate::commands::print_version();
                Ok(())
            }
            None => {
                let config = Config::load_or_default();
                if self.path.is_none() && config.scripts_dir().is_none() {
                    use clap::CommandFactory;
                    let mut cmd = Self::command();
                    cmd.print_help()?;
                    println!();
                    return Ok(());
                }
                let source = resolve_path(self.path, &config)?;
                let settings = PlaybackSettings::new(
                    self.font_size.unwrap_or_else(|| config.font_size()),
                    self.speed.unwrap_or_else(|| config.speed()),
                    self.mirror || config.mirrored(),
                );
                crate::app::run(LaunchOptions {
                    source,
                    windowed: self.windowed,
                    script: self.script,
                    settings,
                    countdown: config.countdown(),
                    theme: config.theme().to_string(),
                    watch: !self.no_watch,
                })
            }
        }
    }
}

/// CLI path first, then the configured scripts directory.
fn resolve_path(path: Option<PathBuf>, config: &Config) -> anyhow::Result<PathBuf> {
    let path = path
        .or_else(|| config.scripts_dir().map(PathBuf::from))
        .ok_or_else(|| {
            anyhow::anyhow!(
                "No script path given. Pass one or run `prompter config set defaults.scripts_dir <dir>`."
            )
        })?;
    if !path.exists() {
        anyhow::bail!("Path not found: {}", path.display());
    }
    Ok(path)
}
