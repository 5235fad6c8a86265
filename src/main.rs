//! # cxflags CLI Entry Point
//!
//! Parses CLI arguments using clap and routes commands to the library.
//!
//! ## Commands
//!
//! - `flags [FILE]` - print the resolved flags, one per line (or `--json`)
//! - `explain FILE` - show each flag source and its contribution
//! - `probe` - print only the compiler's system include flags
//! - `init` - write a default `cxflags.toml`
//! - `completion` - generate shell completion scripts

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{Shell, generate};
use colored::*;
use std::fs;
use std::path::{Path, PathBuf};

use cxflags::config::{self, ProjectConfig};
use cxflags::ui;
use cxflags::{FlagAssembler, FlagsError, Resolution};

#[derive(Parser)]
#[command(name = "cxflags")]
#[command(about = "Compiler flags for C/C++ editor tooling", version = env!("CARGO_PKG_VERSION"))]
#[command(propagate_version = true)]
struct Cli {
    /// Path to cxflags.toml (default: search upward from the current directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Show debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the flags for a file (project-wide flags when no file is given)
    Flags {
        /// Source or header file
        file: Option<PathBuf>,
        /// Print {"flags": [...], "do_cache": true} instead of one flag per line
        #[arg(long)]
        json: bool,
    },
    /// Show which source contributed which flags
    Explain {
        /// Source or header file
        file: PathBuf,
    },
    /// Print the compiler's system include flags
    Probe,
    /// Write a default cxflags.toml in the current directory
    Init,
    /// Generate shell completion scripts
    Completion { shell: Shell },
}

fn init_logging(cli: &Cli) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Error);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli);

    match &cli.command {
        Some(Commands::Flags { file, json }) => {
            let config = config::locate_and_load(cli.config.as_deref())?;
            print_flags(&config, file.as_deref(), *json)
        }
        Some(Commands::Explain { file }) => {
            let config = config::locate_and_load(cli.config.as_deref())?;
            explain(&config, file)
        }
        Some(Commands::Probe) => {
            let config = config::locate_and_load(cli.config.as_deref())?;
            let assembler = FlagAssembler::new(&config);
            let flags = or_exit(assembler.system_source().system_includes())?;
            for arg in flags.to_args() {
                println!("{}", arg);
            }
            Ok(())
        }
        Some(Commands::Init) => init_config(),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let bin_name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, bin_name, &mut std::io::stdout());
            Ok(())
        }
        None => {
            let config = config::locate_and_load(cli.config.as_deref())?;
            print_flags(&config, None, false)
        }
    }
}

/// Report a fatal probe failure and exit; pass other results through.
fn or_exit<T>(result: cxflags::Result<T>) -> Result<T> {
    match result {
        Err(e) if e.is_fatal() => {
            eprintln!("{} Failed to acquire system includes from compiler", "x".red());
            if let FlagsError::ProbeSpawn { source, .. } = &e {
                eprintln!("   {}", source);
            }
            eprintln!("Tried with the following commandline:\n");
            eprintln!("{}", e.probe_command().unwrap_or_default());
            std::process::exit(1);
        }
        other => Ok(other?),
    }
}

fn print_flags(config: &ProjectConfig, file: Option<&Path>, json: bool) -> Result<()> {
    let assembler = FlagAssembler::new(config);
    let flags = or_exit(assembler.resolve(file.unwrap_or_else(|| Path::new(""))))?;

    if json {
        let out = serde_json::to_string_pretty(&Resolution::new(&flags))?;
        println!("{}", out);
    } else {
        for arg in flags.to_args() {
            println!("{}", arg);
        }
    }
    Ok(())
}

fn explain(config: &ProjectConfig, file: &Path) -> Result<()> {
    let assembler = FlagAssembler::new(config);
    let sections = or_exit(assembler.resolve_sections(file))?;

    println!(
        "{} {} ({} -std={})",
        "⚙️".cyan(),
        file.display().to_string().bold(),
        config.language,
        config.standard()
    );
    println!("   {} {}", "Project root:".dimmed(), config.project_root.display());
    println!(
        "   {} {}",
        "Compiler probe:".dimmed(),
        assembler.system_source().describe()
    );

    let mut table = ui::Table::new(&["Source", "Count", "Flags"]);
    let mut total = 0;
    for (source, flags) in &sections {
        total += flags.len();
        let rendered = if flags.is_empty() {
            "-".to_string()
        } else {
            flags.to_args().join(" ")
        };
        table.add_row(vec![source.to_string(), flags.len().to_string(), rendered]);
    }
    table.print();
    println!("{} {} flag(s) total", "✓".green(), total);
    Ok(())
}

fn init_config() -> Result<()> {
    let path = Path::new(config::CONFIG_FILE);
    if path.exists() {
        println!(
            "{} {} already exists, not overwriting",
            "!".yellow(),
            config::CONFIG_FILE
        );
        return Ok(());
    }

    let content = config::default_config_toml()?;
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    println!("{} Created {}", "✓".green(), config::CONFIG_FILE.cyan());
    Ok(())
}
