//! SMBIOS compliance validator.
//!
//! Reads `dmidecode` text output, checks every record against the rule
//! catalog plus whole-table checks, and prints the findings grouped by handle.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use smbios_validator::catalog::rules;
use smbios_validator::exit_codes;
use smbios_validator::io::config::load_config;
use smbios_validator::logging;
use smbios_validator::report::{render_json, render_text};
use smbios_validator::validate::validate_dump;

#[derive(Parser)]
#[command(
    name = "smbios-validator",
    version,
    about = "Validate SMBIOS records against compliance rules"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate a `dmidecode` text dump.
    Validate {
        /// Path to the `dmidecode` output.
        dump: PathBuf,
        /// Validator config (TOML). Defaults apply when the file is missing.
        #[arg(short, long, default_value = "smbios-validator.toml")]
        config: PathBuf,
        /// Report format.
        #[arg(short, long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
    /// List catalog rule ids and their error messages.
    Rules,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn main() {
    logging::init();
    match run() {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("{:#}", err);
            std::process::exit(exit_codes::INVALID);
        }
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    match cli.command {
        Command::Validate {
            dump,
            config,
            format,
        } => cmd_validate(&dump, &config, format),
        Command::Rules => cmd_rules(),
    }
}

fn cmd_validate(dump: &Path, config_path: &Path, format: Format) -> Result<i32> {
    let config = load_config(config_path).context("load validator config")?;
    let bucket = validate_dump(dump, &config)?;
    let rendered = match format {
        Format::Text => render_text(&bucket, &config.global_key),
        Format::Json => render_json(&bucket)?,
    };
    print!("{rendered}");
    if bucket.is_empty() {
        Ok(exit_codes::OK)
    } else {
        Ok(exit_codes::NONCOMPLIANT)
    }
}

fn cmd_rules() -> Result<i32> {
    for rule in rules()? {
        println!("{}\t{}", rule.id(), rule.err_msg());
    }
    Ok(exit_codes::OK)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_validate_defaults() {
        let cli = Cli::parse_from(["smbios-validator", "validate", "dump.txt"]);
        match cli.command {
            Command::Validate {
                dump,
                config,
                format,
            } => {
                assert_eq!(dump, PathBuf::from("dump.txt"));
                assert_eq!(config, PathBuf::from("smbios-validator.toml"));
                assert_eq!(format, Format::Text);
            }
            Command::Rules => panic!("expected validate"),
        }
    }

    #[test]
    fn parse_validate_json_with_config() {
        let cli = Cli::parse_from([
            "smbios-validator",
            "validate",
            "dump.txt",
            "--config",
            "cfg.toml",
            "--format",
            "json",
        ]);
        assert!(matches!(
            cli.command,
            Command::Validate {
                format: Format::Json,
                ..
            }
        ));
    }

    #[test]
    fn parse_rules() {
        let cli = Cli::parse_from(["smbios-validator", "rules"]);
        assert!(matches!(cli.command, Command::Rules));
    }
}
