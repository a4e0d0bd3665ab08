//! CLI smoke entry point and snapshot tool.
//!
//! # Responsibility
//! - Verify `zenith_core` linkage without the Flutter runtime.
//! - Encode goal JSON files into share tokens and inspect incoming links.
//!
//! Usage:
//! - `zenith_cli` prints ping/version.
//! - `zenith_cli encode <goals.json>` prints a share token.
//! - `zenith_cli decode <url-or-token>` prints the goals as JSON.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use zenith_core::{decode, decode_share_url, encode, Goal};

#[derive(Parser, Debug)]
#[command(name = "zenith_cli", version, about = "Zenith goal snapshot tool")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Command {
    /// Encode a JSON goal list into a share token.
    Encode {
        /// Path to a JSON array of goals.
        path: PathBuf,
    },
    /// Decode a share link or bare token into goal JSON.
    Decode {
        /// Full share URL (`...#data=<token>`) or the token alone.
        input: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let outcome = match cli.command {
        None => {
            println!("zenith_core ping={}", zenith_core::ping());
            println!("zenith_core version={}", zenith_core::core_version());
            Ok(())
        }
        Some(Command::Encode { path }) => run_encode(&path),
        Some(Command::Decode { input }) => run_decode(&input),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}

fn run_encode(path: &Path) -> Result<(), String> {
    let shown = path.display();
    let raw =
        std::fs::read_to_string(path).map_err(|err| format!("cannot read `{shown}`: {err}"))?;
    let goals: Vec<Goal> =
        serde_json::from_str(&raw).map_err(|err| format!("`{shown}` is not a goal list: {err}"))?;
    let token = encode(&goals).map_err(|err| err.to_string())?;
    println!("{token}");
    Ok(())
}

fn run_decode(input: &str) -> Result<(), String> {
    let result = if input.contains('#') {
        decode_share_url(input)
    } else {
        decode(input)
    };
    let goals = result.map_err(|err| format!("{}: {err}", err.kind()))?;
    let json = serde_json::to_string_pretty(&goals).map_err(|err| err.to_string())?;
    println!("{json}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command};
    use clap::Parser;
    use std::path::PathBuf;

    #[test]
    fn no_subcommand_runs_smoke_check() {
        let cli = Cli::try_parse_from(["zenith_cli"]).unwrap();
        assert_eq!(cli.command, None);
    }

    #[test]
    fn parses_encode_and_decode() {
        let cli = Cli::try_parse_from(["zenith_cli", "encode", "goals.json"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Command::Encode {
                path: PathBuf::from("goals.json")
            })
        );

        let cli =
            Cli::try_parse_from(["zenith_cli", "decode", "https://zenith.app/#data=abc"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Command::Decode {
                input: "https://zenith.app/#data=abc".to_string()
            })
        );
    }

    #[test]
    fn decode_without_input_is_rejected() {
        assert!(Cli::try_parse_from(["zenith_cli", "decode"]).is_err());
    }
}
