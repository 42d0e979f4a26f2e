//! Command-line interface definition using clap.
//!
//! This module defines:
//! - [`Args`] - top-level CLI structure (for use with clap)
//! - [`Command`] - the `scan` / `extract` / `transcript` subcommands
//!
//! The hint and privacy value types come from the library
//! ([`TypeHint`](crate::extract::TypeHint), [`PrivacyLevel`](crate::privacy::PrivacyLevel))
//! so they stay usable outside of CLI context.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::extract::TypeHint;
use crate::privacy::PrivacyLevel;

/// Extract, unify and anonymize WeChat and QQ chat exports.
#[derive(Parser, Debug, Clone)]
#[command(name = "chatunify")]
#[command(version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    chatunify scan
    chatunify scan --privacy advanced
    chatunify extract wechat_chat.txt qq_chat.txt -o unified.json
    chatunify extract chat.txt --type wechat --privacy advanced
    chatunify extract wx.txt qq.txt --type wechat --type qq
    chatunify extract chat.txt --after 2024-01-01 --from Alice
    chatunify transcript unified.json")]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

/// The operations the CLI exposes.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Discover WeChat and QQ accounts on this machine
    Scan {
        /// Privacy level applied to the listing
        #[arg(long, value_name = "LEVEL", default_value = "basic")]
        privacy: PrivacyLevel,

        /// Write the scan result as JSON to this path
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Extract and unify messages from one or more export files
    Extract {
        /// Paths to export files
        #[arg(required = true, value_name = "FILE")]
        inputs: Vec<PathBuf>,

        /// Platform hint: give one to apply it to every input, or repeat
        /// the flag to pair hints with inputs in order; omit to auto-detect
        #[arg(long = "type", value_name = "HINT")]
        hints: Vec<TypeHint>,

        /// Privacy level for the output
        #[arg(long, value_name = "LEVEL", default_value = "basic")]
        privacy: PrivacyLevel,

        /// Path for the unified JSON output
        #[arg(short, long, default_value = "unified_chat.json")]
        output: PathBuf,

        /// Keep only messages on or after this date (YYYY-MM-DD)
        #[arg(long, value_name = "DATE")]
        after: Option<String>,

        /// Keep only messages on or before this date (YYYY-MM-DD)
        #[arg(long, value_name = "DATE")]
        before: Option<String>,

        /// Keep only messages from this sender (case-insensitive)
        #[arg(long, value_name = "USER")]
        from: Option<String>,

        /// Print the extraction report after writing
        #[arg(long)]
        report: bool,
    },

    /// Flatten a unified export into a plain-text transcript
    Transcript {
        /// Path to a unified JSON export
        input: PathBuf,

        /// Write the transcript here instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_defaults() {
        let args = Args::parse_from(["chatunify", "extract", "chat.txt"]);
        match args.command {
            Command::Extract {
                inputs,
                hints,
                privacy,
                output,
                report,
                ..
            } => {
                assert_eq!(inputs, vec![PathBuf::from("chat.txt")]);
                assert!(hints.is_empty());
                assert_eq!(privacy, PrivacyLevel::Basic);
                assert_eq!(output, PathBuf::from("unified_chat.json"));
                assert!(!report);
            }
            _ => panic!("expected extract subcommand"),
        }
    }

    #[test]
    fn test_scan_privacy_value() {
        let args = Args::parse_from(["chatunify", "scan", "--privacy", "advanced"]);
        match args.command {
            Command::Scan { privacy, .. } => assert_eq!(privacy, PrivacyLevel::Advanced),
            _ => panic!("expected scan subcommand"),
        }
    }

    #[test]
    fn test_type_hint_alias() {
        let args = Args::parse_from(["chatunify", "extract", "a.txt", "--type", "wx"]);
        match args.command {
            Command::Extract { hints, .. } => assert_eq!(hints, vec![TypeHint::WeChat]),
            _ => panic!("expected extract subcommand"),
        }
    }

    #[test]
    fn test_repeated_type_hints_collect_in_order() {
        let args = Args::parse_from([
            "chatunify", "extract", "a.txt", "b.txt", "--type", "wechat", "--type", "qq",
        ]);
        match args.command {
            Command::Extract { hints, .. } => {
                assert_eq!(hints, vec![TypeHint::WeChat, TypeHint::Qq]);
            }
            _ => panic!("expected extract subcommand"),
        }
    }
}
