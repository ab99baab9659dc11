use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser};

pub const DEFAULT_TIMEOUT_SECS: i64 = 300;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct DaemonArgs {
    /// Increase verbosity, can be repeated
    #[arg(short = 'v', action = ArgAction::Count)]
    pub verbose: u8,
    /// Seconds without input before the machine counts as idle. A trailing `s` is accepted
    #[arg(short = 't', long, value_name = "timeout", default_value_t = DEFAULT_TIMEOUT_SECS, value_parser = parse_timeout)]
    pub timeout: i64,
    /// Command run through the shell when the machine becomes idle
    #[arg(value_name = "idle_cmd", value_parser = parse_command)]
    pub idle_cmd: String,
    /// Command run through the shell when the machine becomes active again
    #[arg(value_name = "wake_cmd")]
    pub wake_cmd: Option<String>,
    /// Shell used to run the commands
    #[arg(long, value_name = "PATH")]
    pub shell: Option<PathBuf>,
    /// Additionally write logs into daily rotated files in this directory
    #[arg(long = "log-dir", value_name = "DIR")]
    pub log_dir: Option<PathBuf>,
}

/// Parses a non-negative number of seconds, optionally followed by a single `s`.
pub fn parse_timeout(value: &str) -> Result<i64> {
    let digits = value.strip_suffix('s').unwrap_or(value);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        bail!("invalid digit found in {value:?}");
    }
    digits
        .parse::<i64>()
        .with_context(|| format!("{value:?} is out of range"))
}

/// Renders a parse error the way every other diagnostic is written, `<program>: <message>`.
pub fn usage_error_message(program: &str, error: &clap::Error) -> String {
    format!("{program}: {}", error.render())
}

fn parse_command(value: &str) -> Result<String> {
    if value.is_empty() {
        bail!("command must not be empty");
    }
    Ok(value.to_string())
}

#[cfg(test)]
mod tests {
    use clap::{error::ErrorKind, Parser};

    use super::{parse_timeout, usage_error_message, DaemonArgs, DEFAULT_TIMEOUT_SECS};

    #[test]
    fn test_parse_timeout() {
        assert_eq!(parse_timeout("0").unwrap(), 0);
        assert_eq!(parse_timeout("300").unwrap(), 300);
        assert_eq!(parse_timeout("45s").unwrap(), 45);
        assert_eq!(parse_timeout("9223372036854775807").unwrap(), i64::MAX);
    }

    #[test]
    fn test_parse_timeout_rejects_malformed() {
        for value in ["", "s", "abc", "10ss", "10m", "-5", "+5", " 5", "1.5", "9223372036854775808"] {
            assert!(parse_timeout(value).is_err(), "{value:?}");
        }
    }

    #[test]
    fn test_defaults() {
        let args = DaemonArgs::try_parse_from(["idlehook", "slock"]).unwrap();
        assert_eq!(args.timeout, DEFAULT_TIMEOUT_SECS);
        assert_eq!(args.verbose, 0);
        assert_eq!(args.idle_cmd, "slock");
        assert_eq!(args.wake_cmd, None);
    }

    #[test]
    fn test_full_invocation() {
        let args = DaemonArgs::try_parse_from([
            "idlehook",
            "-v",
            "-vv",
            "-t",
            "60s",
            "xset dpms force off",
            "notify-send back",
        ])
        .unwrap();
        assert_eq!(args.verbose, 3);
        assert_eq!(args.timeout, 60);
        assert_eq!(args.idle_cmd, "xset dpms force off");
        assert_eq!(args.wake_cmd.as_deref(), Some("notify-send back"));
    }

    #[test]
    fn test_usage_errors() {
        let cases: [&[&str]; 6] = [
            &["idlehook"],
            &["idlehook", ""],
            &["idlehook", "-t", "abc", "slock"],
            &["idlehook", "-t", "99999999999999999999", "slock"],
            &["idlehook", "-x", "slock"],
            &["idlehook", "slock", "wake", "extra"],
        ];
        for case in cases {
            let error = DaemonArgs::try_parse_from(case).unwrap_err();
            assert_ne!(error.kind(), ErrorKind::DisplayHelp, "{case:?}");
            assert_eq!(error.exit_code(), 2, "{case:?}");
        }
    }

    #[test]
    fn test_usage_error_carries_program_name() {
        let error = DaemonArgs::try_parse_from(["./idlehook"]).unwrap_err();
        assert_eq!(error.exit_code(), 2);
        let message = usage_error_message("./idlehook", &error);
        assert!(message.starts_with("./idlehook: error: "), "{message}");
        assert!(message.contains("<idle_cmd>"), "{message}");
        assert!(message.contains("Usage:"), "{message}");
    }
}
