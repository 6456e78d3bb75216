//! Command-line parsing for the `expiry_warden` binary.
//!
//! # Supported Commands
//!
//! ```text
//! expiry_warden            # one pass, same as `run`
//! expiry_warden run        # one pass, then exit
//! expiry_warden schedule   # run on `schedule.cron` until interrupted
//! expiry_warden help
//! ```

/// Parsed CLI command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Run a single warning pass
    Run,
    /// Stay resident and run on the cron schedule
    Schedule,
    /// Print usage
    Help,
    /// Unrecognised argument
    Unknown(String),
}

/// Usage text printed by `help` and on unknown commands.
pub const USAGE: &str = "\
Usage: expiry_warden [COMMAND]

Commands:
  run        Send expiration warnings once and exit (default)
  schedule   Send expiration warnings on the configured cron schedule
  help       Print this message";

/// Parse CLI arguments (including the program name at index 0).
pub fn parse_command(args: &[String]) -> Command {
    match args.get(1).map(String::as_str) {
        None | Some("run") => Command::Run,
        Some("schedule") => Command::Schedule,
        Some("help") | Some("--help") | Some("-h") => Command::Help,
        Some(other) => Command::Unknown(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn no_arguments_runs_once() {
        assert_eq!(parse_command(&args(&["expiry_warden"])), Command::Run);
        assert_eq!(parse_command(&[]), Command::Run);
    }

    #[test]
    fn known_commands() {
        assert_eq!(parse_command(&args(&["w", "run"])), Command::Run);
        assert_eq!(parse_command(&args(&["w", "schedule"])), Command::Schedule);
        assert_eq!(parse_command(&args(&["w", "--help"])), Command::Help);
    }

    #[test]
    fn unknown_command_is_reported() {
        assert_eq!(
            parse_command(&args(&["w", "purge"])),
            Command::Unknown("purge".to_string())
        );
    }
}
