use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use keycode_core::KeycodeConfig;
use keycode_log::{RedactingMakeWriter, SecureLogger};
use keycode_policy::{PolicyGate, WhitelistKind};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser, Debug)]
#[command(name = "keycode", version, about = "Keycode policy gate CLI")]
struct Cli {
    /// Path to the YAML configuration file. Fail-safe defaults apply when absent.
    #[arg(long, env = "KEYCODE_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Override `security.dry_run` from the configuration file.
    #[arg(long, global = true)]
    dry_run: Option<bool>,

    /// Override `security.require_confirm` from the configuration file.
    #[arg(long, global = true)]
    require_confirm: Option<bool>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Decide whether a state-mutating tool call may run.
    Check {
        /// Namespaced tool id, e.g. "git.commit"
        tool: String,

        /// Tool arguments as a JSON document
        #[arg(long, default_value = "{}")]
        args: String,

        /// Caller confirmation
        #[arg(long, default_value_t = false)]
        confirm: bool,
    },

    /// Check an identifier against the configured whitelist.
    Whitelist {
        /// Identifier category: repo, org or branch
        kind: WhitelistKind,

        /// Identifier to check, e.g. "owner/repo" or "sandbox-feature"
        value: String,
    },

    /// Redact credential-shaped content. Reads stdin line by line without TEXT.
    Mask {
        text: Option<String>,
    },

    /// Print the effective configuration as YAML.
    Config,

    /// Run a JSON Lines script of tool invocations through the gate.
    Replay {
        /// Script path. Each line: {"tool", "caller", "args", "confirm", "targets"?, "outcome"?}
        file: PathBuf,

        /// Number of audit entries to print (configured default when absent)
        #[arg(long)]
        recent: Option<usize>,
    },
}

impl Cli {
    /// Load the configuration file (or defaults) and apply flag overrides.
    fn load_config(&self) -> Result<KeycodeConfig> {
        let mut config = match &self.config {
            Some(path) => KeycodeConfig::from_file(path)
                .with_context(|| format!("Failed to load configuration from {:?}", path))?,
            None => KeycodeConfig::default(),
        };

        if let Some(dry_run) = self.dry_run {
            config.security.dry_run = dry_run;
        }
        if let Some(require_confirm) = self.require_confirm {
            config.security.require_confirm = require_confirm;
        }

        Ok(config)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let logger = SecureLogger::new();

    match run(cli, &logger) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            logger.error(&format!("{:#}", e), None);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli, logger: &SecureLogger) -> Result<()> {
    let config = cli.load_config()?;
    init_tracing(&config);

    match cli.cmd {
        Command::Mask { text } => commands::mask::run(text.as_deref()),
        Command::Config => commands::config::run(&config),
        Command::Check { tool, args, confirm } => {
            let gate = PolicyGate::from_config(&config);
            commands::check::run(&gate, &tool, &args, confirm)
        }
        Command::Whitelist { kind, value } => {
            let gate = PolicyGate::from_config(&config);
            commands::whitelist::run(&gate, kind, &value)
        }
        Command::Replay { file, recent } => {
            let gate = PolicyGate::from_config(&config);
            commands::replay::run(&gate, logger, &file, recent)
        }
    }
}

/// Install the diagnostic subscriber. `RUST_LOG` wins over `logging.filter`.
fn init_tracing(config: &KeycodeConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(RedactingMakeWriter::stderr())
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("keycode").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults_without_config() {
        let cli = parse(&["config"]);
        // KEYCODE_CONFIG may be set in the environment running the tests
        if cli.config.is_none() {
            let config = cli.load_config().unwrap();
            assert!(config.security.dry_run);
            assert!(config.security.require_confirm);
        }
    }

    #[test]
    fn test_flag_overrides_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "security:\n  dry_run: true\n  require_confirm: true").unwrap();
        let path = file.path().to_str().unwrap();

        let cli = parse(&["--config", path, "--dry-run", "false", "check", "git.commit"]);
        let config = cli.load_config().unwrap();
        assert!(!config.security.dry_run);
        assert!(config.security.require_confirm);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = parse(&["check", "git.commit", "--confirm", "--require-confirm", "false"]);
        assert_eq!(cli.require_confirm, Some(false));
        match cli.cmd {
            Command::Check { tool, confirm, args } => {
                assert_eq!(tool, "git.commit");
                assert!(confirm);
                assert_eq!(args, "{}");
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_whitelist_kind_parsed() {
        let cli = parse(&["whitelist", "branch", "sandbox-x"]);
        assert!(matches!(
            cli.cmd,
            Command::Whitelist { kind: WhitelistKind::Branch, .. }
        ));
        assert!(Cli::try_parse_from(["keycode", "whitelist", "tag", "v1"]).is_err());
    }

    #[test]
    fn test_missing_config_file_is_error() {
        let cli = parse(&["--config", "/nonexistent/keycode.yaml", "config"]);
        let err = cli.load_config().unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to load configuration"));
    }
}
