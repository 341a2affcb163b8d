//! Command-line arguments.

use clap::{Args, Parser, Subcommand};
use observe_dialogue::FailurePolicy;
use std::path::PathBuf;

use crate::config::ObserveConfig;

/// Watch two local models talk while a third one comments
#[derive(Parser, Debug)]
#[command(name = "dialogue-observe", author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "OBSERVE_CONFIG")]
    pub config: Option<String>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a dialogue and print it as it happens
    Run(RunArgs),
    /// List the models the server has loaded
    Models {
        /// Server base URL (overrides config)
        #[arg(long, env = "OBSERVE_BASE_URL")]
        base_url: Option<String>,
    },
    /// Inspect or edit the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Overrides accepted by `run`.
#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Opening topic
    #[arg(short, long)]
    pub topic: Option<String>,

    /// Number of rounds
    #[arg(short, long)]
    pub rounds: Option<u32>,

    /// Comment every N rounds
    #[arg(long = "commentary-every")]
    pub commentary_every: Option<u32>,

    /// Server base URL
    #[arg(long, env = "OBSERVE_BASE_URL")]
    pub base_url: Option<String>,

    /// Bearer token for servers that want one
    #[arg(long, env = "OBSERVE_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Pause between rounds in milliseconds
    #[arg(long)]
    pub pace_ms: Option<u64>,

    /// Write the transcript here (.json or .md)
    #[arg(long)]
    pub transcript: Option<PathBuf>,

    /// Stop at the first failed turn
    #[arg(long)]
    pub abort_on_error: bool,

    /// Use a canned provider instead of a server
    #[arg(long)]
    pub mock: bool,
}

impl RunArgs {
    /// Layers the flags that were given on top of `config`.
    pub fn apply(&self, config: &mut ObserveConfig) {
        if let Some(topic) = &self.topic {
            config.dialogue.topic.clone_from(topic);
        }
        if let Some(rounds) = self.rounds {
            config.dialogue.rounds = rounds;
        }
        if let Some(every) = self.commentary_every {
            config.dialogue.commentary_frequency = every;
        }
        if let Some(url) = &self.base_url {
            config.endpoint.base_url.clone_from(url);
        }
        if let Some(key) = &self.api_key {
            config.endpoint.api_key = Some(key.clone());
        }
        if let Some(pace) = self.pace_ms {
            config.dialogue.pace_ms = pace;
        }
        if let Some(path) = &self.transcript {
            config.output.transcript = Some(path.clone());
        }
        if self.abort_on_error {
            config.dialogue.on_error = FailurePolicy::Abort;
        }
    }
}

/// `config` subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the config file path
    Path,
    /// Print a value by dotted key
    Get {
        /// Dotted key, e.g. `participants.model_a.model`
        key: String,
    },
    /// Set a value by dotted key
    Set {
        /// Dotted key
        key: String,
        /// New value
        value: String,
    },
    /// Write a default config file
    Init {
        /// Where to write it (defaults to the platform config dir)
        #[arg(long)]
        file: Option<String>,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Print the effective configuration
    Show,
}
