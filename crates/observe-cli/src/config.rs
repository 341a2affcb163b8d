//! TOML configuration for `dialogue-observe`.

use observe_core::{Error, Result};
use observe_dialogue::{
    Cast, DEFAULT_COMMENTARY_FREQUENCY, DEFAULT_HISTORY_LIMIT, FailurePolicy, Participant, prompts,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Directory name under the platform config dir.
pub const PROJECT_NAME: &str = "dialogue-observe";

/// Full configuration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ObserveConfig {
    /// Model server settings
    pub endpoint: EndpointConfig,
    /// Round settings
    pub dialogue: DialogueConfig,
    /// The three seats
    pub participants: ParticipantsConfig,
    /// Where results go
    pub output: OutputConfig,
}

/// `[endpoint]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    /// Root URL of the OpenAI-compatible server
    pub base_url: String,
    /// Bearer token, if the server wants one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Per-request timeout
    pub timeout_secs: u64,
    /// Retries for transient failures
    pub max_retries: usize,
    /// First backoff delay
    pub retry_delay_ms: u64,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:1234".to_string(),
            api_key: None,
            timeout_secs: 120,
            max_retries: 3,
            retry_delay_ms: 500,
        }
    }
}

/// `[dialogue]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DialogueConfig {
    /// Opening topic
    pub topic: String,
    /// Rounds to play
    pub rounds: u32,
    /// Comment every N rounds
    pub commentary_frequency: u32,
    /// Pause between rounds
    pub pace_ms: u64,
    /// Exchanges each participant remembers
    pub history_limit: usize,
    /// `continue` or `abort`
    pub on_error: FailurePolicy,
}

impl Default for DialogueConfig {
    fn default() -> Self {
        Self {
            topic: prompts::DEFAULT_TOPIC.to_string(),
            rounds: 6,
            commentary_frequency: DEFAULT_COMMENTARY_FREQUENCY,
            pace_ms: 1000,
            history_limit: DEFAULT_HISTORY_LIMIT,
            on_error: FailurePolicy::Continue,
        }
    }
}

/// `[participants]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticipantsConfig {
    /// Opens each round
    pub model_a: ParticipantConfig,
    /// Answers model A
    pub model_b: ParticipantConfig,
    /// Comments on the exchange
    pub commentator: ParticipantConfig,
}

impl Default for ParticipantsConfig {
    fn default() -> Self {
        Self {
            model_a: ParticipantConfig::new(
                "Philosopher",
                "qwen3-30b-a3b",
                prompts::PHILOSOPHER_PROMPT,
            ),
            model_b: ParticipantConfig::new(
                "Analyst",
                "gemma-3-27b-it-qat",
                prompts::ANALYST_PROMPT,
            ),
            commentator: ParticipantConfig::new(
                "Observer",
                "deepseek-r1-distill-qwen-7b",
                prompts::OBSERVER_PROMPT,
            ),
        }
    }
}

/// One seat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipantConfig {
    /// Display name
    pub name: String,
    /// Model identifier on the server
    pub model: String,
    /// Persona
    #[serde(default)]
    pub system_prompt: String,
    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    /// Reply length cap
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

fn default_temperature() -> f64 {
    0.7
}

fn default_max_tokens() -> u32 {
    observe_core::llm::DEFAULT_MAX_TOKENS
}

impl ParticipantConfig {
    fn new(name: &str, model: &str, system_prompt: &str) -> Self {
        Self {
            name: name.to_string(),
            model: model.to_string(),
            system_prompt: system_prompt.to_string(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
        }
    }

    /// Builds the participant for this seat.
    pub fn to_participant(&self, history_limit: usize) -> Participant {
        Participant::new(&self.name, &self.model)
            .with_system_prompt(&self.system_prompt)
            .with_temperature(self.temperature as f32)
            .with_max_tokens(self.max_tokens)
            .with_history_limit(history_limit)
    }

    fn validate(&self, seat: &str) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::validation_field(
                format!("participants.{seat}.name"),
                "must not be empty",
            ));
        }
        if self.model.trim().is_empty() {
            return Err(Error::validation_field(
                format!("participants.{seat}.model"),
                "must not be empty",
            ));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(Error::validation_field(
                format!("participants.{seat}.temperature"),
                format!("must be between 0 and 2, got {}", self.temperature),
            ));
        }
        if self.max_tokens == 0 {
            return Err(Error::validation_field(
                format!("participants.{seat}.max_tokens"),
                "must be at least 1",
            ));
        }
        Ok(())
    }
}

/// `[output]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct OutputConfig {
    /// Transcript file (`.md` for Markdown, anything else for JSON)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transcript: Option<PathBuf>,
}

impl ObserveConfig {
    /// Platform default location of the config file.
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(PROJECT_NAME).join("config.toml"))
    }

    /// Explicit path if given, otherwise the platform default.
    pub fn resolve_config_path(explicit: Option<&str>) -> Option<PathBuf> {
        explicit
            .map(PathBuf::from)
            .or_else(Self::default_config_path)
    }

    /// Loads the configuration.
    ///
    /// An explicit path must exist. A missing default file yields the
    /// built-in defaults.
    pub fn load(explicit: Option<&str>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_file(Path::new(path)),
            None => match Self::default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path),
                _ => {
                    tracing::debug!("No config file found, using defaults");
                    Ok(Self::default())
                }
            },
        }
    }

    /// Parses a config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("Failed to read {}: {e}", path.display()))
        })?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| Error::config(format!("Failed to parse {}: {e}", path.display())))?;
        tracing::debug!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    /// Serializes to pretty TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::config(e.to_string()))
    }

    /// Checks values the orchestrator cannot check for itself.
    pub fn validate(&self) -> Result<()> {
        if self.endpoint.base_url.trim().is_empty() {
            return Err(Error::validation_field("endpoint.base_url", "must not be empty"));
        }
        if self.endpoint.timeout_secs == 0 {
            return Err(Error::validation_field(
                "endpoint.timeout_secs",
                "must be at least 1",
            ));
        }
        self.participants.model_a.validate("model_a")?;
        self.participants.model_b.validate("model_b")?;
        self.participants.commentator.validate("commentator")?;
        Ok(())
    }

    /// Seats the configured participants.
    pub fn cast(&self) -> Cast {
        let limit = self.dialogue.history_limit;
        Cast::new(
            self.participants.model_a.to_participant(limit),
            self.participants.model_b.to_participant(limit),
            self.participants.commentator.to_participant(limit),
        )
    }
}
