use crate::simulation::ForcedScenario;
use euchre_core::model::call::{CallAction, CallRound};
use euchre_core::model::card::{Card, parse_cards};
use euchre_core::model::hand::ensure_distinct;
use euchre_core::model::player::PlayerPosition;
use euchre_core::model::round::HAND_SIZE;
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::Level;

const DEFAULT_TRIALS: usize = 10_000;
const DEFAULT_SEED: u64 = 20_240_601;
const DEFAULT_TRACE_PATH: &str = "bench/out/{run_id}/trace.jsonl";
const DEFAULT_OUTPUT_DIR: &str = "bench/out/{run_id}";
const RUN_ID_ALLOWED: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789._-";

/// Root batch configuration loaded from YAML.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct BatchConfig {
    pub run_id: String,
    pub trials: usize,
    pub seed: u64,
    pub parallel: bool,
    pub dealer: String,
    pub controlled: ControlledConfig,
    pub scenario: ScenarioConfig,
    pub include_round2: bool,
    pub trace: TraceConfig,
    pub logging: LoggingConfig,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            run_id: "forced_ev".to_string(),
            trials: DEFAULT_TRIALS,
            seed: DEFAULT_SEED,
            parallel: true,
            dealer: "west".to_string(),
            controlled: ControlledConfig::default(),
            scenario: ScenarioConfig::default(),
            include_round2: true,
            trace: TraceConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl BatchConfig {
    /// Load configuration from a YAML file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let path_buf = path.to_path_buf();
        let file = File::open(path).map_err(|source| ConfigError::Read {
            source,
            path: path_buf.clone(),
        })?;
        let reader = BufReader::new(file);
        let mut cfg: BatchConfig =
            serde_yaml::from_reader(reader).map_err(|source| ConfigError::Parse {
                source,
                path: path_buf.clone(),
            })?;
        cfg.validate().map_err(|source| ConfigError::Invalid {
            path: path_buf,
            source,
        })?;
        Ok(cfg)
    }

    /// Validate the configuration without performing I/O.
    pub fn validate(&mut self) -> Result<(), ValidationError> {
        validate_run_id(&self.run_id)?;
        if self.trials == 0 {
            return Err(ValidationError::InvalidField {
                field: "trials".to_string(),
                message: "number of trials must be greater than zero".to_string(),
            });
        }
        self.logging.validate()?;
        self.trace.validate(&self.run_id)?;
        self.dealer()?;
        self.forced_scenario()?;
        Ok(())
    }

    pub fn dealer(&self) -> Result<PlayerPosition, ValidationError> {
        parse_seat("dealer", &self.dealer)
    }

    /// The forced decision described by `controlled` and `scenario`.
    pub fn forced_scenario(&self) -> Result<ForcedScenario, ValidationError> {
        self.forced_scenario_with(self.scenario.round, &self.scenario.action)
    }

    /// Same controlled seat and cards, but a different forced round/action.
    pub fn forced_scenario_with(
        &self,
        round: u8,
        action: &str,
    ) -> Result<ForcedScenario, ValidationError> {
        let controlled = parse_seat("controlled.seat", &self.controlled.seat)?;
        let round = CallRound::from_number(round).ok_or_else(|| ValidationError::InvalidField {
            field: "scenario.round".to_string(),
            message: format!("round must be 1 or 2, got {round}"),
        })?;
        let action: CallAction = action.parse().map_err(|err| ValidationError::InvalidField {
            field: "scenario.action".to_string(),
            message: format!("{err}"),
        })?;
        if !action.allowed_in(round) {
            return Err(ValidationError::InvalidField {
                field: "scenario.action".to_string(),
                message: format!("{action} is not a round {} action", round.number()),
            });
        }

        let hand = match self.controlled.hand.as_deref() {
            Some(text) => {
                let cards = parse_card_list("controlled.hand", text)?;
                if cards.len() != HAND_SIZE {
                    return Err(ValidationError::InvalidField {
                        field: "controlled.hand".to_string(),
                        message: format!("expected {HAND_SIZE} cards but got {}", cards.len()),
                    });
                }
                Some(cards)
            }
            None => None,
        };
        let up_card = parse_optional_card("controlled.up_card", self.controlled.up_card.as_deref())?;
        if let (Some(hand), Some(up)) = (hand.as_ref(), up_card) {
            if hand.contains(&up) {
                return Err(ValidationError::InvalidField {
                    field: "controlled.up_card".to_string(),
                    message: format!("{up} is also in the controlled hand"),
                });
            }
        }
        let lead_card =
            parse_optional_card("controlled.lead_card", self.controlled.lead_card.as_deref())?;

        Ok(ForcedScenario {
            controlled,
            round,
            action,
            going_alone: self.controlled.going_alone,
            hand,
            up_card,
            lead_card,
        })
    }

    /// Trace file with `{run_id}` resolved, `None` when tracing is off.
    pub fn resolved_trace_path(&self) -> Option<PathBuf> {
        self.trace
            .enabled
            .then(|| resolve_template(&self.run_id, &self.trace.path))
    }

    pub fn resolved_output_dir(&self) -> PathBuf {
        resolve_template(&self.run_id, &self.logging.output_dir)
    }
}

/// The seat whose decision is forced, and the cards pinned for it.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ControlledConfig {
    pub seat: String,
    /// Comma-separated, e.g. `"J of spades, K of spades, ..."`.
    pub hand: Option<String>,
    pub up_card: Option<String>,
    pub going_alone: bool,
    pub lead_card: Option<String>,
}

impl Default for ControlledConfig {
    fn default() -> Self {
        Self {
            seat: "north".to_string(),
            hand: None,
            up_card: None,
            going_alone: false,
            lead_card: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScenarioConfig {
    pub round: u8,
    pub action: String,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            round: 1,
            action: "order_up".to_string(),
        }
    }
}

/// Per-hand JSONL trace output.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct TraceConfig {
    pub enabled: bool,
    pub path: String,
    pub flush_each_hand: bool,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            path: DEFAULT_TRACE_PATH.to_string(),
            flush_each_hand: false,
        }
    }
}

impl TraceConfig {
    fn validate(&self, run_id: &str) -> Result<(), ValidationError> {
        if !self.enabled {
            return Ok(());
        }
        if self.path.trim().is_empty() {
            return Err(ValidationError::InvalidField {
                field: "trace.path".to_string(),
                message: "path must not be empty".to_string(),
            });
        }
        let resolved = resolve_template(run_id, &self.path);
        if resolved.components().count() == 0 {
            return Err(ValidationError::InvalidField {
                field: "trace.path".to_string(),
                message: "resolved path is invalid".to_string(),
            });
        }
        Ok(())
    }
}

/// Logging configuration defaults to disabled structured logs.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    pub enable_structured: bool,
    pub tracing_level: String,
    pub output_dir: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enable_structured: false,
            tracing_level: default_tracing_level(),
            output_dir: DEFAULT_OUTPUT_DIR.to_string(),
        }
    }
}

impl LoggingConfig {
    fn validate(&mut self) -> Result<(), ValidationError> {
        if self.tracing_level.trim().is_empty() {
            self.tracing_level = default_tracing_level();
        }
        if self.output_dir.trim().is_empty() {
            self.output_dir = DEFAULT_OUTPUT_DIR.to_string();
        }
        if self.level().is_none() {
            return Err(ValidationError::InvalidField {
                field: "logging.tracing_level".to_string(),
                message: format!(
                    "unknown level '{}', expected trace, debug, info, warn or error",
                    self.tracing_level
                ),
            });
        }
        Ok(())
    }

    pub fn level(&self) -> Option<Level> {
        match self.tracing_level.to_ascii_lowercase().as_str() {
            "trace" => Some(Level::TRACE),
            "debug" => Some(Level::DEBUG),
            "info" => Some(Level::INFO),
            "warn" | "warning" => Some(Level::WARN),
            "error" => Some(Level::ERROR),
            _ => None,
        }
    }
}

fn default_tracing_level() -> String {
    "info".to_string()
}

fn validate_run_id(run_id: &str) -> Result<(), ValidationError> {
    if run_id.trim().is_empty() {
        return Err(ValidationError::InvalidField {
            field: "run_id".to_string(),
            message: "run_id must not be empty".to_string(),
        });
    }

    if !run_id.chars().all(|c| RUN_ID_ALLOWED.contains(c)) {
        return Err(ValidationError::InvalidField {
            field: "run_id".to_string(),
            message: "run_id may only contain alphanumeric characters, '.', '_' or '-'".to_string(),
        });
    }

    Ok(())
}

fn parse_seat(field: &str, text: &str) -> Result<PlayerPosition, ValidationError> {
    text.parse().map_err(|err| ValidationError::InvalidField {
        field: field.to_string(),
        message: format!("{err}"),
    })
}

fn parse_card_list(field: &str, text: &str) -> Result<Vec<Card>, ValidationError> {
    let cards = parse_cards(text).map_err(|err| ValidationError::InvalidField {
        field: field.to_string(),
        message: format!("{err}"),
    })?;
    ensure_distinct(&cards).map_err(|err| ValidationError::InvalidField {
        field: field.to_string(),
        message: format!("{err}"),
    })?;
    Ok(cards)
}

fn parse_optional_card(field: &str, text: Option<&str>) -> Result<Option<Card>, ValidationError> {
    text.map(|text| {
        text.parse().map_err(|err| ValidationError::InvalidField {
            field: field.to_string(),
            message: format!("{err}"),
        })
    })
    .transpose()
}

fn resolve_template(run_id: &str, template: &str) -> PathBuf {
    let replaced = template.replace("{run_id}", run_id);
    PathBuf::from(replaced)
}

/// Errors surfaced when loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        #[source]
        source: serde_yaml::Error,
        path: PathBuf,
    },
    #[error("invalid configuration in {path:?}: {source}")]
    Invalid {
        path: PathBuf,
        source: ValidationError,
    },
}

impl ConfigError {
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Read { path, .. }
            | ConfigError::Parse { path, .. }
            | ConfigError::Invalid { path, .. } => path.as_path(),
        }
    }
}

/// Validation failures captured with contextual metadata.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{field}: {message}")]
    InvalidField { field: String, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use euchre_core::model::rank::Rank;
    use euchre_core::model::suit::Suit;

    const BASIC_YAML: &str = r#"
run_id: "spades_bowers"
trials: 2000
seed: 99
controlled:
  seat: "west"
  hand: "J of spades, K of spades, J of hearts, 10 of diamonds, 9 of diamonds"
  up_card: "9 of clubs"
  going_alone: false
scenario:
  round: 2
  action: "next"
trace:
  enabled: true
  path: "bench/out/{run_id}/trace.jsonl"
logging:
  enable_structured: true
  tracing_level: "debug"
"#;

    #[test]
    fn loads_and_validates_basic_config() {
        let mut cfg: BatchConfig = serde_yaml::from_str(BASIC_YAML).expect("parse yaml");
        cfg.validate().expect("validate");

        assert_eq!(cfg.trials, 2000);
        assert!(cfg.parallel);
        assert!(cfg.include_round2);
        assert_eq!(cfg.dealer().unwrap(), PlayerPosition::West);
        assert_eq!(cfg.logging.level(), Some(Level::DEBUG));

        let scenario = cfg.forced_scenario().unwrap();
        assert_eq!(scenario.controlled, PlayerPosition::West);
        assert_eq!(scenario.round, CallRound::Two);
        assert_eq!(scenario.action, CallAction::Next);
        assert_eq!(scenario.up_card, Some(Card::new(Rank::Nine, Suit::Clubs)));
        assert_eq!(scenario.hand.as_ref().map(Vec::len), Some(5));

        assert_eq!(
            cfg.resolved_trace_path(),
            Some(PathBuf::from("bench/out/spades_bowers/trace.jsonl"))
        );
        assert_eq!(
            cfg.resolved_output_dir(),
            PathBuf::from("bench/out/spades_bowers")
        );
    }

    #[test]
    fn empty_document_uses_defaults() {
        let mut cfg: BatchConfig = serde_yaml::from_str("{}").expect("parse");
        cfg.validate().expect("defaults are valid");
        assert_eq!(cfg, {
            let mut defaults = BatchConfig::default();
            defaults.validate().unwrap();
            defaults
        });
        assert_eq!(cfg.resolved_trace_path(), None);
    }

    #[test]
    fn rejects_unknown_action() {
        let yaml = BASIC_YAML.replace("action: \"next\"", "action: \"shoot\"");
        let mut cfg: BatchConfig = serde_yaml::from_str(&yaml).expect("parse");
        let err = cfg.validate().expect_err("unknown action");
        assert!(matches!(
            err,
            ValidationError::InvalidField { field, .. } if field == "scenario.action"
        ));
    }

    #[test]
    fn rejects_unknown_tracing_level() {
        let yaml = BASIC_YAML.replace("tracing_level: \"debug\"", "tracing_level: \"verbose\"");
        let mut cfg: BatchConfig = serde_yaml::from_str(&yaml).expect("parse");
        let err = cfg.validate().expect_err("unknown level");
        assert!(matches!(
            err,
            ValidationError::InvalidField { field, .. } if field == "logging.tracing_level"
        ));
    }

    #[test]
    fn rejects_action_from_the_wrong_round() {
        let yaml = BASIC_YAML.replace("round: 2", "round: 1");
        let mut cfg: BatchConfig = serde_yaml::from_str(&yaml).expect("parse");
        let err = cfg.validate().expect_err("next is a round 2 action");
        assert!(matches!(
            err,
            ValidationError::InvalidField { field, .. } if field == "scenario.action"
        ));
    }

    #[test]
    fn rejects_up_card_inside_forced_hand() {
        let yaml = BASIC_YAML.replace("up_card: \"9 of clubs\"", "up_card: \"9 of diamonds\"");
        let mut cfg: BatchConfig = serde_yaml::from_str(&yaml).expect("parse");
        let err = cfg.validate().expect_err("overlapping up-card");
        assert!(matches!(
            err,
            ValidationError::InvalidField { field, .. } if field == "controlled.up_card"
        ));
    }

    #[test]
    fn rejects_short_hand() {
        let yaml = BASIC_YAML.replace(", 9 of diamonds\"", "\"");
        let mut cfg: BatchConfig = serde_yaml::from_str(&yaml).expect("parse");
        let err = cfg.validate().expect_err("four cards");
        assert!(matches!(
            err,
            ValidationError::InvalidField { field, .. } if field == "controlled.hand"
        ));
    }

    #[test]
    fn rejects_invalid_run_id() {
        let yaml = BASIC_YAML.replace("spades_bowers", "spades bowers");
        let mut cfg: BatchConfig = serde_yaml::from_str(&yaml).expect("parse");
        let err = cfg.validate().expect_err("invalid run id");
        assert!(matches!(
            err,
            ValidationError::InvalidField { field, .. } if field == "run_id"
        ));
    }

    #[test]
    fn trace_path_resolves_every_placeholder() {
        let yaml = BASIC_YAML.replace(
            "bench/out/{run_id}/trace.jsonl",
            "bench/out/{run_id}/{run_id}.jsonl",
        );
        let mut cfg: BatchConfig = serde_yaml::from_str(&yaml).expect("parse");
        cfg.validate().expect("valid");
        assert_eq!(
            cfg.resolved_trace_path(),
            Some(PathBuf::from("bench/out/spades_bowers/spades_bowers.jsonl"))
        );
    }
}
