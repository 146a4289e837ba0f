use std::time::Duration;

use config::ConfigError;
use serde::Deserialize;
use serde_aux::prelude::deserialize_number_from_string;

#[derive(Deserialize, Clone, Debug)]
pub struct Config {
    pub application: ApplicationSettings,
    pub allow_cors: bool,
    pub game: GameSettings,
    pub room: RoomSettings,
    pub websocket: WebsocketSettings,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ApplicationSettings {
    pub host: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
}

#[derive(Deserialize, Clone, Debug)]
pub struct GameSettings {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub round_duration_seconds: u64,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub score_per_correct_guess: u32,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub minimum_players: usize,
    pub words_file: String,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            round_duration_seconds: 60,
            score_per_correct_guess: 100,
            minimum_players: 2,
            words_file: "words/en.txt".to_string(),
        }
    }
}

#[derive(Deserialize, Clone, Debug)]
pub struct RoomSettings {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub code_length: usize,
}

#[derive(Deserialize, Clone, Debug)]
pub struct WebsocketSettings {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub inactivity_timeout_seconds: u64,
}

impl WebsocketSettings {
    pub fn inactivity_timeout(&self) -> Duration {
        Duration::from_secs(self.inactivity_timeout_seconds)
    }
}

impl Config {
    /// Reads `config/base.yaml`, then `config/{ENVIRONMENT}.yaml`, then `APP__*` variables
    /// (e.g. `APP__GAME__ROUND_DURATION_SECONDS=30`).
    pub fn get() -> Result<Config, ConfigError> {
        let base_path = std::env::current_dir().map_err(|error| {
            ConfigError::Message(format!(
                "Failed to determine the current directory. Error: '{error}'."
            ))
        })?;
        let configuration_directory = base_path.join("config");

        let environment: Environment = std::env::var("ENVIRONMENT")
            .map_err(|_| ConfigError::NotFound("ENVIRONMENT".to_string()))?
            .try_into()
            .map_err(ConfigError::Message)?;

        let environment_filename = format!("{}.yaml", environment.as_str());

        let config = config::Config::builder()
            .add_source(config::File::from(
                configuration_directory.join("base.yaml"),
            ))
            .add_source(config::File::from(
                configuration_directory.join(environment_filename),
            ))
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .build()?;

        config.try_deserialize::<Config>()
    }
}

enum Environment {
    Dev,
    Prod,
}

const DEV: &str = "dev";
const PROD: &str = "prod";

impl Environment {
    fn as_str(&self) -> &'static str {
        match self {
            Environment::Dev => DEV,
            Environment::Prod => PROD,
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(string: String) -> Result<Self, Self::Error> {
        match string.to_lowercase().as_str() {
            DEV => Ok(Self::Dev),
            PROD => Ok(Self::Prod),
            other => Err(format!(
                "{other} is not a supported environment. Use either `{DEV}` or `{PROD}`.",
            )),
        }
    }
}
