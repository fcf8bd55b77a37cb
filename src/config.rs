use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::ai::{Difficulty, FirstColumn, RandomTieBreak, TieBreak};
use crate::error::{BoardError, ConfigError};
use crate::game::{COLS, MAX_SIDE, MIN_SIDE, ROWS};
use crate::session::{GameMode, Session, SessionConfig};

/// Board size, mode, difficulty and player names.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub rows: usize,
    pub cols: usize,
    pub mode: GameMode,
    pub difficulty: Difficulty,
    pub player_one: String,
    /// Ignored in one-player mode, where the second seat is the AI.
    pub player_two: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            rows: ROWS,
            cols: COLS,
            mode: GameMode::OnePlayer,
            difficulty: Difficulty::Medium,
            player_one: "Player 1".to_string(),
            player_two: "Player 2".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TieBreakPolicy {
    /// Uniform random choice among the candidate columns.
    #[default]
    Random,
    /// Leftmost candidate; fully deterministic play.
    First,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub tie_break: TieBreakPolicy,
    /// Fixed seed for the random tie-break. Unset means seeded from the OS.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

/// Top-level application configuration, loadable from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub game: GameConfig,
    pub search: SearchConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the file
    /// does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            warn!(path = %path.display(), "config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let supported = MIN_SIDE..=MAX_SIDE;
        if !supported.contains(&self.game.rows) {
            return Err(ConfigError::Validation(format!(
                "game.rows must be in {MIN_SIDE}..={MAX_SIDE}"
            )));
        }
        if !supported.contains(&self.game.cols) {
            return Err(ConfigError::Validation(format!(
                "game.cols must be in {MIN_SIDE}..={MAX_SIDE}"
            )));
        }
        if self.game.player_one.trim().is_empty() {
            return Err(ConfigError::Validation(
                "game.player_one must not be empty".into(),
            ));
        }
        if self.game.mode == GameMode::TwoPlayer && self.game.player_two.trim().is_empty() {
            return Err(ConfigError::Validation(
                "game.player_two must not be empty".into(),
            ));
        }
        if self.search.seed.is_some() && self.search.tie_break == TieBreakPolicy::First {
            return Err(ConfigError::Validation(
                "search.seed only applies to the random tie-break".into(),
            ));
        }

        Ok(())
    }

    /// Session configuration for the `[game]` table.
    pub fn session_config(&self) -> SessionConfig {
        match self.game.mode {
            GameMode::OnePlayer => {
                SessionConfig::one_player(self.game.player_one.clone(), self.game.difficulty)
            }
            GameMode::TwoPlayer => SessionConfig {
                difficulty: self.game.difficulty,
                ..SessionConfig::two_player(
                    self.game.player_one.clone(),
                    self.game.player_two.clone(),
                )
            },
        }
    }

    pub fn new_session(&self) -> Result<Session, BoardError> {
        Session::with_config(self.game.rows, self.game.cols, self.session_config())
    }

    pub fn tie_breaker(&self) -> Box<dyn TieBreak> {
        match (self.search.tie_break, self.search.seed) {
            (TieBreakPolicy::First, _) => Box::new(FirstColumn),
            (TieBreakPolicy::Random, Some(seed)) => Box::new(RandomTieBreak::seeded(seed)),
            (TieBreakPolicy::Random, None) => Box::new(RandomTieBreak::new()),
        }
    }

    /// Generate a TOML string with all default values (useful for creating
    /// example config files).
    pub fn default_toml() -> String {
        toml::to_string_pretty(&AppConfig::default()).expect("default config serializes")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        config.validate().expect("default config should be valid");
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let toml_str = r#"
[game]
difficulty = "hard"
"#;
        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.game.difficulty, Difficulty::Hard);
        // Other fields should be defaults
        assert_eq!(config.game.rows, 6);
        assert_eq!(config.game.mode, GameMode::OnePlayer);
        assert_eq!(config.search.tie_break, TieBreakPolicy::Random);
    }

    #[test]
    fn test_empty_toml_uses_all_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.game.cols, 7);
        assert_eq!(config.game.player_one, "Player 1");
        assert_eq!(config.search.seed, None);
    }

    #[test]
    fn test_validation_rejects_small_board() {
        let mut config = AppConfig::default();
        config.game.rows = 3;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_large_board() {
        let mut config = AppConfig::default();
        config.game.cols = 17;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_empty_names() {
        let mut config = AppConfig::default();
        config.game.player_one = "  ".into();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.game.player_two = String::new();
        config.validate().expect("player_two unused in one-player mode");
        config.game.mode = GameMode::TwoPlayer;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_seed_with_first_policy() {
        let mut config = AppConfig::default();
        config.search.tie_break = TieBreakPolicy::First;
        config.search.seed = Some(3);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = AppConfig::load_or_default(Path::new("nonexistent_config.toml")).unwrap();
        assert_eq!(config.game.difficulty, Difficulty::Medium);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test_config.toml");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(
            f,
            r#"
[game]
mode = "two-player"
player_two = "Bo"

[search]
seed = 9
"#
        )
        .unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.game.mode, GameMode::TwoPlayer);
        assert_eq!(config.search.seed, Some(9));

        let session = config.new_session().unwrap();
        assert_eq!(session.player_name(crate::game::Player::Yellow), "Bo");
        assert_eq!(session.ai_player(), None);
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[game]\nrows = 2\n").unwrap();
        assert!(matches!(
            AppConfig::load(&path),
            Err(ConfigError::Validation(_))
        ));

        std::fs::write(&path, "[game]\nrows = \"six\"\n").unwrap();
        assert!(matches!(AppConfig::load(&path), Err(ConfigError::TomlParse(_))));
    }

    #[test]
    fn test_one_player_session_names_ai() {
        let config = AppConfig::default();
        let session = config.new_session().unwrap();
        assert_eq!(session.player_name(crate::game::Player::Yellow), "AI");
        assert_eq!(session.config().difficulty, Difficulty::Medium);
    }

    #[test]
    fn test_seeded_tie_breaker_is_reproducible() {
        let mut config = AppConfig::default();
        config.search.seed = Some(21);
        let columns = [0, 1, 2, 3, 4, 5, 6];
        let mut a = config.tie_breaker();
        let mut b = config.tie_breaker();
        for _ in 0..10 {
            assert_eq!(a.choose(&columns), b.choose(&columns));
        }
    }

    #[test]
    fn test_default_toml_roundtrips() {
        let toml_str = AppConfig::default_toml();
        let config: AppConfig = toml::from_str(&toml_str).unwrap();
        config.validate().expect("roundtripped config should be valid");
    }
}
