//! Application configuration loaded from an optional TOML file
//!
//! ```toml
//! [game]
//! grid_size = 20
//!
//! [trainer]
//! sensor_layout = "absolute"
//! exploration_ticks = 5000
//!
//! [driver]
//! auto_restart = true
//! ```
//!
//! Missing sections and keys fall back to their defaults. Command line flags
//! override the file.

use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::driver::DriverConfig;
use crate::game::GameConfig;
use crate::policy::TrainerConfig;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub game: GameConfig,
    pub trainer: TrainerConfig,
    pub driver: DriverConfig,
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;
        Self::from_toml(&contents).with_context(|| format!("Invalid config file {:?}", path))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents).context("Failed to parse TOML")?;
        config.validate()?;
        Ok(config)
    }

    /// Apply command line overrides; only flags actually given take effect
    ///
    /// Returns whether anything changed.
    pub fn merge_with_args(&mut self, grid_size: Option<usize>, seed: Option<u64>) -> bool {
        let mut changed = false;

        if let Some(grid_size) = grid_size {
            self.game.grid_size = grid_size;
            changed = true;
        }

        if let Some(seed) = seed {
            self.game.seed = Some(seed);
            // different stream for exploration than for food
            self.trainer.seed = Some(seed.wrapping_add(1));
            changed = true;
        }

        changed
    }

    pub fn validate(&self) -> Result<()> {
        self.game
            .validate()
            .map_err(|err| anyhow!(err))
            .context("Invalid [game] configuration")?;
        self.trainer
            .validate()
            .map_err(|err| anyhow!(err))
            .context("Invalid [trainer] configuration")?;
        if self.driver.ticks_per_frame == 0 {
            return Err(anyhow!("ticks_per_frame must be at least 1"))
                .context("Invalid [driver] configuration");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::SensorLayout;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_file_gives_defaults() {
        let config = AppConfig::from_toml("").unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_sections_are_merged_with_defaults() {
        let config = AppConfig::from_toml(
            r#"
            [game]
            grid_size = 20

            [trainer]
            sensor_layout = "absolute"

            [driver]
            auto_restart = true
            "#,
        )
        .unwrap();

        assert_eq!(config.game.grid_size, 20);
        assert_eq!(config.game.initial_length, 3);
        assert_eq!(config.trainer.sensor_layout, SensorLayout::Absolute);
        assert!(config.driver.auto_restart);
        assert_eq!(config.driver.ticks_per_frame, 1);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = AppConfig::from_toml("[game]\ngrid_size = 1\n").unwrap_err();
        assert!(format!("{err:#}").contains("grid_size"));

        assert!(AppConfig::from_toml("[driver]\nticks_per_frame = 0\n").is_err());
        assert!(AppConfig::from_toml("[game]\ngrid_size = \"big\"\n").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[trainer]\nexploration_ticks = 42").unwrap();

        let config = AppConfig::load(file.path()).unwrap();
        assert_eq!(config.trainer.exploration_ticks, 42);

        assert!(AppConfig::load(Path::new("/definitely/not/here.toml")).is_err());
    }

    #[test]
    fn test_cli_overrides() {
        let mut config = AppConfig::default();
        assert!(!config.merge_with_args(None, None));

        assert!(config.merge_with_args(Some(8), Some(5)));
        assert_eq!(config.game.grid_size, 8);
        assert_eq!(config.game.seed, Some(5));
        assert_eq!(config.trainer.seed, Some(6));
    }
}
