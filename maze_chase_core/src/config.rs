use std::{
    io,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::{Deserialize, Serialize};

use crate::level::LevelLayout;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Invalid config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Tunable game parameters.
///
/// Every field is optional in a config file; missing ones keep the reference
/// values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Minimum real time between two protagonist moves.
    pub move_interval_ms: u64,
    /// Overlays and dimensions applied to level files.
    pub layout: LevelLayout,
}

impl GameConfig {
    pub const DEFAULT_MOVE_INTERVAL_MS: u64 = 200;

    /// Reads a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn move_interval(&self) -> Duration {
        Duration::from_millis(self.move_interval_ms)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            move_interval_ms: Self::DEFAULT_MOVE_INTERVAL_MS,
            layout: LevelLayout::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::{DoorId, Position, level::DoorAnchor};

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn empty_file_yields_defaults() {
        let file = write_config("");
        assert_eq!(GameConfig::load(file.path()).unwrap(), GameConfig::default());
    }

    #[test]
    fn partial_layout_keeps_remaining_defaults() {
        let file = write_config(
            r#"
move_interval_ms = 150

[layout]
width = 8
height = 6
start = { x = 1, y = 1 }
goal = { x = 7, y = 5 }

[[layout.doors]]
id = "C"
position = { x = 0, y = 3 }
"#,
        );
        let config = GameConfig::load(file.path()).unwrap();

        assert_eq!(config.move_interval(), Duration::from_millis(150));
        assert_eq!((config.layout.width, config.layout.height), (8, 6));
        assert_eq!(config.layout.start, Position::new(1, 1));
        assert_eq!(
            config.layout.doors,
            vec![DoorAnchor {
                id: DoorId('C'),
                position: Position::new(0, 3),
            }]
        );
    }

    #[test]
    fn layout_table_may_omit_fields() {
        let file = write_config("[layout]\nwidth = 20\n");
        let config = GameConfig::load(file.path()).unwrap();
        assert_eq!(config.layout.width, 20);
        assert_eq!(config.layout.height, LevelLayout::default().height);
        assert_eq!(config.move_interval_ms, GameConfig::DEFAULT_MOVE_INTERVAL_MS);
    }

    #[test]
    fn invalid_toml_is_reported() {
        let file = write_config("move_interval_ms = \"fast\"");
        assert!(matches!(
            GameConfig::load(file.path()),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn missing_file_is_reported() {
        assert!(matches!(
            GameConfig::load("/definitely/not/here.toml"),
            Err(ConfigError::Io { .. })
        ));
    }
}
