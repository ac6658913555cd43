use crate::error::Result;
use crate::graphics::SpriteEdge;
use serde::{Deserialize, Serialize};
use slog::{o, Discard, Logger};
use sloggers::{Config, LoggerConfig};

/// Settings for building an `Emulator`. Serializable so a host can keep it in a
/// config file next to its own settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmulatorConfig {
    /// where log records go. None discards them
    pub logger: Option<LoggerConfig>,
    pub sprite_edge: SpriteEdge,
    /// seed for the random byte source. None seeds from OS entropy
    pub seed: Option<u64>,
}

impl Default for EmulatorConfig {
    fn default() -> Self {
        EmulatorConfig {
            logger: None,
            sprite_edge: SpriteEdge::default(),
            seed: None,
        }
    }
}

impl EmulatorConfig {
    pub fn build_logger(&self) -> Result<Logger> {
        match &self.logger {
            Some(config) => Ok(config.build_logger()?),
            None => Ok(discard_logger()),
        }
    }
}

pub(crate) fn discard_logger() -> Logger {
    Logger::root(Discard, o!())
}
