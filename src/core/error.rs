use thiserror::Error;

use crate::core::types::MissionId;
use crate::world::mission::MissionStatus;

#[derive(Error, Debug)]
pub enum RogueError {
    #[error("Error: {message} Usage: {usage}")]
    MissingArgument { message: String, usage: String },

    #[error("Error: {0}")]
    InvalidArgument(String),

    #[error("Mission not found: {0}")]
    MissionNotFound(MissionId),

    #[error("Mission {id} is {from}; cannot move it to {to}")]
    IllegalTransition {
        id: MissionId,
        from: MissionStatus,
        to: MissionStatus,
    },

    #[error("Still processing the previous command.")]
    Busy,

    #[error("LLM error: {0}")]
    LlmError(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    TomlError(#[from] toml::de::Error),
}

impl RogueError {
    pub fn missing(message: impl Into<String>, usage: impl Into<String>) -> Self {
        Self::MissingArgument {
            message: message.into(),
            usage: usage.into(),
        }
    }

    /// Validation and domain errors are shown to the player verbatim.
    /// Everything else is an internal fault and gets a generic message.
    pub fn is_player_facing(&self) -> bool {
        matches!(
            self,
            RogueError::MissingArgument { .. }
                | RogueError::InvalidArgument(_)
                | RogueError::MissionNotFound(_)
                | RogueError::IllegalTransition { .. }
                | RogueError::Busy
        )
    }
}

pub type Result<T> = std::result::Result<T, RogueError>;
