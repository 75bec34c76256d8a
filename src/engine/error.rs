//! Error type shared by the engine and the asset glue.

use thiserror::Error;

use super::GameState;

/// Everything that can go wrong while configuring or driving a session.
#[derive(Debug, Error)]
pub enum GameError {
    #[error("the item pool is empty")]
    EmptyItemPool,

    #[error("failed to read catalog at {path}")]
    CatalogIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed catalog")]
    CatalogFormat(#[from] serde_json::Error),

    #[error("asset `{asset}` failed to load: {reason}")]
    AssetLoad { asset: String, reason: String },

    #[error("cannot {action} while the game is in {from:?}")]
    InvalidTransition {
        from: GameState,
        action: &'static str,
    },
}

pub type GameResult<T> = Result<T, GameError>;
