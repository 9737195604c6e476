//! Error taxonomy
//!
//! None of these are fatal: the tick loop reports them to the host and keeps
//! running in a "not ready" state.

/// Errors from level/asset loading
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error("failed to load {asset}: {reason}")]
    AssetLoad { asset: String, reason: String },
    #[error("level document is not valid: {0}")]
    LevelParse(#[from] serde_json::Error),
    #[error("level entry {index} skipped: {reason}")]
    MalformedEntry { index: usize, reason: String },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl GameError {
    pub fn asset_load(asset: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::AssetLoad {
            asset: asset.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = GameError::asset_load("levels/one.json", "404");
        assert_eq!(err.to_string(), "failed to load levels/one.json: 404");

        let err = GameError::MalformedEntry {
            index: 3,
            reason: "unknown kind `tree`".into(),
        };
        assert_eq!(err.to_string(), "level entry 3 skipped: unknown kind `tree`");
    }

    #[test]
    fn test_json_error_converts() {
        let parse: Result<serde_json::Value, _> = serde_json::from_str("{not json");
        let err: GameError = parse.unwrap_err().into();
        assert!(matches!(err, GameError::LevelParse(_)));
    }
}
