use thiserror::Error;

use crate::api::ApiError;
use crate::codec::CodecError;
use crate::config::ConfigError;
use crate::model::EditError;
use crate::model::rows::RowError;

/// Any failure surfaced by the core, for callers that do not care which
/// stage produced it.
#[derive(Debug, Error)]
pub enum TrussError {
    #[error(transparent)]
    Edit(#[from] EditError),
    #[error(transparent)]
    Rows(#[from] RowError),
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("invalid share link: {0}")]
    Link(#[from] url::ParseError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_stage_errors_transparently() {
        let edit = EditError::UnknownNode { index: 4, count: 2 };
        let message = edit.to_string();
        let err = TrussError::from(edit);
        assert_eq!(err.to_string(), message);
        assert!(matches!(err, TrussError::Edit(_)));
    }
}
