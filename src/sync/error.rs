//! Synchronization error taxonomy

use thiserror::Error;

/// Errors surfaced by the entity synchronizer.
///
/// Underlying provider and gateway failures pass through unchanged as
/// [`SyncError::Other`]; the named variants identify configuration and
/// lookup failures the host can act on.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("no subscriber setting configured for index `{0}`")]
    SubscriberSettingNotFound(String),

    #[error("index `{0}` does not exist")]
    IndexNotFound(String),

    #[error("no data provider registered under `{0}`")]
    ServiceNotFound(String),

    #[error("entity `{entity_id}` not found in service `{service_name}`")]
    EntityNotFound {
        service_name: String,
        entity_id: String,
    },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_the_index() {
        let err = SyncError::SubscriberSettingNotFound("products".into());
        assert!(err.to_string().contains("products"));

        let err = SyncError::IndexNotFound("products".into());
        assert!(err.to_string().contains("products"));
    }

    #[test]
    fn test_underlying_error_passes_through() {
        let source = anyhow::anyhow!("connection refused");
        let err: SyncError = source.into();
        assert_eq!(err.to_string(), "connection refused");
    }
}
