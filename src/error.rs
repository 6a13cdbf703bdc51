//! Error types for service operations
//!
//! Errors are classified by who has to act:
//! - Rejected: the caller lacks rights or sent bad input (Unauthorized,
//!   InvitationExists, Validation, ...)
//! - Fault: the storage engine failed or is not open (Db, DbUnavailable)
//!
//! Unauthenticated callers and missing rows are not errors: services
//! return `Ok(None)` for both.

use serde::Serialize;
use thiserror::Error;

use crate::db::{DbError, UpsertOutcome};

/// Error types for service operations
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Unauthorized!")]
    Unauthorized,

    #[error("Invitation already exists!")]
    InvitationExists,

    #[error("Either agencyId or subAccountId should exist!")]
    MissingNotificationTarget,

    #[error("Invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Storage error: {0}")]
    Db(#[from] DbError),

    #[error("Database unavailable: {0}")]
    DbUnavailable(String),
}

impl ServiceError {
    /// Returns true for storage faults, as opposed to rejected requests.
    pub fn is_fault(&self) -> bool {
        matches!(self, ServiceError::Db(_) | ServiceError::DbUnavailable(_))
    }
}

/// Handler-facing result shape.
///
/// Serializes as `{"status":"success","response":…}`,
/// `{"status":"updated"}` or `{"error":"…"}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ActionResponse<T> {
    Success {
        status: ResponseStatus,
        response: T,
    },
    Updated {
        status: ResponseStatus,
    },
    Error {
        error: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Success,
    Updated,
}

impl<T> ActionResponse<T> {
    pub fn success(response: T) -> Self {
        ActionResponse::Success {
            status: ResponseStatus::Success,
            response,
        }
    }

    pub fn updated() -> Self {
        ActionResponse::Updated {
            status: ResponseStatus::Updated,
        }
    }

    /// Convert an error into the `{error}` shape, logging it on the way out.
    pub fn from_error(err: &ServiceError) -> Self {
        if err.is_fault() {
            log::error!("Request failed: {err}");
        } else {
            log::warn!("Request rejected: {err}");
        }
        ActionResponse::Error {
            error: err.to_string(),
        }
    }

    /// Map a create-or-update result: created rows become `success`, an
    /// existing row becomes `updated`.
    pub fn from_upsert(result: Result<UpsertOutcome<T>, ServiceError>) -> Self {
        match result {
            Ok(UpsertOutcome::Created(value)) => ActionResponse::success(value),
            Ok(UpsertOutcome::Updated) => ActionResponse::updated(),
            Err(err) => ActionResponse::from_error(&err),
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            ActionResponse::Error { error } => Some(error),
            _ => None,
        }
    }
}

impl<T> From<Result<T, ServiceError>> for ActionResponse<T> {
    fn from(result: Result<T, ServiceError>) -> Self {
        match result {
            Ok(value) => ActionResponse::success(value),
            Err(err) => ActionResponse::from_error(&err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_shape() {
        let resp: ActionResponse<u32> = Ok::<u32, ServiceError>(7).into();
        assert_eq!(
            serde_json::to_value(&resp).unwrap(),
            json!({ "status": "success", "response": 7 })
        );
    }

    #[test]
    fn test_updated_shape() {
        let resp: ActionResponse<u32> = ActionResponse::from_upsert(Ok(UpsertOutcome::Updated));
        assert_eq!(
            serde_json::to_value(&resp).unwrap(),
            json!({ "status": "updated" })
        );
    }

    #[test]
    fn test_error_shapes_use_display_text() {
        let resp: ActionResponse<u32> = Err(ServiceError::Unauthorized).into();
        assert_eq!(resp.error_message(), Some("Unauthorized!"));
        assert_eq!(
            serde_json::to_value(&resp).unwrap(),
            json!({ "error": "Unauthorized!" })
        );

        let resp: ActionResponse<u32> = Err(ServiceError::InvitationExists).into();
        assert_eq!(resp.error_message(), Some("Invitation already exists!"));
    }

    #[test]
    fn test_fault_classification() {
        assert!(!ServiceError::Unauthorized.is_fault());
        assert!(ServiceError::Db(DbError::HomeDirNotFound).is_fault());
    }
}
