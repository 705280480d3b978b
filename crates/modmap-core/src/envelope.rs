//! # Response Envelopes
//!
//! The three response shapes every facade operation resolves to. The
//! engine is transport-agnostic: whatever invokes it (CLI, RPC bridge)
//! serializes these envelopes verbatim and adds its own framing.

use crate::facade::Lookup;
use crate::suggest::SuggestionMap;
use crate::types::ModmapError;
use serde::Serialize;

/// Error payload carried by `not_found` and `error` envelopes.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub missing_field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorBody {
    fn message_only(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            missing_field: None,
            hint: None,
            details: None,
        }
    }
}

/// Structured result of a facade operation, discriminated by `status`.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Response<T> {
    /// The entity or listing, as-is.
    Success { data: T },
    /// Valid request, no matching row; always carries ranked suggestions
    /// (possibly empty) for the failed identifier.
    NotFound {
        error: ErrorBody,
        suggestion: SuggestionMap,
    },
    /// Invalid input or internal failure. Never retried by the engine.
    Error { error: ErrorBody },
}

impl<T> Response<T> {
    #[must_use]
    pub fn success(data: T) -> Self {
        Response::Success { data }
    }

    #[must_use]
    pub fn not_found(message: impl Into<String>, suggestion: SuggestionMap) -> Self {
        Response::NotFound {
            error: ErrorBody::message_only(message),
            suggestion,
        }
    }

    /// Map an engine error onto the `error` envelope.
    #[must_use]
    pub fn failure(err: &ModmapError) -> Self {
        let error = match err {
            ModmapError::InvalidInput { field, hint } => ErrorBody {
                message: err.to_string(),
                missing_field: Some(field.clone()),
                hint: Some(hint.clone()),
                details: None,
            },
            ModmapError::Access(cause) => ErrorBody {
                message: err.to_string(),
                missing_field: None,
                hint: None,
                details: Some(cause.clone()),
            },
            ModmapError::Unsupported { category, .. } => ErrorBody {
                message: err.to_string(),
                missing_field: None,
                hint: Some(format!(
                    "category '{category}' only answers the operations it supports; \
                     see the capability table"
                )),
                details: None,
            },
            ModmapError::NotReady(_) => ErrorBody::message_only(err.to_string()),
        };
        Response::Error { error }
    }

    /// Collapse a facade lookup into an envelope.
    #[must_use]
    pub fn from_lookup(result: Result<Lookup<T>, ModmapError>) -> Self {
        match result {
            Ok(Lookup::Found(data)) => Response::success(data),
            Ok(Lookup::Missing {
                message,
                suggestion,
            }) => Response::not_found(message, suggestion),
            Err(err) => Response::failure(&err),
        }
    }

    /// Collapse a plain facade result into an envelope.
    #[must_use]
    pub fn from_result(result: Result<T, ModmapError>) -> Self {
        match result {
            Ok(data) => Response::success(data),
            Err(err) => Response::failure(&err),
        }
    }

    /// Whether this envelope reports an engine failure (`status: error`).
    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self, Response::Error { .. })
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn success_shape() {
        let resp = Response::success(vec!["partner".to_string()]);
        let json = serde_json::to_value(&resp).expect("serialize");
        assert_eq!(json["status"], "success");
        assert_eq!(json["data"][0], "partner");
    }

    #[test]
    fn not_found_shape_carries_suggestions() {
        let mut suggestion = BTreeMap::new();
        suggestion.insert("modules".to_string(), vec!["partner".to_string()]);
        let resp: Response<()> = Response::not_found("module 'partnr' not found", suggestion);
        let json = serde_json::to_value(&resp).expect("serialize");
        assert_eq!(json["status"], "not_found");
        assert_eq!(json["suggestion"]["modules"][0], "partner");
        assert_eq!(json["error"]["message"], "module 'partnr' not found");
    }

    #[test]
    fn invalid_input_names_the_missing_field() {
        let err = ModmapError::InvalidInput {
            field: "id".to_string(),
            hint: "pass a non-empty id".to_string(),
        };
        let resp: Response<()> = Response::failure(&err);
        assert!(resp.is_error());
        let json = serde_json::to_value(&resp).expect("serialize");
        assert_eq!(json["status"], "error");
        assert_eq!(json["error"]["missing_field"], "id");
        assert_eq!(json["error"]["hint"], "pass a non-empty id");
    }

    #[test]
    fn access_error_carries_the_cause() {
        let err = ModmapError::Access("disk I/O error".to_string());
        let resp: Response<()> = Response::failure(&err);
        let json = serde_json::to_value(&resp).expect("serialize");
        assert_eq!(json["error"]["details"], "disk I/O error");
    }
}
