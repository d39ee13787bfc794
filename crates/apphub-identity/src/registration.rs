//! Registration endpoint wire format.
//!
//! Request: `POST {endpoint}` with the [`SignalSet`] as the JSON body and
//! cookies included. Response:
//!
//! ```json
//! { "success": true, "user_id": "...", "fingerprint": "...", "is_new_user": true }
//! { "success": false, "error": "..." }
//! ```

use alloc::string::{String, ToString};
use apphub_fingerprint::SignalSet;
use apphub_network::{HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::config::IdentityConfig;
use crate::error::RegistrationError;
use crate::types::IdentityRecord;

/// Response body of the registration endpoint.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationResponse {
    /// Whether registration succeeded
    pub success: bool,
    /// Issued user id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// Server fingerprint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,
    /// Whether a new user was created
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_new_user: Option<bool>,
    /// Failure description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RegistrationResponse {
    /// Successful response.
    pub fn registered(record: &IdentityRecord) -> Self {
        Self {
            success: true,
            user_id: Some(record.user_id.clone()),
            fingerprint: Some(record.fingerprint.clone()),
            is_new_user: Some(record.is_new_user),
            error: None,
        }
    }

    /// Failed response.
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            ..Self::default()
        }
    }

    /// Convert into an [`IdentityRecord`], or the error the server reported.
    pub fn into_record(self) -> Result<IdentityRecord, RegistrationError> {
        if !self.success {
            return Err(RegistrationError::Rejected(
                self.error
                    .unwrap_or_else(|| String::from("registration rejected")),
            ));
        }

        let user_id = match self.user_id {
            Some(id) if !id.is_empty() => id,
            _ => return Err(RegistrationError::malformed("missing user_id")),
        };
        let fingerprint = match self.fingerprint {
            Some(fp) if !fp.is_empty() => fp,
            _ => return Err(RegistrationError::malformed("missing fingerprint")),
        };

        Ok(IdentityRecord {
            user_id,
            fingerprint,
            is_new_user: self.is_new_user.unwrap_or(false),
        })
    }
}

/// Build the registration request for `signals`.
pub fn build_request(
    config: &IdentityConfig,
    signals: &SignalSet,
) -> Result<HttpRequest, RegistrationError> {
    let body =
        serde_json::to_vec(signals).map_err(|e| RegistrationError::Encode(e.to_string()))?;

    Ok(HttpRequest::post(config.endpoint.clone())
        .with_json_body(body)
        .with_header("Accept", "application/json")
        .with_credentials(config.include_credentials)
        .with_timeout(config.timeout_ms))
}

/// Interpret the endpoint's answer.
///
/// A non-2xx status is an error even when the body says `success: true`;
/// the body's `error` field is kept as the message when it parses.
pub fn parse_response(response: HttpResponse) -> Result<IdentityRecord, RegistrationError> {
    let success = response.result?;

    if !success.is_success() {
        let message = serde_json::from_slice::<RegistrationResponse>(&success.body)
            .ok()
            .and_then(|body| body.error);
        return Err(RegistrationError::HttpStatus {
            status: success.status,
            message,
        });
    }

    let body: RegistrationResponse = serde_json::from_slice(&success.body)
        .map_err(|e| RegistrationError::malformed(e.to_string()))?;
    body.into_record()
}
