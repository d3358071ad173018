// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The `{ success, data | error }` envelope returned by backend endpoints.

use crate::error::RaisedError;
use serde::{Deserialize, Serialize};

/// Error half of an [`ApiEnvelope`]. Backends send either a bare string or a
/// structured object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EnvelopeError {
    /// `"error": "message"`
    Message(String),
    /// `"error": { "code": ..., "message": ..., "status": ... }`
    Detailed {
        /// Machine code.
        #[serde(default)]
        code: Option<String>,
        /// Message.
        message: String,
        /// HTTP status echoed by the backend.
        #[serde(default)]
        status: Option<u16>,
    },
}

/// Response envelope of the health and metrics endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    /// `true` when `data` is meaningful.
    pub success: bool,
    /// Payload on success.
    #[serde(default)]
    pub data: Option<T>,
    /// Failure description.
    #[serde(default)]
    pub error: Option<EnvelopeError>,
}

impl<T> ApiEnvelope<T> {
    /// Unwraps the envelope, turning a failure into a [`RaisedError`] the
    /// standardizer can classify.
    pub fn into_result(self) -> Result<T, RaisedError> {
        match (self.success, self.data, self.error) {
            (true, Some(data), _) => Ok(data),
            (_, _, Some(EnvelopeError::Message(message))) => {
                Err(RaisedError::new("ApiError", message))
            }
            (_, _, Some(EnvelopeError::Detailed { code, message, status })) => {
                let mut raised = RaisedError::new("ApiError", message);
                raised.code = code;
                raised.status = status;
                Err(raised)
            }
            (true, None, None) => Err(RaisedError::new("ApiError", "envelope carried no data")),
            (false, _, None) => Err(RaisedError::new("ApiError", "request failed")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_envelope() {
        let envelope: ApiEnvelope<u32> =
            serde_json::from_str(r#"{ "success": true, "data": 7 }"#).unwrap();
        assert_eq!(envelope.into_result().unwrap(), 7);
    }

    #[test]
    fn test_detailed_error_envelope() {
        let envelope: ApiEnvelope<u32> = serde_json::from_str(
            r#"{ "success": false, "error": { "code": "DB_DOWN", "message": "db down", "status": 503 } }"#,
        )
        .unwrap();
        let raised = envelope.into_result().unwrap_err();
        assert_eq!(raised.code.as_deref(), Some("DB_DOWN"));
        assert_eq!(raised.status, Some(503));
    }

    #[test]
    fn test_string_error_envelope() {
        let envelope: ApiEnvelope<u32> =
            serde_json::from_str(r#"{ "success": false, "error": "nope" }"#).unwrap();
        assert_eq!(envelope.into_result().unwrap_err().message, "nope");
    }
}
