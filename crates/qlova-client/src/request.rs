//! Outbound request construction.
//!
//! A request is rebuilt from scratch for every send; nothing is mutated in
//! place between exchanges.

use std::fmt;

use qlova_core::ids::IdentityGenerator;
use qlova_intent::MatchedIntent;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::session::SessionState;

/// Protocol version sent with every request.
pub const PROTOCOL_VERSION: &str = "1.0";

// =============================================================================
// RequestType
// =============================================================================

/// Kind of request sent to the extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestType {
    LaunchRequest,
    IntentRequest,
    SessionEndedRequest,
}

impl fmt::Display for RequestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestType::LaunchRequest => write!(f, "LaunchRequest"),
            RequestType::IntentRequest => write!(f, "IntentRequest"),
            RequestType::SessionEndedRequest => write!(f, "SessionEndedRequest"),
        }
    }
}

// =============================================================================
// Wire shape
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutboundRequest {
    pub version: String,
    pub session: SessionBlock,
    pub context: ContextBlock,
    pub request: RequestBlock,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionBlock {
    pub session_id: String,
    pub session_attributes: Map<String, Value>,
    pub user: UserBlock,
    #[serde(rename = "new")]
    pub is_new: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserBlock {
    pub user_id: String,
    pub access_token: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContextBlock {
    #[serde(rename = "System")]
    pub system: SystemBlock,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SystemBlock {
    pub application: ApplicationBlock,
    pub user: UserBlock,
    pub device: DeviceBlock,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationBlock {
    pub application_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceBlock {
    pub device_id: String,
    pub display: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestBlock {
    #[serde(rename = "type")]
    pub request_type: RequestType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intent: Option<MatchedIntent>,
}

// =============================================================================
// RequestBuilder
// =============================================================================

/// Assembles [`OutboundRequest`]s from the current session.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    application_id: String,
    ids: IdentityGenerator,
}

impl RequestBuilder {
    pub fn new(application_id: impl Into<String>) -> Self {
        Self {
            application_id: application_id.into(),
            ids: IdentityGenerator::new(),
        }
    }

    pub fn application_id(&self) -> &str {
        &self.application_id
    }

    /// Build a request of `request_type` for the current session.
    ///
    /// Intent requests always carry an intent block; an unmatched utterance
    /// sends an empty name and no slots. Other request types carry none.
    pub fn build(
        &self,
        state: &SessionState,
        request_type: RequestType,
        intent: Option<MatchedIntent>,
    ) -> OutboundRequest {
        // Access tokens are not session-stable.
        let user = UserBlock {
            user_id: state.user_id.clone().unwrap_or_default(),
            access_token: self.ids.long_id(),
        };

        let intent = match request_type {
            RequestType::IntentRequest => Some(intent.unwrap_or_else(MatchedIntent::unmatched)),
            RequestType::LaunchRequest | RequestType::SessionEndedRequest => None,
        };

        OutboundRequest {
            version: PROTOCOL_VERSION.to_string(),
            session: SessionBlock {
                session_id: state.session_id.clone().unwrap_or_default(),
                session_attributes: state.attributes.clone(),
                user: user.clone(),
                is_new: request_type == RequestType::LaunchRequest,
            },
            context: ContextBlock {
                system: SystemBlock {
                    application: ApplicationBlock {
                        application_id: self.application_id.clone(),
                    },
                    user,
                    device: DeviceBlock {
                        device_id: state.device_id.clone().unwrap_or_default(),
                        display: false,
                    },
                },
            },
            request: RequestBlock {
                request_type,
                intent,
            },
        }
    }
}
