//! Conversation client: central coordinator wiring matcher, session,
//! request builder, transport and response processor.
//!
//! Configure through [`ClientBuilder`], which validates everything in one
//! step, then drive the conversation with `send_launch_request`,
//! `send_intent_request` and `send_session_ended_request`.

use std::time::Duration;

use qlova_core::config::QlovaConfig;
use qlova_core::error::QlovaError;
use qlova_core::ids::IdentityGenerator;
use qlova_intent::{IntentMatcher, IntentRegistry, MatchedIntent, SlotSpec};
use serde_json::Value;

use crate::error::ClientError;
use crate::request::{RequestBuilder, RequestType};
use crate::response::ResponseProcessor;
use crate::session::SessionState;
use crate::transport::{HttpTransport, Transport};

const DEFAULT_TIMEOUT_SECS: u64 = 30;

// =============================================================================
// Outcomes
// =============================================================================

/// The result of one delivered request.
#[derive(Debug, Clone, PartialEq)]
pub struct Exchange {
    pub request_type: RequestType,
    /// Matched intent for intent requests; `None` when nothing matched or
    /// for the other request types.
    pub intent: Option<MatchedIntent>,
    pub messages: Vec<String>,
    pub reprompt_messages: Vec<String>,
    pub session_ended: bool,
}

/// What `send` did.
#[derive(Debug, Clone, PartialEq)]
pub enum SendOutcome {
    /// The request went out and a response came back.
    Delivered(Exchange),
    /// The session had already ended; nothing was sent.
    SessionEnded,
}

impl SendOutcome {
    pub fn exchange(&self) -> Option<&Exchange> {
        match self {
            SendOutcome::Delivered(exchange) => Some(exchange),
            SendOutcome::SessionEnded => None,
        }
    }

    pub fn is_delivered(&self) -> bool {
        matches!(self, SendOutcome::Delivered(_))
    }
}

// =============================================================================
// ClientBuilder
// =============================================================================

struct PendingIntent {
    name: String,
    pattern: String,
    slots: Vec<SlotSpec>,
}

/// Collects client settings; [`ClientBuilder::build`] validates them.
pub struct ClientBuilder {
    endpoint: Option<String>,
    application_id: Option<String>,
    debug_headers: Vec<(String, String)>,
    intents: Vec<PendingIntent>,
    session_id: Option<String>,
    device_id: Option<String>,
    user_id: Option<String>,
    debug: bool,
    timeout: Duration,
    transport: Option<Box<dyn Transport>>,
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self {
            endpoint: None,
            application_id: None,
            debug_headers: Vec::new(),
            intents: Vec::new(),
            session_id: None,
            device_id: None,
            user_id: None,
            debug: false,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            transport: None,
        }
    }
}

impl ClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a builder from the config file.
    pub fn from_config(config: &QlovaConfig) -> Self {
        let mut builder = Self::new()
            .debug(config.general.debug)
            .timeout(Duration::from_secs(config.extension.timeout_secs));
        builder.endpoint = config.extension.endpoint.clone();
        builder.application_id = config.extension.application_id.clone();
        builder.session_id = config.session.session_id.clone();
        builder.device_id = config.session.device_id.clone();
        builder.user_id = config.session.user_id.clone();
        for (name, value) in &config.extension.debug_headers {
            builder = builder.debug_header(name.clone(), value.clone());
        }
        for intent in &config.intents {
            builder = builder.register_intent(
                intent.name.clone(),
                intent.pattern.clone(),
                intent.slots.iter().map(SlotSpec::from).collect(),
            );
        }
        builder
    }

    /// Webhook endpoint of the extension under test.
    pub fn endpoint(mut self, url: impl Into<String>) -> Self {
        self.endpoint = Some(url.into());
        self
    }

    /// Header sent with every request. Setting a name twice keeps the last value.
    pub fn debug_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        let value = value.into();
        match self.debug_headers.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.debug_headers.push((name, value)),
        }
        self
    }

    /// Header with the value `"true"`.
    pub fn debug_flag(self, name: impl Into<String>) -> Self {
        self.debug_header(name, "true")
    }

    pub fn application_id(mut self, id: impl Into<String>) -> Self {
        self.application_id = Some(id.into());
        self
    }

    /// Register a custom intent. Patterns are compiled by `build`.
    pub fn register_intent(
        mut self,
        name: impl Into<String>,
        pattern: impl Into<String>,
        slots: Vec<SlotSpec>,
    ) -> Self {
        self.intents.push(PendingIntent {
            name: name.into(),
            pattern: pattern.into(),
            slots,
        });
        self
    }

    pub fn session_id(mut self, id: impl Into<String>) -> Self {
        self.session_id = Some(id.into());
        self
    }

    pub fn device_id(mut self, id: impl Into<String>) -> Self {
        self.device_id = Some(id.into());
        self
    }

    pub fn user_id(mut self, id: impl Into<String>) -> Self {
        self.user_id = Some(id.into());
        self
    }

    /// Log matched intents and full request/response objects.
    pub fn debug(mut self, enabled: bool) -> Self {
        self.debug = enabled;
        self
    }

    /// Timeout of the default HTTP transport.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Replace the HTTP transport.
    pub fn transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Some(Box::new(transport));
        self
    }

    /// Validate the settings and produce a ready client.
    ///
    /// Every missing required setting is reported at once. Ids that were not
    /// set explicitly are generated.
    pub fn build(self) -> Result<ConversationClient, ClientError> {
        let endpoint = self.endpoint.filter(|s| !s.trim().is_empty());
        let application_id = self.application_id.filter(|s| !s.trim().is_empty());

        let (endpoint, application_id) = match (endpoint, application_id) {
            (Some(e), Some(a)) => (e, a),
            (endpoint, application_id) => {
                let mut missing = Vec::new();
                if endpoint.is_none() {
                    missing.push("endpoint".to_string());
                }
                if application_id.is_none() {
                    missing.push("application_id".to_string());
                }
                return Err(QlovaError::MissingSettings(missing).into());
            }
        };

        let mut registry = IntentRegistry::new();
        for intent in self.intents {
            registry.register(intent.name, &intent.pattern, intent.slots)?;
        }

        let transport: Box<dyn Transport> = match self.transport {
            Some(t) => t,
            None => Box::new(HttpTransport::new(self.timeout)?),
        };

        let ids = IdentityGenerator::new();
        let mut state = SessionState::new();
        state.set_session_id(self.session_id, &ids);
        state.set_device_id(self.device_id, &ids);
        state.set_user_id(self.user_id, &ids);

        tracing::info!(
            endpoint = %endpoint,
            application_id = %application_id,
            intents = registry.len(),
            "Conversation client ready"
        );

        Ok(ConversationClient {
            endpoint,
            debug_headers: self.debug_headers,
            registry,
            matcher: IntentMatcher::new(),
            request_builder: RequestBuilder::new(application_id),
            processor: ResponseProcessor::new(),
            transport,
            ids,
            state,
            debug: self.debug,
            last_request: None,
            last_response: None,
        })
    }
}

// =============================================================================
// ConversationClient
// =============================================================================

/// Drives one simulated conversation against an extension endpoint.
pub struct ConversationClient {
    endpoint: String,
    debug_headers: Vec<(String, String)>,
    registry: IntentRegistry,
    matcher: IntentMatcher,
    request_builder: RequestBuilder,
    processor: ResponseProcessor,
    transport: Box<dyn Transport>,
    ids: IdentityGenerator,
    state: SessionState,
    debug: bool,
    last_request: Option<Value>,
    last_response: Option<Value>,
}

impl ConversationClient {
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Register another intent after the client is built.
    pub fn register_intent(
        &mut self,
        name: impl Into<String>,
        pattern: &str,
        slots: Vec<SlotSpec>,
    ) -> Result<&mut Self, ClientError> {
        self.registry.register(name, pattern, slots)?;
        Ok(self)
    }

    /// Start over with fresh random ids, no attributes and an open session.
    pub fn new_session(&mut self) -> &mut Self {
        self.state.new_session(&self.ids);
        self.state.reset();
        tracing::info!(
            session_id = self.state.session_id.as_deref().unwrap_or_default(),
            "New session"
        );
        self
    }

    /// Override the session id, or regenerate it with `None`.
    pub fn set_session_id(&mut self, id: Option<String>) -> &mut Self {
        self.state.set_session_id(id, &self.ids);
        self
    }

    /// Override the device id, or regenerate it with `None`.
    pub fn set_device_id(&mut self, id: Option<String>) -> &mut Self {
        self.state.set_device_id(id, &self.ids);
        self
    }

    /// Override the user id, or regenerate it with `None`.
    pub fn set_user_id(&mut self, id: Option<String>) -> &mut Self {
        self.state.set_user_id(id, &self.ids);
        self
    }

    pub fn session(&self) -> &SessionState {
        &self.state
    }

    pub fn session_ended(&self) -> bool {
        self.state.ended
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn registry(&self) -> &IntentRegistry {
        &self.registry
    }

    /// The most recent request body sent.
    pub fn last_request(&self) -> Option<&Value> {
        self.last_request.as_ref()
    }

    /// The most recent response body received.
    pub fn last_response(&self) -> Option<&Value> {
        self.last_response.as_ref()
    }

    pub async fn send_launch_request(&mut self) -> Result<SendOutcome, ClientError> {
        self.send("", RequestType::LaunchRequest).await
    }

    pub async fn send_session_ended_request(&mut self) -> Result<SendOutcome, ClientError> {
        self.send("", RequestType::SessionEndedRequest).await
    }

    pub async fn send_intent_request(&mut self, text: &str) -> Result<SendOutcome, ClientError> {
        self.send(text, RequestType::IntentRequest).await
    }

    /// Send one request and fold the response into the session.
    ///
    /// `text` is only used for intent requests. Once the session has ended
    /// this returns [`SendOutcome::SessionEnded`] without touching the
    /// network.
    pub async fn send(
        &mut self,
        text: &str,
        request_type: RequestType,
    ) -> Result<SendOutcome, ClientError> {
        if self.state.ended {
            tracing::info!("(Session Ended)");
            return Ok(SendOutcome::SessionEnded);
        }

        let intent = match request_type {
            RequestType::IntentRequest => {
                tracing::info!(kind = %request_type, text = %text, "Sending request");
                let intent = self.matcher.match_intent(text, &self.registry)?;
                if self.debug {
                    tracing::info!(intent = ?intent, "Matched intent");
                }
                intent
            }
            RequestType::LaunchRequest | RequestType::SessionEndedRequest => {
                tracing::info!(kind = %request_type, "Sending request");
                None
            }
        };

        let request = self
            .request_builder
            .build(&self.state, request_type, intent.clone());
        let body = serde_json::to_value(&request).map_err(QlovaError::from)?;
        if self.debug {
            tracing::info!(request = %body, "Request object");
        }

        let response = self
            .transport
            .exchange(&self.endpoint, &self.debug_headers, &body)
            .await?;
        if self.debug {
            tracing::info!(response = %response, "Response object");
        }

        let processed = self.processor.process(&response);
        self.state.apply(&processed);
        if self.debug && !self.state.ended && processed.session_attributes.is_some() {
            tracing::info!(attributes = ?self.state.attributes, "Session attributes adopted");
        }

        for message in &processed.messages {
            tracing::debug!(message = %message, "->");
        }
        for message in &processed.reprompt_messages {
            tracing::debug!(message = %message, "reprompt->");
        }

        self.last_request = Some(body);
        self.last_response = Some(response);

        Ok(SendOutcome::Delivered(Exchange {
            request_type,
            intent,
            messages: processed.messages,
            reprompt_messages: processed.reprompt_messages,
            session_ended: self.state.ended,
        }))
    }
}

// =============================================================================
// Tests
// =============================================================================
