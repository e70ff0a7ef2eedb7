//! Conversation engine for the Qlova skill simulator.
//!
//! Builds protocol requests from typed utterances, posts them to the
//! extension under test and tracks the session across exchanges.

pub mod client;
pub mod error;
pub mod request;
pub mod response;
pub mod session;
pub mod transport;

pub use client::{ClientBuilder, ConversationClient, Exchange, SendOutcome};
pub use error::{ClientError, TransportError};
pub use request::{OutboundRequest, RequestBuilder, RequestType};
pub use response::{ProcessedResponse, ResponseProcessor};
pub use session::SessionState;
pub use transport::{HttpTransport, Transport};
