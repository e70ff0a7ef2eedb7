//! Shared building blocks for the Qlova skill simulator.
//!
//! Holds the top-level error type, the TOML configuration model and the
//! random identity generator used for session, device, user and token ids.

pub mod config;
pub mod error;
pub mod ids;

pub use config::QlovaConfig;
pub use error::{QlovaError, Result};
pub use ids::{IdShape, IdentityGenerator};
