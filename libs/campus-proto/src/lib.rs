//! Wire types for the campus activity API.
//!
//! Every endpoint answers with an [`envelope::ApiEnvelope`]; the entities in
//! [`models`] travel inside its `data` field and the bodies in [`requests`] are
//! what the client posts back.

pub mod envelope;
pub mod models;
pub mod requests;

pub use envelope::ApiEnvelope;
pub use models::UserId;
