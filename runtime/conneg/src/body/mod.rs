//! Buffer the body of incoming requests ahead of resolution.
//!
//! Converters read from an [`InputMessage`](crate::InputMessage), which is synchronous.
//! If your server hands you a streaming body, buffer it first with [`BufferedBody::extract`]
//! (or [`RequestInputMessage::buffer`](crate::RequestInputMessage::buffer)),
//! which also enforces a [`BodySizeLimit`] to avoid resource exhaustion attacks.
pub use buffered_body::BufferedBody;
pub use limit::BodySizeLimit;

mod buffered_body;
mod limit;
