//! # conneg
//!
//! Deserialize HTTP request bodies by picking the right converter for the request's
//! `Content-Type` and the type the handler expects.
//!
//! # Guide
//!
//! 1. Register an ordered list of [`Converter`]s with a [`BodyResolver`].
//!    Registration order is priority order.
//! 2. For every request, describe the expected body type with a [`TypeDescriptor`]
//!    and call [`BodyResolver::resolve`].
//!    The first converter that can read the body wins, and its outcome is final.
//! 3. If no converter matches, you get back an [`UnsupportedMediaType`] error listing
//!    every media type the registered converters can read.
//!    Use [`ResolveBodyError::into_response`] to turn it into a `415 Unsupported Media Type`.
//!
//! Request bodies are read synchronously: buffer streaming bodies first via
//! [`RequestInputMessage::buffer`], which enforces the [`BodySizeLimit`](body::BodySizeLimit)
//! from your [`NegotiationConfig`](config::NegotiationConfig).
pub mod body;
pub mod config;
mod converter;
pub mod errors;
mod media_type;
mod message;
pub mod observer;
mod registry;
mod resolver;
mod target_type;

#[cfg(test)]
mod test_utils;

pub use converter::{Converter, Deserialized, GenericConverter};
pub use errors::{
    EmptyRegistryError, InvalidContentType, ReadBodyError, ResolveBodyError, UnsupportedMediaType,
};
pub use media_type::{InvalidMediaType, MediaType, specificity};
pub use message::{InputMessage, RequestInputMessage};
pub use observer::{ResolutionObserver, TracingObserver};
pub use registry::ConverterRegistry;
pub use resolver::BodyResolver;
pub use target_type::{ConcreteType, TypeDescriptor, UnresolvableType};
