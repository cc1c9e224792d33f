//! Hooks to observe the decisions taken by a [`BodyResolver`](crate::BodyResolver).
use std::fmt;

use itertools::Itertools;
use tracing::Level;
use tracing_log_error::log_error;

use crate::errors::ReadBodyError;
use crate::{ConcreteType, Converter, MediaType, TypeDescriptor};

/// Get notified when a [`BodyResolver`](crate::BodyResolver) picks a converter,
/// or fails to find one.
///
/// The default observer is [`TracingObserver`].
pub trait ResolutionObserver: Send + Sync {
    /// A converter was selected to read the request body.
    fn converter_selected(&self, event: &ConverterSelected<'_>);

    /// No converter can read the request body into the target type.
    fn no_converter_found(&self, event: &NoConverterFound<'_>);

    /// The selected converter failed to read the request body.
    fn read_failed(&self, event: &ReadFailed<'_>) {
        let _ = event;
    }
}

#[derive(Debug, Clone, Copy)]
/// Which capability of the converter was used to read the body.
pub enum ReadPath<'a> {
    /// The generic capability, with the full type descriptor.
    Generic(&'a TypeDescriptor),
    /// The basic capability, with the reduced concrete type.
    Concrete(&'a ConcreteType),
}

impl ReadPath<'_> {
    /// `"generic"` or `"concrete"`.
    pub fn kind(&self) -> &'static str {
        match self {
            ReadPath::Generic(_) => "generic",
            ReadPath::Concrete(_) => "concrete",
        }
    }
}

impl fmt::Display for ReadPath<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadPath::Generic(target) => write!(f, "{target}"),
            ReadPath::Concrete(target) => write!(f, "{target}"),
        }
    }
}

#[derive(Debug)]
#[non_exhaustive]
/// See [`ResolutionObserver::converter_selected`].
pub struct ConverterSelected<'a> {
    /// The selected converter.
    pub converter: &'a dyn Converter,
    /// The effective content type of the request.
    pub content_type: &'a MediaType,
    /// The capability used to read the body, with the corresponding target type.
    pub read_path: ReadPath<'a>,
}

#[derive(Debug)]
#[non_exhaustive]
/// See [`ResolutionObserver::no_converter_found`].
pub struct NoConverterFound<'a> {
    /// The effective content type of the request.
    pub content_type: &'a MediaType,
    /// The requested target type.
    pub target: &'a TypeDescriptor,
    /// The media types supported by the registered converters.
    pub acceptable: &'a [MediaType],
}

#[derive(Debug)]
#[non_exhaustive]
/// See [`ResolutionObserver::read_failed`].
pub struct ReadFailed<'a> {
    /// The converter that failed.
    pub converter: &'a dyn Converter,
    /// The effective content type of the request.
    pub content_type: &'a MediaType,
    /// The capability used to read the body, with the corresponding target type.
    pub read_path: ReadPath<'a>,
    /// What went wrong.
    pub error: &'a ReadBodyError,
}

#[derive(Debug, Default, Clone, Copy)]
/// A [`ResolutionObserver`] that emits `tracing` events at the `DEBUG` level.
pub struct TracingObserver;

impl ResolutionObserver for TracingObserver {
    fn converter_selected(&self, event: &ConverterSelected<'_>) {
        tracing::debug!(
            converter = %event.converter.name(),
            content_type = %event.content_type,
            read_path = event.read_path.kind(),
            target_type = %event.read_path,
            "Reading request body"
        );
    }

    fn no_converter_found(&self, event: &NoConverterFound<'_>) {
        tracing::debug!(
            content_type = %event.content_type,
            target_type = %event.target,
            acceptable_types = %event.acceptable.iter().join(", "),
            "No converter can read the request body"
        );
    }

    fn read_failed(&self, event: &ReadFailed<'_>) {
        log_error!(
            event.error,
            level: Level::DEBUG,
            converter = %event.converter.name(),
            content_type = %event.content_type,
            target_type = %event.read_path,
            "Failed to read the request body"
        );
    }
}
