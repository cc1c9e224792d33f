//! Errors that can occur while resolving the body of an incoming request.
use http::{HeaderValue, StatusCode, header::ACCEPT};
use itertools::Itertools;
use ubyte::ByteUnit;

use crate::MediaType;

/// The response type returned by the `into_response` methods in this module.
pub type Response = http::Response<String>;

#[derive(Debug, thiserror::Error)]
#[error("A body resolver requires at least one converter, but none were registered")]
#[non_exhaustive]
/// The error returned by [`ConverterRegistry::new`] when no converters are provided.
///
/// A resolver without converters can never succeed: this is a configuration error,
/// to be surfaced when the application starts.
///
/// [`ConverterRegistry::new`]: crate::ConverterRegistry::new
pub struct EmptyRegistryError;

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
/// The error returned by [`BodyResolver::resolve`] when the resolution fails.
///
/// [`BodyResolver::resolve`]: crate::BodyResolver::resolve
pub enum ResolveBodyError {
    #[error(transparent)]
    /// See [`InvalidContentType`] for details.
    InvalidContentType(#[from] InvalidContentType),
    #[error(transparent)]
    /// See [`UnsupportedMediaType`] for details.
    UnsupportedMediaType(#[from] UnsupportedMediaType),
    #[error(transparent)]
    /// See [`ReadBodyError`] for details.
    Read(#[from] ReadBodyError),
}

impl ResolveBodyError {
    /// Convert a [`ResolveBodyError`] into an HTTP response.
    ///
    /// - `415 Unsupported Media Type` if no converter could handle the request,
    ///   with an `Accept` header listing the supported media types;
    /// - `415 Unsupported Media Type` if the `Content-Type` header is not a valid media type;
    /// - `400 Bad Request` if the body couldn't be deserialized;
    /// - `500 Internal Server Error` if the body couldn't be read.
    pub fn into_response(&self) -> Response {
        match self {
            ResolveBodyError::InvalidContentType(e) => e.into_response(),
            ResolveBodyError::UnsupportedMediaType(e) => e.into_response(),
            ResolveBodyError::Read(e) => e.into_response(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error(
    "The `Content-Type` header was set to `{content_type}`, but this endpoint only accepts {}",
    join_media_types(.acceptable)
)]
#[non_exhaustive]
/// None of the registered converters can read a body of the given content type
/// into the requested target type.
pub struct UnsupportedMediaType {
    /// The effective content type of the request.
    ///
    /// It's `application/octet-stream` if the request didn't specify a `Content-Type` header.
    pub content_type: MediaType,
    /// All the media types supported by the registered converters,
    /// from the most to the least specific.
    pub acceptable: Vec<MediaType>,
}

impl UnsupportedMediaType {
    /// Convert an [`UnsupportedMediaType`] into a `415 Unsupported Media Type` response.
    ///
    /// The supported media types are listed in the `Accept` header.
    pub fn into_response(&self) -> Response {
        let mut response = plain_text(StatusCode::UNSUPPORTED_MEDIA_TYPE, self.to_string());
        if !self.acceptable.is_empty() {
            if let Ok(accept) = HeaderValue::from_str(&self.acceptable.iter().join(", ")) {
                response.headers_mut().insert(ACCEPT, accept);
            }
        }
        response
    }
}

fn join_media_types(media_types: &[MediaType]) -> String {
    if media_types.is_empty() {
        return "no media types".into();
    }
    media_types.iter().map(|m| format!("`{m}`")).join(", ")
}

#[derive(Debug, thiserror::Error)]
#[error("The `Content-Type` header was set to `{actual}`, which is not a valid media type")]
#[non_exhaustive]
/// The `Content-Type` header is present, but it can't be parsed as a media type.
pub struct InvalidContentType {
    /// The raw value of the `Content-Type` header.
    pub actual: String,
}

impl InvalidContentType {
    /// Convert an [`InvalidContentType`] into a `415 Unsupported Media Type` response.
    pub fn into_response(&self) -> Response {
        plain_text(StatusCode::UNSUPPORTED_MEDIA_TYPE, self.to_string())
    }
}

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
/// The converter selected to handle the request failed to read its body.
///
/// The selection is binding: no other converter is tried after a read failure.
pub enum ReadBodyError {
    #[error("Something went wrong while reading the request body")]
    /// The body stream failed.
    Io(#[from] std::io::Error),
    #[error(transparent)]
    /// See [`MalformedBody`] for details.
    Malformed(#[from] MalformedBody),
}

impl ReadBodyError {
    /// The body was read, but it's not a valid payload for the target type.
    pub fn malformed<E>(source: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self::Malformed(MalformedBody {
            source: source.into(),
        })
    }

    /// Convert a [`ReadBodyError`] into an HTTP response.
    ///
    /// Malformed payloads are the caller's fault (`400 Bad Request`),
    /// I/O failures are ours (`500 Internal Server Error`).
    pub fn into_response(&self) -> Response {
        match self {
            ReadBodyError::Io(_) => plain_text(StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
            ReadBodyError::Malformed(_) => plain_text(StatusCode::BAD_REQUEST, self.to_string()),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("{source}")]
#[non_exhaustive]
/// The request body doesn't match the format expected by the selected converter.
pub struct MalformedBody {
    #[source]
    source: Box<dyn std::error::Error + Send + Sync>,
}

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
/// The error returned by [`BufferedBody::extract`] when the extraction fails.
///
/// [`BufferedBody::extract`]: crate::body::BufferedBody::extract
pub enum ExtractBufferedBodyError {
    #[error(transparent)]
    /// See [`SizeLimitExceeded`] for details.
    SizeLimitExceeded(#[from] SizeLimitExceeded),
    #[error(transparent)]
    /// See [`UnexpectedBufferError`] for details.
    UnexpectedBufferError(#[from] UnexpectedBufferError),
}

impl ExtractBufferedBodyError {
    /// Convert an [`ExtractBufferedBodyError`] into an HTTP response.
    pub fn into_response(&self) -> Response {
        let status = match self {
            ExtractBufferedBodyError::SizeLimitExceeded(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ExtractBufferedBodyError::UnexpectedBufferError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        plain_text(status, self.to_string())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("The request body is larger than the maximum size limit enforced by this server.")]
#[non_exhaustive]
/// The request body is larger than the maximum size limit enforced by this server.
pub struct SizeLimitExceeded {
    /// The maximum size limit enforced by this server.
    pub max_size: ByteUnit,
    /// The value of the `Content-Length` header for the request that breached the body
    /// size limit.
    ///
    /// It's set to `None` if the `Content-Length` header was missing or invalid.
    /// If it's set to `Some(n)` and `n` is smaller than `max_size`, then the request
    /// lied about the size of its body in the `Content-Length` header.
    pub content_length: Option<usize>,
}

#[derive(Debug, thiserror::Error)]
#[error("Something went wrong while reading the request body.")]
#[non_exhaustive]
/// Something went wrong while reading the request body, but we don't know what specifically.
pub struct UnexpectedBufferError {
    #[source]
    pub(crate) source: Box<dyn std::error::Error + Send + Sync>,
}

fn plain_text(status: StatusCode, body: String) -> Response {
    let mut response = Response::new(body);
    *response.status_mut() = status;
    response.headers_mut().insert(
        http::header::CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    response
}
