use std::io::Read;

use bytes::{Buf, Bytes, buf::Reader};
use http::HeaderMap;
use http::header::CONTENT_TYPE;

use crate::MediaType;
use crate::body::{BodySizeLimit, BufferedBody};
use crate::errors::{ExtractBufferedBodyError, InvalidContentType};

/// The headers and the body of an incoming request, as seen by a [`Converter`].
///
/// A fresh input message is created for every resolution.
///
/// [`Converter`]: crate::Converter
pub trait InputMessage {
    /// The request headers.
    fn headers(&self) -> &HeaderMap;

    /// The request body.
    fn body(&mut self) -> &mut dyn Read;

    /// The media type in the `Content-Type` header.
    ///
    /// It returns `Ok(None)` if the header is missing and an error if the header
    /// can't be parsed as a media type.
    fn content_type(&self) -> Result<Option<MediaType>, InvalidContentType> {
        let Some(value) = self.headers().get(CONTENT_TYPE) else {
            return Ok(None);
        };
        let Ok(value) = value.to_str() else {
            return Err(InvalidContentType {
                actual: String::from_utf8_lossy(value.as_bytes()).into_owned(),
            });
        };
        MediaType::parse(value)
            .map(Some)
            .map_err(|_| InvalidContentType {
                actual: value.to_owned(),
            })
    }
}

#[derive(Debug)]
/// An [`InputMessage`] backed by a request whose body has already been buffered.
///
/// # Example
///
/// ```rust
/// use conneg::{InputMessage, MediaType, RequestInputMessage};
///
/// let request = http::Request::builder()
///     .header("Content-Type", "application/json")
///     .body(bytes::Bytes::from_static(b"{}"))
///     .unwrap();
/// let message = RequestInputMessage::from_request(request);
/// assert_eq!(message.content_type().unwrap(), Some(MediaType::APPLICATION_JSON));
/// ```
pub struct RequestInputMessage {
    headers: HeaderMap,
    body: Reader<Bytes>,
}

impl RequestInputMessage {
    /// Create an input message from request headers and a buffered body.
    pub fn new(headers: HeaderMap, body: impl Into<Bytes>) -> Self {
        Self {
            headers,
            body: body.into().reader(),
        }
    }

    /// Create an input message from a request whose body has already been buffered.
    pub fn from_request<B>(request: http::Request<B>) -> Self
    where
        B: Into<Bytes>,
    {
        let (parts, body) = request.into_parts();
        Self::new(parts.headers, body)
    }

    /// Buffer the body of a streaming request and wrap it into an input message.
    ///
    /// Check out [`BufferedBody::extract`] for the details on size limits.
    pub async fn buffer<B>(
        request: http::Request<B>,
        body_size_limit: BodySizeLimit,
    ) -> Result<Self, ExtractBufferedBodyError>
    where
        B: http_body::Body,
        B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        let (parts, body) = request.into_parts();
        let buffered = BufferedBody::extract(&parts.headers, body, body_size_limit).await?;
        Ok(Self::new(parts.headers, buffered))
    }
}

impl InputMessage for RequestInputMessage {
    fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    fn body(&mut self) -> &mut dyn Read {
        &mut self.body
    }
}
