//! Errors that can occur while converting request bodies.
//!
//! They are reported to [`conneg`] as [`ReadBodyError::Malformed`](conneg::ReadBodyError::Malformed).

#[derive(Debug, thiserror::Error)]
#[error("Failed to deserialize the body as a JSON document.\n{source}")]
#[non_exhaustive]
/// Something went wrong when deserializing the request body into the specified type.
pub struct JsonDeserializationError {
    #[source]
    pub(crate) source: serde_path_to_error::Error<serde_json::Error>,
}

#[derive(Debug, thiserror::Error)]
#[error("Failed to deserialize the body as a urlencoded form.\n{source}")]
#[non_exhaustive]
/// Something went wrong when deserializing the request body into the specified type.
pub struct UrlEncodedBodyDeserializationError {
    #[source]
    pub(crate) source: serde_html_form::de::Error,
}

#[derive(Debug, thiserror::Error)]
#[error("The request body was declared as `{charset}`, but only UTF-8 and US-ASCII are supported")]
#[non_exhaustive]
/// The `charset` parameter of the `Content-Type` header is not supported.
pub struct UnsupportedCharset {
    /// The value of the `charset` parameter.
    pub charset: String,
}

#[derive(Debug, thiserror::Error)]
#[error("The request body is not valid {charset} text")]
#[non_exhaustive]
/// The request body doesn't match the charset declared in the `Content-Type` header.
pub struct InvalidText {
    /// The charset the body was decoded with.
    pub charset: &'static str,
}
