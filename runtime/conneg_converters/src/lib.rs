//! Ready-made [`Converter`](conneg::Converter)s for [`conneg`].
//!
//! | Converter               | Media types                              | Targets                         |
//! |-------------------------|------------------------------------------|---------------------------------|
//! | [`BytesConverter`]      | `application/octet-stream`, `*/*`        | `bytes::Bytes`, `Vec<u8>`       |
//! | [`StringConverter`]     | `text/plain`, `*/*`                      | `String`                        |
//! | [`UrlEncodedConverter`] | `application/x-www-form-urlencoded`      | registered via `accept`         |
//! | [`JsonConverter`]       | `application/json`, `application/*+json` | registered via `accept`, generic |
//!
//! Converters are consulted in registration order, so register the catch-all ones
//! with care: a [`StringConverter`] registered before a [`JsonConverter`] will read
//! JSON bodies into `String` targets.
pub use json::JsonConverter;
pub use raw::BytesConverter;
pub use text::StringConverter;
pub use url_encoded::UrlEncodedConverter;

pub mod errors;
mod json;
mod raw;
mod targets;
mod text;
mod url_encoded;
