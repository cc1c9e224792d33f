//! Media types and the specificity ordering used to report them.
use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

#[derive(Clone, Debug)]
/// A structured `Content-Type` descriptor, e.g. `application/json; charset=utf-8`.
///
/// Type, subtype and parameter names are stored in lowercase, and so is the value
/// of the `charset` parameter.
/// Two media types are equal if they have the same type, subtype and parameters,
/// regardless of the order the parameters were specified in.
///
/// # Example
///
/// ```rust
/// use conneg::MediaType;
///
/// let media_type: MediaType = "Text/Plain; charset=UTF-8".parse().unwrap();
/// assert_eq!(media_type.to_string(), "text/plain;charset=utf-8");
/// assert!(MediaType::TEXT_PLAIN.includes(&media_type));
/// ```
pub struct MediaType {
    type_: Cow<'static, str>,
    subtype: Cow<'static, str>,
    parameters: Vec<(Cow<'static, str>, Cow<'static, str>)>,
}

const WILDCARD: &str = "*";
const QUALITY: &str = "q";
const CHARSET: &str = "charset";

impl MediaType {
    /// `*/*`
    pub const ALL: MediaType = MediaType::from_static("*", "*");
    /// `application/json`
    pub const APPLICATION_JSON: MediaType = MediaType::from_static("application", "json");
    /// `application/octet-stream`
    ///
    /// Used as the effective content type of requests without a `Content-Type` header.
    pub const APPLICATION_OCTET_STREAM: MediaType =
        MediaType::from_static("application", "octet-stream");
    /// `application/x-www-form-urlencoded`
    pub const APPLICATION_WWW_FORM_URLENCODED: MediaType =
        MediaType::from_static("application", "x-www-form-urlencoded");
    /// `application/xml`
    pub const APPLICATION_XML: MediaType = MediaType::from_static("application", "xml");
    /// `text/plain`
    pub const TEXT_PLAIN: MediaType = MediaType::from_static("text", "plain");

    /// Build a media type out of static, already lowercase, components.
    pub const fn from_static(type_: &'static str, subtype: &'static str) -> Self {
        Self {
            type_: Cow::Borrowed(type_),
            subtype: Cow::Borrowed(subtype),
            parameters: Vec::new(),
        }
    }

    /// Build a media type without parameters.
    pub fn new(type_: &str, subtype: &str) -> Self {
        Self {
            type_: Cow::Owned(type_.to_ascii_lowercase()),
            subtype: Cow::Owned(subtype.to_ascii_lowercase()),
            parameters: Vec::new(),
        }
    }

    /// Add a parameter, replacing any previous value for the same name.
    pub fn with_parameter(mut self, name: &str, value: &str) -> Self {
        let name = name.to_ascii_lowercase();
        let value = normalize_parameter_value(&name, value);
        match self.parameters.iter_mut().find(|(n, _)| *n == name) {
            Some((_, v)) => *v = Cow::Owned(value),
            None => self
                .parameters
                .push((Cow::Owned(name), Cow::Owned(value))),
        }
        self
    }

    /// Parse a media type, e.g. the value of a `Content-Type` header.
    pub fn parse(value: &str) -> Result<Self, InvalidMediaType> {
        let invalid = |reason: InvalidReason| InvalidMediaType {
            value: value.to_owned(),
            reason,
        };
        let mime = value
            .trim()
            .parse::<mime::Mime>()
            .map_err(|e| invalid(InvalidReason::Syntax(e)))?;
        let media_type = MediaType::from(mime);
        if media_type.is_wildcard_type() && media_type.subtype != WILDCARD {
            return Err(invalid(InvalidReason::WildcardType));
        }
        if let Some(quality) = media_type.parameter(QUALITY) {
            check_quality(quality).map_err(invalid)?;
        }
        Ok(media_type)
    }

    /// The primary type, e.g. `text` in `text/plain`.
    pub fn type_(&self) -> &str {
        &self.type_
    }

    /// The subtype, e.g. `plain` in `text/plain`.
    ///
    /// Structured syntax suffixes are part of the subtype (`hal+json`).
    pub fn subtype(&self) -> &str {
        &self.subtype
    }

    /// The structured syntax suffix, if any, e.g. `json` in `application/hal+json`.
    pub fn suffix(&self) -> Option<&str> {
        self.subtype.split_once('+').map(|(_, suffix)| suffix)
    }

    /// The value of a parameter, if set.
    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.parameters
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_ref())
    }

    /// All parameters, in the order they were specified.
    pub fn parameters(&self) -> impl ExactSizeIterator<Item = (&str, &str)> {
        self.parameters.iter().map(|(n, v)| (n.as_ref(), v.as_ref()))
    }

    /// The `charset` parameter, if set.
    pub fn charset(&self) -> Option<&str> {
        self.parameter(CHARSET)
    }

    /// The quality value (`q` parameter), defaulting to `1.0`.
    pub fn quality(&self) -> f64 {
        self.parameter(QUALITY)
            .and_then(|q| q.parse().ok())
            .unwrap_or(1.0)
    }

    /// `true` for `*/*`.
    pub fn is_wildcard_type(&self) -> bool {
        self.type_ == WILDCARD
    }

    /// `true` for `type/*` and `type/*+suffix`.
    pub fn is_wildcard_subtype(&self) -> bool {
        self.subtype == WILDCARD || self.subtype.starts_with("*+")
    }

    /// `true` if neither the type nor the subtype is a wildcard.
    pub fn is_concrete(&self) -> bool {
        !self.is_wildcard_type() && !self.is_wildcard_subtype()
    }

    /// Check if `other` falls within the range of media types described by `self`.
    ///
    /// `*/*` includes everything, `text/*` includes `text/plain`,
    /// `application/*+json` includes `application/hal+json`.
    /// Parameters are ignored.
    pub fn includes(&self, other: &MediaType) -> bool {
        if self.is_wildcard_type() {
            return true;
        }
        if self.type_ != other.type_ {
            return false;
        }
        if self.subtype == other.subtype {
            return true;
        }
        if !self.is_wildcard_subtype() {
            return false;
        }
        match self.subtype.split_once('+') {
            None => true,
            Some((_, suffix)) => other.suffix() == Some(suffix),
        }
    }

    /// The same media type, without parameters.
    pub fn essence(&self) -> MediaType {
        Self {
            type_: self.type_.clone(),
            subtype: self.subtype.clone(),
            parameters: Vec::new(),
        }
    }

    /// Sort media types from the most specific to the least specific.
    ///
    /// See [`specificity`] for the ordering. The sort is stable: media types with the same
    /// specificity keep their relative order.
    pub fn sort_by_specificity(media_types: &mut [MediaType]) {
        // `specificity` is not a total order across unrelated types (`text/plain` and
        // `application/json` are "equal"), so we can't rely on `slice::sort_by`.
        for i in 1..media_types.len() {
            let mut j = i;
            while j > 0 && specificity(&media_types[j - 1], &media_types[j]) == Ordering::Greater {
                media_types.swap(j - 1, j);
                j -= 1;
            }
        }
    }
}

/// Compare two media types by specificity.
///
/// `Ordering::Less` means that `a` is more specific than `b`.
///
/// - `*/*` is less specific than any other media type;
/// - media types with different (non-wildcard) types are equally specific;
/// - `type/*` is less specific than `type/subtype`;
/// - media types with different (non-wildcard) subtypes are equally specific;
/// - for the same type and subtype, higher quality wins and then more parameters win.
pub fn specificity(a: &MediaType, b: &MediaType) -> Ordering {
    match (a.is_wildcard_type(), b.is_wildcard_type()) {
        (true, false) => return Ordering::Greater,
        (false, true) => return Ordering::Less,
        _ => {}
    }
    if a.type_ != b.type_ {
        return Ordering::Equal;
    }
    match (a.is_wildcard_subtype(), b.is_wildcard_subtype()) {
        (true, false) => return Ordering::Greater,
        (false, true) => return Ordering::Less,
        _ => {}
    }
    if a.subtype != b.subtype {
        return Ordering::Equal;
    }
    b.quality()
        .partial_cmp(&a.quality())
        .unwrap_or(Ordering::Equal)
        .then_with(|| b.parameters.len().cmp(&a.parameters.len()))
}

impl PartialEq for MediaType {
    fn eq(&self, other: &Self) -> bool {
        self.type_ == other.type_
            && self.subtype == other.subtype
            && sorted_parameters(self) == sorted_parameters(other)
    }
}

impl Eq for MediaType {}

impl Hash for MediaType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_.hash(state);
        self.subtype.hash(state);
        sorted_parameters(self).hash(state);
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.type_, self.subtype)?;
        for (name, value) in &self.parameters {
            write!(f, ";{name}={value}")?;
        }
        Ok(())
    }
}

impl FromStr for MediaType {
    type Err = InvalidMediaType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<mime::Mime> for MediaType {
    fn from(mime: mime::Mime) -> Self {
        let mut media_type = Self::new(mime.type_().as_str(), mime.subtype().as_str());
        if let Some(suffix) = mime.suffix() {
            media_type.subtype = Cow::Owned(format!("{}+{}", media_type.subtype, suffix.as_str()));
        }
        for (name, value) in mime.params() {
            media_type = media_type.with_parameter(name.as_str(), unquote(value.as_str()));
        }
        media_type
    }
}

fn sorted_parameters(media_type: &MediaType) -> Vec<(&str, &str)> {
    let mut parameters: Vec<_> = media_type.parameters().collect();
    parameters.sort_unstable();
    parameters
}

fn normalize_parameter_value(name: &str, value: &str) -> String {
    if name == CHARSET {
        value.to_ascii_lowercase()
    } else {
        value.to_owned()
    }
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}

fn check_quality(value: &str) -> Result<(), InvalidReason> {
    match value.parse::<f64>() {
        Ok(q) if (0.0..=1.0).contains(&q) => Ok(()),
        _ => Err(InvalidReason::Quality(value.to_owned())),
    }
}

#[derive(Debug, thiserror::Error)]
#[error("`{value}` is not a valid media type")]
#[non_exhaustive]
/// The error returned by [`MediaType::parse`].
pub struct InvalidMediaType {
    /// The value we tried to parse.
    pub value: String,
    #[source]
    reason: InvalidReason,
}

#[derive(Debug, thiserror::Error)]
enum InvalidReason {
    #[error(transparent)]
    Syntax(mime::FromStrError),
    #[error("A wildcard type is only allowed in `*/*`")]
    WildcardType,
    #[error("The quality value must be a number between 0 and 1, got `{0}`")]
    Quality(String),
}
