use conneg::{ConcreteType, Converter, Deserialized, InputMessage, MediaType, ReadBodyError};
use serde::de::DeserializeOwned;

use crate::errors::UrlEncodedBodyDeserializationError;
use crate::targets::TargetTable;

#[doc(alias = "Form")]
#[doc(alias = "FormBody")]
#[doc(alias = "PercentEncoded")]
#[derive(Debug)]
/// Read `application/x-www-form-urlencoded` request bodies.
///
/// It only has the basic capability: targets are matched on their [`ConcreteType`].
///
/// # Sequences
///
/// Sequences are supported by repeating the same key:
///
/// ```text
/// tag=first&tag=second
/// ```
///
/// deserializes into `tag: vec!["first", "second"]`.
pub struct UrlEncodedConverter {
    media_types: [MediaType; 1],
    targets: TargetTable,
}

impl Default for UrlEncodedConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl UrlEncodedConverter {
    /// A converter for `application/x-www-form-urlencoded`, with no targets.
    pub fn new() -> Self {
        Self {
            media_types: [MediaType::APPLICATION_WWW_FORM_URLENCODED],
            targets: TargetTable::default(),
        }
    }

    /// Deserialize bodies into `T` when the requested target is `T`.
    pub fn accept<T>(mut self) -> Self
    where
        T: DeserializeOwned + Send + 'static,
    {
        self.targets.insert(
            ConcreteType::of::<T>().into(),
            Box::new(|body: &[u8]| parse::<T>(body).map(Deserialized::new)),
        );
        self
    }

    /// Box the converter, ready to be registered with a [`BodyResolver`](conneg::BodyResolver).
    pub fn boxed(self) -> Box<dyn Converter> {
        Box::new(self)
    }
}

fn parse<T: DeserializeOwned>(body: &[u8]) -> Result<T, ReadBodyError> {
    serde_html_form::from_bytes(body)
        .map_err(|e| ReadBodyError::malformed(UrlEncodedBodyDeserializationError { source: e }))
}

impl Converter for UrlEncodedConverter {
    fn supported_media_types(&self) -> &[MediaType] {
        &self.media_types
    }

    fn can_read(&self, target: &ConcreteType, media_type: &MediaType) -> bool {
        self.targets.contains_concrete(target) && self.supports(media_type)
    }

    fn read(
        &self,
        target: &ConcreteType,
        input: &mut dyn InputMessage,
    ) -> Result<Deserialized, ReadBodyError> {
        TargetTable::decode(self.targets.get_concrete(target), target, input)
    }
}
