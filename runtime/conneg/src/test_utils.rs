use std::borrow::Cow;

use crate::errors::ReadBodyError;
use crate::{ConcreteType, Converter, Deserialized, InputMessage, MediaType};

/// A converter that can read any concrete type, as long as the media type is supported.
/// It yields its own name instead of reading the body.
#[derive(Debug)]
pub(crate) struct StubConverter {
    name: &'static str,
    media_types: Vec<MediaType>,
}

impl StubConverter {
    pub(crate) fn new<'a>(name: &'static str, media_types: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            name,
            media_types: media_types
                .into_iter()
                .map(|m| m.parse().unwrap())
                .collect(),
        }
    }

    pub(crate) fn boxed(self) -> Box<dyn Converter> {
        Box::new(self)
    }
}

impl Converter for StubConverter {
    fn name(&self) -> Cow<'static, str> {
        Cow::Borrowed(self.name)
    }

    fn supported_media_types(&self) -> &[MediaType] {
        &self.media_types
    }

    fn can_read(&self, _target: &ConcreteType, media_type: &MediaType) -> bool {
        self.supports(media_type)
    }

    fn read(
        &self,
        _target: &ConcreteType,
        _input: &mut dyn InputMessage,
    ) -> Result<Deserialized, ReadBodyError> {
        Ok(Deserialized::new(self.name))
    }
}
