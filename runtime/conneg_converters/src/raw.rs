use bytes::Bytes;
use conneg::{ConcreteType, Converter, Deserialized, InputMessage, MediaType, ReadBodyError};

use crate::targets::read_to_end;

#[derive(Debug)]
/// Read request bodies as raw bytes, into either [`Bytes`] or `Vec<u8>`.
///
/// It accepts any media type.
pub struct BytesConverter {
    media_types: [MediaType; 2],
}

impl Default for BytesConverter {
    fn default() -> Self {
        Self {
            media_types: [MediaType::APPLICATION_OCTET_STREAM, MediaType::ALL],
        }
    }
}

impl BytesConverter {
    /// Box the converter, ready to be registered with a [`BodyResolver`](conneg::BodyResolver).
    pub fn boxed(self) -> Box<dyn Converter> {
        Box::new(self)
    }
}

impl Converter for BytesConverter {
    fn supported_media_types(&self) -> &[MediaType] {
        &self.media_types
    }

    fn can_read(&self, target: &ConcreteType, media_type: &MediaType) -> bool {
        (*target == ConcreteType::of::<Bytes>() || *target == ConcreteType::of::<Vec<u8>>())
            && self.supports(media_type)
    }

    fn read(
        &self,
        target: &ConcreteType,
        input: &mut dyn InputMessage,
    ) -> Result<Deserialized, ReadBodyError> {
        let body = read_to_end(input)?;
        if *target == ConcreteType::of::<Bytes>() {
            Ok(Deserialized::new(Bytes::from(body)))
        } else {
            Ok(Deserialized::new(body))
        }
    }
}
