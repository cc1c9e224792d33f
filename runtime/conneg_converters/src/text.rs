use conneg::{ConcreteType, Converter, Deserialized, InputMessage, MediaType, ReadBodyError};

use crate::errors::{InvalidText, UnsupportedCharset};
use crate::targets::read_to_end;

#[derive(Debug)]
/// Read request bodies as [`String`]s.
///
/// It accepts any media type, but only the `utf-8` and `us-ascii` charsets.
/// Bodies without a `charset` parameter are decoded as UTF-8.
pub struct StringConverter {
    media_types: [MediaType; 2],
}

impl Default for StringConverter {
    fn default() -> Self {
        Self {
            media_types: [MediaType::TEXT_PLAIN, MediaType::ALL],
        }
    }
}

impl StringConverter {
    /// Box the converter, ready to be registered with a [`BodyResolver`](conneg::BodyResolver).
    pub fn boxed(self) -> Box<dyn Converter> {
        Box::new(self)
    }
}

impl Converter for StringConverter {
    fn supported_media_types(&self) -> &[MediaType] {
        &self.media_types
    }

    fn can_read(&self, target: &ConcreteType, media_type: &MediaType) -> bool {
        *target == ConcreteType::of::<String>() && self.supports(media_type)
    }

    fn read(
        &self,
        _target: &ConcreteType,
        input: &mut dyn InputMessage,
    ) -> Result<Deserialized, ReadBodyError> {
        let charset = input
            .content_type()
            .map_err(ReadBodyError::malformed)?
            .and_then(|m| m.charset().map(ToOwned::to_owned));
        let body = read_to_end(input)?;
        let text = match charset.as_deref() {
            None | Some("utf-8") | Some("utf8") => {
                String::from_utf8(body).map_err(|_| invalid_text("UTF-8"))?
            }
            Some("us-ascii") | Some("ascii") => {
                if !body.is_ascii() {
                    return Err(invalid_text("US-ASCII"));
                }
                String::from_utf8(body).map_err(|_| invalid_text("US-ASCII"))?
            }
            Some(charset) => {
                return Err(ReadBodyError::malformed(UnsupportedCharset {
                    charset: charset.to_owned(),
                }));
            }
        };
        Ok(Deserialized::new(text))
    }
}

fn invalid_text(charset: &'static str) -> ReadBodyError {
    ReadBodyError::malformed(InvalidText { charset })
}
