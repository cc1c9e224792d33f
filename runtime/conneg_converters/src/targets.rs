use std::fmt;

use conneg::{ConcreteType, Deserialized, InputMessage, ReadBodyError, TypeDescriptor};
use indexmap::IndexMap;

/// Turn a buffered request body into a type-erased value.
pub(crate) type Decoder = Box<dyn Fn(&[u8]) -> Result<Deserialized, ReadBodyError> + Send + Sync>;

#[derive(Default)]
/// The target types a serde-backed converter knows how to produce,
/// each with the decoder that produces it.
pub(crate) struct TargetTable {
    decoders: IndexMap<TypeDescriptor, Decoder>,
}

impl TargetTable {
    /// Register a decoder for `target`, replacing any previous decoder for the same descriptor.
    pub(crate) fn insert(&mut self, target: TypeDescriptor, decoder: Decoder) {
        self.decoders.insert(target, decoder);
    }

    pub(crate) fn get(&self, target: &TypeDescriptor) -> Option<&Decoder> {
        self.decoders.get(target)
    }

    pub(crate) fn get_concrete(&self, target: &ConcreteType) -> Option<&Decoder> {
        self.get(&TypeDescriptor::Concrete(target.clone()))
    }

    pub(crate) fn contains(&self, target: &TypeDescriptor) -> bool {
        self.decoders.contains_key(target)
    }

    pub(crate) fn contains_concrete(&self, target: &ConcreteType) -> bool {
        self.get_concrete(target).is_some()
    }

    /// Buffer the body of `input` and hand it over to `decoder`.
    ///
    /// A missing decoder is reported as a malformed body: converters only read targets
    /// they said they could read.
    pub(crate) fn decode(
        decoder: Option<&Decoder>,
        target: &dyn fmt::Display,
        input: &mut dyn InputMessage,
    ) -> Result<Deserialized, ReadBodyError> {
        let Some(decoder) = decoder else {
            return Err(ReadBodyError::malformed(format!(
                "There is no decoder registered for `{target}`"
            )));
        };
        let body = read_to_end(input)?;
        decoder(&body)
    }
}

impl fmt::Debug for TargetTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set()
            .entries(self.decoders.keys().map(|k| k.to_string()))
            .finish()
    }
}

pub(crate) fn read_to_end(input: &mut dyn InputMessage) -> Result<Vec<u8>, ReadBodyError> {
    let mut body = Vec::new();
    input.body().read_to_end(&mut body)?;
    Ok(body)
}
