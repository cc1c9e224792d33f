use indexmap::IndexSet;

use crate::errors::EmptyRegistryError;
use crate::{Converter, MediaType};

#[derive(Debug)]
/// An ordered, immutable collection of [`Converter`]s.
///
/// The registration order is a priority order: when resolving a request body,
/// converters are consulted in the order they were registered and the first match wins.
pub struct ConverterRegistry {
    converters: Box<[Box<dyn Converter>]>,
    all_supported_media_types: Box<[MediaType]>,
}

impl ConverterRegistry {
    /// Build a registry out of a non-empty sequence of converters.
    ///
    /// It fails with [`EmptyRegistryError`] if `converters` is empty.
    pub fn new<I>(converters: I) -> Result<Self, EmptyRegistryError>
    where
        I: IntoIterator<Item = Box<dyn Converter>>,
    {
        let converters: Box<[_]> = converters.into_iter().collect();
        if converters.is_empty() {
            return Err(EmptyRegistryError);
        }
        let all_supported_media_types = all_supported_media_types(&converters);
        Ok(Self {
            converters,
            all_supported_media_types,
        })
    }

    /// The registered converters, in registration order.
    pub fn converters(&self) -> impl ExactSizeIterator<Item = &dyn Converter> {
        self.converters.iter().map(|c| c.as_ref())
    }

    /// All the media types supported by at least one converter, without duplicates,
    /// from the most to the least specific.
    pub fn all_supported_media_types(&self) -> &[MediaType] {
        &self.all_supported_media_types
    }
}

fn all_supported_media_types(converters: &[Box<dyn Converter>]) -> Box<[MediaType]> {
    let unique: IndexSet<MediaType> = converters
        .iter()
        .flat_map(|c| c.supported_media_types().iter().cloned())
        .collect();
    let mut media_types: Vec<_> = unique.into_iter().collect();
    MediaType::sort_by_specificity(&mut media_types);
    media_types.into_boxed_slice()
}
