use conneg::{
    ConcreteType, Converter, Deserialized, GenericConverter, InputMessage, MediaType,
    ReadBodyError, TypeDescriptor,
};
use serde::de::DeserializeOwned;

use crate::errors::JsonDeserializationError;
use crate::targets::TargetTable;

#[doc(alias = "Json")]
#[derive(Debug)]
/// Read JSON request bodies.
///
/// It supports `application/json` and any other `application/*+json` media type.
///
/// `JsonConverter` is generic-capable: targets are matched on their full [`TypeDescriptor`],
/// type arguments included. It can only read the targets registered via
/// [`accept`](JsonConverter::accept).
///
/// # Example
///
/// ```rust
/// use conneg::{BodyResolver, TypeDescriptor};
/// use conneg_converters::JsonConverter;
///
/// #[derive(serde::Deserialize)]
/// pub struct HomeListing {
///     address: String,
///     price: u64,
/// }
///
/// let listings = TypeDescriptor::parameterized(
///     TypeDescriptor::named("Vec"),
///     [TypeDescriptor::of::<HomeListing>()],
/// );
/// let json = JsonConverter::new()
///     .accept::<HomeListing>(TypeDescriptor::of::<HomeListing>())
///     .accept::<Vec<HomeListing>>(listings);
/// let resolver = BodyResolver::new([json.boxed()]).unwrap();
/// ```
pub struct JsonConverter {
    media_types: Vec<MediaType>,
    targets: TargetTable,
}

impl Default for JsonConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonConverter {
    /// A converter for `application/json` and `application/*+json`, with no targets.
    pub fn new() -> Self {
        Self {
            media_types: vec![
                MediaType::APPLICATION_JSON,
                MediaType::new("application", "*+json"),
            ],
            targets: TargetTable::default(),
        }
    }

    /// Deserialize bodies into `T` when the requested target is `descriptor`.
    pub fn accept<T>(mut self, descriptor: TypeDescriptor) -> Self
    where
        T: DeserializeOwned + Send + 'static,
    {
        self.targets.insert(
            descriptor,
            Box::new(|body: &[u8]| parse::<T>(body).map(Deserialized::new)),
        );
        self
    }

    /// Shorthand for `accept::<T>(TypeDescriptor::of::<T>())`.
    pub fn accept_type<T>(self) -> Self
    where
        T: DeserializeOwned + Send + 'static,
    {
        self.accept::<T>(TypeDescriptor::of::<T>())
    }

    /// Box the converter, ready to be registered with a [`BodyResolver`](conneg::BodyResolver).
    pub fn boxed(self) -> Box<dyn Converter> {
        Box::new(self)
    }
}

fn parse<T: DeserializeOwned>(body: &[u8]) -> Result<T, ReadBodyError> {
    let mut deserializer = serde_json::Deserializer::from_slice(body);
    serde_path_to_error::deserialize(&mut deserializer)
        .map_err(|e| ReadBodyError::malformed(JsonDeserializationError { source: e }))
}

impl Converter for JsonConverter {
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

    fn as_generic(&self) -> Option<&dyn GenericConverter> {
        Some(self)
    }
}

impl GenericConverter for JsonConverter {
    fn can_read_generic(&self, target: &TypeDescriptor, media_type: &MediaType) -> bool {
        self.targets.contains(target) && self.supports(media_type)
    }

    fn read_generic(
        &self,
        target: &TypeDescriptor,
        input: &mut dyn InputMessage,
    ) -> Result<Deserialized, ReadBodyError> {
        TargetTable::decode(self.targets.get(target), target, input)
    }
}
