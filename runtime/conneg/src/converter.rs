use std::any::Any;
use std::borrow::Cow;
use std::fmt;

use crate::errors::ReadBodyError;
use crate::{ConcreteType, InputMessage, MediaType, TypeDescriptor};

/// A pluggable codec that can deserialize request bodies of certain media types.
///
/// Every converter supports the *basic* capability: matching on a [`ConcreteType`]
/// and a media type.
/// Converters that need the full generic information (e.g. the element type of a
/// collection) can also implement [`GenericConverter`] and expose it via
/// [`Converter::as_generic`].
///
/// # Contract
///
/// Capability checks ([`can_read`](Converter::can_read), [`GenericConverter::can_read_generic`])
/// must not fail. A panic in a capability check is treated as a bug in the converter:
/// it is not caught and no other converter is consulted.
///
/// # Example
///
/// ```rust
/// use std::io::Read;
/// use conneg::{ConcreteType, Converter, Deserialized, InputMessage, MediaType, ReadBodyError};
///
/// #[derive(Debug)]
/// struct Utf8Converter {
///     media_types: Vec<MediaType>,
/// }
///
/// impl Converter for Utf8Converter {
///     fn supported_media_types(&self) -> &[MediaType] {
///         &self.media_types
///     }
///
///     fn can_read(&self, target: &ConcreteType, media_type: &MediaType) -> bool {
///         *target == ConcreteType::of::<String>() && self.supports(media_type)
///     }
///
///     fn read(
///         &self,
///         _target: &ConcreteType,
///         input: &mut dyn InputMessage,
///     ) -> Result<Deserialized, ReadBodyError> {
///         let mut body = String::new();
///         input.body().read_to_string(&mut body)?;
///         Ok(Deserialized::new(body))
///     }
/// }
/// ```
pub trait Converter: fmt::Debug + Send + Sync {
    /// A human-readable name for this converter, used in logs.
    fn name(&self) -> Cow<'static, str> {
        Cow::Borrowed(std::any::type_name::<Self>())
    }

    /// The media types this converter can read.
    fn supported_media_types(&self) -> &[MediaType];

    /// `true` if one of the [supported media types](Converter::supported_media_types)
    /// includes `media_type`.
    fn supports(&self, media_type: &MediaType) -> bool {
        self.supported_media_types()
            .iter()
            .any(|supported| supported.includes(media_type))
    }

    /// Can this converter read a body of type `media_type` into `target`?
    fn can_read(&self, target: &ConcreteType, media_type: &MediaType) -> bool;

    /// Read the body of `input` into `target`.
    ///
    /// Only invoked if [`can_read`](Converter::can_read) returned `true` for the same target.
    fn read(
        &self,
        target: &ConcreteType,
        input: &mut dyn InputMessage,
    ) -> Result<Deserialized, ReadBodyError>;

    /// The generic capability of this converter, if it has one.
    fn as_generic(&self) -> Option<&dyn GenericConverter> {
        None
    }
}

/// The generic capability of a [`Converter`].
///
/// Generic-capable converters are offered the full, unreduced [`TypeDescriptor`] first,
/// so that type arguments (e.g. `Item` in `Vec<Item>`) are not lost.
pub trait GenericConverter {
    /// Can this converter read a body of type `media_type` into `target`?
    fn can_read_generic(&self, target: &TypeDescriptor, media_type: &MediaType) -> bool;

    /// Read the body of `input` into `target`.
    ///
    /// Only invoked if [`can_read_generic`](GenericConverter::can_read_generic)
    /// returned `true` for the same target.
    fn read_generic(
        &self,
        target: &TypeDescriptor,
        input: &mut dyn InputMessage,
    ) -> Result<Deserialized, ReadBodyError>;
}

/// A type-erased value produced by a [`Converter`].
///
/// Use [`Deserialized::downcast`] to recover the concrete value.
pub struct Deserialized(Box<dyn Any + Send>);

impl Deserialized {
    /// Wrap a deserialized value.
    pub fn new<T: Any + Send>(value: T) -> Self {
        Self(Box::new(value))
    }

    /// `true` if the wrapped value is a `T`.
    pub fn is<T: Any>(&self) -> bool {
        self.0.is::<T>()
    }

    /// Recover the wrapped value, if it's a `T`.
    ///
    /// The original `Deserialized` is returned if it isn't.
    pub fn downcast<T: Any>(self) -> Result<T, Self> {
        self.0.downcast::<T>().map(|value| *value).map_err(Self)
    }

    /// A reference to the wrapped value, if it's a `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }
}

impl fmt::Debug for Deserialized {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Deserialized").finish_non_exhaustive()
    }
}
