use std::fmt;
use std::sync::Arc;

use bytes::Bytes;

use crate::errors::{EmptyRegistryError, ReadBodyError, ResolveBodyError, UnsupportedMediaType};
use crate::observer::{
    ConverterSelected, NoConverterFound, ReadFailed, ReadPath, ResolutionObserver, TracingObserver,
};
use crate::{
    Converter, ConverterRegistry, Deserialized, InputMessage, MediaType, RequestInputMessage,
    TypeDescriptor,
};

/// Deserialize request bodies using the first registered converter that can handle
/// the request's content type and the expected target type.
///
/// A `BodyResolver` is immutable once built: share it across requests (e.g. behind an [`Arc`])
/// and call [`resolve`](BodyResolver::resolve) concurrently.
///
/// # Example
///
/// ```rust
/// use conneg::{BodyResolver, Converter, ResolveBodyError, TypeDescriptor};
///
/// fn handle(
///     converters: Vec<Box<dyn Converter>>,
///     request: http::Request<bytes::Bytes>,
/// ) -> Result<(), ResolveBodyError> {
///     let resolver = BodyResolver::new(converters).expect("No converters were registered");
///     let body = resolver.resolve_request(request, &TypeDescriptor::of::<String>())?;
///     let body: String = body.downcast().expect("Unexpected body type");
///     println!("{body}");
///     Ok(())
/// }
/// ```
pub struct BodyResolver {
    registry: ConverterRegistry,
    observer: Option<Arc<dyn ResolutionObserver>>,
}

impl BodyResolver {
    /// Build a resolver out of a non-empty, ordered sequence of converters.
    ///
    /// Converters are consulted in the order they are provided.
    /// Decisions are logged via [`TracingObserver`]: use [`BodyResolver::observer`]
    /// or [`BodyResolver::without_observer`] to change that.
    pub fn new<I>(converters: I) -> Result<Self, EmptyRegistryError>
    where
        I: IntoIterator<Item = Box<dyn Converter>>,
    {
        ConverterRegistry::new(converters).map(Self::from_registry)
    }

    /// Build a resolver out of an existing registry.
    pub fn from_registry(registry: ConverterRegistry) -> Self {
        Self {
            registry,
            observer: Some(Arc::new(TracingObserver)),
        }
    }

    /// Replace the observer notified about converter selection.
    pub fn observer(mut self, observer: Arc<dyn ResolutionObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Don't notify anyone about converter selection.
    pub fn without_observer(mut self) -> Self {
        self.observer = None;
        self
    }

    /// The underlying converter registry.
    pub fn registry(&self) -> &ConverterRegistry {
        &self.registry
    }

    /// Deserialize the body of a request whose body has already been buffered.
    ///
    /// Check out [`BodyResolver::resolve`] for the selection rules.
    pub fn resolve_request<B>(
        &self,
        request: http::Request<B>,
        target: &TypeDescriptor,
    ) -> Result<Deserialized, ResolveBodyError>
    where
        B: Into<Bytes>,
    {
        let mut input = RequestInputMessage::from_request(request);
        self.resolve(&mut input, target)
    }

    /// Deserialize the body of `input` into `target`.
    ///
    /// # Selection rules
    ///
    /// The effective content type is taken from the `Content-Type` header, falling back to
    /// `application/octet-stream` if the header is missing.
    ///
    /// Converters are then consulted in registration order. For each converter:
    ///
    /// 1. if it is generic-capable, it is asked if it can read the full `target` descriptor;
    /// 2. then, whether or not it is generic-capable, if `target`
    ///    [reduces](TypeDescriptor::reduce) to a concrete type,
    ///    it is asked if it can read that concrete type.
    ///
    /// The first converter that answers yes reads the body and its outcome is returned,
    /// success or failure: a read failure is never retried with another converter.
    ///
    /// If no converter matches, [`ResolveBodyError::UnsupportedMediaType`] is returned,
    /// listing all the media types supported by the registered converters.
    pub fn resolve(
        &self,
        input: &mut dyn InputMessage,
        target: &TypeDescriptor,
    ) -> Result<Deserialized, ResolveBodyError> {
        let content_type = input
            .content_type()?
            .unwrap_or(MediaType::APPLICATION_OCTET_STREAM);
        let concrete = target.reduce();

        for converter in self.registry.converters() {
            if let Some(generic) = converter.as_generic() {
                if generic.can_read_generic(target, &content_type) {
                    let read_path = ReadPath::Generic(target);
                    self.converter_selected(converter, &content_type, read_path);
                    return generic
                        .read_generic(target, input)
                        .map_err(|e| self.read_failed(converter, &content_type, read_path, e));
                }
            }
            if let Some(concrete) = &concrete {
                if converter.can_read(concrete, &content_type) {
                    let read_path = ReadPath::Concrete(concrete);
                    self.converter_selected(converter, &content_type, read_path);
                    return converter
                        .read(concrete, input)
                        .map_err(|e| self.read_failed(converter, &content_type, read_path, e));
                }
            }
        }

        let acceptable = self.registry.all_supported_media_types();
        if let Some(observer) = &self.observer {
            observer.no_converter_found(&NoConverterFound {
                content_type: &content_type,
                target,
                acceptable,
            });
        }
        Err(UnsupportedMediaType {
            content_type,
            acceptable: acceptable.to_vec(),
        }
        .into())
    }

    fn converter_selected(
        &self,
        converter: &dyn Converter,
        content_type: &MediaType,
        read_path: ReadPath<'_>,
    ) {
        if let Some(observer) = &self.observer {
            observer.converter_selected(&ConverterSelected {
                converter,
                content_type,
                read_path,
            });
        }
    }

    fn read_failed(
        &self,
        converter: &dyn Converter,
        content_type: &MediaType,
        read_path: ReadPath<'_>,
        error: ReadBodyError,
    ) -> ResolveBodyError {
        if let Some(observer) = &self.observer {
            observer.read_failed(&ReadFailed {
                converter,
                content_type,
                read_path,
                error: &error,
            });
        }
        error.into()
    }
}

impl fmt::Debug for BodyResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BodyResolver")
            .field("registry", &self.registry)
            .field("has_observer", &self.observer.is_some())
            .finish()
    }
}
