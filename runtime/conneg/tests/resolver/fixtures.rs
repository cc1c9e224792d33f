use std::borrow::Cow;
use std::sync::{Arc, Mutex};

use conneg::observer::{ConverterSelected, NoConverterFound, ReadFailed, ResolutionObserver};
use conneg::{
    ConcreteType, Converter, Deserialized, GenericConverter, InputMessage, MediaType,
    ReadBodyError, TypeDescriptor,
};

/// A request with the given `Content-Type` (if any) and body.
pub fn request(content_type: Option<&str>, body: &'static str) -> http::Request<bytes::Bytes> {
    let mut builder = http::Request::builder().method("POST").uri("/items");
    if let Some(content_type) = content_type {
        builder = builder.header(http::header::CONTENT_TYPE, content_type);
    }
    builder.body(bytes::Bytes::from_static(body.as_bytes())).unwrap()
}

/// A converter that records every call made to it into a shared [`CallTracker`].
///
/// On a successful read, it yields its own name as a `String`.
#[derive(Debug)]
pub struct SpyConverter {
    name: &'static str,
    media_types: Vec<MediaType>,
    /// If `None`, any concrete type is accepted.
    concrete_targets: Option<Vec<ConcreteType>>,
    /// If `None`, the converter is not generic-capable.
    generic_targets: Option<Vec<TypeDescriptor>>,
    fails_to_read: bool,
    panics_on_check: bool,
    call_tracker: CallTracker,
}

impl SpyConverter {
    pub fn new<'a>(
        name: &'static str,
        media_types: impl IntoIterator<Item = &'a str>,
        call_tracker: &CallTracker,
    ) -> Self {
        Self {
            name,
            media_types: media_types
                .into_iter()
                .map(|m| m.parse().unwrap())
                .collect(),
            concrete_targets: None,
            generic_targets: None,
            fails_to_read: false,
            panics_on_check: false,
            call_tracker: call_tracker.clone(),
        }
    }

    /// Only accept the given concrete types on the basic path.
    pub fn concrete_targets(mut self, targets: impl IntoIterator<Item = ConcreteType>) -> Self {
        self.concrete_targets = Some(targets.into_iter().collect());
        self
    }

    /// Make the converter generic-capable, accepting the given descriptors.
    pub fn generic_targets(mut self, targets: impl IntoIterator<Item = TypeDescriptor>) -> Self {
        self.generic_targets = Some(targets.into_iter().collect());
        self
    }

    pub fn failing(mut self) -> Self {
        self.fails_to_read = true;
        self
    }

    pub fn panicking(mut self) -> Self {
        self.panics_on_check = true;
        self
    }

    pub fn boxed(self) -> Box<dyn Converter> {
        Box::new(self)
    }

    fn read_body(&self, input: &mut dyn InputMessage) -> Result<Deserialized, ReadBodyError> {
        let mut body = String::new();
        input.body().read_to_string(&mut body)?;
        if self.fails_to_read {
            return Err(ReadBodyError::malformed(format!(
                "`{}` can't make sense of `{body}`",
                self.name
            )));
        }
        Ok(Deserialized::new(self.name.to_owned()))
    }
}

impl Converter for SpyConverter {
    fn name(&self) -> Cow<'static, str> {
        Cow::Borrowed(self.name)
    }

    fn supported_media_types(&self) -> &[MediaType] {
        &self.media_types
    }

    fn can_read(&self, target: &ConcreteType, media_type: &MediaType) -> bool {
        self.call_tracker
            .push_operation(format!("{} can_read {target} {media_type}", self.name));
        if self.panics_on_check {
            panic!("`{}` blew up while checking its capabilities", self.name);
        }
        let accepts_target = match &self.concrete_targets {
            Some(targets) => targets.contains(target),
            None => true,
        };
        accepts_target && self.supports(media_type)
    }

    fn read(
        &self,
        target: &ConcreteType,
        input: &mut dyn InputMessage,
    ) -> Result<Deserialized, ReadBodyError> {
        self.call_tracker
            .push_operation(format!("{} read {target}", self.name));
        self.read_body(input)
    }

    fn as_generic(&self) -> Option<&dyn GenericConverter> {
        self.generic_targets
            .as_ref()
            .map(|_| self as &dyn GenericConverter)
    }
}

impl GenericConverter for SpyConverter {
    fn can_read_generic(&self, target: &TypeDescriptor, media_type: &MediaType) -> bool {
        self.call_tracker.push_operation(format!(
            "{} can_read_generic {target} {media_type}",
            self.name
        ));
        if self.panics_on_check {
            panic!("`{}` blew up while checking its capabilities", self.name);
        }
        let accepts_target = self
            .generic_targets
            .as_ref()
            .is_some_and(|targets| targets.contains(target));
        accepts_target && self.supports(media_type)
    }

    fn read_generic(
        &self,
        target: &TypeDescriptor,
        input: &mut dyn InputMessage,
    ) -> Result<Deserialized, ReadBodyError> {
        self.call_tracker
            .push_operation(format!("{} read_generic {target}", self.name));
        self.read_body(input)
    }
}

#[derive(Debug, Clone, Default)]
pub struct CallTracker(Arc<Mutex<Vec<String>>>);

impl CallTracker {
    pub fn operation_log(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    pub fn assert_untouched(&self, name: &str) {
        let oplog = self.operation_log();
        let prefix = format!("{name} ");
        assert!(
            !oplog.iter().any(|op| op.starts_with(&prefix)),
            "`{name}` was supposed to be untouched, but at least one method has been called on it. Operation log:\n  - {}",
            oplog.join("\n  - ")
        )
    }

    fn push_operation(&self, op: String) {
        self.0.lock().unwrap().push(op);
    }
}

/// An observer that keeps track of the events it receives.
#[derive(Debug, Default)]
pub struct RecordingObserver(Mutex<Vec<String>>);

impl RecordingObserver {
    pub fn events(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    fn record(&self, event: String) {
        self.0.lock().unwrap().push(event);
    }
}

impl ResolutionObserver for RecordingObserver {
    fn converter_selected(&self, event: &ConverterSelected<'_>) {
        self.record(format!(
            "selected {} ({} {}) for {}",
            event.converter.name(),
            event.read_path.kind(),
            event.read_path,
            event.content_type
        ));
    }

    fn no_converter_found(&self, event: &NoConverterFound<'_>) {
        self.record(format!(
            "no converter for {} as {}",
            event.content_type, event.target
        ));
    }

    fn read_failed(&self, event: &ReadFailed<'_>) {
        self.record(format!(
            "{} failed: {}",
            event.converter.name(),
            event.error
        ));
    }
}
