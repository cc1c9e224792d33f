//! Descriptors for the type a request body should be deserialized into.
use std::borrow::Cow;
use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
/// A type that can be matched on directly, without any generic information.
///
/// Basic converters only ever see a [`ConcreteType`]:
/// check out [`TypeDescriptor::reduce`] to see how one is derived from a [`TypeDescriptor`].
pub enum ConcreteType {
    /// A named type, e.g. `my_app::Item` or `alloc::vec::Vec`.
    Named(Cow<'static, str>),
    /// An array of a concrete type, e.g. `[my_app::Item]`.
    Array(Box<ConcreteType>),
}

impl ConcreteType {
    /// A named type.
    pub fn named(name: impl Into<Cow<'static, str>>) -> Self {
        Self::Named(name.into())
    }

    /// The concrete type for `T`, named after [`std::any::type_name`].
    ///
    /// ```rust
    /// use conneg::ConcreteType;
    ///
    /// assert_eq!(ConcreteType::of::<String>(), ConcreteType::named("alloc::string::String"));
    /// ```
    pub fn of<T: ?Sized>() -> Self {
        Self::Named(Cow::Borrowed(std::any::type_name::<T>()))
    }

    /// An array of `component`.
    pub fn array_of(component: ConcreteType) -> Self {
        Self::Array(Box::new(component))
    }
}

impl fmt::Display for ConcreteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConcreteType::Named(name) => write!(f, "{name}"),
            ConcreteType::Array(component) => write!(f, "[{component}]"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
/// A description of the type a request body should be deserialized into.
///
/// It is usually built once, by whatever is inspecting the signature of the
/// request handler, and then passed as-is to [`BodyResolver::resolve`].
///
/// [`BodyResolver::resolve`]: crate::BodyResolver::resolve
pub enum TypeDescriptor {
    /// A concrete type.
    Concrete(ConcreteType),
    /// An array whose component type is itself described by a [`TypeDescriptor`].
    GenericArray(Box<TypeDescriptor>),
    /// A generic type with its type arguments, e.g. `Vec<Item>`.
    Parameterized {
        /// The type without its arguments, e.g. `Vec`.
        raw: Box<TypeDescriptor>,
        /// The type arguments, e.g. `[Item]`.
        arguments: Vec<TypeDescriptor>,
    },
    /// A type that can't be reified.
    Unresolvable(UnresolvableType),
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
/// The kinds of [`TypeDescriptor::Unresolvable`] types.
pub enum UnresolvableType {
    /// A type parameter, e.g. `T`.
    TypeVariable(Cow<'static, str>),
    /// A wildcard type, e.g. `?` or `_`.
    Wildcard,
}

impl TypeDescriptor {
    /// A descriptor for `T` as a concrete type.
    pub fn of<T: ?Sized>() -> Self {
        Self::Concrete(ConcreteType::of::<T>())
    }

    /// A descriptor for a named concrete type.
    pub fn named(name: impl Into<Cow<'static, str>>) -> Self {
        Self::Concrete(ConcreteType::named(name))
    }

    /// A generic array of `component`.
    pub fn array_of(component: TypeDescriptor) -> Self {
        Self::GenericArray(Box::new(component))
    }

    /// A parameterized type.
    pub fn parameterized(
        raw: TypeDescriptor,
        arguments: impl IntoIterator<Item = TypeDescriptor>,
    ) -> Self {
        Self::Parameterized {
            raw: Box::new(raw),
            arguments: arguments.into_iter().collect(),
        }
    }

    /// A type parameter.
    pub fn type_variable(name: impl Into<Cow<'static, str>>) -> Self {
        Self::Unresolvable(UnresolvableType::TypeVariable(name.into()))
    }

    /// Reduce the descriptor to a concrete type, if possible.
    ///
    /// - a concrete type is returned as-is;
    /// - a generic array of a concrete type becomes an array of that type;
    /// - a parameterized type becomes its raw type, if the raw type is concrete.
    ///   Type arguments are discarded;
    /// - everything else (type variables, wildcards, arrays of non-concrete types, etc.)
    ///   returns `None`.
    ///
    /// ```rust
    /// use conneg::{ConcreteType, TypeDescriptor};
    ///
    /// let list = TypeDescriptor::parameterized(
    ///     TypeDescriptor::named("List"),
    ///     [TypeDescriptor::named("Item")],
    /// );
    /// assert_eq!(list.reduce(), Some(ConcreteType::named("List")));
    /// ```
    pub fn reduce(&self) -> Option<ConcreteType> {
        match self {
            TypeDescriptor::Concrete(concrete) => Some(concrete.clone()),
            TypeDescriptor::GenericArray(component) => match component.as_ref() {
                TypeDescriptor::Concrete(component) => {
                    Some(ConcreteType::array_of(component.clone()))
                }
                _ => None,
            },
            TypeDescriptor::Parameterized { raw, .. } => match raw.as_ref() {
                TypeDescriptor::Concrete(raw) => Some(raw.clone()),
                _ => None,
            },
            TypeDescriptor::Unresolvable(_) => None,
        }
    }
}

impl From<ConcreteType> for TypeDescriptor {
    fn from(concrete: ConcreteType) -> Self {
        Self::Concrete(concrete)
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDescriptor::Concrete(concrete) => write!(f, "{concrete}"),
            TypeDescriptor::GenericArray(component) => write!(f, "[{component}]"),
            TypeDescriptor::Parameterized { raw, arguments } => {
                write!(f, "{raw}<")?;
                for (i, argument) in arguments.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{argument}")?;
                }
                write!(f, ">")
            }
            TypeDescriptor::Unresolvable(UnresolvableType::TypeVariable(name)) => {
                write!(f, "{name}")
            }
            TypeDescriptor::Unresolvable(UnresolvableType::Wildcard) => write!(f, "_"),
        }
    }
}
