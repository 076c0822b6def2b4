//! The type-and-key model: [`TypeRef`] identifies a Rust type structurally,
//! [`Key`] pairs a `TypeRef` with an optional qualifier.
use std::any::{type_name, TypeId};
use std::fmt;

use crate::errors::configuration::ConfigurationError;
use crate::qualifier::Qualifier;

/// A marker used to build the synthetic "provider of T" type used by
/// [`Key::provider_key`]. It is never constructed; it only exists so that
/// `TypeId::of::<ProviderMarker>()` has something to identify.
struct ProviderMarker;

#[derive(Clone, PartialEq, Eq, Hash)]
enum TypeRefRepr
{
    Raw
    {
        id: TypeId, name: &'static str
    },
    Parameterized
    {
        raw: Box<TypeRef>, args: Vec<TypeRef>
    },
    Array
    {
        component: Box<TypeRef>
    },
    Wildcard,
    TypeVariable
    {
        name: &'static str
    },
}

/// A structural reference to a Rust type, used as the raw half of a [`Key`].
///
/// Most `TypeRef`s are `Raw`, built from [`TypeRef::of`] and backed directly
/// by `TypeId`. The other variants (`Parameterized`, `Array`, `Wildcard`,
/// `TypeVariable`) exist for keys the injector synthesizes itself (provider
/// keys) or that a generic module author builds explicitly — there is no
/// reflection in Rust that could produce them by accident, so unlike in a
/// reflective host language a `TypeVariable` can only appear here if someone
/// deliberately constructs one with [`TypeRef::type_variable`].
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct TypeRef(TypeRefRepr);

impl TypeRef
{
    /// The `TypeRef` of a concrete (or trait-object) Rust type.
    pub fn of<T: 'static + ?Sized>() -> Self
    {
        Self(TypeRefRepr::Raw {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        })
    }

    pub fn parameterized(raw: TypeRef, args: Vec<TypeRef>) -> Self
    {
        Self(TypeRefRepr::Parameterized {
            raw: Box::new(raw),
            args,
        })
    }

    pub fn array_of(component: TypeRef) -> Self
    {
        Self(TypeRefRepr::Array {
            component: Box::new(component),
        })
    }

    pub fn wildcard() -> Self
    {
        Self(TypeRefRepr::Wildcard)
    }

    /// Builds an unresolved type-variable reference. [`Key::new`] rejects
    /// any `TypeRef` containing one of these — there is no way to end up
    /// with one except by calling this constructor yourself, which a
    /// generic module-authoring helper might do before its type parameter
    /// is filled in.
    pub fn type_variable(name: &'static str) -> Self
    {
        Self(TypeRefRepr::TypeVariable { name })
    }

    pub(crate) fn provider_of(inner: &TypeRef) -> Self
    {
        Self::parameterized(Self::of::<ProviderMarker>(), vec![inner.clone()])
    }

    pub fn is_unresolved(&self) -> bool
    {
        match &self.0
        {
            TypeRefRepr::TypeVariable { .. } => true,
            TypeRefRepr::Array { component } => component.is_unresolved(),
            TypeRefRepr::Parameterized { raw, args } =>
            {
                raw.is_unresolved() || args.iter().any(TypeRef::is_unresolved)
            }
            TypeRefRepr::Raw { .. } | TypeRefRepr::Wildcard => false,
        }
    }

    pub(crate) fn type_id(&self) -> Option<TypeId>
    {
        match &self.0
        {
            TypeRefRepr::Raw { id, .. } => Some(*id),
            _ => None,
        }
    }
}

impl fmt::Display for TypeRef
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        match &self.0
        {
            TypeRefRepr::Raw { name, .. } => write!(f, "{name}"),
            TypeRefRepr::Parameterized { raw, args } =>
            {
                write!(f, "{raw}<")?;
                for (i, arg) in args.iter().enumerate()
                {
                    if i > 0
                    {
                        write!(f, ", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                write!(f, ">")
            }
            TypeRefRepr::Array { component } => write!(f, "[{component}]"),
            TypeRefRepr::Wildcard => write!(f, "?"),
            TypeRefRepr::TypeVariable { name } => write!(f, "{name}"),
        }
    }
}

impl fmt::Debug for TypeRef
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        write!(f, "TypeRef({self})")
    }
}

/// A binding key: a [`TypeRef`] plus an optional [`Qualifier`].
///
/// Two keys are equal when their `TypeRef`s are equal and their qualifiers
/// compare equal under [`Qualifier`]'s value equality (not identity) — this
/// is what lets `Key::of::<T>().with_annotation(Qualifier::of_type::<Q>())`
/// equal a key built from any other default-valued instance of `Q`.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Key
{
    type_ref: TypeRef,
    qualifier: Option<Qualifier>,
}

impl Key
{
    /// Builds a key from an already-constructed `TypeRef`, rejecting
    /// unresolved type variables.
    pub fn new(type_ref: TypeRef) -> Result<Self, ConfigurationError>
    {
        if type_ref.is_unresolved()
        {
            return Err(ConfigurationError::UnresolvedTypeVariable {
                type_name: type_ref.to_string(),
            });
        }

        Ok(Self {
            type_ref,
            qualifier: None,
        })
    }

    /// Builds an unqualified key directly from a concrete Rust type. Always
    /// succeeds: `TypeRef::of::<T>()` can never produce a type variable.
    pub fn of<T: 'static + ?Sized>() -> Self
    {
        Self {
            type_ref: TypeRef::of::<T>(),
            qualifier: None,
        }
    }

    #[must_use]
    pub fn with_annotation(mut self, qualifier: Qualifier) -> Self
    {
        self.qualifier = Some(qualifier);
        self
    }

    #[must_use]
    pub fn of_type(mut self, type_ref: TypeRef) -> Self
    {
        self.type_ref = type_ref;
        self
    }

    /// The key of a provider of this key's type — used for `ProviderKey`
    /// bindings and `get_provider`.
    #[must_use]
    pub fn provider_key(&self) -> Self
    {
        Self {
            type_ref: TypeRef::provider_of(&self.type_ref),
            qualifier: self.qualifier.clone(),
        }
    }

    pub fn type_ref(&self) -> &TypeRef
    {
        &self.type_ref
    }

    pub fn qualifier(&self) -> Option<&Qualifier>
    {
        self.qualifier.as_ref()
    }
}

impl fmt::Display for Key
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        match &self.qualifier
        {
            Some(q) => write!(f, "{}@{}", self.type_ref, q.type_name()),
            None => write!(f, "{}", self.type_ref),
        }
    }
}

impl fmt::Debug for Key
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        write!(f, "Key({self})")
    }
}
