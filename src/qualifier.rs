//! The qualifier model: a type-erased, value-equatable annotation attached
//! to a [`crate::key::Key`].
use std::any::{type_name, Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Implemented by any value usable as a qualifier. Blanket-implemented for
/// every `Debug + PartialEq + Send + Sync + 'static` type, so an ordinary
/// marker struct (`#[derive(Debug, Default, PartialEq)] struct Named(&'static
/// str);`) qualifies with no extra boilerplate — there is no annotation
/// facility in Rust to hang a `@interface`-style qualifier declaration off
/// of, so an ordinary value type stands in for it.
pub trait QualifierValue: Any + Send + Sync + fmt::Debug
{
    fn qualifier_type_id(&self) -> TypeId;
    fn qualifier_type_name(&self) -> &'static str;
    fn values_eq(&self, other: &dyn QualifierValue) -> bool;
    fn as_any(&self) -> &dyn Any;
}

impl<T> QualifierValue for T
where
    T: Any + Send + Sync + fmt::Debug + PartialEq + 'static,
{
    fn qualifier_type_id(&self) -> TypeId
    {
        TypeId::of::<T>()
    }

    fn qualifier_type_name(&self) -> &'static str
    {
        type_name::<T>()
    }

    fn values_eq(&self, other: &dyn QualifierValue) -> bool
    {
        other
            .as_any()
            .downcast_ref::<T>()
            .map_or(false, |rhs| rhs == self)
    }

    fn as_any(&self) -> &dyn Any
    {
        self
    }
}

/// A qualifier attached to a [`crate::key::Key`].
///
/// Two qualifiers compare equal when they hold the same underlying type and
/// that type's values compare equal — not by pointer identity. This is what
/// lets a qualifier built from [`Qualifier::of_type`] (a default-valued
/// instance, standing in for "the qualifier annotation with no explicit
/// members") equal one built from an explicit [`Qualifier::new`] whose value
/// happens to equal the default.
///
/// `has_default_members` records, for the lenient-qualifier-matching policy
/// (see `spec.md` §4.2), whether every member of this qualifier instance is
/// at its default value. Rust cannot discover this via reflection the way a
/// host language with annotation defaults can, so it is supplied explicitly
/// at construction time; [`Qualifier::new`] assumes `true` (matching the
/// common case of zero-argument marker qualifiers), and
/// [`Qualifier::with_members`] lets a qualifier with real data opt out.
#[derive(Clone)]
pub struct Qualifier
{
    value: Arc<dyn QualifierValue>,
    has_default_members: bool,
}

impl Qualifier
{
    pub fn new<Q: QualifierValue>(value: Q) -> Self
    {
        Self {
            value: Arc::new(value),
            has_default_members: true,
        }
    }

    /// A qualifier whose value carries real, non-default data: it will not
    /// match under the lenient fallback policy.
    pub fn with_members<Q: QualifierValue>(value: Q) -> Self
    {
        Self {
            value: Arc::new(value),
            has_default_members: false,
        }
    }

    /// The qualifier represented purely by its type, at its default value —
    /// the Rust analogue of "a binding annotation referenced by class alone,
    /// with no explicit member values".
    pub fn of_type<Q: QualifierValue + Default>() -> Self
    {
        Self::new(Q::default())
    }

    pub fn type_id(&self) -> TypeId
    {
        self.value.qualifier_type_id()
    }

    pub fn type_name(&self) -> &'static str
    {
        self.value.qualifier_type_name()
    }

    pub fn has_default_members(&self) -> bool
    {
        self.has_default_members
    }

    pub fn downcast_ref<Q: QualifierValue>(&self) -> Option<&Q>
    {
        self.value.as_any().downcast_ref::<Q>()
    }
}

impl PartialEq for Qualifier
{
    fn eq(&self, other: &Self) -> bool
    {
        self.value.qualifier_type_id() == other.value.qualifier_type_id()
            && self.value.values_eq(&*other.value)
    }
}

impl Eq for Qualifier {}

impl Hash for Qualifier
{
    fn hash<H: Hasher>(&self, state: &mut H)
    {
        self.value.qualifier_type_id().hash(state);
    }
}

impl fmt::Debug for Qualifier
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        write!(f, "{:?}", self.value)
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[derive(Debug, Default, PartialEq)]
    struct Named(&'static str);

    #[derive(Debug, Default, PartialEq)]
    struct Other(&'static str);

    #[test]
    fn equal_values_are_equal()
    {
        assert_eq!(Qualifier::new(Named("a")), Qualifier::new(Named("a")));
    }

    #[test]
    fn different_values_are_not_equal()
    {
        assert_ne!(Qualifier::new(Named("a")), Qualifier::new(Named("b")));
    }

    #[test]
    fn different_types_are_not_equal_even_with_same_debug_shape()
    {
        assert_ne!(Qualifier::new(Named("a")), Qualifier::new(Other("a")));
    }

    #[test]
    fn of_type_uses_default_value()
    {
        assert_eq!(Qualifier::of_type::<Named>(), Qualifier::new(Named::default()));
    }

    #[test]
    fn with_members_is_not_flagged_default()
    {
        assert!(Qualifier::new(Named("a")).has_default_members());
        assert!(!Qualifier::with_members(Named("a")).has_default_members());
    }
}
