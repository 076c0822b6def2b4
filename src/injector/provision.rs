//! The provision pipeline: `ErasedProvider` (the executable half of every
//! binding), `Injectable` (the hand-written constructor-injection contract
//! kept almost verbatim from the teacher's
//! `Injectable<DIContainerT>::resolve`, `src/interfaces/injectable.rs`), and
//! the free `resolve*` functions used both by the injector itself and by
//! every `Injectable::resolve` implementation to fetch its own dependencies.
use std::any::{type_name, Any};
use std::sync::Arc;

use crate::contextual::{InjectionPoint, MemberKind};
use crate::errors::provision::create_dependency_trace;
use crate::errors::ProvisionError;
use crate::injector::context::ResolveContext;
use crate::injector::Injector;
use crate::key::Key;
use crate::logger::Logger;
use crate::provided::ProvidedValue;
use crate::ptr::{erase, unerase, AnyArc};

/// The executable half of a [`crate::binding::Binding`] — produces a value
/// (or null, or a circular-dependency proxy) each time it is asked to.
/// Scoping wraps one of these; see [`crate::scope::Scope`].
pub trait ErasedProvider: Send + Sync
{
    fn provide(
        &self,
        injector: &Injector,
        ctx: &ResolveContext,
    ) -> Result<ProvidedValue, ProvisionError>;
}

/// A type whose instances the injector can construct on its own, without an
/// explicit binding — the hand-written equivalent of what the teacher's
/// `#[injectable]` macro expands into. Implementing this manually means
/// writing exactly what the macro would have generated: resolve your own
/// dependencies through `ctx`/`injector`, then build `Self`.
///
/// `Self: Sized` on the method (not the trait) is deliberate: it is what
/// keeps this trait usable in trait-object position elsewhere while still
/// being impossible to satisfy for unsized types, which is exactly the
/// constraint `spec.md` §4.6 draws between "concrete class with an
/// injectable constructor" (can be JIT-bound) and an interface (cannot).
pub trait Injectable: Any + Send + Sync
{
    fn resolve(injector: &Injector, ctx: &ResolveContext) -> Result<Arc<Self>, ProvisionError>
    where
        Self: Sized;
}

/// The blanket fallback for any `Default` type — the Rust analogue of "a
/// public no-argument constructor succeeds trivially" (`spec.md` §4.6 step
/// 4). Like the teacher's identical blanket impl
/// (`impl<C> Injectable<C> for T where T: Default`), this means a type
/// cannot both derive `Default` and hand-write its own `Injectable` impl —
/// an accepted, inherited limitation; see DESIGN.md.
impl<T: Default + Send + Sync + 'static> Injectable for T
{
    fn resolve(_injector: &Injector, _ctx: &ResolveContext) -> Result<Arc<Self>, ProvisionError>
    {
        Ok(Arc::new(Self::default()))
    }
}

pub(crate) fn value_to_arc<T: 'static + ?Sized + Send + Sync>(
    value: ProvidedValue,
    key: &Key,
    ctx: &ResolveContext,
) -> Result<Arc<T>, ProvisionError>
{
    match value
    {
        ProvidedValue::Value(any) | ProvidedValue::Proxy(any) =>
        {
            unerase::<T>(&any).ok_or_else(|| ProvisionError::DowncastMismatch { key: key.clone() })
        }
        ProvidedValue::Null => Err(ProvisionError::NullNotAllowed {
            key: key.clone(),
            trace: create_dependency_trace(ctx.chain(), key),
        }),
    }
}

/// Resolves a dependency through any explicit, default-hint, or
/// parent-delegated binding, without attempting JIT construction. This is
/// the only resolution path available for trait-object (`?Sized`)
/// interfaces, which can never implement [`Injectable`] themselves.
pub fn resolve_bound<T: 'static + ?Sized + Send + Sync>(
    injector: &Injector,
    ctx: &ResolveContext,
) -> Result<Arc<T>, ProvisionError>
{
    let key = Key::of::<T>();
    let value = injector.resolve_value(&key, ctx)?;
    value_to_arc::<T>(value, &key, ctx)
}

/// Resolves a dependency nullably: `Null` becomes `None` rather than
/// `ProvisionError::NullNotAllowed`, modeling an injection point marked
/// nullable/optional (`spec.md` §4.8.5).
pub fn resolve_optional<T: 'static + ?Sized + Send + Sync>(
    injector: &Injector,
    ctx: &ResolveContext,
) -> Result<Option<Arc<T>>, ProvisionError>
{
    let key = Key::of::<T>();
    match injector.resolve_value(&key, ctx)?
    {
        ProvidedValue::Null => Ok(None),
        other => Ok(Some(value_to_arc::<T>(other, &key, ctx)?)),
    }
}

/// Resolves a concrete, [`Injectable`] dependency, falling back to
/// just-in-time construction via `T::resolve` when no binding (explicit,
/// hinted, or parent) exists for it. This is the path ordinary constructor
/// parameters go through.
pub fn resolve<T: Injectable + 'static>(
    injector: &Injector,
    ctx: &ResolveContext,
) -> Result<Arc<T>, ProvisionError>
{
    let key = Key::of::<T>();

    match injector.resolve_value(&key, ctx)
    {
        Ok(value) => value_to_arc::<T>(value, &key, ctx),
        Err(ProvisionError::BindingNotFound { .. }) => injector.jit_construct::<T>(ctx),
        Err(err) => Err(err),
    }
}

/// Special-cased JIT fallback for `Logger` (`spec.md` §4.6 step 4): named
/// after the class at the current injection point if one is known, else
/// anonymous. Not a real logging integration — see `src/logger.rs`.
pub fn resolve_logger(ctx: &ResolveContext) -> Logger
{
    match ctx.injection_point().map(|point| &point.member)
    {
        Some(
            MemberKind::Constructor { type_name, .. }
            | MemberKind::Field { type_name, .. }
            | MemberKind::Method { type_name, .. },
        ) => Logger::named(type_name),
        None => Logger::anonymous(),
    }
}

impl Injectable for Logger
{
    fn resolve(_injector: &Injector, ctx: &ResolveContext) -> Result<Arc<Self>, ProvisionError>
    {
        Ok(Arc::new(resolve_logger(ctx)))
    }
}

/// Resolves `T`, first recording `point` as the injection point an
/// `Injectable` impl is about to fetch it for — the entry point a
/// hand-written `Injectable::resolve` calls instead of bare [`resolve`] when
/// it wants a contextual dependency (like [`Logger`]) to see where it's
/// being injected.
pub fn resolve_at<T: Injectable + 'static>(
    injector: &Injector,
    ctx: &ResolveContext,
    point: InjectionPoint,
) -> Result<Arc<T>, ProvisionError>
{
    resolve::<T>(injector, &ctx.with_injection_point(point))
}

/// Member injection: a type that wants fields or setter-style methods
/// populated after construction implements this, and
/// `Injector::inject_members`/`get_members_injector` drive it. New relative
/// to the teacher, which only supports constructor injection.
pub trait MembersInjectable: Any + Send + Sync
{
    fn inject_members(
        self: &Arc<Self>,
        injector: &Injector,
        ctx: &ResolveContext,
    ) -> Result<(), ProvisionError>;
}

pub(crate) fn type_name_of<T: ?Sized + 'static>() -> &'static str
{
    type_name::<T>()
}

pub(crate) fn erase_arc<T: 'static + ?Sized + Send + Sync>(value: Arc<T>) -> AnyArc
{
    erase(value)
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[derive(Default, PartialEq, Debug)]
    struct Widget
    {
        name: String,
    }

    #[test]
    fn default_blanket_impl_constructs_default_value()
    {
        let injector = crate::test_utils::empty_injector();
        let ctx = ResolveContext::root();

        let widget = Widget::resolve(&injector, &ctx).unwrap();

        assert_eq!(*widget, Widget::default());
    }

    #[test]
    fn logger_is_anonymous_with_no_known_injection_point()
    {
        let injector = crate::test_utils::empty_injector();
        let ctx = ResolveContext::root();

        let logger = resolve::<Logger>(&injector, &ctx).unwrap();

        assert_eq!(logger.name(), None);
    }

    #[test]
    fn logger_is_named_after_the_injection_point_passed_to_resolve_at()
    {
        let injector = crate::test_utils::empty_injector();
        let ctx = ResolveContext::root();

        let point = InjectionPoint {
            key: Key::of::<Logger>(),
            member: MemberKind::Field {
                type_name: "some_owning_type",
                field_name: "logger",
            },
        };

        let logger = resolve_at::<Logger>(&injector, &ctx, point).unwrap();

        assert_eq!(logger.name(), Some("some_owning_type"));
    }
}
