//! End-to-end resolution scenarios, one per case the container is expected
//! to handle correctly: simple singleton resolution, interface cycles
//! resolved through a hand-written proxy, concrete cycles rejected outright,
//! override composition, null propagation, and parent/child sharing.
#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::disallowed_names)]

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use weave::contextual::MemberKind;
use weave::injector::cycle::{CircularProxyFactory, ProxySlot};
use weave::injector::provision::{resolve, resolve_at, resolve_bound, resolve_optional};
use weave::logger::Logger;
use weave::ptr::{erase, unerase, AnyArc};
use weave::{
    Binder, ConfigurationError, ConfigurationErrors, Injectable, InjectionPoint, Injector, Key,
    Module, ProvisionError, ProvisioningContext, Qualifier, ResolveContext,
};

// --- Scenario 1: simple resolution -----------------------------------------

#[derive(Debug, Default, PartialEq)]
struct Gear
{
    label: &'static str,
}

struct Engine
{
    gear: Arc<Gear>,
}

impl Injectable for Engine
{
    fn resolve(injector: &Injector, ctx: &ResolveContext) -> Result<Arc<Self>, ProvisionError>
    {
        let gear = resolve::<Gear>(injector, ctx)?;
        Ok(Arc::new(Self { gear }))
    }
}

struct EngineModule;

impl Module for EngineModule
{
    fn configure(&self, binder: &mut Binder)
    {
        binder.bind::<Engine>().to_injectable().as_singleton();
    }
}

#[test]
fn simple_resolution_is_cached_and_its_dependency_is_populated()
{
    let injector = Injector::build(vec![Box::new(EngineModule)]).unwrap();

    let first = injector.get_bound::<Engine>().unwrap();
    let second = injector.get_bound::<Engine>().unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(*first.gear, Gear::default());
}

// --- Scenario 2: cycle via interfaces, resolved through a proxy -------------

trait Sender: Send + Sync
{
    fn id(&self) -> u32;
    fn receiver(&self) -> Arc<dyn Receiver>;
}

trait Receiver: Send + Sync
{
    fn id(&self) -> u32;
    fn sender(&self) -> Arc<dyn Sender>;
}

static SENDER_BUILDS: AtomicU32 = AtomicU32::new(0);
static RECEIVER_BUILDS: AtomicU32 = AtomicU32::new(0);

struct SenderImpl
{
    id: u32,
    receiver: Arc<dyn Receiver>,
}

impl Sender for SenderImpl
{
    fn id(&self) -> u32
    {
        self.id
    }

    fn receiver(&self) -> Arc<dyn Receiver>
    {
        self.receiver.clone()
    }
}

struct ReceiverImpl
{
    id: u32,
    sender: Arc<dyn Sender>,
}

impl Receiver for ReceiverImpl
{
    fn id(&self) -> u32
    {
        self.id
    }

    fn sender(&self) -> Arc<dyn Sender>
    {
        self.sender.clone()
    }
}

struct SenderProxy(Arc<ProxySlot>);

impl Sender for SenderProxy
{
    fn id(&self) -> u32
    {
        self.real().id()
    }

    fn receiver(&self) -> Arc<dyn Receiver>
    {
        self.real().receiver()
    }
}

impl SenderProxy
{
    fn real(&self) -> Arc<dyn Sender>
    {
        self.0
            .get()
            .and_then(unerase::<dyn Sender>)
            .expect("circular proxy read before it was fulfilled")
    }
}

struct SenderProxyFactory;

impl CircularProxyFactory for SenderProxyFactory
{
    fn create_proxy(&self) -> (AnyArc, Arc<ProxySlot>)
    {
        let slot = ProxySlot::new();
        let proxy: Arc<dyn Sender> = Arc::new(SenderProxy(slot.clone()));
        (erase(proxy), slot)
    }
}

struct CycleModule;

impl Module for CycleModule
{
    fn configure(&self, binder: &mut Binder)
    {
        binder.bind::<dyn Sender>().to_constructor(|injector, ctx| {
            let receiver = resolve_bound::<dyn Receiver>(injector, ctx)?;
            let id = SENDER_BUILDS.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(Arc::new(SenderImpl { id, receiver }) as Arc<dyn Sender>)
        });

        binder.bind::<dyn Receiver>().to_constructor(|injector, ctx| {
            let sender = resolve_bound::<dyn Sender>(injector, ctx)?;
            let id = RECEIVER_BUILDS.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(Arc::new(ReceiverImpl { id, sender }) as Arc<dyn Receiver>)
        });

        binder.bind_circular_proxy_factory::<dyn Sender>(Arc::new(SenderProxyFactory));
    }
}

#[test]
fn an_interface_cycle_is_closed_through_a_proxy()
{
    SENDER_BUILDS.store(0, Ordering::SeqCst);
    RECEIVER_BUILDS.store(0, Ordering::SeqCst);

    let injector = Injector::build(vec![Box::new(CycleModule)]).unwrap();

    let sender = injector.get_bound::<dyn Sender>().unwrap();
    let receiver = sender.receiver();
    let sender_through_receiver = receiver.sender();

    assert_eq!(sender_through_receiver.id(), sender.id());
    assert_eq!(SENDER_BUILDS.load(Ordering::SeqCst), 1);
    assert_eq!(RECEIVER_BUILDS.load(Ordering::SeqCst), 1);
}

// --- Scenario 3: concrete-type cycle, no proxy possible ---------------------

#[derive(Debug)]
struct ConcreteLeft
{
    #[allow(dead_code)]
    right: Arc<ConcreteRight>,
}

#[derive(Debug)]
struct ConcreteRight
{
    #[allow(dead_code)]
    left: Arc<ConcreteLeft>,
}

impl Injectable for ConcreteLeft
{
    fn resolve(injector: &Injector, ctx: &ResolveContext) -> Result<Arc<Self>, ProvisionError>
    {
        let right =
            resolve::<ConcreteRight>(injector, ctx).map_err(|e| e.affecting(Key::of::<Self>()))?;
        Ok(Arc::new(Self { right }))
    }
}

impl Injectable for ConcreteRight
{
    fn resolve(injector: &Injector, ctx: &ResolveContext) -> Result<Arc<Self>, ProvisionError>
    {
        let left =
            resolve::<ConcreteLeft>(injector, ctx).map_err(|e| e.affecting(Key::of::<Self>()))?;
        Ok(Arc::new(Self { left }))
    }
}

#[test]
fn a_concrete_cycle_fails_with_no_proxy_available()
{
    let injector = Injector::build(vec![]).unwrap();

    let err = injector.get_instance::<ConcreteLeft>().unwrap_err();

    assert!(err.to_string().contains("circular dependency"));
}

// --- Scenario 4: override wins ----------------------------------------------

struct BindsA;

impl Module for BindsA
{
    fn configure(&self, binder: &mut Binder)
    {
        binder.bind::<String>().to_instance(Arc::new("A".to_string()));
    }
}

struct BindsB;

impl Module for BindsB
{
    fn configure(&self, binder: &mut Binder)
    {
        binder.bind::<String>().to_instance(Arc::new("B".to_string()));
    }
}

#[test]
fn an_override_module_wins_over_its_base()
{
    let composed =
        weave::overrides(vec![Box::new(BindsA)]).with(vec![Box::new(BindsB)]);

    let injector = Injector::build(vec![Box::new(composed)]).unwrap();

    let value = injector.get_bound::<String>().unwrap();

    assert_eq!(*value, "B");
}

// --- Scenario 5: null into non-nullable, and into nullable ------------------

struct NullStringModule;

impl Module for NullStringModule
{
    fn configure(&self, binder: &mut Binder)
    {
        binder
            .bind::<String>()
            .to_contextual_provider(|_ctx: &ProvisioningContext| Ok(weave::provided::ProvidedValue::Null));
    }
}

struct RequiresString
{
    #[allow(dead_code)]
    value: Arc<String>,
}

impl Injectable for RequiresString
{
    fn resolve(injector: &Injector, ctx: &ResolveContext) -> Result<Arc<Self>, ProvisionError>
    {
        let value =
            resolve_bound::<String>(injector, ctx).map_err(|e| e.affecting(Key::of::<Self>()))?;
        Ok(Arc::new(Self { value }))
    }
}

struct AcceptsMissingString
{
    value: Option<Arc<String>>,
}

impl Injectable for AcceptsMissingString
{
    fn resolve(injector: &Injector, ctx: &ResolveContext) -> Result<Arc<Self>, ProvisionError>
    {
        let value = resolve_optional::<String>(injector, ctx)?;
        Ok(Arc::new(Self { value }))
    }
}

#[test]
fn a_null_production_fails_a_required_dependency_but_not_an_optional_one()
{
    let injector = Injector::build(vec![Box::new(NullStringModule)]).unwrap();

    let required = injector.get_instance::<RequiresString>();
    assert!(required.is_err());

    let optional = injector.get_instance::<AcceptsMissingString>().unwrap();
    assert!(optional.value.is_none());
}

// --- Scenario 6: parent/child sharing ---------------------------------------

static SHARED_BUILDS: AtomicU32 = AtomicU32::new(0);

#[derive(Debug)]
struct SharedThing
{
    #[allow(dead_code)]
    build_index: u32,
}

impl Injectable for SharedThing
{
    fn resolve(_injector: &Injector, _ctx: &ResolveContext) -> Result<Arc<Self>, ProvisionError>
    {
        let build_index = SHARED_BUILDS.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(Arc::new(Self { build_index }))
    }
}

struct SharedModule;

impl Module for SharedModule
{
    fn configure(&self, binder: &mut Binder)
    {
        binder.bind::<SharedThing>().to_injectable().as_singleton();
    }
}

#[test]
fn a_parent_singleton_is_shared_across_its_children()
{
    SHARED_BUILDS.store(0, Ordering::SeqCst);

    let parent = Injector::build(vec![Box::new(SharedModule)]).unwrap();
    let child_one = Injector::create_child(&parent, vec![]).unwrap();
    let child_two = Injector::create_child(&parent, vec![]).unwrap();

    let from_parent = parent.get_bound::<SharedThing>().unwrap();
    let from_child_one = child_one.get_bound::<SharedThing>().unwrap();
    let from_child_two = child_two.get_bound::<SharedThing>().unwrap();

    assert!(Arc::ptr_eq(&from_parent, &from_child_one));
    assert!(Arc::ptr_eq(&from_parent, &from_child_two));
    assert_eq!(SHARED_BUILDS.load(Ordering::SeqCst), 1);
}

#[test]
fn a_child_cannot_rebind_a_key_the_parent_already_binds()
{
    let parent = Injector::build(vec![Box::new(SharedModule)]).unwrap();

    let result = Injector::create_child(&parent, vec![Box::new(SharedModule)]);

    assert!(matches!(
        result,
        Err(ConfigurationErrors(errors))
            if matches!(errors.as_slice(), [ConfigurationError::ParentBindingConflict { .. }])
    ));
}

// --- Scenario 7: a JIT binding materializes once, on the root ---------------

#[derive(Debug, Default, PartialEq)]
struct Widget
{
    label: &'static str,
}

#[test]
fn a_jit_binding_is_shared_across_the_parent_and_its_children()
{
    let parent = Injector::build(vec![]).unwrap();
    let child = Injector::create_child(&parent, vec![]).unwrap();

    // Nothing binds `Widget` anywhere; the first resolution anywhere in the
    // tree materializes its JIT binding on the root, visible from then on
    // via `get_binding` from any injector in the tree.
    assert!(parent.get_binding::<Widget>().is_none());

    let _ = child.get_instance::<Widget>().unwrap();

    assert!(parent.get_binding::<Widget>().is_some());
    assert!(child.get_binding::<Widget>().is_some());
}

#[test]
fn a_child_cannot_bind_a_key_the_parent_already_jit_bound()
{
    let parent = Injector::build(vec![]).unwrap();
    let _ = parent.get_instance::<Widget>().unwrap();

    struct RebindsWidget;

    impl Module for RebindsWidget
    {
        fn configure(&self, binder: &mut Binder)
        {
            binder.bind::<Widget>().to_instance(Arc::new(Widget { label: "explicit" }));
        }
    }

    let result = Injector::create_child(&parent, vec![Box::new(RebindsWidget)]);

    assert!(matches!(
        result,
        Err(ConfigurationErrors(errors))
            if matches!(errors.as_slice(), [ConfigurationError::ParentBindingConflict { .. }])
    ));
}

// --- Scenario 8: Logger is named after its injection point ------------------

struct LoggingWidget
{
    logger: Arc<Logger>,
}

impl Injectable for LoggingWidget
{
    fn resolve(injector: &Injector, ctx: &ResolveContext) -> Result<Arc<Self>, ProvisionError>
    {
        let point = InjectionPoint {
            key: Key::of::<Logger>(),
            member: MemberKind::Field {
                type_name: std::any::type_name::<Self>(),
                field_name: "logger",
            },
        };
        let logger = resolve_at::<Logger>(injector, ctx, point)?;
        Ok(Arc::new(Self { logger }))
    }
}

#[test]
fn a_logger_field_is_named_after_its_owning_type()
{
    let injector = Injector::build(vec![]).unwrap();

    let widget = injector.get_instance::<LoggingWidget>().unwrap();

    assert_eq!(widget.logger.name(), Some(std::any::type_name::<LoggingWidget>()));
}

// --- Universal invariant: qualifier structural equality ---------------------

#[derive(Debug, Default, PartialEq)]
struct Flavor(&'static str);

#[test]
fn a_default_valued_qualifier_equals_its_type_level_shorthand()
{
    let explicit = Key::of::<String>().with_annotation(Qualifier::new(Flavor::default()));
    let shorthand = Key::of::<String>().with_annotation(Qualifier::of_type::<Flavor>());

    assert_eq!(explicit, shorthand);
}
