//! The element stream (`spec.md` §4.12): the ordered list of declarative
//! actions a [`crate::module::Module`] records while configuring a
//! [`crate::module::Binder`], introspectable and rewritable before the
//! injector freezes it.
use std::sync::Arc;

use crate::binding::Binding;
use crate::errors::ConfigurationError;
use crate::injector::cycle::CircularProxyFactory;
use crate::injector::provision::ErasedProvider;
use crate::key::Key;
use crate::scope::Scope;
use crate::type_converter::TypeConverter;

/// One record in a module's element stream.
///
/// `InstallPrivateModule` carries its nested elements inline, rather than
/// flattening them into the surrounding stream the way `InstallModule` does
/// — the encapsulation `spec.md` §4.4 describes depends on being able to
/// tell which elements belong to the private scope at injector-build time.
#[derive(Clone)]
pub enum Element
{
    Bind(Arc<Binding>),
    BindConstant(Arc<Binding>),
    InstallModule
    {
        module_name: &'static str
    },
    InstallPrivateModule
    {
        module_name: &'static str,
        elements: Vec<Element>,
        exposed: Vec<Key>,
    },
    BindScope
    {
        name: &'static str, scope: Arc<dyn Scope>
    },
    RegisterTypeConverter
    {
        converter: Arc<dyn TypeConverter>
    },
    BindDefaultHint
    {
        key: Key, hint: Arc<dyn ErasedProvider>
    },
    BindCircularProxyFactory
    {
        key: Key,
        factory: Arc<dyn CircularProxyFactory>,
    },
    Expose
    {
        key: Key
    },
    AddError(Arc<ConfigurationError>),
    SkipSources,
    RequireExactBindingAnnotations,
}

impl std::fmt::Debug for Element
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result
    {
        match self
        {
            Element::Bind(b) => write!(f, "Bind({})", b.key),
            Element::BindConstant(b) => write!(f, "BindConstant({})", b.key),
            Element::InstallModule { module_name } =>
            {
                write!(f, "InstallModule({module_name})")
            }
            Element::InstallPrivateModule { module_name, .. } =>
            {
                write!(f, "InstallPrivateModule({module_name})")
            }
            Element::BindScope { name, .. } => write!(f, "BindScope({name})"),
            Element::RegisterTypeConverter { .. } => write!(f, "RegisterTypeConverter"),
            Element::BindDefaultHint { key, .. } => write!(f, "BindDefaultHint({key})"),
            Element::BindCircularProxyFactory { key, .. } =>
            {
                write!(f, "BindCircularProxyFactory({key})")
            }
            Element::Expose { key } => write!(f, "Expose({key})"),
            Element::AddError(e) => write!(f, "AddError({e})"),
            Element::SkipSources => write!(f, "SkipSources"),
            Element::RequireExactBindingAnnotations =>
            {
                write!(f, "RequireExactBindingAnnotations")
            }
        }
    }
}
