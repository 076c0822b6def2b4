#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! weave
//!
//! A dependency injection container with scoping, JIT binding and cyclic
//! resolution.

pub mod binding;
pub mod capability;
pub mod contextual;
pub mod element;
pub mod errors;
pub mod injector;
pub mod key;
pub mod logger;
pub mod module;
pub mod override_module;
pub mod private_module;
pub mod provided;
pub mod ptr;
pub mod qualifier;
pub mod scope;
pub mod source;
pub mod type_converter;

pub use binding::{BindingView, Provider};
pub use contextual::{ContextualProvider, InjectionPoint, ProvisioningContext};
pub use element::Element;
pub use errors::{ConfigurationError, ConfigurationErrors, ProvisionError};
pub use injector::context::ResolveContext;
pub use injector::provision::{Injectable, MembersInjectable};
pub use injector::{members_injector_for, provider_for, Injector};
pub use key::{Key, TypeRef};
pub use module::{Binder, Module, QualifierPolicy};
pub use override_module::{overrides, OverrideModule};
pub use private_module::{PrivateModule, PrivateModuleHandle};
pub use qualifier::Qualifier;
pub use scope::Scope;

#[cfg(test)]
mod test_utils;
