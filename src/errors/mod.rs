//! Errors, split by the component that raises them, the way the teacher
//! splits `errors/di_container.rs` from `errors/injectable.rs`.
pub mod configuration;
pub mod provision;

pub use configuration::{ConfigurationError, ConfigurationErrors};
pub use provision::ProvisionError;
