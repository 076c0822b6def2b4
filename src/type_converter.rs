//! Constant-binding type conversion (`spec.md` §3's `Constant` binding
//! variant): converts a bound literal into whatever concrete type an
//! injection point asks for, e.g. a `Constant` bound as a string converted
//! to an integer at the point that actually needs one.
use std::sync::Arc;

/// Converts a source literal's string form into a target type, registered
/// against the target's [`crate::key::Key`].
pub trait TypeConverter: Send + Sync
{
    fn convert(&self, literal: &str) -> Result<crate::ptr::AnyArc, String>;
}

pub struct FnTypeConverter<F>(pub F)
where
    F: Fn(&str) -> Result<crate::ptr::AnyArc, String> + Send + Sync;

impl<F> TypeConverter for FnTypeConverter<F>
where
    F: Fn(&str) -> Result<crate::ptr::AnyArc, String> + Send + Sync,
{
    fn convert(&self, literal: &str) -> Result<crate::ptr::AnyArc, String>
    {
        (self.0)(literal)
    }
}

/// Builds a converter for `T: FromStr` targets — covers the common numeric
/// and boolean constant-binding cases out of the box.
pub fn from_str_converter<T>() -> Arc<dyn TypeConverter>
where
    T: std::str::FromStr + Send + Sync + 'static,
    T::Err: std::fmt::Display,
{
    Arc::new(FnTypeConverter(|literal: &str| {
        literal
            .parse::<T>()
            .map(|v| crate::ptr::erase(Arc::new(v)))
            .map_err(|e| e.to_string())
    }))
}

/// The converters every injector carries without any
/// `Binder::register_type_converter` call — `String` plus the primitive
/// numeric and boolean types, the same ground Guice's constant bindings
/// cover out of the box.
pub fn default_converters() -> Vec<Arc<dyn TypeConverter>>
{
    vec![
        Arc::new(FnTypeConverter(|literal: &str| {
            Ok(crate::ptr::erase(Arc::new(literal.to_string())))
        })) as Arc<dyn TypeConverter>,
        from_str_converter::<bool>(),
        from_str_converter::<i8>(),
        from_str_converter::<i16>(),
        from_str_converter::<i32>(),
        from_str_converter::<i64>(),
        from_str_converter::<u8>(),
        from_str_converter::<u16>(),
        from_str_converter::<u32>(),
        from_str_converter::<u64>(),
        from_str_converter::<f32>(),
        from_str_converter::<f64>(),
        from_str_converter::<char>(),
    ]
}
