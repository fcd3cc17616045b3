//! Request-scoped context passed from call sites to attribute providers.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;

/// Carries request-scoped values (caller identity, trace ids, and the like)
/// from the point where a query is issued to the attribute providers that
/// read them.
///
/// Values are keyed by type, so each provider defines its own private key
/// type and nothing collides. The context owns no cancellation or deadline
/// state; it is plain data handed through unmodified.
#[derive(Default)]
pub struct RequestContext {
    values: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl RequestContext {
    /// Create an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// The context used for calls that were issued without one.
    pub fn background() -> Self {
        Self::new()
    }

    /// Builder-style variant of [`insert`](Self::insert).
    pub fn with_value<T: Send + Sync + 'static>(mut self, value: T) -> Self {
        self.insert(value);
        self
    }

    /// Store `value`, replacing any previous value of the same type.
    pub fn insert<T: Send + Sync + 'static>(&mut self, value: T) {
        self.values.insert(TypeId::of::<T>(), Box::new(value));
    }

    /// Read back a value stored under type `T`.
    pub fn get<T: Send + Sync + 'static>(&self) -> Option<&T> {
        self.values
            .get(&TypeId::of::<T>())
            .and_then(|value| value.downcast_ref::<T>())
    }
}

impl fmt::Debug for RequestContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestContext")
            .field("values", &self.values.len())
            .finish()
    }
}
