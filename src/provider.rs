//! Attribute providers.

use crate::attrs::Attrs;
use crate::context::RequestContext;

/// A source of attributes for annotated queries.
///
/// Providers are attached to a [`Commenter`](crate::Commenter) at
/// construction time and consulted once per annotated query. A provider may
/// be stateless or read request-scoped values from the context; it must not
/// mutate the context.
pub trait AttrProvider: Send + Sync {
    /// Produce the attributes for one query issued under `cx`.
    fn attrs(&self, cx: &RequestContext) -> Attrs;
}

/// Adapter that lets any compatible function act as an [`AttrProvider`].
///
/// Usually constructed through
/// [`CommenterBuilder::with_provider_fn`](crate::CommenterBuilder::with_provider_fn).
pub struct AttrProviderFn<F>(pub F);

impl<F> AttrProvider for AttrProviderFn<F>
where
    F: Fn(&RequestContext) -> Attrs + Send + Sync,
{
    fn attrs(&self, cx: &RequestContext) -> Attrs {
        (self.0)(cx)
    }
}

/// Provider backed by a fixed attribute set.
pub(crate) struct StaticAttrs(pub(crate) Attrs);

impl AttrProvider for StaticAttrs {
    fn attrs(&self, _cx: &RequestContext) -> Attrs {
        self.0.clone()
    }
}
