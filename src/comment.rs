//! Query annotation: the commenter and its configuration.

use std::fmt;

use crate::attrs::Attrs;
use crate::context::RequestContext;
use crate::pool::BufferPool;
use crate::provider::{AttrProvider, AttrProviderFn, StaticAttrs};

pub(crate) const COMMENT_START: &str = "/*";
pub(crate) const COMMENT_END: &str = "*/";

/// Annotate a single query without going through a wrapped connection.
///
/// Returns `query` unchanged when no options are supplied, and when the
/// query already contains a comment opener. Annotating such a query would
/// produce two openers, which some dialects reject and which corrupts the
/// metadata for downstream tooling.
///
/// # Example
///
/// ```
/// use sqlcomment::{annotate, Commenter, RequestContext};
///
/// let cx = RequestContext::background();
/// let sql = annotate(&cx, "SELECT 1", Commenter::builder().with_attr_pairs(["key", "value"]));
/// assert_eq!(sql, "SELECT 1 /*key='value'*/");
/// ```
pub fn annotate(cx: &RequestContext, query: &str, options: CommenterBuilder) -> String {
    if options.is_empty() {
        return query.to_owned();
    }
    if query.contains(COMMENT_START) {
        return query.to_owned();
    }
    options.build().annotate(cx, query)
}

/// Configuration for a [`Commenter`].
///
/// Options compose and apply in call order: when two providers supply the
/// same attribute name, the later one wins.
#[derive(Default)]
pub struct CommenterBuilder {
    providers: Vec<Box<dyn AttrProvider>>,
}

impl CommenterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a fixed attribute set.
    pub fn with_attrs(self, attrs: Attrs) -> Self {
        self.with_provider(StaticAttrs(attrs))
    }

    /// Attach a fixed alternating name/value list.
    ///
    /// # Panics
    ///
    /// Panics when given an odd number of elements, like
    /// [`Attrs::from_pairs`].
    pub fn with_attr_pairs<'a, I>(self, pairs: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        self.with_attrs(Attrs::from_pairs(pairs))
    }

    /// Attach a custom provider.
    pub fn with_provider(mut self, provider: impl AttrProvider + 'static) -> Self {
        self.providers.push(Box::new(provider));
        self
    }

    /// Attach a provider expressed as a plain function of the request
    /// context.
    pub fn with_provider_fn<F>(self, f: F) -> Self
    where
        F: Fn(&RequestContext) -> Attrs + Send + Sync + 'static,
    {
        self.with_provider(AttrProviderFn(f))
    }

    /// True when no options have been applied.
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    pub fn build(self) -> Commenter {
        Commenter {
            providers: self.providers,
        }
    }
}

impl fmt::Debug for CommenterBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommenterBuilder")
            .field("providers", &self.providers.len())
            .finish()
    }
}

/// Merges provider output and appends the encoded comment to query text.
///
/// The provider list is fixed at construction, so a commenter is safe to
/// share across concurrent callers; one instance is typically shared by
/// every connection opened from the same wrapped driver.
pub struct Commenter {
    providers: Vec<Box<dyn AttrProvider>>,
}

impl Commenter {
    pub fn builder() -> CommenterBuilder {
        CommenterBuilder::new()
    }

    /// Append the encoded attribute comment to `query`.
    ///
    /// When no provider yields any attribute the query is returned
    /// unchanged.
    pub fn annotate(&self, cx: &RequestContext, query: &str) -> String {
        let attrs = self.attrs(cx);
        if attrs.is_empty() {
            return query.to_owned();
        }

        let mut buf = BufferPool::global().acquire();
        buf.push_str(query);
        buf.push(' ');
        buf.push_str(COMMENT_START);
        attrs.encode_into(&mut buf);
        buf.push_str(COMMENT_END);

        tracing::trace!(attrs = attrs.len(), "annotated query");
        buf.as_str().to_owned()
    }

    fn attrs(&self, cx: &RequestContext) -> Attrs {
        match self.providers.as_slice() {
            [] => Attrs::new(),
            [single] => single.attrs(cx),
            providers => {
                let mut attrs = Attrs::new();
                for provider in providers {
                    attrs.update(provider.attrs(cx));
                }
                attrs
            }
        }
    }
}

impl fmt::Debug for Commenter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Commenter")
            .field("providers", &self.providers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cx() -> RequestContext {
        RequestContext::background()
    }

    #[test]
    fn annotate_without_options_returns_query() {
        assert_eq!(annotate(&cx(), "", CommenterBuilder::new()), "");
        assert_eq!(annotate(&cx(), "  ", CommenterBuilder::new()), "  ");
        assert_eq!(annotate(&cx(), "SELECT 1", CommenterBuilder::new()), "SELECT 1");
    }

    #[test]
    fn annotate_skips_queries_with_existing_comment() {
        let got = annotate(
            &cx(),
            "SELECT 1  /* comment */",
            Commenter::builder().with_attr_pairs(["key", "value"]),
        );
        assert_eq!(got, "SELECT 1  /* comment */");
    }

    #[test]
    fn annotate_single_attr() {
        let got = annotate(
            &cx(),
            "SELECT 1",
            Commenter::builder().with_attr_pairs(["key", "value"]),
        );
        assert_eq!(got, "SELECT 1 /*key='value'*/");
    }

    #[test]
    fn annotate_multiple_attrs() {
        let got = annotate(
            &cx(),
            "SELECT 1",
            Commenter::builder().with_attr_pairs(["key", "1value", "key2", "  value 2"]),
        );
        assert_eq!(got, "SELECT 1 /*key='1value',key2='%20%20value%202'*/");
    }

    #[test]
    fn annotate_with_empty_attrs_returns_query() {
        let got = annotate(&cx(), "SELECT 1", Commenter::builder().with_attrs(Attrs::new()));
        assert_eq!(got, "SELECT 1");
    }

    #[test]
    fn later_providers_win_on_collision() {
        let commenter = Commenter::builder()
            .with_attr_pairs(["k", "a"])
            .with_attr_pairs(["k", "b"])
            .build();
        assert_eq!(commenter.annotate(&cx(), "SELECT 1"), "SELECT 1 /*k='b'*/");
    }

    #[test]
    fn providers_read_the_request_context() {
        struct UserKey(&'static str);

        let commenter = Commenter::builder()
            .with_provider_fn(|cx: &RequestContext| {
                let user = cx.get::<UserKey>().map(|k| k.0).unwrap_or("anonymous");
                Attrs::from_pairs(["user-key", user])
            })
            .build();

        let cx = RequestContext::new().with_value(UserKey("my-key"));
        assert_eq!(commenter.annotate(&cx, "SELECT 1"), "SELECT 1 /*user-key='my-key'*/");
        assert_eq!(
            commenter.annotate(&RequestContext::background(), "SELECT 1"),
            "SELECT 1 /*user-key='anonymous'*/"
        );
    }

    #[test]
    fn concurrent_annotation_is_safe() {
        let commenter = Commenter::builder()
            .with_attrs(Attrs::from_pairs([
                "key", "value", //
                "2key", "value 33", //
                "key3", "44  value",
            ]))
            .build();

        let want = commenter.annotate(&cx(), "SELECT * FROM my_table WHERE column IS NOT NULL");
        std::thread::scope(|s| {
            for _ in 0..10 {
                s.spawn(|| {
                    let got =
                        commenter.annotate(&cx(), "SELECT * FROM my_table WHERE column IS NOT NULL");
                    assert_eq!(got, want);
                });
            }
        });
    }
}
