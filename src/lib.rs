//! # sqlcomment
//!
//! SQLCommenter-style metadata comments on outgoing SQL statements.
//!
//! This crate augments query text with a machine-parsable comment of
//! key/value attributes (caller identity, trace id, application name) so
//! database observability tooling can correlate queries with the context
//! that issued them. It sits transparently between your code and the driver
//! layer: wrapped connections behave exactly like the bare ones, except that
//! query-bearing calls carry the comment.
//!
//! ## Features
//!
//! - **Transparent Wrapping**: connections keep their full capability
//!   surface; unsupported operations still answer with the driver's
//!   "unsupported" signal so fallback paths keep working
//! - **Canonical Encoding**: attributes encode deterministically, names in
//!   ascending byte order, values percent-escaped
//! - **Request-Scoped Attributes**: providers can read per-request values
//!   (trace ids, user identity) from a [`RequestContext`]
//! - **Comment Guard**: queries that already contain `/*` are never
//!   annotated twice
//! - **Zero Overhead When Unconfigured**: with no providers attached,
//!   queries pass through untouched
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use sqlcomment::{wrap_driver, Commenter};
//!
//! let driver = wrap_driver(
//!     my_driver,
//!     Commenter::builder().with_attr_pairs(["application", "billing"]),
//! );
//!
//! let conn = driver.connect("postgres://localhost/billing").await?;
//! // SELECT * FROM invoices /*application='billing'*/
//! ```
//!
//! One-off annotation without a connection:
//!
//! ```
//! use sqlcomment::{annotate, Commenter, RequestContext};
//!
//! let cx = RequestContext::background();
//! let sql = annotate(&cx, "SELECT 1", Commenter::builder().with_attr_pairs(["key", "value"]));
//! assert_eq!(sql, "SELECT 1 /*key='value'*/");
//! ```
//!
//! ## Wire Format
//!
//! ```text
//! <original query> /*<name1>='<value1>',<name2>='<value2>'*/
//! ```
//!
//! Names are sorted ascending and escaped like URL query components; values
//! are escaped like URL path components with spaces always rendered as
//! `%20`, never `+`. The exact byte rules live in the attribute encoder and
//! are fixed: external query-log parsers depend on them.
//!
//! ## Configuration
//!
//! Options compose in call order; later providers override earlier ones on
//! attribute-name collision:
//!
//! | Option | Attribute source |
//! |--------|------------------|
//! | `with_attrs` | a fixed [`Attrs`] set |
//! | `with_attr_pairs` | a fixed name/value list |
//! | `with_provider` | any [`AttrProvider`] implementation |
//! | `with_provider_fn` | a plain function of the [`RequestContext`] |

mod attrs;
mod comment;
mod connection;
mod context;
mod driver;
mod error;
mod escape;
mod pool;
mod provider;

pub use attrs::Attrs;
pub use comment::{annotate, Commenter, CommenterBuilder};
pub use connection::{wrap_driver, CommentExt, CommentedConnection, CommentedDriver};
pub use context::RequestContext;
pub use driver::{
    BeginTransaction, CheckNamedValue, Connection, Driver, ExecResult, Execute,
    ExecuteWithContext, IsolationLevel, NamedValue, Ping, PrepareWithContext, Query,
    QueryWithContext, ResetSession, Rows, Statement, Transaction, TxOptions, Value,
};
pub use error::{Error, Result};
pub use provider::{AttrProvider, AttrProviderFn};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        annotate, wrap_driver, AttrProvider, Attrs, CommentExt, CommentedConnection,
        CommentedDriver, Commenter, CommenterBuilder, Connection, Driver, Error, RequestContext,
        Result,
    };
}
