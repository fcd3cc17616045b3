//! Commented wrappers around driver connections and drivers.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::comment::{Commenter, CommenterBuilder};
use crate::context::RequestContext;
use crate::driver::{
    BeginTransaction, CheckNamedValue, Connection, Driver, ExecResult, Execute,
    ExecuteWithContext, NamedValue, Ping, PrepareWithContext, Query, QueryWithContext,
    ResetSession, Rows, Statement, Transaction, TxOptions, Value,
};
use crate::error::{Error, Result};

/// A wrapper around a driver connection that annotates outgoing queries.
///
/// The wrapper presents the full capability surface of [`Connection`] and
/// decides support per call: each forwarding method asks the wrapped
/// connection for the matching capability and answers
/// [`Error::Unsupported`] when it is absent, so callers can fall back the
/// same way they would against the bare connection. Query-bearing calls
/// (`execute` and `query`, with or without a context) run their SQL through
/// the shared [`Commenter`] first; everything else is forwarded verbatim,
/// results and errors untouched.
///
/// # Example
///
/// ```rust,ignore
/// use sqlcomment::{wrap_driver, Commenter};
///
/// let driver = wrap_driver(
///     PgDriver::new(),
///     Commenter::builder().with_attr_pairs(["application", "billing"]),
/// );
/// let conn = driver.connect("postgres://localhost/billing").await?;
/// // every query issued through `conn` now carries the comment
/// ```
pub struct CommentedConnection {
    inner: Box<dyn Connection>,
    commenter: Arc<Commenter>,
}

impl CommentedConnection {
    /// Wrap `connection`, annotating its queries through `commenter`.
    ///
    /// The commenter is shared, not owned: every connection opened from the
    /// same wrapped driver holds the same instance.
    pub fn new(connection: Box<dyn Connection>, commenter: Arc<Commenter>) -> Self {
        Self {
            inner: connection,
            commenter,
        }
    }

    /// Wrap `connection` with a commenter built from `options`.
    pub fn wrap(connection: Box<dyn Connection>, options: CommenterBuilder) -> Self {
        Self::new(connection, Arc::new(options.build()))
    }

    /// The wrapped connection.
    pub fn inner(&self) -> &dyn Connection {
        self.inner.as_ref()
    }

    /// Consume the wrapper and return the wrapped connection.
    pub fn into_inner(self) -> Box<dyn Connection> {
        self.inner
    }

    /// The commenter this connection annotates with.
    pub fn commenter(&self) -> &Arc<Commenter> {
        &self.commenter
    }

    fn with_comment(&self, cx: &RequestContext, sql: &str) -> String {
        self.commenter.annotate(cx, sql)
    }
}

impl fmt::Debug for CommentedConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommentedConnection")
            .field("commenter", &self.commenter)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Connection for CommentedConnection {
    async fn prepare(&self, sql: &str) -> Result<Box<dyn Statement>> {
        self.inner.prepare(sql).await
    }

    async fn close(&self) -> Result<()> {
        self.inner.close().await
    }

    fn as_execute(&self) -> Option<&dyn Execute> {
        Some(self)
    }

    fn as_execute_with_context(&self) -> Option<&dyn ExecuteWithContext> {
        Some(self)
    }

    fn as_query(&self) -> Option<&dyn Query> {
        Some(self)
    }

    fn as_query_with_context(&self) -> Option<&dyn QueryWithContext> {
        Some(self)
    }

    fn as_prepare_with_context(&self) -> Option<&dyn PrepareWithContext> {
        Some(self)
    }

    fn as_begin_transaction(&self) -> Option<&dyn BeginTransaction> {
        Some(self)
    }

    fn as_ping(&self) -> Option<&dyn Ping> {
        Some(self)
    }

    fn as_reset_session(&self) -> Option<&dyn ResetSession> {
        Some(self)
    }

    fn as_check_named_value(&self) -> Option<&dyn CheckNamedValue> {
        Some(self)
    }
}

#[async_trait]
impl Execute for CommentedConnection {
    async fn execute(&self, sql: &str, args: &[Value]) -> Result<ExecResult> {
        match self.inner.as_execute() {
            Some(inner) => {
                let sql = self.with_comment(&RequestContext::background(), sql);
                inner.execute(&sql, args).await
            }
            None => Err(Error::Unsupported),
        }
    }
}

#[async_trait]
impl ExecuteWithContext for CommentedConnection {
    async fn execute_with_context(
        &self,
        cx: &RequestContext,
        sql: &str,
        args: &[NamedValue],
    ) -> Result<ExecResult> {
        match self.inner.as_execute_with_context() {
            Some(inner) => {
                let sql = self.with_comment(cx, sql);
                inner.execute_with_context(cx, &sql, args).await
            }
            None => Err(Error::Unsupported),
        }
    }
}

#[async_trait]
impl Query for CommentedConnection {
    async fn query(&self, sql: &str, args: &[Value]) -> Result<Box<dyn Rows>> {
        match self.inner.as_query() {
            Some(inner) => {
                let sql = self.with_comment(&RequestContext::background(), sql);
                inner.query(&sql, args).await
            }
            None => Err(Error::Unsupported),
        }
    }
}

#[async_trait]
impl QueryWithContext for CommentedConnection {
    async fn query_with_context(
        &self,
        cx: &RequestContext,
        sql: &str,
        args: &[NamedValue],
    ) -> Result<Box<dyn Rows>> {
        match self.inner.as_query_with_context() {
            Some(inner) => {
                let sql = self.with_comment(cx, sql);
                inner.query_with_context(cx, &sql, args).await
            }
            None => Err(Error::Unsupported),
        }
    }
}

#[async_trait]
impl PrepareWithContext for CommentedConnection {
    async fn prepare_with_context(
        &self,
        cx: &RequestContext,
        sql: &str,
    ) -> Result<Box<dyn Statement>> {
        match self.inner.as_prepare_with_context() {
            Some(inner) => inner.prepare_with_context(cx, sql).await,
            None => Err(Error::Unsupported),
        }
    }
}

#[async_trait]
impl BeginTransaction for CommentedConnection {
    async fn begin_transaction(
        &self,
        cx: &RequestContext,
        options: TxOptions,
    ) -> Result<Box<dyn Transaction>> {
        match self.inner.as_begin_transaction() {
            Some(inner) => inner.begin_transaction(cx, options).await,
            None => Err(Error::Unsupported),
        }
    }
}

#[async_trait]
impl Ping for CommentedConnection {
    async fn ping(&self, cx: &RequestContext) -> Result<()> {
        match self.inner.as_ping() {
            Some(inner) => inner.ping(cx).await,
            None => Err(Error::Unsupported),
        }
    }
}

#[async_trait]
impl ResetSession for CommentedConnection {
    async fn reset_session(&self, cx: &RequestContext) -> Result<()> {
        match self.inner.as_reset_session() {
            Some(inner) => inner.reset_session(cx).await,
            None => Err(Error::Unsupported),
        }
    }
}

impl CheckNamedValue for CommentedConnection {
    fn check_named_value(&self, value: &mut NamedValue) -> Result<()> {
        match self.inner.as_check_named_value() {
            Some(inner) => inner.check_named_value(value),
            None => Err(Error::Unsupported),
        }
    }
}

/// A driver wrapper that comments every connection it opens.
///
/// All connections share one [`Commenter`], so a single configured entry
/// point has a single attribute configuration.
pub struct CommentedDriver {
    inner: Box<dyn Driver>,
    commenter: Arc<Commenter>,
}

impl CommentedDriver {
    pub fn new(driver: Box<dyn Driver>, options: CommenterBuilder) -> Self {
        Self {
            inner: driver,
            commenter: Arc::new(options.build()),
        }
    }

    /// The commenter shared by every connection this driver opens.
    pub fn commenter(&self) -> &Arc<Commenter> {
        &self.commenter
    }
}

impl fmt::Debug for CommentedDriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommentedDriver")
            .field("commenter", &self.commenter)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Driver for CommentedDriver {
    async fn connect(&self, dsn: &str) -> Result<Box<dyn Connection>> {
        let conn = self.inner.connect(dsn).await?;
        tracing::debug!("wrapped new connection");
        Ok(Box::new(CommentedConnection::new(
            conn,
            Arc::clone(&self.commenter),
        )))
    }
}

/// Wrap a driver so every connection it opens annotates its queries.
///
/// # Example
///
/// ```rust,ignore
/// let driver = wrap_driver(
///     PgDriver::new(),
///     Commenter::builder()
///         .with_attr_pairs(["application", "billing"])
///         .with_provider_fn(|cx| trace_attrs(cx)),
/// );
/// ```
pub fn wrap_driver(driver: impl Driver + 'static, options: CommenterBuilder) -> CommentedDriver {
    CommentedDriver::new(Box::new(driver), options)
}

/// Extension trait for fluent wrapping of connections.
pub trait CommentExt: Connection + Sized + 'static {
    /// Wrap this connection with query annotation.
    fn with_comments(self, options: CommenterBuilder) -> CommentedConnection {
        CommentedConnection::wrap(Box::new(self), options)
    }

    /// Wrap this connection around an existing shared commenter.
    fn with_commenter(self, commenter: Arc<Commenter>) -> CommentedConnection {
        CommentedConnection::new(Box::new(self), commenter)
    }
}

impl<C: Connection + Sized + 'static> CommentExt for C {}
