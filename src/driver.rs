//! The connectivity seam a commented connection wraps.
//!
//! The split mirrors how SQL driver stacks separate required connection
//! behavior from optional capabilities: every connection can prepare a
//! statement and close, and may additionally implement any subset of the
//! capability traits below. Callers discover support through the `as_*`
//! accessors on [`Connection`], which default to `None`; an implementor opts
//! in to a capability by overriding the matching accessor to return itself.

use async_trait::async_trait;

use crate::context::RequestContext;
use crate::error::Result;

/// A single driver-level parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

/// A parameter with an optional name and its 1-based ordinal position.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedValue {
    pub name: Option<String>,
    pub ordinal: usize,
    pub value: Value,
}

/// Outcome of a statement that returns no rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecResult {
    pub rows_affected: u64,
    pub last_insert_id: Option<i64>,
}

/// Isolation level requested through [`BeginTransaction`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IsolationLevel {
    ReadUncommitted,
    ReadCommitted,
    RepeatableRead,
    Serializable,
}

/// Options for starting a transaction.
#[derive(Debug, Clone, Copy, Default)]
pub struct TxOptions {
    pub isolation: Option<IsolationLevel>,
    pub read_only: bool,
}

/// Row stream produced by a query.
pub trait Rows: Send + std::fmt::Debug {
    /// Column names, in result order.
    fn columns(&self) -> Vec<String>;

    /// The next row, or `None` once the stream is exhausted.
    fn next_row(&mut self) -> Result<Option<Vec<Value>>>;

    /// Release driver resources held by the stream.
    fn close(&mut self) -> Result<()> {
        Ok(())
    }
}

/// A prepared statement handle.
#[async_trait]
pub trait Statement: Send {
    /// Number of bound parameters, when the driver knows it.
    fn parameter_count(&self) -> Option<usize> {
        None
    }

    async fn execute(&mut self, args: &[Value]) -> Result<ExecResult>;

    async fn query(&mut self, args: &[Value]) -> Result<Box<dyn Rows>>;

    async fn close(&mut self) -> Result<()>;
}

/// An open transaction handle.
#[async_trait]
pub trait Transaction: Send {
    async fn commit(self: Box<Self>) -> Result<()>;

    async fn rollback(self: Box<Self>) -> Result<()>;
}

/// Execute a statement without a request context.
#[async_trait]
pub trait Execute: Send + Sync {
    async fn execute(&self, sql: &str, args: &[Value]) -> Result<ExecResult>;
}

/// Execute a statement under a request context.
#[async_trait]
pub trait ExecuteWithContext: Send + Sync {
    async fn execute_with_context(
        &self,
        cx: &RequestContext,
        sql: &str,
        args: &[NamedValue],
    ) -> Result<ExecResult>;
}

/// Run a query without a request context.
#[async_trait]
pub trait Query: Send + Sync {
    async fn query(&self, sql: &str, args: &[Value]) -> Result<Box<dyn Rows>>;
}

/// Run a query under a request context.
#[async_trait]
pub trait QueryWithContext: Send + Sync {
    async fn query_with_context(
        &self,
        cx: &RequestContext,
        sql: &str,
        args: &[NamedValue],
    ) -> Result<Box<dyn Rows>>;
}

/// Prepare a statement under a request context.
#[async_trait]
pub trait PrepareWithContext: Send + Sync {
    async fn prepare_with_context(
        &self,
        cx: &RequestContext,
        sql: &str,
    ) -> Result<Box<dyn Statement>>;
}

/// Start a transaction with explicit options.
#[async_trait]
pub trait BeginTransaction: Send + Sync {
    async fn begin_transaction(
        &self,
        cx: &RequestContext,
        options: TxOptions,
    ) -> Result<Box<dyn Transaction>>;
}

/// Check that the connection is still alive.
#[async_trait]
pub trait Ping: Send + Sync {
    async fn ping(&self, cx: &RequestContext) -> Result<()>;
}

/// Reset per-session state before a pooled connection is handed back out.
#[async_trait]
pub trait ResetSession: Send + Sync {
    async fn reset_session(&self, cx: &RequestContext) -> Result<()>;
}

/// Vet (and possibly convert) one parameter before it is bound.
pub trait CheckNamedValue: Send + Sync {
    fn check_named_value(&self, value: &mut NamedValue) -> Result<()>;
}

/// Required surface of a driver connection, plus capability discovery.
#[async_trait]
pub trait Connection: Send + Sync {
    /// Prepare `sql` for repeated execution.
    async fn prepare(&self, sql: &str) -> Result<Box<dyn Statement>>;

    /// Close the connection. The connection must not be used afterwards.
    async fn close(&self) -> Result<()>;

    fn as_execute(&self) -> Option<&dyn Execute> {
        None
    }

    fn as_execute_with_context(&self) -> Option<&dyn ExecuteWithContext> {
        None
    }

    fn as_query(&self) -> Option<&dyn Query> {
        None
    }

    fn as_query_with_context(&self) -> Option<&dyn QueryWithContext> {
        None
    }

    fn as_prepare_with_context(&self) -> Option<&dyn PrepareWithContext> {
        None
    }

    fn as_begin_transaction(&self) -> Option<&dyn BeginTransaction> {
        None
    }

    fn as_ping(&self) -> Option<&dyn Ping> {
        None
    }

    fn as_reset_session(&self) -> Option<&dyn ResetSession> {
        None
    }

    fn as_check_named_value(&self) -> Option<&dyn CheckNamedValue> {
        None
    }
}

/// A connectivity root that opens connections from a DSN.
#[async_trait]
pub trait Driver: Send + Sync {
    async fn connect(&self, dsn: &str) -> Result<Box<dyn Connection>>;
}
