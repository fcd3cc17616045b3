//! Basic example showing how to wrap a driver with sqlcomment.
//!
//! Run with: cargo run --example basic

use async_trait::async_trait;
use sqlcomment::prelude::*;
use sqlcomment::{NamedValue, QueryWithContext, Rows, Statement, Value};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// A toy driver that prints the SQL it receives instead of talking to a
/// database. A real integration would delegate to an actual driver here.
struct EchoDriver;

#[async_trait]
impl Driver for EchoDriver {
    async fn connect(&self, _dsn: &str) -> Result<Box<dyn Connection>> {
        Ok(Box::new(EchoConn))
    }
}

struct EchoConn;

#[async_trait]
impl Connection for EchoConn {
    async fn prepare(&self, _sql: &str) -> Result<Box<dyn Statement>> {
        Err(Error::Unsupported)
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }

    fn as_query_with_context(&self) -> Option<&dyn QueryWithContext> {
        Some(self)
    }
}

#[derive(Debug)]
struct NoRows;

impl Rows for NoRows {
    fn columns(&self) -> Vec<String> {
        Vec::new()
    }

    fn next_row(&mut self) -> Result<Option<Vec<Value>>> {
        Ok(None)
    }
}

#[async_trait]
impl QueryWithContext for EchoConn {
    async fn query_with_context(
        &self,
        _cx: &RequestContext,
        sql: &str,
        _args: &[NamedValue],
    ) -> Result<Box<dyn Rows>> {
        println!("driver received: {sql}");
        Ok(Box::new(NoRows))
    }
}

/// Request-scoped value read by the trace-id provider below.
struct TraceId(&'static str);

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,sqlcomment=trace".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Wrap the driver once; every connection it opens shares the same
    // attribute configuration.
    let driver = wrap_driver(
        EchoDriver,
        Commenter::builder()
            .with_attr_pairs(["application", "billing"])
            .with_provider_fn(|cx: &RequestContext| {
                let trace = cx.get::<TraceId>().map(|t| t.0).unwrap_or("none");
                Attrs::from_pairs(["trace-id", trace])
            }),
    );

    let conn = driver.connect("echo://local").await?;

    let cx = RequestContext::new().with_value(TraceId("4bf92f3577b34da6"));
    conn.as_query_with_context()
        .expect("wrapper always presents the capability")
        .query_with_context(&cx, "SELECT * FROM invoices WHERE due < now()", &[])
        .await?;
    // driver received: SELECT * FROM invoices WHERE due < now()
    //   /*application='billing',trace-id='4bf92f3577b34da6'*/

    // One-off annotation also works without any connection.
    let sql = annotate(
        &RequestContext::background(),
        "SELECT 1",
        Commenter::builder().with_attr_pairs(["key", "value"]),
    );
    println!("annotated: {sql}");

    Ok(())
}
