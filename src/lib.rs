//! Minimal MCP sample server.
//!
//! Exposes a small set of schema-validated tools (`echo`, `add_numbers`,
//! `get_system_info`, `validate_email`) and two sample resources over
//! JSON-RPC 2.0 stdio transport, compatible with any MCP-aware client.
//!
//! The interesting part is the dispatch engine: [`registry`] binds names to
//! schemas and handlers, [`schema`] validates untrusted arguments before any
//! handler runs, and [`dispatch`] routes requests and normalizes every
//! failure into a protocol-visible error. [`server`] is a thin stdio
//! transport adapter on top.

pub mod config;
pub mod dispatch;
pub mod handlers;
pub mod logging;
pub mod protocol;
pub mod registry;
pub mod schema;
pub mod server;
