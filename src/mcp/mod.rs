//! MCP server module
//!
//! Exposes the generator, catalog and saved meals over the Model Context Protocol.

mod server;

pub use server::MacroMenuService;
