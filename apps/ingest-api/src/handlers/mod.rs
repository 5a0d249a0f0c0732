//! Handlers 模块

pub mod ingest;
pub mod system;

pub use ingest::*;
pub use system::*;
