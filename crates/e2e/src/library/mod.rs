//! Reusable multi-step actions built from page objects
//!
//! Each module pairs a helper struct (resolved from the container) with free
//! functions returning ready-made [`TestCase`](crate::scenario::TestCase)s that
//! scenarios compose.

pub mod code_execution;
pub mod language_server;
pub mod project_and_file;
pub mod workspace_handling;

pub use code_execution::CodeExecution;
pub use language_server::LanguageServer;
pub use project_and_file::ProjectAndFile;
pub use workspace_handling::WorkspaceHandling;
