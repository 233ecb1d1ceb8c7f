//! Sink implementations

pub mod callback;
pub mod console;
pub mod file;

pub use callback::CallbackSink;
pub use console::ConsoleSink;
pub use file::FileSink;

pub use crate::core::Sink;
