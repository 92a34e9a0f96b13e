//! Sinks: destinations for formatted lines
//!
//! Any `std::io::Write + Send` value can be passed to
//! [`Logger::set_output`](crate::Logger::set_output); this module adds
//! writers that are handy beyond the standard streams.

pub mod memory;

pub use memory::MemorySink;
