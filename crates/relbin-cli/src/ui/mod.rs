//! Terminal output

mod reporter;

pub use reporter::{ConsoleReporter, format_size};
