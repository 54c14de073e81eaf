//! Utility functions and helpers.

pub mod cancel;
pub mod console;
pub mod http;
pub mod image;
pub mod url;

pub use cancel::cancellable;
pub use self::url::{join_endpoint, parse_base};
