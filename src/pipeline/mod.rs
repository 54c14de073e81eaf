//! Pipeline entry points for client operations.
//!
//! - `run_recent`: Show the merged lost + found listing
//! - `run_search`: Search one collection
//! - `run_show`: Show a single item
//! - `run_register`: Register a new account
//! - `run_locations`: Browse the location table
//! - `run_validate`: Check configuration and location data

pub mod detail;
pub mod listings;
pub mod locations;
pub mod register;
pub mod validate;

pub use detail::run_show;
pub use listings::{run_recent, run_search};
pub use locations::run_locations;
pub use register::run_register;
pub use validate::run_validate;
