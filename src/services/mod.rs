//! Service layer for the Lost and Found client.
//!
//! This module contains the business logic for:
//! - Backend access (`BackendClient`)
//! - Identity accounts (`FirebaseIdentity`)
//! - Listing and search (`ListingView`)
//! - Registration (`Registrar`)
//! - Location selection (`LocationSelector`)
//! - Item details (`DetailView`)

pub mod backend;
pub mod detail;
pub mod identity;
pub mod listings;
pub mod locations;
pub mod registration;

pub use backend::{BackendClient, ItemBackend, ProfileStore};
pub use detail::DetailView;
pub use identity::{AuthSession, FirebaseIdentity, IdentityProvider};
pub use listings::{ListingState, ListingView, merge_by_recency};
pub use locations::LocationSelector;
pub use registration::{RegistrationError, RegistrationReceipt, Registrar};
