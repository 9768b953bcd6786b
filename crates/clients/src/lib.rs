//! `shamsi-clients` — behavioral contracts of the backend services.
//!
//! The storefront is a pure API consumer: auth, profile, marketplace and
//! document services live elsewhere. This crate pins down their contracts as
//! async traits, the payload shapes crossing the boundary (camelCase on the
//! wire, snake_case in Rust), and an in-memory rendition of each service for
//! tests and local wiring.

pub mod auth;
pub mod bus;
pub mod documents;
pub mod error;
pub mod marketplace;
pub mod memory;
pub mod orders;
pub mod profile;

pub use auth::{AuthClient, IdentityUpdate, IdentityUser, RegisterRequest, RegistrationRole};
pub use bus::{AuthBus, AuthStateChange, Subscription};
pub use documents::{DocumentCategory, DocumentClient, DocumentReceipt, DocumentUpload};
pub use error::{ServiceError, ServiceResult};
pub use marketplace::{MarketplaceClient, Product, StockStatus};
pub use orders::{OrderClient, OrderDraft, OrderLine, PaymentMethod, PlacedOrder};
pub use profile::{ProfileClient, ProfileRecord, ProfileUpdate, VerificationStatus};
