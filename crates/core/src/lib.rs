//! `shamsi-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no service clients, no IO).

pub mod error;
pub mod id;
pub mod message;
pub mod money;

pub use error::{DomainError, DomainResult};
pub use id::{DocumentId, OrderId, ProductId, UserId};
pub use message::Message;
pub use money::Money;
