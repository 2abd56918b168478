//! Shared building blocks for the pawtrack domain crates: identifiers, the
//! domain error, and the aggregate/entity traits. No IO lives here.

pub mod aggregate;
pub mod entity;
pub mod error;
pub mod id;
pub mod value_object;

pub use aggregate::{Aggregate, AggregateRoot, ExpectedVersion};
pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{EntityRef, ItemId, TransactionId, UserId};
pub use value_object::ValueObject;
