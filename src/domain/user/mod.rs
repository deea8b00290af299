//! User domain
//!
//! The slice of the user model needed to issue tokens: user identity and
//! the directory used to resolve a user by id or email.

mod entity;
mod repository;

pub use entity::{User, UserId, UserLookup};
pub use repository::UserDirectory;
