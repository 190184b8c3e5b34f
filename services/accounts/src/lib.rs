//! Account store for user accounts and their login sessions
//!
//! Users and sessions live in two document collections that are kept loosely
//! in sync without multi-document transactions. See [`AccountStore`] for the
//! consistency contract of each operation.

pub mod error;
pub mod models;
pub mod repositories;

pub use error::{AccountError, AccountResult};
pub use models::{Preferences, Session, User};
pub use repositories::AccountStore;
