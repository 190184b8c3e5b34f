//! Repositories for account data

pub mod account;

pub use account::{AccountStore, SESSIONS_COLLECTION, USERS_COLLECTION};
