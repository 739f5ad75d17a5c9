//! Relational storage for user records.
//!
//! The default implementation ([`store::UserStore`]) is backed by SeaORM over
//! SQLite. The schema is owned by the `migration` crate and brought up to date
//! every time a store is opened.

pub mod entities;
pub mod error;
pub mod store;


use async_trait::async_trait;
use userdesk_common::types::{NewUser, PageRequest, UpdateUserRequest, User};

pub use error::{Result, StorageError};
pub use store::UserStore;

/// One page of users plus the number of matches before slicing.
#[derive(Debug, Clone)]
pub struct UserPage {
    pub items: Vec<User>,
    pub total: u64,
}

/// Persistence operations for the `users` table.
///
/// Implementations must be `Send + Sync`: a single instance is shared by all
/// request handlers.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Validates and inserts a user. A missing or empty role becomes
    /// [`userdesk_common::types::DEFAULT_ROLE`].
    async fn create(&self, new_user: &NewUser) -> Result<User>;

    /// Looks up a user by primary key. Absence is `Ok(None)`.
    async fn find_by_id(&self, id: i32) -> Result<Option<User>>;

    /// Lists users newest first. `filter` is a case-insensitive (Unicode)
    /// substring matched against name, email or role. A page whose offset is
    /// past the SQL integer range yields no items but still reports `total`.
    async fn find_page(&self, filter: Option<&str>, page: PageRequest) -> Result<UserPage>;

    /// Merges the supplied fields into an existing user and refreshes
    /// `updated_at`. Fails with [`StorageError::NotFound`] if the id is unknown.
    ///
    /// Unlike [`UserRepository::create`], an explicit empty `role` is not
    /// replaced by the default: the merged record is validated as sent, so
    /// `Some("")` for any field is a [`StorageError::Validation`].
    async fn update(&self, id: i32, changes: &UpdateUserRequest) -> Result<User>;

    /// Deletes a user. Returns `true` if a row was removed.
    async fn delete(&self, id: i32) -> Result<bool>;
}
