//! UserRepository trait definition.

use confab_types::error::RepositoryError;
use confab_types::user::User;
use uuid::Uuid;

/// Repository trait for user account persistence.
///
/// Implementations live in confab-infra (e.g., `SqliteUserRepository`).
pub trait UserRepository: Send + Sync {
    /// Insert a new user.
    ///
    /// Returns `RepositoryError::Conflict` if the login name is already taken
    /// (UNIQUE constraint), so registration races resolve cleanly.
    fn create_user(
        &self,
        user: &User,
    ) -> impl std::future::Future<Output = Result<User, RepositoryError>> + Send;

    /// Look up a user by login name.
    fn find_by_user_id(
        &self,
        user_id: &str,
    ) -> impl std::future::Future<Output = Result<Option<User>, RepositoryError>> + Send;

    /// Look up a user by primary key (token subject).
    fn find_by_id(
        &self,
        id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Option<User>, RepositoryError>> + Send;
}
