//! Repository Traits
//!
//! The user store is an external collaborator. Implementations live in the
//! infrastructure layer.

use kernel::id::UserId;
use platform::password::HashedPassword;

use crate::domain::entity::user::User;
use crate::domain::value_object::{Email, Nickname, Password};
use crate::error::IdentityResult;

/// User store
#[trait_variant::make(UserStore: Send)]
pub trait LocalUserStore {
    /// Find user by ID
    async fn find_by_id(&self, user_id: &UserId) -> IdentityResult<Option<User>>;

    /// Find user by normalized email
    async fn find_by_email(&self, email: &Email) -> IdentityResult<Option<User>>;

    /// Find user by nickname
    async fn find_by_nickname(&self, nickname: &Nickname) -> IdentityResult<Option<User>>;

    /// Create a new user. Fails with `EmailTaken` / `NicknameTaken` on conflict.
    async fn create(&self, user: &User) -> IdentityResult<()>;

    /// Replace the password hash, pushing the previous one onto the history.
    async fn update_password_hash(&self, user_id: &UserId, password: &Password) -> IdentityResult<()>;

    /// Most recent hashes first, starting with the current one.
    async fn password_history(&self, user_id: &UserId, limit: usize) -> IdentityResult<Vec<HashedPassword>>;
}
