//! Credential service
//!
//! Sets a known password on one account and confirms the login lookup
//! matches. `users.password` holds an unsalted SHA-256 hex digest, so the
//! check is a self-test of the stored digest, not a security control.

use serde::Serialize;
use validator::Validate;

use crate::{
    constants::test_account,
    db::Store,
    error::{AppError, AppResult},
    models::NewUser,
    utils::{hash_string, verify_hash},
};

/// Account whose password is being reset
#[derive(Debug, Clone)]
pub struct AccountDetails {
    pub email: String,
    pub username: String,
    pub school: String,
    pub student_id: String,
    pub phone: String,
}

impl Default for AccountDetails {
    fn default() -> Self {
        Self {
            email: test_account::EMAIL.to_string(),
            username: test_account::USERNAME.to_string(),
            school: test_account::SCHOOL.to_string(),
            student_id: test_account::STUDENT_ID.to_string(),
            phone: test_account::PHONE.to_string(),
        }
    }
}

impl AccountDetails {
    fn into_new_user(self, digest: &str) -> NewUser {
        NewUser {
            username: self.username,
            email: self.email,
            password: digest.to_string(),
            school: self.school,
            student_id: self.student_id,
            phone: self.phone,
        }
    }
}

/// Outcome of a successful reset
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CredentialCheck {
    pub user_id: i32,
    pub email: String,
    /// Whether the account had to be inserted
    pub created: bool,
    pub digest: String,
}

/// Service for resetting and verifying account passwords
pub struct CredentialService;

impl CredentialService {
    /// Store `sha256_hex(password)` for `account` and verify the lookup.
    ///
    /// The account is inserted when no user has its email. Returns
    /// [`AppError::VerificationFailed`] when the `(email, digest)` lookup
    /// finds nothing afterwards.
    pub async fn reset_password<S: Store + ?Sized>(
        store: &mut S,
        account: AccountDetails,
        password: &str,
    ) -> AppResult<CredentialCheck> {
        if password.is_empty() {
            return Err(AppError::Validation("Password must not be empty".to_string()));
        }

        let users = store.list_users().await?;
        tracing::info!("Found {} users", users.len());
        for user in &users {
            tracing::debug!("  - #{} {} <{}>", user.id, user.username, user.email);
        }

        let digest = hash_string(password);
        tracing::debug!("Password digest: {}", digest);

        let email = account.email.clone();
        let created = match store.find_user_by_email(&email).await? {
            Some(existing) => {
                let affected = store.update_user_password(&email, &digest).await?;
                tracing::info!(
                    "Updated password of user #{} <{}> ({} rows)",
                    existing.id,
                    email,
                    affected
                );
                false
            }
            None => {
                let new_user = account.into_new_user(&digest);
                new_user.validate()?;
                store.create_user(&new_user).await?;
                tracing::info!("Created user <{}>", email);
                true
            }
        };

        let user = store
            .find_user_by_credentials(&email, &digest)
            .await?
            .ok_or_else(|| {
                AppError::VerificationFailed(format!("Login lookup for <{}> found no match", email))
            })?;

        if !verify_hash(password, &user.password) {
            return Err(AppError::VerificationFailed(format!(
                "Stored digest of <{}> does not match the password",
                email
            )));
        }

        tracing::info!("Verified login lookup for user #{} <{}>", user.id, user.email);

        Ok(CredentialCheck {
            user_id: user.id,
            email,
            created,
            digest,
        })
    }
}
