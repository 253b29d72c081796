//! User repository. Password hashes come in already computed; this layer
//! never sees plain-text passwords.

use tracing::info;
use uuid::Uuid;

use simshop_core::models::{normalize_email, now, Role, User, UserUpdate};
use simshop_core::{ShopError, ShopResult};
use simshop_storage::queries::users;
use simshop_storage::Store;

#[derive(Clone)]
pub struct UserRepository {
    store: Store,
}

impl UserRepository {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Create an account. Emails are stored normalized.
    pub async fn create(
        &self,
        name: &str,
        email: &str,
        role: Role,
        password_hash: String,
    ) -> ShopResult<User> {
        let at = now();
        let user = User {
            id: Uuid::new_v4(),
            name: name.trim().to_string(),
            email: normalize_email(email),
            role,
            active: true,
            created_at: at,
            updated_at: at,
        };
        let created = self
            .store
            .with_conn(move |conn| {
                users::insert_user(conn, &user, &password_hash)?;
                Ok(user)
            })
            .await?;
        info!(id = %created.id, role = created.role.as_str(), "user created");
        Ok(created)
    }

    pub async fn find_by_id(&self, id: Uuid) -> ShopResult<User> {
        self.store
            .with_conn(move |conn| {
                users::get_user(conn, id)?.ok_or_else(|| ShopError::not_found("user", id))
            })
            .await
    }

    /// User and password hash for a login attempt.
    pub async fn credentials(&self, email: &str) -> ShopResult<Option<(User, String)>> {
        let email = normalize_email(email);
        self.store
            .with_conn(move |conn| users::get_user_credentials(conn, &email))
            .await
    }

    pub async fn exists_by_email(&self, email: &str) -> ShopResult<bool> {
        Ok(self.credentials(email).await?.is_some())
    }

    /// One page of users, newest first, plus the total count.
    pub async fn list(&self, page: u32, limit: u32) -> ShopResult<(Vec<User>, i64)> {
        let offset = page.saturating_sub(1).saturating_mul(limit);
        self.store
            .with_conn(move |conn| {
                let total = users::count_users(conn)?;
                let page = users::list_users(conn, limit, offset)?;
                Ok((page, total))
            })
            .await
    }

    /// Apply `update`, replacing the password hash when one is given.
    pub async fn update(
        &self,
        id: Uuid,
        update: UserUpdate,
        password_hash: Option<String>,
    ) -> ShopResult<User> {
        update.validate()?;
        self.store
            .with_conn(move |conn| {
                let mut user =
                    users::get_user(conn, id)?.ok_or_else(|| ShopError::not_found("user", id))?;
                update.apply(&mut user, now());
                let tx = conn.unchecked_transaction().map_err(simshop_storage::to_storage_err)?;
                users::update_user(&tx, &user)?;
                if let Some(hash) = &password_hash {
                    users::update_password(&tx, id, hash)?;
                }
                tx.commit().map_err(simshop_storage::to_storage_err)?;
                Ok(user)
            })
            .await
    }

    pub async fn delete(&self, id: Uuid) -> ShopResult<()> {
        let deleted = self
            .store
            .with_conn(move |conn| users::delete_user(conn, id))
            .await?;
        if !deleted {
            return Err(ShopError::not_found("user", id));
        }
        info!(id = %id, "user deleted");
        Ok(())
    }
}
