use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*, sea_query::Expr};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, auth, trips, users};

use super::{Engine, normalize_required_text, normalize_username, with_tx};

/// Payload for [`Engine::register_user`].
#[derive(Clone, Debug)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl Engine {
    pub(super) fn require_admin(caller: &users::Model) -> ResultEngine<()> {
        if !caller.is_admin {
            return Err(EngineError::Forbidden(
                "administrator role required".to_string(),
            ));
        }
        Ok(())
    }

    /// Registers a new user.
    ///
    /// Username and email are unique, case-insensitively. A conflict leaves
    /// no partial write behind: the checks and the insert share one DB
    /// transaction, and the unique indexes back them up.
    pub async fn register_user(&self, new_user: NewUser) -> ResultEngine<String> {
        let username = normalize_username(&new_user.username)?;
        let email = normalize_required_text(&new_user.email, "email")?.to_lowercase();
        if new_user.password.is_empty() {
            return Err(EngineError::Validation(
                "password must not be empty".to_string(),
            ));
        }
        let password_hash = auth::hash_password(&new_user.password)?;

        with_tx!(self, |db_tx| {
            let username_taken = users::Entity::find()
                .filter(Expr::cust("LOWER(username)").eq(username.to_lowercase()))
                .one(&db_tx)
                .await?
                .is_some();
            if username_taken {
                return Err(EngineError::ExistingKey(username));
            }

            let email_taken = users::Entity::find()
                .filter(Expr::cust("LOWER(email)").eq(email.clone()))
                .one(&db_tx)
                .await?
                .is_some();
            if email_taken {
                return Err(EngineError::ExistingKey(email));
            }

            let user = users::ActiveModel {
                id: ActiveValue::Set(Uuid::new_v4().to_string()),
                username: ActiveValue::Set(username.clone()),
                email: ActiveValue::Set(email.clone()),
                password_hash: ActiveValue::Set(password_hash.clone()),
                is_admin: ActiveValue::Set(false),
            };
            let model = user.insert(&db_tx).await?;
            Ok(model.id)
        })
    }

    /// Checks a username/password pair.
    ///
    /// Unknown user and wrong password produce the same error, so callers
    /// cannot probe which usernames exist.
    pub async fn authenticate(&self, username: &str, password: &str) -> ResultEngine<users::Model> {
        let username = normalize_username(username).map_err(|_| EngineError::InvalidCredentials)?;
        let user = users::Entity::find()
            .filter(Expr::cust("LOWER(username)").eq(username.to_lowercase()))
            .one(&self.database)
            .await?
            .ok_or(EngineError::InvalidCredentials)?;

        if !auth::verify_password(&user.password_hash, password) {
            return Err(EngineError::InvalidCredentials);
        }
        Ok(user)
    }

    /// Issues a reset token for the account behind `email`.
    ///
    /// Returns `None` when no account matches, so the HTTP layer can answer
    /// identically either way. Delivery of the token is the caller's
    /// problem; mail wiring lives outside the engine.
    pub async fn start_password_reset(&self, email: &str) -> ResultEngine<Option<String>> {
        let email = normalize_required_text(email, "email")?.to_lowercase();
        let user = users::Entity::find()
            .filter(Expr::cust("LOWER(email)").eq(email))
            .one(&self.database)
            .await?;

        match user {
            Some(user) => {
                let token =
                    auth::issue_reset_token(&self.reset_secret, &user.id, self.reset_token_ttl_secs)?;
                Ok(Some(token))
            }
            None => Ok(None),
        }
    }

    /// Sets a new password for the user a valid reset token points at.
    pub async fn reset_password(&self, token: &str, new_password: &str) -> ResultEngine<()> {
        if new_password.is_empty() {
            return Err(EngineError::Validation(
                "password must not be empty".to_string(),
            ));
        }
        let user_id = auth::verify_reset_token(&self.reset_secret, token)?;
        let password_hash = auth::hash_password(new_password)?;

        with_tx!(self, |db_tx| {
            // A token for a since-deleted account is just an invalid token.
            let user = users::Entity::find_by_id(user_id.clone())
                .one(&db_tx)
                .await?
                .ok_or(EngineError::InvalidToken)?;

            let mut active: users::ActiveModel = user.into();
            active.password_hash = ActiveValue::Set(password_hash.clone());
            active.update(&db_tx).await?;
            Ok(())
        })
    }

    /// Lists all users. Admin only.
    pub async fn list_users(&self, caller: &users::Model) -> ResultEngine<Vec<users::Model>> {
        Self::require_admin(caller)?;
        users::Entity::find()
            .order_by_asc(users::Column::Username)
            .all(&self.database)
            .await
            .map_err(Into::into)
    }

    /// Deletes a user and every trip they own, in one transaction. Admin only.
    pub async fn delete_user(&self, caller: &users::Model, user_id: &str) -> ResultEngine<()> {
        Self::require_admin(caller)?;

        with_tx!(self, |db_tx| {
            let user = users::Entity::find_by_id(user_id.to_string())
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("user not exists".to_string()))?;

            trips::Entity::delete_many()
                .filter(trips::Column::UserId.eq(user.id.clone()))
                .exec(&db_tx)
                .await?;

            let active: users::ActiveModel = user.into();
            active.delete(&db_tx).await?;
            Ok(())
        })
    }

    /// Grants or revokes the admin role. Admin only.
    pub async fn set_admin(
        &self,
        caller: &users::Model,
        user_id: &str,
        is_admin: bool,
    ) -> ResultEngine<()> {
        Self::require_admin(caller)?;

        with_tx!(self, |db_tx| {
            let user = users::Entity::find_by_id(user_id.to_string())
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("user not exists".to_string()))?;

            let mut active: users::ActiveModel = user.into();
            active.is_admin = ActiveValue::Set(is_admin);
            active.update(&db_tx).await?;
            Ok(())
        })
    }
}
