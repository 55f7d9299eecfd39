//! Signup, login and account management.

use tracing::{info, instrument, warn};
use validator::Validate;

use crate::domain::user::normalize_email;
use crate::domain::{
    AppError, AuthResponse, Caller, DatabaseError, LoginRequest, NewUser, PublicUser,
    SignupRequest, UpdateUserRequest, User, UserChanges, new_id,
};

use super::AppService;

impl AppService {
    /// Registers a new account and returns a token for it.
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn signup(&self, request: &SignupRequest) -> Result<AuthResponse, AppError> {
        request.validate().map_err(|e| {
            warn!(error = %e, "Validation failed for signup request");
            AppError::from(e)
        })?;

        let email = normalize_email(&request.email);
        if self.db.find_user_by_email(&email).await?.is_some() {
            return Err(email_taken());
        }

        let password_hash = self.hash_password(&request.password).await?;
        let new_user = NewUser {
            id: new_id("usr"),
            name: request.name.trim().to_string(),
            email,
            password_hash,
        };

        let user = self.db.create_user(&new_user).await.map_err(|e| match e {
            AppError::Database(DatabaseError::Duplicate(_)) => email_taken(),
            other => other,
        })?;
        metrics::counter!("auth_signups_total").increment(1);
        info!(user_id = %user.id, "User created");

        self.auth_response("User created", &user)
    }

    /// Exchanges credentials for a token.
    ///
    /// An unknown email and a wrong password produce the same error.
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, AppError> {
        let email = normalize_email(&request.email);
        let Some(user) = self.db.find_user_by_email(&email).await? else {
            metrics::counter!("auth_login_failures_total").increment(1);
            return Err(AppError::invalid_credentials());
        };

        if !self
            .verify_password(&request.password, &user.password_hash)
            .await?
        {
            metrics::counter!("auth_login_failures_total").increment(1);
            return Err(AppError::invalid_credentials());
        }

        info!(user_id = %user.id, "Login successful");
        self.auth_response("Login successful", &user)
    }

    #[instrument(skip(self))]
    pub async fn list_users(&self) -> Result<Vec<PublicUser>, AppError> {
        let users = self.db.list_users().await?;
        Ok(users.iter().map(PublicUser::from).collect())
    }

    #[instrument(skip(self))]
    pub async fn get_user(&self, id: &str) -> Result<PublicUser, AppError> {
        self.db
            .find_user_by_id(id)
            .await?
            .map(|user| PublicUser::from(&user))
            .ok_or_else(|| AppError::not_found("User not found"))
    }

    /// Updates the caller's own account.
    #[instrument(skip(self, caller, request), fields(caller_id = %caller.id))]
    pub async fn update_user(
        &self,
        caller: &Caller,
        id: &str,
        request: &UpdateUserRequest,
    ) -> Result<PublicUser, AppError> {
        if caller.id != id {
            return Err(AppError::Authorization(
                "You can only update your own account".to_string(),
            ));
        }
        request.validate()?;

        let email = match &request.email {
            Some(raw) => {
                let email = normalize_email(raw);
                if let Some(existing) = self.db.find_user_by_email(&email).await? {
                    if existing.id != id {
                        return Err(email_taken());
                    }
                }
                Some(email)
            }
            None => None,
        };
        let password_hash = match &request.password {
            Some(password) => Some(self.hash_password(password).await?),
            None => None,
        };

        let changes = UserChanges {
            name: request.name.as_ref().map(|name| name.trim().to_string()),
            email,
            password_hash,
        };
        let user = self
            .db
            .update_user(id, &changes)
            .await
            .map_err(|e| match e {
                AppError::Database(DatabaseError::Duplicate(_)) => email_taken(),
                other => other,
            })?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        info!(user_id = %user.id, "User updated");
        Ok(PublicUser::from(&user))
    }

    fn auth_response(&self, message: &str, user: &User) -> Result<AuthResponse, AppError> {
        let token = self.auth.issue_token(&user.id, &user.email)?;
        Ok(AuthResponse {
            message: message.to_string(),
            token,
            user: PublicUser::from(user),
        })
    }

    async fn hash_password(&self, password: &str) -> Result<String, AppError> {
        let auth = self.auth.clone();
        let password = password.to_string();
        tokio::task::spawn_blocking(move || auth.hash_password(&password))
            .await
            .map_err(|e| AppError::Internal(format!("hashing task failed: {}", e)))?
    }

    async fn verify_password(&self, password: &str, hash: &str) -> Result<bool, AppError> {
        let auth = self.auth.clone();
        let password = password.to_string();
        let hash = hash.to_string();
        tokio::task::spawn_blocking(move || auth.verify_password(&password, &hash))
            .await
            .map_err(|e| AppError::Internal(format!("verification task failed: {}", e)))?
    }
}

fn email_taken() -> AppError {
    AppError::Database(DatabaseError::Duplicate(
        "Email already registered".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use crate::domain::{AppError, DatabaseError, LoginRequest, SignupRequest, UpdateUserRequest};
    use crate::test_utils::TestContext;

    #[tokio::test]
    async fn test_signup_returns_token_and_public_user() {
        let ctx = TestContext::new();
        let response = ctx
            .service
            .signup(&SignupRequest::new("Ada", "Ada@Example.com", "correct-horse"))
            .await
            .unwrap();

        assert_eq!(response.message, "User created");
        assert_eq!(response.user.email, "ada@example.com");
        let caller = ctx.auth.verify_token(&response.token).unwrap();
        assert_eq!(caller.id, response.user.id);
        assert!(response.user.id.starts_with("usr_"));
    }

    #[tokio::test]
    async fn test_signup_creates_profile() {
        let ctx = TestContext::new();
        let response = ctx
            .service
            .signup(&SignupRequest::new("Ada", "ada@example.com", "pw"))
            .await
            .unwrap();
        let profile = ctx.service.get_profile(&response.user.id).await.unwrap();
        assert_eq!(profile.preferred_currency, "USD");
        assert_eq!(profile.full_name.as_deref(), Some("Ada"));
    }

    #[tokio::test]
    async fn test_signup_duplicate_email_conflicts() {
        let ctx = TestContext::new();
        let request = SignupRequest::new("Ada", "ada@example.com", "pw");
        ctx.service.signup(&request).await.unwrap();

        let again = SignupRequest::new("Other", "ADA@example.com", "pw2");
        let result = ctx.service.signup(&again).await;
        assert!(matches!(
            result,
            Err(AppError::Database(DatabaseError::Duplicate(_)))
        ));
    }

    #[tokio::test]
    async fn test_signup_validation_failure() {
        let ctx = TestContext::new();
        let result = ctx
            .service
            .signup(&SignupRequest::new("Ada", "not-an-email", "pw"))
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
        assert_eq!(ctx.db.user_count(), 0);
    }

    #[tokio::test]
    async fn test_login_wrong_password_and_unknown_email_match() {
        let ctx = TestContext::new();
        ctx.service
            .signup(&SignupRequest::new("Ada", "ada@example.com", "pw"))
            .await
            .unwrap();

        let wrong_password = ctx
            .service
            .login(&LoginRequest::new("ada@example.com", "nope"))
            .await
            .unwrap_err();
        let unknown_email = ctx
            .service
            .login(&LoginRequest::new("bob@example.com", "pw"))
            .await
            .unwrap_err();

        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
        assert!(matches!(wrong_password, AppError::Authentication(_)));
    }

    #[tokio::test]
    async fn test_login_success() {
        let ctx = TestContext::new();
        ctx.service
            .signup(&SignupRequest::new("Ada", "ada@example.com", "pw"))
            .await
            .unwrap();

        let response = ctx
            .service
            .login(&LoginRequest::new(" ada@example.com", "pw"))
            .await
            .unwrap();
        assert_eq!(response.message, "Login successful");
        assert_eq!(response.user.name, "Ada");
    }

    #[tokio::test]
    async fn test_get_user_not_found() {
        let ctx = TestContext::new();
        let result = ctx.service.get_user("usr_missing").await;
        assert!(matches!(
            result,
            Err(AppError::Database(DatabaseError::NotFound(_)))
        ));
    }

    #[tokio::test]
    async fn test_update_user_only_self() {
        let ctx = TestContext::new();
        let ada = ctx.signup("ada@example.com").await;
        let bob = ctx.signup("bob@example.com").await;

        let request = UpdateUserRequest {
            name: Some("Mallory".to_string()),
            ..Default::default()
        };
        let result = ctx.service.update_user(&bob, &ada.id, &request).await;
        assert!(matches!(result, Err(AppError::Authorization(_))));

        let updated = ctx.service.update_user(&ada, &ada.id, &request).await.unwrap();
        assert_eq!(updated.name, "Mallory");
    }

    #[tokio::test]
    async fn test_update_user_email_taken() {
        let ctx = TestContext::new();
        let ada = ctx.signup("ada@example.com").await;
        ctx.signup("bob@example.com").await;

        let request = UpdateUserRequest {
            email: Some("bob@example.com".to_string()),
            ..Default::default()
        };
        let result = ctx.service.update_user(&ada, &ada.id, &request).await;
        assert!(matches!(
            result,
            Err(AppError::Database(DatabaseError::Duplicate(_)))
        ));
    }

    #[tokio::test]
    async fn test_update_user_password_allows_new_login() {
        let ctx = TestContext::new();
        let ada = ctx.signup("ada@example.com").await;

        let request = UpdateUserRequest {
            password: Some("new-password".to_string()),
            ..Default::default()
        };
        ctx.service.update_user(&ada, &ada.id, &request).await.unwrap();

        assert!(
            ctx.service
                .login(&LoginRequest::new("ada@example.com", "new-password"))
                .await
                .is_ok()
        );
        assert!(
            ctx.service
                .login(&LoginRequest::new("ada@example.com", "password"))
                .await
                .is_err()
        );
    }
}
