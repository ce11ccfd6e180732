//! Signup and token issuance.
//!
//! Registration is email based. A signup stores the user and emails a
//! confirmation code; exchanging the code yields a JWT access token. The
//! code is a keyed HMAC over the user id and issue time, so nothing has to
//! be persisted server side.

use chrono::Utc;
use hmac::{Hmac, Mac};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use validator::{Validate, ValidationError};
use yamdb_common::{AppError, AppResult, AuthConfig, IdGenerator};
use yamdb_db::{entities::user, repositories::UserRepository};

use crate::services::mail::MailerService;

type HmacSha256 = Hmac<Sha256>;

/// Truncated signature length in hex characters.
const CODE_SIG_LEN: usize = 32;

/// Signup request.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SignupInput {
    /// Requested username.
    #[validate(
        length(min = 1, max = 150),
        custom(function = "validate_username_charset")
    )]
    pub username: String,
    /// Email address the confirmation code is sent to.
    #[validate(email, length(max = 254))]
    pub email: String,
}

/// Token exchange request.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ObtainTokenInput {
    /// Username chosen at signup.
    #[validate(length(min = 1, max = 150))]
    pub username: String,
    /// Confirmation code from the signup email.
    #[validate(length(min = 1))]
    pub confirmation_code: String,
}

/// JWT claims for access tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User ID.
    pub sub: String,
    /// Username at issue time.
    pub username: String,
    /// Expiry (unix seconds).
    pub exp: i64,
    /// Issued at (unix seconds).
    pub iat: i64,
}

pub(crate) fn validate_username_charset(username: &str) -> Result<(), ValidationError> {
    let ok = username
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '_' | '.' | '@' | '+' | '-'));
    if ok {
        Ok(())
    } else {
        Err(ValidationError::new("username_charset")
            .with_message("Username may contain letters, digits and @/./+/-/_ only".into()))
    }
}

/// Stateless confirmation codes and JWT access tokens.
#[derive(Clone)]
pub struct TokenService {
    config: AuthConfig,
}

impl TokenService {
    /// Create a token service from auth configuration.
    #[must_use]
    pub const fn new(config: AuthConfig) -> Self {
        Self { config }
    }

    fn sign_code(&self, user_id: &str, issued_at: i64) -> AppResult<String> {
        let mut mac = HmacSha256::new_from_slice(self.config.code_secret.as_bytes())
            .map_err(|e| AppError::Internal(e.to_string()))?;
        mac.update(format!("{user_id}:{issued_at}").as_bytes());
        let sig = hex::encode(mac.finalize().into_bytes());
        Ok(sig[..CODE_SIG_LEN].to_string())
    }

    /// Generate a confirmation code for a user.
    pub fn make_confirmation_code(&self, user_id: &str) -> AppResult<String> {
        let issued_at = Utc::now().timestamp();
        let sig = self.sign_code(user_id, issued_at)?;
        Ok(format!("{issued_at:x}-{sig}"))
    }

    /// Verify a confirmation code against a user.
    ///
    /// A code is valid when its signature matches and it has not outlived
    /// the configured TTL.
    pub fn verify_confirmation_code(&self, user_id: &str, code: &str) -> AppResult<bool> {
        let Some((ts_part, sig_part)) = code.split_once('-') else {
            return Ok(false);
        };
        let Ok(issued_at) = i64::from_str_radix(ts_part, 16) else {
            return Ok(false);
        };

        let now = Utc::now().timestamp();
        let ttl = i64::try_from(self.config.code_ttl_secs).unwrap_or(i64::MAX);
        if issued_at > now || now - issued_at > ttl {
            return Ok(false);
        }

        let expected = self.sign_code(user_id, issued_at)?;
        // Fixed-length comparison over hex strings
        let matches = expected.len() == sig_part.len()
            && expected
                .bytes()
                .zip(sig_part.bytes())
                .fold(0u8, |acc, (a, b)| acc | (a ^ b))
                == 0;
        Ok(matches)
    }

    /// Issue a JWT access token for a user.
    pub fn issue_access_token(&self, user: &user::Model) -> AppResult<String> {
        let now = Utc::now().timestamp();
        let ttl = i64::try_from(self.config.token_ttl_secs).unwrap_or(i64::MAX);
        let claims = Claims {
            sub: user.id.clone(),
            username: user.username.clone(),
            exp: now + ttl,
            iat: now,
        };

        jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(e.to_string()))
    }

    /// Decode and validate an access token.
    pub fn decode_access_token(&self, token: &str) -> AppResult<Claims> {
        jsonwebtoken::decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|_| AppError::Unauthorized)
    }
}

/// Signup and token exchange flows.
#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    tokens: TokenService,
    mailer: MailerService,
    id_gen: IdGenerator,
}

impl AuthService {
    /// Create a new auth service.
    #[must_use]
    pub fn new(user_repo: UserRepository, tokens: TokenService, mailer: MailerService) -> Self {
        Self {
            user_repo,
            tokens,
            mailer,
            id_gen: IdGenerator::new(),
        }
    }

    /// Register a user and email a confirmation code.
    ///
    /// Duplicate usernames and emails are rejected, including requests that
    /// match an existing (username, email) pair exactly.
    pub async fn signup(&self, input: SignupInput) -> AppResult<user::Model> {
        input.validate()?;

        if input.username == "me" {
            return Err(AppError::Validation(
                "Username 'me' is reserved".to_string(),
            ));
        }

        if self
            .user_repo
            .find_by_username(&input.username)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict("Username is already taken".to_string()));
        }
        if self.user_repo.find_by_email(&input.email).await?.is_some() {
            return Err(AppError::Conflict(
                "Email is already registered".to_string(),
            ));
        }

        let model = user::ActiveModel {
            id: Set(self.id_gen.generate()),
            username: Set(input.username.clone()),
            email: Set(input.email.clone()),
            ..Default::default()
        };
        let user = self.user_repo.create(model).await?;
        tracing::info!(username = %user.username, "Registered new user");

        let code = self.tokens.make_confirmation_code(&user.id)?;
        self.mailer
            .send_confirmation_code(&user.email, &user.username, &code)
            .await;

        Ok(user)
    }

    /// Exchange a confirmation code for a JWT access token.
    pub async fn obtain_token(&self, input: ObtainTokenInput) -> AppResult<String> {
        input.validate()?;

        let user = self.user_repo.get_by_username(&input.username).await?;

        if !self
            .tokens
            .verify_confirmation_code(&user.id, &input.confirmation_code)?
        {
            return Err(AppError::Validation(
                "Invalid or expired confirmation code".to_string(),
            ));
        }

        self.tokens.issue_access_token(&user)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::services::mail::NoOpMailer;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;
    use yamdb_db::entities::UserRole;

    fn auth_config() -> AuthConfig {
        AuthConfig {
            jwt_secret: "test-jwt-secret".to_string(),
            token_ttl_secs: 3600,
            code_secret: "test-code-secret".to_string(),
            code_ttl_secs: 3600,
        }
    }

    fn create_test_user(id: &str, username: &str, email: &str) -> user::Model {
        user::Model {
            id: id.to_string(),
            username: username.to_string(),
            email: email.to_string(),
            first_name: None,
            last_name: None,
            bio: None,
            role: UserRole::User,
            is_superuser: false,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn service_with(db: sea_orm::DatabaseConnection) -> AuthService {
        AuthService::new(
            UserRepository::new(Arc::new(db)),
            TokenService::new(auth_config()),
            MailerService::new(Arc::new(NoOpMailer)),
        )
    }

    #[test]
    fn test_confirmation_code_roundtrip() {
        let tokens = TokenService::new(auth_config());
        let code = tokens.make_confirmation_code("u1").unwrap();
        assert!(tokens.verify_confirmation_code("u1", &code).unwrap());
    }

    #[test]
    fn test_confirmation_code_wrong_user() {
        let tokens = TokenService::new(auth_config());
        let code = tokens.make_confirmation_code("u1").unwrap();
        assert!(!tokens.verify_confirmation_code("u2", &code).unwrap());
    }

    #[test]
    fn test_confirmation_code_expired() {
        let mut config = auth_config();
        config.code_ttl_secs = 0;
        let tokens = TokenService::new(config);
        let issued_at = Utc::now().timestamp() - 10;
        let sig = tokens.sign_code("u1", issued_at).unwrap();
        let code = format!("{issued_at:x}-{sig}");
        assert!(!tokens.verify_confirmation_code("u1", &code).unwrap());
    }

    #[test]
    fn test_confirmation_code_malformed() {
        let tokens = TokenService::new(auth_config());
        assert!(!tokens.verify_confirmation_code("u1", "garbage").unwrap());
        assert!(!tokens.verify_confirmation_code("u1", "nothex-abc").unwrap());
    }

    #[test]
    fn test_access_token_roundtrip() {
        let tokens = TokenService::new(auth_config());
        let user = create_test_user("u1", "alice", "alice@example.com");
        let token = tokens.issue_access_token(&user).unwrap();
        let claims = tokens.decode_access_token(&token).unwrap();
        assert_eq!(claims.sub, "u1");
        assert_eq!(claims.username, "alice");
    }

    #[test]
    fn test_access_token_bad_signature() {
        let tokens = TokenService::new(auth_config());
        let other = TokenService::new(AuthConfig {
            jwt_secret: "other-secret".to_string(),
            ..auth_config()
        });
        let user = create_test_user("u1", "alice", "alice@example.com");
        let token = other.issue_access_token(&user).unwrap();
        assert!(matches!(
            tokens.decode_access_token(&token),
            Err(AppError::Unauthorized)
        ));
    }

    #[tokio::test]
    async fn test_signup_reserved_username() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let service = service_with(db);

        let result = service
            .signup(SignupInput {
                username: "me".to_string(),
                email: "me@example.com".to_string(),
            })
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_signup_invalid_username_charset() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let service = service_with(db);

        let result = service
            .signup(SignupInput {
                username: "no spaces".to_string(),
                email: "x@example.com".to_string(),
            })
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_signup_username_taken() {
        let existing = create_test_user("u1", "alice", "alice@example.com");
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![existing]]) // by username
            .into_connection();
        let service = service_with(db);

        let result = service
            .signup(SignupInput {
                username: "alice".to_string(),
                email: "other@example.com".to_string(),
            })
            .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_signup_email_taken() {
        let existing = create_test_user("u1", "alice", "alice@example.com");
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([
                Vec::<user::Model>::new(),     // by username
                vec![existing],                // by email
            ])
            .into_connection();
        let service = service_with(db);

        let result = service
            .signup(SignupInput {
                username: "bob".to_string(),
                email: "alice@example.com".to_string(),
            })
            .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_signup_exact_duplicate_pair_rejected() {
        let existing = create_test_user("u1", "alice", "alice@example.com");
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![existing]]) // by username
            .into_connection();
        let service = service_with(db);

        let result = service
            .signup(SignupInput {
                username: "alice".to_string(),
                email: "alice@example.com".to_string(),
            })
            .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_obtain_token_unknown_user() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<user::Model>::new()])
            .into_connection();
        let service = service_with(db);

        let result = service
            .obtain_token(ObtainTokenInput {
                username: "ghost".to_string(),
                confirmation_code: "whatever".to_string(),
            })
            .await;

        assert!(matches!(result, Err(AppError::UserNotFound(_))));
    }

    #[tokio::test]
    async fn test_obtain_token_bad_code() {
        let existing = create_test_user("u1", "alice", "alice@example.com");
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![existing]])
            .into_connection();
        let service = service_with(db);

        let result = service
            .obtain_token(ObtainTokenInput {
                username: "alice".to_string(),
                confirmation_code: "deadbeef-0000".to_string(),
            })
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_obtain_token_valid_code() {
        let existing = create_test_user("u1", "alice", "alice@example.com");
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![existing]])
            .into_connection();
        let service = service_with(db);

        let code = service.tokens.make_confirmation_code("u1").unwrap();
        let result = service
            .obtain_token(ObtainTokenInput {
                username: "alice".to_string(),
                confirmation_code: code,
            })
            .await;

        assert!(result.is_ok());
        let claims = service.tokens.decode_access_token(&result.unwrap()).unwrap();
        assert_eq!(claims.sub, "u1");
    }
}
