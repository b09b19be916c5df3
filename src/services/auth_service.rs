//! Authentication service - signup, login and password lifecycle.
//!
//! Issues session tokens through the [`TokenCodec`]. Establishing a
//! browser session is left to the HTTP layer.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;
use validator::ValidateEmail;

use super::token::{SessionClaims, TokenCodec};
use crate::config::{BUSINESS_PLACEHOLDER_NAME, PASSWORD_RESET_SUBJECT};
use crate::domain::{Account, AccountRole, AddressFields, NewAccount, NewBusiness, Password, PublicProfile};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::{MailMessage, Mailer, MediaStorage, UnitOfWork, Upload};

/// Signup request data
#[derive(Debug, Clone, Default)]
pub struct SignupInput {
    pub username: String,
    pub email: String,
    pub password: String,
    /// `consumer` or `business`; absent means consumer
    pub role: Option<String>,
}

/// Business registration form (account + address + business in one go)
#[derive(Debug, Clone, Default)]
pub struct BusinessRegistration {
    pub username: String,
    pub email: String,
    pub password: String,
    pub name: String,
    pub description: String,
    pub address: AddressFields,
    /// Raw coordinates as submitted; must parse as numbers
    pub lat: Option<String>,
    pub lng: Option<String>,
    pub image: Option<Upload>,
}

/// Result of a successful authentication
#[derive(Debug, Clone)]
pub struct AuthOutcome {
    pub token: String,
    pub claims: SessionClaims,
    pub profile: PublicProfile,
}

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Create a new account and sign it in
    async fn signup(&self, input: SignupInput) -> AppResult<AuthOutcome>;

    /// Verify credentials; `identifier` is a username or an email
    async fn login(&self, identifier: &str, password: &str) -> AppResult<AuthOutcome>;

    /// Create a business-role account together with its business
    async fn register_business(&self, form: BusinessRegistration) -> AppResult<AuthOutcome>;

    /// Replace the password of the account with this exact email by a
    /// random temporary one and mail it out
    async fn request_password_reset(&self, email: &str) -> AppResult<()>;

    async fn change_password(
        &self,
        account_id: Uuid,
        old_password: &str,
        new_password: &str,
    ) -> AppResult<()>;

    /// Decode a session token
    fn verify_token(&self, token: &str) -> AppResult<SessionClaims>;

    /// Issue a fresh token for an account (after profile changes)
    async fn issue(&self, account: &Account) -> AppResult<AuthOutcome>;
}

/// Concrete implementation of AuthService using Unit of Work.
pub struct Authenticator<U: UnitOfWork> {
    uow: Arc<U>,
    codec: TokenCodec,
    mailer: Arc<dyn Mailer>,
    media: MediaStorage,
}

impl<U: UnitOfWork> Authenticator<U> {
    pub fn new(uow: Arc<U>, codec: TokenCodec, mailer: Arc<dyn Mailer>, media: MediaStorage) -> Self {
        Self {
            uow,
            codec,
            mailer,
            media,
        }
    }

    /// Business owned by a business-role account. A business account
    /// without one is a data fault, never a token with no business id.
    async fn business_link(&self, account: &Account) -> AppResult<Option<Uuid>> {
        if !account.is_business() {
            return Ok(None);
        }

        match self.uow.businesses().find_by_admin(account.id).await? {
            Some(business) => Ok(Some(business.id)),
            None => {
                tracing::error!(
                    account_id = %account.id,
                    username = %account.username,
                    "Business account has no linked business"
                );
                Err(AppError::BusinessLinkMissing(account.id))
            }
        }
    }

    fn outcome(&self, account: &Account, business_id: Option<Uuid>) -> AppResult<AuthOutcome> {
        let claims = SessionClaims::for_account(account, business_id);
        let token = self.codec.encode(&claims)?;

        Ok(AuthOutcome {
            token,
            claims,
            profile: account.profile(business_id),
        })
    }

    async fn store_business_image(&self, business_id: Uuid, image: Upload) {
        let stored = match self
            .media
            .save_business_image(business_id, &image.file_name, &image.bytes)
            .await
        {
            Ok(path) => self.uow.businesses().set_image(business_id, path).await,
            Err(e) => Err(e),
        };

        if let Err(e) = stored {
            tracing::error!(business_id = %business_id, "Failed to store business image: {}", e);
        }
    }
}

#[async_trait]
impl<U: UnitOfWork> AuthService for Authenticator<U> {
    async fn signup(&self, input: SignupInput) -> AppResult<AuthOutcome> {
        let username = input.username.trim();
        let email = input.email.trim();

        if username.is_empty() || email.is_empty() {
            return Err(AppError::invalid_input("Username and email are required"));
        }
        if !email.validate_email() {
            return Err(AppError::InvalidEmail);
        }
        let role = AccountRole::parse(input.role.as_deref())?;
        let password = Password::new(&input.password)?;

        let accounts = self.uow.accounts();
        if accounts.find_by_identifier(username).await?.is_some()
            || accounts.find_by_identifier(email).await?.is_some()
        {
            return Err(AppError::DuplicateAccount);
        }

        // The unique indexes settle concurrent signups with the same names
        let account = accounts
            .create(NewAccount {
                username: username.to_string(),
                email: email.to_string(),
                password_hash: password.into_string(),
                role,
                first_name: String::new(),
                last_name: String::new(),
            })
            .await?;

        tracing::info!(account_id = %account.id, role = %account.role, "Account created");
        self.outcome(&account, None)
    }

    async fn login(&self, identifier: &str, password: &str) -> AppResult<AuthOutcome> {
        let Some(account) = self.uow.accounts().find_by_identifier(identifier.trim()).await? else {
            // Keep timing close to the known-account path
            Password::dummy().verify(password);
            return Err(AppError::AccountNotFound);
        };

        if !Password::from_hash(account.password_hash.as_str()).verify(password) {
            tracing::debug!(account_id = %account.id, "Login rejected: wrong password");
            return Err(AppError::InvalidCredentials);
        }

        let business_id = self.business_link(&account).await?;

        tracing::info!(account_id = %account.id, "Login succeeded");
        self.outcome(&account, business_id)
    }

    async fn register_business(&self, form: BusinessRegistration) -> AppResult<AuthOutcome> {
        let username = form.username.trim().to_string();
        let email = form.email.trim().to_string();
        let name = form.name.trim().to_string();

        if username.is_empty() || email.is_empty() || name.is_empty() {
            return Err(AppError::invalid_input("Username, email and name are required"));
        }
        if !email.validate_email() {
            return Err(AppError::InvalidEmail);
        }
        let lat = parse_coordinate("lat", form.lat.as_deref())?;
        let lng = parse_coordinate("lng", form.lng.as_deref())?;
        let password = Password::new(&form.password)?;

        if self
            .uow
            .accounts()
            .find_by_email_ignore_case(&email)
            .await?
            .is_some()
        {
            return Err(AppError::AccountExists);
        }

        let new_account = NewAccount {
            username,
            email,
            password_hash: password.into_string(),
            role: AccountRole::Business,
            first_name: BUSINESS_PLACEHOLDER_NAME.to_string(),
            last_name: BUSINESS_PLACEHOLDER_NAME.to_string(),
        };
        let mut address = form.address;
        address.lat = address.lat.or(Some(lat));
        address.lng = address.lng.or(Some(lng));
        let description = form.description;

        let (account, business) = self
            .uow
            .transaction(move |tx| {
                Box::pin(async move {
                    let account = tx.create_account(new_account).await?;
                    let address = tx.create_address(address).await?;
                    let business = tx
                        .create_business(NewBusiness {
                            name,
                            description,
                            lat,
                            lng,
                            admin_id: account.id,
                            address_id: Some(address.id),
                        })
                        .await?;
                    Ok::<_, AppError>((account, business))
                })
            })
            .await?;

        tracing::info!(
            account_id = %account.id,
            business_id = %business.id,
            "Business registered"
        );

        if let Some(image) = form.image {
            self.store_business_image(business.id, image).await;
        }

        self.outcome(&account, Some(business.id))
    }

    async fn request_password_reset(&self, email: &str) -> AppResult<()> {
        if email.trim().is_empty() {
            return Err(AppError::InvalidEmail);
        }

        let account = self
            .uow
            .accounts()
            .find_by_email(email)
            .await?
            .ok_or_account_not_found()?;

        let temporary = Password::generate_temporary();
        let hash = Password::new(&temporary)?.into_string();
        self.uow.accounts().update_password(account.id, hash).await?;

        let body = format!(
            "A temporary password has been sent to your email address. \
             You will then be able to log in and change your password.\n\
             Your new password: {}",
            temporary
        );
        let message = MailMessage::new(account.email.clone(), PASSWORD_RESET_SUBJECT, body);

        // Delivery runs detached; the reset already took effect
        let mailer = self.mailer.clone();
        let account_id = account.id;
        tokio::spawn(async move {
            if let Err(e) = mailer.send(message).await {
                tracing::error!(account_id = %account_id, "Failed to send temporary password: {}", e);
            }
        });

        tracing::info!(account_id = %account.id, "Password reset");
        Ok(())
    }

    async fn change_password(
        &self,
        account_id: Uuid,
        old_password: &str,
        new_password: &str,
    ) -> AppResult<()> {
        let account = self
            .uow
            .accounts()
            .find_by_id(account_id)
            .await?
            .ok_or_account_not_found()?;

        if !Password::from_hash(account.password_hash.as_str()).verify(old_password) {
            return Err(AppError::InvalidCredentials);
        }

        let hash = Password::new(new_password)?.into_string();
        self.uow.accounts().update_password(account.id, hash).await?;

        tracing::info!(account_id = %account.id, "Password changed");
        Ok(())
    }

    fn verify_token(&self, token: &str) -> AppResult<SessionClaims> {
        self.codec.decode(token)
    }

    async fn issue(&self, account: &Account) -> AppResult<AuthOutcome> {
        let business_id = self.business_link(account).await?;
        self.outcome(account, business_id)
    }
}

fn parse_coordinate(field: &str, value: Option<&str>) -> AppResult<f64> {
    value
        .map(str::trim)
        .and_then(|v| v.parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .ok_or_else(|| AppError::invalid_input(format!("'{}' must be a number", field)))
}
