//! Profile service - display names and portraits.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::PORTRAIT_DIR;
use crate::domain::Account;
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::{MediaStorage, UnitOfWork, Upload};

/// Profile edit submitted by the owner
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub first_name: String,
    pub last_name: String,
    /// File name of an already uploaded portrait under `portraits/`
    pub portrait: Option<String>,
}

#[async_trait]
pub trait ProfileService: Send + Sync {
    async fn update_profile(&self, account_id: Uuid, update: ProfileUpdate) -> AppResult<Account>;

    /// Store a new portrait and return its path relative to the media root
    async fn upload_portrait(&self, account_id: Uuid, upload: Upload) -> AppResult<String>;
}

pub struct ProfileManager<U: UnitOfWork> {
    uow: Arc<U>,
    media: MediaStorage,
}

impl<U: UnitOfWork> ProfileManager<U> {
    pub fn new(uow: Arc<U>, media: MediaStorage) -> Self {
        Self { uow, media }
    }
}

#[async_trait]
impl<U: UnitOfWork> ProfileService for ProfileManager<U> {
    async fn update_profile(&self, account_id: Uuid, update: ProfileUpdate) -> AppResult<Account> {
        let portrait = match update.portrait.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => {
                let relative = format!("{}/{}", PORTRAIT_DIR, name);
                if self.media.exists(&relative).await {
                    Some(relative)
                } else {
                    tracing::debug!(account_id = %account_id, portrait = %relative, "Portrait file not found, ignored");
                    None
                }
            }
            _ => None,
        };

        self.uow
            .accounts()
            .update_profile(account_id, update.first_name, update.last_name, portrait)
            .await
    }

    async fn upload_portrait(&self, account_id: Uuid, upload: Upload) -> AppResult<String> {
        if upload.bytes.is_empty() {
            return Err(AppError::invalid_input("Portrait file is empty"));
        }

        let account = self
            .uow
            .accounts()
            .find_by_id(account_id)
            .await?
            .ok_or_account_not_found()?;

        let path = self
            .media
            .save_portrait(account_id, &upload.file_name, &upload.bytes)
            .await?;

        self.uow
            .accounts()
            .update_profile(account_id, account.first_name, account.last_name, Some(path.clone()))
            .await?;

        // Old file goes only once the account points at the new one
        if account.portrait != path {
            if let Err(e) = self.media.remove(&account.portrait).await {
                tracing::warn!(account_id = %account_id, "Could not remove old portrait: {}", e);
            }
        }

        tracing::info!(account_id = %account_id, portrait = %path, "Portrait updated");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AccountRole;
    use crate::infra::repositories::MockAccountRepository;
    use crate::infra::unit_of_work::testing::MockedUnitOfWork;

    fn account_with_portrait(id: Uuid, portrait: &str) -> Account {
        let now = chrono::Utc::now();
        Account {
            id,
            username: "alice".to_string(),
            email: "alice@x.com".to_string(),
            password_hash: String::new(),
            role: AccountRole::Consumer,
            first_name: "Alice".to_string(),
            last_name: String::new(),
            portrait: portrait.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    fn upload(file_name: &str) -> Upload {
        Upload {
            file_name: file_name.to_string(),
            bytes: b"IMG".to_vec(),
        }
    }

    #[tokio::test]
    async fn test_old_portrait_survives_failed_update() {
        let media_dir = tempfile::tempdir().unwrap();
        let media = MediaStorage::new(media_dir.path());
        let id = Uuid::new_v4();
        let old = media.save_portrait(id, "old.jpg", b"OLD").await.unwrap();

        let stored = account_with_portrait(id, &old);
        let mut accounts = MockAccountRepository::new();
        accounts
            .expect_find_by_id()
            .returning(move |_| Ok(Some(stored.clone())));
        accounts
            .expect_update_profile()
            .times(1)
            .returning(|_, _, _, _| Err(AppError::internal("write failed")));

        let profiles = ProfileManager::new(MockedUnitOfWork::with_accounts(accounts), media.clone());
        assert!(profiles.upload_portrait(id, upload("new.png")).await.is_err());

        assert!(media.exists(&old).await);
    }

    #[tokio::test]
    async fn test_new_portrait_replaces_old_file() {
        let media_dir = tempfile::tempdir().unwrap();
        let media = MediaStorage::new(media_dir.path());
        let id = Uuid::new_v4();
        let old = media.save_portrait(id, "old.jpg", b"OLD").await.unwrap();

        let stored = account_with_portrait(id, &old);
        let mut accounts = MockAccountRepository::new();
        accounts
            .expect_find_by_id()
            .returning(move |_| Ok(Some(stored.clone())));
        accounts
            .expect_update_profile()
            .withf(|_, first, _, portrait| first == "Alice" && portrait.as_deref().is_some())
            .times(1)
            .returning(move |_, _, _, portrait| {
                Ok(account_with_portrait(id, &portrait.unwrap_or_default()))
            });

        let profiles = ProfileManager::new(MockedUnitOfWork::with_accounts(accounts), media.clone());
        let path = profiles.upload_portrait(id, upload("new.png")).await.unwrap();

        assert_eq!(path, format!("portraits/{}.png", id));
        assert!(media.exists(&path).await);
        assert!(!media.exists(&old).await);
    }

    #[tokio::test]
    async fn test_reupload_with_same_extension_keeps_file() {
        let media_dir = tempfile::tempdir().unwrap();
        let media = MediaStorage::new(media_dir.path());
        let id = Uuid::new_v4();
        let current = media.save_portrait(id, "me.png", b"OLD").await.unwrap();

        let stored = account_with_portrait(id, &current);
        let mut accounts = MockAccountRepository::new();
        accounts
            .expect_find_by_id()
            .returning(move |_| Ok(Some(stored.clone())));
        accounts
            .expect_update_profile()
            .returning(move |_, _, _, portrait| {
                Ok(account_with_portrait(id, &portrait.unwrap_or_default()))
            });

        let profiles = ProfileManager::new(MockedUnitOfWork::with_accounts(accounts), media.clone());
        let path = profiles.upload_portrait(id, upload("again.PNG")).await.unwrap();

        assert_eq!(path, current);
        let written = tokio::fs::read(media_dir.path().join(&path)).await.unwrap();
        assert_eq!(written, b"IMG");
    }
}
