/// 사용자 등록 (비밀번호 등 인증 정보는 외부 인증 서비스 담당)
// region:    --- Imports
use crate::auction::model::{NewUser, User};
use crate::error::{AppError, AppResult};
use crate::store::EntityStore;
use serde::{Deserialize, Serialize};
use tracing::info;
// endregion: --- Imports

/// 회원가입 요청 본문
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RegisterForm {
    pub username: String,
    #[serde(default)]
    pub email: String,
}

/// 사용자 등록 (중복 사용자명은 DuplicateIdentity)
pub async fn register_user(store: &dyn EntityStore, form: RegisterForm) -> AppResult<User> {
    let username = form.username.trim().to_string();
    if username.is_empty() {
        return Err(AppError::invalid("username is required"));
    }

    let user = store
        .create_user(NewUser {
            username,
            email: form.email.trim().to_string(),
        })
        .await?;
    info!("{:<12} --> 사용자 등록 id: {}", "Command", user.id);
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{ListingFilter, MemoryEntityStore};

    #[tokio::test]
    async fn duplicate_username_leaves_no_state() {
        let store = MemoryEntityStore::new();
        let form = RegisterForm {
            username: "ann".to_string(),
            email: "ann@example.com".to_string(),
        };
        let first = register_user(&store, form.clone()).await.unwrap();

        let second = register_user(&store, form).await;
        assert!(matches!(second, Err(AppError::DuplicateIdentity(ref name)) if name == "ann"));
        assert_eq!(store.get_user(first.id).await.unwrap(), Some(first));
        assert!(store
            .filter_listings(ListingFilter::All)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn blank_username_is_rejected() {
        let store = MemoryEntityStore::new();
        let result = register_user(
            &store,
            RegisterForm {
                username: "   ".to_string(),
                email: String::new(),
            },
        )
        .await;
        assert!(matches!(result, Err(AppError::ValidationRejected { .. })));
    }
}
