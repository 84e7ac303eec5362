//! Account service unit tests with a mocked user repository.

use std::sync::Arc;

use async_trait::async_trait;
use mockall::predicate::eq;

use dcim_api::domain::{NewAccount, Password, User, UserRole};
use dcim_api::errors::{AppError, AppResult};
use dcim_api::infra::{
    CabinetRepository, DeviceRepository, MockCabinetRepository, MockDeviceRepository,
    MockReferenceRepository, MockRequestRepository, MockUserRepository, ReferenceRepository,
    RequestRepository, TransactionContext, TxFuture, UnitOfWork, UserRepository,
};
use dcim_api::services::{AccountManager, AccountService};

fn create_test_user(user_id: &str, password: &str) -> User {
    User {
        user_id: user_id.to_string(),
        password_hash: Password::new(password).unwrap().into_string(),
        role: "User".to_string(),
        email: Some(format!("{}@example.com", user_id)),
        email_credential: None,
        session_token: None,
    }
}

/// Test mock for UnitOfWork that wraps a MockUserRepository
struct TestUnitOfWork {
    user_repo: Arc<MockUserRepository>,
}

impl TestUnitOfWork {
    fn new(user_repo: MockUserRepository) -> Self {
        Self {
            user_repo: Arc::new(user_repo),
        }
    }
}

#[async_trait]
impl UnitOfWork for TestUnitOfWork {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.user_repo.clone()
    }

    fn cabinets(&self) -> Arc<dyn CabinetRepository> {
        Arc::new(MockCabinetRepository::new())
    }

    fn devices(&self) -> Arc<dyn DeviceRepository> {
        Arc::new(MockDeviceRepository::new())
    }

    fn references(&self) -> Arc<dyn ReferenceRepository> {
        Arc::new(MockReferenceRepository::new())
    }

    fn requests(&self) -> Arc<dyn RequestRepository> {
        Arc::new(MockRequestRepository::new())
    }

    async fn transaction<F, T>(&self, _f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send,
    {
        // Account operations are single statements
        Err(AppError::internal("Transactions not supported in test mock"))
    }
}

fn service(repo: MockUserRepository) -> AccountManager<TestUnitOfWork> {
    AccountManager::new(Arc::new(TestUnitOfWork::new(repo)))
}

#[tokio::test]
async fn test_get_account_success() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_id()
        .with(eq("jdoe"))
        .returning(|id| Ok(Some(create_test_user(id, "secret-password"))));

    let result = service(repo).get("jdoe").await;

    let view = result.unwrap();
    assert_eq!(view.user_id, "jdoe");
    assert_eq!(view.email.as_deref(), Some("jdoe@example.com"));
    assert!(!view.has_email_credential);
}

#[tokio::test]
async fn test_get_account_not_found() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_id().returning(|_| Ok(None));

    let result = service(repo).get("ghost").await;

    assert!(matches!(result.unwrap_err(), AppError::NotFound(_)));
}

#[tokio::test]
async fn test_create_hashes_password_and_defaults_role() {
    let mut repo = MockUserRepository::new();
    repo.expect_create()
        .withf(|user_id, hash, role, email| {
            user_id == "jdoe"
                && hash != "secret-password"
                && Password::from_hash(hash.clone()).verify("secret-password")
                && role == "User"
                && email.is_none()
        })
        .times(1)
        .returning(|user_id, password_hash, role, email| {
            Ok(User {
                user_id,
                password_hash,
                role,
                email,
                email_credential: None,
                session_token: None,
            })
        });

    let account = NewAccount {
        user_id: " jdoe ".to_string(),
        password: "secret-password".to_string(),
        role: None,
        email: Some("  ".to_string()),
    };
    let view = service(repo).create(account).await.unwrap();

    assert_eq!(view.user_id, "jdoe");
    assert_eq!(view.role, "User");
}

#[tokio::test]
async fn test_create_rejects_unknown_role() {
    let repo = MockUserRepository::new();

    let account = NewAccount {
        user_id: "jdoe".to_string(),
        password: "secret-password".to_string(),
        role: Some("Root".to_string()),
        email: None,
    };
    let result = service(repo).create(account).await;

    assert!(matches!(result.unwrap_err(), AppError::Validation(_)));
}

#[tokio::test]
async fn test_create_passes_conflict_through() {
    let mut repo = MockUserRepository::new();
    repo.expect_create()
        .returning(|user_id, _, _, _| Err(AppError::conflict(format!("User '{}'", user_id))));

    let account = NewAccount {
        user_id: "jdoe".to_string(),
        password: "secret-password".to_string(),
        role: Some("Admin".to_string()),
        email: None,
    };
    let result = service(repo).create(account).await;

    assert!(matches!(result.unwrap_err(), AppError::Conflict(_)));
}

#[tokio::test]
async fn test_change_password_requires_current_password() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_id()
        .returning(|id| Ok(Some(create_test_user(id, "old-password"))));
    repo.expect_set_password_hash().times(0);

    let result = service(repo)
        .change_password("jdoe", "wrong-password", "new-password-123")
        .await;

    assert!(matches!(result.unwrap_err(), AppError::InvalidCredentials));
}

#[tokio::test]
async fn test_change_password_stores_new_hash() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_id()
        .returning(|id| Ok(Some(create_test_user(id, "old-password"))));
    repo.expect_set_password_hash()
        .withf(|user_id, hash| {
            user_id == "jdoe" && Password::from_hash(hash.clone()).verify("new-password-123")
        })
        .times(1)
        .returning(|_, _| Ok(()));

    let result = service(repo)
        .change_password("jdoe", "old-password", "new-password-123")
        .await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn test_blank_email_clears_it() {
    let mut repo = MockUserRepository::new();
    repo.expect_set_email()
        .withf(|user_id, email| user_id == "jdoe" && email.is_none())
        .times(1)
        .returning(|_, _| Ok(()));
    repo.expect_find_by_id().returning(|id| {
        let mut user = create_test_user(id, "secret-password");
        user.email = None;
        Ok(Some(user))
    });

    let view = service(repo)
        .set_email("jdoe", Some("   ".to_string()))
        .await
        .unwrap();

    assert!(view.email.is_none());
}

#[tokio::test]
async fn test_set_role_stores_role_name() {
    let mut repo = MockUserRepository::new();
    repo.expect_set_role()
        .withf(|user_id, role| user_id == "jdoe" && role == "Super-Admin")
        .times(1)
        .returning(|_, _| Ok(()));
    repo.expect_find_by_id().returning(|id| {
        let mut user = create_test_user(id, "secret-password");
        user.role = "Super-Admin".to_string();
        Ok(Some(user))
    });

    let view = service(repo)
        .set_role("jdoe", UserRole::SuperAdmin)
        .await
        .unwrap();

    assert_eq!(view.role, "Super-Admin");
}

#[tokio::test]
async fn test_rename_returns_account_under_new_id() {
    let mut repo = MockUserRepository::new();
    repo.expect_rename()
        .withf(|user_id, new_user_id| user_id == "jdoe" && new_user_id == "jdoe2")
        .times(1)
        .returning(|_, _| Ok(()));
    repo.expect_find_by_id()
        .with(eq("jdoe2"))
        .returning(|id| Ok(Some(create_test_user(id, "secret-password"))));

    let view = service(repo).rename("jdoe", " jdoe2 ").await.unwrap();

    assert_eq!(view.user_id, "jdoe2");
}

#[tokio::test]
async fn test_rename_to_taken_id_is_conflict() {
    let mut repo = MockUserRepository::new();
    repo.expect_rename()
        .returning(|_, new_user_id| Err(AppError::conflict(format!("User '{}'", new_user_id))));
    repo.expect_find_by_id().times(0);

    let result = service(repo).rename("jdoe", "admin").await;

    assert!(matches!(result.unwrap_err(), AppError::Conflict(_)));
}

#[tokio::test]
async fn test_rename_missing_account_is_not_found() {
    let mut repo = MockUserRepository::new();
    repo.expect_rename()
        .returning(|user_id, _| Err(AppError::not_found(format!("User '{}'", user_id))));

    let result = service(repo).rename("ghost", "ghost2").await;

    assert!(matches!(result.unwrap_err(), AppError::NotFound(_)));
}

#[tokio::test]
async fn test_rename_rejects_blank_id() {
    let mut repo = MockUserRepository::new();
    repo.expect_rename().times(0);

    let result = service(repo).rename("jdoe", "   ").await;

    assert!(matches!(result.unwrap_err(), AppError::Validation(_)));
}
