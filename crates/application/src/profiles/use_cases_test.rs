use super::*;
use chrono::NaiveDate;
use terra_core::entities::sea_orm_active_enums::IdType;

fn registration(username: &str, phone: &str, id_number: &str) -> RegisterUserRequest {
    RegisterUserRequest {
        username: username.to_string(),
        password: "correct-horse-battery".to_string(),
        email: Some(format!("{}@example.com", username)),
        first_name: Some("Ada".to_string()),
        last_name: None,
        date_of_birth: NaiveDate::from_ymd_opt(1990, 5, 17),
        nationality: "Nigerian".to_string(),
        residential_address: "4 Awolowo Road, Ikoyi".to_string(),
        phone_number: phone.to_string(),
        tax_identification_number: None,
        id_type: IdType::NationalId,
        id_number: id_number.to_string(),
        id_issuing_authority: "NIMC".to_string(),
        id_issue_date: NaiveDate::from_ymd_opt(2020, 1, 2).unwrap(),
        id_expiry_date: None,
        biometric_hash: None,
        blockchain_wallet_address: None,
    }
}

fn setup() -> (Repositories, LocalFileStorage, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let storage = LocalFileStorage::new(dir.path());
    (Repositories::in_memory(), storage, dir)
}

#[tokio::test]
async fn test_register_creates_identity_and_profile() {
    let (repos, storage, _dir) = setup();
    let scans = ScannedIds {
        front: Some(FileUpload::new("front.png", b"front".to_vec())),
        back: None,
    };

    let resp = RegisterUserUseCase::execute(
        &repos,
        &storage,
        registration("ada", "+2348011111111", "NIN-1"),
        scans,
    )
    .await
    .unwrap();

    let details = resp.user_details.unwrap();
    assert_eq!(details.username, "ada");
    assert_eq!(resp.user, details.id);
    let front = resp.scanned_id_front.unwrap();
    assert!(front.starts_with(SCANNED_ID_FRONT_DIR));
    assert!(storage.resolve(&front).unwrap().exists());

    let user = repos.users.find_by_username("ada").await.unwrap().unwrap();
    assert!(crate::auth::use_cases::verify_password(
        "correct-horse-battery",
        &user.password_hash
    ));
}

#[tokio::test]
async fn test_register_rejects_invalid_phone() {
    let (repos, storage, _dir) = setup();
    let err = RegisterUserUseCase::execute(
        &repos,
        &storage,
        registration("ada", "08011111111", "NIN-1"),
        ScannedIds::default(),
    )
    .await
    .unwrap_err();

    match err {
        AppError::InvalidField(fields) => assert!(fields.contains_key("phone_number")),
        other => panic!("unexpected {:?}", other),
    }
}

#[tokio::test]
async fn test_register_issuing_authority_fits_column() {
    let (repos, storage, _dir) = setup();
    let mut req = registration("ada", "+2348011111111", "NIN-1");
    req.id_issuing_authority = "N".repeat(201);
    let err = RegisterUserUseCase::execute(&repos, &storage, req, ScannedIds::default())
        .await
        .unwrap_err();
    match err {
        AppError::InvalidField(fields) => assert!(fields.contains_key("id_issuing_authority")),
        other => panic!("unexpected {:?}", other),
    }

    let mut req = registration("ada", "+2348011111111", "NIN-1");
    req.id_issuing_authority = "N".repeat(200);
    RegisterUserUseCase::execute(&repos, &storage, req, ScannedIds::default())
        .await
        .unwrap();
}

#[tokio::test]
async fn test_register_duplicate_fields() {
    let (repos, storage, _dir) = setup();
    RegisterUserUseCase::execute(
        &repos,
        &storage,
        registration("ada", "+2348011111111", "NIN-1"),
        ScannedIds::default(),
    )
    .await
    .unwrap();

    let err = RegisterUserUseCase::execute(
        &repos,
        &storage,
        registration("ada", "+2348022222222", "NIN-2"),
        ScannedIds::default(),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::InvalidField(ref f) if f.contains_key("username")));

    let err = RegisterUserUseCase::execute(
        &repos,
        &storage,
        registration("grace", "+2348011111111", "NIN-2"),
        ScannedIds::default(),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::InvalidField(ref f) if f.contains_key("phone_number")));
    // The identity insert was rolled back with the profile.
    assert!(repos.users.find_by_username("grace").await.unwrap().is_none());
}

#[tokio::test]
async fn test_update_profile_permissions_and_user_change() {
    let (repos, storage, _dir) = setup();
    let ada = RegisterUserUseCase::execute(
        &repos,
        &storage,
        registration("ada", "+2348011111111", "NIN-1"),
        ScannedIds::default(),
    )
    .await
    .unwrap();
    let grace = RegisterUserUseCase::execute(
        &repos,
        &storage,
        registration("grace", "+2348022222222", "NIN-2"),
        ScannedIds::default(),
    )
    .await
    .unwrap();

    let req = || UpdateProfileRequest {
        nationality: Some("Ghanaian".to_string()),
        ..Default::default()
    };

    let stranger = Actor::new(grace.user, false);
    let err = UpdateProfileUseCase::execute(&repos, &storage, &stranger, ada.user, req(), ScannedIds::default())
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 403);

    let owner = Actor::new(ada.user, false);
    let updated = UpdateProfileUseCase::execute(&repos, &storage, &owner, ada.user, req(), ScannedIds::default())
        .await
        .unwrap();
    assert_eq!(updated.nationality, "Ghanaian");
    assert_eq!(updated.phone_number, "+2348011111111");

    let hijack = UpdateProfileRequest {
        user: Some(grace.user),
        ..Default::default()
    };
    let err = UpdateProfileUseCase::execute(&repos, &storage, &owner, ada.user, hijack, ScannedIds::default())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidField(ref f) if f.contains_key("user")));

    let staff = Actor::new(Uuid::new_v4(), true);
    let clash = UpdateProfileRequest {
        phone_number: Some("+2348022222222".to_string()),
        ..Default::default()
    };
    let err = UpdateProfileUseCase::execute(&repos, &storage, &staff, ada.user, clash, ScannedIds::default())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidField(ref f) if f.contains_key("phone_number")));
}

#[tokio::test]
async fn test_delete_profile_keeps_identity() {
    let (repos, storage, _dir) = setup();
    let ada = RegisterUserUseCase::execute(
        &repos,
        &storage,
        registration("ada", "+2348011111111", "NIN-1"),
        ScannedIds::default(),
    )
    .await
    .unwrap();

    let err = DeleteProfileUseCase::execute(&repos, &Actor::new(Uuid::new_v4(), false), ada.user)
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 403);

    DeleteProfileUseCase::execute(&repos, &Actor::new(ada.user, false), ada.user)
        .await
        .unwrap();
    assert!(GetProfileUseCase::execute(&repos, ada.user).await.is_err());
    assert!(repos.users.find_by_id(ada.user).await.unwrap().is_some());

    let err = DeleteProfileUseCase::execute(&repos, &Actor::new(ada.user, false), ada.user)
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 404);
}
