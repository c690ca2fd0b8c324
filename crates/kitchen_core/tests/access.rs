use kitchen_core::db::open_db_in_memory;
use kitchen_core::repo::cook_repo::SqliteCookRepository;
use kitchen_core::{authenticate, CatalogService, CookInput, ServiceError};
use uuid::Uuid;

#[test]
fn missing_identity_is_unauthenticated() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCookRepository::try_new(&conn).unwrap();

    let err = authenticate(&repo, None).unwrap_err();
    assert!(matches!(err, ServiceError::Unauthenticated));
    assert_eq!(err.kind(), "unauthenticated");
}

#[test]
fn unknown_or_deleted_cook_is_unauthenticated() {
    let conn = open_db_in_memory().unwrap();
    let catalog = CatalogService::sqlite(&conn).unwrap();
    let cook = catalog
        .create_cook(CookInput {
            username: "line_cook".to_string(),
            first_name: String::new(),
            last_name: String::new(),
            years_of_experience: None,
        })
        .unwrap();
    let repo = SqliteCookRepository::try_new(&conn).unwrap();

    assert_eq!(authenticate(&repo, Some(cook.id)).unwrap(), cook.id);
    assert!(matches!(
        authenticate(&repo, Some(Uuid::new_v4())).unwrap_err(),
        ServiceError::Unauthenticated
    ));

    catalog.delete_cook(cook.id).unwrap();
    assert!(matches!(
        authenticate(&repo, Some(cook.id)).unwrap_err(),
        ServiceError::Unauthenticated
    ));
}
