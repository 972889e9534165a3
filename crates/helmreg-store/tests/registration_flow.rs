#![allow(clippy::unwrap_used)] // Integration tests use unwrap for brevity

//! Integration tests for the registration store.
//!
//! Covers the full owner/authority flow and restart durability of the
//! persisted slots.

use helmreg_store::{DocumentKind, RegistrationUpdate, Store, VerificationStatus};

#[tokio::test]
async fn owner_registers_and_authority_approves() {
    let mut store = Store::open_in_memory().await.unwrap();

    // Owner side: register and fill in the helmet id.
    let user_id = store
        .session
        .register(&mut store.registry, "test@example.com")
        .await
        .unwrap()
        .id;
    store
        .registry
        .update_details(
            &user_id,
            RegistrationUpdate {
                helmet_id: Some("SH-99999".to_string()),
                owner_name: Some("John Doe".to_string()),
                ..RegistrationUpdate::default()
            },
        )
        .await
        .unwrap();

    // Authority side: case-insensitive search resolves the same record.
    let found = store.registry.get_by_helmet_id("sh-99999").unwrap();
    assert_eq!(found.id, user_id);

    store
        .registry
        .set_verification_status("SH-99999", VerificationStatus::Approved)
        .await
        .unwrap();

    // The owner's view reflects the approval.
    let record = store.registry.get_by_user_id(&user_id).unwrap();
    assert_eq!(record.verification_status, VerificationStatus::Approved);
}

#[tokio::test]
async fn state_survives_a_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("registry.db");

    let image = b"front-view photo bytes";
    let user_id = {
        let mut store = Store::open(&path).await.unwrap();
        let user_id = store
            .session
            .register(&mut store.registry, "rider@example.com")
            .await
            .unwrap()
            .id;
        store
            .registry
            .update_details(
                &user_id,
                RegistrationUpdate {
                    helmet_id: Some("SH-42424".to_string()),
                    bike_registration: Some("MH-12-AB-3456".to_string()),
                    ..RegistrationUpdate::default()
                },
            )
            .await
            .unwrap();
        store
            .registry
            .attach_document(&user_id, DocumentKind::Insurance, image)
            .await
            .unwrap();
        user_id
    };

    let store = Store::open(&path).await.unwrap();

    // The session identity was restored along with the collection.
    let current = store.session.current_user().unwrap();
    assert_eq!(current.id, user_id);
    assert_eq!(current.email, "rider@example.com");

    let record = store.registry.get_by_user_id(&user_id).unwrap();
    assert_eq!(record.helmet_id, "SH-42424");
    assert_eq!(record.bike_registration, "MH-12-AB-3456");

    let doc = record.document(DocumentKind::Insurance).unwrap();
    assert!(doc.uploaded);
    assert_eq!(doc.payload_bytes().unwrap().unwrap(), image);
}

#[tokio::test]
async fn logout_clears_the_persisted_identity() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("registry.db");

    {
        let mut store = Store::open(&path).await.unwrap();
        store
            .session
            .register(&mut store.registry, "rider@example.com")
            .await
            .unwrap();
        store.session.logout().await.unwrap();
    }

    let store = Store::open(&path).await.unwrap();
    assert!(store.session.current_user().is_none());
    // The collection itself is untouched by logout.
    assert_eq!(store.registry.records().len(), 1);
}

#[tokio::test]
async fn failed_register_leaves_persisted_state_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("registry.db");

    {
        let mut store = Store::open(&path).await.unwrap();
        store
            .session
            .register(&mut store.registry, "rider@example.com")
            .await
            .unwrap();
        store
            .session
            .register(&mut store.registry, "rider@example.com")
            .await
            .unwrap_err();
    }

    let store = Store::open(&path).await.unwrap();
    assert_eq!(store.registry.records().len(), 1);
}
