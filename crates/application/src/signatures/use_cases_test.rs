use super::*;
use crate::test_support::Fixture;
use serde_json::json;

fn signing(document: Uuid, value: &str, claimed_hash: &str) -> CreateSignatureRequest {
    CreateSignatureRequest {
        document,
        signature_value: value.to_string(),
        signer_public_key: "ed25519:4f3c2a".to_string(),
        document_hash_at_signing: claimed_hash.to_string(),
        blockchain_signature_hash: None,
    }
}

fn update(body: serde_json::Value) -> Vec<u8> {
    serde_json::to_vec(&body).unwrap()
}

#[tokio::test]
async fn test_submit_then_resubmit() {
    let fx = Fixture::new();
    let alice = fx.user("alice").await;
    let property = fx.property(&alice, "UPI-1").await;
    let doc = fx.document(&property, "H1").await;

    let sig = CreateSignatureUseCase::execute(&fx.repos, &alice, signing(doc.id, "sig-bytes", "H1"))
        .await
        .unwrap();
    assert_eq!(sig.signer, alice.user_id);
    assert_eq!(sig.document, doc.id);
    assert_eq!(sig.document_hash_at_signing, "H1");

    let err = CreateSignatureUseCase::execute(&fx.repos, &alice, signing(doc.id, "sig-bytes", "H1"))
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 400);
    assert!(matches!(err, AppError::InvalidField(ref f) if f.contains_key("non_field_errors")));

    let listed = ListSignaturesUseCase::execute(
        &fx.repos,
        SignatureQuery {
            document_id: Some(doc.id),
        },
    )
    .await
    .unwrap();
    assert_eq!(listed.len(), 1);
}

#[tokio::test]
async fn test_hash_mismatch_is_rejected() {
    let fx = Fixture::new();
    let alice = fx.user("alice").await;
    let property = fx.property(&alice, "UPI-1").await;
    let doc = fx.document(&property, "H1").await;

    let err = CreateSignatureUseCase::execute(&fx.repos, &alice, signing(doc.id, "sig", "H2"))
        .await
        .unwrap_err();
    match err {
        AppError::InvalidField(fields) => {
            assert!(fields["document_hash_at_signing"][0].contains("Expected H1"));
        }
        other => panic!("unexpected {:?}", other),
    }
    assert!(ListSignaturesUseCase::execute(&fx.repos, SignatureQuery::default())
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_public_key_fits_column() {
    let fx = Fixture::new();
    let alice = fx.user("alice").await;
    let property = fx.property(&alice, "UPI-1").await;
    let doc = fx.document(&property, "H1").await;

    let mut req = signing(doc.id, "sig", "H1");
    req.signer_public_key = "k".repeat(600);
    let err = CreateSignatureUseCase::execute(&fx.repos, &alice, req)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidField(ref f) if f.contains_key("signer_public_key")));

    let mut req = signing(doc.id, "sig", "H1");
    req.signer_public_key = "k".repeat(255);
    CreateSignatureUseCase::execute(&fx.repos, &alice, req)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_unknown_document_is_not_found() {
    let fx = Fixture::new();
    let alice = fx.user("alice").await;
    let err = CreateSignatureUseCase::execute(&fx.repos, &alice, signing(Uuid::new_v4(), "sig", "H1"))
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 404);
}

#[tokio::test]
async fn test_non_staff_cannot_update_or_delete() {
    let fx = Fixture::new();
    let alice = fx.user("alice").await;
    let property = fx.property(&alice, "UPI-1").await;
    let doc = fx.document(&property, "H1").await;
    let sig = CreateSignatureUseCase::execute(&fx.repos, &alice, signing(doc.id, "sig", "H1"))
        .await
        .unwrap();

    for body in [
        json!({}),
        json!({"blockchain_signature_hash": "0xfeed"}),
        json!({"signature_value": "forged"}),
        json!({"id": "not-a-uuid"}),
        json!([1, 2]),
        json!({"blockchain_signature_hash": 5}),
    ] {
        let err = UpdateSignatureUseCase::execute(&fx.repos, &alice, sig.id, &update(body))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 403);
    }

    let err = UpdateSignatureUseCase::execute(&fx.repos, &alice, sig.id, b"{not json")
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 403);

    let err = DeleteSignatureUseCase::execute(&fx.repos, &alice, sig.id)
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 403);

    // Unknown ids are reported before permissions.
    let err = DeleteSignatureUseCase::execute(&fx.repos, &alice, Uuid::new_v4())
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 404);
}

#[tokio::test]
async fn test_staff_update_allow_list() {
    let fx = Fixture::new();
    let alice = fx.user("alice").await;
    let staff = fx.staff("registrar").await;
    let property = fx.property(&alice, "UPI-1").await;
    let doc = fx.document(&property, "H1").await;
    let sig = CreateSignatureUseCase::execute(&fx.repos, &alice, signing(doc.id, "sig", "H1"))
        .await
        .unwrap();

    let err = UpdateSignatureUseCase::execute(
        &fx.repos,
        &staff,
        sig.id,
        &update(json!({"blockchain_signature_hash": "0xfeed", "document_hash_at_signing": "H9"})),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let err = UpdateSignatureUseCase::execute(
        &fx.repos,
        &staff,
        sig.id,
        &update(json!({"id": Uuid::new_v4(), "blockchain_signature_hash": "0xfeed"})),
    )
    .await
    .unwrap_err();
    assert_eq!(err.status_code(), 400);

    let err = UpdateSignatureUseCase::execute(&fx.repos, &staff, sig.id, b"[1, 2]")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let updated = UpdateSignatureUseCase::execute(
        &fx.repos,
        &staff,
        sig.id,
        &update(json!({"id": sig.id, "blockchain_signature_hash": "0xfeed"})),
    )
    .await
    .unwrap();
    assert_eq!(updated.blockchain_signature_hash.as_deref(), Some("0xfeed"));
    assert_eq!(updated.signature_value, "sig");

    DeleteSignatureUseCase::execute(&fx.repos, &staff, sig.id)
        .await
        .unwrap();
    assert_eq!(
        GetSignatureUseCase::execute(&fx.repos, sig.id)
            .await
            .unwrap_err()
            .status_code(),
        404
    );
}
