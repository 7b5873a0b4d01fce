#[macro_use]
mod common;

use actix_web::http::StatusCode;
use actix_web::test;
use chrono::Utc;
use common::{multipart, FixedPinner, TestContext, UnavailablePinner};
use rust_decimal::Decimal;
use terra_core::entities::sea_orm_active_enums::TransactionStatus;
use terra_core::entities::transactions;
use uuid::Uuid;

fn property_form(owner: Uuid, upi: &str, proof: Option<&[u8]>) -> (String, Vec<u8>) {
    let owner = owner.to_string();
    let fields = [
        ("full_address", "7 Marina Road, Lagos Island"),
        ("property_type", "commercial"),
        ("unique_property_identifier", upi),
        ("current_owner", owner.as_str()),
        ("gps_latitude", "6.451140"),
        ("gps_longitude", "3.388350"),
    ];
    match proof {
        Some(content) => multipart(&fields, &[("proof_of_ownership_document", "c_of_o.pdf", content)]),
        None => multipart(&fields, &[]),
    }
}

#[actix_web::test]
async fn test_create_property_pins_proof_of_ownership() {
    let ctx = TestContext::with_pin(FixedPinner::step("QmProofOfOwnership"));
    let owner = ctx.user("chinedu").await;
    let app = init_app!(ctx);

    let (content_type, body) = property_form(owner.id, "LAG-IKJ-0001", Some(b"%PDF-1.4 C of O".as_slice()));
    let req = test::TestRequest::post()
        .uri("/properties/")
        .insert_header(ctx.bearer(&owner))
        .insert_header(("Content-Type", content_type))
        .set_payload(body)
        .to_request();
    let (status, body) = send!(app, req);

    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert_eq!(body["ownership_document_cid"], "QmProofOfOwnership");
    assert_eq!(body["current_owner"], owner.id.to_string());
    assert_eq!(body["current_owner_details"]["username"], "chinedu");
    assert!(body["current_owner_details"].get("password_hash").is_none());

    let stored = body["proof_of_ownership_document"].as_str().unwrap();
    assert!(stored.starts_with("property_documents/proof_of_ownership/"));
    assert!(ctx.storage.resolve(stored).unwrap().exists());
}

#[actix_web::test]
async fn test_create_property_survives_pinning_outage() {
    let ctx = TestContext::with_pin(UnavailablePinner::step());
    let owner = ctx.user("chinedu").await;
    let app = init_app!(ctx);

    let (content_type, body) = property_form(owner.id, "LAG-IKJ-0002", Some(b"%PDF-1.4 C of O".as_slice()));
    let req = test::TestRequest::post()
        .uri("/properties")
        .insert_header(ctx.bearer(&owner))
        .insert_header(("Content-Type", content_type))
        .set_payload(body)
        .to_request();
    let (status, body) = send!(app, req);

    assert_eq!(status, StatusCode::CREATED);
    assert!(body["ownership_document_cid"].is_null());
    assert!(body["proof_of_ownership_document"].is_string());

    let id: Uuid = body["id"].as_str().unwrap().parse().unwrap();
    assert!(ctx.repos.properties.find(id).await.unwrap().is_some());
}

#[actix_web::test]
async fn test_create_property_validation() {
    let ctx = TestContext::new();
    let owner = ctx.user("chinedu").await;
    ctx.property(&owner, "LAG-IKJ-0003").await;
    let app = init_app!(ctx);

    let (content_type, body) = property_form(Uuid::new_v4(), "LAG-IKJ-0004", None);
    let req = test::TestRequest::post()
        .uri("/properties")
        .insert_header(ctx.bearer(&owner))
        .insert_header(("Content-Type", content_type))
        .set_payload(body)
        .to_request();
    let (status, body) = send!(app, req);
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["current_owner"].is_array());

    let (content_type, body) = property_form(owner.id, "LAG-IKJ-0003", None);
    let req = test::TestRequest::post()
        .uri("/properties")
        .insert_header(ctx.bearer(&owner))
        .insert_header(("Content-Type", content_type))
        .set_payload(body)
        .to_request();
    let (status, body) = send!(app, req);
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["unique_property_identifier"].is_array());
}

#[actix_web::test]
async fn test_only_owner_or_staff_may_update() {
    let ctx = TestContext::new();
    let owner = ctx.user("chinedu").await;
    let stranger = ctx.user("bisi").await;
    let staff = ctx.staff("registrar").await;
    let property = ctx.property(&owner, "LAG-IKJ-0005").await;
    let app = init_app!(ctx);
    let uri = format!("/properties/{}/", property.id);

    let (content_type, body) = multipart(&[("description", "Two-storey duplex")], &[]);
    let req = test::TestRequest::put()
        .uri(&uri)
        .insert_header(ctx.bearer(&stranger))
        .insert_header(("Content-Type", content_type))
        .set_payload(body)
        .to_request();
    let (status, _) = send!(app, req);
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (content_type, body) = multipart(&[("description", "Two-storey duplex")], &[]);
    let req = test::TestRequest::put()
        .uri(&uri)
        .insert_header(ctx.bearer(&staff))
        .insert_header(("Content-Type", content_type))
        .set_payload(body)
        .to_request();
    let (status, body) = send!(app, req);
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["description"], "Two-storey duplex");
    assert_eq!(body["unique_property_identifier"], "LAG-IKJ-0005");
}

#[actix_web::test]
async fn test_delete_blocked_by_transactions() {
    let ctx = TestContext::new();
    let owner = ctx.user("chinedu").await;
    let buyer = ctx.user("bisi").await;
    let property = ctx.property(&owner, "LAG-IKJ-0006").await;
    let now = Utc::now();
    let tx = ctx
        .repos
        .transactions
        .insert(transactions::Model {
            id: Uuid::new_v4(),
            property_id: property.id,
            seller_id: owner.id,
            buyer_id: buyer.id,
            transaction_price: Decimal::new(25_000_000_00, 2),
            transaction_date: now.date_naive(),
            status: TransactionStatus::Pending,
            blockchain_transaction_hash: None,
            blockchain_block_number: None,
            blockchain_timestamp: None,
            created_at: now.into(),
            updated_at: now.into(),
        })
        .await
        .unwrap();
    let app = init_app!(ctx);
    let uri = format!("/properties/{}", property.id);

    let req = test::TestRequest::delete()
        .uri(&uri)
        .insert_header(ctx.bearer(&owner))
        .to_request();
    let (status, body) = send!(app, req);
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error_code"], "CONFLICT");

    ctx.repos.transactions.delete(tx.id).await.unwrap();

    let req = test::TestRequest::delete()
        .uri(&uri)
        .insert_header(ctx.bearer(&owner))
        .to_request();
    let (status, body) = send!(app, req);
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_null());

    let req = test::TestRequest::get()
        .uri(&uri)
        .insert_header(ctx.bearer(&owner))
        .to_request();
    let (status, body) = send!(app, req);
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Property not found.");
}

#[actix_web::test]
async fn test_malformed_id_is_not_found() {
    let ctx = TestContext::new();
    let owner = ctx.user("chinedu").await;
    let app = init_app!(ctx);

    let req = test::TestRequest::get()
        .uri("/properties/not-a-uuid")
        .insert_header(ctx.bearer(&owner))
        .to_request();
    let (status, _) = send!(app, req);
    assert_eq!(status, StatusCode::NOT_FOUND);
}
