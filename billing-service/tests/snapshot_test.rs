//! Snapshot persistence tests: every mutation lands on disk, and a restored
//! ledger reproduces the saved one.

mod common;

use billing_service::services::store::{LedgerSnapshot, SnapshotStore, STORAGE_KEY};
use common::{dec, TestApp};
use serde_json::json;

fn read_document(app: &TestApp) -> serde_json::Value {
    let raw = std::fs::read_to_string(&app.storage_path).expect("snapshot file missing");
    serde_json::from_str(&raw).expect("snapshot is not valid JSON")
}

#[tokio::test]
async fn mutations_are_persisted_under_the_storage_key() {
    let app = TestApp::spawn().await;
    let product = app.create_product("Paracetamol 500mg", 100, 45, 12).await;
    app.create_invoice(product["id"].as_str().unwrap(), 2)
        .await;

    let document = read_document(&app);
    let entry = &document[STORAGE_KEY];

    assert_eq!(entry["products"].as_array().unwrap().len(), 1);
    assert_eq!(entry["invoices"].as_array().unwrap().len(), 1);
    assert_eq!(entry["invoice_seq"], 1);
    assert_eq!(entry["products"][0]["stock"], 98);
    assert_eq!(
        dec(&entry["invoices"][0]["grand_total"]),
        "100.80".parse().unwrap()
    );
}

#[tokio::test]
async fn payment_updates_the_persisted_invoice() {
    let app = TestApp::spawn().await;
    let product = app.create_product("Gauze", 100, 10, 0).await;
    let invoice = app
        .create_invoice(product["id"].as_str().unwrap(), 1)
        .await;

    app.client
        .post(app.url(&format!(
            "/invoices/{}/payments",
            invoice["id"].as_str().unwrap()
        )))
        .json(&json!({ "amount": "10" }))
        .send()
        .await
        .expect("request failed");

    let entry = &read_document(&app)[STORAGE_KEY];
    assert_eq!(entry["invoices"][0]["status"], "paid");
    assert_eq!(dec(&entry["invoices"][0]["paid_amount"]), "10".parse().unwrap());
}

#[tokio::test]
async fn snapshot_round_trip_reproduces_the_ledger() {
    use billing_service::models::CreateProduct;
    use billing_service::services::ledger::Ledger;

    let mut ledger = Ledger::new();
    let product = ledger
        .add_product(CreateProduct {
            name: "Insulin Injection".into(),
            batch_number: "INS2024001".into(),
            expiry_date: "2027-06-30".parse().unwrap(),
            gst: "5".parse().unwrap(),
            mrp: "850".parse().unwrap(),
            purchase_rate: "700".parse().unwrap(),
            sale_rate: "800".parse().unwrap(),
            stock: 50,
            supplier: "NovoCare".into(),
            status: None,
        })
        .unwrap();
    ledger
        .create_invoice(billing_service::models::CreateInvoice {
            customer_name: "Round Trip".into(),
            customer_contact: "999".into(),
            customer_address: None,
            date: None,
            items: vec![billing_service::models::NewLineItem {
                product_id: product.id,
                quantity: 3,
                rate: None,
            }],
            discount: "0".parse().unwrap(),
            created_by: "tester".into(),
        })
        .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let store = SnapshotStore::new(dir.path().join("ledger.json"));
    store.save(&LedgerSnapshot::of(&ledger)).unwrap();

    let restored = store.load().unwrap().expect("snapshot present").into_ledger();

    assert_eq!(restored.products(), ledger.products());
    assert_eq!(restored.invoices(), ledger.invoices());
    assert_eq!(restored.invoice_seq(), ledger.invoice_seq());
    // Numbering continues where the saved ledger left off.
    assert_eq!(restored.next_invoice_number(), ledger.next_invoice_number());
}

#[tokio::test]
async fn load_returns_none_for_missing_file_or_key() {
    let dir = tempfile::tempdir().unwrap();

    let store = SnapshotStore::new(dir.path().join("absent.json"));
    assert!(store.load().unwrap().is_none());

    let other = dir.path().join("other.json");
    std::fs::write(&other, r#"{"some-other-app": {}}"#).unwrap();
    let store = SnapshotStore::new(other);
    assert!(store.load().unwrap().is_none());
}

#[tokio::test]
async fn legacy_snapshot_without_seq_field_still_loads() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("legacy.json");
    let document = json!({
        STORAGE_KEY: {
            "products": [],
            "invoices": []
        }
    });
    std::fs::write(&path, serde_json::to_vec(&document).unwrap()).unwrap();

    let snapshot = SnapshotStore::new(path)
        .load()
        .unwrap()
        .expect("snapshot present");
    assert_eq!(snapshot.invoice_seq, 0);
}
