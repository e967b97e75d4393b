//! Payment recording and status transition tests for billing-service.

mod common;

use common::{dec, TestApp};
use serde_json::json;

async fn pay(app: &TestApp, invoice_id: &str, amount: &str) -> reqwest::Response {
    app.client
        .post(app.url(&format!("/invoices/{}/payments", invoice_id)))
        .json(&json!({ "amount": amount }))
        .send()
        .await
        .expect("request failed")
}

#[tokio::test]
async fn partial_payment_moves_invoice_to_partial() {
    let app = TestApp::spawn().await;
    let product = app.create_product("Paracetamol 500mg", 100, 45, 12).await;
    // Grand total: 2 x 45 + 12% GST = 100.80
    let invoice = app
        .create_invoice(product["id"].as_str().unwrap(), 2)
        .await;
    let invoice_id = invoice["id"].as_str().unwrap();

    let response = pay(&app, invoice_id, "50").await;
    assert_eq!(response.status(), 200);
    let updated: serde_json::Value = response.json().await.unwrap();

    assert_eq!(updated["status"], "partial");
    assert_eq!(dec(&updated["paid_amount"]), "50".parse().unwrap());
    assert_eq!(dec(&updated["balance_due"]), "50.80".parse().unwrap());
}

#[tokio::test]
async fn payments_accumulate_until_paid() {
    let app = TestApp::spawn().await;
    let product = app.create_product("Cough Syrup", 100, 85, 18).await;
    // Grand total: 1 x 85 + 18% GST = 100.30
    let invoice = app
        .create_invoice(product["id"].as_str().unwrap(), 1)
        .await;
    let invoice_id = invoice["id"].as_str().unwrap();

    pay(&app, invoice_id, "60").await;
    let response = pay(&app, invoice_id, "40.30").await;
    let updated: serde_json::Value = response.json().await.unwrap();

    assert_eq!(updated["status"], "paid");
    assert_eq!(dec(&updated["paid_amount"]), "100.30".parse().unwrap());
    assert_eq!(dec(&updated["balance_due"]), "0".parse().unwrap());
}

#[tokio::test]
async fn overpayment_is_recorded_and_marks_paid() {
    let app = TestApp::spawn().await;
    let product = app.create_product("Gauze", 100, 10, 0).await;
    let invoice = app
        .create_invoice(product["id"].as_str().unwrap(), 1)
        .await;
    let invoice_id = invoice["id"].as_str().unwrap();

    let response = pay(&app, invoice_id, "25").await;
    let updated: serde_json::Value = response.json().await.unwrap();

    assert_eq!(updated["status"], "paid");
    assert_eq!(dec(&updated["paid_amount"]), "25".parse().unwrap());
}

#[tokio::test]
async fn non_positive_amounts_are_rejected() {
    let app = TestApp::spawn().await;
    let product = app.create_product("Tablets", 100, 10, 5).await;
    let invoice = app
        .create_invoice(product["id"].as_str().unwrap(), 1)
        .await;
    let invoice_id = invoice["id"].as_str().unwrap();

    assert_eq!(pay(&app, invoice_id, "0").await.status(), 400);
    assert_eq!(pay(&app, invoice_id, "-5").await.status(), 400);

    let unchanged = app.get_json(&format!("/invoices/{}", invoice_id)).await;
    assert_eq!(dec(&unchanged["paid_amount"]), "0".parse().unwrap());
    assert_eq!(unchanged["status"], "unpaid");
}

#[tokio::test]
async fn payment_against_unknown_invoice_returns_not_found() {
    let app = TestApp::spawn().await;

    let response = pay(&app, &uuid::Uuid::new_v4().to_string(), "10").await;
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn summary_reflects_payments() {
    let app = TestApp::spawn().await;
    let product = app.create_product("Vitamin D3", 100, 100, 0).await;
    let product_id = product["id"].as_str().unwrap();
    // Two invoices of 100 each; pay one in full.
    let first = app.create_invoice(product_id, 1).await;
    app.create_invoice(product_id, 1).await;
    pay(&app, first["id"].as_str().unwrap(), "100").await;

    let summary = app.get_json("/reports/summary").await;

    assert_eq!(summary["total_invoices"], 2);
    assert_eq!(summary["paid_invoices"], 1);
    assert_eq!(summary["unpaid_invoices"], 1);
    assert_eq!(summary["total_products"], 1);
    assert_eq!(dec(&summary["total_revenue"]), "200".parse().unwrap());
    assert_eq!(dec(&summary["total_paid"]), "100".parse().unwrap());
    assert_eq!(dec(&summary["total_outstanding"]), "100".parse().unwrap());
}
