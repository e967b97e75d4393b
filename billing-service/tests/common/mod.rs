#![allow(dead_code)]

//! Shared test harness: spawns the real router on an ephemeral port with a
//! throwaway snapshot file.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use billing_service::{
    build_router,
    config::{BillingConfig, Environment},
    services::{ledger::Ledger, store::SnapshotStore},
    AppState,
};
use serde_json::{json, Value};
use tokio::sync::RwLock;

pub struct TestApp {
    pub addr: SocketAddr,
    pub client: reqwest::Client,
    pub storage_path: PathBuf,
    _storage_dir: tempfile::TempDir,
}

impl TestApp {
    /// Start the service with an empty ledger.
    pub async fn spawn() -> Self {
        let storage_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let storage_path = storage_dir.path().join("ledger.json");

        let config = BillingConfig {
            common: service_core::config::Config { port: 0 },
            environment: Environment::Dev,
            service_name: "billing-service".to_string(),
            service_version: "test".to_string(),
            log_level: "info".to_string(),
            storage_path: storage_path.display().to_string(),
        };

        let state = AppState {
            config,
            ledger: Arc::new(RwLock::new(Ledger::new())),
            store: SnapshotStore::new(&storage_path),
        };

        let app = build_router(state);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Missing local addr");

        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Server failed");
        });

        Self {
            addr,
            client: reqwest::Client::new(),
            storage_path,
            _storage_dir: storage_dir,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Add a product and return its JSON representation.
    pub async fn create_product(&self, name: &str, stock: i64, sale_rate: u32, gst: u32) -> Value {
        let response = self
            .client
            .post(self.url("/products"))
            .json(&json!({
                "name": name,
                "batch_number": format!("{}-BATCH", name.to_uppercase().replace(' ', "")),
                "expiry_date": "2027-12-31",
                "gst": gst,
                "mrp": sale_rate + 10,
                "purchase_rate": sale_rate.saturating_sub(10),
                "sale_rate": sale_rate,
                "stock": stock,
                "supplier": "Test Supplier"
            }))
            .send()
            .await
            .expect("Failed to create product");
        assert_eq!(response.status(), 201, "product creation failed");
        response.json().await.expect("Invalid product JSON")
    }

    /// Create an invoice for a single product and return its JSON.
    pub async fn create_invoice(&self, product_id: &str, quantity: u32) -> Value {
        let response = self
            .client
            .post(self.url("/invoices"))
            .json(&json!({
                "customer_name": "Test Customer",
                "customer_contact": "9876543210",
                "items": [{ "product_id": product_id, "quantity": quantity }],
                "created_by": "tester"
            }))
            .send()
            .await
            .expect("Failed to create invoice");
        assert_eq!(response.status(), 201, "invoice creation failed");
        response.json().await.expect("Invalid invoice JSON")
    }

    pub async fn get_json(&self, path: &str) -> Value {
        let response = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("Request failed");
        assert!(response.status().is_success(), "GET {} failed", path);
        response.json().await.expect("Invalid JSON")
    }
}

/// Parse a monetary field serialized by rust_decimal (a JSON string).
pub fn dec(value: &Value) -> rust_decimal::Decimal {
    value
        .as_str()
        .unwrap_or_else(|| panic!("expected decimal string, got {}", value))
        .parse()
        .expect("invalid decimal")
}
