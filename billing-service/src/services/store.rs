//! Snapshot persistence for billing-service.
//!
//! The whole ledger state is one JSON document under a fixed storage key,
//! written to a file after every successful mutation and restored at
//! startup. Restoring a snapshot reproduces the ledger exactly.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use service_core::error::AppError;
use tracing::{info, instrument};

use crate::models::{Invoice, Product};
use crate::services::ledger::Ledger;

/// Storage identifier the ledger document is keyed by.
pub const STORAGE_KEY: &str = "medical-billing-storage";

/// Serialized ledger state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub products: Vec<Product>,
    pub invoices: Vec<Invoice>,
    #[serde(default)]
    pub invoice_seq: u32,
}

impl LedgerSnapshot {
    pub fn of(ledger: &Ledger) -> Self {
        Self {
            products: ledger.products().to_vec(),
            invoices: ledger.invoices().to_vec(),
            invoice_seq: ledger.invoice_seq(),
        }
    }

    pub fn into_ledger(self) -> Ledger {
        Ledger::from_parts(self.products, self.invoices, self.invoice_seq)
    }
}

/// File-backed key-value document store holding the ledger snapshot.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the snapshot, if one has been written.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn load(&self) -> Result<Option<LedgerSnapshot>, AppError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let raw = std::fs::read_to_string(&self.path)?;
        let document: Value = serde_json::from_str(&raw)?;
        let Some(entry) = document.get(STORAGE_KEY) else {
            return Ok(None);
        };
        let snapshot: LedgerSnapshot = serde_json::from_value(entry.clone())?;
        info!(
            products = snapshot.products.len(),
            invoices = snapshot.invoices.len(),
            "Ledger snapshot loaded"
        );
        Ok(Some(snapshot))
    }

    /// Persist the snapshot. Written to a sibling temp file first, then
    /// renamed, so a crash mid-write never leaves a torn document.
    #[instrument(skip(self, snapshot), fields(path = %self.path.display()))]
    pub fn save(&self, snapshot: &LedgerSnapshot) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let document = serde_json::json!({ STORAGE_KEY: snapshot });
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, serde_json::to_vec_pretty(&document)?)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}
