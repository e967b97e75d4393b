//! Core services for billing-service.

pub mod ledger;
pub mod metrics;
pub mod seed;
pub mod store;
pub mod words;
