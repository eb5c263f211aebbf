//! Row normalization and SKU reconciliation for catalog upload sheets.
//!
//! The productos sheet goes through
//! [`normalize_products`](usecase::services::product_service::normalize_products),
//! whose SKU map then drives
//! [`reconcile_options`](usecase::services::option_service::reconcile_options)
//! over the opcionales sheet.

pub mod config;
pub mod domain;
pub mod error;
pub mod infra;
pub mod logging;
pub mod usecase;
