//! Event-level revenue records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fulfilment status of the order a record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Delivered,
    Shipped,
    Canceled,
    Other,
}

impl OrderStatus {
    /// Parse a status label as exported by the order store.
    pub fn parse(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "delivered" => Self::Delivered,
            "shipped" => Self::Shipped,
            "canceled" | "cancelled" => Self::Canceled,
            _ => Self::Other,
        }
    }
}

/// One revenue-bearing line item.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RevenueRecord {
    pub timestamp: DateTime<Utc>,
    pub amount: f64,
    pub status: OrderStatus,
}

impl RevenueRecord {
    pub fn new(timestamp: DateTime<Utc>, amount: f64, status: OrderStatus) -> Self {
        Self {
            timestamp,
            amount,
            status,
        }
    }

    pub fn delivered(timestamp: DateTime<Utc>, amount: f64) -> Self {
        Self::new(timestamp, amount, OrderStatus::Delivered)
    }
}
