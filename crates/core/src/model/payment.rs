use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::wire;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaymentRecord {
    #[serde(default, deserialize_with = "wire::lenient_date")]
    pub paid_at: Option<NaiveDate>,
    #[serde(default, deserialize_with = "wire::text")]
    pub receipt_no: String,
    #[serde(default, deserialize_with = "wire::amount")]
    pub paid_amount: f64,
}

/// Payment history of one enrollment plus the outstanding balance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaymentSummary {
    #[serde(default, deserialize_with = "wire::amount")]
    pub pending_amount: f64,
    #[serde(default, deserialize_with = "wire::list_or_empty")]
    pub payments: Vec<PaymentRecord>,
}

impl PaymentSummary {
    #[must_use]
    pub fn is_fully_paid(&self) -> bool {
        self.pending_amount <= 0.0
    }

    #[must_use]
    pub fn total_paid(&self) -> f64 {
        self.payments.iter().map(|p| p.paid_amount).sum()
    }
}
