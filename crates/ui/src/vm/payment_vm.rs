use portal_core::model::PaymentSummary;
use serde::Serialize;

use crate::vm::time_fmt::{format_amount, format_date};

pub const NO_PAYMENTS: &str = "no data found";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Paid,
    Due,
}

impl PaymentStatus {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            PaymentStatus::Paid => "paid",
            PaymentStatus::Due => "due",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PaymentRowVm {
    pub date: String,
    pub course: String,
    pub receipt_no: String,
    pub amount: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PaymentVm {
    pub course: String,
    pub status: PaymentStatus,
    pub total_paid: String,
    pub pending: String,
    pub rows: Vec<PaymentRowVm>,
}

impl PaymentVm {
    #[must_use]
    pub fn new(course: &str, summary: &PaymentSummary) -> Self {
        let status = if summary.is_fully_paid() {
            PaymentStatus::Paid
        } else {
            PaymentStatus::Due
        };
        let rows = summary
            .payments
            .iter()
            .map(|payment| PaymentRowVm {
                date: format_date(payment.paid_at),
                course: course.to_owned(),
                receipt_no: payment.receipt_no.clone(),
                amount: format_amount(payment.paid_amount),
            })
            .collect();

        Self {
            course: course.to_owned(),
            status,
            total_paid: format_amount(summary.total_paid()),
            pending: format_amount(summary.pending_amount),
            rows,
        }
    }

    /// The page shows [`NO_PAYMENTS`] instead of the table.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
