//! Request payloads for account operations.
//!
//! Dates travel as `YYYYMMDD` strings and amounts as integer minor units;
//! malformed input fails while deserializing, before any operation runs.

use openbank_shared::types::Money;
use serde::{Deserialize, Serialize};

use crate::calendar::BizDate;
use crate::ledger::TaxationCode;
use crate::product::ProductCode;

/// Input for opening a regular account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenAccountRequest {
    /// Product to open the account under.
    pub product_code: ProductCode,
    /// Registration date.
    pub reg_date: BizDate,
    /// Taxation classification.
    pub taxation_code: TaxationCode,
}

/// Input for a deposit or withdrawal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeRequest {
    /// Business date of the trade.
    pub trade_date: BizDate,
    /// Amount in minor units; must be positive.
    pub amount: Money,
}

/// Input for setting an account password.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct SetPasswordRequest {
    /// The new password in plain text.
    pub new_password: String,
}

impl std::fmt::Debug for SetPasswordRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SetPasswordRequest")
            .field("new_password", &"<redacted>")
            .finish()
    }
}

/// Input for an interest posting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayInterestRequest {
    /// Last day to accrue through (inclusive).
    pub to_date: BizDate,
    /// Posting date.
    pub trade_date: BizDate,
}

/// Input for closing an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloseAccountRequest {
    /// Closing date.
    pub close_date: BizDate,
}
