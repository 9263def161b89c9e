//! Ledger error types for validation, business-rule, invariant and store errors.
//!
//! Every failure leaves the ledger unchanged. [`LedgerError::kind`] tells
//! callers which of the four categories an error belongs to.

use openbank_shared::AppError;
use openbank_shared::types::{AccountId, Money, MoneyError};
use thiserror::Error;

use super::account::AccountNumber;
use super::trade::TradeCode;
use crate::auth::PasswordError;
use crate::calendar::{BizDate, DateError};
use crate::product::{ProductCode, ProductError, SubjectCode};

/// Broad error category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad input shape, rejected before any mutation.
    Validation,
    /// Well-formed request refused by a business rule.
    BusinessRule,
    /// The ledger refused to commit a state that would break its invariants.
    Invariant,
    /// The record store failed or timed out.
    Store,
    /// Unexpected internal failure outside the ledger itself.
    Internal,
}

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    // ========== Validation Errors ==========
    /// Malformed or out-of-range date.
    #[error(transparent)]
    InvalidDate(#[from] DateError),

    /// Product input failed validation.
    #[error(transparent)]
    Product(#[from] ProductError),

    /// Account numbers are eleven ASCII digits.
    #[error("Invalid account number: {0:?}")]
    InvalidAccountNumber(String),

    /// Trade amount must be positive.
    #[error("Trade amount must be positive, got {0}")]
    InvalidAmount(Money),

    /// Trade code cannot be posted through this operation.
    #[error("Trade code {0} cannot be posted directly")]
    InvalidTradeCode(TradeCode),

    /// Password is empty or too long.
    #[error("Invalid password: {0}")]
    InvalidPassword(&'static str),

    /// Amount arithmetic overflowed.
    #[error("Amount overflow: {0}")]
    AmountOverflow(#[from] MoneyError),

    /// Interest window ends after the day it is posted.
    #[error("Interest cannot accrue through {to_date} when posted on {trade_date}")]
    AccrualAfterPosting {
        /// Last accrued day requested.
        to_date: BizDate,
        /// Posting date.
        trade_date: BizDate,
    },

    // ========== Business Rule Errors ==========
    /// No product with this code.
    #[error("Product not found: {0}")]
    ProductNotFound(ProductCode),

    /// Product is outside its validity window.
    #[error("Product {code} is not active on {date}")]
    ProductNotActive {
        /// Product code.
        code: ProductCode,
        /// Requested date.
        date: BizDate,
    },

    /// Product subject does not match the kind of account being opened.
    #[error("Product {code} has subject {subject}, expected {expected}")]
    ProductSubjectMismatch {
        /// Product code.
        code: ProductCode,
        /// Product's subject.
        subject: SubjectCode,
        /// Subject required by the operation.
        expected: SubjectCode,
    },

    /// No account with this number or id.
    #[error("Account not found: {0}")]
    AccountNotFound(String),

    /// Account is closed.
    #[error("Account {0} is closed")]
    AccountClosed(AccountNumber),

    /// Withdrawal exceeds the current balance.
    #[error("Insufficient balance: balance {balance}, requested {requested}")]
    InsufficientBalance {
        /// Current balance.
        balance: Money,
        /// Requested withdrawal.
        requested: Money,
    },

    /// Interest has already been computed through the requested date.
    #[error("No accrual period: interest already computed through {last_interest_date}, requested {to_date}")]
    NoAccrualPeriod {
        /// Last day interest was computed for.
        last_interest_date: BizDate,
        /// Requested last accrued day.
        to_date: BizDate,
    },

    /// Trade date precedes the account's latest trade.
    #[error("Trade date {trade_date} precedes the last trade date {last_trade_date}")]
    BackdatedTrade {
        /// Latest trade date on the account.
        last_trade_date: BizDate,
        /// Requested trade date.
        trade_date: BizDate,
    },

    /// Account cannot be closed while it holds funds.
    #[error("Account still holds a balance of {0}")]
    NonZeroBalance(Money),

    /// All serials of a subject are allocated.
    #[error("Account numbers exhausted for subject {0}")]
    AccountNumbersExhausted(SubjectCode),

    // ========== Invariant Violations ==========
    /// A trade's balance-before does not match its predecessor's balance-after.
    #[error("Balance chain broken at sequence {sequence}: expected {expected}, found {actual}")]
    BalanceChainBroken {
        /// Offending trade sequence.
        sequence: u64,
        /// Predecessor's balance-after.
        expected: Money,
        /// Offending balance-before.
        actual: Money,
    },

    /// Trade sequence numbers are not contiguous.
    #[error("Trade sequence gap: expected {expected}, found {actual}")]
    SequenceGap {
        /// Expected sequence.
        expected: u64,
        /// Found sequence.
        actual: u64,
    },

    /// A trade's amount does not explain its balance movement, or the
    /// account balance disagrees with the last trade.
    #[error("Balance mismatch at sequence {sequence}")]
    BalanceMismatch {
        /// Offending trade sequence.
        sequence: u64,
    },

    /// A committed balance would be negative.
    #[error("Negative balance {balance} at sequence {sequence}")]
    NegativeBalance {
        /// Offending trade sequence.
        sequence: u64,
        /// Resulting balance.
        balance: Money,
    },

    /// Interest window does not start right after the last interest date.
    #[error("Accrual window starting {from_date} does not follow last interest date {last_interest_date}")]
    AccrualWindowMismatch {
        /// Window start.
        from_date: BizDate,
        /// Account's last interest date.
        last_interest_date: BizDate,
    },

    /// Account number collides with an existing account.
    #[error("Duplicate account number: {0}")]
    DuplicateAccount(AccountNumber),

    // ========== Store Errors ==========
    /// Timed out waiting for the account's lock.
    #[error("Timed out waiting for account {0}")]
    LockTimeout(AccountId),

    /// Record store failure.
    #[error("Store error: {0}")]
    Store(String),

    // ========== Internal Errors ==========
    /// Credential hashing failed.
    #[error(transparent)]
    Password(#[from] PasswordError),
}

impl LedgerError {
    /// Returns the error category.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidDate(_)
            | Self::InvalidAccountNumber(_)
            | Self::InvalidAmount(_)
            | Self::InvalidTradeCode(_)
            | Self::InvalidPassword(_)
            | Self::AmountOverflow(_)
            | Self::AccrualAfterPosting { .. } => ErrorKind::Validation,

            Self::Product(ProductError::DuplicateCode(_)) => ErrorKind::BusinessRule,
            Self::Product(_) => ErrorKind::Validation,

            Self::ProductNotFound(_)
            | Self::ProductNotActive { .. }
            | Self::ProductSubjectMismatch { .. }
            | Self::AccountNotFound(_)
            | Self::AccountClosed(_)
            | Self::InsufficientBalance { .. }
            | Self::NoAccrualPeriod { .. }
            | Self::BackdatedTrade { .. }
            | Self::NonZeroBalance(_)
            | Self::AccountNumbersExhausted(_) => ErrorKind::BusinessRule,

            Self::BalanceChainBroken { .. }
            | Self::SequenceGap { .. }
            | Self::BalanceMismatch { .. }
            | Self::NegativeBalance { .. }
            | Self::AccrualWindowMismatch { .. }
            | Self::DuplicateAccount(_) => ErrorKind::Invariant,

            Self::LockTimeout(_) | Self::Store(_) => ErrorKind::Store,

            Self::Password(_) => ErrorKind::Internal,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidDate(_) => "INVALID_DATE_FORMAT",
            Self::Product(_) => "INVALID_PRODUCT",
            Self::InvalidAccountNumber(_) => "INVALID_ACCOUNT_NUMBER",
            Self::InvalidAmount(_) => "INVALID_AMOUNT",
            Self::InvalidTradeCode(_) => "INVALID_TRADE_CODE",
            Self::InvalidPassword(_) => "INVALID_PASSWORD",
            Self::AmountOverflow(_) => "AMOUNT_OVERFLOW",
            Self::AccrualAfterPosting { .. } => "ACCRUAL_AFTER_POSTING",
            Self::ProductNotFound(_) => "PRODUCT_NOT_FOUND",
            Self::ProductNotActive { .. } => "PRODUCT_NOT_ACTIVE",
            Self::ProductSubjectMismatch { .. } => "PRODUCT_SUBJECT_MISMATCH",
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::AccountClosed(_) => "ACCOUNT_CLOSED",
            Self::InsufficientBalance { .. } => "INSUFFICIENT_BALANCE",
            Self::NoAccrualPeriod { .. } => "NO_ACCRUAL_PERIOD",
            Self::BackdatedTrade { .. } => "BACKDATED_TRADE",
            Self::NonZeroBalance(_) => "NON_ZERO_BALANCE",
            Self::AccountNumbersExhausted(_) => "ACCOUNT_NUMBERS_EXHAUSTED",
            Self::BalanceChainBroken { .. } => "BALANCE_CHAIN_BROKEN",
            Self::SequenceGap { .. } => "SEQUENCE_GAP",
            Self::BalanceMismatch { .. } => "BALANCE_MISMATCH",
            Self::NegativeBalance { .. } => "NEGATIVE_BALANCE",
            Self::AccrualWindowMismatch { .. } => "ACCRUAL_WINDOW_MISMATCH",
            Self::DuplicateAccount(_) => "DUPLICATE_ACCOUNT",
            Self::LockTimeout(_) => "LOCK_TIMEOUT",
            Self::Store(_) => "STORE_ERROR",
            Self::Password(_) => "PASSWORD_ERROR",
        }
    }

    /// Returns true if this error is retryable.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::LockTimeout(_))
    }
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        let message = err.to_string();
        match (&err, err.kind()) {
            (LedgerError::AccountNotFound(_) | LedgerError::ProductNotFound(_), _) => {
                Self::NotFound(message)
            }
            (LedgerError::LockTimeout(_), _) => Self::Conflict(message),
            (_, ErrorKind::Validation) => Self::Validation(message),
            (_, ErrorKind::BusinessRule) => Self::BusinessRule(message),
            (_, ErrorKind::Store) => Self::Store(message),
            (_, ErrorKind::Invariant | ErrorKind::Internal) => Self::Internal(message),
        }
    }
}
