//! Deposit account records.

use openbank_shared::types::{AccountId, Money};
use serde::{Deserialize, Serialize};

use super::error::LedgerError;
use crate::calendar::BizDate;
use crate::product::{ProductCode, SubjectCode};

/// Digits in the serial part of an account number.
const SERIAL_DIGITS: usize = 8;
/// Largest serial that fits in [`SERIAL_DIGITS`].
pub const MAX_SERIAL: u64 = 99_999_999;

/// Externally visible account number: subject prefix + 8-digit serial.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountNumber(String);

impl AccountNumber {
    /// Builds the number for the `serial`-th account of a subject.
    pub fn compose(subject: SubjectCode, serial: u64) -> Result<Self, LedgerError> {
        if serial == 0 || serial > MAX_SERIAL {
            return Err(LedgerError::AccountNumbersExhausted(subject));
        }
        Ok(Self(format!(
            "{}{serial:0width$}",
            subject.account_prefix(),
            width = SERIAL_DIGITS
        )))
    }

    /// Parses an account number received from a caller.
    pub fn parse(value: &str) -> Result<Self, LedgerError> {
        let valid = value.len() == 3 + SERIAL_DIGITS
            && value.bytes().all(|b| b.is_ascii_digit())
            && value[..3].parse::<SubjectCode>().is_ok();

        if valid {
            Ok(Self(value.to_string()))
        } else {
            Err(LedgerError::InvalidAccountNumber(value.to_string()))
        }
    }

    /// Returns the number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AccountNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for AccountNumber {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for AccountNumber {
    type Error = LedgerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<AccountNumber> for String {
    fn from(value: AccountNumber) -> Self {
        value.0
    }
}

/// Account lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountStatus {
    /// Open for trading.
    Active,
    /// Terminal; balance-mutating operations are rejected.
    Closed,
}

/// Taxation classification of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaxationCode {
    /// Ordinary taxation.
    Regular,
    /// Tax exempt.
    TaxFree,
    /// Preferential (reduced) taxation.
    Preferential,
}

impl std::fmt::Display for TaxationCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Regular => write!(f, "REGULAR"),
            Self::TaxFree => write!(f, "TAX_FREE"),
            Self::Preferential => write!(f, "PREFERENTIAL"),
        }
    }
}

/// A deposit account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Opaque identifier.
    pub id: AccountId,
    /// Externally visible account number.
    pub number: AccountNumber,
    /// Product the account was opened under.
    pub product_code: ProductCode,
    /// Argon2id hash of the account password, if one was set.
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    /// Registration (opening) date.
    pub reg_date: BizDate,
    /// Date interest starts accruing from.
    pub reckon_date: BizDate,
    /// Last day interest has been computed for.
    pub last_interest_date: BizDate,
    /// Date of the latest trade.
    pub last_trade_date: BizDate,
    /// Date the account was closed.
    pub close_date: Option<BizDate>,
    /// Current balance; always equals the last trade's balance-after.
    pub balance: Money,
    /// Taxation classification.
    pub taxation_code: TaxationCode,
    /// Lifecycle status.
    pub status: AccountStatus,
}

impl Account {
    /// Creates a zero-balance account registered on `reg_date`.
    ///
    /// Interest is computed from `reg_date`, so the last interest date is
    /// the day before.
    pub fn new(
        number: AccountNumber,
        product_code: ProductCode,
        reg_date: BizDate,
        taxation_code: TaxationCode,
    ) -> Result<Self, LedgerError> {
        Ok(Self {
            id: AccountId::new(),
            number,
            product_code,
            password_hash: None,
            reg_date,
            reckon_date: reg_date,
            last_interest_date: Self::initial_interest_date(reg_date)?,
            last_trade_date: reg_date,
            close_date: None,
            balance: Money::ZERO,
            taxation_code,
            status: AccountStatus::Active,
        })
    }

    /// Last interest date of an account registered on `reg_date`.
    pub fn initial_interest_date(reg_date: BizDate) -> Result<BizDate, LedgerError> {
        Ok(reg_date.add_days(-1)?)
    }

    /// Returns true if the account accepts balance-mutating operations.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == AccountStatus::Active
    }

    /// Fails with `AccountClosed` unless the account is active.
    pub fn ensure_active(&self) -> Result<(), LedgerError> {
        if self.is_active() {
            Ok(())
        } else {
            Err(LedgerError::AccountClosed(self.number.clone()))
        }
    }
}
