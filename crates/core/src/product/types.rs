//! Product domain types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::ProductError;
use crate::calendar::BizDate;

/// Six-digit product code (e.g. `130999`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProductCode(pub(super) String);

impl ProductCode {
    /// Parses and validates a product code.
    pub fn parse(value: &str) -> Result<Self, ProductError> {
        if value.len() == 6 && value.bytes().all(|b| b.is_ascii_digit()) {
            Ok(Self(value.to_string()))
        } else {
            Err(ProductError::InvalidCode(value.to_string()))
        }
    }

    /// Returns the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ProductCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for ProductCode {
    type Err = ProductError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ProductCode {
    type Error = ProductError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ProductCode> for String {
    fn from(value: ProductCode) -> Self {
        value.0
    }
}

/// Product subject classification.
///
/// The subject code also namespaces generated account numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubjectCode {
    /// Regular (demand) savings.
    Regular,
    /// Fixed-term deposit.
    FixedDeposit,
    /// Installment savings.
    Installment,
}

impl SubjectCode {
    /// Three-digit prefix of account numbers opened under this subject.
    #[must_use]
    pub const fn account_prefix(self) -> &'static str {
        match self {
            Self::Regular => "131",
            Self::FixedDeposit => "132",
            Self::Installment => "133",
        }
    }
}

impl std::fmt::Display for SubjectCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Regular => write!(f, "REGULAR"),
            Self::FixedDeposit => write!(f, "FIXED_DEPOSIT"),
            Self::Installment => write!(f, "INSTALLMENT"),
        }
    }
}

impl std::str::FromStr for SubjectCode {
    type Err = ProductError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "REGULAR" | "131" => Ok(Self::Regular),
            "FIXED_DEPOSIT" | "132" => Ok(Self::FixedDeposit),
            "INSTALLMENT" | "133" => Ok(Self::Installment),
            _ => Err(ProductError::UnknownSubject(s.to_string())),
        }
    }
}

/// A deposit product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Product code.
    pub code: ProductCode,
    /// Subject classification.
    pub subject: SubjectCode,
    /// Display name.
    pub name: String,
    /// Basic annual interest rate in percent (`1.2` means 1.2% p.a.).
    pub basic_rate: Decimal,
    /// First day the product can be sold.
    pub start_date: BizDate,
    /// Last day the product can be sold.
    pub end_date: BizDate,
}

impl Product {
    /// Returns true if accounts may be opened under this product on `date`.
    #[must_use]
    pub fn is_active_on(&self, date: BizDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}

/// Input for registering a product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProduct {
    /// Product code.
    pub code: ProductCode,
    /// Subject classification.
    pub subject: SubjectCode,
    /// Display name.
    pub name: String,
    /// Basic annual interest rate in percent.
    pub basic_rate: Decimal,
    /// First day the product can be sold.
    pub start_date: BizDate,
    /// Last day the product can be sold; open-ended when absent.
    #[serde(default)]
    pub end_date: Option<BizDate>,
}

impl NewProduct {
    /// Validates the input and builds the immutable product record.
    pub fn validate(self) -> Result<Product, ProductError> {
        if self.name.trim().is_empty() {
            return Err(ProductError::EmptyName);
        }
        if self.basic_rate < Decimal::ZERO {
            return Err(ProductError::NegativeRate(self.basic_rate));
        }

        let end_date = self.end_date.unwrap_or(BizDate::MAX);
        if end_date < self.start_date {
            return Err(ProductError::InvalidValidity {
                start: self.start_date,
                end: end_date,
            });
        }

        Ok(Product {
            code: self.code,
            subject: self.subject,
            name: self.name,
            basic_rate: self.basic_rate,
            start_date: self.start_date,
            end_date,
        })
    }
}
