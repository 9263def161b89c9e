//! JSON operation scripts.
//!
//! A script is a JSON array of steps tagged by `op`. Accounts opened by the
//! script are referred to by the alias given at `open`; a literal account
//! number works too.
//!
//! ```json
//! [
//!   {"op": "open", "alias": "main", "product_code": "130999",
//!    "reg_date": "20170101", "taxation_code": "REGULAR"},
//!   {"op": "deposit", "account": "main", "trade_date": "20170101", "amount": 1000000},
//!   {"op": "pay_interest", "account": "main", "to_date": "20191231", "trade_date": "20200101"},
//!   {"op": "statement", "account": "main"}
//! ]
//! ```

use std::collections::HashMap;

use anyhow::Context;
use serde::Deserialize;
use serde_json::{Value, json};

use openbank_core::account::{
    AccountService, CloseAccountRequest, OpenAccountRequest, PayInterestRequest,
    SetPasswordRequest, TradeRequest,
};
use openbank_core::calendar::BizDate;
use openbank_core::ledger::{AccountNumber, LedgerError, LedgerStore};
use openbank_core::product::{NewProduct, ProductCatalog};

/// One scripted operation.
#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    /// Register a product.
    CreateProduct(NewProduct),
    /// Open a regular account and remember it under `alias`.
    Open {
        /// Name later steps use for the account.
        alias: String,
        /// Opening parameters.
        #[serde(flatten)]
        request: OpenAccountRequest,
    },
    /// Replace the account password.
    SetPassword {
        /// Alias or account number.
        account: String,
        /// New password.
        #[serde(flatten)]
        request: SetPasswordRequest,
    },
    /// Deposit funds.
    Deposit {
        /// Alias or account number.
        account: String,
        /// Date and amount.
        #[serde(flatten)]
        request: TradeRequest,
    },
    /// Withdraw funds.
    Withdraw {
        /// Alias or account number.
        account: String,
        /// Date and amount.
        #[serde(flatten)]
        request: TradeRequest,
    },
    /// Accrue and post interest.
    PayInterest {
        /// Alias or account number.
        account: String,
        /// Accrual end and posting date.
        #[serde(flatten)]
        request: PayInterestRequest,
    },
    /// Close the account.
    Close {
        /// Alias or account number.
        account: String,
        /// Closing date.
        #[serde(flatten)]
        request: CloseAccountRequest,
    },
    /// Report the balance at the end of a date.
    BalanceAsOf {
        /// Alias or account number.
        account: String,
        /// Date to report.
        date: BizDate,
    },
    /// Dump the account header, trades and interest postings.
    Statement {
        /// Alias or account number.
        account: String,
    },
}

impl Step {
    /// The `op` tag of this step.
    pub fn name(&self) -> &'static str {
        match self {
            Self::CreateProduct(_) => "create_product",
            Self::Open { .. } => "open",
            Self::SetPassword { .. } => "set_password",
            Self::Deposit { .. } => "deposit",
            Self::Withdraw { .. } => "withdraw",
            Self::PayInterest { .. } => "pay_interest",
            Self::Close { .. } => "close",
            Self::BalanceAsOf { .. } => "balance_as_of",
            Self::Statement { .. } => "statement",
        }
    }
}

fn to_value<T: serde::Serialize>(value: &T) -> anyhow::Result<Value> {
    serde_json::to_value(value).context("Failed to encode step result")
}

/// Runs steps against an account service, tracking aliases.
pub struct ScriptRunner<S, C> {
    service: AccountService<S, C>,
    aliases: HashMap<String, AccountNumber>,
}

impl<S, C> ScriptRunner<S, C>
where
    S: LedgerStore,
    C: ProductCatalog,
{
    /// Creates a runner with no known aliases.
    pub fn new(service: AccountService<S, C>) -> Self {
        Self {
            service,
            aliases: HashMap::new(),
        }
    }

    fn account(&self, name: &str) -> Result<AccountNumber, LedgerError> {
        match self.aliases.get(name) {
            Some(number) => Ok(number.clone()),
            None => AccountNumber::parse(name),
        }
    }

    /// Executes one step and returns its result as JSON.
    ///
    /// Ledger failures keep their `LedgerError` type inside the returned
    /// error.
    pub async fn run(&mut self, step: Step) -> anyhow::Result<Value> {
        match step {
            Step::CreateProduct(product) => to_value(&self.service.create_product(product).await?),
            Step::Open { alias, request } => {
                let id = self.service.open_regular_account(request).await?;
                let account = self
                    .service
                    .store()
                    .account(id)
                    .await?
                    .ok_or_else(|| LedgerError::AccountNotFound(id.to_string()))?;
                self.aliases.insert(alias.clone(), account.number.clone());
                Ok(json!({ "alias": alias, "account": to_value(&account)? }))
            }
            Step::SetPassword { account, request } => {
                let number = self.account(&account)?;
                self.service.set_password(&number, request).await?;
                Ok(json!({ "account_number": number }))
            }
            Step::Deposit { account, request } => {
                let number = self.account(&account)?;
                to_value(&self.service.deposit(&number, request).await?)
            }
            Step::Withdraw { account, request } => {
                let number = self.account(&account)?;
                to_value(&self.service.withdraw(&number, request).await?)
            }
            Step::PayInterest { account, request } => {
                let number = self.account(&account)?;
                let trade = self.service.pay_interest(&number, request).await?;
                let interests = self.service.interests(&number).await?;
                Ok(json!({
                    "trade": to_value(&trade)?,
                    "interest": to_value(&interests.last())?,
                }))
            }
            Step::Close { account, request } => {
                let number = self.account(&account)?;
                to_value(&self.service.close_account(&number, request).await?)
            }
            Step::BalanceAsOf { account, date } => {
                let number = self.account(&account)?;
                let balance = self.service.balance_as_of(&number, date).await?;
                Ok(json!({ "account_number": number, "date": date, "balance": balance }))
            }
            Step::Statement { account } => {
                let number = self.account(&account)?;
                Ok(json!({
                    "account": to_value(&self.service.account(&number).await?)?,
                    "trades": to_value(&self.service.trades(&number).await?)?,
                    "interests": to_value(&self.service.interests(&number).await?)?,
                }))
            }
        }
    }
}
