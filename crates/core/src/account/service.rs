//! Account service orchestrating catalog, store and interest calculation.

use std::sync::Arc;

use openbank_shared::AppConfig;
use openbank_shared::types::{AccountId, Money, RoundingPolicy};
use tracing::{error, info, instrument, warn};

use super::types::{
    CloseAccountRequest, OpenAccountRequest, PayInterestRequest, SetPasswordRequest, TradeRequest,
};
use crate::auth;
use crate::calendar::BizDate;
use crate::interest::{Interest, InterestCalculator};
use crate::ledger::{
    Account, AccountLedger, AccountNumber, ErrorKind, LedgerError, LedgerStore, Trade, TradeCode,
};
use crate::product::{NewProduct, Product, ProductCatalog, ProductCode, SubjectCode};

/// Entry point for account operations.
///
/// Generic over the store and catalog so the same logic runs against any
/// backend.
pub struct AccountService<S, C> {
    store: Arc<S>,
    catalog: Arc<C>,
    calculator: InterestCalculator,
}

impl<S, C> Clone for AccountService<S, C> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            catalog: Arc::clone(&self.catalog),
            calculator: self.calculator,
        }
    }
}

/// Logs a failed operation at a level matching its category.
fn log_failure(err: &LedgerError) {
    match err.kind() {
        ErrorKind::Validation | ErrorKind::BusinessRule => {
            warn!(code = err.error_code(), error = %err, "Operation rejected");
        }
        ErrorKind::Invariant | ErrorKind::Store | ErrorKind::Internal => {
            error!(code = err.error_code(), error = %err, "Operation failed");
        }
    }
}

impl<S, C> AccountService<S, C>
where
    S: LedgerStore,
    C: ProductCatalog,
{
    /// Creates a service posting interest with `rounding`.
    pub fn new(store: Arc<S>, catalog: Arc<C>, rounding: RoundingPolicy) -> Self {
        Self {
            store,
            catalog,
            calculator: InterestCalculator::new(rounding),
        }
    }

    /// Creates a service from application configuration.
    pub fn from_config(store: Arc<S>, catalog: Arc<C>, config: &AppConfig) -> Self {
        Self::new(store, catalog, config.interest.rounding)
    }

    /// The store backing this service.
    #[must_use]
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Registers a product in the catalog.
    #[instrument(skip(self, product), fields(product_code = %product.code))]
    pub async fn create_product(&self, product: NewProduct) -> Result<Product, LedgerError> {
        let product = self
            .catalog
            .register(product)
            .await
            .inspect_err(log_failure)?;

        info!(subject = %product.subject, rate = %product.basic_rate, "Product registered");
        Ok(product)
    }

    async fn product(&self, code: &ProductCode) -> Result<Product, LedgerError> {
        self.catalog
            .find_by_code(code)
            .await?
            .ok_or_else(|| LedgerError::ProductNotFound(code.clone()))
    }

    async fn resolve(&self, number: &AccountNumber) -> Result<AccountId, LedgerError> {
        self.store
            .resolve(number)
            .await?
            .ok_or_else(|| LedgerError::AccountNotFound(number.to_string()))
    }

    async fn snapshot(&self, number: &AccountNumber) -> Result<AccountLedger, LedgerError> {
        let id = self.resolve(number).await?;
        self.store
            .snapshot(id)
            .await?
            .ok_or_else(|| LedgerError::AccountNotFound(number.to_string()))
    }

    /// Opens a regular savings account with a zero balance and its opening
    /// trade, returning the new account's id.
    ///
    /// # Errors
    ///
    /// - `ProductNotFound` if the code is unknown
    /// - `ProductNotActive` if `reg_date` is outside the product's validity
    /// - `ProductSubjectMismatch` if the product is not a regular savings one
    #[instrument(skip(self, request), fields(product_code = %request.product_code, reg_date = %request.reg_date))]
    pub async fn open_regular_account(
        &self,
        request: OpenAccountRequest,
    ) -> Result<AccountId, LedgerError> {
        self.open_account(request).await.inspect_err(log_failure)
    }

    async fn open_account(&self, request: OpenAccountRequest) -> Result<AccountId, LedgerError> {
        let OpenAccountRequest {
            product_code,
            reg_date,
            taxation_code,
        } = request;

        let product = self.product(&product_code).await?;
        if !product.is_active_on(reg_date) {
            return Err(LedgerError::ProductNotActive {
                code: product_code,
                date: reg_date,
            });
        }
        if product.subject != SubjectCode::Regular {
            return Err(LedgerError::ProductSubjectMismatch {
                code: product_code,
                subject: product.subject,
                expected: SubjectCode::Regular,
            });
        }

        // Serials are never returned, so every date check runs first.
        Account::initial_interest_date(reg_date)?;

        let serial = self.store.allocate_serial(product.subject).await?;
        let number = AccountNumber::compose(product.subject, serial)?;
        let account = Account::new(number, product_code, reg_date, taxation_code)?;
        let id = account.id;

        self.store.insert(AccountLedger::open(account.clone())?).await?;

        info!(account = %account.number, %id, "Account opened");
        Ok(id)
    }

    /// Replaces the account password. Leaves balance and trades untouched.
    #[instrument(skip(self, request), fields(account = %number))]
    pub async fn set_password(
        &self,
        number: &AccountNumber,
        request: SetPasswordRequest,
    ) -> Result<(), LedgerError> {
        async {
            auth::validate_password(&request.new_password)
                .map_err(LedgerError::InvalidPassword)?;
            let id = self.resolve(number).await?;
            let hash = auth::hash_password(&request.new_password)?;

            self.store
                .update(id, move |ledger| {
                    ledger.set_password_hash(hash);
                    Ok(())
                })
                .await
        }
        .await
        .inspect_err(log_failure)?;

        info!("Password updated");
        Ok(())
    }

    /// Checks `candidate` against the stored password. Accounts without a
    /// password never match.
    #[instrument(skip(self, candidate), fields(account = %number))]
    pub async fn verify_password(
        &self,
        number: &AccountNumber,
        candidate: &str,
    ) -> Result<bool, LedgerError> {
        let account = self.account(number).await?;
        match account.password_hash {
            Some(hash) => Ok(auth::verify_password(candidate, &hash)?),
            None => Ok(false),
        }
    }

    /// Deposits `request.amount`, returning the new trade.
    #[instrument(skip(self, request), fields(account = %number, trade_date = %request.trade_date, amount = %request.amount))]
    pub async fn deposit(
        &self,
        number: &AccountNumber,
        request: TradeRequest,
    ) -> Result<Trade, LedgerError> {
        self.post(number, TradeCode::Deposit, request).await
    }

    /// Withdraws `request.amount`, returning the new trade.
    ///
    /// # Errors
    ///
    /// `InsufficientBalance` if the amount exceeds the current balance.
    #[instrument(skip(self, request), fields(account = %number, trade_date = %request.trade_date, amount = %request.amount))]
    pub async fn withdraw(
        &self,
        number: &AccountNumber,
        request: TradeRequest,
    ) -> Result<Trade, LedgerError> {
        self.post(number, TradeCode::Withdraw, request).await
    }

    async fn post(
        &self,
        number: &AccountNumber,
        code: TradeCode,
        request: TradeRequest,
    ) -> Result<Trade, LedgerError> {
        let trade = async {
            if !request.amount.is_positive() {
                return Err(LedgerError::InvalidAmount(request.amount));
            }
            let id = self.resolve(number).await?;
            self.store
                .append_trade(id, code, request.trade_date, request.amount)
                .await
        }
        .await
        .inspect_err(log_failure)?;

        info!(
            sequence = trade.sequence,
            balance_after = %trade.balance_after,
            "{} posted",
            code
        );
        Ok(trade)
    }

    /// Accrues interest over `(last_interest_date, to_date]` and posts it as
    /// one INTEREST trade plus its interest record.
    ///
    /// # Errors
    ///
    /// - `NoAccrualPeriod` if `to_date` is not after the last interest date
    /// - `AccrualAfterPosting` if `to_date` is after `trade_date`
    #[instrument(skip(self, request), fields(account = %number, to_date = %request.to_date, trade_date = %request.trade_date))]
    pub async fn pay_interest(
        &self,
        number: &AccountNumber,
        request: PayInterestRequest,
    ) -> Result<Trade, LedgerError> {
        let (trade, interest) = self
            .accrue_and_post(number, request)
            .await
            .inspect_err(log_failure)?;

        info!(
            sequence = trade.sequence,
            from_date = %interest.from_date,
            accrued = %interest.accrued,
            amount = %interest.amount,
            balance_after = %trade.balance_after,
            "Interest posted"
        );
        Ok(trade)
    }

    async fn accrue_and_post(
        &self,
        number: &AccountNumber,
        request: PayInterestRequest,
    ) -> Result<(Trade, Interest), LedgerError> {
        let PayInterestRequest {
            to_date,
            trade_date,
        } = request;

        let id = self.resolve(number).await?;
        let account = self
            .store
            .account(id)
            .await?
            .ok_or_else(|| LedgerError::AccountNotFound(number.to_string()))?;
        account.ensure_active()?;
        let basic_rate = self.product(&account.product_code).await?.basic_rate;
        let calculator = self.calculator;

        // The window check in `accrue` runs before the posting-date check in
        // `post_interest`.
        self.store
            .update(id, move |ledger| {
                ledger.account().ensure_active()?;
                let accrual = calculator.accrue(
                    ledger.trades(),
                    basic_rate,
                    ledger.account().last_interest_date,
                    to_date,
                )?;
                ledger.post_interest(accrual, trade_date)
            })
            .await
    }

    /// Closes an account whose balance is zero, returning the closed header.
    ///
    /// # Errors
    ///
    /// `NonZeroBalance` if funds remain.
    #[instrument(skip(self, request), fields(account = %number, close_date = %request.close_date))]
    pub async fn close_account(
        &self,
        number: &AccountNumber,
        request: CloseAccountRequest,
    ) -> Result<Account, LedgerError> {
        let account = async {
            let id = self.resolve(number).await?;
            self.store
                .update(id, move |ledger| {
                    ledger.close(request.close_date)?;
                    Ok(ledger.account().clone())
                })
                .await
        }
        .await
        .inspect_err(log_failure)?;

        info!("Account closed");
        Ok(account)
    }

    /// Reads the account header.
    pub async fn account(&self, number: &AccountNumber) -> Result<Account, LedgerError> {
        let id = self.resolve(number).await?;
        self.store
            .account(id)
            .await?
            .ok_or_else(|| LedgerError::AccountNotFound(number.to_string()))
    }

    /// Reads the trade history in sequence order.
    pub async fn trades(&self, number: &AccountNumber) -> Result<Vec<Trade>, LedgerError> {
        Ok(self.snapshot(number).await?.trades().to_vec())
    }

    /// Reads the interest postings in posting order.
    pub async fn interests(&self, number: &AccountNumber) -> Result<Vec<Interest>, LedgerError> {
        Ok(self.snapshot(number).await?.interests().to_vec())
    }

    /// Balance at the end of `date`.
    pub async fn balance_as_of(
        &self,
        number: &AccountNumber,
        date: BizDate,
    ) -> Result<Money, LedgerError> {
        Ok(self.snapshot(number).await?.balance_as_of(date))
    }
}
