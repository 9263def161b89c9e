//! Shared fixtures for store integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use openbank_core::account::{AccountService, OpenAccountRequest, PayInterestRequest, TradeRequest};
use openbank_core::calendar::BizDate;
use openbank_core::ledger::{AccountNumber, LedgerStore, TaxationCode};
use openbank_core::product::ProductCode;
use openbank_shared::types::{Money, RoundingPolicy};
use openbank_store::{MemoryLedgerStore, MemoryProductCatalog};

pub type Service = AccountService<MemoryLedgerStore, MemoryProductCatalog>;

pub const REGULAR_PRODUCT: &str = "130999";

pub fn d(s: &str) -> BizDate {
    BizDate::parse(s).unwrap()
}

/// Service over an empty store and the standard catalog valid from 2000.
pub fn service() -> Service {
    AccountService::new(
        Arc::new(MemoryLedgerStore::default()),
        Arc::new(MemoryProductCatalog::seeded(d("20000101")).unwrap()),
        RoundingPolicy::Ceiling,
    )
}

pub fn open_request(product_code: &str, reg_date: &str) -> OpenAccountRequest {
    OpenAccountRequest {
        product_code: ProductCode::parse(product_code).unwrap(),
        reg_date: d(reg_date),
        taxation_code: TaxationCode::Regular,
    }
}

pub fn trade(date: &str, amount: i64) -> TradeRequest {
    TradeRequest {
        trade_date: d(date),
        amount: Money::new(amount),
    }
}

pub fn interest(to_date: &str, trade_date: &str) -> PayInterestRequest {
    PayInterestRequest {
        to_date: d(to_date),
        trade_date: d(trade_date),
    }
}

/// Opens a regular account and returns its number.
pub async fn open(service: &Service, reg_date: &str) -> AccountNumber {
    let id = service
        .open_regular_account(open_request(REGULAR_PRODUCT, reg_date))
        .await
        .unwrap();
    service.store().account(id).await.unwrap().unwrap().number
}

/// Account opened 2017-01-01 with deposits of 1,000,000 / 30,000 / 500,000
/// on the first day of 2017, 2018 and 2019.
pub async fn three_year_account(service: &Service) -> AccountNumber {
    let number = open(service, "20170101").await;
    service.deposit(&number, trade("20170101", 1_000_000)).await.unwrap();
    service.deposit(&number, trade("20180101", 30_000)).await.unwrap();
    service.deposit(&number, trade("20190101", 500_000)).await.unwrap();
    number
}
