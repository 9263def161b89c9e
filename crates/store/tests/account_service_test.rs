//! Account lifecycle tests against the in-memory store.
//!
//! Covers opening, password changes, deposits, withdrawals, closing and the
//! rejection paths that must leave the ledger untouched.

mod common;

use common::{REGULAR_PRODUCT, d, open, open_request, service, trade};
use openbank_core::account::{CloseAccountRequest, SetPasswordRequest};
use openbank_core::calendar::BizDate;
use openbank_core::ledger::{
    AccountNumber, AccountStatus, ErrorKind, LedgerError, LedgerStore, TaxationCode, TradeCode,
};
use openbank_core::product::{NewProduct, ProductCode, ProductError, SubjectCode};
use openbank_shared::AppError;
use openbank_shared::types::Money;
use rust_decimal_macros::dec;

#[tokio::test]
async fn test_open_account_with_reckon_date() {
    let service = service();

    let id = service
        .open_regular_account(open_request(REGULAR_PRODUCT, "20101010"))
        .await
        .unwrap();
    let account = service.store().account(id).await.unwrap().unwrap();

    assert!(account.number.as_str().contains("1310000"));
    assert_eq!(account.reg_date, d("20101010"));
    assert_eq!(account.reckon_date, d("20101010"));
    assert_eq!(account.last_interest_date, d("20101009"));
    assert_eq!(account.taxation_code, TaxationCode::Regular);
    assert_eq!(account.balance, Money::ZERO);
    assert_eq!(account.status, AccountStatus::Active);

    let trades = service.trades(&account.number).await.unwrap();
    assert_eq!(trades.len(), 1);
    assert_eq!(trades[0].sequence, 1);
    assert_eq!(trades[0].code, TradeCode::Open);
    assert_eq!(trades[0].balance_before, Money::ZERO);
    assert_eq!(trades[0].balance_after, Money::ZERO);
}

#[tokio::test]
async fn test_open_account_today() {
    let service = service();
    let today = BizDate::today();

    let number = open(&service, &today.to_string()).await;
    let account = service.account(&number).await.unwrap();

    assert_eq!(account.reg_date, today);
    assert_eq!(account.last_interest_date, today.add_days(-1).unwrap());
}

#[tokio::test]
async fn test_account_numbers_are_unique_per_subject() {
    let service = service();

    let first = open(&service, "20191214").await;
    let second = open(&service, "20191214").await;

    assert_eq!(first.as_str(), "13100000001");
    assert_eq!(second.as_str(), "13100000002");
}

#[tokio::test]
async fn test_open_rejects_unknown_or_inactive_product() {
    let service = service();

    let err = service
        .open_regular_account(open_request("999999", "20191214"))
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::ProductNotFound(_)));
    assert_eq!(err.kind(), ErrorKind::BusinessRule);
    assert!(matches!(AppError::from(err), AppError::NotFound(_)));

    let err = service
        .open_regular_account(open_request(REGULAR_PRODUCT, "19991231"))
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::ProductNotActive { .. }));

    assert_eq!(service.store().len(), 0);
}

#[tokio::test]
async fn test_open_rejects_non_regular_product() {
    let service = service();

    let err = service
        .open_regular_account(open_request("140001", "20191214"))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        LedgerError::ProductSubjectMismatch {
            subject: SubjectCode::FixedDeposit,
            expected: SubjectCode::Regular,
            ..
        }
    ));
}

#[tokio::test]
async fn test_created_product_validity_window() {
    let service = service();
    let product = service
        .create_product(NewProduct {
            code: ProductCode::parse("130500").unwrap(),
            subject: SubjectCode::Regular,
            name: "Online Regular Savings 2019".to_string(),
            basic_rate: dec!(1.5),
            start_date: d("20191214"),
            end_date: Some(d("20201231")),
        })
        .await
        .unwrap();
    assert_eq!(product.end_date, d("20201231"));

    assert!(
        service
            .open_regular_account(open_request("130500", "20191214"))
            .await
            .is_ok()
    );
    assert!(matches!(
        service
            .open_regular_account(open_request("130500", "20210101"))
            .await,
        Err(LedgerError::ProductNotActive { .. })
    ));
}

#[tokio::test]
async fn test_create_product_validation() {
    let service = service();
    let new_product = |code: &str, rate| NewProduct {
        code: ProductCode::parse(code).unwrap(),
        subject: SubjectCode::Regular,
        name: "Savings".to_string(),
        basic_rate: rate,
        start_date: d("20200101"),
        end_date: None,
    };

    assert!(matches!(
        service.create_product(new_product("130999", dec!(1.0))).await,
        Err(LedgerError::Product(ProductError::DuplicateCode(_)))
    ));
    assert!(matches!(
        service.create_product(new_product("130777", dec!(-0.1))).await,
        Err(LedgerError::Product(ProductError::NegativeRate(_)))
    ));
}

#[tokio::test]
async fn test_rejected_open_does_not_consume_number() {
    let service = service();
    service
        .create_product(NewProduct {
            code: ProductCode::parse("130001").unwrap(),
            subject: SubjectCode::Regular,
            name: "Founding Savings".to_string(),
            basic_rate: dec!(1.0),
            start_date: d("00010101"),
            end_date: None,
        })
        .await
        .unwrap();

    let err = service
        .open_regular_account(open_request("130001", "00010101"))
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::InvalidDate(_)));
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(service.store().is_empty());

    let number = open(&service, "20200101").await;
    assert_eq!(number.as_str(), "13100000001");
}

#[tokio::test]
async fn test_set_password() {
    let service = service();
    let number = open(&service, "20191214").await;

    service
        .set_password(
            &number,
            SetPasswordRequest {
                new_password: "1234".to_string(),
            },
        )
        .await
        .unwrap();

    let account = service.account(&number).await.unwrap();
    assert!(account.password_hash.as_deref().is_some_and(|h| h.starts_with("$argon2id$")));
    assert_eq!(account.balance, Money::ZERO);
    assert_eq!(account.last_interest_date, d("20191213"));
    assert!(service.verify_password(&number, "1234").await.unwrap());
    assert!(!service.verify_password(&number, "4321").await.unwrap());

    // The latest password wins.
    service
        .set_password(
            &number,
            SetPasswordRequest {
                new_password: "5678".to_string(),
            },
        )
        .await
        .unwrap();
    assert!(service.verify_password(&number, "5678").await.unwrap());
    assert!(!service.verify_password(&number, "1234").await.unwrap());
    assert_eq!(service.trades(&number).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_password_errors() {
    let service = service();
    let number = open(&service, "20191214").await;

    assert!(!service.verify_password(&number, "1234").await.unwrap());
    assert!(matches!(
        service
            .set_password(
                &number,
                SetPasswordRequest {
                    new_password: String::new(),
                },
            )
            .await,
        Err(LedgerError::InvalidPassword(_))
    ));

    let missing = AccountNumber::parse("13199999999").unwrap();
    assert!(matches!(
        service
            .set_password(
                &missing,
                SetPasswordRequest {
                    new_password: "1234".to_string(),
                },
            )
            .await,
        Err(LedgerError::AccountNotFound(_))
    ));
}

#[tokio::test]
async fn test_deposits() {
    let service = service();
    let number = open(&service, "20191214").await;

    let t1 = service.deposit(&number, trade("20191214", 30_000)).await.unwrap();
    let t2 = service.deposit(&number, trade("20191214", 200_000)).await.unwrap();
    let t3 = service.deposit(&number, trade("20191214", 1_000_000)).await.unwrap();

    assert_eq!((t1.sequence, t2.sequence, t3.sequence), (2, 3, 4));
    assert_eq!(t1.balance_after, Money::new(30_000));
    assert_eq!(t2.balance_after, Money::new(230_000));
    assert_eq!(t3.balance_after, Money::new(1_230_000));

    let account = service.account(&number).await.unwrap();
    assert_eq!(account.balance, Money::new(1_230_000));
    assert_eq!(account.last_trade_date, d("20191214"));

    let trades = service.trades(&number).await.unwrap();
    assert_eq!(trades.len(), 4);
    assert_eq!(trades[1].code, TradeCode::Deposit);
    assert_eq!(trades[1].balance_before, Money::ZERO);
    assert_eq!(trades[1].amount, Money::new(30_000));
    assert_eq!(trades[2].balance_before, Money::new(30_000));
    assert_eq!(trades[2].amount, Money::new(200_000));
    assert_eq!(trades[3].balance_before, Money::new(230_000));
    assert_eq!(trades[3].amount, Money::new(1_000_000));
}

#[tokio::test]
async fn test_withdrawals() {
    let service = service();
    let number = open(&service, "20191214").await;

    let t1 = service.deposit(&number, trade("20191214", 1_000_000)).await.unwrap();
    let t2 = service.withdraw(&number, trade("20191214", 30_000)).await.unwrap();
    let t3 = service.withdraw(&number, trade("20191214", 970_000)).await.unwrap();

    assert_eq!(t1.balance_after, Money::new(1_000_000));
    assert_eq!(t2.code, TradeCode::Withdraw);
    assert_eq!(t2.balance_before, Money::new(1_000_000));
    assert_eq!(t2.balance_after, Money::new(970_000));
    assert_eq!(t3.balance_before, Money::new(970_000));
    assert_eq!(t3.balance_after, Money::ZERO);

    let account = service.account(&number).await.unwrap();
    assert_eq!(account.balance, Money::ZERO);
    assert_eq!(service.trades(&number).await.unwrap().len(), 4);
}

#[tokio::test]
async fn test_withdraw_beyond_balance() {
    let service = service();
    let number = open(&service, "20191214").await;
    service.deposit(&number, trade("20191214", 1_000_000)).await.unwrap();

    let err = service
        .withdraw(&number, trade("20191214", 1_000_001))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        LedgerError::InsufficientBalance { balance, requested }
            if balance == Money::new(1_000_000) && requested == Money::new(1_000_001)
    ));
    assert_eq!(err.kind(), ErrorKind::BusinessRule);
    assert!(matches!(AppError::from(err), AppError::BusinessRule(_)));

    let account = service.account(&number).await.unwrap();
    assert_eq!(account.balance, Money::new(1_000_000));
    assert_eq!(service.trades(&number).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_invalid_amounts_rejected() {
    let service = service();
    let number = open(&service, "20191214").await;

    for amount in [0, -1] {
        let err = service
            .deposit(&number, trade("20191214", amount))
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::InvalidAmount(_)));
        assert_eq!(err.kind(), ErrorKind::Validation);

        assert!(matches!(
            service.withdraw(&number, trade("20191214", amount)).await,
            Err(LedgerError::InvalidAmount(_))
        ));
    }
    assert_eq!(service.trades(&number).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_unknown_account() {
    let service = service();
    let missing = AccountNumber::parse("13100000042").unwrap();

    assert!(matches!(
        service.deposit(&missing, trade("20191214", 10)).await,
        Err(LedgerError::AccountNotFound(_))
    ));
    assert!(matches!(
        service.account(&missing).await,
        Err(LedgerError::AccountNotFound(_))
    ));
}

#[tokio::test]
async fn test_backdated_trade_rejected() {
    let service = service();
    let number = open(&service, "20170101").await;
    service.deposit(&number, trade("20180101", 10_000)).await.unwrap();

    assert!(matches!(
        service.deposit(&number, trade("20171231", 10_000)).await,
        Err(LedgerError::BackdatedTrade { .. })
    ));
    assert!(matches!(
        service.deposit(&number, trade("20161231", 10_000)).await,
        Err(LedgerError::BackdatedTrade { .. })
    ));
    assert_eq!(service.trades(&number).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_balance_as_of() {
    let service = service();
    let number = common::three_year_account(&service).await;

    let expected = [
        ("20161231", 0),
        ("20170615", 1_000_000),
        ("20180101", 1_030_000),
        ("20300101", 1_530_000),
    ];
    for (date, balance) in expected {
        assert_eq!(
            service.balance_as_of(&number, d(date)).await.unwrap(),
            Money::new(balance)
        );
    }
}

#[tokio::test]
async fn test_close_account() {
    let service = service();
    let number = open(&service, "20191214").await;
    service.deposit(&number, trade("20191214", 5_000)).await.unwrap();

    let close = |date| CloseAccountRequest {
        close_date: d(date),
    };

    assert!(matches!(
        service.close_account(&number, close("20191215")).await,
        Err(LedgerError::NonZeroBalance(_))
    ));

    service.withdraw(&number, trade("20191215", 5_000)).await.unwrap();
    let closed = service.close_account(&number, close("20191216")).await.unwrap();

    assert_eq!(closed.status, AccountStatus::Closed);
    assert_eq!(closed.close_date, Some(d("20191216")));

    assert!(matches!(
        service.deposit(&number, trade("20191217", 1)).await,
        Err(LedgerError::AccountClosed(_))
    ));
    assert!(matches!(
        service.close_account(&number, close("20191217")).await,
        Err(LedgerError::AccountClosed(_))
    ));
    assert!(matches!(
        service
            .pay_interest(&number, common::interest("20191216", "20191217"))
            .await,
        Err(LedgerError::AccountClosed(_))
    ));

    // Reads still work on closed accounts.
    assert_eq!(service.trades(&number).await.unwrap().len(), 3);
}
