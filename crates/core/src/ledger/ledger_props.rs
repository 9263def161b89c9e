//! Property-based tests for the account ledger.
//!
//! - Property 1: Balance chain integrity
//! - Property 2: Failed operations leave no trace
//! - Property 3: Balance-as-of agrees with a linear scan

use openbank_shared::types::Money;
use proptest::prelude::*;

use super::account::{Account, AccountNumber, TaxationCode};
use super::aggregate::AccountLedger;
use super::error::LedgerError;
use super::trade::{TradeCode, balance_as_of};
use crate::calendar::BizDate;
use crate::product::{ProductCode, SubjectCode};

/// One requested movement: kind, days after the previous trade, amount.
type Op = (TradeCode, i64, i64);

/// Strategy to generate movement kinds.
fn movement_code() -> impl Strategy<Value = TradeCode> {
    prop_oneof![
        Just(TradeCode::Deposit),
        Just(TradeCode::Withdraw),
        Just(TradeCode::Interest),
    ]
}

/// Strategy to generate sequences of movements.
fn ops() -> impl Strategy<Value = Vec<Op>> {
    prop::collection::vec((movement_code(), 0i64..40, 0i64..2_000_000), 1..40)
}

fn opened(reg_date: BizDate) -> AccountLedger {
    let account = Account::new(
        AccountNumber::compose(SubjectCode::Regular, 1).unwrap(),
        ProductCode::parse("130999").unwrap(),
        reg_date,
        TaxationCode::Regular,
    )
    .unwrap();
    AccountLedger::open(account).unwrap()
}

/// Applies `ops`, ignoring rejected ones.
fn replay(ops: &[Op]) -> AccountLedger {
    let mut date = BizDate::parse("20170101").unwrap();
    let mut ledger = opened(date);

    for &(code, gap, amount) in ops {
        date = date.add_days(gap).unwrap();
        let _ = ledger.append_trade(code, date, Money::new(amount));
    }
    ledger
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // =========================================================================
    // Property 1: Balance chain integrity
    // =========================================================================

    /// Property 1.1: Sequences are 1..=N and every trade starts from the
    /// balance the previous one ended on.
    #[test]
    fn prop_balance_chain_holds(ops in ops()) {
        let ledger = replay(&ops);
        let trades = ledger.trades();

        for (idx, trade) in trades.iter().enumerate() {
            prop_assert_eq!(trade.sequence, idx as u64 + 1);
            prop_assert!(!trade.balance_after.is_negative());
        }
        for pair in trades.windows(2) {
            prop_assert_eq!(pair[1].balance_before, pair[0].balance_after);
            prop_assert!(pair[1].trade_date >= pair[0].trade_date);
        }

        prop_assert_eq!(ledger.balance(), trades[trades.len() - 1].balance_after);
        prop_assert!(ledger.verify().is_ok());
    }

    /// Property 1.2: The balance equals deposits plus interest minus
    /// withdrawals.
    #[test]
    fn prop_balance_is_sum_of_movements(ops in ops()) {
        let ledger = replay(&ops);

        let net: i64 = ledger
            .trades()
            .iter()
            .map(|t| match t.code {
                TradeCode::Open => 0,
                TradeCode::Deposit | TradeCode::Interest => t.amount.minor_units(),
                TradeCode::Withdraw => -t.amount.minor_units(),
            })
            .sum();

        prop_assert_eq!(ledger.balance(), Money::new(net));
    }

    // =========================================================================
    // Property 2: Failed operations leave no trace
    // =========================================================================

    /// Property 2.1: Overdrawing withdrawals are rejected without changes.
    #[test]
    fn prop_overdraw_rejected(ops in ops(), excess in 1i64..1_000_000) {
        let mut ledger = replay(&ops);
        let before = ledger.clone();
        let date = ledger.account().last_trade_date;
        let amount = Money::new(ledger.balance().minor_units() + excess);

        let result = ledger.append_trade(TradeCode::Withdraw, date, amount);

        let is_insufficient = matches!(result, Err(LedgerError::InsufficientBalance { .. }));
        prop_assert!(is_insufficient);
        prop_assert_eq!(ledger, before);
    }

    // =========================================================================
    // Property 3: Balance-as-of agrees with a linear scan
    // =========================================================================

    /// Property 3.1: Binary search finds the last trade on or before a date.
    #[test]
    fn prop_balance_as_of_matches_scan(ops in ops(), probe in -5i64..2_000) {
        let ledger = replay(&ops);
        let date = BizDate::parse("20170101").unwrap().add_days(probe).unwrap();

        let expected = ledger
            .trades()
            .iter()
            .filter(|t| t.trade_date <= date)
            .last()
            .map_or(Money::ZERO, |t| t.balance_after);

        prop_assert_eq!(balance_as_of(ledger.trades(), date), expected);
        prop_assert_eq!(ledger.balance_as_of(date), expected);
    }
}
