//! Ledger chain, reconciliation and cash movement behaviour.

mod common;

use bourse_core::{AccountId, LedgerEntryType, OrderStatus, Side};
use bourse_settlement::OPENING_BALANCE;
use common::{INFY, harness, market};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

mod cash_movements {
    use super::*;

    #[tokio::test]
    async fn test_opening_balance_is_first_ledger_entry() {
        let h = harness(dec!(100000.00)).await;

        let ledger = h.bourse.queries().ledger(h.account_id).await.unwrap();
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger[0].entry_type, LedgerEntryType::Credit);
        assert_eq!(ledger[0].description, OPENING_BALANCE);
        assert_eq!(ledger[0].balance_after, dec!(100000.00));
        assert!(ledger[0].reference.starts_with("CASH-"));
    }

    #[tokio::test]
    async fn test_deposit_and_withdraw() {
        let h = harness(dec!(1000.00)).await;

        let deposit = h
            .bourse
            .deposit(h.account_id, dec!(250.50), "top up")
            .await
            .unwrap();
        assert_eq!(deposit.balance_after, dec!(1250.50));

        let withdrawal = h
            .bourse
            .withdraw(h.account_id, dec!(1250.50), "payout")
            .await
            .unwrap();
        assert_eq!(withdrawal.entry_type, LedgerEntryType::Debit);
        assert_eq!(withdrawal.balance_after, Decimal::ZERO);
        assert_ne!(deposit.reference, withdrawal.reference);
    }

    #[tokio::test]
    async fn test_withdrawal_cannot_overdraw() {
        let h = harness(dec!(100.00)).await;

        let err = h
            .bourse
            .withdraw(h.account_id, dec!(100.01), "too much")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "INSUFFICIENT_FUNDS");

        let account = h.bourse.queries().account(h.account_id).await.unwrap();
        assert_eq!(account.balance, dec!(100.00));
        assert_eq!(h.bourse.queries().ledger(h.account_id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_non_positive_amounts_are_invalid() {
        let h = harness(dec!(100.00)).await;
        for amount in [Decimal::ZERO, dec!(-5), dec!(0.001)] {
            let err = h.bourse.deposit(h.account_id, amount, "bad").await.unwrap_err();
            assert_eq!(err.kind(), "VALIDATION");
        }
    }

    #[tokio::test]
    async fn test_unknown_account() {
        let h = harness(dec!(100.00)).await;
        let err = h
            .bourse
            .deposit(AccountId::new(99), dec!(1.00), "nobody")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "NOT_FOUND");
    }
}

mod reconciliation {
    use super::*;

    #[tokio::test]
    async fn test_holds_after_fills_and_cash_movements() {
        let h = harness(dec!(100000.00)).await;

        h.bourse.submit_order(market(Side::Buy, dec!(50))).await.unwrap();
        h.bourse.deposit(h.account_id, dec!(1234.56), "top up").await.unwrap();
        h.bourse.set_price(INFY, dec!(512.35)).await.unwrap();
        h.bourse.submit_order(market(Side::Sell, dec!(30))).await.unwrap();
        h.bourse.withdraw(h.account_id, dec!(99.99), "fees").await.unwrap();
        h.bourse.submit_order(market(Side::Buy, dec!(10))).await.unwrap();

        let report = h.bourse.queries().reconcile_ledger(h.account_id).await.unwrap();
        assert!(report.consistent, "{report:?}");
        assert_eq!(report.entry_count, 6);
        assert_eq!(report.ledger_balance, report.balance);
        assert!(report.error.is_none());
    }

    #[tokio::test]
    async fn test_rejected_orders_leave_no_ledger_trace() {
        let h = harness(dec!(100000.00)).await;
        h.bourse.clear_price(INFY);
        let result = h
            .bourse
            .submit_order(common::limit(Side::Buy, dec!(10), dec!(500.00)))
            .await
            .unwrap();
        assert_eq!(result.order.status, OrderStatus::Rejected);

        let report = h.bourse.queries().reconcile_ledger(h.account_id).await.unwrap();
        assert!(report.consistent);
        assert_eq!(report.entry_count, 1);
    }
}

mod concurrency {
    use super::*;
    use std::sync::Arc;

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_orders_on_one_account_keep_the_chain() {
        let h = harness(dec!(1000000.00)).await;

        let mut handles = Vec::new();
        for _ in 0..20 {
            let bourse = Arc::clone(&h.bourse);
            handles.push(tokio::spawn(async move {
                bourse.submit_order(market(Side::Buy, dec!(10))).await
            }));
        }
        for handle in handles {
            let result = handle.await.unwrap().unwrap();
            assert_eq!(result.order.status, OrderStatus::Filled);
        }

        let ledger = h.bourse.queries().ledger(h.account_id).await.unwrap();
        assert_eq!(ledger.len(), 21);
        for pair in ledger.windows(2) {
            assert_eq!(
                pair[0].balance_after + pair[1].signed_amount(),
                pair[1].balance_after
            );
        }

        // 20 fills of 10 @ 500.00 plus 25.00 fee each
        let account = h.bourse.queries().account(h.account_id).await.unwrap();
        assert_eq!(account.balance, dec!(1000000.00) - dec!(20) * dec!(5025.00));
        assert_eq!(account.version, 21);

        let position = &h.bourse.queries().positions(h.account_id).await.unwrap()[0];
        assert_eq!(position.quantity, dec!(200));
        assert_eq!(position.avg_cost, dec!(500.00));

        let report = h.bourse.queries().reconcile_ledger(h.account_id).await.unwrap();
        assert!(report.consistent);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_deposits_and_orders() {
        let h = harness(dec!(100000.00)).await;

        let mut handles = Vec::new();
        for i in 0..10 {
            let bourse = Arc::clone(&h.bourse);
            let account_id = h.account_id;
            handles.push(tokio::spawn(async move {
                if i % 2 == 0 {
                    bourse.deposit(account_id, dec!(100.00), "top up").await.map(|_| ())
                } else {
                    bourse
                        .submit_order(market(Side::Buy, dec!(10)))
                        .await
                        .map(|_| ())
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let report = h.bourse.queries().reconcile_ledger(h.account_id).await.unwrap();
        assert!(report.consistent);
        assert_eq!(report.entry_count, 11);
        // +5 * 100.00 - 5 * 5025.00
        assert_eq!(report.balance, dec!(75375.00));
    }
}
