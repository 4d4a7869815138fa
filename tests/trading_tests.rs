mod common;

use rust_decimal::Decimal;

use zerex_carbon::db::{credit_repo, transaction_repo, wallet_repo};
use zerex_carbon::models::Transaction;
use zerex_carbon::services::trading::{self, TradeError};

fn dec(n: i64) -> Decimal {
    Decimal::from(n)
}

#[tokio::test]
async fn test_full_purchase_transfers_ownership() {
    let db = common::setup_test_db().await;
    let pool = db.pool.clone();

    let (seller, _) = common::seed_user(&pool, "seller@example.com", "seller", dec(0)).await;
    let (buyer, _) = common::seed_user(&pool, "buyer@example.com", "buyer", dec(1500)).await;
    let credit = common::seed_credit(&pool, seller.id, dec(100), dec(100), dec(10)).await;

    let outcome = trading::buy_credit(&pool, buyer.id, credit.id, dec(100))
        .await
        .expect("purchase should succeed");

    assert_eq!(outcome.acquired.id, credit.id);
    assert_eq!(outcome.acquired.status, "SOLD");
    assert_eq!(outcome.acquired.owner_id, Some(buyer.id));
    assert_eq!(outcome.buyer_wallet.balance, dec(500));
    assert_eq!(outcome.transaction.tx_type, "BUY");
    assert_eq!(outcome.transaction.status, "COMPLETED");
    assert_eq!(outcome.transaction.total, dec(1000));
}

#[tokio::test]
async fn test_partial_purchase_splits_credit() {
    let db = common::setup_test_db().await;
    let pool = db.pool.clone();

    // 100 t listed at 10 EUR/t; buyer holds 500 and takes 40
    let (seller, _) = common::seed_user(&pool, "seller@example.com", "seller", dec(0)).await;
    let (buyer, _) = common::seed_user(&pool, "buyer@example.com", "buyer", dec(500)).await;
    let credit = common::seed_credit(&pool, seller.id, dec(100), dec(100), dec(10)).await;

    let outcome = trading::buy_credit(&pool, buyer.id, credit.id, dec(40))
        .await
        .expect("partial purchase should succeed");

    // Buyer gets a new credit row with the purchased slice
    assert_ne!(outcome.acquired.id, credit.id);
    assert_eq!(outcome.acquired.owner_id, Some(buyer.id));
    assert_eq!(outcome.acquired.amount, dec(40));
    assert_eq!(outcome.acquired.co2_reduction, dec(40));

    // Seller keeps the remainder, still available
    let remainder = credit_repo::get_by_id(&pool, credit.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(remainder.amount, dec(60));
    assert_eq!(remainder.co2_reduction, dec(60));
    assert_eq!(remainder.status, "AVAILABLE");
    assert_eq!(remainder.owner_id, Some(seller.id));

    // Reduction is conserved across the split
    assert_eq!(
        remainder.co2_reduction + outcome.acquired.co2_reduction,
        credit.co2_reduction
    );

    // One COMPLETED BUY of 400, buyer balance down to 100
    assert_eq!(outcome.transaction.total, dec(400));
    assert_eq!(outcome.buyer_wallet.balance, dec(100));

    let ledger = transaction_repo::list_by_user(&pool, buyer.id, 10)
        .await
        .unwrap();
    let buys: Vec<&Transaction> = ledger.iter().filter(|t| t.tx_type == "BUY").collect();
    assert_eq!(buys.len(), 1);
    assert_eq!(buys[0].status, "COMPLETED");
}

#[tokio::test]
async fn test_insufficient_funds_mutates_nothing() {
    let db = common::setup_test_db().await;
    let pool = db.pool.clone();

    let (seller, _) = common::seed_user(&pool, "seller@example.com", "seller", dec(0)).await;
    let (buyer, wallet) = common::seed_user(&pool, "buyer@example.com", "buyer", dec(50)).await;
    let credit = common::seed_credit(&pool, seller.id, dec(100), dec(100), dec(10)).await;

    let result = trading::buy_credit(&pool, buyer.id, credit.id, dec(40)).await;
    assert!(matches!(result, Err(TradeError::InsufficientFunds { .. })));

    // No rows changed
    let wallet_after = wallet_repo::get_by_user(&pool, buyer.id).await.unwrap().unwrap();
    assert_eq!(wallet_after.id, wallet.id);
    assert_eq!(wallet_after.balance, dec(50));

    let credit_after = credit_repo::get_by_id(&pool, credit.id).await.unwrap().unwrap();
    assert_eq!(credit_after.amount, dec(100));
    assert_eq!(credit_after.status, "AVAILABLE");

    let ledger = transaction_repo::list_by_user(&pool, buyer.id, 10).await.unwrap();
    assert!(ledger.is_empty());
}

#[tokio::test]
async fn test_insufficient_supply_rejected() {
    let db = common::setup_test_db().await;
    let pool = db.pool.clone();

    let (seller, _) = common::seed_user(&pool, "seller@example.com", "seller", dec(0)).await;
    let (buyer, _) = common::seed_user(&pool, "buyer@example.com", "buyer", dec(10_000)).await;
    let credit = common::seed_credit(&pool, seller.id, dec(100), dec(100), dec(10)).await;

    let result = trading::buy_credit(&pool, buyer.id, credit.id, dec(150)).await;
    assert!(matches!(result, Err(TradeError::InsufficientSupply { .. })));
}

#[tokio::test]
async fn test_sold_credit_not_purchasable() {
    let db = common::setup_test_db().await;
    let pool = db.pool.clone();

    let (seller, _) = common::seed_user(&pool, "seller@example.com", "seller", dec(0)).await;
    let (buyer, _) = common::seed_user(&pool, "buyer@example.com", "buyer", dec(5000)).await;
    let (second, _) = common::seed_user(&pool, "second@example.com", "second", dec(5000)).await;
    let credit = common::seed_credit(&pool, seller.id, dec(100), dec(100), dec(10)).await;

    trading::buy_credit(&pool, buyer.id, credit.id, dec(100))
        .await
        .expect("first purchase succeeds");

    let result = trading::buy_credit(&pool, second.id, credit.id, dec(100)).await;
    assert!(matches!(result, Err(TradeError::InvalidState)));
}

#[tokio::test]
async fn test_self_purchase_rejected() {
    let db = common::setup_test_db().await;
    let pool = db.pool.clone();

    let (seller, _) = common::seed_user(&pool, "seller@example.com", "seller", dec(5000)).await;
    let credit = common::seed_credit(&pool, seller.id, dec(100), dec(100), dec(10)).await;

    let result = trading::buy_credit(&pool, seller.id, credit.id, dec(10)).await;
    assert!(matches!(result, Err(TradeError::SelfPurchase)));
}

#[tokio::test]
async fn test_deposit_writes_wallet_and_ledger_together() {
    let db = common::setup_test_db().await;
    let pool = db.pool.clone();

    let (user, _) = common::seed_user(&pool, "user@example.com", "user", dec(0)).await;

    let (wallet, ledger) = trading::deposit(&pool, user.id, dec(250))
        .await
        .expect("deposit should succeed");

    assert_eq!(wallet.balance, dec(250));
    assert_eq!(ledger.tx_type, "DEPOSIT");
    assert_eq!(ledger.status, "COMPLETED");
    assert_eq!(ledger.total, dec(250));
}

#[tokio::test]
async fn test_withdrawal_insufficient_balance_writes_nothing() {
    let db = common::setup_test_db().await;
    let pool = db.pool.clone();

    let (user, _) = common::seed_user(&pool, "user@example.com", "user", dec(30)).await;

    let result = trading::withdraw(&pool, user.id, dec(40)).await;
    assert!(matches!(result, Err(TradeError::InsufficientFunds { .. })));

    let wallet = wallet_repo::get_by_user(&pool, user.id).await.unwrap().unwrap();
    assert_eq!(wallet.balance, dec(30));

    let ledger = transaction_repo::list_by_user(&pool, user.id, 10).await.unwrap();
    assert!(ledger.is_empty());
}

#[tokio::test]
async fn test_withdrawal_is_pending_until_settled() {
    let db = common::setup_test_db().await;
    let pool = db.pool.clone();

    let (user, _) = common::seed_user(&pool, "user@example.com", "user", dec(100)).await;

    let (wallet, ledger) = trading::withdraw(&pool, user.id, dec(40))
        .await
        .expect("withdrawal should succeed");

    assert_eq!(wallet.balance, dec(60));
    assert_eq!(ledger.tx_type, "WITHDRAWAL");
    assert_eq!(ledger.status, "PENDING");

    let settled = trading::settle_withdrawal(&pool, ledger.id, true)
        .await
        .expect("settlement should succeed");
    assert_eq!(settled.status, "COMPLETED");

    // A settled withdrawal cannot be settled twice
    let again = trading::settle_withdrawal(&pool, ledger.id, true).await;
    assert!(matches!(again, Err(TradeError::NotSettleable)));
}

#[tokio::test]
async fn test_cancelled_withdrawal_recredits_wallet() {
    let db = common::setup_test_db().await;
    let pool = db.pool.clone();

    let (user, _) = common::seed_user(&pool, "user@example.com", "user", dec(100)).await;

    let (_, ledger) = trading::withdraw(&pool, user.id, dec(40))
        .await
        .expect("withdrawal should succeed");

    let cancelled = trading::settle_withdrawal(&pool, ledger.id, false)
        .await
        .expect("cancellation should succeed");
    assert_eq!(cancelled.status, "CANCELLED");

    let wallet = wallet_repo::get_by_user(&pool, user.id).await.unwrap().unwrap();
    assert_eq!(wallet.balance, dec(100));
}

#[tokio::test]
async fn test_retire_credit_owner_only() {
    let db = common::setup_test_db().await;
    let pool = db.pool.clone();

    let (owner, _) = common::seed_user(&pool, "owner@example.com", "owner", dec(0)).await;
    let (other, _) = common::seed_user(&pool, "other@example.com", "other", dec(0)).await;
    let credit = common::seed_credit(&pool, owner.id, dec(100), dec(100), dec(10)).await;

    let result = trading::retire_credit(&pool, other.id, credit.id).await;
    assert!(matches!(result, Err(TradeError::NotOwner)));

    let retired = trading::retire_credit(&pool, owner.id, credit.id)
        .await
        .expect("owner can retire");
    assert_eq!(retired.status, "RETIRED");

    // Retired credits cannot be retired again
    let again = trading::retire_credit(&pool, owner.id, credit.id).await;
    assert!(matches!(again, Err(TradeError::InvalidState)));
}
