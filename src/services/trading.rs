use metrics::counter;
use rust_decimal::Decimal;
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use crate::db::{credit_repo, notification_repo, transaction_repo, wallet_repo};
use crate::models::{
    CarbonCredit, CreditStatus, NotificationKind, Transaction, TxStatus, TxType, Wallet,
};

/// Typed failure of a trading flow. Every variant aborts the enclosing
/// database transaction; nothing is mutated on failure.
#[derive(Debug, Error)]
pub enum TradeError {
    #[error("credit not found")]
    CreditNotFound,

    #[error("credit is not available for purchase")]
    InvalidState,

    #[error("cannot buy your own listing")]
    SelfPurchase,

    #[error("requested amount {requested} exceeds remaining supply {remaining}")]
    InsufficientSupply {
        requested: Decimal,
        remaining: Decimal,
    },

    #[error("wallet not found")]
    WalletNotFound,

    #[error("insufficient funds: balance {balance}, required {required}")]
    InsufficientFunds {
        balance: Decimal,
        required: Decimal,
    },

    #[error("amount must be positive")]
    NonPositiveAmount,

    #[error("transaction is not a pending withdrawal")]
    NotSettleable,

    #[error("only the owner can retire a credit")]
    NotOwner,

    #[error(transparent)]
    Db(#[from] sqlx::Error),
}

/// Everything the buy endpoint reports back after the commit.
#[derive(Debug)]
pub struct PurchaseOutcome {
    pub transaction: Transaction,
    /// The credit row now owned by the buyer (the original on a full
    /// purchase, the split row on a partial one).
    pub acquired: CarbonCredit,
    pub buyer_wallet: Wallet,
    pub seller_id: Option<Uuid>,
}

/// The buyer's share of the parent credit's CO2 reduction, prorated by
/// purchased quantity.
pub fn prorate_co2(co2_reduction: Decimal, purchased: Decimal, total: Decimal) -> Decimal {
    if total.is_zero() {
        return Decimal::ZERO;
    }
    co2_reduction * purchased / total
}

/// Atomic credit purchase. Locks the credit and the buyer's wallet, debits
/// the wallet, writes the ledger row, and either transfers the credit whole
/// or splits it. All of it commits or none of it does.
pub async fn buy_credit(
    pool: &PgPool,
    buyer_id: Uuid,
    credit_id: Uuid,
    amount: Decimal,
) -> Result<PurchaseOutcome, TradeError> {
    if amount <= Decimal::ZERO {
        return Err(TradeError::NonPositiveAmount);
    }

    let mut tx = pool.begin().await?;

    let credit = credit_repo::lock_by_id(&mut *tx, credit_id)
        .await?
        .ok_or(TradeError::CreditNotFound)?;

    if credit.status != CreditStatus::Available.as_str() {
        return Err(TradeError::InvalidState);
    }
    if credit.owner_id == Some(buyer_id) {
        return Err(TradeError::SelfPurchase);
    }
    if amount > credit.amount {
        return Err(TradeError::InsufficientSupply {
            requested: amount,
            remaining: credit.amount,
        });
    }

    let wallet = wallet_repo::lock_by_user(&mut *tx, buyer_id)
        .await?
        .ok_or(TradeError::WalletNotFound)?;

    let total = credit.price * amount;
    if wallet.balance < total {
        return Err(TradeError::InsufficientFunds {
            balance: wallet.balance,
            required: total,
        });
    }

    let buyer_wallet = wallet_repo::apply_delta(&mut *tx, wallet.id, -total).await?;

    let ledger = transaction_repo::insert(
        &mut *tx,
        TxType::Buy,
        amount,
        Some(credit.price),
        total,
        TxStatus::Completed,
        buyer_id,
        wallet.id,
        Some(credit.id),
    )
    .await?;

    let acquired = if amount == credit.amount {
        credit_repo::mark_sold(&mut *tx, credit.id, buyer_id).await?
    } else {
        let co2_slice = prorate_co2(credit.co2_reduction, amount, credit.amount);
        credit_repo::decrement_amount(&mut *tx, credit.id, amount, co2_slice).await?;
        credit_repo::insert_split(&mut *tx, &credit, buyer_id, amount, co2_slice).await?
    };

    notification_repo::insert(
        &mut *tx,
        buyer_id,
        &NotificationKind::PurchaseConfirmed {
            credit_id: acquired.id,
            amount,
            total,
        },
    )
    .await?;

    if let Some(seller_id) = credit.owner_id {
        notification_repo::insert(
            &mut *tx,
            seller_id,
            &NotificationKind::CreditSold {
                credit_id: credit.id,
                amount,
                total,
            },
        )
        .await?;
    }

    tx.commit().await?;

    counter!("credits_purchased_total").increment(1);

    tracing::info!(
        buyer = %buyer_id,
        credit = %credit_id,
        amount = %amount,
        total = %total,
        "Credit purchase committed"
    );

    Ok(PurchaseOutcome {
        transaction: ledger,
        acquired,
        buyer_wallet,
        seller_id: credit.owner_id,
    })
}

/// Credit the wallet and write a COMPLETED DEPOSIT ledger row together.
pub async fn deposit(
    pool: &PgPool,
    user_id: Uuid,
    amount: Decimal,
) -> Result<(Wallet, Transaction), TradeError> {
    if amount <= Decimal::ZERO {
        return Err(TradeError::NonPositiveAmount);
    }

    let mut tx = pool.begin().await?;

    let wallet = wallet_repo::lock_by_user(&mut *tx, user_id)
        .await?
        .ok_or(TradeError::WalletNotFound)?;

    let wallet = wallet_repo::apply_delta(&mut *tx, wallet.id, amount).await?;

    let ledger = transaction_repo::insert(
        &mut *tx,
        TxType::Deposit,
        amount,
        None,
        amount,
        TxStatus::Completed,
        user_id,
        wallet.id,
        None,
    )
    .await?;

    notification_repo::insert(
        &mut *tx,
        user_id,
        &NotificationKind::DepositCompleted { amount },
    )
    .await?;

    tx.commit().await?;

    counter!("deposits_total").increment(1);

    Ok((wallet, ledger))
}

/// Debit the wallet and write a PENDING WITHDRAWAL ledger row together.
/// Settlement is manual: an admin later completes or cancels the row.
pub async fn withdraw(
    pool: &PgPool,
    user_id: Uuid,
    amount: Decimal,
) -> Result<(Wallet, Transaction), TradeError> {
    if amount <= Decimal::ZERO {
        return Err(TradeError::NonPositiveAmount);
    }

    let mut tx = pool.begin().await?;

    let wallet = wallet_repo::lock_by_user(&mut *tx, user_id)
        .await?
        .ok_or(TradeError::WalletNotFound)?;

    if wallet.balance < amount {
        return Err(TradeError::InsufficientFunds {
            balance: wallet.balance,
            required: amount,
        });
    }

    let wallet = wallet_repo::apply_delta(&mut *tx, wallet.id, -amount).await?;

    let ledger = transaction_repo::insert(
        &mut *tx,
        TxType::Withdrawal,
        amount,
        None,
        amount,
        TxStatus::Pending,
        user_id,
        wallet.id,
        None,
    )
    .await?;

    notification_repo::insert(
        &mut *tx,
        user_id,
        &NotificationKind::WithdrawalRequested {
            amount,
            transaction_id: ledger.id,
        },
    )
    .await?;

    tx.commit().await?;

    counter!("withdrawals_requested_total").increment(1);

    Ok((wallet, ledger))
}

/// Settle a pending withdrawal. Approval completes the row; rejection
/// cancels it and re-credits the wallet in the same transaction.
pub async fn settle_withdrawal(
    pool: &PgPool,
    transaction_id: Uuid,
    approve: bool,
) -> Result<Transaction, TradeError> {
    let mut tx = pool.begin().await?;

    let ledger = transaction_repo::lock_by_id(&mut *tx, transaction_id)
        .await?
        .ok_or(TradeError::NotSettleable)?;

    if ledger.tx_type != TxType::Withdrawal.as_str()
        || ledger.status != TxStatus::Pending.as_str()
    {
        return Err(TradeError::NotSettleable);
    }

    let status = if approve {
        TxStatus::Completed
    } else {
        wallet_repo::lock_by_id(&mut *tx, ledger.wallet_id)
            .await?
            .ok_or(TradeError::WalletNotFound)?;
        wallet_repo::apply_delta(&mut *tx, ledger.wallet_id, ledger.amount).await?;
        TxStatus::Cancelled
    };

    let updated = transaction_repo::set_status(&mut *tx, ledger.id, status).await?;

    notification_repo::insert(
        &mut *tx,
        ledger.user_id,
        &NotificationKind::WithdrawalSettled {
            transaction_id: ledger.id,
            approved: approve,
        },
    )
    .await?;

    tx.commit().await?;

    Ok(updated)
}

/// Permanently retire an owned credit. Retired credits leave circulation;
/// the CO2 reduction is claimed by the owner.
pub async fn retire_credit(
    pool: &PgPool,
    owner_id: Uuid,
    credit_id: Uuid,
) -> Result<CarbonCredit, TradeError> {
    let mut tx = pool.begin().await?;

    let credit = credit_repo::lock_by_id(&mut *tx, credit_id)
        .await?
        .ok_or(TradeError::CreditNotFound)?;

    if credit.owner_id != Some(owner_id) {
        return Err(TradeError::NotOwner);
    }
    if credit.status == CreditStatus::Retired.as_str()
        || credit.status == CreditStatus::Pending.as_str()
    {
        return Err(TradeError::InvalidState);
    }

    let retired = credit_repo::set_status(&mut *tx, credit.id, CreditStatus::Retired).await?;

    notification_repo::insert(
        &mut *tx,
        owner_id,
        &NotificationKind::CreditRetired {
            credit_id: credit.id,
            co2_reduction: credit.co2_reduction,
        },
    )
    .await?;

    tx.commit().await?;

    counter!("credits_retired_total").increment(1);

    Ok(retired)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prorate_even_split() {
        // 40 of 100 units carries 40% of the reduction
        let slice = prorate_co2(Decimal::from(100), Decimal::from(40), Decimal::from(100));
        assert_eq!(slice, Decimal::from(40));
    }

    #[test]
    fn test_prorate_uneven_split() {
        let slice = prorate_co2(Decimal::from(75), Decimal::from(10), Decimal::from(30));
        assert_eq!(slice, Decimal::from(25));
    }

    #[test]
    fn test_prorate_full_amount_is_identity() {
        let co2 = Decimal::new(12345, 2);
        let total = Decimal::from(60);
        assert_eq!(prorate_co2(co2, total, total), co2);
    }

    #[test]
    fn test_prorate_zero_total() {
        assert_eq!(
            prorate_co2(Decimal::from(100), Decimal::from(10), Decimal::ZERO),
            Decimal::ZERO
        );
    }

    #[test]
    fn test_split_conserves_reduction() {
        // remainder + slice must equal the pre-split reduction
        let co2 = Decimal::from(100);
        let total = Decimal::from(100);
        let purchased = Decimal::from(40);

        let slice = prorate_co2(co2, purchased, total);
        let remainder = co2 - slice;
        assert_eq!(remainder + slice, co2);
        assert_eq!(remainder, Decimal::from(60));
    }
}
