//! Property-based tests using `proptest` for pool invariant validation.
//!
//! 1. **Invariant non-decrease**: a swap never lowers `∏ Bᵢ ^ wᵢ`.
//! 2. **Swap inversion**: `in_given_out(out_given_in(a)) ≈ a`.
//! 3. **Join/exit inversion**: the four single-asset formulas invert
//!    pairwise.
//! 4. **Round-trip loss**: deposit then withdraw returns at most the
//!    deposit.
//! 5. **Price movement direction**: buying a token makes it dearer.
//! 6. **Share conservation**: the supply equals the sum of provider
//!    balances and reserves mirror the vault after any operation.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::Exchange;
use crate::config::PoolConfig;
use crate::domain::{Provider, Token};
use crate::factory::ExchangeData;
use crate::math::{invariant_ratio, BalancerPow, SingleAssetCurve, SwapCurve};
use crate::traits::{FromConfig, LiquidityPool, SwapPool};
use crate::vault::Vault;

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

fn alice() -> Provider {
    Provider::new("alice")
}

fn dec(n: u64) -> Decimal {
    Decimal::from(n)
}

/// `amount` is `pct` percent of `balance`.
fn pct_of(balance: Decimal, pct: u64) -> Decimal {
    balance * dec(pct) / dec(100)
}

fn make_pool(ba: u64, bb: u64, wa: u64, wb: u64, exit_fee: Decimal) -> Exchange {
    let Ok(vault) = Vault::from_tokens([
        Token::new("A", dec(ba), dec(wa)),
        Token::new("B", dec(bb), dec(wb)),
    ]) else {
        panic!("valid vault");
    };
    let data = ExchangeData::new(vault, "AB", "0x01")
        .with_config(PoolConfig::default().with_exit_fee(exit_fee));
    let Ok(mut pool) = Exchange::from_config(&data) else {
        panic!("valid pool");
    };
    let Ok(()) = pool.join_pool(dec(100), &alice()) else {
        panic!("join");
    };
    pool
}

fn swap_curve(ba: u64, bb: u64, wa: u64, wb: u64) -> SwapCurve {
    SwapCurve {
        balance_in: dec(ba),
        weight_in: dec(wa),
        balance_out: dec(bb),
        weight_out: dec(wb),
        swap_fee: dec(25) / dec(10_000),
    }
}

fn single_curve(balance: u64, weight: u64, other_weight: u64) -> SingleAssetCurve {
    SingleAssetCurve {
        balance: dec(balance),
        weight: dec(weight),
        pool_supply: dec(100),
        total_weight: dec(weight + other_weight),
        swap_fee: dec(25) / dec(10_000),
        exit_fee: Decimal::ZERO,
    }
}

fn rel_diff(a: Decimal, b: Decimal) -> Decimal {
    if b.is_zero() {
        a.abs()
    } else {
        ((a - b) / b).abs()
    }
}

fn tolerance() -> Decimal {
    Decimal::new(1, 6)
}

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

fn balance_strategy() -> impl Strategy<Value = u64> {
    1_000u64..=1_000_000u64
}

fn weight_strategy() -> impl Strategy<Value = u64> {
    1u64..=20u64
}

/// Trade size as a percent of the reserve, inside the in-ratio bound.
fn pct_strategy() -> impl Strategy<Value = u64> {
    1u64..=40u64
}

/// Withdrawal size as a percent, inside the out-ratio bound.
fn exit_pct_strategy() -> impl Strategy<Value = u64> {
    1u64..=30u64
}

// ---------------------------------------------------------------------------
// Property 1: Invariant non-decrease
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_swap_never_lowers_invariant(
        ba in balance_strategy(),
        bb in balance_strategy(),
        wa in weight_strategy(),
        wb in weight_strategy(),
        pct in pct_strategy(),
    ) {
        let mut pool = make_pool(ba, bb, wa, wb, Decimal::ZERO);
        let amount = pct_of(dec(ba), pct);
        let Ok(_) = pool.swap_exact_amount_in(amount, "A", "B", &alice()) else {
            return Ok(());
        };

        let total = dec(wa + wb);
        let Ok(after_a) = pool.reserve("A") else { return Ok(()); };
        let Ok(after_b) = pool.reserve("B") else { return Ok(()); };
        let Ok(growth) = invariant_ratio(
            pool.power(),
            [
                (dec(ba), after_a, dec(wa) / total),
                (dec(bb), after_b, dec(wb) / total),
            ],
        ) else {
            return Ok(());
        };

        prop_assert!(
            growth >= Decimal::ONE - Decimal::new(1, 8),
            "invariant decreased: growth={}",
            growth
        );
    }
}

// ---------------------------------------------------------------------------
// Property 2 & 3: Formula inversion
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_swap_formulas_invert(
        ba in balance_strategy(),
        bb in balance_strategy(),
        wa in weight_strategy(),
        wb in weight_strategy(),
        pct in pct_strategy(),
    ) {
        let pow = BalancerPow::default();
        let curve = swap_curve(ba, bb, wa, wb);
        let amount_in = pct_of(dec(ba), pct);
        let Ok(out) = curve.out_given_in(amount_in, &pow) else {
            return Ok(());
        };
        if out.quantity().is_zero() { return Ok(()); }
        let Ok(back) = curve.in_given_out(out.quantity(), &pow) else {
            return Ok(());
        };

        prop_assert!(
            rel_diff(back.quantity(), amount_in) <= tolerance(),
            "in_given_out(out_given_in({})) = {}",
            amount_in, back.quantity()
        );
    }

    #[test]
    fn prop_join_formulas_invert(
        balance in balance_strategy(),
        weight in weight_strategy(),
        other in weight_strategy(),
        pct in pct_strategy(),
    ) {
        let pow = BalancerPow::default();
        let curve = single_curve(balance, weight, other);
        let amount_in = pct_of(dec(balance), pct);
        let Ok(shares) = curve.pool_out_given_single_in(amount_in, &pow) else {
            return Ok(());
        };
        let Ok(back) = curve.single_in_given_pool_out(shares.quantity(), &pow) else {
            return Ok(());
        };

        prop_assert!(
            rel_diff(back.quantity(), amount_in) <= tolerance(),
            "single_in_given_pool_out(pool_out_given_single_in({})) = {}",
            amount_in, back.quantity()
        );
    }

    #[test]
    fn prop_exit_formulas_invert(
        balance in balance_strategy(),
        weight in weight_strategy(),
        other in weight_strategy(),
        pct in exit_pct_strategy(),
    ) {
        let pow = BalancerPow::default();
        let curve = single_curve(balance, weight, other);
        let amount_out = pct_of(dec(balance), pct);
        let Ok(shares) = curve.pool_in_given_single_out(amount_out, &pow) else {
            return Ok(());
        };
        let Ok(back) = curve.single_out_given_pool_in(shares.quantity(), &pow) else {
            return Ok(());
        };

        prop_assert!(
            rel_diff(back.quantity(), amount_out) <= tolerance(),
            "single_out_given_pool_in(pool_in_given_single_out({})) = {}",
            amount_out, back.quantity()
        );
    }
}

// ---------------------------------------------------------------------------
// Property 4: Round-trip loss
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_deposit_then_withdraw_loses(
        ba in balance_strategy(),
        bb in balance_strategy(),
        wa in weight_strategy(),
        wb in weight_strategy(),
        pct in 1u64..=20u64,
    ) {
        let mut pool = make_pool(ba, bb, wa, wb, Decimal::ZERO);
        let bob = Provider::new("bob");
        let deposit = pct_of(dec(ba), pct);
        let Ok(minted) = pool.join_swap_extern_amount_in(deposit, "A", &bob) else {
            return Ok(());
        };
        let Ok(withdrawn) = pool.exit_swap_pool_amount_in(minted.quantity(), "A", &bob) else {
            return Ok(());
        };

        prop_assert!(
            withdrawn.quantity() < deposit,
            "round-trip should lose value: withdrawn={} deposit={}",
            withdrawn.quantity(), deposit
        );
        prop_assert!(pool.provider_shares("bob").is_zero());
    }

    #[test]
    fn prop_swap_round_trip_loses(
        ba in balance_strategy(),
        bb in balance_strategy(),
        wa in weight_strategy(),
        wb in weight_strategy(),
        pct in pct_strategy(),
    ) {
        let mut pool = make_pool(ba, bb, wa, wb, Decimal::ZERO);
        let amount = pct_of(dec(ba), pct);
        let Ok(there) = pool.swap_exact_amount_in(amount, "A", "B", &alice()) else {
            return Ok(());
        };
        let Ok(back) = pool.swap_exact_amount_in(there.quantity(), "B", "A", &alice()) else {
            return Ok(());
        };

        prop_assert!(
            back.quantity() < amount,
            "swap round-trip should lose value: final={} original={}",
            back.quantity(), amount
        );
    }
}

// ---------------------------------------------------------------------------
// Property 5: Price movement direction
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_swap_moves_price_against_trader(
        ba in balance_strategy(),
        bb in balance_strategy(),
        wa in weight_strategy(),
        wb in weight_strategy(),
        pct in pct_strategy(),
    ) {
        let mut pool = make_pool(ba, bb, wa, wb, Decimal::ZERO);
        let Ok(before) = pool.spot_price("A", "B") else {
            return Ok(());
        };
        let amount = pct_of(dec(ba), pct);
        let Ok(_) = pool.swap_exact_amount_in(amount, "A", "B", &alice()) else {
            return Ok(());
        };
        let Ok(after) = pool.spot_price("A", "B") else {
            return Ok(());
        };

        prop_assert!(
            after > before,
            "price of B in A should rise: before={} after={}",
            before, after
        );
    }
}

// ---------------------------------------------------------------------------
// Property 6: Share conservation
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_supply_matches_ledger_and_reserves_mirror_vault(
        ba in balance_strategy(),
        bb in balance_strategy(),
        wa in weight_strategy(),
        wb in weight_strategy(),
        join_pct in 1u64..=20u64,
        exit_pct in 1u64..=30u64,
        exit_fee_bp in 0u64..=100u64,
    ) {
        let exit_fee = Decimal::new(i64::try_from(exit_fee_bp).unwrap_or(0), 4);
        let mut pool = make_pool(ba, bb, wa, wb, exit_fee);
        let bob = Provider::new("bob");

        let _ = pool.join_swap_extern_amount_in(pct_of(dec(bb), join_pct), "B", &bob);
        let _ = pool.exit_swap_pool_amount_in(Decimal::from(exit_pct), "A", &alice());
        let _ = pool.exit_pool(dec(10), &alice());

        let sum: Decimal = pool.ledger().balances().map(|(_, b)| *b).sum();
        prop_assert!(
            (sum - pool.total_shares()).abs() <= Decimal::new(1, 20),
            "ledger sum {} != supply {}",
            sum, pool.total_shares()
        );
        for token in pool.vault().tokens() {
            prop_assert_eq!(pool.reserve(token.symbol().as_str()), Ok(token.balance()));
        }
    }
}
