//! Weighted pool walkthrough (Balancer V1 style).
//!
//! Deploys a three-token 40/10/50 pool through the factory, seeds it,
//! trades against it, quotes without mutating, and replays a small JSON
//! action log.
//!
//! # Run
//!
//! ```bash
//! RUST_LOG=weighted_amm=debug cargo run --example weighted --all-features
//! ```

use rust_decimal_macros::dec;
use tracing_subscriber::EnvFilter;
use weighted_amm::config::PoolConfig;
use weighted_amm::domain::{Provider, Token};
use weighted_amm::factory::{ExchangeData, ExchangeFactory};
use weighted_amm::process::{replay, ActionRecord, Proc};
use weighted_amm::quote::Quote;
use weighted_amm::traits::{LiquidityPool, SwapPool};
use weighted_amm::vault::Vault;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Weighted Pool (Balancer V1 style) ===\n");

    // ── 1. Register tokens ──────────────────────────────────────────────
    //    Denormalized weights 8 : 2 : 10 give a 40% / 10% / 50% split.
    let vault = Vault::from_tokens([
        Token::new("WETH", dec!(50), dec!(8)),
        Token::new("DAI", dec!(100000), dec!(2)),
        Token::new("USDC", dec!(25000), dec!(10)),
    ])?;
    println!("Tokens:        {}", vault.coins());
    for symbol in vault.symbols() {
        println!(
            "  {symbol:<5} balance {:>8}  weight {:.2}",
            vault.balance(symbol.as_str())?,
            vault.normalized_weight(symbol.as_str())?
        );
    }

    // ── 2. Deploy via the factory ───────────────────────────────────────
    let config = PoolConfig::new(dec!(0.003))?.with_exit_fee(dec!(0.001));
    let mut factory = ExchangeFactory::new("weighted factory", "0xfac");
    let data = ExchangeData::new(vault, "WDU", "0x0a").with_config(config);
    let token_set = data.vault().name();
    factory.deploy(data)?;
    println!("\nDeployed {token_set} ({} exchange)", factory.exchange_count());

    let Some(pool) = factory.get_exchange_mut(&token_set) else {
        return Err("exchange not registered".into());
    };

    // ── 3. Seed the pool ────────────────────────────────────────────────
    let alice = Provider::new("alice");
    let bob = Provider::new("bob");
    pool.join_pool(dec!(100), &alice)?;
    println!("\n--- join_pool ---");
    println!("  alice shares:  {}", pool.provider_shares("alice"));
    println!("  invariant:     {:.8}", pool.invariant()?);

    // ── 4. Quote, then trade ────────────────────────────────────────────
    let quoted = Quote::new(pool).amount_out(dec!(5), "WETH", "USDC")?;
    println!("\n--- quote: sell 5 WETH for USDC ---");
    println!("  amount out:    {:.8}", quoted.quantity());
    println!("  fee:           {}", quoted.fee());

    let before = pool.spot_price("WETH", "USDC")?;
    let res = pool.swap_exact_amount_in(dec!(5), "WETH", "USDC", &bob)?;
    let after = pool.spot_price("WETH", "USDC")?;
    println!("\n--- swap_exact_amount_in: 5 WETH ---");
    println!("  amount out:    {:.8} USDC", res.quantity());
    println!("  spot before:   {before:.8}");
    println!("  spot after:    {after:.8}");

    let res = pool.swap_exact_amount_out(dec!(1000), "DAI", "USDC", &bob)?;
    println!("\n--- swap_exact_amount_out: 1000 DAI ---");
    println!("  amount in:     {:.8} USDC", res.quantity());

    // ── 5. Single-asset liquidity ───────────────────────────────────────
    let minted = Proc::AddToken.add_liquidity(pool, "DAI", &bob, dec!(2000))?;
    println!("\n--- join_swap_extern_amount_in: 2000 DAI ---");
    println!("  shares minted: {:.8}", minted.quantity());

    let withdrawn = Proc::RemoveShares.remove_liquidity(pool, "DAI", &bob, minted.quantity())?;
    println!("\n--- exit_swap_pool_amount_in: all of bob's shares ---");
    println!("  DAI withdrawn: {:.8}", withdrawn.quantity());
    println!("  bob shares:    {}", pool.provider_shares("bob"));

    // ── 6. Replay an action log ─────────────────────────────────────────
    let log = r#"[
        {"action":"swap_exact_amount_in","provider":"carol",
         "token_in":{"symbol":"USDC","amount":"500"},"token_out":"WETH"},
        {"action":"exit_pool","provider":"alice","pool_in":"25"}
    ]"#;
    let records: Vec<ActionRecord> = serde_json::from_str(log)?;
    let outcomes = replay(pool, records)?;
    println!("\n--- replay: {} records ---", outcomes.len());
    for outcome in &outcomes {
        if let Some(basket) = outcome.basket() {
            for amount in basket {
                println!("  returned:      {amount}");
            }
        } else if let Some(res) = outcome.result() {
            println!("  result:        {res}");
        }
    }

    // ── 7. Final state ──────────────────────────────────────────────────
    println!("\n--- final state ---");
    for (symbol, reserve) in pool.reserves() {
        println!(
            "  {symbol:<5} reserve {reserve:.8}  fees {}",
            pool.collected_fee(symbol.as_str())
        );
    }
    println!("  total shares:  {}", pool.total_shares());

    println!("\n=== Done ===");
    Ok(())
}
