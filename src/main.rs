//! PythSwap Core - Demo Entry Point
//!
//! Walks one full lifecycle against an in-memory deployment: price
//! ingestion, funded swaps feeding the lottery, a draw, and the scripted
//! oracle callback that settles the round.

use pythswap_core::deploy::{deploy, verify_deployment, DeployConfig};
use pythswap_core::oracle::random_from_u64;
use pythswap_core::types::Asset;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    println!("===========================================");
    println!("  PythSwap Core - Swap + Lottery Demo");
    println!("===========================================");
    println!();

    let mut now = 1_700_000_000;
    let config = DeployConfig::testnet();
    let mut deployment = deploy(&config, now)?;

    println!("Deployed on {} (chain {})", config.network, config.chain_id);
    println!("  swap:    {}", deployment.summary.contracts.swap);
    println!("  lottery: {}", deployment.summary.contracts.lottery);
    println!();

    // One attested quote per asset, prices at expo -8
    println!("Ingesting attested price updates...");
    let quotes: [(Asset, u64); 4] = [
        (Asset::Eth, 400_000_000_000),    // $4,000.00
        (Asset::Sol, 20_000_000_000),     // $200.00
        (Asset::Btc, 10_000_000_000_000), // $100,000.00
        (Asset::Hbar, 10_000_000),        // $0.10
    ];
    let mut payloads = Vec::with_capacity(quotes.len());
    for (asset, price) in quotes {
        let update = deployment
            .verifier
            .seal(asset.default_feed_id(), price, -8, now);
        payloads.push(update.encode()?);
    }
    let fee = deployment.oracle.update_fee(payloads.len())?;
    let applied = deployment
        .oracle
        .update_price_feeds(&deployment.verifier, &payloads, fee)?;
    println!("  {applied} feeds updated for fee {fee}");
    println!();

    // Seed the pools
    deployment
        .swap
        .add_hbar_liquidity(config.deployer, 100_000_000_000)?;
    deployment
        .swap
        .add_asset_liquidity(config.deployer, Asset::Eth, 10_000_000_000)?;
    deployment
        .swap
        .add_asset_liquidity(config.deployer, Asset::Sol, 10_000_000_000)?;
    deployment
        .swap
        .add_asset_liquidity(config.deployer, Asset::Btc, 1_000_000_000)?;

    let quote = deployment.swap.calculate_swap_output(
        &deployment.oracle,
        Asset::Hbar,
        Asset::Eth,
        40_000_000,
        now,
    )?;
    println!("Quote: 40,000,000 HBAR units -> {} ETH units", quote.amount_out);
    println!();

    // Five accounts swap, each entering the active round
    println!("Executing swaps...");
    for account in 2_001..2_006 {
        let receipt = deployment.swap.swap_hbar_for_asset(
            &deployment.oracle,
            Some(&mut deployment.lottery),
            account,
            Asset::Eth,
            40_000_000,
            now,
        )?;
        println!(
            "  account {} swapped {} -> {} (fee {}, prize cut {})",
            account, receipt.amount_in, receipt.amount_out, receipt.fee_native, receipt.lottery_cut
        );
    }
    let back = deployment.swap.swap_asset_for_hbar(
        &deployment.oracle,
        Some(&mut deployment.lottery),
        2_001,
        Asset::Eth,
        500,
        0,
        now,
    )?;
    println!(
        "  account 2001 swapped {} ETH units back -> {} HBAR units",
        back.amount_in, back.amount_out
    );
    println!();

    let round = deployment.lottery.current_round_snapshot();
    println!(
        "Round {}: {} participants, prize pool {}",
        round.id, round.participant_count, round.prize_pool
    );

    // Round duration elapses; anyone may trigger the draw
    now += config.lottery_duration_secs;
    let sequence = deployment
        .lottery
        .request_draw(config.deployer, deployment.swap.fees_mut(), now)?;
    println!("Draw requested, sequence {sequence}");

    // Scripted oracle callback stands in for the entropy provider
    let receipt = deployment.lottery.handle_entropy_callback(
        config.entropy_oracle_account,
        sequence,
        random_from_u64(0xA5A5_5A5A),
        deployment.swap.fees_mut(),
        now + 30,
    )?;
    println!(
        "Round {} settled: account {} wins {} ({} participants)",
        receipt.round_id, receipt.winner, receipt.prize, receipt.participant_count
    );

    let withdrawal = deployment.swap.withdraw(config.deployer)?;
    println!("Owner withdrew {} HBAR units", withdrawal.amount);
    println!();

    let stats = deployment.lottery.contract_stats();
    println!(
        "Totals: {} swaps, volume {} HBAR units",
        deployment.swap.total_swaps(),
        deployment.swap.total_volume_native()
    );
    println!(
        "Lottery: {} rounds settled, {} distributed, round {} live",
        stats.total_lotteries, stats.total_prizes_distributed, stats.current_lottery_id
    );
    println!("State root: {}", hex::encode(deployment.swap.state_root()));
    println!();

    let findings = verify_deployment(&deployment);
    if findings.is_empty() {
        println!("Deployment verification: all checks passed");
    } else {
        for finding in &findings {
            println!("Deployment verification: {finding}");
        }
    }
    println!();
    println!("Deployment summary:");
    println!("{}", deployment.summary.to_json()?);

    Ok(())
}
