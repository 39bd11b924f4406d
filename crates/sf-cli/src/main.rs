//! Command-line front end: `tune` drives the offline RTP tuning loop to
//! convergence and dumps the winning strips/stats; `verify` replays the
//! three provably-fair checks against data a client would actually have.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use sf_core::{CancellationToken, EngineConfig, HexHash};
use sf_pf::{
    verify_active_spin, verify_single_spin, verify_spin_with_reel_positions, SpinReceipt, VerifyActiveSpinInput,
    VerifySpinInput, VerifyWithReelInput,
};
use sf_paytable::Token;
use sf_strips::ReelStrip;
use sf_tuner::{run_tuning_loop, NullPersistence, TuningConfig, TuningOutcome};
use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sf-cli", about = "RTP tuning loop and offline PF verification")]
struct Cli {
    /// Increase log verbosity; repeat for more (-v, -vv, -vvv).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the offline RTP tuning loop until convergence or `max_iter`.
    Tune {
        /// JSON file holding a `TuningConfig`. Falls back to its defaults
        /// when omitted.
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Write the converged strips and stats to this JSON file instead
        /// of only printing a summary.
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Offline provably-fair verification.
    Verify {
        #[command(subcommand)]
        what: VerifyTarget,
    },
}

#[derive(Subcommand)]
enum VerifyTarget {
    /// Recompute a spin's commitment hash from the revealed server seed.
    Spin {
        #[arg(long)]
        server_seed_hex: String,
        #[arg(long)]
        client_seed_hex: String,
        #[arg(long)]
        nonce: u64,
        #[arg(long)]
        prev_spin_hash: Option<String>,
        #[arg(long)]
        spin_hash: String,
    },
    /// Beyond the hash check, replay the deterministic RNG against the
    /// named strip set and compare reel positions.
    Reel {
        #[arg(long)]
        server_seed_hex: String,
        #[arg(long)]
        client_seed_hex: String,
        #[arg(long)]
        nonce: u64,
        #[arg(long)]
        prev_spin_hash: Option<String>,
        #[arg(long)]
        spin_hash: String,
        #[arg(long)]
        theta_seed_hex: Option<String>,
        /// Reel positions the client claims were drawn, comma-separated.
        #[arg(long, value_delimiter = ',')]
        claimed_positions: Vec<i64>,
        /// JSON file with the 5 reels' token content, `[[Token, ...], ...]`
        /// — the exact strip set the spin was drawn against.
        #[arg(long)]
        strips: PathBuf,
    },
    /// Check hash-chain continuity across every receipt seen so far,
    /// before the server seed is ever revealed.
    Chain {
        /// The commitment published at session start.
        #[arg(long)]
        server_seed_hash: String,
        /// JSON file holding a `Vec<SpinReceipt>` in nonce order.
        #[arg(long)]
        receipts: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Tune { config, out } => run_tune(config, out),
        Commands::Verify { what } => run_verify(what),
    }
}

fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(format!("sf_cli={level},sf_tuner={level}")));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn run_tune(config_path: Option<PathBuf>, out_path: Option<PathBuf>) -> Result<()> {
    let config = match config_path {
        Some(path) => {
            let raw = fs::read_to_string(&path).with_context(|| format!("reading tuning config at {}", path.display()))?;
            serde_json::from_str::<TuningConfig>(&raw).with_context(|| format!("parsing tuning config at {}", path.display()))?
        }
        None => TuningConfig::default(),
    };
    let engine_config = EngineConfig::default();

    tracing::info!(total_spins = config.total_spins, max_iter = config.max_iter, workers = config.num_workers, "starting tuning run");
    let outcome =
        run_tuning_loop(&config, &engine_config, &NullPersistence, &CancellationToken::new()).context("tuning loop failed")?;

    println!("converged: {}", outcome.converged);
    println!("iterations: {}", outcome.iterations);
    println!("rtp: {:.3}%", outcome.stats.rtp);
    println!("trigger rate: {:.3}%", outcome.stats.trigger_rate);
    println!("hit rate: {:.3}%", outcome.stats.hit_rate);
    println!("high symbol win share: {:.3}%", outcome.stats.high_symbol_win_share);
    println!("near miss rate: {:.3}%", outcome.stats.near_miss_rate);
    println!("max win: {:.2}x", outcome.stats.max_win);

    if let Some(path) = out_path {
        let json = outcome_to_json(&outcome);
        fs::write(&path, serde_json::to_string_pretty(&json)?).with_context(|| format!("writing tuning outcome to {}", path.display()))?;
        tracing::info!(path = %path.display(), "wrote tuning outcome");
    }

    Ok(())
}

fn outcome_to_json(outcome: &TuningOutcome) -> serde_json::Value {
    serde_json::json!({
        "converged": outcome.converged,
        "iterations": outcome.iterations,
        "rtp": outcome.stats.rtp,
        "triggerRate": outcome.stats.trigger_rate,
        "hitRate": outcome.stats.hit_rate,
        "highSymbolWinShare": outcome.stats.high_symbol_win_share,
        "nearMissRate": outcome.stats.near_miss_rate,
        "maxWin": outcome.stats.max_win,
        "cascadeDepthHistogram": outcome.stats.cascade_depth_histogram,
        "baseStrips": strips_to_json(&outcome.base_strips),
        "freeSpinsStrips": strips_to_json(&outcome.free_spins_strips),
    })
}

fn strips_to_json(strips: &[ReelStrip; 5]) -> serde_json::Value {
    serde_json::Value::Array(
        strips
            .iter()
            .map(|strip| {
                serde_json::json!({
                    "reelIndex": strip.reel_index,
                    "checksum": strip.checksum().to_string(),
                    "content": strip.content(),
                })
            })
            .collect(),
    )
}

fn run_verify(target: VerifyTarget) -> Result<()> {
    match target {
        VerifyTarget::Spin {
            server_seed_hex,
            client_seed_hex,
            nonce,
            prev_spin_hash,
            spin_hash,
        } => {
            let input = VerifySpinInput {
                server_seed: decode_hex(&server_seed_hex)?,
                client_seed: decode_hex(&client_seed_hex)?,
                nonce,
                prev_spin_hash: parse_opt_hash(prev_spin_hash.as_deref())?,
                spin_hash: parse_hash(&spin_hash)?,
            };
            let result = verify_single_spin(&input);
            println!("valid: {}", result.valid);
            println!("expected hash: {}", result.expected_hash);
            if !result.valid {
                bail!("spin hash does not match the revealed seeds");
            }
            Ok(())
        }
        VerifyTarget::Reel {
            server_seed_hex,
            client_seed_hex,
            nonce,
            prev_spin_hash,
            spin_hash,
            theta_seed_hex,
            claimed_positions,
            strips: strips_path,
        } => {
            if claimed_positions.len() != sf_grid::REELS {
                bail!("expected {} claimed positions, got {}", sf_grid::REELS, claimed_positions.len());
            }
            let raw = fs::read_to_string(&strips_path).with_context(|| format!("reading strips at {}", strips_path.display()))?;
            let reel_contents: Vec<Vec<Token>> = serde_json::from_str(&raw).context("parsing strips file")?;
            if reel_contents.len() != sf_grid::REELS {
                bail!("expected {} reels in the strips file, got {}", sf_grid::REELS, reel_contents.len());
            }
            let mut reel_contents = reel_contents.into_iter();
            let strips: [ReelStrip; sf_grid::REELS] =
                std::array::from_fn(|reel| ReelStrip::new(sf_core::GameMode::Base, reel as u8, reel_contents.next().expect("length checked above")));
            let mut positions = [0i64; sf_grid::REELS];
            positions.copy_from_slice(&claimed_positions);

            let input = VerifyWithReelInput {
                spin: VerifySpinInput {
                    server_seed: decode_hex(&server_seed_hex)?,
                    client_seed: decode_hex(&client_seed_hex)?,
                    nonce,
                    prev_spin_hash: parse_opt_hash(prev_spin_hash.as_deref())?,
                    spin_hash: parse_hash(&spin_hash)?,
                },
                theta_seed: theta_seed_hex.map(|hex| decode_hex(&hex)).transpose()?,
                claimed_positions: positions,
                strips,
            };
            let result = verify_spin_with_reel_positions(&input);
            println!("valid: {}", result.valid);
            println!("expected hash: {}", result.expected_hash);
            if !result.valid {
                bail!("reel positions or spin hash do not match the revealed seeds");
            }
            Ok(())
        }
        VerifyTarget::Chain { server_seed_hash, receipts } => {
            let raw = fs::read_to_string(&receipts).with_context(|| format!("reading receipts at {}", receipts.display()))?;
            let receipts: Vec<SpinReceipt> = serde_json::from_str(&raw).context("parsing receipts file")?;
            let result = verify_active_spin(&VerifyActiveSpinInput {
                server_seed_hash: parse_hash(&server_seed_hash)?,
                receipts,
            });
            println!("chain intact: {}", result.chain_intact);
            if let Some(nonce) = result.broken_at_nonce {
                println!("broken at nonce: {nonce}");
                bail!("hash chain is broken");
            }
            Ok(())
        }
    }
}

fn decode_hex(s: &str) -> Result<Vec<u8>> {
    hex::decode(s).with_context(|| format!("{s} is not valid hex"))
}

fn parse_hash(s: &str) -> Result<HexHash> {
    s.parse::<HexHash>().map_err(|e| anyhow::anyhow!("invalid hash {s}: {e:?}"))
}

fn parse_opt_hash(s: Option<&str>) -> Result<Option<HexHash>> {
    s.map(parse_hash).transpose()
}
