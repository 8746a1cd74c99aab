//! Mosprune - MOSFET ring bound tightening
//!
//! Builds an inverter ring, starts from the full supply range on every ring
//! node and tightens the node bounds until a round changes nothing.
//!
//! # Usage
//!
//! ```bash
//! RUST_LOG=mosprune_core=debug mosprune --stages 3 --vdd 1.8
//! ```

use clap::Parser;
use tracing_subscriber::EnvFilter;

use mosprune_core::{
    error::Result, BoundTightener, Circuit, Interval, Mosfet, MosfetModel, NodeId, PruneConfig,
    Value,
};

/// Tighten the node voltage bounds of a MOSFET inverter ring
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Number of inverter stages
    #[arg(short, long, default_value_t = 3)]
    stages: usize,

    /// Supply voltage
    #[arg(long, default_value_t = 1.8)]
    vdd: f64,

    /// Threshold voltage magnitude (the p-type device uses -vt)
    #[arg(long, default_value_t = 0.4)]
    vt: f64,

    /// Transconductance magnitude (the p-type device uses -k)
    #[arg(long, default_value_t = 1.0)]
    k: f64,

    /// Leakage conductance
    #[arg(long, default_value_t = MosfetModel::DEFAULT_LEAKAGE)]
    gds: f64,

    /// Width/length shape factor
    #[arg(long, default_value_t = Mosfet::DEFAULT_SHAPE)]
    shape: f64,

    /// Maximum number of tightening rounds
    #[arg(long, default_value_t = 20)]
    max_rounds: usize,

    /// Margin added around [0, vdd] for the initial ring node bounds
    #[arg(long, default_value_t = 0.0)]
    pad: f64,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let nfet = MosfetModel::nfet(args.vt, args.k).with_leakage(args.gds);
    let pfet = MosfetModel::pfet(-args.vt, -args.k).with_leakage(args.gds);
    let circuit = Circuit::inverter_ring(args.stages, nfet, pfet, args.shape)?;

    let mut bounds = vec![Value::Scalar(0.0), Value::Scalar(args.vdd)];
    let ring_bound = Interval::try_new(-args.pad, args.vdd + args.pad)?;
    bounds.extend(std::iter::repeat(Value::Interval(ring_bound)).take(args.stages));
    let fixed = [NodeId::GROUND, NodeId::SUPPLY];

    let tightener = BoundTightener::with_config(PruneConfig::default());
    let mut feasible = true;
    let mut rounds = 0;
    while rounds < args.max_rounds {
        rounds += 1;
        let outcome = tightener.tighten(&circuit, &bounds, &fixed)?;
        tracing::info!(round = rounds, counters = ?outcome.counters, "tightening round");
        let changed = outcome.bounds != bounds;
        bounds = outcome.bounds;
        if !outcome.feasible {
            feasible = false;
            break;
        }
        if !changed {
            break;
        }
    }

    println!("rounds: {rounds}");
    println!("feasible: {feasible}");
    for (node, bound) in bounds.iter().enumerate() {
        println!("{}: {bound}", NodeId(node));
    }

    Ok(())
}
