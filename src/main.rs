use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, LazyLock};
use std::time::Instant;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, ValueEnum};
use log::{info, warn, LevelFilter};
use u_numpart::anneal::{AnnealConfig, AnnealRunner, MovePool, StopReason};
use u_numpart::{Instance, Partition};

static EPOCH: LazyLock<Instant> = LazyLock::new(Instant::now);

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Instance file (`N M w_1 .. w_N`). Reads stdin when omitted.
    #[arg(short, long, value_name = "FILE")]
    input: Option<PathBuf>,
    /// Starting temperature, on the scale of the item weights.
    #[arg(short, long, default_value_t = 7000.0)]
    temperature: f64,
    /// Cooling constant k in T0 / (1 + k * step).
    #[arg(short, long, default_value_t = 1e-4)]
    decay: f64,
    #[arg(short, long)]
    seed: Option<u64>,
    /// Stop after this many steps. 0 runs until balanced or interrupted.
    #[arg(short, long, default_value_t = 0)]
    max_steps: usize,
    /// Log progress every this many steps. 0 disables progress lines.
    #[arg(short, long, default_value_t = 1000)]
    report_interval: usize,
    #[arg(long, value_enum, default_value_t = PoolArg::SkipSeeds)]
    move_pool: PoolArg,
    #[arg(
        short,
        long,
        value_name = "[off, error, warn, info, debug, trace]",
        default_value = "info"
    )]
    log_level: LevelFilter,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PoolArg {
    /// Never move the M largest items.
    SkipSeeds,
    All,
}

impl From<PoolArg> for MovePool {
    fn from(arg: PoolArg) -> Self {
        match arg {
            PoolArg::SkipSeeds => MovePool::SkipSeeds,
            PoolArg::All => MovePool::All,
        }
    }
}

fn main() -> Result<()> {
    let args = Cli::parse();
    init_logger(args.log_level)?;

    let instance = match &args.input {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("could not open instance file {}", path.display()))?;
            Instance::from_reader(BufReader::new(file))
        }
        None => Instance::from_reader(io::stdin().lock()),
    }
    .context("could not load instance")?;

    info!(
        "loaded {} items into {} groups, total weight {}",
        instance.item_count(),
        instance.group_count(),
        instance.total_weight()
    );

    let mut config = AnnealConfig::default()
        .with_initial_temperature(args.temperature)
        .with_decay(args.decay)
        .with_max_steps(args.max_steps)
        .with_report_interval(args.report_interval)
        .with_move_pool(args.move_pool.into());
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }
    config.validate().map_err(|e| anyhow!(e))?;

    if config.max_steps == 0 {
        info!("running until balanced, press Ctrl+C to stop");
    }

    let result = AnnealRunner::run_with_cancel(instance, &config, Some(stop_signal()?));

    match result.stop_reason {
        StopReason::Balanced => info!("found a perfectly balanced partition"),
        StopReason::Cancelled => warn!("interrupted, reporting the best partition so far"),
        StopReason::StepLimit => info!("step budget exhausted"),
    }
    info!(
        "seed {}, {} steps, {} accepted, {} improving",
        result.seed, result.steps, result.accepted_moves, result.improving_moves
    );

    print!("{}", Partition::from_result(&result));
    Ok(())
}

/// Flag raised by the first Ctrl+C.
fn stop_signal() -> Result<Arc<AtomicBool>> {
    let flag = Arc::new(AtomicBool::new(false));
    let handler_flag = Arc::clone(&flag);
    ctrlc::set_handler(move || {
        handler_flag.store(true, Ordering::SeqCst);
    })
    .context("could not install Ctrl+C handler")?;
    Ok(flag)
}

fn init_logger(level_filter: LevelFilter) -> Result<()> {
    LazyLock::force(&EPOCH);
    fern::Dispatch::new()
        .format(|out, message, record| {
            let elapsed = EPOCH.elapsed().as_secs();
            let prefix = format!(
                "[{}] [{:0>2}:{:0>2}:{:0>2}]",
                record.level(),
                elapsed / 3600,
                (elapsed / 60) % 60,
                elapsed % 60,
            );
            out.finish(format_args!("{prefix:<20}{message}"))
        })
        .level(level_filter)
        .chain(io::stderr())
        .apply()?;
    Ok(())
}
