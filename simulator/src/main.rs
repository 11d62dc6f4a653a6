use anyhow::Context;
use clap::Parser;
use dfscore::clock::{SystemTicks, TickSource};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;
use workflow::config::{Scenario, WorkflowConfig};
use workflow::runner::Runner;

mod generator;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "DFS radar detection scenario driver")]
struct Args {
    /// Load a workflow config from YAML
    #[arg(long)]
    workflow: Option<PathBuf>,
    /// Regulatory domain (fcc, etsi, mkk, china, korea, or numeric code)
    #[arg(long, default_value = "fcc")]
    domain: String,
    #[arg(long, value_enum, default_value_t = Scenario::Fixed)]
    scenario: Scenario,
    /// Seed for pulse jitter and channel reselection
    #[arg(long, default_value_t = 7)]
    seed: u64,
    /// Keep the process alive after the run, polling the NOL until Ctrl+C
    #[arg(long, default_value_t = false)]
    watch: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let workflow_config = if let Some(path) = args.workflow {
        WorkflowConfig::load(path)?
    } else {
        WorkflowConfig::from_args(args.domain, args.scenario, args.seed)
    };

    let runner = Runner::new(workflow_config);
    let (summary, engine) = runner.execute_with_engine()?;

    println!(
        "{}",
        serde_json::to_string_pretty(&summary).context("serializing run summary")?
    );

    let report = format!(
        "domain={} scenario={:?} pulses={} detections={} nol={}\n",
        summary.domain,
        summary.scenario,
        summary.pulses_enqueued,
        summary.detections.len(),
        summary.nol.len()
    );
    let report_path = PathBuf::from("tools/data/dfs_runs.log");
    if let Some(parent) = report_path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(report_path)?;
    file.write_all(report.as_bytes())?;

    if args.watch {
        log::info!("watching NOL expiry (Ctrl+C to stop)...");
        let runtime = TokioBuilder::new_current_thread()
            .enable_all()
            .build()
            .context("creating runtime for NOL watch")?;
        runtime.block_on(async {
            let clock = SystemTicks::new();
            let mut ticker = tokio::time::interval(std::time::Duration::from_secs(1));
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let expired = engine.poll_nol(clock.now_us());
                        if expired > 0 {
                            engine.reclaim_nol();
                            log::info!("{} NOL entries expired", expired);
                        }
                    }
                    result = signal::ctrl_c() => {
                        result.context("awaiting Ctrl+C to exit")?;
                        break;
                    }
                }
            }
            Ok::<(), anyhow::Error>(())
        })?;
    }

    Ok(())
}
