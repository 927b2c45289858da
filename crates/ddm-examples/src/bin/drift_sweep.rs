use anyhow::Result;
use clap::Parser;
use ddm_batch::BatchRunner;
use ddm_core::{Bound, BoundDependence, DdmModel, SolverConfig, TaskPerturbation};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Psychometric and chronometric curves over a drift sweep")]
struct Args {
    #[arg(long, default_value_t = 11)]
    points: usize,

    #[arg(long, default_value_t = 2.0)]
    max_drift: f64,

    #[arg(long, default_value_t = 1.0)]
    bound: f64,

    #[arg(long, default_value_t = 0.0)]
    collapse_rate: f64,

    /// Stimulus pulse onset; omit for a fixed-duration task.
    #[arg(long)]
    pulse_onset: Option<f64>,

    #[arg(long, default_value_t = 0.01)]
    dx: f64,

    #[arg(long, default_value_t = 0.005)]
    dt: f64,

    #[arg(long, default_value_t = 2.0)]
    duration: f64,

    #[arg(long, default_value_t = 0)]
    threads: usize,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("warn".parse()?))
        .init();

    let args = Args::parse();
    let steps = args.points.max(2) - 1;
    let drifts: Vec<f64> = (0..=steps)
        .map(|i| args.max_drift * i as f64 / steps as f64)
        .collect();

    let bound = Bound::new(
        args.bound,
        BoundDependence::CollapsingExponential {
            rate: args.collapse_rate,
        },
    );
    let configs: Vec<SolverConfig> = drifts
        .iter()
        .map(|&drift| {
            let mut model = DdmModel::simple(drift, 1.0, bound);
            if let Some(onset) = args.pulse_onset {
                model = model.with_task(TaskPerturbation::pulse_for_drift(onset, drift));
            }
            SolverConfig::with_grid(model, args.dx, args.dt, args.duration)
        })
        .collect();

    let runner = if args.threads > 0 {
        BatchRunner::with_threads(args.threads)
    } else {
        BatchRunner::new()
    };
    println!("{} runs on {} threads", configs.len(), runner.threads());
    println!("{:>8}  {:>10}  {:>10}", "drift", "P(correct)", "mean RT");

    for (drift, summary) in drifts.iter().zip(runner.summaries(&configs)) {
        let s = summary?;
        let (correct, _) = s.forced_choice();
        let rt = s
            .mean_time_correct
            .map(|t| format!("{t:.4}"))
            .unwrap_or_else(|| "-".into());
        println!("{drift:>8.3}  {correct:>10.4}  {rt:>10}");
    }
    Ok(())
}
