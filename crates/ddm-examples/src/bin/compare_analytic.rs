use anyhow::Result;
use clap::Parser;
use ddm_analytic::AnalyticalSolver;
use ddm_core::{solve, Bound, BoundDependence, DdmModel, DecisionSummary, SolverConfig, TimeGrid};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Compare the implicit solver with closed-form densities")]
struct Args {
    #[arg(long, default_value_t = 0.3)]
    drift: f64,

    #[arg(long, default_value_t = 1.0)]
    noise: f64,

    #[arg(long, default_value_t = 1.0)]
    bound: f64,

    /// Linear collapse rate; omit for a constant bound.
    #[arg(long)]
    collapse_rate: Option<f64>,

    #[arg(long, default_value_t = 0.005)]
    dx: f64,

    #[arg(long, default_value_t = 0.005)]
    dt: f64,

    #[arg(long, default_value_t = 2.0)]
    duration: f64,
}

fn print_summary(label: &str, s: &DecisionSummary) {
    println!(
        "{label:>10}  correct {:.6}  error {:.6}  undecided {:.6}  mean RT {}",
        s.total_correct,
        s.total_error,
        s.undecided,
        s.mean_time_all
            .map(|t| format!("{t:.4}"))
            .unwrap_or_else(|| "-".into()),
    );
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("warn".parse()?))
        .init();

    let args = Args::parse();

    let dependence = match args.collapse_rate {
        Some(rate) => BoundDependence::CollapsingLinear { rate },
        None => BoundDependence::Constant,
    };
    let model = DdmModel::simple(args.drift, args.noise, Bound::new(args.bound, dependence));
    let config = SolverConfig::with_grid(model.clone(), args.dx, args.dt, args.duration);

    println!(
        "drift {}, noise {}, bound {} ({}), dx {}, dt {}, T {}",
        args.drift,
        args.noise,
        args.bound,
        dependence.tag(),
        args.dx,
        args.dt,
        args.duration
    );

    let numeric = solve(&config)?;
    let time = TimeGrid::spanning(args.duration, args.dt)?;
    let analytic = AnalyticalSolver::for_model(&model)?.densities(&time);

    let (ns, an) = (numeric.summary(), analytic.summary());
    print_summary("numeric", &ns);
    print_summary("analytic", &an);

    let max_gap = numeric
        .correct
        .iter()
        .zip(&analytic.correct)
        .map(|(n, a)| (n - a).abs())
        .fold(0.0, f64::max);
    println!(
        "relative error in P(correct): {:.3}%, max per-step gap {:.2e}",
        100.0 * (ns.total_correct - an.total_correct).abs() / an.total_correct,
        max_gap
    );
    if numeric.degenerate_steps > 0 {
        println!("note: {} sub-cell steps renormalised", numeric.degenerate_steps);
    }
    Ok(())
}
