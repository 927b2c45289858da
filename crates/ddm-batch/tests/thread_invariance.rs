use ddm_batch::BatchRunner;
use ddm_core::{
    Bound, BoundDependence, DdmModel, InitialCondition, Signal, SignalDependence, SolverConfig,
    TaskPerturbation,
};

fn configs() -> Vec<SolverConfig> {
    let mut out = Vec::new();
    for (i, rate) in [0.0, 0.3, 0.8].into_iter().enumerate() {
        for drift in [-0.5, 0.0, 0.7] {
            let model = DdmModel::new(
                Signal::new(drift, SignalDependence::LinearXt { x: -0.2, t: 0.0 }),
                Signal::new(1.0, SignalDependence::SinxCost { x: 0.0, t: 0.1 }),
                Bound::new(1.0, BoundDependence::CollapsingExponential { rate }),
                if i % 2 == 0 {
                    InitialCondition::PointSourceCenter
                } else {
                    InitialCondition::Uniform
                },
            )
            .with_task(TaskPerturbation::duration(0.4, drift));
            out.push(SolverConfig::with_grid(model, 0.04, 0.01, 1.0));
        }
    }
    out
}

#[test]
fn results_do_not_depend_on_thread_count() {
    let configs = configs();
    let one = BatchRunner::with_threads(1).run(&configs);
    let four = BatchRunner::with_threads(4).run(&configs);

    for (a, b) in one.iter().zip(&four) {
        let (a, b) = (a.as_ref().unwrap(), b.as_ref().unwrap());
        assert_eq!(a.correct, b.correct);
        assert_eq!(a.error, b.error);
        assert_eq!(a.outcome, b.outcome);
    }
    println!("{} runs bit-identical on 1 and 4 threads", configs.len());
}
