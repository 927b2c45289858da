use ddm_core::{
    solve, Bound, DdmModel, InitialCondition, Signal, SignalDependence, SolverConfig,
};

#[test]
fn zero_drift_splits_evenly() {
    let model = DdmModel::simple(0.0, 1.0, Bound::constant(1.0));
    let out = solve(&SolverConfig::with_grid(model, 0.01, 0.01, 1.0)).unwrap();

    for (i, (c, e)) in out.correct.iter().zip(&out.error).enumerate() {
        assert!(
            (c - e).abs() <= 1e-12 * c.abs().max(1e-300) + 1e-15,
            "step {i}: correct {c} != error {e}"
        );
    }
    assert!(out.total_correct() > 0.0);
}

#[test]
fn symmetric_noise_dependence_keeps_symmetry() {
    // σ depending only on t keeps the problem mirror-symmetric
    let noise = Signal::new(1.0, SignalDependence::LinearXt { x: 0.0, t: 0.5 });
    let model = DdmModel::new(
        Signal::constant(0.0),
        noise,
        Bound::constant(1.0),
        InitialCondition::Uniform,
    );
    let out = solve(&SolverConfig::with_grid(model, 0.02, 0.01, 1.0)).unwrap();
    let diff = out
        .correct
        .iter()
        .zip(&out.error)
        .map(|(c, e)| (c - e).abs())
        .fold(0.0, f64::max);
    assert!(diff < 1e-12, "max asymmetry {diff}");
}

#[test]
fn flipping_drift_swaps_outputs() {
    let up = DdmModel::simple(0.4, 1.0, Bound::constant(1.0));
    let down = DdmModel::simple(-0.4, 1.0, Bound::constant(1.0));
    let a = solve(&SolverConfig::with_grid(up, 0.02, 0.01, 1.0)).unwrap();
    let b = solve(&SolverConfig::with_grid(down, 0.02, 0.01, 1.0)).unwrap();
    for i in 0..a.len() {
        assert!((a.correct[i] - b.error[i]).abs() < 1e-12);
        assert!((a.error[i] - b.correct[i]).abs() < 1e-12);
    }
}
