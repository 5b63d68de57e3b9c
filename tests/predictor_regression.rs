//! Predictor Regression Tests
//!
//! Exercises the full forecast (reference calibration + prognosis propagation)
//! on the demo grids and on small hand-checked tables. Asserts on the row-wise
//! differencing, the shifted accumulation, the symmetric band and purity.

use tops_forecast::config::defaults;
use tops_forecast::predictor::{layer_sigma, predict};
use tops_forecast::types::{
    DepthPrediction, PrognosisLayerRow, ReferenceLayerRow, SurfaceType, UncertaintyModel,
};

const EPS: f64 = 1e-6;

fn demo_prediction() -> DepthPrediction {
    predict(
        &defaults::reference_rows(),
        &defaults::prognosis_rows(),
        &UncertaintyModel::default(),
        defaults::BASE_TVDSS_M,
    )
    .expect("demo grids must predict")
}

fn residual_only() -> UncertaintyModel {
    UncertaintyModel {
        delta_t: 0.0,
        delta_v: 0.0,
        delta_err: 5.0,
    }
}

fn prognosis(rows: &[(&str, f64, f64)]) -> Vec<PrognosisLayerRow> {
    rows.iter()
        .map(|&(name, twt, v)| PrognosisLayerRow::new(SurfaceType::Concordant, name, twt, v))
        .collect()
}

// ============================================================================
// Differencing
// ============================================================================

#[test]
fn deltas_are_taken_against_the_row_below() {
    let p = demo_prediction();
    let refs = defaults::reference_rows();
    for i in 0..refs.len() - 1 {
        let r = &p.reference[i];
        assert!((r.true_thickness - (refs[i + 1].tvdss_depth - refs[i].tvdss_depth)).abs() < EPS);
        assert!((r.delta_time - (refs[i + 1].two_way_time - refs[i].two_way_time)).abs() < EPS);
    }
    let last = p.reference.last().unwrap();
    assert_eq!(last.true_thickness, 0.0);
    assert_eq!(last.delta_time, 0.0);
    assert_eq!(p.prognosis.last().unwrap().delta_time, 0.0);
}

#[test]
fn two_row_reference_scenario() {
    let reference = vec![
        ReferenceLayerRow::new(SurfaceType::Concordant, "A", 1000.0, 1.000, 4000.0),
        ReferenceLayerRow::new(SurfaceType::Concordant, "B", 1200.0, 1.100, 4000.0),
    ];
    let p = predict(&reference, &prognosis(&[("A", 1.0, 4000.0)]), &UncertaintyModel::default(), 0.0).unwrap();
    let r0 = &p.reference[0];
    assert!((r0.true_thickness - 200.0).abs() < EPS);
    assert!((r0.delta_time - 0.100).abs() < EPS);
    assert!((r0.seismic_thickness - 200.0).abs() < EPS);
    assert!(r0.relative_error_pct.abs() < EPS);
}

// ============================================================================
// Calibration
// ============================================================================

#[test]
fn demo_reference_errors() {
    let p = demo_prediction();
    let expected = [
        (204.0 - 0.099 * 4135.0 / 2.0) / 204.0 * 100.0,
        (24.0 - 0.012 * 4260.0 / 2.0) / 24.0 * 100.0,
        (40.0 - 0.018 * 4525.0 / 2.0) / 40.0 * 100.0,
        0.0,
    ];
    for (row, want) in p.reference.iter().zip(expected) {
        assert!(
            (row.relative_error_pct - want).abs() < 1e-4,
            "{}: got {}, want {}",
            row.top_name,
            row.relative_error_pct,
            want
        );
    }
    // San Felipe: seismic overestimates 24 m by 1.56 m
    assert!((p.reference[1].relative_error_pct + 6.5).abs() < 1e-4);
}

#[test]
fn discordant_rows_never_carry_error() {
    let mut reference = defaults::reference_rows();
    for r in &mut reference {
        r.surface_type = SurfaceType::Discordant;
    }
    let p = predict(&reference, &defaults::prognosis_rows(), &UncertaintyModel::default(), 1927.0).unwrap();
    assert!(p.reference.iter().all(|r| r.relative_error_pct == 0.0));
    assert!(p.prognosis.iter().all(|r| r.error_adjustment == 0.0));
}

// ============================================================================
// Propagation
// ============================================================================

#[test]
fn demo_prognosis_depths() {
    let p = demo_prediction();
    let first_layer: f64 = 0.04 * 4362.0 / 2.0;
    let ref_err = (204.0 - 0.099 * 4135.0 / 2.0) / 204.0 * 100.0;
    let adjustment = (first_layer * ref_err / 100.0).abs();

    assert_eq!(p.prognosis[0].reference_match.as_deref(), Some("KS Mendez"));
    assert!((p.prognosis[0].base_thickness - first_layer).abs() < 1e-4);
    assert!((p.prognosis[0].error_adjustment - adjustment).abs() < 1e-4);

    for row in &p.prognosis[1..] {
        assert!((row.predicted_base_depth - (1927.0 + first_layer)).abs() < 1e-4);
        assert!((row.predicted_shallow_depth - (1927.0 + first_layer - adjustment)).abs() < 1e-4);
        assert!((row.predicted_deep_depth - (1927.0 + first_layer + adjustment)).abs() < 1e-4);
    }

    let sigma0 = (4.362_f64.powi(2) + 1.0 + 25.0).sqrt();
    assert!((p.prognosis[0].layer_propagated_sigma - sigma0).abs() < 1e-4);
    assert!((p.prognosis[1].cumulative_sigma - sigma0).abs() < 1e-4);
}

#[test]
fn first_prognosis_row_is_the_anchor() {
    for seed in [0.0, 1927.0, -350.5] {
        let p = predict(
            &defaults::reference_rows(),
            &defaults::prognosis_rows(),
            &UncertaintyModel::default(),
            seed,
        )
        .unwrap();
        let r0 = &p.prognosis[0];
        assert_eq!(r0.predicted_base_depth, seed);
        assert_eq!(r0.predicted_shallow_depth, seed);
        assert_eq!(r0.predicted_deep_depth, seed);
        assert_eq!(r0.cumulative_sigma, 0.0);
        assert!(p.prognosis.iter().all(|r| r.base_tvdss_seed == seed));
    }
}

#[test]
fn band_is_symmetric_around_base() {
    let p = demo_prediction();
    for r in &p.prognosis {
        assert!((r.predicted_max_depth - r.predicted_base_depth - r.cumulative_sigma).abs() < 1e-9);
        assert!((r.predicted_base_depth - r.predicted_min_depth - r.cumulative_sigma).abs() < 1e-9);
        assert!(r.predicted_shallow_depth <= r.predicted_deep_depth);
    }
}

#[test]
fn residual_only_sigma_grows_with_sqrt_of_row() {
    let rows = prognosis(&[
        ("A", 1.00, 3000.0),
        ("B", 1.10, 3500.0),
        ("C", 1.25, 4000.0),
        ("D", 1.30, 4500.0),
        ("E", 1.50, 5000.0),
    ]);
    let reference = vec![ReferenceLayerRow::new(SurfaceType::Concordant, "A", 0.0, 0.0, 1.0)];
    let p = predict(&reference, &rows, &residual_only(), 100.0).unwrap();
    for (i, r) in p.prognosis.iter().enumerate() {
        if i + 1 < p.prognosis.len() {
            assert!((r.layer_propagated_sigma - 5.0).abs() < 1e-12);
        }
        #[allow(clippy::cast_precision_loss)]
        let want = 5.0 * (i as f64).sqrt();
        assert!((r.cumulative_sigma - want).abs() < 1e-9, "row {i}");
    }
}

#[test]
fn single_row_prognosis_has_no_thickness() {
    let p = predict(
        &defaults::reference_rows(),
        &prognosis(&[("KS Mendez", 1.274, 4362.0)]),
        &UncertaintyModel::default(),
        1927.0,
    )
    .unwrap();
    let r = &p.prognosis[0];
    assert_eq!(r.delta_time, 0.0);
    assert_eq!(r.base_thickness, 0.0);
    assert_eq!(r.error_adjustment, 0.0);
    assert_eq!(r.cumulative_sigma, 0.0);
    assert_eq!(r.predicted_base_depth, 1927.0);
    assert_eq!(r.predicted_min_depth, 1927.0);
    assert_eq!(r.predicted_max_depth, 1927.0);
    // the row's own sigma is still defined, it just never accumulates
    let own = layer_sigma(0.0, 4362.0, &UncertaintyModel::default());
    assert!((r.layer_propagated_sigma - own).abs() < 1e-12);
}

#[test]
fn discordant_prognosis_layer_adds_no_depth() {
    let mut rows = prognosis(&[("A", 1.0, 4000.0), ("B", 1.1, 4000.0), ("C", 1.2, 4000.0)]);
    rows[1].surface_type = SurfaceType::Discordant;
    let reference = vec![ReferenceLayerRow::new(SurfaceType::Concordant, "A", 0.0, 0.0, 1.0)];
    let p = predict(&reference, &rows, &residual_only(), 0.0).unwrap();
    assert!((p.prognosis[1].predicted_base_depth - 200.0).abs() < EPS);
    assert!((p.prognosis[2].predicted_base_depth - 200.0).abs() < EPS);
    // sigma still accumulates through the discordant layer
    assert!((p.prognosis[2].cumulative_sigma - 50.0_f64.sqrt()).abs() < 1e-9);
}

// ============================================================================
// Matching
// ============================================================================

#[test]
fn unmatched_tops_default_to_zero_error() {
    let rows = prognosis(&[("Otates", 1.0, 4000.0), ("KS Mendez", 1.1, 4000.0), ("Basamento", 1.2, 4500.0)]);
    let p = predict(&defaults::reference_rows(), &rows, &UncertaintyModel::default(), 0.0).unwrap();
    let unmatched: Vec<&str> = p.unmatched_tops().collect();
    assert_eq!(unmatched, vec!["Otates", "Basamento"]);
    assert_eq!(p.prognosis[0].reference_error_used, 0.0);
    assert_eq!(p.prognosis[0].predicted_shallow_depth, p.prognosis[0].predicted_deep_depth);
}

#[test]
fn names_match_case_insensitively_and_by_substring() {
    let rows = prognosis(&[("ks agua nueva", 1.0, 4000.0), ("San Felipe", 1.1, 4000.0), ("KM", 1.2, 4500.0)]);
    let p = predict(&defaults::reference_rows(), &rows, &UncertaintyModel::default(), 0.0).unwrap();
    assert_eq!(p.prognosis[0].reference_match.as_deref(), Some("Ks Agua Nueva"));
    assert_eq!(p.prognosis[1].reference_match.as_deref(), Some("KS San Felipe"));
    assert_eq!(p.prognosis[2].reference_match.as_deref(), Some("KM Tamabra"));
    assert!((p.prognosis[1].reference_error_used + 6.5).abs() < 1e-4);
}

// ============================================================================
// Purity
// ============================================================================

#[test]
fn identical_inputs_give_identical_outputs() {
    let reference = defaults::reference_rows();
    let rows = defaults::prognosis_rows();
    let u = UncertaintyModel::default();
    let a = predict(&reference, &rows, &u, 1927.0).unwrap();
    let b = predict(&reference, &rows, &u, 1927.0).unwrap();
    assert_eq!(a, b);
    assert_eq!(reference, defaults::reference_rows());
    assert_eq!(rows, defaults::prognosis_rows());
}
