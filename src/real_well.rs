//! Drilled-well check
//!
//! Places the observed (time, depth) pairs of a drilled well against the
//! predicted depth-vs-time curve and its one-sigma band.

use std::cmp::Ordering;

use tracing::debug;

use crate::types::{ActualPoint, ActualResidual, AnnotatedPrognosisRow};

/// (twt, base, min, max) knot of the predicted curve
#[derive(Debug, Clone, Copy)]
struct Knot {
    twt: f64,
    base: f64,
    min: f64,
    max: f64,
}

impl Knot {
    fn lerp(a: Self, b: Self, t: f64) -> Self {
        let span = b.twt - a.twt;
        let w = if span > 0.0 { (t - a.twt) / span } else { 1.0 };
        Self {
            twt: t,
            base: a.base + w * (b.base - a.base),
            min: a.min + w * (b.min - a.min),
            max: a.max + w * (b.max - a.max),
        }
    }
}

/// Sorted by time; of several rows sharing a time, the last one in table order is kept.
fn curve(rows: &[AnnotatedPrognosisRow]) -> Vec<Knot> {
    let mut knots: Vec<Knot> = rows
        .iter()
        .map(|r| Knot {
            twt: r.predicted_two_way_time,
            base: r.predicted_base_depth,
            min: r.predicted_min_depth,
            max: r.predicted_max_depth,
        })
        .collect();
    knots.sort_by(|a, b| a.twt.partial_cmp(&b.twt).unwrap_or(Ordering::Equal));

    let mut out: Vec<Knot> = Vec::with_capacity(knots.len());
    for k in knots {
        match out.last_mut() {
            Some(prev) if prev.twt == k.twt => *prev = k,
            _ => out.push(k),
        }
    }
    out
}

fn sample(knots: &[Knot], t: f64) -> Option<Knot> {
    let first = *knots.first()?;
    let last = *knots.last()?;
    if t <= first.twt {
        return Some(first);
    }
    if t >= last.twt {
        return Some(last);
    }
    knots
        .windows(2)
        .find(|w| t >= w[0].twt && t <= w[1].twt)
        .map(|w| Knot::lerp(w[0], w[1], t))
}

/// Residuals of each observed point against the interpolated forecast.
///
/// Times outside the predicted range are clamped to the nearest end of the
/// curve. An empty forecast yields no residuals.
pub fn compare_with_actual(
    prognosis: &[AnnotatedPrognosisRow],
    points: &[ActualPoint],
) -> Vec<ActualResidual> {
    let knots = curve(prognosis);
    points
        .iter()
        .filter_map(|p| {
            let k = sample(&knots, p.two_way_time)?;
            let residual = p.tvdss - k.base;
            debug!(twt = p.two_way_time, actual = p.tvdss, predicted = k.base, residual, "Drilled-well residual");
            Some(ActualResidual {
                two_way_time: p.two_way_time,
                actual_tvdss: p.tvdss,
                predicted_base_depth: k.base,
                predicted_min_depth: k.min,
                predicted_max_depth: k.max,
                residual,
                within_band: (k.min..=k.max).contains(&p.tvdss),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predictor::predict;
    use crate::types::{PrognosisLayerRow, ReferenceLayerRow, SurfaceType, UncertaintyModel};

    fn forecast() -> Vec<AnnotatedPrognosisRow> {
        let reference = vec![ReferenceLayerRow::new(SurfaceType::Concordant, "A", 1000.0, 1.0, 4000.0)];
        let prognosis = vec![
            PrognosisLayerRow::new(SurfaceType::Concordant, "A", 1.0, 4000.0),
            PrognosisLayerRow::new(SurfaceType::Concordant, "B", 1.1, 4000.0),
            PrognosisLayerRow::new(SurfaceType::Concordant, "C", 1.2, 4000.0),
        ];
        let u = UncertaintyModel {
            delta_t: 0.0,
            delta_v: 0.0,
            delta_err: 10.0,
        };
        predict(&reference, &prognosis, &u, 1000.0).unwrap().prognosis
    }

    #[test]
    fn test_interpolates_between_tops() {
        let out = compare_with_actual(
            &forecast(),
            &[ActualPoint {
                two_way_time: 1.05,
                tvdss: 1110.0,
            }],
        );
        assert_eq!(out.len(), 1);
        assert!((out[0].predicted_base_depth - 1100.0).abs() < 1e-6);
        assert!((out[0].residual - 10.0).abs() < 1e-6);
        // band half-width at 1.05 s is halfway between 0 and 10 m
        assert!(!out[0].within_band);
    }

    #[test]
    fn test_clamps_outside_range() {
        let out = compare_with_actual(
            &forecast(),
            &[ActualPoint {
                two_way_time: 2.0,
                tvdss: 1400.0,
            }],
        );
        assert!((out[0].predicted_base_depth - 1400.0).abs() < 1e-6);
        assert!(out[0].within_band);
    }

    #[test]
    fn test_empty_forecast() {
        let out = compare_with_actual(&[], &[ActualPoint { two_way_time: 1.0, tvdss: 1.0 }]);
        assert!(out.is_empty());
    }
}
