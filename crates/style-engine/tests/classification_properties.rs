//! Properties every classification must satisfy, checked over randomly
//! drawn inputs with a fixed seed.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sld_common::{ClassValue, ClassificationMode, Sample};
use style_engine::{classify, Bound, ClassBreak, RampSpec, ResolvedRamp};
use test_utils::assert_approx_eq;

const SEED: u64 = 0x5eed_c0de;
const CASES: usize = 200;

fn interval(b: &ClassBreak) -> (f64, f64, bool) {
    match b.bound {
        Bound::Interval {
            lower,
            upper,
            inclusive_upper,
        } => (lower, upper, inclusive_upper),
        Bound::Exact(ref v) => panic!("expected interval, got exact {}", v),
    }
}

fn viridis() -> ResolvedRamp {
    RampSpec::named("viridis").resolve().unwrap()
}

fn random_range(rng: &mut StdRng) -> (f64, f64) {
    // Bounds near f64::MAX, where max - min overflows.
    if rng.gen_bool(0.1) {
        let min: f64 = -rng.gen_range(1.0e307..f64::MAX);
        let max: f64 = rng.gen_range(1.0e307..f64::MAX);
        return (min, max);
    }

    let a: f64 = rng.gen_range(-1.0e6..1.0e6);
    let width: f64 = if rng.gen_bool(0.1) {
        0.0
    } else {
        rng.gen_range(1.0e-3..1.0e5)
    };
    (a, a + width)
}

// ============================================================================
// Continuous classification
// ============================================================================

#[test]
fn test_breaks_partition_range_exactly() {
    let mut rng = StdRng::seed_from_u64(SEED);
    let ramp = viridis();

    for _ in 0..CASES {
        let (min, max) = random_range(&mut rng);
        let count = rng.gen_range(1..=12);
        let breaks = classify(
            &Sample::Range { min, max },
            &ramp,
            ClassificationMode::Range,
            Some(count),
        )
        .unwrap();

        let first = interval(&breaks[0]);
        let last = interval(&breaks[breaks.len() - 1]);
        assert_eq!(first.0, min);
        assert_eq!(last.1, max);
        assert!(last.2, "final interval must include its upper bound");

        for pair in breaks.windows(2) {
            let (_, upper, inclusive) = interval(&pair[0]);
            let (lower, _, _) = interval(&pair[1]);
            assert_eq!(upper, lower);
            assert!(!inclusive);
        }

        if min == max {
            assert_eq!(breaks.len(), 1);
        } else {
            assert_eq!(breaks.len(), count);
        }
    }
}

#[test]
fn test_every_value_in_exactly_one_break() {
    let mut rng = StdRng::seed_from_u64(SEED + 1);
    let ramp = viridis();

    for _ in 0..CASES {
        let (min, max) = random_range(&mut rng);
        let count = rng.gen_range(1..=10);
        let breaks = classify(
            &Sample::Range { min, max },
            &ramp,
            ClassificationMode::Range,
            Some(count),
        )
        .unwrap();

        // Random interior points plus every boundary.
        let mut points: Vec<f64> = (0..20)
            .map(|_| {
                let t: f64 = rng.gen();
                (min * (1.0 - t) + max * t).clamp(min, max)
            })
            .collect();
        for b in &breaks {
            let (lower, upper, _) = interval(b);
            points.push(lower);
            points.push(upper);
        }

        for v in points {
            let hits = breaks
                .iter()
                .filter(|b| b.contains(&ClassValue::Number(v)))
                .count();
            assert_eq!(hits, 1, "value {} matched {} breaks in [{}, {}]", v, hits, min, max);
        }

        // Outside the range nothing matches.
        let above = max + max.abs().max(1.0);
        let below = min - min.abs().max(1.0);
        assert!(!breaks.iter().any(|b| b.contains(&ClassValue::Number(above))));
        assert!(!breaks.iter().any(|b| b.contains(&ClassValue::Number(below))));
    }
}

#[test]
fn test_boundaries_are_equal_width() {
    let ramp = viridis();
    let breaks = classify(
        &Sample::Range { min: -3.0, max: 9.0 },
        &ramp,
        ClassificationMode::Range,
        Some(4),
    )
    .unwrap();

    for b in &breaks {
        let (lower, upper, _) = interval(b);
        assert_approx_eq!(upper - lower, 3.0, 1e-12);
    }
}

#[test]
fn test_colors_follow_ramp_positions() {
    let spec = RampSpec::colors(["#000000", "#ffffff"]);
    let ramp = spec.resolve().unwrap();
    let continuous = match &ramp {
        ResolvedRamp::Continuous(r) => r.clone(),
        other => panic!("unexpected {:?}", other),
    };

    for n in 1..8usize {
        let breaks = classify(
            &Sample::Range { min: 0.0, max: 1.0 },
            &ramp,
            ClassificationMode::Range,
            Some(n),
        )
        .unwrap();
        for (i, b) in breaks.iter().enumerate() {
            let t = if n == 1 { 0.0 } else { i as f64 / (n - 1) as f64 };
            assert_eq!(b.color, continuous.color_at(t));
        }
        assert_eq!(breaks[0].color.to_hex(), "#000000");
        if n > 1 {
            assert_eq!(breaks[n - 1].color.to_hex(), "#ffffff");
        }
    }
}

// ============================================================================
// Discrete classification
// ============================================================================

#[test]
fn test_k_values_give_k_distinct_breaks() {
    let mut rng = StdRng::seed_from_u64(SEED + 2);
    let ramp = RampSpec::named("tab20").resolve().unwrap();

    for _ in 0..CASES {
        let k = rng.gen_range(1..40);
        let mut values: Vec<i64> = Vec::with_capacity(k);
        while values.len() < k {
            let v = rng.gen_range(-500..500);
            if !values.contains(&v) {
                values.push(v);
            }
        }

        let sample = Sample::values(values.iter().copied());
        let breaks = classify(&sample, &ramp, ClassificationMode::Values, None).unwrap();
        assert_eq!(breaks.len(), k);

        let bound: Vec<f64> = breaks
            .iter()
            .map(|b| match &b.bound {
                Bound::Exact(v) => v.as_f64().unwrap(),
                other => panic!("unexpected {:?}", other),
            })
            .collect();
        assert!(bound.windows(2).all(|w| w[0] < w[1]), "numeric values must ascend");

        for v in &values {
            let hits = breaks
                .iter()
                .filter(|b| b.contains(&ClassValue::Number(*v as f64)))
                .count();
            assert_eq!(hits, 1);
        }
    }
}

#[test]
fn test_text_values_keep_order_and_membership() {
    let values = ["water", "forest", "residential", "agriculture", "water"];
    let ramp = RampSpec::named("Set3").resolve().unwrap();
    let breaks = classify(
        &Sample::Values(values.iter().map(|v| ClassValue::from(*v)).collect()),
        &ramp,
        ClassificationMode::Values,
        None,
    )
    .unwrap();

    let labels: Vec<&str> = breaks.iter().map(|b| b.label.as_str()).collect();
    assert_eq!(labels, vec!["water", "forest", "residential", "agriculture"]);
    for v in &values {
        let hits = breaks.iter().filter(|b| b.contains(&(*v).into())).count();
        assert_eq!(hits, 1);
    }
}
