use rustymesa::ticks::{calc_log_ticks, tick_marks};

const F_MAX: f64 = 0.33;
const F_MIN: f64 = 0.1;

fn assert_sorted_unique(ticks: &[f64]) {
    for w in ticks.windows(2) {
        assert!(w[0] < w[1], "ticks not strictly ascending: {:?}", w);
    }
}

#[test]
fn contains_bounds_and_is_sorted() {
    for &(lo, hi) in &[(1000.0, 100_000.0), (2.0, 3.0), (0.001, 10.0), (5330.0, 5960.0)] {
        for remove in [false, true] {
            let ticks = calc_log_ticks(lo, hi, remove);
            assert_sorted_unique(&ticks);
            assert!(ticks.contains(&lo), "missing low bound for ({lo}, {hi})");
            assert!(ticks.contains(&hi), "missing high bound for ({lo}, {hi})");
        }
    }
}

#[test]
fn reversed_input_gives_same_ascending_output() {
    let forward = calc_log_ticks(1000.0, 80_000.0, true);
    let reversed = calc_log_ticks(80_000.0, 1000.0, true);
    assert_eq!(forward, reversed);
}

#[test]
fn dense_output_respects_max_gap() {
    for &(lo, hi) in &[(1000.0, 100_000.0), (2.0, 3.0), (1.0, 1e6), (700.0, 900.0)] {
        let ticks = calc_log_ticks(lo, hi, false);
        let length = (hi / lo).log10();
        for w in ticks.windows(2) {
            let gap = (w[1] / w[0]).log10();
            assert!(
                gap <= F_MAX * length + 1e-9,
                "gap {gap} exceeds {} for ({lo}, {hi})",
                F_MAX * length
            );
        }
    }
}

#[test]
fn labeled_output_respects_min_gap_between_interior_ticks() {
    for &(lo, hi) in &[(1000.0, 100_000.0), (2.0, 3.0), (1.0, 1e6)] {
        let ticks = calc_log_ticks(lo, hi, true);
        let length = (hi / lo).log10();
        // The forced bounds may sit close to a neighbor; every other pair
        // must clear the minimum.
        for (i, w) in ticks.windows(2).enumerate() {
            if i == 0 || i == ticks.len() - 2 {
                continue;
            }
            let gap = (w[1] / w[0]).log10();
            assert!(
                gap >= F_MIN * length - 1e-9,
                "gap {gap} below {} for ({lo}, {hi})",
                F_MIN * length
            );
        }
    }
}

#[test]
fn pure_function_is_idempotent() {
    let a = calc_log_ticks(321.0, 45_678.0, true);
    let b = calc_log_ticks(321.0, 45_678.0, true);
    assert_eq!(a, b);
}

#[test]
fn four_decades_keeps_round_numbers() {
    let ticks = calc_log_ticks(1000.0, 100_000.0, true);
    assert!(ticks.contains(&1000.0));
    assert!(ticks.contains(&100_000.0));
    assert!(ticks.contains(&10_000.0), "powers of ten survive removal: {:?}", ticks);
    let length = 2.0;
    for (i, w) in ticks.windows(2).enumerate() {
        if i == 0 || i == ticks.len() - 2 {
            continue;
        }
        let gap = (w[1] / w[0]).log10();
        assert!(gap >= F_MIN * length - 1e-9, "{:?}", ticks);
    }
}

#[test]
fn removal_prefers_dropping_least_significant_mantissas() {
    // Between 5 and 60 the dense set starts as 5, 6, ..., 10, 20, ..., 60.
    // The 0.1-step mantissas (6, 7, 8, 9, 30, 40, ...) must go before the
    // power of ten does.
    let ticks = calc_log_ticks(5.0, 60.0, true);
    assert!(ticks.contains(&10.0), "kept the power of ten: {:?}", ticks);
    assert!(!ticks.contains(&7.0), "dropped a crowded 0.1-step value: {:?}", ticks);
}

#[test]
fn major_ticks_are_a_subset_of_minor_ticks() {
    let marks = tick_marks(1000.0, 80_000.0);
    let minor_only: Vec<f64> = marks.iter().map(|t| t.value).collect();
    let major: Vec<f64> = marks.iter().filter(|t| t.major).map(|t| t.value).collect();
    let expected_major = calc_log_ticks(1000.0, 80_000.0, true);
    assert_eq!(major, expected_major);
    assert_eq!(minor_only, calc_log_ticks(1000.0, 80_000.0, false));
    assert!(major.len() < minor_only.len());
}

#[test]
fn narrow_window_inside_one_decade_still_subdivides() {
    let ticks = calc_log_ticks(5330.0, 5960.0, false);
    assert!(ticks.len() >= 4, "needs interior ticks: {:?}", ticks);
    assert_sorted_unique(&ticks);
}
