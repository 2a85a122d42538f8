use rustymesa::overlay::{select_model_ticks, select_visible_model_labels, ModelPoint};
use rustymesa::view::{LogAxisView, LogViewRect};

/// A cooling, brightening diagonal track: one point per model, 0.05 decades
/// apart in temperature and 0.2 decades apart in luminosity.
fn diagonal_points(n: u32) -> Vec<ModelPoint> {
    (1..=n)
        .map(|i| ModelPoint {
            model_number: i,
            temp: 10f64.powf(4.0 - 0.05 * i as f64),
            luminosity: 10f64.powf(0.2 * i as f64),
        })
        .collect()
}

fn hr_view() -> LogViewRect {
    LogViewRect::new(
        LogAxisView::new(10_000.0, 1_000.0, 1000.0),
        LogAxisView::new(1.0, 10_000.0, 600.0),
    )
}

#[test]
fn labels_keep_the_clearance_distance() {
    let view = hr_view();
    let points = diagonal_points(20);
    let labels = select_visible_model_labels(&view, &points, None);
    assert!(!labels.is_empty());
    // 8% of one decade in x, 8% of four decades in y.
    let min_dx = 0.08 * view.x.log_span();
    let min_dy = 0.08 * view.y.log_span();
    for (i, a) in labels.iter().enumerate() {
        for b in labels.iter().skip(i + 1) {
            let dx = (a.x.log10() - b.x.log10()).abs();
            let dy = (a.y.log10() - b.y.log10()).abs();
            assert!(
                dx >= min_dx - 1e-12 || dy >= min_dy - 1e-12,
                "labels {} and {} collide",
                a.model_number,
                b.model_number
            );
        }
    }
}

#[test]
fn greedy_selection_skips_every_other_point_on_a_tight_track() {
    let labels = select_visible_model_labels(&hr_view(), &diagonal_points(20), None);
    let models: Vec<u32> = labels.iter().map(|l| l.model_number).collect();
    assert_eq!(models, vec![1, 3, 5, 7, 9, 11, 13, 15, 17, 19]);
}

#[test]
fn current_model_is_always_kept() {
    let labels = select_visible_model_labels(&hr_view(), &diagonal_points(20), Some(4));
    let models: Vec<u32> = labels.iter().map(|l| l.model_number).collect();
    assert!(models.contains(&4), "{:?}", models);
    // Its neighbors lose out instead.
    assert!(!models.contains(&3));
    assert!(!models.contains(&5));
}

#[test]
fn current_model_outside_view_is_ignored() {
    let view = hr_view();
    let labels = select_visible_model_labels(&view, &diagonal_points(20), Some(999));
    assert!(!labels.iter().any(|l| l.model_number == 999));
}

#[test]
fn empty_viewport_gives_empty_result() {
    let view = LogViewRect::new(
        LogAxisView::new(200.0, 100.0, 1000.0),
        LogAxisView::new(1.0, 10.0, 600.0),
    );
    let labels = select_visible_model_labels(&view, &diagonal_points(20), Some(3));
    assert!(labels.is_empty());
}

#[test]
fn result_is_sorted_by_model_number() {
    let labels = select_visible_model_labels(&hr_view(), &diagonal_points(20), Some(10));
    let models: Vec<u32> = labels.iter().map(|l| l.model_number).collect();
    let mut sorted = models.clone();
    sorted.sort_unstable();
    assert_eq!(models, sorted);
}

#[test]
fn model_ticks_split_into_major_and_minor() {
    let ages = [0.0, 5.0, 12.0, 25.0, 30.0, 55.0, 100.0];
    let models = [1, 2, 3, 4, 5, 6, 7];
    let ticks = select_model_ticks(0.0, 1000.0, &ages, &models);
    let labeled: Vec<u32> = ticks.iter().filter(|t| t.labeled).map(|t| t.model_number).collect();
    let unlabeled: Vec<u32> = ticks.iter().filter(|t| !t.labeled).map(|t| t.model_number).collect();
    assert_eq!(labeled, vec![1, 4, 6, 7]);
    assert_eq!(unlabeled, vec![2, 3, 5]);
    // Labeled ticks clear 2% of the span.
    let labeled_ages: Vec<f64> = ticks.iter().filter(|t| t.labeled).map(|t| t.age).collect();
    for pair in labeled_ages.windows(2) {
        assert!(pair[1] - pair[0] > 20.0);
    }
}

#[test]
fn model_ticks_outside_the_window_are_dropped() {
    let ages = [0.0, 5.0, 12.0, 25.0, 30.0, 55.0, 100.0];
    let models = [1, 2, 3, 4, 5, 6, 7];
    let ticks = select_model_ticks(20.0, 60.0, &ages, &models);
    assert!(ticks.iter().all(|t| t.age >= 20.0 && t.age <= 60.0));
    assert!(ticks.first().map(|t| t.labeled).unwrap_or(false));
}

#[test]
fn zooming_into_a_model_free_region_is_fine() {
    let ages = [0.0, 5.0, 12.0];
    let models = [1, 2, 3];
    let ticks = select_model_ticks(500.0, 600.0, &ages, &models);
    assert!(ticks.is_empty());
}
