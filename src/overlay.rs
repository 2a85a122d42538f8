//! De-conflicted model-number overlays.
//!
//! Both selectors are stateless recomputes: the visible set can change
//! arbitrarily between pan/zoom events, so each call rebuilds the selection
//! from scratch and the renderer replaces the previous artifacts wholesale.

use serde::Serialize;

use crate::view::LogViewRect;

/// One simulation sample eligible for a label on the HR diagram.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelPoint {
    pub model_number: u32,
    /// Effective temperature (K).
    pub temp: f64,
    /// Luminosity (Lsun).
    pub luminosity: f64,
}

/// A label the renderer should draw, at the sample's data coordinates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectedLabel {
    pub model_number: u32,
    pub x: f64,
    pub y: f64,
}

/// Fraction of the visible log span a label claims around itself, per axis.
const LABEL_CLEARANCE: f64 = 0.08;

/// Pick a non-overlapping subset of the points inside `visible` to label.
///
/// Greedy in model-number order; a candidate is rejected when an accepted
/// label sits within the clearance fraction of the visible log range in
/// both axes at once (its padded box would overlap). A designated current
/// model is seeded first so panning never drops its label.
pub fn select_visible_model_labels(
    visible: &LogViewRect,
    points: &[ModelPoint],
    current: Option<u32>,
) -> Vec<SelectedLabel> {
    let min_dx = LABEL_CLEARANCE * visible.x.log_span();
    let min_dy = LABEL_CLEARANCE * visible.y.log_span();

    let in_view: Vec<&ModelPoint> = points
        .iter()
        .filter(|p| visible.contains(p.temp, p.luminosity))
        .collect();

    // (log x, log y, point) of everything accepted so far.
    let mut picked: Vec<(f64, f64, &ModelPoint)> = Vec::new();
    if let Some(current) = current {
        if let Some(&p) = in_view.iter().find(|p| p.model_number == current) {
            picked.push((p.temp.log10(), p.luminosity.log10(), p));
        }
    }

    for &p in &in_view {
        if picked.iter().any(|(_, _, q)| q.model_number == p.model_number) {
            continue;
        }
        let lx = p.temp.log10();
        let ly = p.luminosity.log10();
        let too_close = picked
            .iter()
            .any(|(px, py, _)| (lx - px).abs() < min_dx && (ly - py).abs() < min_dy);
        if !too_close {
            picked.push((lx, ly, p));
        }
    }

    picked.sort_by_key(|(_, _, p)| p.model_number);
    picked
        .into_iter()
        .map(|(_, _, p)| SelectedLabel {
            model_number: p.model_number,
            x: p.temp,
            y: p.luminosity,
        })
        .collect()
}

/// A tick on the secondary model-number axis of a time-series plot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ModelTick {
    pub age: f64,
    pub model_number: u32,
    /// Labeled major tick; minor ticks get a mark only.
    pub labeled: bool,
}

/// Major ticks must be this fraction of the visible span apart for their
/// labels not to overlap; unlabeled marks squeeze in at a fifth of that.
const MIN_LABELED_SPACING: f64 = 0.02;

/// Place model-number ticks along a linear age axis.
///
/// `ages` and `models` are parallel arrays of the samples that have a
/// profile. An empty visible set returns an empty, valid result, so zooming
/// into a model-free region and back out stays well behaved.
pub fn select_model_ticks(xmin: f64, xmax: f64, ages: &[f64], models: &[u32]) -> Vec<ModelTick> {
    debug_assert_eq!(ages.len(), models.len());
    let span = xmax - xmin;
    let min_labeled = span * MIN_LABELED_SPACING;
    let min_unlabeled = min_labeled / 5.0;

    let in_view: Vec<(f64, u32)> = ages
        .iter()
        .zip(models)
        .filter(|&(&age, _)| age >= xmin && age <= xmax)
        .map(|(&age, &model)| (age, model))
        .collect();
    let Some(&(first_age, first_model)) = in_view.first() else {
        return Vec::new();
    };

    let mut ticks = vec![ModelTick {
        age: first_age,
        model_number: first_model,
        labeled: true,
    }];
    let mut last_labeled_age = first_age;
    let mut last_tick_age = first_age;

    for &(age, model) in &in_view[1..] {
        if age > last_labeled_age + min_labeled {
            ticks.push(ModelTick {
                age,
                model_number: model,
                labeled: true,
            });
            last_labeled_age = age;
            last_tick_age = age;
        } else if age > last_tick_age + min_unlabeled {
            ticks.push(ModelTick {
                age,
                model_number: model,
                labeled: false,
            });
            last_tick_age = age;
        }
    }
    ticks
}
