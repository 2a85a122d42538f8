//! HR-diagram and time-series overlays, recomputed on every view change.
//!
//! Instead of hooking a plotting library's pan/zoom callbacks, the renderer
//! calls [`hr_overlay`] with the current visible rectangle whenever the view
//! changes and repaints from the returned description. Everything here is a
//! pure function of the viewport, the track, and the static spectral tables.

use anyhow::{Context, Result};
use serde::Serialize;

use crate::format::format_thousands;
use crate::model::History;
use crate::overlay::{select_model_ticks, select_visible_model_labels, ModelPoint, ModelTick, SelectedLabel};
use crate::spectral::{
    band_borders, locate_spectral_labels, spectral_bands, AxisLabel, BandAttribute,
    SpectralLabelConfig,
};
use crate::ticks::calc_log_ticks;
use crate::view::{LogAxisView, LogViewRect};

/// An evolutionary track ready for HR plotting: the full path in linear
/// units plus the subset of samples eligible for model-number labels.
#[derive(Debug, Clone)]
pub struct EvolutionTrack {
    /// (temperature K, luminosity Lsun) per model, in model order.
    pub path: Vec<(f64, f64)>,
    /// Samples that have a profile, so their labels lead somewhere.
    pub labeled_points: Vec<ModelPoint>,
}

/// Build a track from a loaded history.
pub fn track_from_history(history: &History) -> Result<EvolutionTrack> {
    let log_teff = history
        .get("log_Teff")
        .context("history is missing log_Teff")?;
    let log_l = history.get("log_L").context("history is missing log_L")?;
    let path: Vec<(f64, f64)> = log_teff
        .values()
        .iter()
        .zip(log_l.values())
        .map(|(&t, &l)| (10f64.powf(t), 10f64.powf(l)))
        .collect();
    let labeled_points = history
        .model_numbers_available
        .iter()
        .filter_map(|&model| {
            let temp = 10f64.powf(log_teff.value_at(model)?);
            let luminosity = 10f64.powf(log_l.value_at(model)?);
            Some(ModelPoint {
                model_number: model,
                temp,
                luminosity,
            })
        })
        .collect();
    Ok(EvolutionTrack {
        path,
        labeled_points,
    })
}

/// A shaded background span for one spectral band.
#[derive(Debug, Clone, Serialize)]
pub struct BandSpan {
    pub range: (f64, f64),
    pub letter: char,
    /// Bands alternate shaded/unshaded so neighbors stay distinguishable.
    pub shaded: bool,
}

#[derive(Debug, Clone, Default)]
pub struct HrConfig {
    pub spectral: SpectralLabelConfig,
}

/// Everything the renderer needs to redraw HR-diagram decorations.
#[derive(Debug, Clone, Serialize)]
pub struct HrOverlay {
    /// Labeled temperature ticks, ordered to match the axis direction.
    pub x_major: Vec<AxisLabel>,
    /// Unlabeled temperature gridline positions, same order.
    pub x_minor: Vec<f64>,
    /// Luminosity decade ticks, ascending.
    pub y_major: Vec<f64>,
    pub spectral: Vec<AxisLabel>,
    pub band_borders: Vec<f64>,
    pub band_spans: Vec<BandSpan>,
    pub model_labels: Vec<SelectedLabel>,
}

/// Recompute the full overlay for the current viewport.
pub fn hr_overlay(
    view: &LogViewRect,
    track: &EvolutionTrack,
    current_model: Option<u32>,
    cfg: &HrConfig,
) -> HrOverlay {
    let x = &view.x;
    let mut x_major_values = calc_log_ticks(x.lo(), x.hi(), true);
    let mut x_minor = calc_log_ticks(x.lo(), x.hi(), false);
    if x.inverted() {
        x_major_values.reverse();
        x_minor.reverse();
    }
    let x_major = x_major_values
        .into_iter()
        .map(|value| AxisLabel {
            value,
            text: format_thousands(value),
        })
        .collect();

    let spectral = locate_spectral_labels(x, BandAttribute::Temperature, &cfg.spectral);
    let band_spans = spectral_bands()
        .iter()
        .enumerate()
        .map(|(i, band)| BandSpan {
            range: band.temp_range,
            letter: band.letter,
            shaded: i % 2 == 0,
        })
        .collect();

    HrOverlay {
        x_major,
        x_minor,
        y_major: decade_ticks(view.y.lo(), view.y.hi(), 5),
        spectral,
        band_borders: band_borders(BandAttribute::Temperature),
        band_spans,
        model_labels: select_visible_model_labels(view, &track.labeled_points, current_model),
    }
}

/// Powers of ten inside [lo, hi], thinned to at most `max_count` by stepping
/// whole exponents.
fn decade_ticks(lo: f64, hi: f64, max_count: usize) -> Vec<f64> {
    debug_assert!(lo > 0.0 && max_count > 0);
    // Nudge past float noise so bounds sitting on a decade keep their tick.
    let first = (lo.log10() - 1e-9).ceil() as i32;
    let last = (hi.log10() + 1e-9).floor() as i32;
    if last < first {
        return Vec::new();
    }
    let count = (last - first + 1) as usize;
    let step = count.div_ceil(max_count).max(1) as i32;
    (first..=last)
        .step_by(step as usize)
        .map(|k| 10f64.powi(k))
        .collect()
}

/// The default HR viewport: hot-to-cold temperature axis, six orders of
/// magnitude of luminosity headroom in both directions.
pub fn default_hr_view(px_width: f64, px_height: f64) -> LogViewRect {
    LogViewRect::new(
        LogAxisView::new(80_000.0, 1_000.0, px_width),
        LogAxisView::new(1e-6, 1e8, px_height),
    )
}

/// Overlay for the time-series plots: model-number ticks on the secondary
/// axis plus the marker line for the selected model.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryOverlay {
    pub model_ticks: Vec<ModelTick>,
    /// Age (years) of the currently selected model, when one is set and the
    /// history covers it.
    pub current_marker: Option<f64>,
}

/// Recompute the time-series overlay for the visible age range.
pub fn history_overlay(
    xmin: f64,
    xmax: f64,
    history: &History,
    current_model: Option<u32>,
) -> Result<HistoryOverlay> {
    let star_age = history
        .get("star_age")
        .context("history is missing star_age")?;
    let (ages, models): (Vec<f64>, Vec<u32>) = history
        .model_numbers_available
        .iter()
        .filter_map(|&m| Some((star_age.value_at(m)?, m)))
        .unzip();
    let model_ticks = select_model_ticks(xmin, xmax, &ages, &models);
    let current_marker = current_model.and_then(|m| star_age.value_at(m));
    Ok(HistoryOverlay {
        model_ticks,
        current_marker,
    })
}
