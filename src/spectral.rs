//! Spectral-type bands and the zoom-adaptive label locator.
//!
//! Zoomed out, each band contributes a single letter (O, B, A, F, G, K, M)
//! placed at the geometric mean of its visible sub-range. Once one band
//! fills enough of the axis, the locator switches that band to subtype
//! labels ("G2V") and picks a pixel-spaced subset so text never collides,
//! starting from the subtype nearest the screen center and walking outward.
//!
//! Subtype data is the Pecaut & Mamajek (2013) mean dwarf sequence:
//! <https://www.pas.rochester.edu/~emamajek/EEM_dwarf_UBVIJHK_colors_Teff.txt>

use once_cell::sync::Lazy;
use serde::Serialize;

use crate::view::LogAxisView;

/// One finer classification step inside a band, e.g. "G2V".
#[derive(Debug, Clone, Copy)]
pub struct SpectralSubtype {
    pub label: &'static str,
    /// Effective temperature (K).
    pub temp: f64,
    /// Main-sequence mass (Msun).
    pub ms_mass: f64,
}

/// One broad spectral class with its temperature and mass ranges.
///
/// Bands are contiguous and non-overlapping across the stellar temperature
/// domain; subtypes are ordered by descending temperature.
#[derive(Debug, Clone)]
pub struct SpectralBand {
    pub letter: char,
    /// (min, max) effective temperature in K.
    pub temp_range: (f64, f64),
    /// (min, max) main-sequence mass in Msun.
    pub ms_mass_range: (f64, f64),
    pub subtypes: Vec<SpectralSubtype>,
}

impl SpectralBand {
    pub fn temp_midpoint(&self) -> f64 {
        (self.temp_range.0 * self.temp_range.1).sqrt()
    }

    pub fn mass_midpoint(&self) -> f64 {
        (self.ms_mass_range.0 * self.ms_mass_range.1).sqrt()
    }
}

/// Which band attribute a labeled axis carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BandAttribute {
    Temperature,
    MainSequenceMass,
}

impl BandAttribute {
    pub fn range_of(self, band: &SpectralBand) -> (f64, f64) {
        match self {
            BandAttribute::Temperature => band.temp_range,
            BandAttribute::MainSequenceMass => band.ms_mass_range,
        }
    }

    pub fn value_of(self, subtype: &SpectralSubtype) -> f64 {
        match self {
            BandAttribute::Temperature => subtype.temp,
            BandAttribute::MainSequenceMass => subtype.ms_mass,
        }
    }
}

/// A positioned axis label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisLabel {
    pub value: f64,
    pub text: String,
}

#[derive(Debug, Clone, Copy)]
pub struct SpectralLabelConfig {
    /// Visible log-fraction a band must occupy before its subtypes replace
    /// the single letter.
    pub subtype_fraction_threshold: f64,
    /// Minimum pixel distance between accepted subtype labels.
    pub min_subtype_label_px: f64,
}

impl Default for SpectralLabelConfig {
    fn default() -> Self {
        Self {
            subtype_fraction_threshold: 0.45,
            min_subtype_label_px: 60.0,
        }
    }
}

/// The static band table, built once.
pub fn spectral_bands() -> &'static [SpectralBand] {
    &BANDS
}

/// Band boundary positions (each band's lower bound), used for long
/// separator tick marks between the shaded band spans.
pub fn band_borders(attribute: BandAttribute) -> Vec<f64> {
    BANDS.iter().map(|b| attribute.range_of(b).0).collect()
}

/// Compute the spectral labels for the visible range of a log axis.
///
/// Recompute on every pan/zoom/resize: the subtype selection depends on the
/// axis-to-pixel transform carried by `view`. Output order matches the axis
/// direction (descending positions for an inverted axis).
pub fn locate_spectral_labels(
    view: &LogAxisView,
    attribute: BandAttribute,
    cfg: &SpectralLabelConfig,
) -> Vec<AxisLabel> {
    let (lo, hi) = (view.lo(), view.hi());
    let span = view.log_span();
    let mut labels: Vec<AxisLabel> = Vec::new();

    for band in BANDS.iter() {
        let (band_lo, band_hi) = attribute.range_of(band);
        let vis_lo = band_lo.max(lo);
        let vis_hi = band_hi.min(hi);
        if vis_lo >= vis_hi {
            continue;
        }
        let fraction = (vis_hi / vis_lo).log10() / span;
        if fraction < cfg.subtype_fraction_threshold {
            // Overview mode: one letter at the geometric mean of whatever
            // part of the band is on screen.
            labels.push(AxisLabel {
                value: (vis_lo * vis_hi).sqrt(),
                text: band.letter.to_string(),
            });
        } else {
            labels.extend(select_subtypes(band, view, attribute, cfg));
        }
    }

    if view.inverted() {
        labels.sort_by(|a, b| b.value.total_cmp(&a.value));
    } else {
        labels.sort_by(|a, b| a.value.total_cmp(&b.value));
    }
    labels
}

/// Center-out greedy subtype selection: accept the subtype nearest the pixel
/// midpoint, then walk outward in both directions, accepting a candidate
/// only if it clears the minimum pixel distance from the last accepted one.
fn select_subtypes(
    band: &SpectralBand,
    view: &LogAxisView,
    attribute: BandAttribute,
    cfg: &SpectralLabelConfig,
) -> Vec<AxisLabel> {
    let (lo, hi) = (view.lo(), view.hi());
    let mut candidates: Vec<(f64, &SpectralSubtype)> = band
        .subtypes
        .iter()
        .filter_map(|st| {
            let v = attribute.value_of(st);
            (v > lo && v < hi).then(|| (view.to_px(v), st))
        })
        .collect();
    candidates.sort_by(|a, b| a.0.total_cmp(&b.0));
    if candidates.is_empty() {
        return Vec::new();
    }

    let mid_px = view.px * 0.5;
    let pivot = candidates
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| (a.0 - mid_px).abs().total_cmp(&(b.0 - mid_px).abs()))
        .map(|(i, _)| i)
        .unwrap_or(0);

    let mut accepted = vec![pivot];
    let mut last_px = candidates[pivot].0;
    for i in pivot + 1..candidates.len() {
        if candidates[i].0 - last_px >= cfg.min_subtype_label_px {
            accepted.push(i);
            last_px = candidates[i].0;
        }
    }
    last_px = candidates[pivot].0;
    for i in (0..pivot).rev() {
        if last_px - candidates[i].0 >= cfg.min_subtype_label_px {
            accepted.push(i);
            last_px = candidates[i].0;
        }
    }
    accepted.sort_unstable();

    accepted
        .into_iter()
        .map(|i| {
            let st = candidates[i].1;
            AxisLabel {
                value: attribute.value_of(st),
                text: st.label.to_string(),
            }
        })
        .collect()
}

fn subtypes(rows: &[(&'static str, f64, f64)]) -> Vec<SpectralSubtype> {
    rows.iter()
        .map(|&(label, temp, ms_mass)| SpectralSubtype {
            label,
            temp,
            ms_mass,
        })
        .collect()
}

static BANDS: Lazy<Vec<SpectralBand>> = Lazy::new(|| {
    vec![
        SpectralBand {
            letter: 'O',
            temp_range: (31_650.0, 999_999_999_999.0),
            ms_mass_range: (18.2, 300.0),
            subtypes: subtypes(&[
                ("O3V", 44_900.0, 59.0),
                ("O4V", 42_900.0, 48.0),
                ("O5V", 41_400.0, 43.0),
                ("O5.5V", 40_500.0, 38.0),
                ("O6V", 39_500.0, 35.0),
                ("O6.5V", 38_300.0, 31.0),
                ("O7V", 37_100.0, 28.0),
                ("O7.5V", 36_100.0, 26.0),
                ("O8V", 35_100.0, 23.6),
                ("O8.5V", 34_300.0, 21.9),
                ("O9V", 33_300.0, 20.2),
                ("O9.5V", 31_900.0, 18.7),
            ]),
        },
        SpectralBand {
            letter: 'B',
            temp_range: (10_000.0, 31_650.0),
            ms_mass_range: (2.33, 18.2),
            subtypes: subtypes(&[
                ("B0V", 31_400.0, 17.7),
                ("B0.5V", 29_000.0, 14.8),
                ("B1V", 26_000.0, 11.8),
                ("B1.5V", 24_500.0, 9.9),
                ("B2V", 20_600.0, 7.3),
                ("B2.5V", 18_500.0, 6.1),
                ("B3V", 17_000.0, 5.4),
                ("B4V", 16_400.0, 5.1),
                ("B5V", 15_700.0, 4.7),
                ("B6V", 14_500.0, 4.3),
                ("B7V", 14_000.0, 3.92),
                ("B8V", 12_300.0, 3.38),
                ("B9V", 10_700.0, 2.75),
                ("B9.5V", 10_400.0, 2.68),
            ]),
        },
        SpectralBand {
            letter: 'A',
            temp_range: (7_300.0, 10_000.0),
            ms_mass_range: (1.68, 2.33),
            subtypes: subtypes(&[
                ("A0V", 9_700.0, 2.18),
                ("A1V", 9_300.0, 2.05),
                ("A2V", 8_800.0, 1.98),
                ("A3V", 8_600.0, 1.93),
                ("A4V", 8_250.0, 1.88),
                ("A5V", 8_100.0, 1.86),
                ("A6V", 7_910.0, 1.83),
                ("A7V", 7_760.0, 1.81),
                ("A8V", 7_590.0, 1.77),
                ("A9V", 7_400.0, 1.75),
            ]),
        },
        SpectralBand {
            letter: 'F',
            temp_range: (5_960.0, 7_300.0),
            ms_mass_range: (1.07, 1.68),
            subtypes: subtypes(&[
                ("F0V", 7_220.0, 1.61),
                ("F1V", 7_020.0, 1.50),
                ("F2V", 6_820.0, 1.46),
                ("F3V", 6_750.0, 1.44),
                ("F4V", 6_670.0, 1.38),
                ("F5V", 6_550.0, 1.33),
                ("F6V", 6_350.0, 1.25),
                ("F7V", 6_280.0, 1.21),
                ("F8V", 6_180.0, 1.18),
                ("F9V", 6_050.0, 1.13),
                ("F9.5V", 5_990.0, 1.08),
            ]),
        },
        SpectralBand {
            letter: 'G',
            temp_range: (5_330.0, 5_960.0),
            ms_mass_range: (0.89, 1.07),
            subtypes: subtypes(&[
                ("G0V", 5_930.0, 1.06),
                ("G1V", 5_860.0, 1.03),
                ("G2V", 5_770.0, 1.00),
                ("G3V", 5_720.0, 0.99),
                ("G4V", 5_680.0, 0.985),
                ("G5V", 5_660.0, 0.98),
                ("G6V", 5_600.0, 0.97),
                ("G7V", 5_550.0, 0.95),
                ("G8V", 5_480.0, 0.94),
                ("G9V", 5_380.0, 0.90),
            ]),
        },
        SpectralBand {
            letter: 'K',
            temp_range: (3_890.0, 5_330.0),
            ms_mass_range: (0.58, 0.89),
            subtypes: subtypes(&[
                ("K0V", 5_270.0, 0.88),
                ("K1V", 5_170.0, 0.86),
                ("K2V", 5_100.0, 0.82),
                ("K3V", 4_830.0, 0.78),
                ("K4V", 4_600.0, 0.73),
                ("K5V", 4_440.0, 0.70),
                ("K6V", 4_300.0, 0.69),
                ("K7V", 4_100.0, 0.64),
                ("K8V", 3_990.0, 0.62),
                ("K9V", 3_930.0, 0.59),
            ]),
        },
        SpectralBand {
            letter: 'M',
            temp_range: (2_310.0, 3_890.0),
            ms_mass_range: (0.1, 0.58),
            subtypes: subtypes(&[
                ("M0V", 3_850.0, 0.57),
                ("M0.5V", 3_770.0, 0.544),
                ("M1V", 3_660.0, 0.50),
                ("M1.5V", 3_620.0, 0.482),
                ("M2V", 3_560.0, 0.44),
                ("M2.5V", 3_470.0, 0.421),
                ("M3V", 3_430.0, 0.37),
                ("M3.5V", 3_270.0, 0.300),
                ("M4V", 3_210.0, 0.23),
                ("M4.5V", 3_110.0, 0.217),
                ("M5V", 3_060.0, 0.162),
                ("M5.5V", 2_930.0, 0.156),
                ("M6V", 2_810.0, 0.137),
                ("M6.5V", 2_740.0, 0.126),
                ("M7V", 2_680.0, 0.120),
                ("M7.5V", 2_630.0, 0.116),
                ("M8V", 2_570.0, 0.114),
                ("M8.5V", 2_420.0, 0.104),
                ("M9V", 2_380.0, 0.102),
                ("M9.5V", 2_350.0, 0.101),
            ]),
        },
    ]
});
