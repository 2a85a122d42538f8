//! Plot-item tables: isotopes, fusion rate, convection measures, and the
//! interior x-axis options.

use once_cell::sync::Lazy;

use crate::color::{tab20, ColorMap, Rgb};
use crate::model::{History, Profile, SampleSeries};

/// One plottable quantity, tying the profile column to its history
/// counterpart and carrying the styling a renderer needs.
#[derive(Debug, Clone)]
pub struct PlotItem {
    /// Column name in a profile (e.g. "h1").
    pub profile_key: &'static str,
    /// Series name in the history (e.g. "center_h1"), when one exists.
    pub history_key: Option<&'static str>,
    pub label: &'static str,
    /// Line color for time-series plots.
    pub color: Rgb,
    /// Heatmap colormap for circular interior plots.
    pub cmap: ColorMap,
    /// Draw a dashed line at the initial abundance in profile plots.
    pub show_initial_abundance: bool,
}

impl PlotItem {
    pub fn profile_values<'a>(&self, profile: &'a Profile) -> Option<&'a [f64]> {
        profile.column(self.profile_key)
    }

    pub fn history_values<'a>(&self, history: &'a History) -> Option<&'a SampleSeries> {
        history.get(self.history_key?)
    }

    /// Largest finite profile value, or negative infinity when the column
    /// is missing or empty. Used against significance cutoffs.
    pub fn profile_max(&self, profile: &Profile) -> f64 {
        self.profile_values(profile)
            .map(|v| v.iter().copied().filter(|x| x.is_finite()).fold(f64::NEG_INFINITY, f64::max))
            .unwrap_or(f64::NEG_INFINITY)
    }
}

fn isotope(
    index: usize,
    profile_key: &'static str,
    history_key: &'static str,
    label: &'static str,
) -> PlotItem {
    PlotItem {
        profile_key,
        history_key: Some(history_key),
        label,
        color: tab20(index),
        cmap: ColorMap::Viridis,
        show_initial_abundance: false,
    }
}

/// All isotopes tracked in composition plots, colored with alternating
/// bright/pastel palette entries so adjacent species stay distinguishable.
pub fn isotopes() -> &'static [PlotItem] {
    static ISOTOPES: Lazy<Vec<PlotItem>> = Lazy::new(|| {
        let mut items = vec![
            isotope(0, "h1", "center_h1", "Hydrogen"),
            isotope(2, "he3", "center_he3", "Helium 3"),
            isotope(4, "he4", "center_he4", "Helium 4"),
            isotope(6, "c12", "center_c12", "Carbon 12"),
            isotope(8, "n14", "center_n14", "Nitrogen 14"),
            isotope(10, "o16", "center_o16", "Oxygen 16"),
            isotope(12, "ne20", "center_ne20", "Neon 20"),
            isotope(14, "mg24", "center_mg24", "Magnesium 24"),
            isotope(16, "si28", "center_si28", "Silicon 28"),
            isotope(18, "s32", "center_s32", "Sulfur 32"),
            isotope(1, "ar36", "center_ar36", "Argon 36"),
            isotope(3, "ca40", "center_ca40", "Calcium 40"),
            isotope(5, "ti44", "center_ti44", "Titanium 44"),
            isotope(7, "cr48", "center_cr48", "Chromium 48"),
            isotope(9, "fe52", "center_fe52", "Iron 52"),
            isotope(11, "fe54", "center_fe54", "Iron 54"),
            isotope(13, "fe56", "center_fe56", "Iron 56"),
            isotope(17, "ni56", "center_ni56", "Nickel 56"),
        ];
        items[0].show_initial_abundance = true;
        items[2].show_initial_abundance = true;
        items
    });
    &ISOTOPES
}

/// Specific nuclear energy generation rate for fusion heatmaps.
pub fn fusion_rates() -> &'static [PlotItem] {
    static FUSION: Lazy<Vec<PlotItem>> = Lazy::new(|| {
        vec![PlotItem {
            profile_key: "eps_nuc",
            history_key: None,
            label: "Fusion rate (erg/g/s)",
            color: tab20(6),
            cmap: ColorMap::Inferno,
            show_initial_abundance: false,
        }]
    });
    &FUSION
}

/// Mixing diffusion coefficients (log10 cm^2/s). Values bottom out around
/// 1e-99 where a process is inactive, which is why convection scenes filter
/// with a deep log cutoff instead of zero.
pub fn convection_measures() -> &'static [PlotItem] {
    static CONVECTION: Lazy<Vec<PlotItem>> = Lazy::new(|| {
        vec![
            PlotItem {
                profile_key: "log_D_conv",
                history_key: None,
                label: "Convection",
                color: tab20(0),
                cmap: ColorMap::Blues,
                show_initial_abundance: false,
            },
            PlotItem {
                profile_key: "log_D_sc",
                history_key: None,
                label: "Semiconvection",
                color: tab20(4),
                cmap: ColorMap::Greens,
                show_initial_abundance: false,
            },
            PlotItem {
                profile_key: "log_D_ovr",
                history_key: None,
                label: "Overshooting",
                color: tab20(2),
                cmap: ColorMap::Oranges,
                show_initial_abundance: false,
            },
        ]
    });
    &CONVECTION
}

/// Which coordinate represents "where inside the star" on interior plots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileXAxis {
    Radius,
    MassCoordinate,
}

impl ProfileXAxis {
    /// The profile column holding the coordinate values.
    pub fn values<'a>(&self, profile: &'a Profile) -> Option<&'a [f64]> {
        match self {
            ProfileXAxis::Radius => profile.column("radius"),
            ProfileXAxis::MassCoordinate => profile.column("mass"),
        }
    }

    pub fn unit_label(&self) -> &'static str {
        match self {
            ProfileXAxis::Radius => "Rsun",
            ProfileXAxis::MassCoordinate => "Msun",
        }
    }

    /// History series giving each successive burning core's boundary in this
    /// coordinate; the largest nonzero one is the current core size.
    pub fn core_keys(&self) -> &'static [&'static str] {
        match self {
            ProfileXAxis::Radius => &[
                "he_core_radius",
                "c_core_radius",
                "o_core_radius",
                "si_core_radius",
                "fe_core_radius",
            ],
            ProfileXAxis::MassCoordinate => &[
                "he_core_mass",
                "c_core_mass",
                "o_core_mass",
                "si_core_mass",
                "fe_core_mass",
            ],
        }
    }
}
