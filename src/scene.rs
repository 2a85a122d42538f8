//! Render-ready scene descriptions for the circular interior plots.
//!
//! The renderer collaborator owns axes, meshes, and text; this module owns
//! the geometry. [`full_circle_plot`] decides which quantities appear,
//! chains the tangent-circle layout, and emits every placed element in
//! normalized figure coordinates, so a renderer only has to paint.

use anyhow::{Context, Result};
use serde::Serialize;

use crate::color::blend_with_white;
use crate::consts::{L_SUN, M_SUN};
use crate::format::{eng_format, round_sigfigs};
use crate::layout::{build_circle_layout, Layout, LayoutParams, Pad, PlotPositions, RadiusMode};
use crate::model::{History, Profile};
use crate::quantities::{convection_measures, fusion_rates, isotopes, PlotItem, ProfileXAxis};

/// Configuration of one circular figure, shared by all its panels.
#[derive(Debug, Clone)]
pub struct CirclePlotConfig {
    pub items: Vec<PlotItem>,
    pub title: String,
    /// Shared color normalization; None lets each panel span its own data.
    pub vmin: Option<f64>,
    pub vmax: Option<f64>,
    /// A quantity must exceed this somewhere in the profile to get a panel.
    pub cutoff: f64,
    pub major_ticks: Vec<f64>,
    pub major_tick_labels: Vec<String>,
    pub minor_ticks: Vec<f64>,
    /// When set, ignore values at or below this cutoff while finding the
    /// data range that the colorbar blocking preserves.
    pub block_colorbar_cutoff: Option<f64>,
}

impl CirclePlotConfig {
    pub fn new(items: Vec<PlotItem>, title: impl Into<String>) -> Self {
        Self {
            items,
            title: title.into(),
            vmin: None,
            vmax: None,
            cutoff: 0.0,
            major_ticks: Vec::new(),
            major_tick_labels: Vec::new(),
            minor_ticks: Vec::new(),
            block_colorbar_cutoff: None,
        }
    }
}

/// Tunables of the figure build that are independent of what is plotted.
#[derive(Debug, Clone)]
pub struct CircleFigureOptions {
    /// Physical height (inches) the pre-padding interior maps to.
    pub base_interior_height_in: f64,
    /// Zoom view radius as a multiple of the core radius.
    pub r_core_view_relative: f64,
    pub pad: Pad,
    pub layout_params: LayoutParams,
}

impl Default for CircleFigureOptions {
    fn default() -> Self {
        Self {
            base_interior_height_in: 6.0,
            r_core_view_relative: 1.25,
            pad: Pad {
                left: 0.4,
                right: 0.0,
                bottom: 0.8,
                top: 0.4,
            },
            layout_params: LayoutParams::default(),
        }
    }
}

/// An axis to place at `center` (figure fractions), spanning `size_frac` of
/// the smaller figure dimension.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct PlacedAxis {
    pub center: (f64, f64),
    pub size_frac: f64,
}

/// Radial heatmap data for one polar panel. The big panel shows the full
/// coordinate range; a small panel clips it to the panel's core ring radius.
#[derive(Debug, Clone, Serialize)]
pub struct HeatmapSpec {
    /// Interior coordinate per zone (Rsun or Msun).
    pub coords: Vec<f64>,
    pub values: Vec<f64>,
    pub cmap: &'static str,
    pub vmin: f64,
    pub vmax: f64,
}

/// A horizontal colorbar with the range outside the data grayed out while
/// keeping the original normalization, so colors compare across panels.
#[derive(Debug, Clone, Serialize)]
pub struct ColorbarSpec {
    /// (left, bottom, width, height) in figure fractions.
    pub rect: [f64; 4],
    pub label: String,
    pub vmin: f64,
    pub vmax: f64,
    /// Value intervals to block out with the background color.
    pub blocked: Vec<(f64, f64)>,
    /// The interval actually covered by data (gets the heavy border).
    pub covered: (f64, f64),
    pub major_ticks: Vec<f64>,
    pub major_tick_labels: Vec<String>,
    pub minor_ticks: Vec<f64>,
}

/// Dashed line between two points in figure fractions.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct GuideLine {
    pub from: (f64, f64),
    pub to: (f64, f64),
}

/// Vertical scale bar with a centered rotated caption.
#[derive(Debug, Clone, Serialize)]
pub struct ScaleBar {
    /// Bottom anchor in figure fractions.
    pub anchor: (f64, f64),
    pub height_frac: f64,
    pub text: String,
}

/// One chained unit: big full-star panel, optional core zoom, colorbar.
#[derive(Debug, Clone, Serialize)]
pub struct CirclePanel {
    pub label: String,
    pub big: PlacedAxis,
    pub heatmap: HeatmapSpec,
    /// Absent when the core already fills enough of the big panel.
    pub small: Option<PlacedAxis>,
    /// Radius of the dashed ring on the big panel marking the zoom region.
    pub core_ring_radius: Option<f64>,
    pub guide_lines: Vec<GuideLine>,
    pub colorbar: ColorbarSpec,
}

/// A complete circular interior figure.
#[derive(Debug, Clone, Serialize)]
pub struct CircleFigure {
    pub width_in: f64,
    pub height_in: f64,
    pub title: String,
    pub subtitle: String,
    /// Figure background as a CSS hex color.
    pub background: String,
    pub panels: Vec<CirclePanel>,
    pub big_scale_bar: Option<ScaleBar>,
    pub small_scale_bar: Option<ScaleBar>,
}

/// Build the full chained circular figure for one profile snapshot.
pub fn full_circle_plot(
    profile: &Profile,
    history: &History,
    config: &CirclePlotConfig,
    xaxis: ProfileXAxis,
    opts: &CircleFigureOptions,
) -> Result<CircleFigure> {
    let coords = xaxis
        .values(profile)
        .context("profile is missing the interior coordinate column")?;
    let coord_max = coords
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(f64::NEG_INFINITY, f64::max);
    anyhow::ensure!(coord_max > 0.0, "profile has no usable coordinate values");

    // Core size decides how far the zoom panels look in. A star with no
    // burned-out core yet still gets a fixed-fraction center zoom.
    let mut r_core = 0.0f64;
    for key in xaxis.core_keys() {
        if let Some(series) = history.get(key) {
            if let Some(radius) = series.value_at(profile.model_number) {
                r_core = r_core.max(radius);
            }
        }
    }
    if r_core == 0.0 {
        r_core = coord_max * 0.15;
    }
    let r_core_view = opts.r_core_view_relative * r_core;

    // Only quantities that reach the significance cutoff get a panel; when
    // nothing does, force the first so the figure is never empty.
    let mut relevant: Vec<&PlotItem> = config
        .items
        .iter()
        .filter(|item| item.profile_max(profile) > config.cutoff)
        .collect();
    if relevant.is_empty() {
        relevant.push(config.items.first().context("no plot items configured")?);
    }

    let mut layout = build_circle_layout(relevant.len(), opts.layout_params);
    let (_, h_old) = layout.width_height().context("layout was not seeded")?;

    // A lone panel gets widened so the title text fits above it.
    let pad = if relevant.len() == 1 {
        Pad {
            left: 1.0,
            right: 1.0,
            ..opts.pad
        }
    } else {
        opts.pad
    };
    layout.apply_padding(pad);
    let (width_in, height_in) = layout
        .finalize_figsize_with_prepad(h_old, opts.base_interior_height_in)
        .context("layout was not seeded")?;

    // Core zoom is pointless once the core view covers a fifth of the star.
    let show_small = r_core_view <= 0.20 * coord_max;

    let params = opts.layout_params;
    let mut panels = Vec::with_capacity(relevant.len());
    let mut big_scale_bar = None;
    let mut small_scale_bar = None;

    for (ind, &item) in relevant.iter().enumerate() {
        let pos = layout.positions[ind];
        let to_fig = |x: f64, y: f64| layout.layout_to_fig_coords(x, y).unwrap_or((0.0, 0.0));

        let big = PlacedAxis {
            center: to_fig(pos.big.x, pos.big.y),
            size_frac: layout
                .radius_to_fig_fraction(params.r_big, RadiusMode::FitMin)
                .unwrap_or(0.0),
        };

        let values = item
            .profile_values(profile)
            .with_context(|| format!("profile is missing column '{}'", item.profile_key))?;
        let heatmap = heatmap_spec(coords, values, item, config)?;

        let colorbar = colorbar_spec(&layout, &pos, item, config, &heatmap)?;

        let (small, core_ring_radius, guide_lines) = if show_small {
            let small_axis = PlacedAxis {
                center: to_fig(pos.small.x, pos.small.y),
                size_frac: layout
                    .radius_to_fig_fraction(params.r_small, RadiusMode::FitMin)
                    .unwrap_or(0.0),
            };
            // Dashed connectors from the sides of the zoom circle to where
            // that region sits inside the big panel.
            let mut guides = Vec::with_capacity(2);
            for side in [-1.0, 1.0] {
                let from = to_fig(
                    pos.big.x + side * params.r_big * r_core_view / coord_max,
                    pos.big.y,
                );
                let to = to_fig(pos.small.x + side * params.r_small, pos.small.y);
                guides.push(GuideLine { from, to });
            }
            (Some(small_axis), Some(r_core_view), guides)
        } else {
            (None, None, Vec::new())
        };

        if ind == 0 {
            big_scale_bar = Some(ScaleBar {
                anchor: to_fig(pos.big.x - (params.r_big + 2.0 * params.r_pad), pos.big.y),
                height_frac: layout
                    .radius_to_fig_fraction(params.r_big / 2.0, RadiusMode::Height)
                    .unwrap_or(0.0),
                text: format!("{} {}", round_sigfigs(coord_max, 2), xaxis.unit_label()),
            });
            if show_small {
                small_scale_bar = Some(ScaleBar {
                    anchor: to_fig(
                        pos.small.x - (params.r_small + 2.0 * params.r_pad),
                        pos.small.y,
                    ),
                    height_frac: layout
                        .radius_to_fig_fraction(params.r_small / 2.0, RadiusMode::Height)
                        .unwrap_or(0.0),
                    text: format!("{} {}", round_sigfigs(r_core_view, 2), xaxis.unit_label()),
                });
            }
        }

        panels.push(CirclePanel {
            label: item.label.to_string(),
            big,
            heatmap,
            small,
            core_ring_radius,
            guide_lines,
            colorbar,
        });
    }

    Ok(CircleFigure {
        width_in,
        height_in,
        title: config.title.clone(),
        subtitle: format!(
            "{:.1} Msun at {} years old",
            profile.initial_mass,
            eng_format(profile.age, 2)
        ),
        background: blend_with_white(0.0, 0.0, 0.0, 0.05).to_hex(),
        panels,
        big_scale_bar,
        small_scale_bar,
    })
}

fn heatmap_spec(
    coords: &[f64],
    values: &[f64],
    item: &PlotItem,
    config: &CirclePlotConfig,
) -> Result<HeatmapSpec> {
    anyhow::ensure!(
        coords.len() == values.len(),
        "coordinate and value columns disagree in length"
    );
    let mut coords = coords.to_vec();
    let mut vals = values.to_vec();
    // Duplicate the innermost sample at half its coordinate so the polar
    // mesh does not show a hole at the center of the star.
    if let Some((i_min, &c_min)) = coords
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| a.total_cmp(b))
    {
        let innermost = vals[i_min];
        coords.push(c_min / 2.0);
        vals.push(innermost);
    }
    let data_min = vals.iter().copied().fold(f64::INFINITY, f64::min);
    let data_max = vals.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    Ok(HeatmapSpec {
        coords,
        values: vals,
        cmap: item.cmap.name(),
        vmin: config.vmin.unwrap_or(data_min),
        vmax: config.vmax.unwrap_or(data_max),
    })
}

fn colorbar_spec(
    layout: &Layout,
    pos: &PlotPositions,
    item: &PlotItem,
    config: &CirclePlotConfig,
    heatmap: &HeatmapSpec,
) -> Result<ColorbarSpec> {
    let params = layout.params;
    let (x_small_fig, _) = layout
        .layout_to_fig_coords(pos.small.x, pos.small.y)
        .context("layout was not seeded")?;
    let width = layout
        .radius_to_fig_fraction(params.r_small, RadiusMode::Width)
        .context("layout was not seeded")?;
    let height = layout
        .radius_to_fig_fraction(params.r_small, RadiusMode::Height)
        .context("layout was not seeded")?
        * 0.2;
    // Bars sit in the padded strip beneath the chain, under each unit.
    let y_center = layout
        .radius_to_fig_fraction(params.r_big, RadiusMode::Height)
        .context("layout was not seeded")?
        * 0.3;
    let rect = [
        x_small_fig - width / 2.0,
        y_center - height / 2.0,
        width,
        height,
    ];

    // Find the range the data actually covers, optionally ignoring values at
    // the inactive floor, and block out everything else.
    let included: Vec<f64> = match config.block_colorbar_cutoff {
        Some(cutoff) => heatmap
            .values
            .iter()
            .copied()
            .filter(|v| *v > cutoff)
            .collect(),
        None => heatmap.values.clone(),
    };
    let (vmin, vmax) = (heatmap.vmin, heatmap.vmax);
    let (covered, blocked) = if included.is_empty() {
        // Nothing above the floor: the whole bar is blocked.
        ((vmin, vmin), vec![(vmin, vmax)])
    } else {
        let data_min = included.iter().copied().fold(f64::INFINITY, f64::min);
        let data_max = included.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let mut blocked = Vec::new();
        if data_min > vmin {
            blocked.push((vmin, data_min));
        }
        if vmax > data_max {
            blocked.push((data_max, vmax));
        }
        ((data_min, data_max), blocked)
    };

    Ok(ColorbarSpec {
        rect,
        label: item.label.to_string(),
        vmin,
        vmax,
        blocked,
        covered,
        major_ticks: config.major_ticks.clone(),
        major_tick_labels: config.major_tick_labels.clone(),
        minor_ticks: config.minor_ticks.clone(),
    })
}

/// Interior composition: every isotope above a 10% mass fraction anywhere.
pub fn composition_figure(
    profile: &Profile,
    history: &History,
    xaxis: ProfileXAxis,
) -> Result<CircleFigure> {
    let mut config = CirclePlotConfig::new(isotopes().to_vec(), "Interior composition");
    config.cutoff = 0.1;
    config.vmin = Some(0.0);
    config.vmax = Some(1.0);
    config.major_ticks = vec![0.2, 0.5, 0.8];
    config.major_tick_labels = vec!["20%".into(), "50%".into(), "80%".into()];
    config.minor_ticks = (0..=10).map(|i| i as f64 / 10.0).collect();
    full_circle_plot(profile, history, &config, xaxis, &CircleFigureOptions::default())
}

/// Fusion rate heatmap, normalized against the star's specific luminosity
/// so quiescent and flash phases stay on comparable scales.
pub fn fusion_figure(
    profile: &Profile,
    history: &History,
    xaxis: ProfileXAxis,
) -> Result<CircleFigure> {
    let luminosity_max = profile
        .column("luminosity")
        .map(|v| v.iter().copied().fold(f64::NEG_INFINITY, f64::max))
        .context("profile is missing the luminosity column")?;
    let specific_l = luminosity_max * L_SUN / (profile.initial_mass * M_SUN);
    let max_fusion = fusion_rates()[0].profile_max(profile);
    let vmax = if max_fusion > specific_l {
        max_fusion
    } else {
        specific_l * 10.0
    };

    let mut config = CirclePlotConfig::new(fusion_rates().to_vec(), "Fusion rate inside star");
    config.cutoff = vmax / 100.0;
    config.vmin = Some(0.0);
    config.vmax = Some(vmax);

    let opts = CircleFigureOptions {
        r_core_view_relative: 1.5,
        ..CircleFigureOptions::default()
    };
    full_circle_plot(profile, history, &config, xaxis, &opts)
}

/// Convective regions. The mixing coefficients are log10 values that sit at
/// an inactive floor near -99, so the range and colorbar blocking ignore
/// everything below a deep cutoff.
pub fn convection_figure(
    profile: &Profile,
    history: &History,
    xaxis: ProfileXAxis,
) -> Result<CircleFigure> {
    const FLOOR: f64 = -70.0;
    let items = convection_measures();

    let mut vmin = f64::INFINITY;
    let mut vmax = f64::NEG_INFINITY;
    for item in items {
        if let Some(values) = item.profile_values(profile) {
            for &v in values {
                if v > FLOOR {
                    vmin = vmin.min(v);
                }
                vmax = vmax.max(v);
            }
        }
    }
    anyhow::ensure!(vmin.is_finite() && vmax.is_finite(), "no convection data in profile");

    let ticks = linear_ticks(vmin, vmax, 3);
    let labels = ticks.iter().map(|t| format!("10^{}", t)).collect();

    let mut config = CirclePlotConfig::new(items.to_vec(), "Convective regions inside star");
    config.cutoff = FLOOR;
    config.vmin = Some(vmin);
    config.vmax = Some(vmax);
    config.block_colorbar_cutoff = Some(FLOOR);
    config.major_ticks = ticks;
    config.major_tick_labels = labels;
    full_circle_plot(profile, history, &config, xaxis, &CircleFigureOptions::default())
}

/// At most `n_max` round tick values covering [vmin, vmax], stepping by a
/// 1-2-5 multiple of a power of ten.
fn linear_ticks(vmin: f64, vmax: f64, n_max: usize) -> Vec<f64> {
    debug_assert!(vmax > vmin && n_max >= 2);
    let raw_step = (vmax - vmin) / n_max as f64;
    let mag = 10f64.powf(raw_step.log10().floor());
    let step = [1.0, 2.0, 5.0, 10.0]
        .iter()
        .map(|m| m * mag)
        .find(|&s| (vmax - vmin) / s <= n_max as f64)
        .unwrap_or(10.0 * mag);
    let first = (vmin / step).ceil();
    let last = (vmax / step).floor();
    let mut ticks = Vec::new();
    let mut k = first;
    while k <= last {
        ticks.push(k * step);
        k += 1.0;
    }
    ticks
}
