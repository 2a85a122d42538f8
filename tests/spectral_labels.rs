use rustymesa::spectral::{
    band_borders, locate_spectral_labels, spectral_bands, BandAttribute, SpectralLabelConfig,
};
use rustymesa::view::LogAxisView;

fn cfg() -> SpectralLabelConfig {
    SpectralLabelConfig {
        subtype_fraction_threshold: 0.45,
        min_subtype_label_px: 60.0,
    }
}

#[test]
fn band_table_is_contiguous_and_ordered_hot_to_cold() {
    let bands = spectral_bands();
    assert_eq!(bands.len(), 7);
    let letters: String = bands.iter().map(|b| b.letter).collect();
    assert_eq!(letters, "OBAFGKM");
    for pair in bands.windows(2) {
        assert_eq!(pair[0].temp_range.0, pair[1].temp_range.1);
        assert_eq!(pair[0].ms_mass_range.0, pair[1].ms_mass_range.1);
    }
    for band in bands {
        for pair in band.subtypes.windows(2) {
            assert!(pair[0].temp > pair[1].temp, "subtypes sorted hot to cold");
        }
    }
}

#[test]
fn wide_view_uses_single_letters_in_axis_order() {
    // The default HR window: inverted temperature axis from 80000 K down to
    // 1000 K. No band fills 45% of nearly two decades, so every band stays
    // in overview mode.
    let view = LogAxisView::new(80_000.0, 1_000.0, 1280.0);
    let labels = locate_spectral_labels(&view, BandAttribute::Temperature, &cfg());
    assert_eq!(labels.len(), 7);
    assert!(labels.iter().all(|l| l.text.len() == 1));
    assert_eq!(labels[0].text, "O");
    assert_eq!(labels[6].text, "M");
    for pair in labels.windows(2) {
        assert!(pair[0].value > pair[1].value, "descending on inverted axis");
    }
}

#[test]
fn letter_sits_at_geometric_mean_of_visible_subrange() {
    let view = LogAxisView::new(80_000.0, 1_000.0, 1280.0);
    let labels = locate_spectral_labels(&view, BandAttribute::Temperature, &cfg());
    let o_label = labels.iter().find(|l| l.text == "O").unwrap();
    // The O band extends past the window, so its label uses the clipped
    // range up to the window edge.
    let expected = (31_650.0f64 * 80_000.0).sqrt();
    assert!((o_label.value - expected).abs() < 1e-6);
    let g_label = labels.iter().find(|l| l.text == "G").unwrap();
    let expected = (5_330.0f64 * 5_960.0).sqrt();
    assert!((g_label.value - expected).abs() < 1e-6);
}

#[test]
fn zoom_into_g_band_switches_to_subtypes() {
    // Window fully inside the G range, so the band occupies 100% of the
    // visible span and subtype labels replace the letter.
    let view = LogAxisView::new(5_900.0, 5_400.0, 800.0);
    let labels = locate_spectral_labels(&view, BandAttribute::Temperature, &cfg());
    assert!(!labels.is_empty());
    assert!(labels.iter().all(|l| l.text.starts_with('G') && l.text.len() > 1));
    assert!(labels.iter().any(|l| l.text == "G2V"), "{:?}", labels);
    assert!(!labels.iter().any(|l| l.text == "G"), "no letter in subtype mode");
}

#[test]
fn subtype_labels_keep_minimum_pixel_spacing() {
    let config = cfg();
    let view = LogAxisView::new(5_900.0, 5_400.0, 800.0);
    let labels = locate_spectral_labels(&view, BandAttribute::Temperature, &config);
    let px: Vec<f64> = labels.iter().map(|l| view.to_px(l.value)).collect();
    for (i, a) in px.iter().enumerate() {
        for b in px.iter().skip(i + 1) {
            assert!(
                (a - b).abs() >= config.min_subtype_label_px - 1e-9,
                "labels at {a}px and {b}px collide"
            );
        }
    }
}

#[test]
fn more_pixels_admit_more_subtype_labels() {
    let config = cfg();
    let narrow = LogAxisView::new(5_900.0, 5_400.0, 200.0);
    let wide = LogAxisView::new(5_900.0, 5_400.0, 2000.0);
    let few = locate_spectral_labels(&narrow, BandAttribute::Temperature, &config);
    let many = locate_spectral_labels(&wide, BandAttribute::Temperature, &config);
    assert!(few.len() < many.len());
    assert!(!few.is_empty(), "the pivot subtype always fits");
}

#[test]
fn window_between_two_subtypes_yields_no_labels() {
    // Deep zoom into the gap between G4V (5680 K) and G3V (5720 K): the
    // band is in subtype mode but no subtype is strictly inside the window.
    let view = LogAxisView::new(5_719.0, 5_681.0, 800.0);
    let labels = locate_spectral_labels(&view, BandAttribute::Temperature, &cfg());
    assert!(labels.is_empty());
}

#[test]
fn mass_attribute_uses_mass_tables() {
    let view = LogAxisView::new(0.9, 1.05, 600.0);
    let labels = locate_spectral_labels(&view, BandAttribute::MainSequenceMass, &cfg());
    assert!(!labels.is_empty());
    assert!(labels.iter().all(|l| l.text.starts_with('G')));
    // The pivot is the subtype nearest the screen center: G6V at 0.97 Msun.
    assert!(labels.iter().any(|l| l.text == "G6V"), "{:?}", labels);
    for pair in labels.windows(2) {
        assert!(pair[0].value < pair[1].value, "ascending on a normal axis");
    }
}

#[test]
fn borders_are_the_band_lower_bounds() {
    assert_eq!(
        band_borders(BandAttribute::Temperature),
        vec![31_650.0, 10_000.0, 7_300.0, 5_960.0, 5_330.0, 3_890.0, 2_310.0]
    );
    assert_eq!(
        band_borders(BandAttribute::MainSequenceMass),
        vec![18.2, 2.33, 1.68, 1.07, 0.89, 0.58, 0.1]
    );
}
