#![cfg(feature = "egui")]

//! Interactive HR-diagram viewer.
//!
//! Drag to pan and scroll to zoom, both in log space. Every frame rebuilds
//! the overlay from the current viewport, so ticks, spectral labels, and
//! model-number labels always match the view.

use anyhow::Result;
use eframe::egui::{self, Align2, Color32, FontId, Pos2, Rect, Sense, Stroke};

use crate::hr::{hr_overlay, track_from_history, EvolutionTrack, HrConfig};
use crate::model::History;
use crate::view::{LogAxisView, LogViewRect};

pub struct HrViewerApp {
    track: EvolutionTrack,
    current_model: Option<u32>,
    cfg: HrConfig,
    /// log10 of the data values at the left/right screen edges. The left
    /// value is the larger one: the temperature axis runs hot to cold.
    lx: (f64, f64),
    /// log10 of the data values at the bottom/top screen edges.
    ly: (f64, f64),
}

impl HrViewerApp {
    pub fn new(history: &History, current_model: Option<u32>) -> Result<Self> {
        Ok(Self {
            track: track_from_history(history)?,
            current_model,
            cfg: HrConfig::default(),
            lx: (80_000f64.log10(), 1_000f64.log10()),
            ly: (1e-6f64.log10(), 1e8f64.log10()),
        })
    }
}

impl eframe::App for HrViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let avail = ui.available_rect_before_wrap();
            let resp = ui.interact(avail, ui.id().with("hr_canvas"), Sense::drag());
            let (w, h) = (avail.width() as f64, avail.height() as f64);
            if w < 10.0 || h < 10.0 {
                return;
            }

            if resp.dragged() {
                let d = resp.drag_delta();
                let dx = d.x as f64 / w * (self.lx.1 - self.lx.0);
                let dy = d.y as f64 / h * (self.ly.1 - self.ly.0);
                self.lx = (self.lx.0 - dx, self.lx.1 - dx);
                // Screen y grows downward, data y grows upward.
                self.ly = (self.ly.0 + dy, self.ly.1 + dy);
            }
            let scroll_y = ui.input(|i| i.raw_scroll_delta.y);
            if scroll_y.abs() > 0.0 && resp.hovered() {
                let factor = (1.0 - scroll_y as f64 * 0.001).clamp(0.5, 2.0);
                let cx = (self.lx.0 + self.lx.1) / 2.0;
                let cy = (self.ly.0 + self.ly.1) / 2.0;
                let hx = (self.lx.1 - self.lx.0) / 2.0 * factor;
                let hy = (self.ly.1 - self.ly.0) / 2.0 * factor;
                self.lx = (cx - hx, cx + hx);
                self.ly = (cy - hy, cy + hy);
            }

            let view = LogViewRect::new(
                LogAxisView::new(10f64.powf(self.lx.0), 10f64.powf(self.lx.1), w),
                LogAxisView::new(10f64.powf(self.ly.0), 10f64.powf(self.ly.1), h),
            );
            let overlay = hr_overlay(&view, &self.track, self.current_model, &self.cfg);

            let to_screen = |temp: f64, lum: f64| -> Option<Pos2> {
                if temp <= 0.0 || lum <= 0.0 {
                    return None;
                }
                let fx = (temp.log10() - self.lx.0) / (self.lx.1 - self.lx.0);
                let fy = (lum.log10() - self.ly.0) / (self.ly.1 - self.ly.0);
                Some(Pos2::new(
                    avail.left() + (fx * w) as f32,
                    avail.bottom() - (fy * h) as f32,
                ))
            };
            let painter = ui.painter_at(avail);
            painter.rect_filled(avail, 0.0, Color32::WHITE);

            // Shaded spectral band spans behind everything else; the
            // clipped painter trims whatever runs past the view.
            for span in &overlay.band_spans {
                if !span.shaded {
                    continue;
                }
                if let (Some(a), Some(b)) = (to_screen(span.range.0, 1.0), to_screen(span.range.1, 1.0)) {
                    let rect = Rect::from_min_max(
                        Pos2::new(a.x.min(b.x), avail.top()),
                        Pos2::new(a.x.max(b.x), avail.bottom()),
                    );
                    painter.rect_filled(rect, 0.0, Color32::from_black_alpha(10));
                }
            }

            // Minor gridlines, then labeled ticks along the bottom edge.
            for &v in &overlay.x_minor {
                if let Some(p) = to_screen(v, 1.0) {
                    painter.line_segment(
                        [Pos2::new(p.x, avail.top()), Pos2::new(p.x, avail.bottom())],
                        Stroke::new(0.5, Color32::from_gray(230)),
                    );
                }
            }
            for label in &overlay.x_major {
                if let Some(p) = to_screen(label.value, 1.0) {
                    painter.line_segment(
                        [
                            Pos2::new(p.x, avail.bottom() - 8.0),
                            Pos2::new(p.x, avail.bottom()),
                        ],
                        Stroke::new(1.0, Color32::BLACK),
                    );
                    painter.text(
                        Pos2::new(p.x, avail.bottom() - 10.0),
                        Align2::CENTER_BOTTOM,
                        &label.text,
                        FontId::proportional(12.0),
                        Color32::DARK_GRAY,
                    );
                }
            }
            for &v in &overlay.y_major {
                if let Some(p) = to_screen(view.x.hi(), v) {
                    painter.line_segment(
                        [Pos2::new(avail.left(), p.y), Pos2::new(avail.right(), p.y)],
                        Stroke::new(0.5, Color32::from_gray(210)),
                    );
                    painter.text(
                        Pos2::new(avail.left() + 4.0, p.y),
                        Align2::LEFT_CENTER,
                        format!("1e{}", v.log10().round() as i32),
                        FontId::proportional(11.0),
                        Color32::DARK_GRAY,
                    );
                }
            }

            // Spectral labels along the top edge.
            for label in &overlay.spectral {
                if let Some(p) = to_screen(label.value, 1.0) {
                    painter.text(
                        Pos2::new(p.x, avail.top() + 4.0),
                        Align2::CENTER_TOP,
                        &label.text,
                        FontId::proportional(13.0),
                        Color32::BLACK,
                    );
                }
            }

            // Evolutionary track.
            let track_color = Color32::from_rgb(0x1f, 0x77, 0xb4);
            for pair in self.track.path.windows(2) {
                if let (Some(a), Some(b)) = (
                    to_screen(pair[0].0, pair[0].1),
                    to_screen(pair[1].0, pair[1].1),
                ) {
                    painter.line_segment([a, b], Stroke::new(2.0, track_color));
                }
            }

            // Model-number labels on top.
            for label in &overlay.model_labels {
                if let Some(p) = to_screen(label.x, label.y) {
                    painter.circle_stroke(p, 3.0, Stroke::new(1.0, Color32::BLACK));
                    painter.text(
                        Pos2::new(p.x + 5.0, p.y - 5.0),
                        Align2::LEFT_BOTTOM,
                        label.model_number.to_string(),
                        FontId::proportional(10.0),
                        Color32::BLACK,
                    );
                }
            }
        });
    }
}

/// Launch the viewer for a loaded history, blocking until the window closes.
pub fn run_viewer(history: &History) -> Result<()> {
    let app = HrViewerApp::new(history, None)?;
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_maximized(true),
        ..Default::default()
    };
    eframe::run_native(
        "rustymesa HR diagram",
        options,
        Box::new(|_cc| Box::new(app)),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))?;
    Ok(())
}
