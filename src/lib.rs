//! Stellar-evolution run viewer core.
//!
//! This crate loads history (time-series) and profile (interior snapshot)
//! arrays exported from a stellar-evolution simulation and computes all the
//! geometry an interactive viewer needs: adaptive log-axis ticks, spectral
//! type labels, de-conflicted model-number overlays, and packed
//! tangent-circle layouts for interior plots. Rendering is left to the
//! consumer; every engine is a pure function of the visible range and
//! static tables, recomputed per view change.
//!
//! The binary `rustymesa` demonstrates usage and prints computed scenes as
//! JSON.

pub mod color;
pub mod consts;
pub mod format;
pub mod hr;
pub mod layout;
pub mod loader;
pub mod model;
pub mod overlay;
pub mod quantities;
pub mod scene;
pub mod spectral;
pub mod ticks;
pub mod view;

// Optional GUI/egui functionality lives behind the `egui` feature flag.
// This module provides an interactive pan/zoom HR diagram that recomputes
// its overlay every view change.
#[cfg(feature = "egui")]
pub mod viewer;
