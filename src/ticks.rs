//! Adaptive log-scale tick generation.
//!
//! Standard log locators place ticks at powers of ten, which leaves long
//! stretches of empty axis once the user zooms inside a single decade.
//! [`calc_log_ticks`] instead subdivides each decade until no gap between
//! adjacent ticks exceeds a fraction of the visible span, then (for labeled
//! ticks) thins the result back out so labels cannot crowd each other,
//! preferring to keep the "nicest" numbers.

use serde::Serialize;

/// Ceiling on the largest gap between adjacent ticks, as a fraction of the
/// visible log span.
const F_MAX: f64 = 0.33;
/// Floor on the smallest gap between adjacent labeled ticks.
const F_MIN: f64 = 0.1;

/// A tick position with its labeled / gridline-only classification.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Tick {
    pub value: f64,
    /// Labeled tick. Unlabeled ticks only get a mark and gridline.
    pub major: bool,
}

/// Compute tick positions for the visible range of a log axis.
///
/// Both bounds must be positive; the caller normalizes inverted axes by
/// reversing the returned (always ascending) array. With `remove_overlaps`
/// the result is thinned for label use; without it the full density is kept
/// so minor gridlines land where log-paper intuition expects them.
pub fn calc_log_ticks(left: f64, right: f64, remove_overlaps: bool) -> Vec<f64> {
    debug_assert!(left > 0.0 && right > 0.0, "log ticks need positive bounds");
    let xmin = left.min(right);
    let xmax = left.max(right);
    let length = (xmax / xmin).log10();
    let start_exp = xmin.log10().floor() as i32;
    let stop_exp = xmax.log10().floor() as i32;

    // Subdivide every spanned decade at increasing depth until the largest
    // gap is acceptable. The smallest gaps end up far too small; the removal
    // pass below deals with those.
    let mut depth = 0u64;
    let mut ticks: Vec<f64> = Vec::new();
    loop {
        depth = next_depth(depth);
        ticks.clear();
        for k in start_exp..=stop_exp {
            let base = 10f64.powi(k);
            let step = base / depth as f64;
            // Indices of the subdivision points that land inside [xmin, xmax].
            let first = ((xmin - base) / step).ceil().max(0.0);
            let last = ((xmax - base) / step).floor().min((9 * depth) as f64);
            if last < first {
                continue;
            }
            for i in first as u64..=last as u64 {
                ticks.push(base + i as f64 * step);
            }
        }
        ticks.push(xmin);
        ticks.push(xmax);
        ticks.sort_by(|a, b| a.total_cmp(b));
        ticks.dedup();
        if ticks.len() >= 4 && max_adjacent_gap(&ticks) <= F_MAX * length {
            break;
        }
    }

    // Thin out labeled ticks until no two are closer than the minimum gap.
    // The ends of the range always stay; among interior offenders the least
    // significant number (largest denominator of its mantissa's fractional
    // part) goes first, breaking ties toward the tightest gap.
    if remove_overlaps {
        loop {
            if ticks.len() < 3 {
                break;
            }
            let gaps = neighbor_min_gaps(&ticks);
            let threshold = F_MIN * length;
            let too_close: Vec<usize> = (1..ticks.len() - 1)
                .filter(|&i| gaps[i] < threshold)
                .collect();
            if too_close.is_empty() {
                break;
            }
            let denoms: Vec<u64> = too_close
                .iter()
                .map(|&i| mantissa_denominator(ticks[i]))
                .collect();
            let max_denom = denoms.iter().copied().max().unwrap_or(1);
            let remove = too_close
                .iter()
                .zip(&denoms)
                .filter(|&(_, &d)| d == max_denom)
                .map(|(&i, _)| i)
                .min_by(|&a, &b| gaps[a].total_cmp(&gaps[b]));
            match remove {
                Some(i) => {
                    ticks.remove(i);
                }
                None => break,
            }
        }
    }

    ticks
}

/// [`calc_log_ticks`] at both densities, merged into classified ticks.
pub fn tick_marks(left: f64, right: f64) -> Vec<Tick> {
    let minor = calc_log_ticks(left, right, false);
    let major = calc_log_ticks(left, right, true);
    // Major positions are a subset of the dense set (same densify pass, then
    // deletions only), so exact binary search is safe.
    minor
        .into_iter()
        .map(|value| Tick {
            value,
            major: major.binary_search_by(|m| m.total_cmp(&value)).is_ok(),
        })
        .collect()
}

/// Subdivision depth sequence 1, 2, 5, 10, 20, 50, 100, ...
fn next_depth(depth: u64) -> u64 {
    if depth == 0 {
        return 1;
    }
    let mut lead = depth;
    while lead >= 10 {
        lead /= 10;
    }
    match lead {
        1 => depth * 2,
        2 => depth / 2 * 5,
        _ => depth * 2,
    }
}

fn max_adjacent_gap(sorted: &[f64]) -> f64 {
    sorted
        .windows(2)
        .map(|w| (w[1] / w[0]).log10())
        .fold(0.0, f64::max)
}

/// Per-tick log gap to the closer neighbor; the ends use their only neighbor.
fn neighbor_min_gaps(sorted: &[f64]) -> Vec<f64> {
    let n = sorted.len();
    debug_assert!(n >= 2);
    (0..n)
        .map(|i| {
            if i == 0 {
                (sorted[1] / sorted[0]).log10()
            } else if i == n - 1 {
                (sorted[i] / sorted[i - 1]).log10()
            } else {
                let prev = (sorted[i] / sorted[i - 1]).log10();
                let next = (sorted[i + 1] / sorted[i]).log10();
                prev.min(next)
            }
        })
        .collect()
}

/// Significance measure of a tick value: the denominator of the fractional
/// part of its mantissa, as a rational with denominator at most 100. Powers
/// of ten give 1 (most significant); 0.1-steps give 10 (least).
fn mantissa_denominator(x: f64) -> u64 {
    let exp = x.abs().log10().floor();
    let mantissa = x.abs() / 10f64.powf(exp);
    // Round to 10 decimal places first so float representation noise does
    // not leak into the rational approximation.
    let frac = ((mantissa % 1.0) * 1e10).round() / 1e10;
    limit_denominator(frac, 100).1
}

/// Best rational approximation `p/q` of `x` in [0, 1) with `q <= max_den`,
/// by the standard continued-fraction bound construction.
fn limit_denominator(x: f64, max_den: u64) -> (u64, u64) {
    let mut n = (x * 1e10).round() as u64;
    let mut d = 10_000_000_000u64;
    let g = gcd(n, d);
    if g > 0 {
        n /= g;
        d /= g;
    }
    if d <= max_den {
        return (n, d);
    }
    let (mut p0, mut q0, mut p1, mut q1) = (0u64, 1u64, 1u64, 0u64);
    loop {
        let a = n / d;
        let q2 = q0 + a * q1;
        if q2 > max_den {
            break;
        }
        let p2 = p0 + a * p1;
        p0 = p1;
        q0 = q1;
        p1 = p2;
        q1 = q2;
        let r = n - a * d;
        n = d;
        d = r;
        // d cannot hit zero here: the exact denominator exceeds max_den, so
        // the final convergent trips the q2 check first.
    }
    let k = (max_den - q0) / q1;
    let bound1 = (p0 + k * p1, q0 + k * q1);
    let bound2 = (p1, q1);
    let err = |(p, q): (u64, u64)| (p as f64 / q as f64 - x).abs();
    if err(bound2) <= err(bound1) {
        bound2
    } else {
        bound1
    }
}

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}
