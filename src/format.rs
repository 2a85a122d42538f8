//! Number formatting for tick labels and figure titles.

/// Round `x` to `sigfigs` significant figures.
pub fn round_sigfigs(x: f64, sigfigs: u32) -> f64 {
    if x == 0.0 || !x.is_finite() {
        return x;
    }
    let digits = sigfigs as i32 - 1 - x.abs().log10().floor() as i32;
    let factor = 10f64.powi(digits);
    (x * factor).round() / factor
}

const ENG_PREFIXES: [(i32, &str); 17] = [
    (-24, "y"),
    (-21, "z"),
    (-18, "a"),
    (-15, "f"),
    (-12, "p"),
    (-9, "n"),
    (-6, "µ"),
    (-3, "m"),
    (0, ""),
    (3, "k"),
    (6, "M"),
    (9, "G"),
    (12, "T"),
    (15, "P"),
    (18, "E"),
    (21, "Z"),
    (24, "Y"),
];

/// Engineering notation with an SI prefix: `eng_format(12.46e9, 2)` is
/// `"12.46 G"`. Exponents outside the prefix table clamp to its ends.
pub fn eng_format(x: f64, places: usize) -> String {
    if x == 0.0 || !x.is_finite() {
        return format!("{:.*}", places, x);
    }
    let exp = x.abs().log10().floor() as i32;
    let eng_exp = (exp.div_euclid(3) * 3).clamp(-24, 24);
    let coeff = x / 10f64.powi(eng_exp);
    let prefix = ENG_PREFIXES
        .iter()
        .find(|(e, _)| *e == eng_exp)
        .map(|(_, p)| *p)
        .unwrap_or("");
    if prefix.is_empty() {
        format!("{:.*}", places, coeff)
    } else {
        format!("{:.*} {}", places, coeff, prefix)
    }
}

/// Thousands-separated integer rendering: `31650.0` becomes `"31,650"`.
pub fn format_thousands(x: f64) -> String {
    let n = x.round() as i64;
    let digits = n.abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if n < 0 {
        out.push('-');
    }
    let first_group = digits.len() % 3;
    for (i, c) in digits.chars().enumerate() {
        if i != 0 && (i + 3 - first_group) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
