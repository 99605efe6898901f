//! C `printf`-style number formatting.
//!
//! Job names, file names and generated LaTeX/C sources have to match what the
//! simulation tooling produces byte for byte, so `%g`, `%f` and `%d` are
//! reproduced here instead of relying on Rust's shortest-round-trip `Display`.

/// Format like C `%.{precision}g`.
///
/// A precision of 0 is treated as 1, as C does.
pub fn fmt_g(value: f64, precision: usize) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    let p = precision.max(1);
    if value == 0.0 {
        return if value.is_sign_negative() { "-0" } else { "0" }.to_string();
    }

    // Rounding to `p` significant digits decides the exponent, so let the
    // scientific formatter do the rounding and read the exponent back.
    let sci = format!("{:.*e}", p - 1, value);
    let Some((mantissa, exp)) = sci.split_once('e') else {
        return sci;
    };
    let Ok(x) = exp.parse::<i32>() else {
        return sci;
    };

    if x < -4 || x >= p as i32 {
        let sign = if x < 0 { '-' } else { '+' };
        format!("{}e{sign}{:02}", strip_trailing_zeros(mantissa), x.abs())
    } else {
        let decimals = (p as i32 - 1 - x).max(0) as usize;
        strip_trailing_zeros(&format!("{value:.decimals$}"))
    }
}

/// `%g` with the default precision of 6.
pub fn g(value: f64) -> String {
    fmt_g(value, 6)
}

/// Format like C `%.{precision}f`.
pub fn fmt_f(value: f64, precision: usize) -> String {
    format!("{value:.precision$}")
}

/// Format like C `%d` applied to a value rounded to the nearest integer.
pub fn fmt_d(value: f64) -> String {
    format!("{}", value.round() as i64)
}

fn strip_trailing_zeros(s: &str) -> String {
    if !s.contains('.') {
        return s.to_string();
    }
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}
