//! LaTeX printer for `Expr`.

use super::expr::{Expr, is_integer};

const PREC_ADD: u8 = 1;
const PREC_MUL: u8 = 2;
const PREC_POW: u8 = 3;
const PREC_ATOM: u8 = 4;

const GREEK: [&str; 24] = [
    "alpha", "beta", "gamma", "delta", "epsilon", "zeta", "eta", "theta", "iota", "kappa",
    "lambda", "mu", "nu", "xi", "omicron", "pi", "rho", "sigma", "tau", "upsilon", "phi", "chi",
    "psi", "omega",
];

/// Render `expr` as LaTeX math.
pub fn to_latex(expr: &Expr) -> String {
    print(expr).0
}

/// Render `lhs = rhs`.
pub fn latex_eq(lhs: &Expr, rhs: &Expr) -> String {
    format!("{} = {}", to_latex(lhs), to_latex(rhs))
}

/// LaTeX for a symbol name: `kappa_11 -> \kappa_{11}`, `h_sigma -> h_{\sigma}`.
pub fn latex_symbol(name: &str) -> String {
    match name.split_once('_') {
        Some((base, sub)) => format!("{}_{{{}}}", greek(base), greek(sub)),
        None => greek(name),
    }
}

fn greek(s: &str) -> String {
    if GREEK.contains(&s) {
        format!("\\{s}")
    } else {
        s.to_string()
    }
}

fn print(expr: &Expr) -> (String, u8) {
    match expr {
        Expr::Num(v) => (number(*v), if *v < 0.0 { PREC_ADD } else { PREC_ATOM }),
        Expr::Sym(s) => (latex_symbol(s), PREC_ATOM),
        Expr::Add(terms) => {
            let mut out = String::new();
            for (i, term) in terms.iter().enumerate() {
                let negative = term.has_negative_sign();
                let shown = if negative { negate(term) } else { term.clone() };
                let body = wrap(&shown, PREC_MUL);
                match (i, negative) {
                    (0, false) => out.push_str(&print(&shown).0),
                    (0, true) => out.push_str(&format!("- {body}")),
                    (_, false) => out.push_str(&format!(" + {}", print(&shown).0)),
                    (_, true) => out.push_str(&format!(" - {body}")),
                }
            }
            (out, PREC_ADD)
        }
        Expr::Mul(factors) => print_product(factors),
        Expr::Pow(base, exponent) => {
            if let Expr::Num(n) = **exponent {
                if n < 0.0 {
                    let positive = (**base).clone().pow(-n);
                    return (format!("\\frac{{1}}{{{}}}", print(&positive).0), PREC_ATOM);
                }
                if n == 0.5 {
                    return (format!("\\sqrt{{{}}}", print(base).0), PREC_ATOM);
                }
            }
            let b = wrap(base, PREC_ATOM);
            (format!("{b}^{{{}}}", print(exponent).0), PREC_POW)
        }
        Expr::Exp(x) => (format!("e^{{{}}}", print(x).0), PREC_POW),
    }
}

fn print_product(factors: &[Expr]) -> (String, u8) {
    let mut sign = "";
    // (wrapped, bare) renderings; a lone numerator inside `\frac` needs no parentheses.
    let mut numer: Vec<(String, String)> = Vec::new();
    let mut denom: Vec<String> = Vec::new();

    for (i, f) in factors.iter().enumerate() {
        match f {
            Expr::Num(v) if i == 0 && *v == -1.0 => sign = "- ",
            Expr::Num(v) if i == 0 && *v < 0.0 => {
                sign = "- ";
                numer.push((number(-v), number(-v)));
            }
            Expr::Pow(base, e) => match **e {
                Expr::Num(n) if n < 0.0 => {
                    let positive = (**base).clone().pow(-n);
                    denom.push(wrap(&positive, PREC_MUL));
                }
                _ => numer.push((wrap(f, PREC_MUL), print(f).0)),
            },
            other => numer.push((wrap(other, PREC_MUL), print(other).0)),
        }
    }

    let body = if denom.is_empty() {
        join_wrapped(&numer)
    } else {
        let top = match numer.as_slice() {
            [] => "1".to_string(),
            [(_, bare)] => bare.clone(),
            _ => join_wrapped(&numer),
        };
        let bottom = if denom.len() == 1 {
            // A single denominator factor is unambiguous inside `\frac`.
            strip_left_right(&denom[0])
        } else {
            denom.join(" ")
        };
        format!("\\frac{{{top}}}{{{bottom}}}")
    };
    (format!("{sign}{body}"), if sign.is_empty() { PREC_MUL } else { PREC_ADD })
}

fn join_wrapped(parts: &[(String, String)]) -> String {
    parts
        .iter()
        .map(|(wrapped, _)| wrapped.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

fn strip_left_right(s: &str) -> String {
    s.strip_prefix("\\left(")
        .and_then(|rest| rest.strip_suffix("\\right)"))
        .map(str::to_string)
        .unwrap_or_else(|| s.to_string())
}

fn wrap(expr: &Expr, min_prec: u8) -> String {
    let (body, prec) = print(expr);
    if prec < min_prec {
        format!("\\left({body}\\right)")
    } else {
        body
    }
}

fn negate(expr: &Expr) -> Expr {
    match expr {
        Expr::Num(v) => Expr::Num(-v),
        other => -other.clone(),
    }
}

fn number(v: f64) -> String {
    if is_integer(v) {
        format!("{}", v as i64)
    } else {
        format!("{v}")
    }
}
