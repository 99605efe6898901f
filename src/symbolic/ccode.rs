//! C source printer.
//!
//! Small integer powers are written as repeated products, `pow(x, 2)` becomes
//! `((x)*(x))`; anything else goes through `pow()` from `<math.h>`.

use super::expr::{Expr, is_integer};

const PREC_ADD: u8 = 1;
const PREC_MUL: u8 = 2;
const PREC_ATOM: u8 = 4;

/// Render `expr` as a C expression.
pub fn to_ccode(expr: &Expr) -> String {
    print(expr).0
}

fn print(expr: &Expr) -> (String, u8) {
    match expr {
        Expr::Num(v) => (number(*v), if *v < 0.0 { PREC_ADD } else { PREC_ATOM }),
        Expr::Sym(s) => (s.clone(), PREC_ATOM),
        Expr::Add(terms) => {
            let mut out = String::new();
            for (i, term) in terms.iter().enumerate() {
                let negative = term.has_negative_sign();
                let shown = if negative { negate(term) } else { term.clone() };
                let (body, _) = print(&shown);
                match (i, negative) {
                    (0, false) => out.push_str(&body),
                    (0, true) => out.push_str(&format!("-{}", wrap(&shown, PREC_MUL))),
                    (_, false) => out.push_str(&format!(" + {body}")),
                    (_, true) => out.push_str(&format!(" - {}", wrap(&shown, PREC_MUL))),
                }
            }
            (out, PREC_ADD)
        }
        Expr::Mul(factors) => print_product(factors),
        Expr::Pow(base, exponent) => print_pow(base, exponent),
        Expr::Exp(x) => (format!("exp({})", print(x).0), PREC_ATOM),
    }
}

fn print_product(factors: &[Expr]) -> (String, u8) {
    let mut sign = "";
    let mut numer: Vec<String> = Vec::new();
    let mut denom: Vec<String> = Vec::new();

    for (i, f) in factors.iter().enumerate() {
        match f {
            Expr::Num(v) if i == 0 && *v == -1.0 => sign = "-",
            Expr::Num(v) if i == 0 && *v < 0.0 => {
                sign = "-";
                numer.push(number(-v));
            }
            Expr::Pow(base, e) => match **e {
                Expr::Num(n) if n < 0.0 => {
                    let positive = (**base).clone().pow(-n);
                    denom.push(wrap(&positive, PREC_MUL + 1));
                }
                _ => numer.push(wrap(f, PREC_MUL)),
            },
            other => numer.push(wrap(other, PREC_MUL)),
        }
    }

    let numer = if numer.is_empty() {
        "1".to_string()
    } else {
        numer.join("*")
    };
    let body = if denom.is_empty() {
        numer
    } else if denom.len() == 1 {
        format!("{numer}/{}", denom[0])
    } else {
        format!("{numer}/({})", denom.join("*"))
    };
    (format!("{sign}{body}"), if sign.is_empty() { PREC_MUL } else { PREC_ADD })
}

fn print_pow(base: &Expr, exponent: &Expr) -> (String, u8) {
    let b = print(base).0;
    if let Expr::Num(n) = exponent {
        if is_integer(*n) {
            let k = *n as i64;
            if (2..=5).contains(&k) {
                let reps = vec![format!("({b})"); k as usize];
                return (format!("({})", reps.join("*")), PREC_ATOM);
            }
            if (-5..=-1).contains(&k) {
                let positive = base.clone().pow(-*n);
                return (format!("1.0/{}", wrap(&positive, PREC_MUL + 1)), PREC_MUL);
            }
        }
        if *n == 0.5 {
            return (format!("sqrt({b})"), PREC_ATOM);
        }
    }
    (format!("pow({b}, {})", print(exponent).0), PREC_ATOM)
}

fn wrap(expr: &Expr, min_prec: u8) -> String {
    let (body, prec) = print(expr);
    if prec < min_prec {
        format!("({body})")
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

#[cfg(test)]
mod tests {
    use super::*;

    fn s(name: &str) -> Expr {
        Expr::sym(name)
    }

    #[test]
    fn small_powers_expand_to_products() {
        assert_eq!(to_ccode(&s("h").powi(2)), "((h)*(h))");
        assert_eq!(to_ccode(&(s("r") - 2.0).powi(3)), "((r - 2)*(r - 2)*(r - 2))");
        assert_eq!(to_ccode(&s("h").powi(7)), "pow(h, 7)");
        assert_eq!(to_ccode(&s("h").pow(s("a"))), "pow(h, a)");
    }

    #[test]
    fn sums_and_products_use_signs() {
        assert_eq!(to_ccode(&(s("x") - s("y"))), "x - y");
        assert_eq!(to_ccode(&(s("x") - 2.0 * s("y"))), "x - 2*y");
        assert_eq!(to_ccode(&(0.5 * (s("r") - 2.0))), "0.5*(r - 2)");
        assert_eq!(to_ccode(&(-s("x"))), "-x");
    }

    #[test]
    fn reciprocals_become_divisions() {
        let e = (1.0 + 0.25 * s("h").powi(4)).recip();
        assert_eq!(to_ccode(&e), "1.0/(0.25*((h)*(h)*(h)*(h)) + 1)");
        let e = s("x") / (s("y") + 1.0);
        assert_eq!(to_ccode(&e), "x/(y + 1)");
        assert_eq!(to_ccode(&s("x").exp()), "exp(x)");
    }
}
