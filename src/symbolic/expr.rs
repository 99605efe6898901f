//! Expression trees with construction-time simplification.
//!
//! Only the handful of rules the g(r) ansatz needs are implemented:
//!
//! - nested sums/products are flattened
//! - numeric constants are folded (`2 * 3 -> 6`, `x * 0 -> 0`, `x + 0 -> x`);
//!   a folded constant goes last in a sum and first in a product
//! - `x^0 -> 1`, `x^1 -> x`, `(a*b)^n -> a^n * b^n` for integer `n`
//! - `exp(c)` is folded for numeric `c` (so `exp(0) -> 1`)
//!
//! Like terms are *not* collected; the ansatz never produces them.

use std::collections::{BTreeMap, BTreeSet};
use std::ops::{Add, Div, Mul, Neg, Sub};

use crate::error::AppError;

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Num(f64),
    Sym(String),
    Add(Vec<Expr>),
    Mul(Vec<Expr>),
    Pow(Box<Expr>, Box<Expr>),
    Exp(Box<Expr>),
}

impl Expr {
    pub fn num(v: f64) -> Self {
        Expr::Num(v)
    }

    pub fn sym(name: impl Into<String>) -> Self {
        Expr::Sym(name.into())
    }

    pub fn zero() -> Self {
        Expr::Num(0.0)
    }

    pub fn one() -> Self {
        Expr::Num(1.0)
    }

    /// Build a simplified sum.
    pub fn sum(terms: impl IntoIterator<Item = Expr>) -> Self {
        let mut constant = 0.0;
        let mut rest = Vec::new();
        for term in terms {
            match term {
                Expr::Num(v) => constant += v,
                Expr::Add(inner) => {
                    for t in inner {
                        match t {
                            Expr::Num(v) => constant += v,
                            other => rest.push(other),
                        }
                    }
                }
                other => rest.push(other),
            }
        }

        if constant != 0.0 {
            rest.push(Expr::Num(constant));
        }
        match rest.len() {
            0 => Expr::zero(),
            1 => rest.remove(0),
            _ => Expr::Add(rest),
        }
    }

    /// Build a simplified product.
    pub fn product(factors: impl IntoIterator<Item = Expr>) -> Self {
        let mut coeff = 1.0;
        let mut rest = Vec::new();
        for factor in factors {
            match factor {
                Expr::Num(v) => coeff *= v,
                Expr::Mul(inner) => {
                    for f in inner {
                        match f {
                            Expr::Num(v) => coeff *= v,
                            other => rest.push(other),
                        }
                    }
                }
                other => rest.push(other),
            }
        }

        if coeff == 0.0 {
            return Expr::zero();
        }
        if coeff != 1.0 {
            rest.insert(0, Expr::Num(coeff));
        }
        match rest.len() {
            0 => Expr::one(),
            1 => rest.remove(0),
            _ => Expr::Mul(rest),
        }
    }

    /// Build a simplified power.
    pub fn pow(self, exponent: impl Into<Expr>) -> Self {
        let exponent = exponent.into();
        match (self, exponent) {
            (_, Expr::Num(e)) if e == 0.0 => Expr::one(),
            (base, Expr::Num(e)) if e == 1.0 => base,
            (Expr::Num(b), Expr::Num(e)) => Expr::Num(b.powf(e)),
            (Expr::Num(b), _) if b == 1.0 => Expr::one(),
            (Expr::Mul(factors), Expr::Num(e)) if is_integer(e) => {
                Expr::product(factors.into_iter().map(|f| f.pow(e)))
            }
            (Expr::Pow(base, inner), Expr::Num(e)) if is_integer(e) => match *inner {
                Expr::Num(i) if is_integer(i) => base.pow(i * e),
                other => Expr::Pow(Box::new(Expr::Pow(base, Box::new(other))), Box::new(Expr::Num(e))),
            },
            (base, exponent) => Expr::Pow(Box::new(base), Box::new(exponent)),
        }
    }

    /// Integer power shorthand.
    pub fn powi(self, n: i32) -> Self {
        self.pow(f64::from(n))
    }

    pub fn exp(self) -> Self {
        match self {
            Expr::Num(v) => Expr::Num(v.exp()),
            other => Expr::Exp(Box::new(other)),
        }
    }

    pub fn recip(self) -> Self {
        self.pow(-1.0)
    }

    /// Replace every occurrence of symbol `name` with `value`.
    pub fn subs(&self, name: &str, value: &Expr) -> Expr {
        self.map_symbols(&|s| (s == name).then(|| value.clone()))
    }

    /// Replace every symbol found in `map`.
    pub fn subs_all(&self, map: &BTreeMap<String, Expr>) -> Expr {
        self.map_symbols(&|s| map.get(s).cloned())
    }

    fn map_symbols(&self, f: &dyn Fn(&str) -> Option<Expr>) -> Expr {
        match self {
            Expr::Num(v) => Expr::Num(*v),
            Expr::Sym(s) => f(s).unwrap_or_else(|| Expr::Sym(s.clone())),
            Expr::Add(terms) => Expr::sum(terms.iter().map(|t| t.map_symbols(f))),
            Expr::Mul(factors) => Expr::product(factors.iter().map(|t| t.map_symbols(f))),
            Expr::Pow(b, e) => b.map_symbols(f).pow(e.map_symbols(f)),
            Expr::Exp(x) => x.map_symbols(f).exp(),
        }
    }

    /// All symbol names appearing in the expression.
    pub fn free_symbols(&self) -> BTreeSet<String> {
        let mut out = BTreeSet::new();
        self.collect_symbols(&mut out);
        out
    }

    fn collect_symbols(&self, out: &mut BTreeSet<String>) {
        match self {
            Expr::Num(_) => {}
            Expr::Sym(s) => {
                out.insert(s.clone());
            }
            Expr::Add(xs) | Expr::Mul(xs) => xs.iter().for_each(|x| x.collect_symbols(out)),
            Expr::Pow(b, e) => {
                b.collect_symbols(out);
                e.collect_symbols(out);
            }
            Expr::Exp(x) => x.collect_symbols(out),
        }
    }

    /// Evaluate with symbol values supplied by `env`.
    pub fn eval(&self, env: &dyn Fn(&str) -> Option<f64>) -> Result<f64, AppError> {
        Ok(match self {
            Expr::Num(v) => *v,
            Expr::Sym(s) => env(s)
                .ok_or_else(|| AppError::output(format!("No value bound for symbol `{s}`")))?,
            Expr::Add(xs) => {
                let mut acc = 0.0;
                for x in xs {
                    acc += x.eval(env)?;
                }
                acc
            }
            Expr::Mul(xs) => {
                let mut acc = 1.0;
                for x in xs {
                    acc *= x.eval(env)?;
                }
                acc
            }
            Expr::Pow(b, e) => pow_value(b.eval(env)?, e.eval(env)?),
            Expr::Exp(x) => x.eval(env)?.exp(),
        })
    }

    /// True when the expression is a number or a product led by a negative number.
    pub(crate) fn has_negative_sign(&self) -> bool {
        match self {
            Expr::Num(v) => *v < 0.0,
            Expr::Mul(xs) => matches!(xs.first(), Some(Expr::Num(v)) if *v < 0.0),
            _ => false,
        }
    }
}

pub(crate) fn is_integer(v: f64) -> bool {
    v.is_finite() && v.fract() == 0.0 && v.abs() < 1e15
}

pub(crate) fn pow_value(base: f64, exponent: f64) -> f64 {
    if is_integer(exponent) && exponent.abs() <= i32::MAX as f64 {
        base.powi(exponent as i32)
    } else {
        base.powf(exponent)
    }
}

impl From<f64> for Expr {
    fn from(v: f64) -> Self {
        Expr::Num(v)
    }
}

impl From<&str> for Expr {
    fn from(name: &str) -> Self {
        Expr::Sym(name.to_string())
    }
}

impl Add for Expr {
    type Output = Expr;
    fn add(self, rhs: Expr) -> Expr {
        Expr::sum([self, rhs])
    }
}

impl Add<f64> for Expr {
    type Output = Expr;
    fn add(self, rhs: f64) -> Expr {
        Expr::sum([self, Expr::Num(rhs)])
    }
}

impl Add<Expr> for f64 {
    type Output = Expr;
    fn add(self, rhs: Expr) -> Expr {
        Expr::sum([Expr::Num(self), rhs])
    }
}

impl Sub for Expr {
    type Output = Expr;
    fn sub(self, rhs: Expr) -> Expr {
        Expr::sum([self, -rhs])
    }
}

impl Sub<f64> for Expr {
    type Output = Expr;
    fn sub(self, rhs: f64) -> Expr {
        Expr::sum([self, Expr::Num(-rhs)])
    }
}

impl Mul for Expr {
    type Output = Expr;
    fn mul(self, rhs: Expr) -> Expr {
        Expr::product([self, rhs])
    }
}

impl Mul<f64> for Expr {
    type Output = Expr;
    fn mul(self, rhs: f64) -> Expr {
        Expr::product([Expr::Num(rhs), self])
    }
}

impl Mul<Expr> for f64 {
    type Output = Expr;
    fn mul(self, rhs: Expr) -> Expr {
        Expr::product([Expr::Num(self), rhs])
    }
}

impl Div for Expr {
    type Output = Expr;
    fn div(self, rhs: Expr) -> Expr {
        Expr::product([self, rhs.recip()])
    }
}

impl Div<f64> for Expr {
    type Output = Expr;
    fn div(self, rhs: f64) -> Expr {
        Expr::product([Expr::Num(1.0 / rhs), self])
    }
}

impl Neg for Expr {
    type Output = Expr;
    fn neg(self) -> Expr {
        Expr::product([Expr::Num(-1.0), self])
    }
}
