//! The short-range g(r) ansatz and its definition chain.

use std::collections::BTreeMap;

use crate::error::AppError;
use crate::symbolic::{Compiled, Expr, compile};

/// Fitted coefficient names, row-major (`kappa_ij`: `h_σ^i ζ^j`).
pub const KAPPAS: [&str; 16] = [
    "kappa_11", "kappa_12", "kappa_13", "kappa_14", //
    "kappa_21", "kappa_22", "kappa_23", "kappa_24", //
    "kappa_31", "kappa_32", "kappa_33", "kappa_34", //
    "kappa_41", "kappa_42", "kappa_43", "kappa_44",
];

pub const ALPHA: &str = "alpha";

/// Number of fitted parameters: 16 kappas plus alpha.
pub const N_PARAMS: usize = 17;

/// `name = rhs`.
#[derive(Debug, Clone, PartialEq)]
pub struct Definition {
    pub name: String,
    pub rhs: Expr,
}

impl Definition {
    fn new(name: &str, rhs: Expr) -> Self {
        Self {
            name: name.to_string(),
            rhs,
        }
    }

    pub fn lhs(&self) -> Expr {
        Expr::sym(self.name.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ansatz {
    /// Hard-sphere diameter.
    pub sigma: f64,
    /// Scale inside the switch-off factor `1/(1 + (c h_σ)^4)`.
    pub scale: f64,
}

impl Default for Ansatz {
    fn default() -> Self {
        Self {
            sigma: 2.0,
            scale: 0.25,
        }
    }
}

impl Ansatz {
    /// Definitions in dependency order, outermost first.
    pub fn definitions(&self) -> Vec<Definition> {
        let h = || Expr::sym("h_sigma");
        let zeta = || Expr::sym("zeta");

        let switch = (Expr::num(self.scale) * h()).powi(4) + 1.0;
        let mut polynomial = vec![h()];
        for i in 1..=4 {
            for j in 1..=4 {
                let kappa = Expr::sym(KAPPAS[(i - 1) * 4 + (j - 1)]);
                polynomial.push(kappa * h().powi(i as i32) * zeta().powi(j as i32));
            }
        }
        let decay = (Expr::num(-0.0) * Expr::sym(ALPHA) * zeta()).exp();
        let g_hs = 1.0 + switch.recip() * Expr::sum(polynomial) * decay;

        vec![
            Definition::new("g_HS", g_hs),
            Definition::new("g_sigma", h() + 1.0),
            Definition::new("zeta", (Expr::sym("r") - Expr::sym("sigma")) / Expr::sym("sigma")),
            Definition::new("R", Expr::sym("sigma") / 2.0),
            Definition::new("sigma", Expr::num(self.sigma)),
        ]
    }
}

/// Substitute definitions innermost-first.
///
/// Returns the unwrapped definitions in the order they were processed
/// (innermost first), each expressed only in terms of symbols that are not
/// themselves defined.
pub fn unwrap(definitions: &[Definition]) -> Vec<Definition> {
    let mut known: BTreeMap<String, Expr> = BTreeMap::new();
    let mut out = Vec::with_capacity(definitions.len());
    for def in definitions.iter().rev() {
        let rhs = def.rhs.subs_all(&known);
        known.insert(def.name.clone(), rhs.clone());
        out.push(Definition {
            name: def.name.clone(),
            rhs,
        });
    }
    out
}

/// Find the unwrapped `g_HS` (in terms of `h_sigma`, `r` and the kappas).
pub fn unwrapped_ghs(unwrapped: &[Definition]) -> Result<Expr, AppError> {
    unwrapped
        .iter()
        .find(|d| d.name == "g_HS")
        .map(|d| d.rhs.clone())
        .ok_or_else(|| AppError::output("The definition chain has no g_HS entry"))
}

/// Argument order of the compiled model.
pub fn model_args() -> Vec<&'static str> {
    let mut args: Vec<&'static str> = KAPPAS.to_vec();
    args.extend([ALPHA, "g_sigma", "r"]);
    args
}

/// Compile `g_HS` with `h_σ = g_σ - 1` substituted, taking
/// `[kappas.., alpha, g_sigma, r]`.
pub fn compile_model(ghs: &Expr) -> Result<Compiled, AppError> {
    let in_gsigma = ghs.subs("h_sigma", &(Expr::sym("g_sigma") - 1.0));
    compile(&in_gsigma, &model_args())
}

/// Evaluate the compiled model for parameters `params` at `(g_sigma, r)`.
pub fn eval_model(model: &Compiled, params: &[f64], g_sigma: f64, r: f64) -> f64 {
    let mut args = [0.0; N_PARAMS + 2];
    args[..N_PARAMS].copy_from_slice(&params[..N_PARAMS]);
    args[N_PARAMS] = g_sigma;
    args[N_PARAMS + 1] = r;
    model.eval(&args)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ghs() -> Expr {
        let defs = Ansatz::default().definitions();
        unwrapped_ghs(&unwrap(&defs)).unwrap()
    }

    #[test]
    fn unwrapped_ghs_depends_only_on_kappas_hsigma_and_r() {
        let symbols = ghs().free_symbols();
        assert!(symbols.contains("h_sigma"));
        assert!(symbols.contains("r"));
        assert!(symbols.contains("kappa_44"));
        for gone in ["zeta", "sigma", "R", "g_sigma", "alpha"] {
            assert!(!symbols.contains(gone), "{gone} still present");
        }
        assert_eq!(symbols.len(), 18);
    }

    #[test]
    fn unwrap_order_is_innermost_first() {
        let unwrapped = unwrap(&Ansatz::default().definitions());
        let names: Vec<&str> = unwrapped.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["sigma", "R", "zeta", "g_sigma", "g_HS"]);
        assert_eq!(unwrapped[1].rhs, Expr::num(1.0));
    }

    #[test]
    fn model_matches_hand_evaluation() {
        let model = compile_model(&ghs()).unwrap();
        let mut params = [0.0; N_PARAMS];
        params[0] = 0.5; // kappa_11
        params[5] = -0.25; // kappa_22
        let (g_sigma, r): (f64, f64) = (2.2, 2.6);

        let h = g_sigma - 1.0;
        let zeta = (r - 2.0) / 2.0;
        let switch = 1.0 / (1.0 + (0.25 * h).powi(4));
        let expected = 1.0 + switch * (h + 0.5 * h * zeta - 0.25 * h * h * zeta * zeta);

        let got = eval_model(&model, &params, g_sigma, r);
        assert!((got - expected).abs() < 1e-12, "{got} vs {expected}");
    }

    #[test]
    fn contact_value_is_reproduced_at_sigma() {
        let model = compile_model(&ghs()).unwrap();
        let params = [0.3; N_PARAMS];
        // zeta = 0 at contact, leaving 1 + s(h) h.
        let h: f64 = 1.5;
        let expected = 1.0 + h / (1.0 + (0.25 * h).powi(4));
        assert!((eval_model(&model, &params, h + 1.0, 2.0) - expected).abs() < 1e-12);
    }
}
