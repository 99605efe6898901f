//! LaTeX and C sources generated from the fitted ansatz.

use crate::report::printf::{fmt_d, fmt_f, fmt_g, g};
use crate::symbolic::{Expr, latex_eq, latex_symbol, to_ccode};

use super::ansatz::{Definition, KAPPAS};
use super::fit::GhsFit;

fn dmath(body: &str) -> String {
    format!("\\begin{{dmath}}\n{body}\n\\end{{dmath}}\n")
}

/// The analytics document: every definition, every unwrapped definition,
/// then the fitted constants.
pub fn analytics_tex(
    definitions: &[Definition],
    unwrapped: &[Definition],
    fit: &GhsFit,
    digits: u32,
    stamp: &str,
) -> String {
    let mut out = format!(
        "% Code generated by smc fit-ghs on {stamp}\n\
         \\documentclass{{article}}\n\
         \\usepackage{{breqn}}\n\
         \\begin{{document}}\n"
    );
    for def in definitions.iter().chain(unwrapped) {
        out.push_str(&dmath(&latex_eq(&def.lhs(), &def.rhs)));
    }
    for (name, value) in KAPPAS.iter().chain(["alpha"].iter()).zip(&fit.params) {
        out.push_str(&dmath(&format!(
            "{} = {}",
            latex_symbol(name),
            fmt_f(*value, digits as usize)
        )));
    }
    out.push_str("\\end{document}\n");
    out
}

/// C header with the constants and `short_range_radial_distribution`.
pub fn analytics_header(ghs: &Expr, sigma: f64, fit: &GhsFit, digits: u32, stamp: &str) -> String {
    let d = digits as usize;
    let mut out = format!("// Code generated by smc fit-ghs on {stamp}\n#include <math.h>\n\n");
    for (row, names) in KAPPAS.chunks(4).enumerate() {
        for (col, name) in names.iter().enumerate() {
            out.push_str(&format!(
                "const double {name} = {};\n",
                fmt_f(fit.params[row * 4 + col], d)
            ));
        }
        out.push('\n');
    }
    out.push_str(&format!("const double alpha = {};\n\n", fmt_f(fit.alpha(), d)));

    out.push_str(&format!(
        "// inline double short_range_gsigma_to_eta(const double g_sigma) {{\n\
         //   if (g_sigma <= 1) return 0;\n\
         //   return {};\n\
         // }}\n\n\n",
        to_ccode(&Expr::sym("h_sigma"))
    ));
    out.push_str(&format!(
        "inline double short_range_radial_distribution(double g_sigma, double r) {{\n\
         \x20 if (g_sigma <= 1) return 1; // handle roundoff error okay\n\
         \x20 if (r < {}) return 0;\n\
         \x20 const double h_sigma = g_sigma - 1;\n\
         \x20 return {};\n\
         }}\n",
        fmt_d(sigma),
        to_ccode(ghs)
    ));
    out
}

/// `\newcommand` definitions quoted by the paper.
pub fn fit_parameters_tex(fit: &GhsFit) -> String {
    let mut table = String::new();
    for i in 1..=4 {
        let row: Vec<String> = (1..=4).map(|j| g(fit.kappa(i, j))).collect();
        table.push_str(&format!("    {} \\\\\n", row.join(" & ")));
    }
    format!(
        "\n\\newcommand\\maxrfit{{{}}}\n\
         \\newcommand\\maxerr{{{}}}\n\
         \\newcommand\\etamaxerr{{{}}}\n\
         \\newcommand\\rmaxerr{{{}}}\n\
         \\newcommand\\chisq{{{}}}\n\
         \\newcommand\\kappatable{{\n\
         \x20 \\left(\n\
         \x20 \\begin{{array}}{{c d{{3}} d{{3}} d{{3}} d{{3}}}}\n\
         {table}\
         \x20 \\end{{array}}\n\
         \x20 \\right)\n\
         }}\n\
         \\newcommand\\alphaval{{{}}}\n",
        fmt_g(fit.r_cut, 2),
        fmt_g(fit.max_error, 2),
        g(fit.eta_max_error),
        fmt_g(fit.r_max_error, 2),
        fmt_g(fit.chi2, 2),
        g(fit.alpha()),
    )
}
