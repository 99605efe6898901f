//! Turn an `Expr` into a flat-argument numeric function.
//!
//! Symbols are resolved to argument slots once, so evaluating the compiled
//! form inside a least-squares loop does no string lookups.

use super::expr::{Expr, is_integer, pow_value};
use crate::error::AppError;

#[derive(Debug, Clone)]
enum Node {
    Const(f64),
    Arg(usize),
    Add(Vec<Node>),
    Mul(Vec<Node>),
    PowI(Box<Node>, i32),
    Pow(Box<Node>, Box<Node>),
    Exp(Box<Node>),
}

/// A compiled expression taking its arguments in a fixed order.
#[derive(Debug, Clone)]
pub struct Compiled {
    arity: usize,
    root: Node,
}

impl Compiled {
    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Evaluate with `args` in the order given to [`compile`].
    ///
    /// # Panics
    /// Panics if `args` is shorter than [`Compiled::arity`].
    pub fn eval(&self, args: &[f64]) -> f64 {
        eval_node(&self.root, args)
    }
}

/// Compile `expr` with argument order `args`.
///
/// Every free symbol of `expr` must be listed; unused arguments are allowed.
pub fn compile(expr: &Expr, args: &[&str]) -> Result<Compiled, AppError> {
    let root = lower(expr, args)?;
    Ok(Compiled {
        arity: args.len(),
        root,
    })
}

fn lower(expr: &Expr, args: &[&str]) -> Result<Node, AppError> {
    Ok(match expr {
        Expr::Num(v) => Node::Const(*v),
        Expr::Sym(s) => {
            let idx = args.iter().position(|a| a == s).ok_or_else(|| {
                AppError::output(format!("Symbol `{s}` is not among the compiled arguments"))
            })?;
            Node::Arg(idx)
        }
        Expr::Add(xs) => Node::Add(xs.iter().map(|x| lower(x, args)).collect::<Result<_, _>>()?),
        Expr::Mul(xs) => Node::Mul(xs.iter().map(|x| lower(x, args)).collect::<Result<_, _>>()?),
        Expr::Pow(b, e) => match **e {
            Expr::Num(n) if is_integer(n) && n.abs() <= 64.0 => {
                Node::PowI(Box::new(lower(b, args)?), n as i32)
            }
            _ => Node::Pow(Box::new(lower(b, args)?), Box::new(lower(e, args)?)),
        },
        Expr::Exp(x) => Node::Exp(Box::new(lower(x, args)?)),
    })
}

fn eval_node(node: &Node, args: &[f64]) -> f64 {
    match node {
        Node::Const(v) => *v,
        Node::Arg(i) => args[*i],
        Node::Add(xs) => xs.iter().map(|x| eval_node(x, args)).sum(),
        Node::Mul(xs) => xs.iter().map(|x| eval_node(x, args)).product(),
        Node::PowI(b, n) => eval_node(b, args).powi(*n),
        Node::Pow(b, e) => pow_value(eval_node(b, args), eval_node(e, args)),
        Node::Exp(x) => eval_node(x, args).exp(),
    }
}
