//! Display forms for expressions.
//!
//! `plain` produces operator notation that the crate's own parser reads back
//! (`1/2*x^2 + C`, `int(x, x)`, `ln(x)`); `latex` produces LaTeX for traces.

use num_rational::BigRational;
use num_traits::Signed;

use crate::syntax::Expr;

const SUM: u8 = 1;
const PRODUCT: u8 = 2;
const POWER: u8 = 3;
const ATOM: u8 = 4;

fn is_natural(n: &BigRational) -> bool {
  n.is_integer() && !n.is_negative()
}

/// Binding strength of the outermost operator in plain notation.
fn plain_precedence(expr: &Expr) -> u8 {
  match expr {
    Expr::Number(n) if is_natural(n) => ATOM,
    Expr::Number(_) => PRODUCT,
    Expr::Sum(..) => SUM,
    Expr::Product(..) | Expr::Fraction(..) => PRODUCT,
    Expr::Power(..) => POWER,
    Expr::Variable(_) | Expr::Logarithm(_) | Expr::Integral(_) => ATOM,
  }
}

fn plain_operand(expr: &Expr, min: u8) -> String {
  if plain_precedence(expr) < min {
    format!("({})", plain(expr))
  } else {
    plain(expr)
  }
}

fn plain_number(n: &BigRational) -> String {
  if n.is_integer() {
    n.numer().to_string()
  } else {
    format!("{}/{}", n.numer(), n.denom())
  }
}

/// Render an expression in plain operator notation.
pub fn plain(expr: &Expr) -> String {
  match expr {
    Expr::Number(n) => plain_number(n),
    Expr::Variable(v) => v.symbol().to_string(),
    Expr::Sum(a, b) => {
      format!("{} + {}", plain_operand(a, SUM), plain_operand(b, SUM))
    }
    Expr::Product(a, b) => {
      format!("{}*{}", plain_operand(a, PRODUCT), plain_operand(b, POWER))
    }
    Expr::Fraction(a, b) => {
      format!("{}/{}", plain_operand(a, PRODUCT), plain_operand(b, POWER))
    }
    Expr::Power(base, exponent) => {
      format!("{}^{}", plain_operand(base, ATOM), plain_operand(exponent, ATOM))
    }
    Expr::Logarithm(arg) => format!("ln({})", plain(arg)),
    Expr::Integral(intg) => {
      format!("int({}, {})", plain(intg.integrand()), intg.var().symbol())
    }
  }
}

fn latex_precedence(expr: &Expr) -> u8 {
  match expr {
    Expr::Number(n) if n.is_negative() => PRODUCT,
    Expr::Number(_) | Expr::Fraction(..) => ATOM,
    Expr::Sum(..) => SUM,
    // \int runs to its differential, so it never binds like an atom
    Expr::Product(..) | Expr::Integral(_) => PRODUCT,
    Expr::Power(..) => POWER,
    Expr::Variable(_) | Expr::Logarithm(_) => ATOM,
  }
}

fn latex_operand(expr: &Expr, min: u8) -> String {
  if latex_precedence(expr) < min {
    format!("\\left({}\\right)", latex(expr))
  } else {
    latex(expr)
  }
}

fn latex_number(n: &BigRational) -> String {
  if n.is_integer() {
    return n.numer().to_string();
  }
  let sign = if n.is_negative() { "-" } else { "" };
  let abs = n.abs();
  format!("{}\\frac{{{}}}{{{}}}", sign, abs.numer(), abs.denom())
}

/// Render an expression as LaTeX.
pub fn latex(expr: &Expr) -> String {
  match expr {
    Expr::Number(n) => latex_number(n),
    Expr::Variable(v) => v.symbol().to_string(),
    Expr::Sum(a, b) => {
      format!("{} + {}", latex_operand(a, SUM), latex_operand(b, SUM))
    }
    Expr::Product(a, b) => format!(
      "{} \\cdot {}",
      latex_operand(a, PRODUCT),
      latex_operand(b, POWER)
    ),
    Expr::Fraction(a, b) => {
      format!("\\frac{{{}}}{{{}}}", latex(a), latex(b))
    }
    Expr::Power(base, exponent) => {
      format!("{}^{{{}}}", latex_operand(base, ATOM), latex(exponent))
    }
    Expr::Logarithm(arg) => format!("\\ln\\left({}\\right)", latex(arg)),
    Expr::Integral(intg) => format!(
      "\\int {} \\, d{}",
      latex_operand(intg.integrand(), PRODUCT),
      intg.var().symbol()
    ),
  }
}
