//! The booklet of integration strategies.
//!
//! Each strategy is a stateless rewrite rule over an `Integral`: a predicate
//! saying whether it fits and a transformation producing a new expression,
//! which may itself contain integrals left for the solver.

use std::fmt;

use crate::syntax::{Expr, Integral};
use crate::variables::{Var, VariableSet};
use crate::IntegratorError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
  ConstantTerm,
  ConstantFactor,
  ConstantDivisor,
  SimpleIntegral,
  ConstantPower,
  DistributeAddition,
  OneOverX,
}

impl Strategy {
  /// Every strategy, in the order the standard rulebook tries them.
  pub const ALL: [Strategy; 7] = [
    Strategy::ConstantTerm,
    Strategy::ConstantFactor,
    Strategy::ConstantDivisor,
    Strategy::SimpleIntegral,
    Strategy::ConstantPower,
    Strategy::DistributeAddition,
    Strategy::OneOverX,
  ];

  pub fn name(self) -> &'static str {
    match self {
      Strategy::ConstantTerm => "ConstantTerm",
      Strategy::ConstantFactor => "ConstantFactor",
      Strategy::ConstantDivisor => "ConstantDivisor",
      Strategy::SimpleIntegral => "SimpleIntegral",
      Strategy::ConstantPower => "ConstantPower",
      Strategy::DistributeAddition => "DistributeAddition",
      Strategy::OneOverX => "OneOverX",
    }
  }

  /// Short phrase used in explanations ("the ... rule").
  pub fn description(self) -> &'static str {
    match self {
      Strategy::ConstantTerm => "constant integrand",
      Strategy::ConstantFactor => "constant factor",
      Strategy::ConstantDivisor => "constant divisor",
      Strategy::SimpleIntegral => "bare integration variable",
      Strategy::ConstantPower => "power with a constant exponent",
      Strategy::DistributeAddition => "integral of a sum",
      Strategy::OneOverX => "one over x",
    }
  }

  pub fn example(self) -> &'static str {
    match self {
      Strategy::ConstantTerm => "int(4, x) = 4*x + C",
      Strategy::ConstantFactor => "int(4*x, x) = 4*int(x, x)",
      Strategy::ConstantDivisor => "int(x/4, x) = 1/4*int(x, x)",
      Strategy::SimpleIntegral => "int(x, x) = 1/2*x^2 + C",
      Strategy::ConstantPower => "int(x^3, x) = 1/4*x^4 + C",
      Strategy::DistributeAddition => {
        "int(x + x^2, x) = int(x, x) + int(x^2, x) + C"
      }
      Strategy::OneOverX => "int(1/x, x) = 1*ln(x)",
    }
  }

  /// Whether this strategy fits the integral. Never mutates or logs; the
  /// integrand is simplified first, so unsimplified input is fine.
  pub fn applicable(self, intg: &Integral) -> bool {
    let var = intg.var();
    let integrand = intg.integrand().simplified();
    match self {
      Strategy::ConstantTerm => integrand.is_constant_wrt(var),
      Strategy::ConstantFactor => constant_factor(&integrand, var).is_some(),
      Strategy::ConstantDivisor => matches!(
        &integrand,
        Expr::Fraction(_, denom) if denom.is_constant_wrt(var)
      ),
      Strategy::SimpleIntegral => integrand.is_var(var),
      Strategy::ConstantPower => constant_power(&integrand, var).is_some(),
      Strategy::DistributeAddition => matches!(integrand, Expr::Sum(..)),
      Strategy::OneOverX => matches!(
        &integrand,
        Expr::Fraction(numer, denom)
          if numer.is_constant_wrt(var) && denom.is_var(var)
      ),
    }
  }

  /// Rewrite an applicable integral. The result is a new expression that
  /// may still contain integrals.
  pub fn apply(
    self,
    intg: &Integral,
    vars: &mut VariableSet,
  ) -> Result<Expr, IntegratorError> {
    let var = intg.var();
    let integrand = intg.integrand().simplified();
    match self {
      Strategy::ConstantTerm => {
        if !integrand.is_constant_wrt(var) {
          return Err(self.mismatch(intg));
        }
        let term = Expr::product(integrand, Expr::var(var));
        Ok(add_integration_constant(term, vars))
      }
      Strategy::ConstantFactor => {
        let (constant, rest) =
          constant_factor(&integrand, var).ok_or_else(|| self.mismatch(intg))?;
        Ok(Expr::product(
          constant.clone(),
          Expr::integral(rest.clone(), var),
        ))
      }
      Strategy::ConstantDivisor => match integrand {
        Expr::Fraction(numer, denom) if denom.is_constant_wrt(var) => {
          Ok(Expr::product(
            Expr::fraction(Expr::int(1), *denom),
            Expr::integral(*numer, var),
          ))
        }
        _ => Err(self.mismatch(intg)),
      },
      Strategy::SimpleIntegral => {
        if !integrand.is_var(var) {
          return Err(self.mismatch(intg));
        }
        let half = Expr::fraction(Expr::int(1), Expr::int(2));
        let square = Expr::power(Expr::var(var), Expr::int(2));
        let term = Expr::product(half, square);
        Ok(add_integration_constant(term, vars))
      }
      Strategy::ConstantPower => {
        let next = constant_power(&integrand, var)
          .ok_or_else(|| self.mismatch(intg))?;
        let coefficient = next.reciprocal()?;
        let term =
          Expr::product(coefficient, Expr::power(Expr::var(var), next));
        Ok(add_integration_constant(term, vars))
      }
      Strategy::DistributeAddition => match integrand {
        Expr::Sum(a, b) => {
          let split =
            Expr::sum(Expr::integral(*a, var), Expr::integral(*b, var));
          Ok(add_integration_constant(split, vars))
        }
        _ => Err(self.mismatch(intg)),
      },
      Strategy::OneOverX => match integrand {
        Expr::Fraction(numer, denom)
          if numer.is_constant_wrt(var) && denom.is_var(var) =>
        {
          Ok(Expr::product(*numer, Expr::ln(Expr::var(var))))
        }
        _ => Err(self.mismatch(intg)),
      },
    }
  }

  fn mismatch(self, intg: &Integral) -> IntegratorError {
    IntegratorError::MalformedExpression(format!(
      "{} does not apply to {}",
      self.name(),
      intg
    ))
  }
}

impl fmt::Display for Strategy {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

/// Add a fresh integration constant to a fully integrated term.
fn add_integration_constant(expr: Expr, vars: &mut VariableSet) -> Expr {
  let constant = vars.new_variable("C");
  Expr::sum(expr, Expr::Variable(constant))
}

/// Split a product into `(constant, rest)`. When both sides are constant the
/// left operand is taken as the constant.
fn constant_factor<'e>(
  expr: &'e Expr,
  var: &Var,
) -> Option<(&'e Expr, &'e Expr)> {
  match expr {
    Expr::Product(a, b) if a.is_constant_wrt(var) => Some((&**a, &**b)),
    Expr::Product(a, b) if b.is_constant_wrt(var) => Some((&**b, &**a)),
    _ => None,
  }
}

/// For `var^k` with constant `k`, the simplified `k + 1`. `None` when the
/// shape does not match or `k + 1` is zero, since `1/(k + 1)` is undefined.
fn constant_power(expr: &Expr, var: &Var) -> Option<Expr> {
  match expr {
    Expr::Power(base, exponent)
      if base.is_var(var) && exponent.is_constant_wrt(var) =>
    {
      let next = Expr::sum((**exponent).clone(), Expr::int(1)).simplified();
      if next.is_zero() {
        None
      } else {
        Some(next)
      }
    }
    _ => None,
  }
}

/// The ordered list of strategies the solver consults.
///
/// Order is the tie-break: the first applicable strategy wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rulebook {
  strategies: Vec<Strategy>,
}

impl Rulebook {
  pub fn new(strategies: Vec<Strategy>) -> Self {
    Rulebook { strategies }
  }

  /// ConstantTerm, ConstantFactor, ConstantDivisor, SimpleIntegral,
  /// ConstantPower, DistributeAddition, OneOverX.
  pub fn standard() -> Self {
    Rulebook::new(Strategy::ALL.to_vec())
  }

  pub fn strategies(&self) -> &[Strategy] {
    &self.strategies
  }

  /// The first strategy that fits, if any.
  pub fn select(&self, intg: &Integral) -> Option<Strategy> {
    self.strategies.iter().copied().find(|s| s.applicable(intg))
  }
}

impl Default for Rulebook {
  fn default() -> Self {
    Rulebook::standard()
  }
}
