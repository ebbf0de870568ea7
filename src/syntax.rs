use std::collections::HashMap;
use std::fmt;

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, ToPrimitive, Zero};
use pest::iterators::{Pair, Pairs};

use crate::variables::{Var, VariableSet};
use crate::{IntegratorError, Rule};

/// A node of an expression tree.
///
/// Trees are immutable: every operation builds a new tree. Operand order is
/// kept as written; `simplified` never reorders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
  Number(BigRational),
  Variable(Var),
  Sum(Box<Expr>, Box<Expr>),
  Product(Box<Expr>, Box<Expr>),
  Fraction(Box<Expr>, Box<Expr>),
  Power(Box<Expr>, Box<Expr>),
  Logarithm(Box<Expr>),
  Integral(Integral),
}

/// An unsolved indefinite integral of `integrand` with respect to `var`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Integral {
  integrand: Box<Expr>,
  var: Var,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExprKind {
  Number,
  Variable,
  Sum,
  Product,
  Fraction,
  Power,
  Logarithm,
  Integral,
}

impl fmt::Display for ExprKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      ExprKind::Number => "number",
      ExprKind::Variable => "variable",
      ExprKind::Sum => "sum",
      ExprKind::Product => "product",
      ExprKind::Fraction => "fraction",
      ExprKind::Power => "power",
      ExprKind::Logarithm => "logarithm",
      ExprKind::Integral => "integral",
    };
    f.write_str(name)
  }
}

impl Integral {
  pub fn new(integrand: Expr, var: &Var) -> Self {
    Integral {
      integrand: Box::new(integrand),
      var: var.clone(),
    }
  }

  pub fn integrand(&self) -> &Expr {
    &self.integrand
  }

  pub fn var(&self) -> &Var {
    &self.var
  }

  pub fn simplified(&self) -> Integral {
    Integral {
      integrand: Box::new(self.integrand.simplified()),
      var: self.var.clone(),
    }
  }
}

impl TryFrom<Expr> for Integral {
  type Error = IntegratorError;

  fn try_from(expr: Expr) -> Result<Self, Self::Error> {
    match expr {
      Expr::Integral(intg) => Ok(intg),
      other => Err(IntegratorError::MalformedExpression(format!(
        "expected an integral, found the {} {}",
        other.kind(),
        other
      ))),
    }
  }
}

impl From<Integral> for Expr {
  fn from(intg: Integral) -> Self {
    Expr::Integral(intg)
  }
}

impl From<Var> for Expr {
  fn from(var: Var) -> Self {
    Expr::Variable(var)
  }
}

impl Expr {
  pub fn int(n: i64) -> Expr {
    Expr::Number(BigRational::from_integer(BigInt::from(n)))
  }

  /// `numer/denom` as an exact number. A zero denominator gives the
  /// symbolic fraction `numer/0` instead.
  pub fn rational(numer: i64, denom: i64) -> Expr {
    if denom == 0 {
      return Expr::fraction(Expr::int(numer), Expr::int(0));
    }
    Expr::Number(BigRational::new(BigInt::from(numer), BigInt::from(denom)))
  }

  pub fn var(var: &Var) -> Expr {
    Expr::Variable(var.clone())
  }

  pub fn sum(a: Expr, b: Expr) -> Expr {
    Expr::Sum(Box::new(a), Box::new(b))
  }

  pub fn product(a: Expr, b: Expr) -> Expr {
    Expr::Product(Box::new(a), Box::new(b))
  }

  pub fn fraction(numer: Expr, denom: Expr) -> Expr {
    Expr::Fraction(Box::new(numer), Box::new(denom))
  }

  pub fn power(base: Expr, exponent: Expr) -> Expr {
    Expr::Power(Box::new(base), Box::new(exponent))
  }

  pub fn ln(arg: Expr) -> Expr {
    Expr::Logarithm(Box::new(arg))
  }

  pub fn integral(integrand: Expr, var: &Var) -> Expr {
    Expr::Integral(Integral::new(integrand, var))
  }

  pub fn kind(&self) -> ExprKind {
    match self {
      Expr::Number(_) => ExprKind::Number,
      Expr::Variable(_) => ExprKind::Variable,
      Expr::Sum(..) => ExprKind::Sum,
      Expr::Product(..) => ExprKind::Product,
      Expr::Fraction(..) => ExprKind::Fraction,
      Expr::Power(..) => ExprKind::Power,
      Expr::Logarithm(_) => ExprKind::Logarithm,
      Expr::Integral(_) => ExprKind::Integral,
    }
  }

  pub fn is_a(&self, kind: ExprKind) -> bool {
    self.kind() == kind
  }

  /// Direct sub-expressions in operand order. The bound variable of an
  /// integral is not a child.
  pub fn children(&self) -> Vec<&Expr> {
    match self {
      Expr::Number(_) | Expr::Variable(_) => vec![],
      Expr::Sum(a, b)
      | Expr::Product(a, b)
      | Expr::Fraction(a, b)
      | Expr::Power(a, b) => vec![&**a, &**b],
      Expr::Logarithm(a) => vec![&**a],
      Expr::Integral(intg) => vec![intg.integrand()],
    }
  }

  pub fn as_number(&self) -> Option<&BigRational> {
    match self {
      Expr::Number(n) => Some(n),
      _ => None,
    }
  }

  pub fn as_integral(&self) -> Option<&Integral> {
    match self {
      Expr::Integral(intg) => Some(intg),
      _ => None,
    }
  }

  /// True if this is exactly the variable `var`.
  pub fn is_var(&self, var: &Var) -> bool {
    matches!(self, Expr::Variable(v) if v == var)
  }

  pub fn is_zero(&self) -> bool {
    matches!(self, Expr::Number(n) if n.is_zero())
  }

  /// Check whether the expression is constant with respect to `var`.
  ///
  /// Conservative: powers, logarithms and integrals are never treated as
  /// constant, even when `var` does not occur in them.
  pub fn is_constant_wrt(&self, var: &Var) -> bool {
    match self {
      Expr::Number(_) => true,
      Expr::Variable(v) => v != var,
      Expr::Sum(a, b) | Expr::Product(a, b) | Expr::Fraction(a, b) => {
        a.is_constant_wrt(var) && b.is_constant_wrt(var)
      }
      Expr::Power(..) | Expr::Logarithm(_) | Expr::Integral(_) => false,
    }
  }

  /// `1/self`. Numbers are inverted exactly (zero is an error); anything
  /// else becomes a fraction with numerator one.
  pub fn reciprocal(&self) -> Result<Expr, IntegratorError> {
    match self {
      Expr::Number(n) => reciprocal(n).map(Expr::Number),
      other => Ok(Expr::fraction(Expr::int(1), other.clone())),
    }
  }

  /// Simplify the expression bottom-up.
  ///
  /// Folds arithmetic on numbers and applies a handful of identities
  /// (`e + 0`, `e/1`, `e^1`, `e^0`). Idempotent.
  pub fn simplified(&self) -> Expr {
    match self {
      Expr::Number(_) | Expr::Variable(_) => self.clone(),
      Expr::Sum(a, b) => {
        let a = a.simplified();
        let b = b.simplified();
        if let (Expr::Number(n), Expr::Number(m)) = (&a, &b) {
          return Expr::Number(n + m);
        }
        // 0 + e = e, e + 0 = e
        if a.is_zero() {
          return b;
        }
        if b.is_zero() {
          return a;
        }
        Expr::sum(a, b)
      }
      Expr::Product(a, b) => {
        let a = a.simplified();
        let b = b.simplified();
        if let (Expr::Number(n), Expr::Number(m)) = (&a, &b) {
          return Expr::Number(n * m);
        }
        Expr::product(a, b)
      }
      Expr::Fraction(a, b) => {
        let a = a.simplified();
        let b = b.simplified();
        if let (Expr::Number(n), Expr::Number(m)) = (&a, &b) {
          if !m.is_zero() {
            return Expr::Number(n / m);
          }
        }
        // e / 1 = e
        if matches!(&b, Expr::Number(m) if m.is_one()) {
          return a;
        }
        Expr::fraction(a, b)
      }
      Expr::Power(base, exponent) => {
        let base = base.simplified();
        let exponent = exponent.simplified();
        if let (Expr::Number(n), Expr::Number(k)) = (&base, &exponent) {
          if let Some(folded) = fold_power(n, k) {
            return Expr::Number(folded);
          }
        }
        if let Expr::Number(k) = &exponent {
          // e^0 = 1
          if k.is_zero() {
            return Expr::int(1);
          }
          // e^1 = e
          if k.is_one() {
            return base;
          }
        }
        Expr::power(base, exponent)
      }
      Expr::Logarithm(a) => Expr::ln(a.simplified()),
      Expr::Integral(intg) => Expr::Integral(intg.simplified()),
    }
  }
}

/// Exact reciprocal of a number; zero has none.
pub fn reciprocal(n: &BigRational) -> Result<BigRational, IntegratorError> {
  if n.is_zero() {
    return Err(IntegratorError::UndefinedReciprocal(n.to_string()));
  }
  Ok(n.recip())
}

/// Largest exponent magnitude folded into a number.
const MAX_FOLDED_EXPONENT: u32 = 1024;

/// Largest numerator or denominator, in bits, a folded power may produce.
const MAX_FOLDED_BITS: u64 = 1 << 16;

/// `n^k` for a small integral exponent, `None` otherwise, when the result
/// would divide by zero, or when it would exceed `MAX_FOLDED_BITS`.
fn fold_power(n: &BigRational, k: &BigRational) -> Option<BigRational> {
  if !k.is_integer() {
    return None;
  }
  let k = k.to_integer().to_i32()?;
  if k.unsigned_abs() > MAX_FOLDED_EXPONENT || (n.is_zero() && k < 0) {
    return None;
  }
  let width = n.numer().bits().max(n.denom().bits());
  if width.saturating_mul(u64::from(k.unsigned_abs())) > MAX_FOLDED_BITS {
    return None;
  }
  Some(num_traits::pow::Pow::pow(n, k))
}

impl fmt::Display for Expr {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&crate::render::plain(self))
  }
}

impl fmt::Display for Integral {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&crate::render::plain(&Expr::Integral(self.clone())))
  }
}

/// Free-function spelling of `Expr::is_constant_wrt`.
pub fn is_constant(expr: &Expr, var: &Var) -> bool {
  expr.is_constant_wrt(var)
}

/// Identifier resolution for one parse: the same name always maps to the
/// same variable of the session's registry.
struct Scope<'a> {
  vars: &'a mut VariableSet,
  names: HashMap<String, Var>,
}

impl Scope<'_> {
  fn resolve(&mut self, name: &str) -> Var {
    if let Some(var) = self.names.get(name) {
      return var.clone();
    }
    let var = self.vars.variable(name);
    self.names.insert(name.to_string(), var.clone());
    var
  }
}

/// Deepest expression tree the parser builds.
pub(crate) const MAX_TREE_DEPTH: usize = 512;

/// Deepest grammar recursion (see `nesting_depth`) accepted before parsing.
pub(crate) const MAX_NESTING: usize = 64;

pub(crate) fn too_deep(limit: usize) -> IntegratorError {
  IntegratorError::MalformedExpression(format!(
    "expression nested deeper than {limit} levels"
  ))
}

/// Check a node depth against `MAX_TREE_DEPTH`.
fn nested(depth: usize) -> Result<usize, IntegratorError> {
  if depth > MAX_TREE_DEPTH {
    Err(too_deep(MAX_TREE_DEPTH))
  } else {
    Ok(depth)
  }
}

/// Convert a parsed `Program` into an expression tree.
pub(crate) fn program_to_expr(
  program: Pair<Rule>,
  vars: &mut VariableSet,
) -> Result<Expr, IntegratorError> {
  let mut scope = Scope {
    vars,
    names: HashMap::new(),
  };
  let expression = program
    .into_inner()
    .find(|p| p.as_rule() == Rule::Expression)
    .ok_or(IntegratorError::EmptyInput)?;
  pair_to_expr(expression, &mut scope).map(|(expr, _)| expr)
}

fn next_pair<'i>(
  pairs: &mut Pairs<'i, Rule>,
  context: Rule,
) -> Result<Pair<'i, Rule>, IntegratorError> {
  pairs.next().ok_or_else(|| {
    IntegratorError::MalformedExpression(format!(
      "incomplete {:?} in parse tree",
      context
    ))
  })
}

/// Build the expression for `pair` together with the depth of its tree.
fn pair_to_expr(
  pair: Pair<Rule>,
  scope: &mut Scope,
) -> Result<(Expr, usize), IntegratorError> {
  let rule = pair.as_rule();
  match rule {
    Rule::Expression => {
      let mut inner = pair.into_inner();
      let (mut result, mut depth) =
        pair_to_expr(next_pair(&mut inner, rule)?, scope)?;
      while let Some(op) = inner.next() {
        let (rhs, rhs_depth) =
          pair_to_expr(next_pair(&mut inner, rule)?, scope)?;
        result = match op.as_str() {
          "-" => {
            depth = nested(depth.max(rhs_depth + 1) + 1)?;
            Expr::sum(result, Expr::product(Expr::int(-1), rhs))
          }
          _ => {
            depth = nested(depth.max(rhs_depth) + 1)?;
            Expr::sum(result, rhs)
          }
        };
      }
      Ok((result, depth))
    }
    Rule::Term => {
      let mut inner = pair.into_inner();
      let (mut result, mut depth) =
        pair_to_expr(next_pair(&mut inner, rule)?, scope)?;
      while let Some(op) = inner.next() {
        let (rhs, rhs_depth) =
          pair_to_expr(next_pair(&mut inner, rule)?, scope)?;
        depth = nested(depth.max(rhs_depth) + 1)?;
        result = match op.as_str() {
          "/" => Expr::fraction(result, rhs),
          _ => Expr::product(result, rhs),
        };
      }
      Ok((result, depth))
    }
    Rule::Unary => {
      let mut negations = 0usize;
      let mut operand = None;
      for p in pair.into_inner() {
        if p.as_rule() == Rule::Negate {
          negations += 1;
        } else {
          operand = Some(pair_to_expr(p, scope)?);
        }
      }
      let (mut result, depth) = operand.ok_or_else(|| {
        IntegratorError::MalformedExpression("negation without operand".into())
      })?;
      let depth = nested(depth.saturating_add(negations))?;
      for _ in 0..negations {
        result = Expr::product(Expr::int(-1), result);
      }
      Ok((result, depth))
    }
    Rule::Power => {
      let mut inner = pair.into_inner();
      let (base, base_depth) =
        pair_to_expr(next_pair(&mut inner, rule)?, scope)?;
      match inner.next() {
        Some(exponent) => {
          let (exponent, exponent_depth) = pair_to_expr(exponent, scope)?;
          let depth = nested(base_depth.max(exponent_depth) + 1)?;
          Ok((Expr::power(base, exponent), depth))
        }
        None => Ok((base, base_depth)),
      }
    }
    Rule::Number => parse_decimal(pair.as_str()).map(|n| (Expr::Number(n), 1)),
    Rule::Identifier => {
      Ok((Expr::Variable(scope.resolve(pair.as_str())), 1))
    }
    Rule::Logarithm => {
      let mut inner = pair.into_inner();
      let (arg, depth) = pair_to_expr(next_pair(&mut inner, rule)?, scope)?;
      Ok((Expr::ln(arg), nested(depth + 1)?))
    }
    Rule::Integral => {
      let mut inner = pair.into_inner();
      let (integrand, depth) =
        pair_to_expr(next_pair(&mut inner, rule)?, scope)?;
      let var = scope.resolve(next_pair(&mut inner, rule)?.as_str());
      Ok((Expr::integral(integrand, &var), nested(depth + 1)?))
    }
    other => Err(IntegratorError::MalformedExpression(format!(
      "cannot convert {:?} to an expression",
      other
    ))),
  }
}

/// How deeply the grammar has to recurse to read `input`: open parentheses
/// plus pending `^` operators, which nest to the right. Stops counting once
/// `MAX_NESTING` is passed.
pub(crate) fn nesting_depth(input: &str) -> usize {
  // pending powers per open parenthesis group
  let mut groups = vec![0usize];
  let mut depth = 0usize;
  let mut deepest = 0usize;
  for c in input.chars() {
    match c {
      '(' => {
        groups.push(0);
        depth += 1;
      }
      ')' if groups.len() > 1 => {
        depth -= 1 + groups.pop().unwrap_or(0);
      }
      '^' => {
        if let Some(pending) = groups.last_mut() {
          *pending += 1;
          depth += 1;
        }
      }
      // these end every power chain of the current group
      '+' | '*' | '/' | ',' => {
        if let Some(pending) = groups.last_mut() {
          depth -= *pending;
          *pending = 0;
        }
      }
      _ => {}
    }
    deepest = deepest.max(depth);
    if deepest > MAX_NESTING {
      break;
    }
  }
  deepest
}

/// Exact value of a decimal literal such as `12` or `2.50`.
fn parse_decimal(text: &str) -> Result<BigRational, IntegratorError> {
  let invalid =
    || IntegratorError::MalformedExpression(format!("invalid number {text}"));
  let (whole, frac) = text.split_once('.').unwrap_or((text, ""));
  let digits: BigInt = format!("{whole}{frac}").parse().map_err(|_| invalid())?;
  let scale = num_traits::pow(BigInt::from(10), frac.len());
  Ok(BigRational::new(digits, scale))
}
