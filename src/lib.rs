use pest::Parser;
use pest_derive::Parser;
use thiserror::Error;

pub mod explain;
pub mod integrate;
pub mod render;
pub mod syntax;
pub mod variables;

pub use explain::{Entry, TreeLogger};
pub use integrate::{
  Notation, Rulebook, STUCK, Solution, Solver, SolverConfig, Strategy,
};
pub use syntax::{Expr, ExprKind, Integral, is_constant};
pub use variables::{Var, VarId, VariableSet};

#[derive(Parser)]
#[grammar = "integral.pest"]
pub struct IntegralParser;

#[derive(Error, Debug)]
pub enum IntegratorError {
  #[error("Parse error: {0}")]
  ParseError(#[from] Box<pest::error::Error<Rule>>),
  #[error("Empty input")]
  EmptyInput,
  #[error("Undefined reciprocal: {0} has no multiplicative inverse")]
  UndefinedReciprocal(String),
  #[error("Malformed expression: {0}")]
  MalformedExpression(String),
}

impl IntegralParser {
  pub fn parse_program(
    input: &str,
  ) -> Result<pest::iterators::Pairs<'_, Rule>, Box<pest::error::Error<Rule>>>
  {
    Self::parse(Rule::Program, input).map_err(Box::new)
  }
}

/// Parse text such as `int(x^2 + 3, x)` into an expression tree.
///
/// Every variable in the tree is allocated from `vars`; repeated names in one
/// input share a single variable. Inputs with more than 64 levels of
/// parentheses and powers, or whose tree would be deeper than 512 levels, are
/// rejected as malformed.
pub fn parse(
  input: &str,
  vars: &mut VariableSet,
) -> Result<Expr, IntegratorError> {
  if input.trim().is_empty() {
    return Err(IntegratorError::EmptyInput);
  }
  if syntax::nesting_depth(input) > syntax::MAX_NESTING {
    return Err(syntax::too_deep(syntax::MAX_NESTING));
  }
  let program = IntegralParser::parse_program(input)?
    .next()
    .ok_or(IntegratorError::EmptyInput)?;
  syntax::program_to_expr(program, vars)
}

/// Parse `input` as the integrand of an integral over the variable `var`.
pub fn parse_integral(
  input: &str,
  var: &str,
  vars: &mut VariableSet,
) -> Result<Integral, IntegratorError> {
  if input.trim().is_empty() {
    return Err(IntegratorError::EmptyInput);
  }
  Integral::try_from(parse(&format!("int({input}, {var})"), vars)?)
}

/// Solve with the standard rulebook and default configuration.
pub fn solve(
  expr: &Expr,
  vars: &mut VariableSet,
) -> Result<Solution, IntegratorError> {
  Solver::default().solve(expr, vars)
}

/// Parse and solve in a fresh session, handing back the session's registry
/// so the caller can inspect the variables in the result.
pub fn solve_str(
  input: &str,
) -> Result<(Solution, VariableSet), IntegratorError> {
  let mut vars = VariableSet::new();
  let expr = parse(input, &mut vars)?;
  let solution = solve(&expr, &mut vars)?;
  Ok((solution, vars))
}
