use tracing::{debug, info, trace};

use crate::explain::TreeLogger;
use crate::integrate::strategies::Rulebook;
use crate::render;
use crate::syntax::{Expr, Integral};
use crate::variables::VariableSet;
use crate::IntegratorError;

/// Final step logged for an integral no strategy fits.
pub const STUCK: &str = "None of my strategies work here. I am stuck.";

/// How expressions are written inside explanation steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Notation {
  Plain,
  #[default]
  Latex,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolverConfig {
  pub notation: Notation,
  /// Label of the root node of every explanation tree.
  pub root_label: String,
}

impl Default for SolverConfig {
  fn default() -> Self {
    SolverConfig {
      notation: Notation::default(),
      root_label: "root".to_string(),
    }
  }
}

/// Outcome of one solving session.
#[derive(Debug, Clone)]
pub struct Solution {
  pub result: Expr,
  /// `log` dumped as indented text.
  pub trace: String,
  pub log: TreeLogger,
}

impl Solution {
  /// True when no unsolved integral is left anywhere in the result.
  pub fn is_solved(&self) -> bool {
    !contains_integral(&self.result)
  }
}

fn contains_integral(expr: &Expr) -> bool {
  matches!(expr, Expr::Integral(_))
    || expr.children().into_iter().any(contains_integral)
}

#[derive(Debug, Clone, Default)]
pub struct Solver {
  rulebook: Rulebook,
  config: SolverConfig,
}

impl Solver {
  pub fn new(rulebook: Rulebook, config: SolverConfig) -> Self {
    Solver { rulebook, config }
  }

  pub fn rulebook(&self) -> &Rulebook {
    &self.rulebook
  }

  pub fn config(&self) -> &SolverConfig {
    &self.config
  }

  /// Run one session: fresh explanation tree, solve, dump.
  pub fn solve(
    &self,
    expr: &Expr,
    vars: &mut VariableSet,
  ) -> Result<Solution, IntegratorError> {
    let mut log = TreeLogger::new(self.config.root_label.as_str());
    let result = self.attempt_integral(expr, vars, &mut log)?;
    let trace = log.dump();
    info!(result = %result, "solve finished");
    Ok(Solution { result, trace, log })
  }

  /// Solve `expr` as far as the rulebook allows, explaining each decision
  /// in `log`.
  ///
  /// An integral no strategy fits comes back unchanged; that is the stuck
  /// state, not an error. Errors only signal broken invariants.
  pub fn attempt_integral(
    &self,
    expr: &Expr,
    vars: &mut VariableSet,
    log: &mut TreeLogger,
  ) -> Result<Expr, IntegratorError> {
    log.push(format!("I will attempt to solve {}.", self.show(expr)));
    let simplified = expr.simplified();
    let shown = self.show(&simplified);
    if &simplified != expr {
      log.push(format!("This simplifies to {}.", shown));
    }

    match simplified {
      Expr::Integral(intg) => {
        log.push(format!("{} is an integral.", shown));
        self.attempt_strategies(intg, vars, log)
      }
      Expr::Sum(a, b) => {
        log.push(format!(
          "{} is a sum, so I will solve both sub-problems and add the \
           results.",
          shown
        ));
        debug!(left = %a, right = %b, "splitting sum");
        let solved_a =
          self.attempt_integral(&a, vars, log.split("subproblem-a"))?;
        let solved_b =
          self.attempt_integral(&b, vars, log.split("subproblem-b"))?;
        let combined = Expr::sum(solved_a, solved_b);
        log.push(format!(
          "Adding the sub-problem results back together gives {}.",
          self.show(&combined)
        ));
        Ok(combined)
      }
      other => {
        log.push(format!(
          "{} is not an integral, so I will leave it as it is.",
          shown
        ));
        Ok(other)
      }
    }
  }

  fn attempt_strategies(
    &self,
    intg: Integral,
    vars: &mut VariableSet,
    log: &mut TreeLogger,
  ) -> Result<Expr, IntegratorError> {
    log.push("Which of my strategies apply to this integral?");
    for &strategy in self.rulebook.strategies() {
      if strategy.applicable(&intg) {
        log.push(format!(
          "The {} rule applies, I will use it.",
          strategy.description()
        ));
        debug!(
          strategy = strategy.name(),
          integral = %intg,
          "applying strategy"
        );
        let applied = strategy.apply(&intg, vars)?;
        return self.attempt_integral(&applied, vars, log);
      }
      trace!(strategy = strategy.name(), "strategy not applicable");
      log.push(format!(
        "The {} rule does not apply.",
        strategy.description()
      ));
    }

    debug!(integral = %intg, "no strategy applies");
    log.push(STUCK);
    Ok(Expr::Integral(intg))
  }

  fn show(&self, expr: &Expr) -> String {
    match self.config.notation {
      Notation::Plain => render::plain(expr),
      Notation::Latex => format!("\\( {} \\)", render::latex(expr)),
    }
  }
}
