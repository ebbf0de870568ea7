use super::*;
use pretty_assertions::assert_eq;

fn x_and_vars() -> (VariableSet, Var) {
  let mut vars = VariableSet::new();
  let x = vars.variable("x");
  (vars, x)
}

#[test]
fn constant_integrand_trace() {
  let (mut vars, x) = x_and_vars();
  let solution = solve_plain(&Expr::integral(Expr::int(4), &x), &mut vars);
  assert_eq!(
    solution.trace,
    "\
root:
  I will attempt to solve int(4, x).
  int(4, x) is an integral.
  Which of my strategies apply to this integral?
  The constant integrand rule applies, I will use it.
  I will attempt to solve 4*x + C.
  4*x + C is a sum, so I will solve both sub-problems and add the results.
  subproblem-a:
    I will attempt to solve 4*x.
    4*x is not an integral, so I will leave it as it is.
  subproblem-b:
    I will attempt to solve C.
    C is not an integral, so I will leave it as it is.
  Adding the sub-problem results back together gives 4*x + C.
"
  );
  assert_eq!(solution.trace, solution.log.dump());
}

#[test]
fn stuck_trace_lists_every_rejection() {
  let (mut vars, x) = x_and_vars();
  let problem = Expr::integral(Expr::ln(Expr::var(&x)), &x);
  let solution = solve_plain(&problem, &mut vars);

  let mut expected = vec![
    "I will attempt to solve int(ln(x), x).".to_string(),
    "int(ln(x), x) is an integral.".to_string(),
    "Which of my strategies apply to this integral?".to_string(),
  ];
  for strategy in Strategy::ALL {
    expected
      .push(format!("The {} rule does not apply.", strategy.description()));
  }
  expected.push(STUCK.to_string());

  assert_eq!(solution.log.steps().collect::<Vec<_>>(), expected);
  assert_eq!(solution.log.branches().count(), 0);
  assert!(!solution.is_solved());
  // nothing was integrated, so no constant was introduced
  assert_eq!(vars.len(), 1);
}

#[test]
fn sums_open_one_branch_per_operand() {
  let (mut vars, x) = x_and_vars();
  let problem = Expr::integral(
    Expr::sum(Expr::var(&x), Expr::power(Expr::var(&x), Expr::int(2))),
    &x,
  );
  let solution = solve_plain(&problem, &mut vars);
  let log = &solution.log;

  assert_eq!(log.label(), "root");
  assert_eq!(
    log.steps().find(|s| s.contains("applies")),
    Some("The integral of a sum rule applies, I will use it.")
  );
  assert_eq!(
    log.last_step(),
    Some(
      "Adding the sub-problem results back together gives \
       1/2*x^2 + C1 + 1/3*x^3 + C2 + C."
    )
  );

  let labels: Vec<_> = log.branches().map(|b| b.label()).collect();
  assert_eq!(labels, vec!["subproblem-a", "subproblem-b"]);

  let left = log.branch("subproblem-a").unwrap();
  let bare = left.branch("subproblem-a").unwrap();
  let uses_bare = "The bare integration variable rule applies, I will use it.";
  assert!(bare.steps().any(|s| s == uses_bare));
  let power = left.branch("subproblem-b").unwrap();
  let uses_power =
    "The power with a constant exponent rule applies, I will use it.";
  assert!(power.steps().any(|s| s == uses_power));

  let constant = log.branch("subproblem-b").unwrap();
  assert_eq!(
    constant.last_step(),
    Some("C is not an integral, so I will leave it as it is.")
  );
}

#[test]
fn simplification_is_reported() {
  let mut vars = VariableSet::new();
  let problem = Expr::sum(Expr::int(1), Expr::int(2));
  let solution = solve_plain(&problem, &mut vars);
  assert_eq!(
    solution.log.steps().collect::<Vec<_>>(),
    vec![
      "I will attempt to solve 1 + 2.",
      "This simplifies to 3.",
      "3 is not an integral, so I will leave it as it is.",
    ]
  );
  assert_eq!(solution.result, Expr::int(3));
}

#[test]
fn root_label_is_configurable() {
  let (mut vars, x) = x_and_vars();
  let solver = Solver::new(
    Rulebook::standard(),
    SolverConfig {
      notation: Notation::Plain,
      root_label: "problem".to_string(),
    },
  );
  let solution = solver.solve(&Expr::var(&x), &mut vars).unwrap();
  assert_eq!(
    solution.trace,
    "problem:\n  I will attempt to solve x.\n  \
     x is not an integral, so I will leave it as it is.\n"
  );
}

#[test]
fn explanation_tree_serializes() {
  let (mut vars, x) = x_and_vars();
  let solution = solve_plain(&Expr::var(&x), &mut vars);
  let json = serde_json::to_value(&solution.log).unwrap();
  assert_eq!(json["label"], "root");
  assert_eq!(json["entries"][0]["step"], "I will attempt to solve x.");
}
