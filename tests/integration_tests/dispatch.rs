use super::*;

fn x_and_vars() -> (VariableSet, Var) {
  let mut vars = VariableSet::new();
  let x = vars.variable("x");
  (vars, x)
}

/// Strategy picked for `int(integrand, x)` by the standard rulebook.
fn selected(integrand: Expr, x: &Var) -> Option<Strategy> {
  Rulebook::standard().select(&Integral::new(integrand, x))
}

#[test]
fn each_strategy_is_reachable() {
  let (mut vars, x) = x_and_vars();
  let y = vars.variable("y");
  let cases = vec![
    (Expr::int(4), Strategy::ConstantTerm),
    (Expr::var(&y), Strategy::ConstantTerm),
    (
      Expr::product(Expr::int(3), Expr::var(&x)),
      Strategy::ConstantFactor,
    ),
    (
      Expr::fraction(Expr::var(&x), Expr::int(4)),
      Strategy::ConstantDivisor,
    ),
    (Expr::var(&x), Strategy::SimpleIntegral),
    (
      Expr::power(Expr::var(&x), Expr::int(3)),
      Strategy::ConstantPower,
    ),
    (
      Expr::sum(Expr::var(&x), Expr::int(1)),
      Strategy::DistributeAddition,
    ),
    (
      Expr::fraction(Expr::var(&y), Expr::var(&x)),
      Strategy::OneOverX,
    ),
  ];
  for (integrand, expected) in cases {
    assert_eq!(selected(integrand.clone(), &x), Some(expected), "{integrand}");
  }
}

#[test]
fn earlier_strategies_win() {
  let (_, x) = x_and_vars();
  // a constant fraction also fits the constant divisor rule
  let e = Expr::fraction(Expr::int(3), Expr::int(0));
  let intg = Integral::new(e, &x);
  assert!(Strategy::ConstantDivisor.applicable(&intg));
  assert_eq!(
    Rulebook::standard().select(&intg),
    Some(Strategy::ConstantTerm)
  );

  // x * x^2 has no constant side and stays unsolved
  let e = Expr::product(
    Expr::var(&x),
    Expr::power(Expr::var(&x), Expr::int(2)),
  );
  assert_eq!(selected(e, &x), None);
}

#[test]
fn selection_is_the_lowest_applicable_index() {
  let (mut vars, x) = x_and_vars();
  let y = vars.variable("y");
  let samples = vec![
    Expr::int(0),
    Expr::product(Expr::var(&y), Expr::int(2)),
    Expr::fraction(Expr::int(5), Expr::var(&x)),
    Expr::fraction(Expr::var(&x), Expr::var(&y)),
    Expr::power(Expr::var(&x), Expr::var(&y)),
    Expr::sum(Expr::ln(Expr::var(&x)), Expr::var(&x)),
    Expr::ln(Expr::var(&x)),
  ];
  for integrand in samples {
    let intg = Integral::new(integrand, &x);
    let first = Strategy::ALL.iter().copied().find(|s| s.applicable(&intg));
    assert_eq!(Rulebook::standard().select(&intg), first);
  }
}

#[test]
fn applicability_simplifies_first() {
  let (_, x) = x_and_vars();
  // x^1 is only the bare variable after simplification
  let e = Expr::power(Expr::var(&x), Expr::int(1));
  assert_eq!(selected(e, &x), Some(Strategy::SimpleIntegral));
  // the added zero disappears, leaving a product
  let e = Expr::sum(
    Expr::product(Expr::int(2), Expr::var(&x)),
    Expr::int(0),
  );
  assert_eq!(selected(e, &x), Some(Strategy::ConstantFactor));
}

#[test]
fn rulebook_order_is_configurable() {
  let (mut vars, x) = x_and_vars();
  let book = Rulebook::new(vec![Strategy::OneOverX, Strategy::ConstantTerm]);
  let solver = Solver::new(book, SolverConfig::default());
  let problem = Expr::integral(Expr::var(&x), &x);
  let solution = solver.solve(&problem, &mut vars).unwrap();
  assert_eq!(solution.result, problem);
}
