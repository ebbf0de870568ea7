use super::*;

fn x() -> (VariableSet, Var) {
  let mut vars = VariableSet::new();
  let x = vars.variable("x");
  (vars, x)
}

#[test]
fn numbers_fold() {
  let e = Expr::sum(Expr::int(2), Expr::product(Expr::int(3), Expr::int(4)));
  assert_eq!(e.simplified(), Expr::int(14));
  let e = Expr::fraction(Expr::int(6), Expr::int(4));
  assert_eq!(e.simplified(), Expr::rational(3, 2));
  let e = Expr::power(Expr::rational(1, 2), Expr::int(3));
  assert_eq!(e.simplified(), Expr::rational(1, 8));
}

#[test]
fn identities() {
  let (_, x) = x();
  let v = || Expr::var(&x);
  assert_eq!(Expr::sum(v(), Expr::int(0)).simplified(), v());
  assert_eq!(Expr::sum(Expr::int(0), v()).simplified(), v());
  assert_eq!(Expr::fraction(v(), Expr::int(1)).simplified(), v());
  assert_eq!(Expr::power(v(), Expr::int(1)).simplified(), v());
  assert_eq!(Expr::power(v(), Expr::int(0)).simplified(), Expr::int(1));
}

#[test]
fn multiplicative_one_is_kept() {
  let (_, x) = x();
  let e = Expr::product(Expr::int(1), Expr::ln(Expr::var(&x)));
  assert_eq!(e.simplified(), e);
}

#[test]
fn division_by_zero_stays_symbolic() {
  let e = Expr::fraction(Expr::int(1), Expr::int(0));
  assert_eq!(e.simplified(), e);
}

#[test]
fn large_exponents_are_not_folded() {
  let e = Expr::power(Expr::int(2), Expr::int(5000));
  assert_eq!(e.simplified(), e);
}

#[test]
fn nested_powers_stop_folding_before_numbers_explode() {
  let mut vars = VariableSet::new();
  let e = parse("((2^1024)^1024)^1024", &mut vars).unwrap();
  let once = e.simplified();
  let folded = Expr::power(Expr::int(2), Expr::int(1024)).simplified();
  assert_eq!(
    once,
    Expr::power(
      Expr::power(folded, Expr::int(1024)),
      Expr::int(1024)
    )
  );
  assert_eq!(once.simplified(), once);

  let (solution, _) = solve_str("int(((2^1024)^1024)^64, x)").unwrap();
  assert!(!solution.is_solved());
}

#[test]
fn zero_denominator_rational_is_a_fraction() {
  let e = Expr::rational(1, 0);
  assert_eq!(e, Expr::fraction(Expr::int(1), Expr::int(0)));
  assert_eq!(e.simplified(), e);
}

#[test]
fn simplifies_inside_integrals_and_logarithms() {
  let (_, x) = x();
  let e = Expr::integral(
    Expr::ln(Expr::sum(Expr::var(&x), Expr::int(0))),
    &x,
  );
  assert_eq!(
    e.simplified(),
    Expr::integral(Expr::ln(Expr::var(&x)), &x)
  );
}

#[test]
fn operand_order_is_preserved() {
  let (_, x) = x();
  let e = Expr::product(Expr::var(&x), Expr::int(3));
  assert_eq!(e.simplified(), e);
}

#[test]
fn idempotent_on_examples() {
  let (mut vars, x) = x();
  let y = vars.variable("y");
  let samples = vec![
    Expr::sum(
      Expr::sum(Expr::int(1), Expr::int(-1)),
      Expr::power(Expr::var(&x), Expr::sum(Expr::int(0), Expr::int(1))),
    ),
    Expr::fraction(Expr::product(Expr::int(2), Expr::var(&y)), Expr::int(0)),
    Expr::power(Expr::int(0), Expr::int(-2)),
    Expr::integral(Expr::fraction(Expr::var(&x), Expr::int(1)), &x),
  ];
  for e in samples {
    let once = e.simplified();
    assert_eq!(once.simplified(), once, "{e}");
  }
}

#[test]
fn constancy() {
  let (mut vars, x) = x();
  let y = vars.variable("y");
  let x_again = vars.variable("x");
  assert!(!Expr::var(&x).is_constant_wrt(&x));
  assert!(Expr::var(&y).is_constant_wrt(&x));
  // same display symbol, different variable
  assert!(Expr::var(&x_again).is_constant_wrt(&x));
  assert!(
    Expr::fraction(Expr::sum(Expr::int(1), Expr::var(&y)), Expr::int(2))
      .is_constant_wrt(&x)
  );
  assert!(!Expr::product(Expr::int(2), Expr::var(&x)).is_constant_wrt(&x));
  // conservative for the other kinds
  assert!(!Expr::ln(Expr::int(2)).is_constant_wrt(&x));
  assert!(!Expr::power(Expr::var(&y), Expr::int(2)).is_constant_wrt(&x));
}

#[test]
fn variables_compare_by_identity() {
  let (mut vars, x) = x();
  let other = vars.variable("x");
  assert_ne!(Expr::var(&x), Expr::var(&other));
  assert_eq!(render::plain(&Expr::var(&x)), render::plain(&Expr::var(&other)));
}
