use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

/// Opaque handle into a `VariableSet`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarId(usize);

impl VarId {
  pub fn index(self) -> usize {
    self.0
  }
}

/// A variable allocated by a `VariableSet`.
///
/// Carries its display symbol for rendering, but equality and hashing only
/// look at the handle: two allocations named `x` are different variables.
/// Handles are only meaningful within the set that allocated them.
#[derive(Debug, Clone)]
pub struct Var {
  id: VarId,
  symbol: Rc<str>,
}

impl Var {
  pub fn id(&self) -> VarId {
    self.id
  }

  pub fn symbol(&self) -> &str {
    &self.symbol
  }
}

impl PartialEq for Var {
  fn eq(&self, other: &Self) -> bool {
    self.id == other.id
  }
}

impl Eq for Var {}

impl Hash for Var {
  fn hash<H: Hasher>(&self, state: &mut H) {
    self.id.hash(state);
  }
}

impl fmt::Display for Var {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.symbol)
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Origin {
  Declared,
  Generated,
}

#[derive(Debug, Clone)]
struct Record {
  symbol: Rc<str>,
  origin: Origin,
}

/// Arena of every variable that belongs to one solving session.
///
/// Holds both the variables named in the input and the ones the strategies
/// invent (integration constants). Every allocation is a fresh variable.
#[derive(Debug, Clone, Default)]
pub struct VariableSet {
  records: Vec<Record>,
}

impl VariableSet {
  pub fn new() -> Self {
    Self::default()
  }

  /// Allocate a declared variable. Repeating a symbol still gives a new one.
  pub fn variable(&mut self, symbol: &str) -> Var {
    self.allocate(Rc::from(symbol), Origin::Declared)
  }

  /// Allocate a machine-generated variable whose display symbol does not
  /// clash with anything already in the set (`C`, `C1`, `C2`, ...).
  pub fn new_variable(&mut self, suggest: &str) -> Var {
    let symbol = if self.is_taken(suggest) {
      (1..)
        .map(|n| format!("{suggest}{n}"))
        .find(|candidate| !self.is_taken(candidate))
        .unwrap_or_else(|| format!("{suggest}{}", self.records.len()))
    } else {
      suggest.to_string()
    };
    self.allocate(Rc::from(symbol), Origin::Generated)
  }

  /// True for variables created by `new_variable`, e.g. integration constants.
  pub fn is_generated(&self, var: &Var) -> bool {
    self
      .records
      .get(var.id.0)
      .is_some_and(|r| r.origin == Origin::Generated)
  }

  pub fn get(&self, id: VarId) -> Option<Var> {
    self.records.get(id.0).map(|r| Var {
      id,
      symbol: r.symbol.clone(),
    })
  }

  pub fn len(&self) -> usize {
    self.records.len()
  }

  pub fn is_empty(&self) -> bool {
    self.records.is_empty()
  }

  pub fn iter(&self) -> impl Iterator<Item = Var> + '_ {
    self.records.iter().enumerate().map(|(i, r)| Var {
      id: VarId(i),
      symbol: r.symbol.clone(),
    })
  }

  fn is_taken(&self, symbol: &str) -> bool {
    self.records.iter().any(|r| &*r.symbol == symbol)
  }

  fn allocate(&mut self, symbol: Rc<str>, origin: Origin) -> Var {
    let id = VarId(self.records.len());
    self.records.push(Record {
      symbol: symbol.clone(),
      origin,
    });
    Var { id, symbol }
  }
}
