//! Tree-shaped explanation of how a problem was solved.
//!
//! Every node is an ordered list of entries: plain text steps and named
//! child branches. The solver opens a branch for each sub-problem, so the
//! shape of the tree follows the shape of the recursion.

use std::fmt::{self, Write};

use serde::ser::{SerializeStruct, Serializer};
use serde::Serialize;

/// One entry of a node, borrowed from the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Entry<'a> {
  Step(&'a str),
  Branch(&'a TreeLogger),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Slot {
  Step(String),
  /// Index into `TreeLogger::branches`.
  Branch(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeLogger {
  label: String,
  slots: Vec<Slot>,
  branches: Vec<TreeLogger>,
}

impl TreeLogger {
  pub fn new(label: impl Into<String>) -> Self {
    TreeLogger {
      label: label.into(),
      slots: Vec::new(),
      branches: Vec::new(),
    }
  }

  pub fn label(&self) -> &str {
    &self.label
  }

  /// Append a step to this node.
  pub fn push(&mut self, text: impl Into<String>) {
    self.slots.push(Slot::Step(text.into()));
  }

  /// Open a child branch under `label` and hand it back for logging.
  ///
  /// Splitting twice with the same label adds a second branch; `branch`
  /// finds the first one.
  pub fn split(&mut self, label: impl Into<String>) -> &mut TreeLogger {
    let index = self.branches.len();
    self.branches.push(TreeLogger::new(label));
    self.slots.push(Slot::Branch(index));
    &mut self.branches[index]
  }

  /// Steps and branches of this node in insertion order.
  pub fn entries(&self) -> impl Iterator<Item = Entry<'_>> {
    self.slots.iter().map(|slot| match slot {
      Slot::Step(text) => Entry::Step(text),
      Slot::Branch(index) => Entry::Branch(&self.branches[*index]),
    })
  }

  /// Text steps of this node, in insertion order, without branch contents.
  pub fn steps(&self) -> impl Iterator<Item = &str> {
    self.slots.iter().filter_map(|slot| match slot {
      Slot::Step(text) => Some(text.as_str()),
      Slot::Branch(_) => None,
    })
  }

  pub fn last_step(&self) -> Option<&str> {
    self.steps().last()
  }

  pub fn branch(&self, label: &str) -> Option<&TreeLogger> {
    self.branches.iter().find(|child| child.label == label)
  }

  pub fn branches(&self) -> impl Iterator<Item = &TreeLogger> {
    self.branches.iter()
  }

  /// Serialize the whole tree as indented text.
  pub fn dump(&self) -> String {
    self.to_string()
  }

  fn write_indented(&self, out: &mut String, depth: usize) -> fmt::Result {
    writeln!(out, "{}{}:", "  ".repeat(depth), self.label)?;
    for entry in self.entries() {
      match entry {
        Entry::Step(text) => {
          writeln!(out, "{}{}", "  ".repeat(depth + 1), text)?
        }
        Entry::Branch(child) => child.write_indented(out, depth + 1)?,
      }
    }
    Ok(())
  }
}

impl fmt::Display for TreeLogger {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut out = String::new();
    self.write_indented(&mut out, 0)?;
    f.write_str(&out)
  }
}

impl Serialize for TreeLogger {
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: Serializer,
  {
    let mut state = serializer.serialize_struct("TreeLogger", 2)?;
    state.serialize_field("label", &self.label)?;
    state.serialize_field("entries", &self.entries().collect::<Vec<_>>())?;
    state.end()
  }
}
