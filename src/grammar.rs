use std::fmt::{self, Display, Formatter};
use indexmap::{IndexMap, IndexSet};
use crate::analysis::{self, EventSink, NopSink, State};

/// End-of-input marker seeded into the follow set of the start symbol.
pub const END_MARKER: &str = "$";

/// Placeholder recorded in a first set when a rule has an empty body.
///
/// The set solvers do not track nullability; an empty production
/// contributes this marker instead. It can leak into follow sets through
/// the FIRST-of-next-symbol case.
pub const EMPTY_MARKER: &str = "<empty>";

pub type SymbolSet = IndexSet<String>;

/// non-terminal -> set of symbols
pub type SetTable = IndexMap<String, SymbolSet>;

/// A symbol is a non-terminal iff it is entirely upper case and contains
/// at least one cased character. Empty symbols classify as terminal.
pub fn is_nonterminal(symbol: &str) -> bool {
  !symbol.is_empty()
    && symbol.to_uppercase() == symbol
    && symbol.to_lowercase() != symbol
}

/// A production rule of a context-free grammar.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Rule {
  pub result: String,
  pub production: Vec<String>,
}

impl Rule {
  pub fn new(result: impl Into<String>, production: Vec<String>) -> Rule {
    Rule {
      result: result.into(),
      production,
    }
  }
}

impl Display for Rule {
  fn fmt(&self, f: &mut Formatter) -> fmt::Result {
    write!(f, "{} : {}", self.result, self.production.join(" "))
  }
}

#[derive(Debug)]
pub struct Grammar {
  start_symbol: String,
  terminals: SymbolSet,
  nonterminals: SymbolSet,
  productions: Vec<Rule>,
  first: SetTable,
  follow: SetTable,
  states: Vec<State>,
}

impl Grammar {
  pub fn new(
    start_symbol: impl Into<String>,
    terminals: SymbolSet,
    nonterminals: SymbolSet,
    productions: Vec<Rule>,
  ) -> Grammar {
    Grammar::with_sink(start_symbol, terminals, nonterminals, productions,
      &mut NopSink)
  }

  /// Builds the grammar, computing first/follow sets and the LR(0) states
  /// up front. Construction events are streamed into `sink`.
  pub fn with_sink(
    start_symbol: impl Into<String>,
    terminals: SymbolSet,
    nonterminals: SymbolSet,
    productions: Vec<Rule>,
    sink: &mut dyn EventSink,
  ) -> Grammar {
    let start_symbol = start_symbol.into();
    let first = analysis::gen_first(&productions);
    let follow = analysis::gen_follow(&productions, &nonterminals,
      &start_symbol, &first);
    let states = analysis::gen_states(&productions, &start_symbol, sink);

    Grammar {
      start_symbol,
      terminals,
      nonterminals,
      productions,
      first,
      follow,
      states,
    }
  }

  pub fn start_symbol(&self) -> &str {
    &self.start_symbol
  }

  pub fn terminals(&self) -> &SymbolSet {
    &self.terminals
  }

  pub fn nonterminals(&self) -> &SymbolSet {
    &self.nonterminals
  }

  pub fn productions(&self) -> &[Rule] {
    &self.productions
  }

  pub fn first(&self) -> &SetTable {
    &self.first
  }

  pub fn follow(&self) -> &SetTable {
    &self.follow
  }

  /// FIRST of a non-terminal; empty for unknown symbols.
  pub fn first_of<'a>(&'a self, nonterminal: &str)
    -> impl Iterator<Item = &'a str>
  {
    self.first.get(nonterminal).into_iter().flatten().map(String::as_str)
  }

  /// FOLLOW of a non-terminal; empty for unknown symbols.
  pub fn follow_of<'a>(&'a self, nonterminal: &str)
    -> impl Iterator<Item = &'a str>
  {
    self.follow.get(nonterminal).into_iter().flatten().map(String::as_str)
  }

  pub fn states(&self) -> &[State] {
    &self.states
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::{assert_eq, assert_ne};

  fn set(symbols: &[&str]) -> SymbolSet {
    symbols.iter().map(|s| (*s).to_owned()).collect()
  }

  fn rule(result: &str, production: &[&str]) -> Rule {
    Rule::new(result, production.iter().map(|s| (*s).to_owned()).collect())
  }

  fn canonical() -> Grammar {
    Grammar::new(
      "S",
      set(&["a", "b"]),
      set(&["S", "A", "B"]),
      vec![rule("S", &["A", "B"]), rule("A", &["a"]), rule("B", &["b"])],
    )
  }

  #[test]
  fn classifies_by_case() {
    assert!(is_nonterminal("S"));
    assert!(is_nonterminal("EXPR"));
    assert!(is_nonterminal("A1"));
    assert!(!is_nonterminal("a"));
    assert!(!is_nonterminal("Expr"));
    assert!(!is_nonterminal("+"));
    assert!(!is_nonterminal("1"));
    assert!(!is_nonterminal(""));
  }

  #[test]
  fn rule_equality_is_structural() {
    assert_eq!(rule("A", &["a", "B"]), rule("A", &["a", "B"]));
    assert_ne!(rule("A", &["a", "B"]), rule("A", &["B", "a"]));
  }

  #[test]
  fn rule_display() {
    insta::assert_snapshot!(rule("S", &["A", "b"]).to_string(), @"S : A b");
  }

  #[test]
  fn canonical_first_sets() {
    let grammar = canonical();
    assert_eq!(grammar.first_of("S").collect::<Vec<_>>(), vec!["a"]);
    assert_eq!(grammar.first_of("A").collect::<Vec<_>>(), vec!["a"]);
    assert_eq!(grammar.first_of("B").collect::<Vec<_>>(), vec!["b"]);
  }

  #[test]
  fn canonical_follow_sets() {
    let grammar = canonical();
    assert_eq!(grammar.follow_of("S").collect::<Vec<_>>(), vec![END_MARKER]);
    assert_eq!(grammar.follow_of("A").collect::<Vec<_>>(), vec!["b"]);
    assert_eq!(grammar.follow_of("B").collect::<Vec<_>>(), vec![END_MARKER]);
  }

  #[test]
  fn unknown_nonterminal_has_empty_sets() {
    let grammar = canonical();
    assert_eq!(grammar.first_of("X").count(), 0);
    assert_eq!(grammar.follow_of("X").count(), 0);
  }

  #[test]
  fn rebuild_is_identical() {
    let g1 = canonical();
    let g2 = canonical();
    assert_eq!(g1.first(), g2.first());
    assert_eq!(g1.follow(), g2.follow());
    assert_eq!(g1.states(), g2.states());
  }
}
