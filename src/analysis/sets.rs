use crate::grammar::{is_nonterminal, Rule, SetTable, SymbolSet};
use crate::grammar::{EMPTY_MARKER, END_MARKER};

/// Computes FIRST for every non-terminal appearing as a rule result.
///
/// Runs full passes over the rules until a pass adds nothing. Only the
/// head symbol of each production is consulted; a rule with an empty body
/// contributes the `EMPTY_MARKER` placeholder.
pub(crate) fn gen_first(productions: &[Rule]) -> SetTable {
  let mut first = SetTable::new();
  for rule in productions {
    first.entry(rule.result.clone()).or_insert_with(SymbolSet::new);
  }

  loop {
    let mut changed = false;
    for rule in productions {
      let added: Vec<String> = match rule.production.first() {
        None => vec![EMPTY_MARKER.to_owned()],
        Some(head) if is_nonterminal(head) => match first.get(head) {
          Some(set) => set.iter().cloned().collect(),
          // head has no rules of its own, nothing to propagate
          None => Vec::new(),
        },
        Some(head) => vec![head.clone()],
      };
      if let Some(set) = first.get_mut(&rule.result) {
        for symbol in added {
          changed |= set.insert(symbol);
        }
      }
    }
    if !changed {
      break;
    }
  }

  first
}

/// Computes FOLLOW for every non-terminal, seeding FOLLOW(start) with the
/// end-of-input marker.
///
/// For a non-terminal X inside a production N : ... X next ...
/// - next is a terminal: next joins FOLLOW(X)
/// - next is a non-terminal: FIRST(next) joins FOLLOW(X)
/// - X is last: FOLLOW(N) joins FOLLOW(X)
///
/// No nullability tracking: a nullable `next` under-approximates
/// FOLLOW(X), and the FIRST placeholder of an empty-bodied rule can leak
/// in through the second case.
pub(crate) fn gen_follow(
  productions: &[Rule],
  nonterminals: &SymbolSet,
  start_symbol: &str,
  first: &SetTable,
) -> SetTable {
  let mut follow = SetTable::new();
  for nonterminal in nonterminals {
    follow.entry(nonterminal.clone()).or_insert_with(SymbolSet::new);
  }
  for rule in productions {
    follow.entry(rule.result.clone()).or_insert_with(SymbolSet::new);
  }
  follow
    .entry(start_symbol.to_owned())
    .or_insert_with(SymbolSet::new)
    .insert(END_MARKER.to_owned());

  loop {
    let mut changed = false;
    for rule in productions {
      for (ix, symbol) in rule.production.iter().enumerate() {
        if !is_nonterminal(symbol) {
          continue;
        }
        let added: Vec<String> = match rule.production.get(ix + 1) {
          None => match follow.get(&rule.result) {
            Some(set) => set.iter().cloned().collect(),
            None => Vec::new(),
          },
          Some(next) if is_nonterminal(next) => match first.get(next) {
            Some(set) => set.iter().cloned().collect(),
            None => Vec::new(),
          },
          Some(next) => vec![next.clone()],
        };
        // undeclared non-terminals have no follow entry and are skipped
        if let Some(set) = follow.get_mut(symbol) {
          for term in added {
            changed |= set.insert(term);
          }
        }
      }
    }
    if !changed {
      break;
    }
  }

  follow
}
