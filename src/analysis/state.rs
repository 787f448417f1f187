use std::fmt::{self, Display, Formatter};
use indexmap::IndexSet;
use crate::grammar::{is_nonterminal, Rule};
use super::{Event, EventSink};

/// A production rule with a cursor marking how much has been recognized.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Item {
  result: String,
  production: Vec<String>,
  cursor: usize,
}

impl Item {
  /// Instantiates `rule` with the cursor `cursor` symbols in.
  pub fn new(rule: &Rule, cursor: usize) -> Item {
    debug_assert!(cursor <= rule.production.len());
    Item {
      result: rule.result.clone(),
      production: rule.production.clone(),
      cursor,
    }
  }

  /// The symbol at the cursor, `None` once the item is complete.
  pub fn cursor_symbol(&self) -> Option<&str> {
    self.production.get(self.cursor).map(String::as_str)
  }

  pub fn is_complete(&self) -> bool {
    self.cursor == self.production.len()
  }

  fn advanced(&self) -> Item {
    Item {
      result: self.result.clone(),
      production: self.production.clone(),
      cursor: self.cursor + 1,
    }
  }
}

impl Display for Item {
  fn fmt(&self, f: &mut Formatter) -> fmt::Result {
    write!(
      f,
      "{} : {} • {}",
      self.result,
      self.production[..self.cursor].join(" "),
      self.production[self.cursor..].join(" "),
    )
  }
}

/// One node of the LR(0) automaton: an unordered collection of items.
#[derive(Debug, Clone)]
pub struct State {
  number: u32,
  items: Vec<Item>,
}

impl State {
  pub(crate) fn new(number: u32, seeds: Vec<Item>) -> State {
    let mut state = State {
      number,
      items: Vec::new(),
    };
    for item in seeds {
      state.add(item);
    }
    state
  }

  pub fn number(&self) -> u32 {
    self.number
  }

  pub fn items(&self) -> &[Item] {
    &self.items
  }

  fn contains(&self, item: &Item) -> bool {
    self.items.iter().any(|i| i == item)
  }

  /// Returns whether the item was new.
  fn add(&mut self, item: Item) -> bool {
    if self.contains(&item) {
      return false;
    }
    self.items.push(item);
    true
  }
}

/// Set equality over the items; the state number and the order the items
/// were inserted in do not participate.
impl PartialEq for State {
  fn eq(&self, other: &State) -> bool {
    self.items.len() == other.items.len()
      && self.items.iter().all(|item| other.contains(item))
  }
}

impl Eq for State {}

impl Display for State {
  fn fmt(&self, f: &mut Formatter) -> fmt::Result {
    writeln!(f, "state {}", self.number)?;
    for item in &self.items {
      writeln!(f, "  {}", item)?;
    }
    Ok(())
  }
}

/// Expands `state` in place to its closure under `productions`.
///
/// A non-terminal is expanded at most once per call: the first time any
/// item's cursor reaches it, all of its rules are appended, so later
/// items need not re-trigger it.
pub(super) fn closure(
  state: &mut State,
  productions: &[Rule],
  sink: &mut dyn EventSink,
) {
  let mut expanded = IndexSet::new();

  loop {
    let mut changed = false;
    let mut ix = 0;
    while ix < state.items.len() {
      let nonterminal = match state.items[ix].cursor_symbol() {
        Some(symbol) if is_nonterminal(symbol) => symbol.to_owned(),
        _ => {
          ix += 1;
          continue;
        }
      };
      ix += 1;
      if !expanded.insert(nonterminal.clone()) {
        continue;
      }
      sink.event(Event::Expanding {
        nonterminal: nonterminal.clone(),
      });
      for rule in productions.iter().filter(|rule| rule.result == nonterminal) {
        changed |= state.add(Item::new(rule, 0));
      }
    }
    if !changed {
      break;
    }
  }
}

/// Shifts `state` over `symbol`: advances every item whose cursor sits on
/// `symbol`, wraps the results in a state numbered `number`, and closes
/// it. Completed items have no cursor symbol and never transition.
pub(super) fn goto(
  state: &State,
  symbol: &str,
  number: u32,
  productions: &[Rule],
  sink: &mut dyn EventSink,
) -> State {
  let items = state
    .items
    .iter()
    .filter(|item| item.cursor_symbol() == Some(symbol))
    .map(Item::advanced)
    .collect();
  let mut next = State::new(number, items);
  closure(&mut next, productions, sink);
  next
}

/// Builds the canonical collection of LR(0) states.
///
/// The states vector doubles as the worklist: states are processed in
/// admission order, and every goto result is either deduplicated against
/// an existing state or appended with the next sequential number.
pub(crate) fn gen_states(
  productions: &[Rule],
  start_symbol: &str,
  sink: &mut dyn EventSink,
) -> Vec<State> {
  let seeds = productions
    .iter()
    .filter(|rule| rule.result == start_symbol)
    .map(|rule| Item::new(rule, 0))
    .collect();
  let mut initial = State::new(0, seeds);
  closure(&mut initial, productions, sink);
  sink.event(Event::NewState { number: 0 });

  let mut states = vec![initial];
  let mut processed = 0;
  while processed < states.len() {
    let symbols = states[processed]
      .items
      .iter()
      .filter_map(|item| item.cursor_symbol().map(str::to_owned))
      .collect::<IndexSet<_>>();

    for symbol in &symbols {
      let from = states[processed].number;
      let next = goto(&states[processed], symbol, states.len() as u32,
        productions, sink);
      let to = match states.iter().position(|state| *state == next) {
        Some(existing) => states[existing].number,
        None => {
          let number = next.number;
          sink.event(Event::NewState { number });
          states.push(next);
          number
        }
      };
      sink.event(Event::Transition {
        from,
        symbol: symbol.clone(),
        to,
      });
    }
    processed += 1;
  }

  states
}
