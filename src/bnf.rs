use thiserror::Error;
use crate::analysis::EventSink;
use crate::grammar::{is_nonterminal, Grammar, Rule, SymbolSet};

/// Errors rejected by the textual grammar reader.
///
/// The reader is the only validating layer; the analysis core accepts
/// its structured output as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
  #[error("line {line}: expected `NONTERM : symbols...` or `| symbols...`, found `{found}`")]
  MalformedRule { line: usize, found: String },
  #[error("line {line}: alternative before the first rule")]
  DanglingAlternative { line: usize },
  #[error("grammar has no productions")]
  Empty,
}

/// Reads a line-oriented grammar.
///
/// `NONTERM : sym...` starts the rule list of a non-terminal (the first
/// one becomes the start symbol), `| sym...` adds an alternative for the
/// current one, and the symbol list may be empty. Blank lines are
/// skipped; anything else is rejected.
pub(crate) fn parse(
  text: &str,
  sink: &mut dyn EventSink,
) -> Result<Grammar, ParseError> {
  let mut terminals = SymbolSet::new();
  let mut nonterminals = SymbolSet::new();
  let mut productions: Vec<Rule> = Vec::new();
  let mut start_symbol: Option<String> = None;
  let mut current: Option<String> = None;

  for (ix, line) in text.lines().enumerate() {
    let tokens = line.split_whitespace().collect::<Vec<_>>();
    let (head, body) = match tokens.as_slice() {
      [] => continue,
      ["|", body @ ..] => match &current {
        Some(head) => (head.clone(), body),
        None => return Err(ParseError::DanglingAlternative { line: ix + 1 }),
      },
      [head, ":", body @ ..] if is_nonterminal(head) => {
        ((*head).to_owned(), body)
      }
      _ => {
        return Err(ParseError::MalformedRule {
          line: ix + 1,
          found: line.trim().to_owned(),
        });
      }
    };

    nonterminals.insert(head.clone());
    if start_symbol.is_none() {
      start_symbol = Some(head.clone());
    }
    for &symbol in body {
      if is_nonterminal(symbol) {
        nonterminals.insert(symbol.to_owned());
      } else {
        terminals.insert(symbol.to_owned());
      }
    }
    productions.push(Rule::new(
      head.clone(),
      body.iter().map(|s| (*s).to_owned()).collect(),
    ));
    current = Some(head);
  }

  let start_symbol = start_symbol.ok_or(ParseError::Empty)?;
  log::debug!("start symbol {}, {} terminals, {} non-terminals",
    start_symbol, terminals.len(), nonterminals.len());

  Ok(Grammar::with_sink(start_symbol, terminals, nonterminals, productions,
    sink))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::analysis::NopSink;
  use pretty_assertions::assert_eq;

  fn parse_text(text: &str) -> Grammar {
    parse(text, &mut NopSink).unwrap()
  }

  #[test]
  fn reads_rules_and_alternatives() {
    let grammar = parse_text("
      S : A B
      A : a
        | b c
      B : d
    ");

    assert_eq!(grammar.start_symbol(), "S");
    assert_eq!(grammar.productions().len(), 4);
    assert_eq!(
      grammar.productions()[2],
      Rule::new("A", vec!["b".to_owned(), "c".to_owned()]),
    );
  }

  #[test]
  fn classifies_symbols_by_case() {
    let grammar = parse_text("S : A plus A\nA : num");

    let nonterminals = grammar.nonterminals().iter()
      .map(String::as_str)
      .collect::<Vec<_>>();
    let terminals = grammar.terminals().iter()
      .map(String::as_str)
      .collect::<Vec<_>>();

    assert_eq!(nonterminals, ["S", "A"]);
    assert_eq!(terminals, ["plus", "num"]);
  }

  #[test]
  fn empty_body_is_accepted() {
    let grammar = parse_text("S : A\nA :");

    assert_eq!(grammar.productions()[1], Rule::new("A", vec![]));
  }

  #[test]
  fn builds_states_for_parsed_grammar() {
    let grammar = parse_text("
      S : A
      A : a A
        | a
    ");

    assert_eq!(grammar.states().len(), 4);
  }

  #[test]
  fn rejects_unrecognized_lines() {
    let err = parse("S : a\nwat", &mut NopSink).unwrap_err();

    assert_eq!(err, ParseError::MalformedRule {
      line: 2,
      found: "wat".to_owned(),
    });
  }

  #[test]
  fn rejects_alternative_before_any_rule() {
    let err = parse("| a", &mut NopSink).unwrap_err();

    assert_eq!(err, ParseError::DanglingAlternative { line: 1 });
  }

  #[test]
  fn rejects_empty_grammar() {
    let err = parse("\n   \n", &mut NopSink).unwrap_err();

    assert_eq!(err, ParseError::Empty);
  }
}
