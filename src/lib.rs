pub mod analysis;
pub mod grammar;
mod bnf;

pub use analysis::{Event, EventSink, Item, LogSink, NopSink, State};
pub use bnf::ParseError;
pub use grammar::{Grammar, Rule};

/// Reads a textual grammar and computes its first/follow sets and LR(0)
/// states.
pub fn build(text: &str) -> Result<Grammar, ParseError> {
  bnf::parse(text, &mut NopSink)
}

/// Same as [`build`], streaming construction events into `sink`.
pub fn build_with_sink(
  text: &str,
  sink: &mut dyn EventSink,
) -> Result<Grammar, ParseError> {
  bnf::parse(text, sink)
}
