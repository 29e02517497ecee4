//! The turning rule of a turmite: a fixed sequence of `Turn` symbols indexed by cell state.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::types::{Heading, Turn, TurmiteError, MAX_RULE_LENGTH};

/// An immutable sequence of `K` turn symbols.
///
/// A cell in state `s` makes the ant turn according to symbol `s mod K`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rule {
    symbols: Vec<Turn>,
}

impl Rule {
    /// Creates a rule from explicit symbols.
    ///
    /// # Returns
    ///
    /// * `Err(TurmiteError::EmptyRule)` if `symbols` is empty.
    /// * `Err(TurmiteError::RuleTooLong)` if there are more than `MAX_RULE_LENGTH` symbols.
    pub fn new(symbols: Vec<Turn>) -> Result<Self, TurmiteError> {
        if symbols.is_empty() {
            return Err(TurmiteError::EmptyRule);
        }
        if symbols.len() > MAX_RULE_LENGTH {
            return Err(TurmiteError::RuleTooLong(symbols.len()));
        }

        Ok(Self { symbols })
    }

    /// Parses a rule string. `'R'` turns right, any other character turns left.
    pub fn parse(input: &str) -> Result<Self, TurmiteError> {
        Self::new(input.chars().map(Turn::from_char).collect())
    }

    /// Returns the number of symbols (`K`), which is also the number of cell states.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Always `false`; a rule has at least one symbol.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn symbols(&self) -> &[Turn] {
        &self.symbols
    }

    /// Returns the symbol governing a cell in `state`, normalised modulo `K`.
    pub fn symbol(&self, state: usize) -> Turn {
        self.symbols[state % self.symbols.len()]
    }

    /// Computes the heading after leaving a cell in `state`.
    pub fn turn(&self, state: usize, heading: Heading) -> Heading {
        heading.turn(self.symbol(state))
    }

    /// Returns the state a cell takes after being left in `state`.
    pub fn next_state(&self, state: usize) -> usize {
        (state + 1) % self.symbols.len()
    }
}

impl FromStr for Rule {
    type Err = TurmiteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Rule {
    type Error = TurmiteError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Rule> for String {
    fn from(rule: Rule) -> Self {
        rule.to_string()
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for symbol in &self.symbols {
            write!(f, "{symbol}")?;
        }
        Ok(())
    }
}
