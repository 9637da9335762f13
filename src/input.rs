//! Parsers for the whitespace-separated problem inputs.
//!
//! Knapsack:
//! ```text
//! N W
//! w_1 v_1
//! ...
//! w_N v_N
//! ```
//!
//! Two-option assignment:
//! ```text
//! n
//! a_1 b_1
//! ...
//! a_n b_n
//! ```
//!
//! Line breaks are not significant; tokens are read in order. Trailing pairs
//! beyond the announced count are reported as a count mismatch.

use std::io::Read;
use std::str::{FromStr, SplitWhitespace};

use crate::error::InputError;
use crate::problems::{KnapsackItem, TwoOptionTask};

/// A parsed knapsack input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnapsackInput {
    pub capacity: u64,
    pub items: Vec<KnapsackItem>,
}

struct Tokens<'a> {
    inner: SplitWhitespace<'a>,
}

impl<'a> Tokens<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            inner: source.split_whitespace(),
        }
    }

    fn next<T: FromStr>(&mut self, expected: &'static str) -> Result<T, InputError> {
        let token = self.inner.next().ok_or(InputError::MissingToken(expected))?;
        token.parse().map_err(|_| InputError::InvalidToken {
            token: token.to_owned(),
            expected,
        })
    }

    fn is_empty(&self) -> bool {
        self.inner.clone().next().is_none()
    }

    /// Reads pairs until the input runs out.
    fn pairs(
        &mut self,
        first: &'static str,
        second: &'static str,
    ) -> Result<Vec<(u32, u32)>, InputError> {
        let mut pairs = Vec::new();
        while !self.is_empty() {
            let a = self.next(first)?;
            let b = self.next(second)?;
            pairs.push((a, b));
        }
        Ok(pairs)
    }
}

fn read_all(mut source: impl Read) -> Result<String, InputError> {
    let mut text = String::new();
    source.read_to_string(&mut text)?;
    Ok(text)
}

fn check_count(expected: usize, parsed: usize) -> Result<(), InputError> {
    if expected == parsed {
        Ok(())
    } else {
        Err(InputError::CountMismatch { expected, parsed })
    }
}

/// Parses `N W` followed by `N` lines of `weight value`.
pub fn parse_knapsack(source: impl Read) -> Result<KnapsackInput, InputError> {
    let text = read_all(source)?;
    let mut tokens = Tokens::new(&text);

    let count: usize = tokens.next("item count")?;
    let capacity: u64 = tokens.next("capacity")?;
    let items: Vec<KnapsackItem> = tokens
        .pairs("weight", "value")?
        .into_iter()
        .map(|(w, v)| KnapsackItem::new(w, v))
        .collect();
    check_count(count, items.len())?;

    Ok(KnapsackInput { capacity, items })
}

/// Parses `n` followed by `n` lines of `a b`.
pub fn parse_two_option(source: impl Read) -> Result<Vec<TwoOptionTask>, InputError> {
    let text = read_all(source)?;
    let mut tokens = Tokens::new(&text);

    let count: usize = tokens.next("task count")?;
    let tasks: Vec<TwoOptionTask> = tokens
        .pairs("option A time", "option B time")?
        .into_iter()
        .map(|(a, b)| TwoOptionTask::new(a, b))
        .collect();
    check_count(count, tasks.len())?;

    Ok(tasks)
}
