//! The (input, output) amount pair of an offer or a flow.

use std::fmt;

use crate::types::amount::Amount;
use crate::types::issue::Issue;

/// What an offer asks for and what it gives, or the two legs of a realized
/// flow. `input` is always denominated from the point of view of the party
/// placing the offer: the currency they receive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Amounts {
    /// Amount the offer wants to take in.
    pub input: Amount,
    /// Amount the offer pays out.
    pub output: Amount,
}

impl Amounts {
    pub fn new(input: Amount, output: Amount) -> Self {
        Amounts { input, output }
    }

    /// Both legs zeroed, preserving the issues.
    pub fn zeroed(&self) -> Self {
        Amounts {
            input: Amount::zero(self.input.issue()),
            output: Amount::zero(self.output.issue()),
        }
    }

    /// The pair of issues, input first.
    pub fn issues(&self) -> (Issue, Issue) {
        (self.input.issue(), self.output.issue())
    }

    /// True when either leg has been exhausted.
    pub fn is_empty(&self) -> bool {
        !self.input.is_positive() || !self.output.is_positive()
    }
}

impl fmt::Display for Amounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} for {} {}",
            self.input,
            self.input.issue(),
            self.output,
            self.output.issue()
        )
    }
}
