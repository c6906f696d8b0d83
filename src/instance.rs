//! Partitioning instances and their text format.
//!
//! An instance is a multiset of non-negative integer weights together with
//! the number of groups they must be split into. The text format is a
//! whitespace-separated stream of integers:
//!
//! ```text
//! N M w_1 w_2 ... w_N
//! ```
//!
//! Weights are stored sorted in descending order. The order is part of the
//! contract: seeding and move selection index into it, so two runs with the
//! same seed see the same items at the same positions.

use std::fmt;
use std::io::Read;

/// Errors raised while building or reading an [`Instance`].
#[derive(Debug)]
pub enum InstanceError {
    /// The group count is zero.
    NoGroups,
    /// Fewer items than groups; some group would stay empty forever.
    TooFewItems { items: usize, groups: usize },
    /// A token could not be read as a non-negative integer.
    InvalidToken { position: usize, token: String },
    /// The stream ended before the header or all weights were read.
    Truncated { expected: usize, found: usize },
    /// Extra tokens follow the last weight.
    TrailingInput { token: String },
    /// The weights add up to more than `u64::MAX`.
    WeightOverflow,
    /// The underlying reader failed.
    Io(std::io::Error),
}

impl fmt::Display for InstanceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InstanceError::NoGroups => write!(f, "group count must be at least 1"),
            InstanceError::TooFewItems { items, groups } => write!(
                f,
                "item count ({items}) must be at least the group count ({groups})"
            ),
            InstanceError::InvalidToken { position, token } => write!(
                f,
                "token #{position} ({token:?}) is not a non-negative integer"
            ),
            InstanceError::Truncated { expected, found } => write!(
                f,
                "input ended early: expected {expected} integers, found {found}"
            ),
            InstanceError::TrailingInput { token } => {
                write!(f, "unexpected trailing input starting at {token:?}")
            }
            InstanceError::WeightOverflow => {
                write!(f, "total weight does not fit in a 64-bit integer")
            }
            InstanceError::Io(err) => write!(f, "failed to read instance: {err}"),
        }
    }
}

impl std::error::Error for InstanceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            InstanceError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for InstanceError {
    fn from(err: std::io::Error) -> Self {
        InstanceError::Io(err)
    }
}

/// A validated partitioning instance.
///
/// # Examples
///
/// ```
/// use u_numpart::Instance;
///
/// let instance = Instance::parse("4 2  1 2 3 4").unwrap();
/// assert_eq!(instance.items(), &[4, 3, 2, 1]);
/// assert_eq!(instance.group_count(), 2);
/// assert_eq!(instance.total_weight(), 10);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Instance {
    items: Vec<u64>,
    group_count: usize,
}

impl Instance {
    /// Builds an instance, sorting the weights in descending order.
    ///
    /// The total weight must fit in a `u64`; every group sum is bounded by
    /// it, so running sums never overflow afterwards.
    pub fn new(group_count: usize, mut weights: Vec<u64>) -> Result<Self, InstanceError> {
        if group_count == 0 {
            return Err(InstanceError::NoGroups);
        }
        if weights.len() < group_count {
            return Err(InstanceError::TooFewItems {
                items: weights.len(),
                groups: group_count,
            });
        }
        weights
            .iter()
            .try_fold(0u64, |acc, &w| acc.checked_add(w))
            .ok_or(InstanceError::WeightOverflow)?;
        weights.sort_by(|a, b| b.cmp(a));
        Ok(Self {
            items: weights,
            group_count,
        })
    }

    /// Parses `N M w_1 ... w_N` from a string.
    pub fn parse(text: &str) -> Result<Self, InstanceError> {
        let mut tokens = text.split_whitespace();
        let mut position = 0usize;

        let mut next_int = |expected: usize| -> Result<u64, InstanceError> {
            let token = tokens.next().ok_or(InstanceError::Truncated {
                expected,
                found: position,
            })?;
            position += 1;
            token.parse::<u64>().map_err(|_| InstanceError::InvalidToken {
                position,
                token: token.to_string(),
            })
        };

        // The header length is unknown until both counts are read.
        let item_count = next_int(2)? as usize;
        let group_count = next_int(2)? as usize;
        let expected = item_count.saturating_add(2);

        let weights = (0..item_count)
            .map(|_| next_int(expected))
            .collect::<Result<Vec<_>, _>>()?;

        if let Some(token) = text.split_whitespace().nth(expected) {
            return Err(InstanceError::TrailingInput {
                token: token.to_string(),
            });
        }

        Self::new(group_count, weights)
    }

    /// Reads the whole stream and parses it.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self, InstanceError> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        Self::parse(&text)
    }

    /// Item weights, largest first.
    pub fn items(&self) -> &[u64] {
        &self.items
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn group_count(&self) -> usize {
        self.group_count
    }

    /// Sum of all weights. Group sums always add up to this.
    pub fn total_weight(&self) -> u64 {
        self.items.iter().sum()
    }
}
