//! Human-readable view of a partition.

use crate::anneal::{spread, AnnealResult};
use std::fmt;

/// One group of a partition.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Group {
    /// Member weights, largest first.
    pub members: Vec<u64>,
    pub sum: u64,
}

/// Items grouped by their assigned group.
///
/// # Examples
///
/// ```
/// use u_numpart::Partition;
///
/// let partition = Partition::from_assignment(&[4, 3, 2, 1], &[0, 1, 1, 0], 2);
/// assert_eq!(partition.groups[0].members, vec![4, 1]);
/// assert_eq!(partition.groups[1].sum, 5);
/// assert_eq!(partition.energy(), 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Partition {
    pub groups: Vec<Group>,
}

impl Partition {
    /// Buckets `items` by `assignment` in one pass.
    ///
    /// # Panics
    ///
    /// Panics if the slices differ in length or a group index is out of range.
    pub fn from_assignment(items: &[u64], assignment: &[usize], group_count: usize) -> Self {
        assert_eq!(
            items.len(),
            assignment.len(),
            "assignment length must match item count"
        );
        let mut groups = vec![
            Group {
                members: Vec::new(),
                sum: 0,
            };
            group_count
        ];
        for (&weight, &g) in items.iter().zip(assignment) {
            groups[g].members.push(weight);
            groups[g].sum += weight;
        }
        Self { groups }
    }

    /// The best partition of a finished run.
    pub fn from_result(result: &AnnealResult) -> Self {
        Self::from_assignment(&result.items, &result.best_assignment, result.group_count)
    }

    pub fn sums(&self) -> Vec<u64> {
        self.groups.iter().map(|g| g.sum).collect()
    }

    /// Spread of the group sums.
    pub fn energy(&self) -> u64 {
        spread(&self.sums())
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Energy: {}", self.energy())?;
        for (i, group) in self.groups.iter().enumerate() {
            write!(f, "Group {i}:")?;
            for w in &group.members {
                write!(f, " {w}")?;
            }
            writeln!(f, " [sum {}]", group.sum)?;
        }
        Ok(())
    }
}
