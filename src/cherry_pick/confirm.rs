//! Explicit user confirmation for cherry-pick materialization

/// Record that a human (or a caller acting for one) approved cherry-picking
/// one PR onto a set of target branches
///
/// The materializer refuses any (PR, target) pair this does not cover.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation {
    pr_number: u64,
    targets: Vec<String>,
}

impl Confirmation {
    /// Confirm `pr_number` for each branch in `targets`
    pub fn granted<I, S>(pr_number: u64, targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut granted = Vec::new();
        for target in targets {
            let target = target.into();
            if !granted.contains(&target) {
                granted.push(target);
            }
        }
        Self {
            pr_number,
            targets: granted,
        }
    }

    /// Whether the pair was confirmed
    pub fn covers(&self, pr_number: u64, target: &str) -> bool {
        self.pr_number == pr_number && self.targets.iter().any(|t| t == target)
    }

    /// Confirmed PR number
    pub const fn pr_number(&self) -> u64 {
        self.pr_number
    }

    /// Confirmed target branches, in the order they were granted
    pub fn targets(&self) -> impl Iterator<Item = &str> {
        self.targets.iter().map(String::as_str)
    }

    /// True when no target was confirmed
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}
