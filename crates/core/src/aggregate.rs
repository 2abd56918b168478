//! Aggregate traits and the version precondition used by conditioned writes.

/// Identity and persisted version of a consistency boundary.
pub trait AggregateRoot {
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    fn id(&self) -> &Self::Id;

    /// Starts at 1 on creation and moves forward by one per persisted change.
    /// Stores condition their writes on it.
    fn version(&self) -> u64;
}

/// Precondition attached to a store write.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ExpectedVersion {
    /// Unconditional write (repair tooling, migrations).
    Any,
    /// The stored copy must be at exactly this version.
    Exact(u64),
}

impl ExpectedVersion {
    pub fn matches(self, actual: u64) -> bool {
        match self {
            ExpectedVersion::Any => true,
            ExpectedVersion::Exact(v) => v == actual,
        }
    }
}

/// Decide/evolve split for an aggregate.
///
/// `handle` inspects state and returns the facts a command produces without
/// touching `self`; `apply` folds one fact into state. Neither performs IO.
pub trait Aggregate: AggregateRoot {
    type Command: Clone + core::fmt::Debug;
    type Event: Clone + core::fmt::Debug;
    type Error: core::fmt::Debug;

    /// Advances `version()` by one.
    fn apply(&mut self, event: &Self::Event);

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error>;
}
