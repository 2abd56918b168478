/// Something with its own identifier.
///
/// Ledger entries are entities even though they never change after
/// construction.
pub trait Entity {
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    fn id(&self) -> &Self::Id;
}
