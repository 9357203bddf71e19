use crate::{cogs::Rng, tree::Tree};

/// Randomised tree proposal of a Metropolis-Hastings kernel.
#[allow(clippy::module_name_repetitions)]
pub trait TreeOperator: core::fmt::Debug {
    /// Mutates `tree` and returns the log Hastings ratio of the move, or
    /// `f64::NEG_INFINITY` if the proposal is rejected outright. A rejected
    /// proposal may leave `tree` partially modified, so callers should
    /// [`Tree::checkpoint`] beforehand and [`Tree::rollback`] afterwards.
    fn propose<G: Rng>(&mut self, tree: &mut Tree, rng: &mut G) -> f64;

    /// Whether the move never changes the number of coalescent events.
    #[must_use]
    fn preserves_event_count(&self) -> bool;
}
