use core::{f64::consts::PI, fmt};

use pitchfork_core::{
    cogs::{EpochModel, Rng, TreeOperator},
    tree::Tree,
};

fn standard_normal_log_density(x: f64) -> f64 {
    -0.5_f64 * x * x - 0.5_f64 * (2.0_f64 * PI).ln()
}

/// Keeps an [`EpochModel`] dimensionally consistent under a tree move that
/// may change the number of coalescent events.
///
/// Newly activated log population size differences are drawn from a
/// standard normal and deactivated ones are marginalised, with their
/// densities folded into the Hastings ratio. Moves that preserve the event
/// count, rejected moves and operators without an epoch model pass through
/// unchanged.
pub struct EpochAdjusted<'e, O: TreeOperator, E: EpochModel> {
    operator: O,
    epochs: Option<&'e mut E>,
}

impl<'e, O: TreeOperator, E: EpochModel> EpochAdjusted<'e, O, E> {
    #[must_use]
    pub fn new(operator: O, epochs: Option<&'e mut E>) -> Self {
        Self { operator, epochs }
    }

    #[must_use]
    pub fn into_inner(self) -> O {
        self.operator
    }
}

impl<'e, O: TreeOperator, E: EpochModel> fmt::Debug for EpochAdjusted<'e, O, E> {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt.debug_struct(stringify!(EpochAdjusted))
            .field("operator", &self.operator)
            .field("epochs", &self.epochs.is_some())
            .finish()
    }
}

impl<'e, O: TreeOperator, E: EpochModel> TreeOperator for EpochAdjusted<'e, O, E> {
    fn propose<G: Rng>(&mut self, tree: &mut Tree, rng: &mut G) -> f64 {
        let epochs = match self.epochs.as_deref_mut() {
            Some(epochs) if !self.operator.preserves_event_count() => epochs,
            _ => return self.operator.propose(tree, rng),
        };

        let initial_epochs = epochs.epoch_count(tree);

        let mut log_hastings_ratio = self.operator.propose(tree, rng);

        if log_hastings_ratio == f64::NEG_INFINITY {
            return log_hastings_ratio;
        }

        let final_epochs = epochs.epoch_count(tree);

        for epoch in initial_epochs..final_epochs {
            let delta = rng.sample_standard_normal();

            epochs.set_log_pop_size_delta(epoch - 1, delta);

            log_hastings_ratio -= standard_normal_log_density(delta);
        }

        for epoch in final_epochs..initial_epochs {
            log_hastings_ratio += standard_normal_log_density(epochs.log_pop_size_delta(epoch - 1));
        }

        if initial_epochs != final_epochs {
            trace!("Epoch count changed from {initial_epochs} to {final_epochs}.");
        }

        log_hastings_ratio
    }

    fn preserves_event_count(&self) -> bool {
        self.operator.preserves_event_count()
    }
}
