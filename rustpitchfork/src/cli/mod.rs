use anyhow::{Context, Result};

use pitchfork_core::tree::Tree;
use pitchfork_core_maths::IntrinsicsMathsCore;
use pitchfork_impls::{model::BetaCoalescentModel, stats::PolytomyStats};

use crate::args::Model;

pub mod check;
pub mod simulate;

type Maths = IntrinsicsMathsCore;

fn build_model(model: &Model, samples: usize) -> Result<BetaCoalescentModel<Maths>> {
    let max_lineages = model.max_lineages.unwrap_or(samples).max(2);

    BetaCoalescentModel::new(model.alpha, max_lineages).with_context(|| {
        format!(
            "Failed to set up the Beta-coalescent with alpha = {} and up to {} lineages.",
            model.alpha, max_lineages
        )
    })
}

fn report_tree(tree: &Tree, max_order: Option<usize>) {
    let stats = PolytomyStats::from_tree(tree, max_order);

    info!(
        "The simulated tree has {} leaves, {} coalescent events and root height {}.",
        tree.leaf_count(),
        tree.true_internal_node_count(),
        tree.root_height()
    );
    info!(
        "It contains {} multifurcations, nodes by order (2..={}): {:?}.",
        stats.polytomy_count(),
        stats.max_order(),
        stats.order_histogram()
    );
}
