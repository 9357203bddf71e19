use pitchfork_core::tree::Tree;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum IntervalType {
    Sample,
    Coalescent,
}

/// Sequence of positive-duration intervals of constant lineage count,
/// obtained by scanning the node heights of a tree from the present
/// backwards and merging zero-length gaps, so that a multifurcation appears
/// as a single coalescent event of higher multiplicity.
#[derive(Clone, Debug, PartialEq)]
pub struct IntervalSequence {
    durations: Vec<f64>,
    // one more entry than durations, the final count is the lineage above
    // the root
    lineage_counts: Vec<usize>,
    sample_count: usize,
}

impl IntervalSequence {
    #[must_use]
    pub fn from_tree(tree: &Tree) -> Self {
        let mut heights = tree
            .nodes()
            .map(|node| (tree.height(node), tree.is_leaf(node)))
            .collect::<Vec<_>>();
        heights.sort_by(|(a, _), (b, _)| a.total_cmp(b));

        let mut durations = Vec::new();
        let mut lineage_counts = Vec::new();
        let mut sample_count = 0_usize;

        let mut lineages = 0_usize;
        let mut previous_height = 0.0_f64;

        for (i, (height, is_leaf)) in heights.into_iter().enumerate() {
            if i > 0 {
                let duration = height - previous_height;

                if duration > 0.0 {
                    lineage_counts.push(lineages);
                    durations.push(duration);
                    previous_height = height;
                }
            }

            if is_leaf {
                lineages += 1;
                sample_count += 1;
            } else {
                lineages = lineages.saturating_sub(1);
            }
        }

        lineage_counts.push(1);

        Self {
            durations,
            lineage_counts,
            sample_count,
        }
    }

    #[must_use]
    pub fn interval_count(&self) -> usize {
        self.durations.len()
    }

    #[must_use]
    pub fn sample_count(&self) -> usize {
        self.sample_count
    }

    #[must_use]
    #[debug_requires(i < self.interval_count(), "interval exists")]
    pub fn interval(&self, i: usize) -> f64 {
        self.durations[i]
    }

    /// Number of lineages during interval `i`, where `i == interval_count()`
    /// refers to the single lineage above the root.
    #[must_use]
    #[debug_requires(i <= self.interval_count(), "interval exists")]
    pub fn lineage_count(&self, i: usize) -> usize {
        self.lineage_counts[i]
    }

    #[must_use]
    #[debug_requires(i < self.interval_count(), "interval exists")]
    pub fn interval_type(&self, i: usize) -> IntervalType {
        if self.lineage_counts[i + 1] > self.lineage_counts[i] {
            IntervalType::Sample
        } else {
            IntervalType::Coalescent
        }
    }

    /// Number of lineages lost at the end of interval `i`, i.e. one less than
    /// the degree of the multifurcation.
    #[must_use]
    #[debug_requires(i < self.interval_count(), "interval exists")]
    pub fn coalescent_events(&self, i: usize) -> usize {
        self.lineage_counts[i].saturating_sub(self.lineage_counts[i + 1])
    }

    #[must_use]
    pub fn total_coalescent_events(&self) -> usize {
        (0..self.interval_count())
            .map(|i| self.coalescent_events(i))
            .sum()
    }

    #[must_use]
    pub fn total_duration(&self) -> f64 {
        self.durations.iter().sum()
    }

    #[must_use]
    pub fn is_coalescent_only(&self) -> bool {
        self.sample_count == 0
    }
}

/// Lazily recomputed [`IntervalSequence`] of a single tree, memoised by the
/// tree's generation.
#[allow(clippy::module_name_repetitions)]
#[derive(Clone, Debug, Default)]
pub struct CollapsedTreeIntervals {
    cached: Option<(u64, IntervalSequence)>,
    leaf_count: usize,
    recomputations: usize,
}

impl CollapsedTreeIntervals {
    #[must_use]
    pub fn new(tree: &Tree) -> Self {
        Self {
            cached: None,
            leaf_count: tree.leaf_count(),
            recomputations: 0,
        }
    }

    /// Maximum number of extant lineages.
    #[must_use]
    pub fn leaf_count(&self) -> usize {
        self.leaf_count
    }

    /// Number of times the intervals have been recomputed.
    #[must_use]
    pub fn recomputations(&self) -> usize {
        self.recomputations
    }

    pub fn get(&mut self, tree: &Tree) -> &IntervalSequence {
        let generation = tree.generation();

        if matches!(&self.cached, Some((cached, _)) if *cached != generation) {
            self.cached = None;
        }

        let recomputations = &mut self.recomputations;

        let (_, intervals) = self.cached.get_or_insert_with(|| {
            trace!("Recomputing collapsed tree intervals at generation {generation}.");

            *recomputations += 1;

            (generation, IntervalSequence::from_tree(tree))
        });

        intervals
    }
}

#[cfg(test)]
mod tests;
