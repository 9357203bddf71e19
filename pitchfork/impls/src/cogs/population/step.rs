/// Piecewise constant population size with precomputed intensities at the
/// epoch start times.
#[derive(Clone, Debug, PartialEq)]
pub(super) struct StepFunction {
    start_times: Vec<f64>,
    start_intensities: Vec<f64>,
    sizes: Vec<f64>,
}

impl StepFunction {
    #[debug_requires(!sizes.is_empty(), "at least one epoch")]
    #[debug_requires(start_times.len() == sizes.len(), "one start time per epoch")]
    #[debug_requires(start_times[0] == 0.0, "the first epoch starts at the present")]
    pub fn new(start_times: Vec<f64>, sizes: Vec<f64>) -> Self {
        let mut start_intensities = Vec::with_capacity(sizes.len());
        start_intensities.push(0.0_f64);

        for i in 1..sizes.len() {
            start_intensities
                .push(start_intensities[i - 1] + (start_times[i] - start_times[i - 1]) / sizes[i - 1]);
        }

        Self {
            start_times,
            start_intensities,
            sizes,
        }
    }

    pub fn epoch_count(&self) -> usize {
        self.sizes.len()
    }

    pub fn start_times(&self) -> &[f64] {
        &self.start_times
    }

    pub fn sizes(&self) -> &[f64] {
        &self.sizes
    }

    pub fn epoch_at(&self, t: f64) -> usize {
        self.start_times
            .partition_point(|start| *start <= t)
            .saturating_sub(1)
    }

    pub fn pop_size(&self, t: f64) -> f64 {
        self.sizes[self.epoch_at(t)]
    }

    pub fn intensity(&self, t: f64) -> f64 {
        if t <= 0.0 {
            return t / self.sizes[0];
        }

        let epoch = self.epoch_at(t);

        self.start_intensities[epoch] + (t - self.start_times[epoch]) / self.sizes[epoch]
    }

    pub fn inverse_intensity(&self, x: f64) -> f64 {
        if x <= 0.0 {
            return x * self.sizes[0];
        }

        let epoch = self
            .start_intensities
            .partition_point(|start| *start <= x)
            .saturating_sub(1);

        self.start_times[epoch] + (x - self.start_intensities[epoch]) * self.sizes[epoch]
    }
}
