/// Running mean and sample standard deviation over a sequence of batch
/// values, accumulated by sums so a snapshot can be taken after any batch.
#[derive(Debug, Clone, Default)]
pub struct RunningStat {
    n: usize,
    sum: f64,
    sum_sq: f64,
}

impl RunningStat {
    pub fn new() -> Self {
        RunningStat::default()
    }

    pub fn push(&mut self, value: f64) {
        self.n += 1;
        self.sum += value;
        self.sum_sq += value * value;
    }

    pub fn count(&self) -> usize {
        self.n
    }

    pub fn mean(&self) -> f64 {
        if self.n == 0 {
            0.0
        } else {
            self.sum / self.n as f64
        }
    }

    /// Sample standard deviation of the batch values. Zero until two
    /// values have been pushed.
    pub fn std_dev(&self) -> f64 {
        if self.n < 2 {
            return 0.0;
        }
        let n = self.n as f64;
        let variance = (self.sum_sq - self.sum * self.sum / n) / (n - 1.0);
        variance.max(0.0).sqrt()
    }

    /// Standard deviation of the mean.
    pub fn std_err(&self) -> f64 {
        if self.n < 2 {
            0.0
        } else {
            self.std_dev() / (self.n as f64).sqrt()
        }
    }
}
