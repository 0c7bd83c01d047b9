//! One-dimensional isolation forest
//!
//! Scores follow the usual isolation forest convention: `score_samples` is
//! the negated anomaly score `-2^(-E[h(x)] / c(psi))`, so lower means more
//! anomalous. A fitted forest also carries an `offset`, the contamination
//! percentile of the training scores; a value is an outlier when its score
//! falls below the offset.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Euler-Mascheroni constant, used to approximate harmonic numbers
const EULER_GAMMA: f64 = 0.577_215_664_9;

/// Forest hyperparameters
#[derive(Debug, Clone)]
pub struct IsolationForest {
    pub n_trees: usize,
    /// Upper bound on the per-tree subsample size
    pub max_samples: usize,
    /// Expected share of outliers in the training data, in (0, 0.5]
    pub contamination: f64,
    pub seed: u64,
}

impl Default for IsolationForest {
    fn default() -> Self {
        Self {
            n_trees: 100,
            max_samples: 256,
            contamination: 0.1,
            seed: 42,
        }
    }
}

#[derive(Debug, Clone)]
enum Node {
    Split {
        value: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
    Leaf {
        size: usize,
    },
}

impl Node {
    fn build(samples: &[f64], depth: usize, max_depth: usize, rng: &mut StdRng) -> Self {
        if samples.len() <= 1 || depth >= max_depth {
            return Node::Leaf { size: samples.len() };
        }

        let min = samples.iter().copied().fold(f64::INFINITY, f64::min);
        let max = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if min >= max {
            return Node::Leaf { size: samples.len() };
        }

        let value = rng.gen_range(min..max);
        let (left, right): (Vec<f64>, Vec<f64>) = samples.iter().partition(|&&x| x < value);

        Node::Split {
            value,
            left: Box::new(Node::build(&left, depth + 1, max_depth, rng)),
            right: Box::new(Node::build(&right, depth + 1, max_depth, rng)),
        }
    }

    fn path_length(&self, x: f64) -> f64 {
        let mut node = self;
        let mut depth = 0usize;
        loop {
            match node {
                Node::Leaf { size } => return depth as f64 + average_path_length(*size),
                Node::Split { value, left, right } => {
                    node = if x < *value { left } else { right };
                    depth += 1;
                }
            }
        }
    }
}

/// Average path length of an unsuccessful BST search over `n` points
pub(crate) fn average_path_length(n: usize) -> f64 {
    match n {
        0 | 1 => 0.0,
        2 => 1.0,
        _ => {
            let n = n as f64;
            2.0 * ((n - 1.0).ln() + EULER_GAMMA) - 2.0 * (n - 1.0) / n
        }
    }
}

/// Percentile with linear interpolation between closest ranks
pub fn percentile(values: &[f64], pct: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let rank = (pct / 100.0).clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (rank - lo as f64)
}

impl IsolationForest {
    pub fn new(n_trees: usize, max_samples: usize, contamination: f64, seed: u64) -> Self {
        Self {
            n_trees,
            max_samples,
            contamination,
            seed,
        }
    }

    /// Fit a forest on `data`.
    ///
    /// Each call seeds its own generator, so fitting the same data twice
    /// gives identical forests.
    pub fn fit(&self, data: &[f64]) -> FittedIsolationForest {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let psi = self.max_samples.min(data.len()).max(1);
        let max_depth = (psi.max(2) as f64).log2().ceil() as usize;

        let trees: Vec<Node> = if data.is_empty() {
            Vec::new()
        } else {
            (0..self.n_trees)
                .map(|_| {
                    let sample: Vec<f64> =
                        data.choose_multiple(&mut rng, psi).copied().collect();
                    Node::build(&sample, 0, max_depth, &mut rng)
                })
                .collect()
        };

        let mut fitted = FittedIsolationForest {
            trees,
            normalizer: average_path_length(psi),
            offset: 0.0,
        };

        let scores = fitted.score_samples(data);
        fitted.offset = percentile(&scores, 100.0 * self.contamination);
        fitted
    }
}

/// A forest fitted on one data set
#[derive(Debug, Clone)]
pub struct FittedIsolationForest {
    trees: Vec<Node>,
    normalizer: f64,
    offset: f64,
}

impl FittedIsolationForest {
    /// Negated anomaly score for one value, in [-1, 0)
    pub fn score(&self, x: f64) -> f64 {
        if self.trees.is_empty() {
            return -1.0;
        }
        let mean_path =
            self.trees.iter().map(|t| t.path_length(x)).sum::<f64>() / self.trees.len() as f64;
        let exponent = if self.normalizer > 0.0 {
            -mean_path / self.normalizer
        } else {
            0.0
        };
        -(2f64.powf(exponent))
    }

    pub fn score_samples(&self, data: &[f64]) -> Vec<f64> {
        data.iter().map(|&x| self.score(x)).collect()
    }

    /// Contamination percentile of the training scores
    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Score shifted by the offset; negative means outlier
    pub fn decision_function(&self, x: f64) -> f64 {
        self.score(x) - self.offset
    }

    pub fn is_outlier(&self, x: f64) -> bool {
        self.decision_function(x) < 0.0
    }
}
