//! Random forest: bagged CART trees for binary classification.
//!
//! Algorithm:
//! 1. Each tree fits on a bootstrap sample drawn with a seeded RNG.
//! 2. Each split considers `sqrt(n_features)` random candidate features and
//!    picks the threshold minimising weighted Gini impurity.
//! 3. Balanced class weights: `n / (2 * n_class)`.
//! 4. A leaf stores the weighted positive fraction; the forest averages leaves.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct ForestParams {
    pub n_trees: usize,
    pub max_depth: usize,
    pub min_samples_split: usize,
    pub balanced_class_weight: bool,
    pub seed: u64,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_trees: 100,
            max_depth: 10,
            min_samples_split: 10,
            balanced_class_weight: true,
            seed: 42,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ForestError {
    #[error("cannot fit on an empty dataset")]
    EmptyDataset,

    #[error("{rows} feature rows but {labels} labels")]
    LengthMismatch { rows: usize, labels: usize },

    #[error("expected {expected} features, got {got}")]
    FeatureCount { expected: usize, got: usize },
}

#[derive(Debug, Clone)]
enum Node {
    Leaf(f64),
    Split {
        feature: usize,
        threshold: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

impl Node {
    fn positive_probability(&self, row: &[f64]) -> f64 {
        match self {
            Node::Leaf(p) => *p,
            Node::Split {
                feature,
                threshold,
                left,
                right,
            } => {
                if row[*feature] <= *threshold {
                    left.positive_probability(row)
                } else {
                    right.positive_probability(row)
                }
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct RandomForest {
    trees: Vec<Node>,
    n_features: usize,
}

struct TreeBuilder<'a> {
    x: &'a [Vec<f64>],
    y: &'a [bool],
    /// Indexed by label: [negative, positive].
    class_weight: [f64; 2],
    max_depth: usize,
    min_samples_split: usize,
    max_features: usize,
}

fn gini(pos: f64, neg: f64) -> f64 {
    let total = pos + neg;
    if total <= 0.0 {
        return 0.0;
    }
    let p = pos / total;
    let n = neg / total;
    1.0 - p * p - n * n
}

impl TreeBuilder<'_> {
    fn weight(&self, i: usize) -> f64 {
        self.class_weight[self.y[i] as usize]
    }

    fn weighted_counts(&self, indices: &[usize]) -> (f64, f64) {
        indices.iter().fold((0.0, 0.0), |(pos, neg), &i| {
            if self.y[i] {
                (pos + self.weight(i), neg)
            } else {
                (pos, neg + self.weight(i))
            }
        })
    }

    fn build(&self, indices: &[usize], depth: usize, rng: &mut StdRng) -> Node {
        let (pos, neg) = self.weighted_counts(indices);
        let total = pos + neg;
        let leaf = Node::Leaf(if total > 0.0 { pos / total } else { 0.5 });

        if depth >= self.max_depth
            || indices.len() < self.min_samples_split
            || pos == 0.0
            || neg == 0.0
        {
            return leaf;
        }

        let n_features = self.x[0].len();
        let mut candidates: Vec<usize> = (0..n_features).collect();
        candidates.shuffle(rng);

        let mut best: Option<(usize, f64)> = None;
        let mut best_impurity = f64::INFINITY;

        // Keep drawing features past `max_features` until one yields a valid partition.
        for (examined, &feature) in candidates.iter().enumerate() {
            if examined >= self.max_features && best.is_some() {
                break;
            }

            let mut values: Vec<(f64, usize)> =
                indices.iter().map(|&i| (self.x[i][feature], i)).collect();
            values.sort_by(|a, b| a.0.total_cmp(&b.0));

            let (mut left_pos, mut left_neg) = (0.0, 0.0);
            for k in 0..values.len() - 1 {
                let (value, i) = values[k];
                if self.y[i] {
                    left_pos += self.weight(i);
                } else {
                    left_neg += self.weight(i);
                }

                let next = values[k + 1].0;
                if value == next {
                    continue;
                }

                let right_pos = pos - left_pos;
                let right_neg = neg - left_neg;
                let impurity = gini(left_pos, left_neg) * (left_pos + left_neg)
                    + gini(right_pos, right_neg) * (right_pos + right_neg);

                if impurity < best_impurity {
                    best_impurity = impurity;
                    best = Some((feature, (value + next) / 2.0));
                }
            }
        }

        let Some((feature, threshold)) = best else {
            return leaf;
        };

        let (left, right): (Vec<usize>, Vec<usize>) = indices
            .iter()
            .partition(|&&i| self.x[i][feature] <= threshold);

        Node::Split {
            feature,
            threshold,
            left: Box::new(self.build(&left, depth + 1, rng)),
            right: Box::new(self.build(&right, depth + 1, rng)),
        }
    }
}

impl RandomForest {
    pub fn fit(x: &[Vec<f64>], y: &[bool], params: &ForestParams) -> Result<Self, ForestError> {
        if x.is_empty() {
            return Err(ForestError::EmptyDataset);
        }
        if x.len() != y.len() {
            return Err(ForestError::LengthMismatch {
                rows: x.len(),
                labels: y.len(),
            });
        }
        let n_features = x[0].len();
        if let Some(bad) = x.iter().find(|row| row.len() != n_features) {
            return Err(ForestError::FeatureCount {
                expected: n_features,
                got: bad.len(),
            });
        }

        let n = y.len() as f64;
        let positives = y.iter().filter(|&&label| label).count() as f64;
        let negatives = n - positives;
        let class_weight = if params.balanced_class_weight {
            [
                if negatives > 0.0 { n / (2.0 * negatives) } else { 1.0 },
                if positives > 0.0 { n / (2.0 * positives) } else { 1.0 },
            ]
        } else {
            [1.0, 1.0]
        };

        let builder = TreeBuilder {
            x,
            y,
            class_weight,
            max_depth: params.max_depth,
            min_samples_split: params.min_samples_split.max(2),
            max_features: ((n_features as f64).sqrt() as usize).clamp(1, n_features.max(1)),
        };

        let mut rng = StdRng::seed_from_u64(params.seed);
        let trees = (0..params.n_trees)
            .map(|_| {
                let sample: Vec<usize> = (0..x.len()).map(|_| rng.gen_range(0..x.len())).collect();
                builder.build(&sample, 0, &mut rng)
            })
            .collect();

        Ok(Self { trees, n_features })
    }

    /// Mean positive-class probability across trees.
    pub fn predict_proba(&self, row: &[f64]) -> Result<f64, ForestError> {
        if row.len() != self.n_features {
            return Err(ForestError::FeatureCount {
                expected: self.n_features,
                got: row.len(),
            });
        }
        if self.trees.is_empty() {
            return Ok(0.5);
        }
        let sum: f64 = self.trees.iter().map(|t| t.positive_probability(row)).sum();
        Ok(sum / self.trees.len() as f64)
    }

    pub fn predict(&self, row: &[f64]) -> Result<bool, ForestError> {
        Ok(self.predict_proba(row)? > 0.5)
    }
}

/// Stratified train/test split over label indices.
///
/// Each class contributes `round(n_class * test_fraction)` samples to the
/// test side, at least one and never all of them. Returns `(train, test)`.
pub fn stratified_split(y: &[bool], test_fraction: f64, seed: u64) -> (Vec<usize>, Vec<usize>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut train = Vec::new();
    let mut test = Vec::new();

    for class in [false, true] {
        let mut members: Vec<usize> = (0..y.len()).filter(|&i| y[i] == class).collect();
        if members.is_empty() {
            continue;
        }
        members.shuffle(&mut rng);

        let n_test = ((members.len() as f64 * test_fraction).round() as usize)
            .max(1)
            .min(members.len().saturating_sub(1));
        test.extend_from_slice(&members[..n_test]);
        train.extend_from_slice(&members[n_test..]);
    }

    train.sort_unstable();
    test.sort_unstable();
    (train, test)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Label is positive iff feature 0 is set; feature 1 is noise.
    fn separable(n: usize) -> (Vec<Vec<f64>>, Vec<bool>) {
        let x = (0..n)
            .map(|i| vec![(i % 2) as f64, (i % 7) as f64])
            .collect();
        let y = (0..n).map(|i| i % 2 == 1).collect();
        (x, y)
    }

    #[test]
    fn test_learns_separable_data() {
        let (x, y) = separable(60);
        let params = ForestParams {
            min_samples_split: 2,
            ..ForestParams::default()
        };
        let forest = RandomForest::fit(&x, &y, &params).unwrap();
        assert!(forest.predict_proba(&[1.0, 3.0]).unwrap() > 0.8);
        assert!(forest.predict_proba(&[0.0, 3.0]).unwrap() < 0.2);
        assert!(forest.predict(&[1.0, 0.0]).unwrap());
    }

    #[test]
    fn test_fit_is_deterministic_for_a_seed() {
        let (x, y) = separable(40);
        let params = ForestParams::default();
        let a = RandomForest::fit(&x, &y, &params).unwrap();
        let b = RandomForest::fit(&x, &y, &params).unwrap();
        for row in &x {
            assert_eq!(a.predict_proba(row).unwrap(), b.predict_proba(row).unwrap());
        }
    }

    #[test]
    fn test_probability_bounded() {
        let (x, y) = separable(30);
        let forest = RandomForest::fit(&x, &y, &ForestParams::default()).unwrap();
        for row in &x {
            let p = forest.predict_proba(row).unwrap();
            assert!((0.0..=1.0).contains(&p));
        }
    }

    #[test]
    fn test_feature_count_mismatch_is_error() {
        let (x, y) = separable(20);
        let forest = RandomForest::fit(&x, &y, &ForestParams::default()).unwrap();
        assert_eq!(
            forest.predict_proba(&[1.0]),
            Err(ForestError::FeatureCount {
                expected: 2,
                got: 1
            })
        );
    }

    #[test]
    fn test_empty_and_mismatched_inputs() {
        assert_eq!(
            RandomForest::fit(&[], &[], &ForestParams::default()).unwrap_err(),
            ForestError::EmptyDataset
        );
        assert!(matches!(
            RandomForest::fit(&[vec![1.0]], &[true, false], &ForestParams::default()),
            Err(ForestError::LengthMismatch { .. })
        ));
    }

    #[test]
    fn test_stratified_split_keeps_both_classes() {
        let y: Vec<bool> = (0..50).map(|i| i < 10).collect();
        let (train, test) = stratified_split(&y, 0.2, 42);
        assert_eq!(train.len() + test.len(), 50);
        assert_eq!(test.iter().filter(|&&i| y[i]).count(), 2);
        assert_eq!(test.iter().filter(|&&i| !y[i]).count(), 8);
        assert!(train.iter().all(|i| !test.contains(i)));
    }

    #[test]
    fn test_stratified_split_small_class() {
        let y = vec![true, true, false, false, false];
        let (train, test) = stratified_split(&y, 0.2, 42);
        assert!(train.iter().any(|&i| y[i]));
        assert!(test.iter().any(|&i| y[i]));
    }
}
