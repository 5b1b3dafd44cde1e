//! Fitted classifiers
//!
//! Supports tree ensembles, single decision trees and linear models. Every
//! structural check happens when the file is loaded so that prediction
//! itself cannot fail.

use serde::Deserialize;
use shared::{Classifier, FeatureVector, FEATURE_COUNT};

use super::{per_feature, Defect};

/// Classifier as exported by the trainer, tagged by `kind`
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClassifierFile {
    RandomForest {
        classes: Vec<i64>,
        trees: Vec<TreeFile>,
    },
    DecisionTree {
        classes: Vec<i64>,
        tree: TreeFile,
    },
    Linear {
        classes: Vec<i64>,
        coef: Vec<Vec<f64>>,
        intercept: Vec<f64>,
    },
}

/// Flattened binary tree, one entry per node in every array.
///
/// A node is a leaf when `children_left` is `-1`. `value` holds the class
/// weights of each node, in `classes` order.
#[derive(Debug, Clone, Deserialize)]
pub struct TreeFile {
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    pub value: Vec<Vec<f64>>,
}

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        /// Class probabilities, summing to one
        distribution: Vec<f64>,
    },
}

/// A validated decision tree
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionTree {
    nodes: Vec<Node>,
}

impl DecisionTree {
    /// Class probabilities at the leaf reached by `features`
    pub fn leaf_distribution(&self, features: &FeatureVector) -> &[f64] {
        let x = features.as_array();
        let mut index = 0;
        loop {
            match &self.nodes[index] {
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    index = if x[*feature] <= *threshold { *left } else { *right };
                }
                Node::Leaf { distribution } => return distribution,
            }
        }
    }

    fn from_file(file: TreeFile, n_classes: usize) -> Result<Self, Defect> {
        let n = file.children_left.len();
        if n == 0 {
            return Err(Defect::malformed("tree has no nodes"));
        }
        for (field, len) in [
            ("children_right", file.children_right.len()),
            ("feature", file.feature.len()),
            ("threshold", file.threshold.len()),
            ("value", file.value.len()),
        ] {
            if len != n {
                return Err(Defect::Dimension {
                    field: field.to_string(),
                    expected: n,
                    found: len,
                });
            }
        }

        let mut nodes = Vec::with_capacity(n);
        for (i, weights) in file.value.into_iter().enumerate() {
            let (left, right) = (file.children_left[i], file.children_right[i]);
            let node = if left == -1 {
                if right != -1 {
                    return Err(Defect::malformed(format!("node {} has only one child", i)));
                }
                Node::Leaf {
                    distribution: normalize(i, weights, n_classes)?,
                }
            } else {
                // Children always come after their parent, which rules out cycles
                let child = |c: i64| -> Result<usize, Defect> {
                    if c > i as i64 && (c as usize) < n {
                        Ok(c as usize)
                    } else {
                        Err(Defect::malformed(format!(
                            "node {} points to invalid child {}",
                            i, c
                        )))
                    }
                };
                let feature = file.feature[i];
                if feature < 0 || feature as usize >= FEATURE_COUNT {
                    return Err(Defect::malformed(format!(
                        "node {} splits on unknown feature {}",
                        i, feature
                    )));
                }
                let threshold = file.threshold[i];
                if threshold.is_nan() {
                    return Err(Defect::malformed(format!("node {} has a NaN threshold", i)));
                }
                Node::Split {
                    feature: feature as usize,
                    threshold,
                    left: child(left)?,
                    right: child(right)?,
                }
            };
            nodes.push(node);
        }

        Ok(Self { nodes })
    }
}

fn normalize(node: usize, weights: Vec<f64>, n_classes: usize) -> Result<Vec<f64>, Defect> {
    if weights.len() != n_classes {
        return Err(Defect::Dimension {
            field: format!("value[{}]", node),
            expected: n_classes,
            found: weights.len(),
        });
    }
    if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
        return Err(Defect::malformed(format!(
            "leaf {} has negative or non-finite weights",
            node
        )));
    }
    let total: f64 = weights.iter().sum();
    if total <= 0.0 {
        return Err(Defect::malformed(format!("leaf {} has no samples", node)));
    }
    Ok(weights.into_iter().map(|w| w / total).collect())
}

/// Index of the largest score. Ties resolve to the lowest index.
fn argmax(scores: &[f64]) -> usize {
    let mut best = 0;
    for (i, score) in scores.iter().enumerate().skip(1) {
        if *score > scores[best] {
            best = i;
        }
    }
    best
}

/// A validated classifier ready to serve predictions
#[derive(Debug, Clone, PartialEq)]
pub enum ClassifierModel {
    RandomForest {
        classes: Vec<i64>,
        trees: Vec<DecisionTree>,
    },
    DecisionTree {
        classes: Vec<i64>,
        tree: DecisionTree,
    },
    Linear {
        classes: Vec<i64>,
        coef: Vec<[f64; FEATURE_COUNT]>,
        intercept: Vec<f64>,
    },
}

impl ClassifierModel {
    pub fn kind(&self) -> &'static str {
        match self {
            ClassifierModel::RandomForest { .. } => "random_forest",
            ClassifierModel::DecisionTree { .. } => "decision_tree",
            ClassifierModel::Linear { .. } => "linear",
        }
    }

    pub fn classes(&self) -> &[i64] {
        match self {
            ClassifierModel::RandomForest { classes, .. }
            | ClassifierModel::DecisionTree { classes, .. }
            | ClassifierModel::Linear { classes, .. } => classes,
        }
    }
}

fn check_classes(classes: &[i64]) -> Result<(), Defect> {
    if classes.is_empty() {
        return Err(Defect::malformed("`classes` is empty"));
    }
    Ok(())
}

impl TryFrom<ClassifierFile> for ClassifierModel {
    type Error = Defect;

    fn try_from(file: ClassifierFile) -> Result<Self, Self::Error> {
        match file {
            ClassifierFile::RandomForest { classes, trees } => {
                check_classes(&classes)?;
                if trees.is_empty() {
                    return Err(Defect::malformed("forest has no trees"));
                }
                let trees = trees
                    .into_iter()
                    .map(|tree| DecisionTree::from_file(tree, classes.len()))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(ClassifierModel::RandomForest { classes, trees })
            }
            ClassifierFile::DecisionTree { classes, tree } => {
                check_classes(&classes)?;
                let tree = DecisionTree::from_file(tree, classes.len())?;
                Ok(ClassifierModel::DecisionTree { classes, tree })
            }
            ClassifierFile::Linear {
                classes,
                coef,
                intercept,
            } => {
                check_classes(&classes)?;
                if coef.len() != classes.len() {
                    return Err(Defect::Dimension {
                        field: "coef".into(),
                        expected: classes.len(),
                        found: coef.len(),
                    });
                }
                if intercept.len() != classes.len() {
                    return Err(Defect::Dimension {
                        field: "intercept".into(),
                        expected: classes.len(),
                        found: intercept.len(),
                    });
                }
                if intercept.iter().any(|b| !b.is_finite()) {
                    return Err(Defect::malformed("`intercept` contains a non-finite value"));
                }
                let coef = coef
                    .into_iter()
                    .enumerate()
                    .map(|(i, row)| per_feature(&format!("coef[{}]", i), row))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(ClassifierModel::Linear {
                    classes,
                    coef,
                    intercept,
                })
            }
        }
    }
}

impl Classifier for ClassifierModel {
    fn predict(&self, features: &FeatureVector) -> i64 {
        match self {
            ClassifierModel::RandomForest { classes, trees } => {
                let mut mean = vec![0.0; classes.len()];
                for tree in trees {
                    for (acc, p) in mean.iter_mut().zip(tree.leaf_distribution(features)) {
                        *acc += p;
                    }
                }
                classes[argmax(&mean)]
            }
            ClassifierModel::DecisionTree { classes, tree } => {
                classes[argmax(tree.leaf_distribution(features))]
            }
            ClassifierModel::Linear {
                classes,
                coef,
                intercept,
            } => {
                let x = features.as_array();
                let scores: Vec<f64> = coef
                    .iter()
                    .zip(intercept)
                    .map(|(w, b)| w.iter().zip(x).map(|(w, x)| w * x).sum::<f64>() + b)
                    .collect();
                classes[argmax(&scores)]
            }
        }
    }
}
