//! Candidate vector decoding
//!
//! Maps a real-valued vector in the unit hypercube to a candidate rule:
//! a per-feature decision (constraint or absent) plus a cut point that
//! splits the decoded sequence into antecedent and consequent.
//!
//! Slot offsets are a fixed function of the declared feature order,
//! while features are visited in the rank order given by the trailing
//! permutation keys. The two steps are kept separate: decoding fills a
//! declared-order arena of optional attributes, and the rank order is
//! carried alongside as an index sequence.

use crate::dataset::feature::{Domain, Feature};
use crate::rule::{Attribute, Constraint};

/// Layout of the candidate vector for a fixed feature list
///
/// The vector is `solution ++ [cut]`: per-feature slot groups (three
/// slots for numeric features, two for categorical), then one
/// permutation key per feature, then the cut value.
#[derive(Debug, Clone)]
pub struct RuleEncoding {
    features: Vec<Feature>,
    offsets: Vec<usize>,
    attribute_slots: usize,
}

/// Decoded attributes in declared feature order, plus the rank order
/// they were visited in
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedRule {
    /// One slot per feature, in declared order; `None` marks exclusion
    pub attributes: Vec<Option<Attribute>>,
    /// Feature indices in ascending permutation-key order
    pub order: Vec<usize>,
}

impl RuleEncoding {
    /// Build the layout for a feature list
    pub fn new(features: &[Feature]) -> Self {
        let mut offsets = Vec::with_capacity(features.len());
        let mut position = 0;
        for feature in features {
            offsets.push(position);
            position += feature.domain().slot_width();
        }
        Self {
            features: features.to_vec(),
            offsets,
            attribute_slots: position,
        }
    }

    /// Number of features
    pub fn num_features(&self) -> usize {
        self.features.len()
    }

    /// Slot-group start offset of a feature, fixed by declared order
    pub fn offset(&self, feature: usize) -> usize {
        self.offsets[feature]
    }

    /// Length of the solution part of the vector (attribute slots plus
    /// permutation keys, without the cut slot)
    pub fn solution_length(&self) -> usize {
        self.attribute_slots + self.features.len()
    }

    /// Full candidate vector length, including the cut slot
    pub fn dimension(&self) -> usize {
        self.solution_length() + 1
    }

    /// Stable argsort of the trailing permutation keys
    ///
    /// Key values are only used for ranking; ties keep declared order.
    pub fn rank_order(&self, solution: &[f64]) -> Vec<usize> {
        let keys = &solution[self.attribute_slots..];
        let mut order: Vec<usize> = (0..self.features.len()).collect();
        order.sort_by(|&a, &b| keys[a].total_cmp(&keys[b]));
        order
    }

    /// Decode a solution vector into per-feature attributes
    ///
    /// A feature is included iff its inclusion slot exceeds the slot
    /// after it; numeric bounds are affine-mapped from the two bound
    /// fractions (swapped if inverted, rounded for int features), a
    /// category is selected by fraction-indexing the category list.
    pub fn decode(&self, solution: &[f64]) -> DecodedRule {
        assert_eq!(
            solution.len(),
            self.solution_length(),
            "solution vector length mismatch"
        );
        let order = self.rank_order(solution);
        let mut attributes = vec![None; self.features.len()];
        for &feature in &order {
            attributes[feature] = self.decode_feature(feature, solution);
        }
        DecodedRule { attributes, order }
    }

    fn decode_feature(&self, feature: usize, solution: &[f64]) -> Option<Attribute> {
        let position = self.offsets[feature];
        if solution[position] <= solution[position + 1] {
            return None;
        }
        let descriptor = &self.features[feature];
        let constraint = match descriptor.domain() {
            Domain::Float { min, max } => {
                let span = max - min;
                let mut low = solution[position + 1] * span + min;
                let mut high = solution[position + 2] * span + min;
                if low > high {
                    std::mem::swap(&mut low, &mut high);
                }
                Constraint::FloatRange { low, high }
            }
            Domain::Int { min, max } => {
                let span = (max - min) as f64;
                let base = *min as f64;
                let mut low = (solution[position + 1] * span + base).round() as i64;
                let mut high = (solution[position + 2] * span + base).round() as i64;
                if low > high {
                    std::mem::swap(&mut low, &mut high);
                }
                Constraint::IntRange { low, high }
            }
            Domain::Categorical { categories } => {
                let index =
                    (solution[position + 1] * (categories.len() - 1) as f64).round() as usize;
                Constraint::Category(categories[index].clone())
            }
        };
        Some(Attribute::new(descriptor.name(), constraint))
    }
}

/// Map a cut value in `[0, 1]` to a split index over `num_features`
/// rank-ordered attribute slots
///
/// `floor(c * n)` clamped into `[1, n - 2]`, so both sides of the split
/// are non-empty whenever `n >= 3`. For fewer than three features the
/// upper clamp saturates at 1 and the consequent side can only come out
/// empty, which feasibility filtering rejects downstream.
pub fn cut_point(cut_value: f64, num_features: usize) -> usize {
    let n = num_features as i64;
    let mut cut = (cut_value * n as f64).floor() as i64;
    if cut == 0 {
        cut = 1;
    }
    if cut > n - 2 {
        cut = (n - 2).max(1);
    }
    cut as usize
}

impl DecodedRule {
    /// Whether any feature was included
    pub fn is_empty(&self) -> bool {
        self.attributes.iter().all(Option::is_none)
    }

    /// Split the rank-ordered attribute sequence at `cut` and drop
    /// excluded entries from both sides
    pub fn split(self, cut: usize) -> (Vec<Attribute>, Vec<Attribute>) {
        let DecodedRule {
            mut attributes,
            order,
        } = self;
        let mut antecedent = Vec::new();
        let mut consequent = Vec::new();
        for (rank, &feature) in order.iter().enumerate() {
            if let Some(attribute) = attributes[feature].take() {
                if rank < cut {
                    antecedent.push(attribute);
                } else {
                    consequent.push(attribute);
                }
            }
        }
        (antecedent, consequent)
    }
}
