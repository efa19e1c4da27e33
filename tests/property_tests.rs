//! Property-based tests for evoarm
//!
//! Uses proptest to verify invariants and properties of the library.

use evoarm::prelude::*;
use proptest::prelude::*;

const WIKI_CSV: &str = "Feat1,Feat2\nA,0\nA,0\nA,1\nA,0\nB,1\nB,0\nB,1\n";

fn wiki() -> Dataset {
    Dataset::from_reader(WIKI_CSV.as_bytes(), true).expect("load wiki dataset")
}

// three-column dataset with a float, an int and a categorical feature
const MIXED_CSV: &str = "\
height,age,city
1.52,20,rome
1.60,25,lima
1.71,30,rome
1.84,35,oslo
1.66,40,lima
1.79,45,oslo
";

fn mixed() -> Dataset {
    Dataset::from_reader(MIXED_CSV.as_bytes(), true).expect("load mixed dataset")
}

proptest! {
    // ==================== Cut Point Properties ====================

    #[test]
    fn cut_point_within_interior(cut_value in 0.0..=1.0f64, n in 3usize..40) {
        let cut = cut_point(cut_value, n);
        prop_assert!(cut >= 1);
        prop_assert!(cut <= n - 2);
    }

    #[test]
    fn cut_point_small_feature_counts(cut_value in 0.0..=1.0f64, n in 1usize..3) {
        // below three features both clamps collapse onto 1
        prop_assert_eq!(cut_point(cut_value, n), 1);
    }

    // ==================== Decoding Properties ====================

    #[test]
    fn decode_is_deterministic(solution in prop::collection::vec(0.0..=1.0f64, 11)) {
        let dataset = mixed();
        let encoding = RuleEncoding::new(dataset.features());
        prop_assert_eq!(encoding.solution_length(), 11);
        prop_assert_eq!(encoding.decode(&solution), encoding.decode(&solution));
    }

    #[test]
    fn rank_order_is_a_permutation(solution in prop::collection::vec(0.0..=1.0f64, 11)) {
        let dataset = mixed();
        let encoding = RuleEncoding::new(dataset.features());
        let mut order = encoding.rank_order(&solution);
        order.sort();
        prop_assert_eq!(order, (0..3).collect::<Vec<_>>());
    }

    #[test]
    fn split_sides_partition_included_features(
        solution in prop::collection::vec(0.0..=1.0f64, 11),
        cut_value in 0.0..=1.0f64
    ) {
        let dataset = mixed();
        let encoding = RuleEncoding::new(dataset.features());
        let decoded = encoding.decode(&solution);
        let included = decoded.attributes.iter().flatten().count();
        let cut = cut_point(cut_value, encoding.num_features());
        let (antecedent, consequent) = decoded.split(cut);
        prop_assert_eq!(antecedent.len() + consequent.len(), included);
    }

    // ==================== Metric Properties ====================

    #[test]
    fn metric_ranges_hold(
        solution in prop::collection::vec(0.0..=1.0f64, 11),
        cut_value in 0.0..=1.0f64
    ) {
        let dataset = mixed();
        let encoding = RuleEncoding::new(dataset.features());
        let cut = cut_point(cut_value, encoding.num_features());
        let (antecedent, consequent) = encoding.decode(&solution).split(cut);
        prop_assume!(!antecedent.is_empty() && !consequent.is_empty());

        let rule = Rule::new(antecedent, consequent, dataset.table());
        let slack = 1e-9;
        for metric in [
            Metric::Support,
            Metric::Confidence,
            Metric::Coverage,
            Metric::RhsSupport,
            Metric::Inclusion,
        ] {
            let value = metric.evaluate(&rule);
            prop_assert!((0.0..=1.0).contains(&value), "{} = {}", metric.name(), value);
        }
        for metric in [Metric::YulesQ, Metric::Netconf, Metric::Zhang] {
            let value = metric.evaluate(&rule);
            prop_assert!(
                (-1.0 - slack..=1.0 + slack).contains(&value),
                "{} = {}",
                metric.name(),
                value
            );
        }
    }

    #[test]
    fn counts_partition_the_table(
        solution in prop::collection::vec(0.0..=1.0f64, 11),
        cut_value in 0.0..=1.0f64
    ) {
        let dataset = mixed();
        let encoding = RuleEncoding::new(dataset.features());
        let cut = cut_point(cut_value, encoding.num_features());
        let (antecedent, consequent) = encoding.decode(&solution).split(cut);
        prop_assume!(!antecedent.is_empty() && !consequent.is_empty());

        let rule = Rule::new(antecedent, consequent, dataset.table());
        let counts = rule.counts();
        prop_assert_eq!(
            counts.full_count + counts.ant_not_con + counts.con_not_ant + counts.not_ant_not_con,
            counts.num_transactions
        );
        prop_assert_eq!(counts.antecedent_count, counts.full_count + counts.ant_not_con);
        prop_assert_eq!(counts.consequent_count, counts.full_count + counts.con_not_ant);
    }

    // ==================== Evaluation Properties ====================

    #[test]
    fn evaluation_is_sentinel_or_weighted_mean(x in prop::collection::vec(0.0..=1.0f64, 12)) {
        let dataset = mixed();
        let weights = MetricWeights::uniform(&[Metric::Support, Metric::Confidence])
            .expect("valid metrics");
        let problem = MiningProblem::new(&dataset, weights, false);
        let fitness = problem.evaluate(&x);
        // support and confidence are both in [0, 1], so any feasible
        // candidate scores in [0, 1] and only the sentinel is negative
        prop_assert!(
            fitness == INFEASIBLE_FITNESS || (0.0..=1.0).contains(&fitness),
            "fitness = {}",
            fitness
        );
    }

    #[test]
    fn dedup_keeps_collection_size_stable(x in prop::collection::vec(0.0..=1.0f64, 12)) {
        let dataset = mixed();
        let weights = MetricWeights::uniform(&[Metric::Support]).expect("valid metrics");
        let problem = MiningProblem::new(&dataset, weights, false);
        problem.evaluate(&x);
        let after_first = problem.num_rules();
        problem.evaluate(&x);
        prop_assert_eq!(problem.num_rules(), after_first);
    }
}

// ==================== Fixed-Vector Checks ====================

#[test]
fn wiki_round_trip_vector() {
    let dataset = wiki();
    let encoding = RuleEncoding::new(dataset.features());
    let solution = [0.27989089, 0.10, 0.28412449, 0.25629334, 0.0796189, 0.0, 0.0];

    let cut = cut_point(0.0, encoding.num_features());
    assert_eq!(cut, 1);

    let (antecedent, consequent) = encoding.decode(&solution).split(cut);
    assert_eq!(antecedent.len(), 1);
    assert_eq!(consequent.len(), 1);
    assert_eq!(antecedent[0].to_string(), "Feat1(A)");
    assert_eq!(consequent[0].to_string(), "Feat2(0)");

    let rule = Rule::new(antecedent, consequent, dataset.table());
    assert_eq!(rule.support(), 3.0 / 7.0);
    assert_eq!(rule.confidence(), 3.0 / 4.0);
}

#[test]
fn wiki_weighted_fitness() {
    let dataset = wiki();
    let weights =
        MetricWeights::uniform(&[Metric::Support, Metric::Confidence]).expect("valid metrics");
    let problem = MiningProblem::new(&dataset, weights, false);
    let fitness = problem.evaluate(&[
        0.27989089, 0.10, 0.28412449, 0.25629334, 0.0796189, 0.0, 0.0, 0.0,
    ]);
    assert!((fitness - (3.0 / 7.0 + 3.0 / 4.0) / 2.0).abs() < 1e-9);
}

#[test]
fn infeasible_vector_evaluates_to_minus_one() {
    let dataset = wiki();
    let weights = MetricWeights::uniform(&[Metric::Support]).expect("valid metrics");
    let problem = MiningProblem::new(&dataset, weights, false);
    let fitness = problem.evaluate(&[0.0, 1.0, 0.0, 1.0, 1.0, 0.0, 0.0, 0.5]);
    assert_eq!(fitness, INFEASIBLE_FITNESS);
}
