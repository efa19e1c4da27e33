//! Rule interest measures
//!
//! Every measure is a pure function of a rule's contingency counts and
//! recomputes identically on every call. Divisions that can hit zero are
//! epsilon-padded rather than raising.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MiningError;
use crate::rule::{Predicate, Rule};

/// Guard for divisions by zero, the platform's smallest double epsilon
pub const EPSILON: f64 = f64::EPSILON;

/// The available interest measures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Support,
    Confidence,
    Lift,
    Coverage,
    RhsSupport,
    Conviction,
    Amplitude,
    Inclusion,
    Interestingness,
    Comprehensibility,
    Netconf,
    #[serde(rename = "yulesq")]
    YulesQ,
    Zhang,
    Leverage,
}

impl Metric {
    /// All measures, in display/export order
    pub const ALL: [Metric; 14] = [
        Metric::Support,
        Metric::Confidence,
        Metric::Lift,
        Metric::Coverage,
        Metric::RhsSupport,
        Metric::Conviction,
        Metric::Amplitude,
        Metric::Inclusion,
        Metric::Interestingness,
        Metric::Comprehensibility,
        Metric::Netconf,
        Metric::YulesQ,
        Metric::Zhang,
        Metric::Leverage,
    ];

    /// Canonical metric name
    pub fn name(&self) -> &'static str {
        match self {
            Metric::Support => "support",
            Metric::Confidence => "confidence",
            Metric::Lift => "lift",
            Metric::Coverage => "coverage",
            Metric::RhsSupport => "rhs_support",
            Metric::Conviction => "conviction",
            Metric::Amplitude => "amplitude",
            Metric::Inclusion => "inclusion",
            Metric::Interestingness => "interestingness",
            Metric::Comprehensibility => "comprehensibility",
            Metric::Netconf => "netconf",
            Metric::YulesQ => "yulesq",
            Metric::Zhang => "zhang",
            Metric::Leverage => "leverage",
        }
    }

    /// Value of the measure for `rule`
    pub fn evaluate<P: Predicate>(&self, rule: &Rule<P>) -> f64 {
        match self {
            Metric::Support => rule.support(),
            Metric::Confidence => rule.confidence(),
            Metric::Lift => rule.lift(),
            Metric::Coverage => rule.coverage(),
            Metric::RhsSupport => rule.rhs_support(),
            Metric::Conviction => rule.conviction(),
            Metric::Amplitude => rule.amplitude(),
            Metric::Inclusion => rule.inclusion(),
            Metric::Interestingness => rule.interestingness(),
            Metric::Comprehensibility => rule.comprehensibility(),
            Metric::Netconf => rule.netconf(),
            Metric::YulesQ => rule.yulesq(),
            Metric::Zhang => rule.zhang(),
            Metric::Leverage => rule.leverage(),
        }
    }
}

impl FromStr for Metric {
    type Err = MiningError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Metric::ALL
            .iter()
            .find(|m| m.name() == s)
            .copied()
            .ok_or_else(|| MiningError::UnknownMetric(s.to_string()))
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl<P: Predicate> Rule<P> {
    /// Fraction of transactions matching both sides
    pub fn support(&self) -> f64 {
        self.counts().full_count as f64 / self.counts().num_transactions as f64
    }

    /// Conditional frequency of the consequent given the antecedent
    pub fn confidence(&self) -> f64 {
        if self.counts().antecedent_count == 0 {
            0.0
        } else {
            self.counts().full_count as f64 / self.counts().antecedent_count as f64
        }
    }

    /// Fraction of transactions matching the antecedent
    pub fn coverage(&self) -> f64 {
        self.counts().antecedent_count as f64 / self.counts().num_transactions as f64
    }

    /// Fraction of transactions matching the consequent
    pub fn rhs_support(&self) -> f64 {
        self.counts().consequent_count as f64 / self.counts().num_transactions as f64
    }

    /// Observed co-occurrence over expected co-occurrence under
    /// independence
    pub fn lift(&self) -> f64 {
        self.support() / (self.coverage() * self.rhs_support())
    }

    pub fn conviction(&self) -> f64 {
        (1.0 - self.rhs_support()) / (1.0 - self.confidence() + EPSILON)
    }

    pub fn interestingness(&self) -> f64 {
        self.confidence()
            * (self.support() / self.rhs_support())
            * (1.0 - self.support() / self.counts().num_transactions as f64)
    }

    /// Preference for short antecedents relative to total rule length
    pub fn comprehensibility(&self) -> f64 {
        ((1 + self.consequent().len()) as f64).ln()
            / ((1 + self.antecedent().len() + self.consequent().len()) as f64).ln()
    }

    pub fn netconf(&self) -> f64 {
        (self.support() - self.coverage() * self.rhs_support())
            / (self.coverage() * (1.0 - self.coverage()) + EPSILON)
    }

    /// Yule's Q association coefficient, in `[-1, 1]`
    pub fn yulesq(&self) -> f64 {
        let counts = self.counts();
        let concordant = (counts.full_count * counts.not_ant_not_con) as f64;
        let discordant = (counts.con_not_ant * counts.ant_not_con) as f64;
        (concordant - discordant) / (concordant + discordant + EPSILON)
    }

    /// Zhang's metric, in `[-1, 1]`
    pub fn zhang(&self) -> f64 {
        let leverage = self.support() - self.coverage() * self.rhs_support();
        let denominator = (self.support() * (1.0 - self.coverage()))
            .max(self.coverage() * (self.rhs_support() - self.support()));
        leverage / (denominator + EPSILON)
    }

    pub fn leverage(&self) -> f64 {
        self.support() - self.coverage() * self.rhs_support()
    }
}
