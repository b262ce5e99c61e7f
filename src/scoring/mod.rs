//! Readiness Scoring
//!
//! Turns the five metric reports into a single release-readiness verdict.
//!
//! # Scoring Formula
//!
//! ```text
//! Overall = mean(core, documentation, build, tests, code, deployment)
//!
//! core          = critical files present / required × 100         GOOD ≥ 80
//! documentation = completeness score                              GOOD ≥ 80
//! build         = build files present / required × 100            GOOD ≥ 80
//! tests         = scored categories present / scored × 100        GOOD ≥ 66
//! code          = mean(docstring coverage, size score)            GOOD ≥ 70
//! deployment    = dist files present / required × 70 + 30 if exe  GOOD ≥ 80
//! ```
//!
//! All six dimensions weigh the same. Every score is rounded to one decimal,
//! and the overall score is rounded before the tier is chosen.
//!
//! # Tiers (closed-above)
//!
//! - **READY**: overall ≥ 90
//! - **ALMOST_READY**: overall ≥ 80
//! - **NEEDS_WORK**: overall ≥ 70
//! - **NOT_READY**: below 70

mod dimensions;

pub use dimensions::{presence_ratio, size_score, Dimension, DimensionRule, Measurement, RULES};

use crate::analyzers::ReportSet;
use crate::models::round_to;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Recommendation emitted when every dimension is GOOD
pub const ALL_CLEAR_MESSAGE: &str = "All criteria are met. The project is ready for release!";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Good,
    NeedsImprovement,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Good => write!(f, "GOOD"),
            Status::NeedsImprovement => write!(f, "NEEDS_IMPROVEMENT"),
        }
    }
}

/// Release-readiness classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Tier {
    NotReady,
    NeedsWork,
    AlmostReady,
    Ready,
}

impl Tier {
    pub fn from_score(score: f64) -> Self {
        if score >= 90.0 {
            Tier::Ready
        } else if score >= 80.0 {
            Tier::AlmostReady
        } else if score >= 70.0 {
            Tier::NeedsWork
        } else {
            Tier::NotReady
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Tier::Ready => "Ready for release",
            Tier::AlmostReady => "Minor fixes needed",
            Tier::NeedsWork => "Additional work needed",
            Tier::NotReady => "Major improvements needed",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tier::Ready => write!(f, "READY"),
            Tier::AlmostReady => write!(f, "ALMOST_READY"),
            Tier::NeedsWork => write!(f, "NEEDS_WORK"),
            Tier::NotReady => write!(f, "NOT_READY"),
        }
    }
}

/// Score of one dimension
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionScore {
    pub dimension: Dimension,
    /// 0–100, one decimal
    pub score: f64,
    pub threshold: f64,
    pub status: Status,
    pub detail: String,
}

impl DimensionScore {
    pub fn new(dimension: Dimension, measurement: Measurement) -> Self {
        let score = measurement.score.clamp(0.0, 100.0);
        let threshold = dimension.threshold();
        Self {
            dimension,
            score,
            threshold,
            status: if score >= threshold {
                Status::Good
            } else {
                Status::NeedsImprovement
            },
            detail: measurement.detail,
        }
    }

    pub fn is_good(&self) -> bool {
        self.status == Status::Good
    }
}

/// Final verdict of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadinessVerdict {
    pub overall_score: f64,
    pub tier: Tier,
    pub tier_message: String,
    /// Exactly six, in dimension declaration order
    pub dimensions: Vec<DimensionScore>,
    pub recommendations: Vec<String>,
}

impl ReadinessVerdict {
    /// Build a verdict from the six dimension scores
    pub fn from_scores(dimensions: Vec<DimensionScore>) -> Self {
        let overall_score = if dimensions.is_empty() {
            0.0
        } else {
            let sum: f64 = dimensions.iter().map(|d| d.score).sum();
            round_to(sum / dimensions.len() as f64, 1)
        };
        let tier = Tier::from_score(overall_score);

        let mut recommendations: Vec<String> = dimensions
            .iter()
            .filter(|d| !d.is_good())
            .map(|d| d.dimension.remediation().to_string())
            .collect();
        if recommendations.is_empty() {
            recommendations.push(ALL_CLEAR_MESSAGE.to_string());
        }

        Self {
            overall_score,
            tier,
            tier_message: tier.message().to_string(),
            dimensions,
            recommendations,
        }
    }

    pub fn dimension(&self, dimension: Dimension) -> Option<&DimensionScore> {
        self.dimensions.iter().find(|d| d.dimension == dimension)
    }
}

/// Scores a complete report set
pub struct ReadinessScorer<'a> {
    reports: &'a ReportSet,
}

impl<'a> ReadinessScorer<'a> {
    pub fn new(reports: &'a ReportSet) -> Self {
        Self { reports }
    }

    pub fn calculate(&self) -> ReadinessVerdict {
        let dimensions: Vec<DimensionScore> = Dimension::ALL
            .iter()
            .map(|dimension| {
                let score = DimensionScore::new(*dimension, dimension.measure(self.reports));
                debug!(
                    "{}: {:.1} ({}) - {}",
                    dimension.name(),
                    score.score,
                    score.status,
                    score.detail
                );
                score
            })
            .collect();

        ReadinessVerdict::from_scores(dimensions)
    }
}

#[cfg(test)]
mod tests;
