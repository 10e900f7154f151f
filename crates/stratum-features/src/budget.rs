//! Sample budget
//!
//! Additive estimate of how many texture reads a configuration costs per
//! pixel. Every module adds fixed constants for its own active features, so
//! totals do not depend on the order modules are visited in.

use crate::feature_set::FeatureSet;
use crate::module::Module;
use crate::COMPILER_VERSION;
use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign};

/// Quality preset shared by modules with a cost/quality trade-off
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum QualityTier {
    #[default]
    Best,
    Balanced,
    Fastest,
}

impl QualityTier {
    /// Pick a tier from its two marker tokens; absence of both means best
    pub fn from_markers(features: &FeatureSet, balanced: &str, fastest: &str) -> Self {
        if features.contains(fastest) {
            QualityTier::Fastest
        } else if features.contains(balanced) {
            QualityTier::Balanced
        } else {
            QualityTier::Best
        }
    }

    /// Pick the per-tier constant
    pub fn select(&self, best: u32, balanced: u32, fastest: u32) -> u32 {
        match self {
            QualityTier::Best => best,
            QualityTier::Balanced => balanced,
            QualityTier::Fastest => fastest,
        }
    }
}

/// Accumulated sampling cost
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleBudget {
    pub array_samples: u32,
    pub plain_texture_samples: u32,
    pub max_samples: u32,
    pub tessellation_samples: u32,
    pub dependent_read_sites: u32,
}

impl SampleBudget {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total texture reads in the fragment stage
    pub fn fragment_samples(&self) -> u32 {
        self.array_samples + self.plain_texture_samples
    }

    fn metrics(&self) -> [(&'static str, u32); 5] {
        [
            ("array samples", self.array_samples),
            ("texture samples", self.plain_texture_samples),
            ("max samples", self.max_samples),
            ("tessellation samples", self.tessellation_samples),
            ("dependent reads", self.dependent_read_sites),
        ]
    }
}

impl Add for SampleBudget {
    type Output = SampleBudget;

    fn add(mut self, rhs: SampleBudget) -> SampleBudget {
        self += rhs;
        self
    }
}

impl AddAssign for SampleBudget {
    fn add_assign(&mut self, rhs: SampleBudget) {
        self.array_samples += rhs.array_samples;
        self.plain_texture_samples += rhs.plain_texture_samples;
        self.max_samples += rhs.max_samples;
        self.tessellation_samples += rhs.tessellation_samples;
        self.dependent_read_sites += rhs.dependent_read_sites;
    }
}

/// Thresholds above which a configuration is flagged as expensive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BudgetLimits {
    pub max_array_samples: u32,
    pub max_texture_samples: u32,
    pub max_samples: u32,
    pub max_tessellation_samples: u32,
    pub max_dependent_reads: u32,
}

impl Default for BudgetLimits {
    fn default() -> Self {
        Self {
            max_array_samples: 24,
            max_texture_samples: 8,
            max_samples: 16,
            max_tessellation_samples: 8,
            max_dependent_reads: 4,
        }
    }
}

/// One limit exceeded by a budget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BudgetOverrun {
    pub metric: &'static str,
    pub value: u32,
    pub limit: u32,
}

impl BudgetLimits {
    pub fn overruns(&self, budget: &SampleBudget) -> Vec<BudgetOverrun> {
        let limits = [
            self.max_array_samples,
            self.max_texture_samples,
            self.max_samples,
            self.max_tessellation_samples,
            self.max_dependent_reads,
        ];
        budget
            .metrics()
            .into_iter()
            .zip(limits)
            .filter(|((_, value), limit)| value > limit)
            .map(|((metric, value), limit)| BudgetOverrun { metric, value, limit })
            .collect()
    }
}

/// Sum the cost contribution of every version-matching module
pub fn compute_budget<'a, I>(modules: I, features: &FeatureSet) -> SampleBudget
where
    I: IntoIterator<Item = &'a Box<dyn Module>>,
{
    let mut budget = SampleBudget::new();
    for module in modules.into_iter().filter(|m| m.version() == COMPILER_VERSION) {
        module.compute_budget(features, &mut budget);
    }
    log::trace!("Sample budget for [{}]: {:?}", features, budget);
    budget
}
