//! Optimization library: named strategies that multiplicatively scale the
//! `(s_comp, r_bytes)` roofline factors based on an operator's taxonomy and
//! its producer-supplied hints.
//!
//! Every strategy is a pure function of `(taxonomy, hints)` — none holds
//! state or depends on evaluation order relative to other strategies, since
//! their effects compose multiplicatively (commutative).

use std::collections::HashMap;

/// The fundamental operation a strategy performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptimizationType {
    Reuse,
    Skip,
    LowBit,
}

/// The granularity at which a strategy is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptimizationScope {
    Element,
    Region,
    Frame,
}

/// The condition that triggers a strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionCriteria {
    Boundary,
    Threshold,
}

/// Catalog metadata for one named optimization strategy. The actual
/// numeric effect is evaluated by [`apply_effect`], keyed on `name`, since
/// each strategy's hint-reading logic is distinct.
#[derive(Debug, Clone)]
pub struct OptimizationStrategy {
    pub name: &'static str,
    pub opt_type: OptimizationType,
    pub scope: OptimizationScope,
    pub criteria: DecisionCriteria,
    pub description: &'static str,
    /// Taxonomy tags (as produced by `OperatorTaxonomy::as_str`, or the
    /// `Other(..)` payload) this strategy applies to. `"*"` matches every
    /// taxonomy.
    pub applicable_taxonomies: &'static [&'static str],
}

/// What applying a strategy to one node did.
enum Effect {
    NotApplicable,
    Applied { s_comp: f64, r_bytes: f64 },
    MissingParam { param: &'static str },
}

/// The combined result of applying every applicable strategy to one node.
pub struct AppliedOptimizations {
    pub s_comp: f64,
    pub r_bytes: f64,
    pub applied_strategies: Vec<String>,
    /// `(strategy, param)` pairs where a required hint was absent; a
    /// neutral `(1.0, 1.0)` factor was substituted for that strategy.
    pub missing_params: Vec<(String, String)>,
}

pub struct OptimizationLibrary {
    strategies: Vec<OptimizationStrategy>,
}

impl OptimizationLibrary {
    pub fn new() -> Self {
        Self { strategies: Vec::new() }
    }

    pub fn register(&mut self, strategy: OptimizationStrategy) {
        self.strategies.push(strategy);
    }

    pub fn with_builtin_strategies() -> Self {
        let mut lib = Self::new();
        for s in BUILTIN_STRATEGIES {
            lib.register(s.clone());
        }
        lib
    }

    pub fn applicable_to(&self, taxonomy: &str) -> Vec<&OptimizationStrategy> {
        self.strategies
            .iter()
            .filter(|s| s.applicable_taxonomies.contains(&taxonomy) || s.applicable_taxonomies.contains(&"*"))
            .collect()
    }

    /// Applies every strategy applicable to `taxonomy`, folding their
    /// effects multiplicatively into `(s_comp, r_bytes)`.
    pub fn apply(&self, taxonomy: &str, hints: &HashMap<String, f64>) -> AppliedOptimizations {
        let mut s_comp = 1.0;
        let mut r_bytes = 1.0;
        let mut applied_strategies = Vec::new();
        let mut missing_params = Vec::new();

        for strategy in self.applicable_to(taxonomy) {
            match apply_effect(strategy.name, taxonomy, hints) {
                Effect::NotApplicable => {}
                Effect::Applied { s_comp: sc, r_bytes: rb } => {
                    s_comp *= sc;
                    r_bytes *= rb;
                    applied_strategies.push(strategy.name.to_string());
                }
                Effect::MissingParam { param } => {
                    missing_params.push((strategy.name.to_string(), param.to_string()));
                }
            }
        }

        AppliedOptimizations {
            s_comp,
            r_bytes,
            applied_strategies,
            missing_params,
        }
    }
}

impl Default for OptimizationLibrary {
    fn default() -> Self {
        Self::with_builtin_strategies()
    }
}

fn hint_or_default(hints: &HashMap<String, f64>, key: &str, default: f64) -> f64 {
    hints.get(key).copied().unwrap_or(default)
}

fn apply_effect(name: &str, taxonomy: &str, hints: &HashMap<String, f64>) -> Effect {
    match name {
        "tile_culling" => {
            if !matches!(taxonomy, "SAMPLING" | "BLENDING") {
                return Effect::NotApplicable;
            }
            let ratio = hint_or_default(hints, "active_samples_ratio", 1.0);
            Effect::Applied { s_comp: ratio, r_bytes: 1.0 }
        }
        "gradient_pruning" => {
            if taxonomy != "GRADIENTCOMPUTE" {
                return Effect::NotApplicable;
            }
            let p = hint_or_default(hints, "pruning_ratio", 0.4);
            Effect::Applied { s_comp: 1.0 - p, r_bytes: 1.0 - p }
        }
        "row_processing" => {
            if taxonomy != "ROWPROCESSING" {
                return Effect::NotApplicable;
            }
            let eff = hint_or_default(hints, "bundle_efficiency", 0.8);
            Effect::Applied { s_comp: eff, r_bytes: 1.0 }
        }
        "frm_coalescing" => {
            if taxonomy != "FRM" {
                return Effect::NotApplicable;
            }
            let factor = hint_or_default(hints, "coalesce_factor", 4.0);
            Effect::Applied { s_comp: 1.0, r_bytes: 1.0 / factor }
        }
        "bum_merging" => {
            if taxonomy != "BUM" {
                return Effect::NotApplicable;
            }
            let ratio = hint_or_default(hints, "merge_ratio", 0.6);
            Effect::Applied { s_comp: 1.0, r_bytes: ratio }
        }
        "early_ray_termination" => {
            if taxonomy != "VOLUME_RENDERING" {
                return Effect::NotApplicable;
            }
            let ratio = hint_or_default(hints, "early_termination_ratio", 0.7);
            Effect::Applied { s_comp: ratio, r_bytes: 1.0 }
        }
        "sparse_radiance_warping" => {
            // Applicable to every taxonomy, but unlike the narrower
            // taxonomy-scoped strategies this one only engages when the
            // producer actually signals frame-to-frame reuse; silently
            // defaulting a universal strategy onto every operator
            // regardless of taxonomy would contradict the "optional,
            // hint-driven" framing the rest of the library follows.
            match hints.get("frame_reuse_ratio") {
                Some(&reuse) => Effect::Applied {
                    s_comp: 1.0 - reuse,
                    r_bytes: 1.0 - reuse,
                },
                None => Effect::NotApplicable,
            }
        }
        "low_bit_sampling" => {
            if taxonomy != "SAMPLING" {
                return Effect::NotApplicable;
            }
            let factor = hint_or_default(hints, "bit_reduction_factor", 0.5);
            Effect::Applied { s_comp: 1.0, r_bytes: factor }
        }
        "restricted_hashing" => {
            if taxonomy != "HASH_ENCODE" {
                return Effect::NotApplicable;
            }
            // Unlike the other strategies, hash-subgrid locality has no
            // single scalar default (its natural parameters are a 3-vector
            // and a table size) — a caller must supply a derived scalar
            // hint or the strategy degrades to a neutral factor with a
            // logged warning.
            match hints.get("subgrid_locality_ratio") {
                Some(&ratio) => Effect::Applied { s_comp: ratio, r_bytes: 1.0 },
                None => Effect::MissingParam { param: "subgrid_locality_ratio" },
            }
        }
        _ => Effect::NotApplicable,
    }
}

const BUILTIN_STRATEGIES: &[OptimizationStrategy] = &[
    OptimizationStrategy {
        name: "tile_culling",
        opt_type: OptimizationType::Skip,
        scope: OptimizationScope::Region,
        criteria: DecisionCriteria::Boundary,
        description: "Skip entire tiles based on bounding box tests",
        applicable_taxonomies: &["SAMPLING", "BLENDING"],
    },
    OptimizationStrategy {
        name: "gradient_pruning",
        opt_type: OptimizationType::Skip,
        scope: OptimizationScope::Element,
        criteria: DecisionCriteria::Threshold,
        description: "Prune gradients below an informativeness threshold",
        applicable_taxonomies: &["GRADIENTCOMPUTE"],
    },
    OptimizationStrategy {
        name: "row_processing",
        opt_type: OptimizationType::Reuse,
        scope: OptimizationScope::Region,
        criteria: DecisionCriteria::Boundary,
        description: "Row-based bundle processing",
        applicable_taxonomies: &["ROWPROCESSING"],
    },
    OptimizationStrategy {
        name: "frm_coalescing",
        opt_type: OptimizationType::Reuse,
        scope: OptimizationScope::Element,
        criteria: DecisionCriteria::Boundary,
        description: "Feed-forward read coalescing",
        applicable_taxonomies: &["FRM"],
    },
    OptimizationStrategy {
        name: "bum_merging",
        opt_type: OptimizationType::Reuse,
        scope: OptimizationScope::Region,
        criteria: DecisionCriteria::Boundary,
        description: "Backprop update merging for hash table updates",
        applicable_taxonomies: &["BUM"],
    },
    OptimizationStrategy {
        name: "early_ray_termination",
        opt_type: OptimizationType::Skip,
        scope: OptimizationScope::Element,
        criteria: DecisionCriteria::Threshold,
        description: "Terminate rays early based on accumulated opacity",
        applicable_taxonomies: &["VOLUME_RENDERING"],
    },
    OptimizationStrategy {
        name: "sparse_radiance_warping",
        opt_type: OptimizationType::Reuse,
        scope: OptimizationScope::Frame,
        criteria: DecisionCriteria::Threshold,
        description: "Reuse pixels with similar ray directions across frames",
        applicable_taxonomies: &["*"],
    },
    OptimizationStrategy {
        name: "low_bit_sampling",
        opt_type: OptimizationType::LowBit,
        scope: OptimizationScope::Element,
        criteria: DecisionCriteria::Threshold,
        description: "Use reduced precision for importance sampling",
        applicable_taxonomies: &["SAMPLING"],
    },
    OptimizationStrategy {
        name: "restricted_hashing",
        opt_type: OptimizationType::Reuse,
        scope: OptimizationScope::Region,
        criteria: DecisionCriteria::Boundary,
        description: "Process rays within spatial subgrids for hash table locality",
        applicable_taxonomies: &["HASH_ENCODE"],
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tile_culling_scales_s_comp_by_active_ratio() {
        let lib = OptimizationLibrary::with_builtin_strategies();
        let mut hints = HashMap::new();
        hints.insert("active_samples_ratio".to_string(), 0.4);
        let applied = lib.apply("BLENDING", &hints);
        assert!((applied.s_comp - 0.4).abs() < 1e-9);
        assert_eq!(applied.r_bytes, 1.0);
        assert_eq!(applied.applied_strategies, vec!["tile_culling".to_string()]);
    }

    #[test]
    fn unapplicable_taxonomy_yields_neutral_factors() {
        let lib = OptimizationLibrary::with_builtin_strategies();
        let applied = lib.apply("POSITIONAL_ENCODE", &HashMap::new());
        assert_eq!(applied.s_comp, 1.0);
        assert_eq!(applied.r_bytes, 1.0);
        assert!(applied.applied_strategies.is_empty());
    }

    #[test]
    fn missing_param_degrades_to_neutral_with_warning() {
        let lib = OptimizationLibrary::with_builtin_strategies();
        let applied = lib.apply("HASH_ENCODE", &HashMap::new());
        assert_eq!(applied.s_comp, 1.0);
        assert_eq!(applied.r_bytes, 1.0);
        assert!(applied.applied_strategies.is_empty());
        assert_eq!(
            applied.missing_params,
            vec![("restricted_hashing".to_string(), "subgrid_locality_ratio".to_string())]
        );
    }

    #[test]
    fn missing_param_strategy_applies_when_hint_present() {
        let lib = OptimizationLibrary::with_builtin_strategies();
        let mut hints = HashMap::new();
        hints.insert("subgrid_locality_ratio".to_string(), 0.5);
        let applied = lib.apply("HASH_ENCODE", &hints);
        assert!(applied.missing_params.is_empty());
        assert_eq!(applied.s_comp, 0.5);
    }

    #[test]
    fn multiple_strategies_compose_multiplicatively() {
        let lib = OptimizationLibrary::with_builtin_strategies();
        let mut hints = HashMap::new();
        hints.insert("frame_reuse_ratio".to_string(), 0.0);
        hints.insert("active_samples_ratio".to_string(), 0.5);
        // sparse_radiance_warping applies to "*", tile_culling to BLENDING
        let applied = lib.apply("BLENDING", &hints);
        assert!((applied.s_comp - 0.5).abs() < 1e-9);
    }

    #[test]
    fn additional_valid_strategy_never_increases_factors_above_prestrategy_value() {
        let lib = OptimizationLibrary::with_builtin_strategies();
        let mut hints = HashMap::new();
        hints.insert("active_samples_ratio".to_string(), 0.9);
        let one_strategy = lib.apply("BLENDING", &hints);
        hints.insert("frame_reuse_ratio".to_string(), 0.1);
        let two_strategies = lib.apply("BLENDING", &hints);
        assert!(two_strategies.s_comp <= one_strategy.s_comp);
        assert!(two_strategies.r_bytes <= 1.0);
    }
}
