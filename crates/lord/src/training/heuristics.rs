//! Heuristic metrics for scoring candidate rules.
//!
//! A heuristic maps the coverage counts of a rule to a score; search keeps
//! the candidate with the highest score. Every metric is a small struct
//! implementing [`HeuristicFn`], and [`Heuristic`] wraps them for runtime
//! selection.
//!
//! # Available Heuristics
//!
//! - [`Precision`]: `p / (n + p)`
//! - [`Laplace`]: `(p + 1) / (n + p + 2)`
//! - [`MEstimate`]: `(p + m·P/|D|) / (n + p + m)` (default, `m = 0.1`)
//! - [`Entropy`]: binary entropy of the rule's precision
//! - [`Gini`]: `p·n / (n + p)²`
//! - [`Cosine`]: `p / sqrt((n + p)·P)`
//! - [`RelativeCost`]: `c·p/P − (1 − c)·n/N`
//! - [`LinearCost`]: `c·p − (1 − c)·n`
//! - [`MRelativeLaplace`]: `(p/P + m/2) / (p/P + n/N + m)`
//!
//! Undefined ratios evaluate to NaN, which never beats another candidate.

// =============================================================================
// Rule Statistics
// =============================================================================

/// Coverage counts of a candidate rule against the training set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RuleStats {
    /// Rows covered by the body (`n + p`).
    pub covered: f64,
    /// Covered rows of the head class.
    pub p: f64,
    /// Covered rows of other classes.
    pub n: f64,
    /// Training rows (`|D|`).
    pub total: f64,
    /// Rows of the head class (`P`).
    pub positives: f64,
    /// Rows of other classes (`N`).
    pub negatives: f64,
}

impl RuleStats {
    pub fn new(covered: u32, p: u32, total: u32, positives: u32) -> Self {
        debug_assert!(p <= covered && positives <= total);
        Self {
            covered: covered as f64,
            p: p as f64,
            n: (covered - p) as f64,
            total: total as f64,
            positives: positives as f64,
            negatives: (total - positives) as f64,
        }
    }
}

// =============================================================================
// HeuristicFn Trait
// =============================================================================

/// A rule scoring function. Higher is better.
pub trait HeuristicFn: Send + Sync {
    fn evaluate(&self, stats: &RuleStats) -> f64;

    fn name(&self) -> &'static str;
}

// =============================================================================
// Heuristics
// =============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Precision;

impl HeuristicFn for Precision {
    fn evaluate(&self, s: &RuleStats) -> f64 {
        s.p / s.covered
    }

    fn name(&self) -> &'static str {
        "precision"
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Laplace;

impl HeuristicFn for Laplace {
    fn evaluate(&self, s: &RuleStats) -> f64 {
        (s.p + 1.0) / (s.covered + 2.0)
    }

    fn name(&self) -> &'static str {
        "laplace"
    }
}

/// Precision shrunk towards the class prior by `m` virtual rows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MEstimate {
    pub m: f64,
}

impl Default for MEstimate {
    fn default() -> Self {
        Self { m: 0.1 }
    }
}

impl HeuristicFn for MEstimate {
    fn evaluate(&self, s: &RuleStats) -> f64 {
        (s.p + self.m * s.positives / s.total) / (s.covered + self.m)
    }

    fn name(&self) -> &'static str {
        "m-estimate"
    }
}

/// Binary entropy of the rule's precision (`0·ln 0 = 0`).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Entropy;

impl HeuristicFn for Entropy {
    fn evaluate(&self, s: &RuleStats) -> f64 {
        let r = s.p / s.covered;
        let term = |x: f64| if x > 0.0 { x * x.ln() } else { 0.0 };
        -(term(r) + term(1.0 - r))
    }

    fn name(&self) -> &'static str {
        "entropy"
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Gini;

impl HeuristicFn for Gini {
    fn evaluate(&self, s: &RuleStats) -> f64 {
        s.p * s.n / (s.covered * s.covered)
    }

    fn name(&self) -> &'static str {
        "gini"
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Cosine;

impl HeuristicFn for Cosine {
    fn evaluate(&self, s: &RuleStats) -> f64 {
        s.p / (s.covered * s.positives).sqrt()
    }

    fn name(&self) -> &'static str {
        "cosine"
    }
}

/// Weighted difference of true-positive and false-positive rates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RelativeCost {
    pub cost: f64,
}

impl Default for RelativeCost {
    fn default() -> Self {
        Self { cost: 0.5 }
    }
}

impl HeuristicFn for RelativeCost {
    fn evaluate(&self, s: &RuleStats) -> f64 {
        self.cost * s.p / s.positives - (1.0 - self.cost) * s.n / s.negatives
    }

    fn name(&self) -> &'static str {
        "relative-cost"
    }
}

/// Weighted difference of covered positives and negatives.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearCost {
    pub cost: f64,
}

impl Default for LinearCost {
    fn default() -> Self {
        Self { cost: 0.5 }
    }
}

impl HeuristicFn for LinearCost {
    fn evaluate(&self, s: &RuleStats) -> f64 {
        self.cost * s.p - (1.0 - self.cost) * s.n
    }

    fn name(&self) -> &'static str {
        "linear-cost"
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MRelativeLaplace {
    pub m: f64,
}

impl Default for MRelativeLaplace {
    fn default() -> Self {
        Self { m: 0.1 }
    }
}

impl HeuristicFn for MRelativeLaplace {
    fn evaluate(&self, s: &RuleStats) -> f64 {
        let tpr = s.p / s.positives;
        (tpr + self.m / 2.0) / (tpr + s.n / s.negatives + self.m)
    }

    fn name(&self) -> &'static str {
        "m-relative-laplace"
    }
}

// =============================================================================
// Heuristic Enum (Convenience wrapper)
// =============================================================================

/// A heuristic chosen at runtime.
///
/// Each variant wraps its corresponding struct type directly, so the enum
/// delegates without per-call construction.
///
/// # Example
///
/// ```
/// use lord::training::{Heuristic, HeuristicFn, RuleStats};
///
/// let h = Heuristic::m_estimate(0.1);
/// let score = h.evaluate(&RuleStats::new(10, 8, 100, 40));
/// assert!(score > 0.79 && score < 0.81);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Heuristic {
    Precision(Precision),
    Laplace(Laplace),
    MEstimate(MEstimate),
    Entropy(Entropy),
    Gini(Gini),
    Cosine(Cosine),
    RelativeCost(RelativeCost),
    LinearCost(LinearCost),
    MRelativeLaplace(MRelativeLaplace),
}

impl Default for Heuristic {
    fn default() -> Self {
        Self::MEstimate(MEstimate::default())
    }
}

impl Heuristic {
    // =========================================================================
    // Convenience Constructors
    // =========================================================================

    pub fn precision() -> Self {
        Self::Precision(Precision)
    }

    pub fn laplace() -> Self {
        Self::Laplace(Laplace)
    }

    pub fn m_estimate(m: f64) -> Self {
        Self::MEstimate(MEstimate { m })
    }

    pub fn entropy() -> Self {
        Self::Entropy(Entropy)
    }

    pub fn gini() -> Self {
        Self::Gini(Gini)
    }

    pub fn cosine() -> Self {
        Self::Cosine(Cosine)
    }

    pub fn relative_cost(cost: f64) -> Self {
        Self::RelativeCost(RelativeCost { cost })
    }

    pub fn linear_cost(cost: f64) -> Self {
        Self::LinearCost(LinearCost { cost })
    }

    pub fn m_relative_laplace(m: f64) -> Self {
        Self::MRelativeLaplace(MRelativeLaplace { m })
    }

    /// The metric's parameter, if it has one, with its name.
    pub fn parameter(&self) -> Option<(&'static str, f64)> {
        match self {
            Self::MEstimate(h) => Some(("m", h.m)),
            Self::MRelativeLaplace(h) => Some(("m", h.m)),
            Self::RelativeCost(h) => Some(("cost", h.cost)),
            Self::LinearCost(h) => Some(("cost", h.cost)),
            _ => None,
        }
    }
}

impl HeuristicFn for Heuristic {
    #[inline]
    fn evaluate(&self, stats: &RuleStats) -> f64 {
        match self {
            Self::Precision(h) => h.evaluate(stats),
            Self::Laplace(h) => h.evaluate(stats),
            Self::MEstimate(h) => h.evaluate(stats),
            Self::Entropy(h) => h.evaluate(stats),
            Self::Gini(h) => h.evaluate(stats),
            Self::Cosine(h) => h.evaluate(stats),
            Self::RelativeCost(h) => h.evaluate(stats),
            Self::LinearCost(h) => h.evaluate(stats),
            Self::MRelativeLaplace(h) => h.evaluate(stats),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::Precision(h) => h.name(),
            Self::Laplace(h) => h.name(),
            Self::MEstimate(h) => h.name(),
            Self::Entropy(h) => h.name(),
            Self::Gini(h) => h.name(),
            Self::Cosine(h) => h.name(),
            Self::RelativeCost(h) => h.name(),
            Self::LinearCost(h) => h.name(),
            Self::MRelativeLaplace(h) => h.name(),
        }
    }
}
