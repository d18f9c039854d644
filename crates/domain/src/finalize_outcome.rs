use std::fmt;

/// How a single finalization attempt ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinalizeOutcome {
    /// The response did not start with a CNAME, or the question was itself CNAME.
    NotApplicable,
    /// The answer section was replaced with `answers` flattened address records.
    Finalized { answers: usize, hops: usize },
    /// Terminal records already in the response were adopted without a lookup.
    AdoptedExisting { answers: usize },
    CircularReference { hops: usize },
    MaxDepthReached { hops: usize },
    UpstreamError { hops: usize },
    DanglingAlias { hops: usize },
    UnsupportedType { hops: usize },
}

impl FinalizeOutcome {
    /// True when the answer section was rewritten.
    pub fn is_rewritten(&self) -> bool {
        matches!(
            self,
            FinalizeOutcome::Finalized { .. } | FinalizeOutcome::AdoptedExisting { .. }
        )
    }

    /// True when the chain was walked but the original answer was kept.
    pub fn is_failure(&self) -> bool {
        !self.is_rewritten() && *self != FinalizeOutcome::NotApplicable
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FinalizeOutcome::NotApplicable => "not_applicable",
            FinalizeOutcome::Finalized { .. } => "finalized",
            FinalizeOutcome::AdoptedExisting { .. } => "adopted_existing",
            FinalizeOutcome::CircularReference { .. } => "circular_reference",
            FinalizeOutcome::MaxDepthReached { .. } => "max_depth_reached",
            FinalizeOutcome::UpstreamError { .. } => "upstream_error",
            FinalizeOutcome::DanglingAlias { .. } => "dangling_alias",
            FinalizeOutcome::UnsupportedType { .. } => "unsupported_type",
        }
    }
}

impl fmt::Display for FinalizeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
