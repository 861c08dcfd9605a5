//! Configuration for the distributed SpGEMM kernel

/// Magnitude at or below which a computed entry is treated as a structural zero
pub const DEFAULT_DROP_TOLERANCE: f64 = 1e-10;

/// What to do with the trailing `rows % world_size` rows of A
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RemainderPolicy {
    /// Every rank owns `rows / world_size` rows; trailing rows belong to no
    /// rank and are absent from the result
    #[default]
    Truncate,
    /// Fail validation unless the rows divide evenly
    Reject,
    /// The last rank also owns the trailing rows
    AbsorbIntoLast,
}

/// Configuration for a distributed multiplication
#[derive(Debug, Clone)]
pub struct SpgemmConfig {
    /// Entries with `|value| <= drop_tolerance` are dropped from the result
    pub drop_tolerance: f64,

    /// Rank that assembles the result and broadcasts it
    pub root: usize,

    /// Handling of rows left over by the block split
    pub remainder: RemainderPolicy,

    /// Also require distinct rows within each column; when off, repeated
    /// rows are summed. Bounds and pointer checks apply either way.
    pub strict_structure: bool,
}

impl Default for SpgemmConfig {
    fn default() -> Self {
        Self {
            drop_tolerance: DEFAULT_DROP_TOLERANCE,
            root: 0,
            remainder: RemainderPolicy::Truncate,
            strict_structure: true,
        }
    }
}

impl SpgemmConfig {
    /// Override the drop tolerance
    pub fn with_drop_tolerance(mut self, tol: f64) -> Self {
        self.drop_tolerance = tol;
        self
    }

    /// Override the coordinating rank
    pub fn with_root(mut self, root: usize) -> Self {
        self.root = root;
        self
    }

    /// Override the remainder policy
    pub fn with_remainder(mut self, policy: RemainderPolicy) -> Self {
        self.remainder = policy;
        self
    }

    /// Toggle the distinct-rows check
    pub fn with_strict_structure(mut self, strict: bool) -> Self {
        self.strict_structure = strict;
        self
    }
}
