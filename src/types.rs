/// Rank of a participant in a process group (0-indexed).
pub type Rank = u32;

/// Element types that can travel through a sorted allgather.
///
/// The crate defines its own bound instead of reusing an ecosystem trait so
/// it stays usable with any fixed-width ordered type. All ranks in a group
/// must call with the same `T`.
pub trait Element: Copy + Ord + Send + Sync + std::fmt::Debug + 'static {}

impl<T> Element for T where T: Copy + Ord + Send + Sync + std::fmt::Debug + 'static {}

/// The merge-scheduling algorithm driving a sorted allgather.
///
/// All three produce the identical globally sorted result; they differ in
/// round count and data movement. `Dissemination` and `Circulant` finish in
/// O(log P) exchange rounds and are correct for any group size, including
/// non-powers of two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum Algorithm {
    /// Full gather followed by a local merge-sort tree.
    Baseline = 0,
    /// Hypercube dissemination with a side channel for the non-power-of-two
    /// remainder.
    #[default]
    Dissemination = 1,
    /// Circulant doubling/folding driven by a precomputed skip sequence.
    Circulant = 2,
}

impl Algorithm {
    /// Human-readable name.
    pub const fn name(self) -> &'static str {
        match self {
            Algorithm::Baseline => "baseline",
            Algorithm::Dissemination => "dissemination",
            Algorithm::Circulant => "circulant",
        }
    }
}

impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Algorithm {
    type Err = String;

    /// Accepts the algorithm name or its numeric index (`"0"`, `"1"`, `"2"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "baseline" | "0" => Ok(Algorithm::Baseline),
            "dissemination" | "1" => Ok(Algorithm::Dissemination),
            "circulant" | "2" => Ok(Algorithm::Circulant),
            other => Err(format!("unknown algorithm: {other}")),
        }
    }
}
