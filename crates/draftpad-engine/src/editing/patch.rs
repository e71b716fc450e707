/// Result of one coordinator pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Patch {
    /// Snapshot version produced by the pass
    pub version: u64,
    /// Generation of the selection restore the pass scheduled
    pub restore_generation: u64,
}
