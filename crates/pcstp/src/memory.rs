//! The host-memory probe contract.
//!
//! dapcstp reads `/proc/self/stat` (or the Win32 process-memory API) from
//! inside the solver itself. That is a collaborator concern here: the core
//! only ever calls a trait object, so tests can stub it out and the CLI
//! crate owns the real `/proc/self/statm` implementation.

/// Returns the current resident-set size, in megabytes.
pub trait MemoryProbe {
    fn used_mb(&mut self) -> u64;
}

/// A probe that always reports zero usage, for tests and for callers that
/// never want the memory limit to trigger.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullMemoryProbe;

impl MemoryProbe for NullMemoryProbe {
    fn used_mb(&mut self) -> u64 {
        0
    }
}

impl<F: FnMut() -> u64> MemoryProbe for F {
    fn used_mb(&mut self) -> u64 {
        (self)()
    }
}
