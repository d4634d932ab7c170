// Collectors: turn raw sampler text into typed snapshots. None of them fail; every error is
// logged and replaced by a fallback value.

pub mod cpu;
pub mod docker;
pub mod memory;

pub use cpu::collect_cpu;
pub use docker::{list_containers, list_containers_detailed};
pub use memory::{MemoryStrategy, collect_memory};
