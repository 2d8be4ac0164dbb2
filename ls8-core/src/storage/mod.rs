mod ram;

pub use ram::{MemoryError, RamStats, RAM};
