//! File storage backends.

mod disk;
mod memory;

pub use disk::DiskFileStore;
pub use memory::MemoryFileStore;
