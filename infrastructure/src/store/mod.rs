//! Session store adapters
//!
//! Both implement the same contract: `load` returns the last saved
//! session for an id, or `None` if it was never saved.

mod file;
mod memory;

pub use file::FileSessionStore;
pub use memory::MemorySessionStore;
