pub mod confman;
pub mod error;
pub mod handle;
pub mod heap;
pub mod logger;
pub mod notify;
pub mod progbase;
pub mod rolling_median;
pub mod sample;

pub use error::{Error, Result};
pub use handle::{ArenaId, Handle, NodeArena};
pub use heap::{HeapId, IndexedHeap, Orientation};
pub use rolling_median::RollingMedian;
pub use sample::Sample;
