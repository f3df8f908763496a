//! In-memory response cache
//!
//! Weather payloads are kept per city for a fixed TTL. Expired entries are
//! hidden from reads immediately and physically removed by a periodic
//! [`Sweeper`] task.

mod clock;
mod store;
mod sweeper;

pub use clock::{Clock, ManualClock, SystemClock};
pub use store::TtlCache;
pub use sweeper::Sweeper;
