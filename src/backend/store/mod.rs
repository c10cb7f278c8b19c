//! Store Implementations
//!
//! Two backings for the user, graph, and message store traits:
//!
//! - **`postgres`** - the production store, one `PgStore` over a sqlx pool,
//!   multi-statement mutations wrapped in transactions
//! - **`memory`** - plain maps behind a single `RwLock`; used when no
//!   `DATABASE_URL` is configured and throughout the test suite
//!
//! Both implement the same traits, so everything above the store boundary
//! is indifferent to which one is wired in.

/// In-memory store
pub mod memory;

/// PostgreSQL store
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;
