//! Stead Store
//!
//! The document store gateway. Five operations (add, get, query, update,
//! delete) over named schemaless collections, behind the [`DocumentStore`]
//! trait. Two backends: [`MongoStore`] for production, [`MemoryStore`] for
//! tests and local development. Both enforce the same contract:
//!
//! - failures surface as tagged `{code, message}` values, never as the
//!   underlying driver error;
//! - platform timestamp types are normalized to ISO-8601 strings before a
//!   document leaves the gateway;
//! - `get` on a missing id is `Ok(None)`, not an error; `delete` on a
//!   missing id is the error `"Document does not exist"`.

pub mod memory;
pub mod mongo;
pub mod normalize;
pub mod query;
pub mod store;

pub use memory::MemoryStore;
pub use mongo::MongoStore;
pub use query::{Direction, Filter, FilterOp, QueryOptions};
pub use store::{DocumentStore, Invalidations};
