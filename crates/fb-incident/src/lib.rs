//! `fb-incident` — reported incidents and the shared incident queue.
//!
//! | Module       | Contents                                        |
//! |--------------|-------------------------------------------------|
//! | [`incident`] | `Severity`, `Incident`                          |
//! | [`store`]    | `IncidentStore` (mutex-guarded FIFO + counter)  |
//! | [`error`]    | `IncidentError`, `IncidentResult<T>`            |

pub mod error;
pub mod incident;
pub mod store;


pub use error::{IncidentError, IncidentResult};
pub use incident::{Incident, Severity};
pub use store::{IncidentSnapshot, IncidentStore};
