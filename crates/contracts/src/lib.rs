//! # Contracts
//!
//! Frozen interface contracts shared by every crate in the workspace.
//! Business crates depend on this crate only; reverse dependencies are prohibited.
//!
//! ## Data model
//! - [`Record`]: one scraped listing, an ordered `String -> String` map
//! - [`Destination`]: where a batch goes (local file or remote endpoint)
//! - [`DeliveryOutcome`]: result of a retrying remote delivery

mod blueprint;
mod delivery;
mod destination;
mod error;
mod observer;
mod record;
mod sink;

pub use blueprint::*;
pub use delivery::DeliveryOutcome;
pub use destination::{Destination, OutputFormat};
pub use error::*;
pub use observer::{EventLevel, NoopObserver, Observer, RecordingObserver};
pub use record::Record;
pub use sink::*;
