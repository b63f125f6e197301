// Queue Listing Core - Domain, Ports & Listing Lifecycle
// NO transport or rendering dependencies

pub mod application;
pub mod domain;
pub mod error;
pub mod port;

pub use application::{JobOutcome, ListingController, ListingFailure};
pub use error::{ListingError, Result};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
