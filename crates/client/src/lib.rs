//! Queue Listing Client - HTTP transport
//!
//! Implements the core `ListingTransport` port against the REST
//! listing-request resource, and fetches flow-unit details and content.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use queue_listing_client::{ClientOptions, HttpTransport};
//! use queue_listing_core::domain::{JobTarget, ListingRequest};
//! use queue_listing_core::port::render_sink::mocks::RecordingSink;
//! use queue_listing_core::ListingController;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let transport = Arc::new(HttpTransport::new(ClientOptions::default())?);
//!     let controller = ListingController::new(transport, Arc::new(RecordingSink::new()));
//!
//!     let target = JobTarget::new("http://localhost:8080/nifi-api/connections/abc");
//!     let outcome = controller.start(&target, ListingRequest::default()).await?;
//!     println!("Listing finished: {}", outcome.label());
//!
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod types;

pub use client::{ClientOptions, HttpTransport};
pub use error::{ClientError, Result};
pub use types::{FlowFileEntity, ListingRequestEntity};
