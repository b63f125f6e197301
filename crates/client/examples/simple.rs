//! Simple Listing Example
//!
//! Lists one connection's queue and prints what comes back.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example simple -- http://localhost:8080/nifi-api/connections/<id>
//! ```

use queue_listing_client::{ClientOptions, HttpTransport};
use queue_listing_core::domain::{JobTarget, ListingRequest, ListingResult};
use queue_listing_core::port::{Notice, RenderSink};
use queue_listing_core::{JobOutcome, ListingController};
use std::sync::Arc;
use std::time::Duration;

struct PrintSink;

impl RenderSink for PrintSink {
    fn progress(&self, percent: u8, state_label: &str) {
        println!("   {:>3}% {}", percent, state_label);
    }

    fn replace_items(&self, result: &ListingResult) {
        for item in &result.items {
            println!(
                "   {} {}",
                item.uuid,
                item.filename.as_deref().unwrap_or("-")
            );
        }
    }

    fn notify(&self, notice: Notice) {
        println!("   ! {}", notice);
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let connection = std::env::args()
        .nth(1)
        .ok_or("usage: simple <connection-uri>")?;

    println!("Queue Listing - Simple Example");
    println!("==============================\n");

    let transport = Arc::new(HttpTransport::new(ClientOptions::default())?);
    let controller = ListingController::new(transport, Arc::new(PrintSink));

    println!("1. Listing {}...", connection);
    let outcome = controller
        .start(&JobTarget::new(connection), ListingRequest::default())
        .await?;

    // The job is deleted in the background; give it a moment before exiting.
    if tokio::time::timeout(Duration::from_secs(5), controller.wait_for_releases())
        .await
        .is_err()
    {
        println!("   ! listing request may still be on the server");
    }

    match outcome {
        JobOutcome::Success(result) => println!(
            "\n✓ {} of {} flowfiles ({} bytes)",
            result.items.len(),
            result.total_count,
            result.total_bytes
        ),
        other => println!("\n✗ Listing ended: {}", other.label()),
    }

    Ok(())
}
