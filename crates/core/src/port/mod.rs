// Port Layer - Interfaces for external collaborators

pub mod render_sink;
pub mod transport;

// Re-exports
pub use render_sink::{Notice, RenderSink};
pub use transport::{ListingTransport, TransportError};
