//! Data sources: transports for raw CSV text and the synthetic sample generator.

pub mod sample;
pub mod transport;

pub use sample::{SampleConfig, generate_sample_csv};
pub use transport::{FileTransport, HttpTransport, MemoryTransport, Transport};
