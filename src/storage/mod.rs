pub mod blob;
pub mod connection;
pub mod sas;

pub use blob::{BlobPublisher, PublishOutcome};
pub use connection::ConnectionString;
