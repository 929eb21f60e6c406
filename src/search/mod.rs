pub mod client;
pub mod retriever;
pub mod types;

pub use client::{AzureSearchClient, SearchApi};
pub use retriever::DocumentRetriever;
pub use types::{IncidentDocument, Retrieval, SearchMode, SearchRequest};
