pub mod azure;
pub mod provider;
pub mod types;

pub use azure::AzureOpenAiProvider;
pub use provider::ChatProvider;
pub use types::{ChatMessage, ChatRequest};
