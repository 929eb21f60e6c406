pub mod answer;
pub mod context;
pub mod pipeline;

pub use answer::{AnswerGenerator, QueryType};
pub use context::compose_context;
pub use pipeline::{ChatOutcome, ChatService};
