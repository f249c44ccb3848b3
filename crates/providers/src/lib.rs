//! Chat-completion backends and the relay that prepares requests for them.

pub mod openai_compatible;
pub mod relay;
pub mod traits;
pub mod types;

pub use openai_compatible::OpenAICompatibleBackend;
pub use relay::{CompletionRelay, RelayError};
pub use traits::{CompletionBackend, ProviderError};
pub use types::{ChatCompletionRequest, CompletionReply};
