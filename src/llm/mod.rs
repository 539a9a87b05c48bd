pub mod factory;
pub mod gateway;
pub mod parser;
pub mod providers;
pub mod retry;

pub use factory::ProviderFactory;
pub use gateway::{Gateway, GatewayError};
pub use parser::{parse_json_object, ParseError};
pub use providers::{GenerationParams, LlmMetadata, LlmProvider, LlmProviderError};
pub use retry::{retry_with_policy, RetryFailure, RetryPolicy};
