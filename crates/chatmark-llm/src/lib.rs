pub mod error;
pub mod gateway;
pub mod provider;
pub mod providers;
pub mod transformer;

pub use error::{ConversionError, LLMError, Result};
pub use gateway::{CompletionGateway, ADVISORY_REPLY, EMPTY_REPLY, ERROR_PREFIX};
pub use provider::{BaseProvider, CompletionProvider, ProviderConfig};
pub use providers::OpenAiProvider;
pub use transformer::{OpenAiTransformer, SchemaTransformer};
