//! 对外 HTTP 客户端

pub mod joke_client;
pub mod llm_client;
pub mod modal_client;
pub mod upstream;
pub mod webhook_client;
pub mod word_client;

pub use joke_client::{JokeClient, JokeKind};
pub use llm_client::LlmClient;
pub use modal_client::{ModalClient, ModalTarget};
pub use webhook_client::{WebhookClient, WebhookTarget};
pub use word_client::WordClient;
