//! Crypto assistant chat for the dashboard API.
//!
//! Exposes the [`CryptoAssistant`] trait, the OpenAI-backed
//! [`ChatService`], and a [`FakeAssistant`] for tests.

pub mod chat;
pub mod error;

pub use chat::{
    ChatConfig, ChatService, CryptoAssistant, FakeAssistant, CRYPTO_ASSISTANT_PROMPT,
    FALLBACK_ERROR, FALLBACK_NO_KEY,
};
pub use error::AiError;
