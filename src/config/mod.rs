//! Configuration module for Folio.
//!
//! Handles application settings, remote-service credentials and prompt templates.

mod credentials;
mod prompts;
mod settings;

pub use credentials::{lookup_variable, mask, Credentials, REQUIRED_VARIABLES};
pub use prompts::{Prompts, RagPrompts};
pub use settings::{
    ChunkingSettings, EmbeddingSettings, GeneralSettings, PromptSettings, RagSettings,
    ServerSettings, Settings, VectorStoreSettings,
};
