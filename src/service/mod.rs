//! Service integrations for external APIs and clients.
//!
//! This module contains the services used by comment-digest:
//! - LLM services (e.g., OpenAI)
//! - Key-point extraction on top of an LLM service
//! - Comment storage (e.g., in-memory)
//!
//! Each service module defines both generic traits and concrete implementations,
//! allowing for extensibility and easy testing.

pub mod extractor;
pub mod llm;
pub mod store;
