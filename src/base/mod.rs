//! Core components, types, and utilities for comment-digest.
//!
//! This module contains fundamental building blocks used throughout the application:
//! - Configuration handling and environment variables.
//! - The extraction prompt and its loader.
//! - The retry policy wrapped around LLM calls.
//! - Common types and result handling.

pub mod config;
pub mod prompts;
pub mod retry;
pub mod types;
