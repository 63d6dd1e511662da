//! Concrete [`VisionModel`](crate::VisionModel) implementations.
//!
//! The engine is provider-agnostic; anything that can turn an image and a
//! prompt into text plugs in through the trait. [`OllamaVision`] talks to
//! a local or remote Ollama instance.

pub mod ollama;

pub use ollama::OllamaVision;
