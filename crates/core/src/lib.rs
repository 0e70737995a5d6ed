//! Core library for sptools
//!
//! This crate implements the **Functional Core** of the sptools application,
//! following the Functional Core - Imperative Shell architectural pattern.
//!
//! # Architecture Overview
//!
//! The sptools project uses a two-crate architecture to enforce separation of concerns:
//!
//! - **`sptools_core`** (this crate): Pure transformation functions with zero I/O
//! - **`sptools`**: I/O operations and orchestration (the Imperative Shell)
//!
//! ## Functional Core Principles
//!
//! All functions in this crate adhere to these principles:
//!
//! - **Pure functions**: Same input always produces the same output
//! - **No side effects**: No I/O operations, no external state mutations
//! - **Deterministic**: Behavior is predictable and reproducible
//! - **Testable**: Can be tested with simple fixture data, no mocking required
//!
//! # Module Organization
//!
//! The core crate is organized by domain:
//!
//! - [`types`]: Request, report, and dialect types shared across the application
//! - [`prompt`]: Prompt assembly for contract generation and debugging
//! - [`extract`]: Code-fence stripping and fenced-block extraction
//! - [`report`]: Parsing of structured debug responses
//! - [`flow`]: State machines for the generator and debugger flows
//!
//! Each module contains:
//!
//! - **Domain models**: Structured types representing requests and model output
//! - **Transformation functions**: Pure functions over those models
//! - **Comprehensive tests**: Unit tests using fixture data (no mocking)
//!
//! # Example Usage
//!
//! ```rust
//! use sptools_core::prompt::build_generation_prompt;
//! use sptools_core::types::{Dialect, GenerationRequest};
//!
//! // Create fixture data (no HTTP required)
//! let request = GenerationRequest {
//!     description: "token contract with mint".to_string(),
//!     dialect: Dialect::Modern,
//! };
//!
//! // Transform using pure function
//! let prompt = build_generation_prompt(&request);
//!
//! // Assert on results (no mocking needed)
//! assert!(prompt.contains("token contract with mint"));
//! assert!(prompt.contains("sp.address"));
//! ```
//!
//! # Pattern Reference
//!
//! This architecture is based on Gary Bernhardt's Functional Core, Imperative Shell pattern.
//! The key insight: **data transformation logic should be pure and ignorant of where data
//! comes from or where it goes**.

pub mod extract;
pub mod flow;
pub mod prompt;
pub mod report;
pub mod types;
