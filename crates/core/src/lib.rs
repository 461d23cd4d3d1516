//! Core library for scribe
//!
//! This crate implements the **Functional Core** of the scribe application,
//! following the Functional Core - Imperative Shell architectural pattern.
//!
//! # Architecture Overview
//!
//! The scribe project uses a two-crate architecture to enforce separation of concerns:
//!
//! - **`scribe_core`** (this crate): Pure transformation functions with zero I/O
//! - **`scribe`**: I/O operations and orchestration (the Imperative Shell)
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
//! The core crate is organized along the resolution pipeline:
//!
//! - [`directive`]: Embedded-instruction parsing (model, temperature, prompt, context)
//! - [`prompt`]: Generation-request assembly from parsed instructions and defaults
//! - [`fence`]: Fenced-block extraction from model responses
//! - [`completion`]: Completion-choice decoding for the completion-assist flow
//! - [`position`]: Protocol position math (UTF-16 columns, range slicing and editing)
//!
//! Each module contains domain models, the pure transformation functions over
//! them, and unit tests driven by fixture data.
//!
//! # Example Usage
//!
//! ```rust,ignore
//! use scribe_core::directive::parse;
//! use scribe_core::prompt::{build_request, RequestDefaults};
//!
//! let parsed = parse("// model: local-coder\n//% add error handling\nfn read() {}");
//! assert_eq!(parsed.model.as_deref(), Some("local-coder"));
//!
//! let request = build_request(&parsed, &RequestDefaults {
//!     model: "fallback".to_string(),
//!     temperature: 0.3,
//!     system: "You rewrite code.".to_string(),
//! });
//! assert_eq!(request.model, "local-coder");
//! ```
//!
//! # Pattern Reference
//!
//! This architecture is based on Gary Bernhardt's Functional Core, Imperative Shell pattern.
//! The key insight: **data transformation logic should be pure and ignorant of where data
//! comes from or where it goes**.

pub mod completion;
pub mod directive;
pub mod fence;
pub mod position;
pub mod prompt;
