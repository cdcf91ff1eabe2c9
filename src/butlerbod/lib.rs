//! # ButlerBod Architecture
//!
//! ButlerBod keeps two small record collections, **rooms** and **types**, in a
//! partitioned table store. It is a library with a thin CLI on top; the same
//! core could sit behind an HTTP front end.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (main.rs, args.rs)                               │
//! │  - Parses arguments, prints results, sets the exit code     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - One TableCollection per collection kind                  │
//! │  - Input checks, dispatch to commands                       │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - list / add / get / update, returning CmdResult           │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Collection (collection.rs)                                 │
//! │  - Partition-scoped CRUD, row key generation                │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - TableStore trait                                         │
//! │  - FsTableStore (CLI), MemTableStore (testing)              │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## No I/O Assumptions in Core
//!
//! From `api.rs` inward, code takes plain Rust arguments and returns
//! `Result` values. It never writes to stdout/stderr and never exits the
//! process. Diagnostics go through `tracing`; installing a subscriber is the
//! binary's job (see [`logging`]).
//!
//! ## Async
//!
//! Every store call is async. Each operation suspends only while waiting on
//! the store and resumes with that call's result; there is no other
//! scheduling, caching or batching.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade
//! - [`commands`]: Route handlers for each operation
//! - [`collection`]: The partition-scoped CRUD wrapper
//! - [`store`]: Table store abstraction and implementations
//! - [`query`]: Filter criteria for listing
//! - [`model`]: `Item`, `ItemFields`, `CollectionKind`
//! - [`config`]: Configuration management
//! - [`logging`]: `tracing` subscriber setup for binaries
//! - [`error`]: Error types

pub mod api;
pub mod collection;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod query;
pub mod store;
