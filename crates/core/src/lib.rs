//! Core library for bggtools
//!
//! This crate implements the **Functional Core** of the bggtools application,
//! following the Functional Core - Imperative Shell architectural pattern.
//!
//! # Architecture Overview
//!
//! The bggtools project uses a two-crate architecture to enforce separation
//! of concerns:
//!
//! - **`bggtools_core`** (this crate): Pure transformation functions with zero I/O
//! - **`bggtools`**: HTTP serving and upstream fetching (the Imperative Shell)
//!
//! Every converter in this crate takes the raw XML of one BoardGameGeek
//! xmlapi2 document (plus optional filter parameters) and projects it into a
//! JSON-serializable output record. Converters never perform I/O, never touch
//! shared state, and never fail on missing or malformed optional fields —
//! those degrade to `None` or a documented default instead.
//!
//! # Module Organization
//!
//! - [`xml`]: Shared lookup helpers over BGG's attribute-heavy documents
//! - [`hot`]: The "hot games" list
//! - [`user`]: User profiles with buddy lists
//! - [`plays`]: Logged plays, optionally with per-play player records
//! - [`collection`]: User collections, including BGG's async-export placeholder
//! - [`search`]: Search results bucketed by item type
//! - [`thing`]: Full game details (links, polls, ratings)
//! - [`urls`]: Pure URL builders for BGG's advanced-search and ranking pages
//!
//! Each module contains its domain models, the transformation function, and
//! unit tests driven by inline XML fixtures (no mocking required).

pub mod collection;
pub mod hot;
pub mod plays;
pub mod search;
pub mod thing;
pub mod urls;
pub mod user;
pub mod xml;
