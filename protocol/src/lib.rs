// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Mintgate Protocol — Core Primitives
//!
//! The building blocks every other Mintgate crate leans on. Nothing in here
//! knows about pools, prices, or pause switches; that lives in
//! `mintgate-contracts`. This crate answers smaller questions:
//!
//! - **types** — what a participant address is, and how we print it.
//! - **crypto** — which hash functions we trust, and how they are wired
//!   into leaves and pairs.
//! - **merkle** — building a whitelist commitment, proving membership, and
//!   verifying a proof against whatever root is currently active.
//! - **config** — deployment parameters and the constants behind defaults.
//!
//! ## Design Philosophy
//!
//! 1. Verification is pure. It returns `bool`, never panics, never mutates.
//! 2. Roots are order-independent. Shuffle the whitelist all you like.
//! 3. If it touches a proof, it has tests. Plural.

pub mod config;
pub mod crypto;
pub mod merkle;
pub mod types;

pub use types::{Address, Hash32, TokenId, Wei};
