//! Shared functionality
//!
//! This crate supplies the pieces shared by the moss CSS engine crates:
//! the preprocessed character stream the tokenizer reads from, source
//! location tracking, and stylesheet byte decoding.

pub mod byte_stream;
pub mod decode;
