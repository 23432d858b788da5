//! Integration test suite for Lumen.
//!
//! Exercises the tier, royalty and pricing engines together through their
//! public APIs, including property tests over generated tier tables.

pub mod helpers;
