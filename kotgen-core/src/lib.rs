//! Language-level utilities for the kotgen Kotlin source generator.
//!
//! This crate provides the pieces of Kotlin-the-language that code
//! generation needs but that are independent of any particular emission
//! engine:
//!
//! - [`keywords`] - The Kotlin keyword table
//! - [`escape`] - Identifier validation, backtick escaping, alias mangling
//! - [`literal`] - String and character literal rendering
//! - [`NameAllocator`] - Collision-free identifier allocation

pub mod escape;
pub mod keywords;
pub mod literal;

mod name_allocator;

pub use name_allocator::{AllocationError, NameAllocator};
