//! Test suite for the content block model
//!
//! This module organizes tests into logical groups: core value types,
//! settings fields, factories mirroring the admin fixtures, end-to-end
//! admin scenarios and property-based invariants.

#[cfg(test)]
mod integration;
#[cfg(test)]
mod property_tests;
