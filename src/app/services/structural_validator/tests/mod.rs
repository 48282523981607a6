//! Tests for structural validation
