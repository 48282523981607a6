//! Tests for the layout schema catalog
