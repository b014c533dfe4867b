//! Test modules for the tide-calendar binary.
