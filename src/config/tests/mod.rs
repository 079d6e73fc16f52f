//! Unit tests for configuration loading and precedence.
//!
//! Tests are organised into modules by functional area:
//! - `helpers`: Shared test utilities
//! - `precedence`: Layer precedence tests
//! - `field_resolution`: Token, PR URL, API key and enum accessor tests
//! - `bugtracker`: Tracker base URL lookup order tests

mod helpers;
