//! Portfolio internationalization library.
//!
//! Exposes the translation catalog, resolver and language controller to the
//! binaries and the integration tests.

pub mod config;
pub mod i18n;
