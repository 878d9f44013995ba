//! Server rendering and client hydration
//!
//! This module re-exports `ripple-ssr`.
//!
//! ## Flow
//!
//! - **Server**: [`SsrRenderer::render_page`] writes the markup into a
//!   container and appends a JSON state script with captured server signals
//! - **Client**: the page is parsed into a host document,
//!   [`HydrationContext::restore`] writes server values into signals and
//!   [`hydrate`] adopts the existing nodes

// Re-export all ripple-ssr functionality
pub use ripple_ssr::*;
