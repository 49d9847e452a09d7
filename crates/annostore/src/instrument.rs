// SPDX-License-Identifier: Apache-2.0
// Copyright © 2025 Au-Zone Technologies. All Rights Reserved.

//! Conditional span instrumentation.
//!
//! With the `profiling` feature the build and write stages open `tracing`
//! spans; the subscriber is installed by the binary. Without it none of this
//! is compiled.
//!
//! # Usage
//!
//! ```rust,ignore
//! #[cfg(feature = "profiling")]
//! use crate::instrument::info_span;
//!
//! fn build() {
//!     #[cfg(feature = "profiling")]
//!     let _span = info_span!("build_split", split = %name).entered();
//! }
//! ```

pub use tracing::{Level, Span, debug_span, info_span, instrument, trace_span};
