// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! Test harness for abuse simulation against the form endpoints.
//!
//! Submissions are replayed against the limiter and validator on a manual
//! clock, so window arithmetic is exact and the tests do not sleep.

pub mod attacks;
pub mod generators;
pub mod metrics;
