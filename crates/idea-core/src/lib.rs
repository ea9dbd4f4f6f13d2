// ABOUTME: Core types and constants for the startup idea generator
// ABOUTME: Foundation crate with error handling and service defaults shared by the app crate
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Idea Core
//!
//! Foundation crate providing shared types and constants for the startup idea
//! generator. It changes rarely, which keeps incremental builds of the
//! application crate fast.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError` and `ErrorCode`
//! - **constants**: Google endpoints, OAuth scopes, and application defaults

/// Unified error handling system with standard error codes
pub mod errors;

/// Application constants and default values organized by domain
pub mod constants;
