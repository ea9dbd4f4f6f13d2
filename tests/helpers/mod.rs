// ABOUTME: Shared test helpers and utilities for integration tests
// ABOUTME: Exports backend fakes, the Google API stand-in server, and router request helpers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(dead_code)]

pub mod axum_test;
pub mod fakes;
pub mod google_stub;
