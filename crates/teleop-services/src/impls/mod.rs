// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Service implementations

pub mod controller;
pub(crate) mod worker;

pub use controller::{InterventionController, InterventionSettings};
