// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Service trait definitions

pub mod intervention_service;

pub use intervention_service::InterventionService;
