// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
# Teleop Service Layer

The stable application boundary for the intervention service - defines the
transport-agnostic [`InterventionService`] interface and its implementation,
the [`InterventionController`].

## Architecture

```text
┌─────────────────────────────────────────────────────────────────┐
│                    TRANSPORT ADAPTERS                            │
│  Axum/REST control plane (teleop-api)                           │
└────────────────────────────┬────────────────────────────────────┘
                             ↓
┌─────────────────────────────────────────────────────────────────┐
│              SERVICE LAYER (This Crate)                          │
│  • InterventionService  - start/stop/status contract            │
│  • InterventionController - lifecycle state machine + worker    │
└────────────────────────────┬────────────────────────────────────┘
                             ↓
┌─────────────────────────────────────────────────────────────────┐
│                   I/O LAYER                                      │
│  teleop-agent (robot capability), teleop-transports (telemetry) │
└─────────────────────────────────────────────────────────────────┘
```

## Guarantees

1. **One worker**: at most one control loop runs per robot at any instant.
2. **Safe state**: torque mode is restored on every session exit path.
3. **Bounded stop**: `stop()` never blocks its caller past the configured
   worker-join timeout.
4. **Non-blocking queries**: `is_active`/`status` never touch robot I/O.
*/

pub mod impls;
pub mod traits;
pub mod types;

pub use impls::{InterventionController, InterventionSettings};
pub use traits::InterventionService;
pub use types::{
    InterventionStatus, ServiceError, ServiceResult, SessionState, StartOutcome, StopOutcome,
};
