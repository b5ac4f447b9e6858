// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Single-slot admission gate for classification calls

use std::sync::Arc;

use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// At most one holder at a time, process-wide when shared through `Arc`.
///
/// The slot is released when the returned [`GatePass`] drops, on every exit
/// path including errors and cancellation.
#[derive(Clone)]
pub struct AdmissionGate {
    slot: Arc<Semaphore>,
}

/// Proof of holding the gate
pub struct GatePass {
    _permit: OwnedSemaphorePermit,
}

impl AdmissionGate {
    pub fn new() -> Self {
        Self {
            slot: Arc::new(Semaphore::new(1)),
        }
    }

    /// Wait for the slot
    pub async fn enter(&self) -> GatePass {
        // The semaphore is never closed, so acquisition cannot fail.
        let permit = match self.slot.clone().acquire_owned().await {
            Ok(permit) => permit,
            Err(_) => unreachable!("admission gate semaphore closed"),
        };
        GatePass { _permit: permit }
    }

    /// Whether the slot is currently free
    pub fn is_free(&self) -> bool {
        self.slot.available_permits() == 1
    }
}

impl Default for AdmissionGate {
    fn default() -> Self {
        Self::new()
    }
}
