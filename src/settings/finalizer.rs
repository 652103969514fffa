// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tiller-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tiller and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use super::handler::HandlerError;
use crate::store::DefaultsStore;

/// A post-batch action, run once per session no matter how many settings share it.
#[async_trait]
pub trait Finalizer: Send + Sync {
    async fn run(&self) -> Result<(), HandlerError>;
}

/// Persists a store domain after all writes of a batch.
pub struct FlushStoreFinalizer {
    store: Arc<dyn DefaultsStore>,
    domain: String,
}

impl FlushStoreFinalizer {
    pub fn new(store: Arc<dyn DefaultsStore>, domain: impl Into<String>) -> Self {
        Self {
            store,
            domain: domain.into(),
        }
    }
}

#[async_trait]
impl Finalizer for FlushStoreFinalizer {
    async fn run(&self) -> Result<(), HandlerError> {
        debug!(domain = %self.domain, "flushing defaults domain");
        self.store.flush(&self.domain)?;
        Ok(())
    }
}
