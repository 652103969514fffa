// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tiller-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tiller and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Startup-time wiring of the settings subsystem.
//!
//! The registry, the local store and every strategy registration are collected by
//! [`SettingsContextBuilder`] before any session runs; the built context is immutable.

use std::collections::HashMap;
use std::sync::Arc;

use super::finalizer::{Finalizer, FlushStoreFinalizer};
use super::handler::{LaunchedApplication, SettingHandler, WriteAdapter};
use super::local_remote::ReadLocalWriteRemote;
use super::registry::SettingsRegistry;
use crate::model::{FinalizerDescriptor, HandlerDescriptor, PreferenceKey, Setting};
use crate::store::DefaultsStore;

/// Builds the client handler for a setting.
pub type ClientHandlerFactory = Arc<dyn Fn(&Setting) -> Box<dyn SettingHandler> + Send + Sync>;

pub struct SettingsContext {
    registry: SettingsRegistry,
    store: Arc<dyn DefaultsStore>,
    client_handlers: HashMap<PreferenceKey, ClientHandlerFactory>,
    write_adapters: HashMap<PreferenceKey, Arc<dyn WriteAdapter>>,
    finalizers: HashMap<String, Arc<dyn Finalizer>>,
    applications: Vec<Arc<dyn LaunchedApplication>>,
}

impl SettingsContext {
    pub fn builder(
        registry: SettingsRegistry,
        store: Arc<dyn DefaultsStore>,
    ) -> SettingsContextBuilder {
        SettingsContextBuilder {
            context: Self {
                registry,
                store,
                client_handlers: HashMap::new(),
                write_adapters: HashMap::new(),
                finalizers: HashMap::new(),
                applications: Vec::new(),
            },
        }
    }

    pub fn registry(&self) -> &SettingsRegistry {
        &self.registry
    }

    pub fn store(&self) -> &Arc<dyn DefaultsStore> {
        &self.store
    }

    pub fn setting(&self, key: &PreferenceKey) -> Option<&Setting> {
        self.registry.setting(key)
    }

    /// Applications whose launches an apply session cleans up.
    pub fn applications(&self) -> &[Arc<dyn LaunchedApplication>] {
        &self.applications
    }

    pub fn has_write_adapter(&self, key: &PreferenceKey) -> bool {
        self.write_adapters.contains_key(key)
    }

    /// Resolves the handler for `setting`.
    ///
    /// A client setting without a registered factory has no handler. A read-local/write-remote
    /// setting always gets one; without a registered adapter its writes fail.
    pub fn create_handler(&self, setting: &Setting) -> Option<Box<dyn SettingHandler>> {
        match setting.handler() {
            HandlerDescriptor::Client { key } => {
                let factory = self.client_handlers.get(key)?;
                Some(factory(setting))
            }
            HandlerDescriptor::ReadLocalWriteRemote {
                domain,
                key,
                transform,
                adapter_key,
            } => Some(Box::new(
                ReadLocalWriteRemote::new(
                    Arc::clone(&self.store),
                    domain.clone(),
                    key.clone(),
                    setting.value_type(),
                    adapter_key.clone(),
                )
                .with_transform(*transform)
                .with_adapter(self.write_adapters.get(adapter_key).cloned()),
            )),
        }
    }

    pub fn create_finalizer(&self, descriptor: &FinalizerDescriptor) -> Option<Arc<dyn Finalizer>> {
        match descriptor {
            FinalizerDescriptor::Client { name } => self.finalizers.get(name).cloned(),
            FinalizerDescriptor::FlushStore { domain } => Some(Arc::new(FlushStoreFinalizer::new(
                Arc::clone(&self.store),
                domain.clone(),
            ))),
        }
    }
}

pub struct SettingsContextBuilder {
    context: SettingsContext,
}

impl SettingsContextBuilder {
    pub fn client_handler<F>(mut self, key: PreferenceKey, factory: F) -> Self
    where
        F: Fn(&Setting) -> Box<dyn SettingHandler> + Send + Sync + 'static,
    {
        self.context.client_handlers.insert(key, Arc::new(factory));
        self
    }

    pub fn write_adapter(mut self, key: PreferenceKey, adapter: Arc<dyn WriteAdapter>) -> Self {
        self.context.write_adapters.insert(key, adapter);
        self
    }

    pub fn finalizer(mut self, name: impl Into<String>, finalizer: Arc<dyn Finalizer>) -> Self {
        self.context.finalizers.insert(name.into(), finalizer);
        self
    }

    pub fn application(mut self, application: Arc<dyn LaunchedApplication>) -> Self {
        self.context.applications.push(application);
        self
    }

    pub fn build(self) -> SettingsContext {
        self.context
    }
}
