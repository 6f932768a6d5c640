// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Engine modules and the registry that orders their lifecycle.
//!
//! Every subsystem (audio, input, resources, rendering, ECS, editor GUI) is a
//! [`Module`]. The [`ModuleRegistry`] owns them, starts them in ascending
//! priority and stops them in the exact reverse order.

use std::any::{Any, TypeId};
use std::collections::HashMap;

/// Well-known startup priorities. Lower values start first and stop last.
pub mod priority {
    /// The engine logger.
    pub const LOGGER: i32 = 0;
    /// The project module, registered by the editor before core modules.
    pub const PROJECT: i32 = 5;
    /// The audio module.
    pub const AUDIO: i32 = 10;
    /// The window module.
    pub const WINDOW: i32 = 15;
    /// The input module.
    pub const INPUT: i32 = 20;
    /// The resource module.
    pub const RESOURCE: i32 = 30;
    /// The render module.
    pub const RENDER: i32 = 40;
    /// The ECS module.
    pub const ECS: i32 = 50;
    /// The time and timer module.
    pub const TIME: i32 = 60;
    /// GUI modules registered by an engine context.
    pub const GUI: i32 = 100;
}

/// Errors raised while registering or driving modules.
#[derive(Debug, thiserror::Error)]
pub enum ModuleError {
    /// A module of the same concrete type is already registered.
    #[error("module '{0}' is already registered")]
    AlreadyRegistered(&'static str),
    /// A module was expected but is not registered.
    #[error("module '{0}' is not registered")]
    Missing(&'static str),
    /// A module reported a failure of its own.
    #[error("module '{module}' failed: {reason}")]
    Failed {
        /// The failing module.
        module: &'static str,
        /// Human readable cause.
        reason: String,
    },
    /// Startup of a module failed; every module already started was stopped again.
    #[error("startup of module '{module}' failed")]
    Startup {
        /// The module whose startup failed.
        module: &'static str,
        /// The error it returned.
        #[source]
        source: Box<ModuleError>,
    },
    /// Any other error.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ModuleError {
    /// Shorthand for [`ModuleError::Failed`].
    pub fn failed(module: &'static str, reason: impl std::fmt::Display) -> Self {
        Self::Failed {
            module,
            reason: reason.to_string(),
        }
    }
}

/// A self-contained engine subsystem with an explicit lifecycle.
pub trait Module: Any {
    /// A short, stable name used in logs.
    fn name(&self) -> &'static str;

    /// Called once by [`ModuleRegistry::startup_all`].
    fn startup(&mut self) -> Result<(), ModuleError> {
        Ok(())
    }

    /// Called once by [`ModuleRegistry::shutdown_all`] if startup succeeded.
    fn shutdown(&mut self) -> Result<(), ModuleError> {
        Ok(())
    }

    /// Upcast for typed lookups.
    fn as_any(&self) -> &dyn Any;

    /// Mutable upcast for typed lookups.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

struct Entry {
    module: Box<dyn Module>,
    priority: i32,
    order: usize,
    started: bool,
}

/// Owns the engine modules and drives their lifecycle.
#[derive(Default)]
pub struct ModuleRegistry {
    entries: Vec<Entry>,
    index: HashMap<TypeId, usize>,
}

impl ModuleRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a module. Only one module per concrete type is allowed.
    pub fn register<M: Module>(&mut self, module: M, priority: i32) -> Result<(), ModuleError> {
        let type_id = TypeId::of::<M>();
        if self.index.contains_key(&type_id) {
            return Err(ModuleError::AlreadyRegistered(module.name()));
        }
        log::debug!("Registering module '{}' (priority {priority}).", module.name());
        let order = self.entries.len();
        self.index.insert(type_id, order);
        self.entries.push(Entry {
            module: Box::new(module),
            priority,
            order,
            started: false,
        });
        Ok(())
    }

    /// Returns a module by type.
    pub fn get<M: Module>(&self) -> Option<&M> {
        let idx = *self.index.get(&TypeId::of::<M>())?;
        self.entries[idx].module.as_any().downcast_ref::<M>()
    }

    /// Returns a module by type, mutably.
    pub fn get_mut<M: Module>(&mut self) -> Option<&mut M> {
        let idx = *self.index.get(&TypeId::of::<M>())?;
        self.entries[idx].module.as_any_mut().downcast_mut::<M>()
    }

    /// Like [`ModuleRegistry::get`] but turns absence into an error.
    pub fn require<M: Module>(&self) -> Result<&M, ModuleError> {
        self.get::<M>()
            .ok_or(ModuleError::Missing(std::any::type_name::<M>()))
    }

    /// Like [`ModuleRegistry::get_mut`] but turns absence into an error.
    pub fn require_mut<M: Module>(&mut self) -> Result<&mut M, ModuleError> {
        self.get_mut::<M>()
            .ok_or(ModuleError::Missing(std::any::type_name::<M>()))
    }

    /// Returns `true` if a module of type `M` is registered.
    pub fn contains<M: Module>(&self) -> bool {
        self.index.contains_key(&TypeId::of::<M>())
    }

    /// Returns `true` if a module of type `M` is registered and started.
    pub fn is_started<M: Module>(&self) -> bool {
        self.index
            .get(&TypeId::of::<M>())
            .is_some_and(|&idx| self.entries[idx].started)
    }

    /// Number of registered modules.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when no module is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Borrows module `M` mutably alongside shared access to every other module.
    pub fn split_mut<M: Module>(&mut self) -> Option<(&mut M, OtherModules<'_>)> {
        let idx = *self.index.get(&TypeId::of::<M>())?;
        let (before, rest) = self.entries.split_at_mut(idx);
        let (target, after) = rest.split_first_mut()?;
        let module = target.module.as_any_mut().downcast_mut::<M>()?;
        let others = OtherModules {
            before,
            after,
            split: idx,
            index: &self.index,
        };
        Some((module, others))
    }

    /// Module names in startup order.
    pub fn startup_order(&self) -> Vec<&'static str> {
        self.sorted_indices()
            .into_iter()
            .map(|idx| self.entries[idx].module.name())
            .collect()
    }

    fn sorted_indices(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.entries.len()).collect();
        order.sort_by_key(|&idx| (self.entries[idx].priority, self.entries[idx].order));
        order
    }

    /// Starts every module that is not started yet, lowest priority first.
    ///
    /// On failure the modules that are running get shut down in reverse
    /// order before the error is returned.
    pub fn startup_all(&mut self) -> Result<(), ModuleError> {
        for idx in self.sorted_indices() {
            let entry = &mut self.entries[idx];
            if entry.started {
                continue;
            }
            let name = entry.module.name();
            log::info!("Starting module '{name}'.");
            if let Err(e) = entry.module.startup() {
                log::error!("Module '{name}' failed to start: {e}");
                if let Err(shutdown_err) = self.shutdown_all() {
                    log::error!("Rollback after failed startup also failed: {shutdown_err}");
                }
                return Err(ModuleError::Startup {
                    module: name,
                    source: Box::new(e),
                });
            }
            entry.started = true;
        }
        Ok(())
    }

    /// Stops every started module, highest priority first.
    ///
    /// All modules are visited even if one fails; the first error is returned.
    pub fn shutdown_all(&mut self) -> Result<(), ModuleError> {
        let mut first_error = None;
        for idx in self.sorted_indices().into_iter().rev() {
            let entry = &mut self.entries[idx];
            if !entry.started {
                continue;
            }
            let name = entry.module.name();
            log::info!("Shutting down module '{name}'.");
            entry.started = false;
            if let Err(e) = entry.module.shutdown() {
                log::error!("Module '{name}' failed to shut down: {e}");
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}

/// Shared access to the modules not borrowed by [`ModuleRegistry::split_mut`].
pub struct OtherModules<'a> {
    before: &'a [Entry],
    after: &'a [Entry],
    split: usize,
    index: &'a HashMap<TypeId, usize>,
}

impl<'a> OtherModules<'a> {
    /// Returns a module by type, unless it is the one borrowed mutably.
    pub fn get<M: Module>(&self) -> Option<&'a M> {
        let idx = *self.index.get(&TypeId::of::<M>())?;
        let entry = match idx.cmp(&self.split) {
            std::cmp::Ordering::Less => &self.before[idx],
            std::cmp::Ordering::Equal => return None,
            std::cmp::Ordering::Greater => &self.after[idx - self.split - 1],
        };
        entry.module.as_any().downcast_ref::<M>()
    }
}

impl std::fmt::Debug for ModuleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleRegistry")
            .field("modules", &self.startup_order())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    type Journal = Arc<Mutex<Vec<String>>>;

    macro_rules! test_module {
        ($ty:ident, $name:literal) => {
            struct $ty {
                journal: Journal,
                fail_startup: bool,
            }

            impl Module for $ty {
                fn name(&self) -> &'static str {
                    $name
                }
                fn startup(&mut self) -> Result<(), ModuleError> {
                    if self.fail_startup {
                        return Err(ModuleError::failed($name, "boom"));
                    }
                    self.journal.lock().unwrap().push(format!("start {}", $name));
                    Ok(())
                }
                fn shutdown(&mut self) -> Result<(), ModuleError> {
                    self.journal.lock().unwrap().push(format!("stop {}", $name));
                    Ok(())
                }
                fn as_any(&self) -> &dyn Any {
                    self
                }
                fn as_any_mut(&mut self) -> &mut dyn Any {
                    self
                }
            }
        };
    }

    test_module!(Audio, "audio");
    test_module!(Render, "render");
    test_module!(Gui, "gui");

    #[test]
    fn startup_ascending_shutdown_descending() {
        let journal = Journal::default();
        let mut registry = ModuleRegistry::new();
        registry
            .register(Gui { journal: journal.clone(), fail_startup: false }, priority::GUI)
            .unwrap();
        registry
            .register(Audio { journal: journal.clone(), fail_startup: false }, priority::AUDIO)
            .unwrap();
        registry
            .register(Render { journal: journal.clone(), fail_startup: false }, priority::RENDER)
            .unwrap();

        registry.startup_all().unwrap();
        registry.shutdown_all().unwrap();

        assert_eq!(
            *journal.lock().unwrap(),
            vec![
                "start audio", "start render", "start gui",
                "stop gui", "stop render", "stop audio",
            ]
        );
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let journal = Journal::default();
        let mut registry = ModuleRegistry::new();
        registry
            .register(Audio { journal: journal.clone(), fail_startup: false }, 0)
            .unwrap();
        let err = registry
            .register(Audio { journal, fail_startup: false }, 1)
            .unwrap_err();
        assert!(matches!(err, ModuleError::AlreadyRegistered("audio")));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn failed_startup_rolls_back_started_modules() {
        let journal = Journal::default();
        let mut registry = ModuleRegistry::new();
        registry
            .register(Audio { journal: journal.clone(), fail_startup: false }, 0)
            .unwrap();
        registry
            .register(Render { journal: journal.clone(), fail_startup: true }, 1)
            .unwrap();
        registry
            .register(Gui { journal: journal.clone(), fail_startup: false }, 2)
            .unwrap();

        let err = registry.startup_all().unwrap_err();
        assert!(matches!(err, ModuleError::Startup { module: "render", .. }));
        assert_eq!(*journal.lock().unwrap(), vec!["start audio", "stop audio"]);
        assert!(!registry.is_started::<Audio>());
    }

    #[test]
    fn typed_lookup() {
        let journal = Journal::default();
        let mut registry = ModuleRegistry::new();
        registry
            .register(Audio { journal, fail_startup: false }, 0)
            .unwrap();

        assert!(registry.get::<Audio>().is_some());
        assert!(registry.get::<Render>().is_none());
        registry.get_mut::<Audio>().unwrap().fail_startup = true;
        assert!(registry.get::<Audio>().unwrap().fail_startup);
        assert!(matches!(registry.require::<Gui>(), Err(ModuleError::Missing(_))));
    }

    #[test]
    fn equal_priorities_keep_registration_order() {
        let journal = Journal::default();
        let mut registry = ModuleRegistry::new();
        registry
            .register(Render { journal: journal.clone(), fail_startup: false }, 7)
            .unwrap();
        registry
            .register(Audio { journal, fail_startup: false }, 7)
            .unwrap();
        assert_eq!(registry.startup_order(), vec!["render", "audio"]);
    }

    #[test]
    fn split_borrow_reaches_other_modules() {
        let journal = Journal::default();
        let mut registry = ModuleRegistry::new();
        registry
            .register(Audio { journal: journal.clone(), fail_startup: false }, 0)
            .unwrap();
        registry
            .register(Render { journal: journal.clone(), fail_startup: false }, 1)
            .unwrap();
        registry
            .register(Gui { journal, fail_startup: true }, 2)
            .unwrap();

        let (render, others) = registry.split_mut::<Render>().unwrap();
        render.fail_startup = true;
        assert!(others.get::<Audio>().is_some());
        assert!(others.get::<Gui>().unwrap().fail_startup);
        assert!(others.get::<Render>().is_none());

        assert!(registry.get::<Render>().unwrap().fail_startup);
        assert!(registry.split_mut::<Render>().is_some());
    }
}
