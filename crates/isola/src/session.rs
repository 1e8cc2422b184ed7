//! Handle-based access to loaded modules.
//!
//! A [`Session`] owns every module it loads or creates and hands out
//! [`ModuleHandle`]s, plain copyable values. Handles are generational: once a
//! module is disposed its handle goes stale and every query through it
//! answers like a missing module. A slot freed by disposal is reused with a
//! new generation, so a stale handle never reaches a later module.
//!
//! Queries take function indices as `i32`; negative indices are out of range.

use std::cell::Cell;
use std::path::Path;

use isola_ir::Module;

use crate::catalog;
use crate::isolate::isolate_or_empty;
use crate::render::{render, RenderedText};

/// Reference to a module owned by a [`Session`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ModuleHandle {
    slot: u32,
    generation: u32,
}

struct Slot {
    generation: u32,
    module: Option<Module>,
}

/// Owner of every module reachable through a [`ModuleHandle`].
#[derive(Default)]
pub struct Session {
    slots: Vec<Slot>,
    free: Vec<u32>,
    live: usize,
    texts: Cell<usize>,
}

impl Session {
    pub fn new() -> Self {
        Session::default()
    }

    /// Take ownership of `module`. `None` only if the handle space is full.
    pub fn insert(&mut self, module: Module) -> Option<ModuleHandle> {
        let handle = if let Some(slot) = self.free.pop() {
            let entry = &mut self.slots[slot as usize];
            entry.module = Some(module);
            ModuleHandle {
                slot,
                generation: entry.generation,
            }
        } else {
            let slot = u32::try_from(self.slots.len()).ok()?;
            self.slots.push(Slot {
                generation: 0,
                module: Some(module),
            });
            ModuleHandle {
                slot,
                generation: 0,
            }
        };
        self.live += 1;
        Some(handle)
    }

    /// The module behind `handle`, if it is still live.
    pub fn get(&self, handle: Option<ModuleHandle>) -> Option<&Module> {
        let handle = handle?;
        let slot = self.slots.get(handle.slot as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.module.as_ref()
    }

    /// Load a module from `path`. Failures are logged and give `None`.
    pub fn load(&mut self, path: &Path) -> Option<ModuleHandle> {
        match crate::load(path) {
            Ok(module) => self.insert(module),
            Err(err) => {
                tracing::warn!(%err, "load failed");
                None
            }
        }
    }

    pub fn validate(&self, handle: Option<ModuleHandle>) -> bool {
        crate::validate(self.get(handle))
    }

    /// Number of functions; `0` for a missing module.
    pub fn function_count(&self, handle: Option<ModuleHandle>) -> i32 {
        self.get(handle).map_or(0, |module| {
            i32::try_from(catalog::function_count(module)).unwrap_or(i32::MAX)
        })
    }

    /// Name of function `index`, borrowed from the session.
    ///
    /// `""` for a missing module, an out-of-range index or an unnamed
    /// function.
    pub fn function_name(&self, handle: Option<ModuleHandle>, index: i32) -> &str {
        match (self.get(handle), to_index(index)) {
            (Some(module), Some(index)) => catalog::function_name(module, index),
            _ => "",
        }
    }

    pub fn param_arity(&self, handle: Option<ModuleHandle>, index: i32) -> usize {
        match (self.get(handle), to_index(index)) {
            (Some(module), Some(index)) => catalog::param_arity(module, index),
            _ => 0,
        }
    }

    pub fn result_arity(&self, handle: Option<ModuleHandle>, index: i32) -> usize {
        match (self.get(handle), to_index(index)) {
            (Some(module), Some(index)) => catalog::result_arity(module, index),
            _ => 0,
        }
    }

    /// Isolate function `index` into a new module owned by this session.
    ///
    /// When isolation fails the new module is empty. It still needs to be
    /// disposed like any other.
    pub fn isolate(&mut self, handle: Option<ModuleHandle>, index: i32) -> Option<ModuleHandle> {
        let isolated = match (self.get(handle), to_index(index)) {
            (Some(module), Some(index)) => isolate_or_empty(module, index),
            _ => Module::new(),
        };
        self.insert(isolated)
    }

    /// Render the module as text. Hand the text back with
    /// [`Session::release_text`].
    pub fn render(&self, handle: Option<ModuleHandle>) -> RenderedText {
        let text = render(self.get(handle));
        self.texts.set(self.texts.get() + 1);
        text
    }

    pub fn release_text(&mut self, text: Option<RenderedText>) {
        if let Some(text) = text {
            drop(text);
            self.texts.set(self.texts.get().saturating_sub(1));
        }
    }

    /// Free the module behind `handle`.
    ///
    /// Returns `false` and does nothing for a missing or already disposed
    /// module.
    pub fn dispose(&mut self, handle: Option<ModuleHandle>) -> bool {
        let Some(handle) = handle else {
            return false;
        };
        let Some(slot) = self.slots.get_mut(handle.slot as usize) else {
            return false;
        };
        if slot.generation != handle.generation || slot.module.is_none() {
            return false;
        }
        slot.module = None;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.slot);
        self.live -= 1;
        true
    }

    /// Modules loaded or created and not yet disposed.
    pub fn live_modules(&self) -> usize {
        self.live
    }

    /// Texts rendered and not yet released.
    pub fn live_texts(&self) -> usize {
        self.texts.get()
    }
}

fn to_index(index: i32) -> Option<usize> {
    usize::try_from(index).ok()
}

#[cfg(test)]
mod tests;
