//! Controlled editor host.
//!
//! `EditorHost` owns exactly one adapter for its lifetime and bridges a
//! parent's `value`/`on_change` pair onto it. User edits flow out through
//! `on_change`; new values flow in through [`EditorHost::set_props`], which
//! only touches the engine when the parent actually changed the value *and*
//! the engine does not already show it. That second check is what breaks
//! the edit → on_change → new value → set_value loop.
//!
//! The host moves through `Uninitialized → Mounted → Destroyed`; the last
//! state is terminal. Dropping the host unmounts it.
//!
//! Engines report edits into a queue that is drained once the adapter is
//! released, so `on_change` may call back into the [`EditorHandle`].

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::{Rc, Weak};

use crate::adapter::{EditorEngineAdapter, EngineOptions, UserEditCallback, initialize};
use crate::error::EditorError;
use crate::surface::Surface;
use crate::types::{EngineKind, InputEvent, Selection};

/// Parent-change callback.
pub type ChangeCallback = Box<dyn FnMut(&str)>;

/// Inputs a parent passes when mounting.
pub struct HostProps {
    pub value: String,
    pub on_change: Option<ChangeCallback>,
    pub options: EngineOptions,
}

impl HostProps {
    pub fn new(value: impl Into<String>, options: impl Into<EngineOptions>) -> Self {
        Self {
            value: value.into(),
            on_change: None,
            options: options.into(),
        }
    }

    pub fn on_change(mut self, callback: impl FnMut(&str) + 'static) -> Self {
        self.on_change = Some(Box::new(callback));
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HostPhase {
    Uninitialized,
    Mounted,
    Destroyed,
}

enum HostState {
    Uninitialized,
    Mounted(Box<dyn EditorEngineAdapter>),
    Destroyed,
}

struct HostInner {
    state: HostState,
    last_known_external_value: String,
}

impl HostInner {
    fn adapter_mut(&mut self) -> Result<&mut Box<dyn EditorEngineAdapter>, EditorError> {
        match &mut self.state {
            HostState::Mounted(adapter) => Ok(adapter),
            HostState::Uninitialized => Err(EditorError::NotMounted),
            HostState::Destroyed => Err(EditorError::Destroyed),
        }
    }
}

pub struct EditorHost {
    inner: Rc<RefCell<HostInner>>,
    surface: Option<Surface>,
    on_change: RefCell<Option<ChangeCallback>>,
    pending: Rc<RefCell<VecDeque<String>>>,
}

impl EditorHost {
    pub fn new(surface: Option<Surface>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(HostInner {
                state: HostState::Uninitialized,
                last_known_external_value: String::new(),
            })),
            surface,
            on_change: RefCell::new(None),
            pending: Rc::new(RefCell::new(VecDeque::new())),
        }
    }

    /// Mount the engine picked by `props.options`.
    pub fn mount(&mut self, props: HostProps) -> Result<EditorHandle, EditorError> {
        let HostProps {
            value,
            on_change,
            options,
        } = props;
        self.mount_with(&value, on_change, move |surface, initial, on_user_edit| {
            initialize(surface, options, initial, on_user_edit)
        })
    }

    /// Mount an adapter built by `factory`.
    ///
    /// A failed factory leaves the host destroyed.
    pub fn mount_with<F>(
        &mut self,
        value: &str,
        on_change: Option<ChangeCallback>,
        factory: F,
    ) -> Result<EditorHandle, EditorError>
    where
        F: FnOnce(
            Option<&Surface>,
            &str,
            UserEditCallback,
        ) -> Result<Box<dyn EditorEngineAdapter>, EditorError>,
    {
        match self.phase() {
            HostPhase::Uninitialized => {}
            HostPhase::Mounted => return Err(EditorError::AlreadyMounted),
            HostPhase::Destroyed => return Err(EditorError::Destroyed),
        }

        let pending = Rc::clone(&self.pending);
        let on_user_edit: UserEditCallback = Box::new(move |text: &str| {
            pending.borrow_mut().push_back(text.to_string());
        });

        let result = factory(self.surface.as_ref(), value, on_user_edit);
        let mut inner = self.inner.try_borrow_mut().map_err(|_| EditorError::Busy)?;
        match result {
            Ok(adapter) => {
                tracing::debug!(target: "wp_editor::host", kind = %adapter.kind(), "mounted");
                inner.state = HostState::Mounted(adapter);
                inner.last_known_external_value = value.to_string();
                drop(inner);
                *self.on_change.borrow_mut() = on_change;
                Ok(self.handle())
            }
            Err(err) => {
                tracing::warn!(target: "wp_editor::host", error = %err, "mount failed");
                inner.state = HostState::Destroyed;
                Err(err)
            }
        }
    }

    /// Apply a new `value` prop from the parent.
    ///
    /// Returns true when the value was pushed into the engine.
    pub fn set_props(&mut self, value: &str) -> Result<bool, EditorError> {
        let mut inner = self.inner.try_borrow_mut().map_err(|_| EditorError::Busy)?;
        if value == inner.last_known_external_value {
            return Ok(false);
        }
        let adapter = inner.adapter_mut()?;
        let pushed = adapter.get_value() != value;
        if pushed {
            adapter.set_value(value);
        }
        inner.last_known_external_value = value.to_string();
        tracing::trace!(target: "wp_editor::host", pushed, "value prop changed");
        Ok(pushed)
    }

    /// Forward a user input event from the surface to the engine.
    pub fn dispatch_input(&self, event: InputEvent) -> Result<(), EditorError> {
        {
            let mut inner = self.inner.try_borrow_mut().map_err(|_| EditorError::Busy)?;
            inner.adapter_mut()?.input(event);
        }
        self.flush_edits();
        Ok(())
    }

    fn next_edit(&self) -> Option<String> {
        self.pending.borrow_mut().pop_front()
    }

    /// Deliver queued user edits to the parent, oldest first.
    fn flush_edits(&self) {
        while let Some(text) = self.next_edit() {
            match self.on_change.try_borrow_mut() {
                Ok(mut on_change) => {
                    if let Some(on_change) = on_change.as_mut() {
                        on_change(&text);
                    }
                }
                Err(_) => {
                    tracing::warn!(target: "wp_editor::host", "nested edit dropped");
                }
            }
        }
    }

    pub fn handle(&self) -> EditorHandle {
        EditorHandle {
            inner: Rc::downgrade(&self.inner),
        }
    }

    pub fn phase(&self) -> HostPhase {
        match self.inner.try_borrow() {
            Ok(inner) => match inner.state {
                HostState::Uninitialized => HostPhase::Uninitialized,
                HostState::Mounted(_) => HostPhase::Mounted,
                HostState::Destroyed => HostPhase::Destroyed,
            },
            // Only a mounted host dispatches.
            Err(_) => HostPhase::Mounted,
        }
    }

    pub fn kind(&self) -> Option<EngineKind> {
        let inner = self.inner.try_borrow().ok()?;
        match &inner.state {
            HostState::Mounted(adapter) => Some(adapter.kind()),
            _ => None,
        }
    }

    pub fn last_known_external_value(&self) -> Option<String> {
        self.inner
            .try_borrow()
            .ok()
            .map(|inner| inner.last_known_external_value.clone())
    }

    pub fn surface(&self) -> Option<&Surface> {
        self.surface.as_ref()
    }

    /// Destroy the engine. Safe to call more than once.
    pub fn unmount(&mut self) {
        let Ok(mut inner) = self.inner.try_borrow_mut() else {
            tracing::warn!(target: "wp_editor::host", "unmount while dispatching ignored");
            return;
        };
        let previous = std::mem::replace(&mut inner.state, HostState::Destroyed);
        drop(inner);
        self.pending.borrow_mut().clear();
        if let HostState::Mounted(mut adapter) = previous {
            adapter.destroy();
            tracing::debug!(target: "wp_editor::host", kind = %adapter.kind(), "unmounted");
        }
    }
}

impl Drop for EditorHost {
    fn drop(&mut self) {
        self.unmount();
    }
}

/// Imperative handle onto a mounted host.
///
/// Calls after unmount return [`EditorError::NotMounted`]. Calls made from
/// inside `on_change` see the engine as it is after the edit.
#[derive(Clone)]
pub struct EditorHandle {
    inner: Weak<RefCell<HostInner>>,
}

impl EditorHandle {
    fn with_adapter<T>(
        &self,
        f: impl FnOnce(&mut dyn EditorEngineAdapter) -> T,
    ) -> Result<T, EditorError> {
        let inner = self.inner.upgrade().ok_or(EditorError::NotMounted)?;
        let mut inner = inner.try_borrow_mut().map_err(|_| EditorError::Busy)?;
        match &mut inner.state {
            HostState::Mounted(adapter) => Ok(f(adapter.as_mut())),
            _ => Err(EditorError::NotMounted),
        }
    }

    pub fn get_value(&self) -> Result<String, EditorError> {
        self.with_adapter(|adapter| adapter.get_value())
    }

    /// Push a value directly into the engine. Does not fire `on_change`
    /// and does not change the host's last known external value.
    pub fn set_value(&self, value: &str) -> Result<(), EditorError> {
        self.with_adapter(|adapter| adapter.set_value(value))
    }

    pub fn selection(&self) -> Result<Selection, EditorError> {
        self.with_adapter(|adapter| adapter.selection())
    }

    pub fn set_selection(&self, selection: Selection) -> Result<(), EditorError> {
        self.with_adapter(|adapter| adapter.set_selection(selection))
    }

    /// Highlighted markup, when the engine has a loaded runtime.
    pub fn highlighted_html(&self) -> Result<Option<String>, EditorError> {
        self.with_adapter(|adapter| adapter.highlighted_html())
    }
}

impl std::fmt::Debug for EditorHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorHandle")
            .field("alive", &(self.inner.strong_count() > 0))
            .finish()
    }
}
