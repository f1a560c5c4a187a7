//! Ordered callback lists.

use std::fmt;

/// A registered callback. Callbacks live inside ECS components, so they must be `Send + Sync`.
pub type Callback<A> = Box<dyn FnMut(&mut A) + Send + Sync>;

/// Callbacks fired synchronously in registration order.
pub struct CallbackCollection<A> {
    callbacks: Vec<Callback<A>>,
}

impl<A> Default for CallbackCollection<A> {
    fn default() -> Self {
        Self {
            callbacks: Vec::new(),
        }
    }
}

impl<A> fmt::Debug for CallbackCollection<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackCollection")
            .field("len", &self.callbacks.len())
            .finish()
    }
}

impl<A> CallbackCollection<A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback. Returns `self` so registrations chain.
    pub fn add_callback(&mut self, callback: impl FnMut(&mut A) + Send + Sync + 'static) -> &mut Self {
        self.callbacks.push(Box::new(callback));
        self
    }

    pub fn fire(&mut self, arg: &mut A) {
        for callback in &mut self.callbacks {
            callback(arg);
        }
    }

    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }

    pub fn clear(&mut self) {
        self.callbacks.clear();
    }
}
