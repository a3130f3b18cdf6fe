use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

/// Shared handle to a registered system instance.
///
/// The world keeps its own reference for frame dispatch; callers use this one
/// to configure the system between frames. Holding a borrow across
/// `World::update`/`World::render` makes the world skip that system for the
/// pass.
pub struct SystemHandle<S> {
    inner: Rc<RefCell<S>>,
}

impl<S> SystemHandle<S> {
    pub(crate) fn from_rc(inner: Rc<RefCell<S>>) -> Self {
        Self { inner }
    }

    #[inline]
    pub fn borrow(&self) -> Ref<'_, S> {
        self.inner.borrow()
    }

    #[inline]
    pub fn borrow_mut(&self) -> RefMut<'_, S> {
        self.inner.borrow_mut()
    }

    /// Whether two handles refer to the same instance.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<S> Clone for SystemHandle<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<S> fmt::Debug for SystemHandle<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SystemHandle")
            .field("system", &std::any::type_name::<S>())
            .field("refs", &Rc::strong_count(&self.inner))
            .finish()
    }
}
