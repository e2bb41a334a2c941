use std::cell::{Ref, RefCell};
use std::rc::Rc;

/// Buffer ownership for mutating operations
///
/// `Total` asserts that the caller holds the only meaningful handle to the
/// buffer (for example, it was just allocated), so writes may land in place.
/// `Shared` buffers may be aliased and are duplicated before they are
/// written to.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum::Display, strum::EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum Ownership {
    Total,
    #[default]
    Shared,
}

/// View an object mutably.
/// This trait drives in-place assignment into vectors, primarily via
/// `CowObj::for_write`.
pub trait ViewMut {
    fn view_mut(&self) -> Self;
}

/// Internal data representation for copy-on-write semantics.
///
/// The outer `Rc<RefCell<..>>` is the handle: views created with `view_mut`
/// share it and observe each other's writes. The inner `Rc<T>` is the
/// buffer: lazy copies created with `clone` share it until one of them is
/// written to, at which point the writer receives its own duplicate.
#[derive(Debug, PartialEq, Default)]
pub struct CowObj<T: Clone>(pub Rc<RefCell<Rc<T>>>);

impl<T: Clone> Clone for CowObj<T> {
    fn clone(&self) -> Self {
        Self::new(Rc::new(RefCell::new(self.0.borrow().clone())))
    }
}

impl<T: Clone> From<T> for CowObj<T> {
    fn from(x: T) -> Self {
        CowObj::new(Rc::new(RefCell::new(Rc::new(x))))
    }
}

impl<T: Clone> CowObj<T> {
    /// Create a new instance
    pub fn new(x: Rc<RefCell<Rc<T>>>) -> Self {
        CowObj(x)
    }

    pub fn inner_rc(&self) -> Rc<T> {
        self.borrow().clone()
    }

    /// Get mutable access to the internal data.
    /// In case more than one lazy copy shares the buffer, the buffer is
    /// cloned first.
    pub fn with_inner_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut T) -> R,
    {
        let CowObj(x) = self;
        let x1 = &mut *x.borrow_mut();
        let vals = Rc::make_mut(x1);
        f(vals)
    }

    /// Borrow the internal data immutably.
    pub fn borrow(&self) -> Ref<'_, Rc<T>> {
        self.0.borrow()
    }

    /// A handle that is safe to write through under the given ownership
    pub fn for_write(&self, ownership: Ownership) -> Self {
        match ownership {
            Ownership::Total => self.view_mut(),
            Ownership::Shared => self.clone(),
        }
    }
}

impl<T: Clone> ViewMut for CowObj<T> {
    /// Create a mutable view on the data.
    fn view_mut(&self) -> Self {
        Self::new(Rc::clone(&self.0))
    }
}

impl<T: Clone> CowObj<Vec<T>> {
    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clone the element at a position out of the buffer
    pub fn get(&self, index: usize) -> Option<T> {
        self.0.borrow().get(index).cloned()
    }
}
