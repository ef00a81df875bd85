//! Completion signals for stage operations that finish later.

use std::cell::Cell;
use std::rc::Rc;

/// A shared, single-threaded "done" flag.
///
/// Operations such as a pulse or an image load hand one of these back to the
/// caller; the stage flips it once the operation has finished.
#[derive(Debug, Clone, Default)]
pub struct Completion(Rc<Cell<bool>>);

impl Completion {
    /// A signal that has not fired yet.
    pub fn pending() -> Self {
        Self::default()
    }

    /// A signal that has already fired.
    pub fn done() -> Self {
        Self(Rc::new(Cell::new(true)))
    }

    pub fn complete(&self) {
        self.0.set(true);
    }

    pub fn is_complete(&self) -> bool {
        self.0.get()
    }
}
