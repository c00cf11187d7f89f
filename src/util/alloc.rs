use std::cell::Cell;
use std::ops::Deref;
use std::rc::Rc;

/// A value that increments a shared counter every time an instance of it is dropped. Clones share
/// the counter, so the count reflects every copy that has been released.
#[derive(Debug, Clone)]
pub struct CountedDrop(pub Rc<Cell<usize>>);

impl CountedDrop {
    pub fn new() -> CountedDrop {
        CountedDrop(Rc::new(Cell::new(0)))
    }

    pub fn drops(&self) -> usize {
        self.0.get()
    }
}

impl Deref for CountedDrop {
    type Target = Rc<Cell<usize>>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Drop for CountedDrop {
    fn drop(&mut self) {
        self.0.set(self.0.get() + 1);
    }
}
