//! Locking Strategies
//!
//! A cache owns its entry table through one of two guards, picked by a type
//! parameter: a real mutex, or a `RefCell` for single-threaded embedding.
//! The `RefCell` variant is `!Sync`, so sharing it across threads is a
//! compile error rather than a silent race.

use std::cell::RefCell;

use parking_lot::Mutex;

// == Guard ==
/// Exclusive access to a value for the duration of a closure.
pub trait Guarded<T> {
    fn new(value: T) -> Self;

    fn with<R>(&self, f: impl FnOnce(&mut T) -> R) -> R;
}

impl<T> Guarded<T> for Mutex<T> {
    fn new(value: T) -> Self {
        Mutex::new(value)
    }

    fn with<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        f(&mut self.lock())
    }
}

impl<T> Guarded<T> for RefCell<T> {
    fn new(value: T) -> Self {
        RefCell::new(value)
    }

    fn with<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        f(&mut self.borrow_mut())
    }
}

// == Lock Policy ==
/// Chooses the guard a cache stores its state in.
pub trait LockPolicy {
    type Lock<T>: Guarded<T>;
}

/// Every operation holds a [`parking_lot::Mutex`]; the cache is `Sync`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Synchronized;

impl LockPolicy for Synchronized {
    type Lock<T> = Mutex<T>;
}

/// No locking; the cache is confined to one thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unsynchronized;

impl LockPolicy for Unsynchronized {
    type Lock<T> = RefCell<T>;
}
