//! Lock with selectable fairness.  Waiters park rather than spin.

use parking_lot::{FairMutex, Mutex};

/// Fair locks hand the lock to waiters in arrival order; unfair ones let a thread that is already
/// running barge in ahead of parked waiters.
pub enum Lock<T> {
    Unfair(Mutex<T>),
    Fair(FairMutex<T>),
}

impl<T> Lock<T> {
    pub fn new(value: T, fair: bool) -> Self {
        if fair {
            Self::Fair(FairMutex::new(value))
        } else {
            Self::Unfair(Mutex::new(value))
        }
    }

    pub fn is_fair(&self) -> bool {
        matches!(self, Self::Fair(_))
    }

    /// Run `f` with exclusive access to the protected value.
    pub fn with<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        match self {
            Self::Unfair(m) => f(&mut *m.lock()),
            Self::Fair(m) => f(&mut *m.lock()),
        }
    }
}
