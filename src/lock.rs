//! Register critical sections
//!
//! A store is a read followed by a write. When two users update sibling
//! fields of the same register without holding a common lock, the second
//! write carries the stale copy of the first field and the first update is
//! lost. [`RegisterLock`] makes the critical section explicit: everything
//! done inside [`RegisterLock::with_register_lock`] runs with exclusive use
//! of the device.
//!
//! Locks here are device-granular, which covers any register range.

use core::cell::RefCell;

use crate::access::RegisterAccess;

/// Shared handle to a register transport
pub trait RegisterLock {
    /// The transport guarded by this lock
    type Access: RegisterAccess;

    /// Run `f` with exclusive use of the registers
    /// `register..register + count`
    fn with_register_lock<R>(
        &self,
        register: u32,
        count: usize,
        f: impl FnOnce(&mut Self::Access) -> R,
    ) -> R;
}

/// Single execution context (no preemption between users)
///
/// # Panics
/// Re-entering the lock from inside `f` panics.
impl<A: RegisterAccess> RegisterLock for RefCell<A> {
    type Access = A;

    fn with_register_lock<R>(
        &self,
        _register: u32,
        _count: usize,
        f: impl FnOnce(&mut Self::Access) -> R,
    ) -> R {
        f(&mut *self.borrow_mut())
    }
}

impl<L: RegisterLock + ?Sized> RegisterLock for &L {
    type Access = L::Access;

    fn with_register_lock<R>(
        &self,
        register: u32,
        count: usize,
        f: impl FnOnce(&mut Self::Access) -> R,
    ) -> R {
        (**self).with_register_lock(register, count, f)
    }
}

/// Threads sharing one device
///
/// A poisoned mutex is recovered: the registers live in hardware, so a
/// panicking holder cannot leave a half-updated copy behind.
#[cfg(feature = "std")]
impl<A: RegisterAccess> RegisterLock for std::sync::Mutex<A> {
    type Access = A;

    fn with_register_lock<R>(
        &self,
        _register: u32,
        _count: usize,
        f: impl FnOnce(&mut Self::Access) -> R,
    ) -> R {
        let mut guard = self
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        f(&mut *guard)
    }
}

#[cfg(feature = "std")]
impl<L: RegisterLock + ?Sized> RegisterLock for std::sync::Arc<L> {
    type Access = L::Access;

    fn with_register_lock<R>(
        &self,
        register: u32,
        count: usize,
        f: impl FnOnce(&mut Self::Access) -> R,
    ) -> R {
        (**self).with_register_lock(register, count, f)
    }
}
