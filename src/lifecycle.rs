//! Process-wide state of the DLL: outstanding object count for
//! `DllCanUnloadNow` and the module handle captured on process attach.

use std::sync::OnceLock;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Objects and server locks keeping the module loaded.
pub static INSTANCES: InstanceCounter = InstanceCounter::new();

/// Handle of this module, written once by `DllMain`.
pub static MODULE_HANDLE: ModuleHandleCell = ModuleHandleCell::new();

pub struct InstanceCounter {
    count: AtomicUsize,
}

impl InstanceCounter {
    pub const fn new() -> Self {
        Self {
            count: AtomicUsize::new(0),
        }
    }

    /// Registers a live object until the returned guard is dropped.
    pub fn acquire(&'static self) -> InstanceGuard {
        self.lock();
        InstanceGuard { counter: self }
    }

    /// `IClassFactory::LockServer(TRUE)`
    pub fn lock(&self) {
        self.count.fetch_add(1, Ordering::SeqCst);
    }

    /// `IClassFactory::LockServer(FALSE)`. Unbalanced unlocks are ignored.
    pub fn unlock(&self) {
        let _ = self
            .count
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |count| count.checked_sub(1));
    }

    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    pub fn can_unload(&self) -> bool {
        self.count() == 0
    }
}

impl Default for InstanceCounter {
    fn default() -> Self {
        Self::new()
    }
}

/// Keeps the module loaded while alive.
#[derive(Debug)]
pub struct InstanceGuard {
    counter: &'static InstanceCounter,
}

impl Drop for InstanceGuard {
    fn drop(&mut self) {
        self.counter.unlock();
    }
}

impl std::fmt::Debug for InstanceCounter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InstanceCounter")
            .field("count", &self.count())
            .finish()
    }
}

/// Write-once cell for the raw module handle. Stored as an address so the
/// cell is `Sync`.
pub struct ModuleHandleCell {
    handle: OnceLock<usize>,
}

impl ModuleHandleCell {
    pub const fn new() -> Self {
        Self {
            handle: OnceLock::new(),
        }
    }

    /// Stores `handle` unless one is already stored. Returns whether this
    /// call stored it.
    pub fn init(&self, handle: usize) -> bool {
        self.handle.set(handle).is_ok()
    }

    pub fn get(&self) -> Option<usize> {
        self.handle.get().copied()
    }
}

impl Default for ModuleHandleCell {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unload_reflects_outstanding_instances() {
        static COUNTER: InstanceCounter = InstanceCounter::new();
        assert!(COUNTER.can_unload());

        let first = COUNTER.acquire();
        let second = COUNTER.acquire();
        assert_eq!(COUNTER.count(), 2);
        assert!(!COUNTER.can_unload());

        drop(first);
        assert!(!COUNTER.can_unload());
        assert!(!COUNTER.can_unload());

        drop(second);
        assert!(COUNTER.can_unload());
        assert!(COUNTER.can_unload());
    }

    #[test]
    fn test_server_lock_keeps_module_loaded() {
        let counter = InstanceCounter::new();

        counter.lock();
        assert!(!counter.can_unload());

        counter.unlock();
        assert!(counter.can_unload());
    }

    #[test]
    fn test_unbalanced_unlock_is_ignored() {
        let counter = InstanceCounter::new();

        counter.unlock();
        assert_eq!(counter.count(), 0);

        counter.lock();
        assert_eq!(counter.count(), 1);
    }

    #[test]
    fn test_module_handle_is_written_once() {
        let cell = ModuleHandleCell::new();
        assert_eq!(cell.get(), None);

        assert!(cell.init(0x1000));
        assert!(!cell.init(0x2000));
        assert_eq!(cell.get(), Some(0x1000));
    }
}
