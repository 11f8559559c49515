//=========================================================================
// Device Handles
//=========================================================================
//
// Generation-checked handles into a `DeviceArena`.
//
// A handle is a plain `(index, generation)` pair tagged with the device
// type it points at. Closing a device bumps the slot generation, so any
// handle still held by a caller stops resolving in O(1) and can never
// alias a record that later reuses the same slot.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

//=== Handle ==============================================================

/// Typed, generation-checked reference to a registry record.
///
/// Handles are `Copy` and never own anything. Every query made through a
/// stale handle resolves to "closed".
pub struct Handle<T> {
    index: u32,
    generation: u32,
    _kind: PhantomData<fn() -> T>,
}

impl<T> Handle<T> {
    pub(crate) const fn new(index: u32, generation: u32) -> Self {
        Self {
            index,
            generation,
            _kind: PhantomData,
        }
    }

    /// A handle that never resolves to a record.
    ///
    /// Insertion events carry it until the record has been created.
    pub const fn dangling() -> Self {
        Self::new(u32::MAX, u32::MAX)
    }

    /// Returns `true` for the [`dangling`](Self::dangling) placeholder.
    pub fn is_dangling(&self) -> bool {
        self.index == u32::MAX
    }

    /// Storage slot index.
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Slot generation the handle was issued for.
    pub fn generation(&self) -> u32 {
        self.generation
    }
}

//--- Trait Implementations -----------------------------------------------
//
// Implemented by hand: derives would require `T` itself to be
// Copy/Eq/Hash, which device records are not.
//

impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Handle<T> {}

impl<T> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index && self.generation == other.generation
    }
}

impl<T> Eq for Handle<T> {}

impl<T> Hash for Handle<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.index.hash(state);
        self.generation.hash(state);
    }
}

impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_dangling() {
            return write!(f, "Handle(dangling)");
        }
        write!(f, "Handle({}v{})", self.index, self.generation)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    struct Marker;

    #[test]
    fn handles_compare_by_index_and_generation() {
        let a: Handle<Marker> = Handle::new(3, 1);
        let b: Handle<Marker> = Handle::new(3, 1);
        let c: Handle<Marker> = Handle::new(3, 2);

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn handles_are_hashable_without_bounds_on_kind() {
        let mut set = HashSet::new();
        set.insert(Handle::<Marker>::new(0, 0));
        set.insert(Handle::<Marker>::new(0, 0));
        set.insert(Handle::<Marker>::new(1, 0));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn dangling_handle_is_recognized() {
        let h = Handle::<Marker>::dangling();
        assert!(h.is_dangling());
        assert!(!Handle::<Marker>::new(0, 0).is_dangling());
        assert_eq!(format!("{:?}", h), "Handle(dangling)");
    }

    #[test]
    fn debug_shows_index_and_generation() {
        let h = Handle::<Marker>::new(7, 2);
        assert_eq!(format!("{:?}", h), "Handle(7v2)");
    }
}
