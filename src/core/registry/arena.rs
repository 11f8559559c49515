//=========================================================================
// Device Arena
//=========================================================================
//
// Open/closed object collection for one device or resource kind.
//
// Architecture:
//   insert() → Slot { generation, Entry { id, created, value } } → Handle
//   remove() → generation += 1, slot pushed on free list, id retired
//
// Membership, listing and counting are all answered from the slot table.
// Listing is ordered by creation stamp, never by storage position, since
// freed slots are recycled out of order.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashSet;

use log::debug;

//=== Internal Dependencies ===============================================

use super::handle::Handle;

//=== Storage =============================================================

struct Entry<T> {
    id: u32,
    created: u64,
    value: T,
}

struct Slot<T> {
    generation: u32,
    entry: Option<Entry<T>>,
}

//=== DeviceArena =========================================================

/// Generation-checked store of live records of one kind.
pub struct DeviceArena<T> {
    kind: &'static str,
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
    ids: HashSet<u32>,
    /// Identifiers of closed records; never handed out again.
    retired: HashSet<u32>,
}

impl<T> DeviceArena<T> {
    //--- Construction -----------------------------------------------------

    pub(crate) fn new(kind: &'static str) -> Self {
        Self {
            kind,
            slots: Vec::new(),
            free: Vec::new(),
            ids: HashSet::new(),
            retired: HashSet::new(),
        }
    }

    /// Name of the record kind, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        self.kind
    }

    //--- Mutation ---------------------------------------------------------

    /// Stores `value` and returns its handle.
    ///
    /// `next_id` is drawn until it yields an identifier this collection
    /// has never issued, so a closed record's id cannot come back.
    pub(crate) fn insert(
        &mut self,
        value: T,
        created: u64,
        mut next_id: impl FnMut() -> u32,
    ) -> Handle<T> {
        let mut id = next_id();
        while self.ids.contains(&id) || self.retired.contains(&id) {
            debug!(target: "registry", "{} id {:#010x} collides, regenerating", self.kind, id);
            id = next_id();
        }
        self.ids.insert(id);

        let entry = Entry { id, created, value };

        match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.entry = Some(entry);
                Handle::new(index, slot.generation)
            }
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(Slot {
                    generation: 0,
                    entry: Some(entry),
                });
                Handle::new(index, 0)
            }
        }
    }

    /// Removes the record behind `handle`, invalidating every copy of it.
    ///
    /// Returns `None` if the handle was already stale.
    pub(crate) fn remove(&mut self, handle: Handle<T>) -> Option<T> {
        let slot = self.live_slot_mut(handle)?;
        let entry = slot.entry.take()?;
        slot.generation = slot.generation.wrapping_add(1);

        self.ids.remove(&entry.id);
        self.retired.insert(entry.id);
        self.free.push(handle.index());
        Some(entry.value)
    }

    //--- Queries ----------------------------------------------------------

    /// Returns `true` while the record behind `handle` is alive.
    pub fn is_open(&self, handle: Handle<T>) -> bool {
        self.entry(handle).is_some()
    }

    pub fn get(&self, handle: Handle<T>) -> Option<&T> {
        self.entry(handle).map(|e| &e.value)
    }

    pub fn get_mut(&mut self, handle: Handle<T>) -> Option<&mut T> {
        self.live_slot_mut(handle)?
            .entry
            .as_mut()
            .map(|e| &mut e.value)
    }

    /// Random identifier assigned at creation.
    pub fn id(&self, handle: Handle<T>) -> Option<u32> {
        self.entry(handle).map(|e| e.id)
    }

    /// Creation stamp (monotonic across the whole registry).
    pub fn created(&self, handle: Handle<T>) -> Option<u64> {
        self.entry(handle).map(|e| e.created)
    }

    /// Live handles ordered by creation.
    pub fn list(&self) -> Vec<Handle<T>> {
        let mut live: Vec<(u64, Handle<T>)> = self
            .iter_with_stamp()
            .map(|(stamp, handle, _)| (stamp, handle))
            .collect();
        live.sort_by_key(|(stamp, _)| *stamp);
        live.into_iter().map(|(_, h)| h).collect()
    }

    /// Number of live records.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Iterates live records in storage order.
    pub fn iter(&self) -> impl Iterator<Item = (Handle<T>, &T)> {
        self.iter_with_stamp().map(|(_, h, v)| (h, v))
    }

    /// Oldest live record matching `predicate`.
    pub fn find(&self, mut predicate: impl FnMut(&T) -> bool) -> Option<Handle<T>> {
        self.iter_with_stamp()
            .filter(|(_, _, value)| predicate(value))
            .min_by_key(|(stamp, _, _)| *stamp)
            .map(|(_, handle, _)| handle)
    }

    //--- Internal Helpers -------------------------------------------------

    fn entry(&self, handle: Handle<T>) -> Option<&Entry<T>> {
        let slot = self.slots.get(handle.index() as usize)?;
        if slot.generation != handle.generation() {
            return None;
        }
        slot.entry.as_ref()
    }

    fn live_slot_mut(&mut self, handle: Handle<T>) -> Option<&mut Slot<T>> {
        let slot = self.slots.get_mut(handle.index() as usize)?;
        if slot.generation != handle.generation() || slot.entry.is_none() {
            return None;
        }
        Some(slot)
    }

    fn iter_with_stamp(&self) -> impl Iterator<Item = (u64, Handle<T>, &T)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.entry.as_ref().map(|e| {
                (
                    e.created,
                    Handle::new(index as u32, slot.generation),
                    &e.value,
                )
            })
        })
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    //--- Test Helpers -----------------------------------------------------

    fn counter() -> impl FnMut() -> u32 {
        let mut next = 0;
        move || {
            next += 1;
            next
        }
    }

    fn arena() -> DeviceArena<&'static str> {
        DeviceArena::new("test")
    }

    //=====================================================================
    // Lifecycle Tests
    //=====================================================================

    #[test]
    fn insert_then_query() {
        let mut a = arena();
        let h = a.insert("pad", 0, counter());

        assert!(a.is_open(h));
        assert_eq!(a.get(h), Some(&"pad"));
        assert_eq!(a.id(h), Some(1));
        assert_eq!(a.len(), 1);
    }

    #[test]
    fn removed_handle_is_closed() {
        let mut a = arena();
        let h = a.insert("pad", 0, counter());

        assert_eq!(a.remove(h), Some("pad"));
        assert!(!a.is_open(h));
        assert!(a.get(h).is_none());
        assert!(a.id(h).is_none());
        assert!(a.is_empty());
    }

    #[test]
    fn double_remove_is_none() {
        let mut a = arena();
        let h = a.insert("pad", 0, counter());
        a.remove(h);
        assert_eq!(a.remove(h), None);
    }

    #[test]
    fn recycled_slot_does_not_alias_stale_handle() {
        let mut a = arena();
        let mut ids = counter();
        let old = a.insert("first", 0, &mut ids);
        a.remove(old);

        let new = a.insert("second", 1, &mut ids);
        assert_eq!(old.index(), new.index(), "slot should be reused");
        assert_ne!(old, new);
        assert!(a.get(old).is_none());
        assert_eq!(a.get(new), Some(&"second"));
    }

    #[test]
    fn get_mut_on_stale_handle_is_none() {
        let mut a = arena();
        let h = a.insert("pad", 0, counter());
        a.remove(h);
        assert!(a.get_mut(h).is_none());
    }

    //=====================================================================
    // Identifier Tests
    //=====================================================================

    #[test]
    fn colliding_id_is_regenerated() {
        let mut a = arena();
        let mut sequence = vec![7, 7, 7, 9].into_iter();
        let first = a.insert("a", 0, || 7);
        let second = a.insert("b", 1, || sequence.next().unwrap_or(11));

        assert_eq!(a.id(first), Some(7));
        assert_eq!(a.id(second), Some(9));
    }

    #[test]
    fn closed_id_is_never_reissued() {
        let mut a = arena();
        let h = a.insert("a", 0, || 5);
        a.remove(h);

        let mut sequence = vec![5, 5, 6].into_iter();
        let again = a.insert("b", 1, || sequence.next().unwrap_or(8));
        assert_eq!(a.id(again), Some(6));
        assert_eq!(a.len(), 1);
    }

    //=====================================================================
    // Listing Tests
    //=====================================================================

    #[test]
    fn list_is_ordered_by_creation_not_storage() {
        let mut a = arena();
        let mut ids = counter();
        let h0 = a.insert("zero", 10, &mut ids);
        let h1 = a.insert("one", 11, &mut ids);
        a.remove(h0);
        // Reuses slot 0 but was created last.
        let h2 = a.insert("two", 12, &mut ids);

        assert_eq!(a.list(), vec![h1, h2]);
    }

    #[test]
    fn find_returns_oldest_match() {
        let mut a = arena();
        let mut ids = counter();
        let h0 = a.insert("pad", 5, &mut ids);
        let _h1 = a.insert("pad", 6, &mut ids);

        assert_eq!(a.find(|v| *v == "pad"), Some(h0));
        assert_eq!(a.find(|v| *v == "wheel"), None);
    }

    #[test]
    fn handle_from_other_slot_range_is_closed() {
        let a = arena();
        assert!(!a.is_open(Handle::new(42, 0)));
        assert!(!a.is_open(Handle::dangling()));
    }
}
