use std::collections::HashMap;
use std::marker::PhantomData;

/// Opaque, typed key into a [`HandleStore`]. Never zero.
#[derive(Debug)]
pub struct Handle<T> {
    id: u64,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Handle<T> {}

impl<T> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> Eq for Handle<T> {}

/// Owns GPU resources and hands out handles to them. Handles are not reused
/// within one store.
pub struct HandleStore<T> {
    items: HashMap<u64, T>,
    next: u64,
}

impl<T> HandleStore<T> {
    pub fn new() -> Self {
        Self {
            items: HashMap::new(),
            next: 1,
        }
    }

    pub fn insert(&mut self, item: T) -> Handle<T> {
        let id = self.next;
        self.next += 1;
        self.items.insert(id, item);
        Handle {
            id,
            _marker: PhantomData,
        }
    }

    pub fn get(&self, handle: Handle<T>) -> Option<&T> {
        self.items.get(&handle.id)
    }

    pub fn remove(&mut self, handle: Handle<T>) -> Option<T> {
        self.items.remove(&handle.id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
}

impl<T> Default for HandleStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_get_remove() {
        let mut store = HandleStore::new();
        let a = store.insert("torus");
        let b = store.insert("star");
        assert_ne!(a, b);
        assert_eq!(store.get(a), Some(&"torus"));
        assert_eq!(store.len(), 2);

        assert_eq!(store.remove(a), Some("torus"));
        assert_eq!(store.get(a), None);
        assert_eq!(store.get(b), Some(&"star"));
    }

    #[test]
    fn test_handles_are_not_reused() {
        let mut store = HandleStore::new();
        let a = store.insert(1);
        store.remove(a);
        let b = store.insert(2);
        assert_ne!(a, b);
        assert_eq!(store.get(b), Some(&2));
        assert_eq!(store.len(), 1);
    }
}
