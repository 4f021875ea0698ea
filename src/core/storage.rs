use std::collections::BTreeMap;
use crate::core::{BodyHandle, ConstraintHandle};
use crate::error::PhysicsError;
use crate::Result;

/// Generic storage trait for physics objects addressed by stable handles
pub trait Storage<T, H> {
    /// Creates a new empty storage
    fn new() -> Self;

    /// Adds an item to the storage and returns its handle
    fn add(&mut self, item: T) -> H;

    fn get(&self, handle: H) -> Option<&T>;

    fn get_mut(&mut self, handle: H) -> Option<&mut T>;

    fn remove(&mut self, handle: H) -> Option<T>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool;

    fn clear(&mut self);

    /// Returns all live handles in ascending order
    fn handles(&self) -> Vec<H>;

    /// Iterates items in ascending handle order
    fn iter<'a>(&'a self) -> impl Iterator<Item = (H, &'a T)> + 'a where T: 'a;

    fn iter_mut<'a>(&'a mut self) -> impl Iterator<Item = (H, &'a mut T)> + 'a where T: 'a;
}

// Handles are never reused, so a stale handle can't alias a newer item. Items
// live in a BTreeMap so iteration (and therefore solver order) is deterministic.
macro_rules! handle_storage {
    ($(#[$meta:meta])* $name:ident, $handle:ident) => {
        $(#[$meta])*
        pub struct $name<T> {
            items: BTreeMap<$handle, T>,
            next_id: u32,
        }

        impl<T> Storage<T, $handle> for $name<T> {
            fn new() -> Self {
                Self {
                    items: BTreeMap::new(),
                    next_id: 1, // 0 is never handed out
                }
            }

            fn add(&mut self, item: T) -> $handle {
                let handle = $handle(self.next_id);
                self.next_id += 1;
                self.items.insert(handle, item);
                handle
            }

            fn get(&self, handle: $handle) -> Option<&T> {
                self.items.get(&handle)
            }

            fn get_mut(&mut self, handle: $handle) -> Option<&mut T> {
                self.items.get_mut(&handle)
            }

            fn remove(&mut self, handle: $handle) -> Option<T> {
                self.items.remove(&handle)
            }

            fn len(&self) -> usize {
                self.items.len()
            }

            fn is_empty(&self) -> bool {
                self.items.is_empty()
            }

            fn clear(&mut self) {
                self.items.clear();
            }

            fn handles(&self) -> Vec<$handle> {
                self.items.keys().copied().collect()
            }

            fn iter<'a>(&'a self) -> impl Iterator<Item = ($handle, &'a T)> + 'a where T: 'a {
                self.items.iter().map(|(h, item)| (*h, item))
            }

            fn iter_mut<'a>(&'a mut self) -> impl Iterator<Item = ($handle, &'a mut T)> + 'a where T: 'a {
                self.items.iter_mut().map(|(h, item)| (*h, item))
            }
        }

        impl<T> Default for $name<T> {
            fn default() -> Self {
                <Self as Storage<T, $handle>>::new()
            }
        }
    };
}

handle_storage!(
    /// Storage for rigid bodies
    BodyStorage,
    BodyHandle
);

handle_storage!(
    /// Storage for constraints
    ConstraintStorage,
    ConstraintHandle
);

impl<T> BodyStorage<T> {
    /// Gets a body by its handle, failing with `InvalidBodyReference` if it is gone
    pub fn get_body(&self, handle: BodyHandle) -> Result<&T> {
        self.get(handle)
            .ok_or_else(|| PhysicsError::InvalidBodyReference(format!("Body with handle {:?} not found", handle)))
    }

    /// Gets a mutable reference to a body, failing with `InvalidBodyReference` if it is gone
    pub fn get_body_mut(&mut self, handle: BodyHandle) -> Result<&mut T> {
        self.get_mut(handle)
            .ok_or_else(|| PhysicsError::InvalidBodyReference(format!("Body with handle {:?} not found", handle)))
    }

    /// Returns true if the handle refers to a live body
    pub fn contains(&self, handle: BodyHandle) -> bool {
        self.items.contains_key(&handle)
    }

    /// Borrows two distinct bodies at once
    pub fn get_pair(&self, a: BodyHandle, b: BodyHandle) -> Result<(&T, &T)> {
        Ok((self.get_body(a)?, self.get_body(b)?))
    }
}

impl<T> ConstraintStorage<T> {
    /// Gets a constraint by its handle, returning an error if not found
    pub fn get_constraint(&self, handle: ConstraintHandle) -> Result<&T> {
        self.get(handle)
            .ok_or_else(|| PhysicsError::ResourceNotFound(format!("Constraint with handle {:?} not found", handle)))
    }

    /// Gets a mutable reference to a constraint by its handle, returning an error if not found
    pub fn get_constraint_mut(&mut self, handle: ConstraintHandle) -> Result<&mut T> {
        self.get_mut(handle)
            .ok_or_else(|| PhysicsError::ResourceNotFound(format!("Constraint with handle {:?} not found", handle)))
    }
}
