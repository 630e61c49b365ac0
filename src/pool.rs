//! Fixed-capacity object pool.
//!
//! Every slot is constructed once, up front. `order` lists slot indices with
//! the in-use slots clustered at the front and free slots at the back, so
//! acquiring looks only at the back and releasing moves a slot to the back.
//! Nothing is allocated after construction.

use std::collections::VecDeque;

use crate::entities::{Entity, FireType};
use crate::surface::{DrawSurface, Layers};

/// Parameters handed to a slot when it is spawned or retargeted.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpawnRequest {
    pub x: f32,
    pub y: f32,
    pub speed: f32,
    pub level: u8,
    pub fire_type: FireType,
}

impl SpawnRequest {
    /// An upward shot with no intensity. Level 0 matches the default
    /// `Poolable::level`, so a saturated pool leaves its live slots alone.
    pub fn simple(x: f32, y: f32, speed: f32) -> Self {
        SpawnRequest { x, y, speed, level: 0, fire_type: FireType::Up }
    }
}

/// An entity that can live in a `Pool`.
pub trait Poolable: Entity {
    fn is_alive(&self) -> bool;
    fn spawn(&mut self, request: &SpawnRequest);
    /// Called instead of `spawn` when the pool is saturated and the request
    /// carries a different intensity level.
    fn retarget(&mut self, _level: u8) {}
    /// Drive the slot toward release (intensity 0).
    fn extinguish(&mut self) {}
    /// True once the last `update` left the slot ready for release.
    fn finished(&self) -> bool;
    fn clear(&mut self);
    fn level(&self) -> u8 {
        0
    }
}

#[derive(Debug)]
pub struct Pool<T> {
    slots: Vec<T>,
    order: VecDeque<usize>,
}

impl<T: Poolable> Pool<T> {
    /// Build a pool of `capacity` slots using `make` for each one.
    ///
    /// Panics if `capacity` is zero: a pool always has a tail slot.
    pub fn new(capacity: usize, mut make: impl FnMut() -> T) -> Self {
        assert!(capacity > 0, "pool capacity must be at least 1");
        let slots: Vec<T> = (0..capacity).map(|_| make()).collect();
        Pool {
            slots,
            order: (0..capacity).collect(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    fn tail(&self) -> usize {
        self.order[self.order.len() - 1]
    }

    /// Spawn the tail slot if it is free and rotate it to the front.
    ///
    /// When the tail is alive the pool is saturated; a differing intensity
    /// level is written into the live slot instead.
    pub fn acquire(&mut self, request: SpawnRequest) {
        let tail = self.tail();
        let slot = &mut self.slots[tail];
        if !slot.is_alive() {
            slot.spawn(&request);
            self.order.rotate_right(1);
        } else if slot.level() != request.level {
            slot.retarget(request.level);
        }
    }

    /// Spawn two slots, or none if fewer than two are free.
    pub fn acquire_pair(&mut self, first: SpawnRequest, second: SpawnRequest) {
        let len = self.order.len();
        if len < 2 {
            return;
        }
        let last = self.order[len - 1];
        let before_last = self.order[len - 2];
        if !self.slots[last].is_alive() && !self.slots[before_last].is_alive() {
            self.acquire(first);
            self.acquire(second);
        }
    }

    /// Force every live slot to intensity 0 so it retracts on its next step.
    pub fn cancel(&mut self) {
        for slot in self.slots.iter_mut().filter(|s| s.is_alive()) {
            slot.extinguish();
        }
    }

    /// Update and draw every live slot. A slot that reports `finished` is
    /// cleared and moved to the back of the ordering instead of drawn.
    pub fn animate_all<S: DrawSurface>(&mut self, layers: &mut Layers<S>) {
        let mut i = 0;
        while i < self.order.len() {
            let index = self.order[i];
            let slot = &mut self.slots[index];
            if !slot.is_alive() {
                break;
            }
            slot.update();
            if slot.finished() {
                slot.clear();
                if let Some(freed) = self.order.remove(i) {
                    self.order.push_back(freed);
                }
                continue;
            }
            let layer = slot.layer();
            slot.draw(layers.get_mut(layer));
            i += 1;
        }
    }

    /// Clones of the live slots, in no particular order.
    pub fn snapshot_alive(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.iter_alive().map(|(_, slot)| slot.clone()).collect()
    }

    /// Live slots paired with their stable slot index.
    pub fn iter_alive(&self) -> impl Iterator<Item = (usize, &T)> {
        self.order
            .iter()
            .map(move |&i| (i, &self.slots[i]))
            .take_while(|(_, slot)| slot.is_alive())
    }

    pub fn alive_count(&self) -> usize {
        self.iter_alive().count()
    }

    pub fn slot(&self, index: usize) -> &T {
        &self.slots[index]
    }

    pub fn slot_mut(&mut self, index: usize) -> &mut T {
        &mut self.slots[index]
    }
}
