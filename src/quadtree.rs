//! Region quadtree used as the collision broad phase.
//!
//! Rebuilt from scratch every tick. An object lives at the shallowest node
//! whose bounds fully contain it; a node splits once, the first time it holds
//! more than `MAX_OBJECTS` while shallower than `MAX_LEVELS`.
//!
//! `find_objects` only descends into the single quadrant that fully contains
//! the query, so objects in sibling quadrants are never returned.

use std::fmt;

use crate::entities::Rect;

pub const MAX_OBJECTS: usize = 10;
pub const MAX_LEVELS: usize = 5;

pub const NE: usize = 0;
pub const NW: usize = 1;
pub const SW: usize = 2;
pub const SE: usize = 3;

pub trait Bounded {
    fn bounds(&self) -> Rect;
}

impl Bounded for Rect {
    fn bounds(&self) -> Rect {
        *self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuadTreeError {
    /// Non-finite coordinates or negative size.
    InvalidBounds,
}

impl fmt::Display for QuadTreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuadTreeError::InvalidBounds => write!(f, "object has invalid bounds"),
        }
    }
}

impl std::error::Error for QuadTreeError {}

#[derive(Debug, Clone)]
pub struct QuadTree<T> {
    bounds: Rect,
    depth: usize,
    objects: Vec<T>,
    children: Option<Box<[QuadTree<T>; 4]>>,
}

impl<T: Bounded + Clone> QuadTree<T> {
    pub fn new(bounds: Rect) -> Self {
        Self::with_depth(bounds, 0)
    }

    fn with_depth(bounds: Rect, depth: usize) -> Self {
        QuadTree {
            bounds,
            depth,
            objects: Vec::new(),
            children: None,
        }
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Objects held at this node only.
    pub fn objects(&self) -> &[T] {
        &self.objects
    }

    pub fn has_children(&self) -> bool {
        self.children.is_some()
    }

    pub fn children(&self) -> Option<&[QuadTree<T>; 4]> {
        self.children.as_deref()
    }

    /// Total objects in this node and every descendant.
    pub fn len(&self) -> usize {
        self.objects.len()
            + self
                .children
                .as_ref()
                .map_or(0, |c| c.iter().map(|n| n.len()).sum())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        self.objects.clear();
        self.children = None;
    }

    fn split(&mut self) {
        let half_w = self.bounds.width / 2.0;
        let half_h = self.bounds.height / 2.0;
        let x = self.bounds.x;
        let y = self.bounds.y;
        let depth = self.depth + 1;
        self.children = Some(Box::new([
            QuadTree::with_depth(Rect::new(x + half_w, y, half_w, half_h), depth),
            QuadTree::with_depth(Rect::new(x, y, half_w, half_h), depth),
            QuadTree::with_depth(Rect::new(x, y + half_h, half_w, half_h), depth),
            QuadTree::with_depth(Rect::new(x + half_w, y + half_h, half_w, half_h), depth),
        ]));
    }

    /// Quadrant that fully contains `rect`, or `None` when it straddles a
    /// midpoint.
    pub fn get_index(&self, rect: &Rect) -> Option<usize> {
        let mid_x = self.bounds.x + self.bounds.width / 2.0;
        let mid_y = self.bounds.y + self.bounds.height / 2.0;

        let top = rect.y < mid_y && rect.bottom() < mid_y;
        let bottom = rect.y > mid_y;
        let left = rect.x < mid_x && rect.right() < mid_x;
        let right = rect.x > mid_x;

        match (left, right, top, bottom) {
            (false, true, true, _) => Some(NE),
            (true, false, true, _) => Some(NW),
            (true, false, _, true) => Some(SW),
            (false, true, _, true) => Some(SE),
            _ => None,
        }
    }

    pub fn insert(&mut self, object: T) -> Result<(), QuadTreeError> {
        let rect = object.bounds();
        if !rect.is_valid() {
            log::warn!("quadtree insert rejected: invalid bounds {rect:?}");
            return Err(QuadTreeError::InvalidBounds);
        }
        self.insert_valid(object, rect);
        Ok(())
    }

    fn insert_valid(&mut self, object: T, rect: Rect) {
        if let Some(index) = self.get_index(&rect) {
            if let Some(children) = self.children.as_mut() {
                children[index].insert_valid(object, rect);
                return;
            }
        }

        self.objects.push(object);

        if self.objects.len() > MAX_OBJECTS && self.depth < MAX_LEVELS {
            if self.children.is_none() {
                self.split();
            }
            let retained = std::mem::take(&mut self.objects);
            for object in retained {
                let rect = object.bounds();
                match (self.get_index(&rect), self.children.as_mut()) {
                    (Some(index), Some(children)) => children[index].insert_valid(object, rect),
                    _ => self.objects.push(object),
                }
            }
        }
    }

    /// Every object in the tree.
    pub fn get_all_objects(&self) -> Vec<T> {
        let mut out = Vec::with_capacity(self.len());
        self.collect_all(&mut out);
        out
    }

    fn collect_all(&self, out: &mut Vec<T>) {
        if let Some(children) = &self.children {
            for child in children.iter() {
                child.collect_all(out);
            }
        }
        out.extend(self.objects.iter().cloned());
    }

    /// Objects that could collide with `query`: those held on the path from
    /// this node down to the deepest quadrant fully containing it.
    pub fn find_objects(&self, query: &Rect) -> Vec<T> {
        let mut out = Vec::new();
        if !query.is_valid() {
            log::warn!("quadtree query rejected: invalid bounds {query:?}");
            return out;
        }
        self.collect_candidates(query, &mut out);
        out
    }

    fn collect_candidates(&self, query: &Rect, out: &mut Vec<T>) {
        if let (Some(index), Some(children)) = (self.get_index(query), &self.children) {
            children[index].collect_candidates(query, out);
        }
        out.extend(self.objects.iter().cloned());
    }
}
