//! Pixel → key inversion shared by hover and brush.

use crate::index::{KeyBucket, KeyIndex};
use crate::key::Key;
use crate::scale::XScale;

/// Maps x pixels back to keys and key buckets for one [`XScale`].
#[derive(Clone, Copy, Debug)]
pub struct CoordinateInverter<'a> {
    x: &'a XScale,
    index: &'a KeyIndex,
}

impl<'a> CoordinateInverter<'a> {
    pub fn new(x: &'a XScale, index: &'a KeyIndex) -> Self {
        Self { x, index }
    }

    pub fn index(&self) -> &'a KeyIndex {
        self.index
    }

    /// Key under pixel `px`, or `None` when `px` is outside the x range.
    pub fn invert(&self, px: f64) -> Option<Key> {
        self.x.invert(px)
    }

    /// Like [`invert`](Self::invert), but clamps `px` into the x range first.
    pub fn invert_clamped(&self, px: f64) -> Option<Key> {
        if !px.is_finite() {
            return None;
        }
        let (a, b) = self.x.range();
        self.invert(px.clamp(a.min(b), a.max(b)))
    }

    /// Bucket index under `px` via left bisection; `None` means no match.
    pub fn bucket_index_at(&self, px: f64) -> Option<usize> {
        self.invert(px).and_then(|k| self.index.lookup_index(&k))
    }

    pub fn bucket_at(&self, px: f64) -> Option<&'a KeyBucket> {
        self.bucket_index_at(px).and_then(|i| self.index.get(i))
    }

    /// Pixel position of `key` on the x scale.
    pub fn pixel_of(&self, key: &Key) -> Option<f64> {
        self.x.map_key(key)
    }
}
