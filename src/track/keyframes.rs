//! Keyframed 2D positions.

use crate::track::geom::Point2;
use crate::util::math::lerp;
use std::collections::BTreeMap;

/// Storage of per-frame positions for one tracked quantity.
///
/// The tracker writes through this trait only; hosts with their own
/// animation curves implement it to receive keyframes directly.
pub trait KeyframeStore {
    /// Value at `time`, interpolated between keyframes.
    fn position_at(&self, time: i64) -> Point2;

    /// Keyframe stored exactly at `time`, if any.
    fn keyframe_at(&self, time: i64) -> Option<Point2>;

    fn set_position_at(&mut self, time: i64, position: Point2);

    /// Removes the keyframe at `time`; returns whether one existed.
    fn delete_keyframe_at(&mut self, time: i64) -> bool;
}

/// In-memory keyframe curve.
///
/// Between keys the value is linearly interpolated; before the first and
/// after the last key it is held. Without keys the static default applies.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Keyframes {
    default: Point2,
    keys: BTreeMap<i64, Point2>,
}

impl Keyframes {
    /// Curve with a static value and no keys.
    pub fn constant(default: Point2) -> Self {
        Self {
            default,
            keys: BTreeMap::new(),
        }
    }

    /// Curve with a single key at `time`.
    pub fn with_key(time: i64, position: Point2) -> Self {
        let mut curve = Self::constant(position);
        curve.keys.insert(time, position);
        curve
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Keyframes in ascending time order.
    pub fn iter(&self) -> impl Iterator<Item = (i64, Point2)> + '_ {
        self.keys.iter().map(|(&t, &p)| (t, p))
    }

    pub fn times(&self) -> Vec<i64> {
        self.keys.keys().copied().collect()
    }
}

impl KeyframeStore for Keyframes {
    fn position_at(&self, time: i64) -> Point2 {
        if let Some(&p) = self.keys.get(&time) {
            return p;
        }
        let before = self.keys.range(..time).next_back();
        let after = self.keys.range(time..).next();
        match (before, after) {
            (None, None) => self.default,
            (Some((_, &p)), None) | (None, Some((_, &p))) => p,
            (Some((&t0, &p0)), Some((&t1, &p1))) => {
                let t = (time - t0) as f64 / (t1 - t0) as f64;
                Point2::new(lerp(p0.x, p1.x, t), lerp(p0.y, p1.y, t))
            }
        }
    }

    fn keyframe_at(&self, time: i64) -> Option<Point2> {
        self.keys.get(&time).copied()
    }

    fn set_position_at(&mut self, time: i64, position: Point2) {
        self.keys.insert(time, position);
    }

    fn delete_keyframe_at(&mut self, time: i64) -> bool {
        self.keys.remove(&time).is_some()
    }
}
