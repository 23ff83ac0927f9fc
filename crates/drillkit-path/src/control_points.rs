//! Interactive control-point editing over a [`Path`].
//!
//! The manager flattens every segment's handles into global control points,
//! merging handles that sit on the exact same coordinate. Dragging one
//! merged point moves every hooked segment in lock step, which is what keeps
//! adjacent segments visually joined while editing.

use std::collections::HashMap;

use tracing::{debug, warn};
use uuid::Uuid;

use crate::path::Path;
use crate::segment::{ControlPointKind, Point, Segment, SegmentHook};

/// A deduplicated, path-wide editable handle. One global point can hook into
/// several segments when they share a coordinate (typically the end of one
/// segment and the start of the next).
#[derive(Debug, Clone, PartialEq)]
pub struct GlobalControlPoint {
    /// Stable identity for the lifetime of the manager's current index.
    pub id: Uuid,
    /// Current position.
    pub point: Point,
    /// Every segment handle that sits on this coordinate.
    pub segment_hooks: Vec<SegmentHook>,
}

/// Handle returned by [`ControlPointManager::add_move_callback`], used to
/// unregister the callback later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallbackId(u64);

type MoveCallback = Box<dyn FnMut(Uuid, Point) -> anyhow::Result<()>>;

/// Owns a [`Path`] and maintains the global control point index over it.
///
/// The index is rebuilt explicitly: mutating the path through
/// [`ControlPointManager::path_mut`] leaves the index stale until
/// [`ControlPointManager::rebuild_control_points`] is called. The
/// `add_segment` / `remove_segment` / `clear` wrappers rebuild for you.
pub struct ControlPointManager {
    path: Path,
    control_points: Vec<GlobalControlPoint>,
    callbacks: Vec<(CallbackId, MoveCallback)>,
    next_callback_id: u64,
}

impl ControlPointManager {
    pub fn new(path: Path) -> Self {
        let mut manager = Self {
            path,
            control_points: Vec::new(),
            callbacks: Vec::new(),
            next_callback_id: 0,
        };
        manager.rebuild_control_points();
        manager
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Direct mutable access to the path. The control point index is NOT
    /// rebuilt automatically; call
    /// [`ControlPointManager::rebuild_control_points`] after structural
    /// changes.
    pub fn path_mut(&mut self) -> &mut Path {
        &mut self.path
    }

    /// Consumes the manager, returning the edited path.
    pub fn into_path(self) -> Path {
        self.path
    }

    /// Rebuilds the global control point index from the current path.
    /// Handles are merged by exact coordinate equality; a handle nudged off
    /// by any amount is a distinct point.
    pub fn rebuild_control_points(&mut self) {
        self.control_points.clear();
        let mut by_coordinate: HashMap<(u64, u64), usize> = HashMap::new();

        for (segment_index, segment) in self.path.segments().iter().enumerate() {
            for cp in segment.control_points(segment_index) {
                let hook = SegmentHook {
                    segment_index,
                    kind: cp.kind,
                    point_index: cp.point_index,
                };
                let key = (cp.point.x.to_bits(), cp.point.y.to_bits());
                match by_coordinate.get(&key) {
                    Some(&slot) => self.control_points[slot].segment_hooks.push(hook),
                    None => {
                        by_coordinate.insert(key, self.control_points.len());
                        self.control_points.push(GlobalControlPoint {
                            id: Uuid::new_v4(),
                            point: cp.point,
                            segment_hooks: vec![hook],
                        });
                    }
                }
            }
        }
        debug!(
            segments = self.path.len(),
            control_points = self.control_points.len(),
            "rebuilt control point index"
        );
    }

    /// The control point hooked to the start of the first segment.
    pub fn get_first_control_point(&self) -> Option<&GlobalControlPoint> {
        self.control_points.iter().find(|cp| {
            cp.segment_hooks
                .iter()
                .any(|hook| hook.segment_index == 0 && hook.kind == ControlPointKind::Start)
        })
    }

    /// The control point hooked to the end of the last segment.
    pub fn get_last_control_point(&self) -> Option<&GlobalControlPoint> {
        let last = self.path.len().checked_sub(1)?;
        self.control_points.iter().find(|cp| {
            cp.segment_hooks
                .iter()
                .any(|hook| hook.segment_index == last && hook.kind == ControlPointKind::End)
        })
    }

    /// All global control points, optionally without the path's endpoints.
    /// Interactive editors exclude the endpoints when those are anchored to
    /// something else.
    pub fn get_all_control_points(
        &self,
        exclude_first: bool,
        exclude_last: bool,
    ) -> Vec<&GlobalControlPoint> {
        let first_id = exclude_first
            .then(|| self.get_first_control_point().map(|cp| cp.id))
            .flatten();
        let last_id = exclude_last
            .then(|| self.get_last_control_point().map(|cp| cp.id))
            .flatten();
        self.control_points
            .iter()
            .filter(|cp| Some(cp.id) != first_id && Some(cp.id) != last_id)
            .collect()
    }

    /// Control points with at least one hook into segment `segment_index`.
    pub fn get_control_points_for_segment(
        &self,
        segment_index: usize,
    ) -> Vec<&GlobalControlPoint> {
        self.control_points
            .iter()
            .filter(|cp| {
                cp.segment_hooks
                    .iter()
                    .any(|hook| hook.segment_index == segment_index)
            })
            .collect()
    }

    pub fn get_control_point(&self, id: Uuid) -> Option<&GlobalControlPoint> {
        self.control_points.iter().find(|cp| cp.id == id)
    }

    /// Moves a control point, updating every hooked segment.
    ///
    /// All updated segments are staged first and committed only when every
    /// hook applies cleanly; a failing hook leaves the path untouched.
    /// Returns false for an unknown id or any per-segment failure. Move
    /// callbacks fire after a successful commit; their errors are logged
    /// and never propagate.
    pub fn move_control_point(&mut self, id: Uuid, new_point: Point) -> bool {
        let Some(position) = self.control_points.iter().position(|cp| cp.id == id) else {
            return false;
        };

        let mut staged: HashMap<usize, Segment> = HashMap::new();
        for hook in &self.control_points[position].segment_hooks {
            // Chain edits when several hooks land on the same segment.
            let current = match staged.remove(&hook.segment_index) {
                Some(segment) => segment,
                None => match self.path.segment(hook.segment_index) {
                    Some(segment) => segment.clone(),
                    None => {
                        warn!(
                            segment_index = hook.segment_index,
                            "control point hook references a missing segment; index is stale"
                        );
                        return false;
                    }
                },
            };
            match current.with_control_point(hook.kind, hook.point_index, new_point) {
                Ok(updated) => {
                    staged.insert(hook.segment_index, updated);
                }
                Err(error) => {
                    warn!(%error, segment_index = hook.segment_index, "control point move rejected");
                    return false;
                }
            }
        }

        for (segment_index, segment) in staged {
            self.path.replace_segment(segment_index, segment);
        }
        self.control_points[position].point = new_point;
        self.fire_callbacks(id, new_point);
        true
    }

    fn fire_callbacks(&mut self, id: Uuid, point: Point) {
        for (callback_id, callback) in &mut self.callbacks {
            if let Err(error) = callback(id, point) {
                warn!(%error, callback_id = callback_id.0, "control point move callback failed");
            }
        }
    }

    /// Registers a callback fired after every successful move. The returned
    /// handle unregisters it.
    pub fn add_move_callback<F>(&mut self, callback: F) -> CallbackId
    where
        F: FnMut(Uuid, Point) -> anyhow::Result<()> + 'static,
    {
        let id = CallbackId(self.next_callback_id);
        self.next_callback_id += 1;
        self.callbacks.push((id, Box::new(callback)));
        id
    }

    /// Unregisters a move callback. Returns false for an unknown handle.
    pub fn remove_move_callback(&mut self, id: CallbackId) -> bool {
        let before = self.callbacks.len();
        self.callbacks.retain(|(callback_id, _)| *callback_id != id);
        self.callbacks.len() != before
    }

    /// Appends a segment and rebuilds the index.
    pub fn add_segment(&mut self, segment: Segment) {
        self.path.add_segment(segment);
        self.rebuild_control_points();
    }

    /// Removes a segment and rebuilds the index. Returns false when out of
    /// range.
    pub fn remove_segment(&mut self, index: usize) -> bool {
        let removed = self.path.remove_segment(index);
        if removed {
            self.rebuild_control_points();
        }
        removed
    }

    /// Clears the path and the index.
    pub fn clear(&mut self) {
        self.path.clear();
        self.control_points.clear();
    }

    /// Nearest control point strictly within `tolerance` of `point`.
    pub fn get_control_point_at(
        &self,
        point: Point,
        tolerance: f64,
    ) -> Option<&GlobalControlPoint> {
        let mut nearest = None;
        let mut min_distance = tolerance;
        for cp in &self.control_points {
            let distance = point.distance_to(&cp.point);
            if distance < min_distance {
                min_distance = distance;
                nearest = Some(cp);
            }
        }
        nearest
    }

    /// All control points within `tolerance` of `point`, nearest first.
    pub fn get_control_points_near(
        &self,
        point: Point,
        tolerance: f64,
    ) -> Vec<&GlobalControlPoint> {
        let mut nearby: Vec<&GlobalControlPoint> = self
            .control_points
            .iter()
            .filter(|cp| point.distance_to(&cp.point) <= tolerance)
            .collect();
        nearby.sort_by(|a, b| {
            point
                .distance_to(&a.point)
                .total_cmp(&point.distance_to(&b.point))
        });
        nearby
    }
}

impl std::fmt::Debug for ControlPointManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ControlPointManager")
            .field("path", &self.path)
            .field("control_points", &self.control_points)
            .field("callbacks", &self.callbacks.len())
            .finish()
    }
}
