//! The control line: an ordered chain of control nodes.

use nalgebra::{Point3, Vector3};
use pipe_geometry::{STRAIGHT_ANGLE, Transform3D, angle_between, is_straight};
use tracing::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{LineError, LineResult};
use crate::node::{ChordNode, ControlNode};
use crate::settings::{LineDefaults, LineSettings, RadiusSettings, Setting, TurnSettings};

/// Minimum number of control nodes in a line.
pub const MIN_NODES: usize = 2;

/// Coordinate space of a position passed to the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Space {
    /// World space, converted through the line transform.
    #[default]
    World,
    /// The line's local space.
    Local,
}

/// An editable pipe spine.
///
/// Owns the node chain, the transform that places it in the world, the
/// line-wide defaults nodes may defer to, and the validation policy. Every
/// committed edit recomputes the affected angles and fillets and rebuilds
/// the chord samples.
///
/// Edits are meant to be gated on the matching predicate
/// ([`is_add_allowed`](Self::is_add_allowed),
/// [`is_delete_allowed`](Self::is_delete_allowed),
/// [`is_moving_allowed`](Self::is_moving_allowed), ...). Mutators only reject
/// bad indices; geometric validity is the caller's responsibility.
///
/// # Example
///
/// ```
/// use control_line::{ControlLine, LineDefaults, Space};
/// use nalgebra::Point3;
///
/// let mut line = ControlLine::from_points(
///     &[Point3::new(0.0, 0.0, 0.0), Point3::new(0.0, 0.0, 5.0), Point3::new(5.0, 0.0, 5.0)],
///     LineDefaults::default(),
/// )
/// .unwrap();
///
/// assert_eq!(line.node(1).unwrap().angle_between_neighbors().round(), 90.0);
///
/// let extra = Point3::new(10.0, 0.0, 5.0);
/// if line.is_add_allowed(&extra, 3, 1.0, Space::Local) {
///     line.add_node(3, extra, Space::Local).unwrap();
/// }
/// assert_eq!(line.len(), 4);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ControlLine {
    pub(crate) nodes: Vec<ControlNode>,
    pub(crate) transform: Transform3D,
    pub(crate) defaults: LineDefaults,
    pub(crate) settings: LineSettings,
    min_turn_angle: f64,
    min_turn_angle_index: Option<usize>,
}

impl Default for ControlLine {
    fn default() -> Self {
        Self::new(LineDefaults::default())
    }
}

impl ControlLine {
    /// Create the initial three-node line at the local origin.
    ///
    /// Nodes sit at `(0,0,0)`, `(0,2,2)` and `(0,0,4)`: two units forward
    /// (`+Z`) and up (`+Y`), then back down four units forward.
    #[must_use]
    pub fn new(defaults: LineDefaults) -> Self {
        let forward = Vector3::z();
        let up = Vector3::y();
        let first = Point3::origin();
        let points = [first, first + forward * 2.0 + up * 2.0, first + forward * 4.0];
        Self::build(&points, defaults)
    }

    /// Create a line through local-space `points`.
    ///
    /// # Errors
    ///
    /// Returns [`LineError::TooFewNodes`] if fewer than two points are given.
    pub fn from_points(points: &[Point3<f64>], defaults: LineDefaults) -> LineResult<Self> {
        if points.len() < MIN_NODES {
            return Err(LineError::TooFewNodes {
                min: MIN_NODES,
                actual: points.len(),
            });
        }
        Ok(Self::build(points, defaults))
    }

    fn build(points: &[Point3<f64>], defaults: LineDefaults) -> Self {
        let transform = Transform3D::identity();
        let nodes = points
            .iter()
            .map(|p| ControlNode::new(*p, &transform))
            .collect();
        let mut line = Self {
            nodes,
            transform,
            defaults,
            settings: LineSettings::default(),
            min_turn_angle: STRAIGHT_ANGLE,
            min_turn_angle_index: None,
        };
        line.recalculate_all();
        line.rebuild_chords();
        line
    }

    /// Place the line in the world with `transform`.
    #[must_use]
    pub fn with_transform(mut self, transform: Transform3D) -> Self {
        self.set_transform(transform);
        self
    }

    /// Use a different validation policy.
    #[must_use]
    pub const fn with_settings(mut self, settings: LineSettings) -> Self {
        self.settings = settings;
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Number of control nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the line has no nodes. A constructed line never is.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The control nodes in spine order.
    #[must_use]
    pub fn nodes(&self) -> &[ControlNode] {
        &self.nodes
    }

    /// The node at `index`.
    #[must_use]
    pub fn node(&self, index: usize) -> Option<&ControlNode> {
        self.nodes.get(index)
    }

    /// The transform placing the line in the world.
    #[must_use]
    pub const fn transform(&self) -> &Transform3D {
        &self.transform
    }

    fn node_mut(&mut self, index: usize) -> LineResult<&mut ControlNode> {
        let len = self.nodes.len();
        self.nodes
            .get_mut(index)
            .ok_or(LineError::index(index, len))
    }

    /// Line-wide defaults.
    #[must_use]
    pub const fn defaults(&self) -> &LineDefaults {
        &self.defaults
    }

    /// Validation policy.
    #[must_use]
    pub const fn settings(&self) -> &LineSettings {
        &self.settings
    }

    /// Replace the validation policy. Takes effect on the next predicate call.
    pub fn set_settings(&mut self, settings: LineSettings) {
        self.settings = settings;
    }

    /// Effective fillet radius of the node at `index`.
    #[must_use]
    pub fn turn_radius(&self, index: usize) -> Option<f64> {
        self.nodes
            .get(index)
            .map(|node| node.turn_settings(&self.defaults).radius())
    }

    /// Effective cross-section of the node at `index`.
    #[must_use]
    pub fn radii(&self, index: usize) -> Option<&RadiusSettings> {
        self.nodes
            .get(index)
            .map(|node| node.radius_settings(&self.defaults))
    }

    /// Smallest corner angle after the last committed edit, with its node.
    ///
    /// The index is `None` only if the line has no nodes.
    #[must_use]
    pub const fn min_turn_angle(&self) -> (f64, Option<usize>) {
        (self.min_turn_angle, self.min_turn_angle_index)
    }

    /// Convert a position given in `space` to local space.
    #[must_use]
    pub fn to_local(&self, position: &Point3<f64>, space: Space) -> Point3<f64> {
        match space {
            Space::World => self.transform.inverse_transform_point(position),
            Space::Local => *position,
        }
    }

    // =========================================================================
    // Structural edits
    // =========================================================================

    /// Insert a node at `index` (`0..=len`).
    ///
    /// Check [`is_add_allowed`](Self::is_add_allowed) first.
    ///
    /// # Errors
    ///
    /// Returns [`LineError::IndexOutOfRange`] if `index > len`.
    pub fn add_node(&mut self, index: usize, position: Point3<f64>, space: Space) -> LineResult<()> {
        if index > self.nodes.len() {
            return Err(LineError::index(index, self.nodes.len()));
        }
        let local = self.to_local(&position, space);
        self.nodes
            .insert(index, ControlNode::new(local, &self.transform));
        self.recalculate_around(index);
        self.commit("add", index);
        Ok(())
    }

    /// Remove the node at `index`.
    ///
    /// Check [`is_delete_allowed`](Self::is_delete_allowed) first.
    ///
    /// # Errors
    ///
    /// Returns [`LineError::IndexOutOfRange`] for a bad index and
    /// [`LineError::TooFewNodes`] if the line would drop below two nodes.
    pub fn delete_node(&mut self, index: usize) -> LineResult<()> {
        let len = self.nodes.len();
        if index >= len {
            return Err(LineError::index(index, len));
        }
        if len <= MIN_NODES {
            return Err(LineError::TooFewNodes {
                min: MIN_NODES,
                actual: len - 1,
            });
        }
        self.nodes.remove(index);

        let last = self.nodes.len() - 1;
        let mut touched = vec![0, last, index.min(last)];
        if let Some(prev) = index.checked_sub(1) {
            touched.push(prev);
        }
        for i in touched {
            self.recalculate_node(i);
        }
        self.commit("delete", index);
        Ok(())
    }

    /// Move the node at `index` to `position`.
    ///
    /// Check [`is_moving_allowed`](Self::is_moving_allowed) first.
    ///
    /// # Errors
    ///
    /// Returns [`LineError::IndexOutOfRange`] for a bad index.
    pub fn move_node(&mut self, index: usize, position: Point3<f64>, space: Space) -> LineResult<()> {
        let local = self.to_local(&position, space);
        let transform = self.transform;
        self.node_mut(index)?.set_position(local, &transform);
        self.recalculate_around(index);
        self.commit("move", index);
        Ok(())
    }

    /// Translate every node by a world-space `delta`.
    pub fn translate(&mut self, delta: &Vector3<f64>) {
        let local_delta = self.transform.inverse_transform_vector(delta);
        let transform = self.transform;
        for node in &mut self.nodes {
            let moved = node.position() + local_delta;
            node.set_position(moved, &transform);
        }
        self.rebuild_chords();
        debug!(nodes = self.nodes.len(), "Translated control line");
    }

    /// Replace the transform. Local geometry is unchanged; world positions
    /// of nodes and chord samples are re-derived.
    pub fn set_transform(&mut self, transform: Transform3D) {
        self.transform = transform;
        for node in &mut self.nodes {
            node.sync_world(&transform);
        }
    }

    /// Move the transform origin onto the node at `index`, compensating local
    /// positions so every world position stays where it was.
    ///
    /// # Errors
    ///
    /// Returns [`LineError::IndexOutOfRange`] for a bad index.
    pub fn set_node_as_pivot(&mut self, index: usize) -> LineResult<()> {
        let pivot = self
            .nodes
            .get(index)
            .ok_or_else(|| LineError::index(index, self.nodes.len()))?
            .world_position();

        let transform = self.transform.with_translation(pivot.coords);
        let worlds: Vec<Point3<f64>> = self.nodes.iter().map(ControlNode::world_position).collect();
        self.transform = transform;
        for (node, world) in self.nodes.iter_mut().zip(worlds) {
            let local = transform.inverse_transform_point(&world);
            node.set_position(local, &transform);
        }
        self.recalculate_all();
        self.rebuild_chords();
        debug!(index, "Moved line pivot onto node");
        Ok(())
    }

    // =========================================================================
    // Settings edits
    // =========================================================================

    /// Set the fillet of the node at `index`.
    ///
    /// Check [`is_turn_radius_allowed_for_node`](Self::is_turn_radius_allowed_for_node) first.
    ///
    /// # Errors
    ///
    /// Returns [`LineError::IndexOutOfRange`] for a bad index.
    pub fn set_node_turn(&mut self, index: usize, turn: Setting<TurnSettings>) -> LineResult<()> {
        self.node_mut(index)?.set_turn(turn);
        self.recalculate_node(index);
        self.commit("turn", index);
        Ok(())
    }

    /// Set the default fillet for every node that defers to it.
    ///
    /// Check [`is_new_default_turn_radius_allowed`](Self::is_new_default_turn_radius_allowed) first.
    pub fn set_default_turn(&mut self, turn: TurnSettings) {
        self.defaults.turn = turn;
        self.recalculate_all();
        self.rebuild_chords();
        debug!(
            radius = turn.radius(),
            detail = turn.detail(),
            "Changed default turn settings"
        );
    }

    /// Set the cross-section of the node at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`LineError::IndexOutOfRange`] for a bad index.
    pub fn set_node_radius(&mut self, index: usize, radius: Setting<RadiusSettings>) -> LineResult<()> {
        self.node_mut(index)?.set_radius(radius);
        Ok(())
    }

    /// Set the default cross-section.
    pub fn set_default_radius(&mut self, radius: RadiusSettings) {
        self.defaults.radius = radius;
    }

    // =========================================================================
    // Derived-field maintenance
    // =========================================================================

    /// Recompute the angle of the node at `index`. Endpoints are 180°.
    pub fn recalculate_angle(&mut self, index: usize) {
        let last = self.nodes.len().saturating_sub(1);
        if index > last {
            return;
        }
        let angle = if index == 0 || index == last {
            STRAIGHT_ANGLE
        } else {
            angle_between(
                &self.nodes[index - 1].position(),
                &self.nodes[index].position(),
                &self.nodes[index + 1].position(),
            )
        };
        self.nodes[index].set_angle(angle);
    }

    /// Recompute the angle of the node at `index` and of its neighbours.
    pub fn recalculate_angle_around(&mut self, index: usize) {
        self.recalculate_angle(index);
        if index > 0 {
            self.recalculate_angle(index - 1);
        }
        if index + 1 < self.nodes.len() {
            self.recalculate_angle(index + 1);
        }
    }

    /// Recompute padding, arc angle and arc center of the node at `index`
    /// from its current angle.
    pub fn recalculate_turn_arc(&mut self, index: usize) {
        let last = self.nodes.len().saturating_sub(1);
        let Some(radius) = self.turn_radius(index) else {
            return;
        };
        let node = &mut self.nodes[index];
        node.recalculate(radius);

        if index == 0 || index == last || is_straight(node.angle_between_neighbors()) {
            node.set_turn_arc_center(Vector3::zeros());
            return;
        }

        let position = self.nodes[index].position();
        let to_prev = (self.nodes[index - 1].position() - position)
            .try_normalize(f64::EPSILON)
            .unwrap_or_else(Vector3::zeros);
        let to_next = (self.nodes[index + 1].position() - position)
            .try_normalize(f64::EPSILON)
            .unwrap_or_else(Vector3::zeros);
        let node = &mut self.nodes[index];
        let center = (to_prev + to_next)
            .try_normalize(f64::EPSILON)
            .map_or_else(Vector3::zeros, |dir| dir * node.turn_arc_center_distance());
        node.set_turn_arc_center(center);
    }

    /// Recompute fillets of the node at `index` and of its neighbours.
    pub fn recalculate_turn_arc_around(&mut self, index: usize) {
        self.recalculate_turn_arc(index);
        if index > 0 {
            self.recalculate_turn_arc(index - 1);
        }
        if index + 1 < self.nodes.len() {
            self.recalculate_turn_arc(index + 1);
        }
    }

    /// Smallest node angle and its index; `(360, None)` for an empty line.
    #[must_use]
    pub fn find_current_min_angle(&self) -> (f64, Option<usize>) {
        let mut angle = 360.0;
        let mut index = None;
        for (i, node) in self.nodes.iter().enumerate() {
            if node.angle_between_neighbors() < angle {
                angle = node.angle_between_neighbors();
                index = Some(i);
            }
        }
        (angle, index)
    }

    /// Normal of the plane a corner turns in, `normalize(to_next × from_prev)`.
    ///
    /// Zero for endpoints and straight corners.
    #[must_use]
    pub fn angle_normal(&self, index: usize) -> Vector3<f64> {
        if index == 0 || index + 1 >= self.nodes.len() {
            return Vector3::zeros();
        }
        let position = self.nodes[index].position();
        let to_next = (self.nodes[index + 1].position() - position)
            .try_normalize(f64::EPSILON)
            .unwrap_or_else(Vector3::zeros);
        let from_prev = (self.nodes[index - 1].position() - position)
            .try_normalize(f64::EPSILON)
            .unwrap_or_else(Vector3::zeros);
        to_next
            .cross(&from_prev)
            .try_normalize(f64::EPSILON)
            .unwrap_or_else(Vector3::zeros)
    }

    fn recalculate_node(&mut self, index: usize) {
        self.recalculate_angle(index);
        self.recalculate_turn_arc(index);
    }

    fn recalculate_around(&mut self, index: usize) {
        self.recalculate_angle_around(index);
        self.recalculate_turn_arc_around(index);
    }

    fn recalculate_all(&mut self) {
        for i in 0..self.nodes.len() {
            self.recalculate_angle(i);
        }
        for i in 0..self.nodes.len() {
            self.recalculate_turn_arc(i);
        }
        self.refresh_min_angle();
    }

    fn refresh_min_angle(&mut self) {
        (self.min_turn_angle, self.min_turn_angle_index) = self.find_current_min_angle();
    }

    fn commit(&mut self, edit: &'static str, index: usize) {
        self.refresh_min_angle();
        self.rebuild_chords();
        debug!(
            edit,
            index,
            nodes = self.nodes.len(),
            chords = self.chord_count(),
            min_angle = self.min_turn_angle,
            "Committed control line edit"
        );
    }

    // =========================================================================
    // Chord access
    // =========================================================================

    /// Total number of chord samples across all nodes.
    #[must_use]
    pub fn chord_count(&self) -> usize {
        self.nodes.iter().map(|node| node.chords().len()).sum()
    }

    /// The chord sample at flat `index` along the spine.
    #[must_use]
    pub fn chord(&self, index: usize) -> Option<&ChordNode> {
        let mut remaining = index;
        for node in &self.nodes {
            let chords = node.chords();
            if remaining < chords.len() {
                return chords.get(remaining);
            }
            remaining -= chords.len();
        }
        None
    }

    /// All chord samples in spine order.
    pub fn chords(&self) -> impl Iterator<Item = &ChordNode> + '_ {
        self.nodes.iter().flat_map(|node| node.chords().iter())
    }

    /// Chord samples paired with the index of the node that owns them.
    pub fn chords_with_owner(&self) -> impl Iterator<Item = (usize, &ChordNode)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .flat_map(|(i, node)| node.chords().iter().map(move |chord| (i, chord)))
    }

    /// Length of the chord polyline in local space.
    #[must_use]
    pub fn chord_line_length(&self) -> f64 {
        let mut length = 0.0;
        let mut previous: Option<Point3<f64>> = None;
        for chord in self.chords() {
            if let Some(prev) = previous {
                length += (chord.position() - prev).norm();
            }
            previous = Some(chord.position());
        }
        length
    }

    /// First `up` at or after chord `start` that differs from `differ_from`.
    ///
    /// Scans forward, stopping at the second to last sample; returns that
    /// sample's `up` if nothing differs.
    #[must_use]
    pub fn next_differing_up(&self, start: usize, differ_from: &Vector3<f64>) -> Option<Vector3<f64>> {
        let count = self.chord_count();
        let mut index = start;
        loop {
            let up = self.chord(index)?.up();
            if up != *differ_from || index + 2 >= count {
                return Some(up);
            }
            index += 1;
        }
    }
}
