//! Control nodes and chord samples.

use nalgebra::{Point3, Vector3};
use pipe_geometry::{
    Frame, STRAIGHT_ANGLE, Transform3D, calculate_padding, is_straight, turn_arc_center_distance,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::settings::{LineDefaults, RadiusSettings, Setting, TurnSettings};

/// An oriented sample on the tessellated spine.
///
/// Positions and the frame are stored in the line's local space; the world
/// position is kept in sync with the owning line's transform.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ChordNode {
    position: Point3<f64>,
    world_position: Point3<f64>,
    frame: Frame,
}

impl ChordNode {
    pub(crate) fn new(position: Point3<f64>, frame: Frame, transform: &Transform3D) -> Self {
        Self {
            position,
            world_position: transform.transform_point(&position),
            frame,
        }
    }

    /// Local-space position.
    #[must_use]
    pub const fn position(&self) -> Point3<f64> {
        self.position
    }

    /// World-space position.
    #[must_use]
    pub const fn world_position(&self) -> Point3<f64> {
        self.world_position
    }

    /// Local-space orientation.
    #[must_use]
    pub const fn frame(&self) -> &Frame {
        &self.frame
    }

    /// Local-space direction of travel.
    #[must_use]
    pub const fn forward(&self) -> Vector3<f64> {
        self.frame.forward
    }

    /// Local-space reference direction for cross-section rings.
    #[must_use]
    pub const fn up(&self) -> Vector3<f64> {
        self.frame.up
    }

    /// Local-space `up × forward`.
    #[must_use]
    pub const fn right(&self) -> Vector3<f64> {
        self.frame.right
    }

    /// World-space orientation.
    #[must_use]
    pub fn world_frame(&self, transform: &Transform3D) -> Frame {
        self.frame.rotated(&transform.rotation())
    }

    pub(crate) fn set_frame(&mut self, frame: Frame) {
        self.frame = frame;
    }

    pub(crate) fn sync_world(&mut self, transform: &Transform3D) {
        self.world_position = transform.transform_point(&self.position);
    }
}

/// A waypoint on the pipe spine.
///
/// The local position is authoritative. Angle, padding and arc center are
/// derived from the neighbours and kept current by the owning
/// [`ControlLine`](crate::ControlLine).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ControlNode {
    position: Point3<f64>,
    world_position: Point3<f64>,
    turn: Setting<TurnSettings>,
    radius: Setting<RadiusSettings>,
    angle_between_neighbors: f64,
    turn_arc_angle: f64,
    turn_arc_center: Vector3<f64>,
    turn_arc_center_distance: f64,
    padding: f64,
    chords: Vec<ChordNode>,
}

impl ControlNode {
    pub(crate) fn new(position: Point3<f64>, transform: &Transform3D) -> Self {
        Self {
            position,
            world_position: transform.transform_point(&position),
            turn: Setting::UsesDefault,
            radius: Setting::UsesDefault,
            angle_between_neighbors: STRAIGHT_ANGLE,
            turn_arc_angle: STRAIGHT_ANGLE,
            turn_arc_center: Vector3::zeros(),
            turn_arc_center_distance: 0.0,
            padding: 0.0,
            chords: Vec::new(),
        }
    }

    /// Local-space position.
    #[must_use]
    pub const fn position(&self) -> Point3<f64> {
        self.position
    }

    /// World-space position.
    #[must_use]
    pub const fn world_position(&self) -> Point3<f64> {
        self.world_position
    }

    /// Fillet setting of this node.
    #[must_use]
    pub const fn turn(&self) -> &Setting<TurnSettings> {
        &self.turn
    }

    /// Cross-section setting of this node.
    #[must_use]
    pub const fn radius(&self) -> &Setting<RadiusSettings> {
        &self.radius
    }

    /// Effective fillet settings given the line defaults.
    #[must_use]
    pub fn turn_settings<'a>(&'a self, defaults: &'a LineDefaults) -> &'a TurnSettings {
        self.turn.resolve(&defaults.turn)
    }

    /// Effective cross-section given the line defaults.
    #[must_use]
    pub fn radius_settings<'a>(&'a self, defaults: &'a LineDefaults) -> &'a RadiusSettings {
        self.radius.resolve(&defaults.radius)
    }

    /// Angle in degrees between the edges to both neighbours; 180 at endpoints.
    #[must_use]
    pub const fn angle_between_neighbors(&self) -> f64 {
        self.angle_between_neighbors
    }

    /// Sweep of the fillet arc in degrees, `180 - angle`. 180 when straight.
    #[must_use]
    pub const fn turn_arc_angle(&self) -> f64 {
        self.turn_arc_angle
    }

    /// Offset from the node to the fillet arc center, in local space.
    #[must_use]
    pub const fn turn_arc_center(&self) -> Vector3<f64> {
        self.turn_arc_center
    }

    /// Distance from the node to the fillet arc center.
    #[must_use]
    pub const fn turn_arc_center_distance(&self) -> f64 {
        self.turn_arc_center_distance
    }

    /// Length consumed by the fillet along each adjacent edge.
    #[must_use]
    pub const fn padding(&self) -> f64 {
        self.padding
    }

    /// Chord samples contributed by this node, in spine order.
    #[must_use]
    pub fn chords(&self) -> &[ChordNode] {
        &self.chords
    }

    pub(crate) fn chords_mut(&mut self) -> &mut Vec<ChordNode> {
        &mut self.chords
    }

    pub(crate) fn set_position(&mut self, position: Point3<f64>, transform: &Transform3D) {
        self.position = position;
        self.world_position = transform.transform_point(&position);
    }

    pub(crate) fn sync_world(&mut self, transform: &Transform3D) {
        self.world_position = transform.transform_point(&self.position);
        for chord in &mut self.chords {
            chord.sync_world(transform);
        }
    }

    pub(crate) fn set_turn(&mut self, turn: Setting<TurnSettings>) {
        self.turn = turn;
    }

    pub(crate) fn set_radius(&mut self, radius: Setting<RadiusSettings>) {
        self.radius = radius;
    }

    pub(crate) fn set_angle(&mut self, angle: f64) {
        self.angle_between_neighbors = angle;
    }

    pub(crate) fn set_turn_arc_center(&mut self, center: Vector3<f64>) {
        self.turn_arc_center = center;
    }

    /// Re-derive padding, arc-center distance and arc angle from the current
    /// angle and the effective `turn_radius`.
    pub(crate) fn recalculate(&mut self, turn_radius: f64) {
        if is_straight(self.angle_between_neighbors) {
            self.turn_arc_center_distance = 0.0;
            self.padding = 0.0;
            self.turn_arc_angle = STRAIGHT_ANGLE;
        } else {
            self.turn_arc_center_distance =
                turn_arc_center_distance(self.angle_between_neighbors, turn_radius);
            self.padding = calculate_padding(self.angle_between_neighbors, turn_radius);
            self.turn_arc_angle = STRAIGHT_ANGLE - self.angle_between_neighbors;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn new_node_is_straight() {
        let node = ControlNode::new(Point3::new(1.0, 2.0, 3.0), &Transform3D::identity());
        assert_eq!(node.angle_between_neighbors(), 180.0);
        assert_eq!(node.padding(), 0.0);
        assert_eq!(node.turn_arc_angle(), 180.0);
        assert!(node.turn().uses_default());
        assert!(node.chords().is_empty());
    }

    #[test]
    fn recalculate_right_angle() {
        let mut node = ControlNode::new(Point3::origin(), &Transform3D::identity());
        node.set_angle(90.0);
        node.recalculate(1.0);
        assert_relative_eq!(node.padding(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(node.turn_arc_angle(), 90.0, epsilon = 1e-12);
        assert_relative_eq!(
            node.turn_arc_center_distance(),
            std::f64::consts::SQRT_2,
            epsilon = 1e-12
        );
    }

    #[test]
    fn recalculate_back_to_straight() {
        let mut node = ControlNode::new(Point3::origin(), &Transform3D::identity());
        node.set_angle(120.0);
        node.recalculate(2.0);
        assert!(node.padding() > 0.0);
        node.set_angle(180.0);
        node.recalculate(2.0);
        assert_eq!(node.padding(), 0.0);
        assert_eq!(node.turn_arc_center_distance(), 0.0);
        assert_eq!(node.turn_arc_angle(), 180.0);
    }

    #[test]
    fn world_position_follows_transform() {
        let transform = Transform3D::from_translation(Vector3::new(0.0, 10.0, 0.0));
        let mut node = ControlNode::new(Point3::new(1.0, 0.0, 0.0), &transform);
        assert_eq!(node.world_position(), Point3::new(1.0, 10.0, 0.0));

        let moved = Transform3D::from_translation(Vector3::new(5.0, 0.0, 0.0));
        node.sync_world(&moved);
        assert_eq!(node.world_position(), Point3::new(6.0, 0.0, 0.0));
        assert_eq!(node.position(), Point3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn resolves_defaults() {
        let defaults = LineDefaults::default();
        let mut node = ControlNode::new(Point3::origin(), &Transform3D::identity());
        assert_eq!(node.turn_settings(&defaults).radius(), 1.0);
        node.set_turn(Setting::Custom(TurnSettings::new(3.0, 4)));
        assert_eq!(node.turn_settings(&defaults).radius(), 3.0);
        assert_eq!(node.radius_settings(&defaults).outer(), 1.0);
    }
}
