//! Chord tessellation of the control line.
//!
//! Each control node contributes its chord samples: a single sample at the
//! endpoints and at nearly straight corners, and `detail` samples along the
//! fillet arc everywhere else. Orientation is carried forward from sample to
//! sample so consecutive cross-section rings do not twist.

use nalgebra::{Point3, Unit, UnitQuaternion, Vector3};
use pipe_geometry::{Frame, is_nearly_flat, most_codirectional};

use crate::line::ControlLine;
use crate::node::ChordNode;

impl ControlLine {
    /// Regenerate every chord sample from the current node geometry.
    ///
    /// Called after every committed edit; deterministic for a given line.
    pub fn rebuild_chords(&mut self) {
        if self.nodes.len() < 2 {
            for node in &mut self.nodes {
                node.chords_mut().clear();
            }
            return;
        }

        self.build_first_chord();
        for index in 1..self.nodes.len() - 1 {
            self.build_mid_chords(index);
        }
        self.build_last_chord();

        // The first sample has no history; align it with its successor.
        let second = self.chord(1).map(|chord| *chord.frame());
        if let Some(frame) = second {
            if let Some(first) = self.nodes[0].chords_mut().first_mut() {
                first.set_frame(frame);
            }
        }
    }

    fn last_chord_before(&self, index: usize) -> Option<ChordNode> {
        self.nodes[..index]
            .iter()
            .rev()
            .find_map(|node| node.chords().last().copied())
    }

    fn build_first_chord(&mut self) {
        let position = self.nodes[0].position();
        let forward = self.nodes[1].position() - position;
        let chord = ChordNode::new(position, Frame::from_forward(forward), &self.transform);
        let chords = self.nodes[0].chords_mut();
        chords.clear();
        chords.push(chord);
    }

    fn build_last_chord(&mut self) {
        let last = self.nodes.len() - 1;
        let position = self.nodes[last].position();
        let frame = match self.last_chord_before(last) {
            Some(prev) => Frame::look_rotation(position - prev.position(), prev.up()),
            None => Frame::default(),
        };
        let chord = ChordNode::new(position, frame, &self.transform);
        let chords = self.nodes[last].chords_mut();
        chords.clear();
        chords.push(chord);
    }

    fn build_mid_chords(&mut self, index: usize) {
        let Some(prev_last) = self.last_chord_before(index) else {
            return;
        };
        let transform = self.transform;
        let base_normal = self.angle_normal(index);
        let node = &self.nodes[index];
        let position = node.position();
        let detail = node.turn_settings(&self.defaults).detail();
        let turn_radius = node.turn_settings(&self.defaults).radius();

        let mut samples = Vec::with_capacity(detail as usize);

        if is_nearly_flat(node.angle_between_neighbors()) {
            let frame = Frame::look_rotation(position - prev_last.position(), prev_last.up());
            samples.push(ChordNode::new(position, frame, &transform));
        } else if detail == 1 {
            let to_center = node
                .turn_arc_center()
                .try_normalize(f64::EPSILON)
                .unwrap_or_else(Vector3::zeros);
            let up = -to_center;
            let forward = to_center
                .cross(&base_normal)
                .try_normalize(f64::EPSILON)
                .unwrap_or_else(|| position - prev_last.position());
            let up = blend_up(&forward, &up, &prev_last.up(), &prev_last.up());
            samples.push(ChordNode::new(
                position,
                keep_hemisphere(Frame::look_rotation(forward, up), &prev_last.up()),
                &transform,
            ));
        } else {
            let center = position + node.turn_arc_center();
            let from_prev = (self.nodes[index - 1].position() - position)
                .try_normalize(f64::EPSILON)
                .unwrap_or_else(Vector3::zeros);
            let start = position + from_prev * node.padding();
            let rotating = (start - center)
                .try_normalize(f64::EPSILON)
                .unwrap_or_else(Vector3::zeros)
                * turn_radius;
            let step = (node.turn_arc_angle() / f64::from(detail - 1)).to_radians();
            let axis = Unit::new_normalize(base_normal);

            let mut last_up = prev_last.up();
            for j in 0..detail {
                let rotated = UnitQuaternion::from_axis_angle(&axis, step * f64::from(j)) * rotating;
                let sample: Point3<f64> = center + rotated;
                let radial = rotated
                    .try_normalize(f64::EPSILON)
                    .unwrap_or_else(|| prev_last.up());
                let forward = base_normal.cross(&radial);
                let frame = if index == 1 && j == 0 {
                    // The first chord is reseeded from this sample, so its `up` carries no history.
                    Frame::look_rotation(forward, radial)
                } else {
                    let up = if index == 1 {
                        closest_up(&forward, &radial, &last_up)
                    } else {
                        blend_up(&forward, &radial, &last_up, &prev_last.up())
                    };
                    keep_hemisphere(Frame::look_rotation(forward, up), &last_up)
                };
                last_up = frame.up;
                samples.push(ChordNode::new(sample, frame, &transform));
            }
        }

        *self.nodes[index].chords_mut() = samples;
    }
}

/// The orientation of `up` (or of the axis perpendicular to it and to
/// `forward`) closest to `reference`.
fn closest_up(forward: &Vector3<f64>, up: &Vector3<f64>, reference: &Vector3<f64>) -> Vector3<f64> {
    let candidates = [*up, -up, forward.cross(up), up.cross(forward)];
    most_codirectional(&candidates, reference).unwrap_or(*up)
}

/// [`closest_up`] averaged with `anchor`.
fn blend_up(
    forward: &Vector3<f64>,
    up: &Vector3<f64>,
    reference: &Vector3<f64>,
    anchor: &Vector3<f64>,
) -> Vector3<f64> {
    let chosen = closest_up(forward, up, reference);
    (chosen + anchor)
        .try_normalize(f64::EPSILON)
        .unwrap_or(chosen)
}

/// Turn `frame` half a revolution about `forward` if its `up` points away
/// from `previous`.
fn keep_hemisphere(frame: Frame, previous: &Vector3<f64>) -> Frame {
    if frame.up.dot(previous) < 0.0 {
        Frame::look_rotation(frame.forward, -frame.up)
    } else {
        frame
    }
}
