//! Edit predicates.
//!
//! Each predicate reports whether an edit keeps the line valid: no corner
//! sharper than the minimum allowed angle (when angle checking is on) and no
//! two adjacent fillets overlapping along the edge between them. Predicates
//! never mutate the line.

use nalgebra::Point3;
use pipe_geometry::{angle_between, calculate_padding};

use crate::line::{ControlLine, Space};
use crate::node::ControlNode;
use crate::settings::TurnSettings;

/// Outcome of [`ControlLine::is_delete_allowed`], split by the side of the
/// deleted node that passed or failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteCheck {
    /// The previous neighbour stays valid.
    pub prev_ok: bool,
    /// The next neighbour stays valid.
    pub next_ok: bool,
}

impl DeleteCheck {
    /// Whether the delete may proceed.
    #[must_use]
    pub const fn is_allowed(&self) -> bool {
        self.prev_ok && self.next_ok
    }

    const fn both(ok: bool) -> Self {
        Self {
            prev_ok: ok,
            next_ok: ok,
        }
    }
}

fn distance(a: &Point3<f64>, b: &Point3<f64>) -> f64 {
    (a - b).norm()
}

impl ControlLine {
    fn node_turn_radius(&self, node: &ControlNode) -> f64 {
        node.turn_settings(&self.defaults).radius()
    }

    /// Whether a node may be inserted at `index` with fillet radius `turn_radius`.
    ///
    /// `index` ranges over `0..=len`; `len` appends.
    #[must_use]
    pub fn is_add_allowed(
        &self,
        position: &Point3<f64>,
        index: usize,
        turn_radius: f64,
        space: Space,
    ) -> bool {
        let count = self.nodes.len();
        if index > count || count < 2 {
            return false;
        }
        let position = self.to_local(position, space);
        let nodes = &self.nodes;

        if index == 0 {
            let first = &nodes[0];
            let next = &nodes[1];
            let angle = angle_between(&position, &first.position(), &next.position());
            if self.settings.rejects_angle(angle) {
                return false;
            }
            let padding = calculate_padding(angle, self.node_turn_radius(first));
            let spacing_to_new = distance(&first.position(), &position) - padding;
            let spacing_to_next =
                distance(&first.position(), &next.position()) - padding - next.padding();
            return spacing_to_new > 0.0 && spacing_to_next > 0.0;
        }

        if index == count {
            let last = &nodes[count - 1];
            let prev = &nodes[count - 2];
            let angle = angle_between(&prev.position(), &last.position(), &position);
            if self.settings.rejects_angle(angle) {
                return false;
            }
            let padding = calculate_padding(angle, self.node_turn_radius(last));
            let spacing_to_new = distance(&last.position(), &position) - padding;
            let spacing_to_prev =
                distance(&last.position(), &prev.position()) - padding - prev.padding();
            return spacing_to_new > 0.0 && spacing_to_prev > 0.0;
        }

        let prev = &nodes[index - 1];
        let next = &nodes[index];

        let angle_of_new = angle_between(&prev.position(), &position, &next.position());
        if self.settings.rejects_angle(angle_of_new) {
            return false;
        }
        let padding_of_new = calculate_padding(angle_of_new, turn_radius);

        let mut padding_of_prev = prev.padding();
        if let Some(second_prev) = index.checked_sub(2).map(|i| &nodes[i]) {
            let angle = angle_between(&second_prev.position(), &prev.position(), &position);
            if self.settings.rejects_angle(angle) {
                return false;
            }
            padding_of_prev = calculate_padding(angle, self.node_turn_radius(prev));
            let spacing = distance(&second_prev.position(), &prev.position())
                - second_prev.padding()
                - padding_of_prev;
            if spacing <= 0.0 {
                return false;
            }
        }
        if distance(&prev.position(), &position) - padding_of_prev - padding_of_new <= 0.0 {
            return false;
        }

        let mut padding_of_next = next.padding();
        if let Some(second_next) = nodes.get(index + 1) {
            let angle = angle_between(&position, &next.position(), &second_next.position());
            if self.settings.rejects_angle(angle) {
                return false;
            }
            padding_of_next = calculate_padding(angle, self.node_turn_radius(next));
            let spacing = distance(&next.position(), &second_next.position())
                - second_next.padding()
                - padding_of_next;
            if spacing <= 0.0 {
                return false;
            }
        }
        distance(&position, &next.position()) - padding_of_new - padding_of_next > 0.0
    }

    /// Whether the node at `index` may be removed, per side.
    ///
    /// Endpoints can always go while at least three nodes remain. Angles that
    /// are already below the minimum do not fail the check unless the delete
    /// makes them sharper.
    #[must_use]
    pub fn is_delete_allowed(&self, index: usize) -> DeleteCheck {
        let count = self.nodes.len();
        if index >= count || count < 3 {
            return DeleteCheck::both(false);
        }
        if index == 0 || index == count - 1 {
            return DeleteCheck::both(true);
        }

        let nodes = &self.nodes;
        let prev = &nodes[index - 1];
        let next = &nodes[index + 1];
        let mut check = DeleteCheck::both(true);
        let mut new_padding_of_prev = prev.padding();
        let mut new_padding_of_next = next.padding();

        if let Some(second_prev) = index.checked_sub(2).map(|i| &nodes[i]) {
            let angle = angle_between(&second_prev.position(), &prev.position(), &next.position());
            if self.settings.rejects_angle(angle) && angle < prev.angle_between_neighbors() {
                check.prev_ok = false;
            }
            new_padding_of_prev = calculate_padding(angle, self.node_turn_radius(prev));
            let spacing = distance(&second_prev.position(), &prev.position())
                - second_prev.padding()
                - new_padding_of_prev;
            if spacing <= 0.0 {
                check.prev_ok = false;
            }
        }

        if let Some(second_next) = nodes.get(index + 2) {
            let angle = angle_between(&prev.position(), &next.position(), &second_next.position());
            if self.settings.rejects_angle(angle) && angle < next.angle_between_neighbors() {
                check.next_ok = false;
            }
            new_padding_of_next = calculate_padding(angle, self.node_turn_radius(next));
            let spacing = distance(&second_next.position(), &next.position())
                - second_next.padding()
                - new_padding_of_next;
            if spacing <= 0.0 {
                check.next_ok = false;
            }
        }

        if distance(&prev.position(), &next.position()) - new_padding_of_prev - new_padding_of_next <= 0.0 {
            check = DeleteCheck::both(false);
        }
        check
    }

    /// Whether the node at `index` may move to `position`.
    ///
    /// Lines with fewer than three nodes have no corners, so any move is
    /// allowed. Moving an endpoint is also allowed whenever it does not grow
    /// its neighbour's fillet.
    #[must_use]
    pub fn is_moving_allowed(&self, index: usize, position: &Point3<f64>, space: Space) -> bool {
        let count = self.nodes.len();
        if index >= count {
            return false;
        }
        if count < 3 {
            return true;
        }
        let position = self.to_local(position, space);
        let nodes = &self.nodes;
        let settings = &self.settings;
        // Only fail on an angle that is both under the minimum and sharper than before.
        let sharpens = |angle: f64, node: &ControlNode| {
            settings.rejects_angle(angle) && angle < node.angle_between_neighbors()
        };

        if index == 0 || index == count - 1 {
            let (near, far) = if index == 0 {
                (&nodes[1], &nodes[2])
            } else {
                (&nodes[count - 2], &nodes[count - 3])
            };
            let angle = angle_between(&position, &near.position(), &far.position());
            if sharpens(angle, near) {
                return false;
            }
            let new_padding = calculate_padding(angle, self.node_turn_radius(near));
            let spacing_with_moved = distance(&position, &near.position()) - new_padding;
            let spacing_with_far =
                distance(&near.position(), &far.position()) - new_padding - far.padding();
            return new_padding <= near.padding()
                || (spacing_with_moved > 0.0 && spacing_with_far > 0.0);
        }

        let target = &nodes[index];
        let prev = &nodes[index - 1];
        let next = &nodes[index + 1];
        let angle = angle_between(&prev.position(), &position, &next.position());
        if sharpens(angle, target) {
            return false;
        }
        let padding_of_target = calculate_padding(angle, self.node_turn_radius(target));

        let mut spacing_prev_pair = 1.0;
        let mut padding_of_prev = 0.0;
        if let Some(second_prev) = index.checked_sub(2).map(|i| &nodes[i]) {
            let angle = angle_between(&second_prev.position(), &prev.position(), &position);
            if sharpens(angle, prev) {
                return false;
            }
            padding_of_prev = calculate_padding(angle, self.node_turn_radius(prev));
            spacing_prev_pair = distance(&prev.position(), &second_prev.position())
                - padding_of_prev
                - second_prev.padding();
        }

        let mut spacing_next_pair = 1.0;
        let mut padding_of_next = 0.0;
        if let Some(second_next) = nodes.get(index + 2) {
            let angle = angle_between(&position, &next.position(), &second_next.position());
            if sharpens(angle, next) {
                return false;
            }
            padding_of_next = calculate_padding(angle, self.node_turn_radius(next));
            spacing_next_pair = distance(&next.position(), &second_next.position())
                - padding_of_next
                - second_next.padding();
        }

        let spacing_with_next = distance(&position, &next.position()) - padding_of_next - padding_of_target;
        let spacing_with_prev = distance(&position, &prev.position()) - padding_of_prev - padding_of_target;

        spacing_with_next > 0.0
            && spacing_next_pair > 0.0
            && spacing_with_prev > 0.0
            && spacing_prev_pair > 0.0
    }

    /// Whether the node at `index` may use fillet radius `radius`.
    ///
    /// Always true for endpoints, which carry no fillet.
    #[must_use]
    pub fn is_turn_radius_allowed_for_node(&self, radius: f64, index: usize) -> bool {
        let count = self.nodes.len();
        if index >= count {
            return false;
        }
        if index == 0 || index == count - 1 {
            return true;
        }
        let node = &self.nodes[index];
        let prev = &self.nodes[index - 1];
        let next = &self.nodes[index + 1];
        let padding = calculate_padding(node.angle_between_neighbors(), radius);
        distance(&node.position(), &prev.position()) - padding - prev.padding() > 0.0
            && distance(&node.position(), &next.position()) - padding - next.padding() > 0.0
    }

    /// Whether `turn` may become the default fillet.
    ///
    /// Checks every node that defers to the default, with neighbours that
    /// also defer evaluated at the effective radius of `turn`, so a
    /// single-sample default is checked at [`SINGLE_SAMPLE_TURN_RADIUS`].
    ///
    /// [`SINGLE_SAMPLE_TURN_RADIUS`]: crate::SINGLE_SAMPLE_TURN_RADIUS
    #[must_use]
    pub fn is_new_default_turn_radius_allowed(&self, turn: &TurnSettings) -> bool {
        let radius = turn.radius();
        let count = self.nodes.len();
        let padding_at = |node: &ControlNode| {
            if node.turn().uses_default() {
                calculate_padding(node.angle_between_neighbors(), radius)
            } else {
                node.padding()
            }
        };

        (1..count.saturating_sub(1))
            .filter(|&i| self.nodes[i].turn().uses_default())
            .all(|i| {
                let node = &self.nodes[i];
                let prev = &self.nodes[i - 1];
                let next = &self.nodes[i + 1];
                let padding = padding_at(node);
                distance(&node.position(), &prev.position()) - padding - padding_at(prev) > 0.0
                    && distance(&node.position(), &next.position()) - padding - padding_at(next) > 0.0
            })
    }
}
