use crate::target::Target;

/// Keeps the selection order of tracked objects stable between frames.
/// The first target of the reordered list is the one the turret aims
/// at; user cycle actions rotate the list.
#[derive(Debug, Default)]
pub struct TrackOrder {
    sequence: Vec<u32>,
}

impl TrackOrder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sequence(&self) -> &[u32] {
        &self.sequence
    }

    /// Reorders this frame's targets against the previous frame's
    /// sequence: identifiers already known keep their old relative
    /// order, unseen targets (including those without an identifier)
    /// append in arrival order. Identifiers whose target vanished this
    /// frame are silently dropped from the sequence.
    pub fn reorder(&mut self, mut incoming: Vec<Target>) -> Vec<Target> {
        let mut ordered = Vec::with_capacity(incoming.len());
        for id in &self.sequence {
            if let Some(pos) = incoming.iter().position(|t| t.track_id == Some(*id)) {
                ordered.push(incoming.remove(pos));
            }
        }
        ordered.append(&mut incoming);
        self.resync(&ordered);
        ordered
    }

    /// Demotes the primary target to the back of the order. No-op with
    /// fewer than two targets.
    pub fn cycle_forward(&mut self, ordered: &mut [Target]) {
        if ordered.len() < 2 {
            return;
        }
        ordered.rotate_left(1);
        self.resync(ordered);
    }

    /// Promotes the last target of the order to primary. No-op with
    /// fewer than two targets.
    pub fn cycle_backward(&mut self, ordered: &mut [Target]) {
        if ordered.len() < 2 {
            return;
        }
        ordered.rotate_right(1);
        self.resync(ordered);
    }

    fn resync(&mut self, ordered: &[Target]) {
        self.sequence = ordered.iter().filter_map(|t| t.track_id).collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::target::test_target;

    fn targets(ids: &[Option<u32>]) -> Vec<Target> {
        ids.iter()
            .map(|id| test_target(*id, 100, 100, 20, 20))
            .collect()
    }

    fn ids(ordered: &[Target]) -> Vec<Option<u32>> {
        ordered.iter().map(|t| t.track_id).collect()
    }

    #[test]
    fn carries_previous_order_over_arrival_order() {
        let mut order = TrackOrder::new();
        order.reorder(targets(&[Some(5), Some(9), Some(2)]));
        assert_eq!(order.sequence(), [5, 9, 2]);

        // Arrival order flips, selection order must not.
        let ordered = order.reorder(targets(&[Some(2), Some(9), Some(5)]));
        assert_eq!(ids(&ordered), [Some(5), Some(9), Some(2)]);
        assert_eq!(order.sequence(), [5, 9, 2]);
    }

    #[test]
    fn vanished_identifiers_drop_and_new_ones_append() {
        let mut order = TrackOrder::new();
        order.reorder(targets(&[Some(3), Some(1)]));

        let ordered = order.reorder(targets(&[Some(2), Some(1)]));
        assert_eq!(ids(&ordered), [Some(1), Some(2)]);
        assert_eq!(order.sequence(), [1, 2]);
    }

    #[test]
    fn sequence_matches_visible_identifiers_exactly() {
        let mut order = TrackOrder::new();
        order.reorder(targets(&[Some(4), Some(8)]));

        let ordered = order.reorder(targets(&[Some(8), None, Some(6)]));
        assert_eq!(ordered.len(), 3);
        assert_eq!(ids(&ordered), [Some(8), None, Some(6)]);
        // No duplicates, nothing from a prior frame that is gone now.
        assert_eq!(order.sequence(), [8, 6]);
    }

    #[test]
    fn untracked_targets_always_trail() {
        let mut order = TrackOrder::new();
        order.reorder(targets(&[Some(1)]));

        let ordered = order.reorder(targets(&[None, Some(1)]));
        assert_eq!(ids(&ordered), [Some(1), None]);
    }

    #[test]
    fn empty_frame_resets_the_sequence() {
        let mut order = TrackOrder::new();
        order.reorder(targets(&[Some(1), Some(2)]));

        let ordered = order.reorder(Vec::new());
        assert!(ordered.is_empty());
        assert!(order.sequence().is_empty());

        // Rebuilt from whatever is visible now, prior order forgotten.
        let ordered = order.reorder(targets(&[Some(2), Some(1)]));
        assert_eq!(ids(&ordered), [Some(2), Some(1)]);
    }

    #[test]
    fn cycle_forward_rotates_primary_to_back() {
        let mut order = TrackOrder::new();
        let mut ordered = order.reorder(targets(&[Some(1), Some(2), Some(3)]));

        order.cycle_forward(&mut ordered);
        assert_eq!(ids(&ordered), [Some(2), Some(3), Some(1)]);
        assert_eq!(order.sequence(), [2, 3, 1]);
    }

    #[test]
    fn cycle_backward_promotes_last() {
        let mut order = TrackOrder::new();
        let mut ordered = order.reorder(targets(&[Some(1), Some(2), Some(3)]));

        order.cycle_backward(&mut ordered);
        assert_eq!(ids(&ordered), [Some(3), Some(1), Some(2)]);
        assert_eq!(order.sequence(), [3, 1, 2]);
    }

    #[test]
    fn cycle_is_a_noop_with_a_single_target() {
        let mut order = TrackOrder::new();
        let mut ordered = order.reorder(targets(&[Some(1)]));

        order.cycle_forward(&mut ordered);
        assert_eq!(ids(&ordered), [Some(1)]);
        assert_eq!(order.sequence(), [1]);

        order.cycle_backward(&mut ordered);
        assert_eq!(ids(&ordered), [Some(1)]);
        assert_eq!(order.sequence(), [1]);
    }
}
