use crate::config::DetectSettings;

/// One raw box from the detection capability, per object per frame.
/// `track_id` is absent on the first sighting of a new object.
#[derive(Debug, Clone, PartialEq)]
pub struct RawDetection {
    pub corner1_x: f64,
    pub corner1_y: f64,
    pub corner2_x: f64,
    pub corner2_y: f64,
    pub track_id: Option<u32>,
    pub confidence: f64,
    pub class_id: u32,
}

/// A detection that passed class/confidence/size filtering, snapped to
/// integer pixels. Lives for one cycle; identity is carried across
/// cycles by `track_id` only.
#[derive(Debug, Clone, PartialEq)]
pub struct Target {
    pub corner1_x: i32,
    pub corner1_y: i32,
    pub corner2_x: i32,
    pub corner2_y: i32,
    pub track_id: Option<u32>,
    pub confidence: f64,
    pub class_id: u32,
    pub center_x: i32,
    pub center_y: i32,
    pub size_x: i32,
    pub size_y: i32,
}

impl Target {
    /// Builds a `Target` from a raw box, or `None` if the box is
    /// malformed or fails the configured filters. Malformed boxes are
    /// dropped for the cycle, never an error.
    pub fn from_detection(raw: &RawDetection, filter: &DetectSettings) -> Option<Self> {
        let corners = [
            raw.corner1_x,
            raw.corner1_y,
            raw.corner2_x,
            raw.corner2_y,
        ];
        if corners.iter().any(|c| !c.is_finite()) || !(0.0..=1.0).contains(&raw.confidence) {
            return None;
        }
        if raw.class_id != filter.person_class_id || raw.confidence < filter.min_confidence {
            return None;
        }

        let corner1_x = raw.corner1_x.round() as i32;
        let corner1_y = raw.corner1_y.round() as i32;
        let corner2_x = raw.corner2_x.round() as i32;
        let corner2_y = raw.corner2_y.round() as i32;
        let center_x = (corner1_x + corner2_x) / 2;
        let center_y = (corner1_y + corner2_y) / 2;
        let size_x = (corner1_x - center_x).abs();
        let size_y = (corner1_y - center_y).abs();
        if 2 * size_x < filter.min_width || 2 * size_y < filter.min_height {
            return None;
        }

        Some(Self {
            corner1_x,
            corner1_y,
            corner2_x,
            corner2_y,
            track_id: raw.track_id,
            confidence: raw.confidence,
            class_id: raw.class_id,
            center_x,
            center_y,
            size_x,
            size_y,
        })
    }
}

#[cfg(test)]
pub(crate) fn test_target(id: Option<u32>, cx: i32, cy: i32, half_x: i32, half_y: i32) -> Target {
    Target {
        corner1_x: cx - half_x,
        corner1_y: cy - half_y,
        corner2_x: cx + half_x,
        corner2_y: cy + half_y,
        track_id: id,
        confidence: 0.9,
        class_id: 0,
        center_x: cx,
        center_y: cy,
        size_x: half_x,
        size_y: half_y,
    }
}
