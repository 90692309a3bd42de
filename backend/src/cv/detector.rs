use crate::aim;
use crate::config::TurretConfig;
use crate::cv::vision::Vision;
use crate::target::RawDetection;
use crate::{CycleView, FrontEnd};
use opencv::core::{Point, Rect, Scalar};
use opencv::imgproc::{bounding_rect, contour_area, line, put_text, rectangle, FONT_HERSHEY_PLAIN, LINE_8};
use opencv::prelude::Mat;
use opencv::{highgui, imgproc};

const WINDOW: &str = "turret";
const CROSS_SIZE: i32 = 20;

struct TrackPoint {
    id: u32,
    cx: f64,
    cy: f64,
}

/// Color-mask front-end: segments the frame by HSV bounds, turns
/// contours into raw detections, and carries blob identity between
/// frames by nearest-centroid matching. A blob's first sighting has no
/// identifier; from the next frame on it keeps one until it vanishes.
pub struct ColorDetector {
    vision: Vision,
    config: TurretConfig,
    tracks: Vec<TrackPoint>,
    next_id: u32,
    frame: Mat,
}

impl ColorDetector {
    pub fn open(config: TurretConfig) -> crate::Result<Self> {
        let mut vision = Vision::default();
        vision.connect(config.camera.index)?;
        Ok(Self {
            vision,
            config,
            tracks: Vec::new(),
            next_id: 0,
            frame: Mat::default(),
        })
    }

    pub fn close(&mut self) -> crate::Result<()> {
        self.vision.disconnect()?;
        highgui::destroy_window(WINDOW)?;
        Ok(())
    }

    /// Matches a blob center against last frame's tracks, claiming the
    /// nearest one within the configured radius.
    fn claim_track(&mut self, cx: f64, cy: f64, claimed: &mut Vec<bool>) -> Option<u32> {
        let radius = self.config.camera.match_radius;
        let mut best: Option<(usize, f64)> = None;
        for (i, track) in self.tracks.iter().enumerate() {
            if claimed[i] {
                continue;
            }
            let dist = ((track.cx - cx).powi(2) + (track.cy - cy).powi(2)).sqrt();
            if dist <= radius && best.map_or(true, |(_, d)| dist < d) {
                best = Some((i, dist));
            }
        }
        let (i, _) = best?;
        claimed[i] = true;
        Some(self.tracks[i].id)
    }

    fn draw_cross(&self, img: &mut Mat, center: (i32, i32), color: Scalar) -> crate::Result<()> {
        let (cx, cy) = center;
        let half = CROSS_SIZE / 2;
        line(
            img,
            Point::new(cx, cy - half),
            Point::new(cx, cy + half),
            color,
            2,
            LINE_8,
            0,
        )?;
        line(
            img,
            Point::new(cx - half, cy),
            Point::new(cx + half, cy),
            color,
            2,
            LINE_8,
            0,
        )?;
        Ok(())
    }
}

impl FrontEnd for ColorDetector {
    fn poll_detections(&mut self) -> crate::Result<Vec<RawDetection>> {
        let frame = self.vision.get_frame(
            self.config.camera.flip,
            self.config.video.width,
            self.config.video.height,
        )?;
        let mask = self.vision.filter_color(
            &frame,
            self.config.camera.lower_bound,
            self.config.camera.upper_bound,
        )?;
        let contours = self.vision.contours(&mask)?;

        let mut detections = Vec::new();
        let mut next_tracks = Vec::new();
        let mut claimed = vec![false; self.tracks.len()];
        for contour in &contours {
            if contour_area(&contour, false)? < self.config.camera.min_area {
                continue;
            }
            let rect = bounding_rect(&contour)?;
            let cx = rect.x as f64 + rect.width as f64 / 2.0;
            let cy = rect.y as f64 + rect.height as f64 / 2.0;

            let track_id = self.claim_track(cx, cy, &mut claimed);
            let id = track_id.unwrap_or_else(|| {
                let id = self.next_id;
                self.next_id += 1;
                id
            });
            next_tracks.push(TrackPoint { id, cx, cy });

            detections.push(RawDetection {
                corner1_x: rect.x as f64,
                corner1_y: rect.y as f64,
                corner2_x: (rect.x + rect.width) as f64,
                corner2_y: (rect.y + rect.height) as f64,
                track_id,
                // A mask hit is a definite detection of the tracked color.
                confidence: 1.0,
                class_id: self.config.detect.person_class_id,
            });
        }

        // Tracks whose blob vanished this frame are forgotten.
        self.tracks = next_tracks;
        self.frame = frame;

        Ok(detections)
    }

    fn present(&mut self, view: &CycleView<'_>) -> crate::Result<Option<u8>> {
        let mut out = Mat::clone(&self.frame);
        let secondary = Scalar::new(230., 255., 255., 0.);
        let primary = Scalar::new(0., 0., 255., 0.);
        let hud = Scalar::new(0., 255., 0., 0.);

        for (i, target) in view.targets.iter().enumerate() {
            let color = if i == 0 { primary } else { secondary };
            rectangle(
                &mut out,
                Rect::new(
                    target.corner1_x,
                    target.corner1_y,
                    target.corner2_x - target.corner1_x,
                    target.corner2_y - target.corner1_y,
                ),
                color,
                2,
                LINE_8,
                0,
            )?;
            let label = match target.track_id {
                Some(id) => format!("#{id}"),
                None => "new".to_string(),
            };
            put_text(
                &mut out,
                &label,
                Point::new(target.corner1_x, target.corner1_y - 10),
                FONT_HERSHEY_PLAIN,
                1.,
                color,
                2,
                LINE_8,
                false,
            )?;
        }

        if let Some(target) = view.targets.first() {
            let center = aim::hitbox_center(target, &self.config.aim);
            let color = if view.fired { primary } else { hud };
            self.draw_cross(&mut out, center, color)?;
        }
        self.draw_cross(&mut out, self.config.frame_center(), hud)?;

        let (dx, dy) = view.offset;
        let wire = view.command.encode();
        put_text(
            &mut out,
            &format!("dx = {dx}; dy = {dy}; sent {}", wire.trim_end()),
            Point::new(10, self.config.video.height - 10),
            FONT_HERSHEY_PLAIN,
            1.,
            hud,
            1,
            imgproc::LINE_AA,
            false,
        )?;

        highgui::imshow(WINDOW, &out)?;
        let key = highgui::wait_key(1)?;
        Ok((key >= 0).then_some((key & 0xFF) as u8))
    }
}
