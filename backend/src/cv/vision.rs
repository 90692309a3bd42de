use opencv::core::{flip, in_range, Point, Size, BORDER_CONSTANT, BORDER_DEFAULT};
use opencv::imgproc::{
    cvt_color, find_contours, gaussian_blur, get_structuring_element,
    morphology_default_border_value, morphology_ex, resize, CHAIN_APPROX_SIMPLE, COLOR_BGR2HSV,
    INTER_AREA, MORPH_CLOSE, MORPH_ELLIPSE, MORPH_OPEN, RETR_EXTERNAL,
};
use opencv::types::VectorOfVectorOfPoint;
use opencv::{
    prelude::{Mat, VideoCaptureTrait},
    videoio::{self, VideoCapture},
};

const NEG_POINT: Point = Point::new(-1, -1);

/// Camera capture and color-mask segmentation.
#[derive(Default)]
pub struct Vision {
    source: Option<VideoCapture>,
}

impl Vision {
    pub fn connect(&mut self, camera_id: i32) -> crate::Result<()> {
        self.source = Some(VideoCapture::new(camera_id, videoio::CAP_ANY)?);

        Ok(())
    }

    pub fn disconnect(&mut self) -> crate::Result<()> {
        if let Some(src) = &mut self.source {
            src.release()?;
        }

        Ok(())
    }

    /// Grabs a frame, optionally mirrors it, and resizes to the
    /// configured geometry.
    pub fn get_frame(&mut self, flip_frame: bool, width: i32, height: i32) -> crate::Result<Mat> {
        let mut frame = Mat::default();
        if let Some(src) = &mut self.source {
            src.read(&mut frame)?;
        }

        let new = if flip_frame {
            let mut flipped = Mat::default();
            flip(&frame, &mut flipped, 1)?;
            flipped
        } else {
            frame
        };

        let mut resized = Mat::default();
        resize(
            &new,
            &mut resized,
            Size::new(width, height),
            0.,
            0.,
            INTER_AREA,
        )?;

        Ok(resized)
    }

    /// Returns a denoised binary mask of the pixels within the HSV
    /// bounds.
    pub fn filter_color(
        &self,
        src: &Mat,
        lower_bound: (u8, u8, u8),
        upper_bound: (u8, u8, u8),
    ) -> crate::Result<Mat> {
        let mut gb = Mat::default();
        gaussian_blur(&src, &mut gb, Size::new(15, 15), 0., 0., BORDER_DEFAULT)?;

        let mut hsv_frame = Mat::default();
        cvt_color(&gb, &mut hsv_frame, COLOR_BGR2HSV, 0)?;

        let lower = Mat::from_slice(&[lower_bound.0, lower_bound.1, lower_bound.2])?;
        let upper = Mat::from_slice(&[upper_bound.0, upper_bound.1, upper_bound.2])?;

        let mut mask = Mat::default();
        in_range(&hsv_frame, &lower, &upper, &mut mask)?;

        let kernel_close = get_structuring_element(MORPH_ELLIPSE, Size::new(3, 3), NEG_POINT)?;
        let kernel_open = get_structuring_element(MORPH_ELLIPSE, Size::new(7, 7), NEG_POINT)?;

        let mut morph_open = Mat::default();
        morphology_ex(
            &mask,
            &mut morph_open,
            MORPH_OPEN,
            &kernel_open,
            NEG_POINT,
            2,
            BORDER_CONSTANT,
            morphology_default_border_value()?,
        )?;

        let mut morph_close = Mat::default();
        morphology_ex(
            &morph_open,
            &mut morph_close,
            MORPH_CLOSE,
            &kernel_close,
            NEG_POINT,
            4,
            BORDER_CONSTANT,
            morphology_default_border_value()?,
        )?;

        Ok(morph_close)
    }

    /// External contours of a binary mask.
    pub fn contours(&self, gray_mat: &Mat) -> crate::Result<VectorOfVectorOfPoint> {
        let mut contours = VectorOfVectorOfPoint::new();
        find_contours(
            &gray_mat,
            &mut contours,
            RETR_EXTERNAL,
            CHAIN_APPROX_SIMPLE,
            Point::default(),
        )?;

        Ok(contours)
    }
}
