pub mod detector;
pub mod vision;

pub use detector::ColorDetector;
pub use vision::Vision;
