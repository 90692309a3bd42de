use crate::config::AimSettings;
use crate::target::Target;

/// Center of the target's hitbox: the box center shifted by the
/// configured fraction of each half-extent.
pub fn hitbox_center(target: &Target, aim: &AimSettings) -> (i32, i32) {
    (
        target.center_x + (aim.hitbox_offset_x * target.size_x as f64).round() as i32,
        target.center_y + (aim.hitbox_offset_y * target.size_y as f64).round() as i32,
    )
}

/// Signed pixel offset from the primary target's hitbox center to the
/// frame center. No target means zero offset.
pub fn evaluate(primary: Option<&Target>, frame_center: (i32, i32), aim: &AimSettings) -> (i32, i32) {
    match primary {
        None => (0, 0),
        Some(target) => {
            let (hx, hy) = hitbox_center(target, aim);
            (frame_center.0 - hx, frame_center.1 - hy)
        }
    }
}

/// True when the offset lies within the target's scaled hitbox, i.e.
/// the turret is pointed close enough to fire.
pub fn on_target(target: &Target, dx: i32, dy: i32, aim: &AimSettings) -> bool {
    dx.abs() as f64 <= target.size_x as f64 * aim.hitbox_size
        && dy.abs() as f64 <= target.size_y as f64 * aim.hitbox_size
}

/// Discretizes an offset into a one-unit step per axis. Deliberately
/// not proportional: the loop converges by nudging one unit per cycle.
/// `invert_x`/`invert_y` flip the step for the servo mounting in use.
pub fn steer(dx: i32, dy: i32, aim: &AimSettings) -> (i32, i32) {
    let flip = |inverted: bool| if inverted { -1 } else { 1 };
    (dx.signum() * flip(aim.invert_x), dy.signum() * flip(aim.invert_y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::target::test_target;

    #[test]
    fn absent_primary_yields_zero_offset() {
        assert_eq!(evaluate(None, (320, 240), &AimSettings::default()), (0, 0));
    }

    #[test]
    fn offset_points_from_hitbox_center_to_frame_center() {
        let target = test_target(Some(1), 300, 260, 40, 40);
        let aim = AimSettings::default();
        assert_eq!(evaluate(Some(&target), (320, 240), &aim), (20, -20));
    }

    #[test]
    fn hitbox_offset_shifts_the_aim_point() {
        let target = test_target(Some(1), 320, 240, 40, 80);
        let aim = AimSettings {
            hitbox_offset_x: 0.5,
            hitbox_offset_y: 0.25,
            ..AimSettings::default()
        };
        assert_eq!(hitbox_center(&target, &aim), (340, 260));
        assert_eq!(evaluate(Some(&target), (320, 240), &aim), (-20, -20));
    }

    #[test]
    fn zero_offset_steers_nowhere() {
        assert_eq!(steer(0, 0, &AimSettings::default()), (0, 0));
    }

    #[test]
    fn steer_is_a_unit_step_regardless_of_magnitude() {
        let aim = AimSettings::default();
        assert_eq!(steer(250, -3, &aim), (1, -1));
        assert_eq!(steer(-1, 9000, &aim), (-1, 1));
        assert_eq!(steer(17, 0, &aim), (1, 0));
    }

    #[test]
    fn axis_inversion_flips_the_step() {
        let aim = AimSettings {
            invert_x: true,
            invert_y: true,
            ..AimSettings::default()
        };
        assert_eq!(steer(250, -3, &aim), (-1, 1));
        assert_eq!(steer(0, 5, &aim), (0, -1));
    }

    #[test]
    fn centered_hitbox_is_on_target() {
        // size_x = 40, hitbox fraction 0.25, dead center.
        let target = test_target(Some(1), 320, 240, 40, 40);
        let aim = AimSettings::default();
        let (dx, dy) = evaluate(Some(&target), (320, 240), &aim);
        assert_eq!((dx, dy), (0, 0));
        assert!(on_target(&target, dx, dy, &aim));
    }

    #[test]
    fn on_target_respects_the_scaled_box() {
        let target = test_target(Some(1), 320, 240, 40, 40);
        let aim = AimSettings::default();
        // 0.25 * 40 = 10 pixels of tolerance per axis.
        assert!(on_target(&target, 10, -10, &aim));
        assert!(!on_target(&target, 11, 0, &aim));
        assert!(!on_target(&target, 0, -11, &aim));
    }
}
