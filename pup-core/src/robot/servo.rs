use crate::robot::config::{SERVO_MAX_PULSE_US, SERVO_MIN_PULSE_US};
use crate::robot::leg::Leg;
use embedded_hal::pwm::SetDutyCycle;
use fugit::Hertz;
use log::error;

/// One leg's hip servo on its own PWM channel.
///
/// The wrapped channel is the single point of contact with hardware for
/// that leg; the stored angle always mirrors the last duty written.
#[derive(Debug)]
pub struct Servo<PWM> {
    pwm: PWM,
    angle: u8,
    released: bool,
    max_duty: u32,
    frequency: Hertz<u32>,
    leg: Leg,
}

impl<PWM> Servo<PWM>
where
    PWM: SetDutyCycle,
{
    pub fn new(pwm: PWM, max_duty: u32, frequency: Hertz<u32>, leg: Leg, boot_angle: u8) -> Self {
        Self {
            pwm,
            angle: boot_angle,
            released: false,
            max_duty,
            frequency,
            leg,
        }
    }

    /// Drives the horn to `angle` degrees.
    ///
    /// # Arguments
    /// * `angle` - A value between 0 and 180 degrees. Callers feed angles
    ///   from the validated waypoint tables; the map does not clamp.
    pub fn set_angle(&mut self, angle: u8) {
        //Avoid setting the same angle again
        if self.angle == angle && !self.released {
            return;
        }
        self.angle = angle;
        self.released = false;

        // Right-side horns are mounted mirrored
        let angle = if self.leg.mirrored() { 180 - angle } else { angle };

        // Linearly interpolate the pulse, e.g. 90° -> 1550 µs
        let pulse = SERVO_MIN_PULSE_US
            + (angle as u32 * (SERVO_MAX_PULSE_US - SERVO_MIN_PULSE_US)) / 180;

        // Scale pulse to PWM register resolution
        // THE WIDTH OF THE PULSE DRIVES THE ANGLE, NOT FREQ
        let period_us = 1_000_000 / self.frequency.raw();
        let duty = ((pulse * self.max_duty) / period_us).min(self.max_duty) as u16;
        if let Err(e) = self.pwm.set_duty_cycle(duty) {
            error!("{} error writing angle {:?}", self.leg, e);
        }
    }

    /// Stops the pulse train so the horn goes limp. The next `set_angle`
    /// writes unconditionally, even for the angle last held.
    pub fn release(&mut self) {
        self.released = true;
        if let Err(e) = self.pwm.set_duty_cycle_fully_off() {
            error!("{} error releasing servo {:?}", self.leg, e);
        }
    }

    pub fn angle(&self) -> u8 {
        self.angle
    }

    pub fn leg(&self) -> Leg {
        self.leg
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use fugit::HertzU32;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct MockPwm {
        max_duty: u16,
        writes: Rc<RefCell<Vec<u16>>>,
    }

    impl embedded_hal::pwm::ErrorType for MockPwm {
        type Error = Infallible;
    }

    impl SetDutyCycle for MockPwm {
        fn max_duty_cycle(&self) -> u16 {
            self.max_duty
        }

        fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Infallible> {
            self.writes.borrow_mut().push(duty);
            Ok(())
        }
    }

    fn servo(leg: Leg, boot_angle: u8) -> (Servo<MockPwm>, Rc<RefCell<Vec<u16>>>) {
        let writes = Rc::new(RefCell::new(Vec::new()));
        let pwm = MockPwm {
            max_duty: 8191,
            writes: writes.clone(),
        };
        (
            Servo::new(pwm, 8191, HertzU32::from_raw(50), leg, boot_angle),
            writes,
        )
    }

    #[test]
    fn duty_map_matches_the_calibrated_span() {
        let (mut servo, writes) = servo(Leg::FrontLeft, 90);
        servo.set_angle(0);
        servo.set_angle(90);
        servo.set_angle(180);
        // 500 µs, 1550 µs and 2600 µs pulses over a 20 ms period, 13-bit
        assert_eq!(*writes.borrow(), vec![204, 634, 1064]);
    }

    #[test]
    fn mirrored_legs_invert_the_angle() {
        let (mut left, left_writes) = servo(Leg::BackLeft, 90);
        let (mut right, right_writes) = servo(Leg::BackRight, 90);
        left.set_angle(180);
        right.set_angle(0);
        assert_eq!(*left_writes.borrow(), *right_writes.borrow());
    }

    #[test]
    fn duty_grows_with_the_angle() {
        let (mut servo, writes) = servo(Leg::FrontLeft, 1);
        for angle in 0..=180 {
            servo.set_angle(angle);
        }
        let writes = writes.borrow();
        assert!(writes.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn repeated_angle_is_written_once() {
        let (mut servo, writes) = servo(Leg::FrontLeft, 0);
        servo.set_angle(90);
        servo.set_angle(90);
        assert_eq!(writes.borrow().len(), 1);
        assert_eq!(servo.angle(), 90);
    }

    #[test]
    fn release_drops_the_pulse_and_forces_the_next_write() {
        let (mut servo, writes) = servo(Leg::FrontLeft, 0);
        servo.set_angle(90);
        servo.release();
        servo.set_angle(90);
        assert_eq!(*writes.borrow(), vec![634, 0, 634]);
    }
}
