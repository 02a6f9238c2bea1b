//! Board glue between the motion core and the ESP32 peripherals.
//!
//! Brings up the LEDC timer and the four leg channels, and implements
//! the core's boundary traits over board facilities: the hardware RNG,
//! the shared device-state cell written by the application layer, and a
//! log-backed stand-in for the screen link.
use core::cell::RefCell;

use alloc::boxed::Box;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_time::Timer;
use embedded_hal::pwm::SetDutyCycle;
use esp_hal::gpio::AnyPin;
use esp_hal::ledc::channel::{self, Channel, ChannelIFace, Number};
use esp_hal::ledc::timer::{self, LSClockSource, TimerIFace};
use esp_hal::ledc::{LSGlobalClkSource, Ledc, LowSpeed};
use esp_hal::peripherals::LEDC;
use esp_hal::rng::Rng;
use esp_hal::time::Rate;
use fugit::HertzU32;
use log::info;

use pup_core::robot::config::{BOOT_POSE, SERVO_FREQUENCY_HZ};
use pup_core::robot::hooks::{DeviceState, DisplayHooks, Entropy, StatusSource};
use pup_core::robot::leg::Leg;
use pup_core::robot::servo::Servo;

/// Configures the LEDC timer and the four leg channels, one servo per
/// leg slot.
pub async fn setup_servos(
    servo_pins: [AnyPin<'static>; 4],
    ledc: LEDC<'static>,
) -> [Servo<Channel<'static, LowSpeed>>; 4] {
    let mut ledc = Ledc::new(ledc);
    ledc.set_global_slow_clock(LSGlobalClkSource::APBClk);

    let mut servo_timer = ledc.timer::<LowSpeed>(timer::Number::Timer1);
    Timer::after_millis(500).await;
    servo_timer
        .configure(timer::config::Config {
            // 13 bits keep roughly five duty counts per degree
            duty: timer::config::Duty::Duty13Bit,
            clock_source: LSClockSource::APBClk,
            frequency: Rate::from_hz(SERVO_FREQUENCY_HZ),
        })
        .expect("Fail creating ledc timer");

    //Leak it to get a static lifetime.
    let servo_timer = &*Box::leak(Box::new(servo_timer));

    let [fl, fr, bl, br] = servo_pins;
    // channel numbers follow the dog's wiring loom
    [
        (Leg::FrontLeft, ledc.channel(Number::Channel1, fl)),
        (Leg::FrontRight, ledc.channel(Number::Channel2, fr)),
        (Leg::BackLeft, ledc.channel(Number::Channel3, bl)),
        (Leg::BackRight, ledc.channel(Number::Channel0, br)),
    ]
    .map(|(leg, mut pwm)| {
        pwm.configure(channel::config::Config {
            timer: servo_timer,
            duty_pct: 0,
            pin_config: channel::config::PinConfig::PushPull,
        })
        .expect("Fail configurating servo channel");
        let max_duty = pwm.max_duty_cycle() as u32;
        Servo::new(
            pwm,
            max_duty,
            HertzU32::from_raw(SERVO_FREQUENCY_HZ),
            leg,
            BOOT_POSE[leg as usize],
        )
    })
}

/// Device state cell. The application layer writes it; the idle
/// scheduler polls it through [`BoardStatus`].
static DEVICE_STATE: Mutex<CriticalSectionRawMutex, RefCell<DeviceState>> =
    Mutex::new(RefCell::new(DeviceState::Starting));

pub fn set_device_state(state: DeviceState) {
    DEVICE_STATE.lock(|cell| *cell.borrow_mut() = state);
}

pub struct BoardStatus;

impl StatusSource for BoardStatus {
    fn device_state(&self) -> DeviceState {
        DEVICE_STATE.lock(|cell| *cell.borrow())
    }
}

/// Stand-in for the screen link; the GUI layer swaps the eye animation
/// on these notifications.
pub struct BoardDisplay;

impl DisplayHooks for BoardDisplay {
    fn notify_motion_start(&self) {
        info!("[DISPLAY] motion start, animated eyes on");
    }

    fn notify_motion_idle(&self) {
        info!("[DISPLAY] motion done, back to the idle face");
    }
}

/// Hardware RNG behind the core's entropy seam.
pub struct HwEntropy {
    rng: Rng,
}

impl HwEntropy {
    pub fn new(rng: Rng) -> Self {
        Self { rng }
    }
}

impl Entropy for HwEntropy {
    fn next_u32(&mut self) -> u32 {
        self.rng.random()
    }
}
