#![no_std]
#![no_main]
#![deny(
    clippy::mem_forget,
    reason = "mem::forget is generally not safe to do with esp_hal types, especially those \
    holding buffers for the duration of a data transfer."
)]

extern crate alloc;

mod board;

use board::{BoardDisplay, BoardStatus, HwEntropy};
use core::future::pending;
use embassy_executor::Spawner;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Receiver;
use esp_backtrace as _;
use esp_hal::clock::CpuClock;
use esp_hal::gpio::{AnyPin, Pin};
use esp_hal::ledc::channel::Channel;
use esp_hal::ledc::LowSpeed;
use esp_hal::timer::timg::TimerGroup;
use log::info;
use pup_core::motion::sync::{LEG_CHANNELS, MOTION_COMMANDS};
use pup_core::robot::commands::{Action, MotionCommand};
use pup_core::robot::hooks::DeviceState;
use pup_core::robot::servo::Servo;
use pup_core::tasks::motion_task::dispatch;
use pup_core::MOTION_CHANNEL_SIZE;

esp_bootloader_esp_idf::esp_app_desc!();

//LEG CHANNELS:
//FRONT_L: ch1 [17]
//FRONT_R: ch2 [13]
//BACK_L:  ch3 [18]
//BACK_R:  ch0 [14]

#[esp_hal_embassy::main]
async fn main(spawner: Spawner) {
    esp_println::logger::init_logger_from_env();

    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let p = esp_hal::init(config);

    esp_alloc::heap_allocator!(size: 32 * 1024);

    let timer0 = TimerGroup::new(p.TIMG1);
    esp_hal_embassy::init(timer0.timer0);
    info!("Embassy initialized");

    let rng = esp_hal::rng::Rng::new(p.RNG);

    let servo_pins: [AnyPin<'static>; 4] = [
        p.GPIO17.degrade(),
        p.GPIO13.degrade(),
        p.GPIO18.degrade(),
        p.GPIO14.degrade(),
    ];

    let servos = board::setup_servos(servo_pins, p.LEDC).await;

    info!("Starting pup robot...");
    for servo in servos {
        spawner
            .spawn(leg_task(servo))
            .expect("Fail spawning leg task");
    }
    spawner
        .spawn(motion_task(MOTION_COMMANDS.receiver()))
        .expect("Fail spawning motion task");
    spawner
        .spawn(idle_task(BoardStatus, BoardDisplay, HwEntropy::new(rng)))
        .expect("Fail spawning idle task");

    // boot complete; the command layer drives the dog from here
    board::set_device_state(DeviceState::Idle);
    dispatch(Action::Stand);

    loop {
        pending::<()>().await;
    }
}

#[embassy_executor::task(pool_size = 4)]
async fn leg_task(servo: Servo<Channel<'static, LowSpeed>>) {
    let leg = servo.leg();
    pup_core::tasks::leg_task::leg_task(leg, servo, &LEG_CHANNELS[leg as usize]).await
}

#[embassy_executor::task]
async fn motion_task(
    commands: Receiver<'static, CriticalSectionRawMutex, MotionCommand, MOTION_CHANNEL_SIZE>,
) {
    pup_core::tasks::motion_task::motion_task(commands, &LEG_CHANNELS).await
}

#[embassy_executor::task]
async fn idle_task(status: BoardStatus, display: BoardDisplay, rng: HwEntropy) {
    pup_core::tasks::idle_task::idle_task(status, display, rng).await
}
