use std::time::Instant;

use anyhow::Context;
use chip8_vm::{Emulator, DISPLAY_HEIGHT, DISPLAY_WIDTH};
use log::{error, info};
use sdl2::{audio::AudioSpecDesired, pixels::Color, rect::Rect};
use thiserror::Error;

use super::{
    beep::Beep,
    keymap::{self, Action},
};

const TIMER_DELAY: u128 = 1_000_000 / 60;

/// Microseconds between instructions; never zero, so the pacing loop always
/// drains.
fn cycle_delay(instructions_per_second: u32) -> u128 {
    (1_000_000 / instructions_per_second.max(1) as u128).max(1)
}

#[derive(Error, Debug)]
enum AppError {
    #[error("SDL error: {0}")]
    Sdl(String),
}

impl From<String> for AppError {
    fn from(s: String) -> Self {
        AppError::Sdl(s)
    }
}

/// Frontend options
pub struct Settings {
    pub title: String,
    pub instructions_per_second: u32,
    pub zoom: usize,
}

#[derive(Debug, PartialEq, Eq)]
enum AppState {
    Running,
    Paused,
    // the program failed; keep showing the last frame
    Halted,
    Quit,
}

/// Main application loop
pub fn run(mut emu: Emulator, settings: &Settings) -> Result<(), anyhow::Error> {
    let cycle_delay = cycle_delay(settings.instructions_per_second);
    let zoom = settings.zoom.max(1);

    // initialize SDL context and subsystems
    let sdl_context = sdl2::init()
        .map_err(AppError::from)
        .context("failed to initialize SDL context")?;
    let sdl_video = sdl_context
        .video()
        .map_err(AppError::from)
        .context("failed to initialize video subsystem")?;
    let sdl_audio = sdl_context
        .audio()
        .map_err(AppError::from)
        .context("failed to initialize audio subsystem")?;

    let window = sdl_video
        .window(
            &settings.title,
            (DISPLAY_WIDTH * zoom) as u32,
            (DISPLAY_HEIGHT * zoom) as u32,
        )
        .position_centered()
        .build()
        .context("error creating window")?;

    let mut canvas = window
        .into_canvas()
        .build()
        .context("error creating window canvas")?;

    let mut event_pump = sdl_context
        .event_pump()
        .map_err(AppError::from)
        .context("error obtaining the event pump")?;

    let desired_spec = AudioSpecDesired {
        freq: Some(44100),
        channels: Some(1),
        samples: None,
    };

    let audio_device = sdl_audio
        .open_playback(None, &desired_spec, Beep::from)
        .map_err(AppError::from)
        .context("error opening audio device")?;

    let mut state = AppState::Running;
    let mut previous = Instant::now();
    let mut timer_delta = 0;
    let mut cpu_delta = 0;
    let mut first_frame = true;

    while state != AppState::Quit {
        let now = Instant::now();
        let elapsed = now.duration_since(previous).as_micros();
        previous = now;

        for event in event_pump.poll_iter() {
            match keymap::translate_action(&event) {
                Some(Action::EmulateKeyState(key, pressed)) => emu.set_key(key, pressed),
                Some(Action::TogglePause) => {
                    state = match state {
                        AppState::Running => AppState::Paused,
                        AppState::Paused => AppState::Running,
                        other => other,
                    };
                    info!("{:?}", state);
                }
                Some(Action::Quit) => state = AppState::Quit,
                None => {}
            }
        }

        if state == AppState::Running {
            timer_delta += elapsed;
            cpu_delta += elapsed;

            while cpu_delta >= cycle_delay {
                cpu_delta -= cycle_delay;
                if let Err(err) = emu.step() {
                    error!("halting at {:#05X}: {}", emu.program_counter(), err);
                    state = AppState::Halted;
                    break;
                }
            }

            while timer_delta >= TIMER_DELAY {
                emu.tick_timers();
                timer_delta -= TIMER_DELAY;
            }
        }

        if state == AppState::Running && emu.sound_timer() > 0 {
            audio_device.resume()
        } else {
            audio_device.pause()
        }

        // only repaint when the program touched the display
        if emu.take_redraw_flag() || first_frame {
            first_frame = false;
            draw_frame(&mut canvas, &emu, zoom)?;
        }

        std::thread::sleep(std::time::Duration::from_millis(1));
    }

    audio_device.pause();
    Ok(())
}

fn draw_frame(
    canvas: &mut sdl2::render::WindowCanvas,
    emu: &Emulator,
    zoom: usize,
) -> Result<(), anyhow::Error> {
    canvas.set_draw_color(Color::RGB(0x00, 0x00, 0x00));
    canvas.clear();

    canvas.set_draw_color(Color::RGB(0xFF, 0xFF, 0xFF));
    for y in 0..DISPLAY_HEIGHT {
        for x in 0..DISPLAY_WIDTH {
            if emu.get_pixel(x, y) {
                let rect = Rect::new(
                    (x * zoom) as i32,
                    (y * zoom) as i32,
                    zoom as u32,
                    zoom as u32,
                );
                canvas
                    .fill_rect(rect)
                    .map_err(AppError::from)
                    .context("error drawing to canvas")?;
            }
        }
    }

    canvas.present();
    Ok(())
}
