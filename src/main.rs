//! Emulator entry point.
//!
//! Loads a ROM, runs the frame loop on a background thread, and presents
//! the shared frame buffer in a window at ~60 fps. F5 captures an
//! in-memory quick snapshot, F7 restores it.
//! Usage: samnes path/to/game.nes

use std::env;
use std::fs;
use std::process;

use ansi_term::Colour::Red;
use minifb::{Key, KeyRepeat, Window, WindowOptions};

use samnes::controller::Button;
use samnes::emulator::Emulator;
use samnes::ppu::ppu::{FRAME_HEIGHT, FRAME_WIDTH, NES_PALETTE_RGB};
use samnes::snapshot::Snapshot;

/// Keyboard layout: z/x/t/y plus the arrow keys. The core owns no key
/// names; this table is the caller-side mapping.
const KEY_MAP: [(Key, Button); 8] = [
    (Key::Z, Button::A),
    (Key::X, Button::B),
    (Key::T, Button::Select),
    (Key::Y, Button::Start),
    (Key::Up, Button::Up),
    (Key::Down, Button::Down),
    (Key::Left, Button::Left),
    (Key::Right, Button::Right),
];

fn main() {
    env_logger::init();

    let path = env::args()
        .nth(1)
        .unwrap_or_else(|| "roms/game.nes".to_string());
    let rom = match fs::read(&path) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("{} cannot read {}: {}", Red.bold().paint("ERROR"), path, e);
            process::exit(1);
        }
    };

    let mut emulator = Emulator::new();
    let nes = emulator.nes();
    if let Err(e) = nes.lock().unwrap().load_rom(&rom) {
        eprintln!("{} failed to load ROM: {}", Red.bold().paint("ERROR"), e);
        process::exit(1);
    }
    emulator.start();

    let mut window = Window::new(
        "Samnes",
        FRAME_WIDTH,
        FRAME_HEIGHT,
        WindowOptions {
            resize: true,
            scale: minifb::Scale::X2,
            scale_mode: minifb::ScaleMode::AspectRatioStretch,
            ..WindowOptions::default()
        },
    )
    .expect("Failed to create window");

    window.set_target_fps(60);

    let mut rgb = vec![0u32; FRAME_WIDTH * FRAME_HEIGHT];
    let mut quick_save: Option<Snapshot> = None;

    while window.is_open() && !window.is_key_down(Key::Escape) {
        {
            let mut machine = nes.lock().unwrap();

            for (key, button) in KEY_MAP {
                machine.set_key(button, window.is_key_down(key));
            }

            if window.is_key_pressed(Key::F5, KeyRepeat::No) {
                quick_save = Some(machine.capture());
            }
            if window.is_key_pressed(Key::F7, KeyRepeat::No) {
                if let Some(snapshot) = &quick_save {
                    machine.restore(snapshot);
                }
            }

            // Palette translation happens here, on the presentation side;
            // the core only ever hands out 6-bit indices.
            for (out, &index) in rgb.iter_mut().zip(machine.ppu.framebuffer.iter()) {
                *out = NES_PALETTE_RGB[(index & 0x3F) as usize];
            }
        }

        window
            .update_with_buffer(&rgb, FRAME_WIDTH, FRAME_HEIGHT)
            .expect("Failed to update window");
    }

    emulator.stop();
}
