// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE.txt for details)
#![allow(missing_docs)]
//! Platform-specific IO/UI code, and some debug functionality.

use std::{
    path::{Path, PathBuf},
    time::Instant,
};

use cosmac::{error::Result, Screen, CPU, HEIGHT, WIDTH};
use minifb::*;

#[derive(Clone, Debug)]
pub struct UIBuilder {
    pub width: usize,
    pub height: usize,
    pub name: Option<&'static str>,
    pub rom: Option<PathBuf>,
    pub window_options: WindowOptions,
}

impl UIBuilder {
    pub fn new(width: usize, height: usize, rom: impl AsRef<Path>) -> Self {
        UIBuilder {
            width,
            height,
            rom: Some(rom.as_ref().to_owned()),
            ..Default::default()
        }
    }
    /// Sets the integer scale of the window
    pub fn scale(mut self, scale: u8) -> Self {
        self.window_options.scale = window_scale(scale);
        self
    }
    pub fn build(&self) -> Result<UI> {
        let ui = UI {
            window: Window::new(
                self.name.unwrap_or_default(),
                self.width,
                self.height,
                self.window_options,
            )?,
            keyboard: Default::default(),
            fb: FrameBuffer::new(self.width, self.height),
            rom: self.rom.to_owned().unwrap_or_default(),
            time: Instant::now(),
        };
        Ok(ui)
    }
}

impl Default for UIBuilder {
    fn default() -> Self {
        UIBuilder {
            width: WIDTH,
            height: HEIGHT,
            name: Some("Chip-8 Interpreter"),
            rom: None,
            window_options: WindowOptions {
                title: true,
                resize: false,
                scale: Scale::X16,
                scale_mode: ScaleMode::AspectRatioStretch,
                none: true,
                ..Default::default()
            },
        }
    }
}

/// Converts a power-of-two scale factor into a minifb [Scale]
pub fn window_scale(scale: u8) -> Scale {
    match scale {
        1 => Scale::X1,
        2 => Scale::X2,
        4 => Scale::X4,
        8 => Scale::X8,
        32 => Scale::X32,
        _ => Scale::X16,
    }
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameBufferFormat {
    pub fg: u32,
    pub bg: u32,
}

impl Default for FrameBufferFormat {
    fn default() -> Self {
        FrameBufferFormat {
            fg: 0x0011a434,
            bg: 0x001E2431,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameBuffer {
    buffer: Vec<u32>,
    width: usize,
    height: usize,
    format: FrameBufferFormat,
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        FrameBuffer {
            buffer: vec![0x00be4d; width * height],
            width,
            height,
            format: Default::default(),
        }
    }
    /// Converts the [Screen] into pixels, in the current format
    pub fn draw(&mut self, screen: &Screen) -> &[u32] {
        screen.render(&mut self.buffer, self.format.fg, self.format.bg);
        &self.buffer
    }
    pub fn render(&mut self, window: &mut Window, screen: &Screen) -> Result<()> {
        self.draw(screen);
        window.update_with_buffer(&self.buffer, self.width, self.height)?;
        Ok(())
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new(WIDTH, HEIGHT)
    }
}

#[derive(Debug)]
pub struct UI {
    window: Window,
    keyboard: Vec<Key>,
    fb: FrameBuffer,
    rom: PathBuf,
    time: Instant,
}

impl UI {
    pub fn frame(&mut self, cpu: &mut CPU) -> Result<bool> {
        self.window.set_title(&title(cpu, &self.rom, self.time.elapsed().as_secs_f64()));
        if !self.window.is_open() {
            return Ok(false);
        }
        self.time = Instant::now();
        // update framebuffer
        self.fb.render(&mut self.window, cpu.screen())?;
        Ok(true)
    }

    pub fn keys(&mut self, cpu: &mut CPU) -> Result<bool> {
        // Diff against the keys held last frame
        let held = self.window.get_keys();
        let released = self.keyboard.iter().filter(|key| !held.contains(key));
        for &key in released {
            if let Some(key) = identify_key(key) {
                cpu.release(key)?;
            }
        }
        let pressed: Vec<Key> = held
            .iter()
            .copied()
            .filter(|key| !self.keyboard.contains(key))
            .collect();
        // handle keybinds for the UI
        for key in pressed {
            use Key::*;
            match key {
                F1 | Comma => cpu.dump(),
                F2 | Period => cpu.screen().print_screen(),
                F3 => {
                    let pc = cpu.pc() as usize;
                    println!("{}", cpu.mem().window(pc.saturating_sub(0x10)..pc + 0x30));
                }
                F4 | Slash => {
                    eprintln!("Debug {}.", {
                        cpu.flags.debug();
                        if cpu.flags.debug {
                            "enabled"
                        } else {
                            "disabled"
                        }
                    })
                }
                F5 | Backslash => eprintln!("{}.", {
                    cpu.flags.pause();
                    if cpu.flags.pause {
                        "Paused"
                    } else {
                        "Unpaused"
                    }
                }),
                F6 | Enter => {
                    eprintln!("Step");
                    if let Err(e) = cpu.singlestep() {
                        eprintln!("{e}");
                    }
                }
                F9 | Delete => {
                    eprintln!("Reset from {:03x}", cpu.pc());
                    cpu.reset();
                }
                Escape => return Ok(false),
                key => {
                    if let Some(key) = identify_key(key) {
                        cpu.press(key)?;
                    }
                }
            }
        }
        self.keyboard = held;
        Ok(true)
    }
}

/// Builds the window title, showing pause, sound, and the frame rate
pub fn title(cpu: &CPU, rom: &Path, frame_time: f64) -> String {
    let name = rom
        .file_name()
        .map(|name| name.to_string_lossy())
        .unwrap_or_default();
    if cpu.flags.pause {
        format!("Cosmac {name} ⏸")
    } else if cpu.sound() > 0 {
        format!("Cosmac {name} ♪")
    } else {
        format!("Cosmac {name} ▶ {:02.02}", 1.0 / frame_time)
    }
}

pub fn identify_key(key: Key) -> Option<usize> {
    match key {
        Key::Key1 => Some(0x1),
        Key::Key2 => Some(0x2),
        Key::Key3 => Some(0x3),
        Key::Key4 => Some(0xc),
        Key::Q => Some(0x4),
        Key::W => Some(0x5),
        Key::E => Some(0x6),
        Key::R => Some(0xD),
        Key::A => Some(0x7),
        Key::S => Some(0x8),
        Key::D => Some(0x9),
        Key::F => Some(0xE),
        Key::Z => Some(0xA),
        Key::X => Some(0x0),
        Key::C => Some(0xB),
        Key::V => Some(0xF),
        _ => None,
    }
}
