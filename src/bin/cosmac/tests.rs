//! Tests for cosmac
//!
//! Nothing here opens a window, so these run headless.

use super::ui::*;
use super::{parse_scale, run_frame, Arguments};
use cosmac::*;
use gumdrop::Options;
use minifb::Key;
use std::{collections::hash_map::DefaultHasher, hash::Hash, path::Path};

mod arguments {
    use super::*;
    #[test]
    fn defaults() {
        let args = Arguments::parse_args_default(&["rom.ch8"]).unwrap();
        assert_eq!(Path::new("rom.ch8"), args.file);
        assert_eq!(10, args.speed);
        assert_eq!(60, args.frame_rate);
        assert_eq!(16, args.scale);
        assert_eq!(None, args.timing);
        assert!(!args.debug && !args.pause);
    }
    #[test]
    fn everything() {
        let args = Arguments::parse_args_default(&[
            "--debug",
            "--pause",
            "--speed",
            "700",
            "--frame-rate",
            "30",
            "--timing",
            "realtime",
            "--scale",
            "8",
            "pong.ch8",
        ])
        .unwrap();
        assert!(args.debug && args.pause);
        assert_eq!((700, 30, 8), (args.speed, args.frame_rate, args.scale));
        assert_eq!(Some(Timing::Realtime), args.timing);
    }
    #[test]
    fn bad_timing() {
        assert!(Arguments::parse_args_default(&["--timing", "whenever", "rom.ch8"]).is_err());
    }
    #[test]
    fn bad_scale() {
        assert!(Arguments::parse_args_default(&["--scale", "3", "rom.ch8"]).is_err());
    }
    #[test]
    fn missing_rom() {
        assert!(Arguments::parse_args_default::<&str>(&[]).is_err());
    }
}

mod scale {
    use super::*;
    use minifb::Scale;
    #[test]
    fn parse() {
        for scale in [1, 2, 4, 8, 16, 32] {
            assert_eq!(Ok(scale), parse_scale(&scale.to_string()));
        }
        for bad in ["0", "3", "64", "-1", "big"] {
            assert!(parse_scale(bad).is_err(), "{bad} should not be a scale");
        }
    }
    #[test]
    fn window_scales() {
        assert!(matches!(window_scale(1), Scale::X1));
        assert!(matches!(window_scale(8), Scale::X8));
        assert!(matches!(window_scale(32), Scale::X32));
    }
}

mod ui_builder {
    use super::*;
    #[test]
    fn default() {
        let ui_builder = UIBuilder::default();
        assert_eq!((WIDTH, HEIGHT), (ui_builder.width, ui_builder.height));
        println!("{ui_builder:?}");
    }
    #[test]
    #[allow(clippy::redundant_clone)]
    fn clone_debug() {
        let ui_builder_clone = UIBuilder::new(64, 32, "dummy.ch8").scale(4).clone();
        assert_eq!(Some(Path::new("dummy.ch8").to_owned()), ui_builder_clone.rom);
        println!("{ui_builder_clone:?}");
    }
}

mod keys {
    use super::*;
    #[test]
    fn layout() {
        let layout = [
            [Key::Key1, Key::Key2, Key::Key3, Key::Key4],
            [Key::Q, Key::W, Key::E, Key::R],
            [Key::A, Key::S, Key::D, Key::F],
            [Key::Z, Key::X, Key::C, Key::V],
        ];
        let expected = [
            [0x1, 0x2, 0x3, 0xc],
            [0x4, 0x5, 0x6, 0xd],
            [0x7, 0x8, 0x9, 0xe],
            [0xa, 0x0, 0xb, 0xf],
        ];
        for (keys, expected) in layout.iter().zip(expected) {
            for (&key, expected) in keys.iter().zip(expected) {
                assert_eq!(Some(expected), identify_key(key));
            }
        }
    }
    #[test]
    fn unmapped() {
        for key in [Key::Key5, Key::T, Key::Escape, Key::F1, Key::Space] {
            assert_eq!(None, identify_key(key));
        }
    }
}

mod title {
    use super::*;
    #[test]
    fn paused() {
        let mut cpu = CPU::default();
        cpu.flags.pause();
        assert_eq!("Cosmac pong.ch8 ⏸", title(&cpu, Path::new("roms/pong.ch8"), 0.016));
    }
    #[test]
    fn sound() {
        let mut cpu = CPU::default();
        cpu.load_program_bytes(&[0x60, 0x20, 0xf0, 0x18]).unwrap();
        cpu.multistep(2).unwrap();
        assert!(title(&cpu, Path::new("pong.ch8"), 0.016).ends_with('♪'));
    }
    #[test]
    fn running() {
        let cpu = CPU::default();
        assert!(title(&cpu, Path::new("pong.ch8"), 0.5).ends_with("▶ 2.00"));
    }
}

mod framebuffer_format {
    use super::*;
    #[test]
    fn default() {
        let fbf = FrameBufferFormat::default();
        assert_eq!((0x0011a434, 0x001e2431), (fbf.fg, fbf.bg));
    }
    #[test]
    fn clone() {
        let fbf = FrameBufferFormat {
            fg: 0x12345678,
            bg: 0x90abcdef,
        };
        let fbf2 = fbf.clone();
        assert_eq!(fbf, fbf2);
    }
    #[test]
    fn hash() {
        let mut hasher = DefaultHasher::new();
        FrameBufferFormat::default().hash(&mut hasher);
        println!("{hasher:?}");
    }
}

mod framebuffer {
    use super::*;
    #[test]
    fn new() {
        assert_eq!(FrameBuffer::new(64, 32), FrameBuffer::default());
    }
    #[test]
    fn draw() {
        let mut screen = Screen::new();
        screen.toggle(1, 0);
        let mut fb = FrameBuffer::default();
        let format = FrameBufferFormat::default();
        let pixels = fb.draw(&screen);
        assert_eq!(WIDTH * HEIGHT, pixels.len());
        assert_eq!(&[format.bg, format.fg, format.bg], &pixels[0..3]);
    }
    #[test]
    fn ord() {
        assert!(FrameBuffer::new(21, 12) == FrameBuffer::new(21, 12).min(FrameBuffer::new(34, 46)));
    }
}

mod frame {
    use super::*;
    #[test]
    fn steps_past_stack_fault() {
        let mut cpu = CPU::default();
        #[rustfmt::skip]
        let program = [
            0x00, 0xee, // 200: ret
            0x60, 0x01, // 202: mov #01, v0
            0x61, 0x02, // 204: mov #02, v1
        ];
        cpu.load_program_bytes(&program).unwrap();
        run_frame(&mut cpu, 3).unwrap();
        assert_eq!(3, cpu.cycle());
        assert_eq!([1, 2], cpu.v()[0..2]);
        assert_eq!(0x206, cpu.pc());
    }
    #[test]
    fn overflow_mid_frame() {
        let mut cpu = CPU::default();
        // calls itself until the stack runs out
        cpu.load_program_bytes(&[0x22, 0x00]).unwrap();
        run_frame(&mut cpu, 20).unwrap();
        assert_eq!(20, cpu.cycle());
        assert_eq!(16, cpu.sp());
    }
}
