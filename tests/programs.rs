//! Runs small, complete Chip-8 programs from start to finish
use cosmac::*;

/// Loads a program into a fresh CPU
fn load(program: &[u8]) -> CPU {
    let mut cpu = CPU::default();
    cpu.seed(0xc8)
        .load_program_bytes(program)
        .expect("Program should fit in memory");
    cpu
}

/// Reads back the pixels in a row, as a string of `#` and `.`
fn row(screen: &Screen, y: usize, xs: std::ops::Range<usize>) -> String {
    xs.map(|x| match screen.get(x, y) {
        Some(true) => '#',
        _ => '.',
    })
    .collect()
}

#[test]
fn count_to_ten() {
    #[rustfmt::skip]
    let mut cpu = load(&[
        0x60, 0x00, // 200: mov  #00, v0
        0x70, 0x01, // 202: add  #01, v0
        0x30, 0x0a, // 204: se   #0a, v0
        0x12, 0x02, // 206: jmp  202
        0x12, 0x08, // 208: jmp  208
    ]);
    cpu.multistep(100).unwrap();
    assert_eq!(10, cpu.v()[0]);
    assert_eq!(0x208, cpu.pc());
}

#[test]
fn print_decimal() {
    #[rustfmt::skip]
    let mut cpu = load(&[
        0x60, 0x7b, // 200: mov  #7b, v0
        0xa3, 0x00, // 202: mov  $300, I
        0xf0, 0x33, // 204: bcd  v0, &I
        0xf2, 0x65, // 206: dmai v2
        0x63, 0x00, // 208: mov  #00, v3
        0x64, 0x00, // 20a: mov  #00, v4
        0xf0, 0x29, // 20c: font v0, I
        0xd3, 0x45, // 20e: draw #5, v3, v4
        0x73, 0x05, // 210: add  #05, v3
        0xf1, 0x29, // 212: font v1, I
        0xd3, 0x45, // 214: draw #5, v3, v4
        0x73, 0x05, // 216: add  #05, v3
        0xf2, 0x29, // 218: font v2, I
        0xd3, 0x45, // 21a: draw #5, v3, v4
        0x12, 0x1c, // 21c: jmp  21c
    ]);
    cpu.multistep(20).unwrap();
    assert_eq!([1, 2, 3], cpu.v()[0..3]);
    assert_eq!(0, cpu.v()[0xf]);
    cpu.screen().print_screen();
    #[rustfmt::skip]
    let expected = [
        "..#..####.####.",
        ".##.....#....#.",
        "..#..####.####.",
        "..#..#.......#.",
        ".###.####.####.",
    ];
    for (y, expected) in expected.iter().enumerate() {
        assert_eq!(*expected, row(cpu.screen(), y, 0..15), "row {y}");
    }
    assert_eq!("...............", row(cpu.screen(), 5, 0..15));
}

#[test]
fn wait_on_delay_timer() {
    #[rustfmt::skip]
    let mut cpu = load(&[
        0x60, 0x05, // 200: mov  #05, v0
        0xf0, 0x15, // 202: mov  v0, DT
        0xf1, 0x07, // 204: mov  DT, v1
        0x31, 0x00, // 206: se   #00, v1
        0x12, 0x04, // 208: jmp  204
        0x12, 0x0a, // 20a: jmp  20a
    ]);
    cpu.multistep(50).unwrap();
    assert_eq!(0x20a, cpu.pc());
    assert_eq!(0, cpu.delay());
}

#[test]
fn sound_timer_decays() {
    #[rustfmt::skip]
    let mut cpu = load(&[
        0x60, 0x03, // 200: mov  #03, v0
        0xf0, 0x18, // 202: mov  v0, ST
        0x12, 0x04, // 204: jmp  204
    ]);
    cpu.multistep(2).unwrap();
    assert_eq!(2, cpu.sound());
    cpu.multistep(2).unwrap();
    assert_eq!(0, cpu.sound());
}

#[test]
fn wait_for_keypress() {
    #[rustfmt::skip]
    let mut cpu = load(&[
        0xf5, 0x0a, // 200: waitk v5
        0xe5, 0x9e, // 202: sek   v5
        0x12, 0x02, // 204: jmp   202
        0x66, 0x01, // 206: mov   #01, v6
        0x12, 0x08, // 208: jmp   208
    ]);
    cpu.multistep(5).unwrap();
    assert_eq!(0x200, cpu.pc());
    assert!(cpu.flags.keypause);
    cpu.press(0x7).unwrap();
    cpu.multistep(4).unwrap();
    assert_eq!([7, 1], cpu.v()[5..7]);
    assert_eq!(0x208, cpu.pc());
    assert!(!cpu.flags.keypause);
}

#[test]
fn recover_from_stack_fault() {
    #[rustfmt::skip]
    let mut cpu = load(&[
        0x00, 0xee, // 200: ret
        0x6a, 0x01, // 202: mov  #01, vA
    ]);
    assert!(matches!(
        cpu.step(),
        Err(Error::StackUnderflow { pc: 0x200 })
    ));
    cpu.step().unwrap();
    assert_eq!(1, cpu.v()[0xa]);
    assert_eq!(0, cpu.sp());
}

#[test]
fn seeded_runs_agree() {
    #[rustfmt::skip]
    let program = [
        0xc0, 0xff, // 200: rand #ff, v0
        0xc1, 0x0f, // 202: rand #0f, v1
        0xc2, 0xf0, // 204: rand #f0, v2
        0x12, 0x00, // 206: jmp  200
    ];
    let (mut a, mut b) = (load(&program), load(&program));
    for _ in 0..100 {
        a.step().unwrap();
        b.step().unwrap();
        assert_eq!(a.v(), b.v());
    }
    assert_eq!(0, a.v()[1] & 0xf0);
    assert_eq!(0, a.v()[2] & 0x0f);
}

#[test]
fn reset_and_rerun() {
    #[rustfmt::skip]
    let mut cpu = load(&[
        0xa0, 0x50, // 200: mov  $050, I
        0xd0, 0x05, // 202: draw #5, v0, v0
        0x70, 0x01, // 204: add  #01, v0
        0x12, 0x06, // 206: jmp  206
    ]);
    cpu.multistep(4).unwrap();
    let first = cpu.clone();
    cpu.reset();
    assert!(cpu.screen().is_blank());
    cpu.multistep(4).unwrap();
    assert_eq!(first, cpu);
}
