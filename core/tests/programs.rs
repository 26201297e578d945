use std::time::{Duration, Instant};

use emu8_core::{Chip8, Config, Error, Exit, Fault, FrameBuffer, KeyState, TimerMode};
use proptest::prelude::*;

fn chip8(rom: &[u8]) -> Chip8<FrameBuffer, KeyState> {
    Chip8::new(rom, FrameBuffer::new(), KeyState::new(), Config::manual()).unwrap()
}

fn rom(words: &[u16]) -> Vec<u8> {
    words.iter().flat_map(|word| word.to_be_bytes()).collect()
}

#[test]
fn add_two_registers_then_run_off_the_end() {
    let mut chip8 = chip8(&rom(&[0x6005, 0x6103, 0x8014]));
    assert_eq!(chip8.run(), Ok(Exit::EndOfProgram));
    assert_eq!(chip8.registers().v(0x0), Ok(8));
    assert_eq!(chip8.registers().v(0xF), Ok(0));
}

#[test]
fn halts_on_the_step_after_the_last_instruction() {
    let mut chip8 = chip8(&rom(&[0x6005, 0x6103, 0x8014]));
    let mut steps = 0;
    let exit = loop {
        steps += 1;
        if let Some(exit) = chip8.step().unwrap() {
            break exit;
        }
    };
    assert_eq!(exit, Exit::EndOfProgram);
    assert_eq!(steps, 4);
    assert_eq!(chip8.registers().pc(), 0x206);
}

#[test]
fn subroutine_returns_after_call() {
    let mut chip8 = chip8(&rom(&[
        0x2206, // 200: call 206
        0x7101, // 202: V1 += 1
        0x1FFE, // 204: jump to the end of memory
        0x6105, // 206: V1 = 5
        0x00EE, // 208: return
    ]));
    assert_eq!(chip8.run(), Ok(Exit::EndOfMemory));
    assert_eq!(chip8.registers().v(0x1), Ok(6));
    assert_eq!(chip8.registers().sp(), 0);
}

#[test]
fn unbounded_recursion_overflows_on_the_seventeenth_call() {
    let mut chip8 = chip8(&rom(&[0x2200]));
    for _ in 0..16 {
        assert_eq!(chip8.step(), Ok(None));
    }
    assert_eq!(
        chip8.step(),
        Err(Fault {
            pc: 0x200,
            opcode: 0x2200,
            source: Error::StackOverflow
        })
    );
    assert_eq!(chip8.registers().sp(), 16);
}

#[test]
fn unknown_opcodes_do_not_stop_the_run() {
    let mut chip8 = chip8(&rom(&[0x5121, 0x8AAF, 0xE1FF, 0x6042]));
    assert_eq!(chip8.run(), Ok(Exit::EndOfProgram));
    assert_eq!(chip8.registers().v(0x0), Ok(0x42));
}

#[test]
fn delay_timer_counts_down_between_reads() {
    let mut chip8 = chip8(&rom(&[0x600A, 0xF015, 0xF107, 0xF207]));
    chip8.step().unwrap();
    chip8.step().unwrap();
    chip8.advance_timers(4);
    chip8.step().unwrap();
    assert_eq!(chip8.registers().v(0x1), Ok(6));
    chip8.advance_timers(6);
    assert_eq!(chip8.timers().delay(), 0);
    chip8.advance_timers(10);
    chip8.step().unwrap();
    assert_eq!(chip8.registers().v(0x2), Ok(0));
}

#[test]
fn busy_wait_on_real_time_delay_timer() {
    let rom = rom(&[
        0x6103, // 200: V1 = 3
        0xF115, // 202: DT = V1
        0xF207, // 204: V2 = DT
        0x3200, // 206: skip if V2 == 0
        0x1204, // 208: jump 204
        0x1FFE, // 20A: jump to the end of memory
    ]);
    let config = Config {
        timers: TimerMode::RealTime,
        ..Config::default()
    };
    let mut chip8 = Chip8::new(&rom, FrameBuffer::new(), KeyState::new(), config).unwrap();

    let start = Instant::now();
    assert_eq!(chip8.run(), Ok(Exit::EndOfMemory));
    // Three ticks at 60Hz is 50ms
    assert!(start.elapsed() >= Duration::from_millis(30));
    assert_eq!(chip8.timers().delay(), 0);
}

#[test]
fn bcd_digits_drawn_with_the_font() {
    let mut chip8 = chip8(&rom(&[
        0x607B, // V0 = 123
        0xA300, // I = 300
        0xF033, // mem[300..303] = 1, 2, 3
        0xF265, // V0..=V2 = 1, 2, 3; I = 303
        0xF029, // I = glyph for V0
        0xD125, // draw it at (V1, V2) = (2, 3)
    ]));
    for _ in 0..6 {
        chip8.step().unwrap();
    }
    assert_eq!(chip8.registers().v(0x0), Ok(1));
    assert_eq!(chip8.registers().i(), 5);
    assert_eq!(chip8.registers().v(0xF), Ok(0));

    // The 1 glyph: 0x20, 0x60, 0x20, 0x20, 0x70
    let display = chip8.display();
    assert_eq!(display.pixel(4, 3), 1);
    assert_eq!(display.pixel(3, 4), 1);
    assert_eq!(display.pixel(4, 4), 1);
    assert_eq!(display.pixel(3, 3), 0);
    assert_eq!(display.pixel(3, 7), 1);
    assert_eq!(display.pixel(5, 7), 1);
    assert!(chip8.display_mut().take_frame().is_some());
}

#[test]
fn wait_for_keypress_stores_key() {
    let mut chip8 = chip8(&rom(&[0xF50A]));
    chip8.keypad_mut().press(0x9);
    chip8.step().unwrap();
    assert_eq!(chip8.registers().v(0x5), Ok(0x9));
}

#[test]
fn register_block_round_trip() {
    let mut chip8 = chip8(&rom(&[
        0x6011, 0x6122, 0x6233, // V0..=V2
        0xA400, 0xF255, // store at 400, I = 403
        0x6000, 0x6100, 0x6200, // clear them
        0xA400, 0xF265, // load them back
    ]));
    for _ in 0..10 {
        chip8.step().unwrap();
    }
    assert_eq!(chip8.registers().v_all()[0..3], [0x11, 0x22, 0x33]);
    assert_eq!(chip8.registers().i(), 0x403);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn add_sets_carry_iff_sum_overflows(a in any::<u8>(), b in any::<u8>()) {
        let mut chip8 = chip8(&rom(&[0x6000 | a as u16, 0x6100 | b as u16, 0x8014]));
        for _ in 0..3 {
            chip8.step().unwrap();
        }
        let sum = a as u16 + b as u16;
        prop_assert_eq!(chip8.registers().v(0x0), Ok((sum % 256) as u8));
        prop_assert_eq!(chip8.registers().v(0xF), Ok(u8::from(sum > 255)));
    }

    #[test]
    fn sub_sets_not_borrow(a in any::<u8>(), b in any::<u8>()) {
        let mut chip8 = chip8(&rom(&[0x6000 | a as u16, 0x6100 | b as u16, 0x8015]));
        for _ in 0..3 {
            chip8.step().unwrap();
        }
        prop_assert_eq!(chip8.registers().v(0x0), Ok(a.wrapping_sub(b)));
        prop_assert_eq!(chip8.registers().v(0xF), Ok(u8::from(a >= b)));
    }
}
