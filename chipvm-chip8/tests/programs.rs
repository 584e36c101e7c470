use chipvm_chip8::instructions::assemble;
use chipvm_chip8::{Chip8Config, Chip8Error, Chip8Instruction, Chip8Machine, SpritePolicy};
use chipvm_core::{DisplayError, Machine};
use proptest::prelude::*;

use Chip8Instruction::*;

fn boot(program: &[Chip8Instruction], config: Chip8Config) -> Chip8Machine {
    let mut machine = Chip8Machine::new(config);
    machine.load_program(&assemble(program)).unwrap();
    machine
}

fn run(machine: &mut Chip8Machine, steps: usize) {
    for _ in 0..steps {
        machine.step().unwrap();
    }
}

#[test]
fn subroutine_return_resumes_past_pushed_frame() {
    let mut machine = boot(
        &[
            Call { addr: 0x208 },              // 0x200, pushes 0x202
            SetReg { vx_idx: 1, value: 0x11 }, // 0x202
            SetReg { vx_idx: 3, value: 0x33 }, // 0x204
            Jump { addr: 0x206 },              // 0x206
            SetReg { vx_idx: 2, value: 0x22 }, // 0x208
            Return,                            // 0x20A
        ],
        Chip8Config::new(),
    );
    run(&mut machine, 3);
    assert_eq!(machine.program_counter(), 0x204);
    assert_eq!(machine.stack().depth(), 0);

    run(&mut machine, 2);
    assert_eq!(machine.registers().v(0x2), 0x22);
    assert_eq!(machine.registers().v(0x3), 0x33);
    assert_eq!(machine.registers().v(0x1), 0x00, "word at the pushed frame is not run");
    assert_eq!(machine.program_counter(), 0x206);
}

#[test]
fn countdown_loop() {
    // V0 = 10; loop { V0 -= 1 via V0 += 0xFF; if V0 != 0 jump back }
    let mut machine = boot(
        &[
            SetReg { vx_idx: 0, value: 10 },
            AddReg { vx_idx: 0, value: 0xFF },
            SkipIfEqual { vx_idx: 0, value: 0 },
            Jump { addr: 0x202 },
            SetReg { vx_idx: 5, value: 1 },
        ],
        Chip8Config::new(),
    );
    let mut steps = 0;
    while machine.registers().v(0x5) == 0 {
        machine.step().unwrap();
        steps += 1;
        assert!(steps < 100, "loop never terminated");
    }
    assert_eq!(machine.registers().v(0x0), 0);
    assert_eq!(steps, 1 + 10 * 2 + 9 + 1);
}

#[test]
fn font_digits_render_side_by_side() {
    let mut machine = boot(
        &[
            SetReg { vx_idx: 0, value: 0x1 },
            SetReg { vx_idx: 1, value: 0x0 },
            SetReg { vx_idx: 2, value: 0x0 },
            SetVIDigit { vx_idx: 0 },
            Draw {
                vx_idx: 1,
                vy_idx: 2,
                num_bytes: 5,
            },
            SetReg { vx_idx: 1, value: 5 },
            Draw {
                vx_idx: 1,
                vy_idx: 2,
                num_bytes: 5,
            },
        ],
        Chip8Config::new(),
    );
    run(&mut machine, 7);
    assert_eq!(machine.registers().flag(), 0);
    // Glyph "1" is 8 pixels; two copies, no overlap.
    assert_eq!(machine.display().lit_count(), 16);
}

#[test]
fn sprite_policies_at_the_corner() {
    let program = [
        SetReg { vx_idx: 0, value: 62 },
        SetReg { vx_idx: 1, value: 31 },
        SetVI { addr: 0x300 },
        SetReg { vx_idx: 2, value: 0xFF },
        StoreRegs { vx_idx: 2 },
        SetVI { addr: 0x302 },
        Draw {
            vx_idx: 0,
            vy_idx: 1,
            num_bytes: 1,
        },
    ];

    let mut clipped = boot(&program, Chip8Config::new());
    run(&mut clipped, 7);
    assert_eq!(clipped.display().lit_count(), 2);

    let mut wrapped = boot(
        &program,
        Chip8Config::new().with_sprite_policy(SpritePolicy::Wrap),
    );
    run(&mut wrapped, 7);
    assert_eq!(wrapped.display().lit_count(), 8);
    assert!(wrapped.display().get(0, 31));

    let mut rejected = boot(
        &program,
        Chip8Config::new().with_sprite_policy(SpritePolicy::Reject),
    );
    run(&mut rejected, 6);
    let err = rejected.step().unwrap_err();
    assert!(matches!(
        err,
        Chip8Error::Display(DisplayError::SpriteOutOfBounds { x: 62, y: 31, .. })
    ));
    assert_eq!(rejected.display().lit_count(), 0);
    assert_eq!(rejected.program_counter(), 0x20C);
}

#[test]
fn identical_runs_produce_identical_state() {
    let program = [
        Random { vx_idx: 0, mask: 0x3F },
        Random { vx_idx: 1, mask: 0x1F },
        SetVIDigit { vx_idx: 0 },
        Draw {
            vx_idx: 0,
            vy_idx: 1,
            num_bytes: 5,
        },
        Jump { addr: 0x200 },
    ];
    let config = Chip8Config::new().with_seed(0xC0FFEE);
    let mut a = boot(&program, config);
    let mut b = boot(&program, config);
    for _ in 0..200 {
        assert_eq!(a.step(), b.step());
    }
    assert_eq!(a.registers(), b.registers());
    assert_eq!(a.display(), b.display());
    assert_eq!(a.frame(), b.frame());
}

#[test]
fn load_file_reads_rom_from_disk() {
    let path = std::env::temp_dir().join(format!("chipvm-load-{}.ch8", std::process::id()));
    std::fs::write(&path, assemble(&[SetReg { vx_idx: 0xE, value: 0x99 }])).unwrap();

    let mut machine = Chip8Machine::default();
    machine.load_file(&path).unwrap();
    machine.step().unwrap();
    assert_eq!(machine.registers().v(0xE), 0x99);

    std::fs::remove_file(&path).unwrap();
    assert!(machine.load_file(&path).is_err());
}

proptest! {
    #[test]
    fn add_carry_matches_wide_arithmetic(x in any::<u8>(), y in any::<u8>()) {
        let mut machine = boot(
            &[
                SetReg { vx_idx: 1, value: x },
                SetReg { vx_idx: 2, value: y },
                AddRegReg { vx_idx: 1, vy_idx: 2 },
            ],
            Chip8Config::new(),
        );
        run(&mut machine, 3);
        let wide = u16::from(x) + u16::from(y);
        prop_assert_eq!(machine.registers().v(0x1), wide as u8);
        prop_assert_eq!(machine.registers().flag(), u8::from(wide > 0xFF));
    }

    #[test]
    fn sub_borrow_flags(x in any::<u8>(), y in any::<u8>()) {
        let mut machine = boot(
            &[
                SetReg { vx_idx: 1, value: x },
                SetReg { vx_idx: 2, value: y },
                SetReg { vx_idx: 3, value: x },
                SubRegReg { vx_idx: 1, vy_idx: 2 },
                SubRegRegReverse { vx_idx: 3, vy_idx: 2 },
            ],
            Chip8Config::new(),
        );
        run(&mut machine, 4);
        prop_assert_eq!(machine.registers().v(0x1), x.wrapping_sub(y));
        prop_assert_eq!(machine.registers().flag(), u8::from(x >= y));
        machine.step().unwrap();
        prop_assert_eq!(machine.registers().v(0x3), y.wrapping_sub(x));
        prop_assert_eq!(machine.registers().flag(), u8::from(y >= x));
    }

    #[test]
    fn store_then_load_restores_registers(
        values in proptest::array::uniform16(any::<u8>()),
        last in 0u8..=0xE,
        base in 0x300u16..0xF00,
    ) {
        let mut program = vec![SetVI { addr: base }];
        program.extend((0..=last).map(|idx| SetReg { vx_idx: idx, value: values[usize::from(idx)] }));
        program.push(StoreRegs { vx_idx: last });
        program.extend((0..=0xE).map(|idx| SetReg { vx_idx: idx, value: 0 }));
        program.push(SetVI { addr: base });
        program.push(LoadRegs { vx_idx: last });

        let steps = program.len();
        let mut machine = boot(&program, Chip8Config::new());
        run(&mut machine, steps);
        for idx in 0..=0xE {
            let expected = if idx <= last { values[usize::from(idx)] } else { 0 };
            prop_assert_eq!(machine.registers().v(idx), expected, "V{:X}", idx);
        }
    }
}
