//! # interpreter
//!
//! The execution engine. It keeps no machine state of its own: every
//! [`Interpreter::step`] fetches one opcode from the [`Machine`] it is handed,
//! advances the program counter by two, then executes it. Jumps, calls and
//! skips simply overwrite the already-advanced pc.
//!
//! What it does own:
//!  * the random byte source for `Cxnn`
//!  * counters for faults and clamped addresses, so malformed programs stay
//!    runnable but visible
//!
//! Addresses are clamped, never wrapped: anything that would run past 0xfff
//! sticks at 0xfff (see [`crate::memory::offset_address`]).
use crate::error::Fault;
use crate::framebuffer::CHIP8_DISPLAY_HEIGHT;
use crate::machine::{Machine, FLAG_REGISTER};
use crate::memory::{self, Chip8MemoryMap, MemoryMap};
use crate::opcode::{AluOp, Instruction, Opcode};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// tallies of everything that went wrong but didn't stop execution
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FaultCounters {
    pub stack_overflows: u64,
    pub stack_underflows: u64,
    pub clamped_addresses: u64,
}

impl FaultCounters {
    fn record(&mut self, fault: Fault) {
        match fault {
            Fault::StackOverflow { .. } => self.stack_overflows += 1,
            Fault::StackUnderflow { .. } => self.stack_underflows += 1,
        }
    }

    pub fn stack_faults(&self) -> u64 {
        self.stack_overflows + self.stack_underflows
    }
}

pub struct Interpreter<R = StdRng> {
    rng: R,
    faults: FaultCounters,
}

impl Interpreter<StdRng> {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// deterministic `Cxnn`, for tests and replays
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl Default for Interpreter<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> Interpreter<R> {
    pub fn with_rng(rng: R) -> Self {
        Interpreter {
            rng,
            faults: FaultCounters::default(),
        }
    }

    pub fn faults(&self) -> &FaultCounters {
        &self.faults
    }

    /// Execute exactly one instruction.
    ///
    /// On a fault the machine is left as it was before the call, with the pc
    /// still pointing at the faulting instruction; the host decides whether
    /// to halt or [`Machine::skip_instruction`].
    pub fn step(&mut self, m: &mut Machine) -> Result<Instruction, Fault> {
        let start = m.program_counter;
        if start == memory::CHIP8_MAX_ADDR {
            // second opcode byte would be past the top of RAM
            self.note_clamp(start, 1);
        }
        let op = Opcode(m.memory.get_word(start));
        m.program_counter = self.offset(start, 2);

        let instruction = Instruction::from(op);
        log::trace!("{:#05x}: {:04x}  {}", start, op.0, instruction);

        if let Err(fault) = self.execute(m, instruction, start) {
            m.program_counter = start;
            self.faults.record(fault);
            log::warn!("{}", fault);
            return Err(fault);
        }
        Ok(instruction)
    }

    fn offset(&mut self, base: u16, offset: u16) -> u16 {
        let (addr, clamped) = memory::offset_address(base, offset);
        if clamped {
            self.note_clamp(base, offset);
        }
        addr
    }

    fn note_clamp(&mut self, base: u16, offset: u16) {
        self.faults.clamped_addresses += 1;
        log::debug!(
            "address {:#05x} + {:#x} clamped to {:#05x}",
            base,
            offset,
            memory::CHIP8_MAX_ADDR
        );
    }

    fn skip(&mut self, m: &mut Machine) {
        m.program_counter = self.offset(m.program_counter, 2);
    }

    fn execute(&mut self, m: &mut Machine, instruction: Instruction, start: u16) -> Result<(), Fault> {
        use Instruction::*;
        match instruction {
            ClearScreen => m.framebuffer.clear(),
            Return => {
                m.program_counter = m.stack.pop().map_err(|e| Fault::from_stack(e, start))?;
            }
            Jump(addr) => m.program_counter = addr,
            Call(addr) => {
                m.stack
                    .push(m.program_counter)
                    .map_err(|e| Fault::from_stack(e, start))?;
                m.program_counter = addr;
            }
            SkipEqImm { x, nn } => {
                if m.registers[x] == nn {
                    self.skip(m);
                }
            }
            SkipNeImm { x, nn } => {
                if m.registers[x] != nn {
                    self.skip(m);
                }
            }
            SkipEqReg { x, y } => {
                if m.registers[x] == m.registers[y] {
                    self.skip(m);
                }
            }
            LoadImm { x, nn } => m.registers[x] = nn,
            AddImm { x, nn } => m.registers[x] = m.registers[x].wrapping_add(nn),
            Alu { op, x, y } => alu(&mut m.registers, op, x, y),
            SkipNeReg { x, y } => {
                if m.registers[x] != m.registers[y] {
                    self.skip(m);
                }
            }
            LoadIndex(addr) => m.index = addr,
            JumpOffset(addr) => m.program_counter = self.offset(addr, m.registers[0] as u16),
            Random { x, nn } => m.registers[x] = self.rng.gen::<u8>() & nn,
            Draw { x, y, n } => self.draw(m, x, y, n),
            SkipKeyDown { x } => {
                if m.keys.is_pressed(m.registers[x]) {
                    self.skip(m);
                }
            }
            SkipKeyUp { x } => {
                if !m.keys.is_pressed(m.registers[x]) {
                    self.skip(m);
                }
            }
            ReadDelay { x } => m.registers[x] = m.delay_timer,
            WaitKey { x } => match m.keys.first_pressed() {
                Some(key) => m.registers[x] = key,
                // poll again on the next step
                None => m.program_counter = start,
            },
            SetDelay { x } => m.delay_timer = m.registers[x],
            SetSound { x } => m.sound_timer = m.registers[x],
            AddIndex { x } => m.index = self.offset(m.index, m.registers[x] as u16),
            LoadGlyph { x } => m.index = Chip8MemoryMap::glyph_addr(m.registers[x]),
            StoreBcd { x } => {
                let v = m.registers[x];
                for (i, digit) in [v / 100, (v / 10) % 10, v % 10].into_iter().enumerate() {
                    let addr = self.offset(m.index, i as u16);
                    m.memory.write_byte(addr, digit);
                }
            }
            StoreRegs { x } => {
                for i in 0..=x {
                    let addr = self.offset(m.index, i as u16);
                    m.memory.write_byte(addr, m.registers[i]);
                }
            }
            LoadRegs { x } => {
                for i in 0..=x {
                    let addr = self.offset(m.index, i as u16);
                    m.registers[i] = m.memory.read_byte(addr);
                }
            }
            Unknown(_) => {}
        }
        Ok(())
    }

    /// Dxyn: only rows that can land on screen are read from memory
    fn draw(&mut self, m: &mut Machine, x: usize, y: usize, n: u8) {
        let (px, py) = (m.registers[x], m.registers[y]);
        m.registers[FLAG_REGISTER] = 0;

        let visible = (n as usize).min(CHIP8_DISPLAY_HEIGHT - py as usize % CHIP8_DISPLAY_HEIGHT);
        let mut sprite = [0u8; 15];
        for (row, byte) in sprite.iter_mut().take(visible).enumerate() {
            let addr = self.offset(m.index, row as u16);
            *byte = m.memory.read_byte(addr);
        }

        if m.framebuffer.draw_sprite(px, py, &sprite[..visible]) {
            m.registers[FLAG_REGISTER] = 1;
        }
    }
}

/// 8xyN. VF is written before the result, and the result is computed from
/// the registers after that write, so an operand in VF sees the new flag.
fn alu(v: &mut [u8; 16], op: AluOp, x: usize, y: usize) {
    const F: usize = FLAG_REGISTER;
    match op {
        AluOp::Assign => v[x] = v[y],
        AluOp::Or => v[x] |= v[y],
        AluOp::And => v[x] &= v[y],
        AluOp::Xor => v[x] ^= v[y],
        AluOp::Add => {
            let sum = v[x] as u16 + v[y] as u16;
            v[F] = (sum > 0xFF) as u8;
            v[x] = (sum & 0xFF) as u8;
        }
        AluOp::Sub => {
            v[F] = (v[x] > v[y]) as u8;
            v[x] = v[x].wrapping_sub(v[y]);
        }
        AluOp::ShiftRight => {
            v[F] = v[x] & 0x01;
            v[x] >>= 1;
        }
        AluOp::SubReverse => {
            v[F] = (v[y] >= v[x]) as u8;
            v[x] = v[y].wrapping_sub(v[x]);
        }
        AluOp::ShiftLeft => {
            v[F] = (v[x] & 0x80) >> 7;
            v[x] <<= 1;
        }
    }
}
