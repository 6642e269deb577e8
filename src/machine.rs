//! All mutable state of one CHIP-8 machine. Pure data plus the invariants
//! that keep it sane; the [`crate::interpreter::Interpreter`] does the work.

use crate::error::LoadError;
use crate::framebuffer::Framebuffer;
use crate::keypad::Keypad;
use crate::memory::{self, Chip8MemoryMap, CHIP8_PROGRAM_ADDR};
use crate::stack::CallStack;

/// VF doubles as the carry/borrow/collision flag
pub const FLAG_REGISTER: usize = 0xF;

pub struct Machine {
    pub(crate) memory: Chip8MemoryMap,
    /// V0..VF. VF is a normal register that some opcodes also overwrite
    pub(crate) registers: [u8; 16],
    pub(crate) index: u16,
    pub(crate) program_counter: u16,
    pub(crate) stack: CallStack,
    pub(crate) delay_timer: u8,
    pub(crate) sound_timer: u8,
    pub(crate) framebuffer: Framebuffer,
    pub(crate) keys: Keypad,
}

impl Default for Machine {
    fn default() -> Self {
        Self::new()
    }
}

impl Machine {
    pub fn new() -> Self {
        Machine {
            memory: Chip8MemoryMap::new(),
            registers: [0; 16],
            index: 0,
            program_counter: CHIP8_PROGRAM_ADDR,
            stack: CallStack::new(),
            delay_timer: 0,
            sound_timer: 0,
            framebuffer: Framebuffer::new(),
            keys: Keypad::new(),
        }
    }

    /// a fresh machine with `program` loaded at 0x200
    pub fn with_program(program: &[u8]) -> Result<Self, LoadError> {
        let mut m = Self::new();
        m.load_program(program)?;
        Ok(m)
    }

    /// zero everything, reinstall the font and point the pc at 0x200
    pub fn reset(&mut self) {
        self.memory.reset();
        self.registers = [0; 16];
        self.index = 0;
        self.program_counter = CHIP8_PROGRAM_ADDR;
        self.stack.clear();
        self.delay_timer = 0;
        self.sound_timer = 0;
        self.framebuffer.clear();
        self.keys.release_all();
    }

    /// copy a program image to 0x200; on error nothing is written
    pub fn load_program(&mut self, program: &[u8]) -> Result<(), LoadError> {
        let len = self.memory.load_program(program)?;
        log::debug!("loaded {} program bytes at {:#05x}", len, CHIP8_PROGRAM_ADDR);
        Ok(())
    }

    /// external 60Hz-ish interrupt: count both timers down towards zero
    pub fn tick_timers(&mut self) {
        self.delay_timer = self.delay_timer.saturating_sub(1);
        self.sound_timer = self.sound_timer.saturating_sub(1);
    }

    /// step over the instruction at the pc without executing it
    pub fn skip_instruction(&mut self) {
        let (pc, _) = memory::offset_address(self.program_counter, 2);
        self.program_counter = pc;
    }

    pub fn memory(&self) -> &Chip8MemoryMap {
        &self.memory
    }

    pub fn memory_mut(&mut self) -> &mut Chip8MemoryMap {
        &mut self.memory
    }

    pub fn registers(&self) -> &[u8; 16] {
        &self.registers
    }

    pub fn register(&self, x: usize) -> u8 {
        self.registers[x & 0xF]
    }

    pub fn set_register(&mut self, x: usize, value: u8) {
        self.registers[x & 0xF] = value;
    }

    pub fn index(&self) -> u16 {
        self.index
    }

    pub fn program_counter(&self) -> u16 {
        self.program_counter
    }

    pub fn stack(&self) -> &CallStack {
        &self.stack
    }

    pub fn delay_timer(&self) -> u8 {
        self.delay_timer
    }

    /// non-zero means the buzzer should be sounding
    pub fn sound_timer(&self) -> u8 {
        self.sound_timer
    }

    pub fn framebuffer(&self) -> &Framebuffer {
        &self.framebuffer
    }

    pub fn keys(&self) -> &Keypad {
        &self.keys
    }

    pub fn set_keys(&mut self, keys: Keypad) {
        self.keys = keys;
    }
}
