//!
//! ## Design
//!
//! * exact CHIP-8 semantics, quirks included: VF side effects, wraparound,
//!   the order flag and result are written in the 8xyN group
//! * the machine is plain data; the interpreter is logic handed a machine,
//!   so several machines can run side by side and tests are deterministic
//! * the interpreter has no loop and no clock. The host calls `step` some
//!   number of times per timer tick, then ticks the timers, then draws
//! * abstract display, input and sound so alternatives can be plugged in;
//!   starting with TUI in-console
//! * malformed programs keep running: stack faults are reported and counted,
//!   and addresses clamp at 0xfff instead of wrapping into the font
//!
//! Model
//!
//! ```text
//! Host
//!  |-- display, input, sound(buzzer), run options
//!  |-- machine
//!  |    |-- memory (font at 0x050, program at 0x200)
//!  |    |-- registers, index, pc, call stack
//!  |    |-- delay + sound timers
//!  |    `-- framebuffer, keypad
//!  |-- interpreter(random source, fault counters)
//!  `-- main loop, once per tick
//!       |-- keys = input.poll()
//!       |-- steps_per_tick x interpreter.step(machine)
//!       |-- machine.tick_timers(); buzzer.update(sound_timer)
//!       |-- display.draw(framebuffer)
//!       `-- sleep out the rest of 1 / tick_hz
//! ```

pub mod config;
pub mod display;
pub mod error;
pub mod framebuffer;
pub mod host;
pub mod input;
pub mod interpreter;
pub mod keypad;
pub mod logger;
pub mod machine;
pub mod memory;
pub mod opcode;
pub mod sound;
pub mod stack;

pub use error::{Fault, LoadError};
pub use interpreter::Interpreter;
pub use machine::Machine;
