use clap::Parser;
use std::error::Error;

use chip8vm::config::Config;
use chip8vm::display::{Display, DummyDisplay, TermDisplay};
use chip8vm::host::{Host, RunSummary, StopReason};
use chip8vm::input::{DummyInput, Input, TermInput};
use chip8vm::interpreter::Interpreter;
use chip8vm::machine::Machine;
use chip8vm::sound::{Mute, SimpleBeep, Sound};
use chip8vm::{logger, memory};

/// run to completion, then drop the host so the terminal is restored
fn run<D: Display, I: Input, S: Sound>(
    mut host: Host<D, I, S>,
) -> Result<RunSummary, Box<dyn Error>> {
    host.run()
}

fn main() -> Result<(), Box<dyn Error>> {
    let config = Config::parse();
    logger::init(&config.log_file, config.log_level.to_filter())?;

    // initialise; a program that won't load never gets stepped
    let program = memory::read_program(&config.rom)?;
    let machine = Machine::with_program(&program)?;
    let interpreter = match config.seed {
        Some(seed) => Interpreter::with_seed(seed),
        None => Interpreter::new(),
    };
    let options = config.run_options();
    log::info!("loaded {} ({} bytes)", config.rom.display(), program.len());

    let summary = if config.headless {
        let mut host = Host::new(
            machine,
            interpreter,
            DummyDisplay::new(),
            DummyInput::new(&[]),
            Mute::new(),
            options,
        );
        let summary = host.run()?;
        print!("{:?}", host.machine().framebuffer());
        summary
    } else {
        let display = TermDisplay::new()?;
        let input = TermInput::new(config.key_hold())?;
        if config.mute {
            run(Host::new(machine, interpreter, display, input, Mute::new(), options))?
        } else {
            run(Host::new(machine, interpreter, display, input, SimpleBeep::new(), options))?
        }
    };

    println!(
        "{} ticks, {} instructions, {} stack faults",
        summary.ticks,
        summary.steps,
        summary.faults.stack_faults()
    );
    match summary.stop {
        StopReason::Fault(fault) => Err(fault.into()),
        StopReason::Quit | StopReason::TickLimit => Ok(()),
    }
}
