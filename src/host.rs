//! The outer loop around the machine. Per tick: read the keypad, run a
//! fixed batch of instructions, tick the timers once, update the buzzer and
//! draw, then sleep out the rest of the tick period.
use crate::config::{FaultPolicy, RunOptions};
use crate::display::Display;
use crate::error::Fault;
use crate::input::Input;
use crate::interpreter::{FaultCounters, Interpreter};
use crate::machine::Machine;
use crate::sound::{Buzzer, Sound};
use std::error::Error;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// the user asked to stop
    Quit,
    /// `max_ticks` reached
    TickLimit,
    /// an instruction faulted under [`FaultPolicy::Halt`]
    Fault(Fault),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub ticks: u64,
    pub steps: u64,
    pub faults: FaultCounters,
    pub stop: StopReason,
}

pub struct Host<D, I, S> {
    machine: Machine,
    interpreter: Interpreter,
    display: D,
    input: I,
    buzzer: Buzzer<S>,
    options: RunOptions,
    ticks: u64,
    steps: u64,
}

impl<D: Display, I: Input, S: Sound> Host<D, I, S> {
    pub fn new(
        machine: Machine,
        interpreter: Interpreter,
        display: D,
        input: I,
        sound: S,
        options: RunOptions,
    ) -> Self {
        Host {
            machine,
            interpreter,
            display,
            input,
            buzzer: Buzzer::new(sound),
            options,
            ticks: 0,
            steps: 0,
        }
    }

    pub fn machine(&self) -> &Machine {
        &self.machine
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    /// One tick, without any sleeping. Returns why the run should stop, if
    /// it should.
    pub fn tick(&mut self) -> Result<Option<StopReason>, Box<dyn Error>> {
        let state = self.input.poll()?;
        if state.quit {
            return Ok(Some(StopReason::Quit));
        }
        self.machine.set_keys(state.keys);

        for _ in 0..self.options.pacing.steps_per_tick {
            self.steps += 1;
            if let Err(fault) = self.interpreter.step(&mut self.machine) {
                match self.options.on_fault {
                    FaultPolicy::Halt => {
                        self.display.draw(self.machine.framebuffer())?;
                        return Ok(Some(StopReason::Fault(fault)));
                    }
                    FaultPolicy::Skip => self.machine.skip_instruction(),
                }
            }
        }

        self.machine.tick_timers();
        self.ticks += 1;
        self.buzzer.update(self.machine.sound_timer())?;
        self.display.draw(self.machine.framebuffer())?;

        match self.options.max_ticks {
            Some(max) if self.ticks >= max => Ok(Some(StopReason::TickLimit)),
            _ => Ok(None),
        }
    }

    /// tick at `tick_hz` until something stops the run
    pub fn run(&mut self) -> Result<RunSummary, Box<dyn Error>> {
        let pacing = self.options.pacing;
        let period = pacing.tick_period();
        log::info!(
            "running at {}Hz, {} steps per tick",
            pacing.tick_hz,
            pacing.steps_per_tick
        );

        let stop = loop {
            let started = Instant::now();
            if let Some(stop) = self.tick()? {
                break stop;
            }
            let elapsed = started.elapsed();
            if elapsed < period {
                spin_sleep::sleep(period - elapsed);
            }
        };
        self.buzzer.silence()?;

        let summary = self.summary(stop);
        log::info!(
            "stopped ({:?}) after {} ticks, {} steps, {} stack faults, {} clamped addresses",
            summary.stop,
            summary.ticks,
            summary.steps,
            summary.faults.stack_faults(),
            summary.faults.clamped_addresses
        );
        Ok(summary)
    }

    pub fn summary(&self, stop: StopReason) -> RunSummary {
        RunSummary {
            ticks: self.ticks,
            steps: self.steps,
            faults: *self.interpreter.faults(),
            stop,
        }
    }
}
