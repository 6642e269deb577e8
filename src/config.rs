use clap::{value_parser, Parser, ValueEnum};
use log::LevelFilter;
use std::path::PathBuf;
use std::time::Duration;

/// 678 instructions a second, split over 60 ticks
pub const DEFAULT_STEPS_PER_TICK: u32 = 678 / 60;
pub const DEFAULT_TICK_HZ: u32 = 60;

/// What the host does when an instruction faults
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultPolicy {
    /// stop running and report the fault
    Halt,
    /// step over the faulting instruction and carry on
    Skip,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_filter(self) -> LevelFilter {
        match self {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// instructions per timer tick, and ticks per second
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    pub steps_per_tick: u32,
    pub tick_hz: u32,
}

impl Default for Pacing {
    fn default() -> Self {
        Pacing {
            steps_per_tick: DEFAULT_STEPS_PER_TICK,
            tick_hz: DEFAULT_TICK_HZ,
        }
    }
}

impl Pacing {
    pub fn tick_period(&self) -> Duration {
        Duration::from_secs(1) / self.tick_hz.max(1)
    }
}

/// everything the host loop needs to know
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    pub pacing: Pacing,
    pub on_fault: FaultPolicy,
    pub max_ticks: Option<u64>,
}

impl Default for RunOptions {
    fn default() -> Self {
        RunOptions {
            pacing: Pacing::default(),
            on_fault: FaultPolicy::Skip,
            max_ticks: None,
        }
    }
}

#[derive(Parser, Debug, Clone)]
#[command(name = "chip8vm", version, about = "Run a CHIP-8 program in the terminal")]
pub struct Config {
    /// program image, loaded verbatim at 0x200
    #[arg(value_name = "ROM")]
    pub rom: PathBuf,

    /// instructions executed between timer ticks
    #[arg(long, default_value_t = DEFAULT_STEPS_PER_TICK, value_parser = value_parser!(u32).range(1..))]
    pub steps_per_tick: u32,

    /// timer ticks (and frames) per second
    #[arg(long, default_value_t = DEFAULT_TICK_HZ, value_parser = value_parser!(u32).range(1..=1000))]
    pub tick_hz: u32,

    /// seed for the random number opcode
    #[arg(long, value_name = "N")]
    pub seed: Option<u64>,

    #[arg(long, value_enum, default_value_t = FaultPolicy::Skip)]
    pub on_fault: FaultPolicy,

    /// don't beep
    #[arg(long, default_value_t = false)]
    pub mute: bool,

    /// stop after this many timer ticks
    #[arg(long, value_name = "N")]
    pub max_ticks: Option<u64>,

    /// no terminal: run silently and print the final display
    #[arg(long, default_value_t = false, requires = "max_ticks")]
    pub headless: bool,

    /// how long a key stays down after the terminal reports it
    #[arg(long, value_name = "MS", default_value_t = 100)]
    pub key_hold_ms: u64,

    #[arg(long, value_name = "PATH", default_value = "chip8vm.log")]
    pub log_file: PathBuf,

    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,
}

impl Config {
    pub fn pacing(&self) -> Pacing {
        Pacing {
            steps_per_tick: self.steps_per_tick,
            tick_hz: self.tick_hz,
        }
    }

    pub fn run_options(&self) -> RunOptions {
        RunOptions {
            pacing: self.pacing(),
            on_fault: self.on_fault,
            max_ticks: self.max_ticks,
        }
    }

    pub fn key_hold(&self) -> Duration {
        Duration::from_millis(self.key_hold_ms)
    }
}
