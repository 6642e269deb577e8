use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Things that stop a program from being loaded. None of these leave a
/// partially loaded program behind, and the host must not start stepping.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("program is too large ({size} bytes), max size is {max} bytes")]
    ProgramTooLarge { size: usize, max: usize },

    #[error("can't read program from {}: {source}", .path.display())]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("program source is empty")]
    SourceEmpty,
}

/// Opcode-level failures. A faulting instruction leaves the machine as it
/// was before the step, program counter included.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    #[error("stack overflow at {address:#05x}: call stack already holds 16 return addresses")]
    StackOverflow { address: u16 },

    #[error("stack underflow at {address:#05x}: return with an empty call stack")]
    StackUnderflow { address: u16 },
}

/// Raised by the call stack itself; the interpreter turns these into a
/// [`Fault`] carrying the faulting address.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum StackError {
    #[error("call stack is full")]
    Overflow,
    #[error("call stack is empty")]
    Underflow,
}

impl Fault {
    pub fn from_stack(err: StackError, address: u16) -> Self {
        match err {
            StackError::Overflow => Fault::StackOverflow { address },
            StackError::Underflow => Fault::StackUnderflow { address },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_error_messages() {
        let e = LoadError::ProgramTooLarge {
            size: 4000,
            max: 3584,
        };
        assert_eq!(
            e.to_string(),
            "program is too large (4000 bytes), max size is 3584 bytes"
        );
        assert_eq!(LoadError::SourceEmpty.to_string(), "program source is empty");
    }

    #[test]
    fn test_fault_from_stack_keeps_address() {
        assert_eq!(
            Fault::from_stack(StackError::Overflow, 0x2a4),
            Fault::StackOverflow { address: 0x2a4 }
        );
        assert_eq!(
            Fault::from_stack(StackError::Underflow, 0x200),
            Fault::StackUnderflow { address: 0x200 }
        );
    }

    #[test]
    fn test_fault_display_is_hex() {
        let f = Fault::StackUnderflow { address: 0x2fe };
        assert!(f.to_string().contains("0x2fe"));
    }
}
