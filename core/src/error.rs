use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can stop the interpreter.
///
/// Execution errors are fatal to the step that raised it; the machine is left
/// exactly as it was before that step and it's up to the host to halt, reset or
/// report.
#[derive(Debug, Error)]
pub enum Error {
    #[error("memory access out of bounds at address {address:#06X}")]
    OutOfBoundsAccess { address: usize },

    #[error("stack overflow: call depth would exceed {depth}")]
    StackOverflow { depth: usize },

    #[error("stack underflow: return with an empty call stack")]
    StackUnderflow,

    #[error("opcode {opcode:#06X} is not implemented")]
    UnimplementedOpcode { opcode: u16 },

    #[error("program is {size} bytes but at most {max} fit in memory")]
    ProgramTooLarge { size: usize, max: usize },

    #[error("unable to read program: {0}")]
    Io(#[from] std::io::Error),
}
