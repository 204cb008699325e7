use thiserror::Error;

/// Failures raised while fetching or executing an instruction.
///
/// Every variant is returned before any state is touched, so the machine is
/// left exactly as it was when the call started.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    #[error("unknown opcode {0:#06X}")]
    UnknownOpcode(u16),

    #[error("memory access out of bounds at address {0:#06X}")]
    MemoryBounds(usize),

    #[error("subroutine stack overflow")]
    StackOverflow,

    #[error("return from subroutine with an empty stack")]
    StackUnderflow,
}

/// Failures raised while loading a rom into memory.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("rom is too large ({size} bytes), max size is {max} bytes")]
    TooLarge { size: usize, max: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
