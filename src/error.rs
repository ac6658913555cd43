/// Faults the emulator reports to its host. Arithmetic wraparound, skips and
/// unrecognized opcodes are normal semantics and never show up here.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("ROM is too large ({size} bytes), max size is {max_size} bytes")]
    RomTooLarge { size: usize, max_size: usize },

    #[error("stack overflow: call at {pc:#05X} ({opcode:#06X}) with a full call stack")]
    StackOverflow { pc: u16, opcode: u16 },

    #[error("stack underflow: return at {pc:#05X} ({opcode:#06X}) with an empty call stack")]
    StackUnderflow { pc: u16, opcode: u16 },

    #[error("no font glyph for digit {digit:#04X} at {pc:#05X} ({opcode:#06X})")]
    InvalidDigit { digit: u8, pc: u16, opcode: u16 },

    #[error("program counter out of bounds: {pc:#06X}")]
    PcOutOfBounds { pc: u16 },

    #[error("memory access out of bounds at {address:#06X} by {opcode:#06X} at {pc:#05X}")]
    MemoryOutOfBounds { address: usize, pc: u16, opcode: u16 },

    #[error("failed to read game file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to build logger: {0}")]
    Logger(#[from] sloggers::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
