//! The 4 KB flat memory image: the hex font lives at `FONT_START_ADDR` and
//! programs are copied in at `PROGRAM_START_ADDR`.
use crate::error::{Error, Result};
use crate::graphics::FONT_SET;
#[cfg(test)]
use std::ops::{Index, IndexMut};

pub const MEMORY_SIZE: usize = 4096;
pub const FONT_START_ADDR: usize = 0x50;
pub const PROGRAM_START_ADDR: usize = 0x200;
pub const MAX_PROGRAM_SIZE: usize = MEMORY_SIZE - PROGRAM_START_ADDR;

pub struct Memory {
    bytes: [u8; MEMORY_SIZE],
}

impl Memory {
    /// A zeroed memory image with the font set installed
    pub fn new() -> Self {
        let mut memory = Memory {
            bytes: [0; MEMORY_SIZE],
        };
        memory.install_font();
        memory
    }

    fn install_font(&mut self) {
        for (i, glyph) in FONT_SET.iter().enumerate() {
            let start = FONT_START_ADDR + i * glyph.len();
            self.bytes[start..start + glyph.len()].copy_from_slice(glyph);
        }
    }

    /// Copy `program` into memory starting at `PROGRAM_START_ADDR`. A program that
    /// does not fit is rejected without touching memory.
    pub fn load_program(&mut self, program: &[u8]) -> Result<()> {
        if program.len() > MAX_PROGRAM_SIZE {
            return Err(Error::RomTooLarge {
                size: program.len(),
                max_size: MAX_PROGRAM_SIZE,
            });
        }

        let end = PROGRAM_START_ADDR + program.len();
        self.bytes[PROGRAM_START_ADDR..end].copy_from_slice(program);
        Ok(())
    }

    /// Read the big-endian word at `addr`, or None if either byte is outside memory
    pub fn read_word(&self, addr: usize) -> Option<u16> {
        let high = *self.bytes.get(addr)?;
        let low = *self.bytes.get(addr.checked_add(1)?)?;
        Some(u16::from(high) << 8 | u16::from(low))
    }

    /// The `len` bytes starting at `start`, or None if the range leaves memory
    pub fn slice(&self, start: usize, len: usize) -> Option<&[u8]> {
        self.bytes.get(start..start.checked_add(len)?)
    }

    pub fn slice_mut(&mut self, start: usize, len: usize) -> Option<&mut [u8]> {
        self.bytes.get_mut(start..start.checked_add(len)?)
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
impl Index<usize> for Memory {
    type Output = u8;

    #[inline]
    fn index(&self, addr: usize) -> &Self::Output {
        &self.bytes[addr]
    }
}

#[cfg(test)]
impl IndexMut<usize> for Memory {
    #[inline]
    fn index_mut(&mut self, addr: usize) -> &mut Self::Output {
        &mut self.bytes[addr]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn font_installed_at_font_start() {
        let memory = Memory::new();

        assert_eq!(memory.slice(FONT_START_ADDR, 5).unwrap(), &FONT_SET[0]);
        assert_eq!(memory.slice(FONT_START_ADDR + 75, 5).unwrap(), &FONT_SET[15]);
        assert_eq!(memory[FONT_START_ADDR - 1], 0);
        assert_eq!(memory[FONT_START_ADDR + 80], 0);
    }

    #[test]
    fn load_program_max_size() {
        let mut memory = Memory::new();
        let program = vec![0xAB; MAX_PROGRAM_SIZE];

        memory.load_program(&program).unwrap();

        assert_eq!(memory[PROGRAM_START_ADDR], 0xAB);
        assert_eq!(memory[MEMORY_SIZE - 1], 0xAB);
    }

    #[test]
    fn load_program_too_large_leaves_memory_alone() {
        let mut memory = Memory::new();
        let program = vec![0xAB; MAX_PROGRAM_SIZE + 1];

        match memory.load_program(&program) {
            Err(Error::RomTooLarge { size, max_size }) => {
                assert_eq!(size, MAX_PROGRAM_SIZE + 1);
                assert_eq!(max_size, 3584);
            }
            other => panic!("expected RomTooLarge, got {:?}", other),
        }

        assert_eq!(memory[PROGRAM_START_ADDR], 0);
    }

    #[test]
    fn read_word_is_big_endian() {
        let mut memory = Memory::new();
        memory[0x300] = 0x12;
        memory[0x301] = 0x34;

        assert_eq!(memory.read_word(0x300), Some(0x1234));
        assert_eq!(memory.read_word(MEMORY_SIZE - 1), None);
        assert_eq!(memory.read_word(MEMORY_SIZE), None);
    }

    #[test]
    fn slice_bounds() {
        let mut memory = Memory::new();

        assert!(memory.slice(MEMORY_SIZE - 3, 3).is_some());
        assert!(memory.slice(MEMORY_SIZE - 2, 3).is_none());
        assert!(memory.slice_mut(MEMORY_SIZE, 0).is_some());
        assert!(memory.slice_mut(usize::MAX, 2).is_none());
    }
}
