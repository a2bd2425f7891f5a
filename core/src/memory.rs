use crate::constants::MEMORY_SIZE;
use crate::error::{Error, Result};

/// # Memory
/// 4096 bytes of flat, bounds-checked storage
///
/// - 0x000..0x050 holds the sprite sheet
/// - 0x050..0x200 is otherwise reserved for the interpreter
/// - 0x200..0x1000 holds the program and its data
///
/// Nothing wraps: any access that would touch an address at or past
/// `MEMORY_SIZE` fails with `OutOfBoundsAccess` without touching any byte.
#[derive(Clone)]
pub struct Memory {
    bytes: [u8; MEMORY_SIZE],
}

impl Memory {
    pub fn new() -> Self {
        Memory {
            bytes: [0; MEMORY_SIZE],
        }
    }

    pub fn capacity(&self) -> usize {
        self.bytes.len()
    }

    pub fn read(&self, address: usize) -> Result<u8> {
        self.bytes
            .get(address)
            .copied()
            .ok_or(Error::OutOfBoundsAccess { address })
    }

    pub fn write(&mut self, address: usize, value: u8) -> Result<()> {
        let byte = self
            .bytes
            .get_mut(address)
            .ok_or(Error::OutOfBoundsAccess { address })?;
        *byte = value;
        Ok(())
    }

    /// Big-endian word at `address..address + 2`
    pub fn read_word(&self, address: usize) -> Result<u16> {
        let word = self.slice(address, 2)?;
        Ok(u16::from(word[0]) << 8 | u16::from(word[1]))
    }

    /// Borrows `len` bytes starting at `address`
    pub fn slice(&self, address: usize, len: usize) -> Result<&[u8]> {
        let end = self.checked_end(address, len)?;
        Ok(&self.bytes[address..end])
    }

    /// Mutably borrows `len` bytes starting at `address`
    pub fn slice_mut(&mut self, address: usize, len: usize) -> Result<&mut [u8]> {
        let end = self.checked_end(address, len)?;
        Ok(&mut self.bytes[address..end])
    }

    /// Copies `data` into memory starting at `address`
    pub fn load(&mut self, address: usize, data: &[u8]) -> Result<()> {
        self.slice_mut(address, data.len())?.copy_from_slice(data);
        Ok(())
    }

    /// Reports the first offending address if the range doesn't fit
    fn checked_end(&self, address: usize, len: usize) -> Result<usize> {
        if address >= self.capacity() {
            return Err(Error::OutOfBoundsAccess { address });
        }
        match address.checked_add(len) {
            Some(end) if end <= self.capacity() => Ok(end),
            _ => Err(Error::OutOfBoundsAccess {
                address: self.capacity(),
            }),
        }
    }
}

impl From<[u8; MEMORY_SIZE]> for Memory {
    fn from(bytes: [u8; MEMORY_SIZE]) -> Self {
        Memory { bytes }
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}
