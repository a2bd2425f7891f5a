use crate::error::{Error, Result};

/// # Stack
/// Return addresses saved by `CALL` and restored by `RET`
///
/// - `sp` is the next free slot, so it doubles as the current depth
/// - the depth never exceeds `capacity`; pushing onto a full stack or popping
///   an empty one fails without changing anything
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Stack {
    frames: Vec<u16>,
    capacity: usize,
}

impl Stack {
    pub fn new(capacity: usize) -> Self {
        Stack {
            frames: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, address: u16) -> Result<()> {
        if self.frames.len() >= self.capacity {
            return Err(Error::StackOverflow {
                depth: self.capacity,
            });
        }
        self.frames.push(address);
        Ok(())
    }

    pub fn pop(&mut self) -> Result<u16> {
        self.frames.pop().ok_or(Error::StackUnderflow)
    }

    pub fn sp(&self) -> usize {
        self.frames.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Saved return addresses, oldest first
    pub fn frames(&self) -> &[u16] {
        &self.frames
    }

    pub fn clear(&mut self) {
        self.frames.clear();
    }
}
