use crate::constants::DEFAULT_STACK_DEPTH;

/// Where `BNNN` takes its jump offset from
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum JumpOffset {
    /// PC = I + addr
    Index,
    /// PC = V0 + addr, as on the COSMAC VIP
    V0,
}

/// Tunables for a `Chip8`; everything else is fixed by the architecture
/// and lives in `constants`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Number of nested calls allowed before `StackOverflow`
    pub stack_depth: usize,
    pub jump_offset: JumpOffset,
    /// Seed for the `CXNN` random source; `None` seeds from the OS
    pub seed: Option<u64>,
}

impl Config {
    pub fn stack_depth(mut self, stack_depth: usize) -> Self {
        self.stack_depth = stack_depth;
        self
    }

    pub fn jump_offset(mut self, jump_offset: JumpOffset) -> Self {
        self.jump_offset = jump_offset;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            stack_depth: DEFAULT_STACK_DEPTH,
            jump_offset: JumpOffset::Index,
            seed: None,
        }
    }
}
