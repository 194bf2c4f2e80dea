//! Fixed-size block iteration over an input buffer.

/// Bytes per block. Every backend divides this evenly (64 / 16, 32 or 64).
pub const BLOCK_SIZE: usize = 64;

/// Slices an input buffer into [`BLOCK_SIZE`] blocks.
///
/// Full blocks are borrowed straight from the input. The final partial block
/// is copied into a caller-owned, zero-initialised scratch array by
/// [`remainder`](Self::remainder), so nothing is ever read past the end of the
/// input.
#[derive(Debug, Clone)]
pub struct BlockReader<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> BlockReader<'a> {
    /// Create a reader positioned at the start of `input`.
    #[inline]
    pub fn new(input: &'a [u8]) -> Self {
        Self { input, pos: 0 }
    }

    /// True when at least one full block remains.
    #[inline]
    pub fn has_full_block(&self) -> bool {
        self.input.len() - self.pos >= BLOCK_SIZE
    }

    /// The block at the current position, if a full one remains.
    #[inline]
    pub fn full_block(&self) -> Option<&'a [u8; BLOCK_SIZE]> {
        self.input[self.pos..].first_chunk::<BLOCK_SIZE>()
    }

    /// Move past the current full block. No-op once only a partial block is
    /// left.
    #[inline]
    pub fn advance(&mut self) {
        if self.has_full_block() {
            self.pos += BLOCK_SIZE;
        }
    }

    /// Byte offset of the current block.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Copy the trailing `len % BLOCK_SIZE` bytes into `dst`, zero-filling
    /// the rest, and return how many bytes were copied.
    ///
    /// Returns 0 for input that is empty or a whole number of blocks; `dst`
    /// is then all zeros.
    #[inline]
    pub fn remainder(&self, dst: &mut [u8; BLOCK_SIZE]) -> usize {
        let tail = self.input.chunks_exact(BLOCK_SIZE).remainder();
        dst.fill(0);
        dst[..tail.len()].copy_from_slice(tail);
        tail.len()
    }
}

impl<'a> Iterator for BlockReader<'a> {
    type Item = &'a [u8; BLOCK_SIZE];

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let block = self.full_block()?;
        self.advance();
        Some(block)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = (self.input.len() - self.pos) / BLOCK_SIZE;
        (n, Some(n))
    }
}

impl ExactSizeIterator for BlockReader<'_> {}
