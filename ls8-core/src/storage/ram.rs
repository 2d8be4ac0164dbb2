use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq, Hash)]
pub enum MemoryError {
    #[error("access of {length} byte(s) at 0x{address:04X} exceeds capacity of 0x{capacity:X}")]
    OutOfBounds {
        address: usize,
        length: usize,
        capacity: usize,
    },
    #[error("image of {length} bytes does not fit in {capacity} bytes of memory")]
    ImageTooLarge { length: usize, capacity: usize },
}

pub type Result<T> = std::result::Result<T, MemoryError>;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RamStats {
    pub bytes_read: usize,
    pub bytes_written: usize,
    pub num_reads: usize,
    pub num_writes: usize,
}

/// Flat, fixed-size, byte-addressed memory.
#[derive(Clone, Debug)]
pub struct RAM<const N: usize> {
    buffer: [u8; N],
    stats: RamStats,
}

impl<const N: usize> Default for RAM<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> RAM<N> {
    pub fn new() -> Self {
        Self {
            buffer: [0; N],
            stats: RamStats::default(),
        }
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    fn check(&self, address: usize, length: usize) -> Result<()> {
        match address.checked_add(length) {
            Some(end) if end <= N => Ok(()),
            _ => Err(MemoryError::OutOfBounds {
                address,
                length,
                capacity: N,
            }),
        }
    }

    /// Clears memory and copies `image` to address 0.
    pub fn load(&mut self, image: &[u8]) -> Result<()> {
        if image.len() > N {
            return Err(MemoryError::ImageTooLarge {
                length: image.len(),
                capacity: N,
            });
        }
        self.buffer = [0; N];
        self.buffer[..image.len()].copy_from_slice(image);
        self.stats = RamStats::default();
        tracing::debug!("loaded {} byte image into {} bytes of RAM", image.len(), N);
        Ok(())
    }

    pub fn read(&mut self, address: usize, length: usize) -> Result<&[u8]> {
        self.check(address, length)?;
        self.stats.bytes_read += length;
        self.stats.num_reads += 1;
        Ok(&self.buffer[address..address + length])
    }

    pub fn read_u8(&mut self, address: usize) -> Result<u8> {
        Ok(self.read(address, 1)?[0])
    }

    pub fn write(&mut self, address: usize, data: &[u8]) -> Result<()> {
        self.check(address, data.len())?;
        self.stats.bytes_written += data.len();
        self.stats.num_writes += 1;
        self.buffer[address..address + data.len()].copy_from_slice(data);
        Ok(())
    }

    pub fn write_u8(&mut self, address: usize, value: u8) -> Result<()> {
        self.write(address, &[value])
    }

    /// Up to `length` bytes starting at `address`, clipped to the end of
    /// memory. Not counted in the access statistics.
    pub fn window(&self, address: usize, length: usize) -> &[u8] {
        let start = address.min(N);
        let end = address.saturating_add(length).min(N);
        &self.buffer[start..end]
    }

    /// Reads a byte without touching the access statistics.
    pub fn peek(&self, address: usize) -> Option<u8> {
        self.buffer.get(address).copied()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buffer
    }

    pub fn stats(&self) -> RamStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use rand::Rng;

    use super::*;

    #[test]
    fn new_works() {
        let ram = RAM::<256>::new();
        assert_eq!(ram.capacity(), 256);
        assert!(ram.as_slice().iter().all(|b| *b == 0));
    }

    #[test]
    fn read_write_works() {
        let mut ram = RAM::<256>::new();
        let mut data = [0u8; 16];
        rand::thread_rng().fill(&mut data);

        ram.write(0x40, &data).unwrap();
        assert_eq!(ram.read(0x40, 16).unwrap(), &data);
        assert_eq!(ram.read_u8(0x4F).unwrap(), data[15]);

        let stats = ram.stats();
        assert_eq!(stats.num_writes, 1);
        assert_eq!(stats.bytes_written, 16);
        assert_eq!(stats.num_reads, 2);
        assert_eq!(stats.bytes_read, 17);
    }

    #[test]
    fn out_of_bounds_is_rejected() {
        let mut ram = RAM::<256>::new();
        assert_eq!(
            ram.read_u8(0x100),
            Err(MemoryError::OutOfBounds {
                address: 0x100,
                length: 1,
                capacity: 256
            })
        );
        assert!(ram.write(0xFF, &[1, 2]).is_err());
        assert!(ram.read(usize::MAX, 2).is_err());
        assert_eq!(ram.peek(0xFF), Some(0));
        assert_eq!(ram.peek(0x100), None);
    }

    #[test]
    fn load_replaces_contents() {
        let mut ram = RAM::<8>::new();
        ram.write(7, &[0xAA]).unwrap();
        ram.load(&[1, 2, 3]).unwrap();
        assert_eq!(ram.as_slice(), &[1, 2, 3, 0, 0, 0, 0, 0]);
        assert_eq!(ram.stats(), RamStats::default());

        assert_eq!(
            ram.load(&[0; 9]),
            Err(MemoryError::ImageTooLarge {
                length: 9,
                capacity: 8
            })
        );
    }

    #[test]
    fn window_clips_to_capacity() {
        let mut ram = RAM::<4>::new();
        ram.load(&[1, 2, 3, 4]).unwrap();
        assert_eq!(ram.window(1, 3), &[2, 3, 4]);
        assert_eq!(ram.window(3, 3), &[4]);
        assert!(ram.window(4, 3).is_empty());
        assert!(ram.window(usize::MAX, 3).is_empty());
    }
}
