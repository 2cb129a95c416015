use serde::{Deserialize, Serialize};

/// Physical memory: 1 MiB plus one guard byte.
pub const MEMORY_SIZE: usize = (1 << 20) + 1;
/// Largest image the loader accepts.
pub const LOADABLE_SIZE: usize = 1 << 20;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BusError {
    #[error("{len}-byte access at {addr:#010x} is outside {size:#x} bytes of memory")]
    OutOfRange { addr: u32, len: usize, size: usize },
    #[error("image of {len} bytes exceeds the {limit}-byte load limit")]
    ImageTooLarge { len: usize, limit: usize },
}

pub trait Bus {
    fn read_u8(&mut self, addr: u32) -> Result<u8, BusError>;
    fn read_u32(&mut self, addr: u32) -> Result<u32, BusError>;
    fn write_u8(&mut self, addr: u32, val: u8) -> Result<(), BusError>;
    fn write_u32(&mut self, addr: u32, val: u32) -> Result<(), BusError>;
}

#[derive(Clone, Serialize, Deserialize)]
pub struct LinearMemory {
    pub mem: Vec<u8>,
}

impl LinearMemory {
    pub fn new(size: usize) -> Self {
        Self { mem: vec![0; size] }
    }

    /// Copies `image` to address 0 of a fresh `size`-byte memory.
    pub fn with_image(size: usize, image: &[u8]) -> Result<Self, BusError> {
        let limit = LOADABLE_SIZE.min(size);
        if image.len() > limit {
            return Err(BusError::ImageTooLarge { len: image.len(), limit });
        }
        let mut m = Self::new(size);
        m.mem[..image.len()].copy_from_slice(image);
        Ok(m)
    }

    /// Reads up to four bytes at `addr` without faulting; missing bytes are zero.
    pub fn peek4(&self, addr: u32) -> [u8; 4] {
        let mut out = [0u8; 4];
        for (i, b) in out.iter_mut().enumerate() {
            if let Some(v) = self.mem.get(addr as usize + i) {
                *b = *v;
            }
        }
        out
    }

    fn range(&self, addr: u32, len: usize) -> Result<std::ops::Range<usize>, BusError> {
        let start = addr as usize;
        match start.checked_add(len) {
            Some(end) if end <= self.mem.len() => Ok(start..end),
            _ => Err(BusError::OutOfRange { addr, len, size: self.mem.len() }),
        }
    }
}

impl Bus for LinearMemory {
    fn read_u8(&mut self, addr: u32) -> Result<u8, BusError> {
        let r = self.range(addr, 1)?;
        Ok(self.mem[r.start])
    }
    fn read_u32(&mut self, addr: u32) -> Result<u32, BusError> {
        let r = self.range(addr, 4)?;
        let mut b = [0u8; 4];
        b.copy_from_slice(&self.mem[r]);
        Ok(u32::from_le_bytes(b))
    }
    fn write_u8(&mut self, addr: u32, val: u8) -> Result<(), BusError> {
        let r = self.range(addr, 1)?;
        self.mem[r.start] = val;
        Ok(())
    }
    fn write_u32(&mut self, addr: u32, val: u32) -> Result<(), BusError> {
        let r = self.range(addr, 4)?;
        self.mem[r].copy_from_slice(&val.to_le_bytes());
        Ok(())
    }
}
