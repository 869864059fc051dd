use crate::SerdeErr;

pub struct BitReader<'b> {
    buffer: &'b [u8],
    state: usize,
}

impl<'b> BitReader<'b> {
    pub fn new(buffer: &'b [u8]) -> Self {
        Self { buffer, state: 0 }
    }

    pub fn bits_read(&self) -> usize {
        self.state
    }

    /// Bits left before the end of the buffer, including flush padding
    pub fn bits_remaining(&self) -> usize {
        (self.buffer.len() * 8).saturating_sub(self.state)
    }

    pub fn read_bit(&mut self) -> Result<bool, SerdeErr> {
        let Some(byte) = self.buffer.get(self.state / 8) else {
            return Err(SerdeErr::UnexpectedEnd {
                bits_read: self.state,
            });
        };
        let bit = (byte >> (self.state % 8)) & 1 != 0;
        self.state += 1;
        Ok(bit)
    }

    pub fn read_byte(&mut self) -> Result<u8, SerdeErr> {
        let mut output = 0u8;
        for index in 0..8 {
            if self.read_bit()? {
                output |= 1 << index;
            }
        }
        Ok(output)
    }
}
