//! Mock I2C bus with one SMBus byte-register device on it

use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, Operation};

/// Bus-level transfers seen by the mock
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transfer {
    /// Command byte written, `len` bytes read back (repeated start)
    WriteRead {
        /// Device address
        address: u8,
        /// Register pointer
        command: u8,
        /// Bytes read
        len: usize,
    },
    /// Plain write: command byte followed by data
    Write {
        /// Device address
        address: u8,
        /// Raw bytes on the wire
        bytes: Vec<u8>,
    },
}

/// Transport error of the mock bus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockI2cError;

impl embedded_hal::i2c::Error for MockI2cError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

/// A 256-register device at `address`
pub struct MockI2c {
    pub address: u8,
    pub registers: [u8; 256],
    pub transfers: Vec<Transfer>,
    pub fail_next: bool,
    pointer: u8,
}

impl MockI2c {
    pub fn new(address: u8) -> Self {
        Self {
            address,
            registers: [0; 256],
            transfers: Vec::new(),
            fail_next: false,
            pointer: 0,
        }
    }
}

impl ErrorType for MockI2c {
    type Error = MockI2cError;
}

impl I2c for MockI2c {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        if self.fail_next {
            self.fail_next = false;
            return Err(MockI2cError);
        }
        if address != self.address {
            // nobody acks
            return Err(MockI2cError);
        }

        let started = self.transfers.len();
        let mut command = None;
        for operation in operations.iter_mut() {
            match operation {
                Operation::Write(bytes) => {
                    if let Some((&first, data)) = bytes.split_first() {
                        self.pointer = first;
                        command = Some(first);
                        for byte in data {
                            self.registers[usize::from(self.pointer)] = *byte;
                            self.pointer = self.pointer.wrapping_add(1);
                        }
                    }
                    self.transfers.push(Transfer::Write {
                        address,
                        bytes: bytes.to_vec(),
                    });
                }
                Operation::Read(buffer) => {
                    for byte in buffer.iter_mut() {
                        *byte = self.registers[usize::from(self.pointer)];
                        self.pointer = self.pointer.wrapping_add(1);
                    }
                    // a read after a pointer write is one write_read transfer
                    if self.transfers.len() > started {
                        self.transfers.pop();
                    }
                    self.transfers.push(Transfer::WriteRead {
                        address,
                        command: command.unwrap_or(self.pointer),
                        len: buffer.len(),
                    });
                }
            }
        }
        Ok(())
    }
}
