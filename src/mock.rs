//! Register-file stub of the sensor for tests.
//!
//! Writes are stored and echoed back on reads. Every transaction is recorded in order and
//! failures can be injected per register.
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, Operation, SevenBitAddress};

use crate::register::Register;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StubError;

impl embedded_hal::i2c::Error for StubError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Read { register: u8, value: u8 },
    Write { register: u8, value: u8 },
}

#[derive(Debug, Default)]
struct State {
    registers: HashMap<u8, u8>,
    operations: Vec<Op>,
    fail_next_read: bool,
    fail_next_write: bool,
    failing_reads: HashSet<u8>,
    transaction_time: Duration,
}

/// Shared view of the stub's state, usable after the stub moved into a driver.
#[derive(Debug, Clone)]
pub struct StubLog(Arc<Mutex<State>>);

impl StubLog {
    pub fn operations(&self) -> Vec<Op> {
        self.0.lock().unwrap().operations.clone()
    }

    pub fn writes(&self) -> usize {
        self.operations()
            .iter()
            .filter(|op| matches!(op, Op::Write { .. }))
            .count()
    }

    pub fn set_register(&self, register: Register, value: u8) {
        self.0.lock().unwrap().registers.insert(register.addr(), value);
    }
}

#[derive(Debug)]
pub struct RegisterFile {
    state: Arc<Mutex<State>>,
    pointer: u8,
}

impl RegisterFile {
    pub fn new() -> Self {
        RegisterFile {
            state: Arc::new(Mutex::new(State::default())),
            pointer: 0,
        }
    }

    /// Make every transaction take at least `time`, to widen race windows.
    pub fn with_transaction_time(self, time: Duration) -> Self {
        self.state.lock().unwrap().transaction_time = time;
        self
    }

    pub fn log(&self) -> StubLog {
        StubLog(Arc::clone(&self.state))
    }

    pub fn set_register(&self, register: Register, value: u8) {
        self.log().set_register(register, value);
    }

    pub fn fail_next_read(&self) {
        self.state.lock().unwrap().fail_next_read = true;
    }

    pub fn fail_next_write(&self) {
        self.state.lock().unwrap().fail_next_write = true;
    }

    pub fn fail_reads_of(&self, register: Register) {
        self.state.lock().unwrap().failing_reads.insert(register.addr());
    }

    fn apply(&mut self, operations: &mut [Operation<'_>]) -> Result<(), StubError> {
        let mut state = self.state.lock().unwrap();
        for op in operations {
            match op {
                Operation::Write(bytes) => {
                    let (&register, rest) = bytes.split_first().ok_or(StubError)?;
                    self.pointer = register;
                    if let Some(&value) = rest.first() {
                        if std::mem::take(&mut state.fail_next_write) {
                            return Err(StubError);
                        }
                        state.registers.insert(register, value);
                        state.operations.push(Op::Write { register, value });
                    }
                }
                Operation::Read(buf) => {
                    let register = self.pointer;
                    if std::mem::take(&mut state.fail_next_read)
                        || state.failing_reads.contains(&register)
                    {
                        return Err(StubError);
                    }
                    let value = state.registers.get(&register).copied().unwrap_or(0);
                    buf.fill(value);
                    state.operations.push(Op::Read { register, value });
                }
            }
        }
        Ok(())
    }
}

impl ErrorType for RegisterFile {
    type Error = StubError;
}

impl I2c for RegisterFile {
    fn transaction(
        &mut self,
        _address: SevenBitAddress,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        let transaction_time = self.state.lock().unwrap().transaction_time;
        thread::sleep(transaction_time);
        self.apply(operations)
    }
}
