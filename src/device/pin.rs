/// A single digital output.
///
/// Writes cannot fail: on the target this is a register write.
pub trait OutputPin: Send {
    fn set_level(&mut self, high: bool);

    /// GPIO number, for logs.
    fn number(&self) -> u8;
}

/// Host stand-in for a GPIO: remembers its level and traces every write.
#[derive(Debug, Clone)]
pub struct LogPin {
    number: u8,
    level: bool,
    writes: usize,
}

impl LogPin {
    pub fn new(number: u8) -> Self {
        Self {
            number,
            level: false,
            writes: 0,
        }
    }

    pub fn level(&self) -> bool {
        self.level
    }

    /// Number of level writes since construction.
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl OutputPin for LogPin {
    fn set_level(&mut self, high: bool) {
        self.level = high;
        self.writes += 1;
        tracing::trace!(gpio = self.number, high, "gpio write");
    }

    fn number(&self) -> u8 {
        self.number
    }
}
