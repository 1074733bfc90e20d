//! Human-readable diagnostic text for each decoded view.
//!
//! Each block starts with the raw register value followed by one `NAME : value` line per field.
use std::fmt;

use crate::light::LightReading;
use crate::sensor_config::{MainConfigView, ReceiverConfigView, StatusView};

fn on_off(flag: bool) -> &'static str {
    if flag { "ON" } else { "OFF" }
}

impl fmt::Display for StatusView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Status register : {:#04X}", self.raw)?;
        writeln!(f, "Flags :")?;
        writeln!(f, "\tPWRON : {}", on_off(self.power_on))?;
        writeln!(f, "\tALSINTS : {}", on_off(self.als_interrupt))
    }
}

impl fmt::Display for MainConfigView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Main config register : {:#04X}", self.raw)?;
        writeln!(f, "Flags :")?;
        writeln!(f, "\tTRIM : {}", on_off(self.config.trim))?;
        writeln!(f, "\tMODE : {}", self.config.mode.label())?;
        writeln!(f, "\tALSINTE : {}", on_off(self.config.interrupt_enable))
    }
}

impl fmt::Display for ReceiverConfigView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let conversion_time = self.config.conversion_time;
        writeln!(f, "Receiver config register : {:#04X}", self.raw)?;
        writeln!(f, "Flags :")?;
        writeln!(
            f,
            "\tALSTIM : {} ({} bits)",
            conversion_time.label(),
            conversion_time.resolution_bits()
        )?;
        writeln!(f, "\tALSPGA : {}", self.config.gain.label())
    }
}

impl fmt::Display for LightReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LightReading::Counts(counts) => writeln!(f, "Light value : {counts}"),
            LightReading::Overflow => writeln!(f, "Light value : OVERFLOW"),
        }
    }
}
