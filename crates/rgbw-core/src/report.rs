use std::io::{self, Write};

use crate::value::{format_rgbw, GuestValue};

/// One key/value pair enumerated from the entry point's result.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultEntry {
    pub key: GuestValue,
    pub value: GuestValue,
    /// `value` as the interpreter coerces it to a number, if it does.
    pub number: Option<f64>,
}

/// Writes two lines per entry:
///
/// ```text
/// string - number
/// rgbw: 1.00
/// ```
pub fn write_report<W: Write>(mut out: W, entries: &[ResultEntry]) -> io::Result<()> {
    for e in entries {
        writeln!(out, "{} - {}", e.key.type_name(), e.value.type_name())?;
        writeln!(out, "rgbw: {}", format_rgbw(e.number))?;
    }
    out.flush()
}
