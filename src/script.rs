//! Declarative command scripts for panel bring-up.
//!
//! A script is an ordered list of [`ScriptEntry`] values. Executing an entry
//! sends its opcode, then its arguments as one data transfer if there are
//! any, then sleeps if the entry carries a delay.
//!
//! Vendor init tables are often shipped in a packed byte form; see
//! [`PackedScript`] to run those unchanged.

use embedded_hal::delay::DelayNs;
use log::trace;

use crate::{dcs::InterfaceExt, interface::Interface};

/// A command script.
pub type CommandScript<'a> = &'a [ScriptEntry<'a>];

/// Raw delay byte that stands for 500 ms.
pub const LONG_DELAY: u8 = 255;

/// Delay flag in the argument-count byte of a packed entry.
pub const DELAY_FLAG: u8 = 0x80;

/// One step of a command script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptEntry<'a> {
    /// Send `opcode` followed by `args`.
    Command { opcode: u8, args: &'a [u8] },
    /// Send `opcode` followed by `args`, then wait.
    ///
    /// `delay` is the raw wire byte: milliseconds, except [`LONG_DELAY`].
    CommandWithDelay { opcode: u8, args: &'a [u8], delay: u8 },
}

impl<'a> ScriptEntry<'a> {
    /// Command opcode.
    pub const fn opcode(&self) -> u8 {
        match *self {
            ScriptEntry::Command { opcode, .. } | ScriptEntry::CommandWithDelay { opcode, .. } => {
                opcode
            }
        }
    }

    /// Argument bytes.
    pub const fn args(&self) -> &'a [u8] {
        match *self {
            ScriptEntry::Command { args, .. } | ScriptEntry::CommandWithDelay { args, .. } => args,
        }
    }

    /// Post-command delay in milliseconds, if any.
    pub const fn delay_ms(&self) -> Option<u32> {
        match *self {
            ScriptEntry::Command { .. } => None,
            ScriptEntry::CommandWithDelay {
                delay: LONG_DELAY, ..
            } => Some(500),
            ScriptEntry::CommandWithDelay { delay, .. } => Some(delay as u32),
        }
    }
}

/// Runs every entry of `script` in order.
pub fn execute<'a, DI, DELAY>(
    di: &mut DI,
    delay: &mut DELAY,
    script: impl IntoIterator<Item = ScriptEntry<'a>>,
) -> Result<(), DI::Error>
where
    DI: Interface,
    DELAY: DelayNs,
{
    for entry in script {
        trace!(
            "script: cmd {:#04x}, {} args",
            entry.opcode(),
            entry.args().len()
        );
        di.write_raw(entry.opcode(), entry.args())?;
        if let Some(ms) = entry.delay_ms() {
            delay.delay_ms(ms);
        }
    }
    Ok(())
}

/// Error returned when a packed script is malformed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptError {
    /// The table ends inside the entry starting at `offset`.
    Truncated { offset: usize },
    /// Bytes remain after the declared number of entries.
    TrailingBytes { offset: usize },
}

/// A script in packed byte form.
///
/// Layout: entry count, then per entry the opcode, an argument count with
/// [`DELAY_FLAG`] set when a delay byte follows the arguments, the
/// arguments, and the optional delay byte.
#[derive(Debug, Clone, Copy)]
pub struct PackedScript<'a> {
    count: usize,
    body: &'a [u8],
}

impl<'a> PackedScript<'a> {
    /// Validates the whole table.
    pub fn new(bytes: &'a [u8]) -> Result<Self, ScriptError> {
        let (&count, body) = bytes
            .split_first()
            .ok_or(ScriptError::Truncated { offset: 0 })?;
        let count = usize::from(count);

        let mut rest = body;
        for _ in 0..count {
            let offset = bytes.len() - rest.len();
            let (_, tail) =
                decode_entry(rest).ok_or(ScriptError::Truncated { offset })?;
            rest = tail;
        }
        if !rest.is_empty() {
            return Err(ScriptError::TrailingBytes {
                offset: bytes.len() - rest.len(),
            });
        }

        Ok(Self { count, body })
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.count
    }

    /// Returns `true` if the script has no entries.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Iterates over the decoded entries.
    pub fn entries(&self) -> PackedEntries<'a> {
        PackedEntries {
            remaining: self.count,
            rest: self.body,
        }
    }
}

impl<'a> IntoIterator for PackedScript<'a> {
    type Item = ScriptEntry<'a>;
    type IntoIter = PackedEntries<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries()
    }
}

/// Iterator over the entries of a [`PackedScript`].
#[derive(Debug, Clone)]
pub struct PackedEntries<'a> {
    remaining: usize,
    rest: &'a [u8],
}

impl<'a> Iterator for PackedEntries<'a> {
    type Item = ScriptEntry<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let (entry, rest) = decode_entry(self.rest)?;
        self.remaining -= 1;
        self.rest = rest;
        Some(entry)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

fn decode_entry(bytes: &[u8]) -> Option<(ScriptEntry<'_>, &[u8])> {
    let (&opcode, rest) = bytes.split_first()?;
    let (&argc, rest) = rest.split_first()?;
    let has_delay = argc & DELAY_FLAG != 0;
    let n = usize::from(argc & !DELAY_FLAG);
    if rest.len() < n {
        return None;
    }
    let (args, rest) = rest.split_at(n);
    if has_delay {
        let (&delay, rest) = rest.split_first()?;
        Some((
            ScriptEntry::CommandWithDelay {
                opcode,
                args,
                delay,
            },
            rest,
        ))
    } else {
        Some((ScriptEntry::Command { opcode, args }, rest))
    }
}
