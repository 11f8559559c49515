//=========================================================================
// Clock Binary Format
//=========================================================================
//
// Versioned, endian-tagged snapshot of a clock and its live timers.
//
// Layout:
// ```text
//   header   u16 version | u8 endian | u8 flags | i32 timer_count
//            | u32 name_length | u32 padding                    (16 bytes)
//   name     name bytes, NUL, zero-padded to a 16-byte boundary
//   timers   timer_count × record                              (152 bytes each)
//   record   [u8; 128] name (NUL-padded) | f64 current | f64 seconds
//            | u32 paused | i32 repeat
// ```
//
// `endian` is 0 for little-endian, 1 for big-endian; every multi-byte
// field, the version included, uses that byte order. Flags: bit 0 is
// auto-update, bit 1 is paused.
//
//=========================================================================

//=== External Dependencies ===============================================

use thiserror::Error;

//=== Internal Dependencies ===============================================

use super::timer::{TimerSlot, MAX_TIMER_NAME};
use super::{Clock, MAX_TIMERS};

//=== Constants ===========================================================

/// Format revision written by [`Clock::save`].
pub const FORMAT_VERSION: u16 = 1;

const HEADER_SIZE: usize = 16;
const NAME_FIELD: usize = MAX_TIMER_NAME + 1;
const RECORD_SIZE: usize = NAME_FIELD + 8 + 8 + 4 + 4;

const ENDIAN_LITTLE: u8 = 0;
const ENDIAN_BIG: u8 = 1;

const FLAG_AUTO_UPDATE: u8 = 1 << 0;
const FLAG_PAUSED: u8 = 1 << 1;

//=== ClockFormatError ====================================================

/// Failure to encode or decode a clock snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClockFormatError {
    #[error("Clock data truncated: need {needed} bytes, have {available}")]
    Truncated { needed: usize, available: usize },

    #[error("Clock format version {found} is not supported (expected {expected})")]
    VersionMismatch { found: u16, expected: u16 },

    #[error("Invalid endian flag {0}")]
    BadEndianFlag(u8),

    #[error("Invalid timer count {0}")]
    BadTimerCount(i32),

    #[error("Timer record {index} is malformed")]
    BadTimerRecord { index: usize },

    #[error("Clock name is not NUL-terminated UTF-8")]
    BadName,

    #[error("Output buffer too small: need {needed} bytes, have {available}")]
    BufferTooSmall { needed: usize, available: usize },
}

//=== Byte Order ==========================================================

#[derive(Clone, Copy)]
enum Order {
    Little,
    Big,
}

impl Order {
    fn native() -> Self {
        if cfg!(target_endian = "big") {
            Order::Big
        } else {
            Order::Little
        }
    }

    fn flag(self) -> u8 {
        match self {
            Order::Little => ENDIAN_LITTLE,
            Order::Big => ENDIAN_BIG,
        }
    }
}

//--- Writer --------------------------------------------------------------

struct Writer<'a> {
    buf: &'a mut [u8],
    pos: usize,
    order: Order,
}

impl Writer<'_> {
    fn bytes(&mut self, bytes: &[u8]) {
        self.buf[self.pos..self.pos + bytes.len()].copy_from_slice(bytes);
        self.pos += bytes.len();
    }

    fn zeros(&mut self, count: usize) {
        self.buf[self.pos..self.pos + count].fill(0);
        self.pos += count;
    }

    fn u8(&mut self, v: u8) {
        self.bytes(&[v]);
    }

    fn u16(&mut self, v: u16) {
        match self.order {
            Order::Little => self.bytes(&v.to_le_bytes()),
            Order::Big => self.bytes(&v.to_be_bytes()),
        }
    }

    fn u32(&mut self, v: u32) {
        match self.order {
            Order::Little => self.bytes(&v.to_le_bytes()),
            Order::Big => self.bytes(&v.to_be_bytes()),
        }
    }

    fn i32(&mut self, v: i32) {
        self.u32(v as u32);
    }

    fn f64(&mut self, v: f64) {
        match self.order {
            Order::Little => self.bytes(&v.to_le_bytes()),
            Order::Big => self.bytes(&v.to_be_bytes()),
        }
    }
}

//--- Reader --------------------------------------------------------------

struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
    order: Order,
}

impl<'a> Reader<'a> {
    fn take<const N: usize>(&mut self) -> Result<[u8; N], ClockFormatError> {
        let slice = self.slice(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(slice);
        Ok(out)
    }

    fn slice(&mut self, len: usize) -> Result<&'a [u8], ClockFormatError> {
        let end = self.pos + len;
        if end > self.buf.len() {
            return Err(ClockFormatError::Truncated {
                needed: end,
                available: self.buf.len(),
            });
        }
        let buf = self.buf;
        let slice = &buf[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn u8(&mut self) -> Result<u8, ClockFormatError> {
        Ok(self.take::<1>()?[0])
    }

    fn u16(&mut self) -> Result<u16, ClockFormatError> {
        let b = self.take::<2>()?;
        Ok(match self.order {
            Order::Little => u16::from_le_bytes(b),
            Order::Big => u16::from_be_bytes(b),
        })
    }

    fn u32(&mut self) -> Result<u32, ClockFormatError> {
        let b = self.take::<4>()?;
        Ok(match self.order {
            Order::Little => u32::from_le_bytes(b),
            Order::Big => u32::from_be_bytes(b),
        })
    }

    fn i32(&mut self) -> Result<i32, ClockFormatError> {
        Ok(self.u32()? as i32)
    }

    fn f64(&mut self) -> Result<f64, ClockFormatError> {
        let b = self.take::<8>()?;
        Ok(match self.order {
            Order::Little => f64::from_le_bytes(b),
            Order::Big => f64::from_be_bytes(b),
        })
    }
}

//=== Helpers =============================================================

/// Name length plus terminator, rounded up to 16 bytes.
fn padded_name_len(len: usize) -> usize {
    (len + 1 + 15) & !15
}

/// Text before the first NUL, if there is one and it is UTF-8.
fn nul_terminated(bytes: &[u8]) -> Option<&str> {
    let end = bytes.iter().position(|b| *b == 0)?;
    std::str::from_utf8(&bytes[..end]).ok()
}

//=== Clock Serialization =================================================

impl Clock {
    /// Bytes [`save`](Self::save) will produce.
    pub fn save_size(&self) -> usize {
        HEADER_SIZE + padded_name_len(self.name().len()) + self.timer_count() * RECORD_SIZE
    }

    /// Encodes the clock in native byte order.
    pub fn save(&self) -> Vec<u8> {
        let mut buf = vec![0; self.save_size()];
        self.write(&mut buf, Order::native());
        buf
    }

    /// Encodes into `buf`, returning the number of bytes written.
    pub fn save_into(&self, buf: &mut [u8]) -> Result<usize, ClockFormatError> {
        let needed = self.save_size();
        if buf.len() < needed {
            return Err(ClockFormatError::BufferTooSmall {
                needed,
                available: buf.len(),
            });
        }
        self.write(&mut buf[..needed], Order::native());
        Ok(needed)
    }

    /// Decodes a clock written by [`save`](Self::save) on a host of
    /// either byte order.
    pub fn load(bytes: &[u8]) -> Result<Clock, ClockFormatError> {
        // The endian flag is read first so the version can be decoded.
        let endian = *bytes.get(2).ok_or(ClockFormatError::Truncated {
            needed: HEADER_SIZE,
            available: bytes.len(),
        })?;
        let order = match endian {
            ENDIAN_LITTLE => Order::Little,
            ENDIAN_BIG => Order::Big,
            other => return Err(ClockFormatError::BadEndianFlag(other)),
        };

        let mut r = Reader { buf: bytes, pos: 0, order };

        let version = r.u16()?;
        if version != FORMAT_VERSION {
            return Err(ClockFormatError::VersionMismatch {
                found: version,
                expected: FORMAT_VERSION,
            });
        }
        let _endian = r.u8()?;
        let flags = r.u8()?;
        let timer_count = r.i32()?;
        let name_length = r.u32()? as usize;
        let _padding = r.u32()?;

        if timer_count < 0 || timer_count as usize > MAX_TIMERS {
            return Err(ClockFormatError::BadTimerCount(timer_count));
        }

        let name_bytes = r.slice(padded_name_len(name_length))?;
        let name = nul_terminated(name_bytes)
            .filter(|n| n.len() == name_length)
            .ok_or(ClockFormatError::BadName)?
            .to_string();

        let mut timers: Vec<TimerSlot> = Vec::with_capacity(timer_count as usize);
        for index in 0..timer_count as usize {
            let field = r.slice(NAME_FIELD)?;
            let timer_name = nul_terminated(field)
                .filter(|n| !n.is_empty())
                .ok_or(ClockFormatError::BadTimerRecord { index })?;
            if timers.iter().any(|t| t.name == timer_name) {
                return Err(ClockFormatError::BadTimerRecord { index });
            }

            let current = r.f64()?;
            let seconds = r.f64()?;
            let paused = r.u32()? != 0;
            let repeat = r.i32()?;
            if repeat < 0 {
                return Err(ClockFormatError::BadTimerRecord { index });
            }

            timers.push(TimerSlot {
                name: timer_name.to_string(),
                current,
                seconds,
                paused,
                repeat,
            });
        }

        Ok(Clock::from_parts(
            name,
            flags & FLAG_AUTO_UPDATE != 0,
            flags & FLAG_PAUSED != 0,
            timers,
        ))
    }

    fn write(&self, buf: &mut [u8], order: Order) {
        let mut w = Writer { buf, pos: 0, order };

        let mut flags = 0;
        if self.auto_update() {
            flags |= FLAG_AUTO_UPDATE;
        }
        if self.is_paused() {
            flags |= FLAG_PAUSED;
        }

        w.u16(FORMAT_VERSION);
        w.u8(order.flag());
        w.u8(flags);
        w.i32(self.timer_count() as i32);
        w.u32(self.name().len() as u32);
        w.u32(0);

        w.bytes(self.name().as_bytes());
        w.zeros(padded_name_len(self.name().len()) - self.name().len());

        for slot in self.timers() {
            w.bytes(slot.name.as_bytes());
            w.zeros(NAME_FIELD - slot.name.len());
            w.f64(slot.current);
            w.f64(slot.seconds);
            w.u32(u32::from(slot.paused));
            w.i32(slot.repeat);
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
