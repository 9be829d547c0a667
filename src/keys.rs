use std::io::{self, Read};

const ESC: u8 = 0x1b;
const DEL: u8 = 0x7f;

/// A logical key decoded from raw terminal bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Printable(char),
    Control(u8),
    Backspace,
    Tab,
    Enter,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    PageUp,
    PageDown,
    Home,
    End,
    Delete,
    Escape,
}

/// Byte produced by holding Ctrl together with `c`.
pub const fn ctrl(c: u8) -> u8 {
    c & 0x1f
}

pub trait ByteSource {
    /// Blocks until a byte arrives. End of input is `UnexpectedEof`.
    fn read_byte(&mut self) -> io::Result<u8>;

    /// Waits at most the escape timeout; `None` means nothing arrived.
    fn read_byte_timeout(&mut self) -> io::Result<Option<u8>>;
}

impl<T: AsRef<[u8]>> ByteSource for io::Cursor<T> {
    fn read_byte(&mut self) -> io::Result<u8> {
        let mut byte = [0u8; 1];
        self.read_exact(&mut byte)?;
        Ok(byte[0])
    }

    fn read_byte_timeout(&mut self) -> io::Result<Option<u8>> {
        let mut byte = [0u8; 1];
        match self.read(&mut byte)? {
            0 => Ok(None),
            _ => Ok(Some(byte[0])),
        }
    }
}

pub fn read_key<S: ByteSource + ?Sized>(source: &mut S) -> io::Result<Key> {
    loop {
        let key = match source.read_byte()? {
            DEL => Key::Backspace,
            b'\t' => Key::Tab,
            b'\r' | b'\n' => Key::Enter,
            ESC => read_escape(source)?,
            byte if byte < 0x20 => Key::Control(byte),
            byte if byte.is_ascii() => Key::Printable(char::from(byte)),
            lead => match read_utf8(source, lead)? {
                Some(ch) => Key::Printable(ch),
                // Malformed input is dropped; wait for the next key.
                None => continue,
            },
        };
        return Ok(key);
    }
}

// Continuation bytes of one multi-byte character arrive together.
fn read_utf8<S: ByteSource + ?Sized>(source: &mut S, lead: u8) -> io::Result<Option<char>> {
    let width = match lead {
        0xc2..=0xdf => 2,
        0xe0..=0xef => 3,
        0xf0..=0xf4 => 4,
        _ => return Ok(None),
    };
    let mut buf = [lead, 0, 0, 0];
    for slot in &mut buf[1..width] {
        match source.read_byte_timeout()? {
            Some(byte) => *slot = byte,
            None => return Ok(None),
        }
    }
    Ok(std::str::from_utf8(&buf[..width])
        .ok()
        .and_then(|text| text.chars().next()))
}

// Unrecognized or truncated sequences collapse into a bare Escape.
fn read_escape<S: ByteSource + ?Sized>(source: &mut S) -> io::Result<Key> {
    let Some(first) = source.read_byte_timeout()? else {
        return Ok(Key::Escape);
    };
    let Some(second) = source.read_byte_timeout()? else {
        return Ok(Key::Escape);
    };

    let key = match (first, second) {
        (b'[', digit @ b'0'..=b'9') => {
            let Some(last) = source.read_byte_timeout()? else {
                return Ok(Key::Escape);
            };
            if last != b'~' {
                return Ok(Key::Escape);
            }
            match digit {
                b'1' | b'7' => Key::Home,
                b'3' => Key::Delete,
                b'4' | b'8' => Key::End,
                b'5' => Key::PageUp,
                b'6' => Key::PageDown,
                _ => Key::Escape,
            }
        }
        (b'[', b'A') => Key::ArrowUp,
        (b'[', b'B') => Key::ArrowDown,
        (b'[', b'C') => Key::ArrowRight,
        (b'[', b'D') => Key::ArrowLeft,
        (b'[', b'H') | (b'O', b'H') => Key::Home,
        (b'[', b'F') | (b'O', b'F') => Key::End,
        _ => Key::Escape,
    };
    Ok(key)
}
