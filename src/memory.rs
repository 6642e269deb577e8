use crate::error::LoadError;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

// NB. addresses are u16 as per the chip-8; lengths are usize to stop endless casting

/// Represents the byte-addressable side of the machine
pub trait MemoryMap {
    /// read one byte; addresses past the top of RAM are clamped
    fn read_byte(&self, addr: u16) -> u8;

    /// write one byte; addresses past the top of RAM are clamped
    fn write_byte(&mut self, addr: u16, value: u8);

    /// get a two-byte big-endian word (opcode fetch)
    fn get_word(&self, addr: u16) -> u16 {
        let (next, _) = offset_address(addr, 1);
        ((self.read_byte(addr) as u16) << 8) | (self.read_byte(next) as u16)
    }

    /// get a r/o slice of the underlying memory
    fn get_ro_slice(&self, addr: u16, len: usize) -> &[u8];
}

/// how much RAM we have
pub const CHIP8_RAM_SIZE_BYTES: usize = 4096;

/// highest valid address; every address register saturates here
pub const CHIP8_MAX_ADDR: u16 = (CHIP8_RAM_SIZE_BYTES - 1) as u16;

/// where the program is loaded
pub const CHIP8_PROGRAM_ADDR: u16 = 0x0200;

/// biggest program that fits between the load address and the top of RAM
pub const CHIP8_MAX_PROGRAM_BYTES: usize = CHIP8_RAM_SIZE_BYTES - CHIP8_PROGRAM_ADDR as usize;

pub const CHIP8_FONT_ADDR: u16 = 0x050;

/// bytes per glyph in the built-in font
pub const CHIP8_FONT_GLYPH_BYTES: u16 = 5;

/// Resolve `base + offset` under the clamping policy. The flag is set when
/// the sum ran past the top of RAM and had to be saturated.
pub fn offset_address(base: u16, offset: u16) -> (u16, bool) {
    let sum = base as u32 + offset as u32;
    if sum > CHIP8_MAX_ADDR as u32 {
        (CHIP8_MAX_ADDR, true)
    } else {
        (sum as u16, false)
    }
}

/// Defines the CHIP-8 memory map used here:
///   0x0000-0x004f  unused interpreter area
///   0x0050-0x009f  font, 16 glyphs of 5 bytes
///   0x00a0-0x01ff  unused interpreter area
///   0x0200-0x0fff  program, then scratch (sprites, BCD, register dumps)
///
/// stack, timers and display live outside RAM, in the [`crate::machine::Machine`]
pub struct Chip8MemoryMap {
    bytes: Box<[u8; CHIP8_RAM_SIZE_BYTES]>,
}

impl MemoryMap for Chip8MemoryMap {
    fn read_byte(&self, addr: u16) -> u8 {
        self.bytes[addr.min(CHIP8_MAX_ADDR) as usize]
    }

    fn write_byte(&mut self, addr: u16, value: u8) {
        self.bytes[addr.min(CHIP8_MAX_ADDR) as usize] = value;
    }

    fn get_ro_slice(&self, addr: u16, len: usize) -> &[u8] {
        let a = (addr as usize).min(CHIP8_RAM_SIZE_BYTES);
        let end = a.saturating_add(len).min(CHIP8_RAM_SIZE_BYTES);
        &self.bytes[a..end]
    }
}

impl Default for Chip8MemoryMap {
    fn default() -> Self {
        Self::new()
    }
}

impl Chip8MemoryMap {
    /// zeroed RAM with the font installed
    pub fn new() -> Self {
        let mut mm = Chip8MemoryMap {
            bytes: Box::new([0u8; CHIP8_RAM_SIZE_BYTES]),
        };
        mm.install_font();
        mm
    }

    /// zero everything and put the font back
    pub fn reset(&mut self) {
        self.bytes.fill(0);
        self.install_font();
    }

    fn install_font(&mut self) {
        let start = CHIP8_FONT_ADDR as usize;
        self.bytes[start..start + CHIP8_FONT.len()].copy_from_slice(&CHIP8_FONT);
    }

    /// address of the glyph for a hex digit
    pub fn glyph_addr(digit: u8) -> u16 {
        CHIP8_FONT_ADDR + digit as u16 * CHIP8_FONT_GLYPH_BYTES
    }

    /// copy a CHIP-8 program to 0x200; nothing is written unless all of it fits
    pub fn load_program(&mut self, program: &[u8]) -> Result<usize, LoadError> {
        check_program_size(program.len())?;
        let start = CHIP8_PROGRAM_ADDR as usize;
        self.bytes[start..start + program.len()].copy_from_slice(program);
        Ok(program.len())
    }
}

fn check_program_size(size: usize) -> Result<(), LoadError> {
    if size == 0 {
        return Err(LoadError::SourceEmpty);
    }
    if size > CHIP8_MAX_PROGRAM_BYTES {
        return Err(LoadError::ProgramTooLarge {
            size,
            max: CHIP8_MAX_PROGRAM_BYTES,
        });
    }
    Ok(())
}

/// read a program image from any byte source
pub fn read_program_from(reader: &mut impl Read) -> io::Result<Vec<u8>> {
    // one byte past the limit, so an oversized image still reports a size
    let mut buf = Vec::new();
    reader
        .take(CHIP8_MAX_PROGRAM_BYTES as u64 + 1)
        .read_to_end(&mut buf)?;
    Ok(buf)
}

/// storage collaborator: read a program image from a file
pub fn read_program(path: impl AsRef<Path>) -> Result<Vec<u8>, LoadError> {
    let path = path.as_ref();
    let unavailable = |source| LoadError::SourceUnavailable {
        path: path.to_path_buf(),
        source,
    };
    let mut f = File::open(path).map_err(unavailable)?;
    let bytes = read_program_from(&mut f).map_err(unavailable)?;
    check_program_size(bytes.len())?;
    log::debug!("read {} program bytes from {}", bytes.len(), path.display());
    Ok(bytes)
}

pub const CHIP8_FONT: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_memory_zeroed() {
        let m = Chip8MemoryMap::new();
        // NB. memory is zeroed apart from the font
        assert_eq!(m.bytes[..0x50], [0; 0x50]);
        assert_eq!(m.bytes[0xa0..], [0; 0xf60]);
    }

    #[test]
    fn test_font_installed() {
        let m = Chip8MemoryMap::new();
        assert_eq!(m.get_ro_slice(0x50, 80), &CHIP8_FONT);
        assert_eq!(m.get_ro_slice(Chip8MemoryMap::glyph_addr(0xf), 5), &CHIP8_FONT[75..]);
    }

    #[test]
    fn test_reset_restores_font() {
        let mut m = Chip8MemoryMap::new();
        m.write_byte(0x50, 0x00);
        m.write_byte(0x300, 0xaa);
        m.reset();
        assert_eq!(m.read_byte(0x50), 0xf0);
        assert_eq!(m.read_byte(0x300), 0x00);
    }

    #[test]
    fn test_read_word() {
        let mut m = Chip8MemoryMap::new();
        m.write_byte(0x204, 0x04);
        m.write_byte(0x205, 0x05);
        assert_eq!(m.get_word(0x204), 0x0405);
    }

    #[test]
    fn test_read_word_at_top_clamps() {
        let mut m = Chip8MemoryMap::new();
        m.write_byte(0xfff, 0x12);
        assert_eq!(m.get_word(0xfff), 0x1212);
    }

    #[test]
    fn test_out_of_range_clamps() {
        let mut m = Chip8MemoryMap::new();
        m.write_byte(0x1234, 0x77);
        assert_eq!(m.read_byte(0xfff), 0x77);
        assert_eq!(m.read_byte(0xffff), 0x77);
        assert_eq!(m.get_ro_slice(0xffe, 8).len(), 2);
    }

    #[test]
    fn test_offset_address() {
        assert_eq!(offset_address(0x200, 2), (0x202, false));
        assert_eq!(offset_address(0xffe, 1), (0xfff, false));
        assert_eq!(offset_address(0xffe, 2), (0xfff, true));
        assert_eq!(offset_address(0xfff, 0xff), (0xfff, true));
    }

    #[test]
    fn test_program_load_ok() -> Result<(), LoadError> {
        let mut dst = Chip8MemoryMap::new();
        let prog: &[u8] = &[0x00, 0xe0]; // clear screen
        assert_eq!(dst.load_program(prog)?, 2);
        assert_eq!(dst.get_ro_slice(0x200, 2), &[0x00, 0xe0]);
        Ok(())
    }

    #[test]
    fn test_program_load_max_size() -> Result<(), LoadError> {
        let mut dst = Chip8MemoryMap::new();
        let prog = vec![0xab; 3584];
        dst.load_program(&prog)?;
        assert_eq!(dst.read_byte(0xfff), 0xab);
        Ok(())
    }

    #[test]
    fn test_program_too_large_writes_nothing() {
        let mut dst = Chip8MemoryMap::new();
        let prog = vec![0xab; 3585];
        match dst.load_program(&prog) {
            Err(LoadError::ProgramTooLarge { size, max }) => {
                assert_eq!(size, 3585);
                assert_eq!(max, 3584);
            }
            other => panic!("unexpected result {:?}", other),
        }
        assert_eq!(dst.bytes[0x200..], [0; 0xe00]);
    }

    #[test]
    fn test_program_empty_rejected() {
        let mut dst = Chip8MemoryMap::new();
        assert!(matches!(dst.load_program(&[]), Err(LoadError::SourceEmpty)));
    }

    #[test]
    fn test_read_program_from_caps_length() -> io::Result<()> {
        let big = vec![0u8; 5000];
        let mut src: &[u8] = &big;
        let bytes = read_program_from(&mut src)?;
        assert_eq!(bytes.len(), CHIP8_MAX_PROGRAM_BYTES + 1);
        Ok(())
    }

    #[test]
    fn test_read_program_missing_file() {
        let err = read_program("/definitely/not/a/rom.ch8").unwrap_err();
        assert!(matches!(err, LoadError::SourceUnavailable { .. }));
    }

    #[test]
    fn test_read_program_file() -> Result<(), Box<dyn std::error::Error>> {
        let path = std::env::temp_dir().join(format!("chip8vm-read-{}.ch8", std::process::id()));
        File::create(&path)?.write_all(&[0x12, 0x00])?;
        let bytes = read_program(&path)?;
        std::fs::remove_file(&path)?;
        assert_eq!(bytes, vec![0x12, 0x00]);
        Ok(())
    }

    #[test]
    fn test_read_program_empty_file() -> io::Result<()> {
        let path = std::env::temp_dir().join(format!("chip8vm-empty-{}.ch8", std::process::id()));
        File::create(&path)?;
        let result = read_program(&path);
        std::fs::remove_file(&path)?;
        assert!(matches!(result, Err(LoadError::SourceEmpty)));
        Ok(())
    }
}
