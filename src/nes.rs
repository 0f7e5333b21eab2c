//! The machine aggregate: one owned value holding every mutable component.
//!
//! All emulation state lives in [`Nes`] and every operation takes
//! `&mut self`, so a single lock around the aggregate makes each operation
//! atomic from the outside (see [`crate::emulator`]). Nothing here touches
//! the filesystem or the network; ROM and snapshot bytes are handed in and
//! out by the caller.

use crate::cartridge::{Cartridge, FormatError};
use crate::controller::{Button, Controller};
use crate::cpu::cpu::Cpu;
use crate::memory::Memory;
use crate::ppu::ppu::Ppu;
use crate::snapshot::Snapshot;

/// The whole machine: CPU, memory, picture unit, input latch, cartridge.
pub struct Nes {
    pub cpu: Cpu,
    pub memory: Memory,
    pub ppu: Ppu,
    pub controller: Controller,
    /// The loaded cartridge, immutable once installed. `None` until a ROM
    /// loads successfully; an unloaded machine keeps a blank frame and
    /// executes zeroed memory without crashing.
    pub cart: Option<Cartridge>,
}

impl Nes {
    pub fn new() -> Self {
        Self {
            cpu: Cpu::new(),
            memory: Memory::new(),
            ppu: Ppu::new(),
            controller: Controller::new(),
            cart: None,
        }
    }

    /// Parse a ROM image and install its banks: program banks into the CPU
    /// windows (mapper 0 only), pattern banks into picture memory
    /// (regardless of mapper). On failure the machine is left exactly as
    /// it was.
    pub fn load_rom(&mut self, bytes: &[u8]) -> Result<(), FormatError> {
        let cart = Cartridge::load(bytes)?;
        self.memory.map_cartridge(&cart);
        self.ppu.load_pattern(cart.chr());
        self.cart = Some(cart);
        Ok(())
    }

    pub fn loaded(&self) -> bool {
        self.cart.is_some()
    }

    /// Drive the CPU one atomic step. Returns the cycles consumed.
    pub fn step(&mut self) -> u32 {
        self.cpu.step(&mut self.memory)
    }

    /// Recompute the whole frame buffer from current graphics state.
    pub fn render_frame(&mut self) {
        self.ppu.render_frame();
    }

    /// Raise the once-per-frame interrupt. Idempotent until serviced.
    pub fn raise_frame_interrupt(&mut self) {
        self.cpu.nmi_pending = true;
    }

    /// Record a button state from the presentation path.
    pub fn set_key(&mut self, button: Button, pressed: bool) {
        self.controller.set(&mut self.memory, button, pressed);
    }

    /// Deep copy of all mutable state.
    pub fn capture(&self) -> Snapshot {
        Snapshot {
            cpu: self.cpu.clone(),
            memory: self.memory.clone(),
            ppu: self.ppu.clone(),
            controller: self.controller.clone(),
        }
    }

    /// Replace all mutable state with copies from the snapshot. A snapshot
    /// value is already fully validated, so this cannot partially commit:
    /// it either runs to completion or (on an earlier decode failure) was
    /// never reached.
    pub fn restore(&mut self, snapshot: &Snapshot) {
        self.cpu = snapshot.cpu.clone();
        self.memory = snapshot.memory.clone();
        self.ppu = snapshot.ppu.clone();
        self.controller = snapshot.controller.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cartridge::{CHR_BANK_SIZE, HEADER_LEN, MAGIC, PRG_BANK_SIZE};

    fn rom(mapper: u8) -> Vec<u8> {
        let mut bytes = vec![0u8; HEADER_LEN];
        bytes[..4].copy_from_slice(&MAGIC);
        bytes[4] = 1;
        bytes[5] = 1;
        bytes[6] = mapper << 4;
        bytes[7] = mapper & 0xF0;
        let mut prg = vec![0u8; PRG_BANK_SIZE];
        prg[0] = 0xA9; // LDA #$11
        prg[1] = 0x11;
        bytes.extend_from_slice(&prg);
        let mut chr = vec![0u8; CHR_BANK_SIZE];
        chr[0] = 0xCC;
        bytes.extend_from_slice(&chr);
        bytes
    }

    #[test]
    fn load_installs_program_and_pattern_banks() {
        let mut nes = Nes::new();
        nes.load_rom(&rom(0)).unwrap();

        assert!(nes.loaded());
        assert_eq!(nes.memory.read(0x8000), 0xA9);
        assert_eq!(nes.ppu.pattern[0], 0xCC);

        assert_eq!(nes.step(), 2);
        assert_eq!(nes.cpu.a, 0x11);
    }

    #[test]
    fn failed_load_leaves_the_machine_untouched() {
        let mut nes = Nes::new();
        let mut bad = rom(0);
        bad[0] = b'X';

        assert!(nes.load_rom(&bad).is_err());
        assert!(!nes.loaded());
        assert_eq!(nes.memory.read(0x8000), 0);
        assert!(nes.ppu.framebuffer.iter().all(|&px| px == 0));
    }

    #[test]
    fn unsupported_mapper_loads_but_never_maps() {
        let mut nes = Nes::new();
        nes.load_rom(&rom(5)).unwrap();

        assert!(nes.loaded());
        assert_eq!(nes.memory.read(0x8000), 0);
        // Pattern data is still installed regardless of mapper support.
        assert_eq!(nes.ppu.pattern[0], 0xCC);
    }
}
