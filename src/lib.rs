//! Samnes: a small NES-style emulator core with whole-state snapshots.
//!
//! A cycle-stepped 6502 subset coupled to a tile-based picture unit,
//! driven by a background frame loop that shares the machine with a
//! presentation thread through one coarse lock.
//!
//! ## Modules
//!
//! - **cartridge** – iNES-style container parsing: program/pattern banks, mapper id
//! - **memory** – 64 KiB CPU address space, mapper-0 bank mapping
//! - **cpu** – registers, table-driven opcode dispatch, frame-interrupt service
//! - **ppu** – pattern/name-table/palette memories, full-frame rasterizer
//! - **controller** – 8-button input latch with the $4016 strobe mirror
//! - **snapshot** – whole-state capture/restore and the opaque byte codec
//! - **clock** – injectable time source, fixed-timestep frame pacing
//! - **nes** – the owned state aggregate every operation runs against
//! - **emulator** – background frame loop, one lock around the whole machine

pub mod cartridge;
pub mod clock;
pub mod controller;
pub mod cpu;
pub mod emulator;
pub mod memory;
pub mod nes;
pub mod ppu;
pub mod snapshot;
