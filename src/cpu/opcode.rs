//! Opcode dispatch table.
//!
//! A fixed 256-entry table maps each opcode byte to a handler function and
//! its base cycle cost. Every opcode outside the implemented set shares one
//! designated default entry that consumes a fixed two cycles and performs
//! no state change beyond the fetch, so a bad instruction degrades instead
//! of halting the machine.

use log::debug;

use crate::cpu::cpu::Cpu;
use crate::memory::Memory;

/// Handler for one opcode. The opcode byte is already fetched when the
/// handler runs; it reads its operands, mutates CPU and memory state, and
/// advances PC past the operands.
pub type Handler = fn(&mut Cpu, &mut Memory);

/// One dispatch entry: mnemonic for diagnostics, handler, base cycle cost.
#[derive(Clone, Copy)]
pub struct OpEntry {
    pub mnemonic: &'static str,
    pub handler: Handler,
    pub cycles: u32,
}

const UNKNOWN: OpEntry = OpEntry {
    mnemonic: "???",
    handler: op_unknown,
    cycles: 2,
};

/// Dispatch table indexed by the opcode byte.
pub static DISPATCH: [OpEntry; 256] = {
    let mut table = [UNKNOWN; 256];
    table[0xA9] = OpEntry {
        mnemonic: "LDA #imm",
        handler: op_lda_immediate,
        cycles: 2,
    };
    table[0xAD] = OpEntry {
        mnemonic: "LDA abs",
        handler: op_lda_absolute,
        cycles: 4,
    };
    table[0x8D] = OpEntry {
        mnemonic: "STA abs",
        handler: op_sta_absolute,
        cycles: 4,
    };
    table[0x4C] = OpEntry {
        mnemonic: "JMP abs",
        handler: op_jmp_absolute,
        cycles: 3,
    };
    table
};

fn op_lda_immediate(cpu: &mut Cpu, mem: &mut Memory) {
    let value = cpu.fetch_byte(mem);
    cpu.a = value;
    cpu.update_zero_and_negative_flags(value);
}

fn op_lda_absolute(cpu: &mut Cpu, mem: &mut Memory) {
    let addr = cpu.fetch_word(mem);
    let value = mem.read(addr);
    cpu.a = value;
    cpu.update_zero_and_negative_flags(value);
}

fn op_sta_absolute(cpu: &mut Cpu, mem: &mut Memory) {
    let addr = cpu.fetch_word(mem);
    mem.write(addr, cpu.a);
}

fn op_jmp_absolute(cpu: &mut Cpu, mem: &mut Memory) {
    cpu.pc = cpu.fetch_word(mem);
}

/// The fetch already advanced PC by one; nothing else changes. Logged so a
/// misbehaving program is visible without halting emulation.
fn op_unknown(cpu: &mut Cpu, mem: &mut Memory) {
    let at = cpu.pc.wrapping_sub(1);
    debug!("unimplemented opcode ${:02X} at ${:04X}", mem.read(at), at);
}
