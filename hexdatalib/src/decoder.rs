//! Pluggable instruction decoding for the disassembly annotation column.
//!
//! The line model only needs the textual form of one instruction and its length in bytes.
//! Any decoder that can provide this implements [`InstructionDecoder`]. With the `x86`
//! feature enabled, [`X86Decoder`] decodes x86 / x86-64 machine code in Intel syntax.

use serde::{Deserialize, Serialize};

/// Maximum number of bytes handed to a decoder for a single instruction
/// (longest legal x86 instruction).
pub const MAX_INSTRUCTION_LEN: usize = 15;

/// One decoded instruction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedInstruction {
    /// Mnemonic followed by operands, e.g. `mov eax, 1`
    pub text: String,
    /// Instruction length in bytes (always at least 1)
    pub length: usize,
}

/// Capability to decode a single instruction at the start of `bytes`.
pub trait InstructionDecoder {
    /// Decode one instruction from `bytes`, located at file `offset`.
    /// Returns `None` if nothing valid could be decoded.
    fn decode(&self, bytes: &[u8], offset: u64) -> Option<DecodedInstruction>;
}

/// CPU architecture for the built-in decoder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Architecture {
    X86_16,
    X86_32,
    #[default]
    X86_64,
}

impl Architecture {
    #[must_use]
    pub const fn bitness(self) -> u32 {
        match self {
            Self::X86_16 => 16,
            Self::X86_32 => 32,
            Self::X86_64 => 64,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::X86_16 => "x86 (16-bit)",
            Self::X86_32 => "x86 (32-bit)",
            Self::X86_64 => "x86-64",
        }
    }
}

/// Create the built-in decoder for `arch`, if the crate was built with one.
#[must_use]
pub fn builtin_decoder(arch: Architecture) -> Option<Box<dyn InstructionDecoder>> {
    #[cfg(feature = "x86")]
    {
        Some(Box::new(X86Decoder::new(arch)))
    }
    #[cfg(not(feature = "x86"))]
    {
        let _ = arch;
        None
    }
}

#[cfg(feature = "x86")]
pub use x86::X86Decoder;

#[cfg(feature = "x86")]
mod x86 {
    use super::{Architecture, DecodedInstruction, InstructionDecoder};
    use iced_x86::{Decoder, DecoderOptions, Formatter, IntelFormatter};
    use std::cell::RefCell;

    /// x86 / x86-64 decoder producing Intel syntax
    pub struct X86Decoder {
        bitness: u32,
        formatter: RefCell<IntelFormatter>,
    }

    impl X86Decoder {
        #[must_use]
        pub fn new(arch: Architecture) -> Self {
            Self {
                bitness: arch.bitness(),
                formatter: RefCell::new(IntelFormatter::new()),
            }
        }
    }

    impl InstructionDecoder for X86Decoder {
        fn decode(&self, bytes: &[u8], offset: u64) -> Option<DecodedInstruction> {
            if bytes.is_empty() {
                return None;
            }

            let mut decoder = Decoder::with_ip(self.bitness, bytes, offset, DecoderOptions::NONE);
            let instruction = decoder.decode();
            if instruction.is_invalid() {
                return None;
            }

            let mut text = String::new();
            self.formatter.borrow_mut().format(&instruction, &mut text);

            Some(DecodedInstruction {
                text,
                length: instruction.len().max(1),
            })
        }
    }

}
