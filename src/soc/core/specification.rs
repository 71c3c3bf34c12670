use std::fmt;

use ahash::AHashMap;

use crate::soc::device::Endianness;

/// Widest register the core state can hold.
pub const MAX_REGISTER_BITS: u16 = 64;

/// RISC-V integer register ABI names in encoding order. The zero register is
/// spelled `0`, so the console reads it as `$0`.
const RISCV_ABI_NAMES: [&str; 32] = [
    "0", "ra", "sp", "gp", "tp", "t0", "t1", "t2", "s0", "s1", "a0", "a1", "a2", "a3", "a4", "a5",
    "a6", "a7", "s2", "s3", "s4", "s5", "s6", "s7", "s8", "s9", "s10", "s11", "t3", "t4", "t5",
    "t6",
];

/// Register file layout: storage slots in declaration order plus a lookup
/// table in which aliases share their target's slot.
#[derive(Debug, Clone)]
pub struct CoreSpec {
    name: String,
    endianness: Endianness,
    registers: Vec<RegisterSpec>,
    lookup: AHashMap<String, usize>,
}

impl CoreSpec {
    pub fn builder(name: impl Into<String>, endianness: Endianness) -> CoreSpecBuilder {
        CoreSpecBuilder {
            spec: CoreSpec {
                name: name.into(),
                endianness,
                registers: Vec::new(),
                lookup: AHashMap::new(),
            },
            errors: Vec::new(),
        }
    }

    /// Little-endian RV32/RV64 hart: `x0`..`x31` under their ABI names, the
    /// architectural `xN` spellings as aliases, then `pc`.
    pub fn riscv(xlen: u16) -> Result<Self, CoreSpecBuildError> {
        let builder = RISCV_ABI_NAMES
            .iter()
            .enumerate()
            .fold(
                CoreSpec::builder(format!("rv{xlen}"), Endianness::Little),
                |builder, (num, abi)| builder.register(*abi, xlen).alias(format!("x{num}"), *abi),
            );
        builder.register("pc", xlen).build()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn endianness(&self) -> Endianness {
        self.endianness
    }

    /// Storage registers in declaration order (aliases excluded).
    pub fn registers(&self) -> &[RegisterSpec] {
        &self.registers
    }

    /// Looks a register up by name or alias.
    pub fn register(&self, name: &str) -> Option<&RegisterSpec> {
        self.slot(name).map(|slot| &self.registers[slot])
    }

    pub(crate) fn slot(&self, name: &str) -> Option<usize> {
        self.lookup.get(name).copied()
    }
}

/// A named register and its width in bits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterSpec {
    pub name: String,
    pub bit_len: u16,
}

/// Accumulates declarations and reports every problem at `build` time.
#[derive(Debug)]
pub struct CoreSpecBuilder {
    spec: CoreSpec,
    errors: Vec<CoreSpecError>,
}

impl CoreSpecBuilder {
    pub fn register(mut self, name: impl Into<String>, bit_len: u16) -> Self {
        let name = name.into();
        if !(1..=MAX_REGISTER_BITS).contains(&bit_len) {
            self.errors.push(CoreSpecError::InvalidWidth { name, bit_len });
        } else if self.spec.lookup.contains_key(&name) {
            self.errors.push(CoreSpecError::NameTaken(name));
        } else {
            self.spec.lookup.insert(name.clone(), self.spec.registers.len());
            self.spec.registers.push(RegisterSpec { name, bit_len });
        }
        self
    }

    /// Makes `alias` resolve to the already declared register `target`.
    pub fn alias(mut self, alias: impl Into<String>, target: &str) -> Self {
        let alias = alias.into();
        match self.spec.slot(target) {
            None => self.errors.push(CoreSpecError::UnknownAliasTarget {
                alias,
                target: target.to_string(),
            }),
            Some(_) if self.spec.lookup.contains_key(&alias) => {
                self.errors.push(CoreSpecError::NameTaken(alias))
            }
            Some(slot) => {
                self.spec.lookup.insert(alias, slot);
            }
        }
        self
    }

    pub fn build(self) -> Result<CoreSpec, CoreSpecBuildError> {
        if self.errors.is_empty() {
            Ok(self.spec)
        } else {
            Err(CoreSpecBuildError {
                core: self.spec.name,
                errors: self.errors,
            })
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreSpecError {
    NameTaken(String),
    InvalidWidth { name: String, bit_len: u16 },
    UnknownAliasTarget { alias: String, target: String },
}

impl fmt::Display for CoreSpecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoreSpecError::NameTaken(name) => write!(f, "'{name}' is already a register name"),
            CoreSpecError::InvalidWidth { name, bit_len } => write!(
                f,
                "'{name}' is {bit_len} bits wide, expected 1 to {MAX_REGISTER_BITS}"
            ),
            CoreSpecError::UnknownAliasTarget { alias, target } => {
                write!(f, "alias '{alias}' names undeclared register '{target}'")
            }
        }
    }
}

impl std::error::Error for CoreSpecError {}

#[derive(Debug)]
pub struct CoreSpecBuildError {
    pub core: String,
    pub errors: Vec<CoreSpecError>,
}

impl fmt::Display for CoreSpecBuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "register file '{}' is invalid", self.core)?;
        for (idx, err) in self.errors.iter().enumerate() {
            let sep = if idx == 0 { ": " } else { "; " };
            write!(f, "{sep}{err}")?;
        }
        Ok(())
    }
}

impl std::error::Error for CoreSpecBuildError {}
