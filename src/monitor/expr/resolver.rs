//! Operand resolution against the machine the debugger is attached to.

use crate::soc::core::CoreState;
use crate::soc::system::bus::{BusError, DeviceBus};

use super::error::ResolveError;
use super::token::{Token, TokenKind};

/// Read-only view of the register file and address space consumed by the
/// evaluator.
pub trait Resolver {
    /// Looks up a register by name (without the `$` prefix).
    fn register(&self, name: &str) -> Option<i64>;

    /// Reads a `width`-byte word at `address`, zero-extended.
    fn read_memory(&self, address: u64, width: u8) -> Result<i64, BusError>;
}

/// Resolver for expressions that reference neither registers nor memory.
pub struct DetachedResolver;

impl Resolver for DetachedResolver {
    fn register(&self, _name: &str) -> Option<i64> {
        None
    }

    fn read_memory(&self, address: u64, _width: u8) -> Result<i64, BusError> {
        Err(BusError::NotMapped { address })
    }
}

/// Resolves registers from a [`CoreState`] and memory through a [`DeviceBus`].
pub struct MachineResolver<'a> {
    state: &'a CoreState,
    bus: &'a DeviceBus,
}

impl<'a> MachineResolver<'a> {
    pub fn new(state: &'a CoreState, bus: &'a DeviceBus) -> Self {
        Self { state, bus }
    }
}

impl Resolver for MachineResolver<'_> {
    fn register(&self, name: &str) -> Option<i64> {
        self.state.read_register(name).ok().map(|value| value as i64)
    }

    fn read_memory(&self, address: u64, width: u8) -> Result<i64, BusError> {
        self.bus
            .read_word(address, width as usize)
            .map(|value| value as i64)
    }
}

/// Turns an operand token (number, hex literal or register) into a machine
/// word.
pub fn resolve_operand<R: Resolver + ?Sized>(
    token: &Token,
    resolver: &R,
) -> Result<i64, ResolveError> {
    match token.kind {
        TokenKind::HexLiteral => parse_literal(&token.text, &token.text[2..], 16),
        TokenKind::Register => {
            let name = token.register_name().unwrap_or(&token.text);
            resolver
                .register(name)
                .ok_or_else(|| ResolveError::UnknownRegister {
                    name: name.to_string(),
                })
        }
        _ => parse_literal(&token.text, &token.text, 10),
    }
}

/// Reads the word an address operand points at.
pub fn dereference<R: Resolver + ?Sized>(
    address: i64,
    width: u8,
    resolver: &R,
) -> Result<i64, ResolveError> {
    let addr = address as u64;
    resolver
        .read_memory(addr, width)
        .map_err(|source| ResolveError::InvalidAddress { addr, source })
}

// Literals cover the full unsigned word range and are reinterpreted as signed.
fn parse_literal(literal: &str, digits: &str, radix: u32) -> Result<i64, ResolveError> {
    u64::from_str_radix(digits, radix)
        .map(|value| value as i64)
        .map_err(|_| ResolveError::Overflow {
            literal: literal.to_string(),
        })
}
