use std::sync::Arc;

use crate::soc::core::specification::{CoreSpec, RegisterSpec};
use crate::soc::device::endianness::mask_bits;

/// Mutable register-file snapshot for one core. Every register occupies its
/// own word slot; values are kept zero-extended and never exceed the declared
/// width.
#[derive(Debug, Clone)]
pub struct CoreState {
    spec: Arc<CoreSpec>,
    values: Vec<u64>,
}

impl CoreState {
    pub fn new(spec: Arc<CoreSpec>) -> Self {
        let values = vec![0; spec.registers().len()];
        Self { spec, values }
    }

    pub fn specification(&self) -> &CoreSpec {
        &self.spec
    }

    pub fn read_register(&self, name: &str) -> StateResult<u64> {
        let slot = self.slot(name)?;
        Ok(self.values[slot])
    }

    pub fn write_register(&mut self, name: &str, value: u64) -> StateResult<()> {
        let slot = self.slot(name)?;
        let bits = self.spec.registers()[slot].bit_len;
        if value & !mask_bits(bits as u32) != 0 {
            return Err(StateError::ValueOutOfRange {
                register: name.to_string(),
                bits,
                value,
            });
        }
        self.values[slot] = value;
        Ok(())
    }

    /// Registers paired with their current value, in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&RegisterSpec, u64)> + '_ {
        self.spec
            .registers()
            .iter()
            .zip(self.values.iter().copied())
    }

    pub fn zeroize(&mut self) {
        self.values.fill(0);
    }

    fn slot(&self, name: &str) -> StateResult<usize> {
        self.spec
            .slot(name)
            .ok_or_else(|| StateError::UnknownRegister(name.to_string()))
    }
}

#[derive(Debug)]
pub enum StateError {
    UnknownRegister(String),
    ValueOutOfRange { register: String, bits: u16, value: u64 },
}

pub type StateResult<T> = Result<T, StateError>;

impl std::fmt::Display for StateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StateError::UnknownRegister(name) => write!(f, "unknown register '{name}'"),
            StateError::ValueOutOfRange {
                register,
                bits,
                value,
            } => {
                write!(
                    f,
                    "value 0x{value:X} does not fit in {bits}-bit register '{register}'"
                )
            }
        }
    }
}

impl std::error::Error for StateError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::soc::device::Endianness;

    fn toy_core() -> Arc<CoreSpec> {
        Arc::new(
            CoreSpec::builder("toy", Endianness::Little)
                .register("acc", 8)
                .register("sp", 16)
                .register("pc", 32)
                .alias("a", "acc")
                .build()
                .expect("toy layout"),
        )
    }

    #[test]
    fn fresh_state_is_zeroed_and_ordered() {
        let state = CoreState::new(toy_core());
        let listing: Vec<_> = state
            .iter()
            .map(|(reg, value)| (reg.name.as_str(), reg.bit_len, value))
            .collect();
        assert_eq!(listing, [("acc", 8, 0), ("sp", 16, 0), ("pc", 32, 0)]);
        assert_eq!(state.specification().name(), "toy");
    }

    #[test]
    fn values_wider_than_the_register_are_refused() {
        let mut state = CoreState::new(toy_core());
        state.write_register("sp", 0xFFFF).expect("fits 16 bits");
        let err = state.write_register("sp", 0x1_0000).unwrap_err();
        assert!(matches!(err, StateError::ValueOutOfRange { bits: 16, .. }));
        assert_eq!(state.read_register("sp").expect("sp"), 0xFFFF, "old value kept");
        assert_eq!(
            err.to_string(),
            "value 0x10000 does not fit in 16-bit register 'sp'"
        );
    }

    #[test]
    fn unknown_names_are_reported() {
        let mut state = CoreState::new(toy_core());
        assert_eq!(
            state.write_register("ix", 1).unwrap_err().to_string(),
            "unknown register 'ix'"
        );
    }

    #[test]
    fn aliases_reach_the_same_slot() {
        let mut state = CoreState::new(toy_core());
        state.write_register("a", 0x42).expect("write through alias");
        assert_eq!(state.read_register("acc").expect("acc"), 0x42);

        let mut hart = CoreState::new(Arc::new(CoreSpec::riscv(32).expect("rv32")));
        hart.write_register("x10", 7).expect("write x10");
        assert_eq!(hart.read_register("a0").expect("a0"), 7);
    }

    #[test]
    fn clones_do_not_share_values() {
        let mut first = CoreState::new(toy_core());
        first.write_register("pc", 0x8000_0000).expect("pc");
        let mut copy = first.clone();
        copy.zeroize();
        assert_eq!(first.read_register("pc").expect("pc"), 0x8000_0000);
        assert!(copy.iter().all(|(_, value)| value == 0));
    }
}
