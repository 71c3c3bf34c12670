//! Core-level runtime primitives: the register-file description and the
//! mutable register snapshot the debugger reads from.

pub mod specification;
pub mod state;

pub use specification::{
    CoreSpec,
    CoreSpecBuilder,
    CoreSpecBuildError,
    CoreSpecError,
    RegisterSpec,
};
pub use state::{CoreState, StateError, StateResult};
