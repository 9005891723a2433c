//! The IFJcode23 abstract machine: value model, frame store, data stack,
//! call stack, instruction/opcode types, the executor, and the error/
//! exit-code taxonomy.
//!
//! This crate has no idea XML exists. It consumes an already-decoded,
//! already-ordered [`program::Program`] (built by the `loader` crate) and
//! runs it against [`io::InputLines`]/[`io::OutputChannel`] trait objects,
//! which keeps it runnable against real files, stdio, or in-memory buffers
//! in tests alike.

pub mod callstack;
pub mod datastack;
pub mod error;
pub mod executor;
pub mod frame;
pub mod instruction;
pub mod io;
pub mod operand;
pub mod program;
pub mod value;

pub use error::InterpreterError;
pub use executor::Executor;
pub use program::Program;
