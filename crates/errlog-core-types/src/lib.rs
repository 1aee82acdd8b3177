//! Core types shared across errlog facilities
//!
//! This crate provides the plain data types produced while capturing the
//! context of a reported error:
//!
//! - **Frames**: StackFrame, one resolved call stack entry
//! - **Windows**: SourceWindow and SourceLine, a slice of source text
//! - **Schema constants**: Canonical field keys and event names

pub mod frame;
pub mod schema;
pub mod window;

pub use frame::StackFrame;
pub use window::{SourceLine, SourceWindow};
