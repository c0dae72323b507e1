//! Build driver for gizmo.
//!
//! Resolves manifest items into object files and a linked executable:
//!
//! ```text
//! BuildItem ─▶ Recipe ─▶ for each object:
//!                          c++  ─▶ merged unit ─▶ compiler ─▶ <obj>.o
//!                          asm  ─▶ assembler ──────────────▶ <obj>.o
//!                          main ─▶ test harness unit ─▶ compiler ─▶ main.o (tests only)
//!                        ─▶ linker ─▶ bin/<item>
//! ```

mod context;
mod driver;
mod error;
pub mod flags;
pub mod toolchain;

pub use context::BuildContext;
pub use driver::{Driver, BUILD_DIR, SOURCE_DIR};
pub use error::{DriverError, Result};
pub use toolchain::Toolchain;
