/* 📖 # Why have petbox_base as a core library?
petbox_base provides the foundational error handling, tracing setup and the
platform abstraction layer used across all crates. This ensures consistency in
error handling and prevents circular dependencies between crates.
*/

pub mod error;
pub mod logging;
pub mod pal;

// Re-export commonly used types for convenience
pub use error::{PetboxError, PetboxResult, ResultExt};
pub use pal::{FilePath, MockPal, Pal, PalHandle, RealPal};
