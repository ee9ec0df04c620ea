/* 📖 # What is the Platform Abstraction Layer?

The PAL provides a trait-based abstraction over filesystem and HTTP server
operations, enabling testable code. Key benefits:
- Testability: MockPal allows deterministic unit tests without filesystem or
  network access
- Flexibility: Switch between real and in-memory implementations
- Consistency: All platform operations use the same error handling
*/

mod file_path;
pub mod http;
pub mod mock;
pub mod real_pal;
mod traits;

pub use file_path::FilePath;
pub use mock::MockPal;
pub use real_pal::RealPal;
pub use traits::{Pal, PalHandle, ReadSeek};
