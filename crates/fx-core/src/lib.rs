//! Shader source preprocessing and compiler diagnostic normalisation for
//! GLSL effects.
//!
//! The flow for one compile attempt:
//!
//! 1. [`Preprocessor`] flattens an entry file and its `#include`s into one
//!    source string, writing `#line <n> <handle>` markers around each splice
//!    and registering every file in a caller-owned [`PathRegistry`].
//! 2. The flattened text goes to an external shader compiler.
//! 3. [`DiagnosticNormalizer`] parses the compiler's info log with the grammar
//!    of the detected [`Vendor`] and maps handles back to paths.
//!
//! Both steps append to the same [`DiagnosticLog`].
//!
//! ```rust
//! use fx_core::{DiagnosticLog, DiagnosticNormalizer, PathRegistry, Preprocessor, Vendor};
//! use fx_core::vfs::InMemoryFileSystem;
//!
//! let fs = InMemoryFileSystem::new();
//! fs.insert("fx/main.frag", "#version 150\n#include \"light.glsl\"\nvoid main() {}\n");
//! fs.insert("fx/light.glsl", "vec3 light(vec3 n);\n");
//!
//! let mut registry = PathRegistry::new();
//! let mut log = DiagnosticLog::new();
//! let annotated = Preprocessor::new(&fs, "fx")
//!     .run("fx/main.frag", &mut registry, &mut log)
//!     .unwrap();
//! assert!(annotated.source.contains("#line 1 1\nvec3 light(vec3 n);\n#line 3 0\n"));
//!
//! DiagnosticNormalizer::new(Vendor::Ati).normalize(
//!     "ERROR: 1:1: error(#160) Cannot convert types\n",
//!     annotated.entry,
//!     &registry,
//!     &mut log,
//! );
//! assert_eq!(log.entries()[0].to_string(), "fx/light.glsl:1 error #160: Cannot convert types");
//! ```

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod lines;
pub mod normalize;
pub mod preprocess;
pub mod registry;
pub mod vfs;

// Re-export commonly used items for convenience
pub use tracing;

pub use config::PreprocessorConfig;
pub use diagnostics::{DiagnosticLog, LogEntry, StructuredEntry, UNKNOWN_FILE};
pub use normalize::{DiagnosticNormalizer, GrammarFields, GrammarTable, Vendor, VendorGrammar};
pub use preprocess::{AnnotatedSource, LineMarker, Preprocessor};
pub use registry::{PathHandle, PathRegistry};

// Alias for error types
pub type Error = crate::error::Error;
pub type Result<T> = crate::error::Result<T>;
