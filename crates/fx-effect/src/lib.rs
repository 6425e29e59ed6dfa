//! Effects: named techniques made of passes, each pass a set of GLSL stage
//! sources. Building an effect preprocesses every stage with `fx-core`, hands
//! the flattened source to a [`ShaderCompiler`] and normalises whatever the
//! compiler and linker print into the session's diagnostic log.

pub mod compiler;
pub mod effect;
pub mod pass;
pub mod session;
pub mod stage;
pub mod summary;
pub mod technique;

pub use compiler::{CompileOutput, ShaderCompiler};
pub use effect::Effect;
pub use pass::Pass;
pub use session::CompileSession;
pub use stage::ShaderStage;
pub use summary::{EffectSummary, PassSummary, TechniqueSummary};
pub use technique::Technique;
