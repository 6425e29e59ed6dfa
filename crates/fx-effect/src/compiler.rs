//! The seam to the graphics API that actually compiles and links shaders.

use crate::stage::ShaderStage;
use fx_core::{Result, Vendor};

/// Outcome of one compile or link call, with the driver's raw info log.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompileOutput {
    pub success: bool,
    pub info_log: String,
}

impl CompileOutput {
    pub fn ok() -> Self {
        Self {
            success: true,
            info_log: String::new(),
        }
    }

    pub fn with_log(success: bool, info_log: impl Into<String>) -> Self {
        Self {
            success,
            info_log: info_log.into(),
        }
    }
}

pub trait ShaderCompiler {
    /// Vendor whose diagnostic grammar applies to this compiler's info logs.
    fn vendor(&self) -> Vendor;

    /// Compiles one flattened stage source for the pass being built.
    fn compile(&mut self, stage: ShaderStage, source: &str) -> Result<CompileOutput>;

    /// Links the stages compiled since the previous link into a program.
    fn link(&mut self, pass: &str, stages: &[ShaderStage]) -> Result<CompileOutput>;
}
