use crate::compiler::ShaderCompiler;
use crate::pass::Pass;
use crate::session::CompileSession;
use fx_core::vfs::SourceLoader;
use fx_core::{Error, Result};

/// A named, ordered group of passes.
#[derive(Debug, Clone)]
pub struct Technique {
    name: String,
    passes: Vec<Pass>,
}

impl Technique {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passes: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Appends a new pass; passes render in the order they were created.
    pub fn pass_new(&mut self, name: impl Into<String>) -> &mut Pass {
        self.passes.push(Pass::new(name));
        let last = self.passes.len() - 1;
        &mut self.passes[last]
    }

    pub fn pass(&self, name: &str) -> Result<&Pass> {
        self.passes
            .iter()
            .find(|pass| pass.name() == name)
            .ok_or_else(|| {
                Error::not_found(format!("pass '{}' in technique '{}'", name, self.name))
            })
    }

    pub fn passes(&self) -> impl Iterator<Item = &Pass> {
        self.passes.iter()
    }

    pub fn compile(
        &mut self,
        dirref: &str,
        compiler: &mut dyn ShaderCompiler,
        loader: &dyn SourceLoader,
        session: &mut CompileSession,
    ) -> Result<()> {
        for pass in &mut self.passes {
            pass.compile(dirref, compiler, loader, session)?;
        }
        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        self.passes.iter().all(Pass::is_valid)
    }
}
