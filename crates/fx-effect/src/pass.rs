use crate::compiler::ShaderCompiler;
use crate::session::CompileSession;
use crate::stage::ShaderStage;
use fx_core::vfs::SourceLoader;
use fx_core::{AnnotatedSource, DiagnosticNormalizer, Error, PathHandle, Preprocessor, Result};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// One set of shader stage sources, linked into a single program.
#[derive(Debug, Clone)]
pub struct Pass {
    name: String,
    /// Stage entry files, relative to the effect directory.
    shaders: BTreeMap<ShaderStage, String>,
    valid: bool,
}

impl Pass {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            shaders: BTreeMap::new(),
            valid: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Assigns the entry file of `stage`. The first assignment for a stage wins.
    pub fn set_path(&mut self, stage: ShaderStage, path: impl Into<String>) {
        self.shaders.entry(stage).or_insert_with(|| path.into());
    }

    /// Entry file of `stage`, as written in the effect.
    pub fn path(&self, stage: ShaderStage) -> Result<&str> {
        self.shaders
            .get(&stage)
            .map(String::as_str)
            .ok_or_else(|| Error::not_set(format!("{} shader of pass '{}'", stage, self.name)))
    }

    /// Stages with an entry file, in pipeline order.
    pub fn stages(&self) -> impl Iterator<Item = (ShaderStage, &str)> {
        self.shaders.iter().map(|(stage, path)| (*stage, path.as_str()))
    }

    /// Flattened source of `stage`, with includes resolved against `dirref`.
    pub fn source(
        &self,
        stage: ShaderStage,
        dirref: &str,
        loader: &dyn SourceLoader,
        session: &mut CompileSession,
    ) -> Result<AnnotatedSource> {
        let preprocessor = Preprocessor::new(loader, dirref).with_config(session.config.clone());
        let entry = preprocessor.resolve(self.path(stage)?);
        preprocessor.run(&entry, &mut session.registry, &mut session.log)
    }

    /// Compiles every stage and links them.
    ///
    /// Preprocessing failures abort. Compiler and linker complaints do not: they
    /// are normalised into the session log and leave the pass invalid.
    pub fn compile(
        &mut self,
        dirref: &str,
        compiler: &mut dyn ShaderCompiler,
        loader: &dyn SourceLoader,
        session: &mut CompileSession,
    ) -> Result<()> {
        self.valid = false;
        let normalizer = DiagnosticNormalizer::new(compiler.vendor());
        let stages: Vec<ShaderStage> = self.shaders.keys().copied().collect();
        let Some(first) = stages.first().copied() else {
            return Err(Error::not_set(format!("shader stages of pass '{}'", self.name)));
        };

        let mut all_compiled = true;
        let mut link_entry = PathHandle(0);
        for stage in &stages {
            let annotated = self.source(*stage, dirref, loader, session)?;
            if *stage == first {
                link_entry = annotated.entry;
            }
            let output = compiler.compile(*stage, &annotated.source)?;
            normalizer.normalize(
                &output.info_log,
                annotated.entry,
                &session.registry,
                &mut session.log,
            );
            debug!("pass '{}': {} stage compiled: {}", self.name, stage, output.success);
            all_compiled &= output.success;
        }

        let linked = compiler.link(&self.name, &stages)?;
        normalizer.normalize(&linked.info_log, link_entry, &session.registry, &mut session.log);

        self.valid = all_compiled && linked.success;
        info!("pass '{}' built, valid: {}", self.name, self.valid);
        Ok(())
    }

    /// Whether the last build compiled and linked every stage cleanly.
    pub fn is_valid(&self) -> bool {
        self.valid
    }
}
