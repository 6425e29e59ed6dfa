use crate::compiler::ShaderCompiler;
use crate::session::CompileSession;
use crate::summary::{EffectSummary, PassSummary, TechniqueSummary};
use crate::stage::ShaderStage;
use crate::technique::Technique;
use fx_core::vfs::SourceLoader;
use fx_core::{Error, Result};
use std::collections::BTreeMap;
use tracing::debug;

/// An effect file: named techniques whose shader paths are relative to the
/// directory the effect lives in.
#[derive(Debug, Clone)]
pub struct Effect {
    filename: String,
    dirref: String,
    techniques: BTreeMap<String, Technique>,
}

impl Effect {
    pub fn new(filename: impl Into<String>) -> Self {
        let filename = filename.into();
        let dirref = match filename.rfind('/') {
            Some(idx) => filename[..idx].to_string(),
            None => ".".to_string(),
        };
        Self {
            filename,
            dirref,
            techniques: BTreeMap::new(),
        }
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Directory every path referenced by the effect is relative to.
    pub fn dirref(&self) -> &str {
        &self.dirref
    }

    pub fn resolve_path(&self, path: &str) -> String {
        format!("{}/{}", self.dirref, path)
    }

    /// Returns the technique called `name`, creating it when absent.
    pub fn technique_new(&mut self, name: &str) -> &mut Technique {
        self.techniques
            .entry(name.to_string())
            .or_insert_with(|| Technique::new(name))
    }

    pub fn technique(&self, name: &str) -> Result<&Technique> {
        self.techniques
            .get(name)
            .ok_or_else(|| Error::not_found(format!("technique '{}'", name)))
    }

    /// Techniques ordered by name.
    pub fn techniques(&self) -> impl Iterator<Item = &Technique> {
        self.techniques.values()
    }

    /// Builds every pass of every technique, stopping at the first
    /// preprocessing failure. Diagnostics accumulate in `session.log`.
    pub fn compile(
        &mut self,
        compiler: &mut dyn ShaderCompiler,
        loader: &dyn SourceLoader,
        session: &mut CompileSession,
    ) -> Result<()> {
        debug!("compiling effect {}", self.filename);
        for technique in self.techniques.values_mut() {
            technique.compile(&self.dirref, compiler, loader, session)?;
        }
        Ok(())
    }

    /// Valid when every pass of every technique is valid.
    pub fn is_valid(&self) -> bool {
        self.techniques.values().all(Technique::is_valid)
    }

    pub fn enumerate(&self) -> EffectSummary {
        EffectSummary {
            techniques: self
                .techniques()
                .map(|technique| TechniqueSummary {
                    name: technique.name().to_string(),
                    passes: technique
                        .passes()
                        .map(|pass| PassSummary {
                            name: pass.name().to_string(),
                            stages: ShaderStage::ALL
                                .into_iter()
                                .map(|stage| (stage, pass.path(stage).ok().map(str::to_string)))
                                .collect(),
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}
