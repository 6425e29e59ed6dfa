use crate::stage::ShaderStage;
use serde::Serialize;
use std::fmt::{Display, Formatter};

/// Technique, pass and stage listing of an effect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EffectSummary {
    pub techniques: Vec<TechniqueSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TechniqueSummary {
    pub name: String,
    pub passes: Vec<PassSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PassSummary {
    pub name: String,
    /// Every stage, with its entry file when defined.
    pub stages: Vec<(ShaderStage, Option<String>)>,
}

impl Display for EffectSummary {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for technique in &self.techniques {
            writeln!(f, "technique '{}'", technique.name)?;
            for pass in &technique.passes {
                writeln!(f, "  pass '{}'", pass.name)?;
                for (stage, path) in &pass.stages {
                    match path {
                        Some(path) => writeln!(f, "    {}:\t\"{}\"", stage, path)?,
                        None => writeln!(f, "    {}:\tnot defined", stage)?,
                    }
                }
            }
        }
        Ok(())
    }
}
