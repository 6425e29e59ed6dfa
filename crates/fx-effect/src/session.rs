use fx_core::{DiagnosticLog, PathRegistry, PreprocessorConfig};

/// State owned by one compile attempt. Give each concurrent compile its own
/// session; nothing in here is shared.
#[derive(Debug, Default)]
pub struct CompileSession {
    pub registry: PathRegistry,
    pub log: DiagnosticLog,
    pub config: PreprocessorConfig,
}

impl CompileSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: PreprocessorConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }
}
