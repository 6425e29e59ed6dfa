//! Include flattening for GLSL sources.
//!
//! GLSL has no `#include`, so the preprocessor splices every referenced file
//! into one compilable string. Around each splice it writes `#line <n> <handle>`
//! markers so that compiler diagnostics against the flattened text can be
//! attributed to the original file and line. Every other directive is left for
//! the shader compiler.

use crate::config::PreprocessorConfig;
use crate::diagnostics::DiagnosticLog;
use crate::error::{open_failure_message, Error, Result};
use crate::lines::{lines, Line};
use crate::registry::{PathHandle, PathRegistry};
use crate::vfs::SourceLoader;
use std::fmt::{Display, Formatter};
use tracing::{debug, trace, warn};

const INCLUDE_KEYWORD: &str = "include";

/// `#line <line> <handle>`: the next line of the flattened text is line
/// `line` of the file registered as `handle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineMarker {
    pub line: u32,
    pub handle: PathHandle,
}

impl LineMarker {
    pub fn new(line: u32, handle: PathHandle) -> Self {
        Self { line, handle }
    }

    /// Parses a marker line written by [`Display`]. Returns `None` for anything else.
    pub fn parse(text: &str) -> Option<Self> {
        let rest = text.trim().strip_prefix('#')?;
        let rest = rest.trim_start().strip_prefix("line")?;
        let mut fields = rest.split_whitespace();
        let line = fields.next()?.parse().ok()?;
        let handle = fields.next()?.parse().ok()?;
        if fields.next().is_some() {
            return None;
        }
        Some(Self { line, handle })
    }
}

impl Display for LineMarker {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "#line {} {}", self.line, self.handle)
    }
}

/// Output of a successful preprocessing run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedSource {
    /// Flattened source with line markers around every splice.
    pub source: String,
    /// Handle of the entry file.
    pub entry: PathHandle,
    /// Every file read, entry first, in the order they were first opened.
    pub dependencies: Vec<String>,
}

impl AnnotatedSource {
    /// Maps a 1-based line of the flattened source back to `(path, line)` in
    /// the file it came from. Marker lines themselves map to nothing.
    pub fn origin_of<'r>(
        &self,
        flattened_line: u32,
        registry: &'r PathRegistry,
    ) -> Option<(&'r str, u32)> {
        let mut handle = self.entry;
        let mut next = 1;
        for line in lines(&self.source) {
            if let Some(marker) = LineMarker::parse(line.content()) {
                if line.number == flattened_line {
                    return None;
                }
                handle = marker.handle;
                next = marker.line;
                continue;
            }
            if line.number == flattened_line {
                return registry.retrieve(handle).ok().map(|path| (path, next));
            }
            next += 1;
        }
        None
    }
}

#[derive(Debug, PartialEq, Eq)]
enum LineKind<'a> {
    Include(&'a str),
    MalformedInclude,
    Text,
}

fn is_blank(c: char) -> bool {
    c == ' ' || c == '\t'
}

/// Classifies one line: `#include "x"`, `#include <x>`, a broken include, or
/// anything else (source text and other directives).
fn classify(text: &str) -> LineKind<'_> {
    let Some(rest) = text.trim_start_matches(is_blank).strip_prefix('#') else {
        return LineKind::Text;
    };
    let Some(rest) = rest.trim_start_matches(is_blank).strip_prefix(INCLUDE_KEYWORD) else {
        return LineKind::Text;
    };
    if rest.starts_with(|c: char| c.is_ascii_alphanumeric() || c == '_') {
        return LineKind::Text;
    }

    let mut chars = rest.trim_start_matches(is_blank).chars();
    let close = match chars.next() {
        Some('"') => '"',
        Some('<') => '>',
        _ => return LineKind::MalformedInclude,
    };
    let body = chars.as_str();
    match body.find(close) {
        Some(end) => LineKind::Include(&body[..end]),
        None => LineKind::MalformedInclude,
    }
}

pub struct Preprocessor<'a> {
    loader: &'a dyn SourceLoader,
    base_dir: String,
    config: PreprocessorConfig,
}

impl<'a> Preprocessor<'a> {
    pub fn new(loader: &'a dyn SourceLoader, base_dir: impl Into<String>) -> Self {
        Self {
            loader,
            base_dir: base_dir.into(),
            config: PreprocessorConfig::default(),
        }
    }

    pub fn with_config(mut self, config: PreprocessorConfig) -> Self {
        self.config = config;
        self
    }

    /// `base_dir + "/" + referenced`, with no normalisation.
    pub fn resolve(&self, referenced: &str) -> String {
        format!("{}/{}", self.base_dir, referenced)
    }

    /// Flattens `entry` and everything it includes.
    ///
    /// A missing file, an include cycle or a too deep include chain appends one
    /// diagnostic to `log` and aborts; a malformed directive aborts without one.
    pub fn run(
        &self,
        entry: &str,
        registry: &mut PathRegistry,
        log: &mut DiagnosticLog,
    ) -> Result<AnnotatedSource> {
        let contents = match self.loader.load(entry) {
            Ok(contents) => contents,
            Err(source) => {
                warn!("cannot open shader source {}: {}", entry, source);
                log.message(0, entry, "error", "", open_failure_message(entry, &source));
                return Err(Error::IncludeNotFound {
                    path: entry.to_string(),
                    source,
                });
            }
        };

        let mut flattener = Flattener {
            preprocessor: self,
            registry,
            log,
            out: String::with_capacity(contents.len()),
            stack: Vec::new(),
            dependencies: vec![entry.to_string()],
        };
        let handle = flattener.flatten(entry, &contents, 0)?;

        debug!(
            "flattened {} ({} files, {} bytes)",
            entry,
            flattener.dependencies.len(),
            flattener.out.len()
        );
        if self.config.trace_sources {
            trace!("shader source:\n{}", flattener.out);
        }

        Ok(AnnotatedSource {
            source: flattener.out,
            entry: handle,
            dependencies: flattener.dependencies,
        })
    }
}

struct Flattener<'p, 'a, 's> {
    preprocessor: &'p Preprocessor<'a>,
    registry: &'s mut PathRegistry,
    log: &'s mut DiagnosticLog,
    out: String,
    /// Files currently being flattened, outermost first.
    stack: Vec<String>,
    dependencies: Vec<String>,
}

impl Flattener<'_, '_, '_> {
    fn flatten(&mut self, path: &str, contents: &str, depth: usize) -> Result<PathHandle> {
        let handle = self.registry.store(path);
        self.stack.push(path.to_string());

        for line in lines(contents) {
            match classify(line.content()) {
                LineKind::Text => self.out.push_str(line.raw),
                LineKind::Include(target) => self.include(path, handle, &line, target, depth)?,
                LineKind::MalformedInclude => {
                    return Err(Error::MalformedInclude {
                        file: path.to_string(),
                        line: line.number,
                        directive: line.content().to_string(),
                    });
                }
            }
        }

        self.stack.pop();
        Ok(handle)
    }

    fn include(
        &mut self,
        referrer: &str,
        referrer_handle: PathHandle,
        line: &Line<'_>,
        target: &str,
        depth: usize,
    ) -> Result<()> {
        let resolved = self.preprocessor.resolve(target);

        if self.stack.iter().any(|open| open == &resolved) {
            let mut chain = self.stack.clone();
            chain.push(resolved.clone());
            self.log.message(
                line.number,
                referrer,
                "error",
                "",
                format!("{}: recursive include", resolved),
            );
            return Err(Error::IncludeCycle {
                path: resolved,
                chain,
            });
        }

        let limit = self.preprocessor.config.max_include_depth;
        if depth + 1 > limit {
            self.log.message(
                line.number,
                referrer,
                "error",
                "",
                format!("{}: include nested deeper than {}", resolved, limit),
            );
            return Err(Error::IncludeDepthExceeded {
                path: resolved,
                limit,
            });
        }

        let contents = match self.preprocessor.loader.load(&resolved) {
            Ok(contents) => contents,
            Err(source) => {
                warn!(
                    "{}:{}: cannot include {}: {}",
                    referrer, line.number, resolved, source
                );
                self.log.message(
                    line.number,
                    referrer,
                    "error",
                    "",
                    open_failure_message(&resolved, &source),
                );
                return Err(Error::IncludeNotFound {
                    path: resolved,
                    source,
                });
            }
        };
        if !self.dependencies.contains(&resolved) {
            self.dependencies.push(resolved.clone());
        }

        let included = self.registry.store(&resolved);
        trace!("{}:{}: splicing {} as {}", referrer, line.number, resolved, included);
        self.push_marker(LineMarker::new(1, included));
        self.flatten(&resolved, &contents, depth + 1)?;

        if !self.out.is_empty() && !self.out.ends_with('\n') {
            self.out.push('\n');
        }
        self.push_marker(LineMarker::new(line.number + 1, referrer_handle));
        Ok(())
    }

    fn push_marker(&mut self, marker: LineMarker) {
        self.out.push_str(&marker.to_string());
        self.out.push('\n');
    }
}
