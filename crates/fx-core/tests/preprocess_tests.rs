use fx_core::error::ErrorKind;
use fx_core::vfs::{FsError, FsResult, InMemoryFileSystem, NativeFileSystem, SourceLoader};
use fx_core::{
    DiagnosticLog, Error, LogEntry, PathHandle, PathRegistry, Preprocessor, PreprocessorConfig,
};
use pretty_assertions::assert_eq;

fn run(
    fs: &InMemoryFileSystem,
    entry: &str,
) -> (fx_core::Result<fx_core::AnnotatedSource>, PathRegistry, DiagnosticLog) {
    let mut registry = PathRegistry::new();
    let mut log = DiagnosticLog::new();
    let result = Preprocessor::new(fs, "fx").run(entry, &mut registry, &mut log);
    (result, registry, log)
}

#[test]
fn include_is_spliced_between_markers() {
    let fs = InMemoryFileSystem::new();
    fs.insert(
        "fx/a.glsl",
        "#version 150\n#include \"b.glsl\"\nvoid main() {}\n",
    );
    fs.insert("fx/b.glsl", "uniform vec4 tint;\n");

    let (result, registry, log) = run(&fs, "fx/a.glsl");
    let annotated = result.expect("preprocess");

    assert_eq!(
        annotated.source,
        "#version 150\n#line 1 1\nuniform vec4 tint;\n#line 3 0\nvoid main() {}\n"
    );
    assert!(!annotated.source.contains("#include"));
    assert_eq!(annotated.entry, PathHandle(0));
    assert_eq!(registry.retrieve(PathHandle(1)).unwrap(), "fx/b.glsl");
    assert_eq!(annotated.dependencies, vec!["fx/a.glsl", "fx/b.glsl"]);
    assert!(log.is_empty());
}

#[test]
fn nested_and_angle_includes() {
    let fs = InMemoryFileSystem::new();
    fs.insert("fx/main.frag", "#include <lib/light.glsl>\nout vec4 color;\n");
    fs.insert(
        "fx/lib/light.glsl",
        "// lighting\n#include \"lib/math.glsl\"\nvec3 light();\n",
    );
    fs.insert("fx/lib/math.glsl", "float sq(float x) { return x * x; }");

    let (result, _, _) = run(&fs, "fx/main.frag");
    let annotated = result.expect("preprocess");

    assert_eq!(
        annotated.source,
        concat!(
            "#line 1 1\n",
            "// lighting\n",
            "#line 1 2\n",
            "float sq(float x) { return x * x; }\n",
            "#line 3 1\n",
            "vec3 light();\n",
            "#line 2 0\n",
            "out vec4 color;\n",
        )
    );
}

#[test]
fn shared_include_keeps_one_handle() {
    let fs = InMemoryFileSystem::new();
    fs.insert("fx/a.glsl", "#include \"c.glsl\"\n#include \"c.glsl\"\n");
    fs.insert("fx/c.glsl", "const int N = 4;\n");

    let (result, registry, _) = run(&fs, "fx/a.glsl");
    let annotated = result.expect("preprocess");

    assert_eq!(registry.len(), 2);
    assert_eq!(annotated.dependencies.len(), 2);
    assert_eq!(annotated.source.matches("#line 1 1\n").count(), 2);
}

#[test]
fn other_directives_are_copied() {
    let fs = InMemoryFileSystem::new();
    let source = "#version 330\n#define PI 3.14\n#ifdef PI\nfloat x = PI;\n#endif\n";
    fs.insert("fx/a.glsl", source);

    let (result, _, _) = run(&fs, "fx/a.glsl");
    assert_eq!(result.expect("preprocess").source, source);
}

#[test]
fn missing_include_reports_referrer_and_line() {
    let fs = InMemoryFileSystem::new();
    fs.insert("fx/a.glsl", "#version 150\n\n#include \"missing.glsl\"\n");

    let (result, _, log) = run(&fs, "fx/a.glsl");
    let err = result.unwrap_err();

    assert!(matches!(&err, Error::IncludeNotFound { path, .. } if path == "fx/missing.glsl"));
    assert_eq!(err.kind(), ErrorKind::Io);
    assert_eq!(log.len(), 1);
    let entry = log.entries()[0].as_structured().unwrap();
    assert_eq!(entry.file, "fx/a.glsl");
    assert_eq!(entry.line, 3);
    assert_eq!(entry.severity, "error");
    assert!(entry.message.contains("missing.glsl"));
}

#[test]
fn missing_entry_file() {
    let fs = InMemoryFileSystem::new();
    let (result, registry, log) = run(&fs, "fx/nothing.vert");

    assert!(matches!(result, Err(Error::IncludeNotFound { .. })));
    assert!(registry.is_empty());
    assert_eq!(log.len(), 1);
    assert_eq!(
        log.entries()[0].to_string(),
        "fx/nothing.vert:0 error : fx/nothing.vert: No such file or directory"
    );
}

#[test]
fn malformed_include_has_no_diagnostic() {
    let fs = InMemoryFileSystem::new();
    fs.insert("fx/a.glsl", "void f();\n#include 'b.glsl'\n");

    let (result, _, log) = run(&fs, "fx/a.glsl");
    let err = result.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Token);
    assert!(matches!(err, Error::MalformedInclude { line: 2, .. }));
    assert!(log.is_empty());
}

#[test]
fn include_cycle_is_rejected() {
    let fs = InMemoryFileSystem::new();
    fs.insert("fx/a.glsl", "#include \"b.glsl\"\n");
    fs.insert("fx/b.glsl", "int b;\n#include \"a.glsl\"\n");

    let mut registry = PathRegistry::new();
    let mut log = DiagnosticLog::new();
    let result = Preprocessor::new(&fs, "fx").run("fx/a.glsl", &mut registry, &mut log);

    match result {
        Err(Error::IncludeCycle { path, chain }) => {
            assert_eq!(path, "fx/a.glsl");
            assert_eq!(chain, vec!["fx/a.glsl", "fx/b.glsl", "fx/a.glsl"]);
        }
        other => panic!("expected include cycle, got {:?}", other),
    }
    let entry = log.entries()[0].as_structured().unwrap();
    assert_eq!((entry.file.as_str(), entry.line), ("fx/b.glsl", 2));
}

#[test]
fn self_include_through_other_spelling_is_a_cycle() {
    let fs = InMemoryFileSystem::new();
    fs.insert("fx/./a.glsl", "#include \"./a.glsl\"\n");

    let (result, _, log) = run(&fs, "fx/./a.glsl");

    match result {
        Err(Error::IncludeCycle { path, chain }) => {
            assert_eq!(path, "fx/./a.glsl");
            assert_eq!(chain, vec!["fx/./a.glsl", "fx/./a.glsl"]);
        }
        other => panic!("expected include cycle, got {:?}", other),
    }
    assert_eq!(log.len(), 1);
}

#[test]
fn deep_chain_stops_at_limit() {
    let fs = InMemoryFileSystem::new();
    for i in 0..6 {
        fs.insert(format!("fx/{}.glsl", i), format!("#include \"{}.glsl\"\n", i + 1));
    }
    fs.insert("fx/6.glsl", "int leaf;\n");

    let config = PreprocessorConfig {
        max_include_depth: 3,
        ..PreprocessorConfig::default()
    };
    let mut registry = PathRegistry::new();
    let mut log = DiagnosticLog::new();
    let result = Preprocessor::new(&fs, "fx")
        .with_config(config)
        .run("fx/0.glsl", &mut registry, &mut log);

    assert!(matches!(
        result,
        Err(Error::IncludeDepthExceeded { ref path, .. }) if path == "fx/4.glsl"
    ));
}

#[test]
fn origin_of_maps_flattened_lines_back() {
    let fs = InMemoryFileSystem::new();
    fs.insert("fx/a.glsl", "#version 150\n#include \"b.glsl\"\nvoid main() {}\n");
    fs.insert("fx/b.glsl", "uniform vec4 tint;\nuniform float gain;\n");

    let (result, registry, _) = run(&fs, "fx/a.glsl");
    let annotated = result.expect("preprocess");

    assert_eq!(annotated.origin_of(1, &registry), Some(("fx/a.glsl", 1)));
    assert_eq!(annotated.origin_of(2, &registry), None);
    assert_eq!(annotated.origin_of(4, &registry), Some(("fx/b.glsl", 2)));
    assert_eq!(annotated.origin_of(6, &registry), Some(("fx/a.glsl", 3)));
    assert_eq!(annotated.origin_of(42, &registry), None);
}

#[test]
fn log_preserves_production_order() {
    let fs = InMemoryFileSystem::new();
    fs.insert("fx/a.glsl", "#include \"gone.glsl\"\n");

    let mut registry = PathRegistry::new();
    let mut log = DiagnosticLog::new();
    log.generic("earlier");
    let _ = Preprocessor::new(&fs, "fx").run("fx/a.glsl", &mut registry, &mut log);
    fx_core::DiagnosticNormalizer::new(fx_core::Vendor::Other).normalize(
        "later\n",
        PathHandle(0),
        &registry,
        &mut log,
    );

    let messages: Vec<_> = log.iter().map(LogEntry::message).collect();
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[0], "earlier");
    assert!(messages[1].contains("gone.glsl"));
    assert_eq!(messages[2], "later");
}

#[test]
fn native_filesystem_includes() {
    let dir = tempfile::tempdir().unwrap();
    let base = dir.path().to_string_lossy().to_string();
    std::fs::write(dir.path().join("main.vert"), "#include \"common.glsl\"\nvoid main() {}\n")
        .unwrap();
    std::fs::write(dir.path().join("common.glsl"), "in vec3 pos;\n").unwrap();

    let fs = NativeFileSystem::new();
    let entry = format!("{}/main.vert", base);
    let mut registry = PathRegistry::new();
    let mut log = DiagnosticLog::new();
    let annotated = Preprocessor::new(&fs, base.clone())
        .run(&entry, &mut registry, &mut log)
        .expect("preprocess");

    assert_eq!(annotated.source, "#line 1 1\nin vec3 pos;\n#line 2 0\nvoid main() {}\n");
    assert_eq!(
        registry.retrieve(PathHandle(1)).unwrap(),
        format!("{}/common.glsl", base)
    );
}

/// Finds every file but cannot decode any of them.
struct BinaryFileSystem;

impl SourceLoader for BinaryFileSystem {
    fn load(&self, path: &str) -> FsResult<String> {
        Err(FsError::InvalidUtf8 {
            path: path.to_string(),
        })
    }
}

#[test]
fn unreadable_entry_reports_the_real_cause() {
    let mut registry = PathRegistry::new();
    let mut log = DiagnosticLog::new();
    let err = Preprocessor::new(&BinaryFileSystem, "fx")
        .run("fx/a.glsl", &mut registry, &mut log)
        .unwrap_err();

    assert_eq!(err.to_string(), "fx/a.glsl: not valid UTF-8");
    assert_eq!(log.entries()[0].message(), err.to_string());
}

#[test]
fn unreadable_include_reports_the_real_cause() {
    let fs = InMemoryFileSystem::new();
    fs.insert("fx/a.glsl", "#include \"b.glsl\"\n");
    let loader = |path: &str| -> FsResult<String> {
        if path == "fx/b.glsl" {
            Err(FsError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "permission denied",
            )))
        } else {
            fs.load(path)
        }
    };
    let loader = FnLoader(loader);

    let mut registry = PathRegistry::new();
    let mut log = DiagnosticLog::new();
    let err = Preprocessor::new(&loader, "fx")
        .run("fx/a.glsl", &mut registry, &mut log)
        .unwrap_err();

    assert_eq!(err.to_string(), "fx/b.glsl: permission denied");
    assert_eq!(
        log.entries()[0].to_string(),
        "fx/a.glsl:1 error : fx/b.glsl: permission denied"
    );
}

struct FnLoader<F>(F);

impl<F> SourceLoader for FnLoader<F>
where
    F: Fn(&str) -> FsResult<String> + Send + Sync,
{
    fn load(&self, path: &str) -> FsResult<String> {
        (self.0)(path)
    }
}

#[test]
fn crlf_sources_keep_their_terminators() {
    let fs = InMemoryFileSystem::new();
    fs.insert(
        "fx/a.glsl",
        "#version 150\r\n#include \"b.glsl\"\r\nvoid main() {}\r\n",
    );
    fs.insert("fx/b.glsl", "int b;\r\n");

    let (result, registry, log) = run(&fs, "fx/a.glsl");
    let annotated = result.expect("preprocess");

    assert_eq!(
        annotated.source,
        "#version 150\r\n#line 1 1\nint b;\r\n#line 3 0\nvoid main() {}\r\n"
    );
    assert!(log.is_empty());
    assert_eq!(annotated.origin_of(3, &registry), Some(("fx/b.glsl", 1)));
    assert_eq!(annotated.origin_of(5, &registry), Some(("fx/a.glsl", 3)));
}
