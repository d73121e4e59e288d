use std::fs;
use std::path::Path;

use sprout::context::TemplateContext;
use sprout::error::Error;
use sprout::processor::{ensure_output_dir, is_rendered_name_valid, FileOperation, Processor};
use sprout::renderer::TokenRenderer;
use sprout::tree::Node;
use tempfile::TempDir;

fn context(pairs: &[(&str, &str)]) -> TemplateContext {
    pairs.iter().copied().collect()
}

fn list_dir(path: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(path)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test_log::test]
fn test_renders_file_contents() {
    let mut tree = Node::empty_dir();
    tree.insert("docs/hello.txt", Node::file("Hello {{author}}, project {{project_name}}."));
    let ctx = context(&[("project_name", "demo"), ("author", "Ada")]);
    let temp = TempDir::new().unwrap();
    let dest = temp.path().join("out");

    let engine = TokenRenderer::new();
    let written = Processor::new(&engine, &ctx).materialize(&tree, &dest).unwrap();

    assert_eq!(
        fs::read_to_string(dest.join("docs/hello.txt")).unwrap(),
        "Hello Ada, project demo."
    );
    assert_eq!(written.len(), 2);
    assert_eq!(written[0].operation, FileOperation::CreateDir);
    assert_eq!(written[1].operation, FileOperation::Render);
}

#[test]
fn test_renders_path_components() {
    let mut tree = Node::empty_dir();
    tree.insert("{{project_slug}}/app.py", Node::file("print('{{project_slug}}')\n"));
    let ctx = context(&[("project_slug", "demo_app")]);
    let temp = TempDir::new().unwrap();

    let engine = TokenRenderer::new();
    Processor::new(&engine, &ctx).materialize(&tree, temp.path()).unwrap();

    assert_eq!(
        fs::read_to_string(temp.path().join("demo_app/app.py")).unwrap(),
        "print('demo_app')\n"
    );
    assert!(!temp.path().join("{{project_slug}}").exists());
}

#[test]
fn test_unknown_tokens_are_kept_in_names_and_contents() {
    let mut tree = Node::empty_dir();
    tree.insert("{{unknown}}.txt", Node::file("${{ matrix.os }} {{ missing }}"));
    let temp = TempDir::new().unwrap();

    let engine = TokenRenderer::new();
    Processor::new(&engine, &TemplateContext::default())
        .materialize(&tree, temp.path())
        .unwrap();

    assert_eq!(
        fs::read_to_string(temp.path().join("{{unknown}}.txt")).unwrap(),
        "${{ matrix.os }} {{ missing }}"
    );
}

#[test]
fn test_binary_files_are_copied_verbatim() {
    let bytes = vec![0x89, b'P', b'N', b'G', 0x00, b'{', b'{', b'a', b'}', b'}', 0xff];
    let mut tree = Node::empty_dir();
    tree.insert("logo.png", Node::file(bytes.clone()));
    let ctx = context(&[("a", "replaced")]);
    let temp = TempDir::new().unwrap();

    let engine = TokenRenderer::new();
    let written = Processor::new(&engine, &ctx).materialize(&tree, temp.path()).unwrap();

    assert_eq!(fs::read(temp.path().join("logo.png")).unwrap(), bytes);
    assert_eq!(written[0].operation, FileOperation::Copy);
}

#[test]
fn test_non_empty_destination_is_left_untouched() {
    let mut tree = Node::empty_dir();
    tree.insert("README.md", Node::file("new"));
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("keep.txt"), "mine").unwrap();

    let engine = TokenRenderer::new();
    let ctx = TemplateContext::default();
    let err = Processor::new(&engine, &ctx).materialize(&tree, temp.path()).unwrap_err();

    assert!(matches!(err, Error::OutputDirectoryNotEmpty { .. }));
    assert_eq!(list_dir(temp.path()), ["keep.txt"]);
    assert_eq!(fs::read_to_string(temp.path().join("keep.txt")).unwrap(), "mine");
}

#[test]
fn test_empty_destination_is_accepted() {
    let mut tree = Node::empty_dir();
    tree.insert("README.md", Node::file("x"));
    let temp = TempDir::new().unwrap();

    let engine = TokenRenderer::new();
    let ctx = TemplateContext::default();
    Processor::new(&engine, &ctx).materialize(&tree, temp.path()).unwrap();
    assert_eq!(list_dir(temp.path()), ["README.md"]);
}

#[test]
fn test_collision_writes_nothing() {
    let mut tree = Node::empty_dir();
    tree.insert("{{a}}.txt", Node::file("one"));
    tree.insert("{{b}}.txt", Node::file("two"));
    let ctx = context(&[("a", "same"), ("b", "same")]);
    let temp = TempDir::new().unwrap();
    let dest = temp.path().join("out");

    let engine = TokenRenderer::new();
    let err = Processor::new(&engine, &ctx).materialize(&tree, &dest).unwrap_err();

    match err {
        Error::PathCollision { first, second, target } => {
            assert_eq!(first, "{{a}}.txt");
            assert_eq!(second, "{{b}}.txt");
            assert_eq!(target, "same.txt");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!dest.exists());
}

#[test]
fn test_case_only_collision_is_rejected() {
    let mut tree = Node::empty_dir();
    tree.insert("README.md", Node::file("one"));
    tree.insert("{{name}}.md", Node::file("two"));
    let ctx = context(&[("name", "readme")]);
    let temp = TempDir::new().unwrap();

    let engine = TokenRenderer::new();
    let err = Processor::new(&engine, &ctx).materialize(&tree, temp.path()).unwrap_err();
    assert!(matches!(err, Error::PathCollision { .. }));
    assert!(list_dir(temp.path()).is_empty());
}

#[test]
fn test_value_with_separator_is_rejected() {
    let mut tree = Node::empty_dir();
    tree.insert("{{package_name}}/__init__.py", Node::file(""));
    let ctx = context(&[("package_name", "a/b")]);
    let temp = TempDir::new().unwrap();

    let engine = TokenRenderer::new();
    let err = Processor::new(&engine, &ctx).materialize(&tree, temp.path()).unwrap_err();
    match err {
        Error::InvalidRenderedPath { template_path, rendered } => {
            assert_eq!(template_path, "{{package_name}}");
            assert_eq!(rendered, "a/b");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[cfg(unix)]
#[test]
fn test_write_failure_keeps_earlier_files() {
    let mut tree = Node::empty_dir();
    tree.insert("a.txt", Node::file("first"));
    tree.insert("{{long}}", Node::file("second"));
    let long = "x".repeat(300);
    let ctx = context(&[("long", long.as_str())]);
    let temp = TempDir::new().unwrap();

    let engine = TokenRenderer::new();
    let err = Processor::new(&engine, &ctx).materialize(&tree, temp.path()).unwrap_err();

    match &err {
        Error::WriteError { path, .. } => {
            assert_eq!(path.file_name().unwrap().len(), 300);
            assert!(path.starts_with(temp.path()));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.to_string().contains("Remove the directory"));
    assert_eq!(fs::read_to_string(temp.path().join("a.txt")).unwrap(), "first");
}

#[test]
fn test_output_is_deterministic() {
    let mut tree = Node::empty_dir();
    tree.insert("{{package_name}}/main.py", Node::file("name = '{{project_name}}'\n"));
    tree.insert("data/blob.bin", Node::file(vec![0u8, 1, 2, 3]));
    tree.insert("README.md", Node::file("# {{project_name}}\n"));
    let ctx = context(&[("project_name", "Demo"), ("package_name", "demo")]);
    let temp = TempDir::new().unwrap();
    let first = temp.path().join("first");
    let second = temp.path().join("second");

    let engine = TokenRenderer::new();
    let processor = Processor::new(&engine, &ctx);
    processor.materialize(&tree, &first).unwrap();
    processor.materialize(&tree, &second).unwrap();

    assert!(!dir_diff::is_different(&first, &second).unwrap());
}

#[cfg(unix)]
#[test]
fn test_permissions_are_preserved() {
    use std::os::unix::fs::PermissionsExt;

    let mut tree = Node::empty_dir();
    tree.insert("bin/run.sh", Node::file("#!/bin/sh\necho {{name}}\n").with_mode(0o755));
    tree.insert("notes.txt", Node::file("read only").with_mode(0o444));
    let ctx = context(&[("name", "demo")]);
    let temp = TempDir::new().unwrap();

    let engine = TokenRenderer::new();
    Processor::new(&engine, &ctx).materialize(&tree, temp.path()).unwrap();

    let mode = |p: &str| fs::metadata(temp.path().join(p)).unwrap().permissions().mode() & 0o777;
    assert_eq!(mode("bin/run.sh"), 0o755);
    assert_eq!(mode("notes.txt"), 0o444);
    assert_eq!(fs::read_to_string(temp.path().join("bin/run.sh")).unwrap(), "#!/bin/sh\necho demo\n");
}

#[test]
fn test_ensure_output_dir() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path();

    assert!(ensure_output_dir(path.join("new_dir")).is_ok());
    assert!(ensure_output_dir(path).is_ok());

    fs::write(path.join("file.txt"), "").unwrap();
    assert!(ensure_output_dir(path).is_err());
    assert!(ensure_output_dir(path.join("file.txt")).is_err());
}

#[test]
fn test_is_rendered_name_valid() {
    assert!(!is_rendered_name_valid(""));
    assert!(!is_rendered_name_valid("  "));
    assert!(!is_rendered_name_valid("."));
    assert!(!is_rendered_name_valid(".."));
    assert!(!is_rendered_name_valid("a/b"));
    assert!(!is_rendered_name_valid("a\\b"));
    assert!(is_rendered_name_valid("filename.txt"));
    assert!(is_rendered_name_valid(".gitignore"));
}
