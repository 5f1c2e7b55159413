//! Integration tests for the shortcut pipeline.
//!
//! These run the builder end to end against temporary folders. Icon
//! extraction is exercised with a fake `wrestool` shell script.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use wineshortcut_core::shortcut::{DestinationKind, IconOrigin};
use wineshortcut_core::{
    IconError, IconExtractor, Options, ShortcutBuilder, ShortcutError, ShortcutOutcome,
    ShortcutRequest, ShortcutWriter,
};

/// A test environment: an executable, a desktop folder and a menu folder.
struct TestEnv {
    dir: TempDir,
}

impl TestEnv {
    fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        fs::create_dir_all(dir.path().join("games")).unwrap();
        fs::create_dir_all(dir.path().join("Desktop")).unwrap();
        fs::create_dir_all(dir.path().join("menu")).unwrap();
        fs::write(dir.path().join("games/App.exe"), b"MZ").unwrap();
        Self { dir }
    }

    fn root(&self) -> &Path {
        self.dir.path()
    }

    fn exe(&self) -> PathBuf {
        self.root().join("games/App.exe")
    }

    fn writer(&self) -> ShortcutWriter {
        ShortcutWriter::with_dirs(self.root().join("Desktop"), self.root().join("menu"))
    }

    fn request(&self, options: Options) -> ShortcutRequest {
        ShortcutRequest::resolve(&self.exe(), options, self.root()).unwrap()
    }

    fn builder(&self, options: Options) -> ShortcutBuilder {
        ShortcutBuilder::new(self.request(options))
            .with_extractor(NoIcon)
            .with_writer(self.writer())
    }

    /// Every file below the root, for before/after comparisons.
    fn snapshot(&self) -> Vec<(PathBuf, Vec<u8>)> {
        let mut files = Vec::new();
        let mut stack = vec![self.root().to_path_buf()];
        while let Some(dir) = stack.pop() {
            for entry in fs::read_dir(&dir).unwrap() {
                let path = entry.unwrap().path();
                if path.is_dir() {
                    stack.push(path);
                } else {
                    let content = fs::read(&path).unwrap();
                    files.push((path, content));
                }
            }
        }
        files.sort();
        files
    }
}

struct NoIcon;

impl IconExtractor for NoIcon {
    fn extract(&self, exe: &Path, _dest: &Path) -> Result<Option<PathBuf>, IconError> {
        Err(IconError::NoSuitableResource(exe.to_path_buf()))
    }
}

fn run(builder: &ShortcutBuilder) -> (ShortcutOutcome, String) {
    let mut out = Vec::new();
    let outcome = builder.run(&mut out).unwrap();
    (outcome, String::from_utf8(out).unwrap())
}

fn line<'a>(content: &'a str, key: &str) -> Option<&'a str> {
    content.lines().find(|l| l.starts_with(key))
}

#[test]
fn test_missing_input_aborts() {
    let env = TestEnv::new();
    let err = ShortcutRequest::resolve(
        &env.root().join("games/Missing.exe"),
        Options::default(),
        env.root(),
    )
    .unwrap_err();

    assert!(matches!(err, ShortcutError::InputNotFound(_)));
}

#[test]
fn test_default_writes_to_working_directory() {
    let env = TestEnv::new();
    let (outcome, printed) = run(&env.builder(Options::default()));

    assert!(printed.is_empty());
    let ShortcutOutcome::Written(report) = outcome else {
        panic!("expected files to be written");
    };
    let path = env.root().join("App.desktop");
    assert_eq!(report.written, vec![path.clone()]);

    let content = fs::read_to_string(&path).unwrap();
    assert_eq!(line(&content, "Name="), Some("Name=App"));
    assert_eq!(line(&content, "StartupWMClass="), Some("StartupWMClass=App.exe"));
    assert_eq!(
        line(&content, "Path="),
        Some(format!("Path={}", env.root().join("games").display()).as_str())
    );
    // Extraction failed, so there is no icon line at all
    assert!(line(&content, "Icon").is_none());
    assert!(wineshortcut_core::platform::is_executable(&path));
}

#[test]
fn test_dry_run_never_touches_disk() {
    let env = TestEnv::new();
    let before = env.snapshot();

    let options = Options {
        output: Some(env.root().join("games")),
        desktop: Some(true),
        menu: Some(true),
        print: Some(true),
        categories: Some("Game;Utility".into()),
        prefix: Some(PathBuf::from("/home/user/.wine-games")),
        ..Default::default()
    };
    let (outcome, printed) = run(&env.builder(options));

    assert_eq!(env.snapshot(), before);
    let ShortcutOutcome::Printed(content) = outcome else {
        panic!("expected a dry run");
    };
    assert_eq!(printed, content);
    assert!(content.starts_with("[Desktop Entry]\n"));
    assert_eq!(line(&content, "Categories="), Some("Categories=Wine;Game;Utility"));
    assert_eq!(
        line(&content, "Exec="),
        Some(
            format!(
                "Exec=env WINEPREFIX=\"/home/user/.wine-games\" wine start /unix \"{}\"",
                env.exe().display()
            )
            .as_str()
        )
    );
}

#[test]
fn test_missing_output_folder_does_not_block_others() {
    let env = TestEnv::new();
    let options = Options {
        output: Some(env.root().join("does-not-exist")),
        desktop: Some(true),
        menu: Some(true),
        ..Default::default()
    };
    let (outcome, _) = run(&env.builder(options));

    let ShortcutOutcome::Written(report) = outcome else {
        panic!("expected files to be written");
    };
    assert_eq!(
        report.written,
        vec![
            env.root().join("Desktop/App.desktop"),
            env.root().join("menu/App.desktop"),
        ]
    );
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].kind, DestinationKind::Output);
    assert!(matches!(
        report.skipped[0].error,
        ShortcutError::DestinationMissing(_)
    ));
}

#[test]
fn test_existing_icon_is_reused() {
    let env = TestEnv::new();
    let icon = env.root().join("games/App.png");
    fs::write(&icon, b"old icon").unwrap();

    let builder = env.builder(Options::default());
    let resolved = wineshortcut_core::shortcut::resolve_icon(builder.request(), &NoIcon);
    assert_eq!(resolved.origin, IconOrigin::Reused);

    let content = builder.build().render();
    assert_eq!(
        line(&content, "Icon="),
        Some(format!("Icon={}", icon.display()).as_str())
    );
    assert_eq!(fs::read(&icon).unwrap(), b"old icon");
}

#[test]
fn test_theme_icon_name_is_embedded() {
    let env = TestEnv::new();
    let options = Options {
        icon: Some("wine".into()),
        print: Some(true),
        ..Default::default()
    };
    let (_, printed) = run(&env.builder(options));
    assert_eq!(line(&printed, "Icon="), Some("Icon=wine"));
}

#[cfg(unix)]
mod wrestool {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use std::time::Duration;
    use wineshortcut_core::WrestoolExtractor;

    /// Fake wrestool: prints a fixed listing for `-l`, and for `-x` writes
    /// its arguments to the `--output=` file. With `raw_only` it only
    /// produces a file when `--raw` is given.
    fn fake_wrestool(dir: &Path, raw_only: bool) -> PathBuf {
        let script = format!(
            r#"#!/bin/sh
if [ "$1" = "-l" ]; then
  echo "--type=14 --name=1 --language=1033 [type=group_icon offset=0x1000 size=16]"
  echo "--type=14 --name=2 --language=1033 [type=group_icon offset=0x2000 size=48]"
  echo "--type=3 --name=3 --language=1033 [type=icon offset=0x3000 size=256]"
  exit 0
fi
raw=0
for arg in "$@"; do
  case "$arg" in
    --raw) raw=1 ;;
    --output=*) out="${{arg#--output=}}" ;;
  esac
done
if [ {raw_only} -eq 1 ] && [ $raw -eq 0 ]; then
  exit 0
fi
echo "$@" > "$out"
"#,
            raw_only = if raw_only { 1 } else { 0 }
        );

        let path = dir.join("fake-wrestool");
        fs::write(&path, script).unwrap();
        let mut permissions = fs::metadata(&path).unwrap().permissions();
        permissions.set_mode(0o755);
        fs::set_permissions(&path, permissions).unwrap();
        path
    }

    #[test]
    fn test_largest_group_icon_is_extracted() {
        let env = TestEnv::new();
        let tool = fake_wrestool(env.root(), false);
        let extractor = WrestoolExtractor::new(tool.to_string_lossy(), Duration::from_secs(10));

        let dest = env.root().join("games/App.png");
        let written = extractor.extract(&env.exe(), &dest).unwrap();
        assert_eq!(written, Some(dest.clone()));

        let args = fs::read_to_string(&dest).unwrap();
        assert!(args.contains("--name=2"));
        assert!(args.contains("--type=14"));
        assert!(args.contains("--language=1033"));
        assert!(!args.contains("--raw"));
    }

    #[test]
    fn test_raw_mode_fallback() {
        let env = TestEnv::new();
        let tool = fake_wrestool(env.root(), true);
        let extractor = WrestoolExtractor::new(tool.to_string_lossy(), Duration::from_secs(10));

        let dest = env.root().join("games/App.png");
        extractor.extract(&env.exe(), &dest).unwrap();

        let args = fs::read_to_string(&dest).unwrap();
        assert!(args.starts_with("-x --raw"));
        assert!(args.contains("--name=2"));
    }

    #[test]
    fn test_tool_timeout() {
        let env = TestEnv::new();
        let tool = env.root().join("slow-wrestool");
        fs::write(&tool, "#!/bin/sh\nsleep 5\n").unwrap();
        let mut permissions = fs::metadata(&tool).unwrap().permissions();
        permissions.set_mode(0o755);
        fs::set_permissions(&tool, permissions).unwrap();

        let extractor =
            WrestoolExtractor::new(tool.to_string_lossy(), Duration::from_millis(200));
        let err = extractor
            .extract(&env.exe(), &env.root().join("games/App.png"))
            .unwrap_err();
        assert!(matches!(err, IconError::Timeout { .. }));
    }

    #[test]
    fn test_pipeline_embeds_extracted_icon() {
        let env = TestEnv::new();
        let tool = fake_wrestool(env.root(), false);
        let options = Options {
            tool: Some(tool.to_string_lossy().into_owned()),
            ..Default::default()
        };
        let builder =
            ShortcutBuilder::new(env.request(options)).with_writer(env.writer());

        let (outcome, _) = run(&builder);
        assert!(matches!(outcome, ShortcutOutcome::Written(_)));

        let content = fs::read_to_string(env.root().join("App.desktop")).unwrap();
        assert_eq!(
            line(&content, "Icon="),
            Some(format!("Icon={}", env.root().join("games/App.png").display()).as_str())
        );
    }
}
