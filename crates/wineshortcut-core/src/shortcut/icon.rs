//! Icon resolution for launchers.
//!
//! Handles:
//! - Explicit icon files and theme icon names
//! - Reusing a previously extracted icon
//! - Extracting the embedded icon with `wrestool` (from icoutils)
//!
//! Extraction is best-effort. Every failure is logged as a warning and the
//! launcher is written without an `Icon=` line.

use super::request::{IconPolicy, ShortcutRequest};
use crate::config::IconConfig;
use crate::error::IconError;
use regex::Regex;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use std::sync::LazyLock;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"--name=('[^']*'|"[^"]*"|\S+)"#).unwrap());
static TYPE_ID_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"--type=(\S+)").unwrap());
static LANGUAGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"--language=(\S+)").unwrap());
static KIND_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|[\s\[])type=([^\s\]]+)").unwrap());
static SIZE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|[\s\[])size=(\d+)").unwrap());

const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Something that can pull an icon out of a Windows executable.
pub trait IconExtractor {
    /// Extract the best icon of `exe` to `dest`.
    ///
    /// Returns the path of the written icon, or `None` if the extractor
    /// declined to produce one.
    fn extract(&self, exe: &Path, dest: &Path) -> Result<Option<PathBuf>, IconError>;
}

/// One resource descriptor from a `wrestool -l` listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconResource {
    pub name: String,
    /// Value passed back as `--type=` when extracting.
    pub type_id: String,
    /// Symbolic kind such as `group_icon`.
    pub kind: String,
    pub size: u64,
    pub language: Option<String>,
}

impl IconResource {
    fn is_accepted(&self) -> bool {
        IconConfig::ACCEPTED_KINDS
            .iter()
            .any(|kind| kind.eq_ignore_ascii_case(&self.kind))
    }
}

/// Parse `wrestool -l` output.
///
/// Lines without a name, type or size are skipped.
pub fn parse_listing(listing: &str) -> Vec<IconResource> {
    listing.lines().filter_map(parse_line).collect()
}

fn parse_line(line: &str) -> Option<IconResource> {
    let capture = |re: &Regex| re.captures(line).map(|c| c[1].to_string());

    // Named resources and named types are quoted, e.g. `--type='PNG'`
    let name = unquote(&capture(&*NAME_RE)?);
    let type_id = unquote(&capture(&*TYPE_ID_RE)?);
    let size = capture(&*SIZE_RE)?.parse().ok()?;
    let kind = capture(&*KIND_RE).unwrap_or_else(|| kind_for_type_id(&type_id).to_string());

    Some(IconResource {
        name,
        kind,
        type_id,
        size,
        language: capture(&*LANGUAGE_RE),
    })
}

fn unquote(value: &str) -> String {
    value.trim_matches(|c| c == '\'' || c == '"').to_string()
}

fn kind_for_type_id(type_id: &str) -> &str {
    match type_id {
        "3" => "icon",
        "14" => "group_icon",
        other => other,
    }
}

/// Pick the largest resource among the accepted kinds.
///
/// Only a strictly larger resource replaces the current best, so the first
/// of several equal-size resources wins.
pub fn select_best(resources: &[IconResource]) -> Option<&IconResource> {
    resources
        .iter()
        .filter(|r| r.is_accepted())
        .fold(None, |best: Option<&IconResource>, r| match best {
            Some(b) if r.size <= b.size => Some(b),
            _ => Some(r),
        })
}

/// Icon extraction through the `wrestool` command line tool.
pub struct WrestoolExtractor {
    program: String,
    timeout: Duration,
}

impl WrestoolExtractor {
    /// Create an extractor running `program` with a per-invocation timeout.
    pub fn new(program: impl Into<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }

    /// List the resources embedded in `exe`.
    pub fn list(&self, exe: &Path) -> Result<Vec<IconResource>, IconError> {
        let mut cmd = Command::new(&self.program);
        cmd.arg("-l").arg(exe);
        let output = self.run(&mut cmd)?;

        if !output.status.success() {
            return Err(self.failed(&output));
        }

        let resources = parse_listing(&String::from_utf8_lossy(&output.stdout));
        debug!("{} listed {} resources", self.program, resources.len());
        Ok(resources)
    }

    fn extract_resource(
        &self,
        exe: &Path,
        resource: &IconResource,
        dest: &Path,
        raw: bool,
    ) -> Result<Output, IconError> {
        let mut cmd = Command::new(&self.program);
        cmd.arg("-x");
        if raw {
            cmd.arg("--raw");
        }
        cmd.arg(format!("--output={}", dest.display()));
        if let Some(ref language) = resource.language {
            cmd.arg(format!("--language={}", language));
        }
        cmd.arg(format!("--type={}", resource.type_id))
            .arg(format!("--name={}", resource.name))
            .arg(exe);

        self.run(&mut cmd)
    }

    /// Run a command to completion, killing it once the timeout expires.
    fn run(&self, cmd: &mut Command) -> Result<Output, IconError> {
        let mut child = cmd
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => IconError::ToolNotFound {
                    tool: self.program.clone(),
                },
                _ => IconError::Spawn {
                    tool: self.program.clone(),
                    source: e,
                },
            })?;

        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());
        let deadline = Instant::now() + self.timeout;

        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) if Instant::now() >= deadline => {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(IconError::Timeout {
                        tool: self.program.clone(),
                        timeout: self.timeout,
                    });
                }
                Ok(None) => thread::sleep(POLL_INTERVAL),
                Err(e) => {
                    return Err(IconError::Spawn {
                        tool: self.program.clone(),
                        source: e,
                    })
                }
            }
        };

        Ok(Output {
            status,
            stdout: stdout.join().unwrap_or_default(),
            stderr: stderr.join().unwrap_or_default(),
        })
    }

    fn failed(&self, output: &Output) -> IconError {
        IconError::ToolFailed {
            tool: self.program.clone(),
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        }
    }
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> thread::JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_end(&mut buf);
        }
        buf
    })
}

impl IconExtractor for WrestoolExtractor {
    fn extract(&self, exe: &Path, dest: &Path) -> Result<Option<PathBuf>, IconError> {
        let resources = self.list(exe)?;
        let best = select_best(&resources)
            .ok_or_else(|| IconError::NoSuitableResource(exe.to_path_buf()))?;

        debug!(
            "Selected icon resource {} ({}, {} bytes)",
            best.name, best.kind, best.size
        );

        self.extract_resource(exe, best, dest, false)?;
        if dest.is_file() {
            return Ok(Some(dest.to_path_buf()));
        }

        debug!("No icon written by {}, retrying in raw mode", self.program);
        let output = self.extract_resource(exe, best, dest, true)?;
        if dest.is_file() {
            return Ok(Some(dest.to_path_buf()));
        }

        if !output.status.success() {
            return Err(self.failed(&output));
        }
        Err(IconError::NotExtracted(dest.to_path_buf()))
    }
}

/// Where the resolved icon came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconOrigin {
    /// An explicit icon file that exists.
    File,
    /// An explicit value that is not a file, embedded as-is.
    Literal,
    /// A previously extracted icon at the deterministic path.
    Reused,
    /// Freshly extracted from the executable.
    Extracted,
    /// Icons were disabled.
    Skipped,
    /// Resolution failed; no icon.
    Unavailable,
}

/// Outcome of icon resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedIcon {
    pub value: Option<String>,
    pub origin: IconOrigin,
}

impl ResolvedIcon {
    fn some(value: impl Into<String>, origin: IconOrigin) -> Self {
        Self {
            value: Some(value.into()),
            origin,
        }
    }

    fn none(origin: IconOrigin) -> Self {
        Self {
            value: None,
            origin,
        }
    }
}

/// Resolve the icon for a request according to its icon policy.
pub fn resolve_icon(request: &ShortcutRequest, extractor: &dyn IconExtractor) -> ResolvedIcon {
    match &request.icon {
        IconPolicy::Skip => ResolvedIcon::none(IconOrigin::Skipped),
        IconPolicy::Path(icon) => resolve_explicit(icon, request),
        IconPolicy::Auto => resolve_extracted(request, extractor),
    }
}

fn resolve_explicit(icon: &str, request: &ShortcutRequest) -> ResolvedIcon {
    let path = Path::new(icon);
    let path = if path.is_absolute() {
        path.to_path_buf()
    } else {
        request.cwd.join(path)
    };

    if path.is_file() {
        let path = path.canonicalize().unwrap_or(path);
        return ResolvedIcon::some(path.to_string_lossy(), IconOrigin::File);
    }

    if request.strict_icon {
        warn!("Icon {} not found, writing launcher without an icon", icon);
        ResolvedIcon::none(IconOrigin::Unavailable)
    } else {
        warn!("Icon {} not found, using it as an icon name", icon);
        ResolvedIcon::some(icon, IconOrigin::Literal)
    }
}

fn resolve_extracted(request: &ShortcutRequest, extractor: &dyn IconExtractor) -> ResolvedIcon {
    let dest = request.icon_output_path();

    if dest.is_file() {
        warn!("Icon {} already exists, reusing it", dest.display());
        return ResolvedIcon::some(dest.to_string_lossy(), IconOrigin::Reused);
    }

    match extractor.extract(&request.input, &dest) {
        Ok(Some(path)) => {
            info!("Extracted icon to {}", path.display());
            ResolvedIcon::some(path.to_string_lossy(), IconOrigin::Extracted)
        }
        Ok(None) => ResolvedIcon::none(IconOrigin::Unavailable),
        Err(e) => {
            warn!("Could not extract icon: {}", e);
            ResolvedIcon::none(IconOrigin::Unavailable)
        }
    }
}
