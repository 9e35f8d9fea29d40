use std::backtrace::{Backtrace, BacktraceStatus};

/// Frames a goroutine dump spends inside the check/recover machinery before
/// reaching user code.
pub const GOROUTINE_INTERNAL_FRAMES: usize = 4;

/// Modules of this crate whose frames sit between a `check` call site and
/// the backtrace capture.
pub const MACHINERY_MODULES: [&str; 4] = ["diagnostics", "errors", "guard", "recovery"];

/// Module of this crate that hosts the recovery boundary. Its frames, and
/// the unwind-catching wrappers directly inside them, are cut from a trace.
pub const BOUNDARY_MODULE: &str = "recovery";

/// Frames marking the runtime entry point. A trace ends before the first
/// one, like std's short backtraces.
pub const ENTRY_MARKERS: [&str; 2] = ["__rust_begin_short_backtrace", "std::rt::lang_start"];

const RUNTIME_PREFIXES: [&str; 5] = ["std::", "core::", "alloc::", "backtrace_rs::", "__rust"];

pub const UNKNOWN_FILE: &str = "<unknown>";

const SEPARATOR: &str = " :: ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameRecord {
    /// Last path segment of the source file, with its line number.
    pub file: String,
    pub function: String,
}

impl FrameRecord {
    pub fn new(file: impl Into<String>, function: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            function: function.into(),
        }
    }
}

/// Call path of a failure, innermost frame first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Trace {
    frames: Vec<FrameRecord>,
}

impl Trace {
    /// Captures the current call stack, starting at the first frame outside
    /// the check/recover machinery.
    pub fn capture() -> Self {
        Self::from_backtrace(&Backtrace::force_capture())
    }

    /// Resolves a captured backtrace down to user frames. Disabled or
    /// unsupported backtraces give an empty trace.
    pub fn from_backtrace(backtrace: &Backtrace) -> Self {
        if backtrace.status() != BacktraceStatus::Captured {
            return Self::default();
        }
        Self {
            frames: user_frames(parse_backtrace(&backtrace.to_string())),
        }
    }

    pub fn from_goroutine_dump(raw: &str) -> Self {
        Self {
            frames: parse_goroutine_dump(raw),
        }
    }

    pub fn push_frame(&mut self, frame: FrameRecord) {
        self.frames.push(frame);
    }

    pub fn frames(&self) -> &[FrameRecord] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn render(&self, message: &str) -> String {
        render(message, &self.frames)
    }
}

impl From<Vec<FrameRecord>> for Trace {
    fn from(frames: Vec<FrameRecord>) -> Self {
        Self { frames }
    }
}

/// Renders the bordered debug report.
///
/// ```text
/// ------------
/// disk is full
/// ------------
/// main.rs:12  :: app::save
/// lib.rs:3    :: app::run
/// ```
///
/// Both borders are as long as `message` in characters, newlines included.
/// File names are padded to the widest one so the separators line up.
pub fn render(message: &str, frames: &[FrameRecord]) -> String {
    let border = "-".repeat(message.chars().count());
    let width = column_width(frames);

    let mut out = String::new();
    out.push_str(&format!("{border}\n{message}\n{border}\n"));
    for frame in frames {
        out.push_str(&format!(
            "{:<width$}{SEPARATOR}{}\n",
            frame.file, frame.function
        ));
    }
    out
}

pub fn column_width(frames: &[FrameRecord]) -> usize {
    frames
        .iter()
        .map(|frame| frame.file.chars().count())
        .max()
        .unwrap_or(0)
}

/// Parses a goroutine-style dump: a header line, then alternating function
/// and `path:line +offset` lines. An unpaired trailing line is ignored.
pub fn parse_goroutine_dump(raw: &str) -> Vec<FrameRecord> {
    let lines: Vec<&str> = raw.split('\n').collect();
    let mut frames = Vec::new();
    let mut i = 1;
    while i + 1 < lines.len() {
        let location = strip_offset(lines[i + 1]);
        frames.push(FrameRecord::new(file_segment(location), lines[i]));
        i += 2;
    }
    if frames.len() <= GOROUTINE_INTERNAL_FRAMES {
        return Vec::new();
    }
    frames.split_off(GOROUTINE_INTERNAL_FRAMES)
}

/// Parses the listing printed by `std::backtrace::Backtrace`:
///
/// ```text
///    4: app::load
///              at ./src/main.rs:12:5
/// ```
///
/// Inlined symbols share an index and appear as extra name lines.
fn parse_backtrace(text: &str) -> Vec<FrameRecord> {
    let mut frames: Vec<FrameRecord> = Vec::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(location) = line.strip_prefix("at ") {
            if let Some(frame) = frames.last_mut() {
                frame.file = file_segment(drop_column(location)).to_string();
            }
            continue;
        }
        let function = match line.split_once(": ") {
            Some((index, name)) if index.bytes().all(|b| b.is_ascii_digit()) => name,
            _ => line,
        };
        frames.push(FrameRecord::new(UNKNOWN_FILE, function));
    }
    frames
}

/// Drops the capture and check frames at the top, every recovery boundary
/// together with the unwind wrappers just inside it, and everything from the
/// runtime entry point down.
fn user_frames(frames: Vec<FrameRecord>) -> Vec<FrameRecord> {
    let mut kept: Vec<FrameRecord> = Vec::with_capacity(frames.len());
    let mut in_boundary = false;
    for frame in frames
        .into_iter()
        .skip_while(|frame| is_machinery(&frame.function))
    {
        if ENTRY_MARKERS
            .iter()
            .any(|marker| frame.function.contains(marker))
        {
            break;
        }
        if in_crate_module(&frame.function, BOUNDARY_MODULE) {
            if !in_boundary {
                while kept.last().is_some_and(|inner| is_runtime(&inner.function)) {
                    kept.pop();
                }
            }
            in_boundary = true;
            continue;
        }
        in_boundary = false;
        kept.push(frame);
    }
    while kept.last().is_some_and(|outer| is_runtime(&outer.function)) {
        kept.pop();
    }
    kept
}

fn is_machinery(function: &str) -> bool {
    is_runtime(function)
        || MACHINERY_MODULES
            .iter()
            .any(|module| in_crate_module(function, module))
}

fn is_runtime(function: &str) -> bool {
    let function = function.trim_start_matches('<');
    RUNTIME_PREFIXES
        .iter()
        .any(|prefix| function.starts_with(prefix))
}

fn in_crate_module(function: &str, module: &str) -> bool {
    function
        .trim_start_matches('<')
        .strip_prefix(env!("CARGO_CRATE_NAME"))
        .and_then(|rest| rest.strip_prefix("::"))
        .and_then(|rest| rest.strip_prefix(module))
        .is_some_and(|tail| tail.starts_with("::"))
}

// "/a/b/check.go:14 +0xd4" -> "/a/b/check.go:14"
fn strip_offset(line: &str) -> &str {
    if !line.contains("+0") {
        return line;
    }
    let mut parts = line.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(path), Some(_), None) => path,
        _ => line,
    }
}

// "./src/main.rs:12:5" -> "./src/main.rs:12"
fn drop_column(location: &str) -> &str {
    match location.rsplit_once(':') {
        Some((rest, col)) if !col.is_empty() && col.bytes().all(|b| b.is_ascii_digit()) => rest,
        _ => location,
    }
}

fn file_segment(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or_default()
}
