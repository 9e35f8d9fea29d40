use std::sync::OnceLock;

pub const DEBUG_FLAG: &str = "--debug";
pub const SHORT_DEBUG_FLAG: &str = "-d";

/// How a recovered failure is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// The error message on one line.
    #[default]
    Plain,
    /// The message between dashed borders, followed by the call path.
    Debug,
}

impl OutputMode {
    /// Scans `args` after the program name for an exact `--debug` or `-d`.
    pub fn from_args<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let debug = args
            .into_iter()
            .skip(1)
            .any(|arg| matches!(arg.as_ref(), DEBUG_FLAG | SHORT_DEBUG_FLAG));
        if debug { Self::Debug } else { Self::Plain }
    }

    /// Mode of the running process, read from its arguments on first use.
    pub fn current() -> Self {
        static MODE: OnceLock<OutputMode> = OnceLock::new();
        *MODE.get_or_init(|| {
            Self::from_args(
                std::env::args_os().map(|arg| arg.to_string_lossy().into_owned()),
            )
        })
    }
}
