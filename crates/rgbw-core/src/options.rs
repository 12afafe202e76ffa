use std::path::PathBuf;

/// What the host does when the entry point raises.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InvokeFailurePolicy {
    /// Report the error and still enumerate the (nil) result; exit code 0.
    #[default]
    Continue,
    /// Report the error, skip printing and exit with code 1.
    Abort,
}

/// Compiled-in host configuration.
#[derive(Clone, Debug)]
pub struct HostOptions {
    pub script_path: PathBuf,
    /// Global the [`ShaderState`](crate::ShaderState) is bound to.
    pub global_name: String,
    pub entry_point: String,
    pub on_invoke_error: InvokeFailurePolicy,
}

impl Default for HostOptions {
    fn default() -> Self {
        Self {
            script_path: PathBuf::from("script.lua"),
            global_name: "state".into(),
            entry_point: "main".into(),
            on_invoke_error: InvokeFailurePolicy::Continue,
        }
    }
}

impl HostOptions {
    /// Same defaults, different script file.
    pub fn with_script(path: impl Into<PathBuf>) -> Self {
        Self { script_path: path.into(), ..Self::default() }
    }
}
