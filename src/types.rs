use serde::Deserialize;
use std::str::FromStr;

/// How a task's argument payload is turned into a child-process invocation.
///
/// - `Jvm`: the payload is `[classpath, main-class, program-args...]` and the
///   child is `<java_bin> -cp <classpath> <main-class> <args...>` (default).
/// - `Raw`: the payload is `[program, args...]` and the child is the program
///   invoked directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LaunchMode {
    Jvm,
    Raw,
}

impl Default for LaunchMode {
    fn default() -> Self {
        LaunchMode::Jvm
    }
}

impl FromStr for LaunchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "jvm" => Ok(LaunchMode::Jvm),
            "raw" => Ok(LaunchMode::Raw),
            other => Err(format!(
                "invalid launch mode: {other} (expected \"jvm\" or \"raw\")"
            )),
        }
    }
}
