//! The subprocess environment overlay.
//!
//! Spawned tools must resolve their home, caches, and boot directories
//! inside the sandbox. The overlay is a full copy of the parent environment
//! with the sandbox variables layered on top; it is passed to each child
//! explicitly and the parent process environment is never mutated.

use std::collections::BTreeMap;

use crate::sandbox::Sandbox;

/// Variable names that may be referenced from configured shell-command
/// arguments. Expansion is restricted to this set; it is substitution, not
/// shell evaluation, so untrusted configuration cannot inject code.
const EXPANDABLE_VARS: [&str; 4] = [
    "HOME",
    "COURSIER_CACHE",
    "SBT_GLOBAL_BASE",
    "SBT_BOOT_DIRECTORY",
];

/// Immutable environment overlay for all subprocesses of one generation run.
#[derive(Debug, Clone)]
pub struct EnvOverlay {
    vars: BTreeMap<String, String>,
}

impl EnvOverlay {
    /// Builds the overlay for a sandbox from the current process environment.
    pub fn for_sandbox(sandbox: &Sandbox) -> Self {
        Self::build(std::env::vars().collect(), sandbox)
    }

    /// Builds the overlay from an explicit base environment.
    ///
    /// Split out from [`EnvOverlay::for_sandbox`] so tests can exercise the
    /// layering without touching the real process environment.
    pub fn build(mut vars: BTreeMap<String, String>, sandbox: &Sandbox) -> Self {
        let root = sandbox.root().display().to_string();
        let coursier_cache = sandbox.coursier_cache().display().to_string();
        let sbt_global = sandbox.sbt_global_base().display().to_string();
        let sbt_boot = sandbox.sbt_boot().display().to_string();

        vars.insert("HOME".to_string(), root.clone());
        vars.insert("COURSIER_CACHE".to_string(), coursier_cache.clone());
        vars.insert("SBT_GLOBAL_BASE".to_string(), sbt_global);
        vars.insert("SBT_BOOT_DIRECTORY".to_string(), sbt_boot.clone());
        vars.insert(
            "SBT_OPTS".to_string(),
            format!("-Dsbt.boot.directory={sbt_boot} -Dsbt.coursier.home={coursier_cache}"),
        );

        // Secondary JVM processes (ammonite and friends) read `user.home`
        // rather than `$HOME`; append to any inherited options.
        let user_home = format!("-Duser.home={root}");
        let java_options = match vars.get("_JAVA_OPTIONS") {
            Some(existing) => format!("{existing} {user_home}"),
            None => user_home,
        };
        vars.insert("_JAVA_OPTIONS".to_string(), java_options);

        Self { vars }
    }

    /// Looks up a variable in the overlay.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    /// Iterates over all `(name, value)` pairs, for passing to a subprocess.
    pub fn vars(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Expands `$VAR` and `${VAR}` references to the recognized sandbox
    /// variables in a single argument.
    ///
    /// Unrecognized references are left untouched; a lone trailing `$` is
    /// literal. Variable names end at the first non-identifier character.
    pub fn expand(&self, arg: &str) -> String {
        let mut out = String::with_capacity(arg.len());
        let mut chars = arg.chars().peekable();
        while let Some(c) = chars.next() {
            if c != '$' {
                out.push(c);
                continue;
            }

            let braced = matches!(chars.peek(), Some('{'));
            if braced {
                chars.next();
            }
            let mut name = String::new();
            while let Some(&nc) = chars.peek() {
                if nc.is_ascii_alphanumeric() || nc == '_' {
                    name.push(nc);
                    chars.next();
                } else {
                    break;
                }
            }
            let closed = if braced {
                if matches!(chars.peek(), Some('}')) {
                    chars.next();
                    true
                } else {
                    false
                }
            } else {
                true
            };

            match self.lookup_expandable(&name) {
                Some(value) if closed && !name.is_empty() => out.push_str(value),
                _ => {
                    // Reproduce the reference literally.
                    out.push('$');
                    if braced {
                        out.push('{');
                    }
                    out.push_str(&name);
                    if braced && closed {
                        out.push('}');
                    }
                }
            }
        }
        out
    }

    fn lookup_expandable(&self, name: &str) -> Option<&str> {
        if EXPANDABLE_VARS.contains(&name) {
            self.get(name)
        } else {
            None
        }
    }
}
