use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{ConfigFile, EnvVariableResponse};
use crate::{EnvError, EnvResult};

static EXPORT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^export\s+([A-Za-z_][A-Za-z0-9_]*)=['"]?(.*?)['"]?$"#)
        .expect("export pattern is valid")
});

static KEY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("key pattern is valid"));

const FORBIDDEN_VALUE_CHARS: [char; 5] = ['\n', '\r', '"', '\\', '`'];

/// zsh startup files, in the order zsh reads them.
const ZSH_STARTUP_FILES: [&str; 5] = [".zshenv", ".zprofile", ".zshrc", ".zlogin", ".zlogout"];

/// Returns the zsh startup files under `home`, with ids 1 to 5.
pub fn default_config_files(home: &Path) -> Vec<ConfigFile> {
    ZSH_STARTUP_FILES
        .iter()
        .zip(1u8..)
        .map(|(name, id)| ConfigFile {
            path: home.join(name).to_string_lossy().into_owned(),
            id,
        })
        .collect()
}

/// Reads `$HOME`.
pub fn home_dir() -> EnvResult<PathBuf> {
    std::env::var("HOME")
        .map(PathBuf::from)
        .map_err(|e| EnvError::ConfigurationError(format!("Failed to get home directory: {e}")))
}

/// A variable exported by a shell file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvVariable {
    pub key: String,
    pub value: Vec<String>,
}

impl EnvVariable {
    pub fn new(key: impl Into<String>, value: Vec<String>) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }

    /// Renders the variable as an `export` statement.
    pub fn to_export_line(&self) -> String {
        format!("export {}=\"{}\"", self.key, self.value.join(":"))
    }

    /// Checks that the variable renders as exactly one `export` line.
    ///
    /// Segments are written inside double quotes, so quotes, backslashes,
    /// backticks and line breaks are rejected.
    fn validate(&self) -> EnvResult<()> {
        if !KEY_RE.is_match(&self.key) {
            return Err(EnvError::InvalidKey(self.key.clone()));
        }
        match self
            .value
            .iter()
            .find(|segment| segment.contains(FORBIDDEN_VALUE_CHARS))
        {
            Some(segment) => Err(EnvError::InvalidValue(segment.clone())),
            None => Ok(()),
        }
    }
}

/// Splits an exported value into its segments.
///
/// URLs are kept whole since their scheme contains a colon.
fn split_value(raw: &str) -> Vec<String> {
    if raw.contains("http://") || raw.contains("https://") {
        vec![raw.to_string()]
    } else {
        raw.split(':').map(str::to_string).collect()
    }
}

/// In-memory editor for the `export` statements of a shell file.
///
/// Variables are keyed by their 1-based line number. Edits stay in memory
/// until [`ShellConfig::save`] rewrites the file; every other line is kept
/// as is.
#[derive(Debug, Clone)]
pub struct ShellConfig {
    path: PathBuf,
    env_vars: BTreeMap<u64, EnvVariable>,
    removed: BTreeSet<u64>,
    path_line: Option<u64>,
    all_lines: u64,
}

impl ShellConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            env_vars: BTreeMap::new(),
            removed: BTreeSet::new(),
            path_line: None,
            all_lines: 0,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Line of the `PATH` export, if the file has one.
    pub fn path_line(&self) -> Option<u64> {
        self.path_line
    }

    /// Number of lines in the file as of the last load, plus pending additions.
    pub fn line_count(&self) -> u64 {
        self.all_lines
    }

    pub fn get(&self, index: u64) -> Option<&EnvVariable> {
        self.env_vars.get(&index)
    }

    /// (Re)reads the file, discarding pending edits.
    pub fn load(&mut self) -> EnvResult<()> {
        let content = fs::read_to_string(&self.path)?;

        self.env_vars.clear();
        self.removed.clear();
        self.path_line = None;
        self.all_lines = 0;

        for (line_no, line) in (1u64..).zip(content.lines()) {
            self.all_lines = line_no;
            self.parse_line(line_no, line);
        }

        debug!(
            "loaded {} exports from {} ({} lines)",
            self.env_vars.len(),
            self.path.display(),
            self.all_lines
        );
        Ok(())
    }

    fn parse_line(&mut self, index: u64, line: &str) {
        let Some(caps) = EXPORT_RE.captures(line.trim()) else {
            return;
        };
        let key = caps[1].to_string();
        let value = split_value(&caps[2]);

        if key == "PATH" {
            self.path_line = Some(index);
        }
        self.env_vars.insert(index, EnvVariable { key, value });
    }

    /// Replaces the variable at `index`.
    ///
    /// An index past the end of the file is appended on save.
    pub fn update_env(&mut self, index: u64, env: &EnvVariable) -> EnvResult<()> {
        if index == 0 {
            return Err(EnvError::EnvNotFound(index));
        }
        env.validate()?;

        self.removed.remove(&index);
        self.env_vars.insert(index, env.clone());
        self.all_lines = self.all_lines.max(index);
        self.refresh_path_line();
        Ok(())
    }

    /// Appends a new variable after the last line and returns its index.
    pub fn add_env(&mut self, env: &EnvVariable) -> EnvResult<u64> {
        env.validate()?;
        if self.env_vars.values().any(|existing| existing.key == env.key) {
            return Err(EnvError::EnvAlreadyExists(env.key.clone()));
        }

        self.all_lines += 1;
        self.env_vars.insert(self.all_lines, env.clone());
        self.refresh_path_line();
        Ok(self.all_lines)
    }

    /// Drops the variable at `index`; its line is removed on save.
    pub fn remove_env(&mut self, index: u64) -> EnvResult<()> {
        if self.env_vars.remove(&index).is_none() {
            return Err(EnvError::EnvNotFound(index));
        }
        self.removed.insert(index);
        self.refresh_path_line();
        Ok(())
    }

    // Last `PATH` export wins, matching what the shell ends up with.
    fn refresh_path_line(&mut self) {
        self.path_line = self
            .env_vars
            .iter()
            .rev()
            .find(|(_, env)| env.key == "PATH")
            .map(|(index, _)| *index);
    }

    /// Tracked variables ordered by line.
    pub fn variables(&self) -> Vec<EnvVariableResponse> {
        self.env_vars
            .iter()
            .map(|(index, env)| EnvVariableResponse {
                index: *index,
                key: env.key.clone(),
                value: env.value.clone(),
            })
            .collect()
    }

    /// Writes pending edits to the file and reloads it, so indices match the
    /// new line numbers afterwards.
    pub fn save(&mut self) -> EnvResult<()> {
        let content = fs::read_to_string(&self.path)?;
        let lines: Vec<&str> = content.lines().collect();
        let existing = lines.len() as u64;

        let mut output: Vec<String> = Vec::with_capacity(lines.len());
        for (line_no, line) in (1u64..).zip(lines.iter()) {
            if self.removed.contains(&line_no) {
                continue;
            }
            match self.env_vars.get(&line_no) {
                Some(env) => output.push(env.to_export_line()),
                None => output.push((*line).to_string()),
            }
        }
        output.extend(
            self.env_vars
                .range(existing + 1..)
                .map(|(_, env)| env.to_export_line()),
        );

        fs::write(&self.path, output.join("\n") + "\n")?;
        debug!("saved {} ({} lines)", self.path.display(), output.len());

        self.load()
    }
}
