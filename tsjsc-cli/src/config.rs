//! Configuration management for the CLI.
//!
//! Run parameters come from three layers: command-line flags, the
//! `[generate]` table of a `tsjsc.toml` file, and computed defaults. The
//! result is an immutable [`ResolvedConfig`] with absolute paths.

use crate::error::{CliResult, ConfigError};
use crate::logging::Verbosity;
use serde::Deserialize;
use std::path::{Component, Path, PathBuf};
use tracing::debug;
use tsjsc::BackendKind;

/// Default configuration filename.
pub const CONFIG_FILENAME: &str = "tsjsc.toml";

/// Environment variable overriding the install root.
pub const APP_ROOT_ENV: &str = "APP_ROOT_PATH";

/// Marker file identifying the install root.
const ROOT_MARKER: &str = "package.json";

/// Main configuration structure.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Settings for `generate` and `check`.
    pub generate: GenerateConfig,
}

/// The `[generate]` table. Every key is optional.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GenerateConfig {
    /// Input directory, relative to the root.
    pub path: Option<PathBuf>,

    /// Regex selecting type names.
    #[serde(rename = "match")]
    pub type_pattern: Option<String>,

    /// Output directory, relative to the root.
    pub out: Option<PathBuf>,

    /// Regex selecting file names.
    pub filematch: Option<String>,

    /// Regex rejecting type names.
    pub exclude: Option<String>,

    pub backend: Option<BackendKind>,

    /// tsconfig path, relative to the root.
    pub tsconfig: Option<PathBuf>,

    pub verbosity: Option<Verbosity>,
}

/// CLI arguments that can override configuration.
#[derive(Debug, Default, Clone)]
pub struct CliArgs {
    pub path: Option<PathBuf>,
    pub type_pattern: Option<String>,
    pub out: Option<PathBuf>,
    pub filematch: Option<String>,
    pub exclude: Option<String>,
    pub backend: Option<BackendKind>,
    pub tsconfig: Option<PathBuf>,

    /// Root override, relative to the current directory.
    pub root: Option<PathBuf>,

    /// Explicit config file, relative to the current directory.
    pub config: Option<PathBuf>,

    pub debug: bool,
    pub verbose: bool,
    pub dry_run: bool,
}

/// Fully resolved run configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub root_path: PathBuf,
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub tsconfig_path: Option<PathBuf>,
    pub type_pattern: String,
    pub file_pattern: Option<String>,
    pub exclude_pattern: Option<String>,
    pub backend: BackendKind,
    pub verbosity: Verbosity,
    pub dry_run: bool,
    /// Configuration file that was read, if any.
    pub config_file: Option<PathBuf>,
}

impl ResolvedConfig {
    /// Log where the configuration came from. Called once the subscriber
    /// is installed, since its level depends on this configuration.
    pub fn log_sources(&self) {
        debug!("Root path: {}", self.root_path.display());
        match &self.config_file {
            Some(path) => debug!("Loaded configuration from {}", path.display()),
            None => debug!("No {} found, using flags and defaults", CONFIG_FILENAME),
        }
    }
}

/// Configuration manager for loading and merging configs.
pub struct ConfigManager;

impl ConfigManager {
    /// Load configuration.
    ///
    /// An explicit path must exist. Otherwise `tsjsc.toml` under `root` is
    /// read if present, and defaults are returned if it is not.
    pub fn load(explicit: Option<&Path>, root: &Path) -> CliResult<Config> {
        match Self::locate(explicit, root)? {
            Some(path) => Self::read(&path),
            None => Ok(Config::default()),
        }
    }

    /// The configuration file to read, or `None` to use defaults.
    fn locate(explicit: Option<&Path>, root: &Path) -> CliResult<Option<PathBuf>> {
        match explicit {
            Some(path) if !path.is_file() => {
                Err(ConfigError::not_found("Config file", path).into())
            }
            Some(path) => Ok(Some(path.to_path_buf())),
            None => {
                let path = root.join(CONFIG_FILENAME);
                Ok(path.is_file().then_some(path))
            }
        }
    }

    fn read(config_path: &Path) -> CliResult<Config> {
        let content = std::fs::read_to_string(config_path).map_err(|e| ConfigError::Io {
            path: config_path.to_path_buf(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| ConfigError::invalid_toml(config_path.to_path_buf(), e.to_string()))?;

        Ok(config)
    }

    /// Merge CLI arguments into configuration.
    ///
    /// CLI arguments take precedence over config file values.
    pub fn merge_cli_args(mut config: Config, args: &CliArgs) -> Config {
        let generate = &mut config.generate;

        if let Some(ref path) = args.path {
            generate.path = Some(path.clone());
        }

        if let Some(ref pattern) = args.type_pattern {
            generate.type_pattern = Some(pattern.clone());
        }

        if let Some(ref out) = args.out {
            generate.out = Some(out.clone());
        }

        if let Some(ref filematch) = args.filematch {
            generate.filematch = Some(filematch.clone());
        }

        if let Some(ref exclude) = args.exclude {
            generate.exclude = Some(exclude.clone());
        }

        if let Some(backend) = args.backend {
            generate.backend = Some(backend);
        }

        if let Some(ref tsconfig) = args.tsconfig {
            generate.tsconfig = Some(tsconfig.clone());
        }

        config
    }

    /// Resolve arguments against the process environment.
    pub fn resolve(args: &CliArgs) -> CliResult<ResolvedConfig> {
        let cwd = std::env::current_dir().map_err(|e| ConfigError::Io {
            path: PathBuf::from("."),
            source: e,
        })?;
        let app_root = std::env::var_os(APP_ROOT_ENV)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from);

        Self::resolve_from(args, &cwd, app_root.as_deref())
    }

    /// Resolve arguments against an explicit working directory and
    /// install-root override.
    pub fn resolve_from(
        args: &CliArgs,
        cwd: &Path,
        app_root: Option<&Path>,
    ) -> CliResult<ResolvedConfig> {
        let root_path = match args.root {
            Some(ref root) => {
                let root = normalize(&cwd.join(root));
                if !root.exists() {
                    return Err(ConfigError::not_found("Root path", root).into());
                }
                root
            }
            None => install_root(cwd, app_root),
        };
        let explicit = args.config.as_ref().map(|path| cwd.join(path));
        let config_file = Self::locate(explicit.as_deref(), &root_path)?;
        let config = match &config_file {
            Some(path) => Self::read(path)?,
            None => Config::default(),
        };
        let generate = Self::merge_cli_args(config, args).generate;

        let path = generate
            .path
            .ok_or(ConfigError::MissingOption { key: "path" })?;
        let type_pattern = generate
            .type_pattern
            .ok_or(ConfigError::MissingOption { key: "match" })?;

        let input_path = normalize(&root_path.join(path));
        if !input_path.exists() {
            return Err(ConfigError::not_found("Input path", input_path).into());
        }
        if !input_path.is_dir() {
            return Err(ConfigError::NotADirectory { path: input_path }.into());
        }

        let output_path = match generate.out {
            Some(out) => normalize(&root_path.join(out)),
            None => normalize(&input_path.join("..").join("schema")),
        };

        let backend = generate.backend.unwrap_or_default();
        let tsconfig_path = generate
            .tsconfig
            .map(|tsconfig| normalize(&root_path.join(tsconfig)));
        match tsconfig_path {
            None if backend == BackendKind::DeclarationScan => {
                return Err(ConfigError::MissingTsconfig.into());
            }
            Some(ref tsconfig) if !tsconfig.exists() => {
                return Err(ConfigError::not_found("tsconfig", tsconfig.clone()).into());
            }
            _ => {}
        }

        Ok(ResolvedConfig {
            root_path,
            input_path,
            output_path,
            tsconfig_path,
            type_pattern,
            file_pattern: generate.filematch,
            exclude_pattern: generate.exclude,
            backend,
            verbosity: Verbosity::resolve(args.debug, args.verbose, generate.verbosity),
            dry_run: args.dry_run,
            config_file,
        })
    }

    /// Generate default configuration file content with comments.
    pub fn default_config_content() -> &'static str {
        r#"# tsjsc configuration file
# Command-line flags override the values below.

[generate]
# Directory holding the TypeScript declarations, relative to the root
path = "src/models"

# Regex selecting the type names to generate schemas for
match = "Interface$"

# Output directory (default: a "schema" directory next to `path`)
# out = "src/schema"

# Regex selecting file names inside `path`
# filematch = "^[A-Z]"

# Regex rejecting type names
# exclude = "^Internal"

# Schema backend: "symbol-table" or "declaration-scan"
backend = "symbol-table"

# tsconfig.json, required by the declaration-scan backend
# tsconfig = "tsconfig.json"

# One of: error, warn, info, debug, verbose
verbosity = "info"
"#
    }
}

/// `APP_ROOT_PATH`, else the nearest ancestor holding `package.json`, else
/// the working directory.
fn install_root(cwd: &Path, app_root: Option<&Path>) -> PathBuf {
    if let Some(root) = app_root {
        return normalize(&cwd.join(root));
    }

    cwd.ancestors()
        .find(|dir| dir.join(ROOT_MARKER).is_file())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| cwd.to_path_buf())
}

/// Lexically normalise a path, folding `.` and `..` components.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    out
}
