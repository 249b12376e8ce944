//! Resolution of a load's input: an explicit file path, or a named resource
//! looked up in a list of resource directories.

use std::{env, fs::File, io::BufReader, path::PathBuf};

use log::debug;

use crate::{
    error::{LoadError, Result},
    options::LoadOptions,
};

/// Search path for named resources, in `PATH` syntax.
pub const RESOURCE_PATH_ENV: &str = "GIAS_RESOURCE_PATH";
pub const DEFAULT_RESOURCE_DIR: &str = "resources";
/// Resource used when a load names neither a path nor a resource.
pub const DEFAULT_RESOURCE: &str = "edubasealldata.csv";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSource {
    pub path: PathBuf,
    /// Path as given, or the resource name; the default dataset name.
    pub name: String,
}

impl ResolvedSource {
    pub fn open(&self) -> Result<BufReader<File>> {
        let file = File::open(&self.path)?;
        Ok(BufReader::new(file))
    }
}

/// Resolves the input for `options`. An explicit path always wins over a
/// resource name, and is not second-guessed: a missing path is an error even
/// when a resource is also named.
pub fn resolve(options: &LoadOptions) -> Result<ResolvedSource> {
    if let Some(path) = &options.path {
        return if path.is_file() {
            Ok(ResolvedSource {
                path: path.clone(),
                name: path.display().to_string(),
            })
        } else {
            Err(LoadError::SourceNotFound {
                requested: format!("path {path:?}"),
            })
        };
    }

    let name = options.resource.as_deref().unwrap_or(DEFAULT_RESOURCE);
    let dirs = resource_dirs(&options.resource_dirs);
    debug!("Looking up resource '{name}' in {dirs:?}");
    find_resource(name, &dirs)
        .map(|path| ResolvedSource {
            path,
            name: name.to_string(),
        })
        .ok_or_else(|| LoadError::SourceNotFound {
            requested: format!("resource '{name}'"),
        })
}

/// Caller directories first, then `GIAS_RESOURCE_PATH`, then `./resources`.
fn resource_dirs(extra: &[PathBuf]) -> Vec<PathBuf> {
    let mut dirs = extra.to_vec();
    if let Some(value) = env::var_os(RESOURCE_PATH_ENV) {
        dirs.extend(env::split_paths(&value).filter(|p| !p.as_os_str().is_empty()));
    }
    dirs.push(PathBuf::from(DEFAULT_RESOURCE_DIR));
    dirs
}

fn find_resource(name: &str, dirs: &[PathBuf]) -> Option<PathBuf> {
    dirs.iter()
        .map(|dir| dir.join(name))
        .find(|candidate| candidate.is_file())
}
