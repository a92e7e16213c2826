//! Script resources and resource loading.
//!
//! Locations carry a scheme prefix:
//! - `classpath:<name>`: a script embedded into the binary (see [`EmbeddedResources`])
//! - `file:<path>`: a script on the filesystem, relative paths resolve against the loader's base dir
//! - bare `<name>`: same as `classpath:<name>`

pub mod embedded;

pub use embedded::EmbeddedResources;

use crate::error::ResourceError;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub const CLASSPATH_PREFIX: &str = "classpath:";
pub const FILE_PREFIX: &str = "file:";

/// A resolved reference to a SQL script. Resolution never reads the script;
/// use [`ScriptResource::exists`] and [`ScriptResource::read`].
#[derive(Debug, Clone)]
pub enum ScriptResource {
    Embedded {
        name: String,
        content: Option<Arc<str>>,
    },
    File {
        path: PathBuf,
    },
}

impl ScriptResource {
    pub fn exists(&self) -> bool {
        match self {
            ScriptResource::Embedded { content, .. } => content.is_some(),
            ScriptResource::File { path } => path.is_file(),
        }
    }

    pub fn read(&self) -> io::Result<String> {
        match self {
            ScriptResource::Embedded { name, content } => content
                .as_deref()
                .map(str::to_owned)
                .ok_or_else(|| {
                    io::Error::new(
                        io::ErrorKind::NotFound,
                        format!("no bundled resource named '{name}'"),
                    )
                }),
            ScriptResource::File { path } => std::fs::read_to_string(path),
        }
    }
}

impl fmt::Display for ScriptResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScriptResource::Embedded { name, .. } => write!(f, "class path resource [{name}]"),
            ScriptResource::File { path } => write!(f, "file [{}]", path.display()),
        }
    }
}

/// Resolves location strings into [`ScriptResource`]s.
pub trait ResourceLoader: Send + Sync {
    fn get_resource(&self, location: &str) -> Result<ScriptResource, ResourceError>;
}

/// Loader backed by a bundled resource set plus a base directory for `file:` locations.
#[derive(Debug, Clone)]
pub struct DefaultResourceLoader {
    embedded: EmbeddedResources,
    base_dir: PathBuf,
}

impl Default for DefaultResourceLoader {
    fn default() -> Self {
        Self::new(EmbeddedResources::bundled())
    }
}

impl DefaultResourceLoader {
    pub fn new(embedded: EmbeddedResources) -> Self {
        Self {
            embedded,
            base_dir: PathBuf::from("."),
        }
    }

    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = base_dir.into();
        self
    }

    fn classpath(&self, name: &str) -> ScriptResource {
        let name = name.trim_start_matches('/');
        ScriptResource::Embedded {
            name: name.to_string(),
            content: self.embedded.get(name),
        }
    }

    fn file(&self, path: &str) -> ScriptResource {
        let path = Path::new(path);
        let path = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        };
        ScriptResource::File { path }
    }
}

impl ResourceLoader for DefaultResourceLoader {
    fn get_resource(&self, location: &str) -> Result<ScriptResource, ResourceError> {
        let location = location.trim();
        if location.is_empty() {
            return Err(ResourceError::EmptyLocation);
        }

        if let Some(name) = location.strip_prefix(CLASSPATH_PREFIX) {
            return Ok(self.classpath(name));
        }
        if let Some(path) = location.strip_prefix(FILE_PREFIX) {
            return Ok(self.file(path));
        }

        match location.split_once(':') {
            Some((scheme, _)) => Err(ResourceError::UnsupportedScheme {
                scheme: scheme.to_string(),
                location: location.to_string(),
            }),
            None => Ok(self.classpath(location)),
        }
    }
}
