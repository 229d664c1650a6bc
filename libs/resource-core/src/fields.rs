use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Direction applied to a single sort field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "with-utoipa", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum SortDir {
    Asc,
    Desc,
}

/// Direction used when a sort term or ordering gives none.
pub const DEFAULT_SORT_DIRECTION: SortDir = SortDir::Desc;

impl SortDir {
    pub fn reversed(self) -> Self {
        match self {
            SortDir::Asc => SortDir::Desc,
            SortDir::Desc => SortDir::Asc,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortDir::Asc => "asc",
            SortDir::Desc => "desc",
        }
    }

    pub fn parse(raw: &str) -> Result<Self, Error> {
        match raw {
            "asc" => Ok(SortDir::Asc),
            "desc" => Ok(SortDir::Desc),
            other => Err(Error::InvalidSortField(other.to_string())),
        }
    }
}

impl fmt::Display for SortDir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A sort field paired with its direction.
///
/// Immutable value object: negation and reversal return new values, so a
/// parsed term can never leak direction changes into another request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortableField {
    name: String,
    dir: SortDir,
}

impl SortableField {
    pub fn new(name: impl Into<String>, dir: SortDir) -> Self {
        Self {
            name: name.into(),
            dir,
        }
    }

    pub fn asc(name: impl Into<String>) -> Self {
        Self::new(name, SortDir::Asc)
    }

    pub fn desc(name: impl Into<String>) -> Self {
        Self::new(name, SortDir::Desc)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dir(&self) -> SortDir {
        self.dir
    }

    /// Same field sorted the opposite way.
    pub fn reversed(&self) -> Self {
        Self::new(self.name.clone(), self.dir.reversed())
    }

    pub fn with_dir(&self, dir: SortDir) -> Self {
        Self::new(self.name.clone(), dir)
    }

    /// Parse `name[:direction]`. The direction defaults to descending when
    /// omitted or empty.
    pub fn parse(raw: &str) -> Result<Self, Error> {
        let (name, dir) = match raw.split_once(':') {
            Some((name, "")) => (name, DEFAULT_SORT_DIRECTION),
            Some((name, dir)) => (name, SortDir::parse(dir)?),
            None => (raw, DEFAULT_SORT_DIRECTION),
        };
        if name.is_empty() {
            return Err(Error::InvalidSortField(raw.to_string()));
        }
        Ok(Self::new(name, dir))
    }
}

impl fmt::Display for SortableField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.dir)
    }
}
