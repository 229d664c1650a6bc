//! Raw list-endpoint query parameters.

use resource_core::{Error, PaginationParams};
use url::form_urlencoded;

/// Raw `list` query parameters before validation against a model schema.
///
/// `fields` and `sorting` accept repeated keys, comma-separated values, or a
/// mix of both.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListParams {
    pub fields: Vec<String>,
    pub sorting: Vec<String>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
    pub next: Option<String>,
}

impl ListParams {
    pub fn from_query(query: &str) -> Result<Self, Error> {
        let mut params = Self::default();
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "fields" => params.fields.extend(split_list(&value)),
                "sorting" => params.sorting.extend(split_list(&value)),
                "limit" => {
                    params.limit = Some(value.parse().map_err(|_| Error::InvalidLimit)?);
                }
                "offset" => {
                    params.offset = Some(
                        value
                            .parse()
                            .map_err(|_| Error::InvalidParameter("offset".to_string()))?,
                    );
                }
                "next" => params.next = Some(value.into_owned()),
                _ => {}
            }
        }
        Ok(params)
    }

    /// Pagination strategy selected by the parameters: the presence of a
    /// cursor token selects cursor pagination, otherwise offset.
    pub fn pagination(&self) -> PaginationParams {
        match &self.next {
            Some(next) => PaginationParams::Cursor {
                limit: self.limit,
                next: Some(next.clone()),
            },
            None => PaginationParams::Offset {
                limit: self.limit,
                offset: self.offset,
            },
        }
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_owned)
        .collect()
}
