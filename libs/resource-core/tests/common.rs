//! Shared fixture: a small ticket model and an in-memory repository that
//! drives the pagination engine the way a real backend would.

use std::cmp::Ordering;
use std::sync::RwLock;

use async_trait::async_trait;
use serde_json::{json, Value};

use resource_core::{
    clamp_limit, compare_values, cursor_page, Cursor, Error, FieldDescriptor, FieldOrdering,
    ListQuery, Page, PageCursor, PageLimits, PaginationParams, Repository, ResourceModel, SortDir,
};

#[derive(Debug, Clone, PartialEq)]
pub struct Author {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Ticket {
    pub id: String,
    pub title: String,
    pub priority: i64,
    pub author: Author,
}

impl ResourceModel for Ticket {
    const RESOURCE_NAME: &'static str = "ticket";

    fn fields() -> Vec<FieldDescriptor> {
        vec![
            FieldDescriptor::scalar("id"),
            FieldDescriptor::scalar("title"),
            FieldDescriptor::scalar("priority"),
            FieldDescriptor::composite(
                "author",
                vec![
                    FieldDescriptor::scalar("name"),
                    FieldDescriptor::scalar("email"),
                ],
            ),
        ]
    }

    fn id_fields() -> &'static [&'static str] {
        &["id"]
    }

    fn field_value(&self, path: &str) -> Option<Value> {
        match path {
            "id" => Some(json!(self.id)),
            "title" => Some(json!(self.title)),
            "priority" => Some(json!(self.priority)),
            "author.name" => Some(json!(self.author.name)),
            "author.email" => Some(json!(self.author.email)),
            _ => None,
        }
    }
}

pub fn ticket(id: &str, title: &str, priority: i64) -> Ticket {
    Ticket {
        id: id.to_string(),
        title: title.to_string(),
        priority,
        author: Author {
            name: format!("author of {id}"),
            email: format!("{id}@example.test"),
        },
    }
}

#[derive(Debug, Clone, Default)]
pub struct TicketFilter {
    pub min_priority: Option<i64>,
}

#[derive(Default)]
pub struct InMemoryTickets {
    rows: RwLock<Vec<Ticket>>,
}

impl InMemoryTickets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seeded(rows: Vec<Ticket>) -> Self {
        Self {
            rows: RwLock::new(rows),
        }
    }
}

fn sort_rows(rows: &mut [Ticket], ordering: &FieldOrdering) {
    rows.sort_by(|a, b| {
        for field in ordering.iter() {
            let left = a.field_value(field.name()).unwrap_or(Value::Null);
            let right = b.field_value(field.name()).unwrap_or(Value::Null);
            let ord = compare_values(&left, &right).unwrap_or(Ordering::Equal);
            let ord = match field.dir() {
                SortDir::Asc => ord,
                SortDir::Desc => ord.reverse(),
            };
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    });
}

#[async_trait]
impl Repository<Ticket> for InMemoryTickets {
    type Key = String;
    type Filter = TicketFilter;

    async fn get(&self, id: &String, _fields: Option<&[String]>) -> Result<Option<Ticket>, Error> {
        Ok(self
            .rows
            .read()
            .unwrap()
            .iter()
            .find(|row| &row.id == id)
            .cloned())
    }

    async fn list(&self, query: &ListQuery<TicketFilter>) -> Result<Page<Ticket>, Error> {
        let mut rows: Vec<Ticket> = self.rows.read().unwrap().clone();
        if let Some(filter) = &query.filtering {
            if let Some(min) = filter.min_priority {
                rows.retain(|row| row.priority >= min);
            }
        }

        let ordering = FieldOrdering::resolve(&query.sorting, Ticket::id_fields());
        sort_rows(&mut rows, &ordering);

        match &query.pagination {
            PaginationParams::Cursor { limit, next } => {
                let limit = clamp_limit(*limit, PageLimits::default())?;
                if let Some(token) = next {
                    let cursor = Cursor::parse(token, &ordering)?;
                    rows.retain(|row| cursor.admits(|path| row.field_value(path)));
                }
                rows.truncate(limit as usize);
                cursor_page(rows, limit, &ordering)
            }
            PaginationParams::Offset { limit, offset } => {
                let limit = clamp_limit(*limit, PageLimits::default())?;
                let offset = offset.unwrap_or(0);
                let total = rows.len() as u64;
                let rows: Vec<Ticket> = rows
                    .into_iter()
                    .skip(offset as usize)
                    .take(limit as usize)
                    .collect();
                let next = if rows.len() as u64 == limit {
                    Some(PageCursor::Offset(offset + limit))
                } else {
                    None
                };
                Ok(Page::new(rows, next)
                    .with_total(total)
                    .with_index(offset / limit))
            }
        }
    }

    async fn add(&self, entity: Ticket) -> Result<Ticket, Error> {
        let mut rows = self.rows.write().unwrap();
        if rows.iter().any(|row| row.id == entity.id) {
            return Err(Error::already_exists(
                Ticket::RESOURCE_NAME,
                entity.id.clone(),
            ));
        }
        rows.push(entity.clone());
        Ok(entity)
    }

    async fn update(&self, entity: Ticket) -> Result<Option<Ticket>, Error> {
        let mut rows = self.rows.write().unwrap();
        match rows.iter_mut().find(|row| row.id == entity.id) {
            Some(slot) => {
                *slot = entity.clone();
                Ok(Some(entity))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: &String) -> Result<(), Error> {
        let mut rows = self.rows.write().unwrap();
        let before = rows.len();
        rows.retain(|row| &row.id != id);
        if rows.len() == before {
            return Err(Error::not_found(Ticket::RESOURCE_NAME, id.clone()));
        }
        Ok(())
    }
}
