use serde::{Deserialize, Serialize};

/// Pagination continuation carried by a page: a cursor token or the next
/// offset, depending on the strategy that produced the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-utoipa", derive(utoipa::ToSchema))]
#[serde(untagged)]
pub enum PageCursor {
    Offset(u64),
    Token(String),
}

/// One page of a listed resource. `next == None` signals the terminal page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "with-utoipa", derive(utoipa::ToSchema))]
pub struct Page<T> {
    pub items: Vec<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<u64>,
    pub next: Option<PageCursor>,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, next: Option<PageCursor>) -> Self {
        Self {
            items,
            total: None,
            index: None,
            next,
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new(), None)
    }

    pub fn with_total(mut self, total: u64) -> Self {
        self.total = Some(total);
        self
    }

    pub fn with_index(mut self, index: u64) -> Self {
        self.index = Some(index);
        self
    }

    pub fn is_terminal(&self) -> bool {
        self.next.is_none()
    }

    /// Map items while preserving pagination state.
    pub fn map_items<U>(self, mut f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(&mut f).collect(),
            total: self.total,
            index: self.index,
            next: self.next,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_items_preserves_pagination_state() {
        let page = Page::new(vec![1, 2, 3], Some(PageCursor::Offset(3))).with_total(10);
        let mapped = page.map_items(|n| n * 2);
        assert_eq!(mapped.items, vec![2, 4, 6]);
        assert_eq!(mapped.total, Some(10));
        assert_eq!(mapped.next, Some(PageCursor::Offset(3)));
    }

    #[test]
    fn terminal_page_has_no_next() {
        assert!(Page::<u32>::empty().is_terminal());
        let page = Page::new(vec![1], Some(PageCursor::Token("abc".into())));
        assert!(!page.is_terminal());
    }

    #[test]
    fn next_serializes_untagged() {
        let offset = serde_json::to_value(PageCursor::Offset(20)).unwrap();
        assert_eq!(offset, serde_json::json!(20));
        let token = serde_json::to_value(PageCursor::Token("abc".into())).unwrap();
        assert_eq!(token, serde_json::json!("abc"));
    }
}
