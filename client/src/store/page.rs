//! # Page View
//!
//! Client-side list view over a collection snapshot: free-text search,
//! equality filters, sorting and 1-based pagination.
//!
//! ```rust
//! use biuai_client::store::page::{FieldValue, PageView, SortOrder, Viewable};
//!
//! #[derive(Clone)]
//! struct Row(i64, &'static str);
//!
//! impl Viewable for Row {
//!     const FIELDS: &'static [&'static str] = &["id", "nome"];
//!     fn field(&self, name: &str) -> Option<FieldValue> {
//!         match name {
//!             "id" => Some(FieldValue::Int(self.0)),
//!             "nome" => Some(FieldValue::Text(self.1.to_string())),
//!             _ => None,
//!         }
//!     }
//! }
//!
//! let mut view = PageView::new(2);
//! view.set_search("an");
//! view.set_sort("id", SortOrder::Desc);
//! let rows = vec![Row(1, "Ana"), Row(2, "Bruno"), Row(3, "Joana")];
//! let page = view.page(&rows);
//! assert_eq!(page.items.iter().map(|r| r.0).collect::<Vec<_>>(), vec![3, 1]);
//! ```

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// A comparable, searchable field value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Bool(bool),
    Int(i64),
    Number(Decimal),
    Date(NaiveDate),
    Text(String),
}

impl FieldValue {
    fn search_text(&self) -> String {
        match self {
            FieldValue::Bool(b) => b.to_string(),
            FieldValue::Int(i) => i.to_string(),
            FieldValue::Number(n) => n.normalize().to_string(),
            FieldValue::Date(d) => d.format("%Y-%m-%d").to_string(),
            FieldValue::Text(t) => t.to_lowercase(),
        }
    }

    fn compare(&self, other: &FieldValue) -> Ordering {
        match (self, other) {
            (FieldValue::Bool(a), FieldValue::Bool(b)) => a.cmp(b),
            (FieldValue::Int(a), FieldValue::Int(b)) => a.cmp(b),
            (FieldValue::Number(a), FieldValue::Number(b)) => a.cmp(b),
            (FieldValue::Int(a), FieldValue::Number(b)) => Decimal::from(*a).cmp(b),
            (FieldValue::Number(a), FieldValue::Int(b)) => a.cmp(&Decimal::from(*b)),
            (FieldValue::Date(a), FieldValue::Date(b)) => a.cmp(b),
            (FieldValue::Text(a), FieldValue::Text(b)) => a.to_lowercase().cmp(&b.to_lowercase()),
            (a, b) => a.search_text().cmp(&b.search_text()),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Int(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

/// Records a [`PageView`] can search, filter and sort.
pub trait Viewable: Clone {
    /// Fields searched by free text.
    const FIELDS: &'static [&'static str];

    fn field(&self, name: &str) -> Option<FieldValue>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based.
    pub page: usize,
    pub per_page: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

impl<T> Page<T> {
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }
}

/// View state; the collection itself is passed to [`PageView::page`].
#[derive(Debug, Clone)]
pub struct PageView {
    search: String,
    filters: BTreeMap<String, FieldValue>,
    sort: Option<(String, SortOrder)>,
    page: usize,
    per_page: usize,
    /// Page count as of the last [`PageView::page`] call.
    last_total_pages: usize,
}

impl PageView {
    pub fn new(per_page: usize) -> Self {
        Self {
            search: String::new(),
            filters: BTreeMap::new(),
            sort: None,
            page: 1,
            per_page: per_page.max(1),
            last_total_pages: 1,
        }
    }

    pub fn current_page(&self) -> usize {
        self.page
    }

    pub fn per_page(&self) -> usize {
        self.per_page
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn set_search(&mut self, query: impl Into<String>) {
        self.search = query.into();
        self.page = 1;
    }

    pub fn set_filter(&mut self, field: &str, value: impl Into<FieldValue>) {
        self.filters.insert(field.to_string(), value.into());
        self.page = 1;
    }

    pub fn clear_filter(&mut self, field: &str) {
        if self.filters.remove(field).is_some() {
            self.page = 1;
        }
    }

    pub fn clear_filters(&mut self) {
        self.filters.clear();
        self.search.clear();
        self.page = 1;
    }

    pub fn set_sort(&mut self, field: &str, order: SortOrder) {
        self.sort = Some((field.to_string(), order));
    }

    /// Flip the order when `field` is already the sort key, otherwise sort by
    /// it ascending.
    pub fn toggle_sort(&mut self, field: &str) {
        let order = match &self.sort {
            Some((current, SortOrder::Asc)) if current == field => SortOrder::Desc,
            _ => SortOrder::Asc,
        };
        self.set_sort(field, order);
    }

    pub fn set_per_page(&mut self, per_page: usize) {
        self.per_page = per_page.max(1);
        self.page = 1;
    }

    /// Out-of-range pages (by the last computed page count) are ignored.
    pub fn go_to_page(&mut self, page: usize) -> bool {
        if page >= 1 && page <= self.last_total_pages {
            self.page = page;
            true
        } else {
            false
        }
    }

    pub fn next_page(&mut self) -> bool {
        self.go_to_page(self.page + 1)
    }

    pub fn prev_page(&mut self) -> bool {
        self.page > 1 && self.go_to_page(self.page - 1)
    }

    fn matches<T: Viewable>(&self, record: &T) -> bool {
        let needle = self.search.trim().to_lowercase();
        if !needle.is_empty() {
            let hit = T::FIELDS.iter().any(|name| {
                record
                    .field(name)
                    .map(|value| value.search_text().contains(&needle))
                    .unwrap_or(false)
            });
            if !hit {
                return false;
            }
        }
        self.filters.iter().all(|(name, expected)| {
            record
                .field(name)
                .map(|value| value.compare(expected) == Ordering::Equal)
                .unwrap_or(false)
        })
    }

    /// Records passing search and filters, sorted, before pagination.
    pub fn filtered<T: Viewable>(&self, records: &[T]) -> Vec<T> {
        let mut out: Vec<T> = records.iter().filter(|r| self.matches(*r)).cloned().collect();
        if let Some((field, order)) = &self.sort {
            out.sort_by(|a, b| {
                let ordering = match (a.field(field), b.field(field)) {
                    (Some(x), Some(y)) => x.compare(&y),
                    (Some(_), None) => Ordering::Less,
                    (None, Some(_)) => Ordering::Greater,
                    (None, None) => Ordering::Equal,
                };
                match order {
                    SortOrder::Asc => ordering,
                    SortOrder::Desc => ordering.reverse(),
                }
            });
        }
        out
    }

    /// The current page. A page that no longer exists (the collection
    /// shrank) is clamped to the last one.
    pub fn page<T: Viewable>(&mut self, records: &[T]) -> Page<T> {
        let filtered = self.filtered(records);
        let total_items = filtered.len();
        let total_pages = total_items.div_ceil(self.per_page).max(1);
        self.last_total_pages = total_pages;
        if self.page > total_pages {
            self.page = total_pages;
        }

        let start = (self.page - 1) * self.per_page;
        let items = filtered.into_iter().skip(start).take(self.per_page).collect();
        Page {
            items,
            page: self.page,
            per_page: self.per_page,
            total_items,
            total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::fixtures::lanc;
    use crate::model::lancamento::{Lancamento, TipoLancamento};

    fn records() -> Vec<Lancamento> {
        (1..=12)
            .map(|i| {
                let tipo = if i % 3 == 0 { TipoLancamento::Receita } else { TipoLancamento::Despesa };
                let cat = if i % 2 == 0 { Some("Mercado") } else { Some("Transporte") };
                lanc(i, tipo, i * 10, &format!("2024-01-{:02}", i), cat)
            })
            .collect()
    }

    #[test]
    fn test_pagination_is_one_based_with_ceil() {
        let mut view = PageView::new(5);
        let data = records();
        let page = view.page(&data);
        assert_eq!(page.page, 1);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.items.len(), 5);
        assert!(!page.has_prev() && page.has_next());

        assert!(view.go_to_page(3));
        let last = view.page(&data);
        assert_eq!(last.items.len(), 2);
        assert!(!last.has_next());

        assert!(!view.go_to_page(4));
        assert!(!view.go_to_page(0));
        assert_eq!(view.current_page(), 3);
    }

    #[test]
    fn test_search_is_case_insensitive_and_resets_page() {
        let mut view = PageView::new(5);
        let data = records();
        view.page(&data);
        view.go_to_page(2);

        view.set_search("MERCADO");
        assert_eq!(view.current_page(), 1);
        let page = view.page(&data);
        assert_eq!(page.total_items, 6);
        assert!(page.items.iter().all(|r| r.categoria.as_deref() == Some("Mercado")));
    }

    #[test]
    fn test_filter_and_sort() {
        let mut view = PageView::new(10);
        let data = records();
        view.set_filter("tipo", "RECEITA");
        view.set_sort("valor", SortOrder::Desc);
        let ids: Vec<i64> = view.page(&data).items.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![12, 9, 6, 3]);

        view.toggle_sort("valor");
        let ids: Vec<i64> = view.page(&data).items.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![3, 6, 9, 12]);

        view.clear_filter("tipo");
        assert_eq!(view.page(&data).total_items, 12);
    }

    #[test]
    fn test_shrinking_collection_clamps_page() {
        let mut view = PageView::new(5);
        let data = records();
        view.page(&data);
        view.go_to_page(3);
        let page = view.page(&data[..4]);
        assert_eq!(page.page, 1);
        assert_eq!(page.total_pages, 1);

        let empty: Vec<Lancamento> = Vec::new();
        let page = view.page(&empty);
        assert_eq!(page.total_pages, 1);
        assert!(page.items.is_empty());
    }
}
