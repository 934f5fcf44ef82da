use crate::{Error, Result};

/// A bounded slice of a result set: 1-based page number, page size and an
/// optional raw order clause. The start offset is `(page - 1) * size`.
#[derive(Debug, Clone)]
pub struct PageRequest {
    page: u64,
    size: u64,
    order_by: Option<String>,
}

impl PageRequest {
    pub fn of(page: u64, size: u64) -> Result<Self> {
        if page == 0 || size == 0 {
            return Err(Error::Validation(
                "page and size must both be positive".into(),
            ));
        }
        Ok(Self {
            page,
            size,
            order_by: None,
        })
    }

    pub fn with_order(mut self, order_by: impl Into<String>) -> Self {
        self.order_by = Some(order_by.into());
        self
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn start_row(&self) -> u64 {
        (self.page - 1) * self.size
    }

    pub fn order_clause(&self) -> Option<&str> {
        self.order_by.as_deref()
    }
}

/// One resolved page: total row count of the filter, the returned slice and
/// its bookkeeping. `end_row` is `start_row + count`, or `0` for an empty
/// page.
#[derive(Debug)]
pub struct PageResult<E> {
    pub total: i64,
    pub count: u64,
    pub page: u64,
    pub size: u64,
    pub start_row: u64,
    pub end_row: u64,
    pub elements: Vec<E>,
}

impl<E> PageResult<E> {
    pub(crate) fn empty(request: &PageRequest, total: i64) -> Self {
        Self {
            total,
            count: 0,
            page: request.page(),
            size: request.size(),
            start_row: request.start_row(),
            end_row: 0,
            elements: Vec::new(),
        }
    }

    pub(crate) fn filled(request: &PageRequest, total: i64, elements: Vec<E>) -> Self {
        let count = elements.len() as u64;
        Self {
            total,
            count,
            page: request.page(),
            size: request.size(),
            start_row: request.start_row(),
            end_row: request.start_row() + count,
            elements,
        }
    }
}
