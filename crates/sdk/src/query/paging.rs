use serde::{Deserialize, Serialize};

use crate::types::{BlockNumber, SubgraphId};

/// Page size when not specified.
pub const DEFAULT_TAKE: u32 = 100;

/// Largest page size. One extra row is always requested to detect further
/// pages, and the indexing service returns at most 1000 rows per query.
pub const MAX_TAKE: u32 = 999;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderDirection {
    #[default]
    Asc,
    Desc,
}

impl OrderDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderDirection::Asc => "asc",
            OrderDirection::Desc => "desc",
        }
    }
}

/// Field of an entity kind results could be ordered by.
pub trait OrderField: Copy + Default + Send + Sync {
    /// Field name as known to the indexing service.
    fn field(&self) -> &'static str;

    /// Whether the field has no ties across entities, so no tie-break is
    /// needed.
    fn is_unique(&self) -> bool { self.field() == ID_FIELD }
}

pub(crate) const ID_FIELD: &str = "id";

/// Order of list query results.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order<O> {
    pub order_by: O,
    pub direction: OrderDirection,
}

impl<O: OrderField> Order<O> {
    pub fn asc(order_by: O) -> Self { Self { order_by, direction: OrderDirection::Asc } }

    pub fn desc(order_by: O) -> Self { Self { order_by, direction: OrderDirection::Desc } }

    /// Sort keys with entity ID appended as the tie-break, so that pages
    /// neither skip nor repeat rows with equal values of the ordering field.
    pub fn keys(&self) -> Vec<OrderKey> {
        let mut keys = vec![OrderKey { field: self.order_by.field(), direction: self.direction }];
        if !self.order_by.is_unique() {
            keys.push(OrderKey { field: ID_FIELD, direction: self.direction });
        }
        keys
    }
}

/// Single sort key of a request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct OrderKey {
    pub field: &'static str,
    pub direction: OrderDirection,
}

impl OrderKey {
    pub(crate) fn id_asc() -> Self { Self { field: ID_FIELD, direction: OrderDirection::Asc } }
}

/// Window of the list query.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Paging {
    /// Skip-take window.
    Skip { skip: u32, take: u32 },
    /// Rows strictly after the given entity ID, in ID order. Not limited by
    /// the indexing service maximum skip.
    LastId { last_id: Option<SubgraphId>, take: u32 },
}

impl Default for Paging {
    fn default() -> Self { Self::Skip { skip: 0, take: DEFAULT_TAKE } }
}

impl Paging {
    /// Skip-take window with `take` clamped to `1..=MAX_TAKE`.
    pub fn skip(skip: u32, take: u32) -> Self { Self::Skip { skip, take: take.clamp(1, MAX_TAKE) } }

    /// Cursor window with `take` clamped to `1..=MAX_TAKE`.
    pub fn last_id(last_id: Option<SubgraphId>, take: u32) -> Self {
        Self::LastId { last_id, take: take.clamp(1, MAX_TAKE) }
    }

    pub fn take(&self) -> u32 {
        match self {
            Paging::Skip { take, .. } | Paging::LastId { take, .. } => (*take).clamp(1, MAX_TAKE),
        }
    }
}

/// Page of list query results.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PagedResult<T> {
    items: Vec<T>,
    has_more: bool,
    paging: Paging,
}

impl<T> PagedResult<T> {
    /// Builds the page out of up to `take + 1` fetched rows, the extra row
    /// only signalling there is more.
    pub(crate) fn from_rows(mut rows: Vec<T>, paging: Paging) -> Self {
        let take = paging.take() as usize;
        let has_more = rows.len() > take;
        rows.truncate(take);
        Self { items: rows, has_more, paging }
    }

    pub fn items(&self) -> &[T] { &self.items }

    pub fn into_items(self) -> Vec<T> { self.items }

    /// Indicator of more results beyond this page.
    pub fn has_more(&self) -> bool { self.has_more }

    /// Paging this page was requested with.
    pub fn paging(&self) -> &Paging { &self.paging }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PagedResult<U> {
        PagedResult {
            items: self.items.into_iter().map(f).collect(),
            has_more: self.has_more,
            paging: self.paging,
        }
    }
}

impl<T: super::Entity> PagedResult<T> {
    /// Paging of the following page, if any.
    pub fn next_paging(&self) -> Option<Paging> {
        if !self.has_more {
            return None;
        }
        let take = self.paging.take();
        Some(match &self.paging {
            Paging::Skip { skip, .. } => Paging::Skip { skip: skip.saturating_add(take), take },
            Paging::LastId { .. } => Paging::LastId {
                last_id: self.items.last().map(|item| item.id().to_string()),
                take,
            },
        })
    }
}

/// List query of an entity kind.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ListQuery<F, O> {
    /// Absent filter does not constrain results.
    pub filter: Option<F>,
    /// Ordered by ID ascending when absent.
    pub order: Option<Order<O>>,
    pub paging: Paging,
    /// Block to query the state at, latest indexed when absent.
    pub block: Option<BlockNumber>,
}

impl<F, O> Default for ListQuery<F, O> {
    fn default() -> Self { Self { filter: None, order: None, paging: Paging::default(), block: None } }
}

impl<F, O> ListQuery<F, O> {
    pub fn new(paging: Paging) -> Self { Self { paging, ..Default::default() } }

    pub fn with_filter(mut self, filter: F) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn with_order(mut self, order: Order<O>) -> Self {
        self.order = Some(order);
        self
    }

    pub fn at_block(mut self, block: BlockNumber) -> Self {
        self.block = Some(block);
        self
    }
}

/// Get query of a single entity.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetQuery {
    pub id: SubgraphId,
    pub block: Option<BlockNumber>,
}

impl GetQuery {
    pub fn new(id: impl Into<SubgraphId>) -> Self { Self { id: id.into(), block: None } }

    pub fn at_block(mut self, block: BlockNumber) -> Self {
        self.block = Some(block);
        self
    }
}
