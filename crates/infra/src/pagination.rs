/// Offset-based window over an already ordered list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LimitOffset {
    pub limit: i64,
    pub offset: i64,
}

impl Default for LimitOffset {
    fn default() -> Self {
        Self {
            limit: 20,
            offset: 0,
        }
    }
}

impl LimitOffset {
    pub fn new(limit: Option<i64>, offset: Option<i64>) -> Self {
        let default = Self::default();
        Self {
            limit: limit.unwrap_or(default.limit).clamp(0, 100),
            offset: offset.unwrap_or(default.offset).max(0),
        }
    }

    /// Returns the window of `items` selected by this limit/offset.
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let start = (self.offset as usize).min(items.len());
        let end = start.saturating_add(self.limit as usize).min(items.len());
        &items[start..end]
    }
}
