/// Result-count limit for the search tools
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationPolicy {
    limit: usize,
}

impl PaginationPolicy {
    pub const DEFAULT_LIMIT: usize = 100;
    pub const MAX_LIMIT: usize = 1000;

    /// Clamp a requested limit into `[1, MAX_LIMIT]`; `None` means the default
    pub fn clamp(requested: Option<i64>) -> usize {
        match requested {
            None => Self::DEFAULT_LIMIT,
            Some(value) if value < 1 => 1,
            Some(value) => usize::try_from(value)
                .unwrap_or(Self::MAX_LIMIT)
                .min(Self::MAX_LIMIT),
        }
    }

    pub fn from_request(requested: Option<i64>) -> Self {
        Self {
            limit: Self::clamp(requested),
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Keep the first `limit` items in their original order
    pub fn apply<T>(&self, mut items: Vec<T>) -> Vec<T> {
        items.truncate(self.limit);
        items
    }
}

impl Default for PaginationPolicy {
    fn default() -> Self {
        Self::from_request(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_bounds() {
        assert_eq!(PaginationPolicy::clamp(None), 100);
        assert_eq!(PaginationPolicy::clamp(Some(0)), 1);
        assert_eq!(PaginationPolicy::clamp(Some(-20)), 1);
        assert_eq!(PaginationPolicy::clamp(Some(50)), 50);
        assert_eq!(PaginationPolicy::clamp(Some(5000)), 1000);
        assert_eq!(PaginationPolicy::clamp(Some(i64::MAX)), 1000);
    }

    #[test]
    fn apply_keeps_order_preserving_prefix() {
        let policy = PaginationPolicy::from_request(Some(3));
        assert_eq!(policy.apply(vec![5, 4, 3, 2, 1]), vec![5, 4, 3]);
        assert_eq!(policy.apply(vec![1]), vec![1]);
        assert_eq!(policy.apply(Vec::<u8>::new()), Vec::<u8>::new());
    }
}
