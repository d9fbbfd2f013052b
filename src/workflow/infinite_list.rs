//! 无限滚动列表的分页状态

use crate::models::PageResult;

/// 已加载的页，按页码顺序
#[derive(Debug, Clone)]
pub struct InfiniteList<T> {
    limit: u32,
    pages: Vec<PageResult<T>>,
}

impl<T> InfiniteList<T> {
    pub fn new(limit: u32) -> Self {
        Self {
            limit: limit.max(1),
            pages: Vec::new(),
        }
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// 下一页页码
    ///
    /// 尚未加载时为第 1 页；之后以已加载页数为当前页，小于最后一页返回的
    /// `total_pages` 时才有下一页。
    pub fn next_page_param(&self) -> Option<u32> {
        match self.pages.last() {
            None => Some(1),
            Some(last) => {
                let current = self.pages.len() as u32;
                (current < last.total_pages).then(|| current + 1)
            }
        }
    }

    /// 已加载至少一页且还有下一页
    pub fn has_next_page(&self) -> bool {
        !self.pages.is_empty() && self.next_page_param().is_some()
    }

    pub fn push(&mut self, page: PageResult<T>) {
        self.pages.push(page);
    }

    /// 清空已加载的页，返回清空前的页数
    pub fn reset(&mut self) -> usize {
        let loaded = self.pages.len();
        self.pages.clear();
        loaded
    }

    pub fn loaded_pages(&self) -> usize {
        self.pages.len()
    }

    pub fn pages(&self) -> &[PageResult<T>] {
        &self.pages
    }

    /// 所有已加载条目
    pub fn items(&self) -> impl Iterator<Item = &T> {
        self.pages.iter().flat_map(|page| page.data.iter())
    }

    /// 服务端报告的总条数（以最后一页为准）
    pub fn total_count(&self) -> u64 {
        self.pages.last().map_or(0, |page| page.total_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(current: u32, total_pages: u32, data: Vec<u32>) -> PageResult<u32> {
        PageResult {
            total_count: 25,
            total_pages,
            current_page: current,
            data,
        }
    }

    #[test]
    fn walks_pages_until_total() {
        let mut list = InfiniteList::new(10);
        assert_eq!(list.next_page_param(), Some(1));
        assert!(!list.has_next_page());

        list.push(page(1, 3, (0..10).collect()));
        assert_eq!(list.next_page_param(), Some(2));
        assert!(list.has_next_page());

        list.push(page(2, 3, (10..20).collect()));
        list.push(page(3, 3, (20..25).collect()));
        assert_eq!(list.next_page_param(), None);
        assert_eq!(list.items().count(), 25);
        assert_eq!(list.total_count(), 25);
    }

    #[test]
    fn empty_result_has_no_next_page() {
        let mut list: InfiniteList<u32> = InfiniteList::new(10);
        list.push(PageResult::empty(1));
        assert_eq!(list.next_page_param(), None);
        assert_eq!(list.reset(), 1);
        assert_eq!(list.next_page_param(), Some(1));
    }
}
