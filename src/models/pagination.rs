use serde::{Deserialize, Serialize};

/// 分页参数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PaginationOptions {
    /// 页码，从 1 开始
    pub page: u32,
    /// 每页条数
    pub limit: u32,
}

impl PaginationOptions {
    pub fn new(page: u32, limit: u32) -> Self {
        Self { page, limit }
    }
}

/// 分页列表响应
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResult<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    #[serde(default)]
    pub total_count: u64,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub current_page: u32,
}

impl<T> PageResult<T> {
    /// 服务端无响应体时使用的空页
    pub fn empty(page: u32) -> Self {
        Self {
            data: Vec::new(),
            total_count: 0,
            total_pages: 0,
            current_page: page,
        }
    }
}
