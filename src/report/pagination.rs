// ==========================================
// 物料报表系统 - 分页
// ==========================================
// 参数: page（从 1 开始，默认 1）、itemsPerPage（默认 10）
// 约束: 两者均须为正整数，否则请求失败（HTTP 400）
// ==========================================

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_ITEMS_PER_PAGE: u64 = 10;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PaginationError {
    #[error("分页参数无效: {field} 必须为正整数 (实际值: {value:?})")]
    InvalidParameter { field: &'static str, value: String },
}

/// 原始查询参数（保持字符串，便于给出统一的 400 错误）
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
    #[serde(rename = "itemsPerPage")]
    pub items_per_page: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub items_per_page: u64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            items_per_page: DEFAULT_ITEMS_PER_PAGE,
        }
    }
}

impl PageRequest {
    pub fn parse(
        page: Option<&str>,
        items_per_page: Option<&str>,
    ) -> Result<Self, PaginationError> {
        Ok(Self {
            page: parse_positive("page", page, DEFAULT_PAGE)?,
            items_per_page: parse_positive(
                "itemsPerPage",
                items_per_page,
                DEFAULT_ITEMS_PER_PAGE,
            )?,
        })
    }

    pub fn from_query(query: &PageQuery) -> Result<Self, PaginationError> {
        Self::parse(query.page.as_deref(), query.items_per_page.as_deref())
    }

    /// 从 0 开始的偏移量
    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.items_per_page)
    }
}

fn parse_positive(
    field: &'static str,
    raw: Option<&str>,
    default: u64,
) -> Result<u64, PaginationError> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    match raw.trim().parse::<u64>() {
        Ok(v) if v > 0 => Ok(v),
        _ => Err(PaginationError::InvalidParameter {
            field,
            value: raw.to_string(),
        }),
    }
}

/// 分页响应
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub total_items: u64,
    pub current_page: u64,
    pub total_pages: u64,
    pub data: Vec<T>,
}

impl<T> Page<T> {
    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            total_items: self.total_items,
            current_page: self.current_page,
            total_pages: self.total_pages,
            data: self.data.into_iter().map(f).collect(),
        }
    }
}

/// 对完整结果集切页
pub fn paginate<T>(items: Vec<T>, request: PageRequest) -> Page<T> {
    let total_items = items.len() as u64;
    let total_pages = total_items.div_ceil(request.items_per_page);
    let offset = usize::try_from(request.offset()).unwrap_or(usize::MAX);
    let limit = usize::try_from(request.items_per_page).unwrap_or(usize::MAX);

    Page {
        total_items,
        current_page: request.page,
        total_pages,
        data: items.into_iter().skip(offset).take(limit).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let req = PageRequest::parse(None, None).unwrap();
        assert_eq!(req, PageRequest::default());
        assert_eq!(req.offset(), 0);
    }

    #[test]
    fn test_twenty_five_items_page_size_ten() {
        let items: Vec<u32> = (1..=25).collect();

        let first = paginate(items.clone(), PageRequest::parse(Some("1"), Some("10")).unwrap());
        assert_eq!(first.data.len(), 10);
        assert_eq!(first.total_pages, 3);
        assert_eq!(first.total_items, 25);

        let third = paginate(items.clone(), PageRequest::parse(Some("3"), Some("10")).unwrap());
        assert_eq!(third.data, vec![21, 22, 23, 24, 25]);
        assert_eq!(third.current_page, 3);

        let beyond = paginate(items, PageRequest::parse(Some("4"), Some("10")).unwrap());
        assert!(beyond.data.is_empty());
        assert_eq!(beyond.total_pages, 3);
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(PageRequest::parse(Some("0"), None).is_err());
        assert!(PageRequest::parse(None, Some("-1")).is_err());
        assert!(PageRequest::parse(Some("abc"), None).is_err());
        assert!(PageRequest::parse(Some(""), None).is_err());
        assert!(PageRequest::parse(Some("1.5"), None).is_err());

        let err = PageRequest::parse(None, Some("x")).unwrap_err();
        assert!(err.to_string().contains("itemsPerPage"));
    }

    #[test]
    fn test_empty_result_has_zero_pages() {
        let page = paginate(Vec::<u32>::new(), PageRequest::default());
        assert_eq!(page.total_pages, 0);
        assert!(page.data.is_empty());
    }

    #[test]
    fn test_page_serializes_camel_case() {
        let page = paginate(vec![1], PageRequest::default());
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["totalItems"], 1);
        assert_eq!(json["currentPage"], 1);
        assert_eq!(json["totalPages"], 1);
        assert_eq!(json["data"][0], 1);
    }
}
