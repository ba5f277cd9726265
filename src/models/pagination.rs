//! 分页相关的数据结构

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{PendingValidationResponse, PromoCodeResponse, SpinRecordResponse};

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct PaginationParams {
    /// 页码 (默认 1)
    pub page: Option<u32>,
    /// 每页数量 (默认 20, 上限 100)
    pub per_page: Option<u32>,
}

impl PaginationParams {
    pub fn get_page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn get_per_page(&self) -> u32 {
        self.per_page.unwrap_or(20).clamp(1, 100)
    }

    pub fn get_offset(&self) -> usize {
        ((self.get_page() - 1) * self.get_per_page()) as usize
    }

    pub fn get_limit(&self) -> usize {
        self.get_per_page() as usize
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[aliases(
    PaginatedSpinRecords = PaginatedResponse<SpinRecordResponse>,
    PaginatedPendingValidations = PaginatedResponse<PendingValidationResponse>,
    PaginatedPromoCodes = PaginatedResponse<PromoCodeResponse>
)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub page: u32,
    pub page_size: u32,
    pub total: i64,
    pub total_pages: i64,
}

impl<T> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, params: &PaginationParams, total: i64) -> Self {
        let page_size = params.get_per_page();
        let total_pages = (total + page_size as i64 - 1) / page_size as i64;
        Self {
            data,
            page: params.get_page(),
            page_size,
            total,
            total_pages: total_pages.max(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_params() {
        let params = PaginationParams {
            page: Some(2),
            per_page: Some(10),
        };
        assert_eq!(params.get_page(), 2);
        assert_eq!(params.get_per_page(), 10);
        assert_eq!(params.get_offset(), 10);
        assert_eq!(params.get_limit(), 10);
    }

    #[test]
    fn test_pagination_params_defaults() {
        let params = PaginationParams {
            page: None,
            per_page: None,
        };
        assert_eq!(params.get_page(), 1);
        assert_eq!(params.get_per_page(), 20);
        assert_eq!(params.get_offset(), 0);
    }

    #[test]
    fn test_paginated_response_total_pages() {
        let params = PaginationParams {
            page: Some(1),
            per_page: Some(10),
        };
        let page: PaginatedResponse<i64> = PaginatedResponse::new(vec![], &params, 25);
        assert_eq!(page.total_pages, 3);

        let empty: PaginatedResponse<i64> = PaginatedResponse::new(vec![], &params, 0);
        assert_eq!(empty.total_pages, 1);
    }
}
