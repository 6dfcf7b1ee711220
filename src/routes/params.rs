use serde::Deserialize;
use utoipa::ToSchema;

/// Page/limit arrive as raw query strings; anything that is not a positive
/// integer falls back to the defaults (page=1, limit=10).
#[derive(Debug, Deserialize, ToSchema, Default)]
pub struct Pagination {
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl Pagination {
    pub fn normalize(&self) -> (i64, i64, i64) {
        let page = parse_positive(self.page.as_deref()).unwrap_or(1);
        let limit = parse_positive(self.limit.as_deref()).unwrap_or(10).min(100);
        let offset = (page - 1) * limit;
        (page, limit, offset)
    }
}

fn parse_positive(value: Option<&str>) -> Option<i64> {
    value?.trim().parse::<i64>().ok().filter(|v| *v > 0)
}

#[derive(Debug, Deserialize, ToSchema, Default)]
pub struct OrderListQuery {
    #[serde(flatten)]
    pub pagination: Pagination,
    pub status: Option<String>,
    pub customer_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pagination(page: Option<&str>, limit: Option<&str>) -> Pagination {
        Pagination {
            page: page.map(String::from),
            limit: limit.map(String::from),
        }
    }

    #[test]
    fn absent_params_use_defaults() {
        assert_eq!(pagination(None, None).normalize(), (1, 10, 0));
    }

    #[test]
    fn non_numeric_and_non_positive_fall_back() {
        assert_eq!(pagination(Some("abc"), Some("xyz")).normalize(), (1, 10, 0));
        assert_eq!(pagination(Some("0"), Some("-3")).normalize(), (1, 10, 0));
        assert_eq!(pagination(Some("2.5"), None).normalize(), (1, 10, 0));
    }

    #[test]
    fn page_two_of_five_skips_first_five() {
        assert_eq!(pagination(Some("2"), Some("5")).normalize(), (2, 5, 5));
    }

    #[test]
    fn limit_is_capped() {
        assert_eq!(pagination(None, Some("1000")).normalize(), (1, 100, 0));
    }
}
