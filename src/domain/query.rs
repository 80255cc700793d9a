use super::order::Order;
use std::convert::Infallible;
use std::str::FromStr;

/// Status filter as offered by the dashboard's filter control.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    /// Matches an order whose aggregate or stored status has this token.
    Token(String),
}

impl FromStr for StatusFilter {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        if token.is_empty() || token == "all" {
            Ok(StatusFilter::All)
        } else {
            Ok(StatusFilter::Token(token.to_string()))
        }
    }
}

/// Search term plus status filter applied to the order list.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OrderQuery {
    search: String,
    pub status: StatusFilter,
}

impl OrderQuery {
    pub fn new(search: &str, status: StatusFilter) -> Self {
        Self {
            search: search.trim().to_lowercase(),
            status,
        }
    }

    pub fn matches(&self, order: &Order) -> bool {
        self.matches_search(order) && self.matches_status(order)
    }

    fn matches_search(&self, order: &Order) -> bool {
        if self.search.is_empty() {
            return true;
        }
        [
            Some(order.order_id.as_str()),
            order.record_id.as_deref(),
            order.customer.first_name.as_deref(),
            order.customer.last_name.as_deref(),
        ]
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(&self.search))
    }

    fn matches_status(&self, order: &Order) -> bool {
        match &self.status {
            StatusFilter::All => true,
            StatusFilter::Token(token) => {
                order.overall_status().as_str() == token.as_str()
                    || order
                        .status
                        .as_ref()
                        .is_some_and(|stored| stored.as_str() == token.as_str())
            }
        }
    }
}
