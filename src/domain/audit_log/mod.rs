//! Audit log domain.

#[cfg(feature = "http")]
pub mod client;

use serde::Deserialize;

use crate::http::Endpoint;
use crate::shared::serde_util::null_default;
use crate::shared::{Extra, ResponseMeta, Time};

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AuditLog {
    #[serde(default)]
    pub entity_type: String,
    #[serde(default)]
    pub entity_id: String,
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default, deserialize_with = "null_default::deserialize")]
    pub custom: Extra,
    #[serde(default)]
    pub created_at: Option<Time>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct QueryAuditLogsResponse {
    #[serde(flatten)]
    pub meta: ResponseMeta,
    #[serde(default, deserialize_with = "null_default::deserialize")]
    pub audit_logs: Vec<AuditLog>,
    #[serde(default, deserialize_with = "null_default::deserialize")]
    pub next: String,
    #[serde(default, deserialize_with = "null_default::deserialize")]
    pub prev: String,
}

/// What to look for. The entity filter applies only when both type and id
/// are set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryAuditLogsFilters {
    pub entity_type: String,
    pub entity_id: String,
    pub user_id: String,
}

/// Cursor and page size; a zero limit leaves the server default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryAuditLogsPager {
    pub next: String,
    pub prev: String,
    pub limit: u32,
}

impl QueryAuditLogsPager {
    /// Pager for the page after `resp`.
    pub fn after(resp: &QueryAuditLogsResponse, limit: u32) -> Self {
        Self {
            next: resp.next.clone(),
            limit,
            ..Default::default()
        }
    }
}

pub(crate) fn push_query(
    endpoint: &mut Endpoint,
    filters: &QueryAuditLogsFilters,
    pager: &QueryAuditLogsPager,
) {
    if !filters.entity_type.is_empty() && !filters.entity_id.is_empty() {
        endpoint
            .push("entity_type", &filters.entity_type)
            .push("entity_id", &filters.entity_id);
    }
    endpoint
        .push("user_id", &filters.user_id)
        .push("next", &pager.next)
        .push("prev", &pager.prev);
    if pager.limit > 0 {
        endpoint.push("limit", pager.limit);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{BaseUrls, Service};
    use pretty_assertions::assert_eq;

    fn endpoint() -> Endpoint {
        BaseUrls::new(None, None, None)
            .unwrap()
            .endpoint(Service::Api, "key", "audit_logs/")
            .unwrap()
    }

    fn keys(endpoint: &Endpoint) -> Vec<&str> {
        endpoint.query().iter().map(|(k, _)| k.as_str()).collect()
    }

    #[test]
    fn test_entity_filter_needs_type_and_id() {
        let mut ep = endpoint();
        let filters = QueryAuditLogsFilters {
            entity_type: "activity".into(),
            ..Default::default()
        };
        push_query(&mut ep, &filters, &QueryAuditLogsPager::default());
        assert_eq!(keys(&ep), vec!["api_key"]);
    }

    #[test]
    fn test_full_query_order() {
        let mut ep = endpoint();
        let filters = QueryAuditLogsFilters {
            entity_type: "activity".into(),
            entity_id: "a1".into(),
            user_id: "bob".into(),
        };
        let pager = QueryAuditLogsPager {
            next: "n1".into(),
            prev: "p1".into(),
            limit: 25,
        };
        push_query(&mut ep, &filters, &pager);
        assert_eq!(
            keys(&ep),
            vec!["api_key", "entity_type", "entity_id", "user_id", "next", "prev", "limit"]
        );
    }

    #[test]
    fn test_response_decode() {
        let resp: QueryAuditLogsResponse = serde_json::from_value(serde_json::json!({
            "audit_logs": [{
                "entity_type": "activity",
                "entity_id": "a1",
                "action": "update",
                "user_id": "bob",
                "custom": null,
                "created_at": "2024-02-03T04:05:06.789Z"
            }],
            "next": "cursor-2",
            "prev": ""
        }))
        .unwrap();
        assert_eq!(resp.audit_logs[0].action, "update");
        assert!(resp.audit_logs[0].created_at.is_some());
        assert_eq!(QueryAuditLogsPager::after(&resp, 10).next, "cursor-2");
    }

    #[test]
    fn test_null_cursors_decode_empty() {
        let resp: QueryAuditLogsResponse =
            serde_json::from_str(r#"{"audit_logs":null,"next":null,"prev":null}"#).unwrap();
        assert!(resp.audit_logs.is_empty());
        assert!(resp.next.is_empty() && resp.prev.is_empty());
    }
}
