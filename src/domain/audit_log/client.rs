//! Audit logs sub-client.

use crate::auth::{AuthScope, Resource};
use crate::client::StreamClient;
use crate::domain::audit_log::{
    push_query, QueryAuditLogsFilters, QueryAuditLogsPager, QueryAuditLogsResponse,
};
use crate::error::SdkError;

pub struct AuditLogs<'a> {
    pub(crate) client: &'a StreamClient,
}

impl<'a> AuditLogs<'a> {
    pub async fn query(
        &self,
        filters: &QueryAuditLogsFilters,
        pager: &QueryAuditLogsPager,
    ) -> Result<QueryAuditLogsResponse, SdkError> {
        let mut endpoint = self.client.http.endpoint("audit_logs/")?;
        push_query(&mut endpoint, filters, pager);
        self.client
            .http
            .get(&endpoint, &AuthScope::App(Resource::AuditLogs))
            .await
    }
}
