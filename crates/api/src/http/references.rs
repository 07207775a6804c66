use async_trait::async_trait;
use portal_core::model::{ReferenceItem, ReferenceKind, Session};

use super::{Call, Discriminator, HttpPortal, paths};
use crate::repository::{ApiError, ReferenceRepository};

/// Master-list source per kind. Countries and states only arrive with the profile view.
fn source(kind: ReferenceKind) -> Option<&'static str> {
    match kind {
        ReferenceKind::Country | ReferenceKind::State => None,
        ReferenceKind::Status => Some("get_master_user_current_status"),
        ReferenceKind::Gender => Some("get_master_genders"),
        ReferenceKind::Institute => Some("get_master_institutes"),
        ReferenceKind::Degree => Some("get_master_degrees"),
        ReferenceKind::Company => Some("get_master_companies"),
        ReferenceKind::Designation => Some("get_master_designations"),
    }
}

#[async_trait]
impl ReferenceRepository for HttpPortal {
    async fn reference_list(
        &self,
        session: &Session,
        kind: ReferenceKind,
    ) -> Result<Vec<ReferenceItem>, ApiError> {
        let source = source(kind).ok_or(ApiError::NotFound)?;
        let call = Call::authed(Discriminator::Source(source), session);
        self.post(paths::MASTER, call).await?.data_list()
    }
}
