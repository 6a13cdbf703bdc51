// Invitations service: issue invitations and turn a pending one into a team member.

use crate::db::{DashboardDb, DbAgency, DbInvitation, DbUser};
use crate::error::ServiceError;
use crate::types::{InvitationStatus, Principal, Role};

/// Reconcile the signed-in principal against pending invitations.
///
/// With a pending invitation for the principal's email, the invitee's user
/// row is created (role and agency taken from the invitation), an
/// "Invitation of … accepted!" entry is appended to the agency's activity
/// log, and the invitation is deleted, all in one transaction. Without one,
/// the agency the principal already belongs to is returned.
///
/// A failure to write the activity-log entry is logged and does not undo
/// the acceptance.
pub fn reconcile_invitation(
    db: &DashboardDb,
    principal: Option<&Principal>,
) -> Result<Option<DbAgency>, ServiceError> {
    let Some(principal) = principal else {
        return Ok(None);
    };

    db.with_transaction(|tx| -> Result<_, ServiceError> {
        let Some(invitation) = tx.get_pending_invitation(&principal.email)? else {
            return Ok(tx.get_agency_for_member_email(&principal.email)?);
        };

        let now = DashboardDb::now();
        let user = DbUser {
            id: DashboardDb::new_id(),
            name: principal.full_name(),
            avatar_url: principal.image_url.clone(),
            email: principal.email.clone(),
            role: invitation.role,
            agency_id: Some(invitation.agency_id.clone()),
            created_at: now.clone(),
            updated_at: now,
        };
        tx.insert_user(&user)?;

        let message = format!("Invitation of {} accepted!", principal.full_name());
        if let Err(e) = super::notifications::record_activity(
            tx,
            &user.id,
            Some(&invitation.agency_id),
            None,
            &message,
        ) {
            log::warn!(
                "Could not log acceptance of invitation {} for {}: {}",
                invitation.id,
                principal.email,
                e
            );
        }

        tx.delete_invitation(&invitation.id)?;
        log::info!(
            "Invitation {} accepted by {} as {}",
            invitation.id,
            principal.email,
            invitation.role.as_str()
        );

        // Looked up by the invitation's id rather than its agency_id, so this
        // is normally None; the next call finds the agency via membership.
        Ok(tx.get_agency(&invitation.id)?)
    })
}

/// Invite `email` into an agency with `role`.
///
/// At most one invitation exists per email; a second one for the same
/// address is rejected whatever the first one's status.
pub fn create_invitation(
    db: &DashboardDb,
    agency_id: &str,
    email: &str,
    role: Role,
) -> Result<DbInvitation, ServiceError> {
    crate::validation::require_email("email", email)?;

    db.with_transaction(|tx| -> Result<_, ServiceError> {
        if tx.get_invitation_by_email(email)?.is_some() {
            return Err(ServiceError::InvitationExists);
        }
        if tx.get_agency(agency_id)?.is_none() {
            return Err(ServiceError::NotFound {
                entity: "Agency",
                id: agency_id.to_string(),
            });
        }

        let invitation = DbInvitation {
            id: DashboardDb::new_id(),
            email: email.to_string(),
            agency_id: agency_id.to_string(),
            status: InvitationStatus::Pending,
            role,
        };
        tx.insert_invitation(&invitation)?;
        log::info!(
            "Invited {} to agency {} as {}",
            email,
            agency_id,
            role.as_str()
        );
        Ok(invitation)
    })
}
