/// Permission checks shared by the handlers
///
/// Anonymous callers get 401 where authentication is required; an
/// authenticated caller without the role or ownership gets 403.
use crate::error::{AppError, Result};

use super::Principal;

/// Caller must be authenticated
pub fn require_authenticated(principal: Option<&Principal>) -> Result<&Principal> {
    principal.ok_or_else(|| {
        AppError::Authentication("Authentication credentials were not provided".to_string())
    })
}

/// Caller must be a staff member
pub fn require_staff(principal: Option<&Principal>) -> Result<&Principal> {
    let principal = require_authenticated(principal)?;
    if principal.is_staff {
        Ok(principal)
    } else {
        Err(AppError::Authorization(
            "Only staff members can perform this action".to_string(),
        ))
    }
}

/// Caller must own the object (`owner_id`) or be staff
pub fn check_owner_or_staff(principal: &Principal, owner_id: i64) -> Result<()> {
    if principal.is_staff || principal.user_id == owner_id {
        Ok(())
    } else {
        Err(AppError::Authorization(
            "You do not have permission to access this object".to_string(),
        ))
    }
}
