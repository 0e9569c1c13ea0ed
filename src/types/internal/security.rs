/// Administrative view of one account's security state
///
/// Assembled by the admin service for the security-status endpoint. Must
/// never include the password hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecurityStatus {
    pub is_locked: bool,
    pub failed_attempts: i32,
    pub locked_until: Option<i64>,
    pub last_login: Option<i64>,
    pub is_active: bool,
    pub is_verified: bool,
}
