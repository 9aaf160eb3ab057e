/// Event types for the security audit log
pub mod audit_events {
    // Authentication events
    pub const SIGNUP: &str = "signup";
    pub const LOGIN_SUCCESS: &str = "login_success";
    pub const LOGIN_FAILED: &str = "login_failed";
    pub const LOGOUT: &str = "logout";

    // Lockout events
    pub const ACCOUNT_LOCKED: &str = "account_locked";

    // Complaint lifecycle events
    pub const COMPLAINT_RESOLVED: &str = "complaint_resolved";
}
