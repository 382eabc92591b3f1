use crate::models::{Profile, UserRole};

pub const LOGIN_PATH: &str = "/auth";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Granted,
    /// No signed-in profile; send the visitor to the login screen.
    Login,
    /// Signed in as the other role; send them to their own dashboard.
    Redirect(&'static str),
}

pub fn resolve_access(profile: Option<&Profile>, required: Option<UserRole>) -> Access {
    let Some(profile) = profile else {
        return Access::Login;
    };

    match required {
        Some(role) if role != profile.role => Access::Redirect(profile.role.dashboard_path()),
        _ => Access::Granted,
    }
}

/// Where the landing page sends a visitor.
pub fn landing_path(role: Option<UserRole>) -> &'static str {
    role.map(|r| r.dashboard_path()).unwrap_or(LOGIN_PATH)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(role: UserRole) -> Profile {
        Profile {
            id: 1,
            name: "Rina".to_string(),
            role,
            class: None,
        }
    }

    #[test]
    fn anonymous_visitor_goes_to_login() {
        assert_eq!(resolve_access(None, None), Access::Login);
        assert_eq!(resolve_access(None, Some(UserRole::Admin)), Access::Login);
    }

    #[test]
    fn matching_role_is_granted() {
        let admin = profile(UserRole::Admin);
        let user = profile(UserRole::User);
        assert_eq!(resolve_access(Some(&admin), Some(UserRole::Admin)), Access::Granted);
        assert_eq!(resolve_access(Some(&user), Some(UserRole::User)), Access::Granted);
        assert_eq!(resolve_access(Some(&user), None), Access::Granted);
    }

    #[test]
    fn mismatched_role_is_sent_to_own_dashboard() {
        let admin = profile(UserRole::Admin);
        let user = profile(UserRole::User);
        assert_eq!(
            resolve_access(Some(&user), Some(UserRole::Admin)),
            Access::Redirect("/user")
        );
        assert_eq!(
            resolve_access(Some(&admin), Some(UserRole::User)),
            Access::Redirect("/admin")
        );
    }

    #[test]
    fn landing_follows_role() {
        assert_eq!(landing_path(Some(UserRole::Admin)), "/admin");
        assert_eq!(landing_path(Some(UserRole::User)), "/user");
        assert_eq!(landing_path(None), "/auth");
    }
}
