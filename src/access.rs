//! Who may open which page.
//!
//! The rules are a table checked top to bottom; the first rule whose viewer
//! and path both match decides.

use crate::session::{Role, UserInfo};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Viewer {
    Anonymous,
    Employee,
    Admin,
}

impl Viewer {
    pub fn from_user(user: Option<&UserInfo>) -> Self {
        match user.map(UserInfo::role) {
            None => Viewer::Anonymous,
            Some(Role::Admin) => Viewer::Admin,
            Some(Role::Employee) => Viewer::Employee,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Allow,
    Redirect(&'static str),
}

#[derive(Debug, Clone, Copy)]
enum Who {
    Anyone,
    Only(Viewer),
}

#[derive(Debug, Clone, Copy)]
enum Paths {
    Any,
    Exact(&'static [&'static str]),
    Under(&'static [&'static str]),
}

#[derive(Debug, Clone, Copy)]
struct Rule {
    who: Who,
    paths: Paths,
    access: Access,
}

const RULES: &[Rule] = &[
    Rule {
        who: Who::Anyone,
        paths: Paths::Exact(&["/login", "/register", "/healthz"]),
        access: Access::Allow,
    },
    Rule {
        who: Who::Only(Viewer::Anonymous),
        paths: Paths::Any,
        access: Access::Redirect("/login"),
    },
    Rule {
        who: Who::Only(Viewer::Admin),
        paths: Paths::Exact(&["/"]),
        access: Access::Redirect("/admin"),
    },
    Rule {
        who: Who::Only(Viewer::Employee),
        paths: Paths::Under(&["/admin", "/api/admin"]),
        access: Access::Redirect("/"),
    },
    Rule {
        who: Who::Anyone,
        paths: Paths::Any,
        access: Access::Allow,
    },
];

pub fn evaluate(viewer: Viewer, path: &str) -> Access {
    RULES
        .iter()
        .find(|rule| rule.who.matches(viewer) && rule.paths.matches(path))
        .map(|rule| rule.access)
        .unwrap_or(Access::Allow)
}

impl Who {
    fn matches(self, viewer: Viewer) -> bool {
        match self {
            Who::Anyone => true,
            Who::Only(expected) => expected == viewer,
        }
    }
}

impl Paths {
    fn matches(self, path: &str) -> bool {
        let path = normalize(path);
        match self {
            Paths::Any => true,
            Paths::Exact(paths) => paths.contains(&path),
            Paths::Under(prefixes) => prefixes.iter().any(|prefix| is_under(path, prefix)),
        }
    }
}

fn normalize(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() { "/" } else { trimmed }
}

/// `/admin` and `/admin/x` are under `/admin`; `/administrator` is not.
fn is_under(path: &str, prefix: &str) -> bool {
    path.strip_prefix(prefix)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_pages_open_to_everyone() {
        for viewer in [Viewer::Anonymous, Viewer::Employee, Viewer::Admin] {
            assert_eq!(evaluate(viewer, "/login"), Access::Allow);
            assert_eq!(evaluate(viewer, "/register"), Access::Allow);
            assert_eq!(evaluate(viewer, "/healthz"), Access::Allow);
        }
    }

    #[test]
    fn anonymous_goes_to_login() {
        assert_eq!(evaluate(Viewer::Anonymous, "/"), Access::Redirect("/login"));
        assert_eq!(evaluate(Viewer::Anonymous, "/admin"), Access::Redirect("/login"));
        assert_eq!(evaluate(Viewer::Anonymous, "/api/summary"), Access::Redirect("/login"));
    }

    #[test]
    fn admin_home_is_admin_dashboard() {
        assert_eq!(evaluate(Viewer::Admin, "/"), Access::Redirect("/admin"));
        assert_eq!(evaluate(Viewer::Admin, "/admin/weekly-report/3"), Access::Allow);
        assert_eq!(evaluate(Viewer::Admin, "/clients"), Access::Allow);
    }

    #[test]
    fn employees_kept_out_of_admin_pages() {
        assert_eq!(evaluate(Viewer::Employee, "/admin"), Access::Redirect("/"));
        assert_eq!(evaluate(Viewer::Employee, "/admin/"), Access::Redirect("/"));
        assert_eq!(evaluate(Viewer::Employee, "/admin/add-client"), Access::Redirect("/"));
        assert_eq!(
            evaluate(Viewer::Employee, "/api/admin/users/2/summary"),
            Access::Redirect("/")
        );
        assert_eq!(evaluate(Viewer::Employee, "/administrator"), Access::Allow);
        assert_eq!(evaluate(Viewer::Employee, "/"), Access::Allow);
        assert_eq!(evaluate(Viewer::Employee, "/clients/new"), Access::Allow);
    }

    #[test]
    fn viewer_from_session_user() {
        let admin = UserInfo {
            role: None,
            is_admin: true,
        };
        assert_eq!(Viewer::from_user(None), Viewer::Anonymous);
        assert_eq!(Viewer::from_user(Some(&admin)), Viewer::Admin);
        assert_eq!(Viewer::from_user(Some(&UserInfo::default())), Viewer::Employee);
    }
}
