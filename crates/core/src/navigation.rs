//! Page routes, session gating and the layout shell (side menu, breadcrumbs).

use serde::Serialize;

use crate::theme::{Palette, ThemeMode};

/// A page of the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "page", rename_all = "snake_case")]
pub enum Route {
    Login,
    Dashboard,
    Farmers,
    Advisory,
    Officers,
    Enquiries,
    AdvisoryType,
    AddAdvisory,
    FarmerQuality { farmer_id: String },
}

impl Route {
    /// Match a browser path. Matching ignores case, a trailing slash and any
    /// query string.
    pub fn parse(path: &str) -> Option<Route> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let lower: Vec<String> = segments.iter().map(|s| s.to_lowercase()).collect();
        let lower: Vec<&str> = lower.iter().map(String::as_str).collect();
        let route = match lower.as_slice() {
            ["login"] => Route::Login,
            ["dashboard"] => Route::Dashboard,
            ["farmers"] => Route::Farmers,
            ["advisory"] => Route::Advisory,
            ["officers"] => Route::Officers,
            ["enquiries"] => Route::Enquiries,
            ["advisorytype"] => Route::AdvisoryType,
            ["add-advisory"] => Route::AddAdvisory,
            ["farmer-quality", _] => Route::FarmerQuality {
                farmer_id: segments[1].to_string(),
            },
            _ => return None,
        };
        Some(route)
    }

    /// Canonical path of the route.
    pub fn path(&self) -> String {
        match self {
            Route::Login => "/login".into(),
            Route::Dashboard => "/Dashboard".into(),
            Route::Farmers => "/Farmers".into(),
            Route::Advisory => "/Advisory".into(),
            Route::Officers => "/Officers".into(),
            Route::Enquiries => "/Enquiries".into(),
            Route::AdvisoryType => "/AdvisoryType".into(),
            Route::AddAdvisory => "/add-advisory".into(),
            Route::FarmerQuality { farmer_id } => format!("/farmer-quality/{farmer_id}"),
        }
    }

    pub fn requires_session(&self) -> bool {
        !matches!(self, Route::Login)
    }
}

/// Outcome of navigating to a path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Resolution {
    Render { route: Route },
    Redirect { to: String },
    NotFound,
}

/// Decide what navigating to `path` shows.
pub fn resolve(path: &str, authenticated: bool) -> Resolution {
    let trimmed = path.split(['?', '#']).next().unwrap_or_default();
    if trimmed.trim_matches('/').is_empty() {
        let to = if authenticated { Route::Dashboard } else { Route::Login };
        return Resolution::Redirect { to: to.path() };
    }
    match Route::parse(path) {
        Some(route) if route.requires_session() && !authenticated => Resolution::Redirect {
            to: Route::Login.path(),
        },
        Some(route) => Resolution::Render { route },
        None => Resolution::NotFound,
    }
}

// ---------------------------------------------------------------------------
// Shell
// ---------------------------------------------------------------------------

/// Side navigation entries as `(label, path)`.
pub const MENU: &[(&str, &str)] = &[
    ("Overview", "/Dashboard"),
    ("Farmer", "/Farmers"),
    ("Advisory", "/Advisory"),
    ("Officers", "/Officers"),
    ("Enquiries", "/Enquiries"),
    ("Advisory Type", "/AdvisoryType"),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuItem {
    pub label: &'static str,
    pub path: &'static str,
    pub active: bool,
}

pub fn menu(current_path: &str) -> Vec<MenuItem> {
    let current = current_path.to_lowercase();
    MENU.iter()
        .map(|&(label, path)| MenuItem {
            label,
            path,
            active: current == path.to_lowercase(),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Crumb {
    pub label: String,
    pub path: String,
    pub is_last: bool,
}

/// Home followed by one crumb per path segment, first letter capitalised.
pub fn breadcrumbs(path: &str) -> Vec<Crumb> {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    let mut crumbs = vec![Crumb {
        label: "Home".into(),
        path: "/dashboard".into(),
        is_last: segments.is_empty(),
    }];
    for (i, segment) in segments.iter().enumerate() {
        crumbs.push(Crumb {
            label: capitalise(segment),
            path: format!("/{}", segments[..=i].join("/")),
            is_last: i + 1 == segments.len(),
        });
    }
    crumbs
}

fn capitalise(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// The layout wrapped around every gated page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Shell {
    pub user_name: String,
    pub menu: Vec<MenuItem>,
    pub breadcrumbs: Vec<Crumb>,
    pub theme: ThemeMode,
    pub palette: Palette,
}

impl Shell {
    pub fn build(path: &str, user_name: &str, theme: ThemeMode) -> Self {
        Self {
            user_name: user_name.to_string(),
            menu: menu(path),
            breadcrumbs: breadcrumbs(path),
            theme,
            palette: theme.palette(),
        }
    }
}
