//! Bottom navigation destinations.

pub const DASHBOARD: &str = "/dashboard";
pub const TRACKER: &str = "/tracker";
pub const MINDFULNESS: &str = "/tracker/mindfulness";
pub const PROFILE: &str = "/profile";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavIcon {
    Home,
    Activity,
    User,
}

impl NavIcon {
    pub fn glyph(&self) -> &'static str {
        match self {
            NavIcon::Home => "⌂",
            NavIcon::Activity => "♥",
            NavIcon::User => "☺",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavItem {
    pub name: &'static str,
    pub path: &'static str,
    pub icon: NavIcon,
    /// Jump key shown next to the label.
    pub shortcut: char,
}

pub const NAVIGATION_ITEMS: [NavItem; 3] = [
    NavItem {
        name: "Home",
        path: DASHBOARD,
        icon: NavIcon::Home,
        shortcut: 'h',
    },
    NavItem {
        name: "Tracker",
        path: TRACKER,
        icon: NavIcon::Activity,
        shortcut: 't',
    },
    NavItem {
        name: "Profile",
        path: PROFILE,
        icon: NavIcon::User,
        shortcut: 'p',
    },
];

/// Exact match only: subroutes do not light up their parent.
pub fn is_active(item: &NavItem, pathname: &str) -> bool {
    item.path == pathname
}

pub fn active_index(pathname: &str) -> Option<usize> {
    NAVIGATION_ITEMS
        .iter()
        .position(|item| is_active(item, pathname))
}

pub fn item_for_shortcut(c: char) -> Option<&'static NavItem> {
    NAVIGATION_ITEMS.iter().find(|item| item.shortcut == c)
}

/// Next (or previous) destination in bar order. From a route with no active
/// item, forward starts at the first item and backward at the last.
pub fn cycle(pathname: &str, forward: bool) -> &'static str {
    let len = NAVIGATION_ITEMS.len();
    let index = match (active_index(pathname), forward) {
        (Some(i), true) => (i + 1) % len,
        (Some(i), false) => (i + len - 1) % len,
        (None, true) => 0,
        (None, false) => len - 1,
    };
    NAVIGATION_ITEMS[index].path
}
