//! Client-side list view: search, sort and the pagination summary shown under
//! the users table. Filtering applies to the loaded page only.

use crate::api::types::User;
use std::{cmp::Ordering, fmt, str::FromStr};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortField {
    FirstName,
    LastName,
    Email,
    Id,
}

impl SortField {
    pub const VALUES: [&'static str; 4] = ["first_name", "last_name", "email", "id"];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FirstName => "first_name",
            Self::LastName => "last_name",
            Self::Email => "email",
            Self::Id => "id",
        }
    }

    fn compare(self, a: &User, b: &User) -> Ordering {
        match self {
            Self::FirstName => compare_text(&a.first_name, &b.first_name),
            Self::LastName => compare_text(&a.last_name, &b.last_name),
            Self::Email => compare_text(&a.email, &b.email),
            Self::Id => a.id.cmp(&b.id),
        }
    }
}

impl FromStr for SortField {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "first_name" | "first" => Ok(Self::FirstName),
            "last_name" | "last" => Ok(Self::LastName),
            "email" => Ok(Self::Email),
            "id" => Ok(Self::Id),
            other => Err(format!("invalid sort field: {other}")),
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(format!("invalid sort order: {other}")),
        }
    }
}

fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

/// Search term and sort settings of the users table.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ListView {
    pub search: String,
    pub sort_by: Option<SortField>,
    pub order: SortOrder,
}

impl ListView {
    #[must_use]
    pub fn matches(&self, user: &User) -> bool {
        let term = self.search.trim().to_lowercase();
        if term.is_empty() {
            return true;
        }

        [
            user.first_name.to_lowercase(),
            user.last_name.to_lowercase(),
            user.full_name().to_lowercase(),
            user.email.to_lowercase(),
        ]
        .iter()
        .any(|field| field.contains(&term))
    }

    /// Filters then sorts. The sort is stable, so ties keep page order.
    #[must_use]
    pub fn apply(&self, users: &[User]) -> Vec<User> {
        let mut visible: Vec<User> = users
            .iter()
            .filter(|user| self.matches(user))
            .cloned()
            .collect();

        if let Some(field) = self.sort_by {
            visible.sort_by(|a, b| {
                let ordering = field.compare(a, b);
                match self.order {
                    SortOrder::Asc => ordering,
                    SortOrder::Desc => ordering.reverse(),
                }
            });
        }

        visible
    }

    /// Resets search and sort ("Clear").
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    #[must_use]
    pub fn is_filtered(&self) -> bool {
        !self.search.trim().is_empty() || self.sort_by.is_some()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pagination {
    pub current_page: u32,
    pub total_pages: u32,
    pub total_users: u64,
}

impl Pagination {
    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Page {} of {} ({} users)",
            self.current_page,
            self.total_pages.max(1),
            self.total_users
        )
    }
}

pub const EMPTY_LIST: &str = "No users found.";

/// Plain-text table of users.
#[must_use]
pub fn render_table(users: &[User]) -> String {
    if users.is_empty() {
        return format!("{EMPTY_LIST}\n");
    }

    let headers = ["ID", "NAME", "EMAIL"];
    let rows: Vec<[String; 3]> = users
        .iter()
        .map(|user| [user.id.to_string(), user.full_name(), user.email.clone()])
        .collect();

    let mut widths = headers.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_row(&mut out, &headers.map(str::to_string), &widths);
    for row in &rows {
        push_row(&mut out, row, &widths);
    }
    out
}

fn push_row(out: &mut String, cells: &[String; 3], widths: &[usize; 3]) {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ");
    out.push_str(line.trim_end());
    out.push('\n');
}

/// Multi-line detail view of one user.
#[must_use]
pub fn render_user(user: &User) -> String {
    format!(
        "ID:     {}\nName:   {}\nEmail:  {}\nAvatar: {}\n",
        user.id,
        user.full_name(),
        user.email,
        user.avatar
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::seed_users;

    fn ids(users: &[User]) -> Vec<u64> {
        users.iter().map(|user| user.id).collect()
    }

    #[test]
    fn search_is_case_insensitive_over_names_and_email() {
        let users = seed_users();
        let view = ListView {
            search: "WEAVER".to_string(),
            ..ListView::default()
        };
        assert_eq!(ids(&view.apply(&users)), vec![2]);

        let view = ListView {
            search: "janet weaver".to_string(),
            ..ListView::default()
        };
        assert_eq!(ids(&view.apply(&users)), vec![2]);

        let view = ListView {
            search: "rachel.howell@".to_string(),
            ..ListView::default()
        };
        assert_eq!(ids(&view.apply(&users)), vec![12]);
    }

    #[test]
    fn empty_search_keeps_everything_in_order() {
        let users = seed_users();
        let view = ListView {
            search: "   ".to_string(),
            ..ListView::default()
        };
        assert_eq!(view.apply(&users), users);
        assert!(!view.is_filtered());
    }

    #[test]
    fn sorts_by_field_and_order() {
        let users: Vec<User> = seed_users().into_iter().take(6).collect();

        let mut view = ListView {
            sort_by: Some(SortField::FirstName),
            ..ListView::default()
        };
        let names: Vec<String> = view
            .apply(&users)
            .into_iter()
            .map(|user| user.first_name)
            .collect();
        assert_eq!(names, ["Charles", "Emma", "Eve", "George", "Janet", "Tracey"]);

        view.sort_by = Some(SortField::Id);
        view.order = SortOrder::Desc;
        assert_eq!(ids(&view.apply(&users)), vec![6, 5, 4, 3, 2, 1]);

        view.clear();
        assert_eq!(view, ListView::default());
        assert_eq!(ids(&view.apply(&users)), vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn parses_sort_arguments() {
        assert_eq!("last_name".parse::<SortField>(), Ok(SortField::LastName));
        assert_eq!("EMAIL".parse::<SortField>(), Ok(SortField::Email));
        assert!("age".parse::<SortField>().is_err());
        assert_eq!("desc".parse::<SortOrder>(), Ok(SortOrder::Desc));
        assert!("up".parse::<SortOrder>().is_err());
    }

    #[test]
    fn pagination_bounds() {
        let first = Pagination {
            current_page: 1,
            total_pages: 2,
            total_users: 12,
        };
        assert!(!first.has_previous());
        assert!(first.has_next());
        assert_eq!(first.summary(), "Page 1 of 2 (12 users)");

        let last = Pagination {
            current_page: 2,
            ..first
        };
        assert!(last.has_previous());
        assert!(!last.has_next());

        let empty = Pagination {
            current_page: 1,
            total_pages: 0,
            total_users: 0,
        };
        assert_eq!(empty.summary(), "Page 1 of 1 (0 users)");
        assert!(!empty.has_next());
    }

    #[test]
    fn table_renders_rows_or_empty_message() {
        assert_eq!(render_table(&[]), "No users found.\n");

        let users: Vec<User> = seed_users().into_iter().take(2).collect();
        let table = render_table(&users);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("ID"));
        assert!(lines[1].contains("George Bluth"));
        assert!(lines[2].contains("janet.weaver@reqres.in"));
    }
}
