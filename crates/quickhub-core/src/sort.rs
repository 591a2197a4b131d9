// ── Display ordering for QuickApp listings ──
//
// Mirrors the hub UI's sort semantics: values are compared as
// case-insensitive strings with digit runs compared numerically, so
// "QA-2" sorts before "QA-10" and ids order numerically.

use std::cmp::Ordering;
use std::iter::Peekable;
use std::str::Chars;
use std::sync::Arc;

use strum::{Display, EnumString};

use crate::model::QuickApp;

/// Which column to order a listing by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SortColumn {
    #[default]
    Id,
    Name,
    #[strum(serialize = "type")]
    Kind,
    Modified,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SortDirection {
    #[default]
    #[strum(serialize = "asc", serialize = "ascending")]
    Ascending,
    #[strum(serialize = "desc", serialize = "descending")]
    Descending,
}

/// Sort a listing in place by the given column and direction.
///
/// Missing values compare as empty strings (they sort first ascending),
/// matching the hub UI. The sort is stable.
pub fn sort_apps(apps: &mut [Arc<QuickApp>], column: SortColumn, direction: SortDirection) {
    apps.sort_by(|a, b| {
        let ord = natural_cmp(&sort_key(a, column), &sort_key(b, column));
        match direction {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    });
}

fn sort_key(app: &QuickApp, column: SortColumn) -> String {
    match column {
        SortColumn::Id => app.id.to_string(),
        SortColumn::Name => app.name.as_deref().unwrap_or_default().to_lowercase(),
        SortColumn::Kind => app.kind.as_deref().unwrap_or_default().to_lowercase(),
        SortColumn::Modified => app.modified.map_or_else(String::new, |m| m.to_string()),
    }
}

/// Compare two strings with embedded digit runs compared numerically.
fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut ai = a.chars().peekable();
    let mut bi = b.chars().peekable();

    loop {
        match (ai.peek().copied(), bi.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) if x.is_ascii_digit() && y.is_ascii_digit() => {
                let xr = take_digit_run(&mut ai);
                let yr = take_digit_run(&mut bi);
                let xt = xr.trim_start_matches('0');
                let yt = yr.trim_start_matches('0');
                // Compare numeric magnitude without parsing: longer
                // trimmed run wins, then lexicographic on equal length.
                let ord = xt
                    .len()
                    .cmp(&yt.len())
                    .then_with(|| xt.cmp(yt))
                    .then_with(|| xr.len().cmp(&yr.len()));
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            (Some(x), Some(y)) => {
                let ord = x.cmp(&y);
                if ord != Ordering::Equal {
                    return ord;
                }
                ai.next();
                bi.next();
            }
        }
    }
}

fn take_digit_run(it: &mut Peekable<Chars>) -> String {
    let mut run = String::new();
    while let Some(c) = it.peek() {
        if !c.is_ascii_digit() {
            break;
        }
        run.push(*c);
        it.next();
    }
    run
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app(id: u64, name: Option<&str>, modified: Option<i64>) -> Arc<QuickApp> {
        Arc::new(QuickApp {
            id,
            name: name.map(str::to_owned),
            kind: None,
            modified,
            interfaces: Vec::new(),
            is_child: false,
        })
    }

    fn names(apps: &[Arc<QuickApp>]) -> Vec<Option<&str>> {
        apps.iter().map(|a| a.name.as_deref()).collect()
    }

    #[test]
    fn digit_runs_compare_numerically() {
        assert_eq!(natural_cmp("qa2", "qa10"), Ordering::Less);
        assert_eq!(natural_cmp("qa10", "qa10"), Ordering::Equal);
        assert_eq!(natural_cmp("v1.9", "v1.10"), Ordering::Less);
    }

    #[test]
    fn ids_order_numerically_not_lexically() {
        let mut apps = vec![app(100, None, None), app(9, None, None), app(20, None, None)];
        sort_apps(&mut apps, SortColumn::Id, SortDirection::Ascending);
        let ids: Vec<u64> = apps.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![9, 20, 100]);
    }

    #[test]
    fn name_sort_is_case_insensitive_with_missing_first() {
        let mut apps = vec![
            app(1, Some("beta"), None),
            app(2, Some("Alpha"), None),
            app(3, None, None),
        ];
        sort_apps(&mut apps, SortColumn::Name, SortDirection::Ascending);
        assert_eq!(names(&apps), vec![None, Some("Alpha"), Some("beta")]);
    }

    #[test]
    fn descending_reverses_order() {
        let mut apps = vec![
            app(1, Some("a"), Some(100)),
            app(2, Some("b"), Some(300)),
            app(3, Some("c"), Some(200)),
        ];
        sort_apps(&mut apps, SortColumn::Modified, SortDirection::Descending);
        let ids: Vec<u64> = apps.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn column_names_parse_from_strings() {
        assert_eq!("type".parse::<SortColumn>().ok(), Some(SortColumn::Kind));
        assert_eq!("ID".parse::<SortColumn>().ok(), Some(SortColumn::Id));
        assert_eq!(
            "desc".parse::<SortDirection>().ok(),
            Some(SortDirection::Descending)
        );
    }
}
