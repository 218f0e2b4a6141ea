use rusqlite::{Connection, OptionalExtension};

use crate::error::{BotError, Result};
use crate::models::{MainCategory, SubCategory};

/// Canonical display form for a sub-category label: first letter upper,
/// the rest lower. "FOOD", "food" and "Food" all become "Food".
pub fn normalize_label(label: &str) -> String {
    let trimmed = label.trim();
    let mut chars = trimmed.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

fn map_main(row: &rusqlite::Row<'_>) -> rusqlite::Result<MainCategory> {
    Ok(MainCategory {
        id: row.get(0)?,
        name: row.get(1)?,
        is_savings: row.get(2)?,
    })
}

pub fn list_main_categories(conn: &Connection) -> Result<Vec<MainCategory>> {
    let mut stmt = conn.prepare("SELECT id, name, is_savings FROM main_categories ORDER BY id")?;
    let rows = stmt
        .query_map([], map_main)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn main_category(conn: &Connection, id: i64) -> Result<MainCategory> {
    conn.query_row(
        "SELECT id, name, is_savings FROM main_categories WHERE id = ?1",
        [id],
        map_main,
    )
    .optional()?
    .ok_or(BotError::UnknownCategory(id))
}

/// Match a menu selection: the numeric index or the name, case-insensitive.
pub fn find_main_category(conn: &Connection, key: &str) -> Result<Option<MainCategory>> {
    let key = key.trim().to_lowercase();
    if key.is_empty() {
        return Ok(None);
    }
    if key.bytes().all(|b| b.is_ascii_digit()) {
        return match key.parse::<i64>() {
            Ok(id) => Ok(conn
                .query_row(
                    "SELECT id, name, is_savings FROM main_categories WHERE id = ?1",
                    [id],
                    map_main,
                )
                .optional()?),
            Err(_) => Ok(None),
        };
    }
    Ok(conn
        .query_row(
            "SELECT id, name, is_savings FROM main_categories WHERE lower(name) = ?1",
            [&key],
            map_main,
        )
        .optional()?)
}

/// The numbered menu shown whenever a main category is asked for.
pub fn menu_prompt(conn: &Connection) -> Result<String> {
    let mut prompt = String::from("Which category?");
    for cat in list_main_categories(conn)? {
        prompt.push_str(&format!("\n{}. {}", cat.id, cat.name));
    }
    Ok(prompt)
}

/// Look up the sub-category for (label, main category), creating it on first use.
///
/// The insert is conditional on the (name, main_category_id) unique key, so two
/// turns racing to create the same label converge on one row, which the
/// follow-up read in the same transaction always sees.
pub fn resolve_sub_category(conn: &Connection, label: &str, main_category_id: i64) -> Result<SubCategory> {
    let name = normalize_label(label);
    if name.is_empty() {
        return Err(BotError::Other("sub-category label is empty".to_string()));
    }

    let inserted = conn.execute(
        "INSERT INTO sub_categories (name, main_category_id) VALUES (?1, ?2) \
         ON CONFLICT (name, main_category_id) DO NOTHING",
        rusqlite::params![name, main_category_id],
    )?;
    if inserted > 0 {
        tracing::info!(sub_category = %name, main_category_id, "created sub-category");
    }

    conn.query_row(
        "SELECT id, name, main_category_id FROM sub_categories \
         WHERE name = ?1 AND main_category_id = ?2",
        rusqlite::params![name, main_category_id],
        |row| {
            Ok(SubCategory {
                id: row.get(0)?,
                name: row.get(1)?,
                main_category_id: row.get(2)?,
            })
        },
    )
    .optional()?
    .ok_or_else(|| BotError::Other(format!("could not resolve sub-category {name}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{get_connection, init_db};

    fn test_db() -> (tempfile::TempDir, Connection) {
        let dir = tempfile::tempdir().unwrap();
        let conn = get_connection(&dir.path().join("test.db")).unwrap();
        init_db(&conn).unwrap();
        (dir, conn)
    }

    #[test]
    fn test_normalize_label() {
        assert_eq!(normalize_label("food"), "Food");
        assert_eq!(normalize_label("FOOD"), "Food");
        assert_eq!(normalize_label("  eating OUT "), "Eating out");
        assert_eq!(normalize_label(""), "");
    }

    #[test]
    fn test_find_main_category_by_index_and_name() {
        let (_dir, conn) = test_db();
        assert_eq!(find_main_category(&conn, "1").unwrap().unwrap().name, "Needs");
        assert_eq!(find_main_category(&conn, "WANTS").unwrap().unwrap().name, "Wants");
        let savings = find_main_category(&conn, "savings").unwrap().unwrap();
        assert!(savings.is_savings);
        assert!(find_main_category(&conn, "4").unwrap().is_none());
        assert!(find_main_category(&conn, "groceries").unwrap().is_none());
        assert!(find_main_category(&conn, "99999999999999999999").unwrap().is_none());
    }

    #[test]
    fn test_main_category_unknown_id() {
        let (_dir, conn) = test_db();
        assert!(matches!(main_category(&conn, 42), Err(BotError::UnknownCategory(42))));
    }

    #[test]
    fn test_menu_prompt_lists_all_categories() {
        let (_dir, conn) = test_db();
        let menu = menu_prompt(&conn).unwrap();
        assert_eq!(menu, "Which category?\n1. Needs\n2. Wants\n3. Savings");
    }

    #[test]
    fn test_resolve_is_stable_for_same_pair() {
        let (_dir, conn) = test_db();
        let first = resolve_sub_category(&conn, "food", 1).unwrap();
        let second = resolve_sub_category(&conn, "FOOD", 1).unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(first.name, "Food");
        let count: i64 = conn.query_row("SELECT count(*) FROM sub_categories", [], |r| r.get(0)).unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_same_label_under_two_mains_is_distinct() {
        let (_dir, conn) = test_db();
        let needs_food = resolve_sub_category(&conn, "Food", 1).unwrap();
        let wants_food = resolve_sub_category(&conn, "Food", 2).unwrap();
        assert_ne!(needs_food.id, wants_food.id);
        assert_eq!(wants_food.main_category_id, 2);
    }

    #[test]
    fn test_resolve_sees_row_created_by_another_connection() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.db");
        let a = get_connection(&path).unwrap();
        init_db(&a).unwrap();
        let b = get_connection(&path).unwrap();
        let from_a = resolve_sub_category(&a, "rent", 1).unwrap();
        let from_b = resolve_sub_category(&b, "Rent", 1).unwrap();
        assert_eq!(from_a.id, from_b.id);
    }

    #[test]
    fn test_resolve_inside_a_transaction_reads_its_own_insert() {
        let (_dir, mut conn) = test_db();
        let tx = conn.transaction().unwrap();
        let created = resolve_sub_category(&tx, "travel", 2).unwrap();
        let again = resolve_sub_category(&tx, "Travel", 2).unwrap();
        assert_eq!(created, again);
        tx.rollback().unwrap();
        let count: i64 = conn.query_row("SELECT count(*) FROM sub_categories", [], |r| r.get(0)).unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_resolve_rejects_blank_label() {
        let (_dir, conn) = test_db();
        assert!(resolve_sub_category(&conn, "   ", 1).is_err());
    }
}
