use std::collections::{HashMap, HashSet};

use tally_core::Category;
use tally_storage::{find_categories_by_titles, save_categories, DbPool};

/// Resolve every referenced category name to exactly one stored category.
///
/// Names that already exist in the catalog are reused; the rest are created
/// in one pass, each distinct missing name exactly once. The returned map
/// contains an entry for every name in `names`.
pub async fn reconcile_categories(
    db: &DbPool,
    names: &[String],
) -> Result<HashMap<String, Category>, sqlx::Error> {
    let existing = find_categories_by_titles(db, names).await?;
    let missing = missing_titles(names, &existing);

    let created = if missing.is_empty() {
        Vec::new()
    } else {
        tracing::info!("creating {} new categories", missing.len());
        let drafts: Vec<Category> = missing.into_iter().map(Category::new).collect();
        save_categories(db, &drafts).await?
    };

    Ok(existing
        .into_iter()
        .chain(created)
        .map(|category| (category.title.clone(), category))
        .collect())
}

/// Requested titles with no existing match, deduplicated in first-seen order.
fn missing_titles(requested: &[String], existing: &[Category]) -> Vec<String> {
    let known: HashSet<&str> = existing.iter().map(|c| c.title.as_str()).collect();
    let mut seen = HashSet::new();

    requested
        .iter()
        .filter(|title| !known.contains(title.as_str()))
        .filter(|title| seen.insert(title.as_str()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_core::CategoryId;
    use tally_storage::create_db;

    fn names(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    // ── missing_titles ────────────────────────────────────────────────────────

    #[test]
    fn missing_titles_dedupes_repeats() {
        let missing = missing_titles(&names(&["Income", "Housing", "Income"]), &[]);
        assert_eq!(missing, ["Income", "Housing"]);
    }

    #[test]
    fn missing_titles_excludes_existing() {
        let existing = vec![Category {
            id: Some(CategoryId(1)),
            title: "Housing".to_string(),
        }];
        let missing = missing_titles(&names(&["Income", "Housing"]), &existing);
        assert_eq!(missing, ["Income"]);
    }

    #[test]
    fn missing_titles_empty_input() {
        assert!(missing_titles(&[], &[]).is_empty());
    }

    // ── reconcile_categories ──────────────────────────────────────────────────

    async fn test_db() -> (tempfile::TempDir, DbPool) {
        let dir = tempfile::tempdir().unwrap();
        let pool = create_db(&dir.path().join("test.db")).await.unwrap();
        (dir, pool)
    }

    #[tokio::test]
    async fn creates_each_missing_name_once() {
        let (_dir, pool) = test_db().await;

        let resolved =
            reconcile_categories(&pool, &names(&["Income", "Housing", "Income"]))
                .await
                .unwrap();

        assert_eq!(resolved.len(), 2);
        assert!(resolved["Income"].id.is_some());
        assert!(resolved["Housing"].id.is_some());

        let stored = find_categories_by_titles(&pool, &names(&["Income", "Housing"]))
            .await
            .unwrap();
        assert_eq!(stored.len(), 2);
    }

    #[tokio::test]
    async fn reuses_existing_categories() {
        let (_dir, pool) = test_db().await;
        let housing = save_categories(&pool, &[Category::new("Housing")])
            .await
            .unwrap()
            .remove(0);

        let resolved = reconcile_categories(&pool, &names(&["Housing", "Income"]))
            .await
            .unwrap();

        assert_eq!(resolved["Housing"].id, housing.id);

        let stored = find_categories_by_titles(&pool, &names(&["Housing"]))
            .await
            .unwrap();
        assert_eq!(stored.len(), 1, "no duplicate may be created");
    }

    #[tokio::test]
    async fn every_input_name_resolves() {
        let (_dir, pool) = test_db().await;

        let input = names(&["A", "B", "C", "A"]);
        let resolved = reconcile_categories(&pool, &input).await.unwrap();

        for name in &input {
            let category = resolved.get(name).expect("name must resolve");
            assert!(category.id.is_some());
        }
    }

    #[tokio::test]
    async fn no_names_resolves_to_empty_map() {
        let (_dir, pool) = test_db().await;
        let resolved = reconcile_categories(&pool, &[]).await.unwrap();
        assert!(resolved.is_empty());
    }
}
