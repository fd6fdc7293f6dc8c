use anyhow::{Context, Result};

use crate::db::project::insert_many;
use crate::db::{Database, StoreError};
use crate::models::CreateProjectInput;

const DEMO_DATA: &str = include_str!("../../data/seed_projects.json");

/// The fixed demonstration portfolio.
pub fn demo_projects() -> Result<Vec<CreateProjectInput>> {
    serde_json::from_str(DEMO_DATA).context("failed to parse bundled demo projects")
}

/// Loads the demonstration portfolio in a single transaction and returns the
/// number of records inserted. Fails with [`StoreError::Duplicate`] without
/// writing anything if any demo `projectId` already exists.
pub fn seed_projects(db: &Database) -> Result<usize, StoreError> {
    let inputs = demo_projects()?;
    let count = insert_many(db, &inputs)?;
    tracing::info!(count, "seeded demo projects");
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::project::{count_projects, create_project, list_projects};
    use crate::db::project::tests::sample_input;
    use crate::db::tests::open_temp_db;
    use std::collections::HashSet;

    #[test]
    fn test_demo_projects_are_valid_and_unique() {
        let projects = demo_projects().unwrap();
        assert_eq!(projects.len(), 57);

        for p in &projects {
            assert!(p.validate().is_ok(), "{} failed validation", p.project_id);
        }
        let ids: HashSet<&str> = projects.iter().map(|p| p.project_id.as_str()).collect();
        assert_eq!(ids.len(), projects.len());
    }

    #[test]
    fn test_seed_inserts_all_records() {
        let (db, _dir) = open_temp_db();
        assert_eq!(seed_projects(&db).unwrap(), 57);
        assert_eq!(count_projects(&db).unwrap(), 57);

        let first = &list_projects(&db, None).unwrap()[0];
        assert_eq!(
            first.tax_credit_eligible,
            crate::analytics::tax_credit(first.actual_spend, i64::from(first.eligible_rd))
        );
    }

    #[test]
    fn test_reseed_fails_and_leaves_store_unchanged() {
        let (db, _dir) = open_temp_db();
        seed_projects(&db).unwrap();

        let err = seed_projects(&db).unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(_)));
        assert_eq!(count_projects(&db).unwrap(), 57);
    }

    #[test]
    fn test_seed_collides_with_existing_record() {
        let (db, _dir) = open_temp_db();
        create_project(&db, sample_input("GPU-001")).unwrap();

        assert!(seed_projects(&db).is_err());
        assert_eq!(count_projects(&db).unwrap(), 1);
    }
}
