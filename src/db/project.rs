use anyhow::{Context, Result};
use rusqlite::{Connection, ErrorCode, OptionalExtension, Row, params};

use crate::analytics::tax_credit;
use crate::db::{Database, StoreError};
use crate::models::{CreateProjectInput, PpaTarget, Project, Stage, UpdateProjectInput};

const SELECT_COLUMNS: &str = "id, project_id, name, start_date, end_date, stage, \
    resource_allocated, ppa_performance, ppa_power, ppa_area, eligible_rd, \
    actual_spend, forecast_spend, tax_credit_eligible, created_at, updated_at";

const NOW: &str = "strftime('%Y-%m-%dT%H:%M:%fZ', 'now')";

pub(crate) fn parse_stage(idx: usize, raw: String) -> rusqlite::Result<Stage> {
    raw.parse().map_err(|e: anyhow::Error| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            rusqlite::types::Type::Text,
            Box::new(std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())),
        )
    })
}

fn row_to_project(row: &Row) -> rusqlite::Result<Project> {
    let stage = parse_stage(5, row.get("stage")?)?;

    Ok(Project {
        id: row.get("id")?,
        project_id: row.get("project_id")?,
        name: row.get("name")?,
        start_date: row.get("start_date")?,
        end_date: row.get("end_date")?,
        stage,
        resource_allocated: row.get("resource_allocated")?,
        ppa_target: PpaTarget {
            performance: row.get("ppa_performance")?,
            power: row.get("ppa_power")?,
            area: row.get("ppa_area")?,
        },
        eligible_rd: row.get("eligible_rd")?,
        actual_spend: row.get("actual_spend")?,
        forecast_spend: row.get("forecast_spend")?,
        tax_credit_eligible: row.get("tax_credit_eligible")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.code == ErrorCode::ConstraintViolation
                && e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

fn write_error(err: rusqlite::Error, project_id: &str, action: &'static str) -> StoreError {
    if is_unique_violation(&err) {
        StoreError::Duplicate(project_id.to_string())
    } else {
        StoreError::Other(anyhow::Error::new(err).context(action))
    }
}

fn credit_for(input: &CreateProjectInput) -> i64 {
    tax_credit(input.actual_spend, i64::from(input.eligible_rd))
}

/// Validates and inserts one record. The tax credit is always derived here,
/// never taken from the caller.
fn insert(conn: &Connection, input: &CreateProjectInput) -> Result<String, StoreError> {
    input.validate()?;
    let id = ulid::Ulid::new().to_string();
    conn.execute(
        "INSERT INTO projects (id, project_id, name, start_date, end_date, stage, \
         resource_allocated, ppa_performance, ppa_power, ppa_area, eligible_rd, \
         actual_spend, forecast_spend, tax_credit_eligible) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
        params![
            id,
            input.project_id.trim(),
            input.name.trim(),
            input.start_date,
            input.end_date,
            input.stage.as_str(),
            input.resource_allocated,
            input.ppa_target.performance,
            input.ppa_target.power,
            input.ppa_target.area,
            input.eligible_rd,
            input.actual_spend,
            input.forecast_spend,
            credit_for(input),
        ],
    )
    .map_err(|e| write_error(e, &input.project_id, "failed to insert project"))?;
    Ok(id)
}

pub fn create_project(db: &Database, input: CreateProjectInput) -> Result<Project, StoreError> {
    let id = insert(db.conn(), &input)?;
    let project = get_project(db, &id)?.context("project not found after insert")?;
    Ok(project)
}

pub fn get_project(db: &Database, id: &str) -> Result<Option<Project>> {
    let sql = format!("SELECT {SELECT_COLUMNS} FROM projects WHERE id = ?1");
    let project = db
        .conn()
        .prepare(&sql)?
        .query_row([id], row_to_project)
        .optional()
        .context("failed to query project")?;

    Ok(project)
}

/// All projects, or those in `stage`, ordered by `projectId`.
pub fn list_projects(db: &Database, stage: Option<Stage>) -> Result<Vec<Project>> {
    let base = format!("SELECT {SELECT_COLUMNS} FROM projects");
    let sql = match &stage {
        Some(_) => format!("{base} WHERE stage = ?1 ORDER BY project_id ASC"),
        None => format!("{base} ORDER BY project_id ASC"),
    };

    let mut stmt = db.conn().prepare(&sql)?;
    let rows = match &stage {
        Some(s) => stmt.query_map([s.as_str()], row_to_project)?,
        None => stmt.query_map([], row_to_project)?,
    };

    rows.collect::<rusqlite::Result<Vec<_>>>()
        .context("failed to list projects")
}

pub fn list_projects_by_stage(db: &Database, stage: Stage) -> Result<Vec<Project>> {
    list_projects(db, Some(stage))
}

/// Merges `patch` into the stored record, revalidates the result and rewrites
/// it. Returns `Ok(None)` if no project has this id.
pub fn update_project(
    db: &Database,
    id: &str,
    patch: UpdateProjectInput,
) -> Result<Option<Project>, StoreError> {
    let Some(existing) = get_project(db, id)? else {
        return Ok(None);
    };

    let merged = CreateProjectInput::from(&existing).apply(patch);
    merged.validate()?;

    let sql = format!(
        "UPDATE projects SET project_id = ?1, name = ?2, start_date = ?3, end_date = ?4, \
         stage = ?5, resource_allocated = ?6, ppa_performance = ?7, ppa_power = ?8, \
         ppa_area = ?9, eligible_rd = ?10, actual_spend = ?11, forecast_spend = ?12, \
         tax_credit_eligible = ?13, updated_at = {NOW} WHERE id = ?14"
    );
    let rows_affected = db
        .conn()
        .execute(
            &sql,
            params![
                merged.project_id.trim(),
                merged.name.trim(),
                merged.start_date,
                merged.end_date,
                merged.stage.as_str(),
                merged.resource_allocated,
                merged.ppa_target.performance,
                merged.ppa_target.power,
                merged.ppa_target.area,
                merged.eligible_rd,
                merged.actual_spend,
                merged.forecast_spend,
                credit_for(&merged),
                id,
            ],
        )
        .map_err(|e| write_error(e, &merged.project_id, "failed to update project"))?;

    if rows_affected == 0 {
        return Ok(None);
    }
    Ok(get_project(db, id)?)
}

pub fn delete_project(db: &Database, id: &str) -> Result<bool> {
    let rows_affected = db
        .conn()
        .execute("DELETE FROM projects WHERE id = ?1", [id])
        .context("failed to delete project")?;

    Ok(rows_affected > 0)
}

/// Removes every project. Returns how many were deleted.
pub fn clear_projects(db: &Database) -> Result<usize> {
    db.conn()
        .execute("DELETE FROM projects", [])
        .context("failed to clear projects")
}

/// Inserts all of `inputs` in one transaction: either every record lands or
/// none does.
pub fn insert_many(db: &Database, inputs: &[CreateProjectInput]) -> Result<usize, StoreError> {
    let tx = db
        .conn()
        .unchecked_transaction()
        .context("failed to begin transaction")?;
    for input in inputs {
        insert(&tx, input)?;
    }
    tx.commit().context("failed to commit bulk insert")?;
    Ok(inputs.len())
}

pub fn count_projects(db: &Database) -> Result<usize> {
    let count: i64 = db
        .conn()
        .query_row("SELECT COUNT(*) FROM projects", [], |row| row.get(0))
        .context("failed to count projects")?;
    Ok(count as usize)
}

/// Changes whenever a project is added, removed or modified.
pub fn data_watermark(db: &Database) -> Result<String> {
    db.conn()
        .query_row(
            "SELECT COALESCE(MAX(updated_at), '') || ':' || COUNT(*) FROM projects",
            [],
            |row| row.get(0),
        )
        .context("failed to query data watermark")
}
