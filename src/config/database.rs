//! Database configuration module.
//!
//! Handles the `SQLite` database connection and table creation using `SeaORM`.
//! Table creation uses `Schema::create_table_from_entity` so the database
//! schema is generated from the entity definitions without manual SQL.

use crate::entities::{
    ApprovalGroup, ApprovalGroupMember, ApprovalHistory, FundingDetail, Project, Property, Task,
    User,
};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};

/// Gets the database URL from the `DATABASE_URL` environment variable or
/// returns the default local `SQLite` path.
pub fn get_database_url() -> Result<String> {
    Ok(std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "sqlite://data/propdesk.sqlite".to_string()))
}

/// Establishes a connection to the database using [`get_database_url`].
pub async fn create_connection() -> Result<DatabaseConnection> {
    let database_url = get_database_url()?;

    Database::connect(&database_url).await.map_err(Into::into)
}

/// Creates all database tables from the entity definitions.
///
/// Creates tables for users, properties, projects, funding details,
/// approval groups and their members, approval history, and tasks.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let user_table = schema.create_table_from_entity(User);
    let property_table = schema.create_table_from_entity(Property);
    let project_table = schema.create_table_from_entity(Project);
    let funding_table = schema.create_table_from_entity(FundingDetail);
    let group_table = schema.create_table_from_entity(ApprovalGroup);
    let member_table = schema.create_table_from_entity(ApprovalGroupMember);
    let history_table = schema.create_table_from_entity(ApprovalHistory);
    let task_table = schema.create_table_from_entity(Task);

    db.execute(builder.build(&user_table)).await?;
    db.execute(builder.build(&property_table)).await?;
    db.execute(builder.build(&project_table)).await?;
    db.execute(builder.build(&funding_table)).await?;
    db.execute(builder.build(&group_table)).await?;
    db.execute(builder.build(&member_table)).await?;
    db.execute(builder.build(&history_table)).await?;
    db.execute(builder.build(&task_table)).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{
        approval_history::Model as HistoryModel, funding_detail::Model as FundingModel,
        project::Model as ProjectModel, user::Model as UserModel,
    };
    use sea_orm::{EntityTrait, QuerySelect};

    #[tokio::test]
    async fn test_create_tables() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;

        // Tables exist if querying them succeeds
        let _: Vec<UserModel> = User::find().limit(1).all(&db).await?;
        let _: Vec<ProjectModel> = Project::find().limit(1).all(&db).await?;
        let _: Vec<FundingModel> = FundingDetail::find().limit(1).all(&db).await?;
        let _: Vec<HistoryModel> = ApprovalHistory::find().limit(1).all(&db).await?;

        Ok(())
    }
}
