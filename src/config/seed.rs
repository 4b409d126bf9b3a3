//! Reference-data seeding from config.toml
//!
//! Loads the initial user directory and approval groups from a TOML
//! configuration file and seeds the database on first run. Seeding is
//! idempotent: users are matched by email and groups by level, and existing
//! rows are left untouched.

use crate::{
    core,
    entities::{ApprovalGroup, User, approval_group, user, user::UserRole},
    errors::{Error, Result},
};
use sea_orm::{DatabaseConnection, prelude::*};
use serde::Deserialize;
use std::path::Path;
use tracing::info;

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Initial users to seed
    #[serde(default)]
    pub users: Vec<UserConfig>,
    /// Initial approval groups to seed
    #[serde(default)]
    pub approval_groups: Vec<GroupConfig>,
}

/// Configuration for a single user
#[derive(Debug, Deserialize, Clone)]
pub struct UserConfig {
    /// Display name
    pub name: String,
    /// Unique email
    pub email: String,
    /// Role: "admin", "manager", or "user"
    pub role: String,
    /// Approval level (1-3)
    pub approval_level: i32,
    /// Capability tags
    #[serde(default)]
    pub permissions: Vec<String>,
}

/// Configuration for a single approval group
#[derive(Debug, Deserialize, Clone)]
pub struct GroupConfig {
    /// Group name
    pub name: String,
    /// Group level (1-3), unique across groups
    pub level: i32,
    /// Member emails, resolved against the seeded users
    #[serde(default)]
    pub members: Vec<String>,
}

/// Loads the seed configuration from a TOML file.
///
/// # Errors
/// Returns an error if the file cannot be read or the TOML is invalid.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads the seed configuration from the default location (./config.toml)
pub fn load_default_config() -> Result<Config> {
    load_config("config.toml")
}

/// Seeds users and approval groups that are not present yet.
pub async fn seed_reference_data(db: &DatabaseConnection, config: &Config) -> Result<()> {
    for user_config in &config.users {
        if find_user_by_email(db, &user_config.email).await?.is_some() {
            continue;
        }
        let role = parse_role(&user_config.role)?;
        core::user::create_user(
            db,
            user_config.name.clone(),
            user_config.email.clone(),
            role,
            user_config.approval_level,
            user_config.permissions.clone(),
        )
        .await?;
        info!(email = %user_config.email, "seeded user");
    }

    for group_config in &config.approval_groups {
        let existing = ApprovalGroup::find()
            .filter(approval_group::Column::Level.eq(group_config.level))
            .one(db)
            .await?;
        if existing.is_some() {
            continue;
        }

        let mut member_ids = Vec::with_capacity(group_config.members.len());
        for email in &group_config.members {
            let member = find_user_by_email(db, email)
                .await?
                .ok_or_else(|| Error::Config {
                    message: format!("Group '{}' references unknown user {email}", group_config.name),
                })?;
            member_ids.push(member.id);
        }

        core::group::create_group(db, group_config.name.clone(), group_config.level, member_ids)
            .await?;
        info!(name = %group_config.name, level = group_config.level, "seeded approval group");
    }

    Ok(())
}

async fn find_user_by_email(db: &DatabaseConnection, email: &str) -> Result<Option<user::Model>> {
    User::find()
        .filter(user::Column::Email.eq(email))
        .one(db)
        .await
        .map_err(Into::into)
}

fn parse_role(role: &str) -> Result<UserRole> {
    match role {
        "admin" => Ok(UserRole::Admin),
        "manager" => Ok(UserRole::Manager),
        "user" => Ok(UserRole::User),
        other => Err(Error::Config {
            message: format!("Unknown role '{other}' in config.toml"),
        }),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::setup_test_db;

    const SEED_TOML: &str = r#"
        [[users]]
        name = "Ana Marin"
        email = "ana@example.com"
        role = "admin"
        approval_level = 3
        permissions = ["users.manage"]

        [[users]]
        name = "Ben Ito"
        email = "ben@example.com"
        role = "manager"
        approval_level = 2

        [[approval_groups]]
        name = "Executive board"
        level = 3
        members = ["ana@example.com"]
    "#;

    #[test]
    fn test_parse_seed_config() {
        let config: Config = toml::from_str(SEED_TOML).unwrap();
        assert_eq!(config.users.len(), 2);
        assert_eq!(config.users[0].role, "admin");
        assert_eq!(config.users[1].permissions.len(), 0);
        assert_eq!(config.approval_groups.len(), 1);
        assert_eq!(config.approval_groups[0].members, vec!["ana@example.com"]);
    }

    #[tokio::test]
    async fn test_seed_reference_data_idempotent() -> Result<()> {
        let db = setup_test_db().await?;
        let config: Config = toml::from_str(SEED_TOML).unwrap();

        seed_reference_data(&db, &config).await?;
        // Running again must not duplicate anything
        seed_reference_data(&db, &config).await?;

        assert_eq!(User::find().all(&db).await?.len(), 2);
        let groups = ApprovalGroup::find().all(&db).await?;
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].level, 3);

        Ok(())
    }

    #[tokio::test]
    async fn test_seed_unknown_member_fails() -> Result<()> {
        let db = setup_test_db().await?;
        let config: Config = toml::from_str(
            r#"
            [[approval_groups]]
            name = "Board"
            level = 1
            members = ["ghost@example.com"]
            "#,
        )
        .unwrap();

        let result = seed_reference_data(&db, &config).await;
        assert!(matches!(result.unwrap_err(), Error::Config { message: _ }));

        Ok(())
    }

    #[test]
    fn test_parse_role_rejects_unknown() {
        assert!(parse_role("admin").is_ok());
        assert!(parse_role("owner").is_err());
    }
}
