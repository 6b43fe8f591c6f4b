use serde::{Deserialize, Serialize};
use sqlx::{types::Json, SqlitePool};
use uuid::Uuid;

/// A named database hosted on an instance, with the users granted access to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseEntry {
    pub name: String,
    #[serde(default)]
    pub users: Vec<Uuid>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DatabaseInstance {
    pub id: Uuid,
    pub name: String,
    pub host: String,
    pub port: u16,
    pub users: Json<Vec<Uuid>>,
    pub databases: Json<Vec<DatabaseEntry>>,
    pub created_at: i64,
}

#[derive(Debug, Clone)]
pub struct NewInstance {
    pub name: String,
    pub host: String,
    pub port: u16,
    pub databases: Vec<DatabaseEntry>,
}

impl DatabaseInstance {
    pub async fn all(pool: &SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, DatabaseInstance>(
            "SELECT * FROM database_instances ORDER BY created_at, name",
        )
        .fetch_all(pool)
        .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, DatabaseInstance>("SELECT * FROM database_instances WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn create(pool: &SqlitePool, new: NewInstance) -> Result<Self, sqlx::Error> {
        let instance = DatabaseInstance {
            id: Uuid::new_v4(),
            name: new.name,
            host: new.host,
            port: new.port,
            users: Json(Vec::new()),
            databases: Json(new.databases),
            created_at: chrono::Utc::now().timestamp(),
        };

        sqlx::query(
            "INSERT INTO database_instances (id, name, host, port, users, databases, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(instance.id)
        .bind(&instance.name)
        .bind(&instance.host)
        .bind(instance.port)
        .bind(&instance.users)
        .bind(&instance.databases)
        .bind(instance.created_at)
        .execute(pool)
        .await?;

        Ok(instance)
    }

    /// Writes back both access lists. Not guarded against concurrent writers.
    pub async fn save_access(&self, pool: &SqlitePool) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE database_instances SET users = ?, databases = ? WHERE id = ?")
            .bind(&self.users)
            .bind(&self.databases)
            .bind(self.id)
            .execute(pool)
            .await?;

        Ok(())
    }

    pub async fn delete(pool: &SqlitePool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM database_instances WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn count(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM database_instances")
            .fetch_one(pool)
            .await?;

        Ok(count)
    }

    /// The instance-level list when `entry` is `None`, otherwise the named entry's list.
    pub fn access_list_mut(&mut self, entry: Option<&str>) -> Option<&mut Vec<Uuid>> {
        match entry {
            None => Some(&mut self.users.0),
            Some(name) => self
                .databases
                .0
                .iter_mut()
                .find(|db| db.name == name)
                .map(|db| &mut db.users),
        }
    }

    /// Appends `user` to the selected list. Returns `None` if the entry does not exist.
    pub fn grant(&mut self, entry: Option<&str>, user: Uuid) -> Option<bool> {
        let list = self.access_list_mut(entry)?;
        if list.contains(&user) {
            return Some(false);
        }
        list.push(user);
        Some(true)
    }

    /// Removes every occurrence of `user` from the selected list.
    pub fn revoke(&mut self, entry: Option<&str>, user: Uuid) -> Option<bool> {
        let list = self.access_list_mut(entry)?;
        let before = list.len();
        list.retain(|id| *id != user);
        Some(list.len() != before)
    }
}
