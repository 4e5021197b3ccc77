use super::{PersistenceError, PersistenceResult, TaskPersistence};
use crate::task::Task;
use crate::task_store::TaskStore;
use rusqlite::{Connection, OptionalExtension, params};
use std::sync::{Mutex, MutexGuard};

pub struct SqliteTaskStore {
    connection: Mutex<Connection>,
}

impl SqliteTaskStore {
    pub fn new<P: AsRef<std::path::Path>>(path: P) -> PersistenceResult<Self> {
        let connection = Connection::open(path)?;
        Self::initialize_schema(&connection)?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    pub fn in_memory() -> PersistenceResult<Self> {
        let connection = Connection::open_in_memory()?;
        Self::initialize_schema(&connection)?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    fn initialize_schema(connection: &Connection) -> PersistenceResult<()> {
        let ddl = r#"
            CREATE TABLE IF NOT EXISTS task_list (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                task_count INTEGER NOT NULL
            );
            CREATE TABLE IF NOT EXISTS tasks (
                position INTEGER PRIMARY KEY,
                subject TEXT NOT NULL,
                duration TEXT NOT NULL,
                priority INTEGER NOT NULL,
                deadline TEXT NOT NULL
            );
        "#;
        connection.execute_batch(ddl)?;
        Ok(())
    }

    fn lock(&self) -> PersistenceResult<MutexGuard<'_, Connection>> {
        self.connection
            .lock()
            .map_err(|_| PersistenceError::InvalidData("sqlite connection lock poisoned".into()))
    }
}

impl TaskPersistence for SqliteTaskStore {
    fn save_tasks(&self, store: &TaskStore) -> PersistenceResult<()> {
        let tasks = store.tasks()?;
        super::validate_tasks(&tasks)?;
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM tasks", [])?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO tasks (position, subject, duration, priority, deadline)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for (position, task) in tasks.iter().enumerate() {
                stmt.execute(params![
                    position as i64,
                    task.subject,
                    task.duration,
                    i64::from(task.priority),
                    task.deadline
                ])?;
            }
        }
        tx.execute("DELETE FROM task_list", [])?;
        tx.execute(
            "INSERT INTO task_list (id, task_count) VALUES (1, ?1)",
            params![tasks.len() as i64],
        )?;
        tx.commit()?;
        tracing::info!(rows = tasks.len(), "tasks saved to sqlite");
        Ok(())
    }

    fn load_tasks(&self) -> PersistenceResult<Option<TaskStore>> {
        let conn = self.lock()?;

        let task_count: Option<i64> = conn
            .query_row("SELECT task_count FROM task_list WHERE id = 1", [], |row| {
                row.get(0)
            })
            .optional()?;
        let Some(task_count) = task_count else {
            return Ok(None);
        };

        let mut stmt = conn.prepare(
            "SELECT subject, duration, priority, deadline FROM tasks ORDER BY position ASC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, i64>(2)?,
                row.get::<_, String>(3)?,
            ))
        })?;

        let mut tasks = Vec::new();
        for row in rows {
            let (subject, duration, priority, deadline) = row?;
            let priority = crate::task_validation::validate_priority(priority)
                .map_err(|err| PersistenceError::InvalidData(err.to_string()))?;
            tasks.push(Task::new(subject, duration, priority, deadline));
        }

        if tasks.len() as i64 != task_count {
            return Err(PersistenceError::InvalidData(format!(
                "expected {task_count} stored tasks, found {}",
                tasks.len()
            )));
        }
        super::validate_tasks(&tasks)?;
        Ok(Some(TaskStore::from_tasks(tasks)?))
    }
}
