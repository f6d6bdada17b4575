//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod attempts;
mod quizzes;
mod users;

use crate::config::{AppConfig, DatabaseConfig};
use crate::errors::{QuizHubError, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 按全局配置创建存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        Self::connect(&config.database).await
    }

    /// 连接数据库并运行迁移
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let db_url = Self::build_database_url(&config.url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite://") {
            Self::connect_sqlite(&db_url, config).await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        // 运行迁移
        Migrator::up(&db, None)
            .await
            .map_err(|e| QuizHubError::database_operation(format!("数据库迁移失败: {e}")))?;

        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(Self { db })
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, config: &DatabaseConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| QuizHubError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory")
            .pragma("wal_autocheckpoint", "1000");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.pool_size)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(config.timeout))
            .idle_timeout(Duration::from_secs(300))
            .connect_with(opt)
            .await
            .map_err(|e| QuizHubError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &DatabaseConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.pool_size)
            .min_connections(1)
            .connect_timeout(Duration::from_secs(config.timeout))
            .acquire_timeout(Duration::from_secs(config.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| QuizHubError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite://") || url.starts_with("sqlite:") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") {
            Ok(format!("sqlite://{}?mode=rwc", url))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(QuizHubError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }
}

// Storage trait 实现
use crate::models::{
    attempts::{
        entities::{Attempt, StudentAnswer},
        responses::AttemptWithStudent,
    },
    quizzes::entities::{NewQuiz, Question, Quiz, QuizWithQuestions},
    users::{entities::User, requests::CreateUserRequest},
};
use crate::storage::Storage;
use async_trait::async_trait;
use std::collections::HashMap;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 用户模块
    async fn create_user(&self, user: CreateUserRequest) -> Result<User> {
        self.create_user_impl(user).await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    // 测验模块
    async fn create_quiz(&self, created_by: i64, quiz: NewQuiz) -> Result<QuizWithQuestions> {
        self.create_quiz_impl(created_by, quiz).await
    }

    async fn get_quiz_by_title(&self, title: &str) -> Result<Option<Quiz>> {
        self.get_quiz_by_title_impl(title).await
    }

    async fn get_quiz_questions(&self, quiz_id: i64) -> Result<Vec<Question>> {
        self.get_quiz_questions_impl(quiz_id).await
    }

    async fn list_quizzes(&self, search: Option<&str>) -> Result<Vec<Quiz>> {
        self.list_quizzes_impl(search).await
    }

    async fn delete_quiz(&self, quiz_id: i64) -> Result<bool> {
        self.delete_quiz_impl(quiz_id).await
    }

    // 作答模块
    async fn count_attempts(&self, quiz_id: i64, student_id: i64) -> Result<i64> {
        self.count_attempts_impl(quiz_id, student_id).await
    }

    async fn create_attempt(
        &self,
        quiz_id: i64,
        student_id: i64,
        selections: &HashMap<i64, i64>,
        max_attempts: i32,
    ) -> Result<Attempt> {
        self.create_attempt_impl(quiz_id, student_id, selections, max_attempts)
            .await
    }

    async fn list_quiz_attempts(&self, quiz_id: i64) -> Result<Vec<AttemptWithStudent>> {
        self.list_quiz_attempts_impl(quiz_id).await
    }

    async fn latest_attempts_by_student(&self, student_id: i64) -> Result<HashMap<i64, Attempt>> {
        self.latest_attempts_by_student_impl(student_id).await
    }

    async fn get_attempt_by_id(&self, attempt_id: i64) -> Result<Option<Attempt>> {
        self.get_attempt_by_id_impl(attempt_id).await
    }

    async fn get_student_choice(&self, attempt_id: i64, question_id: i64) -> Result<String> {
        self.get_student_choice_impl(attempt_id, question_id).await
    }

    async fn list_attempt_answers(&self, attempt_id: i64) -> Result<Vec<StudentAnswer>> {
        self.list_attempt_answers_impl(attempt_id).await
    }
}
