// src/store/postgres.rs

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{PgPool, prelude::FromRow};

use crate::{
    error::AppError,
    models::{
        manual::{ManualAnswer, ManualQuestion, QuestionCategory},
        question::{NewAnswer, NewQuestion, QuestionType},
        quiz::{Quiz, QuizAnswer, QuizQuestion},
        reference::{ReferenceEntry, ReferenceGroup},
    },
};

use super::TriviaStore;

/// Empty strings in the media columns are read back as `None`.
const MANUAL_QUESTION_COLUMNS: &str = r#"
    id,
    typeid AS type_id,
    categoryid AS category_id,
    question,
    NULLIF(map, '') AS map,
    NULLIF(highlighted, '') AS highlighted,
    NULLIF(flagcode, '') AS flag_code,
    NULLIF(imageurl, '') AS image_url,
    NULLIF(imageattributename, '') AS image_attribute_name,
    NULLIF(imageattributeurl, '') AS image_attribute_url,
    COALESCE(imagewidth, 0) AS image_width,
    COALESCE(imageheight, 0) AS image_height,
    NULLIF(imagealt, '') AS image_alt,
    NULLIF(explainer, '') AS explainer,
    lastused::date AS last_used,
    quizdate::date AS quiz_date
"#;

/// Helper struct for reading 'manualtriviaquestions' rows.
#[derive(FromRow)]
struct ManualQuestionRow {
    id: i32,
    type_id: i32,
    category_id: i32,
    question: String,
    map: Option<String>,
    highlighted: Option<String>,
    flag_code: Option<String>,
    image_url: Option<String>,
    image_attribute_name: Option<String>,
    image_attribute_url: Option<String>,
    image_width: i32,
    image_height: i32,
    image_alt: Option<String>,
    explainer: Option<String>,
    last_used: Option<NaiveDate>,
    quiz_date: Option<NaiveDate>,
}

impl TryFrom<ManualQuestionRow> for ManualQuestion {
    type Error = AppError;

    fn try_from(row: ManualQuestionRow) -> Result<Self, Self::Error> {
        Ok(ManualQuestion {
            id: row.id,
            question_type: QuestionType::try_from(row.type_id)?,
            category_id: row.category_id,
            question: row.question,
            map: row.map,
            highlighted: row.highlighted,
            flag_code: row.flag_code,
            image_url: row.image_url,
            image_attribute_name: row.image_attribute_name,
            image_attribute_url: row.image_attribute_url,
            image_width: row.image_width,
            image_height: row.image_height,
            image_alt: row.image_alt,
            explainer: row.explainer,
            last_used: row.last_used,
            quiz_date: row.quiz_date,
        })
    }
}

#[derive(FromRow)]
struct ManualAnswerRow {
    id: i32,
    manual_question_id: i32,
    text: String,
    is_correct: bool,
    flag_code: Option<String>,
}

#[derive(FromRow)]
struct QuizRow {
    id: i32,
    name: String,
    date: NaiveDate,
    max_score: i32,
}

#[derive(FromRow)]
struct QuizQuestionRow {
    id: i32,
    type_id: i32,
    question: String,
    map_name: Option<String>,
    highlighted: Option<String>,
    flag_code: Option<String>,
    flag_url: Option<String>,
    image_url: Option<String>,
    image_attribute_name: Option<String>,
    image_attribute_url: Option<String>,
    image_width: i32,
    image_height: i32,
    image_alt: Option<String>,
    explainer: Option<String>,
}

/// `TriviaStore` backed by the Postgres schema shared with the quiz frontend.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_manual_questions(
        &self,
        sql: &str,
        binds: ManualQuery<'_>,
    ) -> Result<Vec<ManualQuestion>, AppError> {
        let query = sqlx::query_as::<_, ManualQuestionRow>(sql);
        let query = match binds {
            ManualQuery::ScheduledFor(date) => query.bind(date),
            ManualQuery::Pool {
                type_id,
                last_used_before,
                categories,
            } => query.bind(type_id).bind(last_used_before).bind(categories),
        };

        let rows = query.fetch_all(&self.pool).await.map_err(|e| {
            tracing::error!("Failed to fetch manual questions: {:?}", e);
            AppError::from(e)
        })?;

        rows.into_iter().map(ManualQuestion::try_from).collect()
    }

    async fn fetch_quiz_answers(&self, question_id: i32) -> Result<Vec<QuizAnswer>, AppError> {
        let answers = sqlx::query_as::<_, QuizAnswer>(
            r#"
            SELECT
                a.text,
                a.iscorrect AS is_correct,
                NULLIF(a.flagcode, '') AS flag_code,
                f.url AS flag_url
            FROM triviaanswers a
            LEFT JOIN flagentries f ON f.code = a.flagcode
            WHERE a.triviaquestionid = $1
            ORDER BY a.id
            "#,
        )
        .bind(question_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(answers)
    }
}

enum ManualQuery<'a> {
    ScheduledFor(NaiveDate),
    Pool {
        type_id: i32,
        last_used_before: NaiveDate,
        categories: &'a [i32],
    },
}

#[async_trait]
impl TriviaStore for PgStore {
    async fn get_reference_entries(
        &self,
        group: ReferenceGroup,
    ) -> Result<Vec<ReferenceEntry>, AppError> {
        let entries = sqlx::query_as::<_, ReferenceEntry>(
            r#"
            SELECT
                m.id,
                m.groupid AS group_id,
                m.name,
                m.code,
                NULLIF(f.url, '') AS flag_url,
                m.svgname AS svg_name,
                COALESCE(lower(m.alternativenames::text)::text[], '{}') AS alternative_names,
                COALESCE(lower(m.prefixes::text)::text[], '{}') AS prefixes,
                COALESCE(m.grouping, '') AS grouping
            FROM mappingentries m
            JOIN mappinggroups g ON g.id = m.groupid
            LEFT JOIN flagentries f ON f.code = m.code
            WHERE g.key = $1
            ORDER BY m.id
            "#,
        )
        .bind(group.key())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch mapping entries for {}: {:?}", group.key(), e);
            AppError::from(e)
        })?;

        Ok(entries)
    }

    async fn get_manual_questions_scheduled_today(
        &self,
        today: NaiveDate,
    ) -> Result<Vec<ManualQuestion>, AppError> {
        let sql = format!(
            "SELECT {} FROM manualtriviaquestions WHERE quizdate::date = $1 ORDER BY id",
            MANUAL_QUESTION_COLUMNS
        );
        self.fetch_manual_questions(&sql, ManualQuery::ScheduledFor(today))
            .await
    }

    async fn get_active_categories(
        &self,
        only_active: bool,
    ) -> Result<Vec<QuestionCategory>, AppError> {
        let mut sql = String::from(
            "SELECT id, name, isactive AS is_active, imageonly AS image_only FROM triviaquestioncategory",
        );
        if only_active {
            sql.push_str(" WHERE isactive");
        }
        sql.push_str(" ORDER BY id");

        let categories = sqlx::query_as::<_, QuestionCategory>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(categories)
    }

    async fn get_manual_questions(
        &self,
        question_type: QuestionType,
        last_used_before: NaiveDate,
        allowed_categories: &[i32],
    ) -> Result<Vec<ManualQuestion>, AppError> {
        // One question per category: never used first, then the stalest.
        let sql = format!(
            r#"
            SELECT DISTINCT ON (categoryid) {}
            FROM manualtriviaquestions
            WHERE typeid = $1
              AND quizdate IS NULL
              AND (lastused IS NULL OR lastused < $2)
              AND categoryid = ANY($3)
            ORDER BY categoryid, lastused NULLS FIRST, id
            "#,
            MANUAL_QUESTION_COLUMNS
        );

        self.fetch_manual_questions(
            &sql,
            ManualQuery::Pool {
                type_id: question_type.id(),
                last_used_before,
                categories: allowed_categories,
            },
        )
        .await
    }

    async fn get_manual_answers(
        &self,
        manual_question_id: i32,
    ) -> Result<Vec<ManualAnswer>, AppError> {
        let rows = sqlx::query_as::<_, ManualAnswerRow>(
            r#"
            SELECT
                id,
                manualtriviaquestionid AS manual_question_id,
                text,
                iscorrect AS is_correct,
                NULLIF(flagcode, '') AS flag_code
            FROM manualtriviaanswers
            WHERE manualtriviaquestionid = $1
            ORDER BY id
            "#,
        )
        .bind(manual_question_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| ManualAnswer {
                id: row.id,
                manual_question_id: row.manual_question_id,
                text: row.text,
                is_correct: row.is_correct,
                flag_code: row.flag_code,
            })
            .collect())
    }

    async fn create_question(
        &self,
        quiz_id: i32,
        question: &NewQuestion,
    ) -> Result<i32, AppError> {
        let id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO triviaquestions (
                triviaid, typeid, question, map, highlighted, flagcode, imageurl,
                imageattributename, imageattributeurl, imagewidth, imageheight, imagealt, explainer
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING id
            "#,
        )
        .bind(quiz_id)
        .bind(question.question_type.id())
        .bind(&question.question)
        .bind(question.map.as_deref().unwrap_or_default())
        .bind(question.highlighted.as_deref().unwrap_or_default())
        .bind(question.flag_code.as_deref().unwrap_or_default())
        .bind(question.image_url.as_deref().unwrap_or_default())
        .bind(question.image_attribute_name.as_deref().unwrap_or_default())
        .bind(question.image_attribute_url.as_deref().unwrap_or_default())
        .bind(question.image_width)
        .bind(question.image_height)
        .bind(question.image_alt.as_deref().unwrap_or_default())
        .bind(question.explainer.as_deref().unwrap_or_default())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to insert trivia question: {:?}", e);
            AppError::from(e)
        })?;

        Ok(id)
    }

    async fn create_answer(&self, question_id: i32, answer: &NewAnswer) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO triviaanswers (triviaquestionid, text, iscorrect, flagcode)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(question_id)
        .bind(&answer.text)
        .bind(answer.is_correct)
        .bind(answer.flag_code.as_deref().unwrap_or_default())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to insert trivia answer: {:?}", e);
            AppError::from(e)
        })?;

        Ok(())
    }

    async fn mark_manual_question_used(&self, id: i32, date: NaiveDate) -> Result<(), AppError> {
        sqlx::query("UPDATE manualtriviaquestions SET lastused = $2 WHERE id = $1")
            .bind(id)
            .bind(date)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn quiz_exists(&self, date: NaiveDate) -> Result<bool, AppError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM trivia WHERE date = $1)",
        )
        .bind(date)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn create_quiz_row(&self, name: &str, date: NaiveDate) -> Result<i32, AppError> {
        sqlx::query_scalar::<_, i32>(
            "INSERT INTO trivia (name, date, maxscore) VALUES ($1, $2, 0) RETURNING id",
        )
        .bind(name)
        .bind(date)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                AppError::AlreadyExists(format!("trivia for {} already created", date))
            }
            e => {
                tracing::error!("Failed to insert trivia: {:?}", e);
                AppError::from(e)
            }
        })
    }

    async fn set_quiz_max_score(&self, quiz_id: i32, max_score: i32) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE trivia SET maxscore = $1 WHERE id = $2")
            .bind(max_score)
            .bind(quiz_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("trivia {} not found", quiz_id)));
        }

        Ok(())
    }

    async fn get_quiz(&self, date: NaiveDate) -> Result<Option<Quiz>, AppError> {
        let Some(row) = sqlx::query_as::<_, QuizRow>(
            "SELECT id, name, date::date AS date, maxscore AS max_score FROM trivia WHERE date = $1",
        )
        .bind(date)
        .fetch_optional(&self.pool)
        .await?
        else {
            return Ok(None);
        };

        let question_rows = sqlx::query_as::<_, QuizQuestionRow>(
            r#"
            SELECT
                q.id,
                q.typeid AS type_id,
                q.question,
                NULLIF(q.map, '') AS map_name,
                NULLIF(q.highlighted, '') AS highlighted,
                NULLIF(q.flagcode, '') AS flag_code,
                f.url AS flag_url,
                NULLIF(q.imageurl, '') AS image_url,
                NULLIF(q.imageattributename, '') AS image_attribute_name,
                NULLIF(q.imageattributeurl, '') AS image_attribute_url,
                COALESCE(q.imagewidth, 0) AS image_width,
                COALESCE(q.imageheight, 0) AS image_height,
                NULLIF(q.imagealt, '') AS image_alt,
                NULLIF(q.explainer, '') AS explainer
            FROM triviaquestions q
            LEFT JOIN flagentries f ON f.code = q.flagcode
            WHERE q.triviaid = $1
            ORDER BY q.id
            "#,
        )
        .bind(row.id)
        .fetch_all(&self.pool)
        .await?;

        let mut questions = Vec::with_capacity(question_rows.len());
        for q in question_rows {
            let answers = self.fetch_quiz_answers(q.id).await?;
            questions.push(QuizQuestion {
                id: q.id,
                question_type: QuestionType::try_from(q.type_id)?,
                question: q.question,
                map_name: q.map_name,
                highlighted: q.highlighted,
                flag_code: q.flag_code,
                flag_url: q.flag_url,
                image_url: q.image_url,
                image_attribute_name: q.image_attribute_name,
                image_attribute_url: q.image_attribute_url,
                image_width: q.image_width,
                image_height: q.image_height,
                image_alt: q.image_alt,
                explainer: q.explainer,
                answers,
            });
        }

        Ok(Some(Quiz {
            id: row.id,
            name: row.name,
            date: row.date,
            max_score: row.max_score,
            questions,
        }))
    }

    async fn delete_quiz(&self, quiz: &Quiz) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("UPDATE triviaplays SET triviaid = NULL WHERE triviaid = $1")
            .bind(quiz.id)
            .execute(&mut *tx)
            .await?;

        for question in &quiz.questions {
            sqlx::query("DELETE FROM triviaanswers WHERE triviaquestionid = $1")
                .bind(question.id)
                .execute(&mut *tx)
                .await?;

            sqlx::query("DELETE FROM triviaquestions WHERE id = $1")
                .bind(question.id)
                .execute(&mut *tx)
                .await?;
        }

        sqlx::query("DELETE FROM trivia WHERE id = $1")
            .bind(quiz.id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        tracing::info!("Deleted trivia {} ({})", quiz.id, quiz.date);

        Ok(())
    }
}
