use sqlx::postgres::PgPool;

use crate::models::event::{Event, EventPayload};

/// Persistence layer for event rows. Thin by design: every method is one
/// parameterized statement against the injected pool.
#[derive(Debug, Clone)]
pub struct EventStore {
    pool: PgPool,
}

impl EventStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// All events ordered by date, optionally filtered to those whose
    /// title, description, location or category contains `search` as a
    /// case-insensitive substring.
    pub async fn list(&self, search: Option<&str>) -> sqlx::Result<Vec<Event>> {
        match search {
            Some(term) => {
                sqlx::query_as::<_, Event>(
                    "SELECT * FROM events \
                     WHERE title ILIKE $1 \
                        OR description ILIKE $1 \
                        OR location ILIKE $1 \
                        OR category ILIKE $1 \
                     ORDER BY event_date ASC",
                )
                .bind(like_pattern(term))
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query_as::<_, Event>("SELECT * FROM events ORDER BY event_date ASC")
                    .fetch_all(&self.pool)
                    .await
            }
        }
    }

    pub async fn get(&self, id: i32) -> sqlx::Result<Option<Event>> {
        sqlx::query_as::<_, Event>("SELECT * FROM events WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    /// Inserts a new row and returns its assigned id. Defaults for the
    /// optional fields come from the payload accessors.
    pub async fn insert(
        &self,
        payload: &EventPayload,
        image_url: Option<&str>,
    ) -> sqlx::Result<i32> {
        sqlx::query_scalar(
            "INSERT INTO events ( \
                title, description, event_date, event_time, location, \
                image_url, category, max_attendees, organizer_name, \
                organizer_email, ticket_price, is_featured \
             ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) \
             RETURNING id",
        )
        .bind(payload.title.as_deref())
        .bind(payload.description.as_deref())
        .bind(payload.event_date)
        .bind(payload.event_time.as_deref())
        .bind(payload.location.as_deref())
        .bind(image_url)
        .bind(payload.category.as_deref())
        .bind(payload.max_attendees())
        .bind(payload.organizer_name())
        .bind(payload.organizer_email())
        .bind(payload.ticket_price())
        .bind(payload.is_featured)
        .fetch_one(&self.pool)
        .await
    }

    /// Updates a row in place. Returns false when no row has that id.
    pub async fn update(
        &self,
        id: i32,
        payload: &EventPayload,
        image_url: Option<&str>,
    ) -> sqlx::Result<bool> {
        let result = sqlx::query(
            "UPDATE events SET \
                title = $1, \
                description = $2, \
                event_date = $3, \
                event_time = $4, \
                location = $5, \
                image_url = $6, \
                category = $7, \
                max_attendees = $8, \
                organizer_name = $9, \
                organizer_email = $10, \
                ticket_price = $11, \
                is_featured = $12, \
                updated_at = NOW() \
             WHERE id = $13",
        )
        .bind(payload.title.as_deref())
        .bind(payload.description.as_deref())
        .bind(payload.event_date)
        .bind(payload.event_time.as_deref())
        .bind(payload.location.as_deref())
        .bind(image_url)
        .bind(payload.category.as_deref())
        .bind(payload.max_attendees())
        .bind(payload.organizer_name())
        .bind(payload.organizer_email())
        .bind(payload.ticket_price())
        .bind(payload.is_featured)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Image reference currently stored on a row, for the delete and
    /// image-replacement flows. None when the row is absent or has no
    /// image.
    pub async fn stored_image(&self, id: i32) -> sqlx::Result<Option<String>> {
        let stored: Option<Option<String>> =
            sqlx::query_scalar("SELECT image_url FROM events WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(stored.flatten())
    }

    /// Deletes a row. Returns false when no row has that id.
    pub async fn delete(&self, id: i32) -> sqlx::Result<bool> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// `%term%` with LIKE metacharacters escaped, so the user's text matches
/// as a literal substring.
fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

#[cfg(test)]
mod tests {
    use super::like_pattern;

    #[test]
    fn wraps_term_in_wildcards() {
        assert_eq!(like_pattern("conference"), "%conference%");
    }

    #[test]
    fn escapes_like_metacharacters() {
        assert_eq!(like_pattern("100%_done"), "%100\\%\\_done%");
        assert_eq!(like_pattern("back\\slash"), "%back\\\\slash%");
    }
}
