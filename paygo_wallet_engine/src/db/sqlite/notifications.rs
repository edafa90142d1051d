use sqlx::SqliteConnection;

use crate::{
    db::sqlite::SqliteDatabaseError,
    db_types::{NewNotification, Notification},
};

pub async fn insert(note: NewNotification, conn: &mut SqliteConnection) -> Result<(), SqliteDatabaseError> {
    let _ = sqlx::query("INSERT INTO notifications (user_id, title, message, kind) VALUES ($1, $2, $3, $4)")
        .bind(note.user_id)
        .bind(note.title)
        .bind(note.message)
        .bind(note.kind)
        .execute(conn)
        .await?;
    Ok(())
}

pub async fn fetch_for_user(
    user_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Vec<Notification>, SqliteDatabaseError> {
    let notes = sqlx::query_as(
        "SELECT id, user_id, title, message, kind, read, created_at FROM notifications \
         WHERE user_id = $1 ORDER BY created_at DESC, id DESC",
    )
    .bind(user_id)
    .fetch_all(conn)
    .await?;
    Ok(notes)
}
