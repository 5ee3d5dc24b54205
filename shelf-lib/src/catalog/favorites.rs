use chrono::Utc;
use log::info;
use rusqlite::params;

use crate::{api::Client, record::BookRecord, Error, ErrorKind};

use super::{book_from_row, Catalog, BOOK_COLUMNS};

/// Outcome of [`Catalog::toggle_favorite`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FavoriteToggle {
    /// The book is now a favorite of the user.
    Added,
    /// The book is no longer a favorite of the user.
    Removed,
}

fn checked_user(user: &str) -> Result<&str, Error> {
    let user = user.trim();
    if user.is_empty() {
        Err(Error::new(ErrorKind::NoValue, "A favorite needs a user name"))
    } else {
        Ok(user)
    }
}

impl<C: Client> Catalog<C> {
    /// Marks the book as a favorite of `user`, or unmarks it when it already was one.
    ///
    /// # Errors
    ///
    /// An [`Err`] of kind [`ErrorKind::NoValue`] is returned when the book does not exist or
    /// the user name is blank, and of kind [`ErrorKind::Storage`] when the database fails.
    pub fn toggle_favorite(&self, user: &str, book_id: i64) -> Result<FavoriteToggle, Error> {
        let user = checked_user(user)?;
        if self.get(book_id)?.is_none() {
            return Err(Error::new(
                ErrorKind::NoValue,
                format!("No book with id {book_id}"),
            ));
        }

        let removed = self.conn.execute(
            "DELETE FROM favorites WHERE user = ?1 AND book_id = ?2",
            params![user, book_id],
        )?;
        if removed > 0 {
            info!("Book {book_id} is no longer a favorite of {user}");
            return Ok(FavoriteToggle::Removed);
        }

        self.conn.execute(
            "INSERT INTO favorites (user, book_id, added_at) VALUES (?1, ?2, ?3)",
            params![user, book_id, Utc::now().timestamp_millis()],
        )?;
        info!("Book {book_id} is now a favorite of {user}");
        Ok(FavoriteToggle::Added)
    }

    /// Returns true when the book is a favorite of `user`.
    ///
    /// # Errors
    ///
    /// An [`Err`] of kind [`ErrorKind::Storage`] is returned when the query fails.
    pub fn is_favorite(&self, user: &str, book_id: i64) -> Result<bool, Error> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM favorites WHERE user = ?1 AND book_id = ?2",
            params![user.trim(), book_id],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Favorite books of `user`, most recently added first.
    ///
    /// # Errors
    ///
    /// An [`Err`] of kind [`ErrorKind::Storage`] is returned when the query fails.
    pub fn favorites(&self, user: &str) -> Result<Vec<BookRecord>, Error> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {BOOK_COLUMNS} FROM favorites f JOIN books b ON b.id = f.book_id
             WHERE f.user = ?1
             ORDER BY f.added_at DESC, f.id DESC"
        ))?;
        let books = stmt
            .query_map(params![user.trim()], book_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(books)
    }
}
