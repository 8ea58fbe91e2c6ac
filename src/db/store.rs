//! Entity access layer. All lookups by id or name return `Option` so callers
//! handle "absent" explicitly instead of assuming the row exists.

use chrono::{SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::db::models::{Comment, Post, User};

fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn new_id() -> String {
    uuid::Uuid::now_v7().to_string()
}

// -- Users --

pub fn create_user(
    conn: &Connection,
    username: &str,
    password_hash: &str,
    email: Option<&str>,
) -> Result<User, rusqlite::Error> {
    let user = User {
        id: new_id(),
        username: username.to_string(),
        password_hash: password_hash.to_string(),
        email: email.map(str::to_string),
        created_at: now(),
    };
    conn.execute(
        "INSERT INTO users (id, username, password_hash, email, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            user.id,
            user.username,
            user.password_hash,
            user.email,
            user.created_at
        ],
    )?;
    Ok(user)
}

fn user_from_row(row: &Row) -> Result<User, rusqlite::Error> {
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        password_hash: row.get(2)?,
        email: row.get(3)?,
        created_at: row.get(4)?,
    })
}

pub fn find_user_by_name(
    conn: &Connection,
    username: &str,
) -> Result<Option<User>, rusqlite::Error> {
    conn.query_row(
        "SELECT id, username, password_hash, email, created_at FROM users WHERE username = ?1",
        params![username],
        user_from_row,
    )
    .optional()
}

pub fn find_user_by_id(conn: &Connection, id: &str) -> Result<Option<User>, rusqlite::Error> {
    conn.query_row(
        "SELECT id, username, password_hash, email, created_at FROM users WHERE id = ?1",
        params![id],
        user_from_row,
    )
    .optional()
}

// -- Posts --

pub fn create_post(
    conn: &Connection,
    creator_name: &str,
    subject: &str,
    content: &str,
) -> Result<Post, rusqlite::Error> {
    let ts = now();
    let post = Post {
        id: new_id(),
        creator_name: creator_name.to_string(),
        subject: subject.to_string(),
        content: content.to_string(),
        num_likes: 0,
        num_comments: 0,
        created_at: ts.clone(),
        updated_at: ts,
    };
    conn.execute(
        "INSERT INTO posts (id, creator_name, subject, content, num_likes, num_comments, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, 0, 0, ?5, ?6)",
        params![
            post.id,
            post.creator_name,
            post.subject,
            post.content,
            post.created_at,
            post.updated_at
        ],
    )?;
    Ok(post)
}

fn post_from_row(row: &Row) -> Result<Post, rusqlite::Error> {
    Ok(Post {
        id: row.get(0)?,
        creator_name: row.get(1)?,
        subject: row.get(2)?,
        content: row.get(3)?,
        num_likes: row.get(4)?,
        num_comments: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

const POST_COLUMNS: &str =
    "id, creator_name, subject, content, num_likes, num_comments, created_at, updated_at";

pub fn find_post_by_id(conn: &Connection, id: &str) -> Result<Option<Post>, rusqlite::Error> {
    conn.query_row(
        &format!("SELECT {POST_COLUMNS} FROM posts WHERE id = ?1"),
        params![id],
        post_from_row,
    )
    .optional()
}

/// All posts, newest first.
pub fn list_posts(conn: &Connection) -> Result<Vec<Post>, rusqlite::Error> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {POST_COLUMNS} FROM posts ORDER BY created_at DESC, id DESC"
    ))?;
    let posts = stmt.query_map([], post_from_row)?.collect();
    posts
}

/// Posts by a single creator, newest first.
pub fn list_posts_by_creator(
    conn: &Connection,
    creator_name: &str,
) -> Result<Vec<Post>, rusqlite::Error> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {POST_COLUMNS} FROM posts WHERE creator_name = ?1 ORDER BY created_at DESC, id DESC"
    ))?;
    let posts = stmt.query_map(params![creator_name], post_from_row)?.collect();
    posts
}

pub fn update_post(
    conn: &Connection,
    id: &str,
    subject: &str,
    content: &str,
) -> Result<(), rusqlite::Error> {
    conn.execute(
        "UPDATE posts SET subject = ?1, content = ?2, updated_at = ?3 WHERE id = ?4",
        params![subject, content, now(), id],
    )?;
    Ok(())
}

/// Likes and comments go with the post via ON DELETE CASCADE.
pub fn delete_post(conn: &Connection, id: &str) -> Result<(), rusqlite::Error> {
    conn.execute("DELETE FROM posts WHERE id = ?1", params![id])?;
    Ok(())
}

// -- Likes --

pub fn post_likers(conn: &Connection, post_id: &str) -> Result<Vec<String>, rusqlite::Error> {
    let mut stmt =
        conn.prepare("SELECT user_id FROM post_likes WHERE post_id = ?1 ORDER BY created_at")?;
    let likers = stmt.query_map(params![post_id], |row| row.get(0))?.collect();
    likers
}

pub fn has_liked(
    conn: &Connection,
    post_id: &str,
    user_id: &str,
) -> Result<bool, rusqlite::Error> {
    conn.query_row(
        "SELECT COUNT(*) > 0 FROM post_likes WHERE post_id = ?1 AND user_id = ?2",
        params![post_id, user_id],
        |row| row.get(0),
    )
}

/// Toggle a user's like on a post, keeping num_likes in step with the
/// membership set. Returns true when the post is liked after the call.
pub fn toggle_like(
    conn: &Connection,
    post_id: &str,
    user_id: &str,
) -> Result<bool, rusqlite::Error> {
    if has_liked(conn, post_id, user_id)? {
        conn.execute(
            "DELETE FROM post_likes WHERE post_id = ?1 AND user_id = ?2",
            params![post_id, user_id],
        )?;
        conn.execute(
            "UPDATE posts SET num_likes = num_likes - 1 WHERE id = ?1",
            params![post_id],
        )?;
        Ok(false)
    } else {
        conn.execute(
            "INSERT INTO post_likes (post_id, user_id, created_at) VALUES (?1, ?2, ?3)",
            params![post_id, user_id, now()],
        )?;
        conn.execute(
            "UPDATE posts SET num_likes = num_likes + 1 WHERE id = ?1",
            params![post_id],
        )?;
        Ok(true)
    }
}

// -- Comments --

pub fn create_comment(
    conn: &Connection,
    post_id: &str,
    username: &str,
    content: &str,
) -> Result<Comment, rusqlite::Error> {
    let comment = Comment {
        id: new_id(),
        post_id: post_id.to_string(),
        username: username.to_string(),
        content: content.to_string(),
        created_at: now(),
    };
    conn.execute(
        "INSERT INTO comments (id, post_id, username, content, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            comment.id,
            comment.post_id,
            comment.username,
            comment.content,
            comment.created_at
        ],
    )?;
    conn.execute(
        "UPDATE posts SET num_comments = num_comments + 1 WHERE id = ?1",
        params![post_id],
    )?;
    Ok(comment)
}

fn comment_from_row(row: &Row) -> Result<Comment, rusqlite::Error> {
    Ok(Comment {
        id: row.get(0)?,
        post_id: row.get(1)?,
        username: row.get(2)?,
        content: row.get(3)?,
        created_at: row.get(4)?,
    })
}

pub fn find_comment_by_id(
    conn: &Connection,
    id: &str,
) -> Result<Option<Comment>, rusqlite::Error> {
    conn.query_row(
        "SELECT id, post_id, username, content, created_at FROM comments WHERE id = ?1",
        params![id],
        comment_from_row,
    )
    .optional()
}

/// Comments on a post, newest first.
pub fn list_comments_for_post(
    conn: &Connection,
    post_id: &str,
) -> Result<Vec<Comment>, rusqlite::Error> {
    let mut stmt = conn.prepare(
        "SELECT id, post_id, username, content, created_at FROM comments
         WHERE post_id = ?1 ORDER BY created_at DESC, id DESC",
    )?;
    let comments = stmt.query_map(params![post_id], comment_from_row)?.collect();
    comments
}

pub fn update_comment(conn: &Connection, id: &str, content: &str) -> Result<(), rusqlite::Error> {
    conn.execute(
        "UPDATE comments SET content = ?1 WHERE id = ?2",
        params![content, id],
    )?;
    Ok(())
}

/// Removes the comment and decrements the parent post's counter.
pub fn delete_comment(conn: &Connection, id: &str) -> Result<(), rusqlite::Error> {
    let comment = match find_comment_by_id(conn, id)? {
        Some(c) => c,
        None => return Ok(()),
    };
    conn.execute("DELETE FROM comments WHERE id = ?1", params![id])?;
    conn.execute(
        "UPDATE posts SET num_comments = num_comments - 1 WHERE id = ?1",
        params![comment.post_id],
    )?;
    Ok(())
}

/// Administrative reset: wipes all users, posts, likes, and comments.
pub fn reset_all(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(
        "DELETE FROM comments;
         DELETE FROM post_likes;
         DELETE FROM posts;
         DELETE FROM users;",
    )?;
    Ok(())
}
