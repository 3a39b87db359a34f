use color_eyre::eyre::{Context, Result};
use sqlx::{QueryBuilder, Sqlite, SqliteConnection};
use tracing::instrument;

use crate::model::{
    util::{datetime_to_db_repr, slugify},
    ImageRecord, Post, PostId, PostStatus,
};

use super::db::DbPool;
use super::db_entity::{DbPost, DbPostImage, DbPostStatus};

/// Which posts a query may see. Public routes only ever serve published
/// posts; `All` exists for internal fetches such as building the response
/// to a create request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Visibility {
    All,
    PublishedOnly,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePost {
    pub title: String,
    pub content: String,
    pub status: PostStatus,
    pub images: Vec<ImageRecord>,
}

/// Insert a post together with its initial image sequence. The slug is
/// derived from the title and de-duplicated with a numeric suffix.
#[instrument(skip(pool, create), fields(title = %create.title))]
pub async fn insert_post(pool: &DbPool, create: &CreatePost) -> Result<PostId> {
    let mut tx = pool
        .begin()
        .await
        .wrap_err("could not begin db transaction")?;
    let slug = unique_slug(tx.as_mut(), &create.title).await?;
    let now = datetime_to_db_repr(&chrono::Utc::now());
    let status: DbPostStatus = create.status.into();
    let result = sqlx::query(
        r#"
INSERT INTO Post(id, title, slug, content, status, created_at, changed_at)
VALUES
(NULL, ?, ?, ?, ?, ?, ?);
    "#,
    )
    .bind(&create.title)
    .bind(&slug)
    .bind(&create.content)
    .bind(status)
    .bind(&now)
    .bind(&now)
    .execute(tx.as_mut())
    .await
    .wrap_err("could not insert into table Post")?;
    let post_id = PostId(result.last_insert_rowid());
    if !create.images.is_empty() {
        insert_images(tx.as_mut(), post_id, &create.images).await?;
    }
    tx.commit().await?;
    Ok(post_id)
}

async fn unique_slug(conn: &mut SqliteConnection, title: &str) -> Result<String> {
    let base = slugify(title);
    let mut candidate = base.clone();
    let mut n = 1;
    loop {
        let taken: Option<(i64,)> = sqlx::query_as(
            r#"
SELECT (1) as a FROM Post WHERE slug = ?;
    "#,
        )
        .bind(&candidate)
        .fetch_optional(&mut *conn)
        .await
        .wrap_err("could not query table Post")?;
        if taken.is_none() {
            return Ok(candidate);
        }
        n += 1;
        candidate = format!("{}-{}", base, n);
    }
}

#[instrument(skip(pool))]
pub async fn get_post(pool: &DbPool, post_id: PostId, visibility: Visibility) -> Result<Option<Post>> {
    let mut query = String::from(
        r#"
SELECT id, title, slug, content, status, created_at, changed_at
FROM Post
WHERE id = ?
    "#,
    );
    if visibility == Visibility::PublishedOnly {
        query.push_str("AND status = ?\n");
    }
    let mut q = sqlx::query_as::<_, DbPost>(&query).bind(post_id);
    if visibility == Visibility::PublishedOnly {
        q = q.bind(DbPostStatus::Published);
    }
    let row = q
        .fetch_optional(pool)
        .await
        .wrap_err("could not query single row from table Post")?;
    row.map(Post::try_from).transpose()
}

#[instrument(skip(pool))]
pub async fn get_post_by_slug(
    pool: &DbPool,
    slug: &str,
    visibility: Visibility,
) -> Result<Option<Post>> {
    let mut query = String::from(
        r#"
SELECT id, title, slug, content, status, created_at, changed_at
FROM Post
WHERE slug = ?
    "#,
    );
    if visibility == Visibility::PublishedOnly {
        query.push_str("AND status = ?\n");
    }
    let mut q = sqlx::query_as::<_, DbPost>(&query).bind(slug);
    if visibility == Visibility::PublishedOnly {
        q = q.bind(DbPostStatus::Published);
    }
    let row = q
        .fetch_optional(pool)
        .await
        .wrap_err("could not query single row from table Post")?;
    row.map(Post::try_from).transpose()
}

/// Get all published posts, newest first.
#[instrument(skip(pool))]
pub async fn get_published_posts(pool: &DbPool) -> Result<Vec<Post>> {
    sqlx::query_as::<_, DbPost>(
        r#"
SELECT id, title, slug, content, status, created_at, changed_at
FROM Post
WHERE status = ?
ORDER BY created_at DESC, id DESC;
    "#,
    )
    .bind(DbPostStatus::Published)
    .fetch_all(pool)
    .await
    .wrap_err("could not query table Post")?
    .into_iter()
    .map(Post::try_from)
    .collect()
}

/// Get a post's image sequence ordered by its stored position.
#[instrument(skip(pool))]
pub async fn get_post_images(pool: &DbPool, post_id: PostId) -> Result<Vec<ImageRecord>> {
    let rows: Vec<DbPostImage> = sqlx::query_as(
        r#"
SELECT post_id, idx, url, title, description
FROM PostImage
WHERE post_id = ?
ORDER BY idx;
    "#,
    )
    .bind(post_id)
    .fetch_all(pool)
    .await
    .wrap_err("could not query table PostImage")?;
    Ok(rows.into_iter().map(ImageRecord::from).collect())
}

/// Store `images` as the post's complete new sequence, replacing whatever
/// was there. Positions are taken from list order, so the stored `idx`
/// column is always contiguous from 0 and priorities read back as 1..=N.
#[instrument(skip(pool, images))]
pub async fn replace_post_images(
    pool: &DbPool,
    post_id: PostId,
    images: &[ImageRecord],
) -> Result<()> {
    let mut tx = pool
        .begin()
        .await
        .wrap_err("could not begin db transaction")?;
    sqlx::query(
        r#"
DELETE FROM PostImage WHERE post_id = ?;
    "#,
    )
    .bind(post_id)
    .execute(tx.as_mut())
    .await
    .wrap_err("could not delete from table PostImage")?;
    if !images.is_empty() {
        insert_images(tx.as_mut(), post_id, images).await?;
    }
    let now = datetime_to_db_repr(&chrono::Utc::now());
    sqlx::query(
        r#"
UPDATE Post SET changed_at = ? WHERE id = ?;
    "#,
    )
    .bind(&now)
    .bind(post_id)
    .execute(tx.as_mut())
    .await
    .wrap_err("could not update column Post.changed_at")?;
    tx.commit().await?;
    Ok(())
}

async fn insert_images(
    conn: &mut SqliteConnection,
    post_id: PostId,
    images: &[ImageRecord],
) -> Result<()> {
    let mut query_builder: QueryBuilder<Sqlite> = QueryBuilder::new(
        r#"
INSERT INTO PostImage(id, post_id, idx, url, title, description)
    "#,
    );
    query_builder.push_values(images.iter().enumerate(), |mut builder, (idx, image)| {
        builder.push_bind(None::<i64>);
        builder.push_bind(post_id);
        builder.push_bind(idx as i64);
        builder.push_bind(image.url.as_str());
        builder.push_bind(image.title.as_str());
        builder.push_bind(image.description.as_str());
    });
    query_builder.push(r#";"#);
    query_builder
        .build()
        .execute(&mut *conn)
        .await
        .wrap_err("could not insert into table PostImage")?;
    Ok(())
}
