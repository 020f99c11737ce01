//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly; regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Registered accounts. `email` and `username` carry unique constraints.
    users (id) {
        id -> Uuid,
        email -> Varchar,
        username -> Varchar,
        /// PHC-formatted Argon2id hash.
        password_hash -> Text,
        avatar -> Nullable<Text>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Articles. `slug` is unique across all rows, drafts included.
    articles (id) {
        id -> Uuid,
        author_id -> Uuid,
        title -> Text,
        slug -> Text,
        content -> Text,
        excerpt -> Text,
        published -> Bool,
        /// Set on the first publish and never cleared.
        published_at -> Nullable<Timestamptz>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// One row per (article, user) like; removed with the article.
    article_likes (article_id, user_id) {
        article_id -> Uuid,
        user_id -> Uuid,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Reader comments; removed with the article.
    comments (id) {
        id -> Uuid,
        article_id -> Uuid,
        author_id -> Uuid,
        content -> Text,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(articles -> users (author_id));
diesel::joinable!(article_likes -> articles (article_id));
diesel::joinable!(comments -> articles (article_id));
diesel::joinable!(comments -> users (author_id));

diesel::allow_tables_to_appear_in_same_query!(users, articles, article_likes, comments);
