//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the embedded migrations exactly; Diesel uses
//! them for compile-time query validation and type-safe SQL generation.

diesel::table! {
    /// User records keyed by the caller-supplied opaque client id.
    users (id) {
        id -> Varchar,
        name -> Nullable<Varchar>,
        avatar_url -> Nullable<Varchar>,
        role -> Varchar,
        is_pro -> Bool,
        pro_until -> Nullable<Timestamptz>,
        prefix -> Nullable<Varchar>,
        points -> Int8,
        daily_claimed_at -> Nullable<Timestamptz>,
        settings -> Jsonb,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// User-submitted points of interest.
    markers (id) {
        id -> Uuid,
        kind -> Varchar,
        title -> Varchar,
        description -> Nullable<Text>,
        lng -> Float8,
        lat -> Float8,
        created_by -> Varchar,
        status -> Varchar,
        confirmations -> Int4,
        confirmations_by -> Array<Text>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Immutable marker comments.
    comments (id) {
        id -> Uuid,
        marker_id -> Uuid,
        user_id -> Varchar,
        body -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Ratings, unique per (marker_id, user_id).
    ratings (id) {
        id -> Uuid,
        marker_id -> Uuid,
        user_id -> Varchar,
        value -> Int4,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Append-only audit trail of point-earning events.
    activities (id) {
        id -> Uuid,
        user_id -> Varchar,
        kind -> Varchar,
        points -> Int8,
        meta -> Nullable<Jsonb>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Pro entitlement records.
    subscriptions (id) {
        id -> Uuid,
        user_id -> Varchar,
        status -> Varchar,
        kind -> Varchar,
        start_at -> Timestamptz,
        end_at -> Timestamptz,
        source -> Varchar,
        price_rub -> Nullable<Int4>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Payment intents updated by the provider webhook.
    payments (id) {
        id -> Uuid,
        user_id -> Varchar,
        provider -> Varchar,
        external_id -> Varchar,
        amount_rub -> Int4,
        status -> Varchar,
        link_url -> Nullable<Varchar>,
        meta -> Nullable<Jsonb>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::allow_tables_to_appear_in_same_query!(
    users,
    markers,
    comments,
    ratings,
    activities,
    subscriptions,
    payments,
);
