//! Diesel schema for users and chat profiles.

diesel::table! {
    /// Internal user accounts.
    users (id) {
        /// Store-assigned identifier.
        id -> Int8,
        /// Unique login handle.
        #[max_length = 150]
        handle -> Varchar,
        /// Optional PHC-encoded password hash.
        password_hash -> Nullable<Text>,
    }
}

diesel::table! {
    /// One-to-one chat-platform profile of a user.
    user_profiles (id) {
        /// Store-assigned identifier.
        id -> Int8,
        /// Owning user, unique.
        user_id -> Int8,
        /// Chat-platform participant id, unique when present.
        external_chat_id -> Nullable<Int8>,
        /// Conversation where notifications are delivered.
        #[max_length = 50]
        conversation_handle -> Nullable<Varchar>,
    }
}
