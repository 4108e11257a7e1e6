//! Diesel schema for tasks and comments.

diesel::table! {
    /// Tasks owned by users.
    tasks (id) {
        /// Store-assigned identifier.
        id -> Int8,
        /// Short title.
        #[max_length = 255]
        title -> Varchar,
        /// Free text, empty when absent.
        description -> Text,
        /// One of `new`, `in_progress`, `done`, `canceled`.
        #[max_length = 20]
        status -> Varchar,
        /// One of `low`, `medium`, `high`.
        #[max_length = 20]
        priority -> Varchar,
        /// Optional deadline.
        deadline -> Nullable<Timestamptz>,
        /// Owning user.
        owner_id -> Int8,
    }
}

diesel::table! {
    /// Comments left on tasks.
    comments (id) {
        /// Store-assigned identifier.
        id -> Int8,
        /// Parent task.
        task_id -> Int8,
        /// Author.
        author_id -> Int8,
        /// Body.
        text -> Text,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::joinable!(comments -> tasks (task_id));
diesel::allow_tables_to_appear_in_same_query!(tasks, comments);
