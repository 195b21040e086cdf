//! Diesel schema for task persistence.

diesel::table! {
    /// Task records.
    tasks (id) {
        /// Task identifier.
        id -> Uuid,
        /// Task title.
        #[max_length = 255]
        title -> Varchar,
        /// Task description.
        description -> Text,
        /// Current assignee.
        assigned_to -> Uuid,
        /// Owning team.
        team_id -> Uuid,
        /// Due date.
        due_date -> Timestamptz,
        /// Open-vocabulary status value.
        #[max_length = 50]
        status -> Varchar,
        /// Open-vocabulary priority value.
        #[max_length = 50]
        priority -> Varchar,
        /// Derived completion flag.
        completed -> Bool,
        /// Optional category reference; nulled when the category goes.
        category_id -> Nullable<Uuid>,
        /// Creation timestamp, set once.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Append-only audit entries of tracked task field changes.
    task_logs (id) {
        /// Log entry identifier.
        id -> Uuid,
        /// Task the entry belongs to.
        task_id -> Uuid,
        /// Which tracked field changed.
        #[max_length = 50]
        change_type -> Varchar,
        /// Value before the change.
        old_value -> Text,
        /// Value after the change.
        new_value -> Text,
        /// Acting user; nulled if the user is later removed.
        acting_user -> Nullable<Uuid>,
        /// Entry creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Immutable task comments.
    comments (id) {
        /// Comment identifier.
        id -> Uuid,
        /// Task the comment belongs to.
        task_id -> Uuid,
        /// Comment author.
        author_id -> Uuid,
        /// Comment body.
        content -> Text,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}
