//! Moodle tables read by the feed generator.

diesel::table! {
    mdl_course_categories (id) {
        id -> Int8,
        name -> Varchar,
    }
}

diesel::table! {
    mdl_event (id) {
        id -> Int8,
        name -> Text,
        description -> Nullable<Text>,
        timestart -> Int8,
        timeduration -> Int8,
        timemodified -> Int8,
        categoryid -> Int8,
        location -> Nullable<Text>,
    }
}

diesel::joinable!(mdl_event -> mdl_course_categories (categoryid));

diesel::allow_tables_to_appear_in_same_query!(mdl_course_categories, mdl_event);
