// Rust-side names are English; the persisted names follow the layout the
// public site's API was built against.

diesel::table! {
    #[sql_name = "activites"]
    activity (id) {
        id -> Integer,
        #[sql_name = "titre"]
        title -> Text,
        description -> Nullable<Text>,
        #[sql_name = "contenu"]
        content -> Nullable<Text>,
        image_url -> Nullable<Text>,
        #[sql_name = "auteur"]
        author -> Nullable<Text>,
        #[sql_name = "date_creation"]
        created_at -> Timestamp,
        #[sql_name = "est_publie"]
        is_published -> Bool,
        last_sync -> Nullable<Timestamp>,
        sync_status -> Text,
        sync_message -> Nullable<Text>,
    }
}

diesel::table! {
    #[sql_name = "realisations"]
    achievement (id) {
        id -> Integer,
        #[sql_name = "titre"]
        title -> Text,
        description -> Nullable<Text>,
        image_url -> Nullable<Text>,
        #[sql_name = "categorie"]
        category -> Nullable<Text>,
        #[sql_name = "date_realisation"]
        achieved_on -> Nullable<Date>,
        #[sql_name = "date_creation"]
        created_at -> Timestamp,
        last_sync -> Nullable<Timestamp>,
        sync_status -> Text,
        sync_message -> Nullable<Text>,
    }
}

diesel::table! {
    #[sql_name = "annonces"]
    announcement (id) {
        id -> Integer,
        #[sql_name = "titre"]
        title -> Text,
        #[sql_name = "contenu"]
        content -> Nullable<Text>,
        #[sql_name = "type_annonce"]
        announcement_type -> Nullable<Text>,
        #[sql_name = "date_debut"]
        starts_at -> Nullable<Timestamp>,
        #[sql_name = "date_fin"]
        ends_at -> Nullable<Timestamp>,
        #[sql_name = "date_creation"]
        created_at -> Timestamp,
        #[sql_name = "est_active"]
        is_active -> Bool,
        last_sync -> Nullable<Timestamp>,
        sync_status -> Text,
        sync_message -> Nullable<Text>,
    }
}

diesel::table! {
    #[sql_name = "offres"]
    offer (id) {
        id -> Integer,
        #[sql_name = "titre"]
        title -> Text,
        description -> Nullable<Text>,
        #[sql_name = "type_offre"]
        offer_type -> Nullable<Text>,
        #[sql_name = "lieu"]
        location -> Nullable<Text>,
        #[sql_name = "date_limite"]
        deadline -> Nullable<Date>,
        #[sql_name = "date_creation"]
        created_at -> Timestamp,
        #[sql_name = "est_active"]
        is_active -> Bool,
        last_sync -> Nullable<Timestamp>,
        sync_status -> Text,
        sync_message -> Nullable<Text>,
    }
}

diesel::allow_tables_to_appear_in_same_query!(activity, achievement, announcement, offer);
