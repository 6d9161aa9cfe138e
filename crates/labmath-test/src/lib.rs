//! LabMath admin backend - integration test support.
//!
//! Re-exports the workspace crates under one `labmath_test::` path so the
//! integration tests can reach every layer.

pub mod component {
    pub use labmath_core::{constants, types, util};
    pub use labmath_service::{auth, content, error, mirror, sync};

    pub mod db {
        pub use labmath_db::db::*;

        pub mod connection {
            pub use labmath_app::db_handler::DbProviderHandler;
            pub use labmath_db::db::connection::*;
        }
    }

    pub mod model {
        pub use labmath_db::model::*;
    }

    pub mod middleware {
        pub use labmath_app::middleware::*;
    }

    pub mod config {
        pub use labmath_app::config::ConfigHandler;
        pub use labmath_core::config::*;
    }
}

pub mod app {
    pub use labmath_app::*;

    pub mod api {
        pub use labmath_app::app::api::*;
    }
}
