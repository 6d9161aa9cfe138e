pub mod achievement;
pub mod activity;
pub mod announcement;
pub mod offer;
pub mod record;
pub mod sync_state;
