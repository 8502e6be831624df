pub mod fetcher;
pub mod maintenance;
pub mod notify;
pub mod time_slots;
